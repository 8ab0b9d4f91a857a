//! # Nextport
//!
//! A deterministic supply-chain disruption simulation engine.
//!
//! Nextport models a network of facilities and transport links with
//! shipments moving through it, advances the whole system through
//! simulated time, and estimates the impact of injected disruptions and
//! operator-issued recovery strategies.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Simulation                           │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │   Network    │ ← │    Engine    │   │    Analytics     │  │
//! │  │ (owns state) │   │ (advances t) │   │ (read-only math) │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The network model owns all mutable state; the engine drives one
//! traversal process per in-transit shipment against a monotone simulated
//! clock; analytics never mutates. Everything runs on the caller's
//! thread — there is no internal concurrency to reason about.
//!
//! # Quick start
//!
//! ```
//! use nextport::{NetworkSeed, NodeId, Simulation};
//!
//! # fn main() -> nextport::Result<()> {
//! let mut sim = Simulation::from_seed(&NetworkSeed::default_demo())?;
//!
//! sim.create_shipment(NodeId::from("F1"), NodeId::from("W1"), 100.0)?;
//! let report = sim.advance(30.0)?;
//! assert_eq!(report.current_time, 30.0);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::float_cmp))]

mod error;
mod seed;
mod simulation;

pub use error::{Result, SeedError, SimulationError};
pub use seed::{NetworkSeed, SeedEdge, SeedNode};
pub use simulation::{
    AdvanceReport, DisruptionKind, DisruptionReport, DisruptionRequest, NetworkSnapshot,
    RecoveryReport, Simulation,
};

// Re-export the layer crates' public surface so callers can depend on the
// facade alone.
pub use nextport_analytics::{RecoveryImpact, RecoveryStrategy, disruption_impact, recovery_impact};
pub use nextport_engine::{EventEngine, RunSummary, SimClock};
pub use nextport_network::{
    DisruptionImpact, EdgeView, NetworkMetrics, NodeView, ShipmentView, SupplyChainNetwork,
};
pub use nextport_types::{
    Edge, EdgeId, GeoPoint, NetworkError, Node, NodeId, NodeKind, OperationalStatus, Shipment,
    ShipmentId, ShipmentStatus, TransportMode,
};
