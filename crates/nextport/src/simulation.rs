//! The simulation context: one network, one engine, explicit ownership.

use std::path::Path;

use nextport_analytics::{RecoveryImpact, RecoveryStrategy, recovery_impact};
use nextport_engine::EventEngine;
use nextport_network::{
    DisruptionImpact, EdgeView, NetworkMetrics, NodeView, ShipmentView, SupplyChainNetwork,
};
use nextport_types::{EdgeId, NodeId, ShipmentId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::seed::NetworkSeed;

// ============================================================================
// Request / Report Shapes
// ============================================================================

/// Which entity class a disruption targets.
///
/// Typed at the boundary: an unrecognized target kind fails
/// deserialization before it can reach the network model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionKind {
    Node,
    Edge,
}

/// A disruption injection request.
///
/// `duration` is an absolute simulated end time: the disruption clears
/// once the clock reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionRequest {
    #[serde(rename = "type")]
    pub kind: DisruptionKind,
    pub target_id: String,
    pub duration: f64,
    pub severity: f64,
}

/// Result of injecting a disruption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionReport {
    #[serde(rename = "type")]
    pub kind: DisruptionKind,
    pub target: String,
    pub duration: f64,
    pub impact: DisruptionImpact,
}

/// Result of applying a recovery strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub strategy: String,
    /// Shipments the application actually touched.
    pub applied_to: usize,
    pub impact: RecoveryImpact,
}

/// Result of advancing the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceReport {
    pub current_time: f64,
    pub metrics: NetworkMetrics,
}

/// Full network state in the external wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub shipments: Vec<ShipmentView>,
}

// ============================================================================
// Simulation Context
// ============================================================================

/// Owns one supply-chain network and the engine that advances it.
///
/// Construct one per process, pass it to every operation, drop it at
/// shutdown. All mutation runs on the caller's thread; callers that share
/// a `Simulation` across threads must serialize access themselves, which
/// preserves the model's single-writer guarantee.
#[derive(Debug, Default)]
pub struct Simulation {
    network: SupplyChainNetwork,
    engine: EventEngine,
}

impl Simulation {
    /// Creates a simulation over an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulation seeded with an initial set of nodes and edges.
    pub fn from_seed(seed: &NetworkSeed) -> Result<Self> {
        let mut network = SupplyChainNetwork::new();
        seed.apply(&mut network)?;
        Ok(Self {
            network,
            engine: EventEngine::new(),
        })
    }

    /// Creates a simulation from a JSON seed file, falling back to the
    /// built-in demo network when the file does not exist.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let seed = NetworkSeed::load_or_default(path)?;
        Self::from_seed(&seed)
    }

    /// The underlying network, read-only.
    pub fn network(&self) -> &SupplyChainNetwork {
        &self.network
    }

    /// Current simulated time.
    pub fn current_time(&self) -> f64 {
        self.engine.current_time()
    }

    /// Current state of every node, edge, and in-transit shipment.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            nodes: self.network.node_views(),
            edges: self.network.edge_views(),
            shipments: self.network.in_transit_shipment_views(),
        }
    }

    /// Advances simulated time by `steps`, driving every in-transit
    /// shipment and reconciling expired disruptions.
    pub fn advance(&mut self, steps: f64) -> Result<AdvanceReport> {
        let summary = self.engine.run(&mut self.network, steps)?;
        Ok(AdvanceReport {
            current_time: summary.current_time,
            metrics: self.network.metrics(),
        })
    }

    /// Creates an in-transit shipment along the direct route.
    pub fn create_shipment(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        quantity: f64,
    ) -> Result<ShipmentId> {
        let start_time = self.engine.current_time();
        Ok(self
            .network
            .create_shipment(origin, destination, quantity, start_time)?)
    }

    /// Creates a shipment that has not yet departed.
    pub fn create_planned_shipment(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        quantity: f64,
    ) -> Result<ShipmentId> {
        let start_time = self.engine.current_time();
        Ok(self
            .network
            .create_planned_shipment(origin, destination, quantity, start_time)?)
    }

    /// Injects a disruption and reports its immediate impact.
    pub fn inject_disruption(&mut self, request: &DisruptionRequest) -> Result<DisruptionReport> {
        match request.kind {
            DisruptionKind::Node => {
                self.network.disrupt_node(
                    &NodeId::from(request.target_id.as_str()),
                    request.duration,
                    request.severity,
                )?;
            }
            DisruptionKind::Edge => {
                self.network.disrupt_edge(
                    &EdgeId::from(request.target_id.as_str()),
                    request.duration,
                    request.severity,
                )?;
            }
        }
        info!(target = %request.target_id, kind = ?request.kind, "disruption injected");
        Ok(DisruptionReport {
            kind: request.kind,
            target: request.target_id.clone(),
            duration: request.duration,
            impact: self.network.disruption_impact(),
        })
    }

    /// Applies a recovery strategy and reports its estimated impact.
    ///
    /// The strategy is applied first; impact is then estimated against the
    /// recovered state, matching the external contract's ordering.
    pub fn apply_recovery(&mut self, strategy: &RecoveryStrategy) -> Result<RecoveryReport> {
        let applied_to = match strategy {
            RecoveryStrategy::Reroute {
                origin,
                destination,
                new_route,
            } => self.network.apply_rerouting(origin, destination, new_route)?,
            RecoveryStrategy::AlternateSupplier {
                original,
                alternate,
            } => self
                .network
                .activate_alternate_supplier(original, alternate)?,
        };
        let impact = recovery_impact(&self.network, strategy);
        info!(strategy = strategy.label(), applied_to, "recovery applied");
        Ok(RecoveryReport {
            strategy: strategy.label().to_string(),
            applied_to,
            impact,
        })
    }
}
