//! # nextport-analytics: Impact analytics for Nextport
//!
//! Pure functions over a [`SupplyChainNetwork`] snapshot. Nothing in this
//! crate mutates network state; every function takes `&SupplyChainNetwork`
//! and produces a report struct.
//!
//! Route cost/time here is evaluated as a single-edge lookup, matching the
//! network model's direct-edge routing: a proposed route is represented by
//! its first edge, and an unknown edge contributes zero.

#![cfg_attr(test, allow(clippy::float_cmp))]

use nextport_network::{DisruptionImpact, SupplyChainNetwork};
use nextport_types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Recovery Strategies
// ============================================================================

/// An operator-issued recovery strategy.
///
/// The serde shape matches the external wire contract:
/// `{ "type": "reroute" | "alternate_supplier", "parameters": { ... } }`.
/// Unrecognized strategy types fail at deserialization, so an invalid
/// strategy is unrepresentable past the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Replace the route of in-transit shipments between two nodes.
    Reroute {
        origin: NodeId,
        destination: NodeId,
        new_route: Vec<EdgeId>,
    },
    /// Re-origin planned shipments from one supplier to another.
    AlternateSupplier {
        original: NodeId,
        alternate: NodeId,
    },
}

impl RecoveryStrategy {
    /// Wire label of the strategy type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reroute { .. } => "reroute",
            Self::AlternateSupplier { .. } => "alternate_supplier",
        }
    }
}

/// Estimated effect of applying a recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryImpact {
    /// Cost difference, nominal minus recovered (positive = cheaper).
    pub cost_savings: f64,
    /// Time difference, nominal minus recovered (positive = faster).
    pub time_savings: f64,
    /// Shipments the strategy touches (alternate-supplier only).
    pub affected_shipments: usize,
}

// ============================================================================
// Impact Computation
// ============================================================================

/// Impact snapshot for currently injected disruptions.
///
/// Delegates to the network's metrics pass; exposed here so callers that
/// only hold the analytics crate see the full read-only surface.
pub fn disruption_impact(network: &SupplyChainNetwork) -> DisruptionImpact {
    network.disruption_impact()
}

/// Estimates the impact of a recovery strategy against current state.
pub fn recovery_impact(network: &SupplyChainNetwork, strategy: &RecoveryStrategy) -> RecoveryImpact {
    let impact = match strategy {
        RecoveryStrategy::Reroute {
            origin,
            destination,
            new_route,
        } => reroute_impact(network, origin, destination, new_route),
        RecoveryStrategy::AlternateSupplier {
            original,
            alternate,
        } => alternate_supplier_impact(network, original, alternate),
    };
    debug!(
        strategy = strategy.label(),
        cost_savings = impact.cost_savings,
        time_savings = impact.time_savings,
        affected = impact.affected_shipments,
        "recovery impact estimated"
    );
    impact
}

/// Compares the nominal direct edge against the proposed route.
fn reroute_impact(
    network: &SupplyChainNetwork,
    origin: &NodeId,
    destination: &NodeId,
    new_route: &[EdgeId],
) -> RecoveryImpact {
    let original_edge = EdgeId::between(origin, destination);
    let (original_cost, original_time) = edge_cost_time(network, &original_edge);
    let (new_cost, new_time) = new_route
        .first()
        .map_or((0.0, 0.0), |edge| edge_cost_time(network, edge));

    RecoveryImpact {
        cost_savings: original_cost - new_cost,
        time_savings: original_time - new_time,
        affected_shipments: 0,
    }
}

/// Counts undelivered shipments of the original supplier and compares
/// average outgoing edge costs between the two suppliers.
fn alternate_supplier_impact(
    network: &SupplyChainNetwork,
    original: &NodeId,
    alternate: &NodeId,
) -> RecoveryImpact {
    let affected_shipments = network
        .iter_shipments()
        .filter(|s| s.origin == *original && !s.is_delivered())
        .count();

    RecoveryImpact {
        cost_savings: average_outgoing_cost(network, original)
            - average_outgoing_cost(network, alternate),
        time_savings: 0.0,
        affected_shipments,
    }
}

/// Base cost and current travel time of one edge; zero if unregistered.
fn edge_cost_time(network: &SupplyChainNetwork, id: &EdgeId) -> (f64, f64) {
    network
        .edge(id)
        .map_or((0.0, 0.0), |edge| (edge.base_cost, edge.travel_time()))
}

/// Mean base cost of edges leaving `node`; zero if none leave it.
fn average_outgoing_cost(network: &SupplyChainNetwork, node: &NodeId) -> f64 {
    let costs: Vec<f64> = network
        .iter_edges()
        .filter(|e| e.source == *node)
        .map(|e| e.base_cost)
        .collect();
    if costs.is_empty() {
        0.0
    } else {
        costs.iter().sum::<f64>() / costs.len() as f64
    }
}

// ============================================================================
// Tests
// ============================================================================
