//! Read-only projections of network state.
//!
//! View shapes match the external collaborator contract, so an HTTP layer
//! can serialize them unchanged. Field names follow the wire contract
//! (`type`, `delay`, `eta`) rather than the internal entity names.

use nextport_types::{
    Edge, EdgeId, GeoPoint, Node, NodeId, NodeKind, OperationalStatus, Shipment, ShipmentId,
    ShipmentStatus, TransportMode,
};
use serde::{Deserialize, Serialize};

/// Projection of a [`Node`] for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub location: GeoPoint,
    pub status: OperationalStatus,
    pub inventory: f64,
}

impl From<&Node> for NodeView {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            location: node.location,
            status: node.status,
            inventory: node.current_inventory,
        }
    }
}

/// Projection of an [`Edge`] for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub mode: TransportMode,
    pub status: OperationalStatus,
    pub delay: f64,
}

impl From<&Edge> for EdgeView {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            mode: edge.mode,
            status: edge.status,
            delay: edge.current_delay,
        }
    }
}

/// Projection of a [`Shipment`] for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentView {
    pub id: ShipmentId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub status: ShipmentStatus,
    pub position: GeoPoint,
    pub eta: f64,
}

impl From<&Shipment> for ShipmentView {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: shipment.id,
            origin: shipment.origin.clone(),
            destination: shipment.destination.clone(),
            status: shipment.status,
            position: shipment.current_position,
            eta: shipment.estimated_arrival,
        }
    }
}

/// Network-wide aggregates over the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Sum of `estimated_arrival - start_time` across all shipments.
    pub total_delay: f64,
    /// Sum of per-shipment route base costs.
    pub total_cost: f64,
    /// Shipments currently in transit.
    pub active_shipments: usize,
    pub disrupted_nodes: usize,
    pub disrupted_edges: usize,
}

/// Impact snapshot taken immediately after a disruption is injected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionImpact {
    /// Shipments not yet delivered.
    pub affected_shipments: usize,
    pub delay_impact: f64,
    pub cost_impact: f64,
}
