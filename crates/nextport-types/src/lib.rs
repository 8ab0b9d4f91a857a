//! # nextport-types: Core types for Nextport
//!
//! This crate contains the shared types used across the Nextport system:
//! - Entity IDs ([`NodeId`], [`EdgeId`], [`ShipmentId`])
//! - Geographic types ([`GeoPoint`])
//! - Entity definitions ([`Node`], [`Edge`], [`Shipment`])
//! - Status enums ([`OperationalStatus`], [`ShipmentStatus`])
//! - The shared error taxonomy ([`NetworkError`])
//!
//! Simulated time is a plain `f64` scalar: it has no relationship to
//! wall-clock time and advances only when the event engine is told to.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Entity IDs
// ============================================================================

/// Unique identifier for a facility node.
///
/// Node ids are short operator-assigned strings (`"F1"`, `"W2"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a directed transport edge.
///
/// Edge ids derive deterministically from their endpoints as
/// `source-target`, so the direct edge between two nodes can be named
/// without a lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the id of the direct edge from `source` to `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nextport_types::{EdgeId, NodeId};
    /// let id = EdgeId::between(&NodeId::from("F1"), &NodeId::from("W1"));
    /// assert_eq!(id.as_str(), "F1-W1");
    /// ```
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        Self(format!("{source}-{target}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(Uuid);

impl ShipmentId {
    /// Generates a fresh random shipment id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for ShipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ShipmentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Default for ShipmentId {
    fn default() -> Self {
        Self::generate()
    }
}

// ============================================================================
// Geographic Types
// ============================================================================

/// A latitude/longitude pair.
///
/// Coordinates carry no unit guarantees beyond "the external map layer can
/// plot them"; the engine never computes geographic distance from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ============================================================================
// Status & Kind Enums
// ============================================================================

/// The kind of facility a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Factory,
    Warehouse,
    Port,
}

/// Transport mode of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Road,
    Sea,
    Air,
}

/// Whether a node or edge is currently usable at nominal capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalStatus {
    Operational,
    Disrupted,
}

/// Lifecycle status of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Planned,
    InTransit,
    Delivered,
}

// ============================================================================
// Entities
// ============================================================================

/// A facility in the supply-chain network.
///
/// Invariant: `disruption_end_time` is `Some` if and only if `status` is
/// [`OperationalStatus::Disrupted`]. The transitions in [`Node::disrupt`]
/// and [`Node::clear_disruption`] are the only places that touch the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub location: GeoPoint,
    pub capacity: f64,
    pub current_inventory: f64,
    pub status: OperationalStatus,
    pub disruption_end_time: Option<f64>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, location: GeoPoint, capacity: f64) -> Self {
        Self {
            id,
            kind,
            location,
            capacity,
            current_inventory: 0.0,
            status: OperationalStatus::Operational,
            disruption_end_time: None,
        }
    }

    /// Marks the node disrupted until the given absolute simulated time.
    ///
    /// Re-disrupting an already disrupted node overwrites the end time.
    pub fn disrupt(&mut self, end_time: f64) {
        self.status = OperationalStatus::Disrupted;
        self.disruption_end_time = Some(end_time);
    }

    /// Returns the node to operational status.
    pub fn clear_disruption(&mut self) {
        self.status = OperationalStatus::Operational;
        self.disruption_end_time = None;
    }

    /// True when the disruption window has elapsed at `now`.
    pub fn disruption_expired(&self, now: f64) -> bool {
        self.status == OperationalStatus::Disrupted
            && self.disruption_end_time.is_some_and(|end| end <= now)
    }
}

/// A directed transport link between two nodes.
///
/// Invariant: `current_delay` is nonzero only while `status` is
/// [`OperationalStatus::Disrupted`]; [`Edge::clear_disruption`] resets it
/// to zero in the same transition that restores operational status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub mode: TransportMode,
    pub base_time: f64,
    pub base_cost: f64,
    pub current_delay: f64,
    pub status: OperationalStatus,
    pub disruption_end_time: Option<f64>,
}

impl Edge {
    pub fn new(
        source: NodeId,
        target: NodeId,
        mode: TransportMode,
        base_time: f64,
        base_cost: f64,
    ) -> Self {
        let id = EdgeId::between(&source, &target);
        Self {
            id,
            source,
            target,
            mode,
            base_time,
            base_cost,
            current_delay: 0.0,
            status: OperationalStatus::Operational,
            disruption_end_time: None,
        }
    }

    /// Current traversal time: base time plus any disruption delay.
    pub fn travel_time(&self) -> f64 {
        self.base_time + self.current_delay
    }

    /// Marks the edge disrupted until `end_time`, scaling the delay from
    /// the base time.
    ///
    /// A second disruption overwrites the delay rather than accumulating.
    pub fn disrupt(&mut self, end_time: f64, severity: f64) {
        self.status = OperationalStatus::Disrupted;
        self.current_delay = self.base_time * severity;
        self.disruption_end_time = Some(end_time);
    }

    /// Restores the edge to operational status and zero delay.
    pub fn clear_disruption(&mut self) {
        self.status = OperationalStatus::Operational;
        self.current_delay = 0.0;
        self.disruption_end_time = None;
    }

    /// True when the disruption window has elapsed at `now`.
    pub fn disruption_expired(&self, now: f64) -> bool {
        self.status == OperationalStatus::Disrupted
            && self.disruption_end_time.is_some_and(|end| end <= now)
    }
}

/// A quantity of goods moving along a route of edges.
///
/// Invariant: `estimated_arrival` always equals `start_time` plus the sum
/// of `base_time + current_delay` over the current route. The network
/// model recomputes it whenever the route or any route edge's delay
/// changes; the engine never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub route: Vec<EdgeId>,
    pub quantity: f64,
    pub start_time: f64,
    pub estimated_arrival: f64,
    pub current_position: GeoPoint,
    pub status: ShipmentStatus,
}

impl Shipment {
    pub fn is_in_transit(&self) -> bool {
        self.status == ShipmentStatus::InTransit
    }

    pub fn is_delivered(&self) -> bool {
        self.status == ShipmentStatus::Delivered
    }
}

// ============================================================================
// Error Taxonomy
// ============================================================================

/// Errors produced by network-model operations.
///
/// Every variant is locally recoverable: operations validate their inputs
/// before mutating anything, so a returned error guarantees the network is
/// unchanged. The external HTTP layer maps these to 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Registering a node or edge under an id that already exists.
    #[error("entity {id} is already registered")]
    DuplicateEntity { id: String },

    /// An edge endpoint references a node that is not registered.
    #[error("node {id} is not registered")]
    UnknownNode { id: String },

    /// A disruption or recovery targets a node or edge that does not exist.
    #[error("entity {id} is not registered")]
    UnknownEntity { id: String },

    /// No direct edge exists between the requested origin and destination.
    #[error("no route from {origin} to {destination}")]
    NoRoute { origin: NodeId, destination: NodeId },

    /// A proposed route references an edge that does not exist.
    #[error("route references unknown edge {edge}")]
    InvalidRoute { edge: EdgeId },

    /// Alternate-supplier activation targets a node that is not a factory.
    #[error("node {id} is not a factory")]
    NotAFactory { id: NodeId },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn edge_id_derives_from_endpoints() {
        let edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        assert_eq!(edge.id, EdgeId::from("F1-W1"));
        assert_eq!(edge.id.to_string(), "F1-W1");
    }

    #[test]
    fn node_disruption_pairs_status_and_end_time() {
        let mut node = Node::new(
            NodeId::from("F1"),
            NodeKind::Factory,
            GeoPoint::new(40.7128, -74.0060),
            1000.0,
        );
        assert_eq!(node.status, OperationalStatus::Operational);
        assert_eq!(node.disruption_end_time, None);

        node.disrupt(100.0);
        assert_eq!(node.status, OperationalStatus::Disrupted);
        assert_eq!(node.disruption_end_time, Some(100.0));

        node.clear_disruption();
        assert_eq!(node.status, OperationalStatus::Operational);
        assert_eq!(node.disruption_end_time, None);
    }

    #[test_case(0.5, 12.0 ; "half severity")]
    #[test_case(1.0, 24.0 ; "full severity")]
    #[test_case(2.0, 48.0 ; "double severity")]
    fn edge_disruption_scales_delay_from_base_time(severity: f64, expected_delay: f64) {
        let mut edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        edge.disrupt(100.0, severity);

        assert_eq!(edge.status, OperationalStatus::Disrupted);
        assert!((edge.current_delay - expected_delay).abs() < f64::EPSILON);
        assert!((edge.travel_time() - (24.0 + expected_delay)).abs() < f64::EPSILON);
    }

    #[test]
    fn edge_redisruption_overwrites_delay() {
        let mut edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        edge.disrupt(100.0, 0.5);
        edge.disrupt(200.0, 0.25);

        assert!((edge.current_delay - 6.0).abs() < f64::EPSILON);
        assert_eq!(edge.disruption_end_time, Some(200.0));
    }

    #[test]
    fn edge_clear_resets_delay() {
        let mut edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        edge.disrupt(100.0, 0.5);
        edge.clear_disruption();

        assert_eq!(edge.status, OperationalStatus::Operational);
        assert!(edge.current_delay.abs() < f64::EPSILON);
        assert_eq!(edge.disruption_end_time, None);
    }

    #[test_case(99.0, false ; "before the window ends")]
    #[test_case(100.0, true ; "exactly at the window end")]
    #[test_case(101.0, true ; "after the window ends")]
    fn disruption_expiry_is_inclusive(now: f64, expired: bool) {
        let mut edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        edge.disrupt(100.0, 0.5);
        assert_eq!(edge.disruption_expired(now), expired);
    }

    #[test]
    fn operational_edge_never_reports_expired() {
        let edge = Edge::new(
            NodeId::from("F1"),
            NodeId::from("W1"),
            TransportMode::Road,
            24.0,
            1000.0,
        );
        assert!(!edge.disruption_expired(f64::MAX));
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&OperationalStatus::Disrupted).unwrap(),
            "\"disrupted\""
        );
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
        assert_eq!(
            serde_json::to_string(&NodeKind::Factory).unwrap(),
            "\"factory\""
        );
        assert_eq!(
            serde_json::to_string(&TransportMode::Air).unwrap(),
            "\"air\""
        );
    }

    #[test]
    fn shipment_ids_are_unique() {
        let a = ShipmentId::generate();
        let b = ShipmentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn network_error_messages_name_the_entity() {
        let err = NetworkError::NoRoute {
            origin: NodeId::from("F1"),
            destination: NodeId::from("W9"),
        };
        assert_eq!(err.to_string(), "no route from F1 to W9");
    }
}
