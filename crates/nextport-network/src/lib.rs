//! # nextport-network: The Nextport network model
//!
//! [`SupplyChainNetwork`] is the single owner of all mutable simulation
//! state: nodes, edges, and shipments, keyed by id. Every mutation
//! validates its inputs before writing, so any returned [`NetworkError`]
//! guarantees the network is unchanged.
//!
//! ## Key principles
//!
//! - **Single writer**: the network and the event engine share one logical
//!   thread. Nothing in this crate synchronizes; callers own sequencing.
//! - **ETA is derived state**: `estimated_arrival` is always recomputed as
//!   a full pass over the shipment's current route. Routes are short and
//!   disruptions are rare relative to simulation steps, so the full
//!   recalculation buys correctness for negligible cost.
//! - **Entities are never destroyed**: disruption clears reset fields, and
//!   delivered shipments persist as completed records.

mod views;

use std::collections::HashMap;

use nextport_types::{
    Edge, EdgeId, GeoPoint, NetworkError, Node, NodeId, NodeKind, OperationalStatus, Shipment,
    ShipmentId, ShipmentStatus, TransportMode,
};
use tracing::{debug, info, warn};

pub use views::{DisruptionImpact, EdgeView, NetworkMetrics, NodeView, ShipmentView};

// ============================================================================
// Network Model
// ============================================================================

/// The in-memory supply-chain graph plus all shipments moving through it.
#[derive(Debug, Default)]
pub struct SupplyChainNetwork {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    shipments: HashMap<ShipmentId, Shipment>,
}

impl SupplyChainNetwork {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Registers a facility node.
    ///
    /// Fails with [`NetworkError::DuplicateEntity`] if the id is taken.
    pub fn add_node(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        location: GeoPoint,
        capacity: f64,
    ) -> Result<(), NetworkError> {
        if self.nodes.contains_key(&id) {
            return Err(NetworkError::DuplicateEntity { id: id.to_string() });
        }
        debug!(node = %id, ?kind, "registering node");
        self.nodes.insert(id.clone(), Node::new(id, kind, location, capacity));
        Ok(())
    }

    /// Registers a directed edge with the deterministic id `source-target`.
    ///
    /// Fails with [`NetworkError::UnknownNode`] if either endpoint is
    /// missing and [`NetworkError::DuplicateEntity`] if the edge exists.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        mode: TransportMode,
        base_time: f64,
        base_cost: f64,
    ) -> Result<EdgeId, NetworkError> {
        if !self.nodes.contains_key(&source) {
            return Err(NetworkError::UnknownNode {
                id: source.to_string(),
            });
        }
        if !self.nodes.contains_key(&target) {
            return Err(NetworkError::UnknownNode {
                id: target.to_string(),
            });
        }
        let id = EdgeId::between(&source, &target);
        if self.edges.contains_key(&id) {
            return Err(NetworkError::DuplicateEntity { id: id.to_string() });
        }
        debug!(edge = %id, ?mode, base_time, base_cost, "registering edge");
        self.edges
            .insert(id.clone(), Edge::new(source, target, mode, base_time, base_cost));
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Shipments
    // ------------------------------------------------------------------

    /// Creates an in-transit shipment along the direct route
    /// `origin-destination`.
    ///
    /// Fails with [`NetworkError::NoRoute`] if no direct edge exists.
    pub fn create_shipment(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        quantity: f64,
        start_time: f64,
    ) -> Result<ShipmentId, NetworkError> {
        self.insert_shipment(origin, destination, quantity, start_time, ShipmentStatus::InTransit)
    }

    /// Creates a shipment that has not yet departed.
    ///
    /// Planned shipments are exactly what alternate-supplier activation
    /// re-origins; the engine ignores them until they are in transit.
    pub fn create_planned_shipment(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        quantity: f64,
        start_time: f64,
    ) -> Result<ShipmentId, NetworkError> {
        self.insert_shipment(origin, destination, quantity, start_time, ShipmentStatus::Planned)
    }

    fn insert_shipment(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        quantity: f64,
        start_time: f64,
        status: ShipmentStatus,
    ) -> Result<ShipmentId, NetworkError> {
        let route = self.direct_route(&origin, &destination)?;
        let origin_location = self
            .nodes
            .get(&origin)
            .ok_or_else(|| NetworkError::UnknownNode {
                id: origin.to_string(),
            })?
            .location;
        let eta = self.route_eta(&route, start_time);

        let id = ShipmentId::generate();
        debug!(shipment = %id, origin = %origin, destination = %destination, eta, "creating shipment");
        self.shipments.insert(
            id,
            Shipment {
                id,
                origin,
                destination,
                route,
                quantity,
                start_time,
                estimated_arrival: eta,
                current_position: origin_location,
                status,
            },
        );
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Disruptions
    // ------------------------------------------------------------------

    /// Marks a node disrupted until the absolute simulated time `end_time`.
    ///
    /// `severity` is accepted for parity with edge disruptions but has no
    /// modeled effect on node state beyond the disrupted mark. In-transit
    /// ETAs are recomputed so projections stay consistent.
    pub fn disrupt_node(
        &mut self,
        id: &NodeId,
        end_time: f64,
        severity: f64,
    ) -> Result<(), NetworkError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownEntity { id: id.to_string() })?;
        info!(node = %id, end_time, severity, "node disrupted");
        node.disrupt(end_time);
        self.recompute_in_transit_etas();
        Ok(())
    }

    /// Marks an edge disrupted until `end_time`, setting its delay to
    /// `base_time * severity` (overwriting any prior delay).
    pub fn disrupt_edge(
        &mut self,
        id: &EdgeId,
        end_time: f64,
        severity: f64,
    ) -> Result<(), NetworkError> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownEntity { id: id.to_string() })?;
        edge.disrupt(end_time, severity);
        info!(edge = %id, end_time, severity, delay = edge.current_delay, "edge disrupted");
        self.recompute_in_transit_etas();
        Ok(())
    }

    /// Clears every node and edge disruption whose end time has elapsed at
    /// `now`. Edges additionally reset their delay to zero.
    ///
    /// Called by the event engine after each time advance; returns the
    /// number of entities restored.
    pub fn reconcile_disruptions(&mut self, now: f64) -> usize {
        let mut restored = 0;
        for node in self.nodes.values_mut() {
            if node.disruption_expired(now) {
                debug!(node = %node.id, now, "node disruption expired");
                node.clear_disruption();
                restored += 1;
            }
        }
        for edge in self.edges.values_mut() {
            if edge.disruption_expired(now) {
                debug!(edge = %edge.id, now, "edge disruption expired");
                edge.clear_disruption();
                restored += 1;
            }
        }
        if restored > 0 {
            self.recompute_in_transit_etas();
        }
        restored
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Replaces the route of every in-transit shipment between `origin`
    /// and `destination`, recomputing its ETA.
    ///
    /// The whole route is validated first: if any edge id is unregistered
    /// the call fails with [`NetworkError::InvalidRoute`] and no shipment
    /// is touched. Returns the number of shipments rerouted.
    pub fn apply_rerouting(
        &mut self,
        origin: &NodeId,
        destination: &NodeId,
        new_route: &[EdgeId],
    ) -> Result<usize, NetworkError> {
        if let Some(missing) = new_route.iter().find(|id| !self.edges.contains_key(*id)) {
            warn!(edge = %missing, "rejecting reroute with unregistered edge");
            return Err(NetworkError::InvalidRoute {
                edge: missing.clone(),
            });
        }

        let etas: Vec<(ShipmentId, f64)> = self
            .shipments
            .values()
            .filter(|s| s.is_in_transit() && s.origin == *origin && s.destination == *destination)
            .map(|s| (s.id, self.route_eta(new_route, s.start_time)))
            .collect();

        for (id, eta) in &etas {
            if let Some(shipment) = self.shipments.get_mut(id) {
                shipment.route = new_route.to_vec();
                shipment.estimated_arrival = *eta;
            }
        }
        info!(origin = %origin, destination = %destination, rerouted = etas.len(), "rerouting applied");
        Ok(etas.len())
    }

    /// Re-origins every still-planned shipment of `original` to
    /// `alternate`, recomputing its direct route and ETA.
    ///
    /// Fails with [`NetworkError::UnknownEntity`] if the alternate does
    /// not exist and [`NetworkError::NotAFactory`] if it is not a factory.
    /// Returns the number of shipments reassigned.
    pub fn activate_alternate_supplier(
        &mut self,
        original: &NodeId,
        alternate: &NodeId,
    ) -> Result<usize, NetworkError> {
        let alternate_node = self
            .nodes
            .get(alternate)
            .ok_or_else(|| NetworkError::UnknownEntity {
                id: alternate.to_string(),
            })?;
        if alternate_node.kind != NodeKind::Factory {
            warn!(node = %alternate, kind = ?alternate_node.kind, "alternate supplier is not a factory");
            return Err(NetworkError::NotAFactory {
                id: alternate.clone(),
            });
        }

        let updates: Vec<(ShipmentId, Vec<EdgeId>, f64)> = self
            .shipments
            .values()
            .filter(|s| s.status == ShipmentStatus::Planned && s.origin == *original)
            .map(|s| {
                let route = vec![EdgeId::between(alternate, &s.destination)];
                let eta = self.route_eta(&route, s.start_time);
                (s.id, route, eta)
            })
            .collect();

        for (id, route, eta) in &updates {
            if let Some(shipment) = self.shipments.get_mut(id) {
                shipment.origin = alternate.clone();
                shipment.route = route.clone();
                shipment.estimated_arrival = *eta;
            }
        }
        info!(original = %original, alternate = %alternate, reassigned = updates.len(), "alternate supplier activated");
        Ok(updates.len())
    }

    // ------------------------------------------------------------------
    // Engine-side mutation
    // ------------------------------------------------------------------

    /// Records a shipment's committed position. Engine use only; position
    /// is a record of traversal progress, never a projection.
    pub fn set_shipment_position(&mut self, id: &ShipmentId, position: GeoPoint) {
        if let Some(shipment) = self.shipments.get_mut(id) {
            shipment.current_position = position;
        }
    }

    /// Marks a shipment delivered at its final position.
    pub fn mark_delivered(&mut self, id: &ShipmentId, position: GeoPoint) {
        if let Some(shipment) = self.shipments.get_mut(id) {
            shipment.current_position = position;
            shipment.status = ShipmentStatus::Delivered;
            debug!(shipment = %id, "shipment delivered");
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn shipment(&self, id: &ShipmentId) -> Option<&Shipment> {
        self.shipments.get(id)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn iter_shipments(&self) -> impl Iterator<Item = &Shipment> {
        self.shipments.values()
    }

    /// Read-only node projections in the external wire shape.
    pub fn node_views(&self) -> Vec<NodeView> {
        self.nodes.values().map(NodeView::from).collect()
    }

    /// Read-only edge projections in the external wire shape.
    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.edges.values().map(EdgeView::from).collect()
    }

    /// Read-only projections of every in-transit shipment.
    pub fn in_transit_shipment_views(&self) -> Vec<ShipmentView> {
        self.shipments
            .values()
            .filter(|s| s.is_in_transit())
            .map(ShipmentView::from)
            .collect()
    }

    /// Network-wide metrics over the current state.
    pub fn metrics(&self) -> NetworkMetrics {
        let total_delay = self
            .shipments
            .values()
            .map(|s| s.estimated_arrival - s.start_time)
            .sum();
        let total_cost = self
            .shipments
            .values()
            .map(|s| self.route_cost(&s.route))
            .sum();
        NetworkMetrics {
            total_delay,
            total_cost,
            active_shipments: self.shipments.values().filter(|s| s.is_in_transit()).count(),
            disrupted_nodes: self
                .nodes
                .values()
                .filter(|n| n.status == OperationalStatus::Disrupted)
                .count(),
            disrupted_edges: self
                .edges
                .values()
                .filter(|e| e.status == OperationalStatus::Disrupted)
                .count(),
        }
    }

    /// Impact snapshot for the currently injected disruptions, sourced
    /// from the same metrics pass as [`SupplyChainNetwork::metrics`].
    pub fn disruption_impact(&self) -> DisruptionImpact {
        let metrics = self.metrics();
        DisruptionImpact {
            affected_shipments: self.shipments.values().filter(|s| !s.is_delivered()).count(),
            delay_impact: metrics.total_delay,
            cost_impact: metrics.total_cost,
        }
    }

    /// Total `base_time + current_delay` along `route`, from `start_time`.
    pub fn route_eta(&self, route: &[EdgeId], start_time: f64) -> f64 {
        start_time
            + route
                .iter()
                .filter_map(|id| self.edges.get(id))
                .map(Edge::travel_time)
                .sum::<f64>()
    }

    /// Total base cost along `route`.
    pub fn route_cost(&self, route: &[EdgeId]) -> f64 {
        route
            .iter()
            .filter_map(|id| self.edges.get(id))
            .map(|e| e.base_cost)
            .sum()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn direct_route(&self, origin: &NodeId, destination: &NodeId) -> Result<Vec<EdgeId>, NetworkError> {
        let edge_id = EdgeId::between(origin, destination);
        if self.edges.contains_key(&edge_id) {
            Ok(vec![edge_id])
        } else {
            Err(NetworkError::NoRoute {
                origin: origin.clone(),
                destination: destination.clone(),
            })
        }
    }

    /// Full ETA recalculation for every in-transit shipment.
    fn recompute_in_transit_etas(&mut self) {
        let etas: Vec<(ShipmentId, f64)> = self
            .shipments
            .values()
            .filter(|s| s.is_in_transit())
            .map(|s| (s.id, self.route_eta(&s.route, s.start_time)))
            .collect();
        for (id, eta) in etas {
            if let Some(shipment) = self.shipments.get_mut(&id) {
                shipment.estimated_arrival = eta;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
