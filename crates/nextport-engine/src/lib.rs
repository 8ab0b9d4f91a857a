//! # nextport-engine: Discrete-event engine for Nextport
//!
//! The engine advances simulated time and drives one logical traversal
//! process per in-transit shipment. The original coroutine-per-shipment
//! model is reproduced with explicit process records (route index plus
//! next wake time) advanced by a single scheduler loop:
//!
//! - **`SimClock`**: monotone scalar time, advanced only by [`EventEngine::run`]
//! - **Wake heap**: min-heap of (wake time, sequence) entries with lazy
//!   invalidation; stale entries are skipped on pop
//! - **Sampling**: a segment's travel time is read once, when traversal of
//!   that segment begins. A disruption injected mid-segment changes ETA
//!   projections on the network side but never rewrites committed progress.
//!
//! The engine holds no persisted state: process records exist only while
//! their shipment is in transit and are discarded on delivery.

#![cfg_attr(test, allow(clippy::float_cmp))]

mod clock;

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use nextport_network::SupplyChainNetwork;
use nextport_types::{NetworkError, ShipmentId};
use tracing::{debug, trace};

pub use clock::SimClock;

// ============================================================================
// Traversal Processes
// ============================================================================

/// Scheduler record for one in-transit shipment.
///
/// `route_index` is the segment currently being traversed; `next_wake` is
/// the simulated time at which that segment completes. `seq` identifies
/// the heap entry for the latest schedule, so superseded entries can be
/// recognized and dropped on pop.
#[derive(Debug, Clone)]
struct TraversalProcess {
    route_index: usize,
    next_wake: f64,
    seq: u64,
}

/// Heap entry ordering: earliest wake first, then schedule order.
///
/// Ordering among same-wake processes follows scheduling sequence, which
/// keeps runs reproducible without promising any cross-shipment ordering
/// beyond "everything ready by the target time has advanced".
#[derive(Debug, Clone)]
struct WakeEntry {
    wake: f64,
    seq: u64,
    shipment: ShipmentId,
}

impl PartialEq for WakeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WakeEntry {}

impl Ord for WakeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wake
            .total_cmp(&other.wake)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for WakeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Event Engine
// ============================================================================

/// Summary of one [`EventEngine::run`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Simulated time after the run.
    pub current_time: f64,
    /// Route segments completed during the run.
    pub segments_advanced: usize,
    /// Shipments that reached their destination during the run.
    pub delivered: usize,
}

/// Drives shipment traversal processes against a [`SupplyChainNetwork`].
///
/// The engine and the network share one logical thread; all mutation runs
/// sequentially inside [`EventEngine::run`]. There is no cancellation
/// primitive: a process leaves the engine only by completing its route.
#[derive(Debug, Default)]
pub struct EventEngine {
    clock: SimClock,
    processes: HashMap<ShipmentId, TraversalProcess>,
    wake_heap: BinaryHeap<Reverse<WakeEntry>>,
    next_seq: u64,
}

impl EventEngine {
    /// Creates an engine at simulated time zero with no active processes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn current_time(&self) -> f64 {
        self.clock.now()
    }

    /// Number of shipments with an active traversal process.
    pub fn active_processes(&self) -> usize {
        self.processes.len()
    }

    /// Advances the simulation by `steps` time units.
    ///
    /// 1. Starts a process for every in-transit shipment lacking one,
    ///    sampling its first segment's travel time now. A route edge
    ///    missing from the network is a precondition violation and fails
    ///    with [`NetworkError::InvalidRoute`] before anything mutates.
    /// 2. Repeatedly advances the process with the earliest wake time not
    ///    past the target, updating positions and delivering shipments.
    /// 3. Advances the clock to the target.
    /// 4. Reconciles expired node/edge disruptions.
    /// 5. Prunes processes for shipments no longer in transit.
    pub fn run(
        &mut self,
        network: &mut SupplyChainNetwork,
        steps: f64,
    ) -> Result<RunSummary, NetworkError> {
        debug_assert!(steps >= 0.0, "cannot run for negative steps");
        let target = self.clock.now() + steps;

        self.spawn_pending(network)?;

        let mut segments_advanced = 0;
        let mut delivered = 0;
        while let Some(Reverse(entry)) = self.wake_heap.peek().cloned() {
            if entry.wake > target {
                break;
            }
            self.wake_heap.pop();

            let Some(process) = self.processes.get(&entry.shipment) else {
                continue; // Process already completed; stale entry.
            };
            if process.seq != entry.seq {
                continue; // Superseded by a newer schedule.
            }

            segments_advanced += 1;
            if self.complete_segment(network, entry.shipment)? {
                delivered += 1;
            }
        }

        self.clock.advance_to(target);
        network.reconcile_disruptions(target);
        self.prune(network);

        let summary = RunSummary {
            current_time: target,
            segments_advanced,
            delivered,
        };
        debug!(
            current_time = summary.current_time,
            segments = summary.segments_advanced,
            delivered = summary.delivered,
            "run complete"
        );
        Ok(summary)
    }

    /// Starts traversal processes for in-transit shipments that lack one.
    fn spawn_pending(&mut self, network: &SupplyChainNetwork) -> Result<(), NetworkError> {
        let mut spawns = Vec::new();
        for shipment in network.iter_shipments() {
            if !shipment.is_in_transit() || self.processes.contains_key(&shipment.id) {
                continue;
            }
            let Some(first) = shipment.route.first() else {
                return Err(NetworkError::NoRoute {
                    origin: shipment.origin.clone(),
                    destination: shipment.destination.clone(),
                });
            };
            let edge = network
                .edge(first)
                .ok_or_else(|| NetworkError::InvalidRoute { edge: first.clone() })?;
            spawns.push((shipment.id, edge.travel_time()));
        }

        for (id, travel_time) in spawns {
            let wake = self.clock.now() + travel_time;
            trace!(shipment = %id, wake, "starting traversal process");
            self.schedule(id, 0, wake);
        }
        Ok(())
    }

    /// Records (or reschedules) a process and pushes its wake entry.
    fn schedule(&mut self, shipment: ShipmentId, route_index: usize, wake: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.processes.insert(
            shipment,
            TraversalProcess {
                route_index,
                next_wake: wake,
                seq,
            },
        );
        self.wake_heap.push(Reverse(WakeEntry { wake, seq, shipment }));
    }

    /// Finishes the segment a process was traversing when its wake fired.
    ///
    /// The route is re-read from the network, so a reroute applied since
    /// the segment began takes effect here: the stored index is
    /// interpreted against the new route, clamped at its end. Returns
    /// `true` when the shipment was delivered.
    fn complete_segment(
        &mut self,
        network: &mut SupplyChainNetwork,
        shipment_id: ShipmentId,
    ) -> Result<bool, NetworkError> {
        let Some(shipment) = network.shipment(&shipment_id) else {
            self.processes.remove(&shipment_id);
            return Ok(false);
        };
        if !shipment.is_in_transit() {
            self.processes.remove(&shipment_id);
            return Ok(false);
        }

        let route = shipment.route.clone();
        let destination = shipment.destination.clone();
        let process = &self.processes[&shipment_id];
        let wake = process.next_wake;
        let next_index = process.route_index + 1;

        if next_index < route.len() {
            // Intermediate segment: move to the next edge's source node
            // and sample that edge's travel time as its traversal begins.
            let next_edge_id = &route[next_index];
            let next_edge = network
                .edge(next_edge_id)
                .ok_or_else(|| NetworkError::InvalidRoute {
                    edge: next_edge_id.clone(),
                })?;
            let position = network
                .node(&next_edge.source)
                .ok_or_else(|| NetworkError::UnknownNode {
                    id: next_edge.source.to_string(),
                })?
                .location;
            let travel_time = next_edge.travel_time();

            network.set_shipment_position(&shipment_id, position);
            self.schedule(shipment_id, next_index, wake + travel_time);
            trace!(shipment = %shipment_id, segment = next_index, wake = wake + travel_time, "segment started");
        } else {
            // Final segment (or the route shrank beneath the index): the
            // shipment arrives at its destination.
            let position = network
                .node(&destination)
                .ok_or_else(|| NetworkError::UnknownNode {
                    id: destination.to_string(),
                })?
                .location;
            network.mark_delivered(&shipment_id, position);
            self.processes.remove(&shipment_id);
            debug!(shipment = %shipment_id, time = wake, "shipment delivered");
            return Ok(true);
        }
        Ok(false)
    }

    /// Drops process handles for shipments that are no longer in transit.
    fn prune(&mut self, network: &SupplyChainNetwork) {
        self.processes
            .retain(|id, _| network.shipment(id).is_some_and(|s| s.is_in_transit()));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use nextport_types::{EdgeId, GeoPoint, NodeId, NodeKind, ShipmentStatus, TransportMode};

    use super::*;

    fn two_hop_network() -> SupplyChainNetwork {
        let mut network = SupplyChainNetwork::new();
        network
            .add_node(NodeId::from("F1"), NodeKind::Factory, GeoPoint::new(1.0, 1.0), 1000.0)
            .unwrap();
        network
            .add_node(NodeId::from("P1"), NodeKind::Port, GeoPoint::new(2.0, 2.0), 500.0)
            .unwrap();
        network
            .add_node(NodeId::from("W1"), NodeKind::Warehouse, GeoPoint::new(3.0, 3.0), 2000.0)
            .unwrap();
        network
            .add_edge(NodeId::from("F1"), NodeId::from("P1"), TransportMode::Road, 10.0, 300.0)
            .unwrap();
        network
            .add_edge(NodeId::from("P1"), NodeId::from("W1"), TransportMode::Sea, 20.0, 700.0)
            .unwrap();
        network
            .add_edge(NodeId::from("F1"), NodeId::from("W1"), TransportMode::Air, 5.0, 4000.0)
            .unwrap();
        network
    }

    #[test]
    fn run_advances_time_without_shipments() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();

        let summary = engine.run(&mut network, 15.0).unwrap();
        assert_eq!(summary.current_time, 15.0);
        assert_eq!(summary.segments_advanced, 0);
        assert_eq!(engine.current_time(), 15.0);
    }

    #[test]
    fn shipment_delivers_when_travel_time_elapses() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let id = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();

        // Direct edge F1-W1 takes 5 units.
        let summary = engine.run(&mut network, 6.0).unwrap();
        assert_eq!(summary.delivered, 1);

        let shipment = network.shipment(&id).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Delivered);
        assert_eq!(shipment.current_position.lat, 3.0);
        assert_eq!(engine.active_processes(), 0);
    }

    #[test]
    fn shipment_stays_in_transit_before_travel_time_elapses() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let id = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();

        engine.run(&mut network, 4.0).unwrap();
        assert_eq!(network.shipment(&id).unwrap().status, ShipmentStatus::InTransit);
        assert_eq!(engine.active_processes(), 1);
    }

    #[test]
    fn multi_segment_route_updates_position_at_each_boundary() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let id = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();
        network
            .apply_rerouting(
                &NodeId::from("F1"),
                &NodeId::from("W1"),
                &[EdgeId::from("F1-P1"), EdgeId::from("P1-W1")],
            )
            .unwrap();

        // First segment completes at t=10: position jumps to P1.
        engine.run(&mut network, 12.0).unwrap();
        let shipment = network.shipment(&id).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.current_position.lat, 2.0);

        // Second segment completes at t=30.
        let summary = engine.run(&mut network, 18.0).unwrap();
        assert_eq!(summary.delivered, 1);
        let shipment = network.shipment(&id).unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Delivered);
        assert_eq!(shipment.current_position.lat, 3.0);
    }

    #[test]
    fn travel_time_is_sampled_at_segment_start() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let id = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();

        // Process starts now: samples 5 units for F1-W1.
        engine.run(&mut network, 1.0).unwrap();

        // Mid-segment disruption doubles the edge; the committed segment
        // keeps its sampled duration, so delivery still lands at t=5.
        network.disrupt_edge(&EdgeId::from("F1-W1"), 100.0, 1.0).unwrap();
        let summary = engine.run(&mut network, 4.0).unwrap();

        assert_eq!(summary.delivered, 1);
        assert_eq!(network.shipment(&id).unwrap().status, ShipmentStatus::Delivered);
    }

    #[test]
    fn disruption_expiry_clears_after_clock_passes_end_time() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        network.disrupt_edge(&EdgeId::from("F1-W1"), 8.0, 0.5).unwrap();

        engine.run(&mut network, 5.0).unwrap();
        assert!(network.edge(&EdgeId::from("F1-W1")).unwrap().current_delay > 0.0);

        engine.run(&mut network, 5.0).unwrap();
        let edge = network.edge(&EdgeId::from("F1-W1")).unwrap();
        assert_eq!(edge.current_delay, 0.0);
        assert_eq!(edge.disruption_end_time, None);
    }

    #[test]
    fn planned_shipments_are_not_scheduled() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let id = network
            .create_planned_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();

        engine.run(&mut network, 50.0).unwrap();
        assert_eq!(network.shipment(&id).unwrap().status, ShipmentStatus::Planned);
        assert_eq!(engine.active_processes(), 0);
    }

    #[test]
    fn same_wake_processes_advance_in_schedule_order() {
        let mut network = two_hop_network();
        let mut engine = EventEngine::new();
        let first = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 10.0, 0.0)
            .unwrap();
        let second = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 20.0, 0.0)
            .unwrap();

        let summary = engine.run(&mut network, 5.0).unwrap();
        assert_eq!(summary.delivered, 2);
        assert_eq!(network.shipment(&first).unwrap().status, ShipmentStatus::Delivered);
        assert_eq!(network.shipment(&second).unwrap().status, ShipmentStatus::Delivered);
    }
}
