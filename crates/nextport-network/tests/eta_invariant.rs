//! Property tests for the ETA derivation invariant.
//!
//! For every shipment, `estimated_arrival` must equal `start_time` plus
//! the sum of `base_time + current_delay` over its current route, no
//! matter which interleaving of disruptions, expiries, and reroutes has
//! been applied.

use nextport_network::SupplyChainNetwork;
use nextport_types::{EdgeId, GeoPoint, NodeId, NodeKind, TransportMode};
use proptest::prelude::*;

/// Operations the property explores. Indexes select among the fixture's
/// edges so every operation is valid by construction.
#[derive(Debug, Clone)]
enum Op {
    DisruptEdge { edge: usize, end_time: f64, severity: f64 },
    DisruptNode { node: usize, end_time: f64 },
    Reconcile { now: f64 },
    Reroute { edge: usize },
}

const EDGES: [&str; 3] = ["F1-W1", "F2-W1", "F3-W1"];
const NODES: [&str; 4] = ["F1", "F2", "F3", "W1"];

fn fixture() -> SupplyChainNetwork {
    let mut network = SupplyChainNetwork::new();
    network
        .add_node(NodeId::from("F1"), NodeKind::Factory, GeoPoint::new(40.7, -74.0), 1000.0)
        .unwrap();
    network
        .add_node(NodeId::from("F2"), NodeKind::Factory, GeoPoint::new(34.1, -118.2), 1500.0)
        .unwrap();
    network
        .add_node(NodeId::from("F3"), NodeKind::Factory, GeoPoint::new(41.9, -87.6), 1200.0)
        .unwrap();
    network
        .add_node(NodeId::from("W1"), NodeKind::Warehouse, GeoPoint::new(39.9, -75.2), 2000.0)
        .unwrap();
    network
        .add_edge(NodeId::from("F1"), NodeId::from("W1"), TransportMode::Road, 24.0, 1000.0)
        .unwrap();
    network
        .add_edge(NodeId::from("F2"), NodeId::from("W1"), TransportMode::Air, 6.0, 5000.0)
        .unwrap();
    network
        .add_edge(NodeId::from("F3"), NodeId::from("W1"), TransportMode::Sea, 18.0, 800.0)
        .unwrap();
    network
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..EDGES.len(), 1.0f64..200.0, 0.0f64..3.0)
            .prop_map(|(edge, end_time, severity)| Op::DisruptEdge { edge, end_time, severity }),
        (0..NODES.len(), 1.0f64..200.0)
            .prop_map(|(node, end_time)| Op::DisruptNode { node, end_time }),
        (0.0f64..250.0).prop_map(|now| Op::Reconcile { now }),
        (0..EDGES.len()).prop_map(|edge| Op::Reroute { edge }),
    ]
}

fn assert_eta_invariant(network: &SupplyChainNetwork) {
    for shipment in network.iter_shipments() {
        if !shipment.is_in_transit() {
            continue;
        }
        let expected = network.route_eta(&shipment.route, shipment.start_time);
        let actual = shipment.estimated_arrival;
        assert!(
            (expected - actual).abs() < 1e-9,
            "shipment {} eta {actual} diverged from derived {expected}",
            shipment.id
        );
    }
}

proptest! {
    #[test]
    fn eta_stays_derived_under_arbitrary_interleavings(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let mut network = fixture();
        network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 100.0, 0.0)
            .unwrap();
        network
            .create_shipment(NodeId::from("F2"), NodeId::from("W1"), 75.0, 5.0)
            .unwrap();
        network
            .create_shipment(NodeId::from("F3"), NodeId::from("W1"), 50.0, 10.0)
            .unwrap();

        for op in ops {
            match op {
                Op::DisruptEdge { edge, end_time, severity } => {
                    network
                        .disrupt_edge(&EdgeId::from(EDGES[edge]), end_time, severity)
                        .unwrap();
                }
                Op::DisruptNode { node, end_time } => {
                    network
                        .disrupt_node(&NodeId::from(NODES[node]), end_time, 1.0)
                        .unwrap();
                }
                Op::Reconcile { now } => {
                    network.reconcile_disruptions(now);
                }
                Op::Reroute { edge } => {
                    network
                        .apply_rerouting(
                            &NodeId::from("F1"),
                            &NodeId::from("W1"),
                            &[EdgeId::from(EDGES[edge])],
                        )
                        .unwrap();
                }
            }
            assert_eta_invariant(&network);
        }
    }

    #[test]
    fn rejected_reroutes_never_mutate(
        bogus in "[A-Z]{2}-[A-Z]{2}",
    ) {
        let mut network = fixture();
        prop_assume!(!EDGES.contains(&bogus.as_str()));

        let id = network
            .create_shipment(NodeId::from("F1"), NodeId::from("W1"), 100.0, 0.0)
            .unwrap();
        let before = network.shipment(&id).unwrap().clone();

        let result = network.apply_rerouting(
            &NodeId::from("F1"),
            &NodeId::from("W1"),
            &[EdgeId::from(bogus.as_str())],
        );

        prop_assert!(result.is_err());
        prop_assert_eq!(network.shipment(&id).unwrap(), &before);
    }
}
