//! Network seeding from JSON files.
//!
//! The engine requires no on-disk format; a seed is just a convenient way
//! to hand an initial set of nodes and edges to a fresh network. Seeds
//! apply through the normal validated registration operations, so a
//! malformed seed (duplicate ids, dangling endpoints) fails the same way
//! direct calls would.

use std::fs;
use std::path::Path;

use nextport_network::SupplyChainNetwork;
use nextport_types::{GeoPoint, NetworkError, NodeId, NodeKind, TransportMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SeedError;

/// One seeded facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub location: GeoPoint,
    pub capacity: f64,
}

/// One seeded transport link. The edge id is derived from the endpoints,
/// so an `id` field in the file is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "transport_type")]
    pub mode: TransportMode,
    pub base_time: f64,
    pub base_cost: f64,
}

/// An initial network: nodes first, then edges between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSeed {
    pub nodes: Vec<SeedNode>,
    pub edges: Vec<SeedEdge>,
}

impl NetworkSeed {
    /// The built-in demonstration network: three factories, two
    /// warehouses, five transport links.
    #[must_use]
    pub fn default_demo() -> Self {
        Self {
            nodes: vec![
                SeedNode {
                    id: "F1".into(),
                    kind: NodeKind::Factory,
                    location: GeoPoint::new(40.7128, -74.0060),
                    capacity: 1000.0,
                },
                SeedNode {
                    id: "F2".into(),
                    kind: NodeKind::Factory,
                    location: GeoPoint::new(34.0522, -118.2437),
                    capacity: 1500.0,
                },
                SeedNode {
                    id: "F3".into(),
                    kind: NodeKind::Factory,
                    location: GeoPoint::new(41.8781, -87.6298),
                    capacity: 1200.0,
                },
                SeedNode {
                    id: "W1".into(),
                    kind: NodeKind::Warehouse,
                    location: GeoPoint::new(39.9526, -75.1652),
                    capacity: 2000.0,
                },
                SeedNode {
                    id: "W2".into(),
                    kind: NodeKind::Warehouse,
                    location: GeoPoint::new(29.7604, -95.3698),
                    capacity: 2500.0,
                },
            ],
            edges: vec![
                SeedEdge {
                    source: "F1".into(),
                    target: "W1".into(),
                    mode: TransportMode::Road,
                    base_time: 24.0,
                    base_cost: 1000.0,
                },
                SeedEdge {
                    source: "F2".into(),
                    target: "W2".into(),
                    mode: TransportMode::Road,
                    base_time: 36.0,
                    base_cost: 1500.0,
                },
                SeedEdge {
                    source: "F3".into(),
                    target: "W1".into(),
                    mode: TransportMode::Road,
                    base_time: 18.0,
                    base_cost: 800.0,
                },
                SeedEdge {
                    source: "F1".into(),
                    target: "W2".into(),
                    mode: TransportMode::Road,
                    base_time: 48.0,
                    base_cost: 2000.0,
                },
                SeedEdge {
                    source: "F2".into(),
                    target: "W1".into(),
                    mode: TransportMode::Air,
                    base_time: 6.0,
                    base_cost: 5000.0,
                },
            ],
        }
    }

    /// Loads a seed from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let seed = serde_json::from_str(&contents).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "seed file loaded");
        Ok(seed)
    }

    /// Loads a seed from a JSON file, falling back to the built-in demo
    /// network when the file does not exist. A file that exists but does
    /// not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_json_file(path)
        } else {
            info!(path = %path.display(), "seed file missing, using built-in demo network");
            Ok(Self::default_demo())
        }
    }

    /// Applies the seed to a network through the validated registration
    /// operations.
    pub fn apply(&self, network: &mut SupplyChainNetwork) -> Result<(), NetworkError> {
        for node in &self.nodes {
            network.add_node(
                NodeId::from(node.id.as_str()),
                node.kind,
                node.location,
                node.capacity,
            )?;
        }
        for edge in &self.edges {
            network.add_edge(
                NodeId::from(edge.source.as_str()),
                NodeId::from(edge.target.as_str()),
                edge.mode,
                edge.base_time,
                edge.base_cost,
            )?;
        }
        Ok(())
    }
}
