/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the note-graph canvas.
//!
//! Core structures:
//! - `GraphModel`: immutable snapshot container backed by petgraph::StableGraph
//! - `Node`: note metadata (title, preview, word count)
//! - `Connection`: edge semantics (similarity score + connection kind)
//!
//! Boundary: the model is read-only after ingestion. Construction happens only
//! through `GraphModel::from_snapshot`; there is no public mutation path.
//! Simulation position and velocity live in the layout session, not here.

use petgraph::Directed;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::HashMap;
use uuid::Uuid;

use crate::fetch::types::{GraphSnapshot, WireConnectionType};

/// Stable node handle (petgraph NodeIndex — survives other deletions)
pub type NodeKey = NodeIndex;

/// Stable edge handle (petgraph EdgeIndex)
pub type EdgeKey = EdgeIndex;

/// How a connection between two notes came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Inferred by the embedding pipeline upstream; carries a meaningful score.
    Similarity,

    /// Explicitly linked by the user; score is nominal.
    Manual,
}

/// A note node in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable note identity.
    pub id: Uuid,

    /// Note title (may be empty; renderer falls back to the id).
    pub title: String,

    /// First lines of the note body, for tooltips.
    pub preview: String,

    /// Creation timestamp as received (RFC 3339); not parsed here.
    pub created_at: String,

    /// Word count of the full note; drives node radius.
    pub word_count: u32,
}

/// Connection payload: similarity score + kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Similarity in [0, 1]; clamped at ingestion.
    pub similarity: f32,

    pub kind: ConnectionKind,
}

/// Read-only view of an edge (built from petgraph edge references).
#[derive(Debug, Clone, Copy)]
pub struct EdgeView {
    pub key: EdgeKey,
    pub from: NodeKey,
    pub to: NodeKey,
    pub similarity: f32,
    pub kind: ConnectionKind,
}

/// Immutable snapshot of the note graph, replaced wholesale on refresh.
#[derive(Clone, Default)]
pub struct GraphModel {
    inner: StableGraph<Node, Connection, Directed>,

    /// Stable UUID to node mapping.
    id_to_node: HashMap<Uuid, NodeKey>,

    /// Total node count reported by the source (may exceed what was sent).
    total_nodes: usize,
}

impl GraphModel {
    /// Build a model from a wire snapshot.
    ///
    /// Edges referencing unknown node ids are stale, not erroneous: they are
    /// dropped silently and reported once via `log::warn!`. Duplicate node ids
    /// keep the first occurrence. Self-loops are dropped with the stale edges.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut model = GraphModel {
            inner: StableGraph::new(),
            id_to_node: HashMap::with_capacity(snapshot.nodes.len()),
            total_nodes: snapshot.total_nodes,
        };

        let mut duplicate_nodes = 0usize;
        for wire in &snapshot.nodes {
            if model.id_to_node.contains_key(&wire.id) {
                duplicate_nodes += 1;
                continue;
            }
            let key = model.inner.add_node(Node {
                id: wire.id,
                title: wire.title.clone(),
                preview: wire.content_preview.clone(),
                created_at: wire.created_at.clone(),
                word_count: wire.word_count,
            });
            model.id_to_node.insert(wire.id, key);
        }

        let mut dropped_edges = 0usize;
        for wire in &snapshot.connections {
            let from = model.id_to_node.get(&wire.source_id).copied();
            let to = model.id_to_node.get(&wire.target_id).copied();
            let (Some(from), Some(to)) = (from, to) else {
                dropped_edges += 1;
                continue;
            };
            if from == to {
                dropped_edges += 1;
                continue;
            }
            let kind = match wire.connection_type {
                WireConnectionType::Similarity => ConnectionKind::Similarity,
                WireConnectionType::Manual => ConnectionKind::Manual,
            };
            model.inner.add_edge(
                from,
                to,
                Connection {
                    similarity: wire.similarity.clamp(0.0, 1.0),
                    kind,
                },
            );
        }

        if dropped_edges > 0 || duplicate_nodes > 0 {
            log::warn!(
                "snapshot ingestion dropped {dropped_edges} stale edge(s) and \
                 {duplicate_nodes} duplicate node(s)"
            );
        }

        model
    }

    /// Get a node by key.
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.inner.node_weight(key)
    }

    /// Get a node and its key by UUID.
    pub fn get_node_by_id(&self, id: Uuid) -> Option<(NodeKey, &Node)> {
        let key = *self.id_to_node.get(&id)?;
        Some((key, self.inner.node_weight(key)?))
    }

    /// Get node key by UUID.
    pub fn get_node_key_by_id(&self, id: Uuid) -> Option<NodeKey> {
        self.id_to_node.get(&id).copied()
    }

    /// Iterate over all nodes as (key, node) pairs, in ingestion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.inner
            .node_indices()
            .map(move |idx| (idx, &self.inner[idx]))
    }

    /// Iterate over all edges as EdgeView, in ingestion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.inner.edge_references().map(|e| EdgeView {
            key: e.id(),
            from: e.source(),
            to: e.target(),
            similarity: e.weight().similarity,
            kind: e.weight().kind,
        })
    }

    /// Get a connection payload by edge key.
    pub fn get_edge(&self, key: EdgeKey) -> Option<&Connection> {
        self.inner.edge_weight(key)
    }

    /// Iterate neighbor keys ignoring edge direction.
    ///
    /// Connections are semantically undirected; the stored direction only
    /// mirrors the wire order.
    pub fn neighbors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.inner.neighbors_undirected(key)
    }

    /// Undirected degree of a node.
    pub fn degree(&self, key: NodeKey) -> usize {
        self.inner.neighbors_undirected(key).count()
    }

    /// Count of nodes in the model.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count of edges in the model.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Total node count reported by the source.
    pub fn total_nodes(&self) -> usize {
        self.total_nodes
    }
}
