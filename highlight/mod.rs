/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Non-destructive visual overlays: search highlight and hover dimming.
//!
//! The overlay holds per-node opacity/label flags and per-edge stroke
//! opacity. It is mutated in O(view size) and never touches the layout
//! session; positions are owned elsewhere. Hover dimming and search
//! highlighting both funnel through here so reset semantics stay in one
//! place.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::model::{EdgeKey, GraphModel, NodeKey};
use crate::view::ViewFrame;

/// Opacity applied to nodes outside the highlight set.
pub const HIGHLIGHT_DIM: f32 = 0.25;

/// Opacity applied to nodes outside the hover adjacency set.
pub const HOVER_DIM: f32 = 0.45;

/// Stroke opacity for edges not touching a highlighted node.
pub const EDGE_DIM: f32 = 0.2;

/// Per-node visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub opacity: f32,
    pub label_visible: bool,
}

/// Per-edge visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVisual {
    pub stroke_opacity: f32,
}

/// The full overlay for the current frame.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub nodes: HashMap<NodeKey, NodeVisual>,
    pub edges: HashMap<EdgeKey, EdgeVisual>,
}

impl OverlayState {
    /// Everything opaque; labels follow the global toggle.
    pub fn reset(&mut self, frame: &ViewFrame, show_labels: bool) {
        self.nodes.clear();
        self.edges.clear();
        for key in &frame.nodes {
            self.nodes.insert(
                *key,
                NodeVisual {
                    opacity: 1.0,
                    label_visible: show_labels,
                },
            );
        }
        for link in &frame.links {
            self.edges.insert(
                link.edge,
                EdgeVisual {
                    stroke_opacity: 1.0,
                },
            );
        }
    }

    pub fn node(&self, key: NodeKey) -> NodeVisual {
        self.nodes.get(&key).copied().unwrap_or(NodeVisual {
            opacity: 1.0,
            label_visible: false,
        })
    }

    pub fn edge(&self, key: EdgeKey) -> EdgeVisual {
        self.edges.get(&key).copied().unwrap_or(EdgeVisual {
            stroke_opacity: 1.0,
        })
    }
}

/// Apply an externally supplied highlight set.
///
/// An empty set, or a set with zero matches in the current view, is a full
/// reset: it must never produce an "everything dimmed" state.
pub fn apply_highlight(
    highlight: &HashSet<Uuid>,
    model: &GraphModel,
    frame: &ViewFrame,
    overlay: &mut OverlayState,
    show_labels: bool,
) {
    let matched: HashSet<NodeKey> = frame
        .nodes
        .iter()
        .copied()
        .filter(|key| {
            model
                .get_node(*key)
                .is_some_and(|node| highlight.contains(&node.id))
        })
        .collect();

    if matched.is_empty() {
        overlay.reset(frame, show_labels);
        return;
    }

    for key in &frame.nodes {
        let hit = matched.contains(key);
        overlay.nodes.insert(
            *key,
            NodeVisual {
                opacity: if hit { 1.0 } else { HIGHLIGHT_DIM },
                label_visible: hit || show_labels,
            },
        );
    }
    for link in &frame.links {
        let touches = matched.contains(&link.from) || matched.contains(&link.to);
        overlay.edges.insert(
            link.edge,
            EdgeVisual {
                stroke_opacity: if touches { 1.0 } else { EDGE_DIM },
            },
        );
    }
}

/// Dim everything outside the hovered node's adjacency set.
///
/// When global labels are off, labels for the adjacency set are revealed so
/// the hovered neighborhood stays readable.
pub fn apply_hover_dim(
    hovered: NodeKey,
    frame: &ViewFrame,
    overlay: &mut OverlayState,
    show_labels: bool,
) {
    let adjacency = frame.adjacency_set(hovered);

    for key in &frame.nodes {
        let near = adjacency.contains(key);
        overlay.nodes.insert(
            *key,
            NodeVisual {
                opacity: if near { 1.0 } else { HOVER_DIM },
                label_visible: near || show_labels,
            },
        );
    }
    for link in &frame.links {
        let attached = link.from == hovered || link.to == hovered;
        overlay.edges.insert(
            link.edge,
            EdgeVisual {
                stroke_opacity: if attached { 1.0 } else { EDGE_DIM },
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::{GraphSnapshot, WireConnection, WireConnectionType, WireNode};
    use crate::view::{ViewState, compute_view};

    fn fixture() -> (GraphModel, ViewFrame, Vec<Uuid>) {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let snapshot = GraphSnapshot {
            nodes: ids
                .iter()
                .enumerate()
                .map(|(i, id)| WireNode {
                    id: *id,
                    title: format!("note-{i}"),
                    content_preview: String::new(),
                    created_at: String::new(),
                    word_count: 5,
                })
                .collect(),
            connections: vec![
                WireConnection {
                    source_id: ids[0],
                    target_id: ids[1],
                    similarity: 0.9,
                    connection_type: WireConnectionType::Similarity,
                },
                WireConnection {
                    source_id: ids[2],
                    target_id: ids[3],
                    similarity: 0.8,
                    connection_type: WireConnectionType::Manual,
                },
            ],
            total_nodes: 4,
        };
        let model = GraphModel::from_snapshot(&snapshot);
        let frame = compute_view(&model, &ViewState::new(1));
        (model, frame, ids)
    }

    fn all_opaque(overlay: &OverlayState) -> bool {
        overlay.nodes.values().all(|v| v.opacity == 1.0)
            && overlay.edges.values().all(|v| v.stroke_opacity == 1.0)
    }

    #[test]
    fn test_empty_highlight_is_full_reset() {
        let (model, frame, ids) = fixture();
        let mut overlay = OverlayState::default();

        let mut highlight = HashSet::new();
        highlight.insert(ids[0]);
        apply_highlight(&highlight, &model, &frame, &mut overlay, true);
        assert!(!all_opaque(&overlay));

        apply_highlight(&HashSet::new(), &model, &frame, &mut overlay, true);
        assert!(all_opaque(&overlay));
        assert!(overlay.nodes.values().all(|v| v.label_visible));
    }

    #[test]
    fn test_no_match_in_view_equals_reset() {
        let (model, frame, _) = fixture();
        let mut reference = OverlayState::default();
        reference.reset(&frame, false);

        let mut overlay = OverlayState::default();
        let mut highlight = HashSet::new();
        highlight.insert(Uuid::new_v4());
        apply_highlight(&highlight, &model, &frame, &mut overlay, false);

        assert_eq!(overlay.nodes, reference.nodes);
        assert_eq!(overlay.edges, reference.edges);
    }

    #[test]
    fn test_matched_nodes_opaque_others_dimmed() {
        let (model, frame, ids) = fixture();
        let mut overlay = OverlayState::default();
        let mut highlight = HashSet::new();
        highlight.insert(ids[0]);
        apply_highlight(&highlight, &model, &frame, &mut overlay, true);

        let matched_key = model.get_node_key_by_id(ids[0]).unwrap();
        let other_key = model.get_node_key_by_id(ids[2]).unwrap();
        assert_eq!(overlay.node(matched_key).opacity, 1.0);
        assert_eq!(overlay.node(other_key).opacity, HIGHLIGHT_DIM);
    }

    #[test]
    fn test_edges_touching_match_keep_full_stroke() {
        let (model, frame, ids) = fixture();
        let mut overlay = OverlayState::default();
        let mut highlight = HashSet::new();
        highlight.insert(ids[0]);
        apply_highlight(&highlight, &model, &frame, &mut overlay, true);

        // (0,1) touches the match, (2,3) does not.
        for link in &frame.links {
            let from_id = model.get_node(link.from).unwrap().id;
            let expected = if from_id == ids[0] || from_id == ids[1] {
                1.0
            } else {
                EDGE_DIM
            };
            assert_eq!(overlay.edge(link.edge).stroke_opacity, expected);
        }
    }

    #[test]
    fn test_hover_dims_non_adjacent() {
        let (model, frame, ids) = fixture();
        let mut overlay = OverlayState::default();
        overlay.reset(&frame, false);

        let hovered = model.get_node_key_by_id(ids[0]).unwrap();
        apply_hover_dim(hovered, &frame, &mut overlay, false);

        let neighbor = model.get_node_key_by_id(ids[1]).unwrap();
        let far = model.get_node_key_by_id(ids[3]).unwrap();
        assert_eq!(overlay.node(hovered).opacity, 1.0);
        assert_eq!(overlay.node(neighbor).opacity, 1.0);
        assert_eq!(overlay.node(far).opacity, HOVER_DIM);

        // Labels revealed for the adjacency set even with global labels off.
        assert!(overlay.node(hovered).label_visible);
        assert!(overlay.node(neighbor).label_visible);
        assert!(!overlay.node(far).label_visible);
    }

    #[test]
    fn test_hover_then_reset_restores_state() {
        let (model, frame, ids) = fixture();
        let mut overlay = OverlayState::default();
        overlay.reset(&frame, true);
        let snapshot_before = overlay.nodes.clone();

        let hovered = model.get_node_key_by_id(ids[2]).unwrap();
        apply_hover_dim(hovered, &frame, &mut overlay, true);
        overlay.reset(&frame, true);

        assert_eq!(overlay.nodes, snapshot_before);
    }
}
