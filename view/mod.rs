/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Local-view computation: which nodes and edges actually render.
//!
//! `compute_view` is a pure function from (model, view state) to a
//! `ViewFrame`. An empty focus set means the global view; a non-empty focus
//! set means a breadth-first expansion bounded by `depth`, with collapsed
//! nodes suppressing expansion through them. Iteration order is kept stable
//! (sorted focus ids, FIFO queue, id-sorted neighbors) so recomputation never
//! reorders nodes gratuitously.

use std::collections::{BTreeSet, HashSet, VecDeque};
use uuid::Uuid;

use crate::model::{EdgeKey, GraphModel, NodeKey};

/// What the user is looking at; drives `compute_view`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Expanded node ids. Empty set = global view.
    pub focus: BTreeSet<Uuid>,

    /// Hop bound for the local BFS.
    pub depth: u32,

    /// Hide nodes with no rendered edge.
    pub hide_isolated: bool,

    /// Nodes BFS may visit but not expand through.
    pub collapsed: BTreeSet<Uuid>,
}

impl ViewState {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Whether the local (focus-expanded) view is active.
    pub fn is_local(&self) -> bool {
        !self.focus.is_empty()
    }

    /// Toggle a node in or out of the focus set. Returns true if now focused.
    pub fn toggle_focus(&mut self, id: Uuid) -> bool {
        if self.focus.remove(&id) {
            false
        } else {
            self.focus.insert(id);
            true
        }
    }
}

/// A rendered edge: stable edge key plus resolved endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLink {
    pub edge: EdgeKey,
    pub from: NodeKey,
    pub to: NodeKey,
}

/// Output of `compute_view`: ordered nodes plus the edges among them.
///
/// Equality is topological; the app compares frames to decide whether a
/// layout rebuild is needed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewFrame {
    pub nodes: Vec<NodeKey>,
    pub links: Vec<ViewLink>,
}

impl ViewFrame {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hovered node plus its direct neighbors within this frame.
    pub fn adjacency_set(&self, key: NodeKey) -> HashSet<NodeKey> {
        let mut set = HashSet::new();
        set.insert(key);
        for link in &self.links {
            if link.from == key {
                set.insert(link.to);
            } else if link.to == key {
                set.insert(link.from);
            }
        }
        set
    }
}

/// Derive the set of nodes/edges to render.
pub fn compute_view(model: &GraphModel, state: &ViewState) -> ViewFrame {
    let mut frame = if state.is_local() {
        local_frame(model, state)
    } else {
        global_frame(model)
    };

    if state.hide_isolated {
        let mut linked: HashSet<NodeKey> = HashSet::with_capacity(frame.nodes.len());
        for link in &frame.links {
            linked.insert(link.from);
            linked.insert(link.to);
        }
        frame.nodes.retain(|key| linked.contains(key));
    }

    frame
}

fn global_frame(model: &GraphModel) -> ViewFrame {
    let nodes: Vec<NodeKey> = model.nodes().map(|(key, _)| key).collect();
    let links = links_among(model, &nodes.iter().copied().collect());
    ViewFrame { nodes, links }
}

fn local_frame(model: &GraphModel, state: &ViewState) -> ViewFrame {
    // Focus keys resolve in sorted-id order; unknown ids are stale and skipped.
    let focus_keys: Vec<NodeKey> = state
        .focus
        .iter()
        .filter_map(|id| model.get_node_key_by_id(*id))
        .collect();

    let mut visited: HashSet<NodeKey> = focus_keys.iter().copied().collect();
    let mut order: Vec<NodeKey> = focus_keys.clone();
    let mut queue: VecDeque<(NodeKey, u32)> =
        focus_keys.iter().map(|key| (*key, 0u32)).collect();

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= state.depth {
            continue;
        }
        let suppressed = model
            .get_node(current)
            .is_some_and(|node| state.collapsed.contains(&node.id));

        let mut neighbors: Vec<NodeKey> = model.neighbors(current).collect();
        neighbors.sort_by_key(|key| model.get_node(*key).map(|n| n.id));
        neighbors.dedup();

        for neighbor in neighbors {
            // A collapsed node stays visible but only expands to focus members.
            if suppressed {
                let in_focus = model
                    .get_node(neighbor)
                    .is_some_and(|node| state.focus.contains(&node.id));
                if !in_focus {
                    continue;
                }
            }
            if visited.insert(neighbor) {
                order.push(neighbor);
                queue.push_back((neighbor, hops + 1));
            }
        }
    }

    let links = links_among(model, &visited);
    ViewFrame {
        nodes: order,
        links,
    }
}

fn links_among(model: &GraphModel, nodes: &HashSet<NodeKey>) -> Vec<ViewLink> {
    model
        .edges()
        .filter(|edge| nodes.contains(&edge.from) && nodes.contains(&edge.to))
        .map(|edge| ViewLink {
            edge: edge.key,
            from: edge.from,
            to: edge.to,
        })
        .collect()
}
