/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application state management for the note-graph canvas.
//!
//! `GraphCanvasApp` owns everything: the model, the view state, the layout
//! session, the visual overlay, the camera, and the fetch channel. It is the
//! single execution context all mutation interleaves through; actions are
//! applied before the physics tick within one frame, so a drag-start is
//! always visible to the next integration step.
//!
//! The host drives it through an explicit command interface (`refresh`,
//! `set_highlight`, `set_params`) and narrow change handlers
//! (`on_snapshot_changed`, `on_view_state_changed`, `on_params_changed`);
//! only a topology change rebuilds the layout session, and even then prior
//! positions seed the successor so nodes do not jump.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use euclid::default::Point2D;
use uuid::Uuid;

use crate::fetch::{FetchOutcome, SnapshotSource, spawn_fetch, types::GraphSnapshot};
use crate::highlight::{OverlayState, apply_highlight, apply_hover_dim};
use crate::input::{Camera, CanvasAction, InteractionController};
use crate::layout::{LayoutSession, PartialParams, SimulationParams};
use crate::model::GraphModel;
use crate::render::{draw_node_tooltip, paint_graph, sample_pointer};
use crate::view::{ViewFrame, ViewState, compute_view};

/// Component lifecycle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No data requested yet.
    Idle,

    /// A fetch is in flight.
    Loading,

    /// A snapshot is loaded and the canvas is live.
    Ready,

    /// The last fetch failed; recoverable via `refresh`.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Global,
    Local,
}

/// Ready-phase substate, derived each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyState {
    pub view_mode: ViewMode,
    pub settling: bool,

    /// Fewer than two nodes: an explicit "nothing to show" state, distinct
    /// from loading and error.
    pub empty: bool,
}

/// Selected note ids with insertion order and a monotonic revision.
///
/// The revision lets hosts detect selection changes without diffing sets.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    nodes: HashSet<Uuid>,
    order: Vec<Uuid>,
    primary: Option<Uuid>,
    revision: u64,
}

impl SelectionState {
    /// Plain click: replace. Multi-select: toggle membership.
    pub fn select(&mut self, id: Uuid, multi_select: bool) {
        if multi_select {
            if self.nodes.remove(&id) {
                self.order.retain(|candidate| *candidate != id);
                if self.primary == Some(id) {
                    self.primary = self.order.last().copied();
                }
            } else {
                self.nodes.insert(id);
                self.order.push(id);
                self.primary = Some(id);
            }
        } else {
            self.nodes.clear();
            self.order.clear();
            self.nodes.insert(id);
            self.order.push(id);
            self.primary = Some(id);
        }
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        self.nodes.clear();
        self.order.clear();
        self.primary = None;
        self.revision += 1;
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.nodes.contains(&id)
    }

    pub fn primary(&self) -> Option<Uuid> {
        self.primary
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The interactive knowledge-graph canvas component.
pub struct GraphCanvasApp {
    source: Arc<dyn SnapshotSource>,
    phase: Phase,

    model: GraphModel,
    params: SimulationParams,
    view_state: ViewState,
    frame: ViewFrame,
    session: Option<LayoutSession>,
    overlay: OverlayState,

    highlight: HashSet<Uuid>,
    selection: SelectionState,
    camera: Camera,
    controller: InteractionController,

    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    generation: u64,

    on_node_click: Option<Box<dyn FnMut(Uuid)>>,
    needs_fit: bool,
}

impl GraphCanvasApp {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            phase: Phase::Idle,
            model: GraphModel::default(),
            params: SimulationParams::default(),
            view_state: ViewState::new(1),
            frame: ViewFrame::default(),
            session: None,
            overlay: OverlayState::default(),
            highlight: HashSet::new(),
            selection: SelectionState::default(),
            camera: Camera::default(),
            controller: InteractionController::default(),
            tx,
            rx,
            generation: 0,
            on_node_click: None,
            needs_fit: false,
        }
    }

    /// Register the host's selection callback.
    pub fn set_on_node_click(&mut self, callback: impl FnMut(Uuid) + 'static) {
        self.on_node_click = Some(Box::new(callback));
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Ready-phase substate; `None` outside `Ready`.
    pub fn ready_state(&self) -> Option<ReadyState> {
        if self.phase != Phase::Ready {
            return None;
        }
        Some(ReadyState {
            view_mode: if self.view_state.is_local() {
                ViewMode::Local
            } else {
                ViewMode::Global
            },
            settling: self.session.as_ref().is_some_and(|s| !s.is_settled()),
            empty: self.model.node_count() < 2,
        })
    }

    // ---- host command interface ----

    /// Start (or restart) a snapshot fetch. Always routes through `Loading`.
    pub fn refresh(&mut self) {
        self.generation += 1;
        self.phase = Phase::Loading;
        spawn_fetch(self.source.clone(), self.generation, self.tx.clone());
    }

    /// Replace the highlight set and reapply the overlay.
    pub fn set_highlight(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.highlight = ids.into_iter().collect();
        self.reapply_overlay();
    }

    /// Merge a partial parameter update.
    pub fn set_params(&mut self, partial: PartialParams) {
        self.on_params_changed(&partial);
    }

    /// Re-frame the camera around the current node bounds on the next frame.
    pub fn fit_to_view(&mut self) {
        self.needs_fit = true;
    }

    /// Set the BFS hop bound for the local view.
    pub fn set_view_depth(&mut self, depth: u32) {
        if self.view_state.depth != depth {
            self.view_state.depth = depth;
            self.on_view_state_changed();
        }
    }

    // ---- narrow change handlers ----

    /// A new snapshot replaced the model wholesale. Full relayout, seeded
    /// from surviving positions.
    pub fn on_snapshot_changed(&mut self, snapshot: &GraphSnapshot) {
        self.model = GraphModel::from_snapshot(snapshot);
        self.phase = Phase::Ready;
        // Focus/collapse ids referencing removed notes are now stale; the
        // view computer skips them, no cleanup needed here.
        self.rebuild_frame_and_session();
        self.needs_fit = true;
    }

    /// Focus, depth, collapse, or isolation changed.
    pub fn on_view_state_changed(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.rebuild_frame_and_session();
    }

    /// Parameters changed. Topology is untouched: physics-affecting fields
    /// mutate the running session in place and reheat; cosmetic fields only
    /// refresh the overlay.
    pub fn on_params_changed(&mut self, partial: &PartialParams) {
        let changes = self.params.merge(partial);
        if let Some(session) = self.session.as_mut() {
            if changes.link_distance {
                session.set_link_distance(self.params.link_distance);
            }
            if changes.node_size_base {
                session.set_node_radius_base(self.params.node_size_base);
            }
            if changes.repel_force {
                session.set_charge(self.params.repel_force);
            }
            if changes.center_force {
                session.set_center_strength(self.params.center_force);
            }
            if changes.link_force {
                session.set_link_strength(self.params.link_force);
            }
            session.set_drag_charge_mode(self.params.drag_charge_mode);
            if changes.needs_reheat() {
                log::debug!("param change reheats layout session");
                session.reheat();
            }
        }
        if changes.cosmetic {
            self.reapply_overlay();
        }
    }

    // ---- per-frame pipeline ----

    /// Drain fetch outcomes. Stale generations are discarded so a slow fetch
    /// never clobbers a newer refresh.
    pub fn poll_fetch(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    pub(crate) fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            log::debug!(
                "discarding stale fetch outcome (generation {} < {})",
                outcome.generation,
                self.generation
            );
            return;
        }
        match outcome.result {
            Ok(snapshot) => self.on_snapshot_changed(&snapshot),
            Err(err) => self.phase = Phase::Error(err.to_string()),
        }
    }

    /// Apply one interaction. Ordering matters: the caller applies all of a
    /// frame's actions before ticking the simulation.
    pub fn apply_action(&mut self, action: CanvasAction, viewport: egui::Rect) {
        match action {
            CanvasAction::ClickNode(key) => {
                let Some(id) = self.model.get_node(key).map(|n| n.id) else {
                    return;
                };
                self.selection.select(id, false);
                if let Some(callback) = self.on_node_click.as_mut() {
                    callback(id);
                }
                self.view_state.toggle_focus(id);
                self.on_view_state_changed();
            }
            CanvasAction::ClickBackground => {
                self.selection.clear();
            }
            CanvasAction::DragStart(key) => {
                if let Some(session) = self.session.as_mut() {
                    session.begin_drag(key);
                }
            }
            CanvasAction::DragMove(key, world) => {
                if let Some(session) = self.session.as_mut() {
                    session.drag_to(key, world);
                }
            }
            CanvasAction::DragEnd(key) => {
                if let Some(session) = self.session.as_mut() {
                    session.end_drag(key);
                }
            }
            CanvasAction::HoverCommit(Some(key)) => {
                apply_hover_dim(key, &self.frame, &mut self.overlay, self.params.show_labels);
            }
            CanvasAction::HoverCommit(None) => {
                self.reapply_overlay();
            }
            CanvasAction::Zoom { factor, anchor } => {
                self.camera.zoom_about(anchor, factor, viewport.center());
            }
            CanvasAction::Pan(delta) => {
                self.camera.pan += delta;
            }
        }
    }

    /// Advance the simulation one step. Returns true while settling.
    pub fn tick(&mut self) -> bool {
        self.session.as_mut().is_some_and(|session| session.tick())
    }

    // ---- egui integration ----

    /// Draw the component into `ui`, processing interactions and ticking the
    /// simulation for this frame.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.poll_fetch();

        match self.phase.clone() {
            Phase::Idle => {
                ui.centered_and_justified(|ui| {
                    if ui.button("Load graph").clicked() {
                        self.refresh();
                    }
                });
            }
            Phase::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                ui.ctx().request_repaint();
            }
            Phase::Error(message) => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(format!("Could not load the graph: {message}"));
                        if ui.button("Retry").clicked() {
                            self.refresh();
                        }
                    });
                });
            }
            Phase::Ready => {
                if self.model.node_count() < 2 {
                    ui.centered_and_justified(|ui| {
                        ui.label("Nothing to show yet. Write a couple of notes first.");
                    });
                    return;
                }
                self.show_canvas(ui);
            }
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let sample = sample_pointer(ui, &response);

        let actions = match self.session.as_ref() {
            Some(session) => {
                self.controller
                    .collect_actions(&sample, session, &self.camera, rect.center())
            }
            None => Vec::new(),
        };
        for action in actions {
            self.apply_action(action, rect);
        }

        let settling = self.tick();
        if settling {
            ui.ctx().request_repaint();
        }

        if self.needs_fit
            && let Some(session) = self.session.as_ref()
            && let Some((min, max)) = session.bounds()
        {
            self.camera.fit_to(min, max, rect);
            self.needs_fit = false;
        }

        if let Some(session) = self.session.as_ref() {
            let painter = ui.painter_at(rect);
            let focus = &self.view_state.focus;
            let selection = &self.selection;
            let model = &self.model;
            let focused = |key| {
                model
                    .get_node(key)
                    .is_some_and(|n| focus.contains(&n.id) || selection.contains(n.id))
            };
            paint_graph(
                &painter,
                rect,
                model,
                &self.frame,
                session,
                &self.overlay,
                &self.camera,
                &self.params,
                &focused,
            );

            if self.controller.dragging().is_none()
                && let Some(hovered) = self.controller.hovered()
                && let Some(pointer) = sample.pointer
            {
                draw_node_tooltip(ui.ctx(), pointer, model, hovered);
            }
        }
    }

    // ---- internals ----

    /// Recompute the frame; rebuild the layout session only if the topology
    /// actually changed, seeding positions from the old session.
    fn rebuild_frame_and_session(&mut self) {
        let frame = compute_view(&self.model, &self.view_state);
        let topology_changed = frame != self.frame || self.session.is_none();
        self.frame = frame;

        if topology_changed {
            let seeds: HashMap<Uuid, Point2D<f32>> = self
                .session
                .as_ref()
                .map(|session| session.seed_map())
                .unwrap_or_default();
            log::debug!(
                "layout session rebuild: {} nodes, {} links",
                self.frame.nodes.len(),
                self.frame.links.len()
            );
            self.session = Some(LayoutSession::new(
                &self.frame,
                &self.model,
                &self.params,
                &seeds,
            ));
        }
        self.reapply_overlay();
    }

    /// Reset the overlay, then layer the highlight back on.
    fn reapply_overlay(&mut self) {
        self.overlay.reset(&self.frame, self.params.show_labels);
        if !self.highlight.is_empty() {
            apply_highlight(
                &self.highlight,
                &self.model,
                &self.frame,
                &mut self.overlay,
                self.params.show_labels,
            );
        }
    }
}
