/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interaction handling: pointer sampling, hover debounce, camera transform.
//!
//! Raw egui pointer state is reduced to a `PointerSample`, and
//! `InteractionController::collect_actions` turns samples into `CanvasAction`
//! values. This decouples input detection (requires `egui::Context`) from
//! action application (pure state mutation), making interactions testable
//! without a rendering context. The app applies actions in order, before the
//! physics tick, which keeps a drag-start visible to the next integration
//! step.
//!
//! Zoom and pan live entirely in `Camera`: a screen-space transform over the
//! simulation's world coordinates. Navigation never rewrites world positions.

use euclid::default::Point2D;
use std::time::{Duration, Instant};

use crate::layout::LayoutSession;
use crate::model::NodeKey;

/// Hover must dwell this long before the dim/tooltip commit fires.
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(250);

/// Extra pick radius around a node, in world units.
const HIT_SLOP: f32 = 2.0;

/// Scroll-to-zoom sensitivity.
const ZOOM_SPEED: f32 = 0.002;

/// What the pointer did this frame, reduced from egui input.
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub pointer: Option<egui::Pos2>,
    pub clicked: bool,
    pub drag_started: bool,
    pub dragging: bool,
    pub drag_released: bool,
    pub drag_delta: egui::Vec2,
    pub scroll: f32,
    pub now: Instant,
}

impl PointerSample {
    pub fn idle(now: Instant) -> Self {
        Self {
            pointer: None,
            clicked: false,
            drag_started: false,
            dragging: false,
            drag_released: false,
            drag_delta: egui::Vec2::ZERO,
            scroll: 0.0,
            now,
        }
    }
}

/// One detected interaction, applied by the app in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    /// Toggle focus membership and emit a selection event.
    ClickNode(NodeKey),

    /// Click on empty canvas; dismisses the tooltip.
    ClickBackground,

    DragStart(NodeKey),
    DragMove(NodeKey, Point2D<f32>),
    DragEnd(NodeKey),

    /// Debounced hover commit; `None` restores the undimmed state.
    HoverCommit(Option<NodeKey>),

    Zoom { factor: f32, anchor: egui::Pos2 },
    Pan(egui::Vec2),
}

/// Screen-space view transform. Zoom is bounded; pan is not.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub zoom: f32,
    pub pan: egui::Vec2,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            zoom_min: 0.5,
            zoom_max: 4.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Point2D<f32>, center: egui::Pos2) -> egui::Pos2 {
        egui::pos2(
            center.x + world.x * self.zoom + self.pan.x,
            center.y + world.y * self.zoom + self.pan.y,
        )
    }

    pub fn screen_to_world(&self, screen: egui::Pos2, center: egui::Pos2) -> Point2D<f32> {
        Point2D::new(
            (screen.x - center.x - self.pan.x) / self.zoom,
            (screen.y - center.y - self.pan.y) / self.zoom,
        )
    }

    /// Multiply zoom, keeping the world point under `anchor` stationary.
    pub fn zoom_about(&mut self, anchor: egui::Pos2, factor: f32, center: egui::Pos2) {
        let old_zoom = self.zoom;
        let new_zoom = (self.zoom * factor).clamp(self.zoom_min, self.zoom_max);
        if new_zoom == old_zoom {
            return;
        }
        let offset = anchor - center;
        self.pan = offset - (offset - self.pan) * (new_zoom / old_zoom);
        self.zoom = new_zoom;
    }

    /// Frame the given world bounds inside the viewport.
    pub fn fit_to(&mut self, min: Point2D<f32>, max: Point2D<f32>, viewport: egui::Rect) {
        let pad = 80.0;
        let width = (max.x - min.x).max(1.0) + pad;
        let height = (max.y - min.y).max(1.0) + pad;
        self.zoom = (viewport.width() / width)
            .min(viewport.height() / height)
            .clamp(self.zoom_min, self.zoom_max);
        let world_center = Point2D::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5);
        self.pan = egui::vec2(-world_center.x * self.zoom, -world_center.y * self.zoom);
    }
}

/// Closest node whose radius (plus slop) covers the world point.
pub fn hit_test_node(session: &LayoutSession, world: Point2D<f32>) -> Option<NodeKey> {
    let mut best: Option<(NodeKey, f32)> = None;
    for (key, pos) in session.positions() {
        let Some(radius) = session.radius(key) else {
            continue;
        };
        let dist = (world - pos).length();
        if dist <= radius + HIT_SLOP && best.is_none_or(|(_, d)| dist < d) {
            best = Some((key, dist));
        }
    }
    best.map(|(key, _)| key)
}

/// Debounces raw hover into commit events.
///
/// Entering a node starts a dwell timer; the commit fires once the pointer
/// stays on the same node for `HOVER_DEBOUNCE`. Leaving commits `None`
/// immediately so the restore never lags behind the pointer.
#[derive(Debug, Default)]
pub struct HoverTracker {
    candidate: Option<(NodeKey, Instant)>,
    committed: Option<NodeKey>,
}

impl HoverTracker {
    /// Feed the raw hit for this frame; returns a commit event when one fires.
    pub fn observe(&mut self, raw: Option<NodeKey>, now: Instant) -> Option<Option<NodeKey>> {
        match raw {
            None => {
                self.candidate = None;
                if self.committed.is_some() {
                    self.committed = None;
                    return Some(None);
                }
                None
            }
            Some(key) => {
                if self.committed == Some(key) {
                    self.candidate = None;
                    return None;
                }
                match self.candidate {
                    Some((candidate, since)) if candidate == key => {
                        if now.duration_since(since) >= HOVER_DEBOUNCE {
                            self.candidate = None;
                            self.committed = Some(key);
                            Some(Some(key))
                        } else {
                            None
                        }
                    }
                    _ => {
                        self.candidate = Some((key, now));
                        None
                    }
                }
            }
        }
    }

    pub fn committed(&self) -> Option<NodeKey> {
        self.committed
    }

    /// Drop any pending or committed hover, emitting the restore if needed.
    pub fn suppress(&mut self) -> Option<Option<NodeKey>> {
        self.candidate = None;
        if self.committed.take().is_some() {
            Some(None)
        } else {
            None
        }
    }
}

/// Turns pointer samples into canvas actions.
#[derive(Default)]
pub struct InteractionController {
    hover: HoverTracker,
    drag: Option<NodeKey>,
}

impl InteractionController {
    pub fn dragging(&self) -> Option<NodeKey> {
        self.drag
    }

    pub fn hovered(&self) -> Option<NodeKey> {
        self.hover.committed()
    }

    pub fn collect_actions(
        &mut self,
        sample: &PointerSample,
        session: &LayoutSession,
        camera: &Camera,
        viewport_center: egui::Pos2,
    ) -> Vec<CanvasAction> {
        let mut actions = Vec::new();

        let world = sample
            .pointer
            .map(|p| camera.screen_to_world(p, viewport_center));
        let hit = world.and_then(|w| hit_test_node(session, w));

        if sample.drag_started
            && let Some(key) = hit
        {
            self.drag = Some(key);
            actions.push(CanvasAction::DragStart(key));
        }

        if sample.dragging {
            match (self.drag, world) {
                (Some(key), Some(world)) => actions.push(CanvasAction::DragMove(key, world)),
                (None, _) => {
                    if sample.drag_delta != egui::Vec2::ZERO {
                        actions.push(CanvasAction::Pan(sample.drag_delta));
                    }
                }
                _ => {}
            }
        }

        if sample.drag_released
            && let Some(key) = self.drag.take()
        {
            actions.push(CanvasAction::DragEnd(key));
        }

        if sample.clicked && self.drag.is_none() {
            match hit {
                Some(key) => actions.push(CanvasAction::ClickNode(key)),
                None => actions.push(CanvasAction::ClickBackground),
            }
        }

        if sample.scroll != 0.0
            && let Some(anchor) = sample.pointer
        {
            actions.push(CanvasAction::Zoom {
                factor: (sample.scroll * ZOOM_SPEED).exp(),
                anchor,
            });
        }

        // Tooltip and dimming stay suppressed for the whole drag.
        if self.drag.is_some() {
            if let Some(event) = self.hover.suppress() {
                actions.push(CanvasAction::HoverCommit(event));
            }
        } else if let Some(event) = self.hover.observe(hit, sample.now) {
            actions.push(CanvasAction::HoverCommit(event));
        }

        actions
    }
}
