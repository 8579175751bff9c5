/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph rendering: nodes, edges, labels, tooltip.
//!
//! Pure painting over an `egui::Painter`. Positions come from the layout
//! session, visual attributes from the overlay, and the camera maps world to
//! screen. Nothing here mutates simulation state; interaction detection
//! happens in `input` from the `PointerSample` built by `sample_pointer`.

use egui::{Align2, Color32, FontId, Order, Stroke};
use std::time::Instant;

use crate::highlight::OverlayState;
use crate::input::{Camera, PointerSample};
use crate::layout::{LayoutSession, SimulationParams};
use crate::model::{ConnectionKind, GraphModel, NodeKey};
use crate::view::ViewFrame;

/// Labels disappear entirely below this zoom.
const LABEL_MIN_ZOOM: f32 = 0.6;

/// Up to this zoom, labels are truncated to fit.
const LABEL_TRUNCATE_ZOOM: f32 = 1.5;

const LABEL_TRUNCATE_LEN: usize = 18;

const NODE_FILL: Color32 = Color32::from_rgb(0x5e, 0x81, 0xac);
const NODE_STROKE: Color32 = Color32::from_rgb(0xd8, 0xde, 0xe9);
const FOCUS_RING: Color32 = Color32::from_rgb(0xeb, 0xcb, 0x8b);
const EDGE_SIMILARITY: Color32 = Color32::from_rgb(0x4c, 0x56, 0x6a);
const EDGE_MANUAL: Color32 = Color32::from_rgb(0xa3, 0xbe, 0x8c);
const LABEL_COLOR: Color32 = Color32::from_rgb(0xe5, 0xe9, 0xf0);

/// Reduce egui pointer state for this frame to a `PointerSample`.
pub fn sample_pointer(ui: &egui::Ui, response: &egui::Response) -> PointerSample {
    let scroll = if response.hovered() {
        ui.ctx().input(|i| i.raw_scroll_delta.y)
    } else {
        0.0
    };
    PointerSample {
        pointer: response.hover_pos(),
        clicked: response.clicked(),
        drag_started: response.drag_started(),
        dragging: response.dragged(),
        drag_released: response.drag_stopped(),
        drag_delta: response.drag_delta(),
        scroll,
        now: Instant::now(),
    }
}

/// Label for a node at the current zoom, or `None` when too far out.
pub fn label_text_for_zoom(title: &str, zoom: f32) -> Option<String> {
    if zoom < LABEL_MIN_ZOOM {
        return None;
    }
    if zoom <= LABEL_TRUNCATE_ZOOM && title.chars().count() > LABEL_TRUNCATE_LEN {
        let truncated: String = title.chars().take(LABEL_TRUNCATE_LEN).collect();
        return Some(format!("{truncated}…"));
    }
    Some(title.to_string())
}

/// Stroke for an edge given its payload and the overlay opacity.
fn edge_stroke(
    similarity: f32,
    kind: ConnectionKind,
    opacity: f32,
    params: &SimulationParams,
) -> Stroke {
    let (color, width) = if params.color_coded {
        match kind {
            ConnectionKind::Manual => (EDGE_MANUAL, 1.6),
            ConnectionKind::Similarity => (
                EDGE_SIMILARITY,
                0.6 + similarity * params.link_thickness_multiplier,
            ),
        }
    } else {
        (EDGE_SIMILARITY, 1.2)
    };
    Stroke::new(width, color.gamma_multiply(opacity))
}

/// Paint the frame: edges under nodes, labels on top.
#[allow(clippy::too_many_arguments)]
pub fn paint_graph(
    painter: &egui::Painter,
    rect: egui::Rect,
    model: &GraphModel,
    frame: &ViewFrame,
    session: &LayoutSession,
    overlay: &OverlayState,
    camera: &Camera,
    params: &SimulationParams,
    focused: &dyn Fn(NodeKey) -> bool,
) {
    let center = rect.center();

    for link in &frame.links {
        let (Some(from), Some(to)) = (session.position(link.from), session.position(link.to))
        else {
            continue;
        };
        let Some(edge) = model.get_edge(link.edge) else {
            continue;
        };
        let visual = overlay.edge(link.edge);
        painter.line_segment(
            [
                camera.world_to_screen(from, center),
                camera.world_to_screen(to, center),
            ],
            edge_stroke(edge.similarity, edge.kind, visual.stroke_opacity, params),
        );
    }

    for key in &frame.nodes {
        let Some(pos) = session.position(*key) else {
            continue;
        };
        let Some(radius) = session.radius(*key) else {
            continue;
        };
        let visual = overlay.node(*key);
        let screen = camera.world_to_screen(pos, center);
        let screen_radius = radius * camera.zoom;

        painter.circle_filled(screen, screen_radius, NODE_FILL.gamma_multiply(visual.opacity));
        painter.circle_stroke(
            screen,
            screen_radius,
            Stroke::new(1.0, NODE_STROKE.gamma_multiply(visual.opacity * 0.8)),
        );
        if focused(*key) {
            painter.circle_stroke(
                screen,
                screen_radius + 3.0,
                Stroke::new(2.0, FOCUS_RING.gamma_multiply(visual.opacity)),
            );
        }
    }

    for key in &frame.nodes {
        let visual = overlay.node(*key);
        if !visual.label_visible {
            continue;
        }
        let Some(pos) = session.position(*key) else {
            continue;
        };
        let Some(radius) = session.radius(*key) else {
            continue;
        };
        let Some(node) = model.get_node(*key) else {
            continue;
        };
        let Some(text) = label_text_for_zoom(&node.title, camera.zoom) else {
            continue;
        };
        let screen = camera.world_to_screen(pos, center);
        painter.text(
            screen + egui::vec2(0.0, radius * camera.zoom + 4.0),
            Align2::CENTER_TOP,
            text,
            FontId::proportional(11.0),
            LABEL_COLOR.gamma_multiply(visual.opacity),
        );
    }
}

/// Floating tooltip for the committed hover, anchored near the cursor.
pub fn draw_node_tooltip(ctx: &egui::Context, anchor: egui::Pos2, model: &GraphModel, key: NodeKey) {
    let Some(node) = model.get_node(key) else {
        return;
    };
    egui::Area::new(egui::Id::new("note_hover_tooltip"))
        .order(Order::Tooltip)
        .fixed_pos(anchor + egui::vec2(14.0, 14.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(280.0);
                let title = if node.title.is_empty() {
                    node.id.to_string()
                } else {
                    node.title.clone()
                };
                ui.label(egui::RichText::new(title).strong());
                if !node.preview.is_empty() {
                    ui.label(egui::RichText::new(&node.preview).weak());
                }
                ui.label(
                    egui::RichText::new(format!("{} words", node.word_count))
                        .small()
                        .weak(),
                );
            });
        });
}
