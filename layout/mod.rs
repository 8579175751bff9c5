/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Force-directed layout session.
//!
//! One `LayoutSession` is bound to one view-frame topology. Forces: spring
//! along links toward `link_distance`, pairwise charge repulsion, center
//! gravity, and pairwise collision separation. Integration is alpha-damped:
//! alpha relaxes toward `alpha_target` at `ALPHA_DECAY` per tick, velocities
//! decay by `VELOCITY_DECAY`, and the session auto-halts once alpha and its
//! target are both below `ALPHA_MIN`.
//!
//! Parameter changes that keep the topology mutate the session in place
//! (`set_link_distance`, `set_charge`, ...) followed by `reheat()`, which
//! pulses the alpha target for `REHEAT_PULSE` instead of resetting alpha to
//! 1. Only topology changes construct a new session; prior positions carry
//! over through the seed map so nodes do not jump.
//!
//! O(n²) pair passes per tick; fine for note graphs in the hundreds.

use euclid::default::{Point2D, Vector2D};
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::model::{GraphModel, NodeKey};
use crate::view::ViewFrame;

/// Per-tick relaxation rate of alpha toward its target.
pub const ALPHA_DECAY: f32 = 0.06;

/// Alpha below this (with a zero target) counts as settled.
pub const ALPHA_MIN: f32 = 0.001;

/// Velocity carried over between ticks.
pub const VELOCITY_DECAY: f32 = 0.5;

/// Alpha target during a reheat pulse. Deliberately far below 1.0 so a
/// parameter tweak re-settles the layout without a jarring full relayout.
pub const REHEAT_TARGET: f32 = 0.3;

/// How long a reheat pulse holds the raised alpha target.
pub const REHEAT_PULSE: Duration = Duration::from_millis(200);

/// Hard cap on per-tick displacement, scaled by alpha.
pub const MAX_STEP: f32 = 60.0;

/// Pairs farther apart than this skip the charge pass.
const MAX_CHARGE_DIST: f32 = 800.0;

/// Extra spacing added to node radii in the collision pass.
const COLLIDE_MARGIN: f32 = 4.0;

/// Golden-angle spiral pitch for initial placement.
const SPIRAL_STEP: f32 = 2.399_963;

/// Global charge behavior while a node is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragChargeMode {
    /// Dragging only pins; charge untouched.
    #[default]
    Off,

    /// Charge flips attractive while dragging: neighbors cluster toward the
    /// dragged node.
    Attract,

    /// Charge doubles while dragging: neighbors scatter away.
    Repel,
}

/// Tunable simulation and presentation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub center_force: f32,
    pub repel_force: f32,
    pub link_force: f32,
    pub link_distance: f32,
    pub node_size_base: f32,
    pub link_thickness_multiplier: f32,
    pub color_coded: bool,
    pub show_labels: bool,
    pub drag_charge_mode: DragChargeMode,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            center_force: 0.04,
            repel_force: 320.0,
            link_force: 0.5,
            link_distance: 120.0,
            node_size_base: 8.0,
            link_thickness_multiplier: 1.5,
            color_coded: true,
            show_labels: true,
            drag_charge_mode: DragChargeMode::Off,
        }
    }
}

/// Host-supplied partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialParams {
    pub center_force: Option<f32>,
    pub repel_force: Option<f32>,
    pub link_force: Option<f32>,
    pub link_distance: Option<f32>,
    pub node_size_base: Option<f32>,
    pub link_thickness_multiplier: Option<f32>,
    pub color_coded: Option<bool>,
    pub show_labels: Option<bool>,
    pub drag_charge_mode: Option<DragChargeMode>,
}

/// Which aspects a merge actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub center_force: bool,
    pub repel_force: bool,
    pub link_force: bool,
    pub link_distance: bool,
    pub node_size_base: bool,
    pub cosmetic: bool,
}

impl ParamChanges {
    /// Physics-affecting changes reheat the running session.
    pub fn needs_reheat(&self) -> bool {
        self.center_force
            || self.repel_force
            || self.link_force
            || self.link_distance
            || self.node_size_base
    }
}

impl SimulationParams {
    /// Merge a partial update, reporting what changed.
    pub fn merge(&mut self, partial: &PartialParams) -> ParamChanges {
        let mut changes = ParamChanges::default();

        macro_rules! merge_field {
            ($field:ident, $flag:ident) => {
                if let Some(value) = partial.$field
                    && value != self.$field
                {
                    self.$field = value;
                    changes.$flag = true;
                }
            };
        }

        merge_field!(center_force, center_force);
        merge_field!(repel_force, repel_force);
        merge_field!(link_force, link_force);
        merge_field!(link_distance, link_distance);
        merge_field!(node_size_base, node_size_base);
        merge_field!(link_thickness_multiplier, cosmetic);
        merge_field!(color_coded, cosmetic);
        merge_field!(show_labels, cosmetic);
        merge_field!(drag_charge_mode, cosmetic);

        changes
    }
}

/// Render radius of a node, grown sublinearly with word count.
pub fn node_radius(word_count: u32, base: f32) -> f32 {
    (base + (word_count as f32 / 50.0).sqrt() * base * 0.5).min(base * 2.5)
}

struct Body {
    key: NodeKey,
    id: Uuid,
    word_count: u32,
    pos: Point2D<f32>,
    vel: Vector2D<f32>,
    fixed: Option<Point2D<f32>>,
    radius: f32,
}

struct SpringLink {
    a: usize,
    b: usize,
    distance: f32,
}

/// One owned integrator instance bound to a specific frame topology.
pub struct LayoutSession {
    bodies: Vec<Body>,
    index_of: HashMap<NodeKey, usize>,
    links: Vec<SpringLink>,

    alpha: f32,
    alpha_target: f32,
    reheat_until: Option<Instant>,

    charge: f32,
    charge_override: Option<f32>,
    center_strength: f32,
    link_strength: f32,
    radius_base: f32,
    drag_mode: DragChargeMode,
}

impl LayoutSession {
    /// Build a fresh session for `frame`, alpha = 1.
    ///
    /// Nodes present in `seeds` (keyed by note id) keep their prior position;
    /// new nodes land on a golden-angle spiral with a little jitter so a
    /// rebuild never starts from coincident points.
    pub fn new(
        frame: &ViewFrame,
        model: &GraphModel,
        params: &SimulationParams,
        seeds: &HashMap<Uuid, Point2D<f32>>,
    ) -> Self {
        let mut rng = rand::thread_rng();
        let mut bodies = Vec::with_capacity(frame.nodes.len());
        let mut index_of = HashMap::with_capacity(frame.nodes.len());

        for (i, key) in frame.nodes.iter().enumerate() {
            let Some(node) = model.get_node(*key) else {
                continue;
            };
            let pos = seeds.get(&node.id).copied().unwrap_or_else(|| {
                let r = 40.0 * (i as f32).sqrt();
                let theta = i as f32 * SPIRAL_STEP;
                let jitter_x: f32 = rng.gen_range(-2.0..2.0);
                let jitter_y: f32 = rng.gen_range(-2.0..2.0);
                Point2D::new(r * theta.cos() + jitter_x, r * theta.sin() + jitter_y)
            });
            index_of.insert(*key, bodies.len());
            bodies.push(Body {
                key: *key,
                id: node.id,
                word_count: node.word_count,
                pos,
                vel: Vector2D::zero(),
                fixed: None,
                radius: node_radius(node.word_count, params.node_size_base),
            });
        }

        let links = frame
            .links
            .iter()
            .filter_map(|link| {
                let a = *index_of.get(&link.from)?;
                let b = *index_of.get(&link.to)?;
                Some(SpringLink {
                    a,
                    b,
                    distance: params.link_distance,
                })
            })
            .collect();

        Self {
            bodies,
            index_of,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            reheat_until: None,
            charge: params.repel_force,
            charge_override: None,
            center_strength: params.center_force,
            link_strength: params.link_force,
            radius_base: params.node_size_base,
            drag_mode: params.drag_charge_mode,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// True once alpha and its target have both cooled below `ALPHA_MIN`.
    pub fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
    }

    /// Advance one simulation step. Returns false when settled (no-op).
    pub fn tick(&mut self) -> bool {
        if let Some(deadline) = self.reheat_until
            && Instant::now() >= deadline
        {
            self.reheat_until = None;
            self.alpha_target = 0.0;
        }
        if self.is_settled() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

        self.apply_link_force();
        self.apply_charge_force();
        self.apply_center_force();
        self.apply_collision();
        self.integrate();

        true
    }

    /// Pulse the alpha target so the layout re-settles without restarting.
    pub fn reheat(&mut self) {
        self.alpha_target = REHEAT_TARGET;
        self.reheat_until = Some(Instant::now() + REHEAT_PULSE);
    }

    /// Mutate every spring's rest length in place. Caller reheats.
    pub fn set_link_distance(&mut self, distance: f32) {
        for link in &mut self.links {
            link.distance = distance;
        }
    }

    /// Mutate every body's collision radius in place. Caller reheats.
    pub fn set_node_radius_base(&mut self, base: f32) {
        self.radius_base = base;
        for body in &mut self.bodies {
            body.radius = node_radius(body.word_count, base);
        }
    }

    pub fn set_charge(&mut self, charge: f32) {
        self.charge = charge;
    }

    pub fn set_center_strength(&mut self, strength: f32) {
        self.center_strength = strength;
    }

    pub fn set_link_strength(&mut self, strength: f32) {
        self.link_strength = strength;
    }

    pub fn set_drag_charge_mode(&mut self, mode: DragChargeMode) {
        self.drag_mode = mode;
        if self.charge_override.is_some() {
            self.charge_override = self.drag_override();
        }
    }

    /// Pin a node at its current position and engage the drag charge mode.
    ///
    /// The alpha target stays raised with no deadline for the whole gesture,
    /// so neighbors keep reacting however long the pin is held; `end_drag`
    /// starts the cool-down.
    pub fn begin_drag(&mut self, key: NodeKey) {
        if let Some(&i) = self.index_of.get(&key) {
            self.bodies[i].fixed = Some(self.bodies[i].pos);
            self.bodies[i].vel = Vector2D::zero();
            self.charge_override = self.drag_override();
            self.alpha_target = REHEAT_TARGET;
            self.reheat_until = None;
        }
    }

    /// Move a pinned node; the pin follows the pointer.
    pub fn drag_to(&mut self, key: NodeKey, pos: Point2D<f32>) {
        if let Some(&i) = self.index_of.get(&key) {
            self.bodies[i].pos = pos;
            self.bodies[i].fixed = Some(pos);
        }
    }

    /// Release the pin and restore the default charge. The node rejoins the
    /// integrator on the next tick; the reheat pulse starts the cool-down
    /// held open since `begin_drag`.
    pub fn end_drag(&mut self, key: NodeKey) {
        if let Some(&i) = self.index_of.get(&key) {
            self.bodies[i].fixed = None;
        }
        self.charge_override = None;
        self.reheat();
    }

    pub fn is_pinned(&self, key: NodeKey) -> bool {
        self.index_of
            .get(&key)
            .is_some_and(|&i| self.bodies[i].fixed.is_some())
    }

    pub fn position(&self, key: NodeKey) -> Option<Point2D<f32>> {
        self.index_of.get(&key).map(|&i| self.bodies[i].pos)
    }

    pub fn radius(&self, key: NodeKey) -> Option<f32> {
        self.index_of.get(&key).map(|&i| self.bodies[i].radius)
    }

    /// Iterate (key, position) for every simulated node.
    pub fn positions(&self) -> impl Iterator<Item = (NodeKey, Point2D<f32>)> + '_ {
        self.bodies.iter().map(|b| (b.key, b.pos))
    }

    /// Positions keyed by note id, for seeding a successor session.
    pub fn seed_map(&self) -> HashMap<Uuid, Point2D<f32>> {
        self.bodies.iter().map(|b| (b.id, b.pos)).collect()
    }

    /// Axis-aligned bounds of all bodies, if any.
    pub fn bounds(&self) -> Option<(Point2D<f32>, Point2D<f32>)> {
        let first = self.bodies.first()?;
        let mut min = first.pos;
        let mut max = first.pos;
        for body in &self.bodies {
            min.x = min.x.min(body.pos.x);
            min.y = min.y.min(body.pos.y);
            max.x = max.x.max(body.pos.x);
            max.y = max.y.max(body.pos.y);
        }
        Some((min, max))
    }

    fn drag_override(&self) -> Option<f32> {
        match self.drag_mode {
            DragChargeMode::Off => None,
            DragChargeMode::Attract => Some(-self.charge),
            DragChargeMode::Repel => Some(self.charge * 2.0),
        }
    }

    fn apply_link_force(&mut self) {
        for link in &self.links {
            let delta = self.bodies[link.b].pos - self.bodies[link.a].pos;
            let dist = delta.length().max(1.0);
            let displacement = (dist - link.distance) / dist * self.link_strength * self.alpha;
            let pull = delta * (displacement * 0.5);
            self.bodies[link.a].vel += pull;
            self.bodies[link.b].vel -= pull;
        }
    }

    fn apply_charge_force(&mut self) {
        let charge = self.charge_override.unwrap_or(self.charge);
        if charge == 0.0 {
            return;
        }
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.bodies[j].pos - self.bodies[i].pos;
                let dist = delta.length().max(1.0);
                if dist > MAX_CHARGE_DIST {
                    continue;
                }
                let magnitude = charge * self.alpha / (dist * dist);
                let push = delta * (magnitude / dist);
                self.bodies[i].vel -= push;
                self.bodies[j].vel += push;
            }
        }
    }

    fn apply_center_force(&mut self) {
        if self.center_strength == 0.0 {
            return;
        }
        for body in &mut self.bodies {
            let to_origin = Point2D::origin() - body.pos;
            body.vel += to_origin * (self.center_strength * self.alpha);
        }
    }

    /// Position-space overlap resolution, independent of alpha so nodes never
    /// end up stacked even in a cold layout.
    fn apply_collision(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let min_dist = self.bodies[i].radius + self.bodies[j].radius + COLLIDE_MARGIN;
                let delta = self.bodies[j].pos - self.bodies[i].pos;
                let dist = delta.length().max(0.01);
                if dist >= min_dist {
                    continue;
                }
                let correction = delta * ((min_dist - dist) / dist * 0.5);
                if self.bodies[i].fixed.is_none() {
                    self.bodies[i].pos -= correction;
                }
                if self.bodies[j].fixed.is_none() {
                    self.bodies[j].pos += correction;
                }
            }
        }
    }

    fn integrate(&mut self) {
        let step_cap = MAX_STEP * self.alpha;
        for body in &mut self.bodies {
            if let Some(pin) = body.fixed {
                body.pos = pin;
                body.vel = Vector2D::zero();
                continue;
            }
            body.vel *= VELOCITY_DECAY;
            let mut step = body.vel;
            let speed = step.length();
            if speed > step_cap && speed > 0.0 {
                step = step * (step_cap / speed);
            }
            body.pos += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::{GraphSnapshot, WireConnection, WireConnectionType, WireNode};
    use crate::view::{ViewState, compute_view};

    fn fixture(n: usize, edges: &[(usize, usize)]) -> (GraphModel, ViewFrame, Vec<Uuid>) {
        let ids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let snapshot = GraphSnapshot {
            nodes: ids
                .iter()
                .enumerate()
                .map(|(i, id)| WireNode {
                    id: *id,
                    title: format!("note-{i}"),
                    content_preview: String::new(),
                    created_at: String::new(),
                    word_count: 50,
                })
                .collect(),
            connections: edges
                .iter()
                .map(|(a, b)| WireConnection {
                    source_id: ids[*a],
                    target_id: ids[*b],
                    similarity: 0.7,
                    connection_type: WireConnectionType::Similarity,
                })
                .collect(),
            total_nodes: n,
        };
        let model = GraphModel::from_snapshot(&snapshot);
        let frame = compute_view(&model, &ViewState::new(1));
        (model, frame, ids)
    }

    fn session(n: usize, edges: &[(usize, usize)]) -> (GraphModel, ViewFrame, LayoutSession) {
        let (model, frame, _) = fixture(n, edges);
        let params = SimulationParams::default();
        let session = LayoutSession::new(&frame, &model, &params, &HashMap::new());
        (model, frame, session)
    }

    #[test]
    fn test_session_settles() {
        let (_, _, mut session) = session(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        assert!(!session.is_settled());
        for _ in 0..500 {
            if !session.tick() {
                break;
            }
        }
        assert!(session.is_settled());
        assert!(!session.tick());
    }

    #[test]
    fn test_positions_stay_finite() {
        let (_, _, mut session) = session(8, &[(0, 1), (0, 2), (0, 3), (4, 5), (6, 7)]);
        for _ in 0..200 {
            session.tick();
        }
        for (_, pos) in session.positions() {
            assert!(pos.x.is_finite() && pos.y.is_finite());
        }
    }

    #[test]
    fn test_connected_nodes_approach_link_distance() {
        let (_, _, mut session) = session(2, &[(0, 1)]);
        for _ in 0..300 {
            session.tick();
        }
        let positions: Vec<_> = session.positions().map(|(_, p)| p).collect();
        let dist = (positions[0] - positions[1]).length();
        // Spring rest length minus charge push; generous envelope.
        assert!(dist > 20.0, "nodes collapsed together: {dist}");
        assert!(dist < 600.0, "nodes flew apart: {dist}");
    }

    #[test]
    fn test_seeded_positions_carry_over() {
        let (model, frame, ids) = fixture(3, &[(0, 1), (1, 2)]);
        let params = SimulationParams::default();
        let mut seeds = HashMap::new();
        seeds.insert(ids[0], Point2D::new(500.0, -250.0));
        let session = LayoutSession::new(&frame, &model, &params, &seeds);

        let key = model.get_node_key_by_id(ids[0]).unwrap();
        assert_eq!(session.position(key), Some(Point2D::new(500.0, -250.0)));
    }

    #[test]
    fn test_link_distance_change_reheats_without_restart() {
        let (_, _, mut session) = session(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        for _ in 0..500 {
            if !session.tick() {
                break;
            }
        }
        assert!(session.is_settled());
        let before: Vec<_> = session.positions().map(|(_, p)| p).collect();

        session.set_link_distance(160.0);
        session.reheat();
        assert!(!session.is_settled());

        let ticks = 30;
        for _ in 0..ticks {
            session.tick();
            // Never climbs back toward a cold-start alpha.
            assert!(session.alpha() <= REHEAT_TARGET + 1e-3);
        }

        let after: Vec<_> = session.positions().map(|(_, p)| p).collect();
        // Step cap bounds integrator drift; small slack for collision nudges.
        let worst_case = MAX_STEP * REHEAT_TARGET * ticks as f32 + 50.0;
        for (a, b) in before.iter().zip(&after) {
            let drift = (*b - *a).length();
            assert!(drift <= worst_case, "node jumped {drift}");
        }
    }

    #[test]
    fn test_drag_pins_node_through_ticks() {
        let (model, _, mut session) = session(4, &[(0, 1), (1, 2), (2, 3)]);
        let key = model.nodes().next().map(|(k, _)| k).unwrap();

        session.begin_drag(key);
        session.drag_to(key, Point2D::new(42.0, 24.0));
        for _ in 0..10 {
            session.tick();
        }
        assert!(session.is_pinned(key));
        assert_eq!(session.position(key), Some(Point2D::new(42.0, 24.0)));
    }

    #[test]
    fn test_drag_release_unpins_within_one_tick() {
        let (model, _, mut session) = session(4, &[(0, 1), (1, 2), (2, 3)]);
        let key = model.nodes().next().map(|(k, _)| k).unwrap();

        session.begin_drag(key);
        session.drag_to(key, Point2D::new(300.0, 300.0));
        session.tick();
        session.end_drag(key);
        assert!(!session.is_pinned(key));

        // Next tick integrates the node again: center gravity alone moves it
        // off the exact pin point.
        session.tick();
        let pos = session.position(key).unwrap();
        assert_ne!(pos, Point2D::new(300.0, 300.0));
    }

    #[test]
    fn test_held_drag_outlasts_reheat_pulse() {
        let (model, frame, _) = fixture(4, &[(0, 1), (1, 2), (2, 3)]);
        let mut params = SimulationParams::default();
        params.drag_charge_mode = DragChargeMode::Repel;
        let mut session = LayoutSession::new(&frame, &model, &params, &HashMap::new());
        let key = model.nodes().next().map(|(k, _)| k).unwrap();

        session.begin_drag(key);
        // Hold the drag well past the pulse window; the simulation must keep
        // integrating so neighbors still react to the pinned node.
        std::thread::sleep(REHEAT_PULSE + Duration::from_millis(50));
        for i in 0..300 {
            session.drag_to(key, Point2D::new(i as f32, 0.0));
            assert!(session.tick(), "settled with the pin still active");
        }
        assert!(!session.is_settled());
        assert_eq!(session.charge_override, Some(params.repel_force * 2.0));

        // Release starts the cool-down; the session settles on its own.
        session.end_drag(key);
        std::thread::sleep(REHEAT_PULSE + Duration::from_millis(50));
        for _ in 0..500 {
            if !session.tick() {
                break;
            }
        }
        assert!(session.is_settled());
    }

    #[test]
    fn test_drag_charge_mode_off_keeps_charge() {
        let (model, _, mut session) = session(3, &[(0, 1)]);
        let key = model.nodes().next().map(|(k, _)| k).unwrap();
        session.begin_drag(key);
        assert_eq!(session.charge_override, None);
        session.end_drag(key);
    }

    #[test]
    fn test_drag_charge_mode_attract_flips_sign() {
        let (model, frame, _) = fixture(3, &[(0, 1)]);
        let mut params = SimulationParams::default();
        params.drag_charge_mode = DragChargeMode::Attract;
        let mut session = LayoutSession::new(&frame, &model, &params, &HashMap::new());

        let key = model.nodes().next().map(|(k, _)| k).unwrap();
        session.begin_drag(key);
        assert_eq!(session.charge_override, Some(-params.repel_force));
        session.end_drag(key);
        assert_eq!(session.charge_override, None);
    }

    #[test]
    fn test_collision_keeps_nodes_apart() {
        let (model, frame, ids) = fixture(2, &[]);
        let params = SimulationParams::default();
        let mut seeds = HashMap::new();
        seeds.insert(ids[0], Point2D::new(0.0, 0.0));
        seeds.insert(ids[1], Point2D::new(0.5, 0.0));
        let mut session = LayoutSession::new(&frame, &model, &params, &seeds);
        for _ in 0..50 {
            session.tick();
        }
        let positions: Vec<_> = session.positions().map(|(_, p)| p).collect();
        let dist = (positions[0] - positions[1]).length();
        let min_dist = 2.0 * node_radius(50, params.node_size_base);
        assert!(dist >= min_dist, "overlapping after collision pass: {dist}");
    }

    #[test]
    fn test_param_merge_flags() {
        let mut params = SimulationParams::default();

        let changes = params.merge(&PartialParams {
            link_distance: Some(150.0),
            ..Default::default()
        });
        assert!(changes.link_distance);
        assert!(changes.needs_reheat());
        assert_eq!(params.link_distance, 150.0);

        let changes = params.merge(&PartialParams {
            show_labels: Some(false),
            ..Default::default()
        });
        assert!(changes.cosmetic);
        assert!(!changes.needs_reheat());

        // Same value again: nothing changed.
        let changes = params.merge(&PartialParams {
            link_distance: Some(150.0),
            ..Default::default()
        });
        assert_eq!(changes, ParamChanges::default());
    }

    #[test]
    fn test_node_radius_monotonic_and_capped() {
        let base = 8.0;
        assert!(node_radius(10, base) < node_radius(400, base));
        assert!(node_radius(100_000, base) <= base * 2.5);
    }
}
