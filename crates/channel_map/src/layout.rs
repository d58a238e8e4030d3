//! Stepwise marker layout.
//!
//! [`ForceLayout`] is a velocity-Verlet style force simulation with a
//! cooling `alpha`: center, weak many-body attraction, collision and x/y
//! positioning forces, applied in that order each tick.

use crate::geometry::ScreenPoint;
use crate::rng::Lcg;

pub const COLLIDE_RADIUS_FACTOR: f64 = 1.5;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const CHARGE_STRENGTH: f64 = 2.0;
const CHARGE_DISTANCE_MIN_SQ: f64 = 1.0;
const POSITION_STRENGTH: f64 = 0.05;
const COLLIDE_STRENGTH: f64 = 1.0;
const CENTER_STRENGTH: f64 = 1.0;
const JIGGLE_SEED: u64 = 0x6a09_e667;

/// Mutable per-node state a layout may touch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub collide_radius: f64,
}

impl LayoutNode {
    pub fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }

    pub fn velocity(&self) -> ScreenPoint {
        ScreenPoint::new(self.vx, self.vy)
    }
}

/// Produces raw proposed positions; acceptance happens outside the layout.
pub trait Layout {
    /// Advances every node by one step.
    fn tick(&mut self, nodes: &mut [LayoutNode]);

    /// Retargets surface-centered forces after a resize.
    fn set_center(&mut self, center: ScreenPoint);

    fn is_settled(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ForceLayout {
    center: ScreenPoint,
    alpha: f64,
    alpha_decay: f64,
    jiggle: Lcg,
}

impl ForceLayout {
    pub fn new(center: ScreenPoint) -> Self {
        Self {
            center,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            jiggle: Lcg::new(JIGGLE_SEED),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    fn jiggle(&mut self) -> f64 {
        (self.jiggle.next_f64() - 0.5) * 1e-6
    }

    fn apply_center(&self, nodes: &mut [LayoutNode]) {
        let count = nodes.len() as f64;
        let (sum_x, sum_y) = nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let shift_x = (sum_x / count - self.center.x) * CENTER_STRENGTH;
        let shift_y = (sum_y / count - self.center.y) * CENTER_STRENGTH;
        for node in nodes.iter_mut() {
            node.x -= shift_x;
            node.y -= shift_y;
        }
    }

    fn apply_charge(&self, nodes: &mut [LayoutNode]) {
        let alpha = self.alpha;
        let snapshot: Vec<(f64, f64)> = nodes.iter().map(|node| (node.x, node.y)).collect();
        for (index, node) in nodes.iter_mut().enumerate() {
            for (other, &(ox, oy)) in snapshot.iter().enumerate() {
                if other == index {
                    continue;
                }
                let dx = ox - node.x;
                let dy = oy - node.y;
                let mut l = dx * dx + dy * dy;
                if l == 0.0 {
                    continue;
                }
                if l < CHARGE_DISTANCE_MIN_SQ {
                    l = (CHARGE_DISTANCE_MIN_SQ * l).sqrt();
                }
                node.vx += dx * CHARGE_STRENGTH * alpha / l;
                node.vy += dy * CHARGE_STRENGTH * alpha / l;
            }
        }
    }

    fn apply_collide(&mut self, nodes: &mut [LayoutNode]) {
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (head, tail) = nodes.split_at_mut(j);
                let node = &mut head[i];
                let other = &mut tail[0];
                let ri = node.collide_radius;
                let rj = other.collide_radius;
                let r = ri + rj;
                let mut x = (node.x + node.vx) - (other.x + other.vx);
                let mut y = (node.y + node.vy) - (other.y + other.vy);
                let mut l = x * x + y * y;
                if l >= r * r {
                    continue;
                }
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                let distance = l.sqrt();
                let push = (r - distance) / distance * COLLIDE_STRENGTH;
                x *= push;
                y *= push;
                let ri_sq = ri * ri;
                let rj_sq = rj * rj;
                let share = if ri_sq + rj_sq > 0.0 {
                    rj_sq / (ri_sq + rj_sq)
                } else {
                    0.5
                };
                node.vx += x * share;
                node.vy += y * share;
                other.vx -= x * (1.0 - share);
                other.vy -= y * (1.0 - share);
            }
        }
    }

    fn apply_position(&self, nodes: &mut [LayoutNode]) {
        let strength = POSITION_STRENGTH * self.alpha;
        for node in nodes.iter_mut() {
            node.vx += (self.center.x - node.x) * strength;
            node.vy += (self.center.y - node.y) * strength;
        }
    }
}

impl Layout for ForceLayout {
    fn tick(&mut self, nodes: &mut [LayoutNode]) {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;
        if nodes.is_empty() {
            return;
        }

        self.apply_center(nodes);
        self.apply_charge(nodes);
        self.apply_collide(nodes);
        self.apply_position(nodes);

        for node in nodes.iter_mut() {
            node.vx *= 1.0 - VELOCITY_DECAY;
            node.vy *= 1.0 - VELOCITY_DECAY;
            node.x += node.vx;
            node.y += node.vy;
        }
    }

    fn set_center(&mut self, center: ScreenPoint) {
        self.center = center;
    }

    fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64, radius: f64) -> LayoutNode {
        LayoutNode {
            x,
            y,
            collide_radius: radius,
            ..LayoutNode::default()
        }
    }

    #[test]
    fn single_node_is_pulled_to_center() {
        let mut layout = ForceLayout::new(ScreenPoint::new(100.0, 100.0));
        let mut nodes = vec![node(40.0, 160.0, 3.0)];
        layout.tick(&mut nodes);
        assert!((nodes[0].x - 100.0).abs() < 1e-9);
        assert!((nodes[0].y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_nodes_are_pushed_apart() {
        let mut layout = ForceLayout::new(ScreenPoint::new(0.0, 0.0));
        let mut nodes = vec![node(-1.0, 0.0, 6.0), node(1.0, 0.0, 6.0)];
        for _ in 0..30 {
            layout.tick(&mut nodes);
        }
        let gap = (nodes[1].x - nodes[0].x).abs();
        assert!(gap > 2.0, "gap {gap}");
    }

    #[test]
    fn coincident_nodes_separate_through_jiggle() {
        let mut layout = ForceLayout::new(ScreenPoint::new(0.0, 0.0));
        let mut nodes = vec![node(5.0, 5.0, 4.0), node(5.0, 5.0, 4.0)];
        for _ in 0..50 {
            layout.tick(&mut nodes);
        }
        assert!(nodes[0].position().distance(nodes[1].position()) > 1.0);
        assert!(nodes.iter().all(|node| node.x.is_finite() && node.y.is_finite()));
    }

    #[test]
    fn layout_cools_down_within_default_schedule() {
        let mut layout = ForceLayout::new(ScreenPoint::default());
        let mut nodes = vec![node(0.0, 0.0, 1.0)];
        let mut ticks = 0;
        while !layout.is_settled() {
            layout.tick(&mut nodes);
            ticks += 1;
            assert!(ticks <= 301, "alpha {}", layout.alpha());
        }
        assert!(ticks >= 299);

        layout.reheat();
        assert!(!layout.is_settled());
    }

    #[test]
    fn layout_without_nodes_still_cools_down() {
        let mut layout = ForceLayout::new(ScreenPoint::default());
        let mut ticks = 0;
        while !layout.is_settled() {
            layout.tick(&mut []);
            ticks += 1;
            assert!(ticks <= 301, "alpha {}", layout.alpha());
        }
    }
}
