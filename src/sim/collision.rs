//! Collision detection and response
//!
//! Three independent checks run every tick: ball against ball, ball against
//! the four cushions (with one tick of look-ahead so fast balls cannot pass
//! through a cushion), and ball against the pockets.

use glam::Vec2;

use super::ball::Ball;

/// Centers closer than this are treated as coincident
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Resolve a possible contact between two balls.
///
/// Equal masses: the normal components of the velocities are exchanged and
/// the tangential components kept, then both are scaled by `1 - loss`.
/// Overlap is removed by pushing each ball half the penetration depth apart.
///
/// Returns the closing speed along the normal when the balls hit. A pair that
/// touches while already separating is only pushed apart and returns `None`,
/// the same as no contact.
pub fn resolve_ball_pair(a: &mut Ball, b: &mut Ball, diameter: f32, loss: f32) -> Option<f32> {
    if !a.visible || !b.visible || (!a.moving && !b.moving) {
        return None;
    }

    let delta = a.pos - b.pos;
    let dist = delta.length();
    if dist > diameter {
        return None;
    }

    // Coincident centers have no defined normal; fall back to the x axis
    let normal = if dist > DEGENERATE_DISTANCE {
        delta / dist
    } else {
        Vec2::X
    };

    let correction = normal * ((diameter - dist) / 2.0);
    a.pos += correction;
    b.pos -= correction;

    let closing = (a.vel - b.vel).dot(normal);
    if closing >= 0.0 {
        return None;
    }

    let tangent = normal.perp();
    let (un_a, ut_a) = (a.vel.dot(normal), a.vel.dot(tangent));
    let (un_b, ut_b) = (b.vel.dot(normal), b.vel.dot(tangent));

    let keep = 1.0 - loss;
    a.set_velocity((normal * un_b + tangent * ut_a) * keep);
    b.set_velocity((normal * un_a + tangent * ut_b) * keep);

    Some(-closing)
}

/// Keep a ball inside `[min, max]` (ball-center bounds).
///
/// Each cushion is tested against the position the ball will reach after
/// this tick's friction and movement. On violation the ball is moved back by
/// the penetration; if it is heading into that cushion the perpendicular
/// velocity is inverted and the velocity scaled by `1 - loss`.
///
/// Returns the strongest perpendicular impact speed, if any cushion bounced.
pub fn resolve_cushions(
    ball: &mut Ball,
    min: Vec2,
    max: Vec2,
    friction: f32,
    loss: f32,
) -> Option<f32> {
    if !ball.visible {
        return None;
    }

    let next = ball.pos + ball.vel * (1.0 - friction);
    let keep = 1.0 - loss;
    let mut vel = ball.vel;
    let mut impact: Option<f32> = None;

    // Left / right
    if next.x < min.x {
        ball.pos.x += min.x - next.x;
        if vel.x < 0.0 {
            impact = Some(strongest(impact, vel.x));
            vel.x = -vel.x;
            vel *= keep;
        }
    } else if next.x > max.x {
        ball.pos.x -= next.x - max.x;
        if vel.x > 0.0 {
            impact = Some(strongest(impact, vel.x));
            vel.x = -vel.x;
            vel *= keep;
        }
    }

    // Top / bottom
    if next.y < min.y {
        ball.pos.y += min.y - next.y;
        if vel.y < 0.0 {
            impact = Some(strongest(impact, vel.y));
            vel.y = -vel.y;
            vel *= keep;
        }
    } else if next.y > max.y {
        ball.pos.y -= next.y - max.y;
        if vel.y > 0.0 {
            impact = Some(strongest(impact, vel.y));
            vel.y = -vel.y;
            vel *= keep;
        }
    }

    if impact.is_some() {
        ball.set_velocity(vel);
    }
    impact
}

#[inline]
fn strongest(impact: Option<f32>, component: f32) -> f32 {
    impact.unwrap_or(0.0).max(component.abs())
}

/// Index of the first pocket whose center lies within `radius` (inclusive)
pub fn pocket_containing(pos: Vec2, pockets: &[Vec2], radius: f32) -> Option<usize> {
    pockets.iter().position(|p| pos.distance(*p) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallColor;

    const DIAMETER: f32 = 38.0;
    const LOSS: f32 = 0.018;
    const FRICTION: f32 = 0.018;

    fn moving_ball(color: BallColor, pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::new(color, pos);
        ball.set_velocity(vel);
        ball
    }

    #[test]
    fn test_head_on_swaps_velocities() {
        let mut a = moving_ball(BallColor::White, Vec2::new(500.0, 400.0), Vec2::new(5.0, 0.0));
        let mut b = moving_ball(BallColor::Red, Vec2::new(538.0, 400.0), Vec2::new(-5.0, 0.0));

        let impact = resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS);
        assert_eq!(impact, Some(10.0));

        let expected = 5.0 * (1.0 - LOSS);
        assert!((a.vel.x + expected).abs() < 1e-4);
        assert!(a.vel.y.abs() < 1e-4);
        assert!((b.vel.x - expected).abs() < 1e-4);
        assert!(b.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_glancing_keeps_tangential() {
        // Cue ball moving up-right hits a resting ball directly to its right
        let mut a = moving_ball(BallColor::White, Vec2::new(100.0, 100.0), Vec2::new(4.0, 3.0));
        let mut b = Ball::new(BallColor::Yellow, Vec2::new(137.0, 100.0));

        resolve_ball_pair(&mut a, &mut b, DIAMETER, 0.0).unwrap();
        // Normal is the x axis: x momentum transfers, y stays with the cue ball
        assert!(a.vel.x.abs() < 1e-4);
        assert!((a.vel.y - 3.0).abs() < 1e-4);
        assert!((b.vel.x - 4.0).abs() < 1e-4);
        assert!(b.vel.y.abs() < 1e-4);
        assert!(b.moving);
    }

    #[test]
    fn test_overlap_corrected_symmetrically() {
        let mut a = moving_ball(BallColor::White, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
        let mut b = Ball::new(BallColor::Red, Vec2::new(130.0, 100.0));
        let center = (a.pos + b.pos) / 2.0;

        resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS).unwrap();
        assert!((a.pos.distance(b.pos) - DIAMETER).abs() < 1e-3);
        assert!(((a.pos + b.pos) / 2.0).distance(center) < 1e-4);
    }

    #[test]
    fn test_coincident_centers_do_not_produce_nan() {
        let mut a = moving_ball(BallColor::White, Vec2::new(200.0, 200.0), Vec2::new(3.0, 1.0));
        let mut b = Ball::new(BallColor::Red, Vec2::new(200.0, 200.0));

        // Falls back to the x axis; `a` already moves along +x so it separates
        resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!((a.pos.distance(b.pos) - DIAMETER).abs() < 1e-3);
    }

    #[test]
    fn test_resting_or_hidden_pairs_ignored() {
        let mut a = Ball::new(BallColor::Red, Vec2::new(100.0, 100.0));
        let mut b = Ball::new(BallColor::Yellow, Vec2::new(120.0, 100.0));
        assert_eq!(resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS), None);

        a.set_velocity(Vec2::new(1.0, 0.0));
        b.hide();
        assert_eq!(resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS), None);
    }

    #[test]
    fn test_touching_but_separating_is_not_a_hit() {
        // Resting ball exactly one diameter away, cue ball leaving it
        let mut a = moving_ball(BallColor::White, Vec2::new(662.0, 400.0), Vec2::new(-5.0, 0.0));
        let mut b = Ball::new(BallColor::Yellow, Vec2::new(700.0, 400.0));

        assert_eq!(resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS), None);
        assert_eq!(a.vel, Vec2::new(-5.0, 0.0));
        assert_eq!(b.vel, Vec2::ZERO);
        assert!(!b.moving);
    }

    #[test]
    fn test_overlapping_but_separating_is_pushed_apart() {
        let mut a = moving_ball(BallColor::White, Vec2::new(100.0, 100.0), Vec2::new(-2.0, 0.0));
        let mut b = Ball::new(BallColor::Red, Vec2::new(130.0, 100.0));

        assert_eq!(resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS), None);
        assert!((a.pos.distance(b.pos) - DIAMETER).abs() < 1e-3);
        assert_eq!(a.vel, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_separated_pair_no_contact() {
        let mut a = moving_ball(BallColor::White, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
        let mut b = Ball::new(BallColor::Red, Vec2::new(138.5, 100.0));
        assert_eq!(resolve_ball_pair(&mut a, &mut b, DIAMETER, LOSS), None);
    }

    #[test]
    fn test_cushion_look_ahead() {
        let min = Vec2::new(76.0, 76.0);
        let max = Vec2::new(1424.0, 749.0);

        // Still inside now, but the next step would cross the left cushion
        let mut ball = moving_ball(BallColor::Red, Vec2::new(80.0, 300.0), Vec2::new(-10.0, 0.0));
        let impact = resolve_cushions(&mut ball, min, max, FRICTION, LOSS);
        assert!(impact.is_some());
        assert!(ball.vel.x > 0.0);
        assert!((ball.vel.x - 10.0 * (1.0 - LOSS)).abs() < 1e-4);
        assert!(ball.pos.x > min.x);

        ball.update(FRICTION, 0.05);
        assert!(ball.pos.x > min.x);
    }

    #[test]
    fn test_cushion_untouched_when_clear() {
        let min = Vec2::new(76.0, 76.0);
        let max = Vec2::new(1424.0, 749.0);
        let mut ball = moving_ball(BallColor::Red, Vec2::new(500.0, 300.0), Vec2::new(-10.0, 4.0));
        assert_eq!(resolve_cushions(&mut ball, min, max, FRICTION, LOSS), None);
        assert_eq!(ball.vel, Vec2::new(-10.0, 4.0));
    }

    #[test]
    fn test_pocket_boundary_inclusive() {
        let pockets = [Vec2::new(62.0, 62.0), Vec2::new(750.0, 32.0)];
        assert_eq!(pocket_containing(Vec2::new(108.0, 62.0), &pockets, 46.0), Some(0));
        assert_eq!(pocket_containing(Vec2::new(108.01, 62.0), &pockets, 46.0), None);
        assert_eq!(pocket_containing(Vec2::new(750.0, 70.0), &pockets, 46.0), Some(1));
    }
}
