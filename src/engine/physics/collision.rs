use super::body::KinematicBody;
use crate::core::Rect;

/// Push the body out of every collider it overlaps along X.
///
/// Moving right snaps the body's right edge to the collider's left edge, moving
/// left snaps its left edge to the collider's right edge. A body with no
/// horizontal velocity is left where it is. Returns whether any push happened.
pub fn resolve_horizontal(body: &mut KinematicBody, colliders: &[Rect]) -> bool {
    let dx = body.velocity.x;
    let mut pushed = false;

    for collider in colliders {
        if !body.aabb().overlaps(collider) {
            continue;
        }

        if dx > 0.0 {
            body.position.x = collider.min.x - body.size.x;
            pushed = true;
        } else if dx < 0.0 {
            body.position.x = collider.max.x;
            pushed = true;
        }
    }

    pushed
}

/// Push the body out of every collider it overlaps along Y.
///
/// Falling lands the body on the collider's top edge and marks it grounded;
/// rising bumps its head on the collider's bottom edge. Any push stops
/// vertical motion.
pub fn resolve_vertical(body: &mut KinematicBody, colliders: &[Rect]) -> bool {
    let dy = body.velocity.y;
    let mut pushed = false;
    let mut landed = false;

    for collider in colliders {
        if !body.aabb().overlaps(collider) {
            continue;
        }

        if dy > 0.0 {
            body.position.y = collider.min.y - body.size.y;
            landed = true;
            pushed = true;
        } else if dy < 0.0 {
            body.position.y = collider.max.y;
            pushed = true;
        }
    }

    if pushed {
        body.velocity.y = 0.0;
    }
    body.grounded = landed;

    pushed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn body_at(x: f32, y: f32) -> KinematicBody {
        KinematicBody::new(Vec2::new(x, y), Vec2::splat(16.0))
    }

    #[test]
    fn test_moving_right_stops_at_left_edge() {
        let wall = Rect::new(50.0, 0.0, 66.0, 100.0);
        let mut body = body_at(34.0, 10.0);
        body.velocity.x = 2.0;
        body.integrate_horizontal();

        assert!(resolve_horizontal(&mut body, &[wall]));
        assert_relative_eq!(body.aabb().max.x, 50.0);
    }

    #[test]
    fn test_moving_left_stops_at_right_edge() {
        let wall = Rect::new(0.0, 0.0, 20.0, 100.0);
        let mut body = body_at(21.0, 10.0);
        body.velocity.x = -2.0;
        body.integrate_horizontal();

        assert!(resolve_horizontal(&mut body, &[wall]));
        assert_relative_eq!(body.position.x, 20.0);
    }

    #[test]
    fn test_horizontal_without_motion_leaves_body() {
        let wall = Rect::new(0.0, 0.0, 20.0, 100.0);
        let mut body = body_at(10.0, 10.0);

        assert!(!resolve_horizontal(&mut body, &[wall]));
        assert_relative_eq!(body.position.x, 10.0);
    }

    #[test]
    fn test_landing_grounds_body() {
        let floor = Rect::new(0.0, 200.0, 320.0, 216.0);
        let mut body = body_at(30.0, 186.0);
        body.velocity.y = 120.0;

        assert!(resolve_vertical(&mut body, &[floor]));
        assert_relative_eq!(body.position.y, 184.0);
        assert_relative_eq!(body.velocity.y, 0.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_head_bump_stops_rise() {
        let ceiling = Rect::new(0.0, 0.0, 320.0, 16.0);
        let mut body = body_at(30.0, 10.0);
        body.velocity.y = -200.0;

        assert!(resolve_vertical(&mut body, &[ceiling]));
        assert_relative_eq!(body.position.y, 16.0);
        assert_relative_eq!(body.velocity.y, 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_airborne_without_contact() {
        let floor = Rect::new(0.0, 200.0, 320.0, 216.0);
        let mut body = body_at(30.0, 100.0);
        body.velocity.y = 50.0;
        body.grounded = true;

        assert!(!resolve_vertical(&mut body, &[floor]));
        assert!(!body.grounded);
        assert_relative_eq!(body.velocity.y, 50.0);
    }

    #[test]
    fn test_resting_on_floor_stays_grounded_each_tick() {
        let floor = Rect::new(0.0, 200.0, 320.0, 216.0);
        let mut body = body_at(30.0, 184.0);

        for _ in 0..10 {
            body.apply_gravity(800.0, 1.0 / 60.0, 300.0);
            body.integrate_vertical(1.0 / 60.0);
            resolve_vertical(&mut body, &[floor]);
            assert!(body.grounded);
            assert_relative_eq!(body.position.y, 184.0);
        }
    }

    #[test]
    fn test_colliders_resolved_in_order() {
        let a = Rect::new(50.0, 0.0, 66.0, 100.0);
        let b = Rect::new(40.0, 0.0, 45.0, 100.0);
        let mut body = body_at(36.0, 10.0);
        body.velocity.x = 2.0;

        resolve_horizontal(&mut body, &[a, b]);
        assert_relative_eq!(body.position.x, 24.0);
    }
}
