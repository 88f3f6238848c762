//! Collision tests and responses
//!
//! Bricks use a center-point test: the ball breaks a brick when its center
//! is strictly inside the brick. Buildings use a circle/rectangle overlap and
//! push the ball out along the shallowest face.

use glam::Vec2;

use super::rect::Rect;
use super::state::Ball;

/// Face of a building the ball was pushed out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Left,
    Right,
}

/// Result of a ball/building overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingContact {
    pub face: Face,
    /// Overlap depth along the face normal
    pub penetration: f32,
}

/// Ball center strictly inside the brick
#[inline]
pub fn ball_hits_brick(ball_pos: Vec2, brick: &Rect) -> bool {
    brick.contains_strict(ball_pos)
}

/// Check ball against a building standing on the floor.
///
/// Buildings have no exposed bottom face, so only top, left and right
/// penetration depths are compared.
pub fn ball_building_collision(ball_pos: Vec2, radius: f32, building: &Rect) -> Option<BuildingContact> {
    if !building.overlaps_circle(ball_pos, radius) {
        return None;
    }

    let top = (ball_pos.y + radius) - building.top();
    let left = (ball_pos.x + radius) - building.left();
    let right = building.right() - (ball_pos.x - radius);

    let (face, penetration) = if top <= left && top <= right {
        (Face::Top, top)
    } else if left <= right {
        (Face::Left, left)
    } else {
        (Face::Right, right)
    };

    Some(BuildingContact { face, penetration })
}

/// Reflect the ball off a building face and place it flush against it
pub fn resolve_building_contact(ball: &mut Ball, building: &Rect, contact: BuildingContact) {
    match contact.face {
        Face::Top => {
            ball.vel.y = -ball.vel.y.abs();
            ball.pos.y = building.top() - ball.radius;
        }
        Face::Left => {
            ball.vel.x = -ball.vel.x.abs();
            ball.pos.x = building.left() - ball.radius;
        }
        Face::Right => {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = building.right() + ball.radius;
        }
    }
}

/// In-grid orthogonal neighbours: left, right, up, down
pub fn orthogonal_neighbors(col: usize, row: usize, columns: usize, rows: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(4);
    if col > 0 {
        out.push((col - 1, row));
    }
    if col + 1 < columns {
        out.push((col + 1, row));
    }
    if row > 0 {
        out.push((col, row - 1));
    }
    if row + 1 < rows {
        out.push((col, row + 1));
    }
    out
}

/// Next step would cross a side wall while moving toward it
pub fn side_wall_hit(pos: Vec2, vel: Vec2, radius: f32, width: f32) -> bool {
    let next_x = pos.x + vel.x;
    (next_x > width - radius && vel.x > 0.0) || (next_x < radius && vel.x < 0.0)
}

/// Next step would cross the ceiling while moving up
pub fn ceiling_hit(pos: Vec2, vel: Vec2, radius: f32) -> bool {
    pos.y + vel.y < radius && vel.y < 0.0
}

/// Next step would enter the floor band while moving down
pub fn floor_reached(pos: Vec2, vel: Vec2, radius: f32, height: f32) -> bool {
    pos.y + vel.y > height - radius && vel.y > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            radius: 10.0,
            cheat_armed: false,
        }
    }

    #[test]
    fn test_ball_hits_brick_center_only() {
        let brick = Rect::new(30.0, 30.0, 55.0, 20.0);
        assert!(ball_hits_brick(Vec2::new(50.0, 40.0), &brick));
        // Ball edge overlaps, center outside: no hit
        assert!(!ball_hits_brick(Vec2::new(50.0, 25.0), &brick));
    }

    #[test]
    fn test_building_top_contact() {
        let building = Rect::new(100.0, 300.0, 60.0, 100.0);
        let mut ball = ball_at(130.0, 295.0, 2.0, 2.0);
        let contact = ball_building_collision(ball.pos, ball.radius, &building).unwrap();
        assert_eq!(contact.face, Face::Top);
        assert!((contact.penetration - 5.0).abs() < 0.001);

        resolve_building_contact(&mut ball, &building, contact);
        assert_eq!(ball.vel.y, -2.0);
        assert_eq!(ball.vel.x, 2.0);
        assert_eq!(ball.pos.y, 290.0);
    }

    #[test]
    fn test_building_side_contacts() {
        let building = Rect::new(100.0, 300.0, 60.0, 100.0);

        let mut ball = ball_at(93.0, 350.0, 2.0, 2.0);
        let contact = ball_building_collision(ball.pos, ball.radius, &building).unwrap();
        assert_eq!(contact.face, Face::Left);
        resolve_building_contact(&mut ball, &building, contact);
        assert_eq!(ball.vel.x, -2.0);
        assert_eq!(ball.pos.x, 90.0);

        let mut ball = ball_at(167.0, 350.0, -2.0, 2.0);
        let contact = ball_building_collision(ball.pos, ball.radius, &building).unwrap();
        assert_eq!(contact.face, Face::Right);
        resolve_building_contact(&mut ball, &building, contact);
        assert_eq!(ball.vel.x, 2.0);
        assert_eq!(ball.pos.x, 170.0);
    }

    #[test]
    fn test_building_miss() {
        let building = Rect::new(100.0, 300.0, 60.0, 100.0);
        assert!(ball_building_collision(Vec2::new(130.0, 280.0), 10.0, &building).is_none());
    }

    #[test]
    fn test_orthogonal_neighbors() {
        assert_eq!(
            orthogonal_neighbors(3, 2, 7, 5),
            vec![(2, 2), (4, 2), (3, 1), (3, 3)]
        );
        // Corner cell only has two neighbours
        assert_eq!(orthogonal_neighbors(0, 0, 7, 5), vec![(1, 0), (0, 1)]);
        assert_eq!(orthogonal_neighbors(6, 4, 7, 5), vec![(5, 4), (6, 3)]);
    }

    #[test]
    fn test_wall_checks_respect_direction() {
        // Moving right into the right wall
        assert!(side_wall_hit(Vec2::new(509.0, 100.0), Vec2::new(2.0, 2.0), 10.0, 520.0));
        // Already moving away
        assert!(!side_wall_hit(Vec2::new(509.0, 100.0), Vec2::new(-2.0, 2.0), 10.0, 520.0));
        assert!(ceiling_hit(Vec2::new(100.0, 11.0), Vec2::new(2.0, -2.0), 10.0));
        assert!(!ceiling_hit(Vec2::new(100.0, 11.0), Vec2::new(2.0, 2.0), 10.0));
        assert!(floor_reached(Vec2::new(100.0, 389.0), Vec2::new(2.0, 2.0), 10.0, 400.0));
        assert!(!floor_reached(Vec2::new(100.0, 389.0), Vec2::new(2.0, -2.0), 10.0, 400.0));
    }
}
