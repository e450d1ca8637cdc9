//! Collision detection between circles and axis-aligned rectangles
//!
//! Entities are reinterpreted as primitives on demand: the player, holes and
//! goals as circles, walls as rectangles. Rotation is ignored here, so a
//! rotated wall collides as its unrotated box.

use glam::Vec2;

use super::state::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

/// Result of a circle/rectangle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the rectangle to the circle center
    pub point: Vec2,
    /// Unit normal pointing from the rectangle toward the circle
    pub normal: Vec2,
    /// Penetration depth
    pub penetration: f32,
}

impl Entity {
    /// Conservative circle: diameter is the smaller extent
    pub fn to_circle(&self) -> Circle {
        Circle {
            center: self.position,
            radius: self.scale.x.min(self.scale.y) / 2.0,
        }
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle {
            center: self.position,
            width: self.scale.x,
            height: self.scale.y,
        }
    }
}

/// Check a circle against an axis-aligned rectangle
///
/// Returns `None` when they don't touch. When the circle center is inside
/// the rectangle the normal falls back to the axis with the smaller
/// penetration, pointing toward the side the center is closest to.
pub fn circle_rectangle_contact(circle: Circle, rect: Rectangle) -> Option<Contact> {
    let half = Vec2::new(rect.width / 2.0, rect.height / 2.0);
    let diff = circle.center - rect.center;
    let clamped = diff.clamp(-half, half);
    let closest = rect.center + clamped;

    // Exactly zero when the center is inside
    let to_circle = diff - clamped;
    let distance_sq = to_circle.length_squared();
    if distance_sq > circle.radius * circle.radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    if distance != 0.0 {
        return Some(Contact {
            point: closest,
            normal: to_circle / distance,
            penetration: circle.radius - distance,
        });
    }

    // Center is inside the rectangle
    let pen_x = half.x - diff.x.abs();
    let pen_y = half.y - diff.y.abs();
    let normal = if pen_x < pen_y {
        Vec2::new(if diff.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if diff.y < 0.0 { -1.0 } else { 1.0 })
    };

    Some(Contact {
        point: closest,
        normal,
        penetration: pen_x.min(pen_y),
    })
}

/// True iff the circles touch or overlap
#[inline]
pub fn circles_overlap(a: Circle, b: Circle) -> bool {
    let radius_sum = a.radius + b.radius;
    a.center.distance_squared(b.center) <= radius_sum * radius_sum
}
