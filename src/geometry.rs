//! Axis-aligned rectangles for layout queries
//!
//! Rectangles come straight from the host's bounding-box queries (client
//! coordinates) and are never cached between calls.

use glam::Vec2;

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            origin: self.origin - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Express this rectangle relative to `frame`'s top-left corner
    pub fn relative_to(&self, frame: &Rect) -> Self {
        Self {
            origin: self.origin - frame.origin,
            size: self.size,
        }
    }

    /// Edge-inclusive overlap test (touching rectangles count as overlapping)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }

    /// Edge-inclusive point test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Distance from `point` to the rectangle's centre
    #[inline]
    pub fn distance_to_center(&self, point: Vec2) -> f32 {
        self.center().distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(60.0, 40.0));
    }

    #[test]
    fn test_expand() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0).expand(5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 30.0, 30.0));
    }

    #[test]
    fn test_intersects_is_edge_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let apart = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(!apart.intersects(&a));
    }

    #[test]
    fn test_relative_to() {
        let frame = Rect::new(100.0, 50.0, 400.0, 300.0);
        let child = Rect::new(150.0, 80.0, 20.0, 10.0);
        assert_eq!(child.relative_to(&frame), Rect::new(50.0, 30.0, 20.0, 10.0));
    }

    #[test]
    fn test_distance_to_center() {
        let r = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!((r.distance_to_center(Vec2::new(13.0, 14.0)) - 5.0).abs() < 1e-5);
        assert!(r.contains(Vec2::new(20.0, 0.0)));
    }
}
