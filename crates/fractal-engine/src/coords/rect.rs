use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Shrinks the rect by `d` on every side; size never goes negative.
    #[inline]
    pub fn inset(self, d: f32) -> Rect {
        Rect::new(
            self.origin.x + d,
            self.origin.y + d,
            (self.size.x - 2.0 * d).max(0.0),
            (self.size.y - 2.0 * d).max(0.0),
        )
    }

    /// Splits off a column of width `w` on the left; returns `(left, rest)`.
    #[inline]
    pub fn split_left(self, w: f32) -> (Rect, Rect) {
        let w = w.clamp(0.0, self.size.x);
        (
            Rect::new(self.origin.x, self.origin.y, w, self.size.y),
            Rect::new(self.origin.x + w, self.origin.y, self.size.x - w, self.size.y),
        )
    }

    /// Same origin and height, width scaled by `t` in [0, 1].
    #[inline]
    pub fn with_width_fraction(self, t: f32) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.size.x * t.clamp(0.0, 1.0), self.size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    // ── inset / split ─────────────────────────────────────────────────────

    #[test]
    fn inset_shrinks_every_side() {
        assert_eq!(r(0.0, 0.0, 100.0, 40.0).inset(8.0), r(8.0, 8.0, 84.0, 24.0));
    }

    #[test]
    fn inset_clamps_to_zero() {
        assert!(r(0.0, 0.0, 10.0, 10.0).inset(20.0).is_empty());
    }

    #[test]
    fn split_left_partitions_width() {
        let (left, rest) = r(10.0, 0.0, 100.0, 20.0).split_left(30.0);
        assert_eq!(left, r(10.0, 0.0, 30.0, 20.0));
        assert_eq!(rest, r(40.0, 0.0, 70.0, 20.0));
    }

    #[test]
    fn width_fraction_is_clamped() {
        let track = r(0.0, 0.0, 200.0, 10.0);
        assert_eq!(track.with_width_fraction(0.25).size.x, 50.0);
        assert_eq!(track.with_width_fraction(2.0).size.x, 200.0);
    }
}
