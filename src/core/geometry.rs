//! # Geometry
//!
//! Screen rectangles and travel directions. Coordinates are whatever unit
//! the host renders in (pixels on a TV, cells in a terminal); the engine
//! only compares them with each other.

/// Axis-aligned rectangle in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    // Edges are i64 so rectangles near the i32 limits never overflow.

    pub fn left(&self) -> i64 {
        self.x as i64
    }

    pub fn top(&self) -> i64 {
        self.y as i64
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Horizontal centre, in half-units so odd widths stay exact.
    pub fn center_x2(&self) -> i64 {
        2 * self.x as i64 + self.w as i64
    }

    /// Vertical centre, in half-units.
    pub fn center_y2(&self) -> i64 {
        2 * self.y as i64 + self.h as i64
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x2() as f64 / 2.0, self.center_y2() as f64 / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// One of the four D-pad directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if `candidate` lies on this side of `from`, measured against
    /// `from`'s centre line.
    pub fn admits(&self, from: &Bounds, candidate: &Bounds) -> bool {
        match self {
            Direction::Right => 2 * candidate.left() >= from.center_x2(),
            Direction::Left => 2 * candidate.right() <= from.center_x2(),
            Direction::Down => 2 * candidate.top() >= from.center_y2(),
            Direction::Up => 2 * candidate.bottom() <= from.center_y2(),
        }
    }

    /// Edge gap from `from` to `candidate` along the direction of travel.
    /// Overlapping rectangles count as zero.
    pub fn primary_gap(&self, from: &Bounds, candidate: &Bounds) -> f64 {
        let gap = match self {
            Direction::Right => candidate.left() - from.right(),
            Direction::Left => from.left() - candidate.right(),
            Direction::Down => candidate.top() - from.bottom(),
            Direction::Up => from.top() - candidate.bottom(),
        };
        gap.max(0) as f64
    }

    /// Centre misalignment on the axis perpendicular to travel.
    pub fn secondary_offset(&self, from: &Bounds, candidate: &Bounds) -> f64 {
        let delta2 = if self.is_horizontal() {
            candidate.center_y2() - from.center_y2()
        } else {
            candidate.center_x2() - from.center_x2()
        };
        delta2.abs() as f64 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_edges() {
        let b = Bounds::new(10, 20, 100, 50);
        assert_eq!(b.right(), 110);
        assert_eq!(b.bottom(), 70);
        assert_eq!(b.center(), (60.0, 45.0));
        assert!(!b.is_empty());
        assert!(Bounds::new(0, 0, 0, 10).is_empty());
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let far_right = Bounds::new(i32::MAX - 50, 0, 100, 100);
        let far_left = Bounds::new(i32::MIN, 0, 100, 100);
        assert_eq!(far_right.right(), i32::MAX as i64 + 50);

        let expected = (i32::MAX as i64 - 50) - (i32::MIN as i64 + 100);
        assert!(Direction::Left.admits(&far_right, &far_left));
        assert_eq!(Direction::Left.primary_gap(&far_right, &far_left), expected as f64);
        assert!(Direction::Right.admits(&far_left, &far_right));
        assert_eq!(Direction::Right.primary_gap(&far_left, &far_right), expected as f64);

        let low = Bounds::new(0, i32::MAX, 10, i32::MAX);
        assert_eq!(low.bottom(), 2 * i32::MAX as i64);
        assert!(Direction::Down.admits(&Bounds::new(0, i32::MIN, 10, 10), &low));
        assert!(Direction::Up.primary_gap(&low, &Bounds::new(0, i32::MIN, 10, 10)) > 0.0);
    }

    #[test]
    fn test_odd_width_center_is_exact() {
        let b = Bounds::new(0, 0, 3, 5);
        assert_eq!(b.center(), (1.5, 2.5));
    }

    #[test]
    fn test_admits_right_uses_center_line() {
        let from = Bounds::new(0, 0, 100, 100);
        // Left edge exactly on the centre line still counts
        assert!(Direction::Right.admits(&from, &Bounds::new(50, 0, 100, 100)));
        assert!(!Direction::Right.admits(&from, &Bounds::new(49, 0, 100, 100)));
        assert!(!Direction::Right.admits(&from, &Bounds::new(-200, 0, 100, 100)));
    }

    #[test]
    fn test_admits_each_side() {
        let from = Bounds::new(100, 100, 100, 100);
        let above = Bounds::new(100, 0, 100, 100);
        let below = Bounds::new(100, 200, 100, 100);
        let left = Bounds::new(0, 100, 100, 100);
        let right = Bounds::new(200, 100, 100, 100);

        assert!(Direction::Up.admits(&from, &above));
        assert!(!Direction::Up.admits(&from, &below));
        assert!(Direction::Down.admits(&from, &below));
        assert!(!Direction::Down.admits(&from, &above));
        assert!(Direction::Left.admits(&from, &left));
        assert!(!Direction::Left.admits(&from, &right));
        assert!(Direction::Right.admits(&from, &right));
        assert!(!Direction::Right.admits(&from, &left));
    }

    #[test]
    fn test_gap_and_offset() {
        let from = Bounds::new(0, 0, 100, 100);
        let cand = Bounds::new(200, 30, 100, 100);
        assert_eq!(Direction::Right.primary_gap(&from, &cand), 100.0);
        assert_eq!(Direction::Right.secondary_offset(&from, &cand), 30.0);

        // Overlap clamps to zero
        let overlapping = Bounds::new(60, 0, 100, 100);
        assert_eq!(Direction::Right.primary_gap(&from, &overlapping), 0.0);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert!(Direction::Left.is_horizontal());
        assert!(Direction::Down.is_vertical());
    }
}
