use std::convert::TryFrom;
use std::ops::{Add, Sub};

/// Integer coordinates as they appear in problem and pose files.
pub type GridPoint = [i64; 2];

/// Grid coordinates stay within `±MAX_COORDINATE`, so squared lengths and
/// cross products fit an `i64` and are exact as `f64`.
pub const MAX_COORDINATE: i64 = 1 << 24;

pub fn in_range(p: GridPoint) -> bool {
    p.iter().all(|c| c.abs() <= MAX_COORDINATE)
}

// Halves go up, so -2.5 settles on -2.
fn snap(v: f64) -> i64 {
    let limit = MAX_COORDINATE as f64;
    (v + 0.5).floor().max(-limit).min(limit) as i64
}

/// A live position on the board. Settled positions are always integral,
/// a vertex being dragged may sit anywhere in between.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn from_grid([x, y]: GridPoint) -> Self {
        Point {
            x: x as f64,
            y: y as f64,
        }
    }

    /// Nearest grid point, clamped to the coordinate range.
    pub fn to_grid(self) -> GridPoint {
        [snap(self.x), snap(self.y)]
    }

    pub fn rounded(self) -> Self {
        Point::from_grid(self.to_grid())
    }

    pub fn is_integral(self) -> bool {
        self.x.fract() == 0.0 && self.y.fract() == 0.0
    }
}

impl From<GridPoint> for Point {
    fn from(p: GridPoint) -> Self {
        Point::from_grid(p)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

pub fn squared_distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Exact for in-range points; saturates at `i64::MAX` beyond that.
pub fn grid_squared_distance(a: GridPoint, b: GridPoint) -> i64 {
    let dx = a[0] as i128 - b[0] as i128;
    let dy = a[1] as i128 - b[1] as i128;
    i64::try_from(dx * dx + dy * dy).unwrap_or(i64::MAX)
}
