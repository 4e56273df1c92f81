//! Points and the distance/mean primitives the clustering steps are built on.

use std::fmt;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// Compute the squared Euclidean distance between two points.
/// Using squared distance to avoid unnecessary sqrt computations during comparisons.
#[inline]
pub fn distance_sq(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Incremental coordinate-wise mean.
///
/// Each point is folded in as `m += p / n - m / n`, so the running value stays
/// within the range of the points seen and never overflows for finite input,
/// even near `f64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    mean: Point,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, p: &Point) {
        self.count += 1;
        let n = self.count as f64;
        self.mean.x += p.x / n - self.mean.x / n;
        self.mean.y += p.y / n - self.mean.y / n;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The mean so far, or `None` if nothing was pushed.
    pub fn get(&self) -> Option<Point> {
        (self.count > 0).then_some(self.mean)
    }
}

/// Coordinate-wise arithmetic mean, or `None` for an empty input.
pub fn mean<'a, I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut acc = RunningMean::default();
    for p in points {
        acc.push(p);
    }
    acc.get()
}

/// Index of the point nearest to `target` together with the squared distance.
/// Ties go to the lowest index. Returns `None` when `candidates` is empty.
pub(crate) fn nearest(target: &Point, candidates: &[Point]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, c) in candidates.iter().enumerate() {
        let dist = distance_sq(target, c);
        match best {
            // strict comparison keeps the earliest index on ties
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best
}
