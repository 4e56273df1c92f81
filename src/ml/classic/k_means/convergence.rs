//! Stopping test for the iteration loop.

use super::geometry::{distance_sq, Point};

/// Largest distance any centroid moved between `before` and `after`.
pub fn max_shift(before: &[Point], after: &[Point]) -> f64 {
    before
        .iter()
        .zip(after)
        .map(|(a, b)| distance_sq(a, b))
        .fold(0.0_f64, f64::max)
        .sqrt()
}

/// Decide whether an iteration changed nothing that matters.
///
/// Converged when no centroid moved further than `tolerance`, or when the
/// assignment is identical to the previous step's. `previous_assignment` is
/// `None` on the first step of a run, where only the centroid test applies.
pub fn has_converged(
    before: &[Point],
    after: &[Point],
    previous_assignment: Option<&[usize]>,
    assignment: &[usize],
    tolerance: f64,
) -> bool {
    if before.len() != after.len() {
        return false;
    }
    if previous_assignment == Some(assignment) {
        return true;
    }
    max_shift(before, after) <= tolerance
}
