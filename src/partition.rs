//! Recursive bisection of the board into pieces.
//!
//! Starting from a single group holding every cell, the largest group is
//! repeatedly cut in two along its longer bounding-box axis until the
//! requested number of groups exists.

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::cell::CellCoord;
use crate::grid::all_coords;

/// Clamps a requested piece count to what a `size x size` board can hold.
pub fn clamp_piece_count(size: usize, piece_count: usize) -> usize {
    piece_count.clamp(1, (size * size).max(1))
}

/// Splits the board into `piece_count` coordinate groups.
///
/// `piece_count` is clamped with [`clamp_piece_count`]. Groups keep
/// row-major order internally; new halves are appended to the end of the
/// list, the lower half first.
pub fn partition<R: Rng>(size: usize, piece_count: usize, rng: &mut R) -> Vec<Vec<CellCoord>> {
    let target = clamp_piece_count(size, piece_count);
    let mut groups: Vec<Vec<CellCoord>> = vec![all_coords(size).collect()];

    while groups.len() < target {
        let largest = index_of_largest(&groups);
        let group = groups.remove(largest);
        let (lower, upper) = bisect(group, rng);

        // both halves are non-empty whenever the group has two or more cells
        for half in [lower, upper] {
            if !half.is_empty() {
                groups.push(half);
            }
        }
    }

    groups
}

/// Index of the group with the most cells; the first one wins ties.
fn index_of_largest(groups: &[Vec<CellCoord>]) -> usize {
    let mut best = 0;
    for (index, group) in groups.iter().enumerate() {
        if group.len() > groups[best].len() {
            best = index;
        }
    }
    best
}

/// Cuts a group across its longer bounding-box axis at a random line.
///
/// The last column (or row) of the lower half is drawn uniformly from
/// `[min, min + extent)`, so neither half is ever empty.
fn bisect<R: Rng>(group: Vec<CellCoord>, rng: &mut R) -> (Vec<CellCoord>, Vec<CellCoord>) {
    let (min_x, max_x) = extent(&group, |coord| coord.x);
    let (min_y, max_y) = extent(&group, |coord| coord.y);
    let width = max_x - min_x;
    let height = max_y - min_y;

    if width == 0 && height == 0 {
        return (group, Vec::new());
    }

    let split_on_x = width > height;
    let (min, span) = if split_on_x {
        (min_x, width)
    } else {
        (min_y, height)
    };
    let last_lower = min + rng.random_range(0..span);

    group.into_iter().partition(|coord| {
        let position = if split_on_x { coord.x } else { coord.y };
        position <= last_lower
    })
}

/// (min, max) of one axis over a non-empty group.
fn extent(group: &[CellCoord], axis: impl Fn(&CellCoord) -> i32) -> (i32, i32) {
    group.iter().map(&axis).fold((i32::MAX, i32::MIN), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    })
}

/// Asserts that the groups cover every board cell exactly once.
///
/// # Panics
/// Panics on a duplicated, missing or out-of-range coordinate.
pub fn assert_exact_cover(size: usize, groups: &[Vec<CellCoord>]) {
    let mut seen: FxHashSet<CellCoord> = FxHashSet::default();
    for coord in groups.iter().flatten() {
        assert!(
            crate::grid::in_bounds(size, *coord),
            "partition produced out-of-range cell {coord}"
        );
        assert!(seen.insert(*coord), "cell {coord} appears in two groups");
    }
    assert_eq!(
        seen.len(),
        size * size,
        "partition left {} cells uncovered",
        size * size - seen.len()
    );
}
