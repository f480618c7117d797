//! Diagonal corner cuts between neighbouring pieces.
//!
//! A cut takes one full cell out of a piece, splits it along a diagonal and
//! hands each triangle to the piece owning the neighbouring cell in that
//! triangle's direction. When both triangles end up in the same piece the
//! cell becomes full again inside that piece.

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cell::{CellCoord, CellValue, Side};
use crate::grid::in_bounds;
use crate::pieces::CoordinateGroup;

/// Default retry budget for one cut pass.
pub const DEFAULT_MAX_CUT_ATTEMPTS: usize = 1_000;

/// Summary of one cut pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CutOutcome {
    /// Cuts that passed the feasibility check.
    pub cuts: usize,
    /// Attempts made, successful or not.
    pub attempts: usize,
    /// Triangles that found no compatible receiving piece.
    pub dropped_halves: usize,
    /// True if the attempt budget ran out before `cuts` reached the target.
    pub exhausted: bool,
}

/// One triangle of a planned cut: which half, where it goes, and from which
/// side of the source cell it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Graft {
    half: CellValue,
    target: CellCoord,
    side: Side,
}

/// Turns partition output into groups with every cell `Filled`.
pub fn fill_groups(groups: Vec<Vec<CellCoord>>) -> Vec<CoordinateGroup> {
    groups
        .into_iter()
        .map(|coords| {
            coords
                .into_iter()
                .map(|coord| (coord, CellValue::Filled))
                .collect()
        })
        .collect()
}

/// Performs up to `cross_count` corner cuts on `groups`.
///
/// Each attempt picks a random group, a random cell in it and a random half.
/// Attempts on a cell that is not `Filled`, or whose diagonal would need a
/// neighbour outside the board on both of a triangle's sides, make no
/// progress. A feasible cut always counts, even when one of its triangles
/// finds no piece to graft onto.
pub fn assign_corner_cuts<R: Rng>(
    groups: &mut [CoordinateGroup],
    size: usize,
    cross_count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> CutOutcome {
    let mut outcome = CutOutcome::default();
    if groups.is_empty() {
        outcome.exhausted = cross_count > 0;
        return outcome;
    }

    while outcome.cuts < cross_count {
        if outcome.attempts >= max_attempts {
            outcome.exhausted = true;
            break;
        }
        outcome.attempts += 1;

        let group_index = rng.random_range(0..groups.len());
        let mut keys: Vec<CellCoord> = groups[group_index].keys().copied().collect();
        if keys.is_empty() {
            continue;
        }
        keys.sort_unstable();
        let source = keys[rng.random_range(0..keys.len())];
        let half = CellValue::HALVES[rng.random_range(0..CellValue::HALVES.len())];

        if groups[group_index][&source] != CellValue::Filled {
            continue;
        }
        let Some(plan) = plan_cut(size, source, half) else {
            debug!("cut at {} with {:?} does not fit the board edge", source, half);
            continue;
        };

        groups[group_index].remove(&source);
        for graft in plan {
            if !graft_half(groups, source, graft) {
                outcome.dropped_halves += 1;
                debug!(
                    "no piece accepts {:?} of {} from the {:?} side",
                    graft.half, source, graft.side
                );
            }
        }
        outcome.cuts += 1;
    }

    outcome
}

/// Works out where the two triangles of a cut at `source` go.
///
/// `half` only selects the diagonal: top-left/bottom-right or
/// top-right/bottom-left. Each triangle prefers its vertical neighbour and
/// falls back to the horizontal one; `None` if both are off the board.
fn plan_cut(size: usize, source: CellCoord, half: CellValue) -> Option<[Graft; 2]> {
    let on_board = |side: Side| in_bounds(size, source.step(side));
    let toward = |half: CellValue, primary: Side, fallback: Side| {
        let side = if on_board(primary) {
            primary
        } else if on_board(fallback) {
            fallback
        } else {
            return None;
        };
        Some(Graft {
            half,
            target: source.step(side),
            side,
        })
    };

    match half {
        CellValue::TopLeft | CellValue::BottomRight => Some([
            toward(CellValue::TopLeft, Side::Top, Side::Left)?,
            toward(CellValue::BottomRight, Side::Bottom, Side::Right)?,
        ]),
        CellValue::TopRight | CellValue::BottomLeft => Some([
            toward(CellValue::TopRight, Side::Top, Side::Right)?,
            toward(CellValue::BottomLeft, Side::Bottom, Side::Left)?,
        ]),
        CellValue::Empty | CellValue::Filled => None,
    }
}

/// Hands one triangle of `source` to the first compatible piece owning the
/// graft target. Returns false if no piece accepts it.
///
/// A piece is incompatible when its value at the target is a triangle along
/// the side the graft comes from. If the accepting piece already holds the
/// sibling triangle of `source`, the cell is made whole in that piece.
fn graft_half(groups: &mut [CoordinateGroup], source: CellCoord, graft: Graft) -> bool {
    for group in groups.iter_mut() {
        let Some(&existing) = group.get(&graft.target) else {
            continue;
        };
        if existing.touches(graft.side) {
            continue;
        }

        match group.get_mut(&source) {
            Some(value) => *value = CellValue::Filled,
            None => {
                group.insert(source, graft.half);
            }
        }
        return true;
    }
    false
}

/// Whether the groups add up to exactly one full cell at every coordinate.
///
/// This holds right after partitioning and is what makes the solved layout
/// reachable; a dropped triangle breaks it.
pub fn covers_exactly(size: usize, groups: &[CoordinateGroup]) -> bool {
    let mut sums: FxHashMap<CellCoord, u8> = FxHashMap::default();
    for (&coord, &value) in groups.iter().flatten() {
        if !in_bounds(size, coord) {
            return false;
        }
        *sums.entry(coord).or_default() += value as u8;
    }
    sums.len() == size * size && sums.values().all(|&sum| sum == CellValue::Filled as u8)
}
