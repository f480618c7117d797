//! Puzzle generation: difficulty, partition, corner cuts, piece definitions.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::Rng;
use tracing::{info, warn};

use crate::corner_cut::{assign_corner_cuts, covers_exactly, fill_groups, DEFAULT_MAX_CUT_ATTEMPTS};
use crate::error::{Error, Result};
use crate::grid::{Grid, DEFAULT_GRID_SIZE};
use crate::partition::{assert_exact_cover, clamp_piece_count, partition};
use crate::pieces::{PieceDefinition, PieceId};

/// How hard a generated puzzle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Half-open range the piece count is drawn from.
    pub fn piece_count_range(self) -> Range<usize> {
        match self {
            Difficulty::Easy => 5..7,
            Difficulty::Medium => 7..9,
            Difficulty::Hard => 9..12,
        }
    }

    /// Half-open range the number of corner cuts is drawn from.
    pub fn cross_count_range(self) -> Range<usize> {
        match self {
            Difficulty::Easy => 0..4,
            Difficulty::Medium => 4..6,
            Difficulty::Hard => 6..8,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Inputs to [`generate_puzzle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub grid_size: usize,
    /// Forces a difficulty instead of drawing one.
    pub difficulty: Option<Difficulty>,
    /// Overrides the piece count drawn from the difficulty.
    pub piece_count: Option<usize>,
    /// Overrides the cut count drawn from the difficulty.
    pub cross_count: Option<usize>,
    /// Attempt budget of a single corner-cut pass.
    pub max_cut_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            difficulty: None,
            piece_count: None,
            cross_count: None,
            max_cut_attempts: DEFAULT_MAX_CUT_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidConfig("grid size must be at least 1".into()));
        }
        if self.max_cut_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_cut_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A freshly generated puzzle: an empty board and the pieces that fill it.
///
/// `pieces.len()` can be smaller than `piece_count`: a corner cut that
/// takes the only cell of a group leaves it empty, and empty groups are
/// discarded. Such a puzzle may end up with fewer pieces than its
/// difficulty's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub grid: Grid,
    pub pieces: Vec<PieceDefinition>,
    pub difficulty: Difficulty,
    /// Number of groups the board was partitioned into, before empty groups
    /// were dropped.
    pub piece_count: usize,
    /// Corner cuts actually applied.
    pub cross_count: usize,
}

impl Puzzle {
    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    pub fn definition(&self, id: PieceId) -> Option<&PieceDefinition> {
        self.pieces.get(id.0)
    }
}

/// Generates a puzzle.
///
/// The board is partitioned, then corner cuts are applied. If the cut pass
/// runs out of attempts, or leaves a cell whose pieces no longer add up to a
/// full cell, the whole layout is discarded and regenerated with one cut
/// fewer. With no cuts the layout is always valid, so this terminates.
pub fn generate_puzzle<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Result<Puzzle> {
    config.validate()?;
    let size = config.grid_size;

    let difficulty = match config.difficulty {
        Some(difficulty) => difficulty,
        None => Difficulty::random(rng),
    };
    let piece_count = match config.piece_count {
        Some(count) => count,
        None => rng.random_range(difficulty.piece_count_range()),
    };
    let piece_count = clamp_piece_count(size, piece_count);
    let mut cross_count = match config.cross_count {
        Some(count) => count,
        None => rng.random_range(difficulty.cross_count_range()),
    };

    loop {
        let coords = partition(size, piece_count, rng);
        assert_exact_cover(size, &coords);
        let mut groups = fill_groups(coords);

        let outcome = assign_corner_cuts(
            &mut groups,
            size,
            cross_count,
            config.max_cut_attempts,
            rng,
        );
        if outcome.exhausted || !covers_exactly(size, &groups) {
            warn!(
                "Discarding layout after {} of {} cuts in {} attempts ({} triangles dropped); retrying with {} cuts.",
                outcome.cuts,
                cross_count,
                outcome.attempts,
                outcome.dropped_halves,
                cross_count.saturating_sub(1)
            );
            debug_assert!(cross_count > 0, "uncut layouts always cover the board");
            cross_count = cross_count.saturating_sub(1);
            continue;
        }

        groups.retain(|group| !group.is_empty());
        let pieces: Vec<PieceDefinition> = groups
            .iter()
            .enumerate()
            .map(|(index, group)| PieceDefinition::from_group(PieceId(index), group))
            .collect();

        info!(
            "Generated {} puzzle on a {}x{} board: {} pieces, {} cuts.",
            difficulty,
            size,
            size,
            pieces.len(),
            cross_count
        );

        return Ok(Puzzle {
            grid: Grid::new(size)?,
            pieces,
            difficulty,
            piece_count,
            cross_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::cell::{CellCoord, CellValue};

    fn cell_sums(puzzle: &Puzzle) -> FxHashMap<CellCoord, u8> {
        let mut sums: FxHashMap<CellCoord, u8> = FxHashMap::default();
        for definition in &puzzle.pieces {
            for &(coord, value) in &definition.cells {
                *sums.entry(coord).or_default() += value as u8;
            }
        }
        sums
    }

    #[test]
    fn test_forced_easy_without_cuts() {
        let config = GeneratorConfig {
            difficulty: Some(Difficulty::Easy),
            piece_count: Some(5),
            cross_count: Some(0),
            ..GeneratorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let puzzle = generate_puzzle(&config, &mut rng).unwrap();

        assert_eq!(puzzle.difficulty, Difficulty::Easy);
        assert_eq!(puzzle.pieces.len(), 5);
        let total: usize = puzzle.pieces.iter().map(|piece| piece.cells.len()).sum();
        assert_eq!(total, 36);
        assert!(puzzle.pieces.iter().all(|piece| !piece.has_half_cells()));
        assert!(puzzle.grid.iter().all(|(_, value)| value == CellValue::Empty));
    }

    #[test]
    fn test_generated_pieces_cover_every_cell_exactly() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = generate_puzzle(&GeneratorConfig::default(), &mut rng).unwrap();

            let sums = cell_sums(&puzzle);
            assert_eq!(sums.len(), 36, "seed {seed}");
            for (coord, sum) in sums {
                assert_eq!(sum, CellValue::Filled as u8, "seed {seed}: cell {coord}");
            }
            for (index, piece) in puzzle.pieces.iter().enumerate() {
                assert_eq!(piece.id, PieceId(index));
                assert!(!piece.cells.is_empty());
            }
        }
    }

    #[test]
    fn test_counts_follow_difficulty_ranges() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = generate_puzzle(&GeneratorConfig::default(), &mut rng).unwrap();
            assert!(
                puzzle.difficulty.piece_count_range().contains(&puzzle.piece_count),
                "seed {seed}"
            );
            assert!(puzzle.cross_count < puzzle.difficulty.cross_count_range().end);

            // each cut removes one cell, so it can empty at most one group
            let emitted = puzzle.pieces.len();
            assert!(emitted <= puzzle.piece_count, "seed {seed}");
            assert!(emitted + puzzle.cross_count >= puzzle.piece_count, "seed {seed}");
            if puzzle.cross_count == 0 {
                assert_eq!(emitted, puzzle.piece_count, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_every_difficulty_is_drawn() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = Vec::new();
        for _ in 0..60 {
            let difficulty = Difficulty::random(&mut rng);
            if !seen.contains(&difficulty) {
                seen.push(difficulty);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let config = GeneratorConfig::default();
        let first = generate_puzzle(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        let second = generate_puzzle(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsatisfiable_cuts_fall_back_to_fewer() {
        let config = GeneratorConfig {
            grid_size: 1,
            cross_count: Some(3),
            max_cut_attempts: 20,
            ..GeneratorConfig::default()
        };
        let puzzle = generate_puzzle(&config, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(puzzle.cross_count, 0);
        assert_eq!(puzzle.pieces.len(), 1);
        assert_eq!(
            puzzle.pieces[0].cells,
            vec![(CellCoord::new(0, 0), CellValue::Filled)]
        );
    }

    #[test]
    fn test_oversized_piece_count_is_clamped() {
        let config = GeneratorConfig {
            grid_size: 2,
            piece_count: Some(50),
            cross_count: Some(0),
            ..GeneratorConfig::default()
        };
        let puzzle = generate_puzzle(&config, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(puzzle.piece_count, 4);
        assert_eq!(puzzle.pieces.len(), 4);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GeneratorConfig::with_grid_size(0);
        assert!(matches!(
            generate_puzzle(&config, &mut rng),
            Err(Error::InvalidConfig(_))
        ));

        let config = GeneratorConfig {
            max_cut_attempts: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            generate_puzzle(&config, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("MEDIUM".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "nightmare".parse::<Difficulty>(),
            Err(Error::UnknownDifficulty("nightmare".into()))
        );
        assert_eq!(Difficulty::Medium.to_string(), "MEDIUM");
    }
}
