//! Tangram Grid Puzzle
//!
//! Cuts a square board into pieces, some of which share diagonally split
//! cells, and lets the pieces be dragged back onto the board. Puzzles can be
//! printed, auto-played, or shown in an interactive 3D viewer.

mod visualization;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tangram::grid::{format_grid, DEFAULT_GRID_SIZE};
use tangram::pieces::{format_definitions, format_layout};
use tangram::{
    generate_puzzle, Difficulty, GeneratorConfig, Puzzle, PuzzleSession, Result, SessionConfig,
};

/// Generates tangram grid puzzles and visualizes them.
#[derive(Parser)]
#[command(name = "tangram")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a puzzle and print its layout and pieces.
    Generate(PuzzleArgs),
    /// Generate a puzzle and drag every piece onto its home cells.
    Play(PuzzleArgs),
    /// Display a puzzle in an interactive 3D viewer.
    Display(PuzzleArgs),
}

#[derive(Args, Clone, Debug)]
struct PuzzleArgs {
    /// Edge length of the square board.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,
    /// Force a difficulty (easy, medium, hard) instead of drawing one.
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Override the number of pieces.
    #[arg(long)]
    pieces: Option<usize>,
    /// Override the number of corner cuts.
    #[arg(long)]
    cuts: Option<usize>,
    /// Seed for a reproducible puzzle.
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for PuzzleArgs {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            difficulty: None,
            pieces: None,
            cuts: None,
            seed: None,
        }
    }
}

impl PuzzleArgs {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            difficulty: self.difficulty,
            piece_count: self.pieces,
            cross_count: self.cuts,
            ..GeneratorConfig::with_grid_size(self.size)
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Command::Generate(args)) => run_generate(&args),
        Some(Command::Play(args)) => run_play(&args),
        Some(Command::Display(args)) => run_display(&args),
        None => {
            // default: generate, print and display
            run_generate_and_display(&PuzzleArgs::default())
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Generates a puzzle and prints it.
fn run_generate(args: &PuzzleArgs) -> Result<()> {
    let puzzle = generate_puzzle(&args.generator_config(), &mut args.rng())?;
    print!("{}", format_puzzle(&puzzle));
    Ok(())
}

/// Plays a puzzle to completion by dropping every piece on its home cells.
fn run_play(args: &PuzzleArgs) -> Result<()> {
    let mut session = new_session(args)?;
    print!("{}", format_puzzle(session.puzzle()));
    println!();

    for line in play_to_completion(&mut session)? {
        println!("{}", line);
    }
    println!();
    print!("{}", format_grid(session.grid()));
    if session.is_complete() {
        println!("Puzzle solved!");
    }
    Ok(())
}

/// Opens the 3D viewer on a new puzzle.
fn run_display(args: &PuzzleArgs) -> Result<()> {
    let session = new_session(args)?;
    println!("Controls: Up/Down explode, R reset, N new puzzle");
    visualization::display(session);
    Ok(())
}

/// Prints a new puzzle, then opens the viewer on that same puzzle.
fn run_generate_and_display(args: &PuzzleArgs) -> Result<()> {
    let (session, summary) = session_with_summary(args)?;
    print!("{}", summary);
    println!("Controls: Up/Down explode, R reset, N new puzzle");
    visualization::display(session);
    Ok(())
}

/// Builds one session and renders its puzzle, so both share a single draw
/// from the random source.
fn session_with_summary(args: &PuzzleArgs) -> Result<(PuzzleSession, String)> {
    let session = new_session(args)?;
    let summary = format_puzzle(session.puzzle());
    Ok((session, summary))
}

fn new_session(args: &PuzzleArgs) -> Result<PuzzleSession> {
    let config = SessionConfig {
        generator: args.generator_config(),
        ..SessionConfig::default()
    };
    PuzzleSession::new(config, args.rng())
}

/// Drags each piece from where it lies to its home position, in order.
///
/// Returns one line per piece describing the drop.
fn play_to_completion(session: &mut PuzzleSession) -> Result<Vec<String>> {
    let ids: Vec<_> = session.pieces().iter().map(|piece| piece.id).collect();
    let mut lines = Vec::with_capacity(ids.len());

    for id in ids {
        let (Some(start), Some(home)) = (
            session.piece(id).map(|piece| piece.position),
            session.home_position(id),
        ) else {
            continue;
        };
        session.begin_drag(id, start)?;
        session.update_drag_position(id, home)?;
        let result = session.end_drag(id)?;

        let verdict = if result.committed { "placed" } else { "rejected" };
        let mut line = format!("Piece {}: {}", id, verdict);
        if result.puzzle_solved {
            line.push_str(" (solved)");
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Renders a puzzle summary, its solved layout and its piece list.
fn format_puzzle(puzzle: &Puzzle) -> String {
    format!(
        "Difficulty: {}\nPieces: {}, cuts: {}\n\n{}\n{}",
        puzzle.difficulty,
        puzzle.pieces.len(),
        puzzle.cross_count,
        format_layout(puzzle.grid_size(), &puzzle.pieces),
        format_definitions(&puzzle.pieces)
    )
}
