//! 3D view of a generated puzzle using kiss3d.

use kiss3d::prelude::*;

use tangram::{CellValue, PieceDefinition, PuzzleSession};

/// Returns the display color for a given piece index.
///
/// The mapping is stable to keep colors consistent across renders.
fn piece_color(piece_index: usize) -> Color {
    match piece_index % 12 {
        0 => Color::new(1.0, 0.2, 0.2, 1.0),  // red
        1 => Color::new(0.2, 1.0, 0.2, 1.0),  // green
        2 => Color::new(0.2, 0.2, 1.0, 1.0),  // blue
        3 => Color::new(1.0, 1.0, 0.2, 1.0),  // yellow
        4 => Color::new(1.0, 0.2, 1.0, 1.0),  // magenta
        5 => Color::new(0.2, 1.0, 1.0, 1.0),  // cyan
        6 => Color::new(1.0, 0.6, 0.2, 1.0),  // orange
        7 => Color::new(0.6, 0.3, 1.0, 1.0),  // violet
        8 => Color::new(0.6, 1.0, 0.4, 1.0),  // lime
        9 => Color::new(1.0, 0.5, 0.7, 1.0),  // pink
        10 => Color::new(0.4, 0.7, 1.0, 1.0), // sky
        _ => Color::new(0.8, 0.8, 0.8, 1.0),  // grey
    }
}

/// Offset of a triangle's stand-in block from its cell center.
fn half_offset(value: CellValue) -> (f32, f32) {
    match value {
        CellValue::TopLeft => (-0.25, 0.25),
        CellValue::TopRight => (0.25, 0.25),
        CellValue::BottomLeft => (-0.25, -0.25),
        CellValue::BottomRight => (0.25, -0.25),
        CellValue::Empty | CellValue::Filled => (0.0, 0.0),
    }
}

/// Represents a rendered block in the 3D scene.
struct RenderedBlock {
    /// The kiss3d scene node for this block.
    node: SceneNode3d,
    /// The block's position when the puzzle is assembled.
    base_position: Vec3,
    /// Which piece this block belongs to.
    piece_index: usize,
}

/// Builds the 3D scene for the solved layout of a puzzle.
///
/// Coordinate conventions:
/// - Board cells come from the session layout on layer 0, so the board is
///   centered on the origin in the XY plane.
/// - Full cells are square blocks; a triangle is drawn as a quarter-size
///   block in its corner.
/// - A dark backdrop sits behind the pieces.
///
/// Returns the rendered blocks and the centroid of each piece for the
/// explosion animation.
fn build_scene(
    scene: &mut SceneNode3d,
    session: &PuzzleSession,
) -> (Vec<RenderedBlock>, Vec<SceneNode3d>, Vec<Vec3>) {
    /// Edge of a full cell block (slightly smaller than 1.0 for visible gaps).
    const CELL_SIZE: f32 = 0.92;
    /// Edge of a triangle's stand-in block.
    const HALF_SIZE: f32 = 0.44;
    /// Thickness of every piece block.
    const DEPTH: f32 = 0.3;

    let layout = session.layout();
    let to_world = |definition: &PieceDefinition| -> Vec<(Vec3, CellValue)> {
        definition
            .cells
            .iter()
            .map(|&(coord, value)| {
                let center = layout.world_position(coord, 0.0);
                let (dx, dy) = half_offset(value);
                (Vec3::new(center.x + dx, center.y + dy, 0.0), value)
            })
            .collect()
    };

    let mut backdrop = Vec::new();
    for coord in session.grid().coords() {
        let center = layout.world_position(coord, 0.0);
        let node = scene
            .add_cube(0.98, 0.98, 0.05)
            .set_color(Color::new(0.15, 0.15, 0.18, 1.0))
            .set_position(Vec3::new(center.x, center.y, -DEPTH));
        backdrop.push(node);
    }

    let mut piece_centroids = Vec::new();
    let mut rendered_blocks = Vec::new();
    for definition in &session.puzzle().pieces {
        let piece_index = definition.id.0;
        let blocks = to_world(definition);
        let position_sum = blocks
            .iter()
            .fold(Vec3::ZERO, |acc, &(position, _)| acc + position);
        piece_centroids.push(position_sum / blocks.len().max(1) as f32);

        for (base_position, value) in blocks {
            let size = if value.is_half() { HALF_SIZE } else { CELL_SIZE };
            let node = scene
                .add_cube(size, size, DEPTH)
                .set_color(piece_color(piece_index))
                .set_position(base_position);
            rendered_blocks.push(RenderedBlock {
                node,
                base_position,
                piece_index,
            });
        }
    }

    (rendered_blocks, backdrop, piece_centroids)
}

fn window_title(session: &PuzzleSession) -> String {
    let puzzle = session.puzzle();
    format!(
        "{} - {} pieces, {} cuts - [Up/Down] explode, [R] reset, [N] new puzzle",
        puzzle.difficulty,
        puzzle.pieces.len(),
        puzzle.cross_count
    )
}

/// Displays the puzzle in an interactive 3D viewer.
pub fn display(session: PuzzleSession) {
    pollster::block_on(display_async(session));
}

async fn display_async(mut session: PuzzleSession) {
    let mut window = Window::new(&window_title(&session)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(12.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 10.0));

    // the board is centered on the origin
    let board_center = Vec3::ZERO;
    let (mut rendered_blocks, mut backdrop, mut piece_centroids) = build_scene(&mut scene, &session);

    // how much to push pieces outward (0.0 = assembled, higher = more exploded)
    let mut explosion_amount: f32 = 0.0;
    // speed at which explosion changes per keypress
    const EXPLOSION_SPEED: f32 = 0.05;
    // whether the scene needs to be rebuilt (after a new puzzle)
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Up => explosion_amount += EXPLOSION_SPEED,
                        Key::Down => {
                            explosion_amount = (explosion_amount - EXPLOSION_SPEED).max(0.0)
                        }
                        Key::R => explosion_amount = 0.0,
                        Key::N => {
                            let size = session.grid().size();
                            match session.reset(size) {
                                Ok(()) => needs_rebuild = true,
                                Err(e) => eprintln!("Failed to generate a new puzzle: {}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut block in rendered_blocks.drain(..) {
                block.node.remove();
            }
            for mut node in backdrop.drain(..) {
                node.remove();
            }
            let (new_blocks, new_backdrop, new_centroids) = build_scene(&mut scene, &session);
            rendered_blocks = new_blocks;
            backdrop = new_backdrop;
            piece_centroids = new_centroids;
            window.set_title(&window_title(&session));
            needs_rebuild = false;
        }

        // update block positions for explosion animation
        for block in &mut rendered_blocks {
            let centroid = piece_centroids[block.piece_index];
            let explosion_direction = (centroid - board_center).normalize_or_zero();
            block.node.set_position(
                block.base_position + explosion_direction * explosion_amount * 2.0,
            );
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
