#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded maze generation over a chunked grid.
//!
//! Generation runs in four passes over a [`GridModel`]: the optional finish
//! block is carved open, a randomized depth-first backtracker grows passages
//! from the generation roots, chunk seams the backtracker left sealed are
//! stitched, and a final repair pass attaches any cell that is still
//! unvisited. Every random decision comes from one ChaCha stream seeded from
//! [`GridSpec::seed`], so a given spec and option set always yields the same
//! wall layout.

use log::{debug, info};
use maze_drive_core::{
    ChunkCoord, ConfigError, Direction, FinishArea, GlobalCell, GridSpec, LocalCell, MazeOptions,
};
use maze_drive_world::GridModel;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Summary of the work performed by a generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of roots the backtracker grew from.
    pub roots: usize,
    /// Walls removed by the backtracker.
    pub carved: usize,
    /// Chunk seams opened by the stitching pass.
    pub seams_opened: usize,
    /// Cells attached by the connectivity repair pass.
    pub repaired: usize,
}

/// Generates a fully connected maze for the provided specification.
pub fn generate(spec: GridSpec, options: &MazeOptions) -> Result<GridModel, ConfigError> {
    generate_with_report(spec, options).map(|(model, _)| model)
}

/// Generates a maze and reports what each pass contributed.
pub fn generate_with_report(
    spec: GridSpec,
    options: &MazeOptions,
) -> Result<(GridModel, GenerationReport), ConfigError> {
    let mut model = prepare(spec, options)?;
    let mut generator = MazeGenerator::new(spec.seed());
    let report = generator.run(&mut model);

    let (chunks_x, chunks_z) = model.maze_size_in_chunks();
    info!(
        "generated {chunks_x}x{chunks_z} chunk maze (chunk size {size}, seed {seed}): \
         {roots} roots, {carved} carved, {seams} seams opened, {repaired} repaired",
        size = model.chunk_size(),
        seed = spec.seed(),
        roots = report.roots,
        carved = report.carved,
        seams = report.seams_opened,
        repaired = report.repaired,
    );

    Ok((model, report))
}

/// Validates the layout and allocates a fully walled model with its start
/// and finish cells assigned.
///
/// Any finish placement moves the default start to the origin corner; an
/// explicit [`MazeOptions::start`] always wins.
pub fn prepare(spec: GridSpec, options: &MazeOptions) -> Result<GridModel, ConfigError> {
    let dimensions = spec.validate()?;
    let width = dimensions.width_cells() as i32;
    let depth = dimensions.depth_cells() as i32;

    let anchor = match options.finish {
        FinishArea::None => None,
        FinishArea::Center => {
            let center = dimensions.center();
            Some(GlobalCell::new(center.x() - 1, center.z() - 1))
        }
        FinishArea::Corner => Some(GlobalCell::new(width - 2, depth - 2)),
        FinishArea::At { anchor } => Some(anchor),
    };

    if let Some(anchor) = anchor {
        let fits = anchor.x() >= 0
            && anchor.z() >= 0
            && anchor.x() < width - 1
            && anchor.z() < depth - 1;
        if !fits {
            return Err(ConfigError::FinishOutOfBounds { anchor });
        }
    }

    if let Some(start) = options.start {
        if !dimensions.contains(start) {
            return Err(ConfigError::StartOutOfBounds { cell: start });
        }
    }

    let mut model = GridModel::initialize(spec)?;
    if let Some(anchor) = anchor {
        model.set_finish_block(anchor)?;
        model.set_start(GlobalCell::new(0, 0))?;
    }
    if let Some(start) = options.start {
        model.set_start(start)?;
    }
    Ok(model)
}

/// Opens the interior of the finish block and flags its cells as visited.
///
/// Returns the generation roots: the four finish cells, or the start cell
/// when the model has no finish block.
pub fn carve_finish_block(model: &mut GridModel) -> Vec<GlobalCell> {
    let finish = model.finish_cells().to_vec();
    if finish.is_empty() {
        return vec![model.start_cell()];
    }

    for &cell in &finish {
        for direction in [Direction::North, Direction::East] {
            let Some(next) = model.neighbor(cell, direction) else {
                continue;
            };
            if model.is_finish(next) {
                let _ = model.remove_wall(cell, direction);
            }
        }
        let _ = model.mark_visited(cell);
    }

    debug!("carved finish block at {}", finish[0]);
    finish
}

/// Attaches every unvisited cell to a visited neighbour.
///
/// Cells are scanned in row order and each one opens the wall toward its
/// first visited neighbour in north, east, south, west order. Passes repeat
/// until no cell changes, so isolated pockets are absorbed from their edges
/// inward. Returns the number of cells attached.
pub fn repair_connectivity(model: &mut GridModel) -> usize {
    let cells: Vec<GlobalCell> = model.cells().collect();
    let mut repaired = 0;

    loop {
        let mut progressed = false;

        for &cell in &cells {
            if model.is_visited(cell) {
                continue;
            }

            let anchor = Direction::ALL.into_iter().find(|direction| {
                model
                    .neighbor(cell, *direction)
                    .is_some_and(|neighbor| model.is_visited(neighbor))
            });
            let Some(direction) = anchor else {
                continue;
            };

            let _ = model.remove_wall(cell, direction);
            let _ = model.mark_visited(cell);
            repaired += 1;
            progressed = true;
        }

        if !progressed {
            break;
        }
    }

    if repaired > 0 {
        debug!("repair pass attached {repaired} cells");
    }
    repaired
}

/// Randomized depth-first maze carver.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a generator whose random stream is derived from `seed`.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }

    /// Runs every generation pass over a freshly prepared model.
    pub fn run(&mut self, model: &mut GridModel) -> GenerationReport {
        let roots = carve_finish_block(model);
        let carved = self.carve_passages(model, &roots);
        let seams_opened = self.stitch_chunk_seams(model);
        let repaired = repair_connectivity(model);

        GenerationReport {
            roots: roots.len(),
            carved,
            seams_opened,
            repaired,
        }
    }

    /// Grows passages from each root with an explicit backtracking stack.
    ///
    /// Entering a cell shuffles the four directions; neighbours are tried in
    /// that order and every unvisited neighbour inside the grid is carved
    /// into before the walk backtracks. Returns the number of walls removed.
    pub fn carve_passages(&mut self, model: &mut GridModel, roots: &[GlobalCell]) -> usize {
        let mut carved = 0;
        let mut stack: Vec<Frame> = Vec::new();

        for &root in roots {
            if !model.contains(root) {
                continue;
            }
            let _ = model.mark_visited(root);
            stack.push(Frame::enter(root, &mut self.rng));

            while let Some(frame) = stack.last_mut() {
                let cell = frame.cell;
                let Some(direction) = frame.next_direction() else {
                    let _ = stack.pop();
                    continue;
                };

                let Some(next) = model.neighbor(cell, direction) else {
                    continue;
                };
                if model.is_visited(next) {
                    continue;
                }

                let _ = model.remove_wall(cell, direction);
                let _ = model.mark_visited(next);
                carved += 1;
                stack.push(Frame::enter(next, &mut self.rng));
            }
        }

        carved
    }

    /// Opens one wall on every chunk seam the backtracker left sealed.
    ///
    /// Every pair of grid-adjacent chunks draws a seam offset from the
    /// random stream, whether or not the seam needs it, so the stream stays
    /// aligned across layouts. Returns the number of seams opened.
    pub fn stitch_chunk_seams(&mut self, model: &mut GridModel) -> usize {
        let dimensions = model.dimensions();
        let (chunks_x, chunks_z) = dimensions.chunks();
        let size = dimensions.chunk_size();
        let mut opened = 0;

        for z in 0..chunks_z {
            for x in 0..chunks_x {
                let chunk = ChunkCoord::new(x as i32, z as i32);

                for direction in [Direction::East, Direction::North] {
                    let (dx, dz) = direction.offset();
                    let across = ChunkCoord::new(chunk.x() + dx, chunk.z() + dz);
                    if !dimensions.contains_chunk(across) {
                        continue;
                    }

                    let scheduled = self.rng.gen_range(0..size);
                    let border = |offset: u32| {
                        let local = match direction {
                            Direction::East => LocalCell::new(size - 1, offset),
                            _ => LocalCell::new(offset, size - 1),
                        };
                        dimensions.global(chunk, local)
                    };

                    let sealed = (0..size).all(|offset| model.has_wall(border(offset), direction));
                    if sealed && model.remove_wall(border(scheduled), direction) {
                        opened += 1;
                    }
                }
            }
        }

        opened
    }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: GlobalCell,
    directions: [Direction; 4],
    cursor: usize,
}

impl Frame {
    fn enter(cell: GlobalCell, rng: &mut ChaCha8Rng) -> Self {
        Self {
            cell,
            directions: shuffled_directions(rng),
            cursor: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(direction)
    }
}

fn shuffled_directions(rng: &mut ChaCha8Rng) -> [Direction; 4] {
    let mut directions = Direction::ALL;
    for index in (1..directions.len()).rev() {
        let swap_index = rng.gen_range(0..=index);
        directions.swap(index, swap_index);
    }
    directions
}
