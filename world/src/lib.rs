#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative wall and visitation storage for chunked mazes.
//!
//! The [`GridModel`] owns a dense arena of [`Chunk`] values indexed by chunk
//! coordinate. Every query accepts global cell coordinates and maps them onto
//! the owning chunk with floored division, so cells beyond the grid edge are
//! reported as absent instead of aliasing into a neighbouring chunk.

mod chunk;
mod flood;

pub use chunk::Chunk;

use maze_drive_core::{
    ChunkCoord, ConfigError, Direction, GlobalCell, GridDimensions, GridSpec, LocalCell,
};

/// Wall layout and generation state of a maze.
///
/// The model is mutated only while a maze is generated and is treated as
/// read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridModel {
    spec: GridSpec,
    dimensions: GridDimensions,
    chunks: Vec<Chunk>,
    start: GlobalCell,
    finish_cells: Vec<GlobalCell>,
}

impl GridModel {
    /// Validates the specification and allocates a fully walled grid.
    ///
    /// The start cell defaults to the grid center.
    pub fn initialize(spec: GridSpec) -> Result<Self, ConfigError> {
        let dimensions = spec.validate()?;
        let (chunks_x, chunks_z) = dimensions.chunks();
        let mut chunks = Vec::with_capacity(dimensions.chunk_count());
        for z in 0..chunks_z {
            for x in 0..chunks_x {
                let coord = ChunkCoord::new(x as i32, z as i32);
                chunks.push(Chunk::enclosed(coord, dimensions.chunk_size()));
            }
        }

        Ok(Self {
            spec,
            dimensions,
            chunks,
            start: dimensions.center(),
            finish_cells: Vec::new(),
        })
    }

    /// Overrides the generation root and agent home.
    pub fn set_start(&mut self, cell: GlobalCell) -> Result<(), ConfigError> {
        if !self.dimensions.contains(cell) {
            return Err(ConfigError::StartOutOfBounds { cell });
        }
        self.start = cell;
        Ok(())
    }

    /// Records the 2×2 finish block whose lower-left cell is `anchor`.
    ///
    /// Only the cell list is stored; carving the block is up to the
    /// generator.
    pub fn set_finish_block(&mut self, anchor: GlobalCell) -> Result<(), ConfigError> {
        let cells = [
            anchor,
            anchor.step(Direction::East),
            anchor.step(Direction::North),
            anchor.step(Direction::North).step(Direction::East),
        ];
        if cells.iter().any(|cell| !self.dimensions.contains(*cell)) {
            return Err(ConfigError::FinishOutOfBounds { anchor });
        }
        self.finish_cells = cells.to_vec();
        Ok(())
    }

    /// Specification the model was created from.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Validated grid geometry.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of cells along each chunk edge.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.dimensions.chunk_size()
    }

    /// Maze size measured in chunks along X and Z.
    #[must_use]
    pub const fn maze_size_in_chunks(&self) -> (u32, u32) {
        self.dimensions.chunks()
    }

    /// Generation root and agent home.
    #[must_use]
    pub const fn start_cell(&self) -> GlobalCell {
        self.start
    }

    /// Start cell split into its chunk and local coordinate.
    #[must_use]
    pub const fn start_chunk_cell(&self) -> (ChunkCoord, LocalCell) {
        self.dimensions.locate(self.start)
    }

    /// Cells of the finish block, empty when the maze has none.
    #[must_use]
    pub fn finish_cells(&self) -> &[GlobalCell] {
        &self.finish_cells
    }

    /// Reports whether the cell belongs to the finish block.
    #[must_use]
    pub fn is_finish(&self, cell: GlobalCell) -> bool {
        self.finish_cells.contains(&cell)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GlobalCell) -> bool {
        self.dimensions.contains(cell)
    }

    /// Splits a global cell into chunk and local coordinates.
    #[must_use]
    pub const fn locate(&self, cell: GlobalCell) -> (ChunkCoord, LocalCell) {
        self.dimensions.locate(cell)
    }

    /// Chunk stored at the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.dimensions
            .chunk_index(coord)
            .and_then(|index| self.chunks.get(index))
    }

    /// All chunks in row-major order.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Every cell of the grid, row by row along Z.
    pub fn cells(&self) -> impl Iterator<Item = GlobalCell> {
        let width = self.dimensions.width_cells();
        let depth = self.dimensions.depth_cells();
        (0..depth).flat_map(move |z| (0..width).map(move |x| GlobalCell::new(x as i32, z as i32)))
    }

    /// Neighbouring cell in the given direction, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, cell: GlobalCell, direction: Direction) -> Option<GlobalCell> {
        if !self.contains(cell) {
            return None;
        }
        let next = cell.step(direction);
        self.contains(next).then_some(next)
    }

    /// Reports whether the wall on one side of a cell stands, as stored by
    /// that cell's chunk.
    ///
    /// Cells outside the grid are fully walled.
    #[must_use]
    pub fn has_wall(&self, cell: GlobalCell, direction: Direction) -> bool {
        if !self.contains(cell) {
            return true;
        }
        let (chunk, local) = self.locate(cell);
        self.chunk(chunk)
            .map_or(true, |chunk| chunk.wall(local, direction))
    }

    /// Reports whether movement between two cells is blocked.
    ///
    /// Cells that are not 4-adjacent, or that lie outside the grid, are
    /// always blocked. Otherwise the wall is read from both cells' chunks and
    /// either copy standing blocks the move.
    #[must_use]
    pub fn has_wall_between(&self, from: GlobalCell, to: GlobalCell) -> bool {
        let Some(direction) = from.direction_to(to) else {
            return true;
        };
        if !self.contains(from) || !self.contains(to) {
            return true;
        }
        self.has_wall(from, direction) || self.has_wall(to, direction.opposite())
    }

    /// Reports whether both stored copies of the wall between two adjacent
    /// cells agree.
    ///
    /// Pairs that are not adjacent or that leave the grid have a single copy
    /// and are trivially symmetric.
    #[must_use]
    pub fn wall_is_symmetric(&self, a: GlobalCell, b: GlobalCell) -> bool {
        let Some(direction) = a.direction_to(b) else {
            return true;
        };
        if !self.contains(a) || !self.contains(b) {
            return true;
        }
        self.has_wall(a, direction) == self.has_wall(b, direction.opposite())
    }

    /// Lists every adjacent pair whose two wall copies disagree.
    #[must_use]
    pub fn asymmetric_edges(&self) -> Vec<(GlobalCell, GlobalCell)> {
        let mut edges = Vec::new();
        for cell in self.cells() {
            for direction in [Direction::North, Direction::East] {
                let Some(next) = self.neighbor(cell, direction) else {
                    continue;
                };
                if !self.wall_is_symmetric(cell, next) {
                    edges.push((cell, next));
                }
            }
        }
        edges
    }

    /// Removes the wall between a cell and its neighbour in `direction`.
    ///
    /// Inside a chunk the shared slot is cleared once. Across a chunk border
    /// the slot is cleared in both chunks. Returns `false` when the
    /// neighbour lies outside the grid, leaving the model untouched.
    pub fn remove_wall(&mut self, from: GlobalCell, direction: Direction) -> bool {
        let Some(to) = self.neighbor(from, direction) else {
            return false;
        };

        let (from_chunk, from_local) = self.locate(from);
        let (to_chunk, to_local) = self.locate(to);

        let _ = self.with_chunk_mut(from_chunk, |chunk| chunk.clear_wall(from_local, direction));
        if from_chunk != to_chunk {
            let _ = self.with_chunk_mut(to_chunk, |chunk| {
                chunk.clear_wall(to_local, direction.opposite())
            });
        }
        true
    }

    /// Removes the wall between two adjacent cells.
    ///
    /// Returns `false` when the cells are not adjacent or leave the grid.
    pub fn remove_wall_between(&mut self, a: GlobalCell, b: GlobalCell) -> bool {
        match a.direction_to(b) {
            Some(direction) => self.remove_wall(a, direction),
            None => false,
        }
    }

    /// Reports whether generation already reached the cell.
    #[must_use]
    pub fn is_visited(&self, cell: GlobalCell) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let (chunk, local) = self.locate(cell);
        self.chunk(chunk)
            .is_some_and(|chunk| chunk.is_visited(local))
    }

    /// Flags the cell as visited.
    ///
    /// Returns `true` when the flag was newly set, `false` when it was
    /// already set or the cell lies outside the grid.
    pub fn mark_visited(&mut self, cell: GlobalCell) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let (chunk, local) = self.locate(cell);
        self.with_chunk_mut(chunk, |chunk| !chunk.set_visited(local, true))
            .unwrap_or(false)
    }

    /// Clears every generation flag.
    pub fn clear_visited(&mut self) {
        for chunk in &mut self.chunks {
            chunk.clear_visited();
        }
    }

    /// Number of cells that are not yet flagged as visited.
    #[must_use]
    pub fn unvisited_count(&self) -> usize {
        self.cells().filter(|cell| !self.is_visited(*cell)).count()
    }

    /// Counts the cells reachable from `origin` through open walls.
    #[must_use]
    pub fn reachable_from(&self, origin: GlobalCell) -> usize {
        flood::reachable_count(self, origin)
    }

    fn with_chunk_mut<R>(
        &mut self,
        coord: ChunkCoord,
        f: impl FnOnce(&mut Chunk) -> R,
    ) -> Option<R> {
        let index = self.dimensions.chunk_index(coord)?;
        self.chunks.get_mut(index).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(chunk_size: i32, chunks_x: i32, chunks_z: i32) -> GridModel {
        GridModel::initialize(GridSpec::new(chunk_size, chunks_x, chunks_z, 1)).expect("valid spec")
    }

    #[test]
    fn initialize_allocates_enclosed_chunks() {
        let grid = model(4, 3, 2);

        assert_eq!(grid.chunks().len(), 6);
        assert_eq!(grid.maze_size_in_chunks(), (3, 2));
        assert_eq!(grid.chunk_size(), 4);
        assert_eq!(grid.start_cell(), GlobalCell::new(6, 4));
        assert!(grid.finish_cells().is_empty());
        for cell in grid.cells() {
            for direction in Direction::ALL {
                assert!(grid.has_wall(cell, direction));
            }
        }
    }

    #[test]
    fn initialize_rejects_invalid_spec() {
        assert_eq!(
            GridModel::initialize(GridSpec::new(-2, 1, 1, 0)),
            Err(ConfigError::InvalidChunkSize { chunk_size: -2 })
        );
    }

    #[test]
    fn chunk_lookup_uses_arena_coordinates() {
        let grid = model(2, 2, 3);
        let chunk = grid.chunk(ChunkCoord::new(1, 2)).expect("chunk");
        assert_eq!(chunk.coord(), ChunkCoord::new(1, 2));
        assert!(grid.chunk(ChunkCoord::new(-1, 0)).is_none());
        assert!(grid.chunk(ChunkCoord::new(2, 0)).is_none());
    }

    #[test]
    fn interior_removal_clears_single_slot() {
        let mut grid = model(4, 1, 1);
        let a = GlobalCell::new(1, 1);
        let b = GlobalCell::new(2, 1);

        assert!(grid.remove_wall(a, Direction::East));

        assert!(!grid.has_wall_between(a, b));
        assert!(!grid.has_wall_between(b, a));
        assert_eq!(grid.chunks()[0].open_wall_count(), 1);
    }

    #[test]
    fn border_removal_clears_both_chunks() {
        let mut grid = model(4, 2, 1);
        let west = GlobalCell::new(3, 2);
        let east = GlobalCell::new(4, 2);

        assert!(grid.remove_wall_between(east, west));

        assert!(!grid.has_wall(west, Direction::East));
        assert!(!grid.has_wall(east, Direction::West));
        assert!(grid.wall_is_symmetric(west, east));
        let left = grid.chunk(ChunkCoord::new(0, 0)).expect("left chunk");
        let right = grid.chunk(ChunkCoord::new(1, 0)).expect("right chunk");
        assert!(!left.vertical_wall(4, 2));
        assert!(!right.vertical_wall(0, 2));
    }

    #[test]
    fn border_removal_along_z_clears_both_chunks() {
        let mut grid = model(3, 1, 2);
        let south = GlobalCell::new(1, 2);
        let north = GlobalCell::new(1, 3);

        assert!(grid.remove_wall(south, Direction::North));

        let lower = grid.chunk(ChunkCoord::new(0, 0)).expect("lower chunk");
        let upper = grid.chunk(ChunkCoord::new(0, 1)).expect("upper chunk");
        assert!(!lower.horizontal_wall(1, 3));
        assert!(!upper.horizontal_wall(1, 0));
        assert!(grid.asymmetric_edges().is_empty());
    }

    #[test]
    fn removal_toward_outside_is_ignored() {
        let mut grid = model(2, 1, 1);
        let before = grid.clone();

        assert!(!grid.remove_wall(GlobalCell::new(0, 0), Direction::West));
        assert!(!grid.remove_wall(GlobalCell::new(1, 1), Direction::North));
        assert!(!grid.remove_wall_between(GlobalCell::new(0, 0), GlobalCell::new(1, 1)));
        assert_eq!(grid, before);
    }

    #[test]
    fn wall_queries_block_non_adjacent_and_outside_cells() {
        let mut grid = model(2, 1, 1);
        assert!(grid.remove_wall(GlobalCell::new(0, 0), Direction::East));

        assert!(grid.has_wall_between(GlobalCell::new(0, 0), GlobalCell::new(0, 0)));
        assert!(grid.has_wall_between(GlobalCell::new(0, 0), GlobalCell::new(1, 1)));
        assert!(grid.has_wall_between(GlobalCell::new(0, 0), GlobalCell::new(-1, 0)));
        assert!(grid.has_wall_between(GlobalCell::new(2, 0), GlobalCell::new(1, 0)));
    }

    #[test]
    fn one_sided_wall_blocks_and_is_reported() {
        let mut grid = model(2, 2, 1);
        let west = GlobalCell::new(1, 0);
        let east = GlobalCell::new(2, 0);
        let _ = grid.with_chunk_mut(ChunkCoord::new(0, 0), |chunk| {
            chunk.clear_wall(LocalCell::new(1, 0), Direction::East)
        });

        assert!(grid.has_wall_between(west, east));
        assert!(grid.has_wall_between(east, west));
        assert!(!grid.wall_is_symmetric(west, east));
        assert_eq!(grid.asymmetric_edges(), vec![(west, east)]);
    }

    #[test]
    fn neighbor_is_absent_beyond_edges() {
        let grid = model(2, 2, 2);
        assert_eq!(grid.neighbor(GlobalCell::new(0, 0), Direction::South), None);
        assert_eq!(grid.neighbor(GlobalCell::new(3, 3), Direction::East), None);
        assert_eq!(
            grid.neighbor(GlobalCell::new(1, 3), Direction::East),
            Some(GlobalCell::new(2, 3))
        );
    }

    #[test]
    fn visitation_flags_track_new_marks() {
        let mut grid = model(2, 2, 1);
        let cell = GlobalCell::new(3, 1);

        assert!(grid.mark_visited(cell));
        assert!(!grid.mark_visited(cell));
        assert!(!grid.mark_visited(GlobalCell::new(-1, 0)));
        assert!(grid.is_visited(cell));
        assert_eq!(grid.unvisited_count(), 7);

        grid.clear_visited();
        assert_eq!(grid.unvisited_count(), 8);
    }

    #[test]
    fn start_and_finish_overrides_are_bounded() {
        let mut grid = model(2, 1, 1);

        assert_eq!(
            grid.set_start(GlobalCell::new(2, 0)),
            Err(ConfigError::StartOutOfBounds {
                cell: GlobalCell::new(2, 0)
            })
        );
        assert_eq!(
            grid.set_finish_block(GlobalCell::new(1, 0)),
            Err(ConfigError::FinishOutOfBounds {
                anchor: GlobalCell::new(1, 0)
            })
        );
        assert_eq!(grid.set_finish_block(GlobalCell::new(0, 0)), Ok(()));
        assert_eq!(grid.finish_cells().len(), 4);
        assert!(grid.is_finish(GlobalCell::new(1, 1)));
        assert_eq!(grid.set_start(GlobalCell::new(1, 0)), Ok(()));
        assert_eq!(
            grid.start_chunk_cell(),
            (ChunkCoord::new(0, 0), LocalCell::new(1, 0))
        );
    }
}
