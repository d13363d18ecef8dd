//! Per-chunk wall bitmaps and generation flags.

use maze_drive_core::{ChunkCoord, Direction, LocalCell};

/// Square block of cells with its own copy of every bordering wall.
///
/// Walls on the chunk border are stored by both chunks that share the edge,
/// so the owning [`GridModel`](crate::GridModel) keeps the two copies in sync.
/// Horizontal walls are indexed `[x][y]` with `y` in `0..=size`, where `y`
/// names the south edge of row `y`. Vertical walls are indexed `[x][y]` with
/// `x` in `0..=size`, where `x` names the west edge of column `x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    size: u32,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
    visited: Vec<bool>,
}

impl Chunk {
    /// Allocates a chunk with every wall standing and no cell visited.
    pub(crate) fn enclosed(coord: ChunkCoord, size: u32) -> Self {
        let cells = size as usize;
        let edges = cells * (cells + 1);
        Self {
            coord,
            size,
            horizontal: vec![true; edges],
            vertical: vec![true; edges],
            visited: vec![false; cells * cells],
        }
    }

    /// Location of the chunk inside the arena.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the horizontal wall at `[x][y]` stands.
    ///
    /// Indices outside the bitmap report a standing wall.
    #[must_use]
    pub fn horizontal_wall(&self, x: u32, y: u32) -> bool {
        horizontal_index(self.size, x, y)
            .and_then(|index| self.horizontal.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether the vertical wall at `[x][y]` stands.
    ///
    /// Indices outside the bitmap report a standing wall.
    #[must_use]
    pub fn vertical_wall(&self, x: u32, y: u32) -> bool {
        vertical_index(self.size, x, y)
            .and_then(|index| self.vertical.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether the wall on the given side of a cell stands.
    #[must_use]
    pub fn wall(&self, cell: LocalCell, direction: Direction) -> bool {
        match Edge::of(cell, direction) {
            Edge::Horizontal { x, y } => self.horizontal_wall(x, y),
            Edge::Vertical { x, y } => self.vertical_wall(x, y),
        }
    }

    /// Knocks down the wall on the given side of a cell.
    ///
    /// Returns `true` when a standing wall was removed.
    pub(crate) fn clear_wall(&mut self, cell: LocalCell, direction: Direction) -> bool {
        let slot = match Edge::of(cell, direction) {
            Edge::Horizontal { x, y } => horizontal_index(self.size, x, y)
                .and_then(|index| self.horizontal.get_mut(index)),
            Edge::Vertical { x, y } => {
                vertical_index(self.size, x, y).and_then(|index| self.vertical.get_mut(index))
            }
        };

        match slot {
            Some(wall) if *wall => {
                *wall = false;
                true
            }
            _ => false,
        }
    }

    /// Reports whether generation already reached the cell.
    #[must_use]
    pub fn is_visited(&self, cell: LocalCell) -> bool {
        self.cell_index(cell)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Updates the generation flag, returning the previous value.
    pub(crate) fn set_visited(&mut self, cell: LocalCell, visited: bool) -> bool {
        match self
            .cell_index(cell)
            .and_then(|index| self.visited.get_mut(index))
        {
            Some(flag) => std::mem::replace(flag, visited),
            None => false,
        }
    }

    pub(crate) fn clear_visited(&mut self) {
        self.visited.fill(false);
    }

    /// Number of wall slots, horizontal and vertical, that have been removed.
    #[must_use]
    pub fn open_wall_count(&self) -> usize {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .filter(|wall| !**wall)
            .count()
    }

    fn cell_index(&self, cell: LocalCell) -> Option<usize> {
        if cell.x() >= self.size || cell.z() >= self.size {
            return None;
        }
        let x = usize::try_from(cell.x()).ok()?;
        let z = usize::try_from(cell.z()).ok()?;
        let size = usize::try_from(self.size).ok()?;
        Some(x * size + z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Horizontal { x: u32, y: u32 },
    Vertical { x: u32, y: u32 },
}

impl Edge {
    fn of(cell: LocalCell, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::Horizontal {
                x: cell.x(),
                y: cell.z() + 1,
            },
            Direction::South => Self::Horizontal {
                x: cell.x(),
                y: cell.z(),
            },
            Direction::East => Self::Vertical {
                x: cell.x() + 1,
                y: cell.z(),
            },
            Direction::West => Self::Vertical {
                x: cell.x(),
                y: cell.z(),
            },
        }
    }
}

fn horizontal_index(size: u32, x: u32, y: u32) -> Option<usize> {
    if x >= size || y > size {
        return None;
    }
    let stride = usize::try_from(size).ok()? + 1;
    Some(usize::try_from(x).ok()? * stride + usize::try_from(y).ok()?)
}

fn vertical_index(size: u32, x: u32, y: u32) -> Option<usize> {
    if x > size || y >= size {
        return None;
    }
    let stride = usize::try_from(size).ok()?;
    Some(usize::try_from(x).ok()? * stride + usize::try_from(y).ok()?)
}
