#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze drive engine.
//!
//! This crate defines the vocabulary that connects the grid model, the pure
//! generation and navigation systems, and any adapter that drives them. Grid
//! geometry is described by a [`GridSpec`] that validates into
//! [`GridDimensions`]; every cell is addressed either globally through
//! [`GlobalCell`] or as a [`ChunkCoord`] plus [`LocalCell`] pair. Adapters
//! steer the agent with [`Command`] values and observe the outcome through
//! [`Event`] values, both of which serialize so that external control and
//! replay layers can exchange them verbatim.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of cells a grid may hold.
///
/// Walls and visitation flags are allocated densely per cell, so anything
/// larger is refused as [`ConfigError::GridTooLarge`].
pub const MAX_CELLS: u64 = 1 << 24;

/// Immutable description of the grid that a maze is generated on.
///
/// Fields are signed so that externally supplied parameters can be carried
/// verbatim; [`GridSpec::validate`] rejects anything that is not strictly
/// positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    chunk_size: i32,
    chunks_x: i32,
    chunks_z: i32,
    seed: i64,
}

impl GridSpec {
    /// Creates a new grid specification.
    #[must_use]
    pub const fn new(chunk_size: i32, chunks_x: i32, chunks_z: i32, seed: i64) -> Self {
        Self {
            chunk_size,
            chunks_x,
            chunks_z,
            seed,
        }
    }

    /// Number of cells along each edge of a chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Number of chunks along the X axis.
    #[must_use]
    pub const fn chunks_x(&self) -> i32 {
        self.chunks_x
    }

    /// Number of chunks along the Z axis.
    #[must_use]
    pub const fn chunks_z(&self) -> i32 {
        self.chunks_z
    }

    /// Seed that drives every random decision made during generation.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Checks the specification and produces the unsigned grid dimensions.
    ///
    /// Grids holding more than [`MAX_CELLS`] cells are rejected before any
    /// storage is allocated.
    pub fn validate(&self) -> Result<GridDimensions, ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::InvalidChunkSize {
                chunk_size: self.chunk_size,
            });
        }

        if self.chunks_x <= 0 || self.chunks_z <= 0 {
            return Err(ConfigError::InvalidMazeSize {
                chunks_x: self.chunks_x,
                chunks_z: self.chunks_z,
            });
        }

        let too_large = ConfigError::GridTooLarge {
            chunk_size: self.chunk_size,
            chunks_x: self.chunks_x,
            chunks_z: self.chunks_z,
        };

        // Global coordinates are signed, so the cell extent must fit an i32.
        let width = self.chunk_size.checked_mul(self.chunks_x);
        let depth = self.chunk_size.checked_mul(self.chunks_z);
        let (Some(width), Some(depth)) = (width, depth) else {
            return Err(too_large);
        };

        let cells = u64::from(width.unsigned_abs()) * u64::from(depth.unsigned_abs());
        if cells > MAX_CELLS || usize::try_from(cells).is_err() {
            return Err(too_large);
        }

        Ok(GridDimensions {
            chunk_size: self.chunk_size.unsigned_abs(),
            chunks_x: self.chunks_x.unsigned_abs(),
            chunks_z: self.chunks_z.unsigned_abs(),
        })
    }
}

/// Validated grid geometry shared by the model and the systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    chunk_size: u32,
    chunks_x: u32,
    chunks_z: u32,
}

impl GridDimensions {
    /// Number of cells along each edge of a chunk.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Maze size measured in whole chunks along X and Z.
    #[must_use]
    pub const fn chunks(&self) -> (u32, u32) {
        (self.chunks_x, self.chunks_z)
    }

    /// Number of cells along the X axis.
    #[must_use]
    pub const fn width_cells(&self) -> u32 {
        self.chunks_x * self.chunk_size
    }

    /// Number of cells along the Z axis.
    #[must_use]
    pub const fn depth_cells(&self) -> u32 {
        self.chunks_z * self.chunk_size
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width_cells() as usize * self.depth_cells() as usize
    }

    /// Total number of chunks in the grid.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks_x as usize * self.chunks_z as usize
    }

    /// Cell nearest to the middle of the grid.
    #[must_use]
    pub const fn center(&self) -> GlobalCell {
        GlobalCell::new((self.width_cells() / 2) as i32, (self.depth_cells() / 2) as i32)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GlobalCell) -> bool {
        cell.x >= 0
            && cell.z >= 0
            && (cell.x as u32) < self.width_cells()
            && (cell.z as u32) < self.depth_cells()
    }

    /// Reports whether the chunk lies inside the grid.
    #[must_use]
    pub const fn contains_chunk(&self, chunk: ChunkCoord) -> bool {
        chunk.x >= 0
            && chunk.z >= 0
            && (chunk.x as u32) < self.chunks_x
            && (chunk.z as u32) < self.chunks_z
    }

    /// Splits a global cell into its owning chunk and the cell within it.
    ///
    /// Uses floored division so that cells left of or below the origin land
    /// in negative chunks with a non-negative local offset. The result is
    /// defined for every input, including cells outside the grid.
    #[must_use]
    pub const fn locate(&self, cell: GlobalCell) -> (ChunkCoord, LocalCell) {
        let size = self.chunk_size as i32;
        let chunk = ChunkCoord::new(cell.x.div_euclid(size), cell.z.div_euclid(size));
        let local = LocalCell::new(cell.x.rem_euclid(size) as u32, cell.z.rem_euclid(size) as u32);
        (chunk, local)
    }

    /// Joins a chunk and a local cell back into a global coordinate.
    #[must_use]
    pub const fn global(&self, chunk: ChunkCoord, local: LocalCell) -> GlobalCell {
        let size = self.chunk_size as i32;
        GlobalCell::new(
            chunk.x.saturating_mul(size).saturating_add(local.x as i32),
            chunk.z.saturating_mul(size).saturating_add(local.z as i32),
        )
    }

    /// Dense row-major index of a chunk inside the grid.
    #[must_use]
    pub fn chunk_index(&self, chunk: ChunkCoord) -> Option<usize> {
        if !self.contains_chunk(chunk) {
            return None;
        }
        let x = usize::try_from(chunk.x).ok()?;
        let z = usize::try_from(chunk.z).ok()?;
        let width = usize::try_from(self.chunks_x).ok()?;
        Some(z * width + x)
    }

    /// Dense row-major index of a cell inside the grid.
    #[must_use]
    pub fn cell_index(&self, cell: GlobalCell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let x = usize::try_from(cell.x).ok()?;
        let z = usize::try_from(cell.z).ok()?;
        let width = usize::try_from(self.width_cells()).ok()?;
        Some(z * width + x)
    }
}

/// Location of a cell measured across the whole grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalCell {
    x: i32,
    z: i32,
}

impl GlobalCell {
    /// Creates a new global cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column of the cell along the X axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell along the Z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Cell adjacent to this one in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dz) = direction.offset();
        Self::new(self.x.wrapping_add(dx), self.z.wrapping_add(dz))
    }

    /// Direction leading from this cell to a 4-adjacent neighbour.
    ///
    /// Returns `None` for the cell itself, diagonals, and anything further
    /// away.
    #[must_use]
    pub fn direction_to(self, other: GlobalCell) -> Option<Direction> {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dz = i64::from(other.z) - i64::from(self.z);
        match (dx, dz) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for GlobalCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Location of a chunk inside the chunk arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    x: i32,
    z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk column along the X axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Chunk row along the Z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }
}

/// Cell offset inside a single chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalCell {
    x: u32,
    z: u32,
}

impl LocalCell {
    /// Creates a new chunk-local cell coordinate.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Column inside the chunk.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Row inside the chunk.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }
}

/// Cardinal facing of the agent and of every wall query.
///
/// Discriminants match the facing index used by control layers:
/// `0 = +Z`, `1 = +X`, `2 = -Z`, `3 = -X`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing Z.
    North,
    /// Toward increasing X.
    East,
    /// Toward decreasing Z.
    South,
    /// Toward decreasing X.
    West,
}

impl Direction {
    /// Every direction in facing-index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Facing index of the direction.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Direction for a facing index, wrapping any integer into `0..4`.
    #[must_use]
    pub const fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// Direction reached after turning `delta` quarter turns clockwise.
    #[must_use]
    pub const fn rotated(self, delta: i32) -> Self {
        Self::from_index(self.index() as i32 + delta.rem_euclid(4))
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.rotated(2)
    }

    /// Unit cell offset along `(x, z)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Heading of the direction in degrees, clockwise from +Z.
    #[must_use]
    pub fn yaw_degrees(self) -> f32 {
        f32::from(self.index()) * 90.0
    }
}

/// Quarter turn requested for the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise quarter turn.
    Left,
    /// Clockwise quarter turn.
    Right,
}

impl Turn {
    /// Signed facing-index delta applied by the turn.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Placement of the 2×2 finish block carved before the maze is grown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishArea {
    /// The maze has no finish block.
    #[default]
    None,
    /// Finish block whose upper cell is the grid center.
    Center,
    /// Finish block in the far `(+X, +Z)` corner.
    Corner,
    /// Finish block anchored at an explicit lower-left cell.
    At {
        /// Lower-left cell of the block.
        anchor: GlobalCell,
    },
}

/// Layout choices applied on top of a [`GridSpec`] when generating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeOptions {
    /// Placement of the finish block, if any.
    pub finish: FinishArea,
    /// Explicit generation root and agent home, overriding the default.
    pub start: Option<GlobalCell>,
}

/// Externally supplied maze parameters, accepted verbatim.
///
/// Control and replay layers persist these values next to recorded runs and
/// hand them back unchanged to reproduce the same maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeParameters {
    /// Seed forwarded to the generator.
    pub seed: i64,
    /// Number of cells along each chunk edge.
    pub chunk_size: i32,
    /// Maze width measured in chunks.
    pub width: i32,
    /// Maze height measured in chunks.
    pub height: i32,
    /// Finish block placement.
    #[serde(default)]
    pub finish: FinishArea,
}

impl MazeParameters {
    /// Grid specification described by the parameters.
    #[must_use]
    pub const fn to_spec(&self) -> GridSpec {
        GridSpec::new(self.chunk_size, self.width, self.height, self.seed)
    }

    /// Generation options described by the parameters.
    #[must_use]
    pub const fn options(&self) -> MazeOptions {
        MazeOptions {
            finish: self.finish,
            start: None,
        }
    }
}

/// Requests that drive the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Rotates the agent by a quarter turn.
    Turn {
        /// Side to turn toward.
        turn: Turn,
    },
    /// Drives one cell along the current facing.
    MoveForward,
    /// Reverses one cell against the current facing.
    MoveBackward,
    /// Re-homes the agent onto a cell, cancelling any transition.
    Teleport {
        /// Destination cell.
        cell: GlobalCell,
    },
    /// Advances the active transition by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Outcomes broadcast by the navigator after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A rotation transition began.
    RotationStarted {
        /// Facing before the turn.
        from: Direction,
        /// Facing once the turn completes.
        to: Direction,
    },
    /// A move transition began.
    MoveStarted {
        /// Cell being left.
        from: GlobalCell,
        /// Cell being entered.
        to: GlobalCell,
    },
    /// A rotation finished and the new facing was committed.
    RotationCompleted {
        /// Committed facing.
        direction: Direction,
    },
    /// A move finished and the new cell was committed.
    MoveCompleted {
        /// Cell the agent left.
        from: GlobalCell,
        /// Cell the agent now occupies.
        to: GlobalCell,
    },
    /// The agent was re-homed.
    Teleported {
        /// Cell the agent now occupies.
        cell: GlobalCell,
        /// Transition that was cancelled by the teleport.
        cancelled: TransitionState,
    },
    /// A request was ignored.
    RequestRejected {
        /// Why the request could not be honoured.
        reason: Rejection,
    },
}

/// Reasons a navigation request is ignored. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The navigator has no graph or no current node yet.
    NotReady,
    /// Another transition is still running.
    Busy,
    /// A wall separates the agent from the requested neighbour.
    Blocked,
    /// The requested neighbour lies outside the maze.
    MissingNeighbor,
    /// The teleport destination is not a node of the graph.
    UnknownCell,
}

/// Transition currently animating the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionState {
    /// No transition is active.
    #[default]
    Idle,
    /// The agent is turning in place.
    Rotating,
    /// The agent is driving between two cells.
    Moving,
}

/// Configuration problems detected before a maze is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Chunks must contain at least one cell per edge.
    #[error("chunk size must be positive, got {chunk_size}")]
    InvalidChunkSize {
        /// Rejected chunk size.
        chunk_size: i32,
    },
    /// Mazes must span at least one chunk along each axis.
    #[error("maze size must be positive, got {chunks_x}x{chunks_z} chunks")]
    InvalidMazeSize {
        /// Rejected chunk count along X.
        chunks_x: i32,
        /// Rejected chunk count along Z.
        chunks_z: i32,
    },
    /// The grid does not fit the global coordinate space.
    #[error("grid of {chunks_x}x{chunks_z} chunks of size {chunk_size} is too large")]
    GridTooLarge {
        /// Requested chunk size.
        chunk_size: i32,
        /// Requested chunk count along X.
        chunks_x: i32,
        /// Requested chunk count along Z.
        chunks_z: i32,
    },
    /// The 2×2 finish block would extend beyond the grid.
    #[error("finish block anchored at {anchor} does not fit inside the grid")]
    FinishOutOfBounds {
        /// Lower-left cell of the rejected block.
        anchor: GlobalCell,
    },
    /// The requested start cell lies outside the grid.
    #[error("start cell {cell} lies outside the grid")]
    StartOutOfBounds {
        /// Rejected start cell.
        cell: GlobalCell,
    },
}
