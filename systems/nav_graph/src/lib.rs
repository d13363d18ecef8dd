#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Navigation graph derived from a finished maze.
//!
//! [`build_graph`] materializes one [`NavNode`] per cell of a [`GridModel`],
//! each carrying the world-space anchor renderers place the agent at and the
//! exits left open by generation. Construction is all-or-nothing: any
//! duplicate, stray, or missing coordinate aborts with a [`GraphError`]
//! instead of handing back a partial graph.

mod navigation;

pub use navigation::NavigationField;

use std::collections::HashMap;

use glam::Vec3;
use log::debug;
use maze_drive_core::{ChunkCoord, Direction, GlobalCell, LocalCell};
use maze_drive_world::GridModel;
use thiserror::Error;

/// Spacing parameters used to place node anchors in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorLayout {
    cell_length: f32,
    chunk_gap: f32,
    origin: Vec3,
}

impl AnchorLayout {
    /// Creates a new layout.
    ///
    /// `chunk_gap` is extra spacing inserted between neighbouring chunks on
    /// top of their cell extent.
    #[must_use]
    pub const fn new(cell_length: f32, chunk_gap: f32, origin: Vec3) -> Self {
        Self {
            cell_length,
            chunk_gap,
            origin,
        }
    }

    /// World position of the center of a cell.
    #[must_use]
    pub fn anchor(&self, chunk: ChunkCoord, local: LocalCell, chunk_size: u32) -> Vec3 {
        let stride = chunk_size as f32 * self.cell_length + self.chunk_gap;
        let x = chunk.x() as f32 * stride + (local.x() as f32 + 0.5) * self.cell_length;
        let z = chunk.z() as f32 * stride + (local.z() as f32 + 0.5) * self.cell_length;
        self.origin + Vec3::new(x, 0.0, z)
    }
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self::new(1.0, 0.0, Vec3::ZERO)
    }
}

/// Navigation node bound to a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavNode {
    cell: GlobalCell,
    chunk: ChunkCoord,
    local: LocalCell,
    anchor: Vec3,
    exits: [bool; 4],
}

impl NavNode {
    /// Creates a node. `exits` is indexed by [`Direction::index`].
    #[must_use]
    pub const fn new(
        cell: GlobalCell,
        chunk: ChunkCoord,
        local: LocalCell,
        anchor: Vec3,
        exits: [bool; 4],
    ) -> Self {
        Self {
            cell,
            chunk,
            local,
            anchor,
            exits,
        }
    }

    /// Global coordinate of the cell.
    #[must_use]
    pub const fn cell(&self) -> GlobalCell {
        self.cell
    }

    /// Chunk that owns the cell.
    #[must_use]
    pub const fn chunk(&self) -> ChunkCoord {
        self.chunk
    }

    /// Cell offset inside its chunk.
    #[must_use]
    pub const fn local(&self) -> LocalCell {
        self.local
    }

    /// World-space position of the cell center.
    #[must_use]
    pub const fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Reports whether the agent may leave the cell in `direction`.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        self.exits[direction.index() as usize]
    }

    /// Directions with an open exit, in facing-index order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.is_open(*direction))
    }
}

/// Consistency failures that abort graph construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two nodes claimed the same coordinate.
    #[error("duplicate navigation node at {cell}")]
    DuplicateNode {
        /// Coordinate claimed twice.
        cell: GlobalCell,
    },
    /// A node lies outside the grid.
    #[error("navigation node at {cell} lies outside the grid")]
    NodeOutOfBounds {
        /// Offending coordinate.
        cell: GlobalCell,
    },
    /// A grid coordinate has no node.
    #[error("missing navigation node at {cell}")]
    MissingNode {
        /// Coordinate without a node.
        cell: GlobalCell,
    },
}

/// Complete set of navigation nodes keyed by global coordinate.
#[derive(Clone, Debug)]
pub struct NavGraph {
    width: u32,
    depth: u32,
    nodes: Vec<NavNode>,
    index: HashMap<GlobalCell, usize>,
}

impl NavGraph {
    /// Validates a node batch covering a `width × depth` grid.
    ///
    /// Every coordinate in `[0, width) × [0, depth)` must be claimed by
    /// exactly one node.
    pub fn from_nodes(nodes: Vec<NavNode>, width: u32, depth: u32) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());

        for (position, node) in nodes.iter().enumerate() {
            let cell = node.cell();
            let inside = cell.x() >= 0
                && cell.z() >= 0
                && (cell.x() as u32) < width
                && (cell.z() as u32) < depth;
            if !inside {
                return Err(GraphError::NodeOutOfBounds { cell });
            }
            if index.insert(cell, position).is_some() {
                return Err(GraphError::DuplicateNode { cell });
            }
        }

        for z in 0..depth {
            for x in 0..width {
                let cell = GlobalCell::new(x as i32, z as i32);
                if !index.contains_key(&cell) {
                    return Err(GraphError::MissingNode { cell });
                }
            }
        }

        Ok(Self {
            width,
            depth,
            nodes,
            index,
        })
    }

    /// Grid extent covered by the graph, in cells along X and Z.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.depth)
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node bound to the cell, if any.
    #[must_use]
    pub fn node(&self, cell: GlobalCell) -> Option<&NavNode> {
        self.index
            .get(&cell)
            .and_then(|position| self.nodes.get(*position))
    }

    /// Reports whether the cell has a node.
    #[must_use]
    pub fn contains(&self, cell: GlobalCell) -> bool {
        self.index.contains_key(&cell)
    }

    /// Node reached by leaving `cell` through an open exit.
    #[must_use]
    pub fn neighbor(&self, cell: GlobalCell, direction: Direction) -> Option<&NavNode> {
        let node = self.node(cell)?;
        if !node.is_open(direction) {
            return None;
        }
        self.node(cell.step(direction))
    }

    /// Nodes in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &NavNode> {
        self.nodes.iter()
    }

    /// Shortest route from `from` to the nearest goal, excluding `from`.
    ///
    /// Returns `None` when no goal is reachable.
    #[must_use]
    pub fn route(&self, from: GlobalCell, goals: &[GlobalCell]) -> Option<Vec<GlobalCell>> {
        let mut field = NavigationField::default();
        field.rebuild(self, goals);
        field.route(self, from)
    }
}

/// Builds the navigation graph for a finished maze.
pub fn build_graph(model: &GridModel, layout: &AnchorLayout) -> Result<NavGraph, GraphError> {
    let dimensions = model.dimensions();
    let size = dimensions.chunk_size();
    let mut nodes = Vec::with_capacity(dimensions.cell_count());

    for chunk in model.chunks() {
        let coord = chunk.coord();
        for z in 0..size {
            for x in 0..size {
                let local = LocalCell::new(x, z);
                let cell = dimensions.global(coord, local);
                let exits = Direction::ALL.map(|direction| {
                    model
                        .neighbor(cell, direction)
                        .is_some_and(|next| !model.has_wall_between(cell, next))
                });
                nodes.push(NavNode::new(
                    cell,
                    coord,
                    local,
                    layout.anchor(coord, local, size),
                    exits,
                ));
            }
        }
    }

    let graph = NavGraph::from_nodes(nodes, dimensions.width_cells(), dimensions.depth_cells())?;
    debug!(
        "built navigation graph with {} nodes over {}x{} cells",
        graph.len(),
        dimensions.width_cells(),
        dimensions.depth_cells()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_centers_cells_and_spaces_chunks() {
        let layout = AnchorLayout::new(2.0, 1.0, Vec3::new(10.0, 3.0, -5.0));

        let first = layout.anchor(ChunkCoord::new(0, 0), LocalCell::new(0, 0), 4);
        assert_eq!(first, Vec3::new(11.0, 3.0, -4.0));

        let across = layout.anchor(ChunkCoord::new(1, 0), LocalCell::new(0, 2), 4);
        assert_eq!(across, Vec3::new(10.0 + 9.0 + 1.0, 3.0, -5.0 + 5.0));
    }

    #[test]
    fn node_reports_open_directions() {
        let node = NavNode::new(
            GlobalCell::new(0, 0),
            ChunkCoord::new(0, 0),
            LocalCell::new(0, 0),
            Vec3::ZERO,
            [true, false, false, true],
        );
        let open: Vec<Direction> = node.open_directions().collect();
        assert_eq!(open, vec![Direction::North, Direction::West]);
        assert!(!node.is_open(Direction::East));
    }
}
