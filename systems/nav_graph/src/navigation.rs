//! Route distance field built over the navigation graph.

use std::collections::VecDeque;

use maze_drive_core::{Direction, GlobalCell};

use crate::NavGraph;

/// Dense hop-count grid seeded from goal cells.
///
/// The field mirrors the graph's dimensions and stores the reverse
/// breadth-first search results over open exits. Unreachable cells hold
/// `u32::MAX` and report no distance.
#[derive(Clone, Debug, Default)]
pub struct NavigationField {
    width: u32,
    depth: u32,
    distances: Vec<u32>,
}

impl NavigationField {
    /// Rebuilds the distances using a reverse breadth-first search from
    /// `goals`. Goals without a node are ignored.
    pub fn rebuild(&mut self, graph: &NavGraph, goals: &[GlobalCell]) {
        let (width, depth) = graph.dimensions();
        let cell_count = usize::try_from(u64::from(width) * u64::from(depth)).unwrap_or(0);

        self.width = width;
        self.depth = depth;
        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }

        let mut queue = VecDeque::new();

        for &goal in goals {
            if !graph.contains(goal) {
                continue;
            }

            let Some(index) = self.index(goal) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }

            self.distances[index] = 0;
            queue.push_back(goal);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let Some(neighbor) = graph.neighbor(cell, direction) else {
                    continue;
                };

                let Some(neighbor_index) = self.index(neighbor.cell()) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor.cell());
            }
        }
    }

    /// Width of the field in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Depth of the field in cells.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Hop count from the cell to the nearest goal, if one is reachable.
    #[must_use]
    pub fn distance(&self, cell: GlobalCell) -> Option<u32> {
        let index = self.index(cell)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Neighbour one hop closer to a goal.
    ///
    /// Ties resolve in facing-index order so that routes are stable.
    #[must_use]
    pub fn next_step(&self, graph: &NavGraph, cell: GlobalCell) -> Option<GlobalCell> {
        let current = self.distance(cell)?;
        if current == 0 {
            return None;
        }

        Direction::ALL.into_iter().find_map(|direction| {
            let neighbor = graph.neighbor(cell, direction)?.cell();
            let distance = self.distance(neighbor)?;
            (distance < current).then_some(neighbor)
        })
    }

    /// Follows the gradient from `from` down to a goal.
    ///
    /// The returned path excludes `from`; it is empty when `from` already is
    /// a goal and `None` when no goal is reachable.
    #[must_use]
    pub fn route(&self, graph: &NavGraph, from: GlobalCell) -> Option<Vec<GlobalCell>> {
        let hops = self.distance(from)?;
        let mut path = Vec::with_capacity(hops as usize);
        let mut cell = from;
        while let Some(next) = self.next_step(graph, cell) {
            path.push(next);
            cell = next;
        }
        Some(path)
    }

    fn index(&self, cell: GlobalCell) -> Option<usize> {
        if cell.x() < 0 || cell.z() < 0 {
            return None;
        }
        let x = u32::try_from(cell.x()).ok()?;
        let z = u32::try_from(cell.z()).ok()?;
        if x >= self.width || z >= self.depth {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        Some(usize::try_from(z).ok()? * width + usize::try_from(x).ok()?)
    }
}
