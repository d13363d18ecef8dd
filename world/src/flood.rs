//! Breadth-first flood fill over open walls.

use std::collections::VecDeque;

use maze_drive_core::{Direction, GlobalCell};

use crate::GridModel;

/// Number of cells reachable from `origin`, including `origin` itself.
///
/// Returns zero when the origin lies outside the grid.
pub(crate) fn reachable_count(model: &GridModel, origin: GlobalCell) -> usize {
    let dimensions = model.dimensions();
    let Some(origin_index) = dimensions.cell_index(origin) else {
        return 0;
    };

    let mut reached = vec![false; dimensions.cell_count()];
    reached[origin_index] = true;
    let mut count = 1;

    let mut queue = VecDeque::new();
    queue.push_back(origin);

    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let Some(neighbor) = model.neighbor(cell, direction) else {
                continue;
            };

            if model.has_wall_between(cell, neighbor) {
                continue;
            }

            let Some(index) = dimensions.cell_index(neighbor) else {
                continue;
            };

            if reached[index] {
                continue;
            }

            reached[index] = true;
            count += 1;
            queue.push_back(neighbor);
        }
    }

    count
}
