use maze_drive_core::{Direction, GlobalCell};
use maze_drive_world::GridModel;

/// Draws the maze with north at the top.
///
/// The start cell is marked `S`, finish cells `F`, and cells on `route` `.`.
pub(crate) fn render(model: &GridModel, route: &[GlobalCell]) -> String {
    let dimensions = model.dimensions();
    let width = dimensions.width_cells() as i32;
    let depth = dimensions.depth_cells() as i32;
    let mut out = String::new();

    for z in (0..depth).rev() {
        for x in 0..width {
            out.push('+');
            out.push_str(edge(model, GlobalCell::new(x, z), Direction::North));
        }
        out.push_str("+\n");

        for x in 0..width {
            let cell = GlobalCell::new(x, z);
            out.push(side(model, cell, Direction::West));
            out.push_str(marker(model, route, cell));
        }
        out.push(side(model, GlobalCell::new(width - 1, z), Direction::East));
        out.push('\n');
    }

    for x in 0..width {
        out.push('+');
        out.push_str(edge(model, GlobalCell::new(x, 0), Direction::South));
    }
    out.push_str("+\n");
    out
}

fn edge(model: &GridModel, cell: GlobalCell, direction: Direction) -> &'static str {
    if model.has_wall(cell, direction) {
        "---"
    } else {
        "   "
    }
}

fn side(model: &GridModel, cell: GlobalCell, direction: Direction) -> char {
    if model.has_wall(cell, direction) {
        '|'
    } else {
        ' '
    }
}

fn marker(model: &GridModel, route: &[GlobalCell], cell: GlobalCell) -> &'static str {
    if cell == model.start_cell() {
        " S "
    } else if model.is_finish(cell) {
        " F "
    } else if route.contains(&cell) {
        " . "
    } else {
        "   "
    }
}
