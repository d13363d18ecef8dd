use maze_drive_core::{ConfigError, Direction, FinishArea, GlobalCell, GridSpec, MazeOptions};
use maze_drive_system_generation::{
    carve_finish_block, generate, generate_with_report, prepare, MazeGenerator,
};
use maze_drive_world::GridModel;

fn open_edge_count(model: &GridModel) -> usize {
    model
        .cells()
        .flat_map(|cell| {
            [Direction::North, Direction::East]
                .into_iter()
                .filter_map(move |direction| {
                    model.neighbor(cell, direction).map(|next| (cell, next))
                })
        })
        .filter(|(cell, next)| !model.has_wall_between(*cell, *next))
        .count()
}

#[test]
fn identical_specs_produce_identical_layouts() {
    let spec = GridSpec::new(6, 3, 2, 20_240_611);
    let options = MazeOptions::default();

    let first = generate(spec, &options).expect("first maze");
    let second = generate(spec, &options).expect("second maze");

    assert_eq!(first, second);
}

#[test]
fn different_seeds_produce_different_layouts() {
    let options = MazeOptions::default();
    let first = generate(GridSpec::new(8, 2, 2, 1), &options).expect("first maze");
    let second = generate(GridSpec::new(8, 2, 2, 2), &options).expect("second maze");

    assert_ne!(first.chunks(), second.chunks());
}

#[test]
fn generated_maze_is_fully_connected_and_symmetric() {
    let spec = GridSpec::new(5, 3, 3, -77);
    let model = generate(spec, &MazeOptions::default()).expect("maze");

    assert_eq!(model.reachable_from(model.start_cell()), 225);
    assert_eq!(model.unvisited_count(), 0);
    assert!(model.asymmetric_edges().is_empty());
}

#[test]
fn single_chunk_maze_is_a_spanning_tree() {
    let (model, report) =
        generate_with_report(GridSpec::new(7, 1, 1, 4), &MazeOptions::default()).expect("maze");

    assert_eq!(open_edge_count(&model), 48);
    assert_eq!(report.roots, 1);
    assert_eq!(report.carved, 48);
    assert_eq!(report.seams_opened, 0);
    assert_eq!(report.repaired, 0);
}

#[test]
fn backtracker_reaches_every_chunk_from_center() {
    let (model, report) =
        generate_with_report(GridSpec::new(4, 3, 2, 9), &MazeOptions::default()).expect("maze");

    assert_eq!(model.start_cell(), GlobalCell::new(6, 4));
    assert_eq!(report.carved, 95);
    assert_eq!(report.repaired, 0);
    assert_eq!(open_edge_count(&model), 95 + report.seams_opened);
}

#[test]
fn finish_block_is_open_before_passages_are_carved() {
    let options = MazeOptions {
        finish: FinishArea::At {
            anchor: GlobalCell::new(3, 3),
        },
        start: None,
    };
    let mut model = prepare(GridSpec::new(4, 2, 2, 11), &options).expect("prepared");

    let roots = carve_finish_block(&mut model);

    let block = [
        GlobalCell::new(3, 3),
        GlobalCell::new(4, 3),
        GlobalCell::new(3, 4),
        GlobalCell::new(4, 4),
    ];
    assert_eq!(roots, block.to_vec());
    assert_eq!(model.finish_cells(), &block);
    for a in block {
        assert!(model.is_visited(a));
        for b in block {
            if a.direction_to(b).is_some() {
                assert!(!model.has_wall_between(a, b), "wall between {a} and {b}");
            }
        }
    }
    assert_eq!(model.reachable_from(GlobalCell::new(3, 3)), 4);
    assert!(model.asymmetric_edges().is_empty());
}

#[test]
fn finish_roots_still_connect_the_whole_grid() {
    let options = MazeOptions {
        finish: FinishArea::Center,
        start: None,
    };
    let (model, report) =
        generate_with_report(GridSpec::new(4, 2, 2, 31), &options).expect("maze");

    assert_eq!(report.roots, 4);
    assert_eq!(model.start_cell(), GlobalCell::new(0, 0));
    assert!(model.is_finish(GlobalCell::new(4, 4)));
    assert!(model.is_finish(GlobalCell::new(3, 3)));
    assert_eq!(model.reachable_from(model.start_cell()), 64);
    assert!(model.asymmetric_edges().is_empty());
}

#[test]
fn corner_finish_occupies_far_corner() {
    let options = MazeOptions {
        finish: FinishArea::Corner,
        start: None,
    };
    let model = generate(GridSpec::new(3, 2, 1, 0), &options).expect("maze");

    assert_eq!(
        model.finish_cells(),
        &[
            GlobalCell::new(4, 1),
            GlobalCell::new(5, 1),
            GlobalCell::new(4, 2),
            GlobalCell::new(5, 2),
        ]
    );
    assert_eq!(model.reachable_from(GlobalCell::new(0, 0)), 18);
}

#[test]
fn explicit_start_overrides_finish_default() {
    let options = MazeOptions {
        finish: FinishArea::Corner,
        start: Some(GlobalCell::new(2, 0)),
    };
    let model = generate(GridSpec::new(3, 1, 1, 0), &options).expect("maze");
    assert_eq!(model.start_cell(), GlobalCell::new(2, 0));
}

#[test]
fn configuration_errors_are_reported_before_generation() {
    let options = MazeOptions::default();

    assert_eq!(
        generate(GridSpec::new(0, 2, 2, 1), &options),
        Err(ConfigError::InvalidChunkSize { chunk_size: 0 })
    );
    assert_eq!(
        generate(GridSpec::new(4, 0, 2, 1), &options),
        Err(ConfigError::InvalidMazeSize {
            chunks_x: 0,
            chunks_z: 2
        })
    );
    assert_eq!(
        generate(
            GridSpec::new(1, 1, 1, 1),
            &MazeOptions {
                finish: FinishArea::Center,
                start: None,
            }
        ),
        Err(ConfigError::FinishOutOfBounds {
            anchor: GlobalCell::new(-1, -1)
        })
    );
    assert_eq!(
        generate(
            GridSpec::new(2, 1, 1, 1),
            &MazeOptions {
                finish: FinishArea::None,
                start: Some(GlobalCell::new(0, 2)),
            }
        ),
        Err(ConfigError::StartOutOfBounds {
            cell: GlobalCell::new(0, 2)
        })
    );
}

#[test]
fn oversized_grid_is_refused_before_allocation() {
    assert_eq!(
        generate(GridSpec::new(1 << 20, 1, 1, 0), &MazeOptions::default()),
        Err(ConfigError::GridTooLarge {
            chunk_size: 1 << 20,
            chunks_x: 1,
            chunks_z: 1,
        })
    );
}

#[test]
fn generator_passes_can_be_replayed_step_by_step() {
    let spec = GridSpec::new(4, 2, 2, 123);
    let options = MazeOptions::default();

    let mut stepped = prepare(spec, &options).expect("prepared");
    let mut generator = MazeGenerator::new(spec.seed());
    let _ = generator.run(&mut stepped);

    assert_eq!(stepped, generate(spec, &options).expect("maze"));
}
