use maze_drive_core::{Direction, FinishArea, GridSpec, MazeOptions};
use maze_drive_system_generation::generate;
use proptest::prelude::*;

fn finish_strategy() -> impl Strategy<Value = FinishArea> {
    prop_oneof![
        Just(FinishArea::None),
        Just(FinishArea::Center),
        Just(FinishArea::Corner),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generation_is_deterministic(
        seed in any::<i64>(),
        chunk_size in 2i32..6,
        chunks_x in 1i32..4,
        chunks_z in 1i32..4,
        finish in finish_strategy(),
    ) {
        let spec = GridSpec::new(chunk_size, chunks_x, chunks_z, seed);
        let options = MazeOptions { finish, start: None };

        let first = generate(spec, &options).expect("first maze");
        let second = generate(spec, &options).expect("second maze");

        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_cell_is_reachable_from_start(
        seed in any::<i64>(),
        chunk_size in 2i32..6,
        chunks_x in 1i32..4,
        chunks_z in 1i32..4,
        finish in finish_strategy(),
    ) {
        let spec = GridSpec::new(chunk_size, chunks_x, chunks_z, seed);
        let model = generate(spec, &MazeOptions { finish, start: None }).expect("maze");

        let total = model.dimensions().cell_count();
        prop_assert_eq!(model.reachable_from(model.start_cell()), total);
        prop_assert_eq!(model.unvisited_count(), 0);
    }

    #[test]
    fn walls_agree_from_both_sides(
        seed in any::<i64>(),
        chunk_size in 1i32..6,
        chunks_x in 1i32..4,
        chunks_z in 1i32..4,
    ) {
        let spec = GridSpec::new(chunk_size, chunks_x, chunks_z, seed);
        let model = generate(spec, &MazeOptions::default()).expect("maze");

        prop_assert!(model.asymmetric_edges().is_empty());
        for cell in model.cells() {
            for direction in Direction::ALL {
                if let Some(next) = model.neighbor(cell, direction) {
                    prop_assert_eq!(
                        model.has_wall_between(cell, next),
                        model.has_wall_between(next, cell)
                    );
                }
            }
        }
    }
}
