use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use log::debug;
use maze_drive_core::{Command, Event, GlobalCell, Turn};
use maze_drive_system_movement::AgentNavigator;
use maze_drive_system_nav_graph::{NavGraph, NavigationField};
use maze_drive_world::GridModel;

use crate::config::DriveConfig;

/// Outcome of an automatic drive from the start cell to the finish.
#[derive(Debug)]
pub(crate) struct DriveSummary {
    pub(crate) finish: GlobalCell,
    pub(crate) path: Vec<GlobalCell>,
    pub(crate) moves: usize,
    pub(crate) turns: usize,
    pub(crate) elapsed: Duration,
}

/// Steers the agent down the distance field until it stands on a finish cell.
pub(crate) fn drive_to_finish(
    model: &Arc<GridModel>,
    graph: &Arc<NavGraph>,
    config: &DriveConfig,
) -> Result<DriveSummary> {
    if model.finish_cells().is_empty() {
        bail!("maze has no finish block to drive to");
    }

    let mut field = NavigationField::default();
    field.rebuild(graph, model.finish_cells());

    let mut navigator = AgentNavigator::new(config.tuning());
    navigator.attach(Arc::clone(model), Arc::clone(graph));
    let mut driver = Driver {
        navigator,
        tick: config.tick(),
        max_ticks: config.max_ticks,
        ticks: 0,
    };
    driver.submit(Command::Teleport {
        cell: model.start_cell(),
    })?;

    let mut path = vec![model.start_cell()];
    let (mut moves, mut turns) = (0, 0);
    loop {
        let cell = driver
            .navigator
            .current_cell()
            .context("agent lost its placement")?;
        if model.is_finish(cell) {
            return Ok(DriveSummary {
                finish: cell,
                path,
                moves,
                turns,
                elapsed: driver.tick.saturating_mul(driver.ticks),
            });
        }

        let next = field
            .next_step(graph, cell)
            .with_context(|| format!("no route from {cell} to the finish"))?;
        let heading = cell
            .direction_to(next)
            .with_context(|| format!("route step {cell} -> {next} is not adjacent"))?;

        while driver.navigator.current_direction() != heading {
            let turn = if driver.navigator.current_direction().rotated(-1) == heading {
                Turn::Left
            } else {
                Turn::Right
            };
            driver.submit(Command::Turn { turn })?;
            turns += 1;
        }

        driver.submit(Command::MoveForward)?;
        moves += 1;
        path.push(next);
    }
}

struct Driver {
    navigator: AgentNavigator,
    tick: Duration,
    max_ticks: u32,
    ticks: u32,
}

impl Driver {
    /// Applies a command and ticks until the transition it started settles.
    fn submit(&mut self, command: Command) -> Result<()> {
        let mut events = Vec::new();
        self.navigator.apply(command, &mut events);
        if let Some(Event::RequestRejected { reason }) = events.last() {
            bail!("navigator rejected {command:?}: {reason:?}");
        }

        while self.navigator.is_transitioning() {
            if self.ticks >= self.max_ticks {
                bail!("drive exceeded {} ticks", self.max_ticks);
            }
            self.ticks += 1;
            if let Some(event) = self.navigator.tick(self.tick) {
                debug!("{event:?}");
            }
        }
        Ok(())
    }
}
