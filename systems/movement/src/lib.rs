#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent navigator that drives the car through a generated maze.
//!
//! The [`AgentNavigator`] owns the agent's cell, facing, and the single
//! transition that may be animating it. Requests are validated against the
//! shared [`GridModel`] and [`NavGraph`]; anything that cannot be honoured is
//! a silent no-op reported as `false` or as [`Event::RequestRejected`].
//! Accepted requests start a timed transition that only advances when the
//! caller ticks the navigator, and commits once its duration has elapsed.

use std::{sync::Arc, time::Duration};

use glam::Vec3;
use log::{debug, trace};
use maze_drive_core::{
    ChunkCoord, Command, Direction, Event, GlobalCell, LocalCell, Rejection, TransitionState, Turn,
};
use maze_drive_system_nav_graph::NavGraph;
use maze_drive_world::GridModel;

const DEFAULT_ROTATION_DURATION: Duration = Duration::from_millis(400);
const DEFAULT_SPEED: f32 = 2.0;

/// Timing parameters for agent transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigatorTuning {
    rotation_duration: Duration,
    speed: f32,
}

impl NavigatorTuning {
    /// Creates tuning with a fixed quarter-turn duration and a travel speed
    /// in world units per second.
    #[must_use]
    pub const fn new(rotation_duration: Duration, speed: f32) -> Self {
        Self {
            rotation_duration,
            speed,
        }
    }

    /// Time taken to travel `distance` world units.
    ///
    /// Non-positive or non-finite speeds make travel instantaneous.
    #[must_use]
    pub fn travel_duration(&self, distance: f32) -> Duration {
        if !self.speed.is_finite() || self.speed <= 0.0 || distance <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f32(distance / self.speed).unwrap_or(Duration::ZERO)
    }
}

impl Default for NavigatorTuning {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_DURATION, DEFAULT_SPEED)
    }
}

/// Interpolated placement of the agent for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPose {
    /// World-space position between node anchors.
    pub position: Vec3,
    /// Heading in degrees clockwise from +Z, within `0.0..360.0`.
    pub yaw_degrees: f32,
}

/// Stateful controller for the agent.
#[derive(Debug)]
pub struct AgentNavigator {
    tuning: NavigatorTuning,
    maze: Option<AttachedMaze>,
    current: Option<GlobalCell>,
    direction: Direction,
    transition: Transition,
}

impl AgentNavigator {
    /// Creates a navigator that is not yet attached to a maze.
    #[must_use]
    pub fn new(tuning: NavigatorTuning) -> Self {
        Self {
            tuning,
            maze: None,
            current: None,
            direction: Direction::North,
            transition: Transition::Idle,
        }
    }

    /// Binds the navigator to a maze and its graph.
    ///
    /// Any previous placement is dropped; the agent must be re-homed with
    /// [`AgentNavigator::teleport`] or [`AgentNavigator::home`] before it is
    /// ready.
    pub fn attach(&mut self, model: Arc<GridModel>, graph: Arc<NavGraph>) {
        self.maze = Some(AttachedMaze { model, graph });
        self.current = None;
        self.transition = Transition::Idle;
    }

    /// Reports whether the navigator accepts move and turn requests.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.maze.is_some() && self.current.is_some()
    }

    /// Cell the agent occupies. Mid-move this is still the departure cell.
    #[must_use]
    pub const fn current_cell(&self) -> Option<GlobalCell> {
        self.current
    }

    /// Current cell split into its chunk and local coordinate.
    #[must_use]
    pub fn current_chunk_cell(&self) -> Option<(ChunkCoord, LocalCell)> {
        let maze = self.maze.as_ref()?;
        let node = maze.graph.node(self.current?)?;
        Some((node.chunk(), node.local()))
    }

    /// Committed facing. Mid-turn this is still the original facing.
    #[must_use]
    pub const fn current_direction(&self) -> Direction {
        self.direction
    }

    /// Kind of transition currently animating the agent.
    #[must_use]
    pub const fn transition_state(&self) -> TransitionState {
        match self.transition {
            Transition::Idle => TransitionState::Idle,
            Transition::Rotating(_) => TransitionState::Rotating,
            Transition::Moving(_) => TransitionState::Moving,
        }
    }

    /// Reports whether a transition is running.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        !matches!(self.transition, Transition::Idle)
    }

    /// Starts a quarter turn counter-clockwise.
    pub fn turn_left(&mut self) -> bool {
        self.turn(Turn::Left)
    }

    /// Starts a quarter turn clockwise.
    pub fn turn_right(&mut self) -> bool {
        self.turn(Turn::Right)
    }

    /// Starts a quarter turn toward the provided side.
    pub fn turn(&mut self, turn: Turn) -> bool {
        accepted(self.begin_turn(turn))
    }

    /// Starts driving one cell along the current facing.
    pub fn move_forward(&mut self) -> bool {
        accepted(self.begin_move(self.direction))
    }

    /// Starts reversing one cell against the current facing.
    pub fn move_backward(&mut self) -> bool {
        accepted(self.begin_move(self.direction.opposite()))
    }

    /// Places the agent on `cell`, cancelling any running transition.
    ///
    /// Fails only when no maze is attached or the cell has no node.
    pub fn teleport(&mut self, cell: GlobalCell) -> bool {
        accepted(self.relocate(cell))
    }

    /// Places the agent on the maze start cell.
    pub fn home(&mut self) -> bool {
        match self.maze.as_ref().map(|maze| maze.model.start_cell()) {
            Some(start) => self.teleport(start),
            None => false,
        }
    }

    /// Advances the running transition by `dt`.
    ///
    /// Returns the completion event on the tick where the transition's
    /// duration has fully elapsed.
    pub fn tick(&mut self, dt: Duration) -> Option<Event> {
        match &mut self.transition {
            Transition::Idle => None,
            Transition::Rotating(rotation) => {
                rotation.elapsed = rotation.elapsed.saturating_add(dt);
                if rotation.elapsed < rotation.duration {
                    return None;
                }
                let direction = rotation.to;
                self.direction = direction;
                self.transition = Transition::Idle;
                Some(Event::RotationCompleted { direction })
            }
            Transition::Moving(travel) => {
                travel.elapsed = travel.elapsed.saturating_add(dt);
                if travel.elapsed < travel.duration {
                    return None;
                }
                let (from, to) = (travel.from, travel.to);
                self.current = Some(to);
                self.transition = Transition::Idle;
                Some(Event::MoveCompleted { from, to })
            }
        }
    }

    /// Interpolated position and heading of the agent.
    #[must_use]
    pub fn pose(&self) -> Option<AgentPose> {
        let maze = self.maze.as_ref()?;
        let anchor = maze.graph.node(self.current?)?.anchor();
        let pose = match self.transition {
            Transition::Idle => AgentPose {
                position: anchor,
                yaw_degrees: self.direction.yaw_degrees(),
            },
            Transition::Rotating(rotation) => {
                let t = progress(rotation.elapsed, rotation.duration);
                let swept = rotation.delta as f32 * 90.0 * t;
                AgentPose {
                    position: anchor,
                    yaw_degrees: (rotation.from.yaw_degrees() + swept).rem_euclid(360.0),
                }
            }
            Transition::Moving(travel) => AgentPose {
                position: travel
                    .from_anchor
                    .lerp(travel.to_anchor, progress(travel.elapsed, travel.duration)),
                yaw_degrees: self.direction.yaw_degrees(),
            },
        };
        Some(pose)
    }

    /// Applies a command, appending the resulting events.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let outcome = match command {
            Command::Turn { turn } => self.begin_turn(turn),
            Command::MoveForward => self.begin_move(self.direction),
            Command::MoveBackward => self.begin_move(self.direction.opposite()),
            Command::Teleport { cell } => self.relocate(cell),
            Command::Tick { dt } => {
                if let Some(event) = self.tick(dt) {
                    out_events.push(event);
                }
                return;
            }
        };

        match outcome {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                trace!("{command:?} rejected: {reason:?}");
                out_events.push(Event::RequestRejected { reason });
            }
        }
    }

    fn ensure_idle(&self) -> Result<GlobalCell, Rejection> {
        let current = match (&self.maze, self.current) {
            (Some(_), Some(current)) => current,
            _ => return Err(Rejection::NotReady),
        };
        if self.is_transitioning() {
            return Err(Rejection::Busy);
        }
        Ok(current)
    }

    fn begin_turn(&mut self, turn: Turn) -> Result<Event, Rejection> {
        let _ = self.ensure_idle()?;
        let from = self.direction;
        let to = from.rotated(turn.delta());
        self.transition = Transition::Rotating(Rotation {
            from,
            to,
            delta: turn.delta(),
            elapsed: Duration::ZERO,
            duration: self.tuning.rotation_duration,
        });
        Ok(Event::RotationStarted { from, to })
    }

    fn begin_move(&mut self, direction: Direction) -> Result<Event, Rejection> {
        let from = self.ensure_idle()?;
        let to = from.step(direction);

        let (from_anchor, to_anchor) = {
            let maze = self.maze.as_ref().ok_or(Rejection::NotReady)?;
            let origin = maze.graph.node(from).ok_or(Rejection::NotReady)?;
            let target = maze.graph.node(to).ok_or(Rejection::MissingNeighbor)?;
            if maze.model.has_wall_between(from, to) {
                return Err(Rejection::Blocked);
            }
            (origin.anchor(), target.anchor())
        };

        let duration = self.tuning.travel_duration(from_anchor.distance(to_anchor));
        self.transition = Transition::Moving(Travel {
            from,
            to,
            from_anchor,
            to_anchor,
            elapsed: Duration::ZERO,
            duration,
        });
        Ok(Event::MoveStarted { from, to })
    }

    fn relocate(&mut self, cell: GlobalCell) -> Result<Event, Rejection> {
        let maze = self.maze.as_ref().ok_or(Rejection::NotReady)?;
        if !maze.graph.contains(cell) {
            return Err(Rejection::UnknownCell);
        }

        let cancelled = self.transition_state();
        self.transition = Transition::Idle;
        self.current = Some(cell);
        debug!("agent teleported to {cell}, cancelled {cancelled:?}");
        Ok(Event::Teleported { cell, cancelled })
    }
}

impl Default for AgentNavigator {
    fn default() -> Self {
        Self::new(NavigatorTuning::default())
    }
}

#[derive(Debug)]
struct AttachedMaze {
    model: Arc<GridModel>,
    graph: Arc<NavGraph>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Transition {
    Idle,
    Rotating(Rotation),
    Moving(Travel),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rotation {
    from: Direction,
    to: Direction,
    delta: i32,
    elapsed: Duration,
    duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Travel {
    from: GlobalCell,
    to: GlobalCell,
    from_anchor: Vec3,
    to_anchor: Vec3,
    elapsed: Duration,
    duration: Duration,
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn accepted(outcome: Result<Event, Rejection>) -> bool {
    match outcome {
        Ok(_) => true,
        Err(reason) => {
            trace!("navigation request rejected: {reason:?}");
            false
        }
    }
}
