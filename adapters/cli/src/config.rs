use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use glam::Vec3;
use maze_drive_core::{FinishArea, MazeParameters};
use maze_drive_system_movement::NavigatorTuning;
use maze_drive_system_nav_graph::AnchorLayout;
use serde::Deserialize;

/// Settings read from the optional TOML configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) seed: i64,
    pub(crate) chunk_size: i32,
    pub(crate) chunks_x: i32,
    pub(crate) chunks_z: i32,
    pub(crate) finish: FinishArea,
    pub(crate) drive: DriveConfig,
    pub(crate) layout: LayoutConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_size: 4,
            chunks_x: 3,
            chunks_z: 3,
            finish: FinishArea::Center,
            drive: DriveConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl CliConfig {
    /// Reads the configuration at `path`, or the defaults when no path is
    /// given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml")
    }

    pub(crate) const fn parameters(&self) -> MazeParameters {
        MazeParameters {
            seed: self.seed,
            chunk_size: self.chunk_size,
            width: self.chunks_x,
            height: self.chunks_z,
            finish: self.finish,
        }
    }
}

/// Timing of the automatic drive.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DriveConfig {
    pub(crate) rotation_millis: u64,
    pub(crate) speed: f32,
    pub(crate) tick_millis: u64,
    pub(crate) max_ticks: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            rotation_millis: 400,
            speed: 2.0,
            tick_millis: 50,
            max_ticks: 100_000,
        }
    }
}

impl DriveConfig {
    pub(crate) fn tuning(&self) -> NavigatorTuning {
        NavigatorTuning::new(Duration::from_millis(self.rotation_millis), self.speed)
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

/// World-space spacing of navigation anchors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub(crate) cell_length: f32,
    pub(crate) chunk_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_length: 1.0,
            chunk_gap: 0.0,
        }
    }
}

impl LayoutConfig {
    pub(crate) fn anchor_layout(&self) -> AnchorLayout {
        AnchorLayout::new(self.cell_length, self.chunk_gap, Vec3::ZERO)
    }
}
