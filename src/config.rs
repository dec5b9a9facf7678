//! Run configuration: canvas, frame rate, starting key/tempo and encoder.

use std::path::PathBuf;

use crate::error::{ChordError, Result};
use crate::renderer::WheelGeometry;
use crate::timemap::{ScheduleSettings, DEFAULT_BPM, DEFAULT_FPS, DEFAULT_KEY};

/// How marker sizes relate to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryMode {
    /// Scale radii and offsets with the canvas (identical at 1280×720)
    #[default]
    ScaleToCanvas,
    /// Keep the 1280×720 pixel sizes on any canvas
    Fixed,
}

/// Everything about a run that does not come from the chord sheet.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Canvas width (pixels)
    pub width: u32,
    /// Canvas height (pixels)
    pub height: u32,
    /// Frame rate (FPS)
    pub fps: u32,
    /// Key before the first override
    pub initial_key: i32,
    /// Tempo before the first override
    pub initial_bpm: i32,
    pub geometry: GeometryMode,
    /// ffmpeg video codec name (`mpeg4` is the `mp4v` fourcc)
    pub codec: String,
    /// ffmpeg executable
    pub ffmpeg: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: DEFAULT_FPS,
            initial_key: DEFAULT_KEY,
            initial_bpm: DEFAULT_BPM,
            geometry: GeometryMode::default(),
            codec: "mpeg4".to_string(),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl RunConfig {
    /// Reject settings that would make the video meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChordError::Configuration(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ChordError::Configuration(
                "frame rate must be positive".to_string(),
            ));
        }
        if self.codec.trim().is_empty() {
            return Err(ChordError::Configuration("codec must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            fps: self.fps,
            initial_key: self.initial_key,
            initial_bpm: self.initial_bpm,
        }
    }

    pub fn wheel_geometry(&self) -> WheelGeometry {
        match self.geometry {
            GeometryMode::ScaleToCanvas => WheelGeometry::for_canvas(self.width, self.height),
            GeometryMode::Fixed => WheelGeometry::reference(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_movie() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.width, config.height, config.fps), (1280, 720, 30));
        assert_eq!(config.schedule_settings(), ScheduleSettings::default());
        assert_eq!(config.wheel_geometry(), WheelGeometry::reference());
    }

    #[test]
    fn fixed_geometry_ignores_canvas() {
        let config = RunConfig {
            width: 640,
            height: 360,
            geometry: GeometryMode::Fixed,
            ..RunConfig::default()
        };
        assert_eq!(config.wheel_geometry(), WheelGeometry::reference());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = RunConfig {
            height: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(ChordError::Configuration(_))));

        let config = RunConfig {
            fps: 0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
