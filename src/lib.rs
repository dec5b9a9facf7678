//! chordwheel: turns a chord sheet into a movie of chord-wheel diagrams.
//!
//! Each chord is drawn as two dials: a 12-slot key wheel marking the
//! scale of the current key, and a 7-slot chord wheel marking the bass
//! note and chord tones (brighter for more consonant tones). The diagram
//! is held on screen for the chord's beats at the current tempo, rounded
//! to whole frames without drift.
//!
//! # Example
//! ```no_run
//! use chordwheel::{parse_file, render_file_to_video, RunConfig};
//!
//! let sheet = parse_file("progression.json").unwrap();
//! println!("Chords: {}", sheet.chords.len());
//!
//! let summary = render_file_to_video("progression.json", "movie.mp4", &RunConfig::default()).unwrap();
//! println!("Frames: {}", summary.frames);
//! ```

pub mod config;
pub mod error;
pub mod midi;
pub mod model;
pub mod parser;
pub mod playback;
pub mod renderer;
pub mod theory;
pub mod timemap;
pub mod video;

use std::path::Path;

pub use config::{GeometryMode, RunConfig};
pub use error::{ChordError, Result};
pub use midi::{generate_midi, MidiOptions};
pub use model::*;
pub use parser::parse_chord_sheet;
pub use playback::{generate_playback_map, playback_map_to_json, PlaybackMap};
pub use renderer::{layout_diagram, render_chord, render_diagram, render_diagram_to_svg, Diagram, WheelGeometry};
pub use timemap::{generate_timemap, ScheduleSettings, TimemapEntry};
pub use video::{render_video, FfmpegEncoder, FrameSink, PngSequenceSink, RunSummary};

/// Parse a chord sheet JSON file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ChordSheet> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        ChordError::Configuration(format!("failed to read '{}': {e}", path.display()))
    })?;
    parse_chord_sheet(&json)
}

/// Parse a chord sheet file and encode it to `output` with ffmpeg.
/// Convenience function combining parsing, scheduling and encoding.
pub fn render_file_to_video<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &RunConfig,
) -> Result<RunSummary> {
    let sheet = parse_file(input)?;
    config.validate()?;
    let mut encoder = FfmpegEncoder::spawn(output, config)?;
    render_video(&sheet, config, &mut encoder)
}

/// Render one SVG diagram per chord, each in the key it is played in.
pub fn render_sheet_to_svgs(sheet: &ChordSheet, config: &RunConfig) -> Result<Vec<String>> {
    config.validate()?;
    let tmap = generate_timemap(sheet, &config.schedule_settings())?;
    let geometry = config.wheel_geometry();
    Ok(tmap
        .iter()
        .map(|entry| {
            let chord = &sheet.chords[entry.index];
            let diagram = layout_diagram(
                entry.key,
                chord.bass,
                &chord.shape,
                &chord.accidentals,
                config.width,
                config.height,
                geometry,
            );
            render_diagram_to_svg(&diagram, sheet.background, sheet.foreground)
        })
        .collect())
}
