//! chordwheel command line: chord sheet JSON in, chord-wheel movie out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chordwheel::{
    generate_midi, generate_playback_map, generate_timemap, parse_file, playback_map_to_json,
    render_sheet_to_svgs, render_video, FfmpegEncoder, FrameSink, GeometryMode, MidiOptions,
    PngSequenceSink, RunConfig,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "chordwheel")]
#[command(about = "Render a chord progression as a chord-wheel video", long_about = None)]
struct Args {
    /// Chord sheet (JSON)
    input: PathBuf,

    /// Output video file
    #[arg(short, long, value_name = "FILE", default_value = "chord_movie.mp4")]
    output: PathBuf,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// ffmpeg video codec
    #[arg(long, default_value = "mpeg4")]
    codec: String,

    /// ffmpeg executable
    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Write PNG frames into this directory instead of encoding a video
    #[arg(long, value_name = "DIR")]
    frames_dir: Option<PathBuf>,

    /// Also write one SVG diagram per chord into this directory
    #[arg(long, value_name = "DIR")]
    svg_dir: Option<PathBuf>,

    /// Also write a MIDI rendition of the progression
    #[arg(long, value_name = "FILE")]
    midi: Option<PathBuf>,

    /// Also write the chord timeline as JSON
    #[arg(long, value_name = "FILE")]
    timeline: Option<PathBuf>,

    /// Key before the first key change (0 = C, steps of fifths)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    initial_key: i32,

    /// Tempo before the first tempo change
    #[arg(long, default_value_t = 160)]
    initial_bpm: i32,

    /// Keep 1280x720 marker sizes regardless of canvas size
    #[arg(long)]
    fixed_geometry: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            initial_key: self.initial_key,
            initial_bpm: self.initial_bpm,
            geometry: if self.fixed_geometry {
                GeometryMode::Fixed
            } else {
                GeometryMode::ScaleToCanvas
            },
            codec: self.codec.clone(),
            ffmpeg: self.ffmpeg.clone(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.run_config();
    config.validate().context("invalid settings")?;

    let sheet = parse_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(input = %args.input.display(), chords = sheet.chords.len(), "loaded chord sheet");

    if let Some(path) = &args.timeline {
        let map = generate_playback_map(&sheet, &config.schedule_settings())?;
        fs::write(path, playback_map_to_json(&map)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "timeline written");
    }

    if let Some(path) = &args.midi {
        let tmap = generate_timemap(&sheet, &config.schedule_settings())?;
        fs::write(path, generate_midi(&sheet, &tmap, &MidiOptions::default()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "midi written");
    }

    if let Some(dir) = &args.svg_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        for (i, svg) in render_sheet_to_svgs(&sheet, &config)?.iter().enumerate() {
            let path = dir.join(format!("chord_{i:03}.svg"));
            fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        }
        info!(dir = %dir.display(), "svg diagrams written");
    }

    let mut sink: Box<dyn FrameSink> = match &args.frames_dir {
        Some(dir) => Box::new(PngSequenceSink::create(dir, config.width, config.height)?),
        None => Box::new(
            FfmpegEncoder::spawn(&args.output, &config)
                .with_context(|| format!("failed to start encoder for {}", args.output.display()))?,
        ),
    };
    let summary = render_video(&sheet, &config, sink.as_mut()).context("rendering failed")?;

    println!(
        "{} chords, {} frames, {:.2}s",
        summary.chords, summary.frames, summary.duration_secs
    );
    Ok(())
}
