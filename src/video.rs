//! Video output: frame sinks and the loop that fills them.
//!
//! [`render_video`] schedules the whole sheet first, so a bad tempo or a
//! bad setting aborts before a single frame is written. It then renders
//! each chord once and hands the same frame to the sink `frame_count`
//! times. If anything fails part-way the sink is aborted, which removes
//! whatever partial output it produced.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{ChordError, Result};
use crate::model::ChordSheet;
use crate::renderer::render_chord;
use crate::timemap::{self, TimemapEntry};

/// Anything that accepts a fixed-size stream of RGBA frames.
pub trait FrameSink {
    /// Append one frame.
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<()>;

    /// Append the same frame `count` times.
    fn push_repeated(&mut self, frame: &RgbaImage, count: u64) -> Result<()> {
        for _ in 0..count {
            self.push_frame(frame)?;
        }
        Ok(())
    }

    /// Flush and close the output. Called once after the last frame.
    fn finish(&mut self) -> Result<()>;

    /// Discard the output after a failure.
    fn abort(&mut self);
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub chords: usize,
    pub frames: u64,
    pub duration_secs: f64,
}

/// Render every chord of `sheet` into `sink`.
pub fn render_video(
    sheet: &ChordSheet,
    config: &RunConfig,
    sink: &mut dyn FrameSink,
) -> Result<RunSummary> {
    match try_render_video(sheet, config, sink) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            warn!(error = %e, "discarding partial video output");
            sink.abort();
            Err(e)
        }
    }
}

fn try_render_video(
    sheet: &ChordSheet,
    config: &RunConfig,
    sink: &mut dyn FrameSink,
) -> Result<RunSummary> {
    config.validate()?;
    let timemap = timemap::generate_timemap(sheet, &config.schedule_settings())?;
    let summary = RunSummary {
        chords: timemap.len(),
        frames: timemap::total_frames(&timemap),
        duration_secs: timemap::total_duration_secs(&timemap),
    };
    info!(
        chords = summary.chords,
        frames = summary.frames,
        seconds = summary.duration_secs,
        "rendering chord movie"
    );

    write_frames(sheet, config, &timemap, sink)?;
    sink.finish()?;
    Ok(summary)
}

fn write_frames(
    sheet: &ChordSheet,
    config: &RunConfig,
    timemap: &[TimemapEntry],
    sink: &mut dyn FrameSink,
) -> Result<()> {
    let geometry = config.wheel_geometry();
    for entry in timemap {
        let chord = &sheet.chords[entry.index];
        let frame = render_chord(
            chord,
            entry.key,
            config.width,
            config.height,
            geometry,
            sheet.background,
            sheet.foreground,
        );
        debug!(index = entry.index, frames = entry.frame_count, "writing chord frames");
        sink.push_repeated(&frame, entry.frame_count)?;
    }
    Ok(())
}

fn check_size(frame: &RgbaImage, width: u32, height: u32) -> Result<()> {
    if frame.dimensions() != (width, height) {
        return Err(ChordError::Encode(format!(
            "frame is {}x{}, expected {}x{}",
            frame.width(),
            frame.height(),
            width,
            height
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// ffmpeg
// ═══════════════════════════════════════════════════════════════════════

/// Streams raw RGBA frames into an `ffmpeg` child process.
pub struct FfmpegEncoder {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    /// Collects ffmpeg's stderr so a verbose encoder never blocks on a full pipe
    stderr: Option<JoinHandle<String>>,
    output: PathBuf,
    width: u32,
    height: u32,
    frames: u64,
}

impl FfmpegEncoder {
    /// Start ffmpeg writing to `output` with the canvas, rate and codec of `config`.
    pub fn spawn(output: impl AsRef<Path>, config: &RunConfig) -> Result<Self> {
        let output = output.as_ref().to_path_buf();
        let mut child = Command::new(&config.ffmpeg)
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{}x{}", config.width, config.height))
            .arg("-r")
            .arg(config.fps.to_string())
            .args(["-i", "-", "-an", "-c:v"])
            .arg(&config.codec)
            .args(["-pix_fmt", "yuv420p"])
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ChordError::Encode(format!(
                    "could not start '{}': {e}",
                    config.ffmpeg.display()
                ))
            })?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                pipe.read_to_string(&mut text).ok();
                text
            })
        });
        debug!(output = %output.display(), "spawned ffmpeg");
        Ok(Self {
            child: Some(child),
            stdin,
            stderr,
            output,
            width: config.width,
            height: config.height,
            frames: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Wait for the stderr reader; the pipe closes when ffmpeg exits.
    fn collect_stderr(&mut self) -> String {
        self.stderr
            .take()
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default()
    }
}

impl FrameSink for FfmpegEncoder {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<()> {
        check_size(frame, self.width, self.height)?;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ChordError::Encode("encoder already closed".to_string()))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| ChordError::Encode(format!("ffmpeg stopped accepting frames: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait()?;
        let stderr = self.collect_stderr();
        if !status.success() {
            let _ = fs::remove_file(&self.output);
            return Err(ChordError::Encode(format!(
                "ffmpeg exited with {status}: {}",
                stderr.trim()
            )));
        }
        info!(output = %self.output.display(), frames = self.frames, "video written");
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.collect_stderr();
        if fs::remove_file(&self.output).is_ok() {
            warn!(output = %self.output.display(), "removed incomplete video");
        }
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // finish() was never reached: treat as a failed run.
        if self.child.is_some() {
            self.abort();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PNG sequence
// ═══════════════════════════════════════════════════════════════════════

/// Writes each frame as `frame_00000.png`, `frame_00001.png`, … into a directory.
pub struct PngSequenceSink {
    dir: PathBuf,
    width: u32,
    height: u32,
    written: u64,
}

impl PngSequenceSink {
    pub fn create(dir: impl AsRef<Path>, width: u32, height: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            width,
            height,
            written: 0,
        })
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<()> {
        check_size(frame, self.width, self.height)?;
        frame.save(self.frame_path(self.written))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!(dir = %self.dir.display(), frames = self.written, "frame sequence written");
        Ok(())
    }

    fn abort(&mut self) {
        for i in 0..self.written {
            let _ = fs::remove_file(self.frame_path(i));
        }
        warn!(dir = %self.dir.display(), removed = self.written, "removed incomplete frame sequence");
        self.written = 0;
    }
}
