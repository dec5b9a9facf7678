//! Compute start times and frame counts for each chord in the sheet.
//!
//! This is the bridge between the chord model and the video stream. It
//! answers "how long is each chord held?" in seconds and in whole frames.
//!
//! Frame counts come from running totals: each chord gets
//! `floor(elapsed · fps) − frames_so_far`, so truncation never drifts and
//! the sum over the sheet is exactly `floor(total_seconds · fps)`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use tracing::debug;

use crate::error::{ChordError, Result};
use crate::model::{ChordEntry, ChordSheet};

/// Frame rate of the original movies.
pub const DEFAULT_FPS: u32 = 30;
/// Key before any chord overrides it (C).
pub const DEFAULT_KEY: i32 = 0;
/// Tempo before any chord overrides it.
pub const DEFAULT_BPM: i32 = 160;

/// Inputs to the scheduler that do not come from the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleSettings {
    pub fps: u32,
    pub initial_key: i32,
    pub initial_bpm: i32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            initial_key: DEFAULT_KEY,
            initial_bpm: DEFAULT_BPM,
        }
    }
}

/// Timing information for one chord.
#[derive(Debug, Clone, PartialEq)]
pub struct TimemapEntry {
    /// Index into `ChordSheet::chords`
    pub index: usize,
    /// Key in effect for this chord
    pub key: i32,
    /// Tempo in effect for this chord
    pub bpm: u32,
    /// Length in beats after applying the sheet default
    pub beats: u32,
    /// Cumulative beats before this chord
    pub start_beat: u64,
    pub start_secs: f64,
    pub duration_secs: f64,
    /// First frame this chord occupies
    pub start_frame: u64,
    /// Number of frames this chord is held for (may be 0)
    pub frame_count: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// Exact elapsed time
// ═══════════════════════════════════════════════════════════════════════

/// Seconds for `beats` at `bpm`, i.e. `beats · 60 / bpm`. `bpm` is positive.
fn beats_to_secs(beats: u32, bpm: u32) -> BigRational {
    BigRational::new(BigInt::from(beats) * 60, BigInt::from(bpm))
}

/// `floor(secs · fps)` as a frame index.
fn whole_frames(secs: &BigRational, fps: u32, index: usize) -> Result<u64> {
    (secs * BigRational::from_integer(BigInt::from(fps)))
        .floor()
        .to_integer()
        .to_u64()
        .ok_or_else(|| ChordError::Arithmetic {
            index,
            message: "frame count does not fit in 64 bits".to_string(),
        })
}

fn to_secs(secs: &BigRational) -> f64 {
    secs.to_f64().unwrap_or(f64::INFINITY)
}

// ═══════════════════════════════════════════════════════════════════════
// Scheduler
// ═══════════════════════════════════════════════════════════════════════

/// Everything carried from one chord to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleState {
    /// Exact seconds; the denominator grows with every distinct tempo
    elapsed: BigRational,
    beats_elapsed: u64,
    frames_emitted: u64,
    key: i32,
    bpm: i32,
}

impl ScheduleState {
    pub fn new(settings: &ScheduleSettings) -> Self {
        Self {
            elapsed: BigRational::zero(),
            beats_elapsed: 0,
            frames_emitted: 0,
            key: settings.initial_key,
            bpm: settings.initial_bpm,
        }
    }

    /// Fold one chord into the state, returning the new state and the
    /// chord's timing.
    pub fn advance(
        self,
        index: usize,
        chord: &ChordEntry,
        default_beats: u32,
        fps: u32,
    ) -> Result<(ScheduleState, TimemapEntry)> {
        let key = chord.key.unwrap_or(self.key);
        let bpm = chord.bpm.unwrap_or(self.bpm);
        if bpm <= 0 {
            return Err(ChordError::Arithmetic {
                index,
                message: format!("tempo must be positive, got {bpm} bpm"),
            });
        }
        let bpm_u = bpm as u32;
        let beats = chord.beats.unwrap_or(default_beats);

        let elapsed = &self.elapsed + beats_to_secs(beats, bpm_u);
        let total_frames = whole_frames(&elapsed, fps, index)?;
        let frame_count = total_frames - self.frames_emitted;

        let entry = TimemapEntry {
            index,
            key,
            bpm: bpm_u,
            beats,
            start_beat: self.beats_elapsed,
            start_secs: to_secs(&self.elapsed),
            duration_secs: beats as f64 * 60.0 / bpm as f64,
            start_frame: self.frames_emitted,
            frame_count,
        };

        debug!(
            index,
            key,
            bpm,
            beats,
            frame_count,
            "scheduled chord"
        );

        let next = ScheduleState {
            elapsed,
            beats_elapsed: self.beats_elapsed + beats as u64,
            frames_emitted: total_frames,
            key,
            bpm,
        };
        Ok((next, entry))
    }
}

/// Generate a timemap for every chord in the sheet.
///
/// Fails before producing anything if the frame rate is zero or if any
/// chord ends up with a non-positive tempo.
pub fn generate_timemap(sheet: &ChordSheet, settings: &ScheduleSettings) -> Result<Vec<TimemapEntry>> {
    if settings.fps == 0 {
        return Err(ChordError::Configuration(
            "frame rate must be positive".to_string(),
        ));
    }

    let (_, entries) = sheet.chords.iter().enumerate().try_fold(
        (ScheduleState::new(settings), Vec::with_capacity(sheet.chords.len())),
        |(state, mut entries), (index, chord)| {
            let (next, entry) = state.advance(index, chord, sheet.default_beats, settings.fps)?;
            entries.push(entry);
            Ok::<_, ChordError>((next, entries))
        },
    )?;

    Ok(entries)
}

/// Total number of frames across the timemap.
pub fn total_frames(timemap: &[TimemapEntry]) -> u64 {
    timemap.last().map_or(0, |e| e.start_frame + e.frame_count)
}

/// Total duration of the timemap in seconds.
pub fn total_duration_secs(timemap: &[TimemapEntry]) -> f64 {
    timemap.last().map_or(0.0, |e| e.start_secs + e.duration_secs)
}

/// Total length of the timemap in beats.
pub fn total_beats(timemap: &[TimemapEntry]) -> u64 {
    timemap.last().map_or(0, |e| e.start_beat + e.beats as u64)
}
