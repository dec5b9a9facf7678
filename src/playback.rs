//! Playback map: the timeline of a chord movie as data.
//!
//! Pairs every timemap entry with the labels the chord editor shows for it
//! (key name, spelled notes, main function, scale level), so a player or a
//! subtitle generator can follow the video without re-deriving any theory.

use serde::Serialize;

use crate::error::Result;
use crate::model::ChordSheet;
use crate::theory;
use crate::timemap::{self, ScheduleSettings, TimemapEntry};

/// Complete timeline for one chord sheet.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackMap {
    pub fps: u32,
    pub total_frames: u64,
    pub total_beats: u64,
    pub duration_secs: f64,
    pub chords: Vec<TimelineEntry>,
}

/// One chord on the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    /// Index into the sheet's chord list
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub key: i32,
    /// Tonic of the key, e.g. "Eb"
    pub key_name: String,
    pub bpm: u32,
    pub beats: u32,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub start_frame: u64,
    pub frame_count: u64,
    /// Chord tones spelled in the key, e.g. "G, B, D, F"
    pub notes: String,
    /// Strongest tones as scale degrees, e.g. "5" or "3/5"
    pub main_function: String,
    /// Accidental span marker, "-" for a plain diatonic scale
    pub scale_level: String,
    /// Signed accidentals as written in the sheet
    pub accidentals: Vec<i32>,
}

/// Schedule the sheet and label each chord.
pub fn generate_playback_map(sheet: &ChordSheet, settings: &ScheduleSettings) -> Result<PlaybackMap> {
    let tmap = timemap::generate_timemap(sheet, settings)?;
    Ok(playback_map_from_timemap(sheet, settings.fps, &tmap))
}

/// Label an already computed timemap.
pub fn playback_map_from_timemap(sheet: &ChordSheet, fps: u32, tmap: &[TimemapEntry]) -> PlaybackMap {
    let chords = tmap
        .iter()
        .filter_map(|entry| {
            let chord = sheet.chords.get(entry.index)?;
            Some(TimelineEntry {
                index: entry.index,
                memo: chord.memo.clone(),
                key: entry.key,
                key_name: theory::key_name(entry.key),
                bpm: entry.bpm,
                beats: entry.beats,
                start_secs: entry.start_secs,
                duration_secs: entry.duration_secs,
                start_frame: entry.start_frame,
                frame_count: entry.frame_count,
                notes: theory::note_names(entry.key, chord.bass, &chord.shape, &chord.accidentals),
                main_function: theory::main_function(chord.bass, &chord.shape),
                scale_level: theory::scale_level(&chord.accidentals),
                accidentals: chord.accidentals.iter().map(|a| a.to_signed()).collect(),
            })
        })
        .collect();

    PlaybackMap {
        fps,
        total_frames: timemap::total_frames(tmap),
        total_beats: timemap::total_beats(tmap),
        duration_secs: timemap::total_duration_secs(tmap),
        chords,
    }
}

/// Serialize a PlaybackMap to pretty-printed JSON.
pub fn playback_map_to_json(map: &PlaybackMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}
