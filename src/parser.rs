//! Chord sheet parser: converts the editor's JSON into the validated model.
//!
//! Decoding happens in two steps: serde reads a loose `Raw*` mirror of the
//! file (every field optional, shapes in either list or compact string
//! form), then each chord is checked and converted into a [`ChordEntry`].
//! Nothing is rendered until the whole sheet has passed.

use serde::Deserialize;

use crate::error::{ChordError, Result};
use crate::model::*;

/// Parse a chord sheet from a JSON string.
pub fn parse_chord_sheet(json: &str) -> Result<ChordSheet> {
    let raw: RawSheet = serde_json::from_str(json)
        .map_err(|e| ChordError::Configuration(format!("invalid chord sheet: {e}")))?;

    let background = parse_color("bgcolor", raw.bgcolor.as_deref(), DEFAULT_BACKGROUND)?;
    let foreground = parse_color("color", raw.color.as_deref(), DEFAULT_FOREGROUND)?;

    let chords = raw
        .chords
        .into_iter()
        .enumerate()
        .map(|(index, chord)| convert_chord(index, chord))
        .collect::<Result<Vec<_>>>()?;

    Ok(ChordSheet {
        background,
        foreground,
        default_beats: raw.default_beats.unwrap_or(DEFAULT_BEATS),
        chords,
    })
}

// ─── Raw mirror of the file ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSheet {
    bgcolor: Option<String>,
    color: Option<String>,
    default_beats: Option<u32>,
    chords: Vec<RawChord>,
}

#[derive(Debug, Deserialize)]
struct RawChord {
    memo: Option<String>,
    bass: Option<i64>,
    shape: Option<RawShape>,
    #[serde(default)]
    accd: Vec<i64>,
    beats: Option<u32>,
    key: Option<i32>,
    bpm: Option<i32>,
}

/// `["1","3","5"]`, `[1,3,5]` or the editor's compact `"135"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawShape {
    Compact(String),
    List(Vec<RawLabel>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Number(i64),
    Text(String),
}

// ─── Conversion ──────────────────────────────────────────────────────

fn parse_color(field: &str, value: Option<&str>, default: &str) -> Result<Color> {
    let text = value.unwrap_or(default);
    Color::parse(text).ok_or_else(|| {
        ChordError::Configuration(format!("field '{field}': '{text}' is not a hex colour"))
    })
}

fn convert_chord(index: usize, raw: RawChord) -> Result<ChordEntry> {
    let bass_value = raw.bass.ok_or_else(|| missing_field(index, "bass"))?;
    let raw_shape = raw.shape.ok_or_else(|| missing_field(index, "shape"))?;

    let bass = Degree::new(bass_value).ok_or_else(|| ChordError::Validation {
        index,
        message: format!("bass degree {bass_value} is outside 1..=7"),
    })?;

    let shape = convert_shape(index, raw_shape)?;

    let accidentals = raw
        .accd
        .iter()
        .map(|&value| {
            Accidental::from_signed(value).ok_or_else(|| ChordError::Validation {
                index,
                message: format!("accidental {value} must be a nonzero degree in -7..=7"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChordEntry {
        memo: raw.memo,
        bass,
        shape,
        accidentals,
        beats: raw.beats,
        key: raw.key.filter(|&k| k != KEY_UNSET),
        bpm: raw.bpm.filter(|&b| b != BPM_UNSET),
    })
}

fn convert_shape(index: usize, shape: RawShape) -> Result<Vec<Degree>> {
    let labels: Vec<String> = match shape {
        RawShape::Compact(text) => text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(String::from)
            .collect(),
        RawShape::List(items) => items
            .into_iter()
            .map(|item| match item {
                RawLabel::Number(n) => n.to_string(),
                RawLabel::Text(t) => t,
            })
            .collect(),
    };

    labels
        .iter()
        .map(|label| {
            Degree::from_label(label).ok_or_else(|| ChordError::Validation {
                index,
                message: format!("shape label '{label}' is not a degree in 1..=7"),
            })
        })
        .collect()
}

fn missing_field(index: usize, field: &str) -> ChordError {
    ChordError::Configuration(format!("chord {index}: missing required field '{field}'"))
}
