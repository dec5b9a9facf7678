//! Music-theory arithmetic behind the two wheels and the chord labels.
//!
//! Two position spaces are used:
//!
//! - the **fifths axis** (mod 12): 0 = C, 1 = G, 2 = D, … so a diatonic
//!   scale is seven consecutive positions, and an accidental moves a degree
//!   by ±7;
//! - the **thirds axis** (mod 7): 0 = C, 1 = E, 2 = G, … so a chord built
//!   from stacked thirds is a run of consecutive positions.
//!
//! Everything here is a pure function of its inputs.

use crate::model::{Accidental, Degree, Direction};

/// Fifths-axis offset of each scale degree from the tonic (C, D, E, F, G, A, B).
pub const SCALE_OFFSETS: [i32; 7] = [0, 2, 4, -1, 1, 3, 5];

/// Same offsets measured from F, which keeps every natural non-negative.
const SPELLING_OFFSETS: [i32; 7] = [1, 3, 5, 0, 2, 4, 6];
const NATURAL_NAMES: [&str; 7] = ["F", "C", "G", "D", "A", "E", "B"];

/// Semitones above the tonic for each degree of the major scale.
const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

const LEVEL_MARKS: [&str; 7] = ["α", "β", "γ", "δ", "ε", "ζ", "η"];

/// Lowest MIDI note of the bass register (F1).
pub const BASS_REGISTER_LOW: i32 = 29;
/// Lowest MIDI note of the chord-tone register (F3).
pub const UPPER_REGISTER_LOW: i32 = 53;

/// Wrap `n` into `min..min + width`.
pub fn fit_range(n: i32, min: i32, width: i32) -> i32 {
    (n - min).rem_euclid(width) + min
}

/// Collapse a list of accidentals into one direction per degree.
///
/// Later entries overwrite earlier ones, so `[3, -3]` leaves the third flat.
pub fn resolve_accidentals(accidentals: &[Accidental]) -> [Option<Direction>; 7] {
    let mut resolved = [None; 7];
    for acc in accidentals {
        resolved[acc.degree.index()] = Some(acc.direction);
    }
    resolved
}

// ═══════════════════════════════════════════════════════════════════════
// Wheel positions
// ═══════════════════════════════════════════════════════════════════════

/// Fifths-axis position of each scale degree in `key`, before reduction.
///
/// The key is taken mod 12 first, so any `i32` key is accepted.
///
/// An accidental sets its degree to `base ± 7`; it never stacks.
pub fn scale_positions(key: i32, accidentals: &[Accidental]) -> [i32; 7] {
    let resolved = resolve_accidentals(accidentals);
    let mut positions = [0; 7];
    for (i, offset) in SCALE_OFFSETS.iter().enumerate() {
        let shift = resolved[i].map_or(0, |d| 7 * d.sign());
        positions[i] = key.rem_euclid(12) + offset + shift;
    }
    positions
}

/// Thirds-axis position of the key's tonic.
pub fn chord_root(key: i32) -> i32 {
    2 * key.rem_euclid(7)
}

/// Thirds-axis position of the bass note, before reduction.
pub fn bass_position(key: i32, bass: Degree) -> i32 {
    chord_root(key) - 3 * bass.index() as i32
}

/// Thirds-axis position of each chord tone, before reduction.
pub fn tone_positions(key: i32, bass: Degree, shape: &[Degree]) -> Vec<i32> {
    shape
        .iter()
        .map(|tone| chord_root(key) - 3 * (bass.index() + tone.index()) as i32)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Consonance weights
// ═══════════════════════════════════════════════════════════════════════

/// Score each tone of `shape` by the harmonic support it gets.
///
/// +2 for the chord's own root, +2 if its third is present, +3 for its
/// fifth, +1 for its seventh. The maximum is 8.
pub fn calc_weights(shape: &[Degree]) -> Vec<u8> {
    shape
        .iter()
        .map(|&tone| {
            let mut points = 0;
            if tone == Degree::ROOT {
                points += 2;
            }
            if shape.contains(&tone.up(2)) {
                points += 2;
            }
            if shape.contains(&tone.up(4)) {
                points += 3;
            }
            if shape.contains(&tone.up(6)) {
                points += 1;
            }
            points
        })
        .collect()
}

/// Marker opacity for a weight: `255 · (weight + 4) / 12`, truncated.
pub fn weight_alpha(weight: u8) -> u8 {
    (255 * (weight as u32 + 4) / 12).min(255) as u8
}

// ═══════════════════════════════════════════════════════════════════════
// Labels
// ═══════════════════════════════════════════════════════════════════════

/// Spell a fifths-axis location measured from F (0 = F, 1 = C, 7 = F#).
fn spell(location: i32) -> String {
    let mut name = NATURAL_NAMES[location.rem_euclid(7) as usize].to_string();
    let octaves = location.div_euclid(7);
    if octaves > 0 {
        for _ in 0..octaves / 2 {
            name.push('×');
        }
        if octaves % 2 == 1 {
            name.push('#');
        }
    } else {
        for _ in 0..-octaves {
            name.push('b');
        }
    }
    name
}

/// Name of the tonic of `key` (0 = C, 1 = G, -1 = F, -5 = Db, …).
pub fn key_name(key: i32) -> String {
    spell(SPELLING_OFFSETS[0] + spelling_key(key))
}

/// Keys within this distance of C are spelled as written (up to `C×` / `Dbb`).
pub const SPELLED_KEY_LIMIT: i32 = 14;

/// The key used for spelling: as written when within [`SPELLED_KEY_LIMIT`],
/// otherwise its enharmonic equivalent in `-6..=5` (Gb to B).
fn spelling_key(key: i32) -> i32 {
    if (-SPELLED_KEY_LIMIT..=SPELLED_KEY_LIMIT).contains(&key) {
        return key;
    }
    let k = key.rem_euclid(12);
    if k > 5 {
        k - 12
    } else {
        k
    }
}

/// Spelled note names of the chord tones, e.g. `"G, B, D, F"`.
pub fn note_names(key: i32, bass: Degree, shape: &[Degree], accidentals: &[Accidental]) -> String {
    let resolved = resolve_accidentals(accidentals);
    let key = spelling_key(key);
    shape
        .iter()
        .map(|tone| {
            let degree = tone.up(bass.index() as u8);
            let i = degree.index();
            let shift = resolved[i].map_or(0, |d| 7 * d.sign());
            spell(SPELLING_OFFSETS[i] + key + shift)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The chord's strongest tones as scale degrees of the key.
///
/// Tones sharing the top weight come first, comma separated; tones one
/// point below follow after a slash (`"1/5"`, `"5"`, `"2,4/6"`).
pub fn main_function(bass: Degree, shape: &[Degree]) -> String {
    let weights = calc_weights(shape);
    let Some(&max) = weights.iter().max() else {
        return String::new();
    };

    let group = |target: i32| {
        shape
            .iter()
            .zip(&weights)
            .filter(|&(_, &w)| w as i32 == target)
            .map(|(tone, _)| tone.up(bass.index() as u8).to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    let first = group(max as i32);
    let second = group(max as i32 - 1);
    if second.is_empty() {
        first
    } else {
        format!("{first}/{second}")
    }
}

/// How far the accidentals stretch the scale along the fifths axis.
///
/// Seven consecutive fifths (any church mode) give `"-"`; each further
/// step picks the next greek letter, with a repeat count once the span
/// wraps past η.
pub fn scale_level(accidentals: &[Accidental]) -> String {
    let resolved = resolve_accidentals(accidentals);
    let circle: Vec<i32> = SPELLING_OFFSETS
        .iter()
        .zip(resolved.iter())
        .map(|(&n, dir)| n + dir.map_or(0, |d| 7 * d.sign()))
        .collect();

    let max = circle.iter().copied().max().unwrap_or(0);
    let min = circle.iter().copied().min().unwrap_or(0);
    let range = max - min;
    if range == 6 {
        return "-".to_string();
    }

    let mark = LEVEL_MARKS[range.rem_euclid(7) as usize];
    let wraps = (range - 7).div_euclid(7);
    if wraps > 0 {
        format!("{mark}{}", wraps + 1)
    } else {
        mark.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Pitches
// ═══════════════════════════════════════════════════════════════════════

/// MIDI notes for a chord: the bass in 29..=40, then each tone in 53..=64.
///
/// Accidentals move their degree by one semitone here.
pub fn chord_midi_notes(
    key: i32,
    bass: Degree,
    shape: &[Degree],
    accidentals: &[Accidental],
) -> Vec<u8> {
    let resolved = resolve_accidentals(accidentals);
    let mut scale = MAJOR_SCALE;
    for (step, dir) in scale.iter_mut().zip(resolved.iter()) {
        if let Some(d) = dir {
            *step += d.sign();
        }
    }

    let tonic = fit_range(key.rem_euclid(12) * 7, 0, 12);
    let mut notes = Vec::with_capacity(shape.len() + 1);
    notes.push(fit_range(tonic + scale[bass.index()], BASS_REGISTER_LOW, 12) as u8);
    for tone in shape {
        let degree = tone.up(bass.index() as u8);
        notes.push(fit_range(tonic + scale[degree.index()], UPPER_REGISTER_LOW, 12) as u8);
    }
    notes
}
