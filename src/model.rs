//! Data model for a chord sheet.
//!
//! These structures hold the validated chord sequence: every degree is
//! already known to be in range, every accidental targets a real degree,
//! and the "no override" sentinels of the input format are folded into
//! `Option`s.

use std::fmt;

use serde::Serialize;

/// Key value that means "keep the current key" in the input format.
pub const KEY_UNSET: i32 = 12;
/// Tempo value that means "keep the current tempo" in the input format.
pub const BPM_UNSET: i32 = 0;
/// Beats per chord when neither the entry nor the sheet says otherwise.
pub const DEFAULT_BEATS: u32 = 2;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_FOREGROUND: &str = "#aaaaaa";

/// A complete chord sheet parsed from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSheet {
    /// Canvas background colour
    pub background: Color,
    /// Marker colour
    pub foreground: Color,
    /// Beats used by entries that do not carry their own
    pub default_beats: u32,
    /// Chords in play order
    pub chords: Vec<ChordEntry>,
}

/// One chord in the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEntry {
    /// Free-text label from the editor (not rendered)
    pub memo: Option<String>,
    /// Scale degree sounding lowest
    pub bass: Degree,
    /// Chord tones, counted from the bass
    pub shape: Vec<Degree>,
    /// Raised or lowered scale degrees
    pub accidentals: Vec<Accidental>,
    /// Length in beats; `None` falls back to the sheet default
    pub beats: Option<u32>,
    /// New key from this chord on; `None` keeps the current key
    pub key: Option<i32>,
    /// New tempo from this chord on; `None` keeps the current tempo
    pub bpm: Option<i32>,
}

impl ChordEntry {
    /// A chord with no overrides, accidentals or explicit length.
    pub fn new(bass: Degree, shape: Vec<Degree>) -> Self {
        Self {
            memo: None,
            bass,
            shape,
            accidentals: Vec::new(),
            beats: None,
            key: None,
            bpm: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Degree
// ═══════════════════════════════════════════════════════════════════════

/// A 1-based scale degree (1..=7).
///
/// Arithmetic wraps modulo 7, so `Degree::ROOT.up(9)` is the third.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Degree(u8);

impl Degree {
    pub const ROOT: Degree = Degree(1);

    /// Build a degree from a 1-based number, `None` if outside 1..=7.
    pub fn new(n: i64) -> Option<Self> {
        if (1..=7).contains(&n) {
            Some(Degree(n as u8))
        } else {
            None
        }
    }

    /// Parse a single label such as `"5"`.
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse::<i64>().ok().and_then(Self::new)
    }

    /// The 1-based number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The 0-based index (degree 1 → 0).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The degree `steps` scale steps above this one.
    pub fn up(self, steps: u8) -> Degree {
        Degree(((self.0 - 1 + steps % 7) % 7) + 1)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Accidentals
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sharp,
    Flat,
}

impl Direction {
    /// Unit sign: +1 for sharp, -1 for flat.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Sharp => 1,
            Direction::Flat => -1,
        }
    }
}

/// A chromatic alteration of one scale degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accidental {
    pub degree: Degree,
    pub direction: Direction,
}

impl Accidental {
    /// Decode the signed form used by the input (`3` = raised third,
    /// `-7` = lowered seventh). Zero and magnitudes above 7 are rejected.
    pub fn from_signed(value: i64) -> Option<Self> {
        let degree = Degree::new(value.abs())?;
        let direction = if value > 0 {
            Direction::Sharp
        } else {
            Direction::Flat
        };
        Some(Self { degree, direction })
    }

    pub fn to_signed(self) -> i32 {
        self.degree.get() as i32 * self.direction.sign()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Colour
// ═══════════════════════════════════════════════════════════════════════

/// An RGBA colour parsed from a `#rgb`, `#rrggbb` or `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex colour string.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Same colour with a replaced alpha channel.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb` without the alpha channel (for SVG `fill`).
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0.0–1.0 opacity (for SVG `fill-opacity`).
    pub fn opacity(self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}
