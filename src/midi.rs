//! MIDI file generation from a chord sheet and its timemap.
//!
//! Produces a Standard MIDI File (SMF) Type 1 as raw bytes.
//! Track 0 is the tempo map; track 1 holds one voicing per chord: the bass
//! note in the low register and the chord tones an octave and a half above.

use crate::model::ChordSheet;
use crate::theory;
use crate::timemap::TimemapEntry;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Options controlling the chord track.
#[derive(Debug, Clone)]
pub struct MidiOptions {
    pub channel: u8,
    /// General MIDI program (0 = Acoustic Grand Piano)
    pub program: u8,
    pub velocity: u8,
    /// Also sound the bass note under each chord
    pub include_bass: bool,
}

impl Default for MidiOptions {
    fn default() -> Self {
        Self {
            channel: 0,
            program: 0,
            velocity: 80,
            include_bass: true,
        }
    }
}

/// Ticks per quarter note in our MIDI output. One chord beat is one quarter.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Generate a complete Standard MIDI File (SMF Type 1).
///
/// `timemap` must come from `generate_timemap` for the same sheet.
pub fn generate_midi(sheet: &ChordSheet, timemap: &[TimemapEntry], options: &MidiOptions) -> Vec<u8> {
    smf(vec![tempo_track(timemap), chord_track(sheet, timemap, options)])
}

// ═══════════════════════════════════════════════════════════════════════
// Chord voicings
// ═══════════════════════════════════════════════════════════════════════

fn beat_to_tick(beat: u64) -> u32 {
    (beat * TICKS_PER_QUARTER as u64).min(u32::MAX as u64) as u32
}

fn chord_track(sheet: &ChordSheet, timemap: &[TimemapEntry], options: &MidiOptions) -> Track {
    let channel = options.channel & 0x0F;
    let mut track = Track::new("Chords");
    track.push(0, vec![0xC0 | channel, options.program & 0x7F]);

    for entry in timemap {
        if entry.beats == 0 {
            continue;
        }
        let Some(chord) = sheet.chords.get(entry.index) else {
            continue;
        };

        let mut notes = theory::chord_midi_notes(entry.key, chord.bass, &chord.shape, &chord.accidentals);
        if !options.include_bass {
            notes.remove(0);
        }
        // A shape may repeat a pitch; sound it once.
        let mut seen = [false; 128];
        notes.retain(|&n| !std::mem::replace(&mut seen[n as usize & 0x7F], true));

        let on_tick = beat_to_tick(entry.start_beat);
        let off_tick = beat_to_tick(entry.start_beat + entry.beats as u64);
        for &note in &notes {
            track.push(on_tick, vec![0x90 | channel, note, options.velocity & 0x7F]);
        }
        for &note in &notes {
            track.push(off_tick, vec![0x80 | channel, note, 0]);
        }
    }

    track
}

/// Track 0: a set-tempo meta event wherever the tempo changes.
fn tempo_track(timemap: &[TimemapEntry]) -> Track {
    let mut track = Track::new("Tempo");
    let mut last_bpm = None;
    for entry in timemap {
        if entry.bpm == 0 || last_bpm == Some(entry.bpm) {
            continue;
        }
        track.meta(beat_to_tick(entry.start_beat), 0x51, &tempo_payload(entry.bpm));
        last_bpm = Some(entry.bpm);
    }
    track
}

/// Largest value of the 24-bit set-tempo field.
const MAX_USPQ: u32 = 0xFF_FFFF;

/// Microseconds per quarter note as the three bytes of a set-tempo event.
/// Tempos below 4 bpm do not fit and are clamped to the slowest tempo SMF can express.
fn tempo_payload(bpm: u32) -> [u8; 3] {
    let uspq = (60_000_000 / bpm.max(1)).min(MAX_USPQ);
    let [_, high, mid, low] = uspq.to_be_bytes();
    [high, mid, low]
}

// ═══════════════════════════════════════════════════════════════════════
// SMF byte encoding
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct MidiEvent {
    /// Absolute time in ticks from the start of the track
    tick: u32,
    /// Raw message bytes (status + data)
    bytes: Vec<u8>,
}

/// One MTrk chunk under construction.
struct Track {
    events: Vec<MidiEvent>,
}

impl Track {
    /// Start a track whose first event is its name.
    fn new(name: &str) -> Self {
        let mut track = Track { events: Vec::new() };
        track.meta(0, 0x03, name.as_bytes());
        track
    }

    fn push(&mut self, tick: u32, bytes: Vec<u8>) {
        self.events.push(MidiEvent { tick, bytes });
    }

    /// Meta event `FF <kind> <len> <payload>`.
    fn meta(&mut self, tick: u32, kind: u8, payload: &[u8]) {
        let mut bytes = vec![0xFF, kind];
        bytes.extend(vlq(payload.len() as u32));
        bytes.extend_from_slice(payload);
        self.push(tick, bytes);
    }

    /// Delta-time encoded chunk payload, closed with end-of-track.
    ///
    /// The sort is stable, so note-offs pushed before the next chord's
    /// note-ons at the same tick stay ahead of them.
    fn encode(mut self) -> Vec<u8> {
        self.events.sort_by_key(|e| e.tick);
        let end = self.events.last().map_or(0, |e| e.tick);
        self.meta(end, 0x2F, &[]);

        let mut data = Vec::new();
        let mut cursor = 0;
        for event in &self.events {
            data.extend(vlq(event.tick - cursor));
            data.extend_from_slice(&event.bytes);
            cursor = event.tick;
        }
        data
    }
}

/// Format 1 file: `MThd` header followed by one `MTrk` chunk per track.
fn smf(tracks: Vec<Track>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    out.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());

    for track in tracks {
        let chunk = track.encode();
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(chunk.len() as u32).to_be_bytes());
        out.extend_from_slice(&chunk);
    }
    out
}

/// Variable-length quantity: 7 bits per byte, most significant first,
/// continuation bit on every byte but the last.
fn vlq(value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        bytes.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    bytes.reverse();
    bytes
}
