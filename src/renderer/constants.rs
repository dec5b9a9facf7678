//! Shared constants for the chord diagram (all in pixels at the reference canvas).

// ── Reference canvas ────────────────────────────────────────────────
pub(super) const REFERENCE_WIDTH: f64 = 1280.0;
pub(super) const REFERENCE_HEIGHT: f64 = 720.0;

// ── Wheel placement ─────────────────────────────────────────────────
pub(super) const WHEEL_OFFSET_X: f64 = 250.0; // key wheel left of centre, chord wheel right
pub(super) const WHEEL_OFFSET_Y: f64 = 80.0; // both wheels below centre
pub(super) const KEY_WHEEL_RADIUS: f64 = 160.0;
pub(super) const CHORD_WHEEL_RADIUS: f64 = 100.0;

// ── Markers ─────────────────────────────────────────────────────────
pub(super) const DOT_RADIUS: f64 = 30.0;
pub(super) const BASS_RING_EXTRA: f64 = 10.0; // bass ring is this much wider than a dot
pub(super) const BASS_RING_WIDTH: f64 = 5.0;

// ── Alpha ───────────────────────────────────────────────────────────
pub(super) const FAINT_ALPHA: u8 = 0x33; // unused chromatic positions on the key wheel

// ── Wheel sizes ─────────────────────────────────────────────────────
pub(super) const KEY_WHEEL_STEPS: i32 = 12;
pub(super) const CHORD_WHEEL_STEPS: i32 = 7;
