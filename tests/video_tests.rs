//! Integration tests for scheduling and the frame loop, using in-memory sinks
//! so no ffmpeg is needed.

use chordwheel::{
    generate_timemap, parse_file, render_video, ChordEntry, ChordError, ChordSheet, Color,
    Degree, FrameSink, PngSequenceSink, RunConfig, ScheduleSettings,
};
use image::RgbaImage;
use std::path::PathBuf;

fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

/// Keeps every frame it is given.
#[derive(Default)]
struct CollectingSink {
    frames: Vec<RgbaImage>,
    finished: bool,
    aborted: bool,
}

impl FrameSink for CollectingSink {
    fn push_frame(&mut self, frame: &RgbaImage) -> chordwheel::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> chordwheel::Result<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.frames.clear();
    }
}

/// Fails once it has accepted `limit` frames.
struct FailingSink {
    limit: usize,
    accepted: usize,
    aborted: bool,
}

impl FrameSink for FailingSink {
    fn push_frame(&mut self, _frame: &RgbaImage) -> chordwheel::Result<()> {
        if self.accepted == self.limit {
            return Err(ChordError::Encode("pipe closed".to_string()));
        }
        self.accepted += 1;
        Ok(())
    }

    fn finish(&mut self) -> chordwheel::Result<()> {
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

fn small_config() -> RunConfig {
    RunConfig {
        width: 128,
        height: 72,
        ..RunConfig::default()
    }
}

fn single_chord_sheet(beats: u32, bpm: i32) -> ChordSheet {
    let shape = [1, 3, 5].iter().map(|&n| Degree::new(n).unwrap()).collect();
    ChordSheet {
        background: Color::rgb(255, 255, 255),
        foreground: Color::rgb(0xaa, 0xaa, 0xaa),
        default_beats: 2,
        chords: vec![ChordEntry {
            beats: Some(beats),
            key: Some(0),
            bpm: Some(bpm),
            ..ChordEntry::new(Degree::ROOT, shape)
        }],
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scheduling
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn modulation_frame_counts() {
    let sheet = parse_file(samples_dir().join("modulation.json")).unwrap();
    let tmap = generate_timemap(&sheet, &ScheduleSettings::default()).unwrap();

    let counts: Vec<u64> = tmap.iter().map(|e| e.frame_count).collect();
    assert_eq!(counts, vec![40, 40, 80, 38, 0]);

    let keys: Vec<i32> = tmap.iter().map(|e| e.key).collect();
    assert_eq!(keys, vec![0, 0, 3, 3, 3]);

    let tempos: Vec<u32> = tmap.iter().map(|e| e.bpm).collect();
    assert_eq!(tempos, vec![90, 90, 90, 140, 140]);
}

#[test]
fn frame_total_matches_total_duration() {
    for name in ["two_five_one.json", "modulation.json"] {
        let sheet = parse_file(samples_dir().join(name)).unwrap();
        for fps in [24, 25, 30, 60] {
            let settings = ScheduleSettings {
                fps,
                ..ScheduleSettings::default()
            };
            let tmap = generate_timemap(&sheet, &settings).unwrap();
            let total: u64 = tmap.iter().map(|e| e.frame_count).sum();
            let seconds: f64 = tmap.iter().map(|e| e.duration_secs).sum();
            assert_eq!(
                total,
                (seconds * fps as f64 + 1e-9).floor() as u64,
                "{name} at {fps} fps"
            );
        }
    }
}

/// One beat per chord, one tempo per chord.
fn tempo_ramp(tempos: impl Iterator<Item = i32>) -> ChordSheet {
    let mut sheet = single_chord_sheet(1, 60);
    let template = sheet.chords.remove(0);
    sheet.chords = tempos
        .map(|bpm| ChordEntry {
            bpm: Some(bpm),
            ..template.clone()
        })
        .collect();
    sheet
}

#[test]
fn tempo_ramps_conserve_frames() {
    // floor(sum(60 / bpm) * fps) for every tempo in the ramp
    let cases = [
        (100..=140, [(24, 496), (25, 517), (30, 621), (60, 1242)]),
        (60..=240, [(24, 2011), (25, 2095), (30, 2514), (60, 5028)]),
    ];
    for (ramp, expected) in cases {
        let sheet = tempo_ramp(ramp.clone());
        for (fps, frames) in expected {
            let settings = ScheduleSettings {
                fps,
                ..ScheduleSettings::default()
            };
            let tmap = generate_timemap(&sheet, &settings).unwrap();
            assert_eq!(tmap.len(), sheet.chords.len());
            let total: u64 = tmap.iter().map(|e| e.frame_count).sum();
            assert_eq!(total, frames, "{ramp:?} at {fps} fps");
            for pair in tmap.windows(2) {
                assert_eq!(pair[1].start_frame, pair[0].start_frame + pair[0].frame_count);
            }
        }
    }
}

#[test]
fn ritardando_renders_every_scheduled_frame() {
    let sheet = tempo_ramp((60..=120).rev());
    let mut sink = CollectingSink::default();
    let config = RunConfig {
        width: 16,
        height: 9,
        ..RunConfig::default()
    };
    let summary = render_video(&sheet, &config, &mut sink).unwrap();
    let tmap = generate_timemap(&sheet, &config.schedule_settings()).unwrap();
    assert_eq!(summary.frames, tmap.iter().map(|e| e.frame_count).sum::<u64>());
    assert_eq!(sink.frames.len() as u64, summary.frames);
}

#[test]
fn start_frames_are_contiguous() {
    let sheet = parse_file(samples_dir().join("modulation.json")).unwrap();
    let tmap = generate_timemap(&sheet, &ScheduleSettings::default()).unwrap();
    for pair in tmap.windows(2) {
        assert_eq!(pair[1].start_frame, pair[0].start_frame + pair[0].frame_count);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Frame loop
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn four_beats_at_sixty_bpm_is_120_identical_frames() {
    let sheet = single_chord_sheet(4, 60);
    let mut sink = CollectingSink::default();
    let summary = render_video(&sheet, &small_config(), &mut sink).unwrap();

    assert_eq!(summary.frames, 120);
    assert_eq!(summary.duration_secs, 4.0);
    assert_eq!(sink.frames.len(), 120);
    assert!(sink.frames.iter().all(|f| f == &sink.frames[0]));
    assert!(sink.finished);
    assert!(!sink.aborted);
}

#[test]
fn frames_change_at_chord_boundaries() {
    let sheet = parse_file(samples_dir().join("modulation.json")).unwrap();
    let mut sink = CollectingSink::default();
    let summary = render_video(&sheet, &small_config(), &mut sink).unwrap();

    assert_eq!(summary.chords, 5);
    assert_eq!(summary.frames, 198);
    assert_eq!(sink.frames.len(), 198);
    assert_eq!(sink.frames[0].dimensions(), (128, 72));

    // C major, then E7 in C, then A major
    assert_eq!(sink.frames[0], sink.frames[39]);
    assert_ne!(sink.frames[39], sink.frames[40]);
    assert_eq!(sink.frames[40], sink.frames[79]);
    assert_ne!(sink.frames[79], sink.frames[80]);
}

#[test]
fn bad_tempo_aborts_before_any_frame() {
    let sheet = single_chord_sheet(4, -60);
    let mut sink = CollectingSink::default();
    let err = render_video(&sheet, &small_config(), &mut sink).unwrap_err();

    assert!(matches!(err, ChordError::Arithmetic { index: 0, .. }));
    assert!(sink.aborted);
    assert!(!sink.finished);
    assert!(sink.frames.is_empty());
}

#[test]
fn sink_failure_aborts_output() {
    let sheet = single_chord_sheet(4, 60);
    let mut sink = FailingSink {
        limit: 10,
        accepted: 0,
        aborted: false,
    };
    let err = render_video(&sheet, &small_config(), &mut sink).unwrap_err();

    assert!(matches!(err, ChordError::Encode(_)));
    assert_eq!(sink.accepted, 10);
    assert!(sink.aborted);
}

#[test]
fn png_sequence_writes_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        width: 64,
        height: 36,
        fps: 4,
        ..RunConfig::default()
    };
    let sheet = single_chord_sheet(2, 60);
    let mut sink = PngSequenceSink::create(dir.path(), config.width, config.height).unwrap();
    let summary = render_video(&sheet, &config, &mut sink).unwrap();

    assert_eq!(summary.frames, 8);
    assert_eq!(sink.frames_written(), 8);
    assert!(sink.frame_path(7).exists());
    assert!(!sink.frame_path(8).exists());

    let first = image::open(sink.frame_path(0)).unwrap().to_rgba8();
    assert_eq!(first.dimensions(), (64, 36));
}
