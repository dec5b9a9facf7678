//! Playback map tests: verify the chord timeline exported next to the video.

use chordwheel::{generate_playback_map, parse_file, playback_map_to_json, ScheduleSettings};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

#[test]
fn playback_map_two_five_one() {
    let sheet = parse_file(samples_dir().join("two_five_one.json")).unwrap();
    let pmap = generate_playback_map(&sheet, &ScheduleSettings::default()).unwrap();

    assert_eq!(pmap.fps, 30);
    assert_eq!(pmap.total_frames, 240);
    assert_eq!(pmap.total_beats, 16);
    assert_eq!(pmap.duration_secs, 8.0);
    assert_eq!(pmap.chords.len(), 3);

    let labels: Vec<(&str, &str, &str)> = pmap
        .chords
        .iter()
        .map(|c| (c.key_name.as_str(), c.notes.as_str(), c.scale_level.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("C", "D, F, A, C", "-"),
            ("C", "G, B, D, F", "-"),
            ("C", "C, E, G, B", "-"),
        ]
    );

    let starts: Vec<f64> = pmap.chords.iter().map(|c| c.start_secs).collect();
    assert_eq!(starts, vec![0.0, 2.0, 4.0]);
}

#[test]
fn playback_map_modulation_labels() {
    let sheet = parse_file(samples_dir().join("modulation.json")).unwrap();
    let pmap = generate_playback_map(&sheet, &ScheduleSettings::default()).unwrap();

    let e7 = &pmap.chords[1];
    assert_eq!(e7.memo.as_deref(), Some("E7"));
    assert_eq!(e7.key_name, "C");
    assert_eq!(e7.notes, "E, G#, B, D");
    assert_eq!(e7.accidentals, vec![5]);
    assert_eq!(e7.scale_level, "γ");

    let a = &pmap.chords[2];
    assert_eq!(a.key_name, "A");
    assert_eq!(a.notes, "F#, A, C#");
    assert_eq!(a.main_function, "6");

    let lydian = &pmap.chords[3];
    assert_eq!(lydian.key_name, "A");
    assert_eq!(lydian.bpm, 140);
    assert_eq!(lydian.accidentals, vec![-4]);

    let rest = &pmap.chords[4];
    assert_eq!(rest.frame_count, 0);
    assert_eq!(rest.start_frame, pmap.total_frames);
}

#[test]
fn playback_map_json_round_trip() {
    let sheet = parse_file(samples_dir().join("modulation.json")).unwrap();
    let pmap = generate_playback_map(&sheet, &ScheduleSettings::default()).unwrap();
    let json = playback_map_to_json(&pmap).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["fps"], 30);
    assert_eq!(value["total_frames"], 198);
    assert_eq!(value["chords"].as_array().unwrap().len(), 5);
    assert_eq!(value["chords"][2]["key_name"], "A");
    assert_eq!(value["chords"][0]["memo"], "C");

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("timeline.json");
    std::fs::write(&out, &json).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn playback_map_omits_missing_memo() {
    let sheet = chordwheel::parse_chord_sheet(r#"{"chords": [{"bass": 1, "shape": "135"}]}"#).unwrap();
    let pmap = generate_playback_map(&sheet, &ScheduleSettings::default()).unwrap();
    let json = playback_map_to_json(&pmap).unwrap();
    assert!(!json.contains("memo"));
}
