//! Integration tests: parse the sample chord sheets in samples/.

use chordwheel::{parse_file, ChordError, Color, Degree, Direction};
use std::path::PathBuf;

fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

fn degrees(ns: &[i64]) -> Vec<Degree> {
    ns.iter().map(|&n| Degree::new(n).unwrap()).collect()
}

#[test]
fn parse_two_five_one() {
    let sheet = parse_file(samples_dir().join("two_five_one.json")).expect("Failed to parse two_five_one");

    assert_eq!(sheet.background, Color::rgb(255, 255, 255));
    assert_eq!(sheet.foreground, Color::rgb(0xaa, 0xaa, 0xaa));
    assert_eq!(sheet.default_beats, 4);
    assert_eq!(sheet.chords.len(), 3);

    let ii = &sheet.chords[0];
    assert_eq!(ii.memo.as_deref(), Some("ii7"));
    assert_eq!(ii.bass.get(), 2);
    assert_eq!(ii.shape, degrees(&[1, 3, 5, 7]));
    assert!(ii.accidentals.is_empty());
    assert_eq!((ii.beats, ii.key, ii.bpm), (Some(4), Some(0), Some(120)));

    // Omitted fields stay unset so the scheduler carries the previous values.
    let v = &sheet.chords[1];
    assert_eq!((v.beats, v.key, v.bpm), (None, None, None));
}

#[test]
fn parse_modulation_sentinels_and_shape_forms() {
    let sheet = parse_file(samples_dir().join("modulation.json")).expect("Failed to parse modulation");

    assert_eq!(sheet.background, Color::rgb(0x10, 0x20, 0x30));
    assert_eq!(sheet.foreground, Color::rgb(0xf0, 0xc0, 0x40));
    assert_eq!(sheet.default_beats, 2);
    assert_eq!(sheet.chords.len(), 5);

    // compact string, list of numbers and list of strings all decode alike
    assert_eq!(sheet.chords[0].shape, degrees(&[1, 3, 5]));
    assert_eq!(sheet.chords[1].shape, degrees(&[1, 3, 5, 7]));
    assert_eq!(sheet.chords[2].shape, degrees(&[1, 3, 5]));
    assert_eq!(sheet.chords[3].shape, degrees(&[3, 5, 7, 2]));

    // key 12 and bpm 0 mean "keep the previous value"
    assert_eq!(sheet.chords[1].key, None);
    assert_eq!(sheet.chords[1].bpm, None);
    assert_eq!(sheet.chords[3].key, None);
    assert_eq!(sheet.chords[3].bpm, Some(140));

    let raised = sheet.chords[1].accidentals[0];
    assert_eq!((raised.degree.get(), raised.direction), (5, Direction::Sharp));
    let lowered = sheet.chords[3].accidentals[0];
    assert_eq!((lowered.degree.get(), lowered.direction), (4, Direction::Flat));

    assert_eq!(sheet.chords[4].beats, Some(0));
}

#[test]
fn invalid_degree_names_the_chord() {
    let err = parse_file(samples_dir().join("invalid_degree.json")).unwrap_err();
    match err {
        ChordError::Validation { index, message } => {
            assert_eq!(index, 1);
            assert!(message.contains('8'), "message: {message}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_configuration_error() {
    let err = parse_file(samples_dir().join("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, ChordError::Configuration(_)));
}
