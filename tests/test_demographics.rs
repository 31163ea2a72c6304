mod common;
use common::README_S2;
use wristfeat::{load_demographics, parse_demographics, Demographics};

#[test]
fn age_without_gender() {
    let p = parse_demographics("Age: 27\nHeight (cm): 181\n");
    assert_eq!(p.demographics.age, Some(27));
    assert_eq!(p.demographics.gender, None);
    assert_eq!(p.demographics.height_cm, Some(181));
    assert!(p.errors.is_empty());
}

#[test]
fn parsing_is_idempotent() {
    let a = parse_demographics(README_S2);
    let b = parse_demographics(README_S2);
    assert_eq!(a.demographics, b.demographics);
    assert_eq!(a.errors.len(), b.errors.len());
}

#[test]
fn unrecognised_lines_are_ignored() {
    let p = parse_demographics("Did you smoke today? NO\nNotes: none\nGender: female\n");
    assert_eq!(
        p.demographics,
        Demographics { gender: Some("female".into()), ..Demographics::default() }
    );
}

#[test]
fn malformed_height_keeps_other_fields() {
    let p = parse_demographics("Age: 25\nHeight (cm): 1.80\nWeight (kg): 60\nDominant hand: left\n");
    assert_eq!(p.demographics.height_cm, None);
    assert_eq!(p.demographics.age, Some(25));
    assert_eq!(p.demographics.weight_kg, Some(60));
    assert_eq!(p.demographics.dominant_hand.as_deref(), Some("left"));
    assert_eq!(p.errors.len(), 1);
}

#[test]
fn missing_record_is_all_absent() {
    let dir = tempfile::tempdir().unwrap();
    let p = load_demographics(&dir.path().join("S99_readme.txt"), 99);
    assert_eq!(p.demographics, Demographics::default());
    assert!(p.errors.is_empty());
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("S2_readme.txt");
    std::fs::write(&path, README_S2).unwrap();
    let p = load_demographics(&path, 2);
    assert_eq!(p.demographics.weight_kg, Some(80));
    assert_eq!(p.demographics.dominant_hand.as_deref(), Some("right"));
}
