//! Per-subject demographic attributes.
//!
//! Each subject has a free-text readme with `Key: value` lines. Five keys are
//! recognised; everything else in the file is ignored:
//!
//! ```text
//! Age: 27
//! Height (cm): 175
//! Weight (kg): 80
//! Gender: male
//! Dominant hand: right
//! ```
use std::path::Path;
use tracing::{debug, warn};

use crate::error::FeatureError;

/// Static per-subject attributes. A field the readme does not provide is
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub gender: Option<String>,
    pub dominant_hand: Option<String>,
}

/// Parse outcome: the attributes that could be read, plus one error per
/// numeric field whose value was not an integer.
#[derive(Debug, Default)]
pub struct ParsedDemographics {
    pub demographics: Demographics,
    pub errors: Vec<FeatureError>,
}

#[derive(Clone, Copy)]
enum Field {
    Age,
    Height,
    Weight,
    Gender,
    Hand,
}

// Checked in order; the first key found in a line claims it.
const KEYS: [(&str, Field); 5] = [
    ("Age:", Field::Age),
    ("Height (cm):", Field::Height),
    ("Weight (kg):", Field::Weight),
    ("Gender:", Field::Gender),
    ("Dominant hand:", Field::Hand),
];

impl Field {
    fn column(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Height => "height_cm",
            Field::Weight => "weight_kg",
            Field::Gender => "gender",
            Field::Hand => "dominant_hand",
        }
    }
}

/// Parse readme text.
///
/// For each line containing a recognised key, the value is the text after the
/// line's last `:`, trimmed. A later line for the same key overrides an earlier
/// one. Never fails as a whole: a malformed numeric value is reported in
/// [`ParsedDemographics::errors`] and the field stays `None`.
pub fn parse_demographics(text: &str) -> ParsedDemographics {
    let mut out = ParsedDemographics::default();
    let d = &mut out.demographics;

    for line in text.lines() {
        let Some(&(_, field)) = KEYS.iter().find(|(key, _)| line.contains(key)) else {
            continue;
        };
        let value = line.rsplit(':').next().unwrap_or("").trim();

        let slot = match field {
            Field::Age => &mut d.age,
            Field::Height => &mut d.height_cm,
            Field::Weight => &mut d.weight_kg,
            Field::Gender => {
                d.gender = Some(value.to_string());
                continue;
            }
            Field::Hand => {
                d.dominant_hand = Some(value.to_string());
                continue;
            }
        };
        match value.parse::<u32>() {
            Ok(v) => *slot = Some(v),
            Err(_) => {
                *slot = None;
                out.errors.push(FeatureError::DemographicParse {
                    field: field.column(),
                    value: value.to_string(),
                });
            }
        }
    }
    out
}

/// Read and parse a subject's readme.
///
/// A missing or unreadable file yields all-`None` demographics, not an error.
/// Field errors are logged and returned alongside.
pub fn load_demographics(path: &Path, subject: u32) -> ParsedDemographics {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(subject, path = %path.display(), error = %e, "no demographic record");
            return ParsedDemographics::default();
        }
    };
    let parsed = parse_demographics(&text);
    for e in &parsed.errors {
        warn!(subject, "{e}; field left empty");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "\
### Personal information ###
Age: 27
Height (cm): 175
Weight (kg): 80
Gender: male
Dominant hand: right

### Additional notes ###
Did you drink coffee today? NO
";

    #[test]
    fn parses_all_fields() {
        let p = parse_demographics(README);
        assert!(p.errors.is_empty());
        assert_eq!(
            p.demographics,
            Demographics {
                age: Some(27),
                height_cm: Some(175),
                weight_kg: Some(80),
                gender: Some("male".into()),
                dominant_hand: Some("right".into()),
            }
        );
    }

    #[test]
    fn empty_text_leaves_everything_absent() {
        let p = parse_demographics("");
        assert_eq!(p.demographics, Demographics::default());
        assert!(p.errors.is_empty());
    }

    #[test]
    fn bad_number_only_affects_its_field() {
        let p = parse_demographics("Age: twenty\nWeight (kg): 70\nGender: female\n");
        assert_eq!(p.demographics.age, None);
        assert_eq!(p.demographics.weight_kg, Some(70));
        assert_eq!(p.demographics.gender.as_deref(), Some("female"));
        assert_eq!(p.errors.len(), 1);
        assert!(matches!(
            &p.errors[0],
            FeatureError::DemographicParse { field: "age", value } if value == "twenty"
        ));
    }

    #[test]
    fn later_line_wins() {
        let p = parse_demographics("Age: 20\nAge: 21\n");
        assert_eq!(p.demographics.age, Some(21));
    }

    #[test]
    fn string_values_are_trimmed() {
        let p = parse_demographics("Dominant hand:    left   \r\n");
        assert_eq!(p.demographics.dominant_hand.as_deref(), Some("left"));
    }
}
