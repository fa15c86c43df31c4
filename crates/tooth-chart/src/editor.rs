//! Doctor-side chart editing and chart views.

use crate::codec::{decode, encode_payload, tooth_number, DecodedNote, ToothStatusMap};
use serde_json::{Map, Value};
use crate::status::{classify, ToothStatusCategory};
use crate::{ToothChartError, ToothChartResult};

/// FDI positions of the permanent dentition, quadrant by quadrant.
pub const PERMANENT_TEETH: [&str; 32] = [
    "T11", "T12", "T13", "T14", "T15", "T16", "T17", "T18", //
    "T21", "T22", "T23", "T24", "T25", "T26", "T27", "T28", //
    "T31", "T32", "T33", "T34", "T35", "T36", "T37", "T38", //
    "T41", "T42", "T43", "T44", "T45", "T46", "T47", "T48",
];

const STATUS_NORMAL: &str = "normal";
const STATUS_CAVITY: &str = "cavity";
const STATUS_MISSING: &str = "missing";

/// One tooth in a rendered chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToothCell {
    pub tooth: String,
    pub status: String,
    pub category: ToothStatusCategory,
}

/// Build the chart view for a status map.
///
/// Only tooth keys are included, ordered by tooth number.
pub fn chart_view(teeth: &ToothStatusMap) -> Vec<ToothCell> {
    let mut cells: Vec<(u32, ToothCell)> = teeth
        .iter()
        .filter_map(|(tooth, status)| {
            let number = tooth_number(tooth)?;
            Some((
                number,
                ToothCell {
                    tooth: tooth.clone(),
                    status: status.clone(),
                    category: classify(status),
                },
            ))
        })
        .collect();

    cells.sort_by(|(a, cell_a), (b, cell_b)| {
        a.cmp(b).then_with(|| cell_a.tooth.cmp(&cell_b.tooth))
    });
    cells.into_iter().map(|(_, cell)| cell).collect()
}

/// Editable tooth chart.
///
/// Teeth without an entry are treated as `normal`. Tooth identifiers are stored upper-cased
/// (`t26` becomes `T26`). The note's free text and any non-tooth payload fields are carried
/// through to [`ToothChartEditor::to_note`] untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToothChartEditor {
    teeth: ToothStatusMap,
    free_text: String,
    other_fields: Map<String, Value>,
}

impl ToothChartEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing from a stored note.
    ///
    /// When a note holds both `t26` and `T26`, the upper-case entry wins. A structured payload
    /// without teeth keeps its object fields; a JSON array cannot be merged with a chart and is
    /// dropped. Plain text becomes the free text of the chart.
    pub fn from_note(note: &str) -> Self {
        match decode(note) {
            DecodedNote::ToothChart {
                teeth,
                free_text,
                other_fields,
            } => Self {
                teeth: canonical_teeth(teeth),
                free_text,
                other_fields,
            },
            DecodedNote::StructuredText { value, free_text } => Self {
                teeth: ToothStatusMap::new(),
                free_text,
                other_fields: match value {
                    Value::Object(fields) => fields,
                    _ => Map::new(),
                },
            },
            DecodedNote::PlainText(text) => Self {
                free_text: text.trim().to_owned(),
                ..Self::default()
            },
        }
    }

    pub fn teeth(&self) -> &ToothStatusMap {
        &self.teeth
    }

    /// Current status of a tooth, `normal` when it has no entry.
    pub fn status(&self, tooth: &str) -> &str {
        self.teeth
            .get(&tooth.to_ascii_uppercase())
            .map(String::as_str)
            .unwrap_or(STATUS_NORMAL)
    }

    /// Advance a tooth to its next status: `normal -> cavity -> missing -> normal`.
    ///
    /// Labels outside that cycle restart at `normal`. Returns the new status.
    pub fn cycle(&mut self, tooth: &str) -> ToothChartResult<&str> {
        let key = canonical_tooth(tooth)?;
        let next = match classify(self.status(&key)) {
            ToothStatusCategory::Normal => STATUS_CAVITY,
            ToothStatusCategory::Decay => STATUS_MISSING,
            ToothStatusCategory::Missing | ToothStatusCategory::Other(_) => STATUS_NORMAL,
        };
        let entry = self.teeth.entry(key).or_default();
        *entry = next.to_owned();
        Ok(entry.as_str())
    }

    /// Set a free-text status on a tooth.
    pub fn set(&mut self, tooth: &str, status: &str) -> ToothChartResult<()> {
        let key = canonical_tooth(tooth)?;
        let status = status.trim();
        if status.is_empty() {
            return Err(ToothChartError::EmptyStatus);
        }
        self.teeth.insert(key, status.to_owned());
        Ok(())
    }

    /// Remove a tooth's entry. Returns true if there was one.
    pub fn reset(&mut self, tooth: &str) -> ToothChartResult<bool> {
        let key = canonical_tooth(tooth)?;
        Ok(self.teeth.remove(&key).is_some())
    }

    pub fn view(&self) -> Vec<ToothCell> {
        chart_view(&self.teeth)
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn set_free_text(&mut self, free_text: &str) {
        self.free_text = free_text.trim().to_owned();
    }

    pub fn other_fields(&self) -> &Map<String, Value> {
        &self.other_fields
    }

    /// Serialise the chart, its free text and any carried-over fields into note text.
    pub fn to_note(&self) -> String {
        encode_payload(&self.teeth, &self.other_fields, &self.free_text)
    }
}

fn canonical_teeth(teeth: ToothStatusMap) -> ToothStatusMap {
    let mut canonical = ToothStatusMap::new();
    for (tooth, status) in teeth {
        let upper = tooth.to_ascii_uppercase();
        if upper == tooth || !canonical.contains_key(&upper) {
            canonical.insert(upper, status);
        }
    }
    canonical
}

fn canonical_tooth(tooth: &str) -> ToothChartResult<String> {
    let tooth = tooth.trim();
    if tooth_number(tooth).is_none() {
        return Err(ToothChartError::InvalidToothId(tooth.to_owned()));
    }
    Ok(tooth.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_walks_the_status_loop() {
        let mut editor = ToothChartEditor::new();
        assert_eq!(editor.status("T26"), "normal");
        assert_eq!(editor.cycle("T26").expect("cycle"), "cavity");
        assert_eq!(editor.cycle("t26").expect("cycle"), "missing");
        assert_eq!(editor.cycle("T26").expect("cycle"), "normal");
        assert_eq!(editor.teeth().len(), 1);
    }

    #[test]
    fn cycle_restarts_unknown_labels_at_normal() {
        let mut editor = ToothChartEditor::new();
        editor.set("T36", "root canal").expect("set");
        assert_eq!(editor.cycle("T36").expect("cycle"), "normal");
    }

    #[test]
    fn rejects_non_tooth_identifiers() {
        let mut editor = ToothChartEditor::new();
        let err = editor.cycle("molar").expect_err("should reject");
        assert!(matches!(err, ToothChartError::InvalidToothId(id) if id == "molar"));
        assert!(editor.set("T", "normal").is_err());
    }

    #[test]
    fn rejects_blank_status() {
        let mut editor = ToothChartEditor::new();
        let err = editor.set("T11", "   ").expect_err("should reject");
        assert!(matches!(err, ToothChartError::EmptyStatus));
    }

    #[test]
    fn note_round_trip_through_editor() {
        let mut editor = ToothChartEditor::new();
        editor.cycle("T11").expect("cycle");
        editor.set("t48", "missing").expect("set");
        editor.set_free_text("Recall in 6 months");
        let note = editor.to_note();

        let reloaded = ToothChartEditor::from_note(&note);
        assert_eq!(reloaded, editor);
        assert_eq!(reloaded.status("T48"), "missing");
        assert_eq!(reloaded.free_text(), "Recall in 6 months");
    }

    #[test]
    fn from_note_with_plain_text_keeps_it_as_free_text() {
        let editor = ToothChartEditor::from_note("Bệnh nhân ổn định");
        assert!(editor.teeth().is_empty());
        assert_eq!(editor.free_text(), "Bệnh nhân ổn định");
    }

    #[test]
    fn resaving_mixed_note_keeps_free_text_and_extra_fields() {
        let note = "Sensitive to cold\n[ToothStatus]: \
                    {\"t11\":\"normal\",\"remark\":\"floss daily\",\"T26\":\"cavity\"}";
        let mut editor = ToothChartEditor::from_note(note);
        assert_eq!(editor.free_text(), "Sensitive to cold");
        assert_eq!(
            editor.other_fields().get("remark"),
            Some(&Value::String("floss daily".into()))
        );

        editor.cycle("T26").expect("cycle");
        let saved = editor.to_note();

        match decode(&saved) {
            DecodedNote::ToothChart {
                teeth,
                free_text,
                other_fields,
            } => {
                assert_eq!(free_text, "Sensitive to cold");
                assert_eq!(teeth.get("T11").map(String::as_str), Some("normal"));
                assert_eq!(teeth.get("T26").map(String::as_str), Some("missing"));
                assert_eq!(
                    other_fields.get("remark"),
                    Some(&Value::String("floss daily".into()))
                );
            }
            other => panic!("expected ToothChart, got {other:?}"),
        }
        assert_eq!(ToothChartEditor::from_note(&saved), editor);
    }

    #[test]
    fn upper_case_key_wins_over_lower_case_duplicate() {
        for note in [
            r#"{"t26":"cavity","T26":"missing"}"#,
            r#"{"T26":"missing","t26":"cavity"}"#,
        ] {
            let editor = ToothChartEditor::from_note(note);
            assert_eq!(editor.teeth().len(), 1);
            assert_eq!(editor.status("T26"), "missing");
        }
    }

    #[test]
    fn structured_note_keeps_its_fields_when_charted() {
        let mut editor =
            ToothChartEditor::from_note("Intake\n[ToothStatus]: {\"allergy\":\"latex\"}");
        editor.set("T36", "cavity").expect("set");
        let saved = editor.to_note();
        assert_eq!(
            saved,
            "Intake\n[ToothStatus]: {\"T36\":\"cavity\",\"allergy\":\"latex\"}"
        );
    }

    #[test]
    fn reset_removes_entry() {
        let mut editor = ToothChartEditor::new();
        editor.set("T21", "caries").expect("set");
        assert!(editor.reset("T21").expect("reset"));
        assert!(!editor.reset("T21").expect("reset"));
        assert_eq!(editor.status("T21"), "normal");
    }

    #[test]
    fn chart_view_orders_by_tooth_number() {
        let teeth = ToothStatusMap::from([
            ("T9".to_string(), "normal".to_string()),
            ("T18".to_string(), "cavity".to_string()),
            ("T100".to_string(), "missing".to_string()),
        ]);
        let tooth_order: Vec<_> = chart_view(&teeth).into_iter().map(|c| c.tooth).collect();
        assert_eq!(tooth_order, vec!["T9", "T18", "T100"]);
    }

    #[test]
    fn permanent_teeth_are_valid_tooth_keys() {
        assert!(PERMANENT_TEETH.iter().all(|t| crate::is_tooth_key(t)));
        let unique: std::collections::BTreeSet<_> = PERMANENT_TEETH.iter().collect();
        assert_eq!(unique.len(), 32);
    }
}
