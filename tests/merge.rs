use contest_sync::{
    AppendPayload, BackupSlot, Category, Document, Merge, PayloadError, ReplacePayload,
};
use serde_json::json;

fn sample() -> Document {
    let mut doc = Document::default();
    doc.replace_records(Category::Iq, vec![json!({"id": "a"})]);
    doc.replace_records(Category::Maths, vec![json!({"id": "b"})]);
    doc.set_backup(BackupSlot::First, Some(json!({"timestamp": 1})));
    doc
}

// ---- categories -------------------------------------------------------------

#[test]
fn category_ids_resolve_exactly() {
    for category in Category::ALL {
        assert_eq!(Category::from_id(category.as_str()), Some(category));
        assert_eq!(category.to_string(), category.as_str());
    }
    assert_eq!(Category::from_id("IQ"), None);
    assert_eq!(Category::from_id("trivia"), None);
    assert_eq!(Category::from_id(""), None);
}

#[test]
fn document_deserialize_repairs_and_drops_unknown() {
    let doc: Document = serde_json::from_value(json!({
        "data": {"sudoku": [{"id": 1}], "trivia": [{"id": 2}]},
        "extra": true
    }))
    .unwrap();
    assert_eq!(doc.len(Category::Sudoku), 1);
    assert_eq!(doc.total_records(), 1);

    let back = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        back,
        json!({
            "data": {"iq": [], "sanskriti": [], "maths": [], "sudoku": [{"id": 1}]},
            "backup1": null,
            "backup2": null
        })
    );
}

// ---- replace ----------------------------------------------------------------

#[test]
fn replace_swaps_only_named_categories() {
    let payload = ReplacePayload::from_value(json!({"data": {"iq": [{"id": "c"}, {"id": "d"}]}}))
        .unwrap();
    let doc = payload.merge(sample());
    assert_eq!(doc.records(Category::Iq), &[json!({"id": "c"}), json!({"id": "d"})]);
    assert_eq!(doc.records(Category::Maths), &[json!({"id": "b"})]);
    assert_eq!(doc.backup(BackupSlot::First), Some(&json!({"timestamp": 1})));
}

#[test]
fn replace_with_empty_list_clears_category() {
    let payload = ReplacePayload::default().with_records(Category::Maths, Vec::new());
    let doc = payload.merge(sample());
    assert!(doc.records(Category::Maths).is_empty());
    assert_eq!(doc.len(Category::Iq), 1);
}

#[test]
fn replace_skips_unknown_and_non_array_values() {
    let payload = ReplacePayload::from_value(json!({
        "data": {"trivia": [{"id": "t"}], "iq": "not a list", "sudoku": [{"id": "s"}]}
    }))
    .unwrap();
    let doc = payload.merge(sample());
    assert_eq!(doc.records(Category::Iq), &[json!({"id": "a"})]);
    assert_eq!(doc.records(Category::Sudoku), &[json!({"id": "s"})]);
}

#[test]
fn replace_backup_semantics() {
    let payload = ReplacePayload::from_value(json!({
        "backup1": null,
        "backup2": {"timestamp": 5, "data": {"iq": []}}
    }))
    .unwrap();
    let doc = payload.merge(sample());
    assert!(doc.backup(BackupSlot::First).is_none());
    assert_eq!(
        doc.backup(BackupSlot::Second),
        Some(&json!({"timestamp": 5, "data": {"iq": []}}))
    );

    let untouched = ReplacePayload::from_value(json!({})).unwrap().merge(sample());
    assert_eq!(untouched, sample());
}

#[test]
fn replace_malformed_inputs() {
    assert!(matches!(
        ReplacePayload::from_slice(b"{oops"),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        ReplacePayload::from_value(json!([1])),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        ReplacePayload::from_value(json!({"data": [], "backup1": 1})),
        Err(PayloadError::Malformed(_))
    ));

    let lenient = ReplacePayload::parse_lenient(br#"{"data": 7, "backup2": "x"}"#);
    assert!(lenient.is_empty());
    assert_eq!(lenient.merge(sample()), sample());
}

// ---- append -----------------------------------------------------------------

#[test]
fn append_pushes_to_the_end() {
    let payload =
        AppendPayload::from_value(json!({"contestId": "iq", "entry": {"id": "z"}})).unwrap();
    assert_eq!(payload.category(), Category::Iq);
    assert_eq!(payload.entry(), &json!({"id": "z"}));

    let doc = payload.merge(sample());
    assert_eq!(doc.records(Category::Iq), &[json!({"id": "a"}), json!({"id": "z"})]);
    assert_eq!(doc.records(Category::Maths), &[json!({"id": "b"})]);
    assert_eq!(doc.backup(BackupSlot::First), Some(&json!({"timestamp": 1})));
}

#[test]
fn append_validation_errors() {
    assert_eq!(
        AppendPayload::from_value(json!({"contestId": "trivia", "entry": {}})),
        Err(PayloadError::UnknownCategory("trivia".into()))
    );
    assert!(matches!(
        AppendPayload::from_value(json!({"contestId": ["iq"], "entry": {}})),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        AppendPayload::from_value(json!({"entry": {}})),
        Err(PayloadError::Malformed(_))
    ));
    for entry in [json!(1), json!("x"), json!([{"id": 1}]), json!(null)] {
        assert!(matches!(
            AppendPayload::new(Category::Maths, entry),
            Err(PayloadError::Malformed(_))
        ));
    }
    assert!(matches!(
        AppendPayload::from_slice(b""),
        Err(PayloadError::Malformed(_))
    ));
}
