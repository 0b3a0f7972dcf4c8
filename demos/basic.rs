use contest_sync::{BackupSlot, Category, DocumentStore};
use serde_json::json;

fn main() -> Result<(), contest_sync::Error> {
    let path = std::env::temp_dir().join("contest_sync_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let store = DocumentStore::open(&path)?;

    // a fresh store starts with every contest empty
    let doc = store.load();
    println!("records on start = {}", doc.total_records());

    // submit two contestants
    for (name, score) in [("Asha", 17), ("Ravi", 12)] {
        let body = json!({
            "contestId": "maths",
            "entry": {"contestantName": name, "ageGroup": "Group 3", "score": score}
        });
        store.append(&serde_json::to_vec(&body).unwrap())?;
    }

    // snapshot into a backup slot, then wipe the sudoku list
    let snapshot = json!({"timestamp": 1, "data": serde_json::to_value(store.load()).unwrap()["data"].clone()});
    let body = json!({"data": {"sudoku": []}, "backup1": snapshot});
    let doc = store.replace(&serde_json::to_vec(&body).unwrap())?;

    println!("maths   = {:?}", doc.records(Category::Maths));
    println!("backup1 = {}", doc.backup(BackupSlot::First).is_some());

    // unknown contests are refused
    match store.append(br#"{"contestId": "trivia", "entry": {}}"#) {
        Err(err) => println!("rejected: {err}"),
        Ok(_) => println!("unexpectedly accepted"),
    }

    println!("\nOn-disk JSON:\n{}", std::fs::read_to_string(store.path())?);
    let _ = std::fs::remove_file(&path);
    Ok(())
}
