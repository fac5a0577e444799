//! Integration tests for journal persistence.
//!
//! These tests use temporary directories so every run starts from a clean
//! file system and nothing leaks into the user's data directory.

use std::collections::BTreeMap;
use std::fs;

use chrono::NaiveDate;
use mood_journal::{
    JsonFileStore, MemoryStore, MoodData, MoodEntry, MoodLevel, MoodRepository, Questionnaire,
    StoreError, TimeOfDay, analytics,
};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn level(v: u8) -> MoodLevel {
    MoodLevel::new(v).unwrap()
}

// ==================== Wire Format Tests ====================

#[test]
fn test_reads_existing_journal_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mood-data.json");
    fs::write(
        &path,
        r#"{
            "2024-03-01": {
                "morning": {"level": 5, "timeOfDay": "morning"},
                "full-day": {
                    "level": 3,
                    "timeOfDay": "full-day",
                    "note": "long day",
                    "questionnaire": {
                        "sleepQuality": "poor",
                        "symptoms": {"headache": true},
                        "triggers": {"Work": true, "Noise": false},
                        "notes": ""
                    }
                }
            }
        }"#,
    )
    .unwrap();

    let data = JsonFileStore::new(&path).load().unwrap();
    let day = data.day(date(2024, 3, 1)).unwrap();

    assert_eq!(day.len(), 2);
    assert_eq!(day[&TimeOfDay::Morning].level, level(5));

    let full_day = &day[&TimeOfDay::FullDay];
    assert_eq!(full_day.note_text(), Some("long day"));
    let questionnaire = full_day.questionnaire.as_ref().unwrap();
    assert_eq!(questionnaire.sleep_quality.as_deref(), Some("poor"));
    assert_eq!(questionnaire.active_triggers().collect::<Vec<_>>(), vec!["Work"]);
}

#[test]
fn test_rejects_out_of_range_level() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mood-data.json");
    fs::write(&path, r#"{"2024-03-01": {"night": {"level": 9, "timeOfDay": "night"}}}"#).unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Deserialize { .. }));
}

#[test]
fn test_mismatched_slot_tag_keeps_one_entry_per_slot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mood-data.json");
    fs::write(
        &path,
        r#"{"2024-03-01": {
            "morning": {"level": 5, "timeOfDay": "evening"},
            "evening": {"level": 1, "timeOfDay": "evening"}
        }}"#,
    )
    .unwrap();

    let data = JsonFileStore::new(&path).load().unwrap();
    let slots = analytics::time_of_day_breakdown(&data);
    let slot = |tag: TimeOfDay| slots.iter().find(|s| s.time_of_day == tag).unwrap();

    assert_eq!(slot(TimeOfDay::Morning).entry_count, 1);
    assert_eq!(slot(TimeOfDay::Morning).average, 5.0);
    assert_eq!(slot(TimeOfDay::Evening).entry_count, 1);
    assert_eq!(slot(TimeOfDay::Evening).average, 1.0);
}

#[test]
fn test_written_file_uses_camel_case_and_kebab_slots() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("mood-data.json"));

    store
        .update(|data| {
            data.save_mood(date(2024, 6, 1), TimeOfDay::FullDay, level(4), None);
        })
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let entry = &raw["2024-06-01"]["full-day"];
    assert_eq!(entry["level"], 4);
    assert_eq!(entry["timeOfDay"], "full-day");
    assert!(entry.get("note").is_none());
}

// ==================== Round Trip Tests ====================

#[test]
fn test_journal_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal").join("mood-data.json");

    let questionnaire = Questionnaire {
        triggers: BTreeMap::from([("Crowds".to_string(), true)]),
        notes: Some("busy train".to_string()),
        ..Default::default()
    };

    {
        let store = JsonFileStore::new(&path);
        store
            .update(|data| {
                data.save_mood(date(2024, 2, 29), TimeOfDay::Morning, level(2), Some("tired".into()));
                data.upsert_entry(
                    date(2024, 2, 29),
                    MoodEntry::new(TimeOfDay::Evening, level(3)).with_questionnaire(questionnaire.clone()),
                );
            })
            .unwrap();
    }

    let reopened = JsonFileStore::new(&path).load().unwrap();
    let day = reopened.day(date(2024, 2, 29)).unwrap();
    assert_eq!(day.len(), 2);
    assert_eq!(day[&TimeOfDay::Morning].note.as_deref(), Some("tired"));
    assert_eq!(day[&TimeOfDay::Evening].questionnaire.as_ref(), Some(&questionnaire));
}

#[test]
fn test_reset_day_is_persisted() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("mood-data.json"));

    store
        .update(|data| {
            data.save_mood(date(2024, 1, 1), TimeOfDay::Night, level(1), None);
            data.save_mood(date(2024, 1, 2), TimeOfDay::Night, level(5), None);
        })
        .unwrap();
    let removed = store.update(|data| data.reset_day(date(2024, 1, 1))).unwrap();

    assert!(removed);
    let data = store.load().unwrap();
    assert_eq!(data.len(), 1);
    assert!(data.day(date(2024, 1, 1)).is_none());
}

#[test]
fn test_memory_and_file_stores_agree() {
    let dir = tempdir().unwrap();
    let file = JsonFileStore::new(dir.path().join("mood-data.json"));
    let memory = MemoryStore::new();

    let mut data = MoodData::new();
    for d in 1..=5 {
        data.save_mood(date(2024, 7, d), TimeOfDay::Afternoon, level((d % 5 + 1) as u8), None);
    }

    file.save(&data).unwrap();
    memory.save(&data).unwrap();

    assert_eq!(file.load().unwrap(), memory.load().unwrap());
}
