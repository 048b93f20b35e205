use anyhow::Result;
use cfp_deadlines::normalize::{normalize, FormatPattern, ZoneTable};
use cfp_deadlines::storage::{DeadlineRecord, DeadlineStore, FileStore, InMemoryStore};
use cfp_deadlines::types::ConferenceDeadlines;
use tempfile::tempdir;

fn deadlines(name: &str, text: &str, format: &str) -> ConferenceDeadlines {
    let pattern = FormatPattern::new(format).unwrap();
    ConferenceDeadlines {
        name: name.to_string(),
        deadline: normalize(text, &pattern, ZoneTable::builtin()),
        notification: None,
    }
}

#[tokio::test]
async fn test_file_store_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let store = FileStore::new(dir.path().join("nested").join("deadlines.txt"));

    let rows = vec![
        deadlines("HPDC", "TO BE ANNOUNCED", "%B %d, %Y."),
        deadlines("NIPS", "MAY 22 '24 01:00 PM PDT", "%B %d '%y %I:%M %p"),
        deadlines("PACT", "MARCH 21, 2025", "%B %d, %Y"),
    ];
    let records: Vec<DeadlineRecord> = rows.iter().map(DeadlineRecord::from_deadlines).collect();
    store.save(&records).await?;

    let content = std::fs::read_to_string(store.path())?;
    assert_eq!(
        content,
        "HPDC|\nNIPS|2024-05-23T05:00:00+09:00\nPACT|2025-03-22T21:00:00+09:00\n"
    );

    let loaded = store.load().await?;
    assert_eq!(loaded, records);

    // same instant and same offset as the normalized timestamp
    let saved = rows[1].deadline.persisted_timestamp().unwrap();
    let restored = loaded[1].timestamp.unwrap();
    assert_eq!(restored, saved);
    assert_eq!(restored.offset().local_minus_utc(), 9 * 3600);
    Ok(())
}

#[tokio::test]
async fn test_save_overwrites_previous_run() -> Result<()> {
    let dir = tempdir()?;
    let store = FileStore::new(dir.path().join("deadlines.txt"));

    let first = vec![DeadlineRecord::from_deadlines(&deadlines("A", "JUNE 1, 2025", "%B %d, %Y"))];
    let second = vec![DeadlineRecord::from_deadlines(&deadlines("B", "JUNE 2, 2025", "%B %d, %Y"))];
    store.save(&first).await?;
    store.save(&second).await?;

    assert_eq!(store.load().await?, second);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_loads_empty() -> Result<()> {
    let dir = tempdir()?;
    let store = FileStore::new(dir.path().join("never-written.txt"));
    assert!(store.load().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_in_memory_store() -> Result<()> {
    let store = InMemoryStore::new();
    let records = vec![DeadlineRecord::from_deadlines(&deadlines("A", "JUNE 1, 2025", "%B %d, %Y"))];
    store.save(&records).await?;
    assert_eq!(store.load().await?, records);
    Ok(())
}
