use anyhow::Result;
use lift_log_lib::{
    AppService, Config, Entry, EntryField, EntryForm, EntryListView, EntryStore, ExerciseId,
    ListBody, MemoryStorage, Program, ProgramSource, ProgramView, SqliteStorage, Storage,
    SubmitError, ValidationError, DEFAULT_STORAGE_KEY,
};

const TEST_PROGRAM: &str = r#"{
    "program_name": "Test Block",
    "days": [
        {"day": "Day 1", "focus": "Upper Body Pull", "sections": [
            {"type": "main_lift", "name": "Neutral-Grip Pull-ups", "sets": 4, "reps": "6–8", "tempo": "4-0-1-0"},
            {"type": "superset", "name": "Superset A", "exercises": [
                {"name": "Chest-Supported DB Row", "sets": 3, "reps": 10, "tempo": "4-0-1-0"},
                {"name": "Rear Delt DB Fly", "sets": 3, "reps": 15, "tempo": "4-0-1-0"}
            ]}
        ]},
        {"day": "Day 2", "focus": "Lower Body Push", "sections": [
            {"type": "main_lift", "name": "Barbell Back Squat", "sets": 4, "reps": "6–8"}
        ]}
    ]
}"#;

// Helper function to create a test service backed by in-memory storage
fn create_test_service() -> Result<AppService> {
    Ok(AppService {
        config: Config::default(),
        store: EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY),
        program: Program::from_json_str(TEST_PROGRAM)?,
        program_source: ProgramSource::Builtin,
        storage_path: ":memory:".into(),
        config_path: "test_config.toml".into(),
    })
}

fn entry(week: &str, weight: &str) -> Entry {
    Entry {
        week: week.into(),
        weight: weight.into(),
        reps: "8".into(),
        sets: "3".into(),
        notes: String::new(),
    }
}

fn filled_form(week: &str, weight: &str, reps: &str, sets: &str, notes: &str) -> EntryForm {
    let mut form = EntryForm::new();
    form.set(EntryField::Week, week)
        .set(EntryField::Weight, weight)
        .set(EntryField::Reps, reps)
        .set(EntryField::Sets, sets)
        .set(EntryField::Notes, notes);
    form
}

#[test]
fn test_append_then_read_returns_entry_last() -> Result<()> {
    let mut service = create_test_service()?;
    let id = ExerciseId::new(0, 1, 0);

    service.store.append(&id, entry("1", "40"))?;
    service.store.append(&id, entry("2", "42.5"))?;

    let entries = service.entries(id);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.last(), Some(&entry("2", "42.5")));
    Ok(())
}

#[test]
fn test_deletion_shifts_and_removes_key() -> Result<()> {
    let mut store = EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
    let id = ExerciseId::new(0, 0, 0);
    let (e0, e1, e2) = (entry("1", "100"), entry("2", "105"), entry("3", "110"));
    store.append(&id, e0.clone())?;
    store.append(&id, e1.clone())?;
    store.append(&id, e2.clone())?;

    assert_eq!(store.remove_at(&id, 1)?, Some(e1));
    assert_eq!(store.entries(&id), vec![e0.clone(), e2.clone()]);

    assert_eq!(store.remove_at(&id, 0)?, Some(e0));
    assert_eq!(store.entries(&id), vec![e2.clone()]);

    assert_eq!(store.remove_at(&id, 0)?, Some(e2));
    assert!(!store.load().contains_key(&id.to_string()));
    // Key absent, not an empty array.
    assert_eq!(store.raw_document()?.as_deref(), Some("{}"));
    Ok(())
}

#[test]
fn test_out_of_range_delete_is_noop() -> Result<()> {
    let mut service = create_test_service()?;
    let id = ExerciseId::new(1, 0, 0);
    service.store.append(&id, entry("1", "140"))?;
    let before = service.store.raw_document()?;

    assert_eq!(service.delete_entry(id, 5)?, None);
    assert_eq!(service.store.remove_at(&id, 9)?, None);
    assert_eq!(service.store.remove_at(&ExerciseId::new(0, 0, 0), 0)?, None);
    assert_eq!(service.store.raw_document()?, before);
    Ok(())
}

#[test]
fn test_empty_program_renders_nothing_and_touches_no_storage() -> Result<()> {
    let store = EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
    let program = Program::from_json_str(r#"{"days": []}"#)?;

    let mut view = ProgramView::new();
    view.render(&program, &store);

    assert!(view.is_empty());
    assert_eq!(view.cards().count(), 0);
    assert_eq!(store.raw_document()?, None);
    Ok(())
}

#[test]
fn test_render_of_empty_program_keeps_existing_entries() -> Result<()> {
    let mut store = EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
    store.append(&ExerciseId::new(0, 0, 0), entry("1", "100"))?;
    let before = store.raw_document()?;

    let mut view = ProgramView::new();
    view.render(&Program::default(), &store);

    assert!(view.is_empty());
    assert_eq!(store.raw_document()?, before);
    Ok(())
}

#[test]
fn test_validation_gate() -> Result<()> {
    let mut service = create_test_service()?;
    let id = ExerciseId::new(0, 0, 0);

    let mut missing_week = filled_form("", "135", "8", "3", "");
    let result = service.log_entry(id, &mut missing_week);
    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::MissingRequiredField(
            EntryField::Week
        )))
    ));
    assert_eq!(service.store.raw_document()?, None);

    let mut complete = filled_form("1", "135", "8", "3", "");
    let logged = service.log_entry(id, &mut complete)?;
    let expected = Entry {
        week: "1".into(),
        weight: "135".into(),
        reps: "8".into(),
        sets: "3".into(),
        notes: String::new(),
    };
    assert_eq!(logged, expected);
    assert_eq!(service.entries(id), vec![expected]);
    assert_eq!(complete, EntryForm::new(), "inputs are cleared after a submit");
    Ok(())
}

#[test]
fn test_submit_refreshes_list_view() -> Result<()> {
    let mut store = EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
    let id = ExerciseId::new(0, 1, 1);
    let mut list = EntryListView::new(id);
    list.refresh(&store);
    assert!(matches!(list.body(), ListBody::Placeholder(_)));

    let mut form = filled_form("1", "12.5", "15", "3", "slow eccentric");
    form.submit(&mut store, &mut list)?;

    assert_eq!(list.rows().len(), 1);
    assert_eq!(list.rows()[0].entry.notes, "slow eccentric");
    assert_eq!(list.rows()[0].delete.index, 0);
    Ok(())
}

#[test]
fn test_identifiers_stable_across_renders_and_renames() -> Result<()> {
    let store = EntryStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
    let program = Program::from_json_str(TEST_PROGRAM)?;
    let renamed = Program::from_json_str(
        &TEST_PROGRAM
            .replace("Rear Delt DB Fly", "Reverse Pec Deck")
            .replace("Barbell Back Squat", "Safety Bar Squat"),
    )?;

    let mut first = ProgramView::new();
    first.render(&program, &store);
    let mut second = ProgramView::new();
    second.render(&renamed, &store);

    let ids = |view: &ProgramView| view.cards().map(|c| c.id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        ids(&first),
        vec!["d0_s0_e0", "d0_s1_e0", "d0_s1_e1", "d1_s0_e0"]
    );
    Ok(())
}

#[test]
fn test_duplicate_names_get_distinct_identifiers() -> Result<()> {
    let program = Program::from_json_str(
        r#"{"days":[{"day":"Day 1","focus":"","sections":[
            {"type":"superset","name":"A","exercises":[{"name":"Curl"},{"name":"Curl"}]}
        ]}]}"#,
    )?;
    let ids: Vec<ExerciseId> = program.exercises().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![ExerciseId::new(0, 0, 0), ExerciseId::new(0, 0, 1)]);
    Ok(())
}

#[test]
fn test_corrupted_storage_recovers_to_empty() -> Result<()> {
    let storage = MemoryStorage::new().with_item(DEFAULT_STORAGE_KEY, "this is {not json");
    let store = EntryStore::new(storage, DEFAULT_STORAGE_KEY);
    assert!(store.load().is_empty());

    let program = Program::from_json_str(TEST_PROGRAM)?;
    let mut view = ProgramView::new();
    view.render(&program, &store);
    assert_eq!(view.cards().count(), 4);
    assert!(view.cards().all(|card| card.list.is_empty()));
    Ok(())
}

#[test]
fn test_one_malformed_exercise_degrades_alone() -> Result<()> {
    let raw = r#"{
        "d0_s0_e0": [{"week":"1","weight":"100","reps":"5","sets":"5","notes":""}],
        "d0_s1_e0": "garbage",
        "d0_s1_e1": [{"week":"1"}]
    }"#;
    let store = EntryStore::new(MemoryStorage::new().with_item("k", raw), "k");
    let snapshot = store.load();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.entries("d0_s0_e0").len(), 1);
    assert!(store.entries(&ExerciseId::new(0, 1, 0)).is_empty());
    Ok(())
}

#[test]
fn test_unknown_keys_survive_mutations() -> Result<()> {
    let raw = r#"{"legacy_slot":[{"week":"1","weight":"1","reps":"1","sets":"1","notes":""}]}"#;
    let mut store = EntryStore::new(MemoryStorage::new().with_item("k", raw), "k");
    store.append(&ExerciseId::new(0, 0, 0), entry("1", "50"))?;
    let snapshot = store.load();
    assert!(snapshot.contains_key("legacy_slot"));
    assert!(snapshot.contains_key("d0_s0_e0"));
    Ok(())
}

#[test]
fn test_flat_layout_is_single_implicit_identifier() -> Result<()> {
    let mut store = EntryStore::flat(MemoryStorage::new(), "flatEntries");
    store.append(&ExerciseId::new(0, 0, 0), entry("1", "60"))?;
    store.append(&ExerciseId::new(3, 2, 1), entry("2", "65"))?;

    let raw = store.raw_document()?.unwrap_or_default();
    assert!(raw.starts_with('['), "flat layout stores a bare list: {raw}");
    assert_eq!(store.entries(&ExerciseId::new(1, 1, 1)).len(), 2);

    store.remove_at(&ExerciseId::new(0, 0, 0), 0)?;
    store.remove_at(&ExerciseId::new(0, 0, 0), 0)?;
    assert_eq!(store.raw_document()?.as_deref(), Some("[]"));
    Ok(())
}

#[test]
fn test_entry_counts_follow_store_layout() -> Result<()> {
    let mut keyed = create_test_service()?;
    keyed.store.append(&ExerciseId::new(0, 1, 1), entry("1", "10"))?;
    let counts = keyed.entry_counts();
    assert_eq!(counts.len(), 4);
    assert_eq!(counts[&ExerciseId::new(0, 1, 1)], 1);
    assert_eq!(counts[&ExerciseId::new(0, 0, 0)], 0);

    let mut flat = create_test_service()?;
    flat.store = EntryStore::flat(MemoryStorage::new(), "workoutEntriesFlat");
    flat.store.append(&ExerciseId::new(0, 0, 0), entry("1", "60"))?;
    assert!(flat.entry_counts().values().all(|count| *count == 1));
    Ok(())
}

#[test]
fn test_export_import_round_trip() -> Result<()> {
    let mut source = create_test_service()?;
    source.store.append(&ExerciseId::new(0, 0, 0), entry("1", "100"))?;
    source.store.append(&ExerciseId::new(1, 0, 0), entry("1", "140"))?;
    let exported = source.export_entries()?;
    assert!(exported.contains("exported_at"));

    let mut target = create_test_service()?;
    target.store.append(&ExerciseId::new(0, 1, 0), entry("9", "9"))?;
    assert_eq!(target.import_entries(&exported)?, 2);
    assert_eq!(target.store.load(), source.store.load());

    assert!(target.import_entries("not json").is_err());
    assert_eq!(target.store.load(), source.store.load());
    Ok(())
}

#[test]
fn test_clear_removes_storage_key() -> Result<()> {
    let mut service = create_test_service()?;
    service.store.append(&ExerciseId::new(0, 0, 0), entry("1", "100"))?;
    service.clear_entries()?;
    assert_eq!(service.store.raw_document()?, None);
    assert!(service.store.load().is_empty());
    Ok(())
}

#[test]
fn test_resolve_exercise() -> Result<()> {
    let service = create_test_service()?;
    let (id, exercise) = service.resolve_exercise(" d0_s1_e1 ")?;
    assert_eq!(id, ExerciseId::new(0, 1, 1));
    assert_eq!(exercise.name, "Rear Delt DB Fly");

    assert!(service.resolve_exercise("").is_err());
    assert!(service.resolve_exercise("d9_s0_e0").is_err());
    assert!(service
        .resolve_exercise("bench")
        .unwrap_err()
        .to_string()
        .contains("Invalid exercise identifier"));
    Ok(())
}

#[test]
fn test_sqlite_backed_store_persists_between_sessions() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("storage.sqlite3");
    let id = ExerciseId::new(0, 0, 0);
    {
        let mut store = EntryStore::new(SqliteStorage::open(&path)?, DEFAULT_STORAGE_KEY);
        store.append(&id, entry("1", "100"))?;
        store.append(&id, entry("2", "102.5"))?;
    }
    let store = EntryStore::new(SqliteStorage::open(&path)?, DEFAULT_STORAGE_KEY);
    assert_eq!(store.entries(&id).len(), 2);

    let mut raw = SqliteStorage::open(&path)?;
    raw.set_item(DEFAULT_STORAGE_KEY, "[1, 2")?;
    assert!(store.load().is_empty());
    Ok(())
}
