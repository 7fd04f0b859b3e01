use fitment_types::{parse_tire_size, validate_wheel_spec, RawWheelSpec, SpecStore, WheelSpec};
use spec_store::{load_store, save_store, InMemorySpecStore, LoadError, FORMAT_NAME, FORMAT_VERSION};

// ── Helper Functions ─────────────────────────────────────────────────────

fn make_wheel(name: &str) -> WheelSpec {
    validate_wheel_spec(&RawWheelSpec {
        name: name.into(),
        diameter: 18.0,
        width: 8.5,
        offset: 35.0,
        bolt_pattern: "5x114.3".into(),
        center_bore: 67.1,
        load_rating: 1600,
        load_unit: fitment_types::LoadUnit::Lb,
    })
    .unwrap()
}

fn make_store() -> InMemorySpecStore {
    let mut store = InMemorySpecStore::new("Garage");
    let wheel = store.add_wheel(make_wheel("Forged 18"));
    let a = store.add_tire(parse_tire_size("235/40R18").unwrap());
    let b = store.add_tire(parse_tire_size("245/40R18").unwrap());
    store.add_tire_combination(wheel, a).unwrap();
    store.add_tire_combination(wheel, b).unwrap();
    store.add_tire(parse_tire_size("225/45R17").unwrap());
    store
}

fn saved_value(store: &InMemorySpecStore) -> serde_json::Value {
    serde_json::from_str(&save_store(store).unwrap()).unwrap()
}

// ── Save ─────────────────────────────────────────────────────────────────

#[test]
fn save_includes_format_and_version() {
    let parsed = saved_value(&make_store());
    assert_eq!(parsed["format"], FORMAT_NAME);
    assert_eq!(parsed["version"], FORMAT_VERSION);
}

#[test]
fn save_includes_metadata() {
    let parsed = saved_value(&make_store());
    assert_eq!(parsed["metadata"]["name"], "Garage");
    assert!(parsed["metadata"]["created"].is_string());
    assert!(parsed["metadata"]["modified"].is_string());
}

#[test]
fn save_writes_flat_records() {
    let parsed = saved_value(&make_store());
    let wheels = parsed["wheels"].as_array().unwrap();
    assert_eq!(wheels.len(), 1);
    assert_eq!(wheels[0]["spec"]["bolt_pattern"], "5x114.3");
    assert_eq!(wheels[0]["spec"]["offset"], 35.0);

    assert_eq!(parsed["tires"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["combinations"].as_array().unwrap().len(), 2);
}

#[test]
fn save_empty_store() {
    let parsed = saved_value(&InMemorySpecStore::new("Empty"));
    assert!(parsed["wheels"].as_array().unwrap().is_empty());
    assert!(parsed["combinations"].as_array().unwrap().is_empty());
}

// ── Load ─────────────────────────────────────────────────────────────────

#[test]
fn round_trip_preserves_records() {
    let store = make_store();
    let loaded = load_store(&save_store(&store).unwrap()).unwrap();

    assert_eq!(loaded.metadata(), store.metadata());
    assert_eq!(loaded.list_wheel_specs(), store.list_wheel_specs());
    assert_eq!(loaded.list_tire_specs(), store.list_tire_specs());

    let (wheel, _) = loaded.wheel_by_name("Forged 18").unwrap();
    let sizes: Vec<String> = loaded
        .compatible_tires(wheel)
        .unwrap()
        .into_iter()
        .map(|(_, t)| t.to_string())
        .collect();
    assert_eq!(sizes.len(), 2);
    assert!(sizes.contains(&"235/40R18".to_string()));
}

#[test]
fn load_rejects_unknown_format() {
    let mut doc = saved_value(&make_store());
    doc["format"] = "tire-catalog".into();
    match load_store(&doc.to_string()) {
        Err(LoadError::UnknownFormat(f)) => assert_eq!(f, "tire-catalog"),
        other => panic!("expected UnknownFormat, got {other:?}"),
    }
}

#[test]
fn load_rejects_future_version() {
    let mut doc = saved_value(&make_store());
    doc["version"] = (FORMAT_VERSION + 1).into();
    assert!(matches!(
        load_store(&doc.to_string()),
        Err(LoadError::FutureVersion { file_version, supported_version })
            if file_version == FORMAT_VERSION + 1 && supported_version == FORMAT_VERSION
    ));
}

#[test]
fn load_rejects_old_version_without_migration() {
    let mut doc = saved_value(&make_store());
    doc["version"] = 0.into();
    assert!(matches!(
        load_store(&doc.to_string()),
        Err(LoadError::MigrationFailed { from: 0, .. })
    ));
}

#[test]
fn load_rejects_dangling_combination() {
    let mut doc = saved_value(&make_store());
    doc["tires"] = serde_json::Value::Array(vec![]);
    assert!(matches!(
        load_store(&doc.to_string()),
        Err(LoadError::DanglingReference { .. })
    ));
}

#[test]
fn load_rejects_duplicate_ids() {
    let mut doc = saved_value(&make_store());
    let tires = doc["tires"].as_array_mut().unwrap();
    let copy = tires[0].clone();
    tires.push(copy);
    assert!(matches!(load_store(&doc.to_string()), Err(LoadError::DuplicateId(_))));
}

#[test]
fn load_validates_specs() {
    let mut doc = saved_value(&make_store());
    doc["wheels"][0]["spec"]["offset"] = 120.0.into();
    assert!(matches!(load_store(&doc.to_string()), Err(LoadError::ParseError(_))));

    let mut doc = saved_value(&make_store());
    doc["tires"][0]["spec"]["width"] = 90.into();
    assert!(matches!(load_store(&doc.to_string()), Err(LoadError::ParseError(_))));
}

#[test]
fn load_rejects_malformed_json() {
    assert!(matches!(load_store("{not json"), Err(LoadError::ParseError(_))));
}
