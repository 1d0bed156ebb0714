use super::*;
use std::io::Write;

#[test]
fn empty_object_gives_defaults() {
    let config = ClsemConfig::from_json("{}").unwrap();
    assert_eq!(config, ClsemConfig::default());
    assert!(config.loader.create_missing_packages);
    assert!(config.loader.skip_synthetic_members);
    assert!(!config.stop_on_error);
}

#[test]
fn partial_loader_section_keeps_other_defaults() {
    let config = ClsemConfig::from_json(
        r#"{ "loader": { "skip_synthetic_members": false }, "stop_on_error": true }"#,
    )
    .unwrap();
    assert!(!config.loader.skip_synthetic_members);
    assert!(config.loader.create_missing_packages);
    assert!(config.loader.synthetic_classes_are_artifacts);
    assert!(config.stop_on_error);
}

#[test]
fn unknown_top_level_keys_are_rejected() {
    let err = ClsemConfig::from_json(r#"{ "stop_on_eror": true }"#).unwrap_err();
    assert!(format!("{err:#}").contains("stop_on_eror"));
}

#[test]
fn load_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "loader": {{ "create_missing_packages": false }} }}"#).unwrap();
    let config = ClsemConfig::load(file.path()).unwrap();
    assert!(!config.loader.create_missing_packages);
}

#[test]
fn load_reports_the_path_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("clsem.json");
    let err = ClsemConfig::load(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("clsem.json"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = ClsemConfig::load(&bad).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("bad.json"));
    assert!(message.contains("invalid clsem configuration"));
}
