mod common;

use std::collections::BTreeMap;
use std::path::Path;

use common::{FakeBridge, OfflineBridge, SAMPLE_ROWS, config_with_output, create_db};
use launcher_grid::Error;
use launcher_grid::pipeline::{self, Source};
use pretty_assertions::assert_eq;

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (entry.file_name().to_string_lossy().into_owned(), std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

#[test_log::test]
fn dumps_sample_database() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(&db, SAMPLE_ROWS);
    let config = config_with_output(root.path().join("out"));

    let outcome =
        pipeline::dump(&config, &Source::File(db.clone()), &OfflineBridge).unwrap();
    assert_eq!(outcome.database, db);
    assert_eq!(outcome.dimensions.screen_count, 2);
    assert_eq!(outcome.dimensions.hotseat_size, 4);
    assert_eq!(outcome.summary.rows, 6);
    assert_eq!(outcome.summary.icons, 1);
    assert_eq!(outcome.summary.screens, 2);

    let files: Vec<String> = snapshot(&config.output.dir).into_keys().collect();
    assert_eq!(files, vec!["icon_6.png".to_string(), "index.html".to_string()]);

    let doc = std::fs::read_to_string(config.output.index_path()).unwrap();
    assert!(doc.contains("Phone<br>(app)"));
    assert!(doc.contains("Games<br>(folder)"));
    assert!(doc.contains("<img src=\"icon_6.png\"><br>Notes<br>(shortcut)"));
    assert!(doc.contains("rowspan=\"2\" style=\"width:220px;height:220px\">widget 17</td>"));
    assert!(doc.contains("<td>4 (folder 4)</td>"));
    // Folder children only appear in the dump.
    assert_eq!(doc.matches("Chess").count(), 1);
    let screen0 = doc.find("Screen 0 (rank 0)").unwrap();
    let screen1 = doc.find("Screen 1 (rank 1)").unwrap();
    assert!(screen0 < screen1);
}

#[test_log::test]
fn rerun_is_byte_identical() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(&db, SAMPLE_ROWS);
    let config = config_with_output(root.path().join("out"));
    let source = Source::File(db);

    pipeline::dump(&config, &source, &OfflineBridge).unwrap();
    let first = snapshot(&config.output.dir);
    std::fs::write(config.output.dir.join("stale.txt"), b"left over").unwrap();
    pipeline::dump(&config, &source, &OfflineBridge).unwrap();
    let second = snapshot(&config.output.dir);

    assert_eq!(first, second);
}

#[test_log::test]
fn pulls_from_device_when_no_file_is_given() {
    let root = tempfile::tempdir().unwrap();
    let device_db = root.path().join("device.db");
    create_db(&device_db, SAMPLE_ROWS);
    let config = config_with_output(root.path().join("out"));

    let outcome =
        pipeline::dump(&config, &Source::Device, &FakeBridge::new(device_db)).unwrap();
    assert_eq!(outcome.database, config.output.pulled_db_path());
    assert_eq!(outcome.summary.rows, 6);
    assert!(config.output.index_path().is_file());
}

#[test_log::test]
fn bridge_failure_stops_before_reading() {
    let root = tempfile::tempdir().unwrap();
    let config = config_with_output(root.path().join("out"));

    let err = pipeline::dump(&config, &Source::Device, &OfflineBridge).unwrap_err();
    assert!(matches!(err, Error::ExternalProcess { .. }));
    assert!(!config.output.index_path().exists());
}

#[test_log::test]
fn empty_table_still_renders() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(&db, "");
    let config = config_with_output(root.path().join("out"));

    let outcome = pipeline::dump(&config, &Source::File(db), &OfflineBridge).unwrap();
    assert_eq!(outcome.dimensions.screen_count, 0);
    assert_eq!(outcome.summary.screens, 0);

    let doc = std::fs::read_to_string(config.output.index_path()).unwrap();
    assert!(doc.contains("<h2>Hotseat</h2>"));
    assert_eq!(doc.matches("class=\"empty\"").count(), 4);
}

#[test_log::test]
fn malformed_row_aborts_with_item_id() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(
        &db,
        "INSERT INTO favorites (_id, container, screen, cellX, cellY, itemType)
         VALUES (31, -100, 0, 1, 'top', 0);",
    );
    let config = config_with_output(root.path().join("out"));

    let err = pipeline::dump(&config, &Source::File(db), &OfflineBridge).unwrap_err();
    assert_eq!(err.to_string(), "malformed item 31: column `cellY` holds non-numeric text \"top\"");
    assert!(!config.output.index_path().exists());
}

#[test_log::test]
fn grid_override_raises_minimum_size() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(
        &db,
        "INSERT INTO favorites (_id, title, container, screen, cellX, cellY, itemType)
         VALUES (1, 'Calculator', -100, 0, 0, 0, 0);",
    );
    let mut config = config_with_output(root.path().join("out"));
    config.grid.min_size = "5x6".parse().unwrap();

    let outcome = pipeline::dump(&config, &Source::File(db), &OfflineBridge).unwrap();
    assert_eq!((outcome.dimensions.rows, outcome.dimensions.columns), (5, 6));

    let doc = std::fs::read_to_string(config.output.index_path()).unwrap();
    // 29 free desktop cells and 4 hotseat slots.
    assert_eq!(doc.matches("class=\"empty\"").count(), 33);
}

#[test_log::test]
fn oversized_cell_is_a_malformed_item() {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("launcher.db");
    create_db(
        &db,
        "INSERT INTO favorites (_id, title, container, screen, cellX, cellY, spanX, spanY, itemType)
         VALUES (1, 'x', -100, 0, 4294967295, 0, 2, 1, 0);",
    );
    let config = config_with_output(root.path().join("out"));

    let err = pipeline::dump(&config, &Source::File(db), &OfflineBridge).unwrap_err();
    assert_eq!(err.to_string(), "malformed item 1: column `cellX` is out of range (4294967295)");
    assert!(!config.output.index_path().exists());
}
