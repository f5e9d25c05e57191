#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use launcher_grid::common::config::{Config, OutputConfig};
use launcher_grid::sys::bridge::DeviceBridge;
use launcher_grid::{Error, Result};
use rusqlite::Connection;

pub const SCHEMA: &str = "
    CREATE TABLE favorites (
        _id INTEGER PRIMARY KEY,
        title TEXT,
        intent TEXT,
        container INTEGER,
        screen INTEGER,
        cellX INTEGER,
        cellY INTEGER,
        spanX INTEGER,
        spanY INTEGER,
        itemType INTEGER,
        appWidgetId INTEGER NOT NULL DEFAULT -1,
        isShortcut INTEGER,
        iconType INTEGER,
        iconPackage TEXT,
        iconResource TEXT,
        icon BLOB,
        uri TEXT,
        displayMode INTEGER
    );
    CREATE TABLE workspaceScreens (
        _id INTEGER PRIMARY KEY,
        screenRank INTEGER
    );";

/// A home screen with a dock, a 2x2 widget, a folder with one child and a
/// shortcut carrying an icon, spread over two screens.
pub const SAMPLE_ROWS: &str = "
    INSERT INTO workspaceScreens VALUES (0, 0), (1, 1);
    INSERT INTO favorites (_id, title, intent, container, screen, cellX, cellY, spanX, spanY, itemType, appWidgetId, iconType, icon) VALUES
        (1, 'Phone', '#Intent;component=com.android.dialer/.Main;end', -101, 0, 0, 0, 1, 1, 0, -1, NULL, NULL),
        (2, 'Browser', '#Intent;component=org.chromium/.Main;end', -101, 2, 2, 0, 1, 1, 0, -1, NULL, NULL),
        (3, NULL, NULL, -100, 1, 0, 0, 2, 2, 4, 17, NULL, NULL),
        (4, 'Games', NULL, -100, 0, 1, 3, 1, 1, 2, -1, NULL, NULL),
        (5, 'Chess', '#Intent;component=org.chess/.Main;end', 4, 0, 0, 0, 1, 1, 0, -1, NULL, NULL),
        (6, 'Notes', '#Intent;component=org.notes/.Main;end', -100, 0, 3, 0, 1, 1, 1, -1, 1, x'89504E470D0A1A0A');";

pub fn create_db(path: &Path, rows: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(rows).unwrap();
}

pub fn config_with_output(dir: PathBuf) -> Config {
    Config {
        output: OutputConfig { dir },
        ..Config::default()
    }
}

/// Serves a local file as the device database and records pushes.
pub struct FakeBridge {
    pub device_db: PathBuf,
    pub pushes: RefCell<Vec<(PathBuf, String)>>,
}

impl FakeBridge {
    pub fn new(device_db: PathBuf) -> Self {
        FakeBridge { device_db, pushes: RefCell::new(Vec::new()) }
    }
}

impl DeviceBridge for FakeBridge {
    fn pull(&self, _remote: &str, local: &Path) -> Result<()> {
        std::fs::copy(&self.device_db, local).map_err(|e| Error::Io {
            path: local.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    fn push(&self, local: &Path, remote: &str) -> Result<()> {
        self.pushes.borrow_mut().push((local.to_path_buf(), remote.to_string()));
        Ok(())
    }
}

/// A device that is not connected.
pub struct OfflineBridge;

impl DeviceBridge for OfflineBridge {
    fn pull(&self, remote: &str, _local: &Path) -> Result<()> {
        Err(Error::ExternalProcess {
            command: format!("adb pull {remote}"),
            reason: "exited with status 1: no devices/emulators found".to_string(),
        })
    }

    fn push(&self, _local: &Path, remote: &str) -> Result<()> {
        Err(Error::ExternalProcess {
            command: format!("adb push {remote}"),
            reason: "exited with status 1".to_string(),
        })
    }
}
