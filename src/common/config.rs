use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

static GRID_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[xX](\d+)$").expect("grid size regex"));

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const INDEX_FILE_NAME: &str = "index.html";
pub const PULLED_DB_FILE_NAME: &str = "launcher.db";

/// A `rows × columns` grid extent, written `RxC` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSize {
    pub rows: u32,
    pub columns: u32,
}

impl GridSize {
    pub const fn new(rows: u32, columns: u32) -> Self { GridSize { rows, columns } }

    pub fn cells(&self) -> usize { self.rows as usize * self.columns as usize }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGridSizeError(String);

impl fmt::Display for ParseGridSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a grid size of the form RxC (e.g. 4x4)", self.0)
    }
}

impl std::error::Error for ParseGridSizeError {}

impl FromStr for GridSize {
    type Err = ParseGridSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGridSizeError(s.to_string());
        let caps = GRID_SIZE_RE.captures(s).ok_or_else(err)?;
        let rows: u32 = caps[1].parse().map_err(|_| err())?;
        let columns: u32 = caps[2].parse().map_err(|_| err())?;
        if rows == 0 || columns == 0 {
            return Err(err());
        }
        Ok(GridSize { rows, columns })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Smallest grid drawn for a screen, even when items use fewer cells.
    pub min_size: GridSize,
    pub min_hotseat: u32,
    /// Pixel edge of one rendered cell.
    pub cell_size_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            min_size: GridSize::new(4, 4),
            min_hotseat: 4,
            cell_size_px: 110,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self { OutputConfig { dir: PathBuf::from("db_files") } }
}

impl OutputConfig {
    pub fn index_path(&self) -> PathBuf { self.dir.join(INDEX_FILE_NAME) }

    pub fn pulled_db_path(&self) -> PathBuf { self.dir.join(PULLED_DB_FILE_NAME) }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Program used to copy the database off and onto the device.
    pub bridge: String,
    pub database: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            bridge: "adb".to_string(),
            database: "/data/data/com.android.launcher3/databases/launcher.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridConfig,
    pub output: OutputConfig,
    pub device: DeviceConfig,
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub grid: Option<GridSize>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("launcher-grid").join(CONFIG_FILE_NAME))
    }

    pub fn parse(path: &Path, text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::parse(path, &text)?;
        config.validate(path)?;
        Ok(config)
    }

    /// An explicit path must exist; the default location is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading default config");
                Self::load(&path)
            }
            _ => Ok(Config::default()),
        }
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Config {
        if let Some(grid) = overrides.grid {
            self.grid.min_size = grid;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.dir = dir.clone();
        }
        self
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| Error::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.grid.min_size.rows == 0 || self.grid.min_size.columns == 0 {
            return Err(invalid("grid.min_size must be at least 1x1"));
        }
        if self.grid.cell_size_px == 0 {
            return Err(invalid("grid.cell_size_px must be positive"));
        }
        if self.device.bridge.trim().is_empty() {
            return Err(invalid("device.bridge must name a program"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_by_columns() {
        assert_eq!("5x4".parse::<GridSize>(), Ok(GridSize::new(5, 4)));
        assert_eq!("12X3".parse::<GridSize>(), Ok(GridSize::new(12, 3)));
    }

    #[test]
    fn rejects_malformed_grid_sizes() {
        for bad in ["", "4", "4x", "x4", "0x4", "4x0", "4x4x4", "-1x4", "a.db"] {
            assert!(bad.parse::<GridSize>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse(Path::new("c.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid.min_size, GridSize::new(4, 4));
        assert_eq!(config.output.index_path(), PathBuf::from("db_files/index.html"));
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let text = r#"
            [grid]
            min_size = { rows = 5, columns = 6 }

            [device]
            bridge = "/opt/platform-tools/adb"
        "#;
        let config = Config::parse(Path::new("c.toml"), text).unwrap();
        assert_eq!(config.grid.min_size, GridSize::new(5, 6));
        assert_eq!(config.grid.min_hotseat, 4);
        assert_eq!(config.device.bridge, "/opt/platform-tools/adb");
        assert_eq!(config.device.database, DeviceConfig::default().database);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse(Path::new("c.toml"), "[grid]\ncolumns = 4\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn overrides_replace_grid_and_output() {
        let config = Config::default().with_overrides(&Overrides {
            grid: Some(GridSize::new(6, 5)),
            output_dir: Some(PathBuf::from("/tmp/out")),
        });
        assert_eq!(config.grid.min_size, GridSize::new(6, 5));
        assert_eq!(config.output.dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.grid.min_hotseat, 4);
    }
}
