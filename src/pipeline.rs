//! The two runs the binary offers: `dump` and `fill`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span};

use crate::common::config::Config;
use crate::error::{Error, Result};
use crate::layout_engine::{Dimensions, build_layout, compute_dimensions};
use crate::sys::bridge::DeviceBridge;
use crate::sys::db::LauncherDb;
use crate::sys::fill::{FillPlan, FillSummary, fill_screens};
use crate::ui::{RenderSummary, write_report};

/// Where the database comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    /// Pulled through the device bridge into the output directory.
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOutcome {
    pub database: PathBuf,
    pub dimensions: Dimensions,
    pub summary: RenderSummary,
}

pub fn dump(config: &Config, source: &Source, bridge: &dyn DeviceBridge) -> Result<DumpOutcome> {
    let _span = info_span!("dump").entered();
    let out_dir = &config.output.dir;
    if let Source::File(path) = source {
        reject_inside(path, out_dir)?;
    }

    recreate_dir(out_dir)?;
    let database = obtain(config, source, bridge)?;

    let data = LauncherDb::open_read_only(&database)?.load()?;
    let dimensions = compute_dimensions(&config.grid, &data.items);
    info!(
        screens = dimensions.screen_count,
        grid = %dimensions.grid_size(),
        hotseat = dimensions.hotseat_size,
        "computed dimensions"
    );
    let layout = build_layout(&dimensions, &data.items)?;
    let summary = write_report(config, &data, &layout)?;

    Ok(DumpOutcome { database, dimensions, summary })
}

/// Refills the database and, when it came from the device, pushes it back.
pub fn fill(
    config: &Config,
    source: &Source,
    screens: u32,
    bridge: &dyn DeviceBridge,
) -> Result<FillSummary> {
    let _span = info_span!("fill").entered();
    if *source == Source::Device {
        std::fs::create_dir_all(&config.output.dir)
            .map_err(|e| Error::io(&config.output.dir, e))?;
    }
    let database = obtain(config, source, bridge)?;

    let plan = FillPlan { screens, grid: config.grid.min_size };
    let summary = {
        let mut db = LauncherDb::open(&database)?;
        fill_screens(&mut db, &plan)?
    };

    if *source == Source::Device {
        bridge.push(&database, &config.device.database)?;
    }
    Ok(summary)
}

fn obtain(config: &Config, source: &Source, bridge: &dyn DeviceBridge) -> Result<PathBuf> {
    match source {
        Source::File(path) => Ok(path.clone()),
        Source::Device => {
            let local = config.output.pulled_db_path();
            bridge.pull(&config.device.database, &local)?;
            Ok(local)
        }
    }
}

fn recreate_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(dir, e)),
    }
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// The output directory is wiped first, so the input must not live in it.
fn reject_inside(path: &Path, out_dir: &Path) -> Result<()> {
    let (Ok(path), Ok(out_dir)) = (path.canonicalize(), out_dir.canonicalize()) else {
        return Ok(());
    };
    if path.starts_with(&out_dir) {
        return Err(Error::Config {
            path,
            reason: format!(
                "the database is inside the output directory {}, which is wiped on every run",
                out_dir.display()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recreate_dir_discards_previous_contents() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        std::fs::create_dir_all(out.join("nested")).unwrap();
        std::fs::write(out.join("icon_1.png"), b"stale").unwrap();

        recreate_dir(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn database_inside_output_dir_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let db = root.path().join("launcher.db");
        std::fs::write(&db, b"").unwrap();

        assert!(matches!(reject_inside(&db, root.path()), Err(Error::Config { .. })));
        assert!(reject_inside(&db, &root.path().join("missing")).is_ok());
    }
}
