use rusqlite::params;
use tracing::{debug, info};

use super::db::{FAVORITES, LauncherDb, WORKSPACE_SCREENS};
use crate::common::config::GridSize;
use crate::error::Result;
use crate::model::item::{CONTAINER_DESKTOP, ItemKind};

/// Intent given to every generated item. Any launchable activity works.
pub const FILL_INTENT: &str = "#Intent;action=android.intent.action.MAIN;\
category=android.intent.category.LAUNCHER;launchFlags=0x10200000;\
component=com.android.settings/.Settings;end";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FillPlan {
    pub screens: u32,
    pub grid: GridSize,
}

impl FillPlan {
    pub fn item_count(&self) -> usize { self.screens as usize * self.grid.cells() }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FillSummary {
    pub items: usize,
    pub screens_rewritten: bool,
}

/// Replaces every favorite with a 1x1 application on each cell of `plan`.
///
/// When the database keeps a `workspaceScreens` table it is rewritten so
/// that screen ids `0..screens` exist in rank order. All writes share one
/// transaction.
pub fn fill_screens(db: &mut LauncherDb, plan: &FillPlan) -> Result<FillSummary> {
    db.check_favorites()?;
    let rewrite_screens = db.has_table(WORKSPACE_SCREENS)?;

    let tx = db.connection_mut().transaction()?;
    let removed = tx.execute(&format!("DELETE FROM {FAVORITES}"), [])?;
    info!(removed, "cleared favorites");

    let mut items: usize = 0;
    debug!(planned = plan.item_count(), "inserting items");
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {FAVORITES} \
             (_id, title, intent, container, screen, cellX, cellY, spanX, spanY, itemType, appWidgetId) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, 1, ?8, -1)"
        ))?;
        for screen in 0..plan.screens {
            for y in 0..plan.grid.rows {
                for x in 0..plan.grid.columns {
                    let id = items as i64 + 1;
                    insert.execute(params![
                        id,
                        format!("Item {id}"),
                        FILL_INTENT,
                        CONTAINER_DESKTOP,
                        screen,
                        x,
                        y,
                        ItemKind::Application.code(),
                    ])?;
                    items += 1;
                }
            }
        }
    }

    if rewrite_screens {
        tx.execute(&format!("DELETE FROM {WORKSPACE_SCREENS}"), [])?;
        let mut insert =
            tx.prepare(&format!("INSERT INTO {WORKSPACE_SCREENS} (_id, screenRank) VALUES (?1, ?2)"))?;
        for screen in 0..plan.screens {
            insert.execute(params![screen, screen])?;
        }
    }
    tx.commit()?;

    info!(items, screens = plan.screens, grid = %plan.grid, "filled favorites");
    Ok(FillSummary { items, screens_rewritten: rewrite_screens })
}
