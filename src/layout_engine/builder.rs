use tracing::{debug, warn};

use super::Layout;
use super::dimensions::{Dimensions, desktop_screens};
use crate::common::collections::HashMap;
use crate::error::{Error, Result};
use crate::model::{CellPos, Grid, GridCell, Hotseat, Item, Overlap};

pub fn build_layout(dims: &Dimensions, items: &[Item]) -> Result<Layout> {
    let screens = desktop_screens(items);
    let grid_index: HashMap<i64, usize> =
        screens.iter().enumerate().map(|(i, &screen)| (screen, i)).collect();
    let mut grids: Vec<Grid> =
        screens.iter().map(|&screen| Grid::new(screen, dims.grid_size())).collect();
    let mut hotseat = Hotseat::new(dims.hotseat_size);

    for item in items {
        if item.is_desktop() {
            let grid = grid_index.get(&item.screen).and_then(|&i| grids.get_mut(i)).ok_or_else(
                || Error::Placement {
                    item: item.id,
                    what: format!("screen {}", item.screen),
                    bounds: format!("{}-screen", screens.len()),
                },
            )?;
            place_on_grid(grid, item)?;
        } else if item.is_hotseat() {
            place_on_hotseat(&mut hotseat, item)?;
        } else {
            debug!(id = %item.id, container = %item.container, "not placed");
        }
    }

    Ok(Layout { dimensions: *dims, grids, hotseat })
}

fn place_on_grid(grid: &mut Grid, item: &Item) -> Result<()> {
    let out_of_bounds = |pos: CellPos, grid: &Grid| Error::Placement {
        item: item.id,
        what: format!("cell {pos} on screen {}", grid.screen()),
        bounds: grid.size().to_string(),
    };
    let anchor = item.cell;
    let (right, bottom) = item.extent();

    for y in anchor.y..bottom {
        for x in anchor.x..right {
            let pos = CellPos::new(x, y);
            if pos == anchor {
                continue;
            }
            let marker = GridCell::Spanned(item.id);
            let Some(cell) = grid.get_mut(pos) else {
                return Err(out_of_bounds(pos, grid));
            };
            let existing = *cell;
            match existing {
                GridCell::Empty => *cell = marker,
                // Another item's anchor keeps its cell.
                GridCell::Anchor(_) => overlap(grid, pos, existing, marker),
                GridCell::Spanned(_) => {
                    *cell = marker;
                    overlap(grid, pos, existing, marker);
                }
            }
        }
    }

    let marker = GridCell::Anchor(item.id);
    let Some(cell) = grid.get_mut(anchor) else {
        return Err(out_of_bounds(anchor, grid));
    };
    let existing = *cell;
    *cell = marker;
    if existing != GridCell::Empty {
        overlap(grid, anchor, existing, marker);
    }
    Ok(())
}

fn overlap(grid: &mut Grid, cell: CellPos, existing: GridCell, incoming: GridCell) {
    warn!(
        screen = grid.screen(),
        %cell,
        ?existing,
        ?incoming,
        "items overlap"
    );
    grid.record_overlap(Overlap { cell, existing, incoming });
}

fn place_on_hotseat(hotseat: &mut Hotseat, item: &Item) -> Result<()> {
    let len = hotseat.len();
    let slot = usize::try_from(item.screen)
        .ok()
        .and_then(|slot| hotseat.slot_mut(slot))
        .ok_or_else(|| Error::Placement {
            item: item.id,
            what: format!("hotseat slot {}", item.screen),
            bounds: format!("{len}-slot hotseat"),
        })?;
    if let Some(previous) = slot.replace(item.id) {
        debug!(slot = item.screen, %previous, replacement = %item.id, "hotseat slot reused");
    }
    Ok(())
}
