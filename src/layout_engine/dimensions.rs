use crate::common::collections::HashSet;
use crate::common::config::{GridConfig, GridSize};
use crate::model::Item;

/// Extents shared by every screen grid plus the hotseat length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub screen_count: usize,
    pub columns: u32,
    pub rows: u32,
    pub hotseat_size: usize,
}

impl Dimensions {
    pub fn grid_size(&self) -> GridSize { GridSize::new(self.rows, self.columns) }
}

/// Distinct desktop screen ids in the order they first appear.
pub fn desktop_screens(items: &[Item]) -> Vec<i64> {
    let mut seen = HashSet::default();
    items
        .iter()
        .filter(|item| item.is_desktop())
        .filter_map(|item| seen.insert(item.screen).then_some(item.screen))
        .collect()
}

/// Rows come from the Y extent; older dumps used the X extent for both.
pub fn compute_dimensions(config: &GridConfig, items: &[Item]) -> Dimensions {
    let (columns, rows) = items
        .iter()
        .filter(|item| item.is_desktop())
        .map(Item::extent)
        .fold((config.min_size.columns, config.min_size.rows), |(c, r), (x, y)| {
            (c.max(x), r.max(y))
        });

    let hotseat_size = items
        .iter()
        .filter(|item| item.is_hotseat())
        .filter_map(|item| usize::try_from(item.screen).ok())
        .map(|slot| slot + 1)
        .fold(config.min_hotseat as usize, usize::max);

    Dimensions {
        screen_count: desktop_screens(items).len(),
        columns,
        rows,
        hotseat_size,
    }
}
