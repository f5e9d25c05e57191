use crate::common::config::GridSize;
use crate::model::item::{CellPos, ItemId};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum GridCell {
    #[default]
    Empty,
    /// Covered by the span of the owning item, but not its anchor.
    Spanned(ItemId),
    Anchor(ItemId),
}

impl GridCell {
    pub fn owner(&self) -> Option<ItemId> {
        match *self {
            GridCell::Empty => None,
            GridCell::Spanned(id) | GridCell::Anchor(id) => Some(id),
        }
    }

    pub fn is_anchor(&self) -> bool { matches!(self, GridCell::Anchor(_)) }
}

/// Two items claiming the same cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub cell: CellPos,
    pub existing: GridCell,
    pub incoming: GridCell,
}

/// Occupancy of one home screen, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    screen: i64,
    size: GridSize,
    cells: Vec<GridCell>,
    overlaps: Vec<Overlap>,
}

impl Grid {
    pub fn new(screen: i64, size: GridSize) -> Self {
        Grid {
            screen,
            size,
            cells: vec![GridCell::Empty; size.cells()],
            overlaps: Vec::new(),
        }
    }

    pub fn screen(&self) -> i64 { self.screen }

    pub fn size(&self) -> GridSize { self.size }

    pub fn overlaps(&self) -> &[Overlap] { &self.overlaps }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x < self.size.columns && pos.y < self.size.rows
    }

    fn offset(&self, pos: CellPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.size.columns as usize + pos.x as usize)
    }

    pub fn get(&self, pos: CellPos) -> Option<GridCell> {
        self.offset(pos).map(|i| self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, pos: CellPos) -> Option<&mut GridCell> {
        let i = self.offset(pos)?;
        Some(&mut self.cells[i])
    }

    pub(crate) fn record_overlap(&mut self, overlap: Overlap) { self.overlaps.push(overlap); }

    /// Cells of row `y`, left to right.
    pub fn row(&self, y: u32) -> &[GridCell] {
        let columns = self.size.columns as usize;
        let start = y as usize * columns;
        &self.cells[start..start + columns]
    }

    pub fn cells_owned_by(&self, id: ItemId) -> usize {
        self.cells.iter().filter(|c| c.owner() == Some(id)).count()
    }

    pub fn anchor_of(&self, id: ItemId) -> Option<CellPos> {
        let columns = self.size.columns as usize;
        self.cells
            .iter()
            .position(|c| *c == GridCell::Anchor(id))
            .map(|i| CellPos::new((i % columns) as u32, (i / columns) as u32))
    }
}

/// The dock row, one optional item per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotseat {
    slots: Vec<Option<ItemId>>,
}

impl Hotseat {
    pub fn new(size: usize) -> Self { Hotseat { slots: vec![None; size] } }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn get(&self, slot: usize) -> Option<ItemId> { self.slots.get(slot).copied().flatten() }

    pub fn slots(&self) -> &[Option<ItemId>] { &self.slots }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Option<ItemId>> {
        self.slots.get_mut(slot)
    }
}
