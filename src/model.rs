pub mod grid;
pub mod item;

pub use grid::{Grid, GridCell, Hotseat, Overlap};
pub use item::{CellPos, Container, IconType, Item, ItemId, ItemKind, ScreenOrder, Span};
