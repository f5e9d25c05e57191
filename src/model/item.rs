use std::fmt;

use num_enum::{FromPrimitive, IntoPrimitive};

pub const CONTAINER_DESKTOP: i64 = -100;
pub const CONTAINER_HOTSEAT: i64 = -101;

/// Largest cell coordinate, span or hotseat slot a loaded item may carry.
pub const MAX_CELL_INDEX: u32 = 1000;

/// `favorites._id`. Unique within one load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(id: i64) -> ItemId { ItemId(id) }

    pub fn get(&self) -> i64 { self.0 }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Desktop,
    Hotseat,
    /// Lives inside the folder item with this id.
    Folder(ItemId),
    /// Negative container ids this tool does not know how to place.
    Other(i64),
}

impl Container {
    pub fn code(self) -> i64 {
        match self {
            Container::Desktop => CONTAINER_DESKTOP,
            Container::Hotseat => CONTAINER_HOTSEAT,
            Container::Folder(id) => id.get(),
            Container::Other(code) => code,
        }
    }
}

impl From<i64> for Container {
    fn from(code: i64) -> Self {
        match code {
            CONTAINER_DESKTOP => Container::Desktop,
            CONTAINER_HOTSEAT => Container::Hotseat,
            id if id >= 0 => Container::Folder(ItemId::new(id)),
            other => Container::Other(other),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Desktop => f.write_str("desktop"),
            Container::Hotseat => f.write_str("hotseat"),
            Container::Folder(id) => write!(f, "folder {id}"),
            Container::Other(code) => write!(f, "container {code}"),
        }
    }
}

/// `favorites.itemType`. Codes from 3 upwards only show up in old databases.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(i64)]
pub enum ItemKind {
    Application = 0,
    Shortcut = 1,
    Folder = 2,
    LiveFolder = 3,
    Widget = 4,
    Clock = 1000,
    Search = 1001,
    PhotoFrame = 1002,
    #[num_enum(catch_all)]
    Unknown(i64),
}

impl ItemKind {
    pub fn code(self) -> i64 { self.into() }

    pub fn label(self) -> Option<&'static str> {
        Some(match self {
            ItemKind::Application => "app",
            ItemKind::Shortcut => "shortcut",
            ItemKind::Folder => "folder",
            ItemKind::LiveFolder => "live folder",
            ItemKind::Widget => "widget",
            ItemKind::Clock => "clock",
            ItemKind::Search => "search",
            ItemKind::PhotoFrame => "photo frame",
            ItemKind::Unknown(_) => return None,
        })
    }

    pub fn shows_icon(self) -> bool {
        matches!(self, ItemKind::Application | ItemKind::Shortcut)
    }
}

/// `favorites.iconType`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
#[repr(i64)]
pub enum IconType {
    Resource = 0,
    Bitmap = 1,
    #[num_enum(catch_all)]
    Unknown(i64),
}

impl IconType {
    pub fn label(self) -> Option<&'static str> {
        match self {
            IconType::Resource => Some("resource"),
            IconType::Bitmap => Some("bitmap"),
            IconType::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: u32,
    pub y: u32,
}

impl CellPos {
    pub fn new(x: u32, y: u32) -> Self { CellPos { x, y } }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height in cells. Never zero once an item is loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub w: u32,
    pub h: u32,
}

impl Span {
    pub const UNIT: Span = Span { w: 1, h: 1 };

    pub fn new(w: u32, h: u32) -> Self { Span { w: w.max(1), h: h.max(1) } }
}

impl Default for Span {
    fn default() -> Self { Span::UNIT }
}

/// One decoded `favorites` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: Option<String>,
    pub intent: Option<String>,
    pub container: Container,
    /// Home screen id for desktop items, slot for hotseat items.
    pub screen: i64,
    pub cell: CellPos,
    pub span: Span,
    pub kind: ItemKind,
    pub widget_id: i64,
    pub icon: Option<Vec<u8>>,
    pub icon_type: Option<IconType>,
}

impl Item {
    pub fn title_or_empty(&self) -> &str { self.title.as_deref().unwrap_or("") }

    pub fn is_desktop(&self) -> bool { self.container == Container::Desktop }

    pub fn is_hotseat(&self) -> bool { self.container == Container::Hotseat }

    pub fn has_icon(&self) -> bool { self.icon.as_ref().is_some_and(|icon| !icon.is_empty()) }

    /// Exclusive lower-right corner of the span rectangle.
    pub fn extent(&self) -> (u32, u32) {
        (self.cell.x.saturating_add(self.span.w), self.cell.y.saturating_add(self.span.h))
    }

    #[cfg(test)]
    pub(crate) fn test_app(id: i64, container: Container, screen: i64, x: u32, y: u32) -> Item {
        Item {
            id: ItemId::new(id),
            title: Some(format!("item {id}")),
            intent: None,
            container,
            screen,
            cell: CellPos::new(x, y),
            span: Span::UNIT,
            kind: ItemKind::Application,
            widget_id: -1,
            icon: None,
            icon_type: None,
        }
    }
}

/// One `workspaceScreens` row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScreenOrder {
    pub screen: i64,
    pub rank: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_codes_round_trip_through_display() {
        assert_eq!(Container::from(-100), Container::Desktop);
        assert_eq!(Container::from(-101), Container::Hotseat);
        assert_eq!(Container::from(12), Container::Folder(ItemId::new(12)));
        assert_eq!(Container::from(-102), Container::Other(-102));
        assert_eq!(Container::from(12).to_string(), "folder 12");
        assert_eq!(Container::Folder(ItemId::new(3)).code(), 3);
    }

    #[test]
    fn legacy_and_unknown_kind_codes() {
        assert_eq!(ItemKind::from(0), ItemKind::Application);
        assert_eq!(ItemKind::from(1001), ItemKind::Search);
        assert_eq!(ItemKind::from(1002).label(), Some("photo frame"));
        assert_eq!(ItemKind::from(6), ItemKind::Unknown(6));
        assert_eq!(ItemKind::from(6).label(), None);
        assert_eq!(ItemKind::from(6).code(), 6);
        assert_eq!(ItemKind::Clock.code(), 1000);
    }

    #[test]
    fn span_is_never_below_one() {
        assert_eq!(Span::new(0, 0), Span::UNIT);
        assert_eq!(Span::new(3, 0), Span { w: 3, h: 1 });
        assert_eq!(Span::default(), Span::UNIT);
    }
}
