//! Read access to a launcher database.
//!
//! The loader keeps two views of `favorites`: the raw [`Table`] exactly as
//! SQLite returns it (for the verbatim dump) and the typed [`Item`]s decoded
//! from it once, up front. Anything the typed view cannot accept fails the
//! load instead of surfacing halfway through rendering.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::common::collections::HashSet;
use crate::error::{Error, Result};
use crate::model::item::MAX_CELL_INDEX;
use crate::model::{CellPos, Container, IconType, Item, ItemId, ItemKind, ScreenOrder, Span};

pub const FAVORITES: &str = "favorites";
pub const WORKSPACE_SCREENS: &str = "workspaceScreens";

pub const COL_ID: &str = "_id";
pub const COL_TITLE: &str = "title";
pub const COL_INTENT: &str = "intent";
pub const COL_CONTAINER: &str = "container";
pub const COL_SCREEN: &str = "screen";
pub const COL_CELL_X: &str = "cellX";
pub const COL_CELL_Y: &str = "cellY";
pub const COL_SPAN_X: &str = "spanX";
pub const COL_SPAN_Y: &str = "spanY";
pub const COL_ITEM_TYPE: &str = "itemType";
pub const COL_APP_WIDGET_ID: &str = "appWidgetId";
pub const COL_ICON: &str = "icon";
pub const COL_ICON_TYPE: &str = "iconType";
pub const COL_SCREEN_RANK: &str = "screenRank";

/// A table as stored: column names and rows of raw values, both in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> { self.columns.iter().position(|c| c == name) }

    fn require(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            Error::Schema(format!("table `{}` has no `{name}` column", self.name))
        })
    }
}

/// Everything one dump needs from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherData {
    pub favorites: Table,
    pub items: Vec<Item>,
    pub screens: Option<Table>,
    pub screen_order: Option<Vec<ScreenOrder>>,
}

impl LauncherData {
    pub fn item(&self, id: ItemId) -> Option<&Item> { self.items.iter().find(|item| item.id == id) }

    pub fn rank_of(&self, screen: i64) -> Option<i64> {
        self.screen_order.as_ref()?.iter().find(|o| o.screen == screen).map(|o| o.rank)
    }
}

pub struct LauncherDb {
    conn: Connection,
}

impl LauncherDb {
    pub fn open_read_only(path: &Path) -> Result<Self> {
        ensure_file(path)?;
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self> {
        ensure_file(path)?;
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn from_connection(conn: Connection) -> Self { Self { conn } }

    pub fn connection_mut(&mut self) -> &mut Connection { &mut self.conn }

    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Reads `name` verbatim, or `None` if the table does not exist.
    pub fn read_table(&self, name: &str) -> Result<Option<Table>> { self.select(name, "") }

    fn select(&self, name: &str, suffix: &str) -> Result<Option<Table>> {
        if !self.has_table(name)? {
            return Ok(None);
        }
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM \"{name}\"{suffix}"))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let values: Vec<Value> =
                (0..width).map(|i| row.get(i)).collect::<rusqlite::Result<_>>()?;
            rows.push(values);
        }
        debug!(table = name, rows = rows.len(), columns = width, "read table");
        Ok(Some(Table { name: name.to_string(), columns, rows }))
    }

    /// Fails with a schema error unless `favorites` has every column the
    /// loader needs.
    pub fn check_favorites(&self) -> Result<()> {
        let header = self
            .select(FAVORITES, " LIMIT 0")?
            .ok_or_else(|| Error::Schema(format!("table `{FAVORITES}` not found")))?;
        FavoritesColumns::resolve(&header).map(|_| ())
    }

    pub fn load(&self) -> Result<LauncherData> {
        let favorites = self
            .read_table(FAVORITES)?
            .ok_or_else(|| Error::Schema(format!("table `{FAVORITES}` not found")))?;
        let items = decode_items(&favorites)?;

        let screens = self.read_table(WORKSPACE_SCREENS)?;
        let screen_order = screens.as_ref().map(decode_screen_order).transpose()?;

        info!(
            items = items.len(),
            ordered_screens = screen_order.as_ref().map_or(0, Vec::len),
            "loaded launcher database"
        );
        Ok(LauncherData { favorites, items, screens, screen_order })
    }
}

// SQLite would otherwise create an empty database at a mistyped path.
fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "database file not found");
    Err(Error::io(path, err))
}

struct FavoritesColumns {
    id: usize,
    title: usize,
    intent: usize,
    container: usize,
    screen: usize,
    cell_x: usize,
    cell_y: usize,
    span_x: usize,
    span_y: usize,
    item_type: usize,
    app_widget_id: usize,
    icon: Option<usize>,
    icon_type: Option<usize>,
}

impl FavoritesColumns {
    fn resolve(table: &Table) -> Result<Self> {
        Ok(Self {
            id: table.require(COL_ID)?,
            title: table.require(COL_TITLE)?,
            intent: table.require(COL_INTENT)?,
            container: table.require(COL_CONTAINER)?,
            screen: table.require(COL_SCREEN)?,
            cell_x: table.require(COL_CELL_X)?,
            cell_y: table.require(COL_CELL_Y)?,
            span_x: table.require(COL_SPAN_X)?,
            span_y: table.require(COL_SPAN_Y)?,
            item_type: table.require(COL_ITEM_TYPE)?,
            app_widget_id: table.require(COL_APP_WIDGET_ID)?,
            icon: table.column(COL_ICON),
            icon_type: table.column(COL_ICON_TYPE),
        })
    }
}

/// Typed access to one row, with errors naming the item and column.
struct RowReader<'a> {
    id: ItemId,
    table: &'a Table,
    row: &'a [Value],
}

impl RowReader<'_> {
    fn malformed(&self, idx: usize, reason: impl Into<String>) -> Error {
        Error::Render {
            id: self.id,
            column: self.table.columns[idx].clone(),
            reason: reason.into(),
        }
    }

    fn int(&self, idx: usize) -> Result<Option<i64>> {
        match &self.row[idx] {
            Value::Null => Ok(None),
            Value::Integer(v) => Ok(Some(*v)),
            Value::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.malformed(idx, format!("holds non-numeric text {s:?}"))),
            Value::Real(v) => Err(self.malformed(idx, format!("holds a real number {v}"))),
            Value::Blob(_) => Err(self.malformed(idx, "holds a blob")),
        }
    }

    fn required_int(&self, idx: usize) -> Result<i64> {
        self.int(idx)?.ok_or_else(|| self.malformed(idx, "is null"))
    }

    fn cell_coord(&self, idx: usize, required: bool) -> Result<u32> {
        match self.int(idx)? {
            None if required => Err(self.malformed(idx, "is null")),
            None => Ok(0),
            Some(v) if v < 0 && !required => Ok(0),
            Some(v) => self.bounded(idx, v),
        }
    }

    fn bounded(&self, idx: usize, value: i64) -> Result<u32> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_CELL_INDEX)
            .ok_or_else(|| self.malformed(idx, format!("is out of range ({value})")))
    }

    fn span(&self, idx: usize) -> Result<u32> {
        match self.int(idx)? {
            None => Ok(1),
            Some(v) if v < 1 => {
                let column = &self.table.columns[idx];
                warn!(id = %self.id, column = %column, value = v, "span below 1, using 1");
                Ok(1)
            }
            Some(v) => self.bounded(idx, v),
        }
    }

    fn text(&self, idx: usize) -> Option<String> {
        match &self.row[idx] {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Integer(v) => Some(v.to_string()),
            Value::Real(v) => Some(v.to_string()),
            Value::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }

    fn blob(&self, idx: usize) -> Result<Option<Vec<u8>>> {
        match &self.row[idx] {
            Value::Null => Ok(None),
            Value::Blob(b) => Ok(Some(b.clone())),
            _ => Err(self.malformed(idx, "is not a blob")),
        }
    }
}

pub fn decode_items(table: &Table) -> Result<Vec<Item>> {
    let cols = FavoritesColumns::resolve(table)?;
    let mut seen = HashSet::default();
    let mut items = Vec::with_capacity(table.rows.len());

    for (n, row) in table.rows.iter().enumerate() {
        let id = match &row[cols.id] {
            Value::Integer(id) if *id >= 0 => ItemId::new(*id),
            other => {
                return Err(Error::Schema(format!(
                    "row {n} of `{}` has no usable `{COL_ID}` ({other:?})",
                    table.name
                )));
            }
        };
        if !seen.insert(id) {
            return Err(Error::Schema(format!("duplicate `{COL_ID}` {id} in `{}`", table.name)));
        }

        let reader = RowReader { id, table, row };
        let container = Container::from(reader.required_int(cols.container)?);
        let placed = container == Container::Desktop;
        let screen = match container {
            Container::Desktop | Container::Hotseat => reader.required_int(cols.screen)?,
            _ => reader.int(cols.screen)?.unwrap_or(-1),
        };
        if container == Container::Hotseat {
            if screen < 0 {
                let reason = format!("is a negative hotseat slot ({screen})");
                return Err(reader.malformed(cols.screen, reason));
            }
            reader.bounded(cols.screen, screen)?;
        }

        let item = Item {
            id,
            title: reader.text(cols.title),
            intent: reader.text(cols.intent),
            container,
            screen,
            cell: CellPos::new(
                reader.cell_coord(cols.cell_x, placed)?,
                reader.cell_coord(cols.cell_y, placed)?,
            ),
            span: Span::new(reader.span(cols.span_x)?, reader.span(cols.span_y)?),
            kind: ItemKind::from(reader.required_int(cols.item_type)?),
            widget_id: reader.int(cols.app_widget_id)?.unwrap_or(-1),
            icon: cols.icon.map(|idx| reader.blob(idx)).transpose()?.flatten(),
            icon_type: cols
                .icon_type
                .map(|idx| reader.int(idx))
                .transpose()?
                .flatten()
                .map(IconType::from),
        };
        debug!(id = %item.id, container = %item.container, kind = ?item.kind, "decoded item");
        items.push(item);
    }
    Ok(items)
}

pub fn decode_screen_order(table: &Table) -> Result<Vec<ScreenOrder>> {
    let id = table.require(COL_ID)?;
    let rank = table.require(COL_SCREEN_RANK)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(n, row)| match (&row[id], &row[rank]) {
            (Value::Integer(screen), Value::Integer(rank)) => {
                Ok(ScreenOrder { screen: *screen, rank: *rank })
            }
            (screen, rank) => Err(Error::Schema(format!(
                "row {n} of `{}` is not an integer pair ({screen:?}, {rank:?})",
                table.name
            ))),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
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
            iconType INTEGER,
            icon BLOB
        );";

    pub fn memory_db(extra: &str) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(extra).unwrap();
        conn
    }
}
