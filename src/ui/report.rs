//! HTML report of a launcher database.
//!
//! Sections, in order: the verbatim `favorites` dump, the screen order table
//! (when the database has one), detected overlaps, the hotseat, and one grid
//! per desktop screen. Icon blobs are written next to the document as
//! `icon_<id>.png` while the dump is rendered.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use tracing::{debug, info};

use super::html::{self, escape};
use crate::common::collections::HashSet;
use crate::common::config::{Config, INDEX_FILE_NAME};
use crate::error::{Error, Result};
use crate::layout_engine::Layout;
use crate::model::{CellPos, Container, Grid, GridCell, IconType, Item, ItemId, ItemKind, Span};
use crate::sys::db::{
    COL_CONTAINER, COL_ICON, COL_ICON_TYPE, COL_INTENT, COL_ITEM_TYPE, LauncherData, Table,
};

pub fn icon_file_name(id: ItemId) -> String { format!("icon_{id}.png") }

/// How a dump column is rendered, picked from its name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Short flag; the full intent sits in the `title` attribute.
    Intent,
    /// Extracted to an icon file and shown inline.
    Icon,
    ItemType,
    IconType,
    Container,
    Plain,
}

impl ColumnKind {
    pub fn for_column(name: &str) -> ColumnKind {
        match name {
            COL_INTENT => ColumnKind::Intent,
            COL_ICON => ColumnKind::Icon,
            COL_ITEM_TYPE => ColumnKind::ItemType,
            COL_ICON_TYPE => ColumnKind::IconType,
            COL_CONTAINER => ColumnKind::Container,
            _ => ColumnKind::Plain,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rows: usize,
    pub icons: usize,
    pub screens: usize,
}

pub struct Renderer<'a> {
    config: &'a Config,
    data: &'a LauncherData,
    layout: &'a Layout,
    out_dir: &'a Path,
}

impl<'a> Renderer<'a> {
    pub fn new(
        config: &'a Config,
        data: &'a LauncherData,
        layout: &'a Layout,
        out_dir: &'a Path,
    ) -> Self {
        Renderer { config, data, layout, out_dir }
    }

    fn index_path(&self) -> PathBuf { self.out_dir.join(INDEX_FILE_NAME) }

    /// Streams the document into `out`. A failure part way leaves whatever
    /// was already written.
    pub fn render(&self, out: &mut impl Write) -> Result<RenderSummary> {
        let mut summary = RenderSummary::default();
        let mut emit = |chunk: &str| -> Result<()> {
            out.write_all(chunk.as_bytes()).map_err(|e| Error::io(self.index_path(), e))
        };

        emit(&html::document_start("Launcher database"))?;

        emit(&html::heading(&self.data.favorites.name))?;
        emit("<table class=\"favorites\">\n")?;
        emit(&header_row(&self.data.favorites))?;
        for (row, item) in self.data.favorites.rows.iter().zip(&self.data.items) {
            let line = self.favorites_row(row, item, &mut summary)?;
            emit(&line)?;
            summary.rows += 1;
        }
        emit("</table>\n")?;

        if let Some(screens) = &self.data.screens {
            emit(&html::heading(&screens.name))?;
            emit("<table class=\"screens\">\n")?;
            emit(&header_row(screens))?;
            for row in &screens.rows {
                let mut line = String::from("<tr>");
                for value in row {
                    line.push_str(&plain_cell(value));
                }
                line.push_str("</tr>\n");
                emit(&line)?;
            }
            emit("</table>\n")?;
        }

        let overlaps = self.overlaps();
        if !overlaps.is_empty() {
            emit(&html::heading("Overlaps"))?;
            emit(&overlaps)?;
        }

        emit(&html::heading("Hotseat"))?;
        emit(&self.hotseat()?)?;

        for grid in self.display_order() {
            let title = match self.data.rank_of(grid.screen()) {
                Some(rank) => format!("Screen {} (rank {rank})", grid.screen()),
                None => format!("Screen {}", grid.screen()),
            };
            emit(&html::heading(&title))?;
            emit(&self.grid(grid)?)?;
            summary.screens += 1;
        }

        emit(html::DOCUMENT_END)?;
        Ok(summary)
    }

    fn favorites_row(
        &self,
        row: &[Value],
        item: &Item,
        summary: &mut RenderSummary,
    ) -> Result<String> {
        let mut line = String::from("<tr>");
        for (name, value) in self.data.favorites.columns.iter().zip(row) {
            let cell = match ColumnKind::for_column(name) {
                ColumnKind::Intent => intent_cell(value),
                ColumnKind::Icon => match value {
                    Value::Blob(bytes) if !bytes.is_empty() => {
                        self.write_icon(item.id, bytes)?;
                        summary.icons += 1;
                        format!("<td><img src=\"{}\"></td>", icon_file_name(item.id))
                    }
                    other => plain_cell(other),
                },
                ColumnKind::ItemType => coded_cell(value, |code| {
                    ItemKind::from(code).label().unwrap_or("unknown").to_string()
                }),
                ColumnKind::IconType => coded_cell(value, |code| {
                    IconType::from(code).label().unwrap_or("unknown").to_string()
                }),
                ColumnKind::Container => {
                    coded_cell(value, |code| Container::from(code).to_string())
                }
                ColumnKind::Plain => plain_cell(value),
            };
            line.push_str(&cell);
        }
        line.push_str("</tr>\n");
        Ok(line)
    }

    fn write_icon(&self, id: ItemId, bytes: &[u8]) -> Result<()> {
        let path = self.out_dir.join(icon_file_name(id));
        debug!(%id, bytes = bytes.len(), path = %path.display(), "writing icon");
        std::fs::write(&path, bytes).map_err(|e| Error::io(path, e))
    }

    fn overlaps(&self) -> String {
        let mut out = String::new();
        for grid in &self.layout.grids {
            for overlap in grid.overlaps() {
                let describe = |cell: GridCell| match cell {
                    GridCell::Anchor(id) => format!("item {id}"),
                    GridCell::Spanned(id) => format!("span of item {id}"),
                    GridCell::Empty => "nothing".to_string(),
                };
                let _ = writeln!(
                    out,
                    "<li>screen {} cell {}: {} collides with {}</li>",
                    grid.screen(),
                    overlap.cell,
                    describe(overlap.incoming),
                    describe(overlap.existing),
                );
            }
        }
        if out.is_empty() {
            return out;
        }
        format!("<ul class=\"overlap\">\n{out}</ul>\n")
    }

    fn hotseat(&self) -> Result<String> {
        let mut out = String::from("<table class=\"grid hotseat\">\n<tr>");
        for slot in self.layout.hotseat.slots() {
            match slot {
                Some(id) => out.push_str(&self.anchor_cell(*id, 1, 1)?),
                None => out.push_str(&self.empty_cell()),
            }
        }
        out.push_str("</tr>\n</table>\n");
        Ok(out)
    }

    /// Ranked screens first by rank, then unranked ones as they appeared.
    fn display_order(&self) -> Vec<&'a Grid> {
        let mut grids: Vec<&Grid> = self.layout.grids.iter().collect();
        grids.sort_by_key(|grid| match self.data.rank_of(grid.screen()) {
            Some(rank) => (false, rank),
            None => (true, 0),
        });
        grids
    }

    fn grid(&self, grid: &Grid) -> Result<String> {
        let covered = self.covered_cells(grid)?;
        let mut out = String::from("<table class=\"grid\">\n");
        for y in 0..grid.size().rows {
            out.push_str("<tr>");
            for (x, cell) in (0u32..).zip(grid.row(y)) {
                let pos = CellPos::new(x, y);
                match *cell {
                    GridCell::Empty => out.push_str(&self.empty_cell()),
                    GridCell::Spanned(_) if covered.contains(&pos) => {}
                    GridCell::Spanned(owner) => out.push_str(&self.orphan_cell(owner)),
                    GridCell::Anchor(id) => {
                        let span = self.item(id)?.span;
                        let td = match owned_span(grid, id, pos, span) {
                            Some(_) => self.anchor_cell(id, span.w, span.h)?,
                            None => self.anchor_cell(id, 1, 1)?,
                        };
                        out.push_str(&td);
                    }
                }
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
        Ok(out)
    }

    /// Cells hidden under some anchor's colspan/rowspan. An anchor only spans
    /// when every cell of its rectangle still belongs to it.
    fn covered_cells(&self, grid: &Grid) -> Result<HashSet<CellPos>> {
        let mut covered = HashSet::default();
        for y in 0..grid.size().rows {
            for (x, cell) in (0u32..).zip(grid.row(y)) {
                let GridCell::Anchor(id) = *cell else { continue };
                let span = self.item(id)?.span;
                if let Some(cells) = owned_span(grid, id, CellPos::new(x, y), span) {
                    covered.extend(cells);
                }
            }
        }
        Ok(covered)
    }

    fn item(&self, id: ItemId) -> Result<&'a Item> {
        self.data.item(id).ok_or_else(|| Error::Render {
            id,
            column: "_id".to_string(),
            reason: "is placed but was never loaded".to_string(),
        })
    }

    fn empty_cell(&self) -> String {
        let px = self.config.grid.cell_size_px;
        format!("<td class=\"empty\" style=\"width:{px}px;height:{px}px\"></td>")
    }

    /// Span cell whose anchor lost a collision; shown instead of dropped.
    fn orphan_cell(&self, owner: ItemId) -> String {
        let px = self.config.grid.cell_size_px;
        format!(
            "<td class=\"overlap\" style=\"width:{px}px;height:{px}px\">span of item {owner}</td>"
        )
    }

    fn anchor_cell(&self, id: ItemId, w: u32, h: u32) -> Result<String> {
        let item = self.item(id)?;
        let px = u64::from(self.config.grid.cell_size_px);
        let mut attrs = String::new();
        if w > 1 {
            let _ = write!(attrs, " colspan=\"{w}\"");
        }
        if h > 1 {
            let _ = write!(attrs, " rowspan=\"{h}\"");
        }
        Ok(format!(
            "<td{attrs} style=\"width:{}px;height:{}px\">{}</td>",
            px * u64::from(w),
            px * u64::from(h),
            item_body(item)
        ))
    }
}

/// Writes `index.html` (and icon files) into the configured output directory.
pub fn write_report(config: &Config, data: &LauncherData, layout: &Layout) -> Result<RenderSummary> {
    let out_dir = config.output.dir.as_path();
    let path = config.output.index_path();
    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut out = BufWriter::new(file);

    let summary = Renderer::new(config, data, layout, out_dir).render(&mut out)?;
    out.flush().map_err(|e| Error::io(&path, e))?;
    info!(
        path = %path.display(),
        rows = summary.rows,
        icons = summary.icons,
        screens = summary.screens,
        "wrote report"
    );
    Ok(summary)
}

/// The non-anchor cells of `id`'s rectangle at `anchor`, if all of them are
/// in bounds and still marked as spanned by `id`.
fn owned_span(grid: &Grid, id: ItemId, anchor: CellPos, span: Span) -> Option<Vec<CellPos>> {
    let mut cells = Vec::new();
    for dy in 0..span.h {
        for dx in 0..span.w {
            let pos = CellPos::new(anchor.x.checked_add(dx)?, anchor.y.checked_add(dy)?);
            if pos == anchor {
                continue;
            }
            match grid.get(pos)? {
                GridCell::Spanned(owner) if owner == id => cells.push(pos),
                _ => return None,
            }
        }
    }
    Some(cells)
}

fn header_row(table: &Table) -> String {
    let mut line = String::from("<tr>");
    for column in &table.columns {
        let _ = write!(line, "<th>{}</th>", escape(column));
    }
    line.push_str("</tr>\n");
    line
}

fn plain_cell(value: &Value) -> String {
    match value {
        Value::Null => "<td class=\"null\">null</td>".to_string(),
        Value::Integer(v) => format!("<td>{v}</td>"),
        Value::Real(v) => format!("<td>{v}</td>"),
        Value::Text(s) => format!("<td>{}</td>", escape(s)),
        Value::Blob(b) => format!("<td>[{} bytes]</td>", b.len()),
    }
}

fn intent_cell(value: &Value) -> String {
    match value {
        Value::Text(s) if !s.is_empty() => {
            format!("<td><span class=\"intent\" title=\"{}\">intent</span></td>", escape(s))
        }
        other => plain_cell(other),
    }
}

fn coded_cell(value: &Value, label: impl Fn(i64) -> String) -> String {
    match value {
        Value::Integer(code) => format!("<td>{code} ({})</td>", escape(&label(*code))),
        other => plain_cell(other),
    }
}

fn item_body(item: &Item) -> String {
    let title = escape(item.title_or_empty());
    match item.kind {
        ItemKind::Application | ItemKind::Shortcut => {
            let mut body = String::new();
            if item.has_icon() {
                let _ = write!(body, "<img src=\"{}\"><br>", icon_file_name(item.id));
            }
            let label = item.kind.label().unwrap_or_default();
            let _ = write!(body, "{title}<br>({label})");
            body
        }
        ItemKind::Folder => format!("{title}<br>(folder)"),
        ItemKind::Widget => format!("widget {}", item.widget_id),
        ItemKind::Unknown(code) => format!("unknown type {code}"),
        legacy => legacy.label().unwrap_or_default().to_string(),
    }
}
