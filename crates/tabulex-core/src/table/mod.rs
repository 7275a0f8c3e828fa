pub mod detect;
pub mod extract;
pub mod filter;
pub mod settings;

use serde::Serialize;

use crate::geometry::BBox;
use crate::objects::Char;
use crate::page::Page;

pub use settings::TableSettings;

/// A detected table on a page.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub bbox: BBox,
    pub cells: Vec<TableCell>,
    pub row_count: usize,
    pub col_count: usize,
}

impl Table {
    /// Extract table data as a 2D grid of optional strings. `None` marks a
    /// position with no text content at all (distinct from a cell whose
    /// text happens to be the empty string); merged cells repeat their
    /// value across every spanned position.
    pub fn to_grid(&self) -> Vec<Vec<Option<String>>> {
        let mut grid: Vec<Vec<Option<String>>> = vec![vec![None; self.col_count]; self.row_count];

        for cell in &self.cells {
            if cell.row < self.row_count && cell.col < self.col_count {
                for r in cell.row..(cell.row + cell.row_span).min(self.row_count) {
                    for c in cell.col..(cell.col + cell.col_span).min(self.col_count) {
                        grid[r][c] = cell.text.clone();
                    }
                }
            }
        }

        grid
    }

    /// Cells grouped into rows, ordered top to bottom then left to right.
    /// A row is a `Vec` one entry per column of the table, `None` where the
    /// table has no cell at that row/column (e.g. inside a merged span).
    pub fn rows(&self) -> Vec<Vec<Option<&TableCell>>> {
        let mut by_row: std::collections::BTreeMap<usize, Vec<&TableCell>> =
            std::collections::BTreeMap::new();
        for cell in &self.cells {
            by_row.entry(cell.row).or_default().push(cell);
        }

        by_row
            .into_values()
            .map(|mut row_cells| {
                row_cells.sort_by_key(|c| c.col);
                (0..self.col_count)
                    .map(|col| row_cells.iter().find(|c| c.col == col).copied())
                    .collect()
            })
            .collect()
    }

    /// Re-extract this table's text from `page`, on demand, using fresh
    /// tolerances rather than the ones the detection pass used to build
    /// `self.cells[..].text`.
    pub fn extract(&self, page: &Page, x_tolerance: f64, y_tolerance: f64) -> Vec<Vec<Option<String>>> {
        fn char_in_bbox(char: &Char, bbox: &BBox) -> bool {
            let v_mid = (char.top + char.bottom) / 2.0;
            let h_mid = (char.x0 + char.x1) / 2.0;
            h_mid >= bbox.x0 && h_mid < bbox.x1 && v_mid >= bbox.top && v_mid < bbox.bottom
        }

        let options = crate::page::TextExtractOptions {
            x_tolerance,
            y_tolerance,
            ..Default::default()
        };

        self.rows()
            .iter()
            .map(|row| {
                let row_bbox = row.iter().flatten().fold(None::<BBox>, |acc, c| match acc {
                    Some(b) => Some(b.union(&c.bbox)),
                    None => Some(c.bbox),
                });
                let row_chars: Vec<&Char> = match row_bbox {
                    Some(bbox) => page.chars.iter().filter(|c| char_in_bbox(c, &bbox)).collect(),
                    None => Vec::new(),
                };

                row.iter()
                    .map(|cell| {
                        let cell = (*cell)?;
                        let cell_chars: Vec<Char> = row_chars
                            .iter()
                            .copied()
                            .filter(|c| char_in_bbox(c, &cell.bbox))
                            .cloned()
                            .collect();
                        if cell_chars.is_empty() {
                            None
                        } else {
                            let extracted = crate::text::extract::extract_text(
                                &cell_chars,
                                page.width,
                                page.height,
                                &options,
                            );
                            Some(extracted.trim().to_string())
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// A single cell in a detected table. `text` is `None` when no characters
/// overlap the cell at all; `Some(String::new())` would mean characters
/// were found but produced no visible content, which in practice doesn't
/// happen — the distinction exists so callers can tell "empty" from
/// "never extracted".
#[derive(Debug, Clone, Serialize)]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub text: Option<String>,
    pub bbox: BBox,
}
