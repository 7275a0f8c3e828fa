//! False-positive filtering for detected edges, cells and tables.
//!
//! Geometry alone produces plenty of rectangular grids that aren't really
//! tables: chart axes, bar graphs, titles boxed in a rule, and invisible
//! construction rectangles a page designer used for layout. This module
//! runs a fixed pipeline of cheap, independently testable predicates to
//! weed those out before a [`Table`] is handed back to the caller.

use std::sync::Arc;

use log::trace;

use crate::geometry::lines::Edge;
use crate::geometry::overlap::{naive_overlap, sweep_overlap};
use crate::geometry::BBox;
use crate::objects::{Char, Color};
use crate::page::Page;
use crate::table::settings::FilterSettings;
use crate::table::Table;

pub fn filter_edges(edges: Vec<Edge>, page: &Page, settings: &FilterSettings) -> Vec<Edge> {
    let edges = remove_too_long_edges(edges, page, settings.too_long_edge_ratio);
    trace!("page {}: {} edges after too-long filter", page.page_number, edges.len());
    let edges = remove_terminal_edges(edges, page, settings.terminal_edge_margin_ratio);
    trace!("page {}: {} edges after terminal filter", page.page_number, edges.len());
    let edges = remove_colorless_edges(edges);
    trace!("page {}: {} edges after colorless filter", page.page_number, edges.len());
    edges
}

pub fn filter_cells(cells: Vec<BBox>, page: &Page, settings: &FilterSettings) -> Vec<BBox> {
    let cells = remove_too_small_cells(cells, page);
    trace!("page {}: {} cells after too-small filter", page.page_number, cells.len());
    let cells = remove_too_short_cells(cells, settings.too_short_cell_ratio);
    trace!("page {}: {} cells after too-short filter", page.page_number, cells.len());
    cells
}

pub fn filter_tables(tables: Vec<Table>, page: &Page, settings: &FilterSettings) -> Vec<Table> {
    let tables = remove_tables_without_chars(tables, page);
    let tables = remove_misdetected_two_cell_tables(tables, page);
    let tables = remove_table_with_lt_two_cells(tables);
    let tables = remove_table_with_unusual_shape(tables);
    let tables = remove_table_with_single_col_row(tables, page);
    let tables = remove_tables_with_many_too_small_cells(tables, page);
    trace!("page {}: {} tables after shape/char filters", page.page_number, tables.len());
    let tables = remove_charts(tables, page, settings.chart_min_fraction);
    let tables = remove_titles(tables, page);
    let tables = remove_bar_graph(tables, page);
    let tables = remove_complicated_tables(tables);
    let tables = remove_ungapped_two_cell_tables(tables, page, settings);
    trace!("page {}: {} tables after chart/title/graph filters", page.page_number, tables.len());
    tables
}

// ---------------------------------------------------------------- edges --

fn remove_too_long_edges(edges: Vec<Edge>, page: &Page, ratio: f64) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| {
            let bbox = e.bbox();
            bbox.width() < ratio * page.width && bbox.height() < ratio * page.height
        })
        .collect()
}

fn remove_terminal_edges(edges: Vec<Edge>, page: &Page, margin_ratio: f64) -> Vec<Edge> {
    let margin_x = page.width * margin_ratio;
    let margin_y = page.height * margin_ratio;
    edges
        .into_iter()
        .filter(|e| {
            !(e.x0 <= margin_x
                || e.x1 >= page.width - margin_x
                || e.top <= margin_y
                || e.bottom >= page.height - margin_y)
        })
        .collect()
}

/// Only edges carrying real color data (derived from actual rects/lines)
/// are eligible for this filter — text-inferred and explicit edges have
/// no stroke/fill to compare and would otherwise be dropped as
/// false-positive "invisible rectangles" just for lacking color info.
fn remove_colorless_edges(edges: Vec<Edge>) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| {
            !matches!(
                (&*e.stroking_color, &*e.non_stroking_color),
                (Some(a), Some(b)) if a == b
            )
        })
        .collect()
}

// ---------------------------------------------------------------- cells --

fn remove_too_small_cells(cells: Vec<BBox>, page: &Page) -> Vec<BBox> {
    let (min_w, min_h) = min_char_size(page);
    cells
        .into_iter()
        .filter(|c| !(c.width() < min_w && c.height() < min_h))
        .collect()
}

fn remove_too_short_cells(cells: Vec<BBox>, ratio: f64) -> Vec<BBox> {
    if cells.is_empty() {
        return cells;
    }
    let mean_height: f64 = cells.iter().map(|c| c.height()).sum::<f64>() / cells.len() as f64;
    cells
        .into_iter()
        .filter(|c| c.height() * ratio > mean_height)
        .collect()
}

/// Smallest char width/height on the page, in (width, height) order.
pub fn min_char_size(page: &Page) -> (f64, f64) {
    if page.chars.is_empty() {
        return (0.0, 0.0);
    }
    let min_w = page.chars.iter().map(|c| c.x1 - c.x0).fold(f64::MAX, f64::min);
    let min_h = page.chars.iter().map(|c| c.bottom - c.top).fold(f64::MAX, f64::min);
    (min_w, min_h)
}

/// Most common char width/height on the page, in (width, height) order.
/// Ties at maximum count are broken toward the smallest value.
pub fn mode_char_size(page: &Page) -> (f64, f64) {
    if page.chars.is_empty() {
        return (0.0, 0.0);
    }
    let widths: Vec<f64> = page.chars.iter().map(|c| c.x1 - c.x0).collect();
    let heights: Vec<f64> = page.chars.iter().map(|c| c.bottom - c.top).collect();
    (mode_with_min_tiebreak(&widths), mode_with_min_tiebreak(&heights))
}

fn mode_with_min_tiebreak(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut best_value = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let count = j - i;
        if count > best_count {
            best_count = count;
            best_value = sorted[i];
        }
        i = j;
    }
    best_value
}

// --------------------------------------------------------------- tables --

fn table_bboxes(tables: &[Table]) -> Vec<BBox> {
    tables.iter().map(|t| t.bbox).collect()
}

fn chars_bboxes(chars: &[Char]) -> Vec<BBox> {
    chars.iter().map(|c| c.bbox()).collect()
}

fn remove_tables_without_chars(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    if tables.is_empty() {
        return tables;
    }
    let table_boxes = table_bboxes(&tables);
    let char_boxes = chars_bboxes(&page.chars);
    let overlaps = sweep_overlap(&table_boxes, &char_boxes);
    let with_overlap: std::collections::HashSet<usize> = overlaps.into_iter().map(|(i, _)| i).collect();

    tables
        .into_iter()
        .enumerate()
        .filter(|(i, _)| with_overlap.contains(i))
        .map(|(_, t)| t)
        .collect()
}

/// Indices of a table's cells that overlap at least one character on the
/// page, found by cropping the page to the table's bbox first.
fn cell_idxs_overlapped_with_chars(table: &Table, page: &Page) -> Vec<usize> {
    let cropped = page.crop(table.bbox);
    let cell_boxes: Vec<BBox> = table.cells.iter().map(|c| c.bbox).collect();
    let char_boxes = chars_bboxes(&cropped.chars);
    let overlaps = naive_overlap(&cell_boxes, &char_boxes);
    let mut idxs: Vec<usize> = overlaps.into_iter().map(|(i, _)| i).collect();
    idxs.sort_unstable();
    idxs.dedup();
    idxs
}

fn remove_misdetected_two_cell_tables(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            if t.cells.len() != 2 {
                return true;
            }
            cell_idxs_overlapped_with_chars(t, page).len() != 1
        })
        .collect()
}

fn remove_table_with_lt_two_cells(tables: Vec<Table>) -> Vec<Table> {
    tables.into_iter().filter(|t| t.cells.len() > 1).collect()
}

fn remove_table_with_unusual_shape(tables: Vec<Table>) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            let mut widths: Vec<f64> = t.cells.iter().map(|c| c.bbox.width()).collect();
            let mut heights: Vec<f64> = t.cells.iter().map(|c| c.bbox.height()).collect();
            widths.sort_by(|a, b| a.partial_cmp(b).unwrap());
            heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
            widths.dedup_by(|a, b| a == b);
            heights.dedup_by(|a, b| a == b);
            !(widths.len() == t.cells.len() && heights.len() == t.cells.len())
        })
        .collect()
}

fn remove_table_with_single_col_row(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            if t.cells.is_empty() {
                return true;
            }
            if t.col_count == 1 {
                let width = t.cells[0].bbox.width();
                if width < page.width * 0.03 {
                    return false;
                }
            }
            if t.row_count == 1 {
                let height = t.cells[0].bbox.height();
                if height < page.height * 0.02 {
                    return false;
                }
            }
            true
        })
        .collect()
}

fn remove_tables_with_many_too_small_cells(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            let cropped = page.crop(t.bbox);
            let (mode_w, mode_h) = mode_char_size(&cropped);
            let n_cell = t.cells.len();
            let n_small = t
                .cells
                .iter()
                .filter(|c| c.bbox.width() < mode_w || c.bbox.height() < mode_h)
                .count();
            !(n_small * 2 >= n_cell.saturating_sub(n_small))
        })
        .collect()
}

fn remove_charts(tables: Vec<Table>, page: &Page, ratio: f64) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            if t.cells.is_empty() {
                return true;
            }
            let overlap_count = cell_idxs_overlapped_with_chars(t, page).len();
            (overlap_count as f64) >= (t.cells.len() as f64) / ratio
        })
        .collect()
}

fn remove_titles(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            let overlap_count = cell_idxs_overlapped_with_chars(t, page).len();
            let cropped = page.crop(t.bbox);
            let meaningful = cropped.chars.iter().filter(|c| c.text != " ").count();
            overlap_count < meaningful
        })
        .collect()
}

fn remove_bar_graph(tables: Vec<Table>, page: &Page) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            let n_col = t.col_count;
            let n_row = t.row_count;
            if (n_col == 1 || n_row == 1) && n_col + n_row > 4 {
                let n_cells = t.cells.len();
                let cropped = page.crop(t.bbox);
                let colors: Vec<Arc<Option<Color>>> =
                    cropped.rects.iter().map(|r| r.non_stroking_color.clone()).collect();
                let unique = unique_count(&colors);
                return unique < n_cells + 1;
            }
            true
        })
        .collect()
}

fn unique_count(colors: &[Arc<Option<Color>>]) -> usize {
    let mut seen: Vec<&Option<Color>> = Vec::new();
    for c in colors {
        if !seen.iter().any(|s| **s == **c) {
            seen.push(c);
        }
    }
    seen.len()
}

fn remove_complicated_tables(tables: Vec<Table>) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            let boxes: Vec<BBox> = t.cells.iter().map(|c| c.bbox).collect();
            let overlaps = naive_overlap(&boxes, &boxes);
            let pair_count = overlaps.into_iter().filter(|(i, j)| i < j).count();
            let n_cells = t.cells.len();
            !(pair_count > n_cells || t.row_count * t.col_count > 2 * n_cells)
        })
        .collect()
}

fn remove_ungapped_two_cell_tables(
    tables: Vec<Table>,
    _page: &Page,
    settings: &FilterSettings,
) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| {
            if t.cells.len() != 2 {
                return true;
            }
            let gap = cell_gap(&t.cells[0].bbox, &t.cells[1].bbox);
            gap <= settings.two_cell_gap_tolerance
        })
        .collect()
}

fn cell_gap(a: &BBox, b: &BBox) -> f64 {
    let x_gap = if a.x1 <= b.x0 {
        b.x0 - a.x1
    } else if b.x1 <= a.x0 {
        a.x0 - b.x1
    } else {
        0.0
    };
    let y_gap = if a.bottom <= b.top {
        b.top - a.bottom
    } else if b.bottom <= a.top {
        a.top - b.bottom
    } else {
        0.0
    };
    x_gap.max(y_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::lines::EdgeKind;
    use crate::objects::{Char, Color};
    use crate::table::TableCell;
    use std::sync::Arc;

    fn make_page(width: f64, height: f64) -> Page {
        Page::new(0, width, height, 0.0)
    }

    fn make_char(x0: f64, top: f64, x1: f64, bottom: f64, text: &str) -> Char {
        Char {
            text: text.to_string(),
            fontname: "Test".into(),
            size: 10.0,
            x0,
            x1,
            top,
            bottom,
            doctop: top,
            matrix: [1.0, 0.0, 0.0, 1.0, x0, bottom],
            upright: true,
            stroking_color: Arc::new(None),
            non_stroking_color: Arc::new(None),
            adv: x1 - x0,
        }
    }

    #[test]
    fn too_long_edge_is_dropped() {
        let page = make_page(100.0, 100.0);
        let edges = vec![Edge::horizontal(0.0, 99.0, 10.0, 1.0, EdgeKind::Line)];
        let filtered = remove_too_long_edges(edges, &page, 0.95);
        assert!(filtered.is_empty());
    }

    #[test]
    fn normal_length_edge_survives() {
        let page = make_page(100.0, 100.0);
        let edges = vec![Edge::horizontal(10.0, 60.0, 10.0, 1.0, EdgeKind::Line)];
        let filtered = remove_too_long_edges(edges, &page, 0.95);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn terminal_edge_is_dropped_on_x_axis() {
        let page = make_page(100.0, 500.0);
        // Within 3% of page width (not height) on the x-axis.
        let edges = vec![Edge::vertical(1.0, 10.0, 20.0, 1.0, EdgeKind::Line)];
        let filtered = remove_terminal_edges(edges, &page, 0.03);
        assert!(filtered.is_empty());
    }

    #[test]
    fn interior_edge_survives_terminal_filter() {
        let page = make_page(100.0, 500.0);
        let edges = vec![Edge::vertical(50.0, 10.0, 20.0, 1.0, EdgeKind::Line)];
        let filtered = remove_terminal_edges(edges, &page, 0.03);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn colorless_edge_with_matching_colors_is_dropped() {
        let edge = Edge::horizontal(0.0, 10.0, 5.0, 1.0, EdgeKind::RectEdge)
            .with_colors(Arc::new(Some(Color::Gray(0.5))), Arc::new(Some(Color::Gray(0.5))));
        assert!(remove_colorless_edges(vec![edge]).is_empty());
    }

    #[test]
    fn text_inferred_edge_keeps_despite_no_color() {
        let edge = Edge::horizontal(0.0, 10.0, 5.0, 1.0, EdgeKind::TextInferred);
        assert_eq!(remove_colorless_edges(vec![edge]).len(), 1);
    }

    #[test]
    fn table_without_char_overlap_is_dropped() {
        let mut page = make_page(200.0, 200.0);
        page.chars.push(make_char(0.0, 0.0, 5.0, 5.0, "x"));
        let table = Table {
            bbox: BBox::new(100.0, 100.0, 150.0, 150.0),
            cells: vec![TableCell {
                row: 0,
                col: 0,
                row_span: 1,
                col_span: 1,
                text: None,
                bbox: BBox::new(100.0, 100.0, 150.0, 150.0),
            }],
            row_count: 1,
            col_count: 1,
        };
        assert!(remove_tables_without_chars(vec![table], &page).is_empty());
    }

    #[test]
    fn table_with_char_overlap_is_kept() {
        let mut page = make_page(200.0, 200.0);
        page.chars.push(make_char(105.0, 105.0, 110.0, 115.0, "x"));
        let table = Table {
            bbox: BBox::new(100.0, 100.0, 150.0, 150.0),
            cells: vec![TableCell {
                row: 0,
                col: 0,
                row_span: 1,
                col_span: 1,
                text: None,
                bbox: BBox::new(100.0, 100.0, 150.0, 150.0),
            }],
            row_count: 1,
            col_count: 1,
        };
        let kept = remove_tables_without_chars(vec![table], &page);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn single_cell_table_is_dropped() {
        let table = Table {
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            cells: vec![TableCell {
                row: 0,
                col: 0,
                row_span: 1,
                col_span: 1,
                text: None,
                bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            }],
            row_count: 1,
            col_count: 1,
        };
        assert!(remove_table_with_lt_two_cells(vec![table]).is_empty());
    }
}
