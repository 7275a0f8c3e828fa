use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use ordered_float::OrderedFloat;

use crate::error::Result;
use crate::geometry::bbox::BBox;
use crate::geometry::clustering::cluster_objects;
use crate::geometry::lines::{self, Edge, EdgeKind, Intersection};
use crate::objects::{Char, Word};
use crate::page::Page;
use crate::table::filter;
use crate::table::settings::{ExplicitLine, Strategy, TableSettings};
use crate::table::{Table, TableCell};

/// Detect tables on a page.
///
/// Pipeline:
/// 1. Collect edges per the configured vertical/horizontal strategies.
/// 2. Drop edges shorter than `edge_min_length`.
/// 3. Run the false-positive edge filters.
/// 4. Snap and join collinear edges.
/// 5. Find intersections between horizontal and vertical edges.
/// 6. Build the smallest rectangular cell anchored at each vertex.
/// 7. Run the false-positive cell filters.
/// 8. Group cells sharing a corner into tables.
/// 9. Run the false-positive table filters.
pub fn detect_tables(page: &Page, settings: &TableSettings) -> Result<Vec<Table>> {
    settings.validate()?;

    debug!(
        "page {}: detecting tables (v={:?}, h={:?})",
        page.page_number, settings.vertical_strategy, settings.horizontal_strategy
    );

    let mut edges = collect_edges(page, settings);
    edges.retain(|e| e.length() >= settings.edge_min_length);
    trace!("page {}: {} edges after min-length filter", page.page_number, edges.len());

    let edges = filter::filter_edges(edges, page, &settings.filters);
    trace!("page {}: {} edges after false-positive filter", page.page_number, edges.len());

    if edges.is_empty() {
        return Ok(vec![]);
    }

    let edges = lines::merge_edges(edges, settings.snap_x(), settings.snap_y(), settings.join_x(), settings.join_y());
    trace!("page {}: {} edges after snap+merge", page.page_number, edges.len());

    let intersections =
        lines::find_intersections(&edges, settings.intersection_x(), settings.intersection_y());
    debug!("page {}: {} intersections", page.page_number, intersections.len());

    if intersections.len() < 4 {
        return Ok(vec![]);
    }

    let cell_boxes = intersections_to_cells(&intersections);
    trace!("page {}: {} candidate cells", page.page_number, cell_boxes.len());

    let cell_boxes = filter::filter_cells(cell_boxes, page, &settings.filters);

    if cell_boxes.is_empty() {
        return Ok(vec![]);
    }

    let groups = cells_to_tables(cell_boxes);
    debug!("page {}: {} table groups", page.page_number, groups.len());

    let tables: Vec<Table> = groups
        .into_iter()
        .map(|cells| build_table(cells, page, settings))
        .collect();

    let tables = filter::filter_tables(tables, page, &settings.filters);
    debug!("page {}: {} tables after false-positive filter", page.page_number, tables.len());

    Ok(tables)
}

/// Collect edges from the page based on the configured strategies.
fn collect_edges(page: &Page, settings: &TableSettings) -> Vec<Edge> {
    let mut edges = Vec::new();

    match &settings.vertical_strategy {
        Strategy::Lines => {
            for line in &page.lines {
                if line.is_vertical() {
                    edges.push(
                        Edge::vertical(line.x0, line.top, line.bottom, line.width, EdgeKind::Line)
                            .with_colors(line.stroking_color.clone(), line.non_stroking_color.clone()),
                    );
                }
            }
            for rect in &page.rects {
                for side in rect.to_edges() {
                    if side.is_vertical() {
                        edges.push(
                            Edge::vertical(side.x0, side.top, side.bottom, side.width, EdgeKind::RectEdge)
                                .with_colors(side.stroking_color.clone(), side.non_stroking_color.clone()),
                        );
                    }
                }
            }
        }
        Strategy::LinesStrict => {
            // Only real line objects count — rect-derived edges are excluded
            // even though `Lines` would pick them up.
            for line in &page.lines {
                if line.is_vertical() {
                    edges.push(
                        Edge::vertical(line.x0, line.top, line.bottom, line.width, EdgeKind::Line)
                            .with_colors(line.stroking_color.clone(), line.non_stroking_color.clone()),
                    );
                }
            }
        }
        Strategy::Text => {
            let words = page.words_with_options(settings.text_x(), settings.text_y(), settings.keep_blank_chars);
            edges.extend(words_to_edges_v(&words, settings.min_words_vertical));
        }
        Strategy::Explicit => {
            for desc in &settings.explicit_vertical_lines {
                match desc {
                    ExplicitLine::Coordinate(x) => {
                        edges.push(Edge::vertical(*x, 0.0, page.height, 1.0, EdgeKind::Explicit));
                    }
                    ExplicitLine::Edge(bbox) => {
                        if bbox.width() == 0.0 {
                            edges.push(Edge::vertical(
                                bbox.x0,
                                bbox.top,
                                bbox.bottom,
                                1.0,
                                EdgeKind::Explicit,
                            ));
                        }
                    }
                }
            }
        }
    }

    match &settings.horizontal_strategy {
        Strategy::Lines => {
            for line in &page.lines {
                if line.is_horizontal() {
                    edges.push(
                        Edge::horizontal(line.x0, line.x1, line.top, line.width, EdgeKind::Line)
                            .with_colors(line.stroking_color.clone(), line.non_stroking_color.clone()),
                    );
                }
            }
            for rect in &page.rects {
                for side in rect.to_edges() {
                    if side.is_horizontal() {
                        edges.push(
                            Edge::horizontal(side.x0, side.x1, side.top, side.width, EdgeKind::RectEdge)
                                .with_colors(side.stroking_color.clone(), side.non_stroking_color.clone()),
                        );
                    }
                }
            }
        }
        Strategy::LinesStrict => {
            for line in &page.lines {
                if line.is_horizontal() {
                    edges.push(
                        Edge::horizontal(line.x0, line.x1, line.top, line.width, EdgeKind::Line)
                            .with_colors(line.stroking_color.clone(), line.non_stroking_color.clone()),
                    );
                }
            }
        }
        Strategy::Text => {
            let words = page.words_with_options(settings.text_x(), settings.text_y(), settings.keep_blank_chars);
            edges.extend(words_to_edges_h(&words, settings.min_words_horizontal));
        }
        Strategy::Explicit => {
            for desc in &settings.explicit_horizontal_lines {
                match desc {
                    ExplicitLine::Coordinate(y) => {
                        edges.push(Edge::horizontal(0.0, page.width, *y, 1.0, EdgeKind::Explicit));
                    }
                    ExplicitLine::Edge(bbox) => {
                        if bbox.height() == 0.0 {
                            edges.push(Edge::horizontal(
                                bbox.x0,
                                bbox.x1,
                                bbox.top,
                                1.0,
                                EdgeKind::Explicit,
                            ));
                        }
                    }
                }
            }
        }
    }

    edges
}

/// Imaginary horizontal lines connecting the tops/bottoms of at least
/// `threshold` words whose tops line up.
fn words_to_edges_h(words: &[Word], threshold: usize) -> Vec<Edge> {
    if words.is_empty() {
        return vec![];
    }

    let clusters = cluster_objects(words, |w| w.top, 1.0);

    let mut rects: Vec<BBox> = Vec::new();
    for cluster in &clusters {
        if cluster.len() < threshold {
            continue;
        }
        let x0 = cluster.iter().map(|&i| words[i].x0).fold(f64::MAX, f64::min);
        let x1 = cluster.iter().map(|&i| words[i].x1).fold(f64::MIN, f64::max);
        let top = cluster.iter().map(|&i| words[i].top).fold(f64::MAX, f64::min);
        let bottom = cluster.iter().map(|&i| words[i].bottom).fold(f64::MIN, f64::max);
        rects.push(BBox::new(x0, top, x1, bottom));
    }

    if rects.is_empty() {
        return vec![];
    }

    let min_x0 = rects.iter().map(|r| r.x0).fold(f64::MAX, f64::min);
    let max_x1 = rects.iter().map(|r| r.x1).fold(f64::MIN, f64::max);

    let mut edges = Vec::with_capacity(rects.len() * 2);
    for r in &rects {
        // Top of the row, plus its bottom — the extra bottom edge is
        // usually redundant with the next row's top, but it's what catches
        // the last row of a table that has no line beneath it.
        edges.push(Edge::horizontal(min_x0, max_x1, r.top, 0.5, EdgeKind::TextInferred));
        edges.push(Edge::horizontal(min_x0, max_x1, r.bottom, 0.5, EdgeKind::TextInferred));
    }

    edges
}

/// Imaginary vertical lines connecting the left edge, right edge, or
/// centerpoint of at least `threshold` words.
fn words_to_edges_v(words: &[Word], threshold: usize) -> Vec<Edge> {
    if words.is_empty() {
        return vec![];
    }

    let by_x0 = cluster_objects(words, |w| w.x0, 1.0);
    let by_x1 = cluster_objects(words, |w| w.x1, 1.0);
    let by_center = cluster_objects(words, |w| (w.x0 + w.x1) / 2.0, 1.0);

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    clusters.extend(by_x0);
    clusters.extend(by_x1);
    clusters.extend(by_center);

    // Points that align with the most words win when bboxes overlap below.
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut condensed: Vec<BBox> = Vec::new();
    for cluster in clusters.iter().filter(|c| c.len() >= threshold) {
        let x0 = cluster.iter().map(|&i| words[i].x0).fold(f64::MAX, f64::min);
        let top = cluster.iter().map(|&i| words[i].top).fold(f64::MAX, f64::min);
        let x1 = cluster.iter().map(|&i| words[i].x1).fold(f64::MIN, f64::max);
        let bottom = cluster.iter().map(|&i| words[i].bottom).fold(f64::MIN, f64::max);
        let bbox = BBox::new(x0, top, x1, bottom);

        if !condensed.iter().any(|c| bbox_touches_or_overlaps(c, &bbox)) {
            condensed.push(bbox);
        }
    }

    if condensed.is_empty() {
        return vec![];
    }

    condensed.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());

    let max_x1 = condensed.iter().map(|b| b.x1).fold(f64::MIN, f64::max);
    let min_top = condensed.iter().map(|b| b.top).fold(f64::MAX, f64::min);
    let max_bottom = condensed.iter().map(|b| b.bottom).fold(f64::MIN, f64::max);

    // The left edge of every text cluster, plus one final edge at the
    // rightmost extent to close off the last column.
    let mut edges: Vec<Edge> = condensed
        .iter()
        .map(|b| Edge::vertical(b.x0, min_top, max_bottom, 0.5, EdgeKind::TextInferred))
        .collect();
    edges.push(Edge::vertical(max_x1, min_top, max_bottom, 0.5, EdgeKind::TextInferred));

    edges
}

/// Non-strict overlap test: touching on one axis while overlapping (or also
/// touching) on the other still counts, matching the reference's greedy
/// condensing pass.
fn bbox_touches_or_overlaps(a: &BBox, b: &BBox) -> bool {
    let o_left = a.x0.max(b.x0);
    let o_right = a.x1.min(b.x1);
    let o_top = a.top.max(b.top);
    let o_bottom = a.bottom.min(b.bottom);
    let width = o_right - o_left;
    let height = o_bottom - o_top;
    width >= 0.0 && height >= 0.0 && (width + height) > 0.0
}

fn edge_key(e: &Edge) -> (OrderedFloat<f64>, OrderedFloat<f64>, OrderedFloat<f64>, OrderedFloat<f64>) {
    (OrderedFloat(e.x0), OrderedFloat(e.top), OrderedFloat(e.x1), OrderedFloat(e.bottom))
}

fn edges_share_member(a: &[Edge], b: &[Edge]) -> bool {
    let a_keys: HashSet<_> = a.iter().map(edge_key).collect();
    b.iter().any(|e| a_keys.contains(&edge_key(e)))
}

/// Two vertices "connect" when they share an x-coordinate and a vertical
/// edge that touches both, or share a y-coordinate and a horizontal edge
/// that touches both.
fn edge_connects(a: &Intersection, b: &Intersection) -> bool {
    if a.x == b.x && edges_share_member(&a.v_edges, &b.v_edges) {
        return true;
    }
    if a.y == b.y && edges_share_member(&a.h_edges, &b.h_edges) {
        return true;
    }
    false
}

/// Build the smallest rectangular cell anchored at each vertex's top-left
/// corner. For vertex `pt`, look at every vertex directly below it (same x)
/// and every vertex directly to its right (same y); the first pairing whose
/// four corners are all real, edge-connected vertices wins.
fn intersections_to_cells(intersections: &[Intersection]) -> Vec<BBox> {
    let mut points: Vec<&Intersection> = intersections.iter().collect();
    points.sort_by(|a, b| OrderedFloat(a.x).cmp(&OrderedFloat(b.x)).then(OrderedFloat(a.y).cmp(&OrderedFloat(b.y))));

    let by_point: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), &Intersection> = points
        .iter()
        .map(|p| ((OrderedFloat(p.x), OrderedFloat(p.y)), *p))
        .collect();

    let n = points.len();
    let mut cells = Vec::new();

    for i in 0..n {
        if let Some(cell) = find_smallest_cell(&points, &by_point, i) {
            cells.push(cell);
        }
    }

    cells
}

fn find_smallest_cell(
    points: &[&Intersection],
    by_point: &HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), &Intersection>,
    i: usize,
) -> Option<BBox> {
    let n = points.len();
    if i == n - 1 {
        return None;
    }

    let pt = points[i];
    let rest = &points[i + 1..];

    let below: Vec<&Intersection> = rest.iter().copied().filter(|p| p.x == pt.x).collect();
    let right: Vec<&Intersection> = rest.iter().copied().filter(|p| p.y == pt.y).collect();

    for below_pt in below.iter().copied() {
        if !edge_connects(pt, below_pt) {
            continue;
        }
        for right_pt in right.iter().copied() {
            if !edge_connects(pt, right_pt) {
                continue;
            }

            let key = (OrderedFloat(right_pt.x), OrderedFloat(below_pt.y));
            if let Some(&bottom_right) = by_point.get(&key) {
                if edge_connects(bottom_right, right_pt) && edge_connects(bottom_right, below_pt) {
                    return Some(BBox::new(pt.x, pt.y, bottom_right.x, bottom_right.y));
                }
            }
        }
    }

    None
}

/// Group cells into the tables that hold them most simply and
/// contiguously: two cells belong to the same table iff they share an
/// exact corner point. Repeated passes grow each table until nothing new
/// attaches, then a fresh table starts from the next unassigned cell.
fn cells_to_tables(cells: Vec<BBox>) -> Vec<Vec<BBox>> {
    fn corners_of(b: &BBox) -> [(OrderedFloat<f64>, OrderedFloat<f64>); 4] {
        [
            (OrderedFloat(b.x0), OrderedFloat(b.top)),
            (OrderedFloat(b.x0), OrderedFloat(b.bottom)),
            (OrderedFloat(b.x1), OrderedFloat(b.top)),
            (OrderedFloat(b.x1), OrderedFloat(b.bottom)),
        ]
    }

    struct Entry {
        bbox: BBox,
        corners: [(OrderedFloat<f64>, OrderedFloat<f64>); 4],
        available: bool,
    }

    let mut entries: Vec<Entry> = cells
        .iter()
        .map(|&bbox| Entry { bbox, corners: corners_of(&bbox), available: true })
        .collect();

    let n_cells = entries.len();
    if n_cells == 0 {
        return vec![];
    }

    let mut n_assigned = 0usize;
    let mut groups: Vec<(HashSet<(OrderedFloat<f64>, OrderedFloat<f64>)>, Vec<BBox>)> = Vec::new();

    let mut current_corners: HashSet<(OrderedFloat<f64>, OrderedFloat<f64>)> = HashSet::new();
    let mut current_cells: Vec<BBox> = Vec::new();

    loop {
        let initial_cell_count = current_cells.len();

        for entry in entries.iter_mut() {
            if !entry.available {
                continue;
            }
            if current_cells.is_empty() {
                current_corners.extend(entry.corners.iter().copied());
                current_cells.push(entry.bbox);
                entry.available = false;
                n_assigned += 1;
            } else {
                let corner_count = entry.corners.iter().filter(|c| current_corners.contains(c)).count();
                if corner_count > 0 {
                    current_corners.extend(entry.corners.iter().copied());
                    current_cells.push(entry.bbox);
                    entry.available = false;
                    n_assigned += 1;
                }
            }
        }

        if n_assigned == n_cells {
            break;
        }
        if current_cells.len() == initial_cell_count {
            groups.push((std::mem::take(&mut current_corners), std::mem::take(&mut current_cells)));
        }
    }

    if !current_cells.is_empty() {
        groups.push((current_corners, current_cells));
    }

    // Sort tables topmost-then-leftmost, by the smallest (y, x) corner.
    groups.sort_by_key(|(corners, _)| corners.iter().map(|&(x, y)| (y, x)).min().unwrap());

    groups
        .into_iter()
        .filter(|(_, cells)| cells.len() > 1)
        .map(|(_, cells)| cells)
        .collect()
}

fn build_table(cells: Vec<BBox>, page: &Page, settings: &TableSettings) -> Table {
    let table_bbox = cells[1..].iter().fold(cells[0], |acc, c| acc.union(c));

    let mut xs: Vec<f64> = cells.iter().map(|c| c.x0).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    xs.dedup();

    let mut ys: Vec<f64> = cells.iter().map(|c| c.top).collect();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    ys.dedup();

    let col_count = xs.len();
    let row_count = ys.len();

    let table_cells = cells
        .iter()
        .map(|cell_bbox| {
            let row = ys.iter().position(|&y| y == cell_bbox.top).unwrap_or(0);
            let col = xs.iter().position(|&x| x == cell_bbox.x0).unwrap_or(0);
            let text = extract_cell_text(page, cell_bbox, settings);

            TableCell { row, col, row_span: 1, col_span: 1, text, bbox: *cell_bbox }
        })
        .collect();

    Table { bbox: table_bbox, cells: table_cells, row_count, col_count }
}

/// Extract text content from characters within a cell bbox, using
/// centerpoint containment so a character spanning a cell's border is
/// unambiguously assigned to one side.
fn extract_cell_text(page: &Page, cell_bbox: &BBox, settings: &TableSettings) -> Option<String> {
    let chars: Vec<&Char> = page
        .chars
        .iter()
        .filter(|c| {
            let cx = (c.x0 + c.x1) / 2.0;
            let cy = (c.top + c.bottom) / 2.0;
            cell_bbox.contains_point(cx, cy)
        })
        .collect();

    if chars.is_empty() {
        return None;
    }

    let mut sorted = chars;
    sorted.sort_by(|a, b| {
        let y_cmp = a.top.partial_cmp(&b.top).unwrap();
        if (a.top - b.top).abs() <= settings.text_y() {
            a.x0.partial_cmp(&b.x0).unwrap()
        } else {
            y_cmp
        }
    });

    let mut text = String::new();
    let mut last_top = sorted[0].top;

    for ch in &sorted {
        if (ch.top - last_top).abs() > settings.text_y() {
            text.push('\n');
            last_top = ch.top;
        }
        text.push_str(&ch.text);
    }

    Some(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(x0: f64, top: f64, x1: f64, bottom: f64, orientation_v: bool) -> Edge {
        if orientation_v {
            Edge::vertical(x0, top, bottom, 1.0, EdgeKind::Line)
        } else {
            Edge::horizontal(x0, x1, top, 1.0, EdgeKind::Line)
        }
    }

    fn grid_edges() -> Vec<Edge> {
        // A simple 2x2 grid: verticals at x=0,50,100, horizontals at y=0,30,60.
        vec![
            edge(0.0, 0.0, 0.0, 60.0, true),
            edge(50.0, 0.0, 50.0, 60.0, true),
            edge(100.0, 0.0, 100.0, 60.0, true),
            edge(0.0, 0.0, 100.0, 0.0, false),
            edge(0.0, 30.0, 100.0, 30.0, false),
            edge(0.0, 60.0, 100.0, 60.0, false),
        ]
    }

    #[test]
    fn builds_four_cells_from_a_2x2_grid() {
        let edges = grid_edges();
        let intersections = lines::find_intersections(&edges, 1.0, 1.0);
        assert_eq!(intersections.len(), 9);

        let cells = intersections_to_cells(&intersections);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn grid_cells_form_one_table() {
        let edges = grid_edges();
        let intersections = lines::find_intersections(&edges, 1.0, 1.0);
        let cells = intersections_to_cells(&intersections);
        let groups = cells_to_tables(cells);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn disjoint_cells_form_separate_tables() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 0.0, 20.0, 10.0);
        let c = BBox::new(200.0, 200.0, 210.0, 210.0);
        let d = BBox::new(210.0, 200.0, 220.0, 210.0);

        let groups = cells_to_tables(vec![a, b, c, d]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn words_to_edges_h_needs_the_word_threshold() {
        let words = vec![
            Word {
                text: "a".into(),
                x0: 0.0,
                x1: 10.0,
                top: 10.0,
                bottom: 20.0,
                doctop: 10.0,
                upright: true,
                fontname: "F".into(),
                size: 10.0,
            },
            Word {
                text: "b".into(),
                x0: 20.0,
                x1: 30.0,
                top: 10.0,
                bottom: 20.0,
                doctop: 10.0,
                upright: true,
                fontname: "F".into(),
                size: 10.0,
            },
        ];
        assert!(!words_to_edges_h(&words, 2).is_empty());
        assert!(words_to_edges_h(&words, 3).is_empty());
    }
}
