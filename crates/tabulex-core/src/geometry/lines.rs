use std::collections::BTreeMap;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use super::bbox::BBox;
use super::clustering::cluster_objects;
use crate::objects::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// What kind of page primitive an edge was derived from. Replaces a
/// string-keyed `object_type` tag with a closed set the compiler checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Line,
    RectEdge,
    Curve,
    TextInferred,
    Explicit,
}

/// A straight edge segment used in table detection. Either `x0 == x1`
/// (vertical) or `top == bottom` (horizontal) — never both unless the
/// segment is degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub width: f64,
    pub orientation: Orientation,
    pub kind: EdgeKind,
    pub stroking_color: Arc<Option<Color>>,
    pub non_stroking_color: Arc<Option<Color>>,
}

impl Edge {
    pub fn horizontal(x0: f64, x1: f64, y: f64, width: f64, kind: EdgeKind) -> Self {
        Self {
            x0: x0.min(x1),
            top: y,
            x1: x0.max(x1),
            bottom: y,
            width,
            orientation: Orientation::Horizontal,
            kind,
            stroking_color: Arc::new(None),
            non_stroking_color: Arc::new(None),
        }
    }

    pub fn vertical(x: f64, top: f64, bottom: f64, width: f64, kind: EdgeKind) -> Self {
        Self {
            x0: x,
            top: top.min(bottom),
            x1: x,
            bottom: top.max(bottom),
            width,
            orientation: Orientation::Vertical,
            kind,
            stroking_color: Arc::new(None),
            non_stroking_color: Arc::new(None),
        }
    }

    pub fn with_colors(
        mut self,
        stroking: Arc<Option<Color>>,
        non_stroking: Arc<Option<Color>>,
    ) -> Self {
        self.stroking_color = stroking;
        self.non_stroking_color = non_stroking;
        self
    }

    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => (self.x1 - self.x0).abs(),
            Orientation::Vertical => (self.bottom - self.top).abs(),
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    fn snapped_x(&self, x: f64) -> Edge {
        let mut e = self.clone();
        e.x0 = x;
        e.x1 = x;
        e
    }

    fn snapped_top(&self, y: f64) -> Edge {
        let mut e = self.clone();
        e.top = y;
        e.bottom = y;
        e
    }
}

/// Cluster V edges by `x0` and H edges by `top`, replacing every edge in a
/// cluster with a copy snapped to that cluster's mean coordinate. A
/// tolerance of 0 is a no-op (matches the reference's
/// `if tolerance > 0` guard around its own snapping pass).
pub fn snap_edges(edges: Vec<Edge>, x_tolerance: f64, y_tolerance: f64) -> Vec<Edge> {
    let (mut verticals, mut horizontals): (Vec<Edge>, Vec<Edge>) =
        edges.into_iter().partition(|e| e.is_vertical());

    if x_tolerance > 0.0 && !verticals.is_empty() {
        let clusters = cluster_objects(&verticals, |e| e.x0, x_tolerance);
        let mut snapped = verticals.clone();
        for cluster in clusters {
            let mean: f64 =
                cluster.iter().map(|&i| verticals[i].x0).sum::<f64>() / cluster.len() as f64;
            for idx in cluster {
                snapped[idx] = verticals[idx].snapped_x(mean);
            }
        }
        verticals = snapped;
    }

    if y_tolerance > 0.0 && !horizontals.is_empty() {
        let clusters = cluster_objects(&horizontals, |e| e.top, y_tolerance);
        let mut snapped = horizontals.clone();
        for cluster in clusters {
            let mean: f64 =
                cluster.iter().map(|&i| horizontals[i].top).sum::<f64>() / cluster.len() as f64;
            for idx in cluster {
                snapped[idx] = horizontals[idx].snapped_top(mean);
            }
        }
        horizontals = snapped;
    }

    verticals.extend(horizontals);
    verticals
}

/// Merge collinear, overlapping-or-adjacent edges within one orientation
/// group (edges already sharing the same snapped coordinate).
fn join_edge_group(mut edges: Vec<Edge>, tolerance: f64, horizontal: bool) -> Vec<Edge> {
    if edges.is_empty() {
        return edges;
    }

    if horizontal {
        edges.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());
    } else {
        edges.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap());
    }

    let mut merged: Vec<Edge> = vec![edges[0].clone()];

    for edge in &edges[1..] {
        let last = merged.last_mut().unwrap();
        let extends = if horizontal {
            edge.x0 <= last.x1 + tolerance
        } else {
            edge.top <= last.bottom + tolerance
        };

        if extends {
            if horizontal {
                last.x1 = last.x1.max(edge.x1);
            } else {
                last.bottom = last.bottom.max(edge.bottom);
            }
            last.width = last.width.max(edge.width);
        } else {
            merged.push(edge.clone());
        }
    }

    merged
}

/// Snap, then group by (orientation, snapped coordinate), then join each
/// group. `join_x`/`join_y` are independent, unlike a single shared join
/// tolerance.
pub fn merge_edges(edges: Vec<Edge>, snap_x: f64, snap_y: f64, join_x: f64, join_y: f64) -> Vec<Edge> {
    let snapped = snap_edges(edges, snap_x, snap_y);

    let (verticals, horizontals): (Vec<Edge>, Vec<Edge>) =
        snapped.into_iter().partition(|e| e.is_vertical());

    let mut result = Vec::new();

    let mut v_groups: std::collections::BTreeMap<i64, Vec<Edge>> = std::collections::BTreeMap::new();
    for e in verticals {
        v_groups.entry((e.x0 * 1000.0).round() as i64).or_default().push(e);
    }
    for group in v_groups.into_values() {
        result.extend(join_edge_group(group, join_y, false));
    }

    let mut h_groups: std::collections::BTreeMap<i64, Vec<Edge>> = std::collections::BTreeMap::new();
    for e in horizontals {
        h_groups.entry((e.top * 1000.0).round() as i64).or_default().push(e);
    }
    for group in h_groups.into_values() {
        result.extend(join_edge_group(group, join_x, true));
    }

    result
}

/// A vertex where one or more vertical edges cross one or more horizontal
/// edges, keeping which edges actually produced it so cell-discovery can
/// test edge-sharing between two vertices rather than mere coordinate
/// proximity.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub x: f64,
    pub y: f64,
    pub v_edges: Vec<Edge>,
    pub h_edges: Vec<Edge>,
}

/// Find every vertex where a horizontal and vertical edge cross, within
/// tolerance, and record edge membership at each vertex.
///
/// A vertex is kept when, for some horizontal edge `h` and vertical edge
/// `v`: `v.x0` falls within `[h.x0 - x_tol, h.x1 + x_tol]` and `h.top`
/// falls within `[v.top - y_tol, v.bottom + y_tol]`.
pub fn find_intersections(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<Intersection> {
    let horizontals: Vec<&Edge> = edges.iter().filter(|e| e.is_horizontal()).collect();
    let verticals: Vec<&Edge> = edges.iter().filter(|e| e.is_vertical()).collect();

    // Edges reaching this stage have already been snapped (§4.4), so a
    // vertical/horizontal pair that crosses shares an *exact* (x, y) vertex;
    // a BTreeMap keyed on the coordinate pair dedups without a fuzzy,
    // quadratic linear scan. Tolerance only governs whether a pair counts
    // as crossing at all (the range checks below), not vertex identity.
    let mut by_point: BTreeMap<(OrderedFloat<f64>, OrderedFloat<f64>), Intersection> = BTreeMap::new();

    for v in &verticals {
        for h in &horizontals {
            let x_in_range = v.x0 >= h.x0 - x_tolerance && v.x0 <= h.x1 + x_tolerance;
            let y_in_range = h.top >= v.top - y_tolerance && h.top <= v.bottom + y_tolerance;

            if !(x_in_range && y_in_range) {
                continue;
            }

            let x = v.x0;
            let y = h.top;
            let key = (OrderedFloat(x), OrderedFloat(y));

            let entry = by_point.entry(key).or_insert_with(|| Intersection {
                x,
                y,
                v_edges: Vec::new(),
                h_edges: Vec::new(),
            });
            if !entry.v_edges.contains(v) {
                entry.v_edges.push((*v).clone());
            }
            if !entry.h_edges.contains(h) {
                entry.h_edges.push((*h).clone());
            }
        }
    }

    let mut points: Vec<Intersection> = by_point.into_values().collect();
    points.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.x.partial_cmp(&b.x).unwrap()));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let h = Edge::horizontal(10.0, 100.0, 50.0, 1.0, EdgeKind::Line);
        assert!(h.is_horizontal());
        assert_eq!(h.length(), 90.0);

        let v = Edge::vertical(50.0, 10.0, 100.0, 1.0, EdgeKind::Line);
        assert!(v.is_vertical());
        assert_eq!(v.length(), 90.0);
    }

    #[test]
    fn test_find_intersections_keeps_membership() {
        let edges = vec![
            Edge::horizontal(0.0, 100.0, 50.0, 1.0, EdgeKind::Line),
            Edge::vertical(50.0, 0.0, 100.0, 1.0, EdgeKind::Line),
        ];
        let pts = find_intersections(&edges, 3.0, 3.0);
        assert_eq!(pts.len(), 1);
        assert!((pts[0].x - 50.0).abs() < 0.01);
        assert!((pts[0].y - 50.0).abs() < 0.01);
        assert_eq!(pts[0].v_edges.len(), 1);
        assert_eq!(pts[0].h_edges.len(), 1);
    }

    #[test]
    fn test_merge_edges_joins_overlapping_segments() {
        let edges = vec![
            Edge::horizontal(0.0, 50.0, 10.0, 1.0, EdgeKind::Line),
            Edge::horizontal(48.0, 100.0, 10.0, 1.0, EdgeKind::Line),
        ];
        let merged = merge_edges(edges, 0.0, 0.0, 3.0, 3.0);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].x0 - 0.0).abs() < 0.01);
        assert!((merged[0].x1 - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_merge_edges_is_idempotent() {
        let edges = vec![
            Edge::horizontal(0.0, 50.0, 10.0, 1.0, EdgeKind::Line),
            Edge::horizontal(48.0, 100.0, 10.0, 1.0, EdgeKind::Line),
            Edge::horizontal(99.0, 150.0, 10.2, 1.0, EdgeKind::Line),
        ];
        let once = merge_edges(edges, 1.0, 1.0, 3.0, 3.0);
        let twice = merge_edges(once.clone(), 1.0, 1.0, 3.0, 3.0);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a.x0 - b.x0).abs() < 1e-6);
            assert!((a.x1 - b.x1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_snap_edges_moves_to_cluster_mean() {
        let edges = vec![
            Edge::vertical(10.0, 0.0, 50.0, 1.0, EdgeKind::Line),
            Edge::vertical(10.4, 0.0, 50.0, 1.0, EdgeKind::Line),
        ];
        let snapped = snap_edges(edges, 1.0, 1.0);
        assert!((snapped[0].x0 - 10.2).abs() < 1e-6);
        assert!((snapped[1].x0 - 10.2).abs() < 1e-6);
    }
}
