use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BBox;

/// Strategy for detecting table edges on a given axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Use explicit PDF lines and rect edges.
    Lines,
    /// Like `Lines`, but only unbroken line/rect-edge segments count —
    /// text-inferred edges are never substituted in, even implicitly.
    LinesStrict,
    /// Infer boundaries from word alignment.
    Text,
    /// Caller provides exact coordinates or edge descriptions.
    Explicit,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Lines
    }
}

/// A single explicit line specification: either a bare coordinate (spans
/// the full page on the other axis) or a specific edge description (only
/// the sides matching the requested orientation contribute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExplicitLine {
    Coordinate(f64),
    Edge(BBox),
}

/// The ratios and minimum-count thresholds used by the false-positive
/// filter pipeline. Each has the default the heuristic was tuned against;
/// exposed so a caller can loosen or tighten individual filters without
/// forking the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    pub too_long_edge_ratio: f64,
    pub terminal_edge_margin_ratio: f64,
    pub too_short_cell_ratio: f64,
    pub chart_min_fraction: f64,
    /// Maximum gap allowed between the two cells of a two-cell table before
    /// it's dismissed as an artifact of two unrelated ruled boxes that
    /// happened to land side by side.
    pub two_cell_gap_tolerance: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            too_long_edge_ratio: 0.95,
            terminal_edge_margin_ratio: 0.03,
            too_short_cell_ratio: 10.0,
            chart_min_fraction: 5.0,
            two_cell_gap_tolerance: 3.0,
        }
    }
}

/// Configuration for table detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    pub vertical_strategy: Strategy,
    pub horizontal_strategy: Strategy,

    /// How close lines must be to snap together (default 3.0).
    pub snap_tolerance: f64,
    pub snap_x_tolerance: Option<f64>,
    pub snap_y_tolerance: Option<f64>,

    /// How close endpoints must be to join lines (default 3.0).
    pub join_tolerance: f64,
    pub join_x_tolerance: Option<f64>,
    pub join_y_tolerance: Option<f64>,

    /// Minimum edge length to consider (default 3.0).
    pub edge_min_length: f64,

    /// For "text" strategy: minimum words to infer vertical/horizontal lines.
    pub min_words_vertical: usize,
    pub min_words_horizontal: usize,

    /// How close a crossing must be to count as an intersection (default 3.0).
    pub intersection_tolerance: f64,
    pub intersection_x_tolerance: Option<f64>,
    pub intersection_y_tolerance: Option<f64>,

    /// Character spacing for text extraction within cells.
    pub text_tolerance: f64,
    pub text_x_tolerance: Option<f64>,
    pub text_y_tolerance: Option<f64>,

    /// Retain whitespace-only words when grouping characters (affects
    /// the `text` strategy's edge inference and cell text assembly).
    pub keep_blank_chars: bool,

    /// User-provided explicit lines (for Strategy::Explicit).
    pub explicit_vertical_lines: Vec<ExplicitLine>,
    pub explicit_horizontal_lines: Vec<ExplicitLine>,

    /// Thresholds for the false-positive filter pipeline.
    pub filters: FilterSettings,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            snap_tolerance: 3.0,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: 3.0,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: 3.0,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_tolerance: 3.0,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_tolerance: 3.0,
            text_x_tolerance: None,
            text_y_tolerance: None,
            keep_blank_chars: false,
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            filters: FilterSettings::default(),
        }
    }
}

impl TableSettings {
    pub fn snap_x(&self) -> f64 {
        self.snap_x_tolerance.unwrap_or(self.snap_tolerance)
    }

    pub fn snap_y(&self) -> f64 {
        self.snap_y_tolerance.unwrap_or(self.snap_tolerance)
    }

    pub fn join_x(&self) -> f64 {
        self.join_x_tolerance.unwrap_or(self.join_tolerance)
    }

    pub fn join_y(&self) -> f64 {
        self.join_y_tolerance.unwrap_or(self.join_tolerance)
    }

    pub fn intersection_x(&self) -> f64 {
        self.intersection_x_tolerance
            .unwrap_or(self.intersection_tolerance)
    }

    pub fn intersection_y(&self) -> f64 {
        self.intersection_y_tolerance
            .unwrap_or(self.intersection_tolerance)
    }

    pub fn text_x(&self) -> f64 {
        self.text_x_tolerance.unwrap_or(self.text_tolerance)
    }

    pub fn text_y(&self) -> f64 {
        self.text_y_tolerance.unwrap_or(self.text_tolerance)
    }

    /// Validate settings before running the detection pipeline. Runs
    /// synchronously at pipeline entry; detection never executes partway
    /// on invalid settings.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("snap_tolerance", self.snap_tolerance),
            ("join_tolerance", self.join_tolerance),
            ("edge_min_length", self.edge_min_length),
            ("intersection_tolerance", self.intersection_tolerance),
            ("text_tolerance", self.text_tolerance),
            ("too_long_edge_ratio", self.filters.too_long_edge_ratio),
            ("terminal_edge_margin_ratio", self.filters.terminal_edge_margin_ratio),
            ("too_short_cell_ratio", self.filters.too_short_cell_ratio),
            ("chart_min_fraction", self.filters.chart_min_fraction),
            ("two_cell_gap_tolerance", self.filters.two_cell_gap_tolerance),
        ] {
            if value < 0.0 {
                return Err(Error::SettingValidation(
                    name.to_string(),
                    "must be non-negative".to_string(),
                ));
            }
        }

        for (name, value) in [
            ("snap_x_tolerance", self.snap_x_tolerance),
            ("snap_y_tolerance", self.snap_y_tolerance),
            ("join_x_tolerance", self.join_x_tolerance),
            ("join_y_tolerance", self.join_y_tolerance),
            ("intersection_x_tolerance", self.intersection_x_tolerance),
            ("intersection_y_tolerance", self.intersection_y_tolerance),
            ("text_x_tolerance", self.text_x_tolerance),
            ("text_y_tolerance", self.text_y_tolerance),
        ] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(Error::SettingValidation(
                    name.to_string(),
                    "must be non-negative".to_string(),
                ));
            }
        }

        if self.vertical_strategy == Strategy::Explicit && self.explicit_vertical_lines.len() < 2 {
            return Err(Error::SettingValidation(
                "explicit_vertical_lines".to_string(),
                "explicit strategy requires at least 2 lines".to_string(),
            ));
        }
        if self.horizontal_strategy == Strategy::Explicit
            && self.explicit_horizontal_lines.len() < 2
        {
            return Err(Error::SettingValidation(
                "explicit_horizontal_lines".to_string(),
                "explicit strategy requires at least 2 lines".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(TableSettings::default().validate().is_ok());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let mut s = TableSettings::default();
        s.snap_tolerance = -1.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn negative_per_axis_override_is_rejected() {
        let mut s = TableSettings::default();
        s.snap_x_tolerance = Some(-2.0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn negative_filter_ratio_is_rejected() {
        let mut s = TableSettings::default();
        s.filters.chart_min_fraction = -1.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn explicit_strategy_requires_two_lines() {
        let mut s = TableSettings::default();
        s.vertical_strategy = Strategy::Explicit;
        s.explicit_vertical_lines = vec![ExplicitLine::Coordinate(10.0)];
        assert!(s.validate().is_err());

        s.explicit_vertical_lines.push(ExplicitLine::Coordinate(20.0));
        assert!(s.validate().is_ok());
    }
}
