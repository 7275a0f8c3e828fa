//! Glyph widths for the 14 standard PDF fonts, used when a font dictionary
//! carries no `/Widths` array (common for the base fonts, which readers are
//! expected to know the metrics of already).
//!
//! Widths are in 1/1000 em, keyed by character code under StandardEncoding
//! (ASCII 32-126 covers everything this crate's callers hit in practice).

use std::collections::HashMap;

/// Fill `widths` with the standard metrics for `base_font`, if known. A
/// no-op for anything outside the 14 standard names — the caller's
/// `default_width` fallback takes over.
pub fn load_standard_widths(base_font: &str, widths: &mut HashMap<u32, f64>) {
    for (code, width) in table_for(base_font) {
        widths.insert(code as u32, width);
    }
}

fn table_for(base_font: &str) -> Vec<(u8, f64)> {
    let name = strip_subset_tag(base_font);
    let bold = name.contains("Bold");
    let italic = name.contains("Italic") || name.contains("Oblique");

    if name.starts_with("Courier") {
        return (32u8..=126).map(|c| (c, 600.0)).collect();
    }
    if name.starts_with("Times") {
        let vals: &[f64] = match (bold, italic) {
            (true, _) => &TIMES_BOLD,
            (false, _) => &TIMES_ROMAN,
        };
        return zip_from(32, vals);
    }
    if name.starts_with("Helvetica") || name.starts_with("Arial") {
        let vals: &[f64] = match (bold, italic) {
            (true, _) => &HELVETICA_BOLD,
            (false, _) => &HELVETICA,
        };
        return zip_from(32, vals);
    }

    Vec::new()
}

fn zip_from(start: u8, vals: &[f64]) -> Vec<(u8, f64)> {
    vals.iter()
        .enumerate()
        .map(|(i, &w)| (start + i as u8, w))
        .collect()
}

/// Strip a subset tag like `ABCDEF+Helvetica-Bold` down to `Helvetica-Bold`.
fn strip_subset_tag(base_font: &str) -> &str {
    if base_font.len() > 7 && base_font.as_bytes()[6] == b'+' {
        let prefix_is_subset_tag = base_font[..6].bytes().all(|b| b.is_ascii_uppercase());
        if prefix_is_subset_tag {
            return &base_font[7..];
        }
    }
    base_font
}

// AFM-derived widths for codes 32..=126 (space through `~`).
const HELVETICA: [f64; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, 333.0, 333.0, 389.0, 584.0, 278.0,
    333.0, 278.0, 278.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    278.0, 278.0, 584.0, 584.0, 584.0, 556.0, 1015.0, 667.0, 667.0, 722.0, 722.0, 667.0, 611.0,
    778.0, 722.0, 278.0, 500.0, 667.0, 556.0, 833.0, 722.0, 778.0, 667.0, 778.0, 722.0, 667.0,
    611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0, 278.0, 278.0, 278.0, 469.0, 556.0, 333.0,
    556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, 556.0, 222.0, 222.0, 500.0, 222.0, 833.0,
    556.0, 556.0, 556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, 500.0, 500.0, 500.0,
    334.0, 260.0, 334.0, 584.0,
];

const HELVETICA_BOLD: [f64; 95] = [
    278.0, 333.0, 474.0, 556.0, 556.0, 889.0, 722.0, 238.0, 333.0, 333.0, 389.0, 584.0, 278.0,
    333.0, 278.0, 278.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0,
    333.0, 333.0, 584.0, 584.0, 584.0, 611.0, 975.0, 722.0, 722.0, 722.0, 722.0, 667.0, 611.0,
    778.0, 722.0, 278.0, 556.0, 722.0, 611.0, 833.0, 722.0, 778.0, 667.0, 778.0, 722.0, 667.0,
    611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0, 333.0, 278.0, 333.0, 584.0, 556.0, 333.0,
    556.0, 611.0, 556.0, 611.0, 556.0, 333.0, 611.0, 611.0, 278.0, 278.0, 556.0, 278.0, 889.0,
    611.0, 611.0, 611.0, 611.0, 389.0, 556.0, 333.0, 611.0, 556.0, 778.0, 556.0, 556.0, 500.0,
    389.0, 280.0, 389.0, 584.0,
];

const TIMES_ROMAN: [f64; 95] = [
    250.0, 333.0, 408.0, 500.0, 500.0, 833.0, 778.0, 180.0, 333.0, 333.0, 500.0, 564.0, 250.0,
    333.0, 250.0, 278.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0,
    278.0, 278.0, 564.0, 564.0, 564.0, 444.0, 921.0, 722.0, 667.0, 667.0, 722.0, 611.0, 556.0,
    722.0, 722.0, 333.0, 389.0, 722.0, 611.0, 889.0, 722.0, 722.0, 556.0, 722.0, 667.0, 556.0,
    611.0, 722.0, 722.0, 944.0, 722.0, 722.0, 611.0, 333.0, 278.0, 333.0, 469.0, 500.0, 333.0,
    444.0, 500.0, 444.0, 500.0, 444.0, 333.0, 500.0, 500.0, 278.0, 278.0, 500.0, 278.0, 778.0,
    500.0, 500.0, 500.0, 500.0, 333.0, 389.0, 278.0, 500.0, 500.0, 722.0, 500.0, 500.0, 444.0,
    480.0, 200.0, 480.0, 541.0,
];

const TIMES_BOLD: [f64; 95] = [
    250.0, 333.0, 555.0, 500.0, 500.0, 1000.0, 833.0, 278.0, 333.0, 333.0, 500.0, 570.0, 250.0,
    333.0, 250.0, 278.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0,
    333.0, 333.0, 570.0, 570.0, 570.0, 500.0, 930.0, 722.0, 667.0, 722.0, 722.0, 667.0, 611.0,
    778.0, 778.0, 389.0, 500.0, 778.0, 667.0, 944.0, 722.0, 778.0, 611.0, 778.0, 722.0, 556.0,
    667.0, 722.0, 722.0, 1000.0, 722.0, 722.0, 667.0, 333.0, 278.0, 333.0, 581.0, 500.0, 333.0,
    500.0, 556.0, 444.0, 556.0, 444.0, 333.0, 500.0, 556.0, 278.0, 333.0, 556.0, 278.0, 833.0,
    556.0, 500.0, 556.0, 556.0, 444.0, 389.0, 333.0, 556.0, 500.0, 722.0, 500.0, 500.0, 444.0,
    394.0, 220.0, 394.0, 520.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_monospace() {
        let mut widths = HashMap::new();
        load_standard_widths("Courier", &mut widths);
        assert_eq!(widths.get(&('A' as u32)), Some(&600.0));
        assert_eq!(widths.get(&(' ' as u32)), Some(&600.0));
    }

    #[test]
    fn subset_tag_is_stripped() {
        let mut widths = HashMap::new();
        load_standard_widths("ABCDEF+Helvetica-Bold", &mut widths);
        assert!(widths.contains_key(&('A' as u32)));
    }

    #[test]
    fn unknown_font_loads_nothing() {
        let mut widths = HashMap::new();
        load_standard_widths("SomeEmbeddedFont", &mut widths);
        assert!(widths.is_empty());
    }
}
