use crate::error::Result;
use crate::page::Page;
use crate::table::settings::TableSettings;
use crate::table::Table;

/// High-level table extraction entry point.
/// Detects tables and returns them with their cell content populated.
pub fn extract_tables(page: &Page, settings: &TableSettings) -> Result<Vec<Table>> {
    super::detect::detect_tables(page, settings)
}

/// Find tables on a page without extracting content.
/// Returns tables with the same geometry as [`extract_tables`], but every
/// cell's `text` is `None` — useful when a caller only wants structure and
/// wants to skip the character-assignment pass.
pub fn find_tables(page: &Page, settings: &TableSettings) -> Result<Vec<Table>> {
    let mut tables = super::detect::detect_tables(page, settings)?;
    for table in &mut tables {
        for cell in &mut table.cells {
            cell.text = None;
        }
    }
    Ok(tables)
}

/// Extract tables and return as 2D grids (pdfplumber compatibility).
pub fn extract_table_grids(
    page: &Page,
    settings: &TableSettings,
) -> Result<Vec<Vec<Vec<Option<String>>>>> {
    let tables = extract_tables(page, settings)?;
    Ok(tables.iter().map(|t| t.to_grid()).collect())
}
