// src/extract/locate.rs

use crate::markup::Element;

/// A data row needs at least this many cells before the leading-"1" check.
const MIN_ROW_CELLS: usize = 10;

/// Collect the authoritative data row of every results table under `root`.
///
/// A table counts as a results table when one of its rows carries
/// `bgcolor="silver"` (the exporter's shaded header row). The export
/// repeats the full grid across duplicate rows for print layout, so only
/// the first row whose leading cell reads exactly "1" is taken; a table
/// without one contributes nothing.
pub fn data_rows<E: Element>(root: &E) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for table in root.find_all("table") {
        if !has_header_marker(&table) {
            continue;
        }
        if let Some(row) = data_row(&table) {
            rows.push(row);
        }
    }
    rows
}

fn has_header_marker<E: Element>(table: &E) -> bool {
    table
        .find_all("tr")
        .iter()
        .any(|row| row.attr_is("bgcolor", "silver"))
}

fn data_row<E: Element>(table: &E) -> Option<Vec<String>> {
    for row in table.find_all("tr") {
        let cells = row.find_all("td");
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(Element::trimmed_text).collect();
        if texts[0] == "1" {
            return Some(texts);
        }
    }
    None
}
