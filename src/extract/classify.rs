// src/extract/classify.rs

use std::fmt;

use super::segment::is_digits;

/// Team/organisation sits at this fixed offset inside a block.
const TEAM_CELL: usize = 3;

/// The place scan walks from the block's last cell down to this index;
/// everything before it is ordinal/bib/name/team.
const FIRST_STATUS_CELL: usize = 4;

/// Lower-cased status markers meaning the participant did not finish.
const RETIRED_MARKERS: &[&str] = &["н/ф", "в/к", "дск", "снят", "снт", "дисквал"];

/// What U+FFFD looks like after a status column went through a wrong
/// cp1251 decode; such cells are status text, not places.
const MOJIBAKE_MARKER: &str = "пїЅ";

/// A participant's finishing state: a numeric place, or withdrawn /
/// disqualified / did-not-finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    Place(String),
    Retired,
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finish::Place(place) => f.write_str(place),
            Finish::Retired => f.write_str("Сошел"),
        }
    }
}

/// One classified participant block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub team: String,
    pub finish: Finish,
}

/// Classify one participant block into (team, finish).
///
/// The finish is found by scanning cells from the end of the block down
/// to `FIRST_STATUS_CELL`, first match wins:
/// - empty text and anything with ':' (durations) are skipped,
/// - 4-digit values in 1900..=2100 are birth years, skipped,
/// - any other digit string is the place,
/// - known status markers (or their mojibake residue) mean retired.
/// An exhausted scan with a non-empty team also means retired. A block
/// with an empty team yields nothing. Never panics on malformed input.
pub fn classify_block(cells: &[String]) -> Option<Placement> {
    let team = cells.get(TEAM_CELL)?;
    if team.is_empty() {
        return None;
    }
    let finish = scan_finish(cells).unwrap_or(Finish::Retired);
    Some(Placement {
        team: team.clone(),
        finish,
    })
}

fn scan_finish(cells: &[String]) -> Option<Finish> {
    for i in (FIRST_STATUS_CELL..cells.len()).rev() {
        let text = cells[i].as_str();
        if text.is_empty() || text.contains(':') {
            continue;
        }
        if is_birth_year(text) {
            continue;
        }
        if is_digits(text) {
            return Some(Finish::Place(text.to_string()));
        }
        let lower = text.to_lowercase();
        if RETIRED_MARKERS.iter().any(|marker| lower.contains(marker)) {
            return Some(Finish::Retired);
        }
        if text.contains(MOJIBAKE_MARKER) {
            return Some(Finish::Retired);
        }
    }
    None
}

fn is_birth_year(text: &str) -> bool {
    if text.len() != 4 || !is_digits(text) {
        return false;
    }
    matches!(text.parse::<u32>(), Ok(year) if (1900..=2100).contains(&year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn last_numeric_cell_is_the_place() {
        let cells = block(&["1", "101", "Иванов", "Альфа", "1990", "00:45:12", "3", ""]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.team, "Альфа");
        assert_eq!(placement.finish, Finish::Place("3".into()));
    }

    #[test]
    fn times_and_blanks_are_skipped() {
        let cells = block(&["1", "101", "Иванов", "Альфа", "12", "", "00:45:12"]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.finish, Finish::Place("12".into()));
    }

    #[test]
    fn birth_year_never_reads_as_place() {
        let cells = block(&["1", "101", "Иванов", "Альфа", "1998", "", "00:45:12"]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.finish, Finish::Retired);
    }

    #[test]
    fn four_digit_value_outside_year_range_is_a_place() {
        let cells = block(&["1", "101", "Иванов", "Альфа", "x", "1500"]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.finish, Finish::Place("1500".into()));
    }

    #[test]
    fn status_markers_mean_retired() {
        for status in ["н/ф", "в/к", "дск", "снят", "снт", "ДИСКВАЛ."] {
            let cells = block(&["1", "101", "Иванов", "Альфа", "1990", status]);
            let placement = classify_block(&cells).unwrap();
            assert_eq!(placement.finish, Finish::Retired, "status {:?}", status);
        }
    }

    #[test]
    fn unknown_status_text_defaults_to_retired() {
        for casing in ["СОШЕЛ", "Сошел", "сошел"] {
            let cells = block(&["1", "101", "Иванов", "Альфа", "1990", "12:34", casing]);
            let placement = classify_block(&cells).unwrap();
            assert_eq!(placement.finish, Finish::Retired, "casing {:?}", casing);
        }
    }

    #[test]
    fn mojibake_status_cell_means_retired() {
        let cells = block(&["1", "101", "Иванов", "Альфа", "1990", "пїЅпїЅ"]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.finish, Finish::Retired);
    }

    #[test]
    fn minimum_block_defaults_to_retired() {
        let cells = block(&["7", "101", "Иванов", "Альфа"]);
        let placement = classify_block(&cells).unwrap();
        assert_eq!(placement.finish, Finish::Retired);
    }

    #[test]
    fn empty_team_yields_nothing() {
        let cells = block(&["1", "101", "Иванов", "", "1990", "2"]);
        assert!(classify_block(&cells).is_none());
    }

    #[test]
    fn undersized_block_yields_nothing() {
        assert!(classify_block(&block(&["1", "101", "Иванов"])).is_none());
    }

    #[test]
    fn retired_renders_as_the_export_token() {
        assert_eq!(Finish::Retired.to_string(), "Сошел");
        assert_eq!(Finish::Place("4".into()).to_string(), "4");
    }
}
