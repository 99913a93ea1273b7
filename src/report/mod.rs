// src/report/mod.rs

use std::io::Write;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::aggregate::TeamResults;
use crate::extract::Finish;

/// Only this many finishes per team make it into the report; anything
/// beyond is dropped silently.
pub const MAX_PLACES: usize = 20;

static NUMBERED_TEAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("team numbering pattern should parse"));

/// Ordering key for team names. Names like "3. Омега" sort by their
/// number, then the lower-cased remainder; unnumbered names sort after
/// every numbered one, alphabetically among themselves.
pub fn sort_key(team: &str) -> (u64, String) {
    if let Some(caps) = NUMBERED_TEAM.captures(team) {
        if let Ok(number) = caps[1].parse::<u64>() {
            return (number, caps[2].to_lowercase());
        }
    }
    (u64::MAX, team.to_lowercase())
}

/// One rendered report row: team, participant count, then exactly
/// `MAX_PLACES` place columns, blank-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub team: String,
    pub participants: usize,
    pub places: Vec<String>,
}

/// Flatten the aggregated mapping into report rows ordered by `sort_key`.
pub fn report_rows(results: &TeamResults) -> Vec<ReportRow> {
    let mut teams: Vec<&String> = results.iter().map(|(team, _)| team).collect();
    teams.sort_by_key(|team| sort_key(team));

    teams
        .into_iter()
        .map(|team| {
            let finishes = results.get(team).unwrap_or(&[]);
            let mut places: Vec<String> = finishes
                .iter()
                .take(MAX_PLACES)
                .map(Finish::to_string)
                .collect();
            places.resize(MAX_PLACES, String::new());
            ReportRow {
                team: team.clone(),
                participants: finishes.len(),
                places,
            }
        })
        .collect()
}

/// Write the rows as CSV: a header ["Команда", "Кол-во участников",
/// "1".."20"], then one record per team.
pub fn write_csv<W: Write>(rows: &[ReportRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["Команда".to_string(), "Кол-во участников".to_string()];
    header.extend((1..=MAX_PLACES).map(|i| i.to_string()));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.team.clone(), row.participants.to_string()];
        record.extend(row.places.iter().cloned());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
