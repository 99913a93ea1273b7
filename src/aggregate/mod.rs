// src/aggregate/mod.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::extract::{self, Finish, Placement};

/// Append-only mapping team → ordered finish list, built over a whole
/// batch. Entries append in file order, then table/block order within a
/// file; nothing is removed or reordered here (ordering for the report
/// happens at report time). A team showing up in several tables of one
/// file keeps appending to the same list — multi-event exports repeat
/// team names and the duplicates are wanted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeamResults {
    teams: BTreeMap<String, Vec<Finish>>,
}

impl TeamResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, team: String, finish: Finish) {
        self.teams.entry(team).or_default().push(finish);
    }

    pub fn extend(&mut self, pairs: Vec<Placement>) {
        for pair in pairs {
            self.append(pair.team, pair.finish);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Finish>)> {
        self.teams.iter()
    }

    pub fn get(&self, team: &str) -> Option<&[Finish]> {
        self.teams.get(team).map(Vec::as_slice)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn participant_count(&self) -> usize {
        self.teams.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Aggregate over in-memory documents, in the given order.
pub fn aggregate_documents<I, B>(documents: I) -> TeamResults
where
    I: IntoIterator<Item = (String, B)>,
    B: AsRef<[u8]>,
{
    let mut results = TeamResults::new();
    for (source, bytes) in documents {
        results.extend(extract_document(&source, bytes.as_ref()));
    }
    results
}

/// Read and aggregate a batch of files. Per-file extraction is pure, so
/// the files are parsed on the rayon pool; merging runs strictly in input
/// order to keep the append order deterministic. A missing or unreadable
/// file is logged and skipped, never fatal.
pub fn aggregate_files(paths: &[PathBuf]) -> TeamResults {
    let per_file: Vec<Option<Vec<Placement>>> =
        paths.par_iter().map(|path| read_and_extract(path)).collect();

    let mut results = TeamResults::new();
    for pairs in per_file.into_iter().flatten() {
        results.extend(pairs);
    }
    results
}

fn read_and_extract(path: &Path) -> Option<Vec<Placement>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot read file, skipping");
            return None;
        }
    };
    Some(extract_document(&path.display().to_string(), &bytes))
}

/// Extract one document, downgrading failure to an empty pair list; a
/// file nothing can be decoded from contributes nothing and the batch
/// carries on.
fn extract_document(source: &str, bytes: &[u8]) -> Vec<Placement> {
    match extract::extract_pairs(source, bytes) {
        Ok(pairs) => {
            info!(source, pairs = pairs.len(), "extracted");
            pairs
        }
        Err(err) => {
            warn!(source, %err, "unreadable document, skipping");
            Vec::new()
        }
    }
}
