// src/extract/mod.rs

pub mod classify;
pub mod locate;
pub mod segment;

use anyhow::Result;
use tracing::debug;

use crate::encoding;
use crate::markup::{Document, Element};

pub use classify::{classify_block, Finish, Placement};

/// Run the whole per-document pipeline on one raw byte buffer: decode,
/// parse, locate data rows, segment, classify. Pair order follows table
/// order in the document, then block order within each row.
///
/// Errors only on undecodable input; anything structural (no qualifying
/// tables, malformed blocks) just thins the output.
#[tracing::instrument(level = "info", skip(bytes), fields(source = %source, len = bytes.len()))]
pub fn extract_pairs(source: &str, bytes: &[u8]) -> Result<Vec<Placement>> {
    let decoded = encoding::resolve(bytes)?;
    debug!(charset = decoded.charset.label(), "decoded");
    let doc = Document::parse(&decoded.text);
    Ok(extract_from_root(&doc.root()))
}

/// Extraction over an already-parsed markup tree.
pub fn extract_from_root<E: Element>(root: &E) -> Vec<Placement> {
    let mut pairs = Vec::new();
    for row in locate::data_rows(root) {
        for block in segment::blocks(&row) {
            if let Some(placement) = classify_block(block) {
                pairs.push(placement);
            }
        }
    }
    pairs
}
