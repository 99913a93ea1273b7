// src/encoding/mod.rs

use std::borrow::Cow;

use encoding_rs::{Encoding, KOI8_R, UTF_8, WINDOWS_1251};
use thiserror::Error;
use tracing::debug;

/// How many leading bytes are searched for a declared `charset=` token.
const SNIFF_LEN: usize = 1000;

/// A decoded candidate carrying at least this many U+FFFD markers is
/// rejected as too degraded.
const MAX_REPLACEMENT_MARKERS: usize = 10;

/// Candidate order once the declared charset (if any) has been tried.
const FALLBACK_ORDER: [Charset; 4] = [
    Charset::Cp1251,
    Charset::Utf8,
    Charset::Koi8R,
    Charset::Latin1,
];

/// The encodings the timing-software exports show up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Cp1251,
    Utf8,
    Koi8R,
    Latin1,
}

impl Charset {
    pub fn label(self) -> &'static str {
        match self {
            Charset::Cp1251 => "cp1251",
            Charset::Utf8 => "utf-8",
            Charset::Koi8R => "koi8-r",
            Charset::Latin1 => "latin-1",
        }
    }

    /// Strict decode: `None` on any invalid byte sequence.
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Cp1251 => decode_strict(WINDOWS_1251, bytes),
            Charset::Utf8 => decode_strict(UTF_8, bytes),
            Charset::Koi8R => decode_strict(KOI8_R, bytes),
            // Total byte → U+00xx mapping; cannot fail.
            Charset::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty input buffer")]
    EmptyInput,
    #[error("no candidate encoding produced usable text")]
    NoUsableEncoding,
}

/// Text recovered from a raw buffer, with the encoding that won.
#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub charset: Charset,
}

/// Search the file header for a declared `charset=` token. Non-ASCII
/// bytes are dropped before matching, the way a permissive 7-bit read of
/// the header sees it.
fn declared_charset(bytes: &[u8]) -> Option<Charset> {
    let header: String = bytes
        .iter()
        .take(SNIFF_LEN)
        .filter(|b| b.is_ascii())
        .map(|&b| b.to_ascii_lowercase() as char)
        .collect();

    if header.contains("charset=windows-1251") || header.contains("charset=cp1251") {
        Some(Charset::Cp1251)
    } else if header.contains("charset=utf-8") {
        Some(Charset::Utf8)
    } else if header.contains("charset=koi8-r") {
        Some(Charset::Koi8R)
    } else {
        None
    }
}

/// Decode `bytes`, trying the declared charset first and then the fixed
/// fallback order. A candidate wins when it decodes without error and the
/// result carries fewer than `MAX_REPLACEMENT_MARKERS` replacement chars.
/// latin-1 is total over bytes, so the chain cannot run dry on non-empty
/// input; `NoUsableEncoding` stays representable all the same.
pub fn resolve(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let candidates = declared_charset(bytes).into_iter().chain(FALLBACK_ORDER);
    for charset in candidates {
        let Some(text) = charset.decode(bytes) else {
            debug!(charset = charset.label(), "decode failed");
            continue;
        };
        let markers = text.matches('\u{FFFD}').count();
        if markers >= MAX_REPLACEMENT_MARKERS {
            debug!(charset = charset.label(), markers, "decode too degraded");
            continue;
        }
        return Ok(DecodedText { text, charset });
    }

    Err(DecodeError::NoUsableEncoding)
}
