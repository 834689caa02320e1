//! Snippet normalization and content-derived identity.
//!
//! Raw index documents are heterogeneous JSON objects; this module maps each
//! one to a uniform [`Snippet`] and assigns it a stable identifier derived
//! from the resolved text. Identical text always yields an identical id,
//! which is what makes downstream deduplication possible across repeated
//! queries without any stored mapping.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Length of the content-derived identifier.
const CONTENT_ID_LEN: usize = 8;

/// A normalized retrieved text unit.
#[derive(Debug, Clone, Serialize)]
pub struct Snippet {
    /// Display text resolved from the source document.
    pub text: String,
    /// Content-derived identifier: identical text ⇒ identical id.
    pub id: String,
    /// Raw relevance score from the index. Units depend on the search mode
    /// in effect and are not comparable across modes.
    pub similarity: f64,
}

/// Computes the content identifier for a piece of text.
///
/// First [`CONTENT_ID_LEN`] characters of the standard-base64 SHA-256 digest
/// of the text bytes, exactly as resolved (no trimming or normalization).
/// Stateless and deterministic.
#[must_use]
pub fn content_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut encoded = BASE64.encode(digest);
    encoded.truncate(CONTENT_ID_LEN);
    encoded
}

/// Normalizes one raw result document into a [`Snippet`].
///
/// Text resolution: a string value under `content_field` becomes the snippet
/// text; a missing field, a non-string value, or no configured field at all
/// falls back to the whole document rendered as compact JSON. The fallback
/// can surface structural index fields to the caller; it is kept for
/// compatibility with existing indexes that have no content field.
///
/// This function never fails; the score passes through unchanged.
#[must_use]
pub fn normalize(
    document: &serde_json::Value,
    score: f64,
    content_field: Option<&str>,
) -> Snippet {
    let text = content_field
        .and_then(|field| document.get(field))
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| document.to_string(), str::to_string);

    Snippet {
        id: content_id(&text),
        text,
        similarity: score,
    }
}

/// Collapses snippets sharing a content id, keeping the first occurrence.
///
/// Order-preserving, so with descending-relevance input the highest-scored
/// duplicate survives.
#[must_use]
pub fn dedup_snippets(snippets: Vec<Snippet>) -> Vec<Snippet> {
    let mut seen = std::collections::HashSet::new();
    snippets
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}
