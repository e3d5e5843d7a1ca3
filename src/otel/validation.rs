//! Startup checks for instrument configuration.
//!
//! The SDK replaces instruments with invalid names by no-ops and only logs
//! the problem, so names and buckets are checked before anything is built.

use std::collections::HashSet;

use crate::interfaces::{MetricsError, Result};

const MAX_NAME_LEN: usize = 255;

/// OpenTelemetry instrument name syntax: an ASCII letter followed by up to
/// 254 ASCII alphanumerics or `_`, `.`, `-`, `/`.
pub(crate) fn validate_instrument_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| MetricsError::InvalidInstrumentName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("name is empty")),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(invalid("name must start with an ASCII letter"))
        }
        Some(_) => {}
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 255 characters"));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/');
    if let Some(c) = chars.find(|&c| !allowed(c)) {
        return Err(invalid(&format!("character '{}' is not allowed", c)));
    }
    Ok(())
}

/// Buckets must be non-empty, finite and strictly increasing.
pub(crate) fn validate_buckets(instrument: &str, buckets: &[f64]) -> Result<()> {
    let invalid = |reason: String| MetricsError::InvalidBuckets {
        instrument: instrument.to_string(),
        reason,
    };

    if buckets.is_empty() {
        return Err(invalid("no boundaries configured".to_string()));
    }
    if let Some(b) = buckets.iter().find(|b| !b.is_finite()) {
        return Err(invalid(format!("boundary {} is not finite", b)));
    }
    if let Some(pair) = buckets.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(invalid(format!(
            "boundaries must be strictly increasing ({} >= {})",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

pub(crate) fn ensure_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(MetricsError::DuplicateInstrumentName(name.to_string()));
        }
    }
    Ok(())
}
