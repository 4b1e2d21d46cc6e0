//! ID prefixes, random ID generation, and protocol formatting.
//!
//! Opaque IDs look like `req-a3f8b2c1`: a three-letter prefix naming the entity
//! followed by eight hex characters drawn from OS randomness.

use crate::errors::CoreError;

pub const PREFIX_REQUEST: &str = "req";
pub const PREFIX_CATEGORY: &str = "cat";
pub const PREFIX_SECTOR: &str = "sec";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_AUDIT: &str = "aud";
pub const PREFIX_LOG: &str = "log";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_REQUEST,
    PREFIX_CATEGORY,
    PREFIX_SECTOR,
    PREFIX_USER,
    PREFIX_AUDIT,
    PREFIX_LOG,
];

/// Generate a prefixed ID. Returns e.g. `"req-a3f8b2c1"`.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut buf = [0u8; 4];
    getrandom::fill(&mut buf)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("OS randomness unavailable: {e}")))?;
    Ok(format!("{prefix}-{}", hex::encode(buf)))
}

/// Format a protocol number: four-digit year followed by a six-digit,
/// zero-padded sequence (`2025000042`).
#[must_use]
pub fn format_protocol(year: i32, sequence: u64) -> String {
    format!("{year:04}{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_id_correct_format() {
        let id = generate_id(PREFIX_REQUEST).unwrap();
        assert!(id.starts_with("req-"), "ID should start with 'req-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_id_all_prefixes() {
        for prefix in ALL_PREFIXES {
            let id = generate_id(prefix).unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[test]
    fn generate_id_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = generate_id("tst").unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[test]
    fn protocol_is_year_plus_padded_sequence() {
        assert_eq!(format_protocol(2025, 42), "2025000042");
        assert_eq!(format_protocol(2026, 1), "2026000001");
        assert_eq!(format_protocol(2026, 999_999), "2026999999");
    }
}
