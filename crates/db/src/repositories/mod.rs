//! Repositories for database operations.

pub mod enquiry;
pub mod order;
pub mod professional;

pub use enquiry::{EnquiryFilter, EnquiryRepository, NewEnquiry};
pub use order::{NewOrder, OrderFilter, OrderRepository};
pub use professional::{
    NewProfessional, ProfessionType, ProfessionalFilter, ProfessionalRepository,
};

use tracing::warn;

/// Decode a stored JSON language list.
///
/// Malformed storage is not an error: the row stays readable and the list
/// reads as empty. The defect is logged so it can be repaired.
pub(crate) fn decode_languages(table: &'static str, id: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(languages) => languages,
        Err(e) => {
            warn!(table, id, error = %e, "Malformed language list in storage, reading as empty");
            Vec::new()
        }
    }
}

/// Encode a language list for storage.
pub(crate) fn encode_languages(languages: &[String]) -> String {
    serde_json::to_string(languages).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_roundtrips_encode() {
        let languages = vec!["english".to_string(), "arabic".to_string()];
        let raw = encode_languages(&languages);
        assert_eq!(decode_languages("professional", "x", &raw), languages);
    }

    #[test]
    fn malformed_storage_reads_as_empty() {
        assert!(decode_languages("professional", "x", "not json").is_empty());
        assert!(decode_languages("professional", "x", "{\"a\":1}").is_empty());
    }
}
