// src/services/mod.rs

pub mod depop;
pub mod vinted;

use uuid::Uuid;

/// Short random hex suffix for generated ids, so repeated ingestion of the
/// same identifier never collides on the product primary key.
pub(crate) fn hex_suffix(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_suffix_length_and_charset() {
        let suffix = hex_suffix(6);
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hex_suffix_varies() {
        assert_ne!(hex_suffix(8), hex_suffix(8));
    }
}
