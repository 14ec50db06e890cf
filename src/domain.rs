use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MerchantId(String);

impl MerchantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MerchantId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Transaction identifier. Discovered ids are UUID-shaped; configured ids are
/// only checked for path safety and otherwise fail when the API rejects them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    pub const LEN: usize = 36;

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_canonical(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .chars()
                .all(|ch| matches!(ch, 'a'..='f' | '0'..='9' | '-'))
    }

    /// Leading `len` characters, for progress lines.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compound plan identifier such as `m:30:plan/v1`, only known after a
/// merchant's plan list has been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey(String);

impl PlanKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use as a single URL path segment.
    pub fn path_segment(&self) -> String {
        encode_path_segment(&self.0)
    }

    /// File name stem with path and drive separators replaced.
    pub fn file_stem(&self) -> String {
        self.0.replace([':', '/'], "_")
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `value` stays a single file name when joined under a data
/// directory.
pub fn is_path_safe(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '\\']) && !value.contains("..")
}

pub fn encode_path_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.as_bytes() {
        let ch = *byte as char;
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == '~' {
            out.push(ch);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_key_file_stem_replaces_separators() {
        let key = PlanKey::new("m:30:plan/v1");
        assert_eq!(key.file_stem(), "m_30_plan_v1");
    }

    #[test]
    fn plan_key_path_segment_is_percent_encoded() {
        let key = PlanKey::new("m:30:plan/v1");
        assert_eq!(key.path_segment(), "m%3A30%3Aplan%2Fv1");
    }

    #[test]
    fn encode_keeps_unreserved_and_escapes_utf8_bytes() {
        assert_eq!(encode_path_segment("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_path_segment("a b"), "a%20b");
        assert_eq!(encode_path_segment("é"), "%C3%A9");
    }

    #[test]
    fn transaction_id_shape() {
        let id = TransactionId::new("dd129486-0b41-4b60-b023-b84834eb88d1");
        assert!(id.is_canonical());
        assert_eq!(id.short(8), "dd129486");
        assert!(!TransactionId::new("DD129486-0B41-4B60-B023-B84834EB88D1").is_canonical());
        assert!(!TransactionId::new("dd129486").is_canonical());
        assert_eq!(TransactionId::new("abc").short(12), "abc");
    }

    #[test]
    fn path_safety() {
        assert!(is_path_safe("dd129486-0b41-4b60-b023-b84834eb88d1"));
        assert!(is_path_safe("243"));
        assert!(!is_path_safe(""));
        assert!(!is_path_safe("../../x"));
        assert!(!is_path_safe("a/b"));
        assert!(!is_path_safe("a\\b"));
        assert!(!is_path_safe(".."));
    }

    #[test]
    fn merchant_id_from_number() {
        assert_eq!(MerchantId::from(243).as_str(), "243");
        assert_eq!(MerchantId::new(" 30 ").as_str(), "30");
    }
}
