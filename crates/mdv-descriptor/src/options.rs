#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// Insertion-ordered string-keyed option table.
///
/// Descriptor option rows read `value key comment...`; the parser
/// stores `key -> value` with the raw value token untouched so a
/// descriptor can be regenerated verbatim. Typed access goes through
/// [`OptionsBag::require_f64`] and [`OptionsBag::optional_f64`], which
/// centralize the mandatory-vs-defaulted policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsBag {
    entries: Vec<(String, String)>,
}

impl OptionsBag {
    /// Store `key -> raw`, replacing any earlier entry for `key` in
    /// place (insertion order of first appearance wins).
    pub fn insert(&mut self, key: &str, raw: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = raw.to_owned();
        } else {
            self.entries.push((key.to_owned(), raw.to_owned()));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric value for a mandatory key.
    pub fn require_f64(&self, key: &'static str) -> Result<f64, DescriptorError> {
        let raw = self
            .get(key)
            .ok_or(DescriptorError::MissingOption { key })?;
        raw.parse().map_err(|_| DescriptorError::BadOption {
            key,
            raw: raw.to_owned(),
        })
    }

    /// Numeric value for an optional key, falling back to `default`
    /// when absent. A present-but-unparsable value is still an error.
    pub fn optional_f64(&self, key: &'static str, default: f64) -> Result<f64, DescriptorError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| DescriptorError::BadOption {
                key,
                raw: raw.to_owned(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag() -> OptionsBag {
        let mut options = OptionsBag::default();
        options.insert("dtM", "0.001");
        options.insert("WtrDpth", "200");
        options.insert("WtrDnsty", "1025.0");
        options
    }

    #[test]
    fn insertion_order_and_raw_tokens_survive() {
        let options = bag();
        let entries: Vec<(&str, &str)> = options.iter().collect();
        assert_eq!(
            entries,
            vec![("dtM", "0.001"), ("WtrDpth", "200"), ("WtrDnsty", "1025.0")]
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut options = bag();
        options.insert("dtM", "0.002");
        assert_eq!(options.get("dtM"), Some("0.002"));
        assert_eq!(options.len(), 3);
        assert_eq!(options.iter().next(), Some(("dtM", "0.002")));
    }

    #[test]
    fn require_f64_on_missing_key_errors() {
        let err = bag().require_f64("dtOut").unwrap_err();
        assert!(matches!(err, DescriptorError::MissingOption { key: "dtOut" }));
    }

    #[test]
    fn optional_f64_falls_back_only_when_absent() {
        let mut options = bag();
        assert_eq!(options.optional_f64("dtOut", 0.05).unwrap(), 0.05);
        options.insert("dtOut", "0.01");
        assert_eq!(options.optional_f64("dtOut", 0.05).unwrap(), 0.01);
    }

    #[test]
    fn unparsable_value_is_an_error_even_with_default() {
        let mut options = bag();
        options.insert("dtOut", "fast");
        let err = options.optional_f64("dtOut", 0.05).unwrap_err();
        assert!(matches!(err, DescriptorError::BadOption { key: "dtOut", .. }));
    }
}
