//! Option lists with stable per-option identity.
//!
//! Several options may share a raw value (a relation returning duplicates, or `""` placeholders),
//! so options are identified by their position. The DOM `<select>` needs string values; the
//! encoding `prefix + raw + "_idx" + index` is produced and parsed only at that boundary.

use std::sync::OnceLock;

use crud_contract::{FieldValue, SelectOption, TranslatableValue};
use regex::Regex;

/// Marker separating the raw value from the option index in DOM values.
pub const OPTION_INDEX_MARKER: &str = "_idx";

fn index_suffix() -> Option<&'static Regex> {
    static SUFFIX: OnceLock<Option<Regex>> = OnceLock::new();
    SUFFIX
        .get_or_init(|| Regex::new(r"_idx(\d+)$").ok())
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An option paired with its position in the list.
pub struct IndexedOption {
    /// Position in the loaded list.
    pub index: usize,
    /// Raw value submitted to the backend.
    pub value: String,
    /// Display label.
    pub label: TranslatableValue,
}

impl IndexedOption {
    /// DOM `value` attribute for this option.
    pub fn dom_value(&self, prefix: &str) -> String {
        encode_option_value(prefix, &self.value, self.index)
    }
}

/// Builds the DOM value `prefix + raw + "_idx" + index`.
pub fn encode_option_value(prefix: &str, raw: &str, index: usize) -> String {
    format!("{prefix}{raw}{OPTION_INDEX_MARKER}{index}")
}

/// Splits a DOM value back into `(raw, index)`.
///
/// Only the trailing `_idx<digits>` is stripped, so raw values that themselves contain `_idx`
/// survive. Returns `None` when the prefix or suffix is missing.
pub fn decode_option_value(prefix: &str, dom_value: &str) -> Option<(String, usize)> {
    let rest = dom_value.strip_prefix(prefix)?;
    let captures = index_suffix()?.captures(rest)?;
    let whole = captures.get(0)?;
    let index = captures.get(1)?.as_str().parse().ok()?;
    Some((rest[..whole.start()].to_string(), index))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Loaded options of one field.
pub struct OptionList {
    options: Vec<IndexedOption>,
}

impl OptionList {
    /// Indexes `options` in order.
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options: options
                .into_iter()
                .enumerate()
                .map(|(index, option)| IndexedOption {
                    index,
                    value: option.value,
                    label: option.label,
                })
                .collect(),
        }
    }

    /// Iterates options in order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedOption> {
        self.options.iter()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` when there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// First option whose raw value equals `raw`.
    pub fn find_raw(&self, raw: &str) -> Option<&IndexedOption> {
        self.options.iter().find(|option| option.value == raw)
    }

    /// Option selected by a DOM value; the index wins over the raw value when both are present.
    pub fn find_dom(&self, prefix: &str, dom_value: &str) -> Option<&IndexedOption> {
        let (raw, index) = decode_option_value(prefix, dom_value)?;
        self.options
            .get(index)
            .filter(|option| option.value == raw)
            .or_else(|| self.find_raw(&raw))
    }

    /// Options matching the current field value (all list entries for multi-selects).
    pub fn selected(&self, value: &FieldValue) -> Vec<&IndexedOption> {
        value
            .clone()
            .into_list()
            .iter()
            .filter_map(|raw| self.find_raw(raw))
            .collect()
    }

    /// Label for `raw`, resolved for `locale`; falls back to the raw value.
    pub fn label_for(&self, raw: &str, locale: &str) -> String {
        self.find_raw(raw)
            .map(|option| option.label.resolve(locale))
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_recovers_raw_values_containing_the_marker() {
        for raw in ["", "7", "a_idx", "a_idxb", "a_idx5_x", "مدني"] {
            let encoded = encode_option_value("status_", raw, 12);
            assert_eq!(
                decode_option_value("status_", &encoded),
                Some((raw.to_string(), 12)),
                "raw value {raw:?}"
            );
        }
        assert_eq!(decode_option_value("status_", "status_open"), None);
        assert_eq!(decode_option_value("status_", "court_1_idx0"), None);
    }

    #[test]
    fn duplicate_raw_values_keep_distinct_identity() {
        let list = OptionList::new(vec![
            SelectOption::new("1", "Cairo"),
            SelectOption::new("1", "Cairo (old)"),
            SelectOption::new("2", "Giza"),
        ]);
        let second = list.find_dom("court_", "court_1_idx1").expect("option");
        assert_eq!(second.label.resolve("en"), "Cairo (old)");
        let stale_index = list.find_dom("court_", "court_2_idx9").expect("fallback");
        assert_eq!(stale_index.index, 2);
    }

    #[test]
    fn numeric_values_match_string_options() {
        let list = OptionList::new(vec![SelectOption::new("3", "Civil")]);
        assert_eq!(list.selected(&FieldValue::from(3_i64)).len(), 1);
        assert_eq!(list.label_for("3", "en"), "Civil");
        assert_eq!(list.label_for("4", "en"), "4");
    }
}
