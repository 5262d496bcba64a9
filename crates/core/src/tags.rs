//! Tag-set fields.
//!
//! A tag set is an insertion-ordered list of distinct strings, edited by adding a preset or
//! free-text value and removing by position. Duplicate detection is an exact string match:
//! no trimming and no case folding, so `" 粉尘"` and `"粉尘"` are different tags.

use serde::{Deserialize, Deserializer, Serialize};

/// Insertion-ordered set of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` unless it is empty or already present.
    ///
    /// Returns `true` if the set changed. Rejected candidates are dropped silently.
    pub fn add(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        if candidate.is_empty() || self.contains(&candidate) {
            tracing::debug!(tag = %candidate, "tag not added (empty or duplicate)");
            return false;
        }
        self.0.push(candidate);
        true
    }

    /// Remove the tag at `index`, keeping the order of the rest.
    ///
    /// An out-of-range index is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// True when a preset button should be shown as already selected (disabled).
    pub fn is_preset_selected(&self, preset: &str) -> bool {
        self.contains(preset)
    }

    /// Presets from `palette` that can still be added, in palette order.
    pub fn available_presets<'p>(&self, palette: &[&'p str]) -> Vec<&'p str> {
        palette
            .iter()
            .copied()
            .filter(|preset| !self.contains(preset))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    /// Collects through [`TagSet::add`], so empties and duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.add(tag);
        }
        set
    }
}

impl<'de> Deserialize<'de> for TagSet {
    /// Incoming arrays are collected through [`TagSet::add`] so the invariant holds for
    /// snapshots and scripts too.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Vec::<String>::deserialize(deserializer)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OCCUPATIONAL_EXPOSURES;

    #[test]
    fn add_is_idempotent() {
        let mut set: TagSet = ["粉尘", "噪音"].into_iter().collect();
        let before = set.clone();
        assert!(!set.add("粉尘"));
        assert_eq!(set, before);
    }

    #[test]
    fn add_ignores_empty_candidate() {
        let mut set = TagSet::new();
        assert!(!set.add(""));
        assert!(set.is_empty());
    }

    #[test]
    fn add_then_remove_restores_original() {
        let original: TagSet = ["粉尘", "噪音"].into_iter().collect();
        let mut set = original.clone();
        assert!(set.add("辐射"));
        let index = set.len() - 1;
        assert_eq!(set.remove_at(index).as_deref(), Some("辐射"));
        assert_eq!(set, original);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut set: TagSet = ["a", "b", "c", "d"].into_iter().collect();
        set.remove_at(1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "c", "d"]);
        assert_eq!(set.remove_at(10), None);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn duplicate_detection_is_exact() {
        let mut set: TagSet = ["粉尘"].into_iter().collect();
        assert!(set.add(" 粉尘"));
        assert!(set.add("Dust"));
        assert!(set.add("dust"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn available_presets_excludes_selected() {
        let set: TagSet = ["噪音", "自定义"].into_iter().collect();
        let available = set.available_presets(OCCUPATIONAL_EXPOSURES);
        assert!(!available.contains(&"噪音"));
        assert_eq!(available.len(), OCCUPATIONAL_EXPOSURES.len() - 1);
        assert!(set.is_preset_selected("噪音"));
    }

    #[test]
    fn deserialize_drops_duplicates() {
        let set: TagSet = serde_json::from_str(r#"["啤酒","啤酒","","红酒"]"#).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["啤酒", "红酒"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let set: TagSet = ["卷烟", "雪茄"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["卷烟","雪茄"]"#);
    }
}
