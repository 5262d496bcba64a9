//! Tab selection.
//!
//! A tab bar is a finite set of named sections with exactly one active at a time. Switching is
//! an unguarded assignment: there is no per-tab unsaved-changes check.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A finite, ordered set of mutually exclusive sections.
///
/// Implementors must list at least one section in [`Section::ALL`]; [`Tabs::default`] opens
/// on the first entry and panics on an empty list.
pub trait Section: Copy + Eq + Debug + 'static {
    /// Every section, in display order. The first one is the default. Never empty.
    const ALL: &'static [Self];

    /// Display label.
    fn label(self) -> &'static str;

    /// Stable machine key.
    fn key(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|section| section.key() == key)
    }
}

/// The currently visible section of a tab bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tabs<S> {
    active: S,
}

impl<S: Section> Default for Tabs<S> {
    fn default() -> Self {
        Self { active: S::ALL[0] }
    }
}

impl<S: Section> Tabs<S> {
    pub fn new(active: S) -> Self {
        Self { active }
    }

    pub fn active(&self) -> S {
        self.active
    }

    pub fn is_active(&self, section: S) -> bool {
        self.active == section
    }

    /// Make `section` active. Returns `true` if the active section changed.
    pub fn select(&mut self, section: S) -> bool {
        let changed = self.active != section;
        self.active = section;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Pane {
        Left,
        Right,
    }

    impl Section for Pane {
        const ALL: &'static [Self] = &[Pane::Left, Pane::Right];

        fn label(self) -> &'static str {
            match self {
                Pane::Left => "左",
                Pane::Right => "右",
            }
        }

        fn key(self) -> &'static str {
            match self {
                Pane::Left => "left",
                Pane::Right => "right",
            }
        }
    }

    #[test]
    fn defaults_to_first_section() {
        let tabs: Tabs<Pane> = Tabs::default();
        assert_eq!(tabs.active(), Pane::Left);
    }

    #[test]
    fn select_switches_exactly_one_active() {
        let mut tabs: Tabs<Pane> = Tabs::default();
        assert!(tabs.select(Pane::Right));
        assert!(tabs.is_active(Pane::Right));
        assert!(!tabs.is_active(Pane::Left));
        assert!(!tabs.select(Pane::Right));
    }

    #[test]
    fn tab_bars_have_a_default_section() {
        assert!(!crate::ward::WardTab::ALL.is_empty());
        assert!(!crate::forms::medical_record::RecordTab::ALL.is_empty());
        for tab in crate::forms::medical_record::RecordTab::ALL {
            assert_eq!(
                crate::forms::medical_record::RecordTab::from_key(tab.key()),
                Some(*tab)
            );
        }
    }

    #[test]
    fn from_key_finds_sections() {
        assert_eq!(Pane::from_key("right"), Some(Pane::Right));
        assert_eq!(Pane::from_key("up"), None);
    }
}
