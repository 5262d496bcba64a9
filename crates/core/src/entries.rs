//! Repeatable-record fields.
//!
//! An [`EntryList`] is an ordered list of structured records (medication orders, lab tests)
//! where every record carries an [`EntryId`] assigned when it was appended. Removal and
//! update go through that id, so they are unaffected by earlier removals shifting positions.

use chrono::NaiveDate;
use his_uuid::EntryId;
use serde::{Deserialize, Serialize};

/// Records that can be appended as a blank row.
pub trait BlankEntry {
    /// A record with every field at its default: empty text, `today` for dates, and the
    /// fixed default for enumerations.
    fn blank(today: NaiveDate) -> Self;
}

/// One record plus its stable identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    pub id: EntryId,
    #[serde(flatten)]
    pub value: T,
}

/// Ordered list of identified records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> EntryList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under a fresh id. No validation is applied.
    pub fn push(&mut self, value: T) -> EntryId {
        let id = EntryId::new();
        self.entries.push(Entry { id, value });
        id
    }

    /// Remove the entry with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).value)
    }

    /// Replace the value of the entry with `id`. Returns `false` for unknown ids.
    pub fn update(&mut self, id: EntryId, value: T) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.value)
    }

    /// Current display position of `id`.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: BlankEntry> EntryList<T> {
    /// Append a blank record and return its id.
    pub fn append_blank(&mut self, today: NaiveDate) -> EntryId {
        self.push(T::blank(today))
    }
}

impl<T> FromIterator<T> for EntryList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = EntryList::new();
        for value in iter {
            list.push(value);
        }
        list
    }
}

/// A medication order row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationOrder {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: String,
    pub duration: String,
}

impl BlankEntry for MedicationOrder {
    fn blank(_today: NaiveDate) -> Self {
        Self::default()
    }
}

impl MedicationOrder {
    /// Single-line form used in summaries: fields separated by spaces, empty ones skipped.
    pub fn summary_line(&self) -> String {
        [
            &self.name,
            &self.dosage,
            &self.frequency,
            &self.route,
            &self.duration,
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabTestStatus {
    #[default]
    Pending,
    Ordered,
    Completed,
    Cancelled,
}

/// A lab test or examination request row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTest {
    pub name: String,
    pub date: NaiveDate,
    pub status: LabTestStatus,
}

impl BlankEntry for LabTest {
    fn blank(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            date: today,
            status: LabTestStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn order(name: &str) -> MedicationOrder {
        MedicationOrder {
            name: name.into(),
            ..MedicationOrder::default()
        }
    }

    #[test]
    fn append_then_remove_is_a_no_op() {
        let mut list: EntryList<MedicationOrder> =
            [order("氨氯地平片"), order("头孢曲松")].into_iter().collect();
        let before = list.clone();

        let id = list.append_blank(day());
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(id), Some(&MedicationOrder::default()));

        assert_eq!(list.remove(id), Some(MedicationOrder::default()));
        assert_eq!(list, before);
    }

    #[test]
    fn ids_survive_earlier_removals() {
        let mut list = EntryList::new();
        let first = list.push(order("a"));
        let second = list.push(order("b"));
        let third = list.push(order("c"));

        list.remove(first);
        assert_eq!(list.position(third), Some(1));
        assert!(list.update(third, order("c2")));
        assert_eq!(list.get(third).map(|o| o.name.as_str()), Some("c2"));
        assert_eq!(list.get(second).map(|o| o.name.as_str()), Some("b"));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut list: EntryList<MedicationOrder> = EntryList::new();
        list.push(order("a"));
        let stranger = EntryId::new();
        assert_eq!(list.remove(stranger), None);
        assert!(!list.update(stranger, order("b")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn blank_lab_test_defaults_to_today_and_pending() {
        let mut list: EntryList<LabTest> = EntryList::new();
        let id = list.append_blank(day());
        let test = list.get(id).unwrap();
        assert!(test.name.is_empty());
        assert_eq!(test.date, day());
        assert_eq!(test.status, LabTestStatus::Pending);
    }

    #[test]
    fn medication_summary_skips_empty_parts() {
        let med = MedicationOrder {
            name: "布洛芬".into(),
            dosage: "400mg".into(),
            route: "口服".into(),
            ..MedicationOrder::default()
        };
        assert_eq!(med.summary_line(), "布洛芬 400mg 口服");
    }

    #[test]
    fn serializes_entries_with_inline_fields() {
        let mut list = EntryList::new();
        let id = list.push(order("布洛芬"));
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["id"], id.to_string());
        assert_eq!(json[0]["name"], "布洛芬");

        let back: EntryList<MedicationOrder> = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }
}
