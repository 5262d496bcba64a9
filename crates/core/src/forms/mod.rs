//! Form drafts and their reducers.
//!
//! Each form is a plain struct implementing [`crate::Form`]. Edits arrive as one typed
//! action enum per form; there is no string-keyed field update.

pub mod medical_record;
pub mod social_history;

pub use medical_record::{MedicalRecord, MedicalRecordForm, RecordAction, RecordField};
pub use social_history::{SocialHistory, SocialHistoryAction, SocialHistoryField, SocialHistoryForm};

/// Assign `value` to `slot`, reporting whether anything changed.
pub(crate) fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
