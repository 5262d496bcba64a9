//! # HIS Core
//!
//! Form state and reducers for the hospital information system's editing screens.
//!
//! This crate contains pure, synchronous draft operations:
//! - the social history and inpatient medical record forms, edited through typed actions
//! - the inpatient ward board with its filter bar, modal selection and admission workflow
//! - the shared field primitives those are built from (tag sets, identified entry lists,
//!   tabs, raw input conversion, pack-years)
//!
//! **No persistence or rendering**: a [`FormSession`] reports changes, saves and closes to a
//! [`FormHost`]; what the host does with them is outside this crate. Census files are only
//! ever read.

pub mod config;
pub mod constants;
pub mod entries;
pub mod error;
pub mod filter;
pub mod forms;
pub mod host;
pub mod input;
pub mod pack_years;
pub mod sections;
pub mod tags;
pub mod ward;

pub use config::CoreConfig;
pub use error::{FormError, FormResult};
pub use host::{Form, FormHost, FormSession, HostEvent, RecordingHost, TracingHost};

pub use entries::{EntryList, LabTest, LabTestStatus, MedicationOrder};
pub use filter::{FilterCriteria, StatusFilter};
pub use forms::medical_record::{PatientInfo, RecordSeed, RecordSummary, RecordType};
pub use forms::social_history::{TagField, UseStatus};
pub use forms::{
    MedicalRecord, MedicalRecordForm, RecordAction, RecordField, SocialHistory,
    SocialHistoryAction, SocialHistoryField, SocialHistoryForm,
};
pub use sections::{Section, Tabs};
pub use tags::TagSet;
pub use ward::{CarePlanUpdate, InpatientModal, WardBoard, WardModal, WardTab};

pub use his_types::NonEmptyText;
pub use his_uuid::EntryId;
