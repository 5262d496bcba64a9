//! Ward census boundary support.
//!
//! This crate owns the domain-level types that describe a ward at a point in time (the
//! inpatients on it, the admission requests waiting for review and the beds that are free)
//! and the strict YAML format those are exchanged in.
//!
//! Responsibilities:
//! - define the census domain types used by `his-core`'s ward board
//! - parse census YAML with path-aware error messages
//! - validate cross-record constraints (identifier uniqueness)
//! - ship a small sample census for demos and tests
//!
//! The ward board never writes a census back to disk; [`Census::render`] exists for
//! inspection and fixtures.

pub mod admission;
pub mod census;
pub mod hhmm;
pub mod inpatient;

// Re-export facade
pub use census::Census;

// Re-export public domain-level types
pub use admission::{AdmissionRequestData, AdmissionStatus, BedData, Urgency};
pub use census::CensusData;
pub use inpatient::{
    ActiveMedication, CareTeamMember, ClinicalOrder, DischargeStatus, InpatientData,
    InpatientStatus, MedicationStatus, NoteKind, NursingLevel, OrderKind, OrderStatus,
    ProgressNote, TreatmentResponse, WardRound,
};

/// Errors returned by the `census` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Type alias for Results that can fail with a [`CensusError`].
pub type CensusResult<T> = Result<T, CensusError>;
