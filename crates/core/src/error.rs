/// Errors raised while editing a form or driving the ward board.
///
/// Duplicate tag additions and removals of unknown entries are not errors; they are silent
/// no-ops reported as "no change" by the reducers.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{field}: '{input}' is not a valid number")]
    InvalidNumber { field: &'static str, input: String },
    #[error("{field}: '{input}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, input: String },
    #[error("{field}: '{input}' is not a valid time (expected HH:MM)")]
    InvalidTime { field: &'static str, input: String },
    #[error("{0} does not apply to this form")]
    NotApplicable(&'static str),

    #[error("unknown inpatient: {0}")]
    UnknownInpatient(String),
    #[error("unknown admission request: {0}")]
    UnknownRequest(String),
    #[error("admission request {id} is already {status}")]
    RequestNotPending {
        id: String,
        status: census::AdmissionStatus,
    },
    #[error("bed {0} is not available")]
    BedUnavailable(String),
    #[error("inpatient {0} is already discharged")]
    AlreadyDischarged(String),

    #[error("census error: {0}")]
    Census(#[from] census::CensusError),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
