//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the forms and the ward
//! board. Nothing in this crate reads environment variables while an edit is being applied.

use crate::constants::DEFAULT_RECORDING_CLINICIAN;
use crate::{FormError, FormResult, NonEmptyText};
use census::{Census, CensusData};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    recording_clinician: String,
    census_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            recording_clinician: DEFAULT_RECORDING_CLINICIAN.to_string(),
            census_path: None,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidInput`] if `recording_clinician` is blank.
    pub fn new(recording_clinician: &str, census_path: Option<PathBuf>) -> FormResult<Self> {
        let recording_clinician = NonEmptyText::new(recording_clinician).map_err(|_| {
            FormError::InvalidInput("recording clinician cannot be empty".into())
        })?;

        Ok(Self {
            recording_clinician: recording_clinician.into_inner(),
            census_path,
        })
    }

    /// Name stamped on new medical records.
    pub fn recording_clinician(&self) -> &str {
        &self.recording_clinician
    }

    pub fn census_path(&self) -> Option<&Path> {
        self.census_path.as_deref()
    }

    /// Load the configured census, or the bundled sample when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FileRead`] if the file cannot be read and
    /// [`FormError::Census`] if it does not parse.
    pub fn load_census(&self) -> FormResult<CensusData> {
        match &self.census_path {
            Some(path) => {
                tracing::debug!("loading census from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(FormError::FileRead)?;
                Ok(Census::parse(&text)?)
            }
            None => {
                tracing::debug!("no census path configured, using bundled sample");
                Ok(Census::sample()?)
            }
        }
    }
}

/// Normalise an optional clinician value. Blank or missing means the default clinician.
pub fn clinician_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_RECORDING_CLINICIAN.to_string())
}

/// Normalise an optional census path value. Blank or missing means "use the sample".
pub fn census_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
