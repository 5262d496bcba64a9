//! Census YAML parsing and rendering.
//!
//! A census file is a single YAML mapping:
//!
//! ```yaml
//! inpatients: [...]
//! admission_requests: [...]
//! available_beds: [...]
//! ```
//!
//! All three keys are optional and default to empty lists. Unknown keys are rejected at every
//! level so that a typo in a census file fails loudly instead of silently dropping data.

use crate::{AdmissionRequestData, BedData, CensusError, CensusResult, InpatientData};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SAMPLE_CENSUS_YAML: &str = include_str!("../fixtures/ward_sample.yaml");

/// Domain-level carrier for one ward census.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CensusData {
    #[serde(default)]
    pub inpatients: Vec<InpatientData>,
    #[serde(default)]
    pub admission_requests: Vec<AdmissionRequestData>,
    #[serde(default)]
    pub available_beds: Vec<BedData>,
}

/// Census operations.
///
/// Zero-sized namespace; all methods are associated functions.
pub struct Census;

impl Census {
    /// Parse a census from YAML text.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch names the failing field, for example
    /// `inpatients[1].status`.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Translation`] if the YAML does not match the schema and
    /// [`CensusError::DuplicateId`] if two inpatients, requests or beds share an id.
    pub fn parse(yaml_text: &str) -> CensusResult<CensusData> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let data = match serde_path_to_error::deserialize::<_, CensusData>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(CensusError::Translation(format!(
                    "Census schema mismatch at {path}: {source}"
                )));
            }
        };

        validate(&data)?;
        Ok(data)
    }

    /// Render a census as YAML text.
    pub fn render(data: &CensusData) -> CensusResult<String> {
        serde_yaml::to_string(data)
            .map_err(|e| CensusError::Translation(format!("Failed to serialize census: {e}")))
    }

    /// The bundled sample census: two inpatients, two pending requests and three free beds.
    pub fn sample() -> CensusResult<CensusData> {
        Self::parse(SAMPLE_CENSUS_YAML)
    }
}

fn validate(data: &CensusData) -> CensusResult<()> {
    ensure_unique("inpatient", data.inpatients.iter().map(|p| p.id.as_str()))?;
    ensure_unique(
        "admission request",
        data.admission_requests.iter().map(|r| r.id.as_str()),
    )?;
    ensure_unique("bed", data.available_beds.iter().map(|b| b.id.as_str()))?;
    Ok(())
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> CensusResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CensusError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}
