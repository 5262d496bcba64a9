//! Inpatient domain types.
//!
//! An [`InpatientData`] is one occupied bed on the ward list: who the patient is, where they
//! are, who is looking after them and what is currently ordered.

use chrono::{NaiveDate, NaiveTime};
use his_types::{NonEmptyText, Sex, VitalSigns};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CensusError;

/// Clinical status shown on the ward list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InpatientStatus {
    Admitted,
    Critical,
    Stable,
    Improving,
    Discharged,
    Transferred,
}

impl InpatientStatus {
    pub const ALL: &'static [InpatientStatus] = &[
        InpatientStatus::Admitted,
        InpatientStatus::Critical,
        InpatientStatus::Stable,
        InpatientStatus::Improving,
        InpatientStatus::Discharged,
        InpatientStatus::Transferred,
    ];

    /// Ward list label.
    pub fn label(self) -> &'static str {
        match self {
            InpatientStatus::Admitted => "已入院",
            InpatientStatus::Critical => "危重",
            InpatientStatus::Stable => "稳定",
            InpatientStatus::Improving => "好转中",
            InpatientStatus::Discharged => "已出院",
            InpatientStatus::Transferred => "已转科",
        }
    }

    /// Wire key, matching the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            InpatientStatus::Admitted => "admitted",
            InpatientStatus::Critical => "critical",
            InpatientStatus::Stable => "stable",
            InpatientStatus::Improving => "improving",
            InpatientStatus::Discharged => "discharged",
            InpatientStatus::Transferred => "transferred",
        }
    }
}

impl fmt::Display for InpatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InpatientStatus {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InpatientStatus::ALL
            .iter()
            .copied()
            .find(|status| status.key() == s || status.label() == s)
            .ok_or_else(|| CensusError::InvalidInput(format!("unknown inpatient status '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NursingLevel {
    Standard,
    Intermediate,
    Intensive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentResponse {
    Good,
    Fair,
    Poor,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DischargeStatus {
    Pending,
    Planned,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Active,
    Discontinued,
    Completed,
}

/// A medication currently charted for an inpatient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActiveMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: MedicationStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CareTeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Medication,
    Lab,
    Imaging,
    Procedure,
    Nursing,
    Diet,
    Activity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClinicalOrder {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub name: String,
    pub status: OrderStatus,
    pub ordered_date: NaiveDate,
    pub ordered_by: String,
    pub details: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Doctor,
    Nurse,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgressNote {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "crate::hhmm")]
    pub time: NaiveTime,
    pub author: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

/// The most recent ward round for a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WardRound {
    pub date: NaiveDate,
    #[serde(with = "crate::hhmm")]
    pub time: NaiveTime,
    pub doctor: String,
    pub notes: String,
}

/// One inpatient on the ward list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InpatientData {
    pub id: NonEmptyText,
    pub patient_id: NonEmptyText,
    pub patient_name: NonEmptyText,
    pub age: u32,
    pub sex: Sex,
    pub admission_date: NaiveDate,
    #[serde(with = "crate::hhmm")]
    pub admission_time: NaiveTime,
    pub ward: String,
    pub room: String,
    pub bed_number: String,
    pub diagnosis: Vec<String>,
    /// Attending doctor.
    pub doctor: String,
    pub department: String,
    pub status: InpatientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_discharge_date: Option<NaiveDate>,
    /// Days since admission.
    pub length_of_stay: u32,
    pub vital_signs: VitalSigns,
    pub nursing_level: NursingLevel,
    pub diet_type: String,
    pub activity_level: String,
    #[serde(default)]
    pub medications: Vec<ActiveMedication>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_round: Option<WardRound>,
    #[serde(default)]
    pub care_team: Vec<CareTeamMember>,
    #[serde(default)]
    pub orders: Vec<ClinicalOrder>,
    #[serde(default)]
    pub progress_notes: Vec<ProgressNote>,
    pub treatment_response: TreatmentResponse,
    #[serde(default)]
    pub complications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_status: Option<DischargeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_plan: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_from_key_or_label() {
        assert_eq!(
            "critical".parse::<InpatientStatus>().unwrap(),
            InpatientStatus::Critical
        );
        assert_eq!(
            "好转中".parse::<InpatientStatus>().unwrap(),
            InpatientStatus::Improving
        );
        assert!("asleep".parse::<InpatientStatus>().is_err());
    }

    #[test]
    fn every_status_has_a_label() {
        for status in InpatientStatus::ALL {
            assert!(!status.label().is_empty());
            assert_eq!(status.key().parse::<InpatientStatus>().unwrap(), *status);
        }
    }
}
