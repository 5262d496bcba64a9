//! Admission requests and free beds.

use chrono::NaiveDate;
use his_types::{NonEmptyText, Sex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of an admission request.
///
/// Requests start `Pending`; a reviewer moves them to `Approved` (with a bed) or `Rejected`
/// (with a reason). Neither outcome can be reversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AdmissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "待审核",
            AdmissionStatus::Approved => "已批准",
            AdmissionStatus::Rejected => "已拒绝",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

impl Urgency {
    pub fn label(self) -> &'static str {
        match self {
            Urgency::Normal => "普通",
            Urgency::Urgent => "紧急",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A request from a clinic to admit a patient to the ward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmissionRequestData {
    pub id: NonEmptyText,
    pub patient_name: NonEmptyText,
    pub patient_id: NonEmptyText,
    pub age: u32,
    pub sex: Sex,
    pub department: String,
    /// Requesting doctor.
    pub doctor: String,
    pub diagnosis: String,
    pub reason: String,
    pub request_date: NaiveDate,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub status: AdmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Bed number assigned on approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_bed: Option<String>,
}

impl AdmissionRequestData {
    pub fn is_pending(&self) -> bool {
        self.status == AdmissionStatus::Pending
    }
}

/// A free bed that an approved request can be assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedData {
    pub id: NonEmptyText,
    pub number: NonEmptyText,
    pub ward: String,
    /// Bed category, for example "普通床位".
    pub kind: String,
}
