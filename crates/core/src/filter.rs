//! Ward list filtering.
//!
//! The ward list is filtered by a conjunction of three criteria: free-text search, clinical
//! status and department. Filtering is a pure, order-preserving pass over the census; nothing
//! is cached because the lists are small.

use census::{AdmissionRequestData, InpatientData, InpatientStatus};
use serde::{Deserialize, Serialize};

/// Status criterion: every status, or exactly one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(InpatientStatus),
}

impl StatusFilter {
    pub fn matches(self, status: InpatientStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Current filter bar state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub status: StatusFilter,
    /// `None` (or an empty string) matches every department.
    pub department: Option<String>,
}

impl FilterCriteria {
    /// Reset to "show everything".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn search_matches(&self, fields: &[&str]) -> bool {
        let needle = self.search_text.to_lowercase();
        needle.is_empty()
            || fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    fn department_matches(&self, department: &str) -> bool {
        match self.department.as_deref() {
            None | Some("") => true,
            Some(wanted) => wanted == department,
        }
    }

    /// Name, patient id or attending doctor contains the search text (case-insensitive), the
    /// status matches and the department matches.
    pub fn matches_inpatient(&self, inpatient: &InpatientData) -> bool {
        self.search_matches(&[
            inpatient.patient_name.as_str(),
            inpatient.patient_id.as_str(),
            inpatient.doctor.as_str(),
        ]) && self.status.matches(inpatient.status)
            && self.department_matches(&inpatient.department)
    }

    /// Admission requests have no clinical status, so only search and department apply.
    pub fn matches_request(&self, request: &AdmissionRequestData) -> bool {
        self.search_matches(&[
            request.patient_name.as_str(),
            request.patient_id.as_str(),
            request.doctor.as_str(),
        ]) && self.department_matches(&request.department)
    }
}

/// Inpatients matching `criteria`, in census order.
pub fn filter_inpatients<'a>(
    inpatients: &'a [InpatientData],
    criteria: &FilterCriteria,
) -> Vec<&'a InpatientData> {
    inpatients
        .iter()
        .filter(|inpatient| criteria.matches_inpatient(inpatient))
        .collect()
}

/// Admission requests matching `criteria`, in census order.
pub fn filter_requests<'a>(
    requests: &'a [AdmissionRequestData],
    criteria: &FilterCriteria,
) -> Vec<&'a AdmissionRequestData> {
    requests
        .iter()
        .filter(|request| criteria.matches_request(request))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use census::Census;

    fn ids(list: &[&InpatientData]) -> Vec<String> {
        list.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let census = Census::sample().unwrap();
        let result = filter_inpatients(&census.inpatients, &FilterCriteria::default());
        assert_eq!(ids(&result), vec!["IP-001", "IP-002"]);
    }

    #[test]
    fn department_filter_is_exact() {
        let census = Census::sample().unwrap();
        let criteria = FilterCriteria {
            department: Some("内科".into()),
            ..FilterCriteria::default()
        };
        let result = filter_inpatients(&census.inpatients, &criteria);
        assert_eq!(ids(&result), vec!["IP-001"]);

        let empty_department = FilterCriteria {
            department: Some(String::new()),
            ..FilterCriteria::default()
        };
        assert_eq!(filter_inpatients(&census.inpatients, &empty_department).len(), 2);
    }

    #[test]
    fn search_covers_name_id_and_doctor_case_insensitively() {
        let census = Census::sample().unwrap();
        let by = |text: &str| {
            let criteria = FilterCriteria {
                search_text: text.into(),
                ..FilterCriteria::default()
            };
            ids(&filter_inpatients(&census.inpatients, &criteria))
        };

        assert_eq!(by("李四"), vec!["IP-002"]);
        assert_eq!(by("p-12345"), vec!["IP-001"]);
        assert_eq!(by("张医生"), vec!["IP-002"]);
        assert!(by("nobody").is_empty());
    }

    #[test]
    fn status_filter_combines_with_search() {
        let census = Census::sample().unwrap();
        let criteria = FilterCriteria {
            search_text: "P-".into(),
            status: StatusFilter::Only(InpatientStatus::Improving),
            department: None,
        };
        assert_eq!(
            ids(&filter_inpatients(&census.inpatients, &criteria)),
            vec!["IP-002"]
        );

        let critical = FilterCriteria {
            status: StatusFilter::Only(InpatientStatus::Critical),
            ..FilterCriteria::default()
        };
        assert!(filter_inpatients(&census.inpatients, &critical).is_empty());
    }

    #[test]
    fn requests_ignore_status_filter() {
        let census = Census::sample().unwrap();
        let criteria = FilterCriteria {
            status: StatusFilter::Only(InpatientStatus::Critical),
            department: Some("神经内科".into()),
            ..FilterCriteria::default()
        };
        let result = filter_requests(&census.admission_requests, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "ADM-002");
    }

    #[test]
    fn clear_resets_everything() {
        let mut criteria = FilterCriteria {
            search_text: "张".into(),
            status: StatusFilter::Only(InpatientStatus::Stable),
            department: Some("外科".into()),
        };
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
