//! Inpatient ward board.
//!
//! The board holds an in-memory census and the view state around it: the active tab, the
//! filter bar and at most one open modal. The admission workflow (approve, reject) and the
//! per-patient actions (care plan, discharge, ward round, removal) mutate the census in place.
//!
//! Nothing here is written back to disk.

use crate::config::CoreConfig;
use crate::filter::{filter_inpatients, filter_requests, FilterCriteria, StatusFilter};
use crate::sections::{Section, Tabs};
use crate::{FormError, FormResult, NonEmptyText};
use census::{
    AdmissionRequestData, AdmissionStatus, Census, CensusData, DischargeStatus, InpatientData,
    InpatientStatus, NursingLevel, WardRound,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WardTab {
    Inpatients,
    AdmissionRequests,
}

impl Section for WardTab {
    const ALL: &'static [Self] = &[WardTab::Inpatients, WardTab::AdmissionRequests];

    fn label(self) -> &'static str {
        match self {
            WardTab::Inpatients => "住院患者",
            WardTab::AdmissionRequests => "入院申请",
        }
    }

    fn key(self) -> &'static str {
        match self {
            WardTab::Inpatients => "inpatients",
            WardTab::AdmissionRequests => "admission_requests",
        }
    }
}

/// Modals opened from an inpatient row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InpatientModal {
    Details,
    WardRound,
    CarePlan,
    Discharge,
    Delete,
}

/// Values submitted from the care plan modal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanUpdate {
    pub nursing_level: NursingLevel,
    pub diet_type: String,
    pub activity_level: String,
    /// Blank notes clear the stored notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// The open modal and the record it was opened for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WardModal {
    AddInpatient,
    Inpatient {
        kind: InpatientModal,
        inpatient_id: String,
    },
    AdmissionReview {
        request_id: String,
    },
}

/// Ward list state: census, tab, filters and the open modal.
#[derive(Clone, Debug)]
pub struct WardBoard {
    census: CensusData,
    tabs: Tabs<WardTab>,
    criteria: FilterCriteria,
    modal: Option<WardModal>,
}

impl WardBoard {
    pub fn new(census: CensusData) -> Self {
        Self {
            census,
            tabs: Tabs::default(),
            criteria: FilterCriteria::default(),
            modal: None,
        }
    }

    /// Board over the configured census file, or the bundled sample.
    pub fn from_config(config: &CoreConfig) -> FormResult<Self> {
        let census = config.load_census()?;
        tracing::info!(
            inpatients = census.inpatients.len(),
            requests = census.admission_requests.len(),
            beds = census.available_beds.len(),
            "ward board loaded"
        );
        Ok(Self::new(census))
    }

    pub fn census(&self) -> &CensusData {
        &self.census
    }

    /// The census as YAML.
    pub fn render_census(&self) -> FormResult<String> {
        Ok(Census::render(&self.census)?)
    }

    pub fn active_tab(&self) -> WardTab {
        self.tabs.active()
    }

    pub fn select_tab(&mut self, tab: WardTab) -> bool {
        self.tabs.select(tab)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.criteria.status = status;
    }

    pub fn set_department_filter(&mut self, department: Option<String>) {
        self.criteria.department = department;
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    pub fn filtered_inpatients(&self) -> Vec<&InpatientData> {
        filter_inpatients(&self.census.inpatients, &self.criteria)
    }

    pub fn filtered_requests(&self) -> Vec<&AdmissionRequestData> {
        filter_requests(&self.census.admission_requests, &self.criteria)
    }

    /// Badge count on the admission requests tab.
    pub fn pending_request_count(&self) -> usize {
        self.census
            .admission_requests
            .iter()
            .filter(|request| request.is_pending())
            .count()
    }

    /// Inpatients with a given status, for the summary cards above the list.
    pub fn count_with_status(&self, status: InpatientStatus) -> usize {
        self.census
            .inpatients
            .iter()
            .filter(|inpatient| inpatient.status == status)
            .count()
    }

    pub fn inpatient(&self, inpatient_id: &str) -> Option<&InpatientData> {
        self.census
            .inpatients
            .iter()
            .find(|inpatient| inpatient.id.as_str() == inpatient_id)
    }

    pub fn request(&self, request_id: &str) -> Option<&AdmissionRequestData> {
        self.census
            .admission_requests
            .iter()
            .find(|request| request.id.as_str() == request_id)
    }

    fn inpatient_mut(&mut self, inpatient_id: &str) -> FormResult<&mut InpatientData> {
        self.census
            .inpatients
            .iter_mut()
            .find(|inpatient| inpatient.id.as_str() == inpatient_id)
            .ok_or_else(|| FormError::UnknownInpatient(inpatient_id.to_owned()))
    }

    fn pending_request_mut(&mut self, request_id: &str) -> FormResult<&mut AdmissionRequestData> {
        let request = self
            .census
            .admission_requests
            .iter_mut()
            .find(|request| request.id.as_str() == request_id)
            .ok_or_else(|| FormError::UnknownRequest(request_id.to_owned()))?;
        if !request.is_pending() {
            return Err(FormError::RequestNotPending {
                id: request_id.to_owned(),
                status: request.status,
            });
        }
        Ok(request)
    }

    pub fn modal(&self) -> Option<&WardModal> {
        self.modal.as_ref()
    }

    /// Open `modal`, replacing any modal that is already open.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownInpatient`] or [`FormError::UnknownRequest`] if the modal
    /// refers to a record that is not on the board.
    pub fn open_modal(&mut self, modal: WardModal) -> FormResult<()> {
        match &modal {
            WardModal::AddInpatient => {}
            WardModal::Inpatient { inpatient_id, .. } => {
                if self.inpatient(inpatient_id).is_none() {
                    return Err(FormError::UnknownInpatient(inpatient_id.clone()));
                }
            }
            WardModal::AdmissionReview { request_id } => {
                if self.request(request_id).is_none() {
                    return Err(FormError::UnknownRequest(request_id.clone()));
                }
            }
        }
        tracing::debug!(?modal, "modal opened");
        self.modal = Some(modal);
        Ok(())
    }

    pub fn open_modal_for(&mut self, kind: InpatientModal, inpatient_id: &str) -> FormResult<()> {
        self.open_modal(WardModal::Inpatient {
            kind,
            inpatient_id: inpatient_id.to_owned(),
        })
    }

    /// Close the open modal and drop its selection.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Inpatient the open modal was opened for.
    pub fn selected_inpatient(&self) -> Option<&InpatientData> {
        match &self.modal {
            Some(WardModal::Inpatient { inpatient_id, .. }) => self.inpatient(inpatient_id),
            _ => None,
        }
    }

    /// Admission request the open modal was opened for.
    pub fn selected_request(&self) -> Option<&AdmissionRequestData> {
        match &self.modal {
            Some(WardModal::AdmissionReview { request_id }) => self.request(request_id),
            _ => None,
        }
    }

    /// Add a new inpatient to the list.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidInput`] if the id is already on the board.
    pub fn add_inpatient(&mut self, inpatient: InpatientData) -> FormResult<()> {
        if self.inpatient(inpatient.id.as_str()).is_some() {
            return Err(FormError::InvalidInput(format!(
                "inpatient {} is already on the ward list",
                inpatient.id
            )));
        }
        tracing::info!(inpatient_id = %inpatient.id, patient = %inpatient.patient_name, "inpatient added");
        self.census.inpatients.push(inpatient);
        self.close_modal();
        Ok(())
    }

    /// Approve a pending admission request and assign it one of the available beds.
    ///
    /// The bed is taken off the available list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown or no longer pending, or if no available
    /// bed has `bed_number`. Nothing is changed in that case.
    pub fn approve_admission(&mut self, request_id: &str, bed_number: &str) -> FormResult<()> {
        self.pending_request_mut(request_id)?;
        let bed_index = self
            .census
            .available_beds
            .iter()
            .position(|bed| bed.number.as_str() == bed_number)
            .ok_or_else(|| FormError::BedUnavailable(bed_number.to_owned()))?;

        let bed = self.census.available_beds.remove(bed_index);
        let request = self.pending_request_mut(request_id)?;
        request.status = AdmissionStatus::Approved;
        request.assigned_bed = Some(bed.number.into_inner());

        tracing::info!(request_id, bed_number, "admission request approved");
        self.close_modal();
        Ok(())
    }

    /// Reject a pending admission request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown or no longer pending, or if `reason` is
    /// blank.
    pub fn reject_admission(&mut self, request_id: &str, reason: &str) -> FormResult<()> {
        let reason = NonEmptyText::new(reason)
            .map_err(|_| FormError::InvalidInput("rejection reason cannot be empty".into()))?;
        let request = self.pending_request_mut(request_id)?;
        request.status = AdmissionStatus::Rejected;
        request.rejection_reason = Some(reason.to_string());

        tracing::info!(request_id, reason = %reason, "admission request rejected");
        self.close_modal();
        Ok(())
    }

    /// Replace an inpatient's nursing level, diet, activity level and notes.
    pub fn update_care_plan(&mut self, inpatient_id: &str, update: CarePlanUpdate) -> FormResult<()> {
        let inpatient = self.inpatient_mut(inpatient_id)?;
        inpatient.nursing_level = update.nursing_level;
        inpatient.diet_type = update.diet_type;
        inpatient.activity_level = update.activity_level;
        inpatient.notes = update.notes.filter(|notes| !notes.trim().is_empty());

        tracing::info!(
            inpatient_id,
            nursing_level = ?update.nursing_level,
            "care plan updated"
        );
        self.close_modal();
        Ok(())
    }

    /// Discharge an inpatient.
    ///
    /// An inpatient who is already discharged keeps the original discharge.
    pub fn discharge(
        &mut self,
        inpatient_id: &str,
        date: NaiveDate,
        summary: &str,
        follow_up_plan: Option<String>,
    ) -> FormResult<()> {
        let inpatient = self.inpatient_mut(inpatient_id)?;
        if inpatient.status == InpatientStatus::Discharged {
            return Err(FormError::AlreadyDischarged(inpatient_id.to_owned()));
        }
        inpatient.status = InpatientStatus::Discharged;
        inpatient.discharge_status = Some(DischargeStatus::Completed);
        inpatient.discharge_date = Some(date);
        inpatient.discharge_summary = (!summary.is_empty()).then(|| summary.to_owned());
        inpatient.follow_up_plan = follow_up_plan.filter(|plan| !plan.is_empty());

        tracing::info!(inpatient_id, %date, "inpatient discharged");
        self.close_modal();
        Ok(())
    }

    /// Record a ward round; it becomes the patient's last round.
    pub fn record_ward_round(&mut self, inpatient_id: &str, round: WardRound) -> FormResult<()> {
        let inpatient = self.inpatient_mut(inpatient_id)?;
        tracing::info!(inpatient_id, doctor = %round.doctor, date = %round.date, "ward round recorded");
        inpatient.last_round = Some(round);
        self.close_modal();
        Ok(())
    }

    /// Remove an inpatient from the list and return the record.
    pub fn remove_inpatient(&mut self, inpatient_id: &str) -> FormResult<InpatientData> {
        let index = self
            .census
            .inpatients
            .iter()
            .position(|inpatient| inpatient.id.as_str() == inpatient_id)
            .ok_or_else(|| FormError::UnknownInpatient(inpatient_id.to_owned()))?;
        let removed = self.census.inpatients.remove(index);

        tracing::info!(inpatient_id, "inpatient record removed");
        self.close_modal();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn board() -> WardBoard {
        WardBoard::new(Census::sample().unwrap())
    }

    #[test]
    fn starts_on_inpatients_with_everything_visible() {
        let board = board();
        assert_eq!(board.active_tab(), WardTab::Inpatients);
        assert_eq!(board.filtered_inpatients().len(), 2);
        assert_eq!(board.filtered_requests().len(), 2);
        assert_eq!(board.pending_request_count(), 2);
        assert!(board.modal().is_none());
    }

    #[test]
    fn filters_apply_to_both_lists() {
        let mut board = board();
        board.set_department_filter(Some("内科".into()));
        let inpatients = board.filtered_inpatients();
        assert_eq!(inpatients.len(), 1);
        assert_eq!(inpatients[0].id.as_str(), "IP-001");
        assert!(board.filtered_requests().is_empty());

        board.set_status_filter(StatusFilter::Only(InpatientStatus::Improving));
        assert!(board.filtered_inpatients().is_empty());

        board.clear_filters();
        board.set_search("王五");
        assert!(board.filtered_inpatients().is_empty());
        assert_eq!(board.filtered_requests().len(), 1);
    }

    #[test]
    fn opening_a_modal_replaces_the_previous_one() {
        let mut board = board();
        board
            .open_modal_for(InpatientModal::Details, "IP-001")
            .unwrap();
        assert_eq!(
            board.selected_inpatient().map(|p| p.id.as_str()),
            Some("IP-001")
        );

        board
            .open_modal(WardModal::AdmissionReview {
                request_id: "ADM-002".into(),
            })
            .unwrap();
        assert!(board.selected_inpatient().is_none());
        assert_eq!(
            board.selected_request().map(|r| r.id.as_str()),
            Some("ADM-002")
        );

        board.close_modal();
        assert!(board.modal().is_none());
        assert!(board.selected_request().is_none());
    }

    #[test]
    fn modals_must_refer_to_known_records() {
        let mut board = board();
        assert!(matches!(
            board.open_modal_for(InpatientModal::Discharge, "IP-999"),
            Err(FormError::UnknownInpatient(_))
        ));
        assert!(board.modal().is_none());
    }

    #[test]
    fn approval_assigns_and_consumes_a_bed() {
        let mut board = board();
        board
            .open_modal(WardModal::AdmissionReview {
                request_id: "ADM-001".into(),
            })
            .unwrap();
        board.approve_admission("ADM-001", "302-A").unwrap();

        let request = board.request("ADM-001").unwrap();
        assert_eq!(request.status, AdmissionStatus::Approved);
        assert_eq!(request.assigned_bed.as_deref(), Some("302-A"));
        assert_eq!(board.census().available_beds.len(), 2);
        assert_eq!(board.pending_request_count(), 1);
        assert!(board.modal().is_none());

        assert!(matches!(
            board.approve_admission("ADM-001", "302-B"),
            Err(FormError::RequestNotPending {
                status: AdmissionStatus::Approved,
                ..
            })
        ));
    }

    #[test]
    fn approval_with_a_taken_bed_changes_nothing() {
        let mut board = board();
        board.approve_admission("ADM-001", "302-A").unwrap();
        assert!(matches!(
            board.approve_admission("ADM-002", "302-A"),
            Err(FormError::BedUnavailable(_))
        ));
        assert!(board.request("ADM-002").unwrap().is_pending());
        assert!(matches!(
            board.approve_admission("ADM-404", "302-B"),
            Err(FormError::UnknownRequest(_))
        ));
    }

    #[test]
    fn rejection_requires_a_reason() {
        let mut board = board();
        assert!(matches!(
            board.reject_admission("ADM-002", "  "),
            Err(FormError::InvalidInput(_))
        ));
        board.reject_admission("ADM-002", "床位已满").unwrap();
        let request = board.request("ADM-002").unwrap();
        assert_eq!(request.status, AdmissionStatus::Rejected);
        assert_eq!(request.rejection_reason.as_deref(), Some("床位已满"));
        assert_eq!(board.census().available_beds.len(), 3);
    }

    #[test]
    fn discharge_marks_the_inpatient() {
        let mut board = board();
        let date = NaiveDate::from_ymd_opt(2025, 5, 27).unwrap();
        board
            .discharge("IP-001", date, "血压控制平稳", Some("一周后门诊复查".into()))
            .unwrap();

        let inpatient = board.inpatient("IP-001").unwrap();
        assert_eq!(inpatient.status, InpatientStatus::Discharged);
        assert_eq!(inpatient.discharge_status, Some(DischargeStatus::Completed));
        assert_eq!(inpatient.discharge_date, Some(date));
        assert_eq!(board.count_with_status(InpatientStatus::Discharged), 1);

        let later = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert!(matches!(
            board.discharge("IP-001", later, "", None),
            Err(FormError::AlreadyDischarged(_))
        ));
        let inpatient = board.inpatient("IP-001").unwrap();
        assert_eq!(inpatient.discharge_date, Some(date));
        assert_eq!(inpatient.discharge_summary.as_deref(), Some("血压控制平稳"));
    }

    #[test]
    fn care_plan_update_replaces_care_fields() {
        let mut board = board();
        board
            .open_modal_for(InpatientModal::CarePlan, "IP-001")
            .unwrap();
        board
            .update_care_plan(
                "IP-001",
                CarePlanUpdate {
                    nursing_level: NursingLevel::Intensive,
                    diet_type: "糖尿病饮食".into(),
                    activity_level: "卧床休息".into(),
                    notes: Some("  ".into()),
                },
            )
            .unwrap();

        let inpatient = board.inpatient("IP-001").unwrap();
        assert_eq!(inpatient.nursing_level, NursingLevel::Intensive);
        assert_eq!(inpatient.diet_type, "糖尿病饮食");
        assert_eq!(inpatient.activity_level, "卧床休息");
        assert_eq!(inpatient.notes, None);
        assert!(board.modal().is_none());

        let update = CarePlanUpdate {
            nursing_level: NursingLevel::Standard,
            diet_type: String::new(),
            activity_level: String::new(),
            notes: None,
        };
        assert!(matches!(
            board.update_care_plan("IP-404", update),
            Err(FormError::UnknownInpatient(_))
        ));
    }

    #[test]
    fn ward_round_replaces_last_round() {
        let mut board = board();
        let round = WardRound {
            date: NaiveDate::from_ymd_opt(2025, 5, 22).unwrap(),
            time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            doctor: "张医生".into(),
            notes: "切口愈合良好".into(),
        };
        board.record_ward_round("IP-002", round.clone()).unwrap();
        assert_eq!(board.inpatient("IP-002").unwrap().last_round, Some(round));
    }

    #[test]
    fn removal_and_readdition() {
        let mut board = board();
        let removed = board.remove_inpatient("IP-001").unwrap();
        assert_eq!(board.filtered_inpatients().len(), 1);
        assert!(matches!(
            board.remove_inpatient("IP-001"),
            Err(FormError::UnknownInpatient(_))
        ));

        board.add_inpatient(removed.clone()).unwrap();
        assert!(board.add_inpatient(removed).is_err());
        assert_eq!(board.census().inpatients.len(), 2);
    }

    #[test]
    fn ward_tabs_switch() {
        let mut board = board();
        assert!(board.select_tab(WardTab::AdmissionRequests));
        assert_eq!(board.active_tab().label(), "入院申请");
        assert_eq!(WardTab::from_key("inpatients"), Some(WardTab::Inpatients));
    }
}
