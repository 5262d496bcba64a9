//! Inpatient medical record form.
//!
//! One draft covers all five record types. Discharge-only and operation-only fields live on
//! the same draft but can only be edited while the record type matches; switching the type
//! keeps whatever was typed into them.

use super::assign;
use crate::config::CoreConfig;
use crate::constants::NOT_RECORDED;
use crate::entries::{EntryList, LabTest, MedicationOrder};
use crate::host::Form;
use crate::sections::{Section, Tabs};
use crate::{FormError, FormResult};
use census::InpatientData;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use his_types::{NonEmptyText, Sex, VitalSigns};
use his_uuid::EntryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    #[default]
    Admission,
    Progress,
    Nursing,
    Operation,
    Discharge,
}

impl RecordType {
    pub const ALL: [RecordType; 5] = [
        RecordType::Admission,
        RecordType::Progress,
        RecordType::Nursing,
        RecordType::Operation,
        RecordType::Discharge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecordType::Admission => "入院记录",
            RecordType::Progress => "病程记录",
            RecordType::Nursing => "护理记录",
            RecordType::Operation => "手术记录",
            RecordType::Discharge => "出院记录",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tabs of the record editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordTab {
    Basic,
    History,
    Examination,
    Diagnosis,
    Treatment,
    Summary,
}

impl Section for RecordTab {
    const ALL: &'static [Self] = &[
        RecordTab::Basic,
        RecordTab::History,
        RecordTab::Examination,
        RecordTab::Diagnosis,
        RecordTab::Treatment,
        RecordTab::Summary,
    ];

    fn label(self) -> &'static str {
        match self {
            RecordTab::Basic => "基本信息",
            RecordTab::History => "病史",
            RecordTab::Examination => "体格检查",
            RecordTab::Diagnosis => "诊断",
            RecordTab::Treatment => "治疗计划",
            RecordTab::Summary => "病历摘要",
        }
    }

    fn key(self) -> &'static str {
        match self {
            RecordTab::Basic => "basic",
            RecordTab::History => "history",
            RecordTab::Examination => "examination",
            RecordTab::Diagnosis => "diagnosis",
            RecordTab::Treatment => "treatment",
            RecordTab::Summary => "summary",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consciousness {
    #[default]
    Alert,
    Lethargic,
    Obtunded,
    Stuporous,
    Comatose,
}

impl Consciousness {
    pub fn label(self) -> &'static str {
        match self {
            Consciousness::Alert => "清醒",
            Consciousness::Lethargic => "嗜睡",
            Consciousness::Obtunded => "迟钝",
            Consciousness::Stuporous => "昏睡",
            Consciousness::Comatose => "昏迷",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DischargeCondition {
    Cured,
    Improved,
    Unchanged,
    Worse,
    Death,
}

impl DischargeCondition {
    pub fn label(self) -> &'static str {
        match self {
            DischargeCondition::Cured => "治愈",
            DischargeCondition::Improved => "好转",
            DischargeCondition::Unchanged => "未愈",
            DischargeCondition::Worse => "恶化",
            DischargeCondition::Death => "死亡",
        }
    }
}

/// Free-text fields of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    ChiefComplaint,
    PresentIllness,
    PastHistory,
    AllergyHistory,
    PersonalHistory,
    FamilyHistory,

    GeneralAppearance,
    SkinAndMucosa,
    Head,
    Neck,
    Chest,
    Heart,
    Abdomen,
    Extremities,
    NeurologicalExam,

    AdmissionDiagnosis,
    DifferentialDiagnosis,

    TreatmentPlan,
    DietaryInstructions,
    ActivityInstructions,
    NursingInstructions,

    DischargeDiagnosis,
    HospitalCourse,
    FollowUpInstructions,

    OperationName,
    Surgeons,
    Anesthesia,
    PreOpDiagnosis,
    PostOpDiagnosis,
    OperationFindings,
    OperationProcedure,
    EstimatedBloodLoss,
    Specimens,
    Complications,
    PostOpPlan,
}

impl TextField {
    /// The record type this field belongs to, if it is type-specific.
    pub fn only_for(self) -> Option<RecordType> {
        use TextField::*;
        match self {
            DischargeDiagnosis | HospitalCourse | FollowUpInstructions => {
                Some(RecordType::Discharge)
            }
            OperationName | Surgeons | Anesthesia | PreOpDiagnosis | PostOpDiagnosis
            | OperationFindings | OperationProcedure | EstimatedBloodLoss | Specimens
            | Complications | PostOpPlan => Some(RecordType::Operation),
            _ => None,
        }
    }
}

/// Which medication list an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationList {
    /// Medication orders for the stay.
    Orders,
    /// Medications to take home; discharge records only.
    Discharge,
}

/// Patient banner shown on the record. Read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientInfo {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    pub age: u32,
    pub sex: Sex,
    pub admission_date: NaiveDate,
    #[serde(default)]
    pub diagnosis: Vec<String>,
    pub attending: String,
    pub department: String,
}

impl From<&InpatientData> for PatientInfo {
    fn from(inpatient: &InpatientData) -> Self {
        Self {
            id: inpatient.patient_id.clone(),
            name: inpatient.patient_name.clone(),
            age: inpatient.age,
            sex: inpatient.sex,
            admission_date: inpatient.admission_date,
            diagnosis: inpatient.diagnosis.clone(),
            attending: inpatient.doctor.clone(),
            department: inpatient.department.clone(),
        }
    }
}

/// Previously recorded values used to prefill a new draft.
///
/// Every part is optional; missing or empty values fall back to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordSeed {
    pub texts: BTreeMap<TextField, String>,
    pub vital_signs: Option<VitalSigns>,
    pub consciousness: Option<Consciousness>,
    pub medications: Vec<MedicationOrder>,
    pub lab_tests: Vec<LabTest>,
    pub imaging_studies: Vec<String>,
    pub special_procedures: Vec<String>,
    pub discharge_condition: Option<DischargeCondition>,
    pub discharge_medications: Vec<MedicationOrder>,
    pub operation_date: Option<NaiveDate>,
}

/// The medical record draft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub record_type: RecordType,
    pub record_date: NaiveDate,
    #[serde(with = "census::hhmm")]
    pub record_time: NaiveTime,
    pub recording_clinician: String,

    pub chief_complaint: String,
    pub present_illness: String,
    pub past_history: String,
    pub allergy_history: String,
    pub personal_history: String,
    pub family_history: String,

    pub vital_signs: VitalSigns,
    pub general_appearance: String,
    pub consciousness: Consciousness,
    pub skin_and_mucosa: String,
    pub head: String,
    pub neck: String,
    pub chest: String,
    pub heart: String,
    pub abdomen: String,
    pub extremities: String,
    pub neurological_exam: String,

    pub admission_diagnosis: String,
    pub differential_diagnosis: String,

    pub treatment_plan: String,
    pub medications: EntryList<MedicationOrder>,
    pub lab_tests: EntryList<LabTest>,
    pub imaging_studies: Vec<String>,
    pub special_procedures: Vec<String>,
    pub dietary_instructions: String,
    pub activity_instructions: String,
    pub nursing_instructions: String,

    pub discharge_diagnosis: String,
    pub hospital_course: String,
    pub discharge_condition: Option<DischargeCondition>,
    pub discharge_medications: EntryList<MedicationOrder>,
    pub follow_up_instructions: String,

    pub operation_name: String,
    pub operation_date: Option<NaiveDate>,
    pub surgeons: String,
    pub anesthesia: String,
    pub pre_op_diagnosis: String,
    pub post_op_diagnosis: String,
    pub operation_findings: String,
    pub operation_procedure: String,
    pub estimated_blood_loss: String,
    pub specimens: String,
    pub complications: String,
    pub post_op_plan: String,
}

impl MedicalRecord {
    /// A new draft for `patient`, stamped with `now` and the configured clinician.
    ///
    /// The admission diagnosis defaults to the patient's diagnoses, one per line.
    pub fn new(
        patient: &PatientInfo,
        record_type: RecordType,
        seed: RecordSeed,
        config: &CoreConfig,
        now: NaiveDateTime,
    ) -> Self {
        let mut record = Self {
            record_type,
            record_date: now.date(),
            record_time: truncate_to_minute(now.time()),
            recording_clinician: config.recording_clinician().to_owned(),
            chief_complaint: String::new(),
            present_illness: String::new(),
            past_history: String::new(),
            allergy_history: String::new(),
            personal_history: String::new(),
            family_history: String::new(),
            vital_signs: seed.vital_signs.unwrap_or_default(),
            general_appearance: String::new(),
            consciousness: seed.consciousness.unwrap_or_default(),
            skin_and_mucosa: String::new(),
            head: String::new(),
            neck: String::new(),
            chest: String::new(),
            heart: String::new(),
            abdomen: String::new(),
            extremities: String::new(),
            neurological_exam: String::new(),
            admission_diagnosis: patient.diagnosis.join("\n"),
            differential_diagnosis: String::new(),
            treatment_plan: String::new(),
            medications: seed.medications.into_iter().collect(),
            lab_tests: seed.lab_tests.into_iter().collect(),
            imaging_studies: seed.imaging_studies,
            special_procedures: seed.special_procedures,
            dietary_instructions: String::new(),
            activity_instructions: String::new(),
            nursing_instructions: String::new(),
            discharge_diagnosis: String::new(),
            hospital_course: String::new(),
            discharge_condition: seed.discharge_condition,
            discharge_medications: seed.discharge_medications.into_iter().collect(),
            follow_up_instructions: String::new(),
            operation_name: String::new(),
            operation_date: seed.operation_date,
            surgeons: String::new(),
            anesthesia: String::new(),
            pre_op_diagnosis: String::new(),
            post_op_diagnosis: String::new(),
            operation_findings: String::new(),
            operation_procedure: String::new(),
            estimated_blood_loss: String::new(),
            specimens: String::new(),
            complications: String::new(),
            post_op_plan: String::new(),
        };
        for (field, text) in seed.texts {
            if !text.is_empty() {
                *record.text_mut(field) = text;
            }
        }
        record
    }

    pub fn text(&self, field: TextField) -> &str {
        use TextField::*;
        match field {
            ChiefComplaint => &self.chief_complaint,
            PresentIllness => &self.present_illness,
            PastHistory => &self.past_history,
            AllergyHistory => &self.allergy_history,
            PersonalHistory => &self.personal_history,
            FamilyHistory => &self.family_history,
            GeneralAppearance => &self.general_appearance,
            SkinAndMucosa => &self.skin_and_mucosa,
            Head => &self.head,
            Neck => &self.neck,
            Chest => &self.chest,
            Heart => &self.heart,
            Abdomen => &self.abdomen,
            Extremities => &self.extremities,
            NeurologicalExam => &self.neurological_exam,
            AdmissionDiagnosis => &self.admission_diagnosis,
            DifferentialDiagnosis => &self.differential_diagnosis,
            TreatmentPlan => &self.treatment_plan,
            DietaryInstructions => &self.dietary_instructions,
            ActivityInstructions => &self.activity_instructions,
            NursingInstructions => &self.nursing_instructions,
            DischargeDiagnosis => &self.discharge_diagnosis,
            HospitalCourse => &self.hospital_course,
            FollowUpInstructions => &self.follow_up_instructions,
            OperationName => &self.operation_name,
            Surgeons => &self.surgeons,
            Anesthesia => &self.anesthesia,
            PreOpDiagnosis => &self.pre_op_diagnosis,
            PostOpDiagnosis => &self.post_op_diagnosis,
            OperationFindings => &self.operation_findings,
            OperationProcedure => &self.operation_procedure,
            EstimatedBloodLoss => &self.estimated_blood_loss,
            Specimens => &self.specimens,
            Complications => &self.complications,
            PostOpPlan => &self.post_op_plan,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        use TextField::*;
        match field {
            ChiefComplaint => &mut self.chief_complaint,
            PresentIllness => &mut self.present_illness,
            PastHistory => &mut self.past_history,
            AllergyHistory => &mut self.allergy_history,
            PersonalHistory => &mut self.personal_history,
            FamilyHistory => &mut self.family_history,
            GeneralAppearance => &mut self.general_appearance,
            SkinAndMucosa => &mut self.skin_and_mucosa,
            Head => &mut self.head,
            Neck => &mut self.neck,
            Chest => &mut self.chest,
            Heart => &mut self.heart,
            Abdomen => &mut self.abdomen,
            Extremities => &mut self.extremities,
            NeurologicalExam => &mut self.neurological_exam,
            AdmissionDiagnosis => &mut self.admission_diagnosis,
            DifferentialDiagnosis => &mut self.differential_diagnosis,
            TreatmentPlan => &mut self.treatment_plan,
            DietaryInstructions => &mut self.dietary_instructions,
            ActivityInstructions => &mut self.activity_instructions,
            NursingInstructions => &mut self.nursing_instructions,
            DischargeDiagnosis => &mut self.discharge_diagnosis,
            HospitalCourse => &mut self.hospital_course,
            FollowUpInstructions => &mut self.follow_up_instructions,
            OperationName => &mut self.operation_name,
            Surgeons => &mut self.surgeons,
            Anesthesia => &mut self.anesthesia,
            PreOpDiagnosis => &mut self.pre_op_diagnosis,
            PostOpDiagnosis => &mut self.post_op_diagnosis,
            OperationFindings => &mut self.operation_findings,
            OperationProcedure => &mut self.operation_procedure,
            EstimatedBloodLoss => &mut self.estimated_blood_loss,
            Specimens => &mut self.specimens,
            Complications => &mut self.complications,
            PostOpPlan => &mut self.post_op_plan,
        }
    }

    /// The discharge list is only editable on discharge records.
    fn medications_mut(
        &mut self,
        list: MedicationList,
    ) -> FormResult<&mut EntryList<MedicationOrder>> {
        match list {
            MedicationList::Orders => Ok(&mut self.medications),
            MedicationList::Discharge => {
                self.require(RecordType::Discharge, "discharge medications")?;
                Ok(&mut self.discharge_medications)
            }
        }
    }

    fn require(&self, record_type: RecordType, what: &'static str) -> FormResult<()> {
        if self.record_type == record_type {
            Ok(())
        } else {
            Err(FormError::NotApplicable(what))
        }
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Part of the record reported to the host after a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    RecordType,
    RecordDate,
    RecordTime,
    RecordingClinician,
    Text(TextField),
    VitalSigns,
    Consciousness,
    DischargeCondition,
    OperationDate,
    Medications(MedicationList),
    LabTests,
    ImagingStudies,
    SpecialProcedures,
}

/// Every edit the record form accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum RecordAction {
    /// Switch tabs. Never counts as a change.
    SelectTab(RecordTab),

    SetRecordType(RecordType),
    SetRecordDate(NaiveDate),
    SetRecordTime(#[serde(with = "census::hhmm")] NaiveTime),
    SetRecordingClinician(String),
    SetText { field: TextField, value: String },

    SetTemperature(f64),
    SetBloodPressure(String),
    SetHeartRate(u32),
    SetRespiratoryRate(u32),
    SetOxygenSaturation(u32),
    SetConsciousness(Consciousness),

    SetImagingStudies(Vec<String>),
    SetSpecialProcedures(Vec<String>),

    /// Discharge records only.
    SetDischargeCondition(Option<DischargeCondition>),
    /// Operation records only.
    SetOperationDate(Option<NaiveDate>),

    /// Append `order`, or a blank row when none is given.
    AddMedication {
        list: MedicationList,
        #[serde(default)]
        order: Option<MedicationOrder>,
    },
    RemoveMedication { list: MedicationList, id: EntryId },
    UpdateMedication {
        list: MedicationList,
        id: EntryId,
        order: MedicationOrder,
    },

    /// Append `test`, or a blank row dated today when none is given.
    AddLabTest {
        #[serde(default)]
        test: Option<LabTest>,
    },
    RemoveLabTest(EntryId),
    UpdateLabTest { id: EntryId, test: LabTest },
}

/// A medical record draft opened for one patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecordForm {
    pub patient: PatientInfo,
    pub record: MedicalRecord,
    pub tabs: Tabs<RecordTab>,
    /// Date the form was opened; blank lab tests are dated with it.
    pub opened_on: NaiveDate,
}

impl MedicalRecordForm {
    pub fn open(
        patient: PatientInfo,
        record_type: RecordType,
        seed: RecordSeed,
        config: &CoreConfig,
        now: NaiveDateTime,
    ) -> Self {
        let record = MedicalRecord::new(&patient, record_type, seed, config, now);
        tracing::debug!(patient = %patient.id, record_type = ?record_type, "medical record opened");
        Self {
            patient,
            record,
            tabs: Tabs::default(),
            opened_on: now.date(),
        }
    }

    /// Heading of the editor.
    pub fn title(&self) -> &'static str {
        self.record.record_type.label()
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary::new(&self.patient, &self.record)
    }
}

impl Form for MedicalRecordForm {
    type Action = RecordAction;
    type Field = RecordField;

    fn apply(&mut self, action: RecordAction) -> FormResult<Option<RecordField>> {
        use RecordAction as A;

        let r = &mut self.record;
        let (field, changed) = match action {
            A::SelectTab(tab) => {
                self.tabs.select(tab);
                return Ok(None);
            }

            A::SetRecordType(v) => (RecordField::RecordType, assign(&mut r.record_type, v)),
            A::SetRecordDate(v) => (RecordField::RecordDate, assign(&mut r.record_date, v)),
            A::SetRecordTime(v) => (RecordField::RecordTime, assign(&mut r.record_time, v)),
            A::SetRecordingClinician(v) => (
                RecordField::RecordingClinician,
                assign(&mut r.recording_clinician, v),
            ),
            A::SetText { field, value } => {
                if let Some(record_type) = field.only_for() {
                    r.require(record_type, record_type.label())?;
                }
                (RecordField::Text(field), assign(r.text_mut(field), value))
            }

            A::SetTemperature(v) => {
                if !v.is_finite() || v < 0.0 {
                    return Err(FormError::InvalidNumber {
                        field: "temperature",
                        input: v.to_string(),
                    });
                }
                (RecordField::VitalSigns, assign(&mut r.vital_signs.temperature, v))
            }
            A::SetBloodPressure(v) => (
                RecordField::VitalSigns,
                assign(&mut r.vital_signs.blood_pressure, v),
            ),
            A::SetHeartRate(v) => (RecordField::VitalSigns, assign(&mut r.vital_signs.heart_rate, v)),
            A::SetRespiratoryRate(v) => (
                RecordField::VitalSigns,
                assign(&mut r.vital_signs.respiratory_rate, v),
            ),
            A::SetOxygenSaturation(v) => (
                RecordField::VitalSigns,
                assign(&mut r.vital_signs.oxygen_saturation, v),
            ),
            A::SetConsciousness(v) => (RecordField::Consciousness, assign(&mut r.consciousness, v)),

            A::SetImagingStudies(v) => (RecordField::ImagingStudies, assign(&mut r.imaging_studies, v)),
            A::SetSpecialProcedures(v) => (
                RecordField::SpecialProcedures,
                assign(&mut r.special_procedures, v),
            ),

            A::SetDischargeCondition(v) => {
                r.require(RecordType::Discharge, "discharge condition")?;
                (
                    RecordField::DischargeCondition,
                    assign(&mut r.discharge_condition, v),
                )
            }
            A::SetOperationDate(v) => {
                r.require(RecordType::Operation, "operation date")?;
                (RecordField::OperationDate, assign(&mut r.operation_date, v))
            }

            A::AddMedication { list, order } => {
                let entries = r.medications_mut(list)?;
                let id = match order {
                    Some(order) => entries.push(order),
                    None => entries.append_blank(self.opened_on),
                };
                tracing::debug!(%id, ?list, "medication row added");
                (RecordField::Medications(list), true)
            }
            A::RemoveMedication { list, id } => (
                RecordField::Medications(list),
                r.medications_mut(list)?.remove(id).is_some(),
            ),
            A::UpdateMedication { list, id, order } => {
                let entries = r.medications_mut(list)?;
                let changed = entries.get(id).is_some_and(|current| *current != order)
                    && entries.update(id, order);
                (RecordField::Medications(list), changed)
            }

            A::AddLabTest { test } => {
                let id = match test {
                    Some(test) => r.lab_tests.push(test),
                    None => r.lab_tests.append_blank(self.opened_on),
                };
                tracing::debug!(%id, "lab test row added");
                (RecordField::LabTests, true)
            }
            A::RemoveLabTest(id) => (RecordField::LabTests, r.lab_tests.remove(id).is_some()),
            A::UpdateLabTest { id, test } => {
                let changed = r.lab_tests.get(id).is_some_and(|current| *current != test)
                    && r.lab_tests.update(id, test);
                (RecordField::LabTests, changed)
            }
        };

        Ok(changed.then_some(field))
    }
}

/// Discharge part of a summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DischargeSummary {
    pub diagnosis: String,
    pub hospital_course: String,
}

/// Operation part of a summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub name: String,
    pub date: String,
    pub surgeons: String,
    pub anesthesia: String,
    pub procedure: String,
}

/// Read-only digest shown on the summary tab. Empty values read "未记录".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub title: &'static str,
    pub patient_line: String,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub discharge: Option<DischargeSummary>,
    pub operation: Option<OperationSummary>,
    pub treatment_plan: String,
    /// One line per medication order; empty rows are left out.
    pub medications: Vec<String>,
}

fn or_placeholder(text: &str) -> String {
    if text.is_empty() {
        NOT_RECORDED.to_owned()
    } else {
        text.to_owned()
    }
}

impl RecordSummary {
    fn new(patient: &PatientInfo, record: &MedicalRecord) -> Self {
        let patient_line = format!(
            "{} ({}) {}岁 {} 入院日期 {} {} / {}",
            patient.name,
            patient.id,
            patient.age,
            patient.sex,
            patient.admission_date,
            patient.department,
            patient.attending,
        );

        let discharge = (record.record_type == RecordType::Discharge).then(|| DischargeSummary {
            diagnosis: or_placeholder(&record.discharge_diagnosis),
            hospital_course: or_placeholder(&record.hospital_course),
        });

        let operation = (record.record_type == RecordType::Operation).then(|| OperationSummary {
            name: or_placeholder(&record.operation_name),
            date: record
                .operation_date
                .map_or_else(|| NOT_RECORDED.to_owned(), |date| date.to_string()),
            surgeons: or_placeholder(&record.surgeons),
            anesthesia: or_placeholder(&record.anesthesia),
            procedure: or_placeholder(&record.operation_procedure),
        });

        Self {
            title: record.record_type.label(),
            patient_line,
            chief_complaint: or_placeholder(&record.chief_complaint),
            diagnosis: or_placeholder(&record.admission_diagnosis),
            discharge,
            operation,
            treatment_plan: or_placeholder(&record.treatment_plan),
            medications: record
                .medications
                .values()
                .map(MedicationOrder::summary_line)
                .filter(|line| !line.is_empty())
                .collect(),
        }
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "基本信息: {}", self.patient_line)?;
        writeln!(f, "主诉: {}", self.chief_complaint)?;
        writeln!(f, "诊断:\n{}", self.diagnosis)?;
        if let Some(discharge) = &self.discharge {
            writeln!(f, "出院诊断:\n{}", discharge.diagnosis)?;
            writeln!(f, "住院经过:\n{}", discharge.hospital_course)?;
        }
        if let Some(operation) = &self.operation {
            writeln!(f, "手术名称: {}", operation.name)?;
            writeln!(f, "手术日期: {}", operation.date)?;
            writeln!(f, "手术医师: {}", operation.surgeons)?;
            writeln!(f, "麻醉方式: {}", operation.anesthesia)?;
            writeln!(f, "手术经过:\n{}", operation.procedure)?;
        }
        write!(f, "治疗计划:\n{}", self.treatment_plan)?;
        if !self.medications.is_empty() {
            write!(f, "\n用药医嘱:")?;
            for line in &self.medications {
                write!(f, "\n{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::LabTestStatus;
    use crate::host::{FormSession, RecordingHost};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(9, 41, 27)
            .unwrap()
    }

    fn patient() -> PatientInfo {
        PatientInfo {
            id: NonEmptyText::new("P-12345").unwrap(),
            name: NonEmptyText::new("张三").unwrap(),
            age: 45,
            sex: Sex::Male,
            admission_date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            diagnosis: vec!["高血压".into(), "2型糖尿病".into()],
            attending: "李医生".into(),
            department: "内科".into(),
        }
    }

    fn open(record_type: RecordType) -> MedicalRecordForm {
        MedicalRecordForm::open(
            patient(),
            record_type,
            RecordSeed::default(),
            &CoreConfig::default(),
            now(),
        )
    }

    fn set_text(field: TextField, value: &str) -> RecordAction {
        RecordAction::SetText {
            field,
            value: value.into(),
        }
    }

    #[test]
    fn new_record_uses_defaults() {
        let form = open(RecordType::Admission);
        let record = &form.record;
        assert_eq!(record.record_date, NaiveDate::from_ymd_opt(2025, 5, 20).unwrap());
        assert_eq!(record.record_time, NaiveTime::from_hms_opt(9, 41, 0).unwrap());
        assert_eq!(record.recording_clinician, "当前医生");
        assert_eq!(record.vital_signs, VitalSigns::default());
        assert_eq!(record.consciousness, Consciousness::Alert);
        assert_eq!(record.admission_diagnosis, "高血压\n2型糖尿病");
        assert_eq!(form.tabs.active(), RecordTab::Basic);
        assert_eq!(form.title(), "入院记录");
    }

    #[test]
    fn seed_overrides_defaults_but_not_with_empty_text() {
        let mut seed = RecordSeed::default();
        seed.texts.insert(TextField::ChiefComplaint, "头痛3天".into());
        seed.texts.insert(TextField::AdmissionDiagnosis, String::new());
        seed.consciousness = Some(Consciousness::Lethargic);

        let config = CoreConfig::new("王医生", None).unwrap();
        let form = MedicalRecordForm::open(patient(), RecordType::Progress, seed, &config, now());
        assert_eq!(form.record.chief_complaint, "头痛3天");
        assert_eq!(form.record.admission_diagnosis, "高血压\n2型糖尿病");
        assert_eq!(form.record.consciousness, Consciousness::Lethargic);
        assert_eq!(form.record.recording_clinician, "王医生");
    }

    #[test]
    fn tab_switches_are_not_changes() {
        let mut session = FormSession::new(open(RecordType::Admission), RecordingHost::new());
        assert!(!session
            .dispatch(RecordAction::SelectTab(RecordTab::Summary))
            .unwrap());
        assert!(session.draft().tabs.is_active(RecordTab::Summary));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn discharge_fields_need_a_discharge_record() {
        let mut form = open(RecordType::Admission);
        assert!(matches!(
            form.apply(set_text(TextField::HospitalCourse, "平稳")),
            Err(FormError::NotApplicable(_))
        ));
        assert!(matches!(
            form.apply(RecordAction::SetDischargeCondition(Some(
                DischargeCondition::Improved
            ))),
            Err(FormError::NotApplicable("discharge condition"))
        ));
        assert!(form
            .apply(RecordAction::AddMedication {
                list: MedicationList::Discharge,
                order: None,
            })
            .is_err());

        form.apply(RecordAction::SetRecordType(RecordType::Discharge))
            .unwrap();
        assert_eq!(
            form.apply(set_text(TextField::HospitalCourse, "平稳")).unwrap(),
            Some(RecordField::Text(TextField::HospitalCourse))
        );
        form.apply(RecordAction::AddMedication {
            list: MedicationList::Discharge,
            order: None,
        })
        .unwrap();
        assert_eq!(form.record.discharge_medications.len(), 1);
    }

    #[test]
    fn operation_fields_need_an_operation_record() {
        let mut form = open(RecordType::Progress);
        assert!(form
            .apply(set_text(TextField::OperationName, "阑尾切除术"))
            .is_err());
        assert!(form
            .apply(RecordAction::SetOperationDate(Some(now().date())))
            .is_err());

        form.apply(RecordAction::SetRecordType(RecordType::Operation))
            .unwrap();
        form.apply(set_text(TextField::OperationName, "阑尾切除术"))
            .unwrap();
        assert_eq!(form.record.operation_name, "阑尾切除术");
    }

    #[test]
    fn medication_rows_are_addressed_by_id() {
        let mut form = open(RecordType::Admission);
        for _ in 0..3 {
            form.apply(RecordAction::AddMedication {
                list: MedicationList::Orders,
                order: None,
            })
            .unwrap();
        }
        let ids: Vec<EntryId> = form.record.medications.ids().collect();

        form.apply(RecordAction::RemoveMedication {
            list: MedicationList::Orders,
            id: ids[0],
        })
        .unwrap();
        let order = MedicationOrder {
            name: "二甲双胍".into(),
            dosage: "0.5g".into(),
            ..MedicationOrder::default()
        };
        assert_eq!(
            form.apply(RecordAction::UpdateMedication {
                list: MedicationList::Orders,
                id: ids[2],
                order: order.clone(),
            })
            .unwrap(),
            Some(RecordField::Medications(MedicationList::Orders))
        );
        assert_eq!(form.record.medications.get(ids[2]), Some(&order));
        assert_eq!(form.record.medications.position(ids[2]), Some(1));

        assert_eq!(
            form.apply(RecordAction::RemoveMedication {
                list: MedicationList::Orders,
                id: ids[0],
            })
            .unwrap(),
            None
        );
    }

    #[test]
    fn discharge_medications_locked_outside_discharge_records() {
        let mut form = open(RecordType::Discharge);
        form.apply(RecordAction::AddMedication {
            list: MedicationList::Discharge,
            order: None,
        })
        .unwrap();
        let id = form.record.discharge_medications.ids().next().unwrap();

        form.apply(RecordAction::SetRecordType(RecordType::Admission))
            .unwrap();
        let order = MedicationOrder {
            name: "阿司匹林".into(),
            ..MedicationOrder::default()
        };
        assert!(matches!(
            form.apply(RecordAction::UpdateMedication {
                list: MedicationList::Discharge,
                id,
                order,
            }),
            Err(FormError::NotApplicable(_))
        ));
        assert!(matches!(
            form.apply(RecordAction::RemoveMedication {
                list: MedicationList::Discharge,
                id,
            }),
            Err(FormError::NotApplicable(_))
        ));
        assert_eq!(form.record.discharge_medications.len(), 1);
    }

    #[test]
    fn blank_lab_tests_are_dated_when_opened() {
        let mut form = open(RecordType::Admission);
        form.apply(RecordAction::AddLabTest { test: None }).unwrap();
        let test = form.record.lab_tests.values().next().unwrap();
        assert_eq!(test.date, now().date());
        assert_eq!(test.status, LabTestStatus::Pending);
    }

    #[test]
    fn summary_uses_placeholders_and_type_sections() {
        let mut form = open(RecordType::Operation);
        form.apply(set_text(TextField::Surgeons, "赵医生")).unwrap();
        form.apply(RecordAction::AddMedication {
            list: MedicationList::Orders,
            order: Some(MedicationOrder {
                name: "头孢曲松".into(),
                dosage: "2g".into(),
                frequency: "qd".into(),
                route: "静滴".into(),
                duration: String::new(),
            }),
        })
        .unwrap();
        form.apply(RecordAction::AddMedication {
            list: MedicationList::Orders,
            order: None,
        })
        .unwrap();

        let summary = form.summary();
        assert_eq!(summary.title, "手术记录");
        assert_eq!(summary.chief_complaint, "未记录");
        assert_eq!(summary.diagnosis, "高血压\n2型糖尿病");
        assert!(summary.discharge.is_none());
        let operation = summary.operation.as_ref().unwrap();
        assert_eq!(operation.surgeons, "赵医生");
        assert_eq!(operation.name, "未记录");
        assert_eq!(operation.date, "未记录");
        assert_eq!(summary.medications, vec!["头孢曲松 2g qd 静滴"]);

        let text = summary.to_string();
        assert!(text.starts_with("手术记录\n基本信息: 张三 (P-12345) 45岁 男"));
        assert!(text.contains("手术医师: 赵医生"));
        assert!(text.ends_with("用药医嘱:\n头孢曲松 2g qd 静滴"));
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: RecordAction = serde_json::from_str(
            r#"{"action":"set_text","value":{"field":"chief_complaint","value":"胸痛"}}"#,
        )
        .unwrap();
        assert_eq!(action, set_text(TextField::ChiefComplaint, "胸痛"));

        let action: RecordAction =
            serde_json::from_str(r#"{"action":"set_record_time","value":"14:05"}"#).unwrap();
        assert_eq!(
            action,
            RecordAction::SetRecordTime(NaiveTime::from_hms_opt(14, 5, 0).unwrap())
        );

        let action: RecordAction = serde_json::from_str(
            r#"{"action":"add_medication","value":{"list":"orders"}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            RecordAction::AddMedication {
                list: MedicationList::Orders,
                order: None,
            }
        );
    }
}
