//! Social history form.
//!
//! Covers occupation, tobacco, alcohol, family and social circumstances, diet, exercise,
//! sleep and, for female patients only, menstrual history.
//!
//! Counts and measurements arrive here already typed; raw text is converted by
//! [`crate::input`] before an action is built.

use super::assign;
use crate::constants::{
    ALCOHOL_TYPES, DIET_RESTRICTIONS, EXERCISE_TYPES, OCCUPATIONAL_EXPOSURES, SLEEP_ISSUES,
    TOBACCO_TYPES,
};
use crate::host::Form;
use crate::pack_years::pack_years;
use crate::tags::TagSet;
use crate::{FormError, FormResult};
use chrono::NaiveDate;
use his_types::Sex;
use serde::{Deserialize, Serialize};

/// Tobacco or alcohol use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseStatus {
    #[default]
    Never,
    Current,
    Former,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuitDesire {
    #[default]
    None,
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkingFrequency {
    #[default]
    Never,
    Occasional,
    Weekly,
    Daily,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    #[default]
    Never,
    /// Fewer than four times a month.
    Occasional,
    /// One to four times a week.
    Regular,
    Daily,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    #[default]
    Light,
    Moderate,
    Vigorous,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    #[default]
    Good,
    Fair,
    Poor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleRegularity {
    #[default]
    Regular,
    Irregular,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenstrualFlow {
    Light,
    #[default]
    Moderate,
    Heavy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenstrualPain {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Occupation {
    pub current: String,
    pub duration: String,
    pub exposures: TagSet,
    pub previous_occupations: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Smoking {
    pub status: UseStatus,
    pub types: TagSet,
    pub cigarettes_per_day: u32,
    pub start_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_age: Option<u32>,
    pub years: u32,
    /// Last computed value; stale until the next recalculation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quit_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quit_desire: Option<QuitDesire>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Alcohol {
    pub status: UseStatus,
    pub frequency: DrinkingFrequency,
    pub types: TagSet,
    pub drinks_per_week: u32,
    pub years: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_drink: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Diet {
    #[serde(rename = "type")]
    pub kind: String,
    pub restrictions: TagSet,
    pub regular_meals: bool,
    pub caffeine: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caffeine_amount: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Exercise {
    pub frequency: ExerciseFrequency,
    pub types: TagSet,
    pub minutes_per_session: u32,
    pub intensity: Intensity,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sleep {
    pub hours_per_night: f64,
    pub quality: SleepQuality,
    pub issues: TagSet,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenstrualHistory {
    pub menarche_age: u32,
    pub regularity: CycleRegularity,
    pub cycle_days: u32,
    pub flow: MenstrualFlow,
    pub pain: MenstrualPain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period: Option<NaiveDate>,
    pub menopause: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menopause_age: Option<u32>,
}

/// The social history draft.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialHistory {
    pub occupation: Occupation,
    pub smoking: Smoking,
    pub alcohol: Alcohol,
    pub marital_status: MaritalStatus,
    pub children: u32,
    pub living_arrangement: String,
    pub education: String,
    pub diet: Diet,
    pub exercise: Exercise,
    pub sleep: Sleep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menstrual_history: Option<MenstrualHistory>,
}

/// The six tag-set fields of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Exposures,
    TobaccoTypes,
    AlcoholTypes,
    DietRestrictions,
    ExerciseTypes,
    SleepIssues,
}

impl TagField {
    pub const ALL: [TagField; 6] = [
        TagField::Exposures,
        TagField::TobaccoTypes,
        TagField::AlcoholTypes,
        TagField::DietRestrictions,
        TagField::ExerciseTypes,
        TagField::SleepIssues,
    ];

    /// Preset suggestions offered next to this field.
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            TagField::Exposures => OCCUPATIONAL_EXPOSURES,
            TagField::TobaccoTypes => TOBACCO_TYPES,
            TagField::AlcoholTypes => ALCOHOL_TYPES,
            TagField::DietRestrictions => DIET_RESTRICTIONS,
            TagField::ExerciseTypes => EXERCISE_TYPES,
            TagField::SleepIssues => SLEEP_ISSUES,
        }
    }

    /// The form section the tag set belongs to.
    pub fn section(self) -> SocialHistoryField {
        match self {
            TagField::Exposures => SocialHistoryField::Occupation,
            TagField::TobaccoTypes => SocialHistoryField::Smoking,
            TagField::AlcoholTypes => SocialHistoryField::Alcohol,
            TagField::DietRestrictions => SocialHistoryField::Diet,
            TagField::ExerciseTypes => SocialHistoryField::Exercise,
            TagField::SleepIssues => SocialHistoryField::Sleep,
        }
    }
}

/// Top-level field reported to the host after a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialHistoryField {
    Occupation,
    Smoking,
    Alcohol,
    MaritalStatus,
    Children,
    LivingArrangement,
    Education,
    Diet,
    Exercise,
    Sleep,
    MenstrualHistory,
}

/// Every edit the social history form accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum SocialHistoryAction {
    /// Add a preset or free-text value. Empty and duplicate values are ignored.
    AddTag { field: TagField, value: String },
    RemoveTag { field: TagField, index: usize },

    SetCurrentOccupation(String),
    SetOccupationDuration(String),
    SetPreviousOccupations(String),

    SetSmokingStatus(UseStatus),
    SetCigarettesPerDay(u32),
    SetSmokingStartAge(u32),
    SetSmokingYears(u32),
    /// Only while the smoking status is `former`.
    SetSmokingEndAge(Option<u32>),
    SetQuitAttempts(Option<u32>),
    SetQuitDesire(Option<QuitDesire>),
    /// Fired when the daily amount or the years field loses focus.
    RecalculatePackYears,

    SetAlcoholStatus(UseStatus),
    SetDrinkingFrequency(DrinkingFrequency),
    SetDrinksPerWeek(u32),
    SetDrinkingYears(u32),
    /// Only while the alcohol status is `former`.
    SetLastDrink(Option<NaiveDate>),

    SetMaritalStatus(MaritalStatus),
    SetChildren(u32),
    SetLivingArrangement(String),
    SetEducation(String),

    SetDietType(String),
    SetRegularMeals(bool),
    SetCaffeine(bool),
    SetCaffeineAmount(Option<String>),

    SetExerciseFrequency(ExerciseFrequency),
    SetExerciseMinutes(u32),
    SetExerciseIntensity(Intensity),

    SetSleepHours(f64),
    SetSleepQuality(SleepQuality),

    SetMenarcheAge(u32),
    SetCycleRegularity(CycleRegularity),
    SetCycleDays(u32),
    SetMenstrualFlow(MenstrualFlow),
    SetMenstrualPain(MenstrualPain),
    SetLastPeriod(Option<NaiveDate>),
    SetMenopause(bool),
    /// Only once menopause is recorded.
    SetMenopauseAge(Option<u32>),
}

/// A social history draft for one patient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialHistoryForm {
    pub patient_sex: Sex,
    #[serde(default)]
    pub history: SocialHistory,
}

impl SocialHistoryForm {
    pub fn new(patient_sex: Sex, history: SocialHistory) -> Self {
        Self {
            patient_sex,
            history,
        }
    }

    /// Menstrual history is only collected for female patients.
    pub fn shows_menstrual_history(&self) -> bool {
        self.patient_sex == Sex::Female
    }

    pub fn tags(&self, field: TagField) -> &TagSet {
        match field {
            TagField::Exposures => &self.history.occupation.exposures,
            TagField::TobaccoTypes => &self.history.smoking.types,
            TagField::AlcoholTypes => &self.history.alcohol.types,
            TagField::DietRestrictions => &self.history.diet.restrictions,
            TagField::ExerciseTypes => &self.history.exercise.types,
            TagField::SleepIssues => &self.history.sleep.issues,
        }
    }

    fn tags_mut(&mut self, field: TagField) -> &mut TagSet {
        match field {
            TagField::Exposures => &mut self.history.occupation.exposures,
            TagField::TobaccoTypes => &mut self.history.smoking.types,
            TagField::AlcoholTypes => &mut self.history.alcohol.types,
            TagField::DietRestrictions => &mut self.history.diet.restrictions,
            TagField::ExerciseTypes => &mut self.history.exercise.types,
            TagField::SleepIssues => &mut self.history.sleep.issues,
        }
    }

    /// Presets of `field` that can still be added.
    pub fn available_presets(&self, field: TagField) -> Vec<&'static str> {
        self.tags(field).available_presets(field.palette())
    }

    fn edit_menstrual(
        &mut self,
        edit: impl FnOnce(&mut MenstrualHistory) -> bool,
    ) -> FormResult<bool> {
        if !self.shows_menstrual_history() {
            return Err(FormError::NotApplicable("menstrual history"));
        }
        let created = self.history.menstrual_history.is_none();
        let record = self
            .history
            .menstrual_history
            .get_or_insert_with(MenstrualHistory::default);
        Ok(edit(record) || created)
    }

    fn recalculate_pack_years(&mut self) -> bool {
        let smoking = &mut self.history.smoking;
        match pack_years(smoking.status, smoking.cigarettes_per_day, smoking.years) {
            Some(value) => assign(&mut smoking.pack_years, Some(value)),
            None => {
                tracing::debug!("pack-years preconditions not met; keeping previous value");
                false
            }
        }
    }
}

impl Form for SocialHistoryForm {
    type Action = SocialHistoryAction;
    type Field = SocialHistoryField;

    fn apply(&mut self, action: SocialHistoryAction) -> FormResult<Option<SocialHistoryField>> {
        use SocialHistoryAction as A;
        use SocialHistoryField as F;

        let h = &mut self.history;
        let (field, changed) = match action {
            A::AddTag { field, value } => (field.section(), self.tags_mut(field).add(value)),
            A::RemoveTag { field, index } => {
                (field.section(), self.tags_mut(field).remove_at(index).is_some())
            }

            A::SetCurrentOccupation(v) => (F::Occupation, assign(&mut h.occupation.current, v)),
            A::SetOccupationDuration(v) => (F::Occupation, assign(&mut h.occupation.duration, v)),
            A::SetPreviousOccupations(v) => (
                F::Occupation,
                assign(&mut h.occupation.previous_occupations, v),
            ),

            A::SetSmokingStatus(v) => (F::Smoking, assign(&mut h.smoking.status, v)),
            A::SetCigarettesPerDay(v) => (F::Smoking, assign(&mut h.smoking.cigarettes_per_day, v)),
            A::SetSmokingStartAge(v) => (F::Smoking, assign(&mut h.smoking.start_age, v)),
            A::SetSmokingYears(v) => (F::Smoking, assign(&mut h.smoking.years, v)),
            A::SetSmokingEndAge(v) => {
                if h.smoking.status != UseStatus::Former {
                    return Err(FormError::NotApplicable("smoking end age"));
                }
                (F::Smoking, assign(&mut h.smoking.end_age, v))
            }
            A::SetQuitAttempts(v) => (F::Smoking, assign(&mut h.smoking.quit_attempts, v)),
            A::SetQuitDesire(v) => (F::Smoking, assign(&mut h.smoking.quit_desire, v)),
            A::RecalculatePackYears => (F::Smoking, self.recalculate_pack_years()),

            A::SetAlcoholStatus(v) => (F::Alcohol, assign(&mut h.alcohol.status, v)),
            A::SetDrinkingFrequency(v) => (F::Alcohol, assign(&mut h.alcohol.frequency, v)),
            A::SetDrinksPerWeek(v) => (F::Alcohol, assign(&mut h.alcohol.drinks_per_week, v)),
            A::SetDrinkingYears(v) => (F::Alcohol, assign(&mut h.alcohol.years, v)),
            A::SetLastDrink(v) => {
                if h.alcohol.status != UseStatus::Former {
                    return Err(FormError::NotApplicable("last drink date"));
                }
                (F::Alcohol, assign(&mut h.alcohol.last_drink, v))
            }

            A::SetMaritalStatus(v) => (F::MaritalStatus, assign(&mut h.marital_status, v)),
            A::SetChildren(v) => (F::Children, assign(&mut h.children, v)),
            A::SetLivingArrangement(v) => {
                (F::LivingArrangement, assign(&mut h.living_arrangement, v))
            }
            A::SetEducation(v) => (F::Education, assign(&mut h.education, v)),

            A::SetDietType(v) => (F::Diet, assign(&mut h.diet.kind, v)),
            A::SetRegularMeals(v) => (F::Diet, assign(&mut h.diet.regular_meals, v)),
            A::SetCaffeine(v) => (F::Diet, assign(&mut h.diet.caffeine, v)),
            A::SetCaffeineAmount(v) => {
                if !h.diet.caffeine {
                    return Err(FormError::NotApplicable("caffeine amount"));
                }
                (F::Diet, assign(&mut h.diet.caffeine_amount, v))
            }

            A::SetExerciseFrequency(v) => (F::Exercise, assign(&mut h.exercise.frequency, v)),
            A::SetExerciseMinutes(v) => {
                (F::Exercise, assign(&mut h.exercise.minutes_per_session, v))
            }
            A::SetExerciseIntensity(v) => (F::Exercise, assign(&mut h.exercise.intensity, v)),

            A::SetSleepHours(v) => {
                if !v.is_finite() || v < 0.0 {
                    return Err(FormError::InvalidNumber {
                        field: "hours_per_night",
                        input: v.to_string(),
                    });
                }
                (F::Sleep, assign(&mut h.sleep.hours_per_night, v))
            }
            A::SetSleepQuality(v) => (F::Sleep, assign(&mut h.sleep.quality, v)),

            A::SetMenarcheAge(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.menarche_age, v))?,
            ),
            A::SetCycleRegularity(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.regularity, v))?,
            ),
            A::SetCycleDays(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.cycle_days, v))?,
            ),
            A::SetMenstrualFlow(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.flow, v))?,
            ),
            A::SetMenstrualPain(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.pain, v))?,
            ),
            A::SetLastPeriod(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.last_period, v))?,
            ),
            A::SetMenopause(v) => (
                F::MenstrualHistory,
                self.edit_menstrual(|m| assign(&mut m.menopause, v))?,
            ),
            A::SetMenopauseAge(v) => {
                let menopause = self
                    .history
                    .menstrual_history
                    .as_ref()
                    .is_some_and(|m| m.menopause);
                if self.shows_menstrual_history() && !menopause {
                    return Err(FormError::NotApplicable("menopause age"));
                }
                (
                    F::MenstrualHistory,
                    self.edit_menstrual(|m| assign(&mut m.menopause_age, v))?,
                )
            }
        };

        Ok(changed.then_some(field))
    }
}
