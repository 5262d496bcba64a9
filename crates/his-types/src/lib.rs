//! Shared value types for the HIS form crates.
//!
//! These types are deliberately small and carry their own validation so that the census
//! boundary and the form reducers can agree on what a "name", a "sex" or a set of vital
//! signs looks like without depending on each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input did not name a known sex
    #[error("unknown sex: '{0}'")]
    UnknownSex(String),
}

/// A string type that guarantees non-empty content.
///
/// Leading and trailing whitespace is trimmed during construction; a value that is empty
/// after trimming is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, trimming the input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Administrative sex as recorded on the ward list and used to gate sex-specific history.
///
/// Census files written by the front desk use the Chinese labels, so both spellings are
/// accepted on input. Output always uses the lowercase English form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    #[serde(alias = "男")]
    Male,
    #[serde(alias = "女")]
    Female,
    #[serde(alias = "其他")]
    Other,
}

impl Sex {
    /// Display label used on patient banners.
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "男",
            Sex::Female => "女",
            Sex::Other => "其他",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sex {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" | "男" => Ok(Sex::Male),
            "female" | "女" => Ok(Sex::Female),
            "other" | "其他" => Ok(Sex::Other),
            other => Err(TextError::UnknownSex(other.to_owned())),
        }
    }
}

/// Bedside vital signs.
///
/// Blood pressure is kept as the "systolic/diastolic" text clinicians type; nothing
/// downstream computes with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalSigns {
    /// Body temperature in degrees Celsius.
    pub temperature: f64,
    pub blood_pressure: String,
    pub heart_rate: u32,
    pub respiratory_rate: u32,
    /// SpO2 percentage.
    pub oxygen_saturation: u32,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self {
            temperature: 36.5,
            blood_pressure: "120/80".into(),
            heart_rate: 75,
            respiratory_rate: 16,
            oxygen_saturation: 98,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  张三 ").expect("valid text");
        assert_eq!(text.as_str(), "张三");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_blank() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"").expect_err("blank should fail");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn sex_accepts_chinese_labels() {
        let sex: Sex = serde_json::from_str("\"女\"").expect("chinese label");
        assert_eq!(sex, Sex::Female);
        assert_eq!("男".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"female\"");
    }

    #[test]
    fn sex_rejects_unknown_value() {
        let err = "unknown".parse::<Sex>().expect_err("should reject");
        assert_eq!(err, TextError::UnknownSex("unknown".into()));
    }

    #[test]
    fn vital_signs_default_matches_admission_template() {
        let vitals = VitalSigns::default();
        assert_eq!(vitals.temperature, 36.5);
        assert_eq!(vitals.blood_pressure, "120/80");
        assert_eq!(vitals.oxygen_saturation, 98);
    }
}
