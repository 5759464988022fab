//! Patient vitals for heart disease risk prediction.
//!
//! Field set follows the Cleveland/Statlog heart disease data: six numeric
//! measurements and three categorical findings.

use serde::{Deserialize, Serialize};

/// Chest pain type (`cp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginal,
    Asymptomatic,
}

impl ChestPainType {
    pub const ALL: [Self; 4] = [
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginal,
        Self::Asymptomatic,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::TypicalAngina => 1,
            Self::AtypicalAngina => 2,
            Self::NonAnginal => 3,
            Self::Asymptomatic => 4,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical angina",
            Self::AtypicalAngina => "Atypical angina",
            Self::NonAnginal => "Non-anginal pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }
}

impl TryFrom<u8> for ChestPainType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| format!("Chest pain type {code} must be one of 1, 2, 3, 4"))
    }
}

/// Resting electrocardiographic result (`restecg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LvHypertrophy,
}

impl RestingEcg {
    pub const ALL: [Self; 3] = [Self::Normal, Self::StTAbnormality, Self::LvHypertrophy];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::StTAbnormality => 1,
            Self::LvHypertrophy => 2,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::StTAbnormality => "ST-T wave abnormality",
            Self::LvHypertrophy => "Left ventricular hypertrophy",
        }
    }
}

impl TryFrom<u8> for RestingEcg {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| format!("Resting ECG {code} must be one of 0, 1, 2"))
    }
}

/// Slope of the peak exercise ST segment (`slope`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSlope {
    Upsloping,
    Flat,
    Downsloping,
}

impl StSlope {
    pub const ALL: [Self; 3] = [Self::Upsloping, Self::Flat, Self::Downsloping];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Upsloping => 1,
            Self::Flat => 2,
            Self::Downsloping => 3,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Upsloping => "Upsloping",
            Self::Flat => "Flat",
            Self::Downsloping => "Downsloping",
        }
    }
}

impl TryFrom<u8> for StSlope {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| format!("ST slope {code} must be one of 1, 2, 3"))
    }
}

/// A raw form submission. `None` means the field was left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub age: Option<f64>,
    pub resting_bp: Option<f64>,
    pub cholesterol: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub st_depression: Option<f64>,
    pub major_vessels: Option<f64>,
    pub chest_pain: Option<u8>,
    pub resting_ecg: Option<u8>,
    pub st_slope: Option<u8>,
}

/// A fully populated, range-checked patient record.
///
/// The only constructor is [`PatientRecord::try_from`] on a [`PatientDraft`],
/// so every record that reaches the encoder is complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (1-120)
    pub age: u16,
    /// Resting blood pressure in mm Hg (50-200)
    pub resting_bp: u16,
    /// Serum cholesterol in mg/dl (100-600)
    pub cholesterol: u16,
    /// Maximum heart rate achieved (60-220)
    pub max_heart_rate: u16,
    /// ST depression induced by exercise relative to rest (0.0-6.0)
    pub st_depression: f64,
    /// Number of major vessels colored by fluoroscopy (0-3)
    pub major_vessels: u8,
    pub chest_pain: ChestPainType,
    pub resting_ecg: RestingEcg,
    pub st_slope: StSlope,
}

fn whole_in_range(
    label: &str,
    value: Option<f64>,
    min: u16,
    max: u16,
    errors: &mut Vec<String>,
) -> Option<u16> {
    let Some(v) = value else {
        errors.push(format!("{label} is required"));
        return None;
    };
    if !v.is_finite() || v.fract() != 0.0 {
        errors.push(format!("{label} must be a whole number"));
        return None;
    }
    if v < f64::from(min) || v > f64::from(max) {
        errors.push(format!("{label} {v} out of range [{min}, {max}]"));
        return None;
    }
    Some(v as u16)
}

fn category<T>(
    label: &str,
    value: Option<u8>,
    errors: &mut Vec<String>,
) -> Option<T>
where
    T: TryFrom<u8, Error = String>,
{
    match value {
        None => {
            errors.push(format!("{label} must be selected"));
            None
        }
        Some(code) => match T::try_from(code) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    }
}

impl TryFrom<&PatientDraft> for PatientRecord {
    type Error = Vec<String>;

    fn try_from(draft: &PatientDraft) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let age = whole_in_range("Age", draft.age, 1, 120, &mut errors);
        let resting_bp = whole_in_range("Resting BP", draft.resting_bp, 50, 200, &mut errors);
        let cholesterol = whole_in_range("Cholesterol", draft.cholesterol, 100, 600, &mut errors);
        let max_heart_rate =
            whole_in_range("Max heart rate", draft.max_heart_rate, 60, 220, &mut errors);

        let st_depression = match draft.st_depression {
            None => {
                errors.push("ST depression is required".to_string());
                None
            }
            Some(v) if !(0.0..=6.0).contains(&v) => {
                errors.push(format!("ST depression {v} out of range [0, 6]"));
                None
            }
            Some(v) => Some(v),
        };

        let major_vessels = whole_in_range("Major vessels", draft.major_vessels, 0, 3, &mut errors);

        let chest_pain = category::<ChestPainType>("Chest pain type", draft.chest_pain, &mut errors);
        let resting_ecg = category::<RestingEcg>("Resting ECG", draft.resting_ecg, &mut errors);
        let st_slope = category::<StSlope>("ST slope", draft.st_slope, &mut errors);

        match (
            age,
            resting_bp,
            cholesterol,
            max_heart_rate,
            st_depression,
            major_vessels,
            chest_pain,
            resting_ecg,
            st_slope,
        ) {
            (
                Some(age),
                Some(resting_bp),
                Some(cholesterol),
                Some(max_heart_rate),
                Some(st_depression),
                Some(major_vessels),
                Some(chest_pain),
                Some(resting_ecg),
                Some(st_slope),
            ) if errors.is_empty() => Ok(Self {
                age,
                resting_bp,
                cholesterol,
                max_heart_rate,
                st_depression,
                major_vessels: major_vessels as u8,
                chest_pain,
                resting_ecg,
                st_slope,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&PatientRecord> for PatientDraft {
    fn from(record: &PatientRecord) -> Self {
        Self {
            age: Some(f64::from(record.age)),
            resting_bp: Some(f64::from(record.resting_bp)),
            cholesterol: Some(f64::from(record.cholesterol)),
            max_heart_rate: Some(f64::from(record.max_heart_rate)),
            st_depression: Some(record.st_depression),
            major_vessels: Some(f64::from(record.major_vessels)),
            chest_pain: Some(record.chest_pain.code()),
            resting_ecg: Some(record.resting_ecg.code()),
            st_slope: Some(record.st_slope.code()),
        }
    }
}

impl PatientRecord {
    /// Numeric measurements in scaler order: age, trestbps, chol, thalach, oldpeak, ca.
    #[must_use]
    pub fn numeric_values(&self) -> [f64; 6] {
        [
            f64::from(self.age),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(self.max_heart_rate),
            self.st_depression,
            f64::from(self.major_vessels),
        ]
    }

    /// Display label and value pairs, in form order.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Age", self.age.to_string()),
            ("Resting BP (mm Hg)", self.resting_bp.to_string()),
            ("Cholesterol (mg/dl)", self.cholesterol.to_string()),
            ("Max Heart Rate", self.max_heart_rate.to_string()),
            ("ST Depression", format!("{:.1}", self.st_depression)),
            ("Major Vessels", self.major_vessels.to_string()),
            ("Chest Pain Type", self.chest_pain.code().to_string()),
            ("Resting ECG", self.resting_ecg.code().to_string()),
            ("ST Slope", self.st_slope.code().to_string()),
        ]
    }
}
