//! Form input records and per-field validation.
//!
//! Validation never panics and never short-circuits a calculation with an
//! error type: it produces a [`ValidationReport`] listing a message per
//! offending field, which the caller renders next to the inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::units::{
    convert_field, feet_inches_to_cm, MeasurementKind, CM_PER_INCH, KG_PER_LB, KG_PER_LB_EXACT,
};
use crate::{ActivityLevel, BodyMeasurements, Gender, UnitSystem};

/// Youngest age accepted by the body fat form
pub const MIN_AGE: f64 = 18.0;

/// Oldest age accepted by the body fat form
pub const MAX_AGE: f64 = 100.0;

/// Fields that can carry a validation message
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    Weight,
    Height,
    Neck,
    Waist,
    Hip,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Age => "age",
            FormField::Weight => "weight",
            FormField::Height => "height",
            FormField::Neck => "neck",
            FormField::Waist => "waist",
            FormField::Hip => "hip",
        };
        f.write_str(name)
    }
}

/// Per-field validation messages, in field order
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<FormField, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Body Fat Form
// ============================================================================

/// Raw body fat form, values in the form's own unit system
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BodyFatForm {
    pub gender: Gender,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub neck: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub wrist: Option<f64>,
    pub forearm: Option<f64>,
    pub activity_level: ActivityLevel,
    pub unit_system: UnitSystem,
}

impl BodyFatForm {
    /// Check every field, collecting a message per failure
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        match self.age {
            None => report.insert(FormField::Age, "Required"),
            Some(age) if !(MIN_AGE..=MAX_AGE).contains(&age) => {
                report.insert(FormField::Age, "Age must be between 18 and 100")
            }
            Some(_) => {}
        }

        match self.weight {
            None => report.insert(FormField::Weight, "Required"),
            Some(w) if w <= 0.0 || w.is_nan() => {
                report.insert(FormField::Weight, "Enter valid weight")
            }
            Some(_) => {}
        }

        match self.height {
            None => report.insert(FormField::Height, "Required"),
            Some(h) if h <= 0.0 || h.is_nan() => {
                report.insert(FormField::Height, "Enter valid height")
            }
            Some(_) => {}
        }

        if self.neck.is_none() {
            report.insert(FormField::Neck, "Required");
        }
        if self.waist.is_none() {
            report.insert(FormField::Waist, "Required");
        }
        if self.gender == Gender::Female && self.hip.is_none() {
            report.insert(FormField::Hip, "Required");
        }

        report
    }

    /// Convert the form into metric measurements for the engine
    ///
    /// This does not validate; absent fields stay absent.
    pub fn to_measurements(&self) -> BodyMeasurements {
        let length = |v: Option<f64>| match self.unit_system {
            UnitSystem::Metric => v,
            UnitSystem::Imperial => v.map(|x| x * CM_PER_INCH),
        };
        let mass = match self.unit_system {
            UnitSystem::Metric => self.weight,
            UnitSystem::Imperial => self.weight.map(|x| x * KG_PER_LB),
        };

        BodyMeasurements {
            gender: self.gender,
            age_years: self.age.filter(|a| *a >= 0.0).map(|a| a as u32),
            height_cm: length(self.height),
            weight_kg: mass,
            neck_cm: length(self.neck),
            waist_cm: length(self.waist),
            hip_cm: length(self.hip),
            wrist_cm: length(self.wrist),
            forearm_cm: length(self.forearm),
            activity_level: self.activity_level,
        }
    }

    /// Flip the unit system, re-expressing every filled-in measurement
    pub fn toggle_units(&mut self) {
        let target = self.unit_system.toggled();
        let convert = |v: Option<f64>, kind| v.map(|x| convert_field(x, kind, target));

        self.weight = convert(self.weight, MeasurementKind::Weight);
        self.height = convert(self.height, MeasurementKind::Height);
        self.neck = convert(self.neck, MeasurementKind::Circumference);
        self.waist = convert(self.waist, MeasurementKind::Circumference);
        self.hip = convert(self.hip, MeasurementKind::Circumference);
        self.wrist = convert(self.wrist, MeasurementKind::Circumference);
        self.forearm = convert(self.forearm, MeasurementKind::Circumference);
        self.unit_system = target;
    }
}

// ============================================================================
// BMI Form
// ============================================================================

/// Height as entered on the BMI form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HeightInput {
    Centimeters(Option<f64>),
    FeetInches {
        feet: Option<f64>,
        inches: Option<f64>,
    },
}

/// Weight as entered on the BMI form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WeightInput {
    Kilograms(Option<f64>),
    Pounds(Option<f64>),
}

/// Raw BMI form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiForm {
    pub height: HeightInput,
    pub weight: WeightInput,
}

impl BmiForm {
    /// Check the form; the BMI screen reports only the first problem
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let height_missing = match self.height {
            HeightInput::Centimeters(cm) => cm.is_none().then_some("Please enter your height"),
            HeightInput::FeetInches { feet, .. } => {
                feet.is_none().then_some("Please enter your height in feet")
            }
        };
        if let Some(message) = height_missing {
            report.insert(FormField::Height, message);
            return report;
        }

        let weight_missing = match self.weight {
            WeightInput::Kilograms(kg) => kg.is_none().then_some("Please enter your weight"),
            WeightInput::Pounds(lb) => lb.is_none().then_some("Please enter your weight in pounds"),
        };
        if let Some(message) = weight_missing {
            report.insert(FormField::Weight, message);
        }

        report
    }

    /// Height in centimetres, if entered
    pub fn height_cm(&self) -> Option<f64> {
        match self.height {
            HeightInput::Centimeters(cm) => cm,
            HeightInput::FeetInches { feet, inches } => {
                feet.map(|ft| feet_inches_to_cm(ft, inches.unwrap_or(0.0)))
            }
        }
    }

    /// Weight in kilograms, if entered
    pub fn weight_kg(&self) -> Option<f64> {
        match self.weight {
            WeightInput::Kilograms(kg) => kg,
            WeightInput::Pounds(lb) => lb.map(|x| x * KG_PER_LB_EXACT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_male_form() -> BodyFatForm {
        BodyFatForm {
            gender: Gender::Male,
            age: Some(30.0),
            weight: Some(80.0),
            height: Some(180.0),
            neck: Some(38.0),
            waist: Some(85.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        assert!(complete_male_form().validate().is_valid());
    }

    #[test]
    fn test_empty_form_reports_each_required_field() {
        let report = BodyFatForm::default().validate();
        assert_eq!(report.len(), 5);
        assert_eq!(report.get(FormField::Age), Some("Required"));
        assert_eq!(report.get(FormField::Neck), Some("Required"));
        assert_eq!(report.get(FormField::Hip), None);
    }

    #[test]
    fn test_age_range() {
        let mut form = complete_male_form();
        form.age = Some(17.0);
        assert_eq!(
            form.validate().get(FormField::Age),
            Some("Age must be between 18 and 100")
        );
        form.age = Some(100.0);
        assert!(form.validate().is_valid());
        form.age = Some(101.0);
        assert!(!form.validate().is_valid());
    }

    #[test]
    fn test_non_positive_weight_and_height() {
        let mut form = complete_male_form();
        form.weight = Some(0.0);
        form.height = Some(-5.0);
        let report = form.validate();
        assert_eq!(report.get(FormField::Weight), Some("Enter valid weight"));
        assert_eq!(report.get(FormField::Height), Some("Enter valid height"));
    }

    #[test]
    fn test_hip_required_only_for_female() {
        let mut form = complete_male_form();
        assert!(form.validate().get(FormField::Hip).is_none());
        form.gender = Gender::Female;
        assert_eq!(form.validate().get(FormField::Hip), Some("Required"));
    }

    #[test]
    fn test_report_display_lists_fields_in_order() {
        let mut form = complete_male_form();
        form.age = None;
        form.waist = None;
        assert_eq!(form.validate().to_string(), "age: Required; waist: Required");
    }

    #[test]
    fn test_imperial_form_converts_to_metric() {
        let form = BodyFatForm {
            weight: Some(100.0),
            height: Some(70.0),
            waist: Some(34.0),
            unit_system: UnitSystem::Imperial,
            ..complete_male_form()
        };
        let m = form.to_measurements();
        assert!((m.weight_kg.unwrap() - 45.3592).abs() < 1e-9);
        assert!((m.height_cm.unwrap() - 177.8).abs() < 1e-9);
        assert!((m.waist_cm.unwrap() - 86.36).abs() < 1e-9);
        assert_eq!(m.age_years, Some(30));
    }

    #[test]
    fn test_toggle_units_converts_filled_fields_only() {
        let mut form = complete_male_form();
        form.toggle_units();
        assert_eq!(form.unit_system, UnitSystem::Imperial);
        assert_eq!(form.weight, Some(176.4));
        assert_eq!(form.height, Some(70.9));
        assert_eq!(form.hip, None);

        form.toggle_units();
        assert_eq!(form.unit_system, UnitSystem::Metric);
        assert_eq!(form.weight, Some(80.0));
        assert_eq!(form.height, Some(180.1));
    }

    #[test]
    fn test_bmi_form_reports_first_missing_field() {
        let form = BmiForm {
            height: HeightInput::FeetInches {
                feet: None,
                inches: Some(4.0),
            },
            weight: WeightInput::Pounds(None),
        };
        let report = form.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.get(FormField::Height),
            Some("Please enter your height in feet")
        );

        let form = BmiForm {
            height: HeightInput::Centimeters(Some(170.0)),
            weight: WeightInput::Pounds(None),
        };
        assert_eq!(
            form.validate().get(FormField::Weight),
            Some("Please enter your weight in pounds")
        );
    }

    #[test]
    fn test_bmi_form_height_without_inches() {
        let form = BmiForm {
            height: HeightInput::FeetInches {
                feet: Some(6.0),
                inches: None,
            },
            weight: WeightInput::Kilograms(Some(80.0)),
        };
        assert!((form.height_cm().unwrap() - 182.88).abs() < 1e-9);
    }
}
