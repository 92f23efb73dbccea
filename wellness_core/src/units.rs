//! Unit conversion between metric and imperial measurements.
//!
//! The imperial side of every conversion is rounded to one decimal, matching
//! what the forms display. The metric side is left untouched unless the
//! caller converts a whole form (see [`convert_field`]).

use serde::{Deserialize, Serialize};

use crate::UnitSystem;

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Kilograms per pound, as used by the body fat form
pub const KG_PER_LB: f64 = 0.453592;

/// Kilograms per pound (exact international definition), as used by the BMI form
pub const KG_PER_LB_EXACT: f64 = 0.45359237;

/// Metres per inch
pub const M_PER_INCH: f64 = 0.0254;

/// Unit of a length value
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Centimeters,
    Inches,
}

/// Unit of a mass value
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    Kilograms,
    Pounds,
}

/// What a form field measures, which decides its conversion factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasurementKind {
    Weight,
    Height,
    Circumference,
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a length to centimetres
pub fn to_metric_length(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Centimeters => value,
        LengthUnit::Inches => value * CM_PER_INCH,
    }
}

/// Convert centimetres to inches, rounded to one decimal
pub fn to_imperial_length(cm: f64) -> f64 {
    round1(cm / CM_PER_INCH)
}

/// Convert a mass to kilograms
pub fn to_metric_mass(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilograms => value,
        MassUnit::Pounds => value * KG_PER_LB,
    }
}

/// Convert kilograms to pounds, rounded to one decimal
pub fn to_imperial_mass(kg: f64) -> f64 {
    round1(kg / KG_PER_LB)
}

/// Convert a feet + inches height to centimetres
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * 12.0 + inches) * CM_PER_INCH
}

/// Convert a form field into the target unit system, rounding to one decimal
///
/// This is what happens to every filled-in field when the user flips the
/// unit toggle on the body fat form: values are re-expressed, not cleared.
pub fn convert_field(value: f64, kind: MeasurementKind, target: UnitSystem) -> f64 {
    match (target, kind) {
        (UnitSystem::Metric, MeasurementKind::Weight) => round1(value * KG_PER_LB),
        (UnitSystem::Metric, _) => round1(value * CM_PER_INCH),
        (UnitSystem::Imperial, MeasurementKind::Weight) => round1(value / KG_PER_LB),
        (UnitSystem::Imperial, _) => round1(value / CM_PER_INCH),
    }
}
