//! Health metric formulas.
//!
//! Every function here is pure: same inputs, same output, no shared state.
//! A formula that lacks a required input, or whose inputs make no physical
//! sense, returns `None` instead of failing. Unrelated formulas are computed
//! independently, so [`compute_all`] can fill some fields and leave others
//! empty.
//!
//! Formulas implemented:
//! - BMI with the screening categories
//! - Body fat by the Navy circumference method, the BMI-based estimate and a
//!   simplified circumference approximation of Jackson-Pollock
//! - BMR (Mifflin-St Jeor), TDEE and calorie goals

use serde::{Deserialize, Serialize};

use crate::units::{round1, KG_PER_LB_EXACT, M_PER_INCH};
use crate::{
    ActivityLevel, BmiCategory, BodyComposition, BodyFatCategory, BodyMeasurements,
    CalorieGoals, DerivedMetrics, Gender,
};

/// Lowest body fat percentage ever reported
pub const BODY_FAT_MIN: f64 = 2.0;

/// Highest body fat percentage ever reported
pub const BODY_FAT_MAX: f64 = 60.0;

/// Round half up to the nearest integer
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Clamp a raw estimate into the reportable range and round it
fn finish_body_fat(raw: f64) -> Option<f64> {
    if !raw.is_finite() {
        return None;
    }
    Some(round1(raw.clamp(BODY_FAT_MIN, BODY_FAT_MAX)))
}

// ============================================================================
// BMI
// ============================================================================

/// Unrounded BMI; categories are taken from this value
pub(crate) fn raw_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !is_positive(height_cm) || !is_positive(weight_kg) {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Body Mass Index from metric height and weight, rounded to one decimal
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    raw_bmi(height_cm, weight_kg).map(round1)
}

/// Body Mass Index from a feet + inches height and a weight in pounds
///
/// Inches are converted straight to metres before squaring.
pub fn compute_bmi_imperial(feet: f64, inches: f64, pounds: f64) -> Option<f64> {
    raw_bmi_imperial(feet, inches, pounds).map(round1)
}

pub(crate) fn raw_bmi_imperial(feet: f64, inches: f64, pounds: f64) -> Option<f64> {
    let height_m = (feet * 12.0 + inches) * M_PER_INCH;
    let weight_kg = pounds * KG_PER_LB_EXACT;
    if !is_positive(height_m) || !is_positive(weight_kg) {
        return None;
    }
    Some(weight_kg / (height_m * height_m))
}

/// Screening category for a BMI value
///
/// Thresholds are lower-inclusive: 18.5 is Normal, 24.9 is already Overweight
/// and 29.9 is already Obese.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 24.9 {
        BmiCategory::Normal
    } else if bmi < 29.9 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Position of a BMI value on a 15..35 gauge, as a percentage in [0, 100]
pub fn bmi_scale_position(bmi: f64) -> f64 {
    if bmi < 15.0 {
        0.0
    } else if bmi > 35.0 {
        100.0
    } else {
        (bmi - 15.0) / 20.0 * 100.0
    }
}

// ============================================================================
// Body Fat
// ============================================================================

/// Body fat percentage by the U.S. Navy circumference method
///
/// Women need a hip measurement; without it the estimate is not computable.
pub fn compute_body_fat_navy(
    gender: Gender,
    height_cm: f64,
    waist_cm: f64,
    neck_cm: f64,
    hip_cm: Option<f64>,
) -> Option<f64> {
    if !is_positive(height_cm) || !is_positive(waist_cm) || !is_positive(neck_cm) {
        return None;
    }

    let raw = match gender {
        Gender::Male => {
            let girth = waist_cm - neck_cm;
            if girth <= 0.0 {
                return None;
            }
            495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0
        }
        Gender::Female => {
            let hip = hip_cm.filter(|h| is_positive(*h))?;
            let girth = waist_cm + hip - neck_cm;
            if girth <= 0.0 {
                return None;
            }
            495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()) - 450.0
        }
    };

    finish_body_fat(raw)
}

/// Body fat percentage estimated from BMI and age
pub fn compute_body_fat_bmi(gender: Gender, bmi: f64, age_years: u32) -> Option<f64> {
    if !is_positive(bmi) {
        return None;
    }
    let age = f64::from(age_years);
    let raw = match gender {
        Gender::Male => 1.20 * bmi + 0.23 * age - 16.2,
        Gender::Female => 1.20 * bmi + 0.23 * age - 5.4,
    };
    finish_body_fat(raw)
}

/// Body fat percentage by a circumference approximation of Jackson-Pollock
///
/// Real Jackson-Pollock needs skinfold calipers. This estimates body density
/// from a quadratic in waist girth minus an age term, then applies the Siri
/// equation. Neck (and hip for women) must be present even though the
/// regression only reads waist and age.
pub fn compute_body_fat_jackson_pollock(
    gender: Gender,
    waist_cm: f64,
    neck_cm: f64,
    age_years: u32,
    hip_cm: Option<f64>,
) -> Option<f64> {
    if !is_positive(waist_cm) || !is_positive(neck_cm) {
        return None;
    }
    let w = waist_cm;
    let a = f64::from(age_years);

    let density = match gender {
        Gender::Male => 1.10938 - 0.0008267 * w + 0.0000016 * w.powi(2) - 0.0002574 * a,
        Gender::Female => {
            hip_cm.filter(|h| is_positive(*h))?;
            1.0994921 - 0.0009929 * w + 0.0000023 * w.powi(2) - 0.0001392 * a
        }
    };

    if density <= 0.0 {
        return None;
    }

    // Siri equation
    finish_body_fat(495.0 / density - 450.0)
}

/// Body fat category with gender-specific thresholds
pub fn classify_body_fat(gender: Gender, percent: f64) -> BodyFatCategory {
    let (essential, athletic, fitness, average) = match gender {
        Gender::Male => (6.0, 14.0, 18.0, 25.0),
        Gender::Female => (16.0, 21.0, 25.0, 32.0),
    };

    if percent < essential {
        BodyFatCategory::EssentialFat
    } else if percent < athletic {
        BodyFatCategory::Athletic
    } else if percent < fitness {
        BodyFatCategory::Fitness
    } else if percent < average {
        BodyFatCategory::Average
    } else {
        BodyFatCategory::Obese
    }
}

/// Split a weight into fat and lean mass
pub fn body_composition(weight: f64, body_fat_percent: f64) -> BodyComposition {
    BodyComposition {
        fat_mass: round1(weight * body_fat_percent / 100.0),
        lean_mass: round1(weight * (100.0 - body_fat_percent) / 100.0),
    }
}

// ============================================================================
// Energy Expenditure
// ============================================================================

/// Basal metabolic rate (kcal/day) by the Mifflin-St Jeor equation
pub fn compute_bmr(gender: Gender, weight_kg: f64, height_cm: f64, age_years: u32) -> i64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    let bmr = match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };
    round_half_up(bmr)
}

/// Total daily energy expenditure (kcal/day)
pub fn compute_tdee(bmr: i64, activity: ActivityLevel) -> i64 {
    round_half_up(bmr as f64 * activity.multiplier())
}

/// Calorie targets for maintenance, 10%/20% deficit and 10% surplus
pub fn compute_calorie_goals(tdee: Option<i64>) -> Option<CalorieGoals> {
    let tdee = tdee.filter(|t| *t > 0)?;
    let scaled = |factor: f64| round_half_up(tdee as f64 * factor);

    Some(CalorieGoals {
        maintain: tdee,
        mild_loss: scaled(0.9),
        moderate_loss: scaled(0.8),
        gain: scaled(1.1),
    })
}

// ============================================================================
// Full Calculation Pass
// ============================================================================

/// Run every formula over whatever fields are present
pub fn compute_all(m: &BodyMeasurements) -> DerivedMetrics {
    let height = m.height_cm.filter(|h| is_positive(*h));
    let weight = m.weight_kg.filter(|w| is_positive(*w));

    let bmi_raw = height.zip(weight).and_then(|(h, w)| raw_bmi(h, w));
    let bmi = bmi_raw.map(round1);

    let body_fat_navy = match (height, m.waist_cm, m.neck_cm) {
        (Some(h), Some(waist), Some(neck)) => {
            compute_body_fat_navy(m.gender, h, waist, neck, m.hip_cm)
        }
        _ => None,
    };

    let body_fat_bmi = bmi_raw
        .zip(m.age_years)
        .and_then(|(bmi, age)| compute_body_fat_bmi(m.gender, bmi, age));

    let body_fat_jackson = match (m.waist_cm, m.neck_cm, m.age_years) {
        (Some(waist), Some(neck), Some(age)) => {
            compute_body_fat_jackson_pollock(m.gender, waist, neck, age, m.hip_cm)
        }
        _ => None,
    };

    let bmr = match (weight, height, m.age_years) {
        (Some(w), Some(h), Some(age)) => Some(compute_bmr(m.gender, w, h, age)),
        _ => None,
    };
    let tdee = bmr.map(|b| compute_tdee(b, m.activity_level));
    let calorie_goals = compute_calorie_goals(tdee);

    let primary = body_fat_navy.or(body_fat_bmi);
    let body_fat_category = primary.map(|bf| classify_body_fat(m.gender, bf));
    let composition = body_fat_navy
        .zip(weight)
        .map(|(bf, w)| body_composition(w, bf));

    if body_fat_navy.is_none() {
        tracing::debug!("Navy body fat not computable from the given measurements");
    }
    if body_fat_jackson.is_none() {
        tracing::debug!("Jackson-Pollock estimate not computable from the given measurements");
    }

    DerivedMetrics {
        bmi,
        bmi_category: bmi_raw.map(classify_bmi),
        body_fat_navy,
        body_fat_bmi,
        body_fat_jackson,
        body_fat_category,
        bmr,
        tdee,
        calorie_goals,
        body_composition: composition,
    }
}

// ============================================================================
// Method Explanations
// ============================================================================

/// Topics with a fixed explanation in the info dialog
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MethodTopic {
    Navy,
    Bmi,
    Jackson,
    Bmr,
    Tdee,
}

impl MethodTopic {
    pub fn explanation(self) -> &'static str {
        match self {
            MethodTopic::Navy => {
                "The Navy Method uses neck, waist, and hip (for women) measurements to estimate \
                 body fat. It's generally accurate for most people but may be less accurate for \
                 very muscular individuals."
            }
            MethodTopic::Bmi => {
                "The BMI Method estimates body fat based on height, weight, age, and gender. \
                 It's less accurate than methods using body measurements, especially for \
                 athletes or muscular individuals."
            }
            MethodTopic::Jackson => {
                "The Jackson-Pollock method typically uses skinfold measurements. This \
                 implementation uses a simplified estimation based on available measurements."
            }
            MethodTopic::Bmr => {
                "Basal Metabolic Rate (BMR) is the number of calories your body needs to \
                 maintain basic functions at rest, like breathing and circulation."
            }
            MethodTopic::Tdee => {
                "Total Daily Energy Expenditure (TDEE) is the total calories you burn in a day, \
                 including your BMR plus activity."
            }
        }
    }
}
