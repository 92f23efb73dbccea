//! Core domain types for the wellness metrics engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Anthropometric enums (gender, activity level, unit system)
//! - Classification categories for BMI and body fat
//! - The measurement input record and the derived metrics output record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Input Enums
// ============================================================================

/// Biological sex used by the sex-specific regressions
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::InvalidValue(format!("unknown gender '{}'", other))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Activity level used to scale BMR into TDEE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    #[serde(alias = "veryActive")]
    VeryActive,
}

impl ActivityLevel {
    /// Every level, in selector order
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Short human-readable description shown under the selector
    pub fn description(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise, desk job",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Heavy exercise 6-7 days/week",
            ActivityLevel::VeryActive => {
                "Very heavy exercise, physical job or training twice daily"
            }
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(Error::InvalidValue(format!("unknown activity level '{}'", s))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        };
        f.write_str(name)
    }
}

/// Unit system a form is filled in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// The other unit system
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn length_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn mass_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lbs",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(Error::InvalidValue(format!("unknown unit system '{}'", other))),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

// ============================================================================
// Classification Categories
// ============================================================================

/// BMI screening category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Fixed advice shown next to a BMI result
    pub fn health_tip(self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Consider consulting with a nutritionist about healthy weight gain strategies. \
                 Focus on nutrient-dense foods and strength training."
            }
            BmiCategory::Normal => {
                "Great job! Maintain your healthy lifestyle with regular exercise and balanced diet. \
                 Stay hydrated and get regular health check-ups."
            }
            BmiCategory::Overweight => {
                "Consider increasing physical activity and making dietary adjustments to reach a \
                 healthier weight. Small changes can make a big difference."
            }
            BmiCategory::Obese => {
                "Please consult with a healthcare provider about a weight management plan. \
                 Prioritize sustainable lifestyle changes over quick fixes."
            }
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body fat category (thresholds depend on gender)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    EssentialFat,
    Athletic,
    Fitness,
    Average,
    Obese,
}

impl BodyFatCategory {
    pub fn label(self) -> &'static str {
        match self {
            BodyFatCategory::EssentialFat => "Essential Fat",
            BodyFatCategory::Athletic => "Athletic",
            BodyFatCategory::Fitness => "Fitness",
            BodyFatCategory::Average => "Average",
            BodyFatCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BodyFatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Input and Output Records
// ============================================================================

/// Anthropometric input, already converted to metric units
///
/// Every field except gender and activity level is optional: each formula
/// picks the subset it needs and yields nothing when a field is absent.
/// Wrist and forearm are captured by the advanced form but no formula
/// uses them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BodyMeasurements {
    pub gender: Gender,
    pub age_years: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub wrist_cm: Option<f64>,
    pub forearm_cm: Option<f64>,
    pub activity_level: ActivityLevel,
}

/// Daily calorie targets derived from TDEE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalorieGoals {
    pub maintain: i64,
    pub mild_loss: i64,
    pub moderate_loss: i64,
    pub gain: i64,
}

/// Split of body weight into fat and lean mass, in the weight's own unit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyComposition {
    pub fat_mass: f64,
    pub lean_mass: f64,
}

/// Output of a full calculation pass
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
    pub body_fat_navy: Option<f64>,
    pub body_fat_bmi: Option<f64>,
    pub body_fat_jackson: Option<f64>,
    pub body_fat_category: Option<BodyFatCategory>,
    pub bmr: Option<i64>,
    pub tdee: Option<i64>,
    pub calorie_goals: Option<CalorieGoals>,
    pub body_composition: Option<BodyComposition>,
}

impl DerivedMetrics {
    /// The headline body fat figure: Navy method when available, else BMI method
    pub fn primary_body_fat(&self) -> Option<f64> {
        self.body_fat_navy.or(self.body_fat_bmi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_parsing_accepts_common_spellings() {
        assert_eq!("veryActive".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("very_active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("very-active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("SEDENTARY".parse::<ActivityLevel>().unwrap(), ActivityLevel::Sedentary);
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_activity_display_roundtrips_through_parse() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.to_string().parse::<ActivityLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_gender_and_unit_parsing() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert!("x".parse::<Gender>().is_err());
        assert_eq!("imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
    }

    #[test]
    fn test_primary_body_fat_prefers_navy() {
        let mut metrics = DerivedMetrics {
            body_fat_navy: Some(18.2),
            body_fat_bmi: Some(21.0),
            ..Default::default()
        };
        assert_eq!(metrics.primary_body_fat(), Some(18.2));

        metrics.body_fat_navy = None;
        assert_eq!(metrics.primary_body_fat(), Some(21.0));
    }

    #[test]
    fn test_calorie_goals_serialize_camel_case() {
        let goals = CalorieGoals {
            maintain: 2000,
            mild_loss: 1800,
            moderate_loss: 1600,
            gain: 2200,
        };
        let json = serde_json::to_value(goals).unwrap();
        assert_eq!(json["mildLoss"], 1800);
        assert_eq!(json["moderateLoss"], 1600);
    }
}
