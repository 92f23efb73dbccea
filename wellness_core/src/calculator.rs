//! Calculator controllers.
//!
//! Each calculator owns its own history and is what a screen talks to:
//! validate the form, run the formulas, log the result.

use serde::{Deserialize, Serialize};

use crate::history::{
    BmiRecord, BodyFatRecord, History, BMI_HISTORY_CAPACITY, BODY_FAT_HISTORY_CAPACITY,
};
use crate::metrics::{
    bmi_scale_position, body_composition, classify_bmi, compute_all, raw_bmi, raw_bmi_imperial,
};
use crate::units::round1;
use crate::validation::{BmiForm, BodyFatForm, HeightInput, ValidationReport, WeightInput};
use crate::{BmiCategory, DerivedMetrics};

/// Result panel of the BMI screen
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiReading {
    pub bmi: f64,
    pub category: BmiCategory,
    pub scale_position: f64,
    pub health_tip: String,
}

/// Controller behind the BMI screen
#[derive(Debug)]
pub struct BmiCalculator {
    history: History<BmiRecord>,
}

impl Default for BmiCalculator {
    fn default() -> Self {
        Self::new(BMI_HISTORY_CAPACITY)
    }
}

impl BmiCalculator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: History::new(history_capacity),
        }
    }

    pub fn history(&self) -> &History<BmiRecord> {
        &self.history
    }

    /// Validate and compute
    ///
    /// `Ok(None)` means every field was filled in but the numbers describe no
    /// real body (zero or negative), so there is nothing to show.
    pub fn calculate(&mut self, form: &BmiForm) -> Result<Option<BmiReading>, ValidationReport> {
        let report = form.validate();
        if !report.is_valid() {
            return Err(report);
        }

        let raw = match (form.height, form.weight) {
            (HeightInput::FeetInches { feet, inches }, WeightInput::Pounds(Some(lb))) => {
                feet.and_then(|ft| raw_bmi_imperial(ft, inches.unwrap_or(0.0), lb))
            }
            _ => form
                .height_cm()
                .zip(form.weight_kg())
                .and_then(|(h, w)| raw_bmi(h, w)),
        };

        let Some(raw) = raw else {
            tracing::debug!("BMI not computable from {:?}", form);
            return Ok(None);
        };

        let bmi = round1(raw);
        let category = classify_bmi(raw);
        self.history.push(BmiRecord::new(bmi, category));

        Ok(Some(BmiReading {
            bmi,
            category,
            scale_position: bmi_scale_position(bmi),
            health_tip: category.health_tip().to_string(),
        }))
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Controller behind the body fat screen
#[derive(Debug)]
pub struct BodyFatCalculator {
    history: History<BodyFatRecord>,
}

impl Default for BodyFatCalculator {
    fn default() -> Self {
        Self::new(BODY_FAT_HISTORY_CAPACITY)
    }
}

impl BodyFatCalculator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: History::new(history_capacity),
        }
    }

    pub fn history(&self) -> &History<BodyFatRecord> {
        &self.history
    }

    /// Validate the whole form, then run every formula
    pub fn calculate(&mut self, form: &BodyFatForm) -> Result<DerivedMetrics, ValidationReport> {
        let report = form.validate();
        if !report.is_valid() {
            tracing::debug!("Body fat form rejected: {}", report);
            return Err(report);
        }

        let mut metrics = compute_all(&form.to_measurements());

        // fat/lean split is shown in the unit the form was filled in
        if let (Some(bf), Some(weight)) = (metrics.body_fat_navy, form.weight) {
            metrics.body_composition = Some(body_composition(weight, bf));
        }

        self.history.push(BodyFatRecord {
            id: uuid::Uuid::new_v4(),
            recorded_at: chrono::Utc::now(),
            body_fat: metrics.primary_body_fat(),
            category: metrics.body_fat_category,
            weight: form.weight,
            waist: form.waist,
            unit_system: form.unit_system,
        });

        Ok(metrics)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
