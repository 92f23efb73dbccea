//! Recent-results history kept by each calculator screen.
//!
//! History is a display log only: newest entry first, truncated to a fixed
//! capacity, and gone when the owning calculator is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::{BmiCategory, BodyFatCategory, UnitSystem};

/// Entries kept by the BMI calculator
pub const BMI_HISTORY_CAPACITY: usize = 5;

/// Entries kept by the body fat calculator
pub const BODY_FAT_HISTORY_CAPACITY: usize = 10;

/// Bounded, most-recent-first list
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// Create an empty history holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, dropping the oldest one beyond capacity
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One BMI result as shown in the history list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiRecord {
    pub fn new(bmi: f64, category: BmiCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            bmi,
            category,
        }
    }
}

/// One body fat result as shown in the history list
///
/// Weight and waist are kept in the unit system the form was filled in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyFatRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub body_fat: Option<f64>,
    pub category: Option<BodyFatCategory>,
    pub weight: Option<f64>,
    pub waist: Option<f64>,
    pub unit_system: UnitSystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_newest_first() {
        let mut history = History::new(3);
        history.push(1);
        history.push(2);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(history.latest(), Some(&2));
    }

    #[test]
    fn test_push_truncates_to_capacity() {
        let mut history = History::new(BMI_HISTORY_CAPACITY);
        for i in 0..8 {
            history.push(i);
        }
        assert_eq!(history.len(), BMI_HISTORY_CAPACITY);
        assert_eq!(
            history.iter().copied().collect::<Vec<_>>(),
            vec![7, 6, 5, 4, 3]
        );
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = History::new(0);
        history.push("x");
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(BODY_FAT_HISTORY_CAPACITY);
        history.push(BmiRecord::new(22.0, BmiCategory::Normal));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 10);
    }
}
