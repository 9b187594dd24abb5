//! User profile kept in the preference store.

use crate::error::AppError;
use crate::models::metrics::{parse_count, INVALID_NUMBER_FORMAT};
use crate::validation::GENDER_UNSELECTED;
use serde::{Deserialize, Serialize};

/// Labels offered by the profile form, in selector order.
pub const GENDER_CHOICES: [&str; 3] = ["male", "female", "other"];

/// Demographic and physical attributes of the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    /// Height in centimeters
    pub height: u32,
    /// Weight in kilograms
    pub weight: f32,
    pub gender: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 0,
            height: 170,
            weight: 70.0,
            gender: GENDER_CHOICES[0].to_string(),
        }
    }
}

impl Profile {
    /// Parse already-validated profile form strings.
    pub fn parse(
        name: &str,
        age: &str,
        height: &str,
        weight: &str,
        gender: &str,
    ) -> Result<Self, AppError> {
        let weight: f32 = weight
            .trim()
            .parse()
            .ok()
            .filter(|w: &f32| w.is_finite())
            .ok_or_else(|| AppError::InvalidInput(INVALID_NUMBER_FORMAT.to_string()))?;

        Ok(Self {
            name: name.trim().to_string(),
            age: parse_count(age)?,
            height: parse_count(height)?,
            weight,
            gender: gender.trim().to_string(),
        })
    }
}

/// Map a gender label to its selector value.
///
/// Missing or blank labels are unselected; labels outside
/// [`GENDER_CHOICES`] select "other".
pub fn gender_selection(label: Option<&str>) -> i32 {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return GENDER_UNSELECTED;
    };
    let position = GENDER_CHOICES
        .iter()
        .position(|choice| choice.eq_ignore_ascii_case(label))
        .unwrap_or(GENDER_CHOICES.len() - 1);
    position as i32
}
