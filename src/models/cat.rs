use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::Point;
use crate::models::User;
use crate::validation::FieldErrors;

/// Copy of the owning user's identity, taken when the cat is written.
///
/// This is a value, not a reference: renaming the user or changing their
/// email afterwards does not touch cats that already carry a snapshot.
/// Only an owner reassignment replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
}

impl OwnerSnapshot {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub cat_name: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub birthdate: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Point>,
    pub owner: OwnerSnapshot,
}

/// Mutable cat fields, as accepted on create and owner update.
#[derive(Debug, Clone, Deserialize)]
pub struct CatInput {
    pub cat_name: String,
    pub weight: f64,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub location: Option<Point>,
}

impl CatInput {
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        errors.check(!self.cat_name.trim().is_empty(), "cat_name", "Name is required");
        errors.check(
            self.weight.is_finite() && self.weight > 0.0,
            "weight",
            "Weight must be a positive number",
        );
        errors.check(
            self.birthdate <= today,
            "birthdate",
            "Birthdate cannot be in the future",
        );
        if let Some(location) = &self.location {
            errors.check(
                (-180.0..=180.0).contains(&location.lon())
                    && (-90.0..=90.0).contains(&location.lat()),
                "location",
                "Coordinates out of range",
            );
        }
        errors.into_result()
    }

    pub fn into_cat(self, id: Uuid, owner: OwnerSnapshot) -> Cat {
        Cat {
            id,
            cat_name: self.cat_name,
            weight: self.weight,
            filename: self.filename,
            birthdate: self.birthdate,
            location: self.location,
            owner,
        }
    }

    /// Overwrite the mutable fields of `cat`. Id and owner are left alone.
    /// A missing `filename` keeps the stored one.
    pub fn apply_to(self, cat: &mut Cat) {
        cat.cat_name = self.cat_name;
        cat.weight = self.weight;
        cat.birthdate = self.birthdate;
        cat.location = self.location;
        if self.filename.is_some() {
            cat.filename = self.filename;
        }
    }
}
