//! # Pet Profile
//!
//! Editable pet details and medical history. Record ids are `med{n}` with `n`
//! one past the highest id in use, so deleting a record never frees an id that
//! a newer record still holds.

use chrono::NaiveDate;
use serde::Deserialize;
use vitals::models::{MedicalRecord, Pet, RecordKind, Sex};

use crate::{error::AppError, utils::sanitize_name};

const RECORD_PREFIX: &str = "med";

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub sex: Option<Sex>,
}

impl PetUpdate {
    /// Validates every field before touching `pet`, so a rejected update changes nothing.
    pub fn apply(self, pet: &mut Pet) -> Result<(), AppError> {
        let name = self.name.as_deref().map(|name| required("name", name)).transpose()?;
        let kind = self.kind.as_deref().map(|kind| required("type", kind)).transpose()?;
        let breed = self.breed.as_deref().map(|breed| required("breed", breed)).transpose()?;

        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::MalformedPayload(format!("invalid weight {weight}")));
            }
        }

        if let Some(name) = name {
            pet.name = name;
        }
        if let Some(kind) = kind {
            pet.kind = kind;
        }
        if let Some(breed) = breed {
            pet.breed = breed;
        }
        if let Some(age) = self.age {
            pet.age = age;
        }
        if let Some(weight) = self.weight {
            pet.weight = weight;
        }
        if let Some(sex) = self.sex {
            pet.sex = sex;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub date: NaiveDate,
    pub description: String,
    pub veterinarian: Option<String>,
    pub location: Option<String>,
}

impl NewRecord {
    pub fn into_record(self, id: String, pet_id: String) -> Result<MedicalRecord, AppError> {
        Ok(MedicalRecord {
            id,
            pet_id,
            kind: self.kind,
            date: self.date,
            description: required("description", &self.description)?,
            veterinarian: optional(self.veterinarian),
            location: optional(self.location),
        })
    }
}

pub fn next_record_id(records: &[MedicalRecord]) -> String {
    let highest = records
        .iter()
        .filter_map(|record| record.id.strip_prefix(RECORD_PREFIX)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    format!("{RECORD_PREFIX}{}", highest + 1)
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = sanitize_name(value);

    if value.is_empty() {
        return Err(AppError::MalformedPayload(format!("{field} is empty")));
    }

    Ok(value)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| sanitize_name(&value))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use vitals::catalog::{medical_records, pets};

    use super::*;

    fn new_record(description: &str) -> NewRecord {
        NewRecord {
            kind: RecordKind::Appointment,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            description: description.to_string(),
            veterinarian: Some("  Dr. Rao ".into()),
            location: Some("   ".into()),
        }
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut pet = pets()[0].clone();
        let update = PetUpdate {
            name: Some("  Buddy   Boy ".into()),
            weight: Some(31.5),
            ..Default::default()
        };

        update.apply(&mut pet).unwrap();

        assert_eq!(pet.name, "Buddy Boy");
        assert_eq!(pet.weight, 31.5);
        assert_eq!(pet.breed, "Golden Retriever");
        assert_eq!(pet.age, 3);
    }

    #[test]
    fn test_rejected_update_changes_nothing() {
        let mut pet = pets()[0].clone();
        let update = PetUpdate {
            name: Some("Max".into()),
            weight: Some(-2.0),
            ..Default::default()
        };

        assert!(matches!(update.apply(&mut pet), Err(AppError::MalformedPayload(_))));
        assert_eq!(pet, pets()[0]);

        let blank = PetUpdate {
            breed: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank.apply(&mut pet).is_err());
    }

    #[test]
    fn test_new_record_cleans_optional_fields() {
        let record = new_record("Dental check")
            .into_record("med3".into(), "pet1".into())
            .unwrap();

        assert_eq!(record.veterinarian.as_deref(), Some("Dr. Rao"));
        assert!(record.location.is_none());
        assert!(new_record(" ").into_record("med3".into(), "pet1".into()).is_err());
    }

    #[test]
    fn test_next_record_id_skips_past_deleted() {
        let mut records = medical_records();
        assert_eq!(next_record_id(&records), "med3");

        records.remove(0);
        assert_eq!(next_record_id(&records), "med3");
        assert_eq!(next_record_id(&[]), "med1");
    }
}
