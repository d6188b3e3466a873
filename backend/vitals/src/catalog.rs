//! # Catalog
//!
//! Fixed demo data: the single account, its pet, medical history, nearby
//! clinics and pre-written diet plans.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    AlertStatus, DietRecommendation, DietSource, EmergencyAlert, GeoPoint, MedicalRecord, Pet,
    RecordKind, Sex, User, Veterinarian, VitalMetric,
};

/// Greater Noida, where the demo pet lives.
pub const BASE_ORIGIN: GeoPoint = GeoPoint::new(28.4744, 77.5030);

pub fn users() -> Vec<User> {
    vec![User {
        id: "user1".into(),
        name: "John Doe".into(),
        email: "john@example.com".into(),
    }]
}

pub fn pets() -> Vec<Pet> {
    vec![Pet {
        id: "pet1".into(),
        name: "Buddy".into(),
        kind: "Dog".into(),
        breed: "Golden Retriever".into(),
        age: 3,
        weight: 30.0,
        sex: Sex::Male,
        owner_id: "user1".into(),
    }]
}

pub fn medical_records() -> Vec<MedicalRecord> {
    vec![
        MedicalRecord {
            id: "med1".into(),
            pet_id: "pet1".into(),
            kind: RecordKind::Vaccination,
            date: date(2023, 10, 15),
            description: "Rabies Vaccination".into(),
            veterinarian: Some("Dr. Smith".into()),
            location: Some("PetCare Clinic".into()),
        },
        MedicalRecord {
            id: "med2".into(),
            pet_id: "pet1".into(),
            kind: RecordKind::Appointment,
            date: date(2023, 11, 20),
            description: "Annual Checkup".into(),
            veterinarian: Some("Dr. Johnson".into()),
            location: Some("Animal Hospital".into()),
        },
    ]
}

/// Alert history as of `now`: one resolved, one still active.
pub fn seed_alerts(now: DateTime<Utc>) -> Vec<EmergencyAlert> {
    vec![
        EmergencyAlert {
            id: "alert1".into(),
            pet_id: "pet1".into(),
            timestamp: now - Duration::days(2),
            metric: VitalMetric::HeartRate,
            value: 130.0,
            status: AlertStatus::Resolved,
            notes: Some("Pet was exercising heavily".into()),
        },
        EmergencyAlert {
            id: "alert2".into(),
            pet_id: "pet1".into(),
            timestamp: now - Duration::hours(5),
            metric: VitalMetric::Temperature,
            value: 39.8,
            status: AlertStatus::Active,
            notes: Some("Possible fever".into()),
        },
    ]
}

/// The plan already on file when the dashboard opens, written a day before `now`.
pub fn seed_recommendations(now: DateTime<Utc>) -> Vec<DietRecommendation> {
    vec![DietRecommendation {
        id: "diet1".into(),
        pet_id: "pet1".into(),
        timestamp: now - Duration::days(1),
        recommendation: DIET_TEMPLATES[0].to_string(),
        source: DietSource::Fallback,
    }]
}

pub fn veterinarians() -> Vec<Veterinarian> {
    [
        (
            "vet1",
            "Dr. Gaurav Dog Clinic",
            "Shop No. 5, Near Dominos, Alpha 1, Greater Noida",
            "09891036971",
            28.4746,
            77.5001,
        ),
        (
            "vet2",
            "Dr. Khullar Pet Clinic",
            "Shop No 3, Delta 1, Near Indian Bank, Greater Noida",
            "09911977411",
            28.4758,
            77.5025,
        ),
        (
            "vet3",
            "Dr. Manisha's Pet Clinic",
            "Alpha II, Commercial Belt, Near Omaxe Mall, Greater Noida",
            "08750012345",
            28.4742,
            77.5070,
        ),
        (
            "vet4",
            "Pet Care Centre",
            "Gamma 1, Jagat Farm, Greater Noida",
            "01202327667",
            28.4750,
            77.5010,
        ),
        (
            "vet5",
            "Dr. Ghosh's Pet Clinic",
            "Sector Beta 1, Greater Noida",
            "09811076543",
            28.4710,
            77.5045,
        ),
        (
            "vet6",
            "Happy Tails Vet Clinic",
            "Delta 2, Greater Noida, Near DPS School",
            "09555123456",
            28.4785,
            77.5000,
        ),
        (
            "vet7",
            "Pawsh Pet Care",
            "Pari Chowk, Greater Noida",
            "09873467890",
            28.4700,
            77.5100,
        ),
        (
            "vet8",
            "Green Vets Animal Clinic",
            "Sector Alpha 2, Greater Noida",
            "08567811223",
            28.4760,
            77.4980,
        ),
        (
            "vet9",
            "Noida Pet Hospital",
            "Sector Omega 1, Greater Noida",
            "09988944332",
            28.4690,
            77.5090,
        ),
        (
            "vet10",
            "Vets & Pets Clinic",
            "Gamma 2, Greater Noida, Near Axis Bank",
            "09011209876",
            28.4765,
            77.4975,
        ),
    ]
    .into_iter()
    .map(
        |(id, name, address, phone, latitude, longitude)| Veterinarian {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            email: String::new(),
            location: GeoPoint::new(latitude, longitude),
            distance: None,
        },
    )
    .collect()
}

/// Pre-written plans served when the language model is unavailable.
pub const DIET_TEMPLATES: &[&str] = &[
    "Based on your pet's activity level and weight, we recommend a high-protein diet with moderate fat content. Include 2 cups of premium dry food divided into two meals per day. Ensure fresh water is always available. Avoid table scraps and limit treats to 10% of daily caloric intake.",
    "Morning Meal: 1 cup of dry kibble mixed with a spoon of plain boiled chicken.\nAfternoon Meal: a small portion of carrots or green beans as a low-calorie snack.\nEvening Meal: 1 cup of dry kibble with a spoon of plain rice. Keep fresh water available throughout the day.",
    "Morning Meal: wet food portion sized for body weight, served at room temperature.\nAfternoon Meal: a handful of dental chews or apple slices without seeds.\nEvening Meal: dry food with a drizzle of fish oil for coat health. Avoid chocolate, grapes, onions and garlic.",
    "Keep meals consistent and split into three smaller portions while vitals are being monitored closely. Favour easily digestible lean proteins such as turkey or white fish, add pumpkin for fibre, and offer water after every walk.",
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
