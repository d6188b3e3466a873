use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, Utc};
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::RwLock;
use vitals::{
    catalog,
    models::{DietRecommendation, EmergencyAlert, HealthReport, MedicalRecord, Veterinarian},
    reports::{WEEK, generate_reports},
};

use super::{
    auth::{Directory, Sessions},
    config::Config,
    diet::DietService,
    error::AppError,
    feed::{LiveFeed, Sources},
};

pub struct State {
    pub config: Config,
    pub directory: RwLock<Directory>,
    pub sessions: RwLock<Sessions>,
    pub records: RwLock<Vec<MedicalRecord>>,
    pub vets: Vec<Veterinarian>,
    pub reports: Vec<HealthReport>,
    /// Pet whose collar drives the live feed.
    pub feed_pet_id: String,
    pub feed: RwLock<LiveFeed>,
    pub alerts: RwLock<Vec<EmergencyAlert>>,
    pub diet: DietService,
    pub recommendations: RwLock<HashMap<String, Vec<DietRecommendation>>>,
}

impl State {
    pub fn new(config: Config, sources: &mut Sources) -> Result<Arc<Self>, AppError> {
        let diet = DietService::from_config(&config.diet)?;

        Ok(Self::with_parts(config, sources, diet))
    }

    pub fn with_parts(config: Config, sources: &mut Sources, diet: DietService) -> Arc<Self> {
        let now = Utc::now();
        let pets = catalog::pets();
        let feed_pet_id = pets.first().map(|pet| pet.id.clone()).unwrap_or_default();

        let feed = LiveFeed::seed(sources, config.history_len, now);
        let sessions = Sessions::new(session_ttl(config.session_ttl_secs), config.max_sessions);

        let mut recommendations = HashMap::new();
        for recommendation in catalog::seed_recommendations(now) {
            recommendations
                .entry(recommendation.pet_id.clone())
                .or_insert_with(Vec::new)
                .push(recommendation);
        }
        let reports = generate_reports(&mut StdRng::from_entropy(), WEEK, now.date_naive());

        Arc::new(Self {
            directory: RwLock::new(Directory::new(catalog::users(), pets)),
            sessions: RwLock::new(sessions),
            records: RwLock::new(catalog::medical_records()),
            vets: catalog::veterinarians(),
            reports,
            feed_pet_id,
            feed: RwLock::new(feed),
            alerts: RwLock::new(catalog::seed_alerts(now)),
            diet,
            recommendations: RwLock::new(recommendations),
            config,
        })
    }
}

/// Oversized values saturate to the longest lifetime chrono can represent.
fn session_ttl(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
