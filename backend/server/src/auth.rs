//! # Accounts
//!
//! Demo-grade sign in. Users live in memory, passwords are accepted as is and
//! sessions are opaque UUID v4 bearer tokens that expire after
//! `SESSION_TTL_SECS` and die with the process.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use vitals::models::{Pet, User};

use crate::{
    error::AppError,
    utils::{is_valid_email, normalize_email, sanitize_name},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub pet_id: Option<String>,
}

pub struct Directory {
    users: Vec<User>,
    pets: Vec<Pet>,
}

impl Directory {
    pub fn new(users: Vec<User>, pets: Vec<Pet>) -> Self {
        Self { users, pets }
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = normalize_email(email);

        self.users.iter().find(|user| user.email == email)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// First pet registered to the owner.
    pub fn pet_of(&self, owner_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.owner_id == owner_id)
    }

    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    pub fn pet_mut(&mut self, id: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.id == id)
    }

    pub fn register(&mut self, name: &str, email: &str) -> Result<User, AppError> {
        let name = sanitize_name(name);
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(AppError::MalformedPayload("name is empty".into()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::MalformedPayload(format!("invalid email {email}")));
        }
        if self.find_by_email(&email).is_some() {
            return Err(AppError::Conflict(format!("{email} already registered")));
        }

        let user = User {
            id: format!("user{}", self.users.len() + 1),
            name,
            email,
        };
        self.users.push(user.clone());

        Ok(user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    session: Session,
    issued: DateTime<Utc>,
    sequence: u64,
}

/// Bearer tokens with a lifetime and a cap on how many stay open at once.
pub struct Sessions {
    by_token: HashMap<String, Entry>,
    ttl: Duration,
    capacity: usize,
    opened: u64,
}

impl Sessions {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            by_token: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            opened: 0,
        }
    }

    /// Issues a token, pruning expired sessions and evicting the oldest when full.
    pub fn open(&mut self, session: Session, now: DateTime<Utc>) -> String {
        self.prune(now);

        while self.by_token.len() >= self.capacity {
            let Some(oldest) = self
                .by_token
                .iter()
                .min_by_key(|(_, entry)| entry.sequence)
                .map(|(token, _)| token.clone())
            else {
                break;
            };
            self.by_token.remove(&oldest);
        }

        let token = Uuid::new_v4().to_string();
        self.opened += 1;
        self.by_token.insert(
            token.clone(),
            Entry {
                session,
                issued: now,
                sequence: self.opened,
            },
        );

        token
    }

    pub fn get(&self, token: &str, now: DateTime<Utc>) -> Option<&Session> {
        self.by_token
            .get(token)
            .filter(|entry| !self.expired(entry, now))
            .map(|entry| &entry.session)
    }

    pub fn close(&mut self, token: &str) -> bool {
        self.by_token.remove(token).is_some()
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.by_token.retain(|_, entry| now - entry.issued < ttl);
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    fn expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.issued >= self.ttl
    }
}
