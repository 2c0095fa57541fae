use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// User record as persisted in the database file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String, // bcrypt digest, never exposed in responses
    pub role: Role,
    pub active: bool,
}

/// The whole database: an id counter plus every user in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDb {
    pub next_id: u64,
    pub users: Vec<User>,
}

impl UserDb {
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: u64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Hands out the next user id. Ids are never reused.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Handle to the JSON file backing the user collection.
///
/// Every mutation goes through `load` / `save` as a whole-file read and
/// rewrite. Concurrent writers are not coordinated; last write wins.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
    hash_cost: u32,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>, hash_cost: u32) -> Self {
        Self {
            path: path.into(),
            hash_cost,
        }
    }

    /// Reads the database file. A missing, empty or unparseable file is
    /// replaced with a freshly seeded one containing only the default admin.
    pub fn load(&self) -> anyhow::Result<UserDb> {
        match fs::read_to_string(&self.path) {
            Ok(content) if !content.trim().is_empty() => {
                match serde_json::from_str::<UserDb>(content.trim()) {
                    Ok(db) => Ok(db),
                    Err(e) => {
                        warn!(path = %self.path.display(), error = %e, "user db unparseable, reseeding");
                        self.init()
                    }
                }
            }
            Ok(_) => self.init(),
            Err(_) => self.init(),
        }
    }

    /// Serializes the whole database and replaces the file in one step.
    /// Write failures propagate to the caller.
    pub fn save(&self, db: &UserDb) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(db)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("write user db to {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace user db at {}", self.path.display()))?;
        Ok(())
    }

    fn init(&self) -> anyhow::Result<UserDb> {
        let hash = password::hash_password(DEFAULT_ADMIN_PASSWORD, self.hash_cost)?;
        let db = UserDb {
            next_id: 2,
            users: vec![User {
                id: 1,
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password_hash: hash,
                role: Role::Admin,
                active: true,
            }],
        };
        self.save(&db)?;
        info!(path = %self.path.display(), "seeded fresh user db with default admin");
        Ok(db)
    }
}
