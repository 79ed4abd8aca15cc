use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::split::SplitAccount;
use crate::tournament::Tournament;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Everything persisted together: the split accounts and the tournaments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub schema_version: u32,
    pub name: String,
    pub accounts: Vec<SplitAccount>,
    pub tournaments: Vec<Tournament>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            name: name.into(),
            accounts: Vec::new(),
            tournaments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn account_by_name(&self, name: &str) -> Option<&SplitAccount> {
        self.accounts.iter().find(|account| account.name == name)
    }

    pub fn account_by_name_mut(&mut self, name: &str) -> Option<&mut SplitAccount> {
        self.accounts
            .iter_mut()
            .find(|account| account.name == name)
    }

    pub fn tournament_by_name(&self, name: &str) -> Option<&Tournament> {
        self.tournaments
            .iter()
            .find(|tournament| tournament.name == name)
    }

    pub fn tournament_by_name_mut(&mut self, name: &str) -> Option<&mut Tournament> {
        self.tournaments
            .iter_mut()
            .find(|tournament| tournament.name == name)
    }
}
