use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tournament participant (player) belonging to a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            registered_at: Utc::now(),
        }
    }
}

/// A set of components competing together in one tournament.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub component_ids: Vec<Uuid>,
}

impl Team {
    pub fn new(name: impl Into<String>, component_ids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            component_ids,
        }
    }

    pub fn shares_component_with(&self, other: &Team) -> bool {
        self.component_ids
            .iter()
            .any(|id| other.component_ids.contains(id))
    }
}
