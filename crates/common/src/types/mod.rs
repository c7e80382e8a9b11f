use serde::{Deserialize, Serialize};

/// Reachability of a single backing component.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Unavailable,
}

/// Overall service status reported by `/health`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Ok,
    Degraded,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub status: OverallStatus,
    pub redis: ComponentStatus,
}

impl Health {
    /// The service is only `ok` while its store answers.
    pub fn from_store_status(redis: ComponentStatus) -> Self {
        let status = match redis {
            ComponentStatus::Ok => OverallStatus::Ok,
            ComponentStatus::Unavailable => OverallStatus::Degraded,
        };
        Self { status, redis }
    }
}
