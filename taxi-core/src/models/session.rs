use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logged-in driver. `num_visits` counts index page views for this
/// session only and starts at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub driver_id: i64,
    pub num_visits: u32,
    pub created_at: DateTime<Utc>,
}
