use serde::{Deserialize, Serialize};

/// Counts shown on the index page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetSummary {
    pub num_drivers: u64,
    pub num_cars: u64,
    pub num_manufacturers: u64,
}
