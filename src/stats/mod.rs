//! League statistics.
//!
//! Pure, synchronous functions over fetched league data. Nothing in this
//! module performs I/O; callers load the inputs and hand them over.

pub mod captain;
pub mod standings;
pub mod transfers;
pub mod winner;

use serde::{Deserialize, Serialize};

use crate::types::ManagerGameweek;

/// A manager together with their gameweek-by-gameweek results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerSeries {
    pub entry_id: u64,
    pub name: String,
    pub team_name: String,
    pub gameweeks: Vec<ManagerGameweek>,
}

impl ManagerSeries {
    /// The manager's result for `gameweek`, if they have one.
    pub fn gameweek(&self, gameweek: u32) -> Option<&ManagerGameweek> {
        self.gameweeks.iter().find(|gw| gw.event == gameweek)
    }
}
