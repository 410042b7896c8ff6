//! Core engine: the league service tying API access to the statistics.

pub mod league;

pub use league::{LeagueService, StandingsPage};
