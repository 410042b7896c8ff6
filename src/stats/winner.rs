//! Gameweek winner resolution.

use super::ManagerSeries;

/// Names of the manager(s) with the highest score in `gameweek`.
///
/// Managers with no result for that gameweek are left out of the
/// comparison. Ties return every tied manager in input order. No
/// managers, or a gameweek nobody has played, gives an empty list.
pub fn gameweek_winners(managers: &[ManagerSeries], gameweek: u32) -> Vec<String> {
    let scored: Vec<(&str, i32)> = managers
        .iter()
        .filter_map(|m| m.gameweek(gameweek).map(|gw| (m.name.as_str(), gw.points)))
        .collect();

    let Some(max_points) = scored.iter().map(|(_, points)| *points).max() else {
        return Vec::new();
    };

    scored
        .into_iter()
        .filter(|(_, points)| *points == max_points)
        .map(|(name, _)| name.to_string())
        .collect()
}
