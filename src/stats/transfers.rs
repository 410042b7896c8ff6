//! Transfer activity summaries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::{Element, Transfer};

/// How busy one manager has been in the transfer market.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferSummary {
    pub manager_name: String,
    pub team_name: String,
    pub transfer_count: usize,
    /// Most recent gameweek with a transfer; 0 if none.
    pub last_transfer_gameweek: u32,
}

/// A player moving in or out, with name and price resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferredPlayer {
    pub id: u32,
    pub name: String,
    /// Tenths of a million.
    pub cost: u32,
}

/// A transfer with player names resolved from bootstrap data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedTransfer {
    pub gameweek: u32,
    pub manager_id: u64,
    pub manager_name: String,
    pub player_in: TransferredPlayer,
    pub player_out: TransferredPlayer,
    pub time: String,
}

pub fn transfer_summary(manager_name: &str, team_name: &str, transfers: &[Transfer]) -> TransferSummary {
    TransferSummary {
        manager_name: manager_name.to_string(),
        team_name: team_name.to_string(),
        transfer_count: transfers.len(),
        last_transfer_gameweek: transfers.iter().map(|t| t.event).max().unwrap_or(0),
    }
}

/// Attach player names to a manager's transfers. Unknown players are
/// shown as `#<id>`.
pub fn enrich_transfers(
    manager_name: &str,
    transfers: &[Transfer],
    elements: &[Element],
) -> Vec<EnrichedTransfer> {
    let names: HashMap<u32, &str> = elements
        .iter()
        .map(|e| (e.id, e.web_name.as_str()))
        .collect();
    let name_of = |id: u32| {
        names
            .get(&id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("#{id}"))
    };

    transfers
        .iter()
        .map(|t| EnrichedTransfer {
            gameweek: t.event,
            manager_id: t.entry,
            manager_name: manager_name.to_string(),
            player_in: TransferredPlayer {
                id: t.element_in,
                name: name_of(t.element_in),
                cost: t.element_in_cost,
            },
            player_out: TransferredPlayer {
                id: t.element_out,
                name: name_of(t.element_out),
                cost: t.element_out_cost,
            },
            time: t.time.clone(),
        })
        .collect()
}

/// Group transfers by gameweek, most recent gameweek first. Order within
/// a gameweek is preserved.
pub fn group_by_gameweek(transfers: Vec<EnrichedTransfer>) -> Vec<(u32, Vec<EnrichedTransfer>)> {
    let mut grouped: BTreeMap<u32, Vec<EnrichedTransfer>> = BTreeMap::new();
    for t in transfers {
        grouped.entry(t.gameweek).or_default().push(t);
    }
    grouped.into_iter().rev().collect()
}
