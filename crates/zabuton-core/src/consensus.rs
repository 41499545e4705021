//! on-chain consensus rule change agendas and per-wallet vote preferences

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgendaStatus {
    Upcoming,
    InProgress,
    LockedIn,
    Failed,
    Finished,
}

impl fmt::Display for AgendaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgendaStatus::Upcoming => "Upcoming",
            AgendaStatus::InProgress => "In progress",
            AgendaStatus::LockedIn => "Locked in",
            AgendaStatus::Failed => "Failed",
            AgendaStatus::Finished => "Finished",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaChoice {
    pub id: String,
    pub description: String,
    pub bits: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub agenda_id: String,
    pub description: String,
    pub mask: u16,
    pub vote_version: u32,
    pub choices: Vec<AgendaChoice>,
    pub start_time: i64,
    pub expire_time: i64,
    pub status: AgendaStatus,
    /// the wallet's current choice, "abstain" when never set
    pub voting_preference: String,
}

impl Agenda {
    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c.id == choice)
    }

    /// case-insensitive match against id and description
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.agenda_id.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

pub const DEFAULT_CHOICE: &str = "abstain";

fn standard_choices(mask: u16) -> Vec<AgendaChoice> {
    let shift = mask.trailing_zeros();
    vec![
        AgendaChoice { id: "abstain".into(), description: "abstain voting for change".into(), bits: 0 },
        AgendaChoice { id: "no".into(), description: "keep the existing consensus rules".into(), bits: 1 << shift },
        AgendaChoice { id: "yes".into(), description: "change to the new consensus rules".into(), bits: 2 << shift },
    ]
}

fn agenda(id: &str, description: &str, mask: u16, version: u32, start: i64, expire: i64, status: AgendaStatus) -> Agenda {
    Agenda {
        agenda_id: id.into(),
        description: description.into(),
        mask,
        vote_version: version,
        choices: standard_choices(mask),
        start_time: start,
        expire_time: expire,
        status,
        voting_preference: DEFAULT_CHOICE.into(),
    }
}

/// deployments known to this build, oldest first
pub fn builtin_agendas() -> Vec<Agenda> {
    vec![
        agenda(
            "headercommitments",
            "Enable header commitments as defined in DCP0005",
            0x0006,
            8,
            1_567_641_600,
            1_599_264_000,
            AgendaStatus::Finished,
        ),
        agenda(
            "treasury",
            "Enable decentralized Treasury opcodes as defined in DCP0006",
            0x0006,
            9,
            1_596_240_000,
            1_627_776_000,
            AgendaStatus::Finished,
        ),
        agenda(
            "reverttreasurypolicy",
            "Change maximum treasury expenditure policy as defined in DCP0007",
            0x0006,
            10,
            1_631_750_400,
            1_694_822_400,
            AgendaStatus::LockedIn,
        ),
        agenda(
            "explicitverupgrades",
            "Enable explicit version upgrades as defined in DCP0008",
            0x0018,
            10,
            1_631_750_400,
            1_694_822_400,
            AgendaStatus::InProgress,
        ),
        agenda(
            "changesubsidysplit",
            "Change block reward subsidy split to 10/80/10 as defined in DCP0010",
            0x0060,
            10,
            1_631_750_400,
            1_694_822_400,
            AgendaStatus::Upcoming,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_choices() {
        let agendas = builtin_agendas();
        assert!(!agendas.is_empty());
        for a in &agendas {
            assert!(a.has_choice("yes"));
            assert!(a.has_choice("no"));
            assert!(a.has_choice(DEFAULT_CHOICE));
            assert!(!a.has_choice("maybe"));
            for c in &a.choices {
                assert_eq!(c.bits & !a.mask, 0, "choice bits outside mask for {}", a.agenda_id);
            }
        }
    }

    #[test]
    fn test_search() {
        let agendas = builtin_agendas();
        let treasury: Vec<_> = agendas.iter().filter(|a| a.matches_search("TREASURY")).collect();
        assert_eq!(treasury.len(), 2);
        assert!(agendas.iter().all(|a| a.matches_search("  ")));
        assert_eq!(agendas.iter().filter(|a| a.matches_search("dcp0010")).count(), 1);
    }
}
