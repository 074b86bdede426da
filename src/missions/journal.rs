use std::collections::{BTreeSet, HashSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

use super::campaign::build_campaign;

// ──────────────────────────────────────────────────────────────────────────────
// DEFINITIONS
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveKind {
    /// Hold at least `quantity` of an item.
    Collect { item_id: ItemId, quantity: u32 },
    /// Hold seeds of at least `kinds` different crops.
    SeedVariety { kinds: u32 },
    /// Have entered `visits` of the listed scenes.
    Travel { scene_ids: Vec<SceneId>, visits: u32 },
    /// Have slept `count` times.
    Sleep { count: u32 },
    OpenJournal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub lore: String,
    pub objectives: Vec<Objective>,
    pub rewards: Vec<(ItemId, u32)>,
    pub completed: bool,
    pub claimed: bool,
}

/// Persisted flags of one mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub id: String,
    pub completed: bool,
    pub claimed: bool,
}

/// Everything a save slot keeps about the journal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionProgress {
    pub visited: Vec<SceneId>,
    pub slept: u32,
    pub journal_opened: bool,
    pub missions: Vec<MissionRecord>,
}

// ──────────────────────────────────────────────────────────────────────────────
// RESOURCE
// ──────────────────────────────────────────────────────────────────────────────

/// The mission journal: campaign chapters and side missions, plus the
/// counters their objectives are measured against.
#[derive(Resource, Debug, Clone)]
pub struct MissionLog {
    pub missions: Vec<Mission>,
    pub visited_scenes: BTreeSet<SceneId>,
    pub slept_count: u32,
    pub journal_opened: bool,
}

impl Default for MissionLog {
    fn default() -> Self {
        Self::new(build_campaign())
    }
}

impl MissionLog {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self {
            missions,
            visited_scenes: BTreeSet::new(),
            slept_count: 0,
            journal_opened: false,
        }
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.id == id)
    }

    /// `(current, required)` for one objective, with current capped at required.
    pub fn progress(&self, objective: &Objective, inventory: &Inventory) -> (u32, u32) {
        let (have, need) = match &objective.kind {
            ObjectiveKind::Collect { item_id, quantity } => {
                (inventory.count_item(item_id), *quantity)
            }
            ObjectiveKind::SeedVariety { kinds } => (seed_variety(inventory), *kinds),
            ObjectiveKind::Travel { scene_ids, visits } => {
                let seen = scene_ids
                    .iter()
                    .filter(|id| self.visited_scenes.contains(id))
                    .count() as u32;
                (seen, *visits)
            }
            ObjectiveKind::Sleep { count } => (self.slept_count, *count),
            ObjectiveKind::OpenJournal => (u32::from(self.journal_opened), 1),
        };
        (have.min(need), need)
    }

    pub fn is_done(&self, mission: &Mission, inventory: &Inventory) -> bool {
        mission.objectives.iter().all(|objective| {
            let (have, need) = self.progress(objective, inventory);
            have >= need
        })
    }

    /// Re-evaluates every mission and returns the ids that just became complete.
    pub fn refresh(&mut self, inventory: &Inventory) -> Vec<String> {
        let done: Vec<bool> = self
            .missions
            .iter()
            .map(|mission| self.is_done(mission, inventory))
            .collect();
        let mut newly = Vec::new();
        for (mission, done) in self.missions.iter_mut().zip(done) {
            if done && !mission.completed {
                newly.push(mission.id.clone());
            }
            mission.completed = done;
        }
        newly
    }

    pub fn can_claim(&self, id: &str, inventory: &Inventory) -> bool {
        self.mission(id)
            .is_some_and(|mission| !mission.claimed && self.is_done(mission, inventory))
    }

    /// Grants every reward or none of them. Fails when the mission is not
    /// finished, was already claimed, or the rewards don't fit.
    pub fn claim(
        &mut self,
        id: &str,
        inventory: &mut Inventory,
        catalog: &ItemCatalog,
    ) -> Result<Vec<(ItemId, u32)>, String> {
        let Some(mission) = self.mission(id) else {
            return Err(format!("Unknown mission: {}", id));
        };
        if mission.claimed {
            return Err(format!("{} was already claimed", mission.title));
        }
        if !self.is_done(mission, inventory) {
            return Err(format!("{} is not finished yet", mission.title));
        }

        let mut staged = inventory.clone();
        for (item_id, qty) in &mission.rewards {
            if !staged.can_fit(catalog, item_id, *qty) {
                return Err("Inventory is full!".to_string());
            }
            staged.add_item(catalog, item_id, *qty);
        }
        let rewards = mission.rewards.clone();
        *inventory = staged;

        if let Some(mission) = self.missions.iter_mut().find(|m| m.id == id) {
            mission.completed = true;
            mission.claimed = true;
        }
        Ok(rewards)
    }

    pub fn export_state(&self) -> MissionProgress {
        MissionProgress {
            visited: self.visited_scenes.iter().copied().collect(),
            slept: self.slept_count,
            journal_opened: self.journal_opened,
            missions: self
                .missions
                .iter()
                .map(|mission| MissionRecord {
                    id: mission.id.clone(),
                    completed: mission.completed,
                    claimed: mission.claimed,
                })
                .collect(),
        }
    }

    /// Replaces all progress. Records for missions that no longer exist are
    /// skipped; missions missing from the records start fresh.
    pub fn import_state(&mut self, progress: &MissionProgress) {
        self.visited_scenes = progress.visited.iter().copied().collect();
        self.slept_count = progress.slept;
        self.journal_opened = progress.journal_opened;
        for mission in &mut self.missions {
            let record = progress.missions.iter().find(|r| r.id == mission.id);
            mission.completed = record.is_some_and(|r| r.completed);
            mission.claimed = record.is_some_and(|r| r.claimed);
        }
    }
}

/// Number of different seeds in the pack.
pub fn seed_variety(inventory: &Inventory) -> u32 {
    inventory
        .slots()
        .iter()
        .flatten()
        .filter(|stack| stack.item_id.starts_with("seed_"))
        .map(|stack| stack.item_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u32
}
