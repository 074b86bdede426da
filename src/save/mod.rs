use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use crate::calendar;
use crate::crafting::Furnaces;
use crate::farming::Crops;
use crate::foraging::GroundItems;
use crate::missions::{self, MissionLog, MissionProgress};
use crate::shared::*;
use crate::wildlife::Wildlife;
use crate::world::Scenes;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;
pub const DEFAULT_SAVE_NAME: &str = "Adventure";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedPosition {
    pub x: f32,
    pub y: f32,
}

/// Everything a save slot holds. Ground items, wildlife, crops and furnaces
/// are not persisted; loading clears them and scenes repopulate from their
/// first-visit rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub version: u32,
    pub name: String,
    /// 1-based position of the active scene in travel order.
    pub scene_index: usize,
    pub player: SavedPosition,
    pub clock_elapsed: f64,
    pub seconds_per_day: f64,
    pub inventory: Vec<SlotRecord>,
    pub missions: MissionProgress,
    pub created: u64,
    pub updated: u64,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            name: DEFAULT_SAVE_NAME.to_string(),
            scene_index: 1,
            player: SavedPosition::default(),
            clock_elapsed: 0.0,
            seconds_per_day: DEFAULT_SECONDS_PER_DAY,
            inventory: Vec::new(),
            missions: MissionProgress::default(),
            created: 0,
            updated: 0,
        }
    }
}

/// Summary of one slot file for a slot picker.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSlotInfo {
    pub slot: u8,
    pub name: String,
    pub scene_index: usize,
    pub day: u32,
    pub time_hhmm: String,
    pub updated: u64,
    /// The file exists but could not be parsed.
    pub corrupt: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub slot: u8,
}

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub slot: u8,
}

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Directory holding `slot_<n>.json` files.
#[derive(Resource, Debug, Clone)]
pub struct SaveDir(pub PathBuf);

impl Default for SaveDir {
    fn default() -> Self {
        Self(PathBuf::from("saves"))
    }
}

/// Slot that manual saves and the sleep autosave write to.
#[derive(Resource, Debug, Clone)]
pub struct ActiveSaveSlot {
    pub slot: u8,
    pub name: String,
}

impl Default for ActiveSaveSlot {
    fn default() -> Self {
        Self {
            slot: 1,
            name: DEFAULT_SAVE_NAME.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveDir>()
            .init_resource::<ActiveSaveSlot>()
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            .add_event::<SleepEvent>()
            .add_event::<SceneEnteredEvent>()
            .add_systems(
                Update,
                (autosave_on_sleep, handle_save_request, handle_load_request)
                    .chain()
                    .after(calendar::handle_sleep)
                    .after(missions::track_mission_events)
                    .run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

pub fn slot_path(dir: &Path, slot: u8) -> PathBuf {
    dir.join(format!("slot_{}.json", slot))
}

#[cfg(not(target_arch = "wasm32"))]
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Writes `data` to the slot and returns the file path. `updated` is stamped
/// here; `created` is kept from the file already in the slot, if any.
#[cfg(not(target_arch = "wasm32"))]
pub fn write_save(dir: &Path, slot: u8, data: &SaveData) -> Result<PathBuf, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Could not create saves directory {}: {}", dir.display(), e))?;

    let path = slot_path(dir, slot);
    let now = current_timestamp();
    let created = match read_save(dir, slot) {
        Ok(previous) if previous.created > 0 => previous.created,
        _ => now,
    };
    let file = SaveData {
        version: SAVE_VERSION,
        created,
        updated: now,
        ..data.clone()
    };

    let json =
        serde_json::to_string_pretty(&file).map_err(|e| format!("Serialization failed: {}", e))?;

    // Write to a temp file first, then rename over the slot
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(path)
}

#[cfg(target_arch = "wasm32")]
pub fn write_save(_dir: &Path, _slot: u8, _data: &SaveData) -> Result<PathBuf, String> {
    Err("Saves not available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_save(dir: &Path, slot: u8) -> Result<SaveData, String> {
    let path = slot_path(dir, slot);
    if !path.exists() {
        return Err(format!("Save slot {} does not exist", slot));
    }
    let json = fs::read_to_string(&path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let data: SaveData =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))?;

    if data.version != SAVE_VERSION {
        warn!(
            "[Save] Slot {} has version {} but current version is {}. Loading anyway.",
            slot, data.version, SAVE_VERSION
        );
    }
    Ok(data)
}

#[cfg(target_arch = "wasm32")]
pub fn read_save(_dir: &Path, _slot: u8) -> Result<SaveData, String> {
    Err("Saves not available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn delete_save(dir: &Path, slot: u8) -> Result<(), String> {
    let path = slot_path(dir, slot);
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(&path).map_err(|e| format!("Delete failed for {}: {}", path.display(), e))
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save(_dir: &Path, _slot: u8) -> Result<(), String> {
    Ok(())
}

/// Every `slot_<n>.json` in `dir`, ordered by slot number. Unreadable files
/// are listed as corrupt rather than skipped.
#[cfg(not(target_arch = "wasm32"))]
pub fn list_slots(dir: &Path) -> Vec<SaveSlotInfo> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut slots: Vec<u8> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            name.strip_prefix("slot_")?
                .strip_suffix(".json")?
                .parse::<u8>()
                .ok()
        })
        .collect();
    slots.sort_unstable();

    slots
        .into_iter()
        .map(|slot| match read_save(dir, slot) {
            Ok(data) => {
                let mut clock = GameClock::new(data.seconds_per_day);
                clock.elapsed = data.clock_elapsed;
                SaveSlotInfo {
                    slot,
                    name: data.name,
                    scene_index: data.scene_index,
                    day: clock.day(),
                    time_hhmm: clock.time_hhmm(),
                    updated: data.updated,
                    corrupt: false,
                }
            }
            Err(_) => SaveSlotInfo {
                slot,
                name: "Corrupt".to_string(),
                scene_index: 0,
                day: 0,
                time_hhmm: "--:--".to_string(),
                updated: 0,
                corrupt: true,
            },
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
pub fn list_slots(_dir: &Path) -> Vec<SaveSlotInfo> {
    Vec::new()
}

// ═══════════════════════════════════════════════════════════════════════
// SNAPSHOT / RESTORE
// ═══════════════════════════════════════════════════════════════════════

pub fn build_save_data(
    name: &str,
    scenes: &Scenes,
    player: &PlayerState,
    clock: &GameClock,
    inventory: &Inventory,
    missions: &MissionLog,
) -> SaveData {
    SaveData {
        name: name.to_string(),
        scene_index: scenes.active_index().unwrap_or(1),
        player: SavedPosition {
            x: player.position.x,
            y: player.position.y,
        },
        clock_elapsed: clock.elapsed,
        seconds_per_day: clock.seconds_per_day(),
        inventory: inventory.export_state(),
        missions: missions.export_state(),
        ..default()
    }
}

/// Restores a snapshot into the live resources and returns the scene the
/// player now stands in. The scene index is clamped into range and the
/// player wakes at full health and stamina.
pub fn apply_save_data(
    data: &SaveData,
    scenes: &mut Scenes,
    player: &mut PlayerState,
    clock: &mut GameClock,
    inventory: &mut Inventory,
    catalog: &ItemCatalog,
) -> Option<SceneId> {
    let index = data.scene_index.clamp(1, scenes.len().max(1));
    let scene_id = scenes.id_at_index(index)?;
    scenes.set_active(scene_id);

    player.position = Vec2::new(data.player.x, data.player.y);
    if let Some(scene) = scenes.active() {
        player.position = scene.clamp_to_bounds(player.position);
    }
    player.health = player.max_health;
    player.stamina = player.max_stamina;

    clock.set_seconds_per_day(data.seconds_per_day);
    clock.elapsed = data.clock_elapsed.max(0.0);

    if !inventory.import_state(catalog, &data.inventory) {
        warn!("[Save] Some inventory records could not be restored");
    }
    Some(scene_id)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Waking up writes the active slot.
fn autosave_on_sleep(
    mut sleep_events: EventReader<SleepEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    active_slot: Res<ActiveSaveSlot>,
) {
    for _ in sleep_events.read() {
        info!("[Save] Autosaving to slot {} after sleep", active_slot.slot);
        save_writer.send(SaveRequestEvent {
            slot: active_slot.slot,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    dir: Res<SaveDir>,
    scenes: Res<Scenes>,
    player: Res<PlayerState>,
    clock: Res<GameClock>,
    inventory: Res<Inventory>,
    missions: Res<MissionLog>,
) {
    for ev in save_events.read() {
        let slot = ev.slot;
        active_slot.slot = slot;

        let data = build_save_data(
            &active_slot.name,
            &scenes,
            &player,
            &clock,
            &inventory,
            &missions,
        );
        match write_save(&dir.0, slot, &data) {
            Ok(path) => {
                info!("[Save] Wrote slot {} to {}", slot, path.display());
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save to slot {} FAILED: {}", slot, e);
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut entered: EventWriter<SceneEnteredEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    dir: Res<SaveDir>,
    catalog: Res<ItemCatalog>,
    mut scenes: ResMut<Scenes>,
    mut player: ResMut<PlayerState>,
    mut clock: ResMut<GameClock>,
    mut inventory: ResMut<Inventory>,
    mut missions: ResMut<MissionLog>,
    mut furnaces: ResMut<Furnaces>,
    mut crops: ResMut<Crops>,
    mut ground: ResMut<GroundItems>,
    mut wildlife: ResMut<Wildlife>,
) {
    for ev in load_events.read() {
        let slot = ev.slot;
        let result = read_save(&dir.0, slot).and_then(|data| {
            apply_save_data(
                &data,
                &mut scenes,
                &mut player,
                &mut clock,
                &mut inventory,
                &catalog,
            )
            .map(|scene_id| (data, scene_id))
            .ok_or_else(|| "No scenes to load into".to_string())
        });

        match result {
            Ok((data, scene_id)) => {
                // Nothing placed or spawned after the save may survive it.
                furnaces.clear();
                crops.clear();
                ground.clear();
                wildlife.clear();
                missions.import_state(&data.missions);

                active_slot.slot = slot;
                active_slot.name = data.name;
                info!(
                    "[Save] Loaded slot {} into scene {} at {}",
                    slot,
                    scene_id,
                    clock.time_hhmm()
                );
                entered.send(SceneEnteredEvent { scene_id });
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Load from slot {} FAILED: {}", slot, e);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build_registries;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "aeterna_save_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn world() -> (Scenes, ItemCatalog) {
        let mut scenes = Scenes::default();
        scenes.rebuild(&SimConfig::default());
        let (catalog, ..) = build_registries();
        (scenes, catalog)
    }

    #[test]
    fn write_then_read_restores_every_field() {
        let dir = temp_dir("roundtrip");
        let (mut scenes, catalog) = world();
        let third = scenes.id_at_index(3).unwrap();
        scenes.set_active(third);

        let player = PlayerState {
            position: Vec2::new(300.0, 200.0),
            ..default()
        };
        let mut clock = GameClock::new(240.0);
        clock.elapsed = 1000.0;
        let mut inventory = Inventory::new(4, 10);
        inventory.add_item(&catalog, "log", 3);
        inventory.add_item(&catalog, "ore_copper", 5);
        let mut missions = MissionLog::default();
        missions.visited_scenes.extend([1, 3]);
        missions.slept_count = 1;

        let data = build_save_data("Coast run", &scenes, &player, &clock, &inventory, &missions);
        assert_eq!(data.scene_index, 3);
        write_save(&dir, 2, &data).unwrap();

        let loaded = read_save(&dir, 2).unwrap();
        assert_eq!(loaded.name, "Coast run");
        assert_eq!(loaded.scene_index, 3);
        assert_eq!(loaded.player, SavedPosition { x: 300.0, y: 200.0 });
        assert_eq!(loaded.clock_elapsed, 1000.0);
        assert_eq!(loaded.seconds_per_day, 240.0);
        assert_eq!(loaded.inventory, inventory.export_state());
        assert_eq!(loaded.missions, missions.export_state());
        assert!(loaded.updated > 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn apply_restores_state_and_refills_vitals() {
        let (mut scenes, catalog) = world();
        let data = SaveData {
            scene_index: 2,
            player: SavedPosition { x: 400.0, y: 300.0 },
            clock_elapsed: 500.0,
            seconds_per_day: 300.0,
            inventory: vec![SlotRecord { slot: 5, id: "log".into(), qty: 7 }],
            ..default()
        };
        let mut player = PlayerState {
            health: 3.0,
            stamina: 0.0,
            ..default()
        };
        let mut clock = GameClock::default();
        let mut inventory = Inventory::new(4, 10);
        inventory.add_item(&catalog, "rope", 2);

        let scene = apply_save_data(&data, &mut scenes, &mut player, &mut clock, &mut inventory, &catalog);
        assert_eq!(scene, scenes.id_at_index(2));
        assert_eq!(scenes.active_index(), Some(2));
        assert_eq!(player.position, Vec2::new(400.0, 300.0));
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.stamina, player.max_stamina);
        assert_eq!(clock.elapsed, 500.0);
        assert_eq!(inventory.count_item("rope"), 0);
        assert_eq!(inventory.slot(5).map(|s| s.quantity), Some(7));
    }

    #[test]
    fn scene_index_is_clamped_into_range() {
        let (mut scenes, catalog) = world();
        let mut player = PlayerState::default();
        let mut clock = GameClock::default();
        let mut inventory = Inventory::new(4, 10);

        let high = SaveData { scene_index: 99, ..default() };
        apply_save_data(&high, &mut scenes, &mut player, &mut clock, &mut inventory, &catalog);
        assert_eq!(scenes.active_index(), Some(scenes.len()));

        let zero = SaveData { scene_index: 0, ..default() };
        apply_save_data(&zero, &mut scenes, &mut player, &mut clock, &mut inventory, &catalog);
        assert_eq!(scenes.active_index(), Some(1));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let data: SaveData = serde_json::from_str(r#"{ "scene_index": 2 }"#).unwrap();
        assert_eq!(data.scene_index, 2);
        assert_eq!(data.seconds_per_day, DEFAULT_SECONDS_PER_DAY);
        assert!(data.inventory.is_empty());
        assert_eq!(data.missions, MissionProgress::default());
    }

    #[test]
    fn missing_slot_is_an_error() {
        let dir = temp_dir("missing");
        assert!(read_save(&dir, 1).is_err());
        assert!(list_slots(&dir).is_empty());
    }

    #[test]
    fn list_slots_reports_corrupt_files() {
        let dir = temp_dir("list");
        write_save(&dir, 3, &SaveData::default()).unwrap();
        fs::write(slot_path(&dir, 1), "not json").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let slots = list_slots(&dir);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].slot, 1);
        assert!(slots[0].corrupt);
        assert_eq!(slots[1].slot, 3);
        assert_eq!(slots[1].name, DEFAULT_SAVE_NAME);
        assert!(!slots[1].corrupt);

        delete_save(&dir, 3).unwrap();
        assert!(read_save(&dir, 3).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
