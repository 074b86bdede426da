//! Calendar domain: the continuous game clock.
//!
//! Responsible for:
//! - Advancing `GameClock` while Playing, frozen otherwise
//! - Announcing new days and seasons
//! - Sleeping: skip eight hours and wake up rested

use bevy::prelude::*;

use crate::shared::*;

/// Fired the first frame the clock shows a new day.
#[derive(Event, Debug, Clone)]
pub struct DayStartedEvent {
    pub day: u32,
    pub season: Season,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
}

/// Day the calendar last announced.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastSeenDay(pub u32);

impl Default for LastSeenDay {
    fn default() -> Self {
        Self(1)
    }
}

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastSeenDay>()
            .add_event::<SleepEvent>()
            .add_event::<DayStartedEvent>()
            .add_event::<SeasonChangeEvent>()
            .add_systems(OnEnter(GameState::Playing), resume_time)
            .add_systems(OnExit(GameState::Playing), pause_time)
            .add_systems(
                Update,
                (tick_clock, handle_sleep, announce_new_day)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── State transition hooks ───────────────────────────────────────────────────

fn resume_time(mut clock: ResMut<GameClock>, mut last_seen: ResMut<LastSeenDay>) {
    clock.paused = false;
    last_seen.0 = clock.day();
    info!(
        "[Calendar] Time resumed at {} on day {} ({})",
        clock.time_hhmm(),
        clock.day(),
        clock.season().name()
    );
}

fn pause_time(mut clock: ResMut<GameClock>) {
    clock.paused = true;
    info!("[Calendar] Time paused");
}

// ─── Systems ──────────────────────────────────────────────────────────────────

pub fn tick_clock(time: Res<Time>, mut clock: ResMut<GameClock>) {
    clock.advance(time.delta_secs_f64());
}

/// Eight hours pass and the player wakes at full health and stamina.
pub fn handle_sleep(
    mut events: EventReader<SleepEvent>,
    mut clock: ResMut<GameClock>,
    mut player: ResMut<PlayerState>,
) {
    for _ in events.read() {
        clock.sleep();
        player.health = player.max_health;
        player.stamina = player.max_stamina;
        info!(
            "[Calendar] Slept until {} on day {}",
            clock.time_hhmm(),
            clock.day()
        );
    }
}

pub fn announce_new_day(
    clock: Res<GameClock>,
    mut last_seen: ResMut<LastSeenDay>,
    mut day_events: EventWriter<DayStartedEvent>,
    mut season_events: EventWriter<SeasonChangeEvent>,
) {
    let day = clock.day();
    if day == last_seen.0 {
        return;
    }
    let previous_season = GameClock::season_of_day(last_seen.0);
    last_seen.0 = day;
    let season = clock.season();
    info!("[Calendar] Day {} begins ({})", day, season.name());
    day_events.send(DayStartedEvent { day, season });
    if season != previous_season {
        info!("[Calendar] Season changed to {}", season.name());
        season_events.send(SeasonChangeEvent { new_season: season });
    }
}
