use crate::shared::*;

/// Seconds between strikes for every hostile species.
const HIT_COOLDOWN: f32 = 0.6;

fn spec(
    id: &str,
    speed: f32,
    max_hp: f32,
    damage: f32,
    detect_range: f32,
    wander_speed: f32,
    size: f32,
) -> SpeciesSpec {
    SpeciesSpec {
        id: id.into(),
        speed,
        wander_speed,
        max_hp,
        damage,
        detect_range,
        // Strikes land once the bodies touch.
        attack_range: size * 0.6,
        hit_cooldown: HIT_COOLDOWN,
        size,
    }
}

/// Populate the SpeciesBook.
///
/// Friendly animals have no damage and no detection range. Deer and bears
/// are catalogued but no scene spawns them yet.
pub fn populate_species(book: &mut SpeciesBook) {
    let all = [
        spec("cow", 60.0, 120.0, 0.0, 0.0, 30.0, 42.0),
        spec("pig", 70.0, 60.0, 0.0, 0.0, 36.0, 36.0),
        spec("duck", 80.0, 40.0, 0.0, 0.0, 44.0, 28.0),
        spec("deer", 90.0, 70.0, 0.0, 0.0, 50.0, 38.0),
        spec("wolf", 95.0, 80.0, 10.0, 220.0, 40.0, 34.0),
        spec("bear", 70.0, 180.0, 20.0, 250.0, 30.0, 46.0),
    ];
    for s in all {
        book.species.insert(s.id.clone(), s);
    }
}
