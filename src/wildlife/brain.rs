use bevy::prelude::*;
use rand::Rng;

use crate::shared::SpeciesSpec;

// ─────────────────────────────────────────────────────────────────────────────
// Animal AI
// Friendly animals wander between random nearby points. Hostile ones switch
// to pursuit when the player comes within detection range and strike on a
// cooldown once close enough.
// ─────────────────────────────────────────────────────────────────────────────

/// How far a new wander target may lie from the animal, per axis.
const WANDER_REACH: f32 = 140.0;
/// Closer than this to the wander target counts as arrived.
const WANDER_ARRIVE_DIST: f32 = 25.0;
const WANDER_RETARGET_SECS: (f32, f32) = (0.8, 2.6);
const MIN_HIT_COOLDOWN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Wander,
    Pursue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    pub state: BehaviorState,
    pub wander_target: Vec2,
    pub wander_timer: f32,
    /// Seconds until the next strike may land. Only counts down in range.
    pub attack_timer: f32,
}

/// What the brain sees this frame.
#[derive(Debug, Clone, Copy)]
pub struct BrainContext<'a> {
    pub spec: &'a SpeciesSpec,
    pub position: Vec2,
    pub player: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrainOutput {
    pub velocity: Vec2,
    pub damage_to_player: f32,
}

impl Brain {
    pub fn new(position: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            state: BehaviorState::Wander,
            wander_target: nearby_point(position, rng),
            wander_timer: retarget_delay(rng),
            attack_timer: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32, ctx: BrainContext, rng: &mut impl Rng) -> BrainOutput {
        let spec = ctx.spec;
        let to_player = ctx.player - ctx.position;
        let distance = to_player.length();

        let next = if spec.is_hostile() && distance <= spec.detect_range {
            BehaviorState::Pursue
        } else {
            BehaviorState::Wander
        };
        if next == BehaviorState::Wander && self.state == BehaviorState::Pursue {
            // Lost the player; pick a fresh target from here.
            self.wander_timer = 0.0;
        }
        self.state = next;

        match self.state {
            BehaviorState::Pursue => self.pursue(dt, spec, to_player, distance),
            BehaviorState::Wander => self.wander(dt, spec, ctx.position, rng),
        }
    }

    fn pursue(&mut self, dt: f32, spec: &SpeciesSpec, to_player: Vec2, distance: f32) -> BrainOutput {
        let mut output = BrainOutput {
            velocity: to_player.normalize_or_zero() * spec.speed,
            damage_to_player: 0.0,
        };
        if distance <= spec.attack_range {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                output.damage_to_player = spec.damage;
                self.attack_timer = spec.hit_cooldown.max(MIN_HIT_COOLDOWN);
            }
        }
        output
    }

    fn wander(&mut self, dt: f32, spec: &SpeciesSpec, position: Vec2, rng: &mut impl Rng) -> BrainOutput {
        self.wander_timer -= dt;
        let arrived = position.distance_squared(self.wander_target)
            < WANDER_ARRIVE_DIST * WANDER_ARRIVE_DIST;
        if self.wander_timer <= 0.0 || arrived {
            self.wander_target = nearby_point(position, rng);
            self.wander_timer = retarget_delay(rng);
        }
        BrainOutput {
            velocity: (self.wander_target - position).normalize_or_zero() * spec.wander_speed,
            damage_to_player: 0.0,
        }
    }
}

fn nearby_point(origin: Vec2, rng: &mut impl Rng) -> Vec2 {
    origin
        + Vec2::new(
            rng.gen_range(-WANDER_REACH..=WANDER_REACH),
            rng.gen_range(-WANDER_REACH..=WANDER_REACH),
        )
}

fn retarget_delay(rng: &mut impl Rng) -> f32 {
    rng.gen_range(WANDER_RETARGET_SECS.0..=WANDER_RETARGET_SECS.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wolf() -> SpeciesSpec {
        SpeciesSpec {
            id: "wolf".into(),
            speed: 95.0,
            wander_speed: 40.0,
            max_hp: 80.0,
            damage: 10.0,
            detect_range: 220.0,
            attack_range: 20.0,
            hit_cooldown: 0.5,
            size: 34.0,
        }
    }

    #[test]
    fn friendly_animals_never_pursue() {
        let mut rng = StdRng::seed_from_u64(1);
        let cow = SpeciesSpec::fallback("cow");
        let mut brain = Brain::new(Vec2::ZERO, &mut rng);
        for _ in 0..100 {
            let out = brain.advance(
                0.1,
                BrainContext { spec: &cow, position: Vec2::ZERO, player: Vec2::new(5.0, 0.0) },
                &mut rng,
            );
            assert_eq!(brain.state, BehaviorState::Wander);
            assert_eq!(out.damage_to_player, 0.0);
            assert!(out.velocity.length() <= cow.wander_speed + 1e-3);
        }
    }

    #[test]
    fn hostile_pursues_inside_detect_range_and_gives_up_outside() {
        let mut rng = StdRng::seed_from_u64(2);
        let spec = wolf();
        let mut brain = Brain::new(Vec2::ZERO, &mut rng);

        let out = brain.advance(
            0.1,
            BrainContext { spec: &spec, position: Vec2::ZERO, player: Vec2::new(200.0, 0.0) },
            &mut rng,
        );
        assert_eq!(brain.state, BehaviorState::Pursue);
        assert!((out.velocity - Vec2::new(95.0, 0.0)).length() < 1e-3);

        brain.advance(
            0.1,
            BrainContext { spec: &spec, position: Vec2::ZERO, player: Vec2::new(300.0, 0.0) },
            &mut rng,
        );
        assert_eq!(brain.state, BehaviorState::Wander);
    }

    #[test]
    fn strikes_land_on_cooldown_only_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let spec = wolf();
        let mut brain = Brain::new(Vec2::ZERO, &mut rng);
        let near = BrainContext { spec: &spec, position: Vec2::ZERO, player: Vec2::new(10.0, 0.0) };

        assert_eq!(brain.advance(0.25, near, &mut rng).damage_to_player, 10.0);
        assert_eq!(brain.attack_timer, 0.5);

        // Out of striking range the timer does not run down.
        let chasing = BrainContext { player: Vec2::new(100.0, 0.0), ..near };
        for _ in 0..20 {
            assert_eq!(brain.advance(0.25, chasing, &mut rng).damage_to_player, 0.0);
        }
        assert_eq!(brain.attack_timer, 0.5);

        let hits: f32 = (0..12)
            .map(|_| brain.advance(0.25, near, &mut rng).damage_to_player)
            .sum();
        // 3 s in range with a 0.5 s cooldown.
        assert_eq!(hits, 60.0);
    }

    #[test]
    fn cooldown_has_a_floor() {
        let mut rng = StdRng::seed_from_u64(4);
        let spec = SpeciesSpec { hit_cooldown: 0.0, ..wolf() };
        let mut brain = Brain::new(Vec2::ZERO, &mut rng);
        let near = BrainContext { spec: &spec, position: Vec2::ZERO, player: Vec2::new(1.0, 0.0) };
        brain.advance(0.01, near, &mut rng);
        assert_eq!(brain.attack_timer, MIN_HIT_COOLDOWN);
    }

    #[test]
    fn wander_retargets_on_arrival() {
        let mut rng = StdRng::seed_from_u64(5);
        let spec = SpeciesSpec::fallback("duck");
        let mut brain = Brain::new(Vec2::ZERO, &mut rng);
        brain.wander_target = Vec2::new(5.0, 5.0);
        brain.wander_timer = 10.0;
        brain.advance(0.1, BrainContext { spec: &spec, position: Vec2::ZERO, player: Vec2::splat(999.0) }, &mut rng);
        assert_ne!(brain.wander_target, Vec2::new(5.0, 5.0));
        assert!(brain.wander_timer >= 0.8 && brain.wander_timer <= 2.6);
    }
}
