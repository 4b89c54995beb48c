//! Enemy entities
//!
//! Each enemy flies from the arena edge toward the center. Inside the zone
//! radius its mask is compared against the player's exactly once; the
//! outcome is emitted and the enemy is removed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::StepContext;
use super::events::{Outcome, SimEvent};
use super::reducer::GameAction;
use super::rng::uniform;
use super::state::Mask;
use crate::perpendicular;
use crate::settings::Tuning;

/// Capabilities the simulation drives on every live entity each step
pub trait Actor {
    /// Integrate movement over `dt_ms`
    fn update_position(&mut self, dt_ms: f32, ctx: &mut StepContext<'_>);
    /// Run the proximity check; tells the caller whether to keep the entity
    fn try_resolve(&mut self, ctx: &mut StepContext<'_>) -> Fate;
}

/// What happened to an entity this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    Resolved(Outcome),
    /// Reached the center without a mask check
    Expired,
}

impl Fate {
    pub fn is_destroyed(&self) -> bool {
        !matches!(self, Fate::Alive)
    }
}

/// Lateral drift state for unpredictable enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zigzag {
    /// Time since the last velocity change (ms)
    pub timer_ms: f32,
    /// Time until the next velocity change (ms), re-rolled on every change
    pub interval_ms: f32,
    /// Maximum sideways speed, fixed at spawn
    pub amplitude: f32,
}

impl Zigzag {
    pub fn roll(ctx: &mut StepContext<'_>) -> Self {
        let (i_lo, i_hi) = ctx.tuning.zigzag_interval_ms;
        let (a_lo, a_hi) = ctx.tuning.zigzag_amplitude;
        Self {
            timer_ms: 0.0,
            interval_ms: uniform(ctx.rng, i_lo, i_hi),
            amplitude: uniform(ctx.rng, a_lo, a_hi),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Constant velocity at the target
    Straight,
    Zigzag(Zigzag),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Mask needed to block this enemy; also its presentation key
    pub mask: Mask,
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub speed: f32,
    pub target: Vec2,
    /// Set once the mask check has run
    pub resolved: bool,
    pub movement: Movement,
}

impl Enemy {
    /// New enemy at `pos`, already heading for `target`
    pub fn new(
        id: u32,
        mask: Mask,
        pos: Vec2,
        speed: f32,
        target: Vec2,
        movement: Movement,
    ) -> Self {
        let vel = (target - pos).normalize_or_zero() * speed;
        Self {
            id,
            mask,
            pos,
            vel,
            speed,
            target,
            resolved: false,
            movement,
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        self.pos.distance(self.target)
    }

    pub fn is_zigzag(&self) -> bool {
        matches!(self.movement, Movement::Zigzag(_))
    }

    /// Emit the outcome of a mask check
    fn resolve(&self, outcome: Outcome, ctx: &mut StepContext<'_>) {
        let tuning: &Tuning = ctx.tuning;
        match outcome {
            Outcome::Success => {
                ctx.events.dispatch(GameAction::AddScore(tuning.score_per_hit));
                ctx.events.dispatch(GameAction::IncrementCombo);
            }
            Outcome::Fail => {
                ctx.events.dispatch(GameAction::TakeDamage(tuning.damage_per_hit));
                ctx.events.dispatch(GameAction::ResetCombo);
                ctx.events.dispatch(GameAction::TriggerShake);
            }
        }
        ctx.events.push(SimEvent::EnemyResolved {
            id: self.id,
            mask: self.mask,
            outcome,
            pos: self.pos,
        });
        log::debug!("Enemy {} ({:?}) resolved: {:?}", self.id, self.mask, outcome);
    }
}

impl Actor for Enemy {
    fn update_position(&mut self, dt_ms: f32, ctx: &mut StepContext<'_>) {
        if let Movement::Zigzag(zigzag) = &mut self.movement {
            zigzag.timer_ms += dt_ms;
            if zigzag.timer_ms >= zigzag.interval_ms {
                let (lo, hi) = ctx.tuning.zigzag_interval_ms;
                zigzag.timer_ms = 0.0;
                zigzag.interval_ms = uniform(ctx.rng, lo, hi);

                let forward = (self.target - self.pos).normalize_or_zero();
                let offset = uniform(ctx.rng, -1.0, 1.0) * zigzag.amplitude;
                self.vel = forward * self.speed + perpendicular(forward) * offset;
            }
        }

        let step = self.vel * (dt_ms / 1000.0);
        let to_target = self.target - self.pos;
        // Never fly past the center
        if step.dot(to_target) > 0.0 && step.length_squared() >= to_target.length_squared() {
            self.pos = self.target;
        } else {
            self.pos += step;
        }
    }

    fn try_resolve(&mut self, ctx: &mut StepContext<'_>) -> Fate {
        let distance = self.distance_to_target();

        if distance < ctx.tuning.zone_radius && !self.resolved {
            self.resolved = true;
            match ctx.player.map(|player| player.mask()) {
                Some(held) => {
                    let outcome = if held == self.mask {
                        Outcome::Success
                    } else {
                        Outcome::Fail
                    };
                    self.resolve(outcome, ctx);
                    return Fate::Resolved(outcome);
                }
                None => {
                    log::warn!("Enemy {} reached the zone with no player; skipping", self.id);
                }
            }
        }

        if distance < ctx.tuning.reach_epsilon {
            ctx.events.push(SimEvent::EnemyExpired {
                id: self.id,
                pos: self.pos,
            });
            return Fate::Expired;
        }

        Fate::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::EventQueue;
    use crate::sim::player::Player;
    use crate::sim::rng::{RngState, SimRng};

    const TARGET: Vec2 = Vec2::new(400.0, 300.0);

    fn straight(id: u32, mask: Mask, pos: Vec2, speed: f32) -> Enemy {
        Enemy::new(id, mask, pos, speed, TARGET, Movement::Straight)
    }

    fn zigzagging(id: u32, mask: Mask, pos: Vec2, speed: f32, zigzag: Zigzag) -> Enemy {
        Enemy::new(id, mask, pos, speed, TARGET, Movement::Zigzag(zigzag))
    }

    struct Harness {
        rng: SimRng,
        tuning: Tuning,
        events: EventQueue,
        player: Player,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: RngState::new(2024).to_rng(),
                tuning: Tuning::default(),
                events: EventQueue::new(),
                player: Player::new(),
            }
        }

        fn hold(&mut self, mask: Mask) {
            self.player.hold(mask, &mut self.events);
            self.events.drain();
        }

        /// Step until the enemy is destroyed; returns its fate and the actions it emitted
        fn run(&mut self, enemy: &mut Enemy, with_player: bool) -> (Fate, Vec<GameAction>) {
            let mut fate = Fate::Alive;
            for _ in 0..2000 {
                let player = with_player.then_some(&self.player);
                let mut ctx =
                    StepContext::new(&mut self.rng, &self.tuning, &mut self.events, player);
                enemy.update_position(16.0, &mut ctx);
                fate = enemy.try_resolve(&mut ctx);
                if fate.is_destroyed() {
                    break;
                }
            }
            let actions = self.events.drain().iter().filter_map(SimEvent::action).collect();
            (fate, actions)
        }
    }

    #[test]
    fn test_velocity_aims_at_target() {
        let enemy = straight(1, Mask::Work, Vec2::new(400.0, -50.0), 100.0);
        assert!((enemy.vel.length() - 100.0).abs() < 1e-3);
        assert!(enemy.vel.x.abs() < 1e-3);
        assert!(enemy.vel.y > 0.0);
    }

    #[test]
    fn test_matching_mask_scores() {
        let mut h = Harness::new();
        h.hold(Mask::Work);
        let mut enemy = straight(1, Mask::Work, Vec2::new(-50.0, 300.0), 150.0);

        let (fate, actions) = h.run(&mut enemy, true);
        assert_eq!(fate, Fate::Resolved(Outcome::Success));
        assert_eq!(actions, vec![GameAction::AddScore(10), GameAction::IncrementCombo]);
        assert!(enemy.resolved);
        assert!(enemy.distance_to_target() < 80.0);
    }

    #[test]
    fn test_wrong_mask_damages() {
        let mut h = Harness::new();
        h.hold(Mask::Family);
        let mut enemy = straight(2, Mask::Social, Vec2::new(850.0, 300.0), 150.0);

        let (fate, actions) = h.run(&mut enemy, true);
        assert_eq!(fate, Fate::Resolved(Outcome::Fail));
        assert_eq!(
            actions,
            vec![GameAction::TakeDamage(10), GameAction::ResetCombo, GameAction::TriggerShake]
        );
    }

    #[test]
    fn test_neutral_never_blocks() {
        let mut h = Harness::new();
        let mut enemy = straight(3, Mask::Family, Vec2::new(400.0, 650.0), 120.0);
        let (fate, actions) = h.run(&mut enemy, true);
        assert_eq!(fate, Fate::Resolved(Outcome::Fail));
        assert!(!actions.iter().any(|a| matches!(a, GameAction::AddScore(_))));
    }

    #[test]
    fn test_resolves_at_most_once() {
        let mut h = Harness::new();
        let mut enemy = straight(4, Mask::Work, TARGET + Vec2::new(50.0, 0.0), 100.0);
        let mut ctx = StepContext::new(&mut h.rng, &h.tuning, &mut h.events, Some(&h.player));
        assert_eq!(enemy.try_resolve(&mut ctx), Fate::Resolved(Outcome::Fail));
        // A second check on the same enemy is silent
        assert_eq!(enemy.try_resolve(&mut ctx), Fate::Alive);
        let damage = h
            .events
            .drain()
            .iter()
            .filter(|e| matches!(e, SimEvent::Action(GameAction::TakeDamage(_))))
            .count();
        assert_eq!(damage, 1);
    }

    #[test]
    fn test_no_player_expires_without_scoring() {
        let mut h = Harness::new();
        let mut enemy = straight(5, Mask::Social, Vec2::new(400.0, -50.0), 200.0);
        let (fate, actions) = h.run(&mut enemy, false);
        assert_eq!(fate, Fate::Expired);
        assert!(actions.is_empty());
        assert!(enemy.resolved);
    }

    #[test]
    fn test_large_step_does_not_overshoot() {
        let mut h = Harness::new();
        let mut enemy = straight(6, Mask::Work, Vec2::new(400.0, -50.0), 100.0);
        let mut ctx = StepContext::new(&mut h.rng, &h.tuning, &mut h.events, Some(&h.player));
        enemy.update_position(60_000.0, &mut ctx);
        assert_eq!(enemy.pos, TARGET);
        assert!(enemy.try_resolve(&mut ctx).is_destroyed());
    }

    #[test]
    fn test_zigzag_changes_direction_within_bounds() {
        let mut h = Harness::new();
        let zigzag = {
            let mut ctx = StepContext::new(&mut h.rng, &h.tuning, &mut h.events, None);
            Zigzag::roll(&mut ctx)
        };
        assert!((150.0..400.0).contains(&zigzag.interval_ms));
        assert!((80.0..140.0).contains(&zigzag.amplitude));

        let speed = 160.0;
        let mut enemy = zigzagging(7, Mask::Family, Vec2::new(-50.0, 0.0), speed, zigzag);

        let mut changed = false;
        let mut elapsed = 0.0;
        while elapsed <= zigzag.interval_ms + 16.0 {
            let forward = (enemy.target - enemy.pos).normalize_or_zero();
            let before = enemy.vel;
            let mut ctx = StepContext::new(&mut h.rng, &h.tuning, &mut h.events, None);
            enemy.update_position(16.0, &mut ctx);
            elapsed += 16.0;

            if (enemy.vel - before).length() > 1e-4 {
                changed = true;
                // Forward part stays at `speed`, lateral part within the amplitude
                assert!((enemy.vel.dot(forward) - speed).abs() < 1e-2);
                assert!(enemy.vel.length() <= speed + zigzag.amplitude);
            }
        }
        assert!(changed, "zigzag never retimed after {elapsed}ms");

        if let Movement::Zigzag(z) = enemy.movement {
            assert!((150.0..400.0).contains(&z.interval_ms));
            assert_eq!(z.amplitude, zigzag.amplitude);
        }
    }

    #[test]
    fn test_zigzag_still_arrives() {
        let mut h = Harness::new();
        h.hold(Mask::Social);
        let zigzag = {
            let mut ctx = StepContext::new(&mut h.rng, &h.tuning, &mut h.events, None);
            Zigzag::roll(&mut ctx)
        };
        let mut enemy = zigzagging(8, Mask::Social, Vec2::new(850.0, 650.0), 160.0, zigzag);
        let (fate, actions) = h.run(&mut enemy, true);
        assert_eq!(fate, Fate::Resolved(Outcome::Success));
        assert!(!actions.iter().any(|a| matches!(a, GameAction::TakeDamage(_))));
    }
}
