//! Level controller
//!
//! Owns the active level, its wave schedule and every live enemy. Advances
//! level time, spawns enemies when their wave entry comes due, and signals
//! level changes and final victory.

use glam::Vec2;
use rand::Rng;

use super::context::StepContext;
use super::enemy::{Actor, Enemy, Movement, Zigzag};
use super::events::SimEvent;
use super::level::{LevelConfig, LevelTable};
use super::reducer::GameAction;
use super::wave::{WaveEntry, generate_wave};
use crate::arena_center;

#[derive(Debug, Clone)]
pub struct LevelController {
    levels: LevelTable,
    /// Current level (1-based)
    level: u32,
    /// Time spent in the current level (ms)
    elapsed_ms: f32,
    wave: Vec<WaveEntry>,
    /// Next wave entry to spawn
    cursor: usize,
    active: bool,
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl LevelController {
    /// Inactive controller on level 1 with its wave already generated
    pub fn new(levels: LevelTable, ctx: &mut StepContext<'_>) -> Self {
        let mut controller = Self {
            levels,
            level: 1,
            elapsed_ms: 0.0,
            wave: Vec::new(),
            cursor: 0,
            active: false,
            enemies: Vec::new(),
            next_id: 1,
        };
        controller.regenerate_wave(ctx);
        controller
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn wave(&self) -> &[WaveEntry] {
        &self.wave
    }

    /// Wave entries already spawned this level
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn current_config(&self) -> Option<&LevelConfig> {
        self.levels.get(self.level)
    }

    /// Begin (or restart) the current level from zero
    pub fn start(&mut self, ctx: &mut StepContext<'_>) {
        self.active = true;
        self.elapsed_ms = 0.0;
        self.regenerate_wave(ctx);
        self.announce_level(ctx);
    }

    /// Pick up where `stop` left off, keeping level time and wave
    pub fn resume(&mut self) {
        self.active = true;
    }

    /// Halt spawning; live enemies are left in place
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Back to level 1 without starting
    pub fn reset(&mut self, ctx: &mut StepContext<'_>) {
        self.level = 1;
        self.elapsed_ms = 0.0;
        self.cursor = 0;
        self.regenerate_wave(ctx);
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }

    /// Advance level time and spawn everything that has come due
    pub fn update(&mut self, dt_ms: f32, ctx: &mut StepContext<'_>) {
        if !self.active {
            return;
        }

        self.elapsed_ms += dt_ms;

        let duration = self.current_config().map_or(0.0, |c| c.duration_ms);
        if self.elapsed_ms >= duration {
            self.advance_level(ctx);
            return;
        }

        while let Some(entry) = self.wave.get(self.cursor).copied() {
            if entry.time_offset_ms > self.elapsed_ms {
                break;
            }
            self.cursor += 1;
            self.spawn_enemy(&entry, ctx);
        }
    }

    /// Move and collide every live enemy, dropping the destroyed ones
    pub fn update_enemies(&mut self, dt_ms: f32, ctx: &mut StepContext<'_>) {
        self.enemies.retain_mut(|enemy| {
            enemy.update_position(dt_ms, ctx);
            !enemy.try_resolve(ctx).is_destroyed()
        });
    }

    fn advance_level(&mut self, ctx: &mut StepContext<'_>) {
        if self.level >= self.levels.last_level() {
            log::info!("All {} levels cleared", self.levels.last_level());
            ctx.events.dispatch(GameAction::Victory);
            self.stop();
        } else {
            self.level += 1;
            self.elapsed_ms = 0.0;
            self.regenerate_wave(ctx);
            self.announce_level(ctx);
        }
    }

    fn regenerate_wave(&mut self, ctx: &mut StepContext<'_>) {
        self.wave = match self.levels.get(self.level) {
            Some(config) => generate_wave(config, ctx.tuning.enemy_base_speed, ctx.rng),
            None => {
                log::warn!("No config for level {}, using an empty wave", self.level);
                Vec::new()
            }
        };
        self.cursor = 0;
    }

    fn announce_level(&self, ctx: &mut StepContext<'_>) {
        let (name, time_label) = self
            .current_config()
            .map(|c| (c.name.clone(), c.time_label.clone()))
            .unwrap_or_default();
        log::info!("Level {} started: {} ({} spawns)", self.level, name, self.wave.len());
        ctx.events.push(SimEvent::LevelChanged {
            level: self.level,
            name,
            time_label,
        });
    }

    fn spawn_enemy(&mut self, entry: &WaveEntry, ctx: &mut StepContext<'_>) {
        let tuning = ctx.tuning;
        let pos = edge_spawn_position(
            ctx.rng,
            tuning.arena_width,
            tuning.arena_height,
            tuning.spawn_margin,
        );
        let target = arena_center(tuning.arena_width, tuning.arena_height);

        let movement = if self.level >= tuning.zigzag_from_level {
            Movement::Zigzag(Zigzag::roll(ctx))
        } else {
            Movement::Straight
        };

        let id = self.next_id;
        self.next_id += 1;
        let enemy = Enemy::new(id, entry.mask, pos, entry.speed, target, movement);

        log::debug!("Spawned enemy {} ({:?}) at {:?}", id, entry.mask, pos);
        ctx.events.push(SimEvent::EnemySpawned {
            id,
            mask: entry.mask,
            pos,
        });
        self.enemies.push(enemy);
    }
}

/// Random point just outside one of the four arena edges
pub fn edge_spawn_position<R: Rng>(rng: &mut R, width: f32, height: f32, margin: f32) -> Vec2 {
    match rng.random_range(0..4) {
        // Top
        0 => Vec2::new(rng.random::<f32>() * width, -margin),
        // Right
        1 => Vec2::new(width + margin, rng.random::<f32>() * height),
        // Bottom
        2 => Vec2::new(rng.random::<f32>() * width, height + margin),
        // Left
        _ => Vec2::new(-margin, rng.random::<f32>() * height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Tuning;
    use crate::sim::events::EventQueue;
    use crate::sim::player::Player;
    use crate::sim::rng::{RngState, SimRng};

    struct Harness {
        rng: SimRng,
        tuning: Tuning,
        events: EventQueue,
        player: Player,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: RngState::new(77).to_rng(),
                tuning: Tuning::default(),
                events: EventQueue::new(),
                player: Player::new(),
            }
        }

        fn ctx(&mut self) -> StepContext<'_> {
            StepContext::new(&mut self.rng, &self.tuning, &mut self.events, Some(&self.player))
        }

        fn controller(&mut self, levels: LevelTable) -> LevelController {
            LevelController::new(levels, &mut self.ctx())
        }
    }

    fn short_table() -> LevelTable {
        LevelTable::new(vec![
            LevelConfig::new(1000.0, 200.0, 1.0).named("One", ""),
            LevelConfig::new(1000.0, 200.0, 1.0).named("Two", ""),
        ])
        .expect("valid table")
    }

    #[test]
    fn test_new_is_inactive() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        assert!(!controller.is_active());
        assert_eq!(controller.level(), 1);
        assert!(!controller.wave().is_empty());

        controller.update(5000.0, &mut h.ctx());
        assert_eq!(controller.elapsed_ms(), 0.0);
        assert!(controller.enemies().is_empty());
    }

    #[test]
    fn test_start_announces_level() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        assert!(controller.is_active());

        let events = h.events.drain();
        assert!(matches!(
            &events[..],
            [SimEvent::LevelChanged { level: 1, name, .. }] if name == "Morning Rush"
        ));
    }

    #[test]
    fn test_spawns_in_order_once() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        h.events.drain();

        // First entry is always at t=0
        controller.update(1.0, &mut h.ctx());
        assert_eq!(controller.cursor(), 1);
        assert_eq!(controller.enemies().len(), 1);

        let mut spawned = 1;
        for _ in 0..200 {
            controller.update(50.0, &mut h.ctx());
            let elapsed = controller.elapsed_ms();
            let due = controller.wave().iter().filter(|e| e.time_offset_ms <= elapsed).count();
            assert_eq!(controller.cursor(), due);
            spawned = due;
        }
        let events = h.events.drain();
        let ids: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::EnemySpawned { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), spawned);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_spawn_positions_on_edges() {
        let mut rng = RngState::new(9).to_rng();
        for _ in 0..500 {
            let pos = edge_spawn_position(&mut rng, 800.0, 600.0, 50.0);
            let on_edge = pos.y == -50.0 || pos.y == 650.0 || pos.x == -50.0 || pos.x == 850.0;
            assert!(on_edge, "{pos:?} not on an edge");
            assert!((-50.0..=850.0).contains(&pos.x));
            assert!((-50.0..=650.0).contains(&pos.y));
        }
    }

    #[test]
    fn test_spawned_enemy_heads_for_center() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        controller.update(1.0, &mut h.ctx());

        let enemy = &controller.enemies()[0];
        let to_center = (Vec2::new(400.0, 300.0) - enemy.pos).normalize();
        assert!((enemy.vel.normalize() - to_center).length() < 1e-4);
        assert!(!enemy.is_zigzag());
    }

    #[test]
    fn test_level_advance_takes_priority() {
        let mut h = Harness::new();
        let mut controller = h.controller(short_table());
        controller.start(&mut h.ctx());
        h.events.drain();

        controller.update(1000.0, &mut h.ctx());
        assert_eq!(controller.level(), 2);
        assert_eq!(controller.elapsed_ms(), 0.0);
        assert_eq!(controller.cursor(), 0);
        // No spawns on the transition tick
        assert!(controller.enemies().is_empty());

        let events = h.events.drain();
        assert!(matches!(&events[..], [SimEvent::LevelChanged { level: 2, .. }]));
    }

    #[test]
    fn test_last_level_signals_victory() {
        let mut h = Harness::new();
        let mut controller = h.controller(short_table());
        controller.start(&mut h.ctx());
        controller.update(1000.0, &mut h.ctx());
        h.events.drain();

        controller.update(1000.0, &mut h.ctx());
        assert!(!controller.is_active());
        assert_eq!(controller.level(), 2);
        let events = h.events.drain();
        assert_eq!(events, vec![SimEvent::Action(GameAction::Victory)]);

        // Stopped: nothing more happens
        controller.update(1000.0, &mut h.ctx());
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_empty_level_completes_next_tick() {
        let mut h = Harness::new();
        let table = LevelTable::new(vec![LevelConfig::new(0.0, 100.0, 1.0)]).expect("valid");
        let mut controller = h.controller(table);
        assert!(controller.wave().is_empty());
        controller.start(&mut h.ctx());
        h.events.drain();

        controller.update(0.0, &mut h.ctx());
        assert_eq!(h.events.drain(), vec![SimEvent::Action(GameAction::Victory)]);
    }

    #[test]
    fn test_zigzag_from_level_three() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        controller.update(60_000.0, &mut h.ctx());
        controller.update(60_000.0, &mut h.ctx());
        assert_eq!(controller.level(), 3);

        controller.update(1.0, &mut h.ctx());
        assert!(!controller.enemies().is_empty());
        assert!(controller.enemies().iter().all(Enemy::is_zigzag));
    }

    #[test]
    fn test_stop_and_resume_keep_progress() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        controller.update(500.0, &mut h.ctx());
        let cursor = controller.cursor();

        controller.stop();
        controller.update(10_000.0, &mut h.ctx());
        assert_eq!(controller.elapsed_ms(), 500.0);
        assert_eq!(controller.cursor(), cursor);

        controller.resume();
        controller.update(100.0, &mut h.ctx());
        assert_eq!(controller.elapsed_ms(), 600.0);
    }

    #[test]
    fn test_reset_returns_to_level_one() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        controller.update(60_000.0, &mut h.ctx());
        assert_eq!(controller.level(), 2);

        controller.stop();
        controller.reset(&mut h.ctx());
        assert_eq!(controller.level(), 1);
        assert_eq!(controller.elapsed_ms(), 0.0);
        assert_eq!(controller.cursor(), 0);
        assert!(!controller.is_active());
        assert!(!controller.wave().is_empty());
    }

    #[test]
    fn test_enemies_resolve_and_leave() {
        let mut h = Harness::new();
        let mut controller = h.controller(LevelTable::reference());
        controller.start(&mut h.ctx());
        controller.update(1.0, &mut h.ctx());
        controller.stop();
        assert_eq!(controller.enemies().len(), 1);

        for _ in 0..1000 {
            controller.update_enemies(16.0, &mut h.ctx());
        }
        assert!(controller.enemies().is_empty());
        let resolved = h
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::EnemyResolved { .. }))
            .count();
        assert_eq!(resolved, 1);
    }
}
