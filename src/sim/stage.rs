//! Stage and world progression
//!
//! A stage lasts a fixed amount of uninterrupted play. Enemy spawns come from
//! a per-stage queue ordered by stage-clock time.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Enemy, EnemyKind};
use crate::consts::{STAGE_DURATION_MS, STAGES_PER_WORLD};

/// One scheduled enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnOrder {
    /// Stage-clock time at which the enemy appears
    pub at_ms: i32,
    pub kind: EnemyKind,
    pub pos: Vec2,
}

/// Spawn layout for one stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageMap {
    pub orders: Vec<SpawnOrder>,
}

/// Build the spawn layout for a stage.
///
/// No layouts are authored yet, so every stage is empty.
// TODO: generate layouts once enemy species exist
pub fn stage_map<R: Rng>(_world: u32, _stage: u32, _rng: &mut R) -> Option<StageMap> {
    None
}

/// What finishing a stage leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEnd {
    NextStage,
    WorldComplete,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageProgress {
    pub world: u32,
    pub stage: u32,
    spawn_queue: VecDeque<SpawnOrder>,
}

impl StageProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the spawn queue for the current stage
    pub fn load_stage<R: Rng>(&mut self, rng: &mut R) {
        let map = stage_map(self.world, self.stage, rng).unwrap_or_default();
        let mut orders = map.orders;
        orders.sort_by_key(|o| o.at_ms);
        self.spawn_queue = orders.into();
        log::debug!(
            "World {} stage {}: {} spawns queued",
            self.world,
            self.stage,
            self.spawn_queue.len()
        );
    }

    pub fn queue_spawn(&mut self, order: SpawnOrder) {
        let index = self
            .spawn_queue
            .iter()
            .position(|o| o.at_ms > order.at_ms)
            .unwrap_or(self.spawn_queue.len());
        self.spawn_queue.insert(index, order);
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawn_queue.len()
    }

    pub fn clear_spawns(&mut self) {
        self.spawn_queue.clear();
    }

    /// Pop every order whose time has come
    pub fn due_spawns(&mut self, clock_ms: i32) -> Vec<Enemy> {
        let mut due = Vec::new();
        while self.spawn_queue.front().is_some_and(|o| o.at_ms <= clock_ms) {
            if let Some(order) = self.spawn_queue.pop_front() {
                due.push(Enemy::new(order.pos, order.kind));
            }
        }
        due
    }

    /// The stage is over once its time is up and the field is clear
    pub fn stage_finished(&self, clock_ms: i32, enemies_remaining: usize) -> bool {
        clock_ms >= STAGE_DURATION_MS && enemies_remaining == 0 && self.spawn_queue.is_empty()
    }

    /// Move to the next stage, or report the world is done
    pub fn finish_stage(&mut self) -> StageEnd {
        self.stage += 1;
        if self.stage >= STAGES_PER_WORLD {
            StageEnd::WorldComplete
        } else {
            StageEnd::NextStage
        }
    }

    pub fn next_world(&mut self) {
        self.world += 1;
        self.stage = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn order(at_ms: i32) -> SpawnOrder {
        SpawnOrder {
            at_ms,
            kind: EnemyKind::Unassigned,
            pos: Vec2::new(at_ms as f32, 0.0),
        }
    }

    #[test]
    fn test_stage_map_is_stub() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(stage_map(0, 0, &mut rng).is_none());
        let mut progress = StageProgress::new();
        progress.load_stage(&mut rng);
        assert_eq!(progress.pending_spawns(), 0);
    }

    #[test]
    fn test_due_spawns_in_time_order() {
        let mut progress = StageProgress::new();
        progress.queue_spawn(order(300));
        progress.queue_spawn(order(100));
        progress.queue_spawn(order(200));

        let due = progress.due_spawns(200);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].pos.x, 100.0);
        assert_eq!(due[1].pos.x, 200.0);
        assert_eq!(progress.pending_spawns(), 1);

        progress.clear_spawns();
        assert!(progress.due_spawns(i32::MAX).is_empty());
    }

    #[test]
    fn test_stage_and_world_progression() {
        let mut progress = StageProgress::new();
        assert!(!progress.stage_finished(STAGE_DURATION_MS - 1, 0));
        assert!(!progress.stage_finished(STAGE_DURATION_MS, 1));
        assert!(progress.stage_finished(STAGE_DURATION_MS, 0));

        for _ in 1..STAGES_PER_WORLD {
            assert_eq!(progress.finish_stage(), StageEnd::NextStage);
        }
        assert_eq!(progress.finish_stage(), StageEnd::WorldComplete);
        progress.next_world();
        assert_eq!((progress.world, progress.stage), (1, 0));
    }
}
