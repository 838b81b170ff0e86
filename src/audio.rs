//! Sound cues
//!
//! The simulation only names sounds; playback belongs to the host. Cues are
//! queued during a tick and handed over afterwards, fire-and-forget.

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player shot
    Fire,
    /// Player took damage and survived
    PlayerHit,
    /// Player health reached zero
    PlayerDeath,
    /// Enemy took damage
    EnemyHit,
    /// Enemy destroyed
    EnemyDeath,
    /// Powerup collected
    PowerupCollect,
    /// Special power wind-up started
    SpecialCharge,
    /// Special power released
    SpecialActivate,
    /// Title sequence step
    Cutscene,
    /// Menu option changed or confirmed
    MenuSelect,
    GameOver,
    WorldComplete,
}

impl SoundCue {
    /// Host-side cue name
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Fire => "arcade_fire",
            SoundCue::PlayerHit => "arcade_player_hit",
            SoundCue::PlayerDeath => "arcade_player_death",
            SoundCue::EnemyHit => "arcade_enemy_hit",
            SoundCue::EnemyDeath => "arcade_enemy_death",
            SoundCue::PowerupCollect => "arcade_powerup",
            SoundCue::SpecialCharge => "arcade_special_charge",
            SoundCue::SpecialActivate => "arcade_special_activate",
            SoundCue::Cutscene => "arcade_cutscene",
            SoundCue::MenuSelect => "arcade_menu_select",
            SoundCue::GameOver => "arcade_game_over",
            SoundCue::WorldComplete => "arcade_world_complete",
        }
    }
}

/// Host audio playback
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Cues raised since the host last drained them
#[derive(Debug, Clone)]
pub struct CueQueue {
    pending: Vec<SoundCue>,
    volume: f32,
    muted: bool,
}

impl Default for CueQueue {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

impl CueQueue {
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            pending: Vec::new(),
            volume: volume.clamp(0.0, 1.0),
            muted,
        }
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.pending.clear();
        }
    }

    /// Effective volume
    pub fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn push(&mut self, cue: SoundCue) {
        if self.volume() <= 0.0 {
            return;
        }
        self.pending.push(cue);
    }

    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending)
    }

    /// Hand every pending cue to `sink`
    pub fn flush_to(&mut self, sink: &mut dyn AudioSink) {
        let volume = self.volume();
        for cue in self.pending.drain(..) {
            sink.play(cue, volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(SoundCue, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue, volume: f32) {
            self.0.push((cue, volume));
        }
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = CueQueue::default();
        queue.push(SoundCue::Fire);
        queue.push(SoundCue::EnemyDeath);
        assert_eq!(queue.drain(), vec![SoundCue::Fire, SoundCue::EnemyDeath]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_muted_queue_drops_cues() {
        let mut queue = CueQueue::new(0.8, true);
        queue.push(SoundCue::Fire);
        assert!(queue.drain().is_empty());

        queue.set_muted(false);
        queue.push(SoundCue::Fire);
        let mut sink = Recorder::default();
        queue.flush_to(&mut sink);
        assert_eq!(sink.0, vec![(SoundCue::Fire, 0.8)]);
    }

    #[test]
    fn test_cue_names_unique() {
        let cues = [
            SoundCue::Fire,
            SoundCue::PlayerHit,
            SoundCue::PlayerDeath,
            SoundCue::EnemyHit,
            SoundCue::EnemyDeath,
            SoundCue::PowerupCollect,
            SoundCue::SpecialCharge,
            SoundCue::SpecialActivate,
            SoundCue::Cutscene,
            SoundCue::MenuSelect,
            SoundCue::GameOver,
            SoundCue::WorldComplete,
        ];
        let names: std::collections::HashSet<_> = cues.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), cues.len());
    }
}
