//! Timer bank
//!
//! Every gate in the simulation is a millisecond counter. Countdowns block
//! while positive and report the frame they reach zero; phase clocks count
//! up from a start point and report which thresholds a frame crossed.

use serde::{Deserialize, Serialize};

use crate::consts::FLICKER_HALF_PERIOD_MS;

/// A countdown that blocks while positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: i32,
}

impl Countdown {
    pub fn set(&mut self, ms: i32) {
        self.remaining_ms = ms;
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn remaining(&self) -> i32 {
        self.remaining_ms
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Decrement by `elapsed_ms`. Returns true on the frame the countdown
    /// reaches zero; the counter then rests at zero.
    pub fn tick(&mut self, elapsed_ms: i32) -> bool {
        if self.remaining_ms <= 0 {
            return false;
        }
        self.remaining_ms -= elapsed_ms;
        if self.remaining_ms <= 0 {
            self.remaining_ms = 0;
            true
        } else {
            false
        }
    }
}

/// Elapsed-time window covered by one frame of a phase clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: i32,
    pub to: i32,
}

impl Span {
    /// Whether this frame moved the clock across `threshold`
    pub fn crossed(&self, threshold: i32) -> bool {
        self.from < threshold && self.to >= threshold
    }
}

/// Count-up clock; zero means idle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseClock {
    elapsed_ms: i32,
}

impl PhaseClock {
    /// Start counting; a running clock reads at least 1
    pub fn start(&mut self) {
        self.elapsed_ms = 1;
    }

    pub fn stop(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.elapsed_ms > 0
    }

    pub fn elapsed(&self) -> i32 {
        self.elapsed_ms
    }

    pub fn advance(&mut self, elapsed_ms: i32) -> Span {
        let from = self.elapsed_ms;
        if self.is_running() {
            self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms.max(0));
        }
        Span {
            from,
            to: self.elapsed_ms,
        }
    }

    /// Index of the phase the clock is in, given ascending thresholds
    pub fn phase(&self, thresholds: &[i32]) -> usize {
        phase_index(self.elapsed_ms, thresholds)
    }
}

/// Number of thresholds already reached
pub fn phase_index(elapsed_ms: i32, thresholds: &[i32]) -> usize {
    thresholds.iter().take_while(|&&t| elapsed_ms >= t).count()
}

/// One-shot transitions produced by a frame of countdowns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expired {
    pub respawn: bool,
    pub restart: bool,
    pub invincibility: bool,
}

/// All countdowns and clocks owned by one playthrough
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerBank {
    /// Shot cooldown; the trigger is free at <= 1
    pub fire: Countdown,
    pub invincibility: Countdown,
    pub respawn: Countdown,
    pub restart: Countdown,
    pub screen_flash: Countdown,
    /// Special-power wind-up
    pub special_trigger: PhaseClock,
    /// Special power running
    pub power_active: PhaseClock,
    /// Count-up time spent in the current stage
    pub stage_clock_ms: i32,
    /// Free-running clock for walk cycles and blinking
    pub anim_clock_ms: i32,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrement every countdown. Phase clocks and the stage clock are
    /// advanced by their owners since their gating depends on the mode.
    pub fn advance(&mut self, elapsed_ms: i32) -> Expired {
        self.fire.tick(elapsed_ms);
        self.screen_flash.tick(elapsed_ms);
        self.anim_clock_ms = self.anim_clock_ms.wrapping_add(elapsed_ms.max(0));
        Expired {
            respawn: self.respawn.tick(elapsed_ms),
            restart: self.restart.tick(elapsed_ms),
            invincibility: self.invincibility.tick(elapsed_ms),
        }
    }

    /// Fire cooldown gate
    pub fn can_fire(&self) -> bool {
        self.fire.remaining() <= 1
    }

    /// Either stage of the special power is running
    pub fn special_sequence_active(&self) -> bool {
        self.special_trigger.is_running() || self.power_active.is_running()
    }

    pub fn advance_stage_clock(&mut self, elapsed_ms: i32) {
        self.stage_clock_ms = self.stage_clock_ms.saturating_add(elapsed_ms.max(0));
    }
}

/// Invincibility flicker: hidden on odd 100 ms slices of the window
pub fn player_visible(invincibility_remaining: i32) -> bool {
    invincibility_remaining <= 0 || (invincibility_remaining / FLICKER_HALF_PERIOD_MS) % 2 == 0
}
