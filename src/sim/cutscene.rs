//! Cutscene director
//!
//! Exactly one top-level mode is active at a time. The title sequence walks
//! a fixed list of timed phases; the world-complete scroll runs for a fixed
//! time; the game-over prompt waits on input or the restart timer.

use serde::{Deserialize, Serialize};

use crate::consts::{TITLE_PHASE_MS, TITLE_TERMINAL_PHASE, WORLD_COMPLETE_MS};

/// Game-over prompt options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverOption {
    Retry,
    Quit,
}

impl GameOverOption {
    pub fn other(self) -> Self {
        match self {
            GameOverOption::Retry => GameOverOption::Quit,
            GameOverOption::Quit => GameOverOption::Retry,
        }
    }
}

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// 0 lightshaft pan, 1 banner, 2..=4 text lines, 5 terminal
    Title { phase: u8, elapsed_ms: i32 },
    Playing,
    GameOver { selected: GameOverOption },
    /// Background scroll between worlds
    WorldComplete { elapsed_ms: i32 },
}

/// Mode changes reported by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    TitleStep(u8),
    TitleFinished,
    WorldCompleteFinished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutsceneDirector {
    mode: Mode,
}

impl CutsceneDirector {
    pub fn title() -> Self {
        Self {
            mode: Mode::Title {
                phase: 0,
                elapsed_ms: 0,
            },
        }
    }

    pub fn playing() -> Self {
        Self { mode: Mode::Playing }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }

    /// Any non-gameplay mode
    pub fn cutscene_active(&self) -> bool {
        !self.is_playing()
    }

    pub fn title_phase(&self) -> Option<u8> {
        match self.mode {
            Mode::Title { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Advance timed modes by one frame
    pub fn advance(&mut self, elapsed_ms: i32) -> Option<Transition> {
        match &mut self.mode {
            Mode::Title { phase, elapsed_ms: t } => {
                if *phase >= TITLE_TERMINAL_PHASE {
                    self.mode = Mode::Playing;
                    return Some(Transition::TitleFinished);
                }
                *t = t.saturating_add(elapsed_ms.max(0));
                // At most one phase per frame so no reveal step is skipped
                if *t >= TITLE_PHASE_MS[*phase as usize] {
                    *phase += 1;
                    *t = 0;
                    return Some(Transition::TitleStep(*phase));
                }
                None
            }
            Mode::WorldComplete { elapsed_ms: t } => {
                *t = t.saturating_add(elapsed_ms.max(0));
                if *t >= WORLD_COMPLETE_MS {
                    self.mode = Mode::Playing;
                    return Some(Transition::WorldCompleteFinished);
                }
                None
            }
            Mode::Playing | Mode::GameOver { .. } => None,
        }
    }

    /// Click on the title: step one phase regardless of elapsed time
    pub fn click_title(&mut self) -> Option<Transition> {
        match &mut self.mode {
            Mode::Title { phase, elapsed_ms } if *phase < TITLE_TERMINAL_PHASE => {
                *phase += 1;
                *elapsed_ms = 0;
                Some(Transition::TitleStep(*phase))
            }
            _ => None,
        }
    }

    pub fn enter_game_over(&mut self) {
        self.mode = Mode::GameOver {
            selected: GameOverOption::Retry,
        };
    }

    pub fn enter_world_complete(&mut self) {
        self.mode = Mode::WorldComplete { elapsed_ms: 0 };
    }

    /// Highlight an option; returns true if the selection changed
    pub fn select(&mut self, option: GameOverOption) -> bool {
        match &mut self.mode {
            Mode::GameOver { selected } if *selected != option => {
                *selected = option;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_selection(&mut self) -> bool {
        match self.mode {
            Mode::GameOver { selected } => self.select(selected.other()),
            _ => false,
        }
    }

    pub fn selected_option(&self) -> Option<GameOverOption> {
        match self.mode {
            Mode::GameOver { selected } => Some(selected),
            _ => None,
        }
    }
}
