//! Timer state machines.
//!
//! # Responsibility
//! - Model countdown, stopwatch and pomodoro state as plain data.
//! - Advance state through pure `(state, action) -> state` transitions.
//!
//! # Invariants
//! - Transitions never read the clock; elapsed time arrives as `Tick`
//!   actions from the presentation layer's re-render loop.
//! - Remaining time never underflows below zero.

use serde::{Deserialize, Serialize};

/// Countdown timer backing focus mode and the plain countdown page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub active: bool,
    pub remaining_secs: u32,
    pub total_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownAction {
    Start { secs: u32 },
    Pause,
    Reset,
    Tick { secs: u32 },
}

impl Countdown {
    /// Applies one action and returns the successor state.
    pub fn apply(self, action: CountdownAction) -> Self {
        match action {
            CountdownAction::Start { secs } => Self {
                active: true,
                remaining_secs: secs,
                total_secs: secs,
            },
            CountdownAction::Pause => Self {
                active: false,
                ..self
            },
            CountdownAction::Reset => Self::default(),
            CountdownAction::Tick { secs } => {
                if !self.active {
                    return self;
                }
                let remaining = self.remaining_secs.saturating_sub(secs);
                Self {
                    active: remaining > 0,
                    remaining_secs: remaining,
                    ..self
                }
            }
        }
    }

    /// Completed fraction in `0.0..=1.0` for progress rendering.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            0.0
        } else {
            1.0 - f64::from(self.remaining_secs) / f64::from(self.total_secs)
        }
    }
}

/// Stopwatch with lap capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stopwatch {
    pub running: bool,
    pub elapsed_ms: u64,
    pub laps: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwatchAction {
    Start,
    Stop,
    Lap,
    Reset,
    Tick { ms: u64 },
}

impl Stopwatch {
    /// Applies one action and returns the successor state.
    ///
    /// `Lap` and `Tick` are no-ops while the stopwatch is stopped, so a
    /// paused display never drifts.
    pub fn apply(mut self, action: StopwatchAction) -> Self {
        match action {
            StopwatchAction::Start => Self {
                running: true,
                ..self
            },
            StopwatchAction::Stop => Self {
                running: false,
                ..self
            },
            StopwatchAction::Lap => {
                if self.running {
                    self.laps.push(self.elapsed_ms);
                }
                self
            }
            StopwatchAction::Reset => Self::default(),
            StopwatchAction::Tick { ms } => {
                if self.running {
                    self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
                }
                self
            }
        }
    }
}

/// Work/break phase of a pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Work,
    Break,
}

/// Pomodoro cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pomodoro {
    pub mode: PomodoroMode,
    pub active: bool,
    pub remaining_secs: u32,
    pub work_secs: u32,
    pub break_secs: u32,
    /// Work intervals finished this session.
    pub completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroAction {
    Start,
    Pause,
    Reset,
    Tick { secs: u32 },
}

impl Pomodoro {
    /// Creates an idle cycle with the given interval lengths, parked at
    /// the start of a work interval.
    pub fn new(work_secs: u32, break_secs: u32) -> Self {
        Self {
            mode: PomodoroMode::Work,
            active: false,
            remaining_secs: work_secs,
            work_secs,
            break_secs,
            completed: 0,
        }
    }

    /// Applies one action and returns the successor state.
    ///
    /// A work interval ticking to zero flips to `Break`, reloads the break
    /// duration and counts the interval as completed; a break ticking to
    /// zero parks the cycle at the start of the next work interval.
    pub fn apply(self, action: PomodoroAction) -> Self {
        match action {
            PomodoroAction::Start => {
                let remaining = match self.mode {
                    PomodoroMode::Work => self.work_secs,
                    PomodoroMode::Break => self.break_secs,
                };
                Self {
                    active: true,
                    remaining_secs: remaining,
                    ..self
                }
            }
            PomodoroAction::Pause => Self {
                active: false,
                ..self
            },
            PomodoroAction::Reset => Self {
                mode: PomodoroMode::Work,
                active: false,
                remaining_secs: self.work_secs,
                ..self
            },
            PomodoroAction::Tick { secs } => {
                if !self.active {
                    return self;
                }
                let remaining = self.remaining_secs.saturating_sub(secs);
                if remaining > 0 {
                    return Self {
                        remaining_secs: remaining,
                        ..self
                    };
                }
                match self.mode {
                    PomodoroMode::Work => Self {
                        mode: PomodoroMode::Break,
                        remaining_secs: self.break_secs,
                        completed: self.completed + 1,
                        ..self
                    },
                    PomodoroMode::Break => Self {
                        mode: PomodoroMode::Work,
                        active: false,
                        remaining_secs: self.work_secs,
                        ..self
                    },
                }
            }
        }
    }

    /// Total focused minutes accumulated over completed work intervals.
    pub fn focus_minutes(&self) -> u32 {
        self.completed * (self.work_secs / 60)
    }
}
