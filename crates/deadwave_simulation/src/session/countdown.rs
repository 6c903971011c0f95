//! Match countdown — 1 Hz конечный автомат поверх fixed timestep
//!
//! Running { remaining } → Finished; терминальное состояние поглощающее,
//! finished-сигнал уходит ровно один раз.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger::log_info;

/// Длительность матча (секунды)
pub const MATCH_SECONDS: u32 = 120;

/// Состояние отсчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum CountdownState {
    Running { remaining: u32 },
    Finished,
}

/// Отсчёт матча — singleton с явным lifecycle (создаётся плагином на
/// старте сессии, без ambient static)
#[derive(Resource, Debug, Clone)]
pub struct MatchCountdown {
    pub state: CountdownState,
    /// Аккумулятор fixed-дельт до следующего 1-секундного sub-тика
    second_acc: f32,
}

impl Default for MatchCountdown {
    fn default() -> Self {
        Self::new(MATCH_SECONDS)
    }
}

impl MatchCountdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            state: CountdownState::Running { remaining: seconds },
            second_acc: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == CountdownState::Finished
    }

    /// Сколько секунд осталось (None после завершения)
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            CountdownState::Running { remaining } => Some(remaining),
            CountdownState::Finished => None,
        }
    }

    /// Один 1-секундный тик. true = именно этот тик завершил отсчёт.
    /// В Finished — no-op (поглощающее состояние).
    pub fn tick_second(&mut self) -> bool {
        match self.state {
            CountdownState::Running { remaining } if remaining <= 1 => {
                self.state = CountdownState::Finished;
                true
            }
            CountdownState::Running { remaining } => {
                self.state = CountdownState::Running {
                    remaining: remaining - 1,
                };
                false
            }
            CountdownState::Finished => false,
        }
    }
}

/// Event: отсчёт матча завершён (ровно один на сессию)
#[derive(Event, Debug, Clone, Default)]
pub struct CountdownFinished;

/// System: тик отсчёта (FixedUpdate → 1 Hz sub-тики)
pub fn tick_match_countdown(
    mut countdown: ResMut<MatchCountdown>,
    time: Res<Time<Fixed>>,
    mut finished: EventWriter<CountdownFinished>,
) {
    if countdown.is_finished() {
        return;
    }

    countdown.second_acc += time.delta_secs();

    while countdown.second_acc >= 1.0 {
        countdown.second_acc -= 1.0;

        if countdown.tick_second() {
            finished.write(CountdownFinished);
            log_info("Match countdown finished");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_runs_to_finished_once() {
        let mut countdown = MatchCountdown::new(3);

        assert!(!countdown.tick_second());
        assert_eq!(countdown.remaining(), Some(2));
        assert!(!countdown.tick_second());
        assert!(countdown.tick_second()); // Третья секунда завершает
        assert!(countdown.is_finished());

        // Поглощающее состояние: дальнейшие тики — no-op
        assert!(!countdown.tick_second());
        assert!(countdown.is_finished());
    }

    #[test]
    fn test_countdown_default_match_length() {
        let countdown = MatchCountdown::default();
        assert_eq!(countdown.remaining(), Some(120));
    }
}
