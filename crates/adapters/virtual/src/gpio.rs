//! Virtual GPIO — digital pins and soft-PWM channels kept in memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use homelink_app::ports::ActuatorDriver;
use homelink_domain::dispatch::PinLevel;
use homelink_domain::error::ActuatorError;

/// Highest duty a soft-PWM channel accepts.
const MAX_DUTY: u8 = 100;

/// One accepted driver call, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    Level { pin: u8, level: PinLevel },
    Duty { channel: u8, duty: u8 },
}

#[derive(Debug, Default)]
struct Board {
    levels: HashMap<u8, PinLevel>,
    duties: HashMap<u8, u8>,
    history: Vec<GpioEvent>,
}

/// In-memory stand-in for the board's output driver.
#[derive(Debug, Default)]
pub struct VirtualGpio {
    board: Mutex<Board>,
}

impl VirtualGpio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level written to `pin`, if any.
    #[must_use]
    pub fn level(&self, pin: u8) -> Option<PinLevel> {
        self.lock().levels.get(&pin).copied()
    }

    /// Last duty written to `channel`, if any.
    #[must_use]
    pub fn duty(&self, channel: u8) -> Option<u8> {
        self.lock().duties.get(&channel).copied()
    }

    /// Every accepted call so far.
    #[must_use]
    pub fn history(&self) -> Vec<GpioEvent> {
        self.lock().history.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActuatorDriver for VirtualGpio {
    fn set_level(&self, pin: u8, level: PinLevel) -> Result<(), ActuatorError> {
        tracing::debug!(pin, ?level, "virtual pin write");
        let mut board = self.lock();
        board.levels.insert(pin, level);
        board.history.push(GpioEvent::Level { pin, level });
        Ok(())
    }

    fn set_pulse(&self, channel: u8, duty: u8) -> Result<(), ActuatorError> {
        if duty > MAX_DUTY {
            tracing::warn!(channel, duty, "duty out of range");
            return Err(ActuatorError::Pwm { channel, duty });
        }
        tracing::debug!(channel, duty, "virtual pwm write");
        let mut board = self.lock();
        board.duties.insert(channel, duty);
        board.history.push(GpioEvent::Duty { channel, duty });
        Ok(())
    }
}
