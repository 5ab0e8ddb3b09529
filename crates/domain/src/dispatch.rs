//! Dispatch table — which actuator action each command performs.

use std::collections::HashMap;
use std::time::Duration;

use crate::command::Command;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    High,
    Low,
}

/// A single actuator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorAction {
    /// Drive a digital pin to a level, immediately.
    SetLevel { pin: u8, level: PinLevel },
    /// Engage a PWM channel at `duty`, hold, then return it to `neutral`.
    Pulse {
        channel: u8,
        duty: u8,
        hold: Duration,
        neutral: u8,
    },
}

/// Physical wiring of the controller's actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorLayout {
    pub light_pin: u8,
    pub door_channel: u8,
    pub door_open_duty: u8,
    pub door_close_duty: u8,
    pub door_neutral_duty: u8,
    pub door_pulse: Duration,
}

impl Default for ActuatorLayout {
    fn default() -> Self {
        Self {
            light_pin: 1,
            door_channel: 26,
            door_open_duty: 22,
            door_close_duty: 5,
            door_neutral_duty: 0,
            door_pulse: Duration::from_secs(2),
        }
    }
}

/// Immutable `Command → ActuatorAction` mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    actions: HashMap<Command, ActuatorAction>,
}

impl DispatchTable {
    /// Build the table for the given wiring.
    #[must_use]
    pub fn from_layout(layout: &ActuatorLayout) -> Self {
        let door = |duty| ActuatorAction::Pulse {
            channel: layout.door_channel,
            duty,
            hold: layout.door_pulse,
            neutral: layout.door_neutral_duty,
        };

        let actions = HashMap::from([
            (
                Command::LightOn,
                ActuatorAction::SetLevel {
                    pin: layout.light_pin,
                    level: PinLevel::High,
                },
            ),
            (
                Command::LightOff,
                ActuatorAction::SetLevel {
                    pin: layout.light_pin,
                    level: PinLevel::Low,
                },
            ),
            (Command::DoorOpen, door(layout.door_open_duty)),
            (Command::DoorClose, door(layout.door_close_duty)),
        ]);

        Self { actions }
    }

    /// The action bound to `command`.
    #[must_use]
    pub fn action(&self, command: Command) -> Option<ActuatorAction> {
        self.actions.get(&command).copied()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::from_layout(&ActuatorLayout::default())
    }
}
