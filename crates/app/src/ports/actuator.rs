//! Actuator port — the hardware driver the dispatcher calls into.

use std::sync::Arc;

use homelink_domain::dispatch::PinLevel;
use homelink_domain::error::ActuatorError;

/// Low-level output driver (digital pins and soft-PWM channels).
///
/// Calls are synchronous and expected to return quickly; timing such as
/// pulse holds is handled by the caller.
pub trait ActuatorDriver: Send + Sync {
    /// Drive a digital output pin.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError`] when the driver rejects the change.
    fn set_level(&self, pin: u8, level: PinLevel) -> Result<(), ActuatorError>;

    /// Set the duty cycle of a PWM channel.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError`] when the driver rejects the duty.
    fn set_pulse(&self, channel: u8, duty: u8) -> Result<(), ActuatorError>;
}

impl<T: ActuatorDriver> ActuatorDriver for Arc<T> {
    fn set_level(&self, pin: u8, level: PinLevel) -> Result<(), ActuatorError> {
        (**self).set_level(pin, level)
    }

    fn set_pulse(&self, channel: u8, duty: u8) -> Result<(), ActuatorError> {
        (**self).set_pulse(channel, duty)
    }
}
