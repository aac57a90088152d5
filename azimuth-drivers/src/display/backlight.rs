//! Backlight control with fallback

use embedded_hal::digital::OutputPin;

/// Backlight errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightError {
    /// No backlight line is wired to this control
    NotWired,
    /// Driving the control pin failed
    Pin,
}

/// Which control actually switched the backlight on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightPath {
    /// Panel driver's own backlight pin
    Panel,
    /// Separate fallback GPIO
    Fallback,
}

/// Anything that can switch a backlight
pub trait Backlight {
    fn set_backlight(&mut self, on: bool) -> Result<(), BacklightError>;
}

/// Backlight on a plain GPIO (active high)
pub struct GpioBacklight<P> {
    pin: P,
}

impl<P: OutputPin> GpioBacklight<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Backlight for GpioBacklight<P> {
    fn set_backlight(&mut self, on: bool) -> Result<(), BacklightError> {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| BacklightError::Pin)
    }
}

/// Switch the backlight on, trying `primary` before `fallback`
///
/// Returns the error from `fallback` when both fail.
pub fn activate_backlight<A, B>(primary: &mut A, fallback: &mut B) -> Result<BacklightPath, BacklightError>
where
    A: Backlight,
    B: Backlight,
{
    if primary.set_backlight(true).is_ok() {
        return Ok(BacklightPath::Panel);
    }
    fallback.set_backlight(true)?;
    Ok(BacklightPath::Fallback)
}
