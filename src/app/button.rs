// src/app/button.rs

use embedded_hal::digital::InputPin;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Press/release edge detector for an active-high push button.
///
/// A change is only reported when two consecutive reads agree.
#[derive(Debug, Default, Clone)]
pub struct ButtonEdge {
    pressed: bool,
}

impl ButtonEdge {
    pub const fn new() -> Self {
        ButtonEdge { pressed: false }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn poll<P: InputPin>(&mut self, pin: &mut P) -> Result<Option<ButtonEvent>, P::Error> {
        let level = pin.is_high()?;
        if level == self.pressed || pin.is_high()? != level {
            return Ok(None);
        }
        self.pressed = level;
        Ok(Some(if level { ButtonEvent::Pressed } else { ButtonEvent::Released }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Pin that plays back a fixed sequence of levels.
    struct ScriptedPin<'a> {
        levels: &'a [bool],
        at: usize,
    }

    impl ErrorType for ScriptedPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for ScriptedPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let level = self.levels[self.at.min(self.levels.len() - 1)];
            self.at += 1;
            Ok(level)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    #[test]
    fn test_press_and_release() {
        let mut pin = ScriptedPin { levels: &[false, true, true, true, false, false], at: 0 };
        let mut button = ButtonEdge::new();
        assert_eq!(button.poll(&mut pin).unwrap(), None);
        assert_eq!(button.poll(&mut pin).unwrap(), Some(ButtonEvent::Pressed));
        assert!(button.is_pressed());
        assert_eq!(button.poll(&mut pin).unwrap(), None);
        assert_eq!(button.poll(&mut pin).unwrap(), Some(ButtonEvent::Released));
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut pin = ScriptedPin { levels: &[true, false, false], at: 0 };
        let mut button = ButtonEdge::new();
        assert_eq!(button.poll(&mut pin).unwrap(), None);
        assert!(!button.is_pressed());
    }
}
