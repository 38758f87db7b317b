//! Platform-agnostic input event types.
//!
//! Backends map their native keyboard and wheel events to these enums.
//! The browser never sees raw toolkit input.

/// A platform-agnostic input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// One scroll step towards the top of the page.
    ScrollUp,
    /// One scroll step towards the bottom of the page.
    ScrollDown,
    /// User requested quit (window close, Escape).
    Quit,
}

impl InputEvent {
    /// Decode a wheel delta into a scroll step.
    ///
    /// Positive deltas move towards the top of the page, negative ones
    /// towards the bottom. A zero delta carries no direction.
    pub fn from_wheel_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(InputEvent::ScrollUp),
            -1 => Some(InputEvent::ScrollDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_up_scrolls_up() {
        assert_eq!(InputEvent::from_wheel_delta(1), Some(InputEvent::ScrollUp));
        assert_eq!(InputEvent::from_wheel_delta(120), Some(InputEvent::ScrollUp));
    }

    #[test]
    fn wheel_down_scrolls_down() {
        assert_eq!(
            InputEvent::from_wheel_delta(-1),
            Some(InputEvent::ScrollDown)
        );
        assert_eq!(
            InputEvent::from_wheel_delta(-3),
            Some(InputEvent::ScrollDown)
        );
    }

    #[test]
    fn zero_wheel_delta_ignored() {
        assert_eq!(InputEvent::from_wheel_delta(0), None);
    }

    #[test]
    fn scroll_directions_differ() {
        assert_ne!(InputEvent::ScrollUp, InputEvent::ScrollDown);
    }
}
