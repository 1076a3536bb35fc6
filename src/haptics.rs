//! Haptic feedback

/// Vibration patterns
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pulse {
    /// Turn ahead
    Short,
    /// Destination reached
    Long,
}

impl Pulse {
    /// Pattern duration (ms)
    pub fn duration_ms(&self) -> u32 {
        match self {
            Self::Short => 100,
            Self::Long => 400,
        }
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Device vibration, fire and forget. Implementations
/// should silently do nothing when the hardware is absent.
pub trait Haptics {
    fn pulse(&mut self, pulse: Pulse);
}

/// [Haptics] for devices that cannot vibrate.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullHaptics {}

impl Haptics for NullHaptics {
    fn pulse(&mut self, _: Pulse) {}
}
