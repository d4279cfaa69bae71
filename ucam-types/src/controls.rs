//! Image controls (CBE) and light frequency (LIGHT)

use std::fmt;

use crate::error::{Error, Result};

/// One step on the camera's five-point control scale
///
/// `0` is the minimum, `2` nominal and `4` the maximum. For exposure the
/// steps map to -2..=+2.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const NOMINAL: Level = Level(2);
    pub const MAX: Level = Level(4);

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX.0 {
            return Err(Error::InvalidLevel(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::NOMINAL
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contrast, brightness and exposure as sent by the CBE command
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ImageControls {
    pub contrast: Level,
    pub brightness: Level,
    pub exposure: Level,
}

/// Mains frequency whose flicker the sensor should suppress
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LightFrequency {
    #[default]
    Hz50 = 0x00,
    Hz60 = 0x01,
}

impl From<LightFrequency> for u8 {
    fn from(freq: LightFrequency) -> u8 {
        freq as u8
    }
}

impl TryFrom<u8> for LightFrequency {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Hz50),
            0x01 => Ok(Self::Hz60),
            code => Err(Error::UnknownCode { kind: "light frequency", code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        assert_eq!(Level::new(0).unwrap(), Level::MIN);
        assert_eq!(Level::new(4).unwrap(), Level::MAX);
        assert!(matches!(Level::new(5), Err(Error::InvalidLevel(5))));
    }

    #[test]
    fn test_controls_default_to_nominal() {
        let controls = ImageControls::default();
        assert_eq!(controls.contrast, Level::NOMINAL);
        assert_eq!(controls.brightness.value(), 2);
        assert_eq!(controls.exposure.value(), 2);
    }

    #[test]
    fn test_light_frequency_codes() {
        assert_eq!(u8::from(LightFrequency::Hz60), 1);
        assert_eq!(LightFrequency::try_from(0).unwrap(), LightFrequency::Hz50);
        assert!(LightFrequency::try_from(2).is_err());
    }
}
