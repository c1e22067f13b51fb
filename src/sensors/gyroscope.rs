//! Gyroscope sensor types and configuration
//!
//! Provides the full-scale range enum, raw and physical data types, and the
//! raw-to-°/s conversion for the 3-axis gyroscope.

use super::decode_triplet;
use crate::Error;

/// Gyroscope full-scale range (`GYRO_CONFIG[4:3]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 degrees per second
    Dps250 = 0,
    /// ±500 degrees per second
    Dps500 = 1,
    /// ±1000 degrees per second
    Dps1000 = 2,
    /// ±2000 degrees per second
    Dps2000 = 3,
}

impl GyroRange {
    /// Get the sensitivity in LSB/(°/s)
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// Get the maximum value in degrees per second
    #[must_use]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1000,
            Self::Dps2000 => 2000,
        }
    }

    /// Bitfield encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw field value
    ///
    /// The error type follows the caller's bus error, so `?` works inside
    /// code returning the driver's `Error<E>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `value` is outside the field's domain.
    pub fn from_bits<E>(value: u8) -> Result<Self, Error<E>> {
        match value {
            0 => Ok(Self::Dps250),
            1 => Ok(Self::Dps500),
            2 => Ok(Self::Dps1000),
            3 => Ok(Self::Dps2000),
            _ => Err(Error::InvalidConfig),
        }
    }
}

impl TryFrom<u8> for GyroRange {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

/// Gyroscope data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroData {
    /// X-axis rotation (raw)
    pub x: i16,
    /// Y-axis rotation (raw)
    pub y: i16,
    /// Z-axis rotation (raw)
    pub z: i16,
}

impl GyroData {
    /// Decode the 6-byte `GYRO_OUT` burst (X/Y/Z, big-endian)
    #[must_use]
    pub fn from_be_bytes(buffer: &[u8; 6]) -> Self {
        let [x, y, z] = decode_triplet(buffer);
        Self { x, y, z }
    }
}

/// A raw gyroscope sample together with the range it was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroSample {
    /// Raw triplet as read from the device
    pub raw: GyroData,
    /// Range whose divisor applies to `raw`
    pub range: GyroRange,
}

impl GyroSample {
    /// Convert to degrees per second: `raw / sensitivity`
    #[must_use]
    pub fn to_dps(&self) -> AngularRate {
        AngularRate::from_raw(self.raw, self.range.sensitivity())
    }
}

/// Gyroscope data in degrees per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngularRate {
    /// X-axis rotation rate in °/s
    pub x: f32,
    /// Y-axis rotation rate in °/s
    pub y: f32,
    /// Z-axis rotation rate in °/s
    pub z: f32,
}

impl AngularRate {
    /// Create from raw sensor values
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw triplet
    /// * `sensitivity` - Sensitivity in LSB/(°/s) (from [`GyroRange::sensitivity()`])
    #[must_use]
    pub fn from_raw(raw: GyroData, sensitivity: f32) -> Self {
        Self {
            x: f32::from(raw.x) / sensitivity,
            y: f32::from(raw.y) / sensitivity,
            z: f32::from(raw.z) / sensitivity,
        }
    }

    /// Convert to radians per second
    #[must_use]
    pub fn to_radians(&self) -> (f32, f32, f32) {
        const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
        (self.x * DEG_TO_RAD, self.y * DEG_TO_RAD, self.z * DEG_TO_RAD)
    }
}
