//! Accelerometer sensor types and configuration
//!
//! Provides the full-scale range enum, raw and physical data types, and the
//! raw-to-m/s² conversion for the 3-axis accelerometer.

use super::{STANDARD_GRAVITY, decode_triplet};
use crate::Error;

/// Accelerometer full-scale range (`ACCEL_CONFIG[4:3]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2g range (most sensitive, least range)
    G2 = 0,
    /// ±4g range
    G4 = 1,
    /// ±8g range
    G8 = 2,
    /// ±16g range (least sensitive, most range)
    G16 = 3,
}

impl AccelRange {
    /// Get the sensitivity in LSB/g (Least Significant Bit per g)
    ///
    /// This is the divisor used to convert raw samples to g.
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// Get the maximum value in g
    #[must_use]
    pub const fn max_value(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Bitfield encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw field value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `value` is outside the field's domain.
    pub fn from_bits<E>(value: u8) -> Result<Self, Error<E>> {
        match value {
            0 => Ok(Self::G2),
            1 => Ok(Self::G4),
            2 => Ok(Self::G8),
            3 => Ok(Self::G16),
            _ => Err(Error::InvalidConfig),
        }
    }
}

impl TryFrom<u8> for AccelRange {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

/// Accelerometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

impl AccelData {
    /// Decode the 6-byte `ACCEL_OUT` burst (X/Y/Z, big-endian)
    #[must_use]
    pub fn from_be_bytes(buffer: &[u8; 6]) -> Self {
        let [x, y, z] = decode_triplet(buffer);
        Self { x, y, z }
    }
}

/// A raw accelerometer sample together with the range it was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    /// Raw triplet as read from the device
    pub raw: AccelData,
    /// Range whose divisor applies to `raw`
    pub range: AccelRange,
}

impl AccelSample {
    /// Convert to m/s²: `raw / sensitivity * 9.80665`
    #[must_use]
    pub fn to_ms2(&self) -> Acceleration {
        Acceleration::from_raw(self.raw, self.range.sensitivity())
    }
}

/// Accelerometer data in physical units (m/s²)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    /// X-axis acceleration in m/s²
    pub x: f32,
    /// Y-axis acceleration in m/s²
    pub y: f32,
    /// Z-axis acceleration in m/s²
    pub z: f32,
}

impl Acceleration {
    /// Create from raw sensor values
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw triplet
    /// * `sensitivity` - Sensitivity in LSB/g (from [`AccelRange::sensitivity()`])
    #[must_use]
    pub fn from_raw(raw: AccelData, sensitivity: f32) -> Self {
        Self {
            x: f32::from(raw.x) / sensitivity * STANDARD_GRAVITY,
            y: f32::from(raw.y) / sensitivity * STANDARD_GRAVITY,
            z: f32::from(raw.z) / sensitivity * STANDARD_GRAVITY,
        }
    }

    /// Get the magnitude of the acceleration vector in m/s²
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Express the vector in g
    #[must_use]
    pub fn to_g(&self) -> (f32, f32, f32) {
        (
            self.x / STANDARD_GRAVITY,
            self.y / STANDARD_GRAVITY,
            self.z / STANDARD_GRAVITY,
        )
    }
}
