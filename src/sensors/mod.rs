//! Sensor modules for the MPU-6xxx family
//!
//! This module provides types, enums, and conversions for each measurement:
//! - Accelerometer (3-axis)
//! - Gyroscope (3-axis)
//! - Temperature
//!
//! All bus operations are performed through methods on [`Mpu6xxx`](crate::Mpu6xxx);
//! the conversions here are pure and take the range explicitly.

pub mod accelerometer;
pub mod gyroscope;

use crate::Error;

// Re-export main types
pub use accelerometer::{AccelData, AccelRange, AccelSample, Acceleration};
pub use gyroscope::{AngularRate, GyroData, GyroRange, GyroSample};

/// Standard gravity in m/s², used to convert g to m/s²
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Temperature sensitivity in LSB/°C
pub const TEMP_SENSITIVITY: f32 = 340.0;

/// Temperature offset in °C at a raw reading of zero
pub const TEMP_OFFSET: f32 = 36.53;

/// Convert a raw `TEMP_OUT` reading to degrees Celsius
///
/// The transform is fixed and does not depend on the range settings:
/// `raw / 340.0 + 36.53`.
#[must_use]
pub fn temperature_to_celsius(raw: i16) -> f32 {
    f32::from(raw) / TEMP_SENSITIVITY + TEMP_OFFSET
}

/// Digital low pass filter bandwidth (`CONFIG[5:3]`)
///
/// Applies to both accelerometer and gyroscope. The 260 Hz setting
/// effectively disables the filter and raises the gyro output rate to 8 kHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterBandwidth {
    /// 260 Hz (filter effectively disabled)
    Hz260 = 0,
    /// 184 Hz
    Hz184 = 1,
    /// 94 Hz
    Hz94 = 2,
    /// 44 Hz
    Hz44 = 3,
    /// 21 Hz
    Hz21 = 4,
    /// 10 Hz
    Hz10 = 5,
    /// 5 Hz
    Hz5 = 6,
}

impl FilterBandwidth {
    /// Get the 3dB bandwidth in Hz
    #[must_use]
    pub const fn bandwidth_hz(self) -> u16 {
        match self {
            Self::Hz260 => 260,
            Self::Hz184 => 184,
            Self::Hz94 => 94,
            Self::Hz44 => 44,
            Self::Hz21 => 21,
            Self::Hz10 => 10,
            Self::Hz5 => 5,
        }
    }

    /// Gyroscope output rate feeding the sample rate divider, in Hz
    #[must_use]
    pub const fn gyro_output_rate_hz(self) -> u16 {
        match self {
            Self::Hz260 => 8000,
            _ => 1000,
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
            0 => Ok(Self::Hz260),
            1 => Ok(Self::Hz184),
            2 => Ok(Self::Hz94),
            3 => Ok(Self::Hz44),
            4 => Ok(Self::Hz21),
            5 => Ok(Self::Hz10),
            6 => Ok(Self::Hz5),
            _ => Err(Error::InvalidConfig),
        }
    }
}

impl TryFrom<u8> for FilterBandwidth {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

/// Split a 6-byte burst into three big-endian two's-complement values
pub(crate) fn decode_triplet(buffer: &[u8; 6]) -> [i16; 3] {
    [
        i16::from_be_bytes([buffer[0], buffer[1]]),
        i16::from_be_bytes([buffer[2], buffer[3]]),
        i16::from_be_bytes([buffer[4], buffer[5]]),
    ]
}
