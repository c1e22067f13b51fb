//! Clock source and low-power cycle settings
//!
//! The MPU-6xxx family has three power states reachable from the driver:
//! - **Active**: all sensors sampling continuously
//! - **Sleep**: minimum power, no new samples (`PWR_MGMT_1.SLEEP`)
//! - **Cycle**: wakes at [`CycleRate`] to take a single accelerometer sample,
//!   then sleeps again (`PWR_MGMT_1.CYCLE`)
//!
//! # Example
//!
//! ```ignore
//! # use mpu6xxx::{Mpu6xxx, power::CycleRate};
//! # let mut imu: Mpu6xxx<_, _> = todo!();
//! imu.set_cycle_rate(CycleRate::Hz5)?;
//! imu.set_cycle(true)?;
//! # Ok::<(), mpu6xxx::Error<()>>(())
//! ```

use crate::Error;

/// Clock source selection (`PWR_MGMT_1[2:0]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 8 MHz oscillator (power-on default)
    Internal8MHz = 0,
    /// PLL with X axis gyroscope reference
    PllGyroX = 1,
    /// PLL with Y axis gyroscope reference
    PllGyroY = 2,
    /// PLL with Z axis gyroscope reference
    PllGyroZ = 3,
    /// PLL with external 32.768 kHz reference
    PllExternal32kHz = 4,
    /// PLL with external 19.2 MHz reference
    PllExternal19MHz = 5,
    /// Reserved
    Reserved = 6,
    /// Stops the clock and keeps the timing generator in reset
    Stop = 7,
}

impl ClockSource {
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
            0 => Ok(Self::Internal8MHz),
            1 => Ok(Self::PllGyroX),
            2 => Ok(Self::PllGyroY),
            3 => Ok(Self::PllGyroZ),
            4 => Ok(Self::PllExternal32kHz),
            5 => Ok(Self::PllExternal19MHz),
            6 => Ok(Self::Reserved),
            7 => Ok(Self::Stop),
            _ => Err(Error::InvalidConfig),
        }
    }
}

impl TryFrom<u8> for ClockSource {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}

/// Wake-up frequency in cycle mode (`PWR_MGMT_2[7:6]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleRate {
    /// 1.25 Hz (800 ms period)
    Hz1_25 = 0,
    /// 5 Hz (200 ms period)
    Hz5 = 1,
    /// 20 Hz (50 ms period)
    Hz20 = 2,
    /// 40 Hz (25 ms period)
    Hz40 = 3,
}

impl CycleRate {
    /// Get the wake-up rate in Hz
    #[must_use]
    pub const fn rate_hz(self) -> f32 {
        match self {
            Self::Hz1_25 => 1.25,
            Self::Hz5 => 5.0,
            Self::Hz20 => 20.0,
            Self::Hz40 => 40.0,
        }
    }

    /// Get the wake-up period in milliseconds
    #[must_use]
    pub const fn period_ms(self) -> u16 {
        match self {
            Self::Hz1_25 => 800,
            Self::Hz5 => 200,
            Self::Hz20 => 50,
            Self::Hz40 => 25,
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
            0 => Ok(Self::Hz1_25),
            1 => Ok(Self::Hz5),
            2 => Ok(Self::Hz20),
            3 => Ok(Self::Hz40),
            _ => Err(Error::InvalidConfig),
        }
    }
}

impl TryFrom<u8> for CycleRate {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value)
    }
}
