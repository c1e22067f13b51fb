//! Chip variant detection
//!
//! Every supported chip answers on the same register map; the only way to
//! tell them apart is the `WHO_AM_I` register. Detection happens once and
//! yields a [`ChipVariant`], which the rest of the driver branches on instead
//! of re-reading the identity byte.

use crate::Error;
use crate::registers::{self, WHO_AM_I};
use device_driver::RegisterInterface;

/// Supported chip variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipVariant {
    /// MPU-6050 (`WHO_AM_I` = 0x68)
    Mpu6050,
    /// MPU-6500 (`WHO_AM_I` = 0x70)
    Mpu6500,
    /// MPU-9250 (`WHO_AM_I` = 0x71), accelerometer and gyroscope die only
    Mpu9250,
}

impl ChipVariant {
    /// All supported variants, in identity-table order
    pub const ALL: [Self; 3] = [Self::Mpu6050, Self::Mpu6500, Self::Mpu9250];

    /// Look up a `WHO_AM_I` value in the identity table
    #[must_use]
    pub const fn from_who_am_i(value: u8) -> Option<Self> {
        match value {
            0x68 => Some(Self::Mpu6050),
            0x70 => Some(Self::Mpu6500),
            0x71 => Some(Self::Mpu9250),
            _ => None,
        }
    }

    /// Expected `WHO_AM_I` value for this variant
    #[must_use]
    pub const fn who_am_i(self) -> u8 {
        match self {
            Self::Mpu6050 => 0x68,
            Self::Mpu6500 => 0x70,
            Self::Mpu9250 => 0x71,
        }
    }

    /// Marketing name of the chip
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mpu6050 => "MPU6050",
            Self::Mpu6500 => "MPU6500",
            Self::Mpu9250 => "MPU9250",
        }
    }
}

/// Read `WHO_AM_I` once and match it against the identity table
///
/// An unknown identity is a normal outcome (wrong chip, wrong address) and is
/// reported as [`Error::UnsupportedDevice`] with the observed byte; the driver
/// never falls back to a guessed variant.
///
/// # Errors
///
/// Returns an error if communication fails or the identity is unknown.
pub fn detect<I>(interface: &mut I) -> Result<ChipVariant, Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let who_am_i = registers::read_register(interface, WHO_AM_I)?;
    ChipVariant::from_who_am_i(who_am_i).ok_or(Error::UnsupportedDevice(who_am_i))
}
