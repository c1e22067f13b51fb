#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod device;
pub mod identity;
pub mod interface;
pub mod registers;
pub mod sensors;

pub mod fifo;
pub mod power;

// Re-export main types
pub use device::{DeviceState, Mpu6xxx, ScaleFactors, SensorConfig};
pub use fifo::{FIFO_SIZE, FifoConfig};
pub use identity::{ChipVariant, detect};
pub use interface::I2cInterface;
pub use power::{ClockSource, CycleRate};
pub use registers::{Access, BitField, Register};
pub use sensors::{
    AccelData, AccelRange, AccelSample, Acceleration, AngularRate, FilterBandwidth, GyroData,
    GyroRange, GyroSample, STANDARD_GRAVITY, temperature_to_celsius,
};

/// MPU-6050 driver (same register layout as the rest of the family)
pub type Mpu6050<I, D> = Mpu6xxx<I, D>;
/// MPU-6500 driver (same register layout as the rest of the family)
pub type Mpu6500<I, D> = Mpu6xxx<I, D>;
/// MPU-9250 driver, accelerometer and gyroscope only
pub type Mpu9250<I, D> = Mpu6xxx<I, D>;

/// I2C address when the AD0 pin is low (default: 0x68)
///
/// Most GY-521 style breakout boards pull AD0 low. Use
/// [`I2cInterface::default()`] for this configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// I2C address when the AD0 pin is high (alternative: 0x69)
///
/// Use [`I2cInterface::alternative()`] for this configuration. The driver
/// never probes the alternative address on its own.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Driver errors
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// `WHO_AM_I` returned a value outside the supported chip table (contains the value read)
    UnsupportedDevice(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// Value does not fit in the target bitfield
    FieldOverflow {
        /// Value that was rejected
        value: u8,
        /// Width of the bitfield in bits
        width: u8,
    },
    /// Attempted write to a read-only register (contains the register address)
    ReadOnlyRegister(u8),
    /// Initialization timed out (device reset bit never cleared)
    InitializationTimeout,
    /// The driver is faulted; no bus access was performed
    Faulted,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
