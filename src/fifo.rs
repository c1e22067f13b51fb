//! FIFO (First In First Out) buffer management
//!
//! Every MPU-6xxx variant buffers samples in an on-chip FIFO (1024 bytes on the
//! MPU-6050, 512 bytes by default on the MPU-6500/9250). Frames are written in
//! register order, big-endian:
//! 1. Accelerometer (6 bytes) - if enabled
//! 2. Temperature (2 bytes) - if enabled
//! 3. Gyroscope X, Y, Z (2 bytes each) - per enabled axis
//!
//! # Drain hazard
//!
//! [`Mpu6xxx::drain_fifo`](crate::Mpu6xxx::drain_fifo) reads `FIFO_COUNT` and
//! then bursts that many bytes out of `FIFO_R_W`. The device keeps appending
//! between the two transactions, so the count can lag behind the buffer; the
//! bytes that arrived in between stay in the FIFO for the next drain. The two
//! steps are issued back to back with nothing in between, and if other devices
//! share the bus the caller must hold exclusive access across the call.
//!
//! # Example
//!
//! ```ignore
//! # use mpu6xxx::{Mpu6xxx, FifoConfig, FIFO_SIZE};
//! # let mut imu: Mpu6xxx<_, _> = todo!();
//! imu.configure_fifo(&FifoConfig::accel_gyro())?;
//!
//! let mut buffer = [0u8; FIFO_SIZE];
//! let bytes = imu.drain_fifo(&mut buffer)?;
//! for frame in bytes.chunks_exact(FifoConfig::accel_gyro().frame_size()) {
//!     // decode frame
//! }
//! # Ok::<(), mpu6xxx::Error<()>>(())
//! ```

use crate::registers;

/// Largest FIFO across supported variants, in bytes
pub const FIFO_SIZE: usize = 1024;

/// `FIFO_EN` bits owned by [`FifoConfig`]; the external slave bits are left alone
pub const FIFO_SOURCE_MASK: u8 = registers::TEMP_FIFO_EN.mask()
    | registers::XG_FIFO_EN.mask()
    | registers::YG_FIFO_EN.mask()
    | registers::ZG_FIFO_EN.mask()
    | registers::ACCEL_FIFO_EN.mask();

/// FIFO source configuration (`FIFO_EN`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct FifoConfig {
    /// Enable accelerometer X/Y/Z data in FIFO
    pub enable_accel: bool,
    /// Enable temperature data in FIFO
    pub enable_temp: bool,
    /// Enable gyroscope X-axis data in FIFO
    pub enable_gyro_x: bool,
    /// Enable gyroscope Y-axis data in FIFO
    pub enable_gyro_y: bool,
    /// Enable gyroscope Z-axis data in FIFO
    pub enable_gyro_z: bool,
}

impl FifoConfig {
    /// Accelerometer and all gyroscope axes (12-byte frames)
    #[must_use]
    pub const fn accel_gyro() -> Self {
        Self {
            enable_accel: true,
            enable_temp: false,
            enable_gyro_x: true,
            enable_gyro_y: true,
            enable_gyro_z: true,
        }
    }

    /// Whether any source is enabled
    #[must_use]
    pub const fn any_enabled(&self) -> bool {
        self.enable_accel
            || self.enable_temp
            || self.enable_gyro_x
            || self.enable_gyro_y
            || self.enable_gyro_z
    }

    /// Bytes per FIFO frame for this configuration
    #[must_use]
    pub const fn frame_size(&self) -> usize {
        let mut size = 0;
        if self.enable_accel {
            size += 6;
        }
        if self.enable_temp {
            size += 2;
        }
        if self.enable_gyro_x {
            size += 2;
        }
        if self.enable_gyro_y {
            size += 2;
        }
        if self.enable_gyro_z {
            size += 2;
        }
        size
    }

    /// `FIFO_EN` register value for this configuration
    ///
    /// Only the bits in [`FIFO_SOURCE_MASK`] are ever set.
    #[must_use]
    pub const fn fifo_en_bits(&self) -> u8 {
        let mut bits = 0;
        bits = registers::TEMP_FIFO_EN.merge(bits, self.enable_temp as u8);
        bits = registers::XG_FIFO_EN.merge(bits, self.enable_gyro_x as u8);
        bits = registers::YG_FIFO_EN.merge(bits, self.enable_gyro_y as u8);
        bits = registers::ZG_FIFO_EN.merge(bits, self.enable_gyro_z as u8);
        registers::ACCEL_FIFO_EN.merge(bits, self.enable_accel as u8)
    }
}
