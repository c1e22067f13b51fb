//! Bus interface for the MPU-6xxx family
//!
//! [`I2cInterface`] adapts an `embedded-hal` I2C bus to the `device-driver`
//! [`RegisterInterface`] trait. `embedded-hal` implements `I2c` for `&mut T`,
//! so the interface usually borrows the bus rather than owning it:
//!
//! ```ignore
//! let interface = I2cInterface::default(&mut i2c);
//! ```
//!
//! When several devices share one bus, wrap it in an `embedded-hal-bus`
//! device. The driver assumes exclusive access for the duration of each
//! multi-step sequence (read-modify-write, FIFO count then drain); holding
//! that exclusion is the caller's responsibility.

use crate::{I2C_ADDRESS_AD0_HIGH, I2C_ADDRESS_AD0_LOW};

use device_driver::RegisterInterface;

/// Data bytes sent per write transaction
const MAX_WRITE_LEN: usize = 32;

/// I2C transport bound to one 7-bit device address
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Talk to the device at 0x68 (AD0 tied low)
    pub const fn default(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_AD0_LOW)
    }

    /// Talk to the device at 0x69 (AD0 tied high)
    pub const fn alternative(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDRESS_AD0_HIGH)
    }

    /// Talk to the device at an arbitrary 7-bit address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used for every transaction
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;
    type AddressType = u8;

    /// Register pointer write and burst read joined by a repeated start
    fn read_register(
        &mut self,
        address: u8,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    /// Register pointer followed by the payload; payloads longer than 32
    /// bytes go out as several writes, each addressed at its own offset
    fn write_register(
        &mut self,
        address: u8,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        let mut start = address;
        for chunk in write_data.chunks(MAX_WRITE_LEN) {
            frame[0] = start;
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.address, &frame[..=chunk.len()])?;
            // chunk.len() <= 32
            #[allow(clippy::cast_possible_truncation)]
            let advance = chunk.len() as u8;
            start = start.wrapping_add(advance);
        }
        Ok(())
    }
}
