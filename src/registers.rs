//! Register map and bitfield engine for the MPU-6xxx family
//!
//! All supported variants (MPU-6050, MPU-6500, MPU-9250) share one flat
//! register map. Registers and bitfields are plain `const` descriptors; the
//! free functions in this module perform the bus transactions and take the
//! transport explicitly, so the map itself carries no mutable state.
//!
//! ## Transactions
//! - [`read_field`]: one single-byte read, then mask and shift
//! - [`write_field`]: one read plus one write (read-modify-write). Fields are
//!   never cached, so bits changed by the device itself (e.g. the self-clearing
//!   reset bit) are not clobbered by a stale copy.
//! - [`read_burst`]: one multi-byte read starting at a register address
//!
//! If other devices share the bus, the caller must hold exclusive access for
//! the duration of a [`write_field`] call so no other transaction can land
//! between its read and its write.

use crate::Error;
use device_driver::RegisterInterface;

/// Register access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read-only register (writes are rejected before reaching the bus)
    ReadOnly,
    /// Read-write register
    ReadWrite,
}

/// A device register: address, size in bytes and access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    address: u8,
    size: u8,
    access: Access,
}

impl Register {
    /// Define a read-only register of `size` bytes
    #[must_use]
    pub const fn read_only(address: u8, size: u8) -> Self {
        Self {
            address,
            size,
            access: Access::ReadOnly,
        }
    }

    /// Define a read-write register of `size` bytes
    #[must_use]
    pub const fn read_write(address: u8, size: u8) -> Self {
        Self {
            address,
            size,
            access: Access::ReadWrite,
        }
    }

    /// Register address
    #[must_use]
    pub const fn address(self) -> u8 {
        self.address
    }

    /// Register size in bytes
    #[must_use]
    pub const fn size(self) -> u8 {
        self.size
    }

    /// Register access mode
    #[must_use]
    pub const fn access(self) -> Access {
        self.access
    }

    /// Whether the register accepts writes
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }
}

/// A sub-range of bits inside a single-byte register
///
/// Construction is `const` and panics if the field does not fit in its
/// register, so a bad descriptor in a `const` item fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    register: Register,
    offset: u8,
    width: u8,
}

impl BitField {
    /// Define a field of `width` bits starting at bit `offset`
    ///
    /// # Panics
    ///
    /// Panics if the register is wider than one byte or the field extends
    /// past bit 7.
    #[must_use]
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        assert!(register.size == 1, "bitfields must live in a single-byte register");
        assert!(width > 0 && offset + width <= 8, "bitfield exceeds register width");
        Self {
            register,
            offset,
            width,
        }
    }

    /// Define a single-bit flag
    #[must_use]
    pub const fn bit(register: Register, offset: u8) -> Self {
        Self::new(register, offset, 1)
    }

    /// Backing register
    #[must_use]
    pub const fn register(self) -> Register {
        self.register
    }

    /// Bit offset of the least significant bit
    #[must_use]
    pub const fn offset(self) -> u8 {
        self.offset
    }

    /// Field width in bits
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Largest value the field can hold
    #[must_use]
    pub const fn max_value(self) -> u8 {
        u8::MAX >> (8 - self.width)
    }

    /// Mask of the field's bits within the register
    #[must_use]
    pub const fn mask(self) -> u8 {
        self.max_value() << self.offset
    }

    /// Extract the field from a full register value
    #[must_use]
    pub const fn extract(self, register_value: u8) -> u8 {
        (register_value & self.mask()) >> self.offset
    }

    /// Replace the field inside a full register value, leaving other bits untouched
    ///
    /// `value` is truncated to the field width; use [`write_field`] for a
    /// checked write.
    #[must_use]
    pub const fn merge(self, register_value: u8, value: u8) -> u8 {
        (register_value & !self.mask()) | ((value << self.offset) & self.mask())
    }
}

// ==================== REGISTERS ====================

/// `SELF_TEST_X` - Factory self-test value, X axis (0x0D)
pub const SELF_TEST_X: Register = Register::read_only(0x0D, 1);
/// `SELF_TEST_Y` - Factory self-test value, Y axis (0x0E)
pub const SELF_TEST_Y: Register = Register::read_only(0x0E, 1);
/// `SELF_TEST_Z` - Factory self-test value, Z axis (0x0F)
pub const SELF_TEST_Z: Register = Register::read_only(0x0F, 1);
/// `SELF_TEST_A` - Factory self-test value, accelerometer low bits (0x10)
pub const SELF_TEST_A: Register = Register::read_only(0x10, 1);
/// `SMPLRT_DIV` - Sample rate divider (0x19)
pub const SMPLRT_DIV: Register = Register::read_write(0x19, 1);
/// `CONFIG` - Digital low pass filter configuration (0x1A)
pub const CONFIG: Register = Register::read_write(0x1A, 1);
/// `GYRO_CONFIG` - Gyroscope full-scale range (0x1B)
pub const GYRO_CONFIG: Register = Register::read_write(0x1B, 1);
/// `ACCEL_CONFIG` - Accelerometer full-scale range (0x1C)
pub const ACCEL_CONFIG: Register = Register::read_write(0x1C, 1);
/// `FIFO_EN` - FIFO source enables (0x23)
pub const FIFO_EN: Register = Register::read_write(0x23, 1);
/// `ACCEL_OUT` - Accelerometer X/Y/Z, 3x16-bit big-endian (0x3B)
pub const ACCEL_OUT: Register = Register::read_only(0x3B, 6);
/// `TEMP_OUT` - Temperature, 16-bit signed big-endian (0x41)
pub const TEMP_OUT: Register = Register::read_only(0x41, 2);
/// `GYRO_OUT` - Gyroscope X/Y/Z, 3x16-bit big-endian (0x43)
pub const GYRO_OUT: Register = Register::read_only(0x43, 6);
/// `SIGNAL_PATH_RESET` - Accel/gyro/temp signal path reset (0x68)
pub const SIGNAL_PATH_RESET: Register = Register::read_write(0x68, 1);
/// `USER_CTRL` - FIFO enable and reset (0x6A)
pub const USER_CTRL: Register = Register::read_write(0x6A, 1);
/// `PWR_MGMT_1` - Reset, sleep, cycle and clock select (0x6B)
pub const PWR_MGMT_1: Register = Register::read_write(0x6B, 1);
/// `PWR_MGMT_2` - Low power wake-up frequency (0x6C)
pub const PWR_MGMT_2: Register = Register::read_write(0x6C, 1);
/// `FIFO_COUNT` - Number of bytes in the FIFO, 16-bit big-endian (0x72)
pub const FIFO_COUNT: Register = Register::read_only(0x72, 2);
/// `FIFO_R_W` - FIFO data port; repeated reads stream out the buffer (0x74)
pub const FIFO_R_W: Register = Register::read_write(0x74, 1);
/// `WHO_AM_I` - Device identity (0x75)
pub const WHO_AM_I: Register = Register::read_only(0x75, 1);

// ==================== BITFIELDS ====================

/// `CONFIG[5:3]` - Filter bandwidth selection
pub const FILTER_BANDWIDTH: BitField = BitField::new(CONFIG, 3, 3);
/// `GYRO_CONFIG[4:3]` - Gyroscope full-scale select
pub const GYRO_FS_SEL: BitField = BitField::new(GYRO_CONFIG, 3, 2);
/// `ACCEL_CONFIG[4:3]` - Accelerometer full-scale select
pub const ACCEL_FS_SEL: BitField = BitField::new(ACCEL_CONFIG, 3, 2);

/// `FIFO_EN[7]` - Temperature into FIFO
pub const TEMP_FIFO_EN: BitField = BitField::bit(FIFO_EN, 7);
/// `FIFO_EN[6]` - Gyroscope X into FIFO
pub const XG_FIFO_EN: BitField = BitField::bit(FIFO_EN, 6);
/// `FIFO_EN[5]` - Gyroscope Y into FIFO
pub const YG_FIFO_EN: BitField = BitField::bit(FIFO_EN, 5);
/// `FIFO_EN[4]` - Gyroscope Z into FIFO
pub const ZG_FIFO_EN: BitField = BitField::bit(FIFO_EN, 4);
/// `FIFO_EN[3]` - Accelerometer X/Y/Z into FIFO
pub const ACCEL_FIFO_EN: BitField = BitField::bit(FIFO_EN, 3);

/// `SIGNAL_PATH_RESET[2:0]` - gyro (bit 2), accel (bit 1), temp (bit 0) path reset
pub const SIGNAL_PATH_RESET_ALL: BitField = BitField::new(SIGNAL_PATH_RESET, 0, 3);

/// `USER_CTRL[6]` - FIFO enable
pub const USER_FIFO_EN: BitField = BitField::bit(USER_CTRL, 6);
/// `USER_CTRL[2]` - FIFO reset (self-clearing)
pub const USER_FIFO_RESET: BitField = BitField::bit(USER_CTRL, 2);

/// `PWR_MGMT_1[7]` - Device reset (self-clearing)
pub const DEVICE_RESET: BitField = BitField::bit(PWR_MGMT_1, 7);
/// `PWR_MGMT_1[6]` - Sleep
pub const SLEEP: BitField = BitField::bit(PWR_MGMT_1, 6);
/// `PWR_MGMT_1[5]` - Cycle between sleep and single samples
pub const CYCLE: BitField = BitField::bit(PWR_MGMT_1, 5);
/// `PWR_MGMT_1[2:0]` - Clock source select
pub const CLKSEL: BitField = BitField::new(PWR_MGMT_1, 0, 3);

/// `PWR_MGMT_2[7:6]` - Wake-up frequency in cycle mode
pub const LP_WAKE_CTRL: BitField = BitField::new(PWR_MGMT_2, 6, 2);

// ==================== TRANSACTIONS ====================

fn size_bits(len: usize) -> u32 {
    u32::try_from(len * 8).unwrap_or(u32::MAX)
}

/// Read the byte at a register address (one transaction)
///
/// # Errors
///
/// Returns an error if communication with the device fails.
pub fn read_register<I>(interface: &mut I, register: Register) -> Result<u8, Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; 1];
    interface.read_register(register.address, 8, &mut buffer)?;
    Ok(buffer[0])
}

/// Write a full byte to a register (one transaction)
///
/// # Errors
///
/// Returns [`Error::ReadOnlyRegister`] without touching the bus if the
/// register is read-only, or an error if communication fails.
pub fn write_register<I>(
    interface: &mut I,
    register: Register,
    value: u8,
) -> Result<(), Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    if !register.is_writable() {
        return Err(Error::ReadOnlyRegister(register.address));
    }
    interface.write_register(register.address, 8, &[value])?;
    Ok(())
}

/// Read `buffer.len()` bytes starting at a register address in one transaction
///
/// # Errors
///
/// Returns an error if communication with the device fails.
pub fn read_burst<I>(
    interface: &mut I,
    register: Register,
    buffer: &mut [u8],
) -> Result<(), Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    interface.read_register(register.address, size_bits(buffer.len()), buffer)?;
    Ok(())
}

/// Read a 16-bit big-endian register pair in one transaction
///
/// # Errors
///
/// Returns an error if communication with the device fails.
pub fn read_u16<I>(interface: &mut I, register: Register) -> Result<u16, Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; 2];
    read_burst(interface, register, &mut buffer)?;
    Ok(u16::from_be_bytes(buffer))
}

/// Read a bitfield (one transaction)
///
/// # Errors
///
/// Returns an error if communication with the device fails.
pub fn read_field<I>(interface: &mut I, field: BitField) -> Result<u8, Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let value = read_register(interface, field.register)?;
    Ok(field.extract(value))
}

/// Write a bitfield with read-modify-write (one read, one write)
///
/// # Errors
///
/// Returns [`Error::FieldOverflow`] if `value` does not fit in the field and
/// [`Error::ReadOnlyRegister`] if the backing register is read-only; neither
/// touches the bus. Returns an error if communication fails.
pub fn write_field<I>(interface: &mut I, field: BitField, value: u8) -> Result<(), Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    if value > field.max_value() {
        return Err(Error::FieldOverflow {
            value,
            width: field.width,
        });
    }
    if !field.register.is_writable() {
        return Err(Error::ReadOnlyRegister(field.register.address));
    }

    let current = read_register(interface, field.register)?;
    write_register(interface, field.register, field.merge(current, value))
}
