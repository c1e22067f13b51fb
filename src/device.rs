//! High-level driver API for the MPU-6xxx family
//!
//! This module provides the [`Mpu6xxx`] driver: chip detection, the
//! reset/configure/wake lifecycle, typed configuration setters and sample
//! reads in physical units.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init--> Resetting --reset bit clears--> Configuring --config applied--> Active
//!                                                                                  Active <--> Sleeping
//! any bus failure / reset timeout --> Faulted (terminal)
//! ```
//!
//! Once `Faulted`, every method returns [`Error::Faulted`] without touching
//! the bus. Recover by calling [`Mpu6xxx::release`] and constructing a new
//! driver.
//!
//! # Timing
//!
//! Every configuration setter blocks for a 10 ms settling delay after its
//! write. [`Mpu6xxx::init`] additionally waits 100 ms after the reset clears,
//! after the signal path reset, and after the configuration is applied.
//!
//! # Shared buses
//!
//! Field writes are read-modify-write and the FIFO drain is count-then-read.
//! If other devices share the bus, hold exclusive access around each driver
//! call; the driver does not enforce it.

use crate::Error;
use crate::fifo::{FIFO_SOURCE_MASK, FifoConfig};
use crate::identity::{self, ChipVariant};
use crate::power::{ClockSource, CycleRate};
use crate::registers::{self, BitField, Register};
use crate::sensors::{
    AccelData, AccelRange, AccelSample, Acceleration, AngularRate, FilterBandwidth, GyroData,
    GyroRange, GyroSample, temperature_to_celsius,
};

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// Settling delay after a configuration write
pub const CONFIG_SETTLE_MS: u32 = 10;

/// Settling delay between lifecycle phases
pub const PHASE_SETTLE_MS: u32 = 100;

/// Interval between reads of the reset bit
const RESET_POLL_INTERVAL_MS: u32 = 1;

/// Reset-bit reads before giving up (100 ms at 1 ms intervals)
pub const RESET_POLL_LIMIT: u32 = 100;

/// Gyro, accel and temperature signal paths
const SIGNAL_PATH_RESET_MASK: u8 = 0b111;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Constructed, no bus traffic yet
    Uninitialized,
    /// Soft reset issued, waiting for the reset bit to clear
    Resetting,
    /// Reset complete, configuration being applied
    Configuring,
    /// Awake and sampling
    Active,
    /// Sleep bit set
    Sleeping,
    /// A bus operation failed or the reset timed out; the instance is unusable
    Faulted,
}

/// Measurement configuration snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Clock source
    pub clock_source: ClockSource,
    /// Sample rate divider (`SMPLRT_DIV`)
    /// Sample rate = gyro output rate / (1 + `sample_rate_divider`)
    pub sample_rate_divider: u8,
    /// Digital low pass filter bandwidth
    pub filter_bandwidth: FilterBandwidth,
    /// Gyroscope full-scale range
    pub gyro_range: GyroRange,
    /// Accelerometer full-scale range
    pub accel_range: AccelRange,
}

impl SensorConfig {
    /// Register contents right after a power-on or soft reset
    pub const POWER_ON: Self = Self {
        clock_source: ClockSource::Internal8MHz,
        sample_rate_divider: 0,
        filter_bandwidth: FilterBandwidth::Hz260,
        gyro_range: GyroRange::Dps250,
        accel_range: AccelRange::G2,
    };

    /// Calculate the effective sample rate in Hz
    #[must_use]
    pub fn sample_rate_hz(&self) -> f32 {
        f32::from(self.filter_bandwidth.gyro_output_rate_hz())
            / (1.0 + f32::from(self.sample_rate_divider))
    }

    /// Scale factors implied by the configured ranges
    #[must_use]
    pub const fn scale_factors(&self) -> ScaleFactors {
        ScaleFactors {
            accel_lsb_per_g: self.accel_range.sensitivity(),
            gyro_lsb_per_dps: self.gyro_range.sensitivity(),
        }
    }
}

impl Default for SensorConfig {
    /// Configuration applied by [`Mpu6xxx::init`]: gyro-X PLL clock, ±500 °/s, ±2 g, 260 Hz
    fn default() -> Self {
        Self {
            clock_source: ClockSource::PllGyroX,
            sample_rate_divider: 0,
            filter_bandwidth: FilterBandwidth::Hz260,
            gyro_range: GyroRange::Dps500,
            accel_range: AccelRange::G2,
        }
    }
}

/// Divisors currently applied to raw samples
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleFactors {
    /// Accelerometer LSB per g
    pub accel_lsb_per_g: f32,
    /// Gyroscope LSB per degree/second
    pub gyro_lsb_per_dps: f32,
}

/// Main driver for MPU-6050 / MPU-6500 / MPU-9250 devices
pub struct Mpu6xxx<I, D> {
    interface: I,
    delay: D,
    state: DeviceState,
    variant: Option<ChipVariant>,
    // Mirrors the range/clock/filter registers; only updated after a successful write
    config: SensorConfig,
}

impl<I, D> Mpu6xxx<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Create a new driver instance in [`DeviceState::Uninitialized`]
    ///
    /// No bus traffic happens until [`init`](Self::init) is called.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let interface = I2cInterface::default(&mut i2c);
    /// let mut imu = Mpu6xxx::new(interface, embassy_time::Delay);
    /// let variant = imu.init()?;
    /// ```
    pub const fn new(interface: I, delay: D) -> Self {
        Self {
            interface,
            delay,
            state: DeviceState::Uninitialized,
            variant: None,
            config: SensorConfig::POWER_ON,
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Chip variant found by the last successful detection
    pub const fn variant(&self) -> Option<ChipVariant> {
        self.variant
    }

    /// Cached configuration (matches the last values written to the device)
    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Scale factors applied by the sample reads
    pub const fn scale_factors(&self) -> ScaleFactors {
        self.config.scale_factors()
    }

    /// Consume the driver and return the interface and delay provider
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    // ==================== LIFECYCLE ====================

    /// Detect, reset and configure the device with [`SensorConfig::default()`]
    ///
    /// See [`init_with_config`](Self::init_with_config).
    ///
    /// # Errors
    ///
    /// See [`init_with_config`](Self::init_with_config).
    pub fn init(&mut self) -> Result<ChipVariant, Error<I::Error>> {
        self.init_with_config(&SensorConfig::default())
    }

    /// Detect, reset and configure the device, leaving it [`DeviceState::Active`]
    ///
    /// Sequence:
    /// 1. Read `WHO_AM_I`; an unknown identity aborts before any write
    /// 2. Soft reset, polling the reset bit every 1 ms for at most 100 ms
    /// 3. Wait 100 ms, reset the signal paths, wait 100 ms
    /// 4. Apply `config` (10 ms per setting), wait 100 ms
    /// 5. Clear the sleep bit, wait 10 ms
    ///
    /// Returns the detected chip variant.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedDevice`] if the identity is unknown; the state is
    ///   left unchanged and the device untouched
    /// - [`Error::InitializationTimeout`] if the reset bit never clears; the
    ///   driver becomes faulted
    /// - [`Error::Bus`] on communication failure; the driver becomes faulted
    /// - [`Error::Faulted`] if the driver was already faulted
    pub fn init_with_config(
        &mut self,
        config: &SensorConfig,
    ) -> Result<ChipVariant, Error<I::Error>> {
        self.ensure_operational()?;

        let variant = self.detect()?;

        self.soft_reset()?;
        self.reset_signal_paths()?;

        self.apply_config(config)?;
        self.delay.delay_ms(PHASE_SETTLE_MS);

        self.write_field(registers::SLEEP, 0)?;
        self.delay.delay_ms(CONFIG_SETTLE_MS);
        self.transition(DeviceState::Active);

        Ok(variant)
    }

    /// Soft reset the device
    ///
    /// Sets the self-clearing reset bit and polls it until the device clears
    /// it, then waits 100 ms. Every register returns to its power-on value, so
    /// the device is asleep afterwards and the driver is left in
    /// [`DeviceState::Configuring`]; call [`init`](Self::init) to bring it back
    /// to `Active`.
    ///
    /// A driver that has not identified its chip yet reads `WHO_AM_I` first
    /// and never resets an unknown device.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedDevice`] if the identity is unknown; nothing is
    ///   written
    /// - [`Error::InitializationTimeout`] if the bit is still set after 100
    ///   polls; the driver becomes faulted
    /// - [`Error::Bus`] on communication failure; the driver becomes faulted
    pub fn reset(&mut self) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;
        if self.variant.is_none() {
            self.detect()?;
        }
        self.soft_reset()
    }

    /// Identify the chip and remember the variant
    fn detect(&mut self) -> Result<ChipVariant, Error<I::Error>> {
        let detected = identity::detect(&mut self.interface);
        let variant = self.track(detected)?;
        self.variant = Some(variant);

        #[cfg(feature = "defmt")]
        defmt::info!("Detected {} (WHO_AM_I=0x{:02X})", variant.name(), variant.who_am_i());

        Ok(variant)
    }

    fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.transition(DeviceState::Resetting);

        self.write_field(registers::DEVICE_RESET, 1)?;
        self.config = SensorConfig::POWER_ON;

        let mut cleared = false;
        for _ in 0..RESET_POLL_LIMIT {
            self.delay.delay_ms(RESET_POLL_INTERVAL_MS);
            if self.read_field(registers::DEVICE_RESET)? == 0 {
                cleared = true;
                break;
            }
        }

        if !cleared {
            return self.track(Err(Error::InitializationTimeout));
        }

        self.delay.delay_ms(PHASE_SETTLE_MS);
        self.transition(DeviceState::Configuring);
        Ok(())
    }

    /// Reset the gyro, accel and temperature signal paths, then wait 100 ms
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_signal_paths(&mut self) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;
        self.write_field(registers::SIGNAL_PATH_RESET_ALL, SIGNAL_PATH_RESET_MASK)?;
        self.delay.delay_ms(PHASE_SETTLE_MS);
        Ok(())
    }

    // ==================== CONFIGURATION ====================

    /// Apply a full configuration snapshot through the individual setters
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn apply_config(&mut self, config: &SensorConfig) -> Result<(), Error<I::Error>> {
        self.set_clock_source(config.clock_source)?;
        self.set_sample_rate_divider(config.sample_rate_divider)?;
        self.set_filter_bandwidth(config.filter_bandwidth)?;
        self.set_gyro_range(config.gyro_range)?;
        self.set_accel_range(config.accel_range)?;
        Ok(())
    }

    /// Select the clock source
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::CLKSEL, source.bits())?;
        self.config.clock_source = source;
        Ok(())
    }

    /// Set the gyroscope full-scale range
    ///
    /// Subsequent [`read_angular_rate`](Self::read_angular_rate) calls use the
    /// new divisor.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::GYRO_FS_SEL, range.bits())?;
        self.config.gyro_range = range;
        Ok(())
    }

    /// Set the accelerometer full-scale range
    ///
    /// Subsequent [`read_acceleration`](Self::read_acceleration) calls use the
    /// new divisor.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::ACCEL_FS_SEL, range.bits())?;
        self.config.accel_range = range;
        Ok(())
    }

    /// Set the digital low pass filter bandwidth
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_filter_bandwidth(
        &mut self,
        bandwidth: FilterBandwidth,
    ) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::FILTER_BANDWIDTH, bandwidth.bits())?;
        self.config.filter_bandwidth = bandwidth;
        Ok(())
    }

    /// Set the sample rate divider
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;
        self.write_register(registers::SMPLRT_DIV, divider)?;
        self.config.sample_rate_divider = divider;
        self.delay.delay_ms(CONFIG_SETTLE_MS);
        Ok(())
    }

    /// Set the wake-up frequency used in cycle mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_cycle_rate(&mut self, rate: CycleRate) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::LP_WAKE_CTRL, rate.bits())
    }

    /// Enter or leave sleep mode
    ///
    /// Toggles between [`DeviceState::Active`] and [`DeviceState::Sleeping`];
    /// waking does not repeat the reset sequence. In other states only the bit
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sleep(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.configure_field(registers::SLEEP, u8::from(enable))?;
        match (self.state, enable) {
            (DeviceState::Active, true) => self.transition(DeviceState::Sleeping),
            (DeviceState::Sleeping, false) => self.transition(DeviceState::Active),
            _ => {}
        }
        Ok(())
    }

    /// Enable or disable cycle mode
    ///
    /// Enabling wakes the device and sets the cycle bit, so it alternates
    /// between sleep and single samples at the [`CycleRate`]. Disabling
    /// puts the device to sleep and clears the cycle bit.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_cycle(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        if enable {
            self.set_sleep(false)?;
            self.configure_field(registers::CYCLE, 1)
        } else {
            self.configure_field(registers::CYCLE, 0)?;
            self.set_sleep(true)
        }
    }

    // ==================== SAMPLES ====================

    /// Read raw accelerometer data in one 6-byte burst
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel_raw(&mut self) -> Result<AccelData, Error<I::Error>> {
        self.ensure_operational()?;
        // One burst so the three axes come from the same sample
        let mut buffer = [0u8; 6];
        self.read_burst(registers::ACCEL_OUT, &mut buffer)?;
        Ok(AccelData::from_be_bytes(&buffer))
    }

    /// Read a raw accelerometer sample tagged with the active range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel_sample(&mut self) -> Result<AccelSample, Error<I::Error>> {
        let raw = self.read_accel_raw()?;
        Ok(AccelSample {
            raw,
            range: self.config.accel_range,
        })
    }

    /// Read acceleration in m/s²
    ///
    /// # Example
    ///
    /// ```ignore
    /// let accel = imu.read_acceleration()?;
    /// println!("X: {} m/s², Y: {} m/s², Z: {} m/s²", accel.x, accel.y, accel.z);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_acceleration(&mut self) -> Result<Acceleration, Error<I::Error>> {
        Ok(self.read_accel_sample()?.to_ms2())
    }

    /// Read raw gyroscope data in one 6-byte burst
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_gyro_raw(&mut self) -> Result<GyroData, Error<I::Error>> {
        self.ensure_operational()?;
        let mut buffer = [0u8; 6];
        self.read_burst(registers::GYRO_OUT, &mut buffer)?;
        Ok(GyroData::from_be_bytes(&buffer))
    }

    /// Read a raw gyroscope sample tagged with the active range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_gyro_sample(&mut self) -> Result<GyroSample, Error<I::Error>> {
        let raw = self.read_gyro_raw()?;
        Ok(GyroSample {
            raw,
            range: self.config.gyro_range,
        })
    }

    /// Read angular rate in degrees per second
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_angular_rate(&mut self) -> Result<AngularRate, Error<I::Error>> {
        Ok(self.read_gyro_sample()?.to_dps())
    }

    /// Read the raw 16-bit signed temperature
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature_raw(&mut self) -> Result<i16, Error<I::Error>> {
        self.ensure_operational()?;
        let mut buffer = [0u8; 2];
        self.read_burst(registers::TEMP_OUT, &mut buffer)?;
        Ok(i16::from_be_bytes(buffer))
    }

    /// Read temperature in degrees Celsius
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(temperature_to_celsius(self.read_temperature_raw()?))
    }

    /// Read the factory self-test registers `SELF_TEST_X/Y/Z/A` in one burst
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_self_test_registers(&mut self) -> Result<[u8; 4], Error<I::Error>> {
        self.ensure_operational()?;
        let mut buffer = [0u8; 4];
        self.read_burst(registers::SELF_TEST_X, &mut buffer)?;
        Ok(buffer)
    }

    /// Read a single bitfield
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_field(&mut self, field: BitField) -> Result<u8, Error<I::Error>> {
        self.ensure_operational()?;
        let result = registers::read_field(&mut self.interface, field);
        self.track(result)
    }

    // ==================== FIFO ====================

    /// Select which measurements are written into the FIFO and enable it
    ///
    /// The FIFO is enabled in `USER_CTRL` when any source is selected and
    /// disabled otherwise. The external slave bits of `FIFO_EN` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_fifo(&mut self, config: &FifoConfig) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;

        let current = self.read_register(registers::FIFO_EN)?;
        let value = (current & !FIFO_SOURCE_MASK) | config.fifo_en_bits();
        self.write_register(registers::FIFO_EN, value)?;

        self.configure_field(registers::USER_FIFO_EN, u8::from(config.any_enabled()))
    }

    /// Discard the FIFO contents (self-clearing `USER_CTRL.FIFO_RESET`)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_fifo(&mut self) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;
        self.write_field(registers::USER_FIFO_RESET, 1)
    }

    /// Read the number of bytes currently stored in the FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_fifo_count(&mut self) -> Result<u16, Error<I::Error>> {
        self.ensure_operational()?;
        self.read_u16(registers::FIFO_COUNT)
    }

    /// Drain the FIFO into `buffer` with one burst read
    ///
    /// Reads `FIFO_COUNT`, then immediately reads `min(count, buffer.len())`
    /// bytes from `FIFO_R_W` in a single transaction. An empty FIFO returns an
    /// empty slice without a second transaction. Bytes that do not fit in
    /// `buffer`, or that arrive after the count was read, remain in the FIFO
    /// for the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn drain_fifo<'b>(&mut self, buffer: &'b mut [u8]) -> Result<&'b [u8], Error<I::Error>> {
        self.ensure_operational()?;

        let count = usize::from(self.read_u16(registers::FIFO_COUNT)?);
        let len = count.min(buffer.len());
        if len == 0 {
            return Ok(&[]);
        }
        self.read_burst(registers::FIFO_R_W, &mut buffer[..len])?;

        #[cfg(feature = "defmt")]
        {
            if count > len {
                defmt::warn!("FIFO drain truncated: {} bytes queued, {} read", count, len);
            } else {
                defmt::trace!("FIFO drain: {} bytes", len);
            }
        }

        Ok(&buffer[..len])
    }

    // ==================== INTERNALS ====================

    fn ensure_operational(&self) -> Result<(), Error<I::Error>> {
        if self.state == DeviceState::Faulted {
            return Err(Error::Faulted);
        }
        Ok(())
    }

    /// Bus failures and reset timeouts are terminal
    fn track<T>(&mut self, result: Result<T, Error<I::Error>>) -> Result<T, Error<I::Error>> {
        if matches!(result, Err(Error::Bus(_) | Error::InitializationTimeout)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Driver faulted in state {}", self.state);
            self.state = DeviceState::Faulted;
        }
        result
    }

    fn transition(&mut self, next: DeviceState) {
        #[cfg(feature = "defmt")]
        defmt::debug!("State {} -> {}", self.state, next);
        self.state = next;
    }

    /// Validated field write followed by the configuration settling delay
    fn configure_field(&mut self, field: BitField, value: u8) -> Result<(), Error<I::Error>> {
        self.ensure_operational()?;
        self.write_field(field, value)?;
        self.delay.delay_ms(CONFIG_SETTLE_MS);
        Ok(())
    }

    fn write_field(&mut self, field: BitField, value: u8) -> Result<(), Error<I::Error>> {
        let result = registers::write_field(&mut self.interface, field, value);
        self.track(result)
    }

    fn read_register(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        let result = registers::read_register(&mut self.interface, register);
        self.track(result)
    }

    fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<I::Error>> {
        let result = registers::write_register(&mut self.interface, register, value);
        self.track(result)
    }

    fn read_burst(&mut self, register: Register, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        let result = registers::read_burst(&mut self.interface, register, buffer);
        self.track(result)
    }

    fn read_u16(&mut self, register: Register) -> Result<u16, Error<I::Error>> {
        let result = registers::read_u16(&mut self.interface, register);
        self.track(result)
    }
}
