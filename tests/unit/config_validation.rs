//! Configuration setter tests

use crate::common::mock_interface::{ACCEL_CONFIG, CONFIG, GYRO_CONFIG, PWR_MGMT_1, PWR_MGMT_2, SMPLRT_DIV};
use crate::common::{MockError, Operation, create_initialized_driver};
use mpu6xxx::device::CONFIG_SETTLE_MS;
use mpu6xxx::{
    AccelRange, ClockSource, CycleRate, Error, FilterBandwidth, GyroRange, SensorConfig,
};

#[test]
fn test_enum_domains_reject_invalid_values() {
    assert_eq!(GyroRange::try_from(4), Err(Error::InvalidConfig));
    assert_eq!(AccelRange::try_from(7), Err(Error::InvalidConfig));
    assert_eq!(FilterBandwidth::try_from(7), Err(Error::InvalidConfig));
    assert_eq!(ClockSource::try_from(8), Err(Error::InvalidConfig));
    assert_eq!(CycleRate::try_from(4), Err(Error::InvalidConfig));
}

#[test]
fn test_init_applies_configuration() {
    let config = SensorConfig {
        clock_source: ClockSource::PllGyroZ,
        sample_rate_divider: 9,
        filter_bandwidth: FilterBandwidth::Hz44,
        gyro_range: GyroRange::Dps2000,
        accel_range: AccelRange::G8,
    };
    let (driver, interface, _delay) = create_initialized_driver(&config);

    assert_eq!(interface.get_register(PWR_MGMT_1) & 0x07, 3);
    assert_eq!(interface.get_register(SMPLRT_DIV), 9);
    assert_eq!(interface.get_register(CONFIG), 0x18);
    assert_eq!(interface.get_register(GYRO_CONFIG), 0x18);
    assert_eq!(interface.get_register(ACCEL_CONFIG), 0x10);
    assert_eq!(driver.config(), &config);
    assert!((driver.config().sample_rate_hz() - 100.0).abs() < 1e-3);
}

#[test]
fn test_setter_waits_for_settling() {
    let (mut driver, _interface, delay) = create_initialized_driver(&SensorConfig::default());
    let before = delay.elapsed_ms();

    driver.set_gyro_range(GyroRange::Dps1000).unwrap();

    assert_eq!(delay.elapsed_ms() - before, u64::from(CONFIG_SETTLE_MS));
}

#[test]
fn test_each_setter_settles() {
    let (mut driver, _interface, delay) = create_initialized_driver(&SensorConfig::default());
    let before = delay.elapsed_ms();

    driver.set_clock_source(ClockSource::PllGyroY).unwrap();
    driver.set_sample_rate_divider(4).unwrap();
    driver.set_filter_bandwidth(FilterBandwidth::Hz21).unwrap();
    driver.set_gyro_range(GyroRange::Dps250).unwrap();
    driver.set_accel_range(AccelRange::G4).unwrap();
    driver.set_cycle_rate(CycleRate::Hz20).unwrap();

    assert_eq!(delay.elapsed_ms() - before, 6 * u64::from(CONFIG_SETTLE_MS));
}

#[test]
fn test_range_change_updates_scale_factors() {
    let (mut driver, _interface, _delay) = create_initialized_driver(&SensorConfig::default());
    assert!((driver.scale_factors().gyro_lsb_per_dps - 65.5).abs() < 1e-5);

    driver.set_gyro_range(GyroRange::Dps2000).unwrap();
    driver.set_accel_range(AccelRange::G16).unwrap();

    let scales = driver.scale_factors();
    assert!((scales.gyro_lsb_per_dps - 16.4).abs() < 1e-5);
    assert!((scales.accel_lsb_per_g - 2048.0).abs() < 1e-5);
}

#[test]
fn test_failed_write_keeps_previous_scale() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.fail_next_write();

    assert!(driver.set_accel_range(AccelRange::G16).is_err());
    assert_eq!(driver.config().accel_range, AccelRange::G2);
}

#[test]
fn test_range_setter_is_read_modify_write() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    // Self-test enable bits live next to the range field
    interface.set_register(GYRO_CONFIG, 0xE0);
    interface.clear_operations();

    driver.set_gyro_range(GyroRange::Dps1000).unwrap();

    assert_eq!(interface.get_register(GYRO_CONFIG), 0xF0);
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: GYRO_CONFIG,
                len: 1
            },
            Operation::Write {
                address: GYRO_CONFIG,
                value: 0xF0
            },
        ]
    );
}

#[test]
fn test_cycle_rate_written_to_upper_bits() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.set_register(PWR_MGMT_2, 0x07);

    driver.set_cycle_rate(CycleRate::Hz40).unwrap();

    assert_eq!(interface.get_register(PWR_MGMT_2), 0xC7);
}

#[test]
fn test_filter_bandwidth_sits_at_bit_three() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.set_register(CONFIG, 0x00);

    driver.set_filter_bandwidth(FilterBandwidth::Hz44).unwrap();
    assert_eq!(interface.get_register(CONFIG), 0x18);

    // Bits outside [5:3] survive the update
    interface.set_register(CONFIG, 0xC7);
    driver.set_filter_bandwidth(FilterBandwidth::Hz5).unwrap();
    assert_eq!(interface.get_register(CONFIG), 0xF7);
}

/// Raw settings coming from outside the driver, e.g. a stored profile
fn apply_raw_ranges(
    driver: &mut crate::common::test_utils::MockDriver,
    gyro: u8,
    accel: u8,
) -> Result<(), Error<MockError>> {
    driver.set_gyro_range(GyroRange::from_bits(gyro)?)?;
    driver.set_accel_range(AccelRange::from_bits(accel)?)?;
    Ok(())
}

#[test]
fn test_raw_values_propagate_invalid_config() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());

    assert_eq!(apply_raw_ranges(&mut driver, 2, 5), Err(Error::InvalidConfig));
    // The gyro range was valid and applied; the accel write never happened
    assert_eq!(driver.config().gyro_range, GyroRange::Dps1000);
    assert_eq!(interface.writes_to(ACCEL_CONFIG), Vec::<u8>::new());

    assert_eq!(apply_raw_ranges(&mut driver, 9, 0), Err(Error::InvalidConfig));
    assert_eq!(driver.config().gyro_range, GyroRange::Dps1000);

    // Validation errors leave the driver usable
    assert_eq!(apply_raw_ranges(&mut driver, 3, 3), Ok(()));
    assert_eq!(driver.config().accel_range, AccelRange::G16);
}

#[test]
fn test_from_bits_matches_try_from() {
    for value in 0..=u8::MAX {
        assert_eq!(
            FilterBandwidth::from_bits::<MockError>(value).ok(),
            FilterBandwidth::try_from(value).ok()
        );
        assert_eq!(
            ClockSource::from_bits::<MockError>(value).ok(),
            ClockSource::try_from(value).ok()
        );
        assert_eq!(
            CycleRate::from_bits::<MockError>(value).ok(),
            CycleRate::try_from(value).ok()
        );
    }
}
