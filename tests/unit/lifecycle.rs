//! Reset, init and power state tests

use crate::common::mock_interface::{PWR_MGMT_1, SIGNAL_PATH_RESET};
use crate::common::{Operation, ResetBehavior, create_initialized_driver, create_mock_driver};
use mpu6xxx::device::{CONFIG_SETTLE_MS, PHASE_SETTLE_MS, RESET_POLL_LIMIT};
use mpu6xxx::{ChipVariant, CycleRate, DeviceState, Error, SensorConfig};

#[test]
fn test_new_driver_is_idle() {
    let (driver, interface, delay) = create_mock_driver();

    assert_eq!(driver.state(), DeviceState::Uninitialized);
    assert_eq!(driver.config(), &SensorConfig::POWER_ON);
    assert!(interface.operations().is_empty());
    assert_eq!(delay.elapsed_ms(), 0);
}

#[test]
fn test_init_reaches_active() {
    let (mut driver, interface, _delay) = create_mock_driver();

    assert_eq!(driver.init(), Ok(ChipVariant::Mpu6050));

    assert_eq!(driver.state(), DeviceState::Active);
    assert_eq!(driver.config(), &SensorConfig::default());
    // Awake with the gyro-X PLL selected
    assert_eq!(interface.get_register(PWR_MGMT_1), 0x01);
}

#[test]
fn test_init_total_delay() {
    let (mut driver, interface, delay) = create_mock_driver();
    interface.set_reset_behavior(ResetBehavior::AutoClear { polls: 0 });

    driver.init().unwrap();

    // 1 ms poll, three phase settles, five settings, wake
    let expected = 1 + 3 * u64::from(PHASE_SETTLE_MS) + 6 * u64::from(CONFIG_SETTLE_MS);
    assert_eq!(expected, 361);
    assert_eq!(delay.elapsed_ms(), expected);
}

#[test]
fn test_init_order() {
    let (mut driver, interface, _delay) = create_mock_driver();
    driver.init().unwrap();

    let operations = interface.operations();
    let position = |wanted: &Operation| operations.iter().position(|op| op == wanted).unwrap();

    let identity = position(&Operation::Read {
        address: 0x75,
        len: 1,
    });
    let reset = position(&Operation::Write {
        address: PWR_MGMT_1,
        value: 0xC0,
    });
    let path_reset = position(&Operation::Write {
        address: SIGNAL_PATH_RESET,
        value: 0x07,
    });
    assert!(identity < reset);
    assert!(reset < path_reset);

    // Waking is the final write
    assert_eq!(
        operations.last(),
        Some(&Operation::Write {
            address: PWR_MGMT_1,
            value: 0x01
        })
    );
}

#[test]
fn test_reset_polls_until_clear() {
    let (mut driver, interface, delay) = create_mock_driver();
    interface.set_reset_behavior(ResetBehavior::AutoClear { polls: 5 });

    driver.reset().unwrap();

    assert_eq!(driver.state(), DeviceState::Configuring);
    // Six polls at 1 ms, then the phase settle
    assert_eq!(delay.elapsed_ms(), 6 + u64::from(PHASE_SETTLE_MS));
    let polls = interface
        .operations()
        .iter()
        .filter(|op| {
            **op == Operation::Read {
                address: PWR_MGMT_1,
                len: 1,
            }
        })
        .count();
    // One read for the read-modify-write, then the polls
    assert_eq!(polls, 1 + 6);
}

#[test]
fn test_stuck_reset_times_out() {
    let (mut driver, interface, delay) = create_mock_driver();
    interface.set_reset_behavior(ResetBehavior::Stuck);

    assert_eq!(driver.init(), Err(Error::InitializationTimeout));

    assert_eq!(driver.state(), DeviceState::Faulted);
    assert_eq!(delay.elapsed_ms(), u64::from(RESET_POLL_LIMIT));
}

#[test]
fn test_reset_restores_power_on_config() {
    let (mut driver, _interface, _delay) = create_initialized_driver(&SensorConfig::default());

    driver.reset().unwrap();

    assert_eq!(driver.config(), &SensorConfig::POWER_ON);
    assert_eq!(driver.state(), DeviceState::Configuring);
}

#[test]
fn test_reinit_after_reset() {
    let (mut driver, _interface, _delay) = create_initialized_driver(&SensorConfig::default());
    driver.reset().unwrap();

    driver.init().unwrap();

    assert_eq!(driver.state(), DeviceState::Active);
}

#[test]
fn test_sleep_and_wake() {
    let (mut driver, interface, delay) = create_initialized_driver(&SensorConfig::default());

    driver.set_sleep(true).unwrap();
    assert_eq!(driver.state(), DeviceState::Sleeping);
    assert_eq!(interface.get_register(PWR_MGMT_1) & 0x40, 0x40);

    interface.clear_operations();
    let before = delay.elapsed_ms();
    driver.set_sleep(false).unwrap();

    assert_eq!(driver.state(), DeviceState::Active);
    assert_eq!(interface.get_register(PWR_MGMT_1) & 0x40, 0);
    // Waking does not repeat the reset
    assert!(interface.writes_to(PWR_MGMT_1).iter().all(|value| value & 0x80 == 0));
    assert_eq!(interface.writes_to(SIGNAL_PATH_RESET), Vec::<u8>::new());
    assert_eq!(delay.elapsed_ms() - before, u64::from(CONFIG_SETTLE_MS));
}

#[test]
fn test_reads_allowed_while_sleeping() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.set_temperature_data(0);
    driver.set_sleep(true).unwrap();

    assert!(driver.read_temperature().is_ok());
    assert_eq!(driver.state(), DeviceState::Sleeping);
}

#[test]
fn test_cycle_mode() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    driver.set_cycle_rate(CycleRate::Hz5).unwrap();

    driver.set_cycle(true).unwrap();
    let pwr = interface.get_register(PWR_MGMT_1);
    assert_eq!(pwr & 0x60, 0x20);
    assert_eq!(driver.state(), DeviceState::Active);

    driver.set_cycle(false).unwrap();
    let pwr = interface.get_register(PWR_MGMT_1);
    assert_eq!(pwr & 0x60, 0x40);
    assert_eq!(driver.state(), DeviceState::Sleeping);
}

#[test]
fn test_release_returns_parts() {
    let (mut driver, interface, _delay) = create_mock_driver();
    driver.init().unwrap();

    let (released, delay) = driver.release();

    assert_eq!(released.get_register(PWR_MGMT_1), interface.get_register(PWR_MGMT_1));
    assert!(delay.elapsed_ms() > 0);
}

#[test]
fn test_reset_identifies_chip_first() {
    let (mut driver, interface, _delay) = create_mock_driver();
    interface.set_who_am_i(0x70);

    driver.reset().unwrap();

    assert_eq!(driver.variant(), Some(ChipVariant::Mpu6500));
    assert_eq!(
        interface.operations().first(),
        Some(&Operation::Read {
            address: 0x75,
            len: 1
        })
    );
}

#[test]
fn test_reset_refuses_unknown_chip() {
    let (mut driver, interface, delay) = create_mock_driver();
    interface.set_who_am_i(0xFF);

    assert_eq!(driver.reset(), Err(Error::UnsupportedDevice(0xFF)));

    assert_eq!(driver.state(), DeviceState::Uninitialized);
    assert_eq!(interface.writes_to(PWR_MGMT_1), Vec::<u8>::new());
    assert_eq!(delay.elapsed_ms(), 0);
}

#[test]
fn test_reset_after_init_skips_identification() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());

    driver.reset().unwrap();

    assert!(
        !interface
            .operations()
            .contains(&Operation::Read {
                address: 0x75,
                len: 1
            })
    );
}
