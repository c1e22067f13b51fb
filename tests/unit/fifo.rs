//! FIFO configuration and drain tests

use crate::common::mock_interface::{FIFO_COUNT, FIFO_EN, FIFO_R_W, USER_CTRL};
use crate::common::{Operation, create_initialized_driver};
use mpu6xxx::{FIFO_SIZE, FifoConfig, SensorConfig};

#[test]
fn test_drain_reads_exactly_count_in_one_transaction() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    let frame: Vec<u8> = (1..=12).collect();
    interface.push_fifo(&frame);

    let mut buffer = [0u8; FIFO_SIZE];
    let bytes = driver.drain_fifo(&mut buffer).unwrap();

    assert_eq!(bytes, frame.as_slice());
    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: FIFO_COUNT,
                len: 2
            },
            Operation::Read {
                address: FIFO_R_W,
                len: 12
            },
        ]
    );
    assert_eq!(interface.fifo_len(), 0);
}

#[test]
fn test_empty_fifo_skips_data_read() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());

    let mut buffer = [0u8; 64];
    let bytes = driver.drain_fifo(&mut buffer).unwrap();

    assert!(bytes.is_empty());
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: FIFO_COUNT,
            len: 2
        }]
    );
}

#[test]
fn test_small_buffer_leaves_remainder() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.push_fifo(&[0xAA; 30]);

    let mut buffer = [0u8; 24];
    assert_eq!(driver.drain_fifo(&mut buffer).unwrap().len(), 24);
    assert_eq!(interface.fifo_len(), 6);

    assert_eq!(driver.drain_fifo(&mut buffer).unwrap(), &[0xAA_u8; 6]);
}

#[test]
fn test_bytes_arriving_after_count_stay_queued() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.push_fifo(&[1; 12]);
    interface.append_fifo_after_count(&[2; 12]);

    let mut buffer = [0u8; FIFO_SIZE];
    assert_eq!(driver.drain_fifo(&mut buffer).unwrap(), &[1u8; 12]);
    assert_eq!(interface.fifo_len(), 12);

    assert_eq!(driver.drain_fifo(&mut buffer).unwrap(), &[2u8; 12]);
    assert_eq!(interface.fifo_len(), 0);
}

#[test]
fn test_read_fifo_count() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.push_fifo(&[0; 300]);

    assert_eq!(driver.read_fifo_count().unwrap(), 300);
}

#[test]
fn test_configure_fifo_preserves_slave_bits() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.set_register(FIFO_EN, 0x87);

    driver.configure_fifo(&FifoConfig::accel_gyro()).unwrap();

    assert_eq!(interface.get_register(FIFO_EN), 0x7F);
    assert_eq!(interface.get_register(USER_CTRL) & 0x40, 0x40);
}

#[test]
fn test_disabling_all_sources_disables_fifo() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    driver.configure_fifo(&FifoConfig::accel_gyro()).unwrap();

    driver.configure_fifo(&FifoConfig::default()).unwrap();

    assert_eq!(interface.get_register(FIFO_EN), 0x00);
    assert_eq!(interface.get_register(USER_CTRL) & 0x40, 0);
}

#[test]
fn test_reset_fifo_discards_contents() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    interface.push_fifo(&[0x55; 48]);

    driver.reset_fifo().unwrap();

    assert_eq!(interface.fifo_len(), 0);
    assert_eq!(driver.read_fifo_count().unwrap(), 0);
}

#[test]
fn test_drained_frames_split_evenly() {
    let (mut driver, interface, _delay) = create_initialized_driver(&SensorConfig::default());
    let config = FifoConfig {
        enable_temp: true,
        ..FifoConfig::accel_gyro()
    };
    driver.configure_fifo(&config).unwrap();
    interface.push_fifo(&[0; 42]);

    let mut buffer = [0u8; FIFO_SIZE];
    let bytes = driver.drain_fifo(&mut buffer).unwrap();

    assert_eq!(config.frame_size(), 14);
    assert_eq!(bytes.chunks_exact(config.frame_size()).count(), 3);
}
