// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use vedirect::cfg::serial_config::{BaudRate, SerialConfig, SerialTimeout};

#[test]
fn rejects_unsupported_baud_rate() {
    assert!(BaudRate::try_from(31250).is_err());
}

#[test]
fn default_baud_is_19200() {
    assert_eq!(BaudRate::default(), BaudRate::B19200);
    assert_eq!(BaudRate::default().as_u32(), 19200);
}

#[test]
fn non_blocking_timeout_is_a_zero_duration() {
    assert_eq!(SerialTimeout::NonBlocking.as_duration(), Some(Duration::ZERO));
}

#[test]
fn infinite_timeout_has_no_duration() {
    assert_eq!(SerialTimeout::Infinite.as_duration(), None);
}

#[test]
fn negative_read_timeout_is_rejected() {
    let cfg = SerialConfig { read_timeout: SerialTimeout::Seconds(-1.0), ..Default::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn higher_baud_rates_have_shorter_bit_times() {
    assert!(BaudRate::B115200.bit_time_secs() < BaudRate::B19200.bit_time_secs());
}
