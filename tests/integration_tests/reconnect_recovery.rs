// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Port discovery & reconnect controller (C5): given a dead transport and
//! two candidate ports — one replaying the wrong device, one replaying the
//! right one — `wait_or_search` must rebind to the port whose decoded data
//! passes the configured identity spec, and must time out if none do.

use vedirect::cfg::aggregator_config::ReconnectConfig;
use vedirect::cfg::reader_options::ReadBudgets;
use vedirect::cfg::serial_config::{BaudRate, SerialConfig};
use vedirect::discovery::ReconnectController;
use vedirect::identity::{IdentitySpec, SubTest};
use vedirect::reader::Reader;

use crate::common::mock_transport::{NamedTransport, pipe};
use crate::common::simulator::Simulator;

const BMV702_DUMP: &str = include_str!("../fixtures/bmv702.dump");
const BLUESOLAR_DUMP: &str = include_str!("../fixtures/bluesolar.dump");

fn bmv702_spec() -> IdentitySpec {
    IdentitySpec {
        sub_tests: vec![SubTest::ValueTest {
            name: "pid".into(),
            key: "PID".into(),
            expected_value: "0x203".into(),
        }],
    }
}

fn open_candidate(port: &str) -> vedirect::Result<NamedTransport> {
    let (writer, transport) = pipe();
    let dump = if port == "/dev/ttyUSB1" { BMV702_DUMP } else { BLUESOLAR_DUMP };
    Simulator::from_dump(writer, dump).spawn(4);
    Ok(NamedTransport::new(port, transport, vec!["/dev/ttyUSB0".into(), "/dev/ttyUSB1".into()]))
}

#[test]
fn rebinds_to_the_first_port_whose_identity_matches() -> anyhow::Result<()> {
    let dead = NamedTransport::new(
        "dead",
        pipe().1,
        vec!["/dev/ttyUSB0".into(), "/dev/ttyUSB1".into()],
    );
    let budgets = ReadBudgets::default();
    let mut reader = Reader::new(dead, BaudRate::B19200, &budgets)?;

    let config = ReconnectConfig {
        reconnect_timeout_secs: 3.0,
        sleep_between_tries_secs: 0.0,
        identity: bmv702_spec(),
    };
    let controller = ReconnectController::new(config, SerialConfig::default(), open_candidate)?;

    let ok = controller.wait_or_search(&mut reader)?;
    assert!(ok);
    // Invariant 7: the rebound transport's port is one of the most recent
    // enumeration's candidates, and specifically the one that validated.
    assert_eq!(reader.transport().source_name(), "/dev/ttyUSB1");
    Ok(())
}

#[test]
fn times_out_when_no_candidate_validates() -> anyhow::Result<()> {
    let dead = NamedTransport::new("dead", pipe().1, vec!["/dev/ttyUSB0".into()]);
    let budgets = ReadBudgets::default();
    let mut reader = Reader::new(dead, BaudRate::B19200, &budgets)?;

    // Neither candidate will ever match a PID that doesn't exist on the bus.
    let config = ReconnectConfig {
        reconnect_timeout_secs: 0.2,
        sleep_between_tries_secs: 0.0,
        identity: IdentitySpec {
            sub_tests: vec![SubTest::ValueTest {
                name: "pid".into(),
                key: "PID".into(),
                expected_value: "0xFFFF".into(),
            }],
        },
    };
    let controller = ReconnectController::new(config, SerialConfig::default(), |port: &str| {
        let (writer, transport) = pipe();
        Simulator::from_dump(writer, BMV702_DUMP).spawn(2);
        Ok(NamedTransport::new(port, transport, vec!["/dev/ttyUSB0".into()]))
    })?;

    let err = controller.wait_or_search(&mut reader).expect_err("no candidate should validate");
    assert!(matches!(err, vedirect::VeError::ReadTimeout { .. }));
    Ok(())
}
