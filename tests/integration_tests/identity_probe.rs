// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! S5 — identity probe: a simulator replays a real device trace onto a
//! transport; the reader plus C4 (`read_to_test`) must recognize it
//! against the right spec and reject it against a spec for another device.

use vedirect::cfg::reader_options::ReadBudgets;
use vedirect::cfg::serial_config::BaudRate;
use vedirect::identity::{IdentitySpec, SubTest, read_to_test};
use vedirect::reader::Reader;

use crate::common::mock_transport::pipe;
use crate::common::simulator::Simulator;

const BMV702_DUMP: &str = include_str!("../fixtures/bmv702.dump");

fn bmv702_reader() -> anyhow::Result<Reader<crate::common::mock_transport::PipeTransport>> {
    let (writer, transport) = pipe();
    Simulator::from_dump(writer, BMV702_DUMP).spawn(4);
    let budgets = ReadBudgets { timeout_secs: 3.0, ..Default::default() };
    Ok(Reader::new(transport, BaudRate::B19200, &budgets)?)
}

#[test]
fn accepts_the_matching_device() -> anyhow::Result<()> {
    let mut reader = bmv702_reader()?;
    let spec = IdentitySpec {
        sub_tests: vec![
            SubTest::ValueTest { name: "pid".into(), key: "PID".into(), expected_value: "0x203".into() },
            SubTest::ColumnsTest { name: "cols".into(), keys: vec!["V".into(), "SOC".into()] },
        ],
    };
    let merged = read_to_test(&mut reader)?;
    assert!(spec.matches(&merged), "merged packet {merged:?} should satisfy the bmv702 spec");
    Ok(())
}

#[test]
fn rejects_a_spec_for_a_different_device() -> anyhow::Result<()> {
    let mut reader = bmv702_reader()?;
    let spec = IdentitySpec {
        sub_tests: vec![SubTest::ValueTest {
            name: "pid".into(),
            key: "PID".into(),
            expected_value: "0x800".into(),
        }],
    };
    let merged = read_to_test(&mut reader)?;
    assert!(!spec.matches(&merged));
    Ok(())
}

#[test]
fn read_to_test_merges_fields_across_several_frames() -> anyhow::Result<()> {
    let mut reader = bmv702_reader()?;
    let merged = read_to_test(&mut reader)?;
    // bmv702.dump splits 25 fields across two frames (7 + 18); four probe
    // reads are enough to observe both at least once.
    assert!(merged.contains_key("PID"));
    assert!(merged.contains_key("H1") || merged.contains_key("V"));
    Ok(())
}
