// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use vedirect::Packet;
use vedirect::identity::{IdentitySpec, SubTest};

fn packet(fields: &[(&str, &str)]) -> Packet {
    fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn columns_test_requires_every_listed_key() {
    let spec = IdentitySpec {
        sub_tests: vec![SubTest::ColumnsTest {
            name: "registers".into(),
            keys: vec!["PID".into(), "V".into(), "SOC".into()],
        }],
    };
    assert!(spec.validate().is_ok());
    assert!(spec.matches(&packet(&[("PID", "0x203"), ("V", "12800"), ("SOC", "876")])));
    assert!(!spec.matches(&packet(&[("PID", "0x203"), ("V", "12800")])));
}

#[test]
fn missing_key_fails_without_erroring() {
    let spec = IdentitySpec {
        sub_tests: vec![SubTest::ValueTest {
            name: "pid".into(),
            key: "PID".into(),
            expected_value: "0x203".into(),
        }],
    };
    // §4.4: "missing keys cause failure, not error" — `matches` just
    // returns false, it never surfaces a `VeError`.
    assert!(!spec.matches(&packet(&[("V", "12800")])));
}

#[test]
fn multiple_subtests_combine_by_and() {
    let spec = IdentitySpec {
        sub_tests: vec![
            SubTest::ValueTest { name: "pid".into(), key: "PID".into(), expected_value: "0xA042".into() },
            SubTest::ColumnsTest { name: "cols".into(), keys: vec!["VPV".into(), "PPV".into()] },
        ],
    };
    let good = packet(&[("PID", "0xA042"), ("VPV", "36200"), ("PPV", "55")]);
    let wrong_pid = packet(&[("PID", "0x203"), ("VPV", "36200"), ("PPV", "55")]);
    let missing_column = packet(&[("PID", "0xA042"), ("VPV", "36200")]);
    assert!(spec.matches(&good));
    assert!(!spec.matches(&wrong_pid));
    assert!(!spec.matches(&missing_column));
}

#[test]
fn empty_columns_test_is_not_well_formed() {
    let spec = IdentitySpec { sub_tests: vec![SubTest::ColumnsTest { name: "cols".into(), keys: vec![] }] };
    assert!(spec.validate().is_err());
}

#[test]
fn value_test_name_must_match_key_pattern() {
    let spec = IdentitySpec {
        sub_tests: vec![SubTest::ValueTest {
            name: "not a valid name".into(),
            key: "PID".into(),
            expected_value: "0x203".into(),
        }],
    };
    assert!(spec.validate().is_err());
}

#[test]
fn unrecognized_variant_tag_fails_to_deserialize() {
    let json = r#"{"kind":"RangeTest","name":"x","key":"V","min":0,"max":100}"#;
    let parsed: Result<SubTest, _> = serde_json::from_str(json);
    assert!(parsed.is_err());
}
