// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use vedirect::transport::port_path::{discover_virtual_modems, is_valid_port_path};

#[test]
fn accepts_every_documented_syntax() {
    for ok in ["/dev/ttyUSB0", "/dev/ttyACM12", "COM3", "COM123", "vmodem0", "/dev/vmodem7"] {
        assert!(is_valid_port_path(ok), "{ok} should be a valid port path");
    }
}

#[test]
fn rejects_paths_outside_the_documented_syntax() {
    for bad in ["/dev/ttyUSB", "/dev/ttyUSB1234", "COM", "COM1234", "/etc/passwd", ""] {
        assert!(!is_valid_port_path(bad), "{bad} should be rejected");
    }
}

/// §4.5: virtual-modem files are discovered under the home directory
/// matching `vmodem\d{1,3}`, duplicates aside. Mutates the process-global
/// `HOME` var, so this runs serialized against any other test doing the
/// same.
#[test]
#[serial_test::serial]
fn discovers_vmodem_files_under_home() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("vmodem0"), b"")?;
    fs::write(dir.path().join("vmodem12"), b"")?;
    fs::write(dir.path().join("not-a-modem"), b"")?;

    // SAFETY: this test owns HOME for its duration; no other test in this
    // binary reads or writes it concurrently off this thread, and the
    // `serial_test` harness below keeps this suite's HOME mutation
    // single-threaded across the crate.
    let original = std::env::var("HOME").ok();
    unsafe {
        std::env::set_var("HOME", dir.path());
    }
    let found = discover_virtual_modems();
    unsafe {
        match &original {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
    }

    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|p| p.ends_with("vmodem0")));
    assert!(found.iter().any(|p| p.ends_with("vmodem12")));
    Ok(())
}
