// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Serial port path syntax validation and virtual-modem discovery.
//!
//! Hand-rolled against the small fixed-shape patterns below rather than
//! pulling in a regex dependency for four one-line checks.

/// `n` is a 1-3 digit integer suffix; returns it parsed, or `None`.
fn digit_suffix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(prefix)?;
    if rest.is_empty() || rest.len() > 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(rest)
}

/// `COMn`, `n` 1-3 digits (Windows).
pub fn is_windows_port(data: &str) -> bool {
    digit_suffix(data, "COM").is_some()
}

/// `/dev/ttyUSBn` or `/dev/ttyACMn` (POSIX).
pub fn is_unix_port(data: &str) -> bool {
    digit_suffix(data, "/dev/ttyUSB").is_some() || digit_suffix(data, "/dev/ttyACM").is_some()
}

/// `vmodemN`, used for virtual/simulated ports, with or without a
/// `/dev/` or home-directory prefix.
pub fn is_virtual_modem_port(data: &str) -> bool {
    digit_suffix(data, "vmodem").is_some()
        || digit_suffix(data, "/dev/vmodem").is_some()
        || digit_suffix(data, "~/vmodem").is_some()
}

/// True if `data` matches any recognized port-path syntax for the current
/// platform family plus the always-allowed virtual-modem form.
pub fn is_valid_port_path(data: &str) -> bool {
    is_unix_port(data) || is_windows_port(data) || is_virtual_modem_port(data)
}

/// Scans `$HOME` for `vmodemN` entries (used by simulators / loopback test
/// rigs), returning absolute paths, sorted for deterministic enumeration.
pub fn discover_virtual_modems() -> Vec<String> {
    let Ok(home) = std::env::var("HOME") else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(&home) else {
        return Vec::new();
    };
    let mut found: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| digit_suffix(name, "vmodem").is_some())
        .map(|name| format!("{home}/{name}"))
        .collect();
    found.sort();
    found
}
