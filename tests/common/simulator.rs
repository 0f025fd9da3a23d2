// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Component C8: replays a recorded VE.Direct dump onto a serial endpoint at
//! approximately device cadence. Ported from the Python `Vedirectsim`
//! reference (`vedirect_m8/vedirectsim.py`): reads a `<device>.dump` file of
//! `key\tvalue` lines, groups them into frames on a `Checksum` line, and
//! writes each frame with a freshly computed checksum byte — this is a test
//! collaborator only, never part of the core.

use std::{thread, time::Duration};

use super::mock_transport::PipeWriter;

const HEADER1: u8 = 0x0D;
const HEADER2: u8 = 0x0A;
const TAB: u8 = 0x09;

/// Parses dump-file contents into frames: one `Vec<(key, value)>` per frame,
/// fields in file order, the terminating `Checksum\t<anything>` line
/// consumed as a frame separator (its value is discarded — the real
/// checksum byte is computed fresh on send, per `Vedirectsim.convert`).
pub fn parse_dump(contents: &str) -> Vec<Vec<(String, String)>> {
    let mut frames = Vec::new();
    let mut current: Vec<(String, String)> = Vec::new();
    for raw_line in contents.lines() {
        let line = raw_line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, '\t');
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key == "Checksum" {
            if !current.is_empty() {
                frames.push(std::mem::take(&mut current));
            }
        } else {
            current.push((key.to_string(), value.to_string()));
        }
    }
    if !current.is_empty() {
        frames.push(current);
    }
    frames
}

fn encode_frame(fields: &[(String, String)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (key, value) in fields {
        out.push(HEADER1);
        out.push(HEADER2);
        out.extend_from_slice(key.as_bytes());
        out.push(TAB);
        out.extend_from_slice(value.as_bytes());
    }
    out.push(HEADER1);
    out.push(HEADER2);
    out.extend_from_slice(b"Checksum");
    out.push(TAB);
    let sum: u32 = out.iter().map(|&b| b as u32).sum();
    out.push(((256 - (sum % 256)) % 256) as u8);
    out
}

/// Replays a parsed dump onto a [`PipeWriter`].
pub struct Simulator {
    writer: PipeWriter,
    frames: Vec<Vec<(String, String)>>,
}

impl Simulator {
    pub fn from_dump(writer: PipeWriter, dump_contents: &str) -> Self {
        Self { writer, frames: parse_dump(dump_contents) }
    }

    /// Writes every frame in the dump once. The sleep between frames is a
    /// throttle, not a protocol requirement — see design notes on simulator
    /// timing; callers should only depend on eventual delivery, not on this
    /// exact cadence.
    pub fn run_once(&self) {
        for fields in &self.frames {
            let bytes = encode_frame(fields);
            if self.writer.write_all(&bytes).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(15));
        }
    }

    /// Spawns a background thread replaying the dump `cycles` times.
    pub fn spawn(self, cycles: u32) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            for _ in 0..cycles {
                self.run_once();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_frames_from_a_dump() {
        let dump = "PID\t0x204\nV\t12800\nChecksum\t0\nH1\t55000\nChecksum\t0\n";
        let frames = parse_dump(dump);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], vec![("PID".to_string(), "0x204".to_string()), ("V".to_string(), "12800".to_string())]);
        assert_eq!(frames[1], vec![("H1".to_string(), "55000".to_string())]);
    }

    #[test]
    fn encoded_frame_checksums_to_zero() {
        let fields = vec![("PID".to_string(), "0x204".to_string())];
        let bytes = encode_frame(&fields);
        let sum: u32 = bytes.iter().map(|&b| b as u32).sum();
        assert_eq!(sum % 256, 0);
    }
}
