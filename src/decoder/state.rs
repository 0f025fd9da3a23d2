// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Decoder state tags. Mirrors the original `(HEX, WAIT_HEADER, IN_KEY,
/// IN_VALUE, IN_CHECKSUM)` range, given real names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    WaitHeader,
    InKey,
    InValue,
    InChecksum,
    Hex,
}
