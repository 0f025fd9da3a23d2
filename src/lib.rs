// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod aggregator;
pub mod callback;
pub mod cfg;
pub mod controller;
pub mod counters;
pub mod decoder;
pub mod discovery;
pub mod error;
pub mod identity;
pub mod reader;
pub mod stats;
pub mod transport;

pub use controller::VedirectController;
pub use decoder::Packet;
pub use error::{Result, VeError};
