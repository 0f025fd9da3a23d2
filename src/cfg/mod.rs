//! This module handles configuration, command-line parsing, and logging.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Packet aggregator and reconnect-controller policy.
pub mod aggregator_config;
/// Command-line interface parsing.
pub mod cli;
/// Logger initialization.
pub mod logger;
/// Packet-reader and callback-loop budgets.
pub mod reader_options;
/// Serial-line configuration.
pub mod serial_config;
/// Top-level layered configuration document.
pub mod vedirect_config;
