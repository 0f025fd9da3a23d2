// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use tracing::info;
use vedirect::cfg::cli::resolve_config_path;
use vedirect::cfg::vedirect_config::VedirectConfig;
use vedirect::cfg::logger::init_logger_from_config;
use vedirect::VedirectController;

fn main() -> Result<()> {
    let config_arg = std::env::args().nth(1).unwrap_or_else(|| "config/vedirect.yaml".to_string());
    let config_path = resolve_config_path(&config_arg).context("failed to resolve config path")?;

    let cfg = VedirectConfig::load_from_file(&config_path)
        .with_context(|| format!("failed to load config: {config_path:?}"))?;

    let _logger_guard = init_logger_from_config(cfg.logger.clone())?;

    let mut controller = VedirectController::new(
        cfg.serial.clone(),
        cfg.read_budgets,
        cfg.aggregator.clone(),
        cfg.reconnect.clone(),
    )
    .context("failed to start vedirect controller")?;

    info!(port = ?cfg.serial.port, "vedirect controller ready");

    loop {
        match controller.read_round(cfg.read_budgets.timeout_secs) {
            Ok((Some(snapshot), from_cache)) => {
                println!("round (cached={from_cache}): {snapshot:?}");
            }
            Ok((None, _)) => {
                info!("round produced no data");
            }
            Err(e) => {
                tracing::error!(error = %e, "round failed");
                return Err(e.into());
            }
        }
    }
}
