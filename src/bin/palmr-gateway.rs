// ABOUTME: Gateway server binary: loads configuration, opens the vault and store, and serves HTTP
// ABOUTME: Exits non-zero when configuration or vault settings are invalid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Palmr Gateway Server Binary

use anyhow::Result;
use clap::Parser;
use palmr_gateway::{
    config::environment::ServerConfig, logging, resources::ServerResources, server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "palmr-gateway")]
#[command(about = "Palmr registration gateway - local signup mirrored to the Palmr API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the upstream base URL
    #[arg(long)]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(upstream_url) = args.upstream_url {
        config.upstream.base_url = upstream_url.trim_end_matches('/').to_owned();
        config.validate()?;
    }

    info!("{}", config.summary());

    let resources = match ServerResources::from_config(config).await {
        Ok(resources) => Arc::new(resources),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to initialize gateway");
            return Err(e);
        }
    };

    server::run(resources).await
}
