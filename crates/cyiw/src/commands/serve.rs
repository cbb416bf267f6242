//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use cyiw_core::Config;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use crate::server::{ProjectServer, ServerSettings};

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio; nothing to configure yet.
}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let settings = ServerSettings::from_config(&config, max_input_bytes);
    info!(language = %settings.language, "starting MCP server on stdio");

    let service = ProjectServer::new(settings)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
