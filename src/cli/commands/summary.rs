//! Summary Command
//!
//! Generates summaries for one or more venues concurrently. Ctrl-C cancels
//! every summary still running.

use std::path::Path;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::assistant::summary_request;
use crate::cli::ui::Output;
use crate::cli::{CommandContext, load_catalog};
use crate::types::{AssistError, Result};

pub async fn run(ctx: CommandContext, catalog_path: &Path, venue_ids: &[String]) -> Result<()> {
    let output = Output::new();
    let catalog = load_catalog(catalog_path)?;

    let venues = venue_ids
        .iter()
        .map(|id| {
            catalog
                .get(id)
                .ok_or_else(|| AssistError::Catalog(format!("unknown venue id: {}", id)))
        })
        .collect::<Result<Vec<_>>>()?;
    let requests = venues
        .iter()
        .map(|venue| summary_request(venue))
        .collect::<Result<Vec<_>>>()?;

    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let client = ctx.summary_client();
    let results = join_all(
        requests
            .iter()
            .map(|request| client.generate_cancellable(request, &ctx.policy, &token)),
    )
    .await;
    watcher.abort();

    for (venue, result) in venues.iter().zip(results) {
        output.header(&venue.name);
        match result {
            Some(result) if result.succeeded() => println!("{}", result.text),
            Some(result) => output.warning(&result.text),
            None => output.warning("Cancelled"),
        }
    }

    Ok(())
}
