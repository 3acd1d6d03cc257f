//! Subcommand implementations

pub mod car;
pub mod distance;
pub mod locate;
pub mod prefs;
pub mod share;

use crate::context::Context;
use crate::PositionArgs;
use myco_cli::progress::{finish_error, finish_success, spinner};
use myco_core::Error;
use myco_location::{Fix, FixSource};

/// Resolve the current fix, with a spinner in text mode
pub(crate) async fn current_fix(ctx: &Context, position: &PositionArgs) -> anyhow::Result<Fix> {
    let provider = ctx.provider(position)?;
    let options = ctx.acquire_options(position);

    let pb = (!ctx.json).then(|| spinner("Locating..."));
    let result = provider.acquire(options).await;

    match result {
        Ok(fix) => {
            if let Some(pb) = &pb {
                let origin = match fix.source {
                    FixSource::Cache => "cached fix",
                    FixSource::Platform => "fresh fix",
                };
                finish_success(pb, &format!("Located ({origin})"));
            }
            Ok(fix)
        }
        Err(e) => {
            if let Some(pb) = &pb {
                finish_error(pb, &e.to_string());
            }
            Err(Error::from(e).into())
        }
    }
}

pub(crate) fn source_label(source: FixSource) -> &'static str {
    match source {
        FixSource::Cache => "cache",
        FixSource::Platform => "platform",
    }
}

pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
