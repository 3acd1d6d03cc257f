use super::{current_fix, print_json};
use crate::context::Context;
use crate::PositionArgs;
use myco_geo::{share_message, share_url};
use serde_json::json;

pub async fn run(ctx: &Context, position: &PositionArgs) -> anyhow::Result<()> {
    let coordinate = current_fix(ctx, position).await?.coordinate();
    let message = share_message(&coordinate);

    if ctx.json {
        return print_json(&json!({
            "message": message,
            "url": share_url(&coordinate),
        }));
    }

    println!("{message}");
    Ok(())
}
