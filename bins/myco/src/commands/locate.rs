use super::{current_fix, print_json, source_label};
use crate::context::Context;
use crate::PositionArgs;
use chrono::{TimeZone, Utc};
use myco_cli::output::{format_age, Status};
use myco_geo::maps_url;
use serde_json::json;
use std::time::Duration;

pub async fn run(ctx: &Context, position: &PositionArgs) -> anyhow::Result<()> {
    let fix = current_fix(ctx, position).await?;
    let coordinate = fix.coordinate();
    let age_ms = fix.location.age_millis(Utc::now().timestamp_millis()).max(0);

    if ctx.json {
        return print_json(&json!({
            "location": coordinate,
            "timestamp": fix.location.captured_at_millis,
            "source": source_label(fix.source),
            "maps_url": maps_url(&coordinate),
        }));
    }

    Status::header("Current location");
    Status::field("Coordinates", &coordinate.display(6));
    if let Some(accuracy) = coordinate.accuracy_display() {
        Status::field("Accuracy", &accuracy);
    }
    if let Some(captured) = Utc.timestamp_millis_opt(fix.location.captured_at_millis).single() {
        Status::field("Captured", &captured.to_rfc3339());
    }
    Status::field("Age", &format_age(Duration::from_millis(age_ms as u64)));
    Status::field("Source", source_label(fix.source));
    Status::field("Map", &maps_url(&coordinate));
    Ok(())
}
