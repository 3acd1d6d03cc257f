use super::print_json;
use crate::context::Context;
use myco_cli::output::{format_distance, Status};
use myco_core::Error;
use myco_geo::{distance_meters, Coordinate};
use serde_json::json;

pub fn run(ctx: &Context, from: (f64, f64), to: (f64, f64)) -> anyhow::Result<()> {
    let from = Coordinate::try_new(from.0, from.1).map_err(|e| Error::validation(e.to_string()))?;
    let to = Coordinate::try_new(to.0, to.1).map_err(|e| Error::validation(e.to_string()))?;
    let meters = distance_meters(&from, &to);

    if ctx.json {
        return print_json(&json!({
            "from": from,
            "to": to,
            "distance_meters": meters,
        }));
    }

    Status::field("From", &from.display(6));
    Status::field("To", &to.display(6));
    Status::field("Distance", &format_distance(meters));
    Ok(())
}
