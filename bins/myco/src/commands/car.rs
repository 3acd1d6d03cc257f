use super::{current_fix, print_json};
use crate::context::Context;
use crate::PositionArgs;
use chrono::Utc;
use myco_cli::output::{format_distance, Status};
use myco_core::Error;
use myco_location::{CarLocation, CarNavigation};
use serde_json::json;

fn no_car() -> Error {
    Error::validation("No car location saved")
        .with_suggestion("Run 'myco car save' next to the car first")
}

pub async fn save(ctx: &Context, position: &PositionArgs) -> anyhow::Result<()> {
    let coordinate = current_fix(ctx, position).await?.coordinate();
    let car = CarLocation::new(coordinate, Utc::now());
    if !ctx.cache().store_car_location(&car) {
        return Err(Error::storage_unavailable("Car location could not be saved")
            .with_context(ctx.config.schema.storage.resolved_path().display().to_string())
            .into());
    }

    if ctx.json {
        return print_json(&serde_json::to_value(&car)?);
    }

    Status::success(&format!("Car saved at {}", coordinate.display(6)));
    Ok(())
}

pub fn show(ctx: &Context) -> anyhow::Result<()> {
    let car = ctx.cache().load_car_location().ok_or_else(no_car)?;

    if ctx.json {
        return print_json(&serde_json::to_value(&car)?);
    }

    Status::header("Car location");
    Status::field("Coordinates", &car.coordinate.display(6));
    Status::field("Saved", &car.saved_at_iso());
    Ok(())
}

pub fn delete(ctx: &Context) -> anyhow::Result<()> {
    let cache = ctx.cache();
    let existed = cache.load_car_location().is_some();
    cache.delete_car_location();

    if ctx.json {
        return print_json(&json!({ "deleted": existed }));
    }

    if existed {
        Status::success("Car location forgotten");
    } else {
        Status::warning("No car location was saved");
    }
    Ok(())
}

pub async fn navigate(ctx: &Context, position: &PositionArgs) -> anyhow::Result<()> {
    let car = ctx.cache().load_car_location().ok_or_else(no_car)?;
    let current = current_fix(ctx, position).await?.coordinate();
    let navigation = CarNavigation::new(&current, car);

    if ctx.json {
        return print_json(&serde_json::to_value(&navigation)?);
    }

    Status::header("Back to the car");
    Status::field("Distance", &format_distance(navigation.distance_meters));
    Status::field("Coordinates", &navigation.car.coordinate.display(6));
    Status::field("Map", &navigation.maps_url);
    Ok(())
}
