//! myco: location, car finder and preferences from the terminal
//!
//! Desktop hosts have no positioning service, so a fix is supplied with
//! `--lat/--lon`. Without them the last cached fix is used while fresh.

use clap::{Args, Parser, Subcommand};
use myco_core::config::AccuracyHint;
use myco_core::error::exit_codes;
use myco_core::preferences::Language;
use myco_core::{Error, ErrorCode};
use myco_cli::output::Status;
use std::process::ExitCode;

mod commands;
mod context;

use context::Context;

/// Mushroom foraging companion
#[derive(Parser)]
#[command(name = "myco")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./.myco.toml when present)
    #[arg(short, long, global = true, env = "MYCO_CONFIG")]
    config: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// A device fix given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct PositionArgs {
    /// Latitude of the current fix
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the current fix
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Accuracy radius of the fix in meters
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Ignore the cached fix
    #[arg(short, long)]
    pub force: bool,

    /// Ask for high accuracy instead of the configured default
    #[arg(long)]
    pub high: bool,
}

impl PositionArgs {
    /// Accuracy hint, falling back to the configured one
    pub fn accuracy_hint(&self, default: AccuracyHint) -> AccuracyHint {
        if self.high { AccuracyHint::High } else { default }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Current location (cached fix while fresh)
    Locate {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Save, show, delete or navigate to the car location
    Car {
        #[command(subcommand)]
        action: CarAction,
    },

    /// Print the SOS message with the current position
    Share {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Show or change preferences
    Prefs {
        /// Interface language (fr, en)
        #[arg(short, long)]
        language: Option<Language>,

        /// Name used when sharing spots
        #[arg(short, long)]
        username: Option<String>,
    },
}

#[derive(Subcommand)]
enum CarAction {
    /// Save the current location as the car position
    Save {
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Show the saved car position
    Show,
    /// Forget the saved car position
    Delete,
    /// Distance and map link from here to the car
    Navigate {
        #[command(flatten)]
        position: PositionArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::init(cli.config.as_deref(), cli.json, cli.verbose) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e, cli.json),
    };

    let result = match cli.command {
        Commands::Distance { lat1, lon1, lat2, lon2 } => {
            commands::distance::run(&ctx, (lat1, lon1), (lat2, lon2))
        }
        Commands::Locate { position } => commands::locate::run(&ctx, &position).await,
        Commands::Car { action } => match action {
            CarAction::Save { position } => commands::car::save(&ctx, &position).await,
            CarAction::Show => commands::car::show(&ctx),
            CarAction::Delete => commands::car::delete(&ctx),
            CarAction::Navigate { position } => commands::car::navigate(&ctx, &position).await,
        },
        Commands::Share { position } => commands::share::run(&ctx, &position).await,
        Commands::Prefs { language, username } => {
            commands::prefs::run(&ctx, language, username.as_deref())
        }
    };

    if cli.verbose {
        tracing::debug!(metrics = %myco_telemetry::metrics().export_json(), "Session metrics");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, cli.json),
    }
}

fn report(err: &anyhow::Error, json: bool) -> ExitCode {
    let Some(core) = err.downcast_ref::<Error>() else {
        if json {
            println!("{}", serde_json::json!({ "message": format!("{err:#}") }));
        } else {
            Status::error(&format!("{err:#}"));
        }
        return ExitCode::from(exit_codes::FAILURE as u8);
    };

    if json {
        match serde_json::to_string_pretty(&core.to_report()) {
            Ok(report) => println!("{report}"),
            Err(_) => Status::error(&core.message),
        }
    } else {
        Status::error(&format!("[{}] {}", core.code, core.message));
        if let Some(context) = &core.context {
            eprintln!("  {context}");
        }
        if let Some(suggestion) = &core.suggestion {
            Status::info(suggestion);
        }
    }

    let code = match core.code {
        ErrorCode::LocationTimeout => exit_codes::TIMEOUT,
        ErrorCode::LocationPermissionDenied
        | ErrorCode::LocationUnavailable
        | ErrorCode::LocationError => exit_codes::NO_LOCATION,
        c if c.category() == "Configuration" => exit_codes::CONFIG_ERROR,
        ErrorCode::ValidationError => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    };
    ExitCode::from(code as u8)
}
