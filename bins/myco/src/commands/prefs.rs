use super::print_json;
use crate::context::Context;
use myco_cli::output::Status;
use myco_core::preferences::Language;
use serde_json::json;

pub fn run(ctx: &Context, language: Option<Language>, username: Option<&str>) -> anyhow::Result<()> {
    let prefs = ctx.preferences();

    if let Some(language) = language {
        prefs.set_language(language);
    }
    if let Some(username) = username {
        prefs.set_username(username);
    }

    let language = prefs.language();
    let username = prefs.username();

    if ctx.json {
        return print_json(&json!({
            "language": language,
            "username": username,
        }));
    }

    Status::header("Preferences");
    Status::field("Language", language.code());
    Status::field("Username", &username);
    Ok(())
}
