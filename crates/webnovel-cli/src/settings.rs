use anyhow::Context;
use clap::Subcommand;
use serde_json::{Map, Value};
use webnovel_client::ClientContext;
use webnovel_lib::prelude::{AppSettings, SettingsPatch};

use crate::output::Output;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the settings, pulled from the server when logged in
    Show,
    /// Change one setting, e.g. `theme dark` or `reader.fontSize 18`
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
}

/// Builds a patch holding `key` (dotted camelCase path) set to `value`.
/// `value` is read as JSON first so `true` and `18` keep their types.
fn parse_patch(key: &str, value: &str) -> Result<SettingsPatch, anyhow::Error> {
    let mut value =
        serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()));
    if value.is_null() {
        anyhow::bail!("{key} cannot be null, use `settings reset` to restore defaults");
    }
    for part in key.rsplit('.') {
        let mut object = Map::new();
        object.insert(part.to_string(), value);
        value = Value::Object(object);
    }

    let patch: SettingsPatch =
        serde_json::from_value(value).with_context(|| format!("invalid value for {key}"))?;

    // unknown keys are dropped while deserializing
    let known = serde_json::to_value(&patch)?;
    if key.split('.').try_fold(&known, |v, part| v.get(part)).is_none() {
        anyhow::bail!("unknown setting {key}");
    }
    Ok(patch)
}

fn print_settings(settings: &AppSettings) {
    match serde_json::to_string_pretty(settings) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("{e}"),
    }
}

pub async fn run(
    ctx: &ClientContext,
    out: &Output,
    cmd: SettingsCommand,
) -> Result<(), anyhow::Error> {
    match cmd {
        SettingsCommand::Show => {
            let settings = ctx.settings.sync().await?;
            out.emit(&settings, print_settings)
        }
        SettingsCommand::Set { key, value } => {
            let patch = parse_patch(&key, &value)?;
            ctx.settings.update(&patch).await?;
            out.emit(&ctx.settings.store().get(), print_settings)
        }
        SettingsCommand::Reset => {
            ctx.settings.reset().await?;
            out.emit(&ctx.settings.store().get(), print_settings)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use webnovel_lib::prelude::{ReaderTheme, Theme};

    #[test]
    fn test_patch_top_level() {
        let patch = parse_patch("theme", "dark").unwrap();
        assert_eq!(patch.theme, Some(Theme::Dark));
        assert!(patch.reader.is_none());
    }

    #[test]
    fn test_patch_nested() {
        let patch = parse_patch("reader.fontSize", "18").unwrap();
        let reader = patch.reader.unwrap();
        assert_eq!(reader.font_size, Some(18));
        assert_eq!(reader.theme, None);

        let patch = parse_patch("reader.theme", "sepia").unwrap();
        assert_eq!(patch.reader.unwrap().theme, Some(ReaderTheme::Sepia));
    }

    #[test]
    fn test_patch_bool() {
        let patch = parse_patch("notifications", "false").unwrap();
        assert_eq!(patch.notifications, Some(false));
    }

    #[test]
    fn test_patch_unknown_key() {
        assert!(parse_patch("colour", "red").is_err());
        assert!(parse_patch("reader.size", "12").is_err());
        assert!(parse_patch("theme.dark", "true").is_err());
    }

    #[test]
    fn test_patch_null_value() {
        let err = parse_patch("theme", "null").unwrap_err();
        assert!(err.to_string().contains("cannot be null"));
        let err = parse_patch("reader.fontSize", "null").unwrap_err();
        assert!(err.to_string().contains("cannot be null"));
    }

    #[test]
    fn test_patch_bad_value() {
        assert!(parse_patch("theme", "neon").is_err());
        assert!(parse_patch("reader.fontSize", "large").is_err());
    }
}
