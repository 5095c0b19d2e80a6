mod settings;
mod snapshot;
mod summary;

use crate::settings::AppSettings;
use crate::snapshot::Snapshot;
use anyhow::{Context, bail};
use log::{info, warn};
use srinfo_api::client::MihomoApi;
use srinfo_api::{NormalizeOptions, SchemaVersion, StarRailInfo};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct RunArgs {
    uid: Option<u64>,
    v1: bool,
    icons: bool,
    json: bool,
    save: Option<PathBuf>,
    merge: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    let args = match command {
        Command::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        Command::Version => {
            println!("srinfo {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Run(args) => args,
    };

    better_panic::install();

    let settings = AppSettings::load()?;
    init_logging(&settings.log_filter);

    run(args, &settings).await
}

async fn run(args: RunArgs, settings: &AppSettings) -> anyhow::Result<()> {
    let version = if args.v1 { SchemaVersion::V1 } else { SchemaVersion::Current };

    let mut profile = load_profile(&args, settings, version).await?;

    if let Some(path) = &args.merge {
        let older = Snapshot::load(path)?;
        if older.version != version {
            warn!("merging a {} snapshot into a {version} profile", older.version);
        }
        info!("merging snapshot from {}", older.fetched_at.format("%Y-%m-%d %H:%M UTC"));
        profile = profile.merge(older.info);
    }

    if let Some(path) = &args.save {
        Snapshot::new(version, profile.clone()).save(path)?;
        info!("saved snapshot to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", summary::render(&profile));
    }
    Ok(())
}

/// Local payload when `SRINFO_PROFILE_JSON` is set, otherwise the API.
async fn load_profile(
    args: &RunArgs,
    settings: &AppSettings,
    version: SchemaVersion,
) -> anyhow::Result<StarRailInfo> {
    if let Some(path) = &settings.profile_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let raw: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("invalid profile json at {}", path.display()))?;
        let options = NormalizeOptions {
            asset_base_url: args.icons.then(|| settings.asset_url.clone()),
        };
        return Ok(srinfo_api::normalize(raw, version, &options)?);
    }

    let Some(uid) = args.uid else {
        bail!("a uid is required unless SRINFO_PROFILE_JSON is set");
    };
    let api = MihomoApi::new(settings.language)
        .with_base_url(settings.api_url.as_str())
        .with_asset_url(settings.asset_url.as_str());
    Ok(api.fetch_user(uid, version, args.icons).await?)
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut run = RunArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--v1" => run.v1 = true,
            "--icons" => run.icons = true,
            "--json" => run.json = true,
            "--save" => run.save = Some(path_value(&arg, args.next())?),
            "--merge" => run.merge = Some(path_value(&arg, args.next())?),
            other if run.uid.is_none() && !other.starts_with('-') => {
                let uid = other.parse::<u64>().map_err(|_| format!("Invalid uid: {other}"))?;
                run.uid = Some(uid);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Command::Run(run))
}

fn path_value(flag: &str, value: Option<String>) -> Result<PathBuf, String> {
    value.map(PathBuf::from).ok_or_else(|| format!("{flag} needs a file path"))
}

fn usage_text() -> &'static str {
    "srinfo - Honkai: Star Rail profile viewer

Usage:
  srinfo <uid> [--v1] [--icons] [--json] [--save <file>] [--merge <file>]
  srinfo --help
  srinfo --version

Options:
  --v1             Request the legacy v1 response shape
  --icons          Rewrite icon paths into absolute asset URLs
  --json           Print the normalized profile as JSON
  --save <file>    Save the profile as a snapshot
  --merge <file>   Keep characters from an older snapshot that are missing now

Environment:
  SRINFO_LANG          Response language (default cht)
  SRINFO_PROFILE_JSON  Path to a local raw payload; skips the network
  SRINFO_API_URL       API base URL
  SRINFO_ASSET_URL     Asset base URL used by --icons
  SRINFO_LOG           Log filter (default warn)"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn uid_and_flags_are_parsed() {
        let cmd = parse(&["800000001", "--v1", "--json", "--save", "out.json"]).unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunArgs {
                uid: Some(800_000_001),
                v1: true,
                json: true,
                save: Some(PathBuf::from("out.json")),
                ..Default::default()
            })
        );
    }

    #[test]
    fn help_wins_over_everything_after_it() {
        assert_eq!(parse(&["--help", "garbage"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(parse(&["abc"]).unwrap_err(), "Invalid uid: abc");
        assert_eq!(parse(&["--merge"]).unwrap_err(), "--merge needs a file path");
        assert_eq!(parse(&["1", "2"]).unwrap_err(), "Unknown argument: 2");
        assert_eq!(parse(&["--bogus"]).unwrap_err(), "Unknown argument: --bogus");
    }

    #[test]
    fn no_arguments_is_a_run_without_uid() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(RunArgs::default()));
    }

    #[tokio::test]
    async fn local_payload_is_normalized_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(&path, include_str!("../api/fixtures/v1.json")).unwrap();
        let settings = AppSettings { profile_json: Some(path), ..Default::default() };
        let args = RunArgs { icons: true, ..Default::default() };

        let info = load_profile(&args, &settings, SchemaVersion::V1).await.unwrap();
        assert_eq!(info.player.name, "Stelle");
        assert!(info.player.avatar.icon.starts_with(&settings.asset_url));
        assert_eq!(info.characters[1].name, "Stelle");
    }
}
