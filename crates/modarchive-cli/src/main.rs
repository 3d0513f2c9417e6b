mod menu;
mod select;

use anyhow::{Context, Result};
use clap::Parser;
use modarchive_acquire::{
    ArchiveClient, ClientConfig, CommandPlayer, ReqwestSession, DEFAULT_BASE_URL, DEFAULT_PLAYER,
};
use modarchive_model::SearchType;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modarchive")]
#[command(about = "Search the Mod Archive, download modules, and play them")]
#[command(version)]
struct Cli {
    /// Text to search for
    search_query: String,

    /// Directory to keep downloads in; if it does not exist, tracks are played
    /// from a scratch directory and discarded
    download_dir: PathBuf,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,

    /// Which field the archive matches the query against
    #[arg(long, default_value = "filename-or-songtitle", value_enum)]
    search_type: SearchField,

    /// Program used to play modules, with optional arguments (e.g. "mpv --no-video")
    #[arg(long, default_value = DEFAULT_PLAYER)]
    player: String,

    /// Archive root URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Print the search results as JSON lines and exit without prompting
    #[arg(long)]
    json: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SearchField {
    /// File name or song title
    FilenameOrSongtitle,
    Filename,
    Songtitle,
    /// Instrument (sample) names
    ModuleInstruments,
    /// Module comment text
    ModuleComments,
    /// Module MD5 hash
    Hash,
}

impl From<SearchField> for SearchType {
    fn from(field: SearchField) -> Self {
        match field {
            SearchField::FilenameOrSongtitle => SearchType::FilenameOrSongtitle,
            SearchField::Filename => SearchType::Filename,
            SearchField::Songtitle => SearchType::Songtitle,
            SearchField::ModuleInstruments => SearchType::ModuleInstruments,
            SearchField::ModuleComments => SearchType::ModuleComments,
            SearchField::Hash => SearchType::Hash,
        }
    }
}

fn init_logging(log_level: &LogLevel, utc: bool) {
    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

/// Exit status for a failed argument parse: 1 for usage errors, 0 for
/// `--help` and `--version`.
fn usage_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    };

    init_logging(&cli.log_level, cli.utc);

    let config = ClientConfig::with_base_url(&cli.base_url)?;
    let session = ReqwestSession::new()?;
    let player = CommandPlayer::from_command_line(&cli.player)?;
    let client = ArchiveClient::new(config, session, player);
    tracing::debug!(base_url = %client.config().base_url, player = %cli.player, "Client ready");

    let results = client
        .search(Some(&cli.search_query), cli.search_type.into())
        .await?;
    if results.is_empty() {
        tracing::info!(query = %cli.search_query, "No songs found");
        return Ok(());
    }

    if cli.json {
        for result in &results {
            println!("{}", serde_json::to_string(result)?);
        }
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    menu::print_menu(&mut out, &results)?;
    let tracklist = match menu::prompt_selection(&mut io::stdin().lock(), &mut out, &results)? {
        Some(tracklist) => tracklist,
        None => {
            tracing::info!("No songs selected");
            return Ok(());
        }
    };
    drop(out);

    let batch = client.download(&tracklist, &cli.download_dir).await?;
    if batch.is_empty() {
        tracing::warn!(selected = tracklist.len(), "None of the selected songs could be downloaded");
    }

    for (i, track) in batch.tracks.iter().enumerate() {
        println!("Playing: {}", track.path.display());
        client
            .play(&track.path)
            .await
            .with_context(|| format!("Failed to play {}", track.name))?;
        if batch.removable_after(i) {
            client.remove(&track.path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_positionals_parse() {
        let cli = Cli::try_parse_from(["modarchive", "space debris", "/tmp/mods"]).unwrap();
        assert_eq!(cli.search_query, "space debris");
        assert_eq!(cli.download_dir, PathBuf::from("/tmp/mods"));
        assert_eq!(cli.player, DEFAULT_PLAYER);
        assert!(!cli.json);
    }

    #[test]
    fn test_one_positional_is_usage_error() {
        let err = Cli::try_parse_from(["modarchive", "space debris"]).err().unwrap();
        assert!(err.use_stderr());
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_three_positionals_is_usage_error() {
        let err = Cli::try_parse_from(["modarchive", "a", "b", "c"]).err().unwrap();
        assert!(err.use_stderr());
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_no_arguments_is_usage_error() {
        let err = Cli::try_parse_from(["modarchive"]).err().unwrap();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        let help = Cli::try_parse_from(["modarchive", "--help"]).err().unwrap();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(usage_exit_code(&help), 0);

        let version = Cli::try_parse_from(["modarchive", "--version"]).err().unwrap();
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(usage_exit_code(&version), 0);
    }

    #[test]
    fn test_options_after_positionals() {
        let cli = Cli::try_parse_from([
            "modarchive",
            "aryx",
            "out",
            "--search-type",
            "module-instruments",
            "--player",
            "mpv --no-video",
            "--json",
        ])
        .unwrap();
        assert_eq!(SearchType::from(cli.search_type), SearchType::ModuleInstruments);
        assert_eq!(cli.player, "mpv --no-video");
        assert!(cli.json);
    }
}
