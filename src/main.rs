//! Command line entry point
//!
//! `minihttp URL` performs a GET; `minihttp METHOD URL` dispatches on the
//! method name (`POST` posts, anything else is a GET).

use clap::{ArgAction, Parser, ValueEnum};
use minihttp::http::{BodyMode, ClientConfig, FormArgs, HttpClient};
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BodyModeArg {
    LastSegment,
    AfterHeaders,
}

impl From<BodyModeArg> for BodyMode {
    fn from(arg: BodyModeArg) -> Self {
        match arg {
            BodyModeArg::LastSegment => BodyMode::LastSegment,
            BodyModeArg::AfterHeaders => BodyMode::AfterHeaders,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "minihttp", version, about = "Send a single HTTP/1.1 GET or POST request")]
struct Cli {
    /// URL, or the method (GET/POST) when a URL follows
    #[arg(value_name = "[METHOD] URL")]
    first: String,

    /// URL when a method is given
    #[arg(value_name = "URL", hide = true)]
    second: Option<String>,

    /// Form argument sent with POST, as key=value (repeatable)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_form_pair)]
    data: Vec<(String, String)>,

    /// Connect timeout in seconds (0 = none)
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    connect_timeout: u64,

    /// Timeout for each read and write in seconds (0 = none)
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    timeout: u64,

    /// Bound on the whole request in seconds (0 = none)
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    total_timeout: u64,

    /// How to locate the body in the response
    #[arg(long, value_enum, default_value = "last-segment")]
    body_mode: BodyModeArg,

    /// Increase log verbosity (default info, -v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_form_pair(arg: &str) -> Result<(String, String), String> {
    FormArgs::parse_pair(arg).ok_or_else(|| format!("expected KEY=VALUE, got {arg:?}"))
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// INFO by default so the raw response is always shown on stderr
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let (method, url) = match cli.second {
        Some(url) => (cli.first, url),
        None => ("GET".to_string(), cli.first),
    };

    let config = ClientConfig::builder()
        .connect_timeout(seconds(cli.connect_timeout))
        .io_timeout(seconds(cli.timeout))
        .total_timeout(seconds(cli.total_timeout))
        .body_mode(cli.body_mode.into())
        .build();
    let client = HttpClient::with_config(config);

    let args: FormArgs = cli.data.into_iter().collect();
    let args = (!args.is_empty()).then_some(&args);

    match client.command(&url, &method, args) {
        Ok(response) => {
            println!("{response}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("minihttp: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_shows_raw_response_by_default() {
        assert_eq!(log_level(0), Level::INFO);
        assert_eq!(log_level(1), Level::DEBUG);
        assert_eq!(log_level(2), Level::TRACE);
        assert_eq!(log_level(5), Level::TRACE);
    }
}
