use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use clap::{error::ErrorKind, ArgAction, Parser, ValueEnum};
use tracing::{error, warn};

use comps_lookup::{
    config::{DEFAULT_BASE_URL, DEFAULT_COUNT, DEFAULT_MAPS_BASE_URL, DEFAULT_TIMEOUT_MS},
    distance_matrix_url, lookup, write_listing, write_listing_json, ClientConfig, CompsClient,
    LookupError, MapsConfig, Response,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "comps",
    about = "List comparable properties for a ZPID and build a distance-matrix URL",
    version
)]
struct Cli {
    /// Numeric property identifier (ZPID) of the subject property.
    zpid: u64,

    /// Comparables API key.
    #[arg(long = "zws-id", env = "ZWSID", hide_env_values = true, value_parser = non_empty)]
    zws_id: String,

    /// Distance-matrix API key; when set the distance-matrix URL is printed after the listing.
    #[arg(long = "maps-key", env = "MAPSAPI", hide_env_values = true)]
    maps_key: Option<String>,

    /// Number of comparables to request.
    #[arg(long, default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Ask for rent estimates.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    rent_estimate: bool,

    /// HTTP request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    #[arg(long, env = "COMPS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "MAPS_BASE_URL", default_value = DEFAULT_MAPS_BASE_URL)]
    maps_base_url: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig {
        base_url: cli.base_url,
        api_key: cli.zws_id,
        count: cli.count,
        rent_estimate: cli.rent_estimate,
        timeout_ms: cli.timeout_ms,
    };
    let client = CompsClient::new(config)?;
    let query = client.query(cli.zpid);

    let response = recover_mismatch(lookup(&client, &query).await)
        .with_context(|| format!("Unable to fetch comparables for {}", cli.zpid))?;

    let maps = cli
        .maps_key
        .filter(|key| !key.trim().is_empty())
        .map(|api_key| MapsConfig {
            base_url: cli.maps_base_url,
            api_key,
        });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &response, cli.format, maps.as_ref())?;
    out.flush()?;
    Ok(())
}

// An identifier mismatch is reported but the parsed response is still used
fn recover_mismatch(result: Result<Response, LookupError>) -> Result<Response, LookupError> {
    match result {
        Err(LookupError::Validation(e)) => {
            warn!("{e}");
            Ok(e.into_response())
        }
        other => other,
    }
}

fn write_report<W: Write>(
    out: &mut W,
    response: &Response,
    format: OutputFormat,
    maps: Option<&MapsConfig>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => write_listing(out, &response.comparables)?,
        OutputFormat::Json => write_listing_json(out, &response.comparables)?,
    }

    if let Some(maps) = maps {
        let url = distance_matrix_url(response, maps)?;
        writeln!(out, "{url}")?;
    }

    Ok(())
}
