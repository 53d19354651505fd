use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wildwatch::api::{AppState, SearchParams};
use wildwatch::area::{CUSTOM_AREA, PRESET_AREAS};
use wildwatch::query::{ANIMAL_OPTIONS, ChartKind, DEFAULT_DAYS};
use wildwatch::{DashboardService, WildwatchConfig, WildwatchError, telemetry, web};

/// Wildlife sightings and environmental conditions dashboard
#[derive(Parser, Debug)]
#[command(name = "wildwatch", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one search and print the dashboard
    Search(SearchArgs),
    /// Start the web API
    Serve {
        /// Port to listen on (overrides the configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the preset areas
    Areas,
    /// List the animal filter options
    Animals,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Preset area name, or "Custom"
    #[arg(long)]
    area: Option<String>,
    /// Custom latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Custom longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Animal from the preset list
    #[arg(long)]
    animal: Option<String>,
    /// Free-text animal name, takes precedence over --animal
    #[arg(long)]
    custom_animal: Option<String>,
    /// Days to analyze (7-30)
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u32,
    /// Only threatened species
    #[arg(long)]
    threatened: bool,
    /// Trend chart type
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    chart: ChartKind,
    /// Write the sightings CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl From<&SearchArgs> for SearchParams {
    fn from(args: &SearchArgs) -> Self {
        Self {
            area: args.area.clone(),
            lat: args.lat,
            lon: args.lon,
            animal: args.animal.clone(),
            custom_animal: args.custom_animal.clone(),
            days: Some(args.days),
            threatened: args.threatened,
            chart: Some(args.chart),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<WildwatchError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = WildwatchConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose);

    match cli.command {
        Command::Areas => {
            for (name, lat, lon) in PRESET_AREAS {
                println!("{name:<22} {lat:>9.4} {lon:>10.4}");
            }
            println!("{CUSTOM_AREA:<22} (use --lat/--lon)");
        }
        Command::Animals => {
            for animal in ANIMAL_OPTIONS {
                println!("{animal}");
            }
        }
        Command::Serve { port } => {
            let mut server = config.server.clone();
            if let Some(port) = port {
                server.port = port;
            }
            let service = DashboardService::new(&config)?;
            web::run(&server, AppState::new(service)).await?;
        }
        Command::Search(args) => {
            let query = SearchParams::from(&args).into_query()?;
            let service = DashboardService::new(&config)?;
            let report = service.search(&query).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }

            if let Some(path) = &args.csv {
                let csv = report.csv()?;
                std::fs::write(path, csv)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("📥 Saved {} rows to {}", report.export_rows.len(), path.display());
            }
        }
    }

    Ok(())
}
