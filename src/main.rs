use anyhow::{bail, Context, Result};
use clap::Parser;
use csv::Writer;
use medfinder::api::{self, SearchRequest};
use medfinder::{medicine_info, Catalog, GeoPoint};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "medfinder")]
#[command(about = "Find pharmacies stocking a medicine, nearest first.", long_about = None)]
struct Cli {
    /// Catalog CSV (id,name,lat,lng,hours,stock). Uses the built-in demo catalog if omitted.
    #[arg(short, long, env = "MEDFINDER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Medicine name, matched as a case-insensitive substring of stock entries
    #[arg(short, long)]
    medicine: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    /// JSON request file ({"medicine": ..., "origin": {"lat": ..., "lng": ...}}). Overrides the flags above.
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Output CSV (id, name, distance_km). If omitted, prints the JSON response to stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skip the medicine information text
    #[arg(long, default_value_t = false)]
    no_info: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(p) => Catalog::from_path(p).with_context(|| format!("loading catalog {}", p.display())),
        None => {
            info!("no catalog given, using built-in demo catalog");
            Ok(Catalog::builtin())
        }
    }
}

fn build_request(cli: &Cli) -> Result<SearchRequest> {
    if let Some(path) = &cli.request {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?;
        return serde_json::from_str(&body)
            .with_context(|| format!("parsing request {}", path.display()));
    }
    let Some(medicine) = cli.medicine.clone() else {
        bail!("either --request or --medicine is required");
    };
    let (Some(lat), Some(lng)) = (cli.lat, cli.lng) else {
        bail!("--lat and --lng are required with --medicine");
    };
    Ok(SearchRequest::new(medicine, GeoPoint::new(lat, lng)))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = load_catalog(cli.catalog.as_ref())?;
    let request = build_request(&cli)?;
    let response = api::search(&catalog, &request).context("running search")?;

    info!(
        medicine = %request.medicine,
        matches = response.matches.len(),
        nearest = ?response.nearest_id,
        "search finished"
    );

    if let Some(out_path) = &cli.out {
        let mut wtr = Writer::from_path(out_path)
            .with_context(|| format!("creating CSV {}", out_path.display()))?;
        wtr.write_record(["id", "name", "distance_km"])?;
        for m in &response.matches {
            wtr.write_record(&[m.id.to_string(), m.name.clone(), format!("{:.2}", m.distance_km)])?;
        }
        wtr.flush()?;
        println!(
            "Wrote {} matches to {}",
            response.matches.len(),
            out_path.display()
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if !cli.no_info {
        match medicine_info::lookup(&request.medicine) {
            Ok(info) if info.known => println!("\n{}\n{}", info.name, info.text),
            Ok(info) => {
                info!(medicine = %info.name, "no stored info, printing referral");
                println!("\n{}", info.text);
            }
            Err(e) => warn!("no medicine info: {e}"),
        }
    }

    Ok(())
}
