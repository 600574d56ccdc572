use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, Writer};
use medfinder::{match_pharmacies, Catalog, GeoPoint};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "batch")]
#[command(about = "Run every query in a CSV (medicine,lat,lng) against a pharmacy catalog.", long_about = None)]
struct Cli {
    /// Path to the queries .csv file
    #[arg(short, long)]
    queries: PathBuf,

    /// Catalog CSV. Uses the built-in demo catalog if omitted.
    #[arg(short, long, env = "MEDFINDER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output CSV, one row per match. If omitted, only timings are printed.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    medicine: String,
    lat: f64,
    lng: f64,
}

#[derive(Debug, PartialEq)]
struct Query {
    index: usize,
    medicine: String,
    origin: GeoPoint,
}

/// Reads every usable query. Rows with a non-numeric, non-finite or
/// out-of-range origin are skipped and counted; I/O failures abort.
fn read_queries<R: Read>(reader: R) -> Result<(Vec<Query>, usize)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut queries = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in rdr.deserialize::<QueryRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Deserialize { .. }) => {
                warn!(query = index, error = %e, "skipping query with malformed origin");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("query row {}", index + 2)),
        };
        let origin = GeoPoint::new(row.lat, row.lng);
        if !origin.is_valid() {
            warn!(query = index, lat = row.lat, lng = row.lng, "skipping query with malformed origin");
            skipped += 1;
            continue;
        }
        queries.push(Query {
            index,
            medicine: row.medicine,
            origin,
        });
    }
    Ok((queries, skipped))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(p) => Catalog::from_path(p).with_context(|| format!("loading catalog {}", p.display()))?,
        None => Catalog::builtin(),
    };

    let file = File::open(&cli.queries).with_context(|| format!("opening {}", cli.queries.display()))?;
    let (queries, skipped) = read_queries(file)?;

    let mut wtr = match &cli.out {
        Some(p) => Some(Writer::from_path(p).with_context(|| format!("creating CSV {}", p.display()))?),
        None => None,
    };
    if let Some(w) = wtr.as_mut() {
        w.write_record(["query_index", "medicine", "id", "name", "distance_km", "nearest"])?;
    }

    let mut duration_millis = Vec::new();
    for q in &queries {
        let now = Instant::now();
        let outcome = match_pharmacies(catalog.pharmacies(), &q.medicine, q.origin);
        duration_millis.push(now.elapsed().as_secs_f64() * 1000.0);

        if let Some(w) = wtr.as_mut() {
            for m in &outcome.matches {
                w.write_record(&[
                    q.index.to_string(),
                    q.medicine.clone(),
                    m.pharmacy_id.to_string(),
                    m.name.clone(),
                    format!("{:.2}", m.distance_km),
                    (Some(m.pharmacy_id) == outcome.nearest_id).to_string(),
                ])?;
            }
        }
    }

    if let Some(mut w) = wtr {
        w.flush()?;
    }
    info!(queries = duration_millis.len(), skipped, "batch finished");
    println!("{:?}", duration_millis);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_origins_are_skipped_either_way() {
        let data = "\
medicine,lat,lng
Paracetamol,12.6674,123.8744
Ibuprofen,north,123.8744
Vitamin C,95.0,123.8744
Cough Syrup,,
,12.6660,123.8745
";
        let (queries, skipped) = read_queries(data.as_bytes()).unwrap();
        assert_eq!(skipped, 3);
        assert_eq!(
            queries,
            vec![
                Query {
                    index: 0,
                    medicine: "Paracetamol".to_string(),
                    origin: GeoPoint::new(12.6674, 123.8744),
                },
                Query {
                    index: 4,
                    medicine: String::new(),
                    origin: GeoPoint::new(12.6660, 123.8745),
                },
            ]
        );
    }

    #[test]
    fn ragged_rows_abort() {
        let data = "medicine,lat,lng\nParacetamol,12.6674\n";
        assert!(read_queries(data.as_bytes()).is_err());
    }
}
