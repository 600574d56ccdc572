use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use fnv::FnvHashSet;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::FinderError;
use crate::geo::GeoPoint;

/// One pharmacy as known to the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Pharmacy {
    pub id: u32,
    pub name: String,
    pub location: GeoPoint,
    /// Free text, e.g. "8 AM – 8 PM". Never parsed.
    pub hours: String,
    /// Medicine names carried. Order and duplicates don't matter.
    pub stock: Vec<String>,
}

impl Pharmacy {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        location: GeoPoint,
        hours: impl Into<String>,
        stock: &[&str],
    ) -> Self {
        Pharmacy {
            id,
            name: name.into(),
            location,
            hours: hours.into(),
            stock: stock.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An immutable snapshot of pharmacies handed to the matcher.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pharmacies: Vec<Pharmacy>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u32,
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    hours: String,
    #[serde(default)]
    stock: String,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(pharmacies: Vec<Pharmacy>) -> Result<Self, FinderError> {
        let mut seen: FnvHashSet<u32> = FnvHashSet::default();
        for p in &pharmacies {
            if !seen.insert(p.id) {
                return Err(FinderError::DuplicateId(p.id));
            }
        }
        Ok(Catalog { pharmacies })
    }

    /// The seven demo pharmacies the app ships with.
    pub fn builtin() -> Self {
        let pharmacies = vec![
            Pharmacy::new(
                1,
                "Southstar Drug",
                GeoPoint::new(12.6674373, 123.8743633),
                "8 AM – 8 PM",
                &["Paracetamol", "Vitamin C"],
            ),
            Pharmacy::new(
                2,
                "Super G",
                GeoPoint::new(12.6658930, 123.8746352),
                "9 AM – 9 PM",
                &["Ibuprofen", "Cough Syrup", "Paracetamol", "Vitamin C"],
            ),
            Pharmacy::new(
                3,
                "Mercury Drug",
                GeoPoint::new(12.666538, 123.874261),
                "24 Hours",
                &["Amoxicillin", "Pain Reliever"],
            ),
            Pharmacy::new(4, "UniDrugstore", GeoPoint::new(12.667570, 123.873864), "7 AM – 10 PM", &[]),
            Pharmacy::new(5, "TGP", GeoPoint::new(12.666498, 123.874714), "8 AM – 8 PM", &[]),
            Pharmacy::new(6, "Farmacia Lourdes", GeoPoint::new(12.668162, 123.873497), "8 AM – 10 PM", &[]),
            Pharmacy::new(7, "Botica Ada", GeoPoint::new(12.665689, 123.874526), "8 AM – 9 PM", &[]),
        ];
        Catalog { pharmacies }
    }

    pub fn from_path(path: &Path) -> Result<Self, FinderError> {
        let file = File::open(path).map_err(|source| FinderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), pharmacies = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Reads `id,name,lat,lng,hours,stock` rows; `stock` is `;`-separated.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FinderError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut pharmacies = Vec::new();
        for (idx, result) in rdr.deserialize::<CatalogRow>().enumerate() {
            let row = result?;
            // header is line 1
            let line = idx + 2;
            let location = GeoPoint::new(row.lat, row.lng);
            if !location.is_valid() {
                return Err(FinderError::InvalidRow {
                    row: line,
                    reason: format!("coordinates out of range ({}, {})", row.lat, row.lng),
                });
            }
            let stock: Vec<String> = row
                .stock
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            debug!(id = row.id, stocked = stock.len(), "catalog row");
            pharmacies.push(Pharmacy {
                id: row.id,
                name: row.name,
                location,
                hours: row.hours,
                stock,
            });
        }
        Self::new(pharmacies)
    }

    pub fn pharmacies(&self) -> &[Pharmacy] {
        &self.pharmacies
    }

    pub fn by_id(&self, id: u32) -> Option<&Pharmacy> {
        self.pharmacies.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pharmacies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pharmacies.is_empty()
    }
}
