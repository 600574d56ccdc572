//! JSON request/response layer around the matcher.
//!
//! Validation of the origin happens here; the matcher is only called with a
//! well-formed [`GeoPoint`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::FinderError;
use crate::geo::GeoPoint;
use crate::matcher::{match_pharmacies, MatchResult, QueryOutcome};

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SearchRequest {
    #[serde(default)]
    pub medicine: String,
    /// Kept raw so a wrongly typed origin is reported as a malformed origin
    /// rather than a broken body.
    #[serde(default)]
    pub origin: Option<Value>,
}

impl SearchRequest {
    pub fn new(medicine: impl Into<String>, origin: GeoPoint) -> Self {
        SearchRequest {
            medicine: medicine.into(),
            origin: Some(json!({ "lat": origin.lat, "lng": origin.lng })),
        }
    }

    /// The validated origin, or `MalformedOrigin` when it is not an object,
    /// or a coordinate is missing, non-numeric, non-finite or out of range.
    pub fn origin(&self) -> Result<GeoPoint, FinderError> {
        let coord = |key: &str| {
            self.origin
                .as_ref()
                .and_then(|o| o.get(key))
                .and_then(Value::as_f64)
                .unwrap_or(f64::NAN)
        };
        let (lat, lng) = (coord("lat"), coord("lng"));
        let point = GeoPoint::new(lat, lng);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(FinderError::MalformedOrigin { lat, lng })
        }
    }
}

/// Body of a medicine information request. Other fields are ignored.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct InfoRequest {
    #[serde(default)]
    pub medicine: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchOut {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub hours: String,
    pub distance_km: f64,
}

impl From<MatchResult> for MatchOut {
    fn from(m: MatchResult) -> Self {
        MatchOut {
            id: m.pharmacy_id,
            name: m.name,
            lat: m.location.lat,
            lng: m.location.lng,
            hours: m.hours,
            distance_km: m.distance_km,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub matches: Vec<MatchOut>,
    pub nearest_id: Option<u32>,
}

impl From<QueryOutcome> for SearchResponse {
    fn from(outcome: QueryOutcome) -> Self {
        SearchResponse {
            matches: outcome.matches.into_iter().map(MatchOut::from).collect(),
            nearest_id: outcome.nearest_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct InfoResponse {
    pub info: String,
}

/// Validates `request` and runs it against `catalog`.
pub fn search(catalog: &Catalog, request: &SearchRequest) -> Result<SearchResponse, FinderError> {
    let origin = request.origin()?;
    let outcome = match_pharmacies(catalog.pharmacies(), &request.medicine, origin);
    debug!(
        medicine = %request.medicine,
        matches = outcome.matches.len(),
        nearest = ?outcome.nearest_id,
        "search"
    );
    Ok(outcome.into())
}

/// Decode a JSON search request, run it, and encode the response.
pub fn handle_search(catalog: &Catalog, body: &str) -> Result<String, FinderError> {
    let request: SearchRequest = serde_json::from_str(body)?;
    let response = search(catalog, &request)?;
    Ok(serde_json::to_string(&response)?)
}

/// Decode `{ "medicine": ... }` and answer with the medicine information text.
pub fn handle_info(body: &str) -> Result<String, FinderError> {
    let request: InfoRequest = serde_json::from_str(body)?;
    let info = crate::medicine_info::lookup(request.medicine.as_deref().unwrap_or_default())?;
    Ok(serde_json::to_string(&InfoResponse { info: info.text })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_uses_wire_names() {
        let catalog = Catalog::builtin();
        let body = json!({ "medicine": "Paracetamol", "origin": { "lat": 12.6674, "lng": 123.8744 } });
        let out: Value = serde_json::from_str(&handle_search(&catalog, &body.to_string()).unwrap()).unwrap();

        assert_eq!(out["nearestId"], json!(1));
        let matches = out["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["id"], json!(1));
        assert_eq!(matches[0]["name"], json!("Southstar Drug"));
        assert_eq!(matches[0]["lat"], json!(12.6674373));
        assert_eq!(matches[0]["hours"], json!("8 AM – 8 PM"));
        assert!(matches[1]["distanceKm"].as_f64().unwrap() > 0.1);
    }

    #[test]
    fn empty_result_has_null_nearest() {
        let catalog = Catalog::builtin();
        let body = r#"{"medicine":"zzznonexistent","origin":{"lat":0,"lng":0}}"#;
        let out: Value = serde_json::from_str(&handle_search(&catalog, body).unwrap()).unwrap();
        assert_eq!(out, json!({ "matches": [], "nearestId": null }));
    }

    #[test]
    fn missing_or_bad_origin_is_rejected() {
        let catalog = Catalog::builtin();
        for body in [
            r#"{"medicine":"Paracetamol"}"#,
            r#"{"medicine":"Paracetamol","origin":{"lat":12.0}}"#,
            r#"{"medicine":"Paracetamol","origin":{"lat":123.0,"lng":12.0}}"#,
            r#"{"medicine":"Paracetamol","origin":{"lat":"north","lng":1}}"#,
            r#"{"medicine":"Paracetamol","origin":"here"}"#,
            r#"{"medicine":"Paracetamol","origin":null}"#,
            r#"{"medicine":"Paracetamol","origin":[12.6674,123.8744]}"#,
        ] {
            assert!(
                matches!(handle_search(&catalog, body), Err(FinderError::MalformedOrigin { .. })),
                "{body}"
            );
        }
    }

    #[test]
    fn unparseable_body_is_a_json_error() {
        let catalog = Catalog::builtin();
        assert!(matches!(handle_search(&catalog, "{not json"), Err(FinderError::Json(_))));
        assert!(matches!(
            handle_search(&catalog, r#"{"medicine":5,"origin":{"lat":0,"lng":0}}"#),
            Err(FinderError::Json(_))
        ));
    }

    #[test]
    fn missing_medicine_behaves_as_empty_query() {
        let catalog = Catalog::builtin();
        let request: SearchRequest =
            serde_json::from_str(r#"{"origin":{"lat":12.6674,"lng":123.8744}}"#).unwrap();
        let response = search(&catalog, &request).unwrap();
        assert_eq!(response.matches.len(), 3);
    }

    #[test]
    fn info_endpoint() {
        let out: Value = serde_json::from_str(&handle_info(r#"{"medicine":"ibuprofen"}"#).unwrap()).unwrap();
        assert!(out["info"].as_str().unwrap().contains("Reduces pain"));
        assert!(matches!(
            handle_info(r#"{"medicine":"  "}"#),
            Err(FinderError::BlankMedicine)
        ));
    }

    #[test]
    fn info_treats_null_or_missing_medicine_as_blank() {
        for body in [r#"{"medicine":null}"#, "{}", r#"{"origin":{"lat":"north"}}"#] {
            assert!(
                matches!(handle_info(body), Err(FinderError::BlankMedicine)),
                "{body}"
            );
        }
        let out: Value =
            serde_json::from_str(&handle_info(r#"{"medicine":"Amoxicillin","origin":"here"}"#).unwrap())
                .unwrap();
        assert!(out["info"].as_str().unwrap().starts_with("Used for: Treats bacterial"));
    }
}
