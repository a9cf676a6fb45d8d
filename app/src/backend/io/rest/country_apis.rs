//! # REST API for Countries
//!
//! The country table the entry form's selector is built from.

use axum::response::Json;
use shared::CountryListResponse;
use tracing::info;

use crate::backend::domain::all_country_configs;

/// List supported countries with their default rates and currency symbols
pub async fn list_countries() -> Json<CountryListResponse> {
    info!("GET /api/countries");
    Json(CountryListResponse {
        countries: all_country_configs().into_iter().map(|c| c.to_info()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use shared::{Country, CountryListResponse};

    #[tokio::test]
    async fn test_country_table() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/api/countries", None).await;
        assert_eq!(status, StatusCode::OK);

        let response: CountryListResponse = serde_json::from_slice(&body).unwrap();
        let codes: Vec<Country> = response.countries.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![Country::Jp, Country::Kr, Country::Other]);

        let korea = &response.countries[1];
        assert_eq!(korea.label, "韩国");
        assert_eq!(korea.default_cost_rate, 0.02);
        assert_eq!(korea.default_selling_rate, 0.035);
        assert_eq!(korea.currency_symbol, "₩");
    }
}
