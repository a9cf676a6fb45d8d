//! # REST API for the Entry Form
//!
//! Pre-filled form defaults and the live preview. The UI sends the form as
//! typed plus the field that just changed; the backend applies the rate
//! pre-fill and suggested price and returns the figures to show.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use shared::{Country, EntryFormState, FormPreviewRequest, FormPreviewResponse, FormUpdate};
use tracing::{debug, info};

use super::today;
use crate::backend::domain::entry_form;
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct FormDefaultsQuery {
    pub country: Option<String>,
}

/// Blank form starting from the last used rate, optionally switched to a country
pub async fn get_form_defaults(
    State(state): State<AppState>,
    Query(query): Query<FormDefaultsQuery>,
) -> Json<EntryFormState> {
    info!("GET /api/form/defaults - query: {:?}", query);

    let form = entry_form::create_form_state(state.settings.load_default_rate(), today());
    let form = match query.country.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(code) => entry_form::select_country(form, Country::from_code(code)),
        None => form,
    };
    Json(form)
}

/// Apply one field edit and preview the resulting entry
pub async fn preview_transaction(Json(request): Json<FormPreviewRequest>) -> Json<FormPreviewResponse> {
    debug!("POST /api/transactions/preview - update: {:?}", request.update);

    let form = match request.update {
        Some(FormUpdate::Country(country)) => entry_form::select_country(request.form, country),
        Some(FormUpdate::CostForeign(input)) => entry_form::set_cost(request.form, &input),
        Some(FormUpdate::SellingExchangeRate(input)) => {
            entry_form::set_selling_rate(request.form, &input)
        }
        None => request.form,
    };
    Json(entry_form::preview(&form, today()))
}
