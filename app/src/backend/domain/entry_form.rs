//! Entry form domain logic.
//!
//! Holds the rules behind the "new transaction" form: country-driven rate
//! pre-fill, the suggested sale price from the selling rate, the live margin
//! preview, validation, and turning the raw text inputs into a stored
//! [`Transaction`]. The UI only renders [`EntryFormState`] and sends it back.

use chrono::NaiveDate;
use shared::lenient::{parse_number, parse_quantity};
use shared::{Country, EntryFormState, FormPreviewResponse, Transaction};

use super::country_policy::country_config;
use super::derivation::{derive, format_number, suggested_price};
use super::ledger_service::generate_transaction_id;

/// Reasons an entry cannot be added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyCustomerName,
    EmptyItemName,
}

impl EntryValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            EntryValidationError::EmptyCustomerName => "请填写客户名称",
            EntryValidationError::EmptyItemName => "请填写商品名称",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryValidation {
    pub is_valid: bool,
    pub errors: Vec<EntryValidationError>,
}

impl EntryValidation {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message().to_string()).collect()
    }
}

fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A blank form. The cost rate starts from the last used rate when one is known.
pub fn create_form_state(default_rate: Option<f64>, today: NaiveDate) -> EntryFormState {
    let config = country_config(Country::Jp);
    EntryFormState {
        country: Country::Jp,
        customer_name: String::new(),
        item_name: String::new(),
        quantity: "1".to_string(),
        cost_foreign: String::new(),
        exchange_rate: format_number(default_rate.unwrap_or(config.default_cost_rate)),
        selling_exchange_rate: format_number(config.default_selling_rate),
        price_sold: String::new(),
        date: date_string(today),
    }
}

/// Switch country: both rates take the country's defaults
pub fn select_country(mut state: EntryFormState, country: Country) -> EntryFormState {
    let config = country_config(country);
    state.country = country;
    state.exchange_rate = format_number(config.default_cost_rate);
    state.selling_exchange_rate = format_number(config.default_selling_rate);
    apply_suggested_price(state)
}

/// Enter the foreign unit cost; the sale price follows the selling rate
pub fn set_cost(mut state: EntryFormState, cost_input: &str) -> EntryFormState {
    state.cost_foreign = cost_input.to_string();
    apply_suggested_price(state)
}

/// Change the selling reference rate; the sale price follows it
pub fn set_selling_rate(mut state: EntryFormState, rate_input: &str) -> EntryFormState {
    state.selling_exchange_rate = rate_input.to_string();
    apply_suggested_price(state)
}

fn apply_suggested_price(mut state: EntryFormState) -> EntryFormState {
    let cost = parse_number(&state.cost_foreign);
    let selling_rate = parse_number(&state.selling_exchange_rate);
    if let Some(price) = suggested_price(cost, selling_rate) {
        state.price_sold = format_number(price);
    }
    state
}

pub fn validate(state: &EntryFormState) -> EntryValidation {
    let mut errors = Vec::new();
    if state.customer_name.trim().is_empty() {
        errors.push(EntryValidationError::EmptyCustomerName);
    }
    if state.item_name.trim().is_empty() {
        errors.push(EntryValidationError::EmptyItemName);
    }
    EntryValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn build_transaction(state: &EntryFormState, id: String, today: NaiveDate) -> Transaction {
    let selling_rate = state.selling_exchange_rate.trim();
    let date = state.date.trim();
    Transaction {
        id,
        country: Some(state.country),
        customer_name: state.customer_name.trim().to_string(),
        item_name: state.item_name.trim().to_string(),
        quantity: parse_quantity(&state.quantity),
        cost_foreign: parse_number(&state.cost_foreign),
        exchange_rate: parse_number(&state.exchange_rate),
        selling_exchange_rate: if selling_rate.is_empty() {
            None
        } else {
            Some(parse_number(selling_rate))
        },
        price_sold: parse_number(&state.price_sold),
        date: if date.is_empty() {
            date_string(today)
        } else {
            date.to_string()
        },
    }
}

/// Live figures for what the form would record
pub fn preview(state: &EntryFormState, today: NaiveDate) -> FormPreviewResponse {
    let transaction = build_transaction(state, String::new(), today);
    FormPreviewResponse {
        form: state.clone(),
        derived: derive(&transaction),
        currency_symbol: country_config(state.country).currency_symbol.to_string(),
    }
}

/// Validate the form and turn it into a transaction with a fresh id.
/// A failed validation comes back as the error, so nothing gets created.
pub fn to_transaction(
    state: &EntryFormState,
    today: NaiveDate,
) -> Result<Transaction, EntryValidation> {
    let validation = validate(state);
    if !validation.is_valid {
        return Err(validation);
    }
    Ok(build_transaction(state, generate_transaction_id(), today))
}

/// Form for the next entry: country and rates stay, everything else resets
pub fn next_form(state: &EntryFormState, today: NaiveDate) -> EntryFormState {
    EntryFormState {
        country: state.country,
        exchange_rate: state.exchange_rate.clone(),
        selling_exchange_rate: state.selling_exchange_rate.clone(),
        quantity: "1".to_string(),
        date: date_string(today),
        ..EntryFormState::default()
    }
}
