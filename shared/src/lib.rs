use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Origin country of a purchase. Drives default rates and the display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Country {
    #[default]
    Jp,
    Kr,
    Other,
}

impl Country {
    /// All countries in selector order
    pub const ALL: [Country; 3] = [Country::Jp, Country::Kr, Country::Other];

    /// Parse a country code case-insensitively. Unknown codes resolve to JP.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "KR" => Country::Kr,
            "OTHER" => Country::Other,
            _ => Country::Jp,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Country::Jp => "JP",
            Country::Kr => "KR",
            Country::Other => "OTHER",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = lenient::text(deserializer)?;
        Ok(Country::from_code(&value))
    }
}

/// One purchase-and-resale event, in its persisted shape.
///
/// Every field deserializes leniently: numbers stored as strings are parsed,
/// garbage becomes 0, a missing country stays `None` and reads as JP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque identifier, always compared as text
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::country"
    )]
    pub country: Option<Country>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub item_name: String,
    #[serde(default = "lenient::one", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    /// Unit cost in the origin country's currency
    #[serde(rename = "costJpy", default, deserialize_with = "lenient::number")]
    pub cost_foreign: f64,
    /// Rate converting the foreign unit cost into local currency
    #[serde(default, deserialize_with = "lenient::number")]
    pub exchange_rate: f64,
    /// Reference rate for pricing guidance only
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub selling_exchange_rate: Option<f64>,
    /// Unit sale price in local currency
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_sold: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
}

impl Transaction {
    /// Country used for every derived computation
    pub fn effective_country(&self) -> Country {
        self.country.unwrap_or_default()
    }
}

/// Derived figures for a single transaction, all in local currency
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedFigures {
    pub unit_local_cost: f64,
    pub unit_profit: f64,
    pub total_sales: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub profit_margin_percent: f64,
}

/// Aggregate statistics over the whole ledger. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_sales: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub item_count: u64,
}

/// A transaction with everything the ledger table shows for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub transaction: Transaction,
    pub country: Country,
    pub country_label: String,
    pub currency_symbol: String,
    pub derived: DerivedFigures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerResponse {
    /// Newest first
    pub rows: Vec<LedgerRow>,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub code: Country,
    pub label: String,
    pub default_cost_rate: f64,
    pub default_selling_rate: f64,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryListResponse {
    pub countries: Vec<CountryInfo>,
}

/// Raw entry form values, kept as text the way the user typed them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFormState {
    pub country: Country,
    #[serde(deserialize_with = "lenient::text")]
    pub customer_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub item_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub quantity: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cost_foreign: String,
    #[serde(deserialize_with = "lenient::text")]
    pub exchange_rate: String,
    #[serde(deserialize_with = "lenient::text")]
    pub selling_exchange_rate: String,
    #[serde(deserialize_with = "lenient::text")]
    pub price_sold: String,
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
}

/// One field edit whose side effects the backend applies (rate pre-fill,
/// suggested price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FormUpdate {
    Country(Country),
    CostForeign(String),
    SellingExchangeRate(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormPreviewRequest {
    #[serde(default)]
    pub form: EntryFormState,
    #[serde(default)]
    pub update: Option<FormUpdate>,
}

/// Live preview of the entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPreviewResponse {
    pub form: EntryFormState,
    pub derived: DerivedFigures,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub transaction: Transaction,
    pub summary: SummaryStats,
    /// Fresh form for the next entry, keeping country and rates
    pub next_form: EntryFormState,
}

/// Destructive action waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "action", content = "id")]
pub enum PendingAction {
    #[default]
    None,
    Delete(String),
    ClearAll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub pending: PendingAction,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmActionResponse {
    pub applied: PendingAction,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataResponse {
    pub content: String,
    pub filename: String,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportToPathRequest {
    pub custom_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Completed,
    NoData,
    MissingCredential,
    Busy,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: AnalysisStatus,
    pub text: String,
}

/// Forgiving deserializers for values that may have been typed into a form
/// and stored as-is.
pub mod lenient {
    use super::Country;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn one() -> u32 {
        1
    }

    /// Parse a number out of text, 0 when it is not a finite number
    pub fn parse_number(input: &str) -> f64 {
        input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    /// Parse a quantity out of text, truncating fractions; anything below 1 is 1
    pub fn parse_quantity(input: &str) -> u32 {
        quantity_from_f64(parse_number(input))
    }

    fn quantity_from_f64(n: f64) -> u32 {
        if n.is_finite() && n >= 1.0 {
            n.trunc().min(u32::MAX as f64) as u32
        } else {
            1
        }
    }

    fn value_to_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
            Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_number(&value).unwrap_or(0.0))
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_number(&value))
    }

    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_number(&value).map(quantity_from_f64).unwrap_or(1))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    pub fn country<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Country>, D::Error> {
        let code = text(deserializer)?;
        if code.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(Country::from_code(&code)))
        }
    }
}
