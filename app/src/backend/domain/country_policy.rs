//! Country policy table.
//!
//! Static, process-wide defaults per origin country: the cost rate and selling
//! rate that pre-fill a new entry, plus the label and currency symbol used in
//! every rendering. The set of countries is closed, so lookups cannot fail and
//! anything unknown or missing resolves to Japan.

use shared::{Country, CountryInfo};

/// Defaults and display data for one country
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryConfig {
    pub country: Country,
    pub label: &'static str,
    pub default_cost_rate: f64,
    pub default_selling_rate: f64,
    pub currency_symbol: &'static str,
}

const JAPAN: CountryConfig = CountryConfig {
    country: Country::Jp,
    label: "日本",
    default_cost_rate: 0.2,
    default_selling_rate: 0.28,
    currency_symbol: "¥",
};

const KOREA: CountryConfig = CountryConfig {
    country: Country::Kr,
    label: "韩国",
    default_cost_rate: 0.02,
    default_selling_rate: 0.035,
    currency_symbol: "₩",
};

const OTHER: CountryConfig = CountryConfig {
    country: Country::Other,
    label: "其他",
    default_cost_rate: 1.0,
    default_selling_rate: 1.0,
    currency_symbol: "$",
};

/// Look up the policy for a country
pub fn country_config(country: Country) -> &'static CountryConfig {
    match country {
        Country::Jp => &JAPAN,
        Country::Kr => &KOREA,
        Country::Other => &OTHER,
    }
}

/// Look up the policy for a possibly missing country; missing means Japan
pub fn resolve_config(country: Option<Country>) -> &'static CountryConfig {
    country_config(country.unwrap_or_default())
}

/// Every country in selector order
pub fn all_country_configs() -> Vec<&'static CountryConfig> {
    Country::ALL.iter().map(|c| country_config(*c)).collect()
}

impl CountryConfig {
    pub fn to_info(&self) -> CountryInfo {
        CountryInfo {
            code: self.country,
            label: self.label.to_string(),
            default_cost_rate: self.default_cost_rate,
            default_selling_rate: self.default_selling_rate,
            currency_symbol: self.currency_symbol.to_string(),
        }
    }
}
