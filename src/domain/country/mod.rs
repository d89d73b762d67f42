//! Country records reshaped from the upstream provider
//!
//! The provider returns large, loosely structured documents; this module
//! reduces each one to the six fields the API exposes. Missing sub-fields
//! become empty values so one sparse record never fails a whole listing.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Name and symbol of one currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInfo {
    pub name: String,
    pub symbol: String,
}

/// A country record with provider noise stripped away
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    /// Common name
    pub name: String,
    /// Official name
    pub official_name: String,
    /// First listed capital, or empty when the provider has none
    pub capital: String,
    /// Language code to language name
    pub languages: BTreeMap<String, String>,
    /// Currency code to name/symbol
    pub currencies: BTreeMap<String, CurrencyInfo>,
    /// Flag image URL (PNG)
    pub flag: String,
    /// Set when the provider record could not be parsed at all; the name
    /// is the only field preserved in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Country {
    /// Reshape one raw provider record.
    ///
    /// A record that is not a JSON object degrades to a partial country
    /// carrying an error marker instead of failing the caller.
    pub fn from_provider(record: &Value) -> Self {
        let Some(fields) = record.as_object() else {
            return Self::partial(String::new());
        };

        let name = fields
            .get("name")
            .and_then(|n| n.get("common"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let official_name = fields
            .get("name")
            .and_then(|n| n.get("official"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let capital = fields
            .get("capital")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let languages = fields
            .get("languages")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(code, value)| {
                        value.as_str().map(|v| (code.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let currencies = fields
            .get("currencies")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(code, details)| {
                        details.as_object().map(|d| {
                            let info = CurrencyInfo {
                                name: d
                                    .get("name")
                                    .and_then(Value::as_str)
                                    .unwrap_or_default()
                                    .to_string(),
                                symbol: d
                                    .get("symbol")
                                    .and_then(Value::as_str)
                                    .unwrap_or_default()
                                    .to_string(),
                            };
                            (code.clone(), info)
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let flag = fields
            .get("flags")
            .and_then(|f| f.get("png"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            name,
            official_name,
            capital,
            languages,
            currencies,
            flag,
            error: None,
        }
    }

    fn partial(name: String) -> Self {
        Self {
            name,
            official_name: String::new(),
            capital: String::new(),
            languages: BTreeMap::new(),
            currencies: BTreeMap::new(),
            flag: String::new(),
            error: Some("Could not parse all data".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let record = json!({
            "name": {"common": "France", "official": "French Republic"},
            "capital": ["Paris"],
            "languages": {"fra": "French"},
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "flags": {"png": "https://flagcdn.com/w320/fr.png"}
        });

        let country = Country::from_provider(&record);

        assert_eq!(country.name, "France");
        assert_eq!(country.official_name, "French Republic");
        assert_eq!(country.capital, "Paris");
        assert_eq!(country.languages["fra"], "French");
        assert_eq!(country.currencies["EUR"].name, "Euro");
        assert_eq!(country.currencies["EUR"].symbol, "€");
        assert_eq!(country.flag, "https://flagcdn.com/w320/fr.png");
        assert!(country.error.is_none());
    }

    #[test]
    fn test_missing_currencies_yields_empty_map() {
        let record = json!({
            "name": {"common": "Atlantis", "official": "Kingdom of Atlantis"},
            "capital": ["Poseidonia"]
        });

        let country = Country::from_provider(&record);

        assert_eq!(country.name, "Atlantis");
        assert!(country.currencies.is_empty());
        assert!(country.error.is_none());
    }

    #[test]
    fn test_missing_capital_yields_empty_string() {
        let record = json!({
            "name": {"common": "Nauru", "official": "Republic of Nauru"},
            "capital": []
        });

        let country = Country::from_provider(&record);
        assert_eq!(country.capital, "");
    }

    #[test]
    fn test_currency_with_missing_symbol() {
        let record = json!({
            "name": {"common": "Testland"},
            "currencies": {"TST": {"name": "Test Dollar"}}
        });

        let country = Country::from_provider(&record);
        assert_eq!(country.currencies["TST"].symbol, "");
    }

    #[test]
    fn test_unparseable_record_degrades_to_partial() {
        let record = json!("not an object");

        let country = Country::from_provider(&record);
        assert!(country.error.is_some());
    }

    #[test]
    fn test_serialization_omits_error_when_absent() {
        let record = json!({"name": {"common": "France"}});
        let country = Country::from_provider(&record);

        let json = serde_json::to_string(&country).unwrap();
        assert!(!json.contains("\"error\""));
    }
}
