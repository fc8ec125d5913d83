use crate::catalog::SearchService;
use crate::catalog::http::{HttpClient, encode_path_segment};
use crate::core::suggestion::Suggestion;
use crate::error::SearchError;
use crate::task::CancelToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1/name";

const FIELDS: &str = "name,flag,capital,altSpellings,subregion,population,languages";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub alt_spellings: Vec<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

impl Country {
    pub fn new(common: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            name: CountryName {
                common: common.into(),
                official: String::new(),
            },
            flag: flag.into(),
            ..Self::default()
        }
    }

    pub fn into_suggestion(self) -> Suggestion<Country> {
        Suggestion::new(self.name.common.clone(), self)
    }

    /// Detail lines for a selected country.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.name.common, self.flag).trim_end().to_string()];

        if !self.alt_spellings.is_empty() || self.subregion.is_some() {
            let mut line = String::new();
            if !self.alt_spellings.is_empty() {
                line.push_str(format!("Also known as {}", self.alt_spellings.join(" / ")).as_str());
            }
            if let Some(subregion) = self.subregion.as_deref() {
                if line.is_empty() {
                    line.push_str(format!("Located in {subregion}").as_str());
                } else {
                    line.push_str(format!(", located in {subregion}").as_str());
                }
            }
            line.push('.');
            lines.push(line);
        }

        if !self.capital.is_empty() {
            lines.push(format!("Capital: {}.", self.capital.join(", ")));
        }

        if self.population > 0 || !self.languages.is_empty() {
            let languages: Vec<&str> = self.languages.values().map(String::as_str).collect();
            lines.push(format!(
                "Population {}, {} official language(s) ({}).",
                group_thousands(self.population),
                languages.len(),
                languages.join(" / ")
            ));
        }

        lines
    }
}

/// Country lookup against the REST Countries `name` endpoint.
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    client: HttpClient,
    base_url: String,
}

impl CountryCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: HttpClient::new(timeout),
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, query: &str) -> String {
        format!(
            "{}/{}?fields={FIELDS}",
            self.base_url.trim_end_matches('/'),
            encode_path_segment(query)
        )
    }
}

impl SearchService for CountryCatalog {
    type Item = Country;

    fn search(
        &self,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Suggestion<Country>>, SearchError> {
        let url = self.url_for(query);
        let countries = self
            .client
            .get_json::<Vec<Country>>(url.as_str(), cancel)?
            .unwrap_or_default();
        Ok(countries.into_iter().map(Country::into_suggestion).collect())
    }
}

/// A handful of countries for running without network access.
pub fn offline_countries() -> Vec<Suggestion<Country>> {
    [
        ("Argentina", "🇦🇷"),
        ("Australia", "🇦🇺"),
        ("Austria", "🇦🇹"),
        ("Belgium", "🇧🇪"),
        ("Brazil", "🇧🇷"),
        ("Canada", "🇨🇦"),
        ("Chile", "🇨🇱"),
        ("Denmark", "🇩🇰"),
        ("Finland", "🇫🇮"),
        ("France", "🇫🇷"),
        ("French Guiana", "🇬🇫"),
        ("French Polynesia", "🇵🇫"),
        ("Germany", "🇩🇪"),
        ("Greece", "🇬🇷"),
        ("Iceland", "🇮🇸"),
        ("Ireland", "🇮🇪"),
        ("Italy", "🇮🇹"),
        ("Japan", "🇯🇵"),
        ("Netherlands", "🇳🇱"),
        ("New Zealand", "🇳🇿"),
        ("Norway", "🇳🇴"),
        ("Portugal", "🇵🇹"),
        ("Spain", "🇪🇸"),
        ("Sweden", "🇸🇪"),
        ("Switzerland", "🇨🇭"),
    ]
    .into_iter()
    .map(|(name, flag)| Country::new(name, flag).into_suggestion())
    .collect()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
