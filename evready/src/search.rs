//! Types and functions to perform text filtering on the country collection.

use nonempty::{nonempty, NonEmpty};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{country::CountryMetrics, error::EvreadyError};

/// Search in a case-insensitive or case-sensitive manner for `string`
/// anywhere inside the searched field.
fn contains_pattern(string: &str, case_sensitivity: &CaseSensitivity) -> String {
    let regex = regex::escape(string);
    match case_sensitivity {
        CaseSensitivity::Insensitive => format!("(?i){regex}"),
        CaseSensitivity::Sensitive => regex,
    }
}

/// Search for fields that begin with `string`.
fn startswith_pattern(string: &str, case_sensitivity: &CaseSensitivity) -> String {
    let regex = regex::escape(string);
    match case_sensitivity {
        CaseSensitivity::Insensitive => format!("(?i)^{regex}"),
        CaseSensitivity::Sensitive => format!("^{regex}"),
    }
}

/// Search for fields that are exactly equal to `string`.
fn exact_pattern(string: &str, case_sensitivity: &CaseSensitivity) -> String {
    let regex = regex::escape(string);
    match case_sensitivity {
        CaseSensitivity::Insensitive => format!("(?i)^{regex}$"),
        CaseSensitivity::Sensitive => format!("^{regex}$"),
    }
}

/// Treat `string` as a regular expression of its own.
fn regex_pattern(string: &str, case_sensitivity: &CaseSensitivity) -> String {
    match case_sensitivity {
        CaseSensitivity::Insensitive => format!("(?i){string}"),
        CaseSensitivity::Sensitive => string.to_string(),
    }
}

fn get_pattern_fn(match_type: &MatchType) -> fn(&str, &CaseSensitivity) -> String {
    match match_type {
        MatchType::Regex => regex_pattern,
        MatchType::Exact => exact_pattern,
        MatchType::Contains => contains_pattern,
        MatchType::Startswith => startswith_pattern,
    }
}

/// The fields of a country record that a filter can look at.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum SearchContext {
    CountryCode,
    CountryName,
}

impl SearchContext {
    pub fn all() -> NonEmpty<SearchContext> {
        nonempty![SearchContext::CountryCode, SearchContext::CountryName]
    }

    // A record without a name has nothing to match on in that context.
    fn field<'a>(&self, country: &'a CountryMetrics) -> Option<&'a str> {
        match self {
            SearchContext::CountryCode => Some(&country.country_code),
            SearchContext::CountryName => country.country_name.as_deref(),
        }
    }
}

/// The type of search to conduct over the selected fields.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Regex,
    #[default]
    Exact,
    Contains,
    Startswith,
}

/// Whether the search is case sensitive.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Insensitive,
    Sensitive,
}

/// How a filter's text is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub match_type: MatchType,
    pub case_sensitivity: CaseSensitivity,
}

/// A text filter over the country collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryFilter {
    /// The text to search for.
    pub text: String,
    /// The fields the text is matched against. A record matches when any of
    /// them does.
    pub context: NonEmpty<SearchContext>,
    pub config: SearchConfig,
}

impl Default for CountryFilter {
    fn default() -> Self {
        Self {
            text: String::new(),
            context: SearchContext::all(),
            config: SearchConfig::default(),
        }
    }
}

impl CountryFilter {
    /// Builds the regex for this filter and checks that it is valid.
    pub fn compile(&self) -> Result<CompiledFilter, EvreadyError> {
        let pattern_fn = get_pattern_fn(&self.config.match_type);
        let pattern = pattern_fn(&self.text, &self.config.case_sensitivity);
        let regex =
            Regex::new(&pattern).map_err(|err| EvreadyError::InvalidSearchQuery(err.to_string()))?;
        Ok(CompiledFilter {
            regex,
            context: self.context.clone(),
        })
    }
}

/// A filter whose pattern has been built and checked.
#[derive(Clone, Debug)]
pub struct CompiledFilter {
    regex: Regex,
    context: NonEmpty<SearchContext>,
}

impl CompiledFilter {
    pub fn matches(&self, country: &CountryMetrics) -> bool {
        self.context.iter().any(|context| {
            context
                .field(country)
                .is_some_and(|value| self.regex.is_match(value))
        })
    }
}

/// Returns the records matching `filter`, preserving record order.
pub fn filter_countries<'a>(
    countries: &'a [CountryMetrics],
    filter: &CountryFilter,
) -> Result<Vec<&'a CountryMetrics>, EvreadyError> {
    let compiled = filter.compile()?;
    Ok(countries
        .iter()
        .filter(|country| compiled.matches(country))
        .collect())
}
