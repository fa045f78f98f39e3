use async_trait::async_trait;
use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use super::cache::TtlCache;
use super::types::{DataTier, FoodDetailsResponse, FoodMatch, FoodSearchResponse};
use crate::normalizer;

pub const FDC_API_KEY_ENV_VAR: &str = "FDC_API_KEY";
const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

const SEARCH_CACHE_CAPACITY: usize = 1000;
const DETAILS_CACHE_CAPACITY: usize = 1000;
const CACHE_TTL: Duration = Duration::from_secs(3600);
/// The transport guarantees no timeout of its own, so the client imposes one.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum FdcError {
    MissingApiKey(String),
    NetworkError(reqwest::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    DecodeError(serde_json::Error),
}

impl fmt::Display for FdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FdcError::MissingApiKey(key_name) => {
                write!(f, "nutrition API key not found in environment: {}", key_name)
            }
            FdcError::NetworkError(err) => write!(f, "network error: {}", err),
            FdcError::ApiError { status, error_body } => {
                write!(f, "nutrition API error {}: {}", status, error_body)
            }
            FdcError::DecodeError(err) => write!(f, "response decode error: {}", err),
        }
    }
}

impl Error for FdcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FdcError::NetworkError(err) => Some(err),
            FdcError::DecodeError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FdcError {
    fn from(err: reqwest::Error) -> Self {
        FdcError::NetworkError(err)
    }
}

impl From<serde_json::Error> for FdcError {
    fn from(err: serde_json::Error) -> Self {
        FdcError::DecodeError(err)
    }
}

/// Seam over the nutrition reference service, so the estimator and the
/// substitution engine can run against a stub in tests.
#[async_trait]
pub trait FoodDataSource: Send + Sync {
    /// Whether a usable credential is configured. Must be answerable
    /// without any network traffic so callers can degrade up front.
    fn has_credential(&self) -> bool;

    async fn search(
        &self,
        query: &str,
        data_types: &[DataTier],
        page_size: u32,
    ) -> Result<Vec<FoodMatch>, FdcError>;

    async fn get_details(&self, id: u64) -> Result<FoodMatch, FdcError>;
}

pub struct FdcClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    search_cache: TtlCache<String, Vec<FoodMatch>>,
    details_cache: TtlCache<u64, FoodMatch>,
}

impl FdcClient {
    /// Build a client reading `FDC_API_KEY` from the environment (after
    /// loading `.env`). A missing key is not an error here: the client
    /// reports `has_credential() == false` and every service call returns
    /// `FdcError::MissingApiKey`.
    pub fn from_env() -> Result<Self, FdcError> {
        dotenv().ok();
        Self::new(env::var(FDC_API_KEY_ENV_VAR).ok())
    }

    pub fn new(api_key: Option<String>) -> Result<Self, FdcError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_cache: TtlCache::new(SEARCH_CACHE_CAPACITY, CACHE_TTL),
            details_cache: TtlCache::new(DETAILS_CACHE_CAPACITY, CACHE_TTL),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Drop both caches. Exposed for test isolation.
    pub fn clear_caches(&self) {
        self.search_cache.clear();
        self.details_cache.clear();
    }

    fn require_key(&self) -> Result<&str, FdcError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| FdcError::MissingApiKey(FDC_API_KEY_ENV_VAR.to_string()))
    }

    async fn raw_search(
        &self,
        query: &str,
        data_types: &[DataTier],
        page_size: u32,
    ) -> Result<Vec<FoodMatch>, FdcError> {
        let api_key = self.require_key()?;
        let data_type_param = data_types
            .iter()
            .map(|t| t.api_name())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/foods/search", self.base_url);
        let page_size_param = page_size.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("query", query),
                ("dataType", data_type_param.as_str()),
                ("pageSize", page_size_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(FdcError::ApiError { status, error_body });
        }

        let parsed = response.json::<FoodSearchResponse>().await?;
        Ok(parsed
            .foods
            .into_iter()
            .map(|item| item.into_food_match())
            .collect())
    }
}

#[async_trait]
impl FoodDataSource for FdcClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(
        &self,
        query: &str,
        data_types: &[DataTier],
        page_size: u32,
    ) -> Result<Vec<FoodMatch>, FdcError> {
        let sanitized = sanitize_query(query);
        if sanitized.is_empty() {
            debug!(query, "query sanitized down to nothing; skipping service call");
            return Ok(Vec::new());
        }

        let cache_key = format!(
            "{}|{}|{}",
            sanitized,
            data_types
                .iter()
                .map(|t| t.api_name())
                .collect::<Vec<_>>()
                .join("+"),
            page_size
        );
        if let Some(cached) = self.search_cache.get(&cache_key) {
            return Ok(cached);
        }

        let result = match self.raw_search(&sanitized, data_types, page_size).await {
            Ok(foods) => Ok(foods),
            Err(FdcError::MissingApiKey(key)) => Err(FdcError::MissingApiKey(key)),
            Err(first_err) => {
                // One simplified retry before giving up on this query.
                let simplified = simplify_query(&sanitized);
                if simplified.is_empty() || simplified == sanitized {
                    Err(first_err)
                } else {
                    warn!(
                        query = %sanitized,
                        error = %first_err,
                        retry = %simplified,
                        "search failed; retrying with simplified query"
                    );
                    self.raw_search(&simplified, data_types, page_size).await
                }
            }
        }?;

        self.search_cache.insert(cache_key, result.clone());
        Ok(result)
    }

    async fn get_details(&self, id: u64) -> Result<FoodMatch, FdcError> {
        if let Some(cached) = self.details_cache.get(&id) {
            return Ok(cached);
        }
        let api_key = self.require_key()?;
        let url = format!("{}/food/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(FdcError::ApiError { status, error_body });
        }

        let parsed = response.json::<FoodDetailsResponse>().await?;
        let food = parsed.into_food_match();
        self.details_cache.insert(id, food.clone());
        Ok(food)
    }
}

/// Strip quantity/unit noise from a query before it reaches the service:
/// parentheticals, percent tokens, punctuation, embedded amounts, leading
/// stray numbers.
pub fn sanitize_query(query: &str) -> String {
    let mut cleaned = String::with_capacity(query.len());
    let mut depth = 0u32;
    for ch in query.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => cleaned.push(ch),
            _ => {}
        }
    }

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-'))
        .filter(|w| !w.is_empty())
        .filter(|w| !w.contains('%'))
        .filter(|w| w.parse::<f64>().is_err() && !is_fraction(w))
        .filter(|w| normalizer::lookup_unit(w).is_none())
        .collect();

    words.join(" ").to_lowercase()
}

fn is_fraction(word: &str) -> bool {
    match word.split_once('/') {
        Some((a, b)) => a.parse::<f64>().is_ok() && b.parse::<f64>().is_ok(),
        None => false,
    }
}

/// Aggressive fallback: keep only plain alphabetic words of three or more
/// characters.
pub fn simplify_query(query: &str) -> String {
    query
        .split_whitespace()
        .filter(|w| w.len() >= 3 && w.chars().all(|c| c.is_alphabetic()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_quantities_and_units() {
        assert_eq!(sanitize_query("2 cups white rice"), "white rice");
        assert_eq!(sanitize_query("1/2 tbsp olive oil"), "olive oil");
        assert_eq!(sanitize_query("chicken breast (boneless)"), "chicken breast");
        assert_eq!(sanitize_query("milk 2%"), "milk");
        assert_eq!(sanitize_query("100 g greek yogurt"), "greek yogurt");
    }

    #[test]
    fn test_sanitize_can_empty_out() {
        assert_eq!(sanitize_query("2 cups"), "");
        assert_eq!(sanitize_query("(optional)"), "");
    }

    #[test]
    fn test_simplify_drops_short_and_nonalpha_tokens() {
        assert_eq!(simplify_query("white-rice of 2 grains"), "grains");
        assert_eq!(simplify_query("chicken breast fillet"), "chicken breast fillet");
        assert_eq!(simplify_query("xx yy"), "");
    }

    #[test]
    fn test_client_without_key_reports_no_credential() {
        let client = FdcClient::new(None).expect("client builds");
        assert!(!client.has_credential());
    }

    #[tokio::test]
    async fn test_search_without_key_errors() {
        let client = FdcClient::new(None).expect("client builds");
        let result = client.search("chicken", &DataTier::default_set(), 10).await;
        assert!(matches!(result, Err(FdcError::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits_without_key() {
        // Sanitization empties the query before any credential check, so
        // this succeeds with no results even with no key configured.
        let client = FdcClient::new(None).expect("client builds");
        let result = client.search("2 cups", &DataTier::default_set(), 10).await;
        assert!(matches!(result, Ok(ref v) if v.is_empty()));
    }
}
