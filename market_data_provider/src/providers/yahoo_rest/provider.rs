use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    models::{bar::DailyBar, request::FetchRequest, summary::QuoteSummary},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidBaseUrlSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu,
        yahoo_rest::{
            params::{YahooConfig, chart_query, quote_query},
            response::{parse_chart, parse_crumb, parse_quote},
        },
    },
};

const CHART_PATH: &str = "/v8/finance/chart";
const QUOTE_PATH: &str = "/v7/finance/quote";
const CRUMB_PATH: &str = "/v1/test/getcrumb";

/// Longest slice of an error body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

pub struct YahooProvider {
    client: Client,
    base_url: String,
    cookie_url: String,
    /// Session crumb for the quote endpoint, fetched on first use.
    crumb: ArcSwapOption<String>,
}

impl YahooProvider {
    /// Creates a provider against the public Yahoo Finance endpoints.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> Result<Self, ProviderInitError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed_ok = reqwest::Url::parse(&base_url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !parsed_ok {
            return InvalidBaseUrlSnafu { url: config.base_url }.fail();
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url,
            cookie_url: config.cookie_url,
            crumb: ArcSwapOption::empty(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}{}/{}", self.base_url, CHART_PATH, symbol)
    }

    fn quote_url(&self) -> String {
        format!("{}{}", self.base_url, QUOTE_PATH)
    }

    fn crumb_url(&self) -> String {
        format!("{}{}", self.base_url, CRUMB_PATH)
    }

    /// Returns the session crumb, running the cookie/crumb handshake when
    /// none is held or `refresh` is set.
    async fn crumb(&self, refresh: bool) -> Result<Arc<String>, ProviderError> {
        if !refresh {
            if let Some(crumb) = self.crumb.load_full() {
                return Ok(crumb);
            }
        }

        // The cookie host answers 404 but still sets the session cookie.
        self.get(&self.cookie_url, &[]).await?;
        let (status, body) = self.get(&self.crumb_url(), &[]).await?;
        if !status.is_success() {
            return ApiSnafu {
                message: http_error(status, &body),
            }
            .fail();
        }

        let crumb = Arc::new(parse_crumb(&body)?);
        info!("obtained yahoo session crumb");
        self.crumb.store(Some(Arc::clone(&crumb)));
        Ok(crumb)
    }

    /// GETs `url` and returns the status with the full body.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<(StatusCode, String), ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context(ReqwestSnafu)?;
        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;
        debug!(%url, %status, bytes = body.len(), "yahoo response");
        Ok((status, body))
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_daily_bars(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let url = self.chart_url(request.symbol());
        let (status, body) = self.get(&url, &chart_query(request)).await?;

        // Unknown symbols come back as 404 with a chart error payload, which
        // parse_chart turns into an empty series.
        match parse_chart(&body) {
            Ok(bars) => Ok(bars),
            Err(ProviderError::Decode { .. }) if !status.is_success() => ApiSnafu {
                message: http_error(status, &body),
            }
            .fail(),
            Err(e) => Err(e),
        }
    }

    async fn fetch_summary(&self, symbol: &str) -> Result<QuoteSummary, ProviderError> {
        let crumb = self.crumb(false).await?;
        let (mut status, mut body) = self
            .get(&self.quote_url(), &quote_query(symbol, Some(crumb.as_str())))
            .await?;

        // A held crumb goes stale when Yahoo rotates the session.
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!(%status, "quote rejected the crumb, refreshing");
            let crumb = self.crumb(true).await?;
            (status, body) = self
                .get(&self.quote_url(), &quote_query(symbol, Some(crumb.as_str())))
                .await?;
        }

        if !status.is_success() {
            return ApiSnafu {
                message: http_error(status, &body),
            }
            .fail();
        }
        parse_quote(&body, symbol)
    }
}

fn http_error(status: StatusCode, body: &str) -> String {
    let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
    format!("HTTP {status}: {snippet}")
}
