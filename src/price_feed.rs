//! USD unit prices for the input token of a quote.

use crate::error::PriceFeedError;
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_PRICE_FEED_URL: &str = "https://min-api.cryptocompare.com";

#[async_trait]
pub trait UsdPriceFeed: Send + Sync {
    /// USD price of one whole unit of the token with this ticker symbol.
    async fn get_usd_price(&self, symbol: &str) -> Result<f64, PriceFeedError>;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(rename = "USD")]
    usd: Option<f64>,
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Extracts the `USD` field of a `/data/price` response body.
pub fn parse_price_response(symbol: &str, body: &str) -> Result<f64, PriceFeedError> {
    let response: PriceResponse = serde_json::from_str(body)
        .map_err(|e| PriceFeedError::Request(format!("invalid price response: {e}")))?;

    match response.usd {
        Some(price) => Ok(price),
        None => {
            if let Some(message) = response.message {
                tracing::debug!(symbol, %message, "price feed returned no USD price");
            }
            Err(PriceFeedError::MissingPrice(symbol.to_string()))
        }
    }
}

#[cfg(feature = "http-feed")]
pub use http::CryptoCompareFeed;

#[cfg(feature = "http-feed")]
mod http {
    use super::{DEFAULT_PRICE_FEED_URL, UsdPriceFeed, parse_price_response};
    use crate::error::PriceFeedError;
    use async_trait::async_trait;
    use reqwest::Client;
    use tracing::debug;

    /// [`UsdPriceFeed`] over the CryptoCompare `/data/price` endpoint.
    #[derive(Debug, Clone)]
    pub struct CryptoCompareFeed {
        http: Client,
        base_url: String,
    }

    impl CryptoCompareFeed {
        pub fn new(base_url: impl Into<String>) -> Result<Self, PriceFeedError> {
            let http = Client::builder()
                .build()
                .map_err(|e| PriceFeedError::Request(e.to_string()))?;

            Ok(Self {
                http,
                base_url: base_url.into(),
            })
        }

        #[inline]
        fn endpoint(&self) -> String {
            format!("{}/data/price", self.base_url.trim_end_matches('/'))
        }
    }

    impl Default for CryptoCompareFeed {
        fn default() -> Self {
            Self {
                http: Client::new(),
                base_url: DEFAULT_PRICE_FEED_URL.to_string(),
            }
        }
    }

    #[async_trait]
    impl UsdPriceFeed for CryptoCompareFeed {
        async fn get_usd_price(&self, symbol: &str) -> Result<f64, PriceFeedError> {
            let response = self
                .http
                .get(self.endpoint())
                .query(&[("fsym", symbol), ("tsyms", "USD")])
                .send()
                .await
                .map_err(|e| PriceFeedError::Request(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| PriceFeedError::Request(e.to_string()))?;

            if !status.is_success() {
                return Err(PriceFeedError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let price = parse_price_response(symbol, &body)?;
            debug!(symbol, price, "fetched USD price");
            Ok(price)
        }
    }

}
