//! OneMap Search Client
//!
//! A Rust client for the [OneMap](https://www.onemap.gov.sg/) elastic search
//! endpoint, used to resolve Singapore postal codes to street addresses.
//!
//! # Example
//!
//! ```no_run
//! use onemap_client::OneMapClient;
//!
//! # async fn example() -> onemap_client::Result<()> {
//! let client = OneMapClient::new()?;
//! let response = client.search("320078").await?;
//! if let Some(first) = response.results.first() {
//!     println!("{}", first.address);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::{OneMapClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{OneMapError, Result};
pub use types::{SearchResponse, SearchResult};
