//! Postal code to address resolution

use async_trait::async_trait;
use onemap_client::{OneMapClient, SearchResponse};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Normalized result of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub block_number: String,
    pub street_name: String,
    /// `"NIL"` upstream when the address has no building name
    pub building_name: String,
    pub full_address: String,
    pub postal_code: String,
}

/// Why a lookup produced no address
#[derive(Debug)]
pub enum LookupError {
    /// Network, HTTP status or payload failure
    Transport(String),
    /// The provider answered but reported zero matches
    NotFound,
}

impl LookupError {
    pub const NOT_FOUND_MESSAGE: &'static str = "No address found for this postal code";
    pub const TRANSPORT_MESSAGE: &'static str = "Failed to fetch address information";

    /// Fixed message shown to the user; never includes provider detail
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transport(_) => Self::TRANSPORT_MESSAGE,
            Self::NotFound => Self::NOT_FOUND_MESSAGE,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "Transport error: {detail}"),
            Self::NotFound => write!(f, "No matching address"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<onemap_client::OneMapError> for LookupError {
    fn from(err: onemap_client::OneMapError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Resolves a 6-digit postal code to an address.
///
/// Implementations make at most one outbound call per invocation and do not
/// re-validate the code; that happens in the form before submission.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, postal_code: &str) -> Result<AddressRecord, LookupError>;
}

/// Resolver backed by the OneMap search API
pub struct OneMapResolver {
    client: OneMapClient,
}

impl OneMapResolver {
    pub fn new(client: OneMapClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressResolver for OneMapResolver {
    async fn resolve(&self, postal_code: &str) -> Result<AddressRecord, LookupError> {
        let response = self.client.search(postal_code).await.map_err(|e| {
            warn!(postal_code, error = %e, "Error fetching address");
            LookupError::from(e)
        })?;

        let record = address_from_response(&response)?;
        debug!(postal_code, address = %record.full_address, "Resolved postal code");
        Ok(record)
    }
}

/// Map the first provider match onto an [`AddressRecord`], field for field
pub fn address_from_response(response: &SearchResponse) -> Result<AddressRecord, LookupError> {
    let first = response.first_match().ok_or(LookupError::NotFound)?;

    Ok(AddressRecord {
        block_number: first.block_number.clone(),
        street_name: first.road_name.clone(),
        building_name: first.building.clone(),
        full_address: first.address.clone(),
        postal_code: first.postal.clone(),
    })
}
