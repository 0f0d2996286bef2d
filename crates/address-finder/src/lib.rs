//! Singapore address finder
//!
//! Resolves a 6-digit postal code through OneMap and pre-fills the
//! block/street and building fields of an address form.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod resolver;

pub use config::Config;
pub use controller::{LookupController, LookupState, TriggerOutcome};
pub use error::{AppError, Result};
pub use form::{AddressForm, Alert, FormFields, ValidationError};
pub use resolver::{AddressRecord, AddressResolver, LookupError, OneMapResolver};
