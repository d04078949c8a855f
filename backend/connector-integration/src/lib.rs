//! Gateway connectors for the vendor payment subsystem.
//!
//! Each connector translates the vendor domain records into its gateway's
//! request/response protocol and reconciles the responses back into local
//! payment and receipt state.

pub mod configs;
pub mod connectors;
pub mod types;

pub use configs::MerchantConfig;
pub use connectors::authorizenet::AuthorizeNetProcessor;
