//! Remote entity gateway. Translates launch records into advertising API
//! wire shapes and normalizes bulk responses into per-row outcomes.

pub mod gateway;
pub mod transport;
pub mod wire;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use gateway::{AdsGateway, BulkOutcome, EntityKind};
pub use transport::{AdsTransport, ApiRequest, ApiResponse, HttpMethod, HttpTransport};
