pub mod http;
pub mod provider;
pub mod types;

pub use http::HttpGateway;
pub use provider::{GatewayError, RequestGateway};
pub use types::{GenerateRequest, GenerateResponse, Outcome};
