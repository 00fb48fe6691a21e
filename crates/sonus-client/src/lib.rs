pub mod config;
pub mod fixture;
pub mod http;

pub use config::ApiConfig;
pub use fixture::{FixtureApi, FixtureError};
pub use http::HttpApi;
