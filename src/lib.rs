//! Core of `htup`: dispatching HTTP requests into a uniform [`RequestResult`]
//! and persisting endpoint definitions as JSON files in a project directory.

pub mod config;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod media;
pub mod response;
pub mod store;

pub use config::Config;
pub use endpoint::{EndpointDefinition, Method};
pub use error::{Error, Result};
pub use http::HttpClient;
pub use response::{RequestResult, ResponseBody};
