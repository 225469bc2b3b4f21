pub mod client;
pub mod parser;
pub mod prompt;
pub mod types;

pub use client::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("Cannot reach the Gemini API at {0}")]
    Connection(String),

    #[error("Gemini API returned error (status {status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed advice response: {0}")]
    MalformedResponse(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
