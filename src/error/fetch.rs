use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Explorer rejected the request: {0}")]
    Api(String),
    #[error("Failed to decode explorer payload: {0}")]
    Decode(String),
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),
    #[error("Invalid address for network {network}: {address}")]
    InvalidAddress { network: String, address: String },
}
