use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace requires at least one target address")]
    NoTargets,
    #[error("Malformed target address: {0:?}")]
    InvalidAddress(String),
    #[error("Requested {requested} hops, maximum is {max}")]
    TooManyHops { requested: usize, max: usize },
}
