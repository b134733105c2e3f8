use thiserror::Error;

// The in-memory store itself cannot fail; this variant exists for the
// durable-mirror seam so callers keep a uniform Result surface.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Persistence mirror rejected the write: {0}")]
    Mirror(String),
}
