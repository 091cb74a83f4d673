//! Errors raised while loading inputs. The layout pipeline itself does not fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown region {0:?}")]
pub struct UnknownRegion(pub String);
