//! Utility modules shared by the ingestion and selection stages

pub mod keyword;
pub mod url;

pub use keyword::{KeywordList, normalize};
pub use url::UrlUtils;
