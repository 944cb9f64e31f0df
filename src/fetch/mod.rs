//! Page fetching and text extraction

mod extract;
mod fetcher;
mod traits;

pub use extract::{clean_text, extractor_for, Extractor, ReadabilityExtractor, TagStripExtractor};
pub use fetcher::HttpFetcher;
pub use traits::FetchExtractProvider;
