pub mod extractor;
pub mod repositories;
