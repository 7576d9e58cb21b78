pub mod document_encoder;
pub mod extraction_service;
pub mod tsv_export;

pub use document_encoder::{DocumentEncoder, EncodedDocument};
pub use extraction_service::{DocumentExtractor, ExtractionService, InlineDocument};
