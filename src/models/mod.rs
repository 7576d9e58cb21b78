pub mod extraction_result;
pub mod loaders;
pub mod record;
pub mod source_file;

pub use extraction_result::{ExtractionResult, ExtractionState, ExtractionStatus, FAILED_MESSAGE};
pub use loaders::{scan_input_folder, select_paths, select_pdf_files, FileSelection};
pub use record::{ExtractedRecord, RecordField, NOT_AVAILABLE};
pub use source_file::{SourceFile, PDF_MEDIA_TYPE};
