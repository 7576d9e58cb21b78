pub mod pdf_loader;

pub use pdf_loader::{scan_input_folder, select_paths, select_pdf_files, FileSelection, IGNORED_NOTICE};
