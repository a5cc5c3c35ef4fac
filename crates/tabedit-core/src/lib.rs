//! tabedit-core: Core library for editing tables stored as CSV, JSON or pickle
//!
//! This library provides functionality to:
//! - Detect a file's encoding from its suffix
//! - Decode CSV, JSON and pickle files into one in-memory table model
//! - Apply a batch of cell edits, all or nothing
//! - Encode the edited table into any supported encoding
//! - Drive a whole load → edit → write run through [`Pipeline`]

pub mod codec;
pub mod edit;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod table;
pub mod writer;

pub use codec::{CodecError, Encoding};
pub use edit::{apply_edits, Edit, EditError};
pub use error::{Error, Result, Role};
pub use loader::{create_placeholder, list_sibling_files, load_table};
pub use pipeline::{Pipeline, Stage};
pub use table::{CellValue, Row, Table};
pub use writer::write_table;
