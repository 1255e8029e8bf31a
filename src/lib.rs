//! Schema Kit
//!
//! JSON Pointer addressing and JSON Schema merging over `serde_json` values.
//!
//! The [`pointer`] module reads, writes and walks nested documents through
//! RFC 6901 pointers, with conditional keys such as `/users/role==admin/name`.
//! It also translates pointers between a data instance and the schema that
//! describes it. [`merge_schemas`] folds several schema fragments into one
//! equivalent schema, keyword by keyword.
//!
//! # Example
//!
//! ```
//! use schema_kit::{merge_schemas, pointer};
//! use serde_json::json;
//!
//! let merged = merge_schemas(&[
//!     json!({ "type": "object", "properties": { "name": { "type": "string" } } }),
//!     json!({ "properties": { "name": { "maxLength": 20 } }, "required": ["name"] }),
//! ])
//! .unwrap();
//!
//! assert_eq!(
//!     pointer::get(&merged, "/properties/name").unwrap(),
//!     &json!({ "type": "string", "maxLength": 20 })
//! );
//! assert_eq!(pointer::to_data_pointer("/properties/name", &merged).unwrap(), "/name");
//! ```
//!
//! # Merge fallback
//!
//! | Conflict | Result |
//! |----------|--------|
//! | combinable keyword (`minimum`, `required`, `properties`, ...) | one merged schema |
//! | irreconcilable keyword (`type: string` vs `type: number`) | `{"allOf": [fragments...]}` |
//! | non-object fragment | `Err(MergeError::NotAnObject)` |

mod diagnostics;
mod error;
mod loader;
mod merge;
pub mod pointer;
mod types;
mod validator;

pub use diagnostics::{CollectingReporter, ReportExt, Reporter, TracingReporter};
pub use error::{LoadError, MergeError, PointerError, SchemaError, ValidateError};
pub use loader::{is_url, load_document, load_document_auto, load_document_str, load_documents};
pub use merge::merge_schemas;
pub use pointer::Pointer;
pub use types::{common_items, is_empty, is_truthy, json_type_name, unique_items};
pub use validator::{validate, validate_against_schema};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
