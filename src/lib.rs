//! Compile a typed struct description into a JSON Schema (draft-07) document.
//!
//! ```
//! use json_struct_schema::{Struct, make};
//!
//! let user = Struct::object([
//!     ("name", Struct::string()),
//!     ("age", Struct::option(Struct::int())),
//! ]);
//! let doc = make(&user).unwrap();
//! assert_eq!(doc["required"], serde_json::json!(["name"]));
//! ```
pub mod codec;
pub mod config;
pub mod error;
pub mod fragment;
pub mod ir;
pub mod lower;
pub mod metadata;
pub mod path_de;
pub mod schema;

pub use config::Config;
pub use error::{ConversionError, ErrorCode};
pub use fragment::Fragment;
pub use ir::{Literal, Shape, Struct, UnknownKeys};
pub use lower::{SchemaNode, build_node};
pub use metadata::{Deprecation, Metadata, MetadataId};
pub use schema::{RAW_SCHEMA_ID, description, make, make_with, raw};
