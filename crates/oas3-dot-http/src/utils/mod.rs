pub mod refs;
pub mod schema_ext;
pub mod spec;

pub(crate) use refs::parse_schema_ref_path;
pub(crate) use schema_ext::SchemaExt;
