pub mod errors;
pub mod ping_schema;
pub mod types;

pub use errors::SchemaError;
pub use ping_schema::PingSchema;
pub use types::FieldType;
