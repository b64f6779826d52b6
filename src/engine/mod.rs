pub mod errors;
pub mod ping;
pub mod rollup;
pub mod schema;
pub mod types;

pub use errors::*;
