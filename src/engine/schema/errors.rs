use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Schema declares no fields
    EmptySchema,

    /// A column the rollup depends on is absent from the descriptor
    MissingColumn(String),

    /// A declared column has a type the consumer cannot handle
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// A row carried a value whose JSON type contradicts the declared type
    ValueTypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Unrecognized type name in a schema file
    UnknownType { column: String, type_name: String },

    /// Column name collides with a derived or key column
    ReservedColumn(String),

    /// Two registry entries share the same output column
    DuplicateOutputColumn(String),

    /// Failed to read a schema file
    IoReadFailed(String),

    /// Failed to parse a schema file
    ParseFailed(String),
}

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::IoReadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SchemaError {
    fn from(err: toml::de::Error) -> Self {
        SchemaError::ParseFailed(err.to_string())
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptySchema => write!(f, "Schema cannot be empty"),
            SchemaError::MissingColumn(c) => write!(f, "Required column '{}' is missing", c),
            SchemaError::TypeMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "Column '{}' has type {} but {} is required",
                column, found, expected
            ),
            SchemaError::ValueTypeMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "Value of column '{}' is {} but the schema declares {}",
                column, found, expected
            ),
            SchemaError::UnknownType { column, type_name } => {
                write!(f, "Unknown type '{}' for column '{}'", type_name, column)
            }
            SchemaError::ReservedColumn(c) => write!(f, "Column name '{}' is reserved", c),
            SchemaError::DuplicateOutputColumn(c) => {
                write!(f, "Output column '{}' is declared more than once", c)
            }
            SchemaError::IoReadFailed(e) => write!(f, "I/O read error: {}", e),
            SchemaError::ParseFailed(e) => write!(f, "Schema parse error: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {}
