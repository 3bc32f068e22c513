use std::fmt;
use std::str::FromStr;

use pg_escape::quote_identifier;
use thiserror::Error;

/// Schema used when a configured table name is not qualified.
pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableNameError {
    #[error("table name is empty")]
    Empty,
    #[error("invalid table name `{0}`, expected `table` or `schema.table`")]
    Malformed(String),
}

/// A schema-qualified Postgres table name.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TableName {
    pub schema: String,
    pub name: String,
}

impl TableName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> TableName {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Returns `"schema"."table"` quoted according to Postgres identifier rules.
    pub fn as_quoted_identifier(&self) -> String {
        let quoted_schema = quote_identifier(&self.schema);
        let quoted_name = quote_identifier(&self.name);

        format!("{quoted_schema}.{quoted_name}")
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

impl FromStr for TableName {
    type Err = TableNameError;

    /// Parses `table` (in [`DEFAULT_SCHEMA`]) or `schema.table`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TableNameError::Empty);
        }

        match s.split_once('.') {
            None => Ok(TableName::new(DEFAULT_SCHEMA, s)),
            Some((schema, name))
                if !schema.is_empty() && !name.is_empty() && !name.contains('.') =>
            {
                Ok(TableName::new(schema, name))
            }
            Some(_) => Err(TableNameError::Malformed(s.to_string())),
        }
    }
}
