//! SQL dialect support

use sqlparser::dialect::{BigQueryDialect, Dialect, GenericDialect, PostgreSqlDialect, SnowflakeDialect};
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    /// The warehouse Dataform targets by default
    #[default]
    BigQuery,
    Snowflake,
    PostgreSQL,
    Generic,
}

impl SqlDialect {
    /// Get the sqlparser dialect for parsing
    pub fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
            SqlDialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            SqlDialect::Generic => Box::new(GenericDialect {}),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bigquery" | "bq" => Ok(SqlDialect::BigQuery),
            "snowflake" => Ok(SqlDialect::Snowflake),
            "postgresql" | "postgres" | "pg" => Ok(SqlDialect::PostgreSQL),
            "generic" | "ansi" => Ok(SqlDialect::Generic),
            _ => Err(format!(
                "Unknown dialect: '{}'. Supported dialects: bigquery, snowflake, postgresql, generic.",
                s
            )),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::BigQuery => write!(f, "bigquery"),
            SqlDialect::Snowflake => write!(f, "snowflake"),
            SqlDialect::PostgreSQL => write!(f, "postgresql"),
            SqlDialect::Generic => write!(f, "generic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("BigQuery".parse::<SqlDialect>(), Ok(SqlDialect::BigQuery));
        assert_eq!("pg".parse::<SqlDialect>(), Ok(SqlDialect::PostgreSQL));
        assert!("oracle".parse::<SqlDialect>().is_err());
        assert_eq!(SqlDialect::default().to_string(), "bigquery");
    }
}
