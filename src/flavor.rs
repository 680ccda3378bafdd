//! SQL Flavor：内置的几种方言实现。

use crate::dialect::{Dialect, quote_ident_with};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    SQLServer,
    Oracle,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
            Self::Oracle => "Oracle",
        };
        f.write_str(s)
    }
}

impl Flavor {
    fn quote_char(self) -> char {
        match self {
            Self::MySQL => '`',
            Self::PostgreSQL | Self::SQLite | Self::SQLServer | Self::Oracle => '"',
        }
    }
}

impl Dialect for Flavor {
    fn quote_ident(&self, name: &str) -> String {
        quote_ident_with(name, self.quote_char())
    }

    fn placeholder(&self, index: usize) -> String {
        match self {
            Self::MySQL | Self::SQLite => "?".to_string(),
            Self::PostgreSQL => format!("${index}"),
            Self::SQLServer => format!("@p{index}"),
            Self::Oracle => format!(":{index}"),
        }
    }
}
