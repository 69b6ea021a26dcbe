//! SQL dialects: identifier quoting and placeholder syntax.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

/// Vendor-specific rendering rules.
pub trait Dialect: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Character that opens a quoted identifier.
    fn quote_char(&self) -> char;

    /// Character that closes a quoted identifier.
    fn close_quote_char(&self) -> char {
        self.quote_char()
    }

    /// Placeholder for the argument at 1-based `index`.
    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        let _ = index;
        Cow::Borrowed("?")
    }

    /// Append `ident` quoted, doubling any embedded closing quote character.
    fn quote_into(&self, buf: &mut String, ident: &str) {
        let close = self.close_quote_char();
        buf.push(self.quote_char());
        for c in ident.chars() {
            if c == close {
                buf.push(close);
            }
            buf.push(c);
        }
        buf.push(close);
    }
}

/// MySQL: backtick identifiers, `?` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }
}

/// SQLite: double-quoted identifiers, `?` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn quote_char(&self) -> char {
        '"'
    }
}

/// PostgreSQL: double-quoted identifiers, `$1`, `$2`, ... placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        Cow::Owned(format!("${index}"))
    }
}

/// Placeholder syntax of a [`CustomDialect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Question,
    /// `$1`, `$2`, ...
    Numbered,
}

/// A dialect assembled from a quote character and a placeholder style.
///
/// `[` quotes as `[ident]`; every other accepted character both opens and closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDialect {
    pub quote: char,
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
}

impl CustomDialect {
    /// Create a custom dialect, rejecting quote characters that would clash with
    /// placeholders, terminators or string literals, and brackets without a pair.
    pub fn new(quote: char, placeholder: PlaceholderStyle) -> OrmResult<Self> {
        let dialect = Self { quote, placeholder };
        dialect.validate()?;
        Ok(dialect)
    }

    pub fn validate(&self) -> OrmResult<()> {
        let q = self.quote;
        if !q.is_ascii_punctuation()
            || matches!(q, '?' | '$' | ';' | '\'' | ']' | '(' | ')' | '{' | '}' | '<' | '>')
        {
            return Err(OrmError::config(format!(
                "invalid identifier quote character {q:?}"
            )));
        }
        Ok(())
    }
}

impl Dialect for CustomDialect {
    fn name(&self) -> &str {
        "custom"
    }

    fn quote_char(&self) -> char {
        self.quote
    }

    fn close_quote_char(&self) -> char {
        match self.quote {
            '[' => ']',
            q => q,
        }
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        match self.placeholder {
            PlaceholderStyle::Question => Cow::Borrowed("?"),
            PlaceholderStyle::Numbered => Cow::Owned(format!("${index}")),
        }
    }
}

/// Serializable choice of dialect, as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[default]
    #[serde(rename = "mysql")]
    MySql,
    Sqlite,
    Postgres,
    Custom(CustomDialect),
}

impl DialectKind {
    pub fn validate(&self) -> OrmResult<()> {
        match self {
            DialectKind::Custom(custom) => custom.validate(),
            _ => Ok(()),
        }
    }

    /// Instantiate the dialect.
    pub fn into_dialect(self) -> OrmResult<Box<dyn Dialect>> {
        self.validate()?;
        Ok(match self {
            DialectKind::MySql => Box::new(MySql),
            DialectKind::Sqlite => Box::new(Sqlite),
            DialectKind::Postgres => Box::new(Postgres),
            DialectKind::Custom(custom) => Box::new(custom),
        })
    }
}
