use crate::accessor::AccessorStrategy;
use crate::dialect::{CustomDialect, DialectKind};
use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};

/// Which model registry a [`Db`](super::Db) uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryScope {
    /// The process-wide registry.
    #[default]
    Global,
    /// A registry owned by this `Db`.
    Isolated,
}

/// Configuration for [`Db`](super::Db).
///
/// Built in code or read from TOML:
///
/// ```toml
/// dialect = "postgres"
/// accessor = "reflective"
/// registry = "isolated"
/// log_statements = true
/// max_logged_sql = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// SQL dialect.
    pub dialect: DialectKind,
    /// Value accessor strategy.
    pub accessor: AccessorStrategy,
    /// Model registry scope.
    pub registry: RegistryScope,
    /// Whether to log executed statements.
    pub log_statements: bool,
    /// Truncate logged SQL (in chars). `None` means no truncation.
    pub max_logged_sql: Option<usize>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::MySql,
            accessor: AccessorStrategy::Direct,
            registry: RegistryScope::Global,
            log_statements: false,
            max_logged_sql: Some(200),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> OrmResult<Self> {
        let config: DbConfig =
            toml::from_str(s).map_err(|e| OrmError::config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the SQL dialect.
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Use a custom dialect.
    pub fn custom_dialect(mut self, dialect: CustomDialect) -> Self {
        self.dialect = DialectKind::Custom(dialect);
        self
    }

    /// Set the value accessor strategy.
    pub fn accessor(mut self, strategy: AccessorStrategy) -> Self {
        self.accessor = strategy;
        self
    }

    /// Use a registry owned by the `Db` instead of the process-wide one.
    pub fn isolated_registry(mut self) -> Self {
        self.registry = RegistryScope::Isolated;
        self
    }

    /// Enable statement logging.
    pub fn with_logging(mut self) -> Self {
        self.log_statements = true;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }

    pub fn validate(&self) -> OrmResult<()> {
        self.dialect.validate()?;
        if self.max_logged_sql == Some(0) {
            return Err(OrmError::config("max_logged_sql must be positive"));
        }
        Ok(())
    }
}
