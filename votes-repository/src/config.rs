//! Configuration types for the votes repository.

use crate::errors::VotesRepositoryError;

/// Environment variable overriding the votes table name.
pub const VOTES_TABLE_ENV: &str = "VOTES_TABLE";

/// Environment variable overriding the voter foreign-key column.
pub const VOTER_FOREIGN_KEY_ENV: &str = "VOTES_VOTER_FOREIGN_KEY";

/// Names of the votes table and of its voter foreign-key column.
///
/// Both names end up verbatim in SQL, so they are validated as plain
/// identifiers once, when the configuration is built, and never looked up
/// again per call. The shipped migration creates the default names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotesConfig {
    /// Table holding one row per (voter, votable) pair. Defaults to `votes`.
    pub votes_table: String,
    /// Column referencing the voter. Defaults to `user_id`.
    pub voter_foreign_key: String,
}

impl Default for VotesConfig {
    fn default() -> Self {
        Self {
            votes_table: "votes".to_string(),
            voter_foreign_key: "user_id".to_string(),
        }
    }
}

impl VotesConfig {
    /// Create a config with a custom table name.
    pub fn with_table(mut self, votes_table: impl Into<String>) -> Self {
        self.votes_table = votes_table.into();
        self
    }

    /// Create a config with a custom voter foreign-key column.
    pub fn with_voter_foreign_key(mut self, voter_foreign_key: impl Into<String>) -> Self {
        self.voter_foreign_key = voter_foreign_key.into();
        self
    }

    /// Reads `VOTES_TABLE` and `VOTES_VOTER_FOREIGN_KEY`, falling back to the
    /// defaults for unset variables, and validates the result.
    ///
    /// # Returns
    ///
    /// * `Ok(VotesConfig)` - A validated configuration
    /// * `Err(VotesRepositoryError::InvalidIdentifier)` - A name is not a plain SQL identifier
    pub fn from_env() -> Result<Self, VotesRepositoryError> {
        let mut config = Self::default();
        if let Ok(table) = std::env::var(VOTES_TABLE_ENV) {
            config.votes_table = table;
        }
        if let Ok(foreign_key) = std::env::var(VOTER_FOREIGN_KEY_ENV) {
            config.voter_foreign_key = foreign_key;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that both names are plain SQL identifiers.
    pub fn validate(&self) -> Result<(), VotesRepositoryError> {
        validate_identifier(&self.votes_table)?;
        validate_identifier(&self.voter_foreign_key)
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`, optionally qualified with dots
/// (`schema.table`, `alias.column`).
pub(crate) fn validate_identifier(name: &str) -> Result<(), VotesRepositoryError> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(VotesRepositoryError::InvalidIdentifier(name.to_string()))
    }
}
