//! Entity-to-backend mapping description.
//!
//! Adapters resolve nothing per call: each one is constructed with an
//! explicit [`TodoMapping`] naming the namespace (collection, key prefix,
//! or table), the id and text field names, and the id-generation strategy.
//! The mapping is validated once, at construction.

use crate::{Error, Result};

/// How a backend obtains record identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// The caller supplies the id on every save (hash backend).
    Provided,
    /// The store assigns the id on insert (relational backend).
    Generated,
    /// The caller may supply an id; the store generates one otherwise
    /// (document backend).
    ProvidedOrGenerated,
}

/// Field and namespace mapping for the todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoMapping {
    /// Collection, key prefix, or table the records live under.
    pub namespace: String,
    /// Name of the identifier field or column.
    pub id_field: String,
    /// Name of the text field or column.
    pub text_field: String,
    /// How identifiers are assigned.
    pub id_strategy: IdStrategy,
}

impl TodoMapping {
    /// Creates a validated mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any name is not a plain
    /// identifier.
    pub fn new(
        namespace: impl Into<String>,
        id_field: impl Into<String>,
        text_field: impl Into<String>,
        id_strategy: IdStrategy,
    ) -> Result<Self> {
        let mapping = Self {
            namespace: namespace.into(),
            id_field: id_field.into(),
            text_field: text_field.into(),
            id_strategy,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Default mapping for the document backend: collection `todo`,
    /// identifier at `_id`.
    #[must_use]
    pub fn document() -> Self {
        Self {
            namespace: "todo".to_string(),
            id_field: "_id".to_string(),
            text_field: "todo".to_string(),
            id_strategy: IdStrategy::ProvidedOrGenerated,
        }
    }

    /// Default mapping for the hash backend: keys under `todo:`, hash
    /// fields `id` and `todo`.
    #[must_use]
    pub fn hash() -> Self {
        Self {
            namespace: "todo".to_string(),
            id_field: "id".to_string(),
            text_field: "todo".to_string(),
            id_strategy: IdStrategy::Provided,
        }
    }

    /// Default mapping for the relational backend: table `todo`, columns
    /// `id` and `todo`.
    #[must_use]
    pub fn relational() -> Self {
        Self {
            namespace: "todo".to_string(),
            id_field: "id".to_string(),
            text_field: "todo".to_string(),
            id_strategy: IdStrategy::Generated,
        }
    }

    /// Checks every configured name.
    ///
    /// Adapters call this once in their constructors; names are trusted
    /// afterwards (they are interpolated into queries and key patterns).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        validate_name("namespace", &self.namespace)?;
        validate_name("id field", &self.id_field)?;
        validate_name("text field", &self.text_field)?;
        Ok(())
    }

    /// Builds the key-value store key for an id: `{namespace}:{id}`.
    #[must_use]
    pub fn key_for(&self, id: &str) -> String {
        format!("{}:{id}", self.namespace)
    }

    /// Builds the key pattern matching every record in the namespace.
    #[must_use]
    pub fn key_pattern(&self) -> String {
        format!("{}:*", self.namespace)
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_name(kind: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{kind} '{name}' is not a valid identifier"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        assert!(TodoMapping::document().validate().is_ok());
        assert!(TodoMapping::hash().validate().is_ok());
        assert!(TodoMapping::relational().validate().is_ok());
    }

    #[test]
    fn test_default_strategies() {
        assert_eq!(
            TodoMapping::document().id_strategy,
            IdStrategy::ProvidedOrGenerated
        );
        assert_eq!(TodoMapping::hash().id_strategy, IdStrategy::Provided);
        assert_eq!(
            TodoMapping::relational().id_strategy,
            IdStrategy::Generated
        );
    }

    #[test]
    fn test_key_layout() {
        let mapping = TodoMapping::hash();
        assert_eq!(mapping.key_for("TODO1"), "todo:TODO1");
        assert_eq!(mapping.key_pattern(), "todo:*");
    }

    #[test_case("" ; "empty")]
    #[test_case("1todo" ; "leading digit")]
    #[test_case("to-do" ; "dash")]
    #[test_case("to do" ; "space")]
    #[test_case("todo;drop" ; "statement separator")]
    fn test_invalid_namespace_rejected(namespace: &str) {
        let result = TodoMapping::new(namespace, "id", "todo", IdStrategy::Provided);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_field_names_rejected() {
        let result = TodoMapping::new("todo", "id field", "todo", IdStrategy::Provided);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = TodoMapping::new("todo", "id", "todo!", IdStrategy::Provided);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_identifier_names_accepted(name in "[A-Za-z_][A-Za-z0-9_]{0,30}") {
            prop_assert!(
                TodoMapping::new(name.clone(), name.clone(), name, IdStrategy::Provided).is_ok()
            );
        }

        #[test]
        fn prop_non_identifier_names_rejected(name in "[A-Za-z_]{1,8}[^A-Za-z0-9_]") {
            prop_assert!(matches!(
                TodoMapping::new(name, "id", "todo", IdStrategy::Provided),
                Err(Error::InvalidInput(_))
            ));
        }
    }
}
