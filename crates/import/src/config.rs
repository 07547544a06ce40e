use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use spendmap_core::category::{is_reserved, Category};
use spendmap_core::Field;
use std::fmt;
use thiserror::Error;

use crate::rules::RuleSet;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern '{pattern}' for category '{category}': {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Category name '{0}' is reserved")]
    ReservedName(String),
}

/// How a configured condition's pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Regular expression, case-sensitive.
    #[default]
    Matches,
    /// Literal substring, case-insensitive.
    Contains,
    /// Whole field equals the literal, case-insensitive.
    Equals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub field: Field,
    #[serde(default)]
    pub operator: Operator,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub category_name: String,
    pub conditions: Vec<ConditionSpec>,
}

/// The configuration document: explicit rules plus the category palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub rules: Vec<RuleSpec>,
    pub categories: Vec<Category>,
}

impl ConfigDocument {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = serde_json::from_str(json)?;
        doc.validate()
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = toml::from_str(toml_content)?;
        doc.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let names = self
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.rules.iter().map(|r| r.category_name.as_str()));
        for name in names {
            if is_reserved(name) {
                return Err(ConfigError::ReservedName(name.to_string()));
            }
        }
        Ok(self)
    }
}

/// Compiled configuration: the ordered rule list and the category palette.
#[derive(Debug, Clone)]
pub struct Config {
    pub rules: RuleSet,
    pub categories: Vec<Category>,
}

impl Config {
    pub fn new(document: ConfigDocument, patterns: &PatternTable) -> Result<Self, ConfigError> {
        let rules = RuleSet::compile(&document.rules, patterns)?;
        Ok(Self {
            rules,
            categories: document.categories,
        })
    }

    pub fn from_json(config_json: &str, patterns_json: &str) -> Result<Self, ConfigError> {
        let document = ConfigDocument::from_json(config_json)?;
        let patterns = PatternTable::from_json(patterns_json)?;
        Self::new(document, &patterns)
    }
}

/// Category name → ordered regex patterns, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternTable {
    entries: Vec<(String, Vec<String>)>,
}

impl PatternTable {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: PatternTable = serde_json::from_str(json)?;
        if let Some((name, _)) = table.entries.iter().find(|(name, _)| is_reserved(name)) {
            return Err(ConfigError::ReservedName(name.clone()));
        }
        Ok(table)
    }

    /// Sets the patterns of `category`. An existing entry keeps its position.
    pub fn insert(&mut self, category: &str, patterns: Vec<String>) {
        match self.entries.iter_mut().find(|(name, _)| name.as_str() == category) {
            Some(entry) => entry.1 = patterns,
            None => self.entries.push((category.to_string(), patterns)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, patterns)| (name.as_str(), patterns.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for PatternTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PatternTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to pattern lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut table = PatternTable::default();
                while let Some((category, patterns)) = map.next_entry::<String, Vec<String>>()? {
                    table.insert(&category, patterns);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_json() {
        let json = r##"{
            "rules": [
                {"categoryName": "Salary", "conditions": [
                    {"field": "sender", "operator": "contains", "pattern": "ACME"},
                    {"field": "subject", "pattern": "^Gehalt"}
                ]}
            ],
            "categories": [{"name": "Salary", "color": "#00ff00"}]
        }"##;
        let doc = ConfigDocument::from_json(json).unwrap();
        assert_eq!(doc.rules.len(), 1);
        assert_eq!(doc.rules[0].category_name, "Salary");
        assert_eq!(doc.rules[0].conditions[0].operator, Operator::Contains);
        assert_eq!(doc.rules[0].conditions[1].operator, Operator::Matches);
        assert_eq!(doc.rules[0].conditions[1].field, Field::Subject);
        assert_eq!(doc.categories, vec![Category::new("Salary", "#00ff00")]);
    }

    #[test]
    fn config_from_toml() {
        let toml = r##"
            [[rules]]
            categoryName = "Rent"
            conditions = [{ field = "subject", pattern = "Miete" }]

            [[categories]]
            name = "Rent"
            color = "red"
        "##;
        let doc = ConfigDocument::from_toml(toml).unwrap();
        assert_eq!(doc.rules[0].category_name, "Rent");
        assert_eq!(doc.categories[0].color, "red");
    }

    #[test]
    fn config_missing_keys_is_error() {
        assert!(matches!(
            ConfigDocument::from_json(r#"{"rules": []}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(ConfigDocument::from_json(r#"{"categories": []}"#).is_err());
        assert!(ConfigDocument::from_json("not json").is_err());
        assert!(ConfigDocument::from_json("").is_err());
    }

    #[test]
    fn config_unknown_field_or_operator_is_error() {
        let bad_field = r#"{"rules": [{"categoryName": "X", "conditions": [{"field": "memo", "pattern": "a"}]}], "categories": []}"#;
        assert!(ConfigDocument::from_json(bad_field).is_err());

        let bad_operator = r#"{"rules": [{"categoryName": "X", "conditions": [{"field": "sender", "operator": "like", "pattern": "a"}]}], "categories": []}"#;
        assert!(ConfigDocument::from_json(bad_operator).is_err());
    }

    #[test]
    fn config_rejects_reserved_names() {
        let json = r#"{"rules": [], "categories": [{"name": "_default", "color": "grey"}]}"#;
        assert!(matches!(
            ConfigDocument::from_json(json),
            Err(ConfigError::ReservedName(_))
        ));

        let json = r#"{"rules": [{"categoryName": "_default", "conditions": []}], "categories": []}"#;
        assert!(ConfigDocument::from_json(json).is_err());
    }

    #[test]
    fn config_puts_explicit_rules_first() {
        let config = Config::from_json(
            r#"{"rules": [{"categoryName": "Salary", "conditions": [{"field": "sender", "pattern": "ACME"}]}],
                "categories": [{"name": "Salary", "color": "green"}]}"#,
            r#"{"Groceries": ["SUPERMART", "BAKERY"]}"#,
        )
        .unwrap();
        let order: Vec<_> = config.rules.rules().iter().map(|r| r.category_name()).collect();
        assert_eq!(order, vec!["Salary", "Groceries", "Groceries"]);
        assert_eq!(config.categories.len(), 1);
    }

    #[test]
    fn pattern_table_keeps_document_order() {
        let table = PatternTable::from_json(
            r#"{"Zoo": ["z1", "z2"], "Alpha": ["a1"], "Mid": []}"#,
        )
        .unwrap();
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zoo", "Alpha", "Mid"]);
        let zoo: Vec<_> = table.iter().next().unwrap().1.to_vec();
        assert_eq!(zoo, vec!["z1", "z2"]);
    }

    #[test]
    fn pattern_table_duplicate_key_replaces_in_place() {
        let table = PatternTable::from_json(r#"{"A": ["1"], "B": ["2"], "A": ["3"]}"#).unwrap();
        let entries: Vec<_> = table.iter().map(|(n, p)| (n, p.to_vec())).collect();
        assert_eq!(
            entries,
            vec![("A", vec!["3".to_string()]), ("B", vec!["2".to_string()])]
        );
    }

    #[test]
    fn pattern_table_rejects_wrong_shape() {
        assert!(PatternTable::from_json(r#"["SUPERMART"]"#).is_err());
        assert!(PatternTable::from_json(r#"{"A": "SUPERMART"}"#).is_err());
        assert!(PatternTable::from_json(r#"{"_default": ["x"]}"#).is_err());
    }
}
