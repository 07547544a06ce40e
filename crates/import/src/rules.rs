use regex::{Regex, RegexBuilder};
use spendmap_core::{ClassifiedRecord, Field, TransactionRecord, FALLBACK_CATEGORY};

use crate::config::{ConditionSpec, ConfigError, Operator, PatternTable, RuleSpec};

#[derive(Debug, Clone)]
pub struct Condition {
    field: Field,
    pattern: Regex,
}

impl Condition {
    pub fn new(field: Field, pattern: Regex) -> Self {
        Self { field, pattern }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.pattern.is_match(record.field(self.field))
    }
}

/// A category together with the conditions that select it. Any single
/// matching condition is enough.
#[derive(Debug, Clone)]
pub struct Rule {
    category_name: String,
    conditions: Vec<Condition>,
}

impl Rule {
    pub fn new(category_name: &str, conditions: Vec<Condition>) -> Self {
        Self {
            category_name: category_name.to_string(),
            conditions,
        }
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.conditions.iter().any(|c| c.matches(record))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    Matched(&'a str),
    Unmatched,
}

impl<'a> Classification<'a> {
    /// The matched category, or [`FALLBACK_CATEGORY`].
    pub fn category_name(self) -> &'a str {
        match self {
            Classification::Matched(name) => name,
            Classification::Unmatched => FALLBACK_CATEGORY,
        }
    }
}

/// Ordered rule list. Earlier rules win; position is the only priority.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Builds the rule list: configured rules first, in their order, then one
    /// rule per (category, pattern) of the table, testing both sender and
    /// subject case-insensitively.
    pub fn compile(configured: &[RuleSpec], patterns: &PatternTable) -> Result<Self, ConfigError> {
        let mut rules = configured
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;

        for (category, list) in patterns.iter() {
            for pattern in list {
                rules.push(synthesize_rule(category, pattern)?);
            }
        }

        tracing::debug!(
            "Compiled {} rules ({} configured, {} from pattern table)",
            rules.len(),
            configured.len(),
            rules.len() - configured.len()
        );
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn classify(&self, record: &TransactionRecord) -> Classification<'_> {
        self.rules
            .iter()
            .find(|rule| rule.matches(record))
            .map_or(Classification::Unmatched, |rule| {
                Classification::Matched(rule.category_name())
            })
    }

    pub fn categorise(&self, record: TransactionRecord) -> ClassifiedRecord {
        let category = self.classify(&record).category_name().to_string();
        ClassifiedRecord::new(record, category)
    }

    pub fn categorise_all(&self, records: Vec<TransactionRecord>) -> Vec<ClassifiedRecord> {
        records.into_iter().map(|r| self.categorise(r)).collect()
    }
}

fn compile_rule(spec: &RuleSpec) -> Result<Rule, ConfigError> {
    let conditions = spec
        .conditions
        .iter()
        .map(|c| compile_condition(c, &spec.category_name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Rule::new(&spec.category_name, conditions))
}

fn compile_condition(spec: &ConditionSpec, category: &str) -> Result<Condition, ConfigError> {
    let builder = match spec.operator {
        Operator::Matches => RegexBuilder::new(&spec.pattern),
        Operator::Contains => {
            let mut b = RegexBuilder::new(&regex::escape(&spec.pattern));
            b.case_insensitive(true);
            b
        }
        Operator::Equals => {
            let mut b = RegexBuilder::new(&format!("^{}$", regex::escape(&spec.pattern)));
            b.case_insensitive(true);
            b
        }
    };
    let pattern = build(&builder, category, &spec.pattern)?;
    Ok(Condition::new(spec.field, pattern))
}

fn synthesize_rule(category: &str, pattern: &str) -> Result<Rule, ConfigError> {
    let regex = build(
        RegexBuilder::new(pattern).case_insensitive(true).unicode(true),
        category,
        pattern,
    )?;
    Ok(Rule::new(
        category,
        vec![
            Condition::new(Field::Sender, regex.clone()),
            Condition::new(Field::Subject, regex),
        ],
    ))
}

fn build(builder: &RegexBuilder, category: &str, pattern: &str) -> Result<Regex, ConfigError> {
    builder.build().map_err(|source| ConfigError::InvalidPattern {
        category: category.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}
