use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The text fields a rule condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Sender,
    Subject,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Sender => write!(f, "sender"),
            Field::Subject => write!(f, "subject"),
        }
    }
}

/// One ledger line. Inflows are positive, outflows negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub sender: String,
    pub subject: String,
    pub value: f64,
}

impl TransactionRecord {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Sender => &self.sender,
            Field::Subject => &self.subject,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.value > 0.0
    }
}

/// Keeps only records with a strictly positive value, in their original order.
pub fn inflows(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    records.into_iter().filter(TransactionRecord::is_inflow).collect()
}

/// A record together with the category it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    record: TransactionRecord,
    category_name: String,
}

impl ClassifiedRecord {
    pub fn new(record: TransactionRecord, category_name: impl Into<String>) -> Self {
        ClassifiedRecord {
            record,
            category_name: category_name.into(),
        }
    }

    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    pub fn value(&self) -> f64 {
        self.record.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(sender: &str, subject: &str, value: f64) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sender: sender.to_string(),
            subject: subject.to_string(),
            value,
        }
    }

    #[test]
    fn field_accessor_dispatches() {
        let r = make_record("SUPERMART", "Weekly shop", 10.0);
        assert_eq!(r.field(Field::Sender), "SUPERMART");
        assert_eq!(r.field(Field::Subject), "Weekly shop");
    }

    #[test]
    fn field_deserializes_lowercase() {
        let f: Field = serde_json::from_str("\"subject\"").unwrap();
        assert_eq!(f, Field::Subject);
        assert!(serde_json::from_str::<Field>("\"memo\"").is_err());
    }

    #[test]
    fn field_display() {
        assert_eq!(Field::Sender.to_string(), "sender");
    }

    #[test]
    fn inflows_drops_zero_and_negative() {
        let records = vec![
            make_record("a", "", 5.0),
            make_record("b", "", 0.0),
            make_record("c", "", -3.0),
            make_record("d", "", 0.01),
        ];
        let kept = inflows(records);
        let senders: Vec<_> = kept.iter().map(|r| r.sender.as_str()).collect();
        assert_eq!(senders, vec!["a", "d"]);
    }

    #[test]
    fn classified_record_keeps_original_fields() {
        let original = make_record("SUPERMART", "Weekly shop", 100.0);
        let classified = ClassifiedRecord::new(original.clone(), "Groceries");
        assert_eq!(classified.record(), &original);
        assert_eq!(classified.category_name(), "Groceries");
        assert_eq!(classified.value(), 100.0);
        assert_eq!(classified.date(), original.date);
    }

    #[test]
    fn classified_record_serializes_flat() {
        let classified = ClassifiedRecord::new(make_record("S", "T", 1.5), "Food");
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["sender"], "S");
        assert_eq!(json["category_name"], "Food");
        assert_eq!(json["date"], "2024-03-01");
    }
}
