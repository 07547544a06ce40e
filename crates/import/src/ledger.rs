use chrono::NaiveDate;
use serde::Serialize;
use spendmap_core::{parse_locale_number, AmountError, TransactionRecord};
use std::io::Read;
use thiserror::Error;

const DATE_COLUMN: usize = 0;
const SENDER_COLUMN: usize = 2;
const SUBJECT_COLUMN: usize = 5;
const AMOUNT_COLUMN: usize = 8;
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Failure of the ledger as a whole.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Unreadable ledger: {0}")]
    Unreadable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
/// Failure of a single ledger line. The line is skipped, the rest still loads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("Missing field {index} (line has {found} fields)")]
    MissingField { index: usize, found: usize },
    #[error("Malformed date: '{0}'")]
    MalformedDate(String),
    #[error(transparent)]
    MalformedNumber(#[from] AmountError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number in the source text.
    pub line: u64,
    #[serde(serialize_with = "serialize_display")]
    pub error: LineError,
}

fn serialize_display<S: serde::Serializer>(error: &LineError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub records: Vec<TransactionRecord>,
    pub rejected: Vec<RejectedLine>,
}

/// Loads a `;`-separated ledger export. The first physical line is the
/// header and is always dropped, even when blank. Blank data lines are
/// skipped; lines that fail to parse are reported in [`Ledger::rejected`] and
/// left out of [`Ledger::records`]. Quotes carry no meaning: every `;`
/// separates fields.
pub fn load_ledger(text: &str) -> Result<Ledger, LedgerError> {
    if text.is_empty() {
        return Err(LedgerError::Unreadable("missing header line".to_string()));
    }
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .delimiter(b';')
        .from_reader(body.as_bytes());

    let mut ledger = Ledger::default();
    for result in reader.records() {
        let record = result?;

        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        // Positions count from the line after the header.
        let line = record.position().map_or(0, |p| p.line() + 1);
        match parse_line(&record) {
            Ok(tx) => ledger.records.push(tx),
            Err(error) => {
                tracing::warn!("Skipping ledger line {line}: {error}");
                ledger.rejected.push(RejectedLine { line, error });
            }
        }
    }

    tracing::debug!(
        "Loaded {} ledger records, rejected {}",
        ledger.records.len(),
        ledger.rejected.len()
    );
    Ok(ledger)
}

pub fn read_ledger<R: Read>(mut data: R) -> Result<Ledger, LedgerError> {
    let mut text = String::new();
    data.read_to_string(&mut text)?;
    load_ledger(&text)
}

fn parse_line(record: &csv::StringRecord) -> Result<TransactionRecord, LineError> {
    let field = |index: usize| {
        record.get(index).ok_or(LineError::MissingField {
            index,
            found: record.len(),
        })
    };

    let date = parse_date(field(DATE_COLUMN)?)?;
    let sender = field(SENDER_COLUMN)?.to_string();
    let subject = field(SUBJECT_COLUMN)?.to_string();
    // The export books debits as positive amounts; inflows are positive here.
    let value = -parse_locale_number(field(AMOUNT_COLUMN)?)?;

    Ok(TransactionRecord {
        date,
        sender,
        subject,
        value,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, LineError> {
    let s = s.trim();
    if s.len() != 10 {
        return Err(LineError::MalformedDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| LineError::MalformedDate(s.to_string()))
}
