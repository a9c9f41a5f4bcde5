//! Bank CSV import
//!
//! Parses bank exports (with or without a header row), hashes every row for
//! duplicate detection, categorises rows with the household's rules and
//! records the upload as an [`ImportRecord`].

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AccountId, Direction, HouseholdId, ImportId, ImportRecord, Money, Transaction,
};
use crate::services::rules::RuleMatcher;
use crate::storage::Storage;

const DESCRIPTION_HEADERS: &[&str] = &["Description", "Transaction Description", "Details", "Particulars"];
const AMOUNT_HEADERS: &[&str] = &["Amount"];
const DEBIT_HEADERS: &[&str] = &["Debit", "Debit Amount"];
const CREDIT_HEADERS: &[&str] = &["Credit", "Credit Amount"];
const DATE_HEADERS: &[&str] = &["Date", "Transaction Date", "Value Date"];
const EXTERNAL_ID_HEADERS: &[&str] = &["ID", "Reference", "Receipt Number"];

const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Fields that identify a transaction for duplicate detection
#[derive(Debug, Clone)]
pub struct DedupeInput<'a> {
    pub household_id: HouseholdId,
    pub account_id: Option<AccountId>,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: &'a str,
    pub direction: Direction,
}

/// SHA-256 hex digest identifying a transaction.
///
/// The digest covers household, account (or `no-account`), ISO date, the
/// absolute amount with two decimals, the trimmed lower-cased description and
/// the direction, joined with `|`.
pub fn transaction_hash(input: &DedupeInput<'_>) -> String {
    let account = input
        .account_id
        .map(|id| id.as_uuid().to_string())
        .unwrap_or_else(|| "no-account".to_string());

    let payload = [
        input.household_id.as_uuid().to_string(),
        account,
        input.date.format("%Y-%m-%d").to_string(),
        input.amount.abs().to_plain_string(),
        input.description.trim().to_lowercase(),
        input.direction.as_str().to_string(),
    ]
    .join("|");

    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// SHA-256 hex digest of raw file content
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// One successfully parsed CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based row number in the file
    pub row_number: usize,
    pub date: NaiveDate,
    pub description: String,
    /// Absolute amount
    pub amount: Money,
    pub direction: Direction,
    pub external_id: Option<String>,
}

/// A row that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

/// Outcome of importing one file
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub import_id: ImportId,
    /// Rows inserted as new transactions
    pub imported: usize,
    /// Rows skipped because the household already had them
    pub duplicates: usize,
    /// Rows that failed to parse
    pub errors: Vec<RowError>,
    /// Rows parsed successfully
    pub total: usize,
    /// Rows that a rule assigned to a category
    pub categorised: usize,
    pub checksum: String,
}

/// Column positions resolved from a header row
#[derive(Debug, Clone, Default)]
struct Columns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
    external_id: Option<usize>,
}

impl Columns {
    /// Headerless exports are `date, amount, description`
    fn headerless() -> Self {
        Self {
            date: Some(0),
            amount: Some(1),
            description: Some(2),
            ..Self::default()
        }
    }

    fn from_headers(headers: &StringRecord) -> Self {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| index.get(&alias.to_lowercase()).copied())
        };

        Self {
            date: find(DATE_HEADERS),
            description: find(DESCRIPTION_HEADERS),
            amount: find(AMOUNT_HEADERS),
            debit: find(DEBIT_HEADERS),
            credit: find(CREDIT_HEADERS),
            external_id: find(EXTERNAL_ID_HEADERS),
        }
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a bank CSV export.
    ///
    /// Rows that fail to parse are collected in `errors`; only an unreadable
    /// file is an error.
    pub fn parse_bank_csv(content: &str) -> BudgetResult<ParsedCsv> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            records.push(record);
        }

        let mut parsed = ParsedCsv::default();
        let Some(first) = records.first() else {
            return Ok(parsed);
        };

        let (columns, data_start) = if looks_like_data_row(first) {
            (Columns::headerless(), 0)
        } else {
            (Columns::from_headers(first), 1)
        };

        if columns.date.is_none() {
            return Err(BudgetError::Import(
                "CSV has no recognisable date column".into(),
            ));
        }

        for (offset, record) in records.iter().enumerate().skip(data_start) {
            let row_number = offset + 1;
            match parse_record(record, &columns, row_number) {
                Ok(row) => parsed.rows.push(row),
                Err(message) => {
                    debug!(row = row_number, %message, "skipping CSV row");
                    parsed.errors.push(RowError {
                        row_number,
                        message,
                    })
                }
            }
        }

        Ok(parsed)
    }

    /// Import a CSV file for a household.
    ///
    /// Records the upload, inserts new rows (skipping duplicates by hash),
    /// assigns categories from the household rules and marks the import
    /// parsed. If the file cannot be parsed at all the import is marked failed
    /// and the error returned.
    pub fn import_file(
        &self,
        household_id: HouseholdId,
        path: &Path,
        account_id: Option<AccountId>,
    ) -> BudgetResult<ImportSummary> {
        let bytes = std::fs::read(path)
            .map_err(|e| BudgetError::Import(format!("Failed to read {}: {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.csv".to_string());

        self.import_bytes(household_id, &filename, &bytes, account_id, Utc::now())
    }

    /// Import already-loaded CSV content
    pub fn import_bytes(
        &self,
        household_id: HouseholdId,
        filename: &str,
        bytes: &[u8],
        account_id: Option<AccountId>,
        uploaded_at: DateTime<Utc>,
    ) -> BudgetResult<ImportSummary> {
        if let Some(account_id) = account_id {
            self.storage
                .accounts
                .get(account_id)?
                .filter(|a| a.household_id == household_id)
                .ok_or_else(|| BudgetError::account_not_found(account_id.to_string()))?;
        }

        let checksum = checksum(bytes);
        let mut record =
            ImportRecord::pending(household_id, account_id, filename, &checksum, uploaded_at);
        self.storage.imports.upsert(record.clone())?;
        self.storage.imports.save()?;

        let parsed = match std::str::from_utf8(bytes)
            .map_err(|e| BudgetError::Import(format!("File is not valid UTF-8: {}", e)))
            .and_then(Self::parse_bank_csv)
        {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(file = filename, error = %e, "import failed");
                record.mark_failed();
                self.storage.imports.upsert(record)?;
                self.storage.imports.save()?;
                return Err(e);
            }
        };

        let matcher = RuleMatcher::new(&self.storage.rules.for_household(household_id)?);
        let mut imported = 0;
        let mut categorised = 0;

        for row in &parsed.rows {
            let hash = transaction_hash(&DedupeInput {
                household_id,
                account_id,
                date: row.date,
                amount: row.amount,
                description: &row.description,
                direction: row.direction,
            });

            let mut txn = Transaction::new(
                household_id,
                row.date,
                row.description.clone(),
                row.amount,
                row.direction,
                hash,
            );
            txn.account_id = account_id;
            txn.import_id = Some(record.id);
            txn.external_id = row.external_id.clone();
            txn.category_id = matcher.categorise(&row.description);
            let has_category = txn.category_id.is_some();

            if self.storage.transactions.insert_if_new(txn)? {
                imported += 1;
                if has_category {
                    categorised += 1;
                }
            }
        }
        self.storage.transactions.save()?;

        let total = parsed.rows.len();
        record.mark_parsed(total, imported, Utc::now());
        let import_id = record.id;
        self.storage.imports.upsert(record)?;
        self.storage.imports.save()?;

        info!(
            file = filename,
            total,
            imported,
            duplicates = total - imported,
            categorised,
            errors = parsed.errors.len(),
            "import complete"
        );

        Ok(ImportSummary {
            import_id,
            imported,
            duplicates: total - imported,
            errors: parsed.errors,
            total,
            categorised,
            checksum,
        })
    }
}

/// A first record whose first field is a date means the file has no header
fn looks_like_data_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|first| parse_date(first).is_ok())
        .unwrap_or(false)
}

fn parse_record(
    record: &StringRecord,
    columns: &Columns,
    row_number: usize,
) -> Result<ParsedRow, String> {
    let field = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");

    let date = parse_date(field(columns.date))?;

    let description = match field(columns.description) {
        "" => UNKNOWN_DESCRIPTION.to_string(),
        text => text.to_string(),
    };

    let signed = parse_amount(field(columns.amount))?;
    let (amount, direction) = if !signed.is_zero() {
        let direction = if signed.is_negative() {
            Direction::Debit
        } else {
            Direction::Credit
        };
        (signed.abs(), direction)
    } else {
        let debit = parse_amount(field(columns.debit))?;
        let credit = parse_amount(field(columns.credit))?;
        if debit.is_positive() {
            (debit, Direction::Debit)
        } else if credit.is_positive() {
            (credit, Direction::Credit)
        } else {
            (Money::zero(), Direction::Debit)
        }
    };

    let external_id = match field(columns.external_id) {
        "" => None,
        id => Some(id.to_string()),
    };

    Ok(ParsedRow {
        row_number,
        date,
        description,
        amount,
        direction,
        external_id,
    })
}

/// Parse a bank amount, ignoring currency symbols, thousands separators and
/// spaces. A sign may lead or trail ("-27.93" or "27.93-"), and parentheses
/// mark a negative. An empty field is zero.
fn parse_amount(raw: &str) -> Result<Money, String> {
    let invalid = || format!("Could not parse amount: '{}'", raw);

    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '$' | '£' | '€'))
        .collect();

    if cleaned.is_empty() {
        return Ok(Money::zero());
    }

    let mut negative = false;
    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        negative = true;
        cleaned = inner.to_string();
    }
    if let Some(rest) = cleaned.strip_prefix('-') {
        negative = !negative;
        cleaned = rest.to_string();
    } else if let Some(rest) = cleaned.strip_suffix('-') {
        negative = !negative;
        cleaned = rest.to_string();
    }

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    let magnitude = Money::parse(&cleaned).map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Year-first dates are ISO; anything else is day-first
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let year_first = raw
        .split(['/', '-'])
        .next()
        .map(|part| part.len() == 4)
        .unwrap_or(false);

    let formats: &[&str] = if year_first {
        &["%Y-%m-%d", "%Y/%m/%d"]
    } else {
        // Two-digit years first: %Y would read "25" as the year 25
        &["%d/%m/%y", "%d-%m-%y", "%d/%m/%Y", "%d-%m-%Y"]
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", raw))
}
