//! Provider and facility registries as CSV.
//!
//! Columns are matched by normalized header name, so `First Name`,
//! `first_name` and `FIRSTNAME` all land in the same field. Unknown columns
//! are ignored.

use std::io::Read;

use carebill_core::models::Record;
use carebill_core::models::address::Address;
use carebill_core::models::facility::Facility;
use carebill_core::models::provider::Provider;
use csv::{ReaderBuilder, StringRecord, Writer};
use serde::Serialize;

use crate::error::ExportError;

pub const PROVIDER_COLUMNS: [&str; 8] = [
    "first_name",
    "last_name",
    "npi",
    "specialty",
    "taxonomy_code",
    "phone",
    "email",
    "active",
];

pub const FACILITY_COLUMNS: [&str; 11] = [
    "name",
    "npi",
    "tax_id",
    "address_line1",
    "address_line2",
    "city",
    "state",
    "zip",
    "phone",
    "place_of_service",
    "active",
];

/// A row that was skipped during import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 1-based line in the source file (the header is line 1).
    pub line: u64,
    pub message: String,
}

/// Outcome of a row-by-row import: the rows that parsed and validated, and
/// the ones that didn't. Nothing is rolled back.
#[derive(Debug)]
pub struct Import<T> {
    pub records: Vec<T>,
    pub errors: Vec<RowError>,
}

impl<T> Import<T> {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            imported: self.records.len(),
            failed: self.errors.len(),
            errors: self.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

pub fn export_providers(providers: &[Provider]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(PROVIDER_COLUMNS)?;
    for p in providers {
        writer.write_record([
            p.first_name.as_str(),
            p.last_name.as_str(),
            opt(&p.npi),
            opt(&p.specialty),
            opt(&p.taxonomy_code),
            opt(&p.phone),
            opt(&p.email),
            bool_str(p.active),
        ])?;
    }
    finish(writer)
}

pub fn export_facilities(facilities: &[Facility]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(FACILITY_COLUMNS)?;
    for f in facilities {
        let pos = f.place_of_service.to_string();
        writer.write_record([
            f.name.as_str(),
            opt(&f.npi),
            opt(&f.tax_id),
            f.address.line1.as_str(),
            opt(&f.address.line2),
            f.address.city.as_str(),
            f.address.state.as_str(),
            f.address.zip.as_str(),
            opt(&f.phone),
            pos.as_str(),
            bool_str(f.active),
        ])?;
    }
    finish(writer)
}

pub fn import_providers(input: impl Read) -> Result<Import<Provider>, ExportError> {
    let mut rows = Rows::open(input)?;
    let first = rows.require("first_name")?;
    let last = rows.require("last_name")?;
    let npi = rows.column("npi");
    let specialty = rows.column("specialty");
    let taxonomy = rows.column("taxonomy_code");
    let phone = rows.column("phone");
    let email = rows.column("email");
    let active = rows.column("active");

    rows.parse_all(|row| {
        let value = serde_json::json!({
            "first_name": field(row, Some(first)),
            "last_name": field(row, Some(last)),
            "npi": opt_field(row, npi),
            "specialty": opt_field(row, specialty),
            "taxonomy_code": opt_field(row, taxonomy),
            "phone": opt_field(row, phone),
            "email": opt_field(row, email),
            "active": bool_field(row, active)?,
        });
        Ok(serde_json::from_value::<Provider>(value)?)
    })
}

pub fn import_facilities(input: impl Read) -> Result<Import<Facility>, ExportError> {
    let mut rows = Rows::open(input)?;
    let name = rows.require("name")?;
    let npi = rows.column("npi");
    let tax_id = rows.column("tax_id");
    let line1 = rows.column("address_line1");
    let line2 = rows.column("address_line2");
    let city = rows.column("city");
    let state = rows.column("state");
    let zip = rows.column("zip");
    let phone = rows.column("phone");
    let pos = rows.column("place_of_service");
    let active = rows.column("active");

    rows.parse_all(|row| {
        let place_of_service = match opt_field(row, pos) {
            None => 11,
            Some(raw) => raw
                .parse::<u8>()
                .map_err(|_| format!("place_of_service: {raw:?} is not a number"))?,
        };
        let value = serde_json::json!({
            "name": field(row, Some(name)),
            "npi": opt_field(row, npi),
            "tax_id": opt_field(row, tax_id),
            "address": Address {
                line1: field(row, line1),
                line2: opt_field(row, line2),
                city: field(row, city),
                state: field(row, state),
                zip: field(row, zip),
            },
            "phone": opt_field(row, phone),
            "place_of_service": place_of_service,
            "active": bool_field(row, active)?,
        });
        Ok(serde_json::from_value::<Facility>(value)?)
    })
}

struct Rows<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
}

impl<R: Read> Rows<R> {
    fn open(input: R) -> Result<Self, ExportError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        let headers = reader.headers()?.iter().map(normalize_header).collect();
        Ok(Self { reader, headers })
    }

    fn column(&self, name: &str) -> Option<usize> {
        let target = normalize_header(name);
        self.headers.iter().position(|h| *h == target)
    }

    fn require(&self, name: &'static str) -> Result<usize, ExportError> {
        self.column(name).ok_or(ExportError::MissingColumn(name))
    }

    /// Parse every row with `parse`, then run record validation. Failures are
    /// collected per line instead of aborting the import.
    fn parse_all<T: Record>(
        mut self,
        parse: impl Fn(&StringRecord) -> Result<T, RowFailure>,
    ) -> Result<Import<T>, ExportError> {
        let mut records = Vec::new();
        let mut errors = Vec::new();

        for (i, row) in self.reader.records().enumerate() {
            let position = match &row {
                Ok(record) => record.position(),
                Err(err) => err.position(),
            };
            // header is line 1
            let line = position.map_or(i as u64 + 2, |p| p.line());
            let outcome = row
                .map_err(|e| RowFailure(e.to_string()))
                .and_then(|row| {
                    if row.iter().all(str::is_empty) {
                        return Ok(None);
                    }
                    let record = parse(&row)?;
                    record.validate().map_err(|e| RowFailure(e.to_string()))?;
                    Ok(Some(record))
                });

            match outcome {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(RowFailure(message)) => {
                    tracing::debug!(line, %message, "skipping CSV row");
                    errors.push(RowError {
                        line,
                        message,
                    });
                }
            }
        }

        tracing::info!(
            kind = T::KIND,
            imported = records.len(),
            failed = errors.len(),
            "CSV import parsed"
        );
        Ok(Import { records, errors })
    }
}

struct RowFailure(String);

impl From<String> for RowFailure {
    fn from(s: String) -> Self {
        RowFailure(s)
    }
}

impl From<serde_json::Error> for RowFailure {
    fn from(e: serde_json::Error) -> Self {
        RowFailure(e.to_string())
    }
}

fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn field(row: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i)).unwrap_or("").to_string()
}

fn opt_field(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    Some(field(row, idx)).filter(|s| !s.is_empty())
}

/// Blank means active.
fn bool_field(row: &StringRecord, idx: Option<usize>) -> Result<bool, RowFailure> {
    let raw = field(row, idx);
    match raw.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "t" | "yes" | "y" => Ok(true),
        "0" | "false" | "f" | "no" | "n" => Ok(false),
        _ => Err(RowFailure(format!("active: {raw:?} is not a boolean"))),
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
