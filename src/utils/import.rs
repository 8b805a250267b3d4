use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::auth::credentials::valid_dob;
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::model::employee::Employee;
use crate::model::leave_history::{LeaveHistory, LeaveHistoryRecord, month_labels};

pub type Row = HashMap<String, String>;

const DEFAULT_ENTITLEMENT: f64 = 22.0;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

static SHORT_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})-([A-Za-z]{3})-(\d{2})$").expect("short date pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, AppError> {
        let lower = file_name.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".json") {
            Ok(FileFormat::Json)
        } else {
            Err(AppError::Import(
                "Unsupported file format. Please use CSV or JSON.".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportedEmployee {
    pub employee: Employee,
    pub history: LeaveHistory,
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub employees: Vec<ImportedEmployee>,
    /// "Row N: Failed to parse", header being row 1
    pub skipped: Vec<String>,
}

/// Parses a roster file into employees plus their previous-year history.
/// Fails only when the file is unreadable or holds no usable row.
pub fn import_roster(
    file_name: &str,
    content: &str,
    history_year: i32,
) -> Result<ImportOutcome, AppError> {
    let rows = parse_rows(FileFormat::from_file_name(file_name)?, content)?;

    let mut employees = Vec::new();
    let mut skipped = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        match row_to_employee(row, history_year) {
            // the first row for an employee id wins
            Some(imported) if seen.insert(imported.employee.employee_id.clone()) => {
                employees.push(imported)
            }
            Some(imported) => {
                warn!(
                    employee_id = %imported.employee.employee_id,
                    row = index + 2,
                    "Duplicate employee id"
                );
                skipped.push(format!("Row {}: Failed to parse", index + 2))
            }
            None => skipped.push(format!("Row {}: Failed to parse", index + 2)),
        }
    }

    if employees.is_empty() {
        return Err(AppError::Import("No valid employees found in file".to_string()));
    }

    Ok(ImportOutcome { employees, skipped })
}

pub fn parse_rows(format: FileFormat, content: &str) -> Result<Vec<Row>, AppError> {
    match format {
        FileFormat::Csv => parse_csv(content),
        FileFormat::Json => parse_json(content),
    }
}

fn parse_csv(content: &str) -> Result<Vec<Row>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Import(format!("Failed to read CSV header: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Import(format!("Failed to parse CSV: {}", e)))?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn parse_json(content: &str) -> Result<Vec<Row>, AppError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| AppError::Import(format!("Failed to parse JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(AppError::Import("JSON roster must be an array of rows".to_string()));
    };

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, json_scalar(v)))
                .collect(),
            _ => Row::new(),
        })
        .collect())
}

fn json_scalar(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First non-empty value under any of `keys`.
fn field<'a>(row: &'a Row, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn text(row: &Row, keys: &[&str]) -> Option<String> {
    field(row, keys).map(String::from)
}

/// Missing, zero and non-numeric values all fall back to `default`.
fn number_or(row: &Row, keys: &[&str], default: f64) -> f64 {
    field(row, keys)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(default)
}

/// Accepts "27-Feb-23" (two-digit years above 50 are 19xx) or ISO dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(caps) = SHORT_DATE.captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_abbreviation(&caps[2])?;
        let yy: i32 = caps[3].parse().ok()?;
        let year = if yy > 50 { 1900 + yy } else { 2000 + yy };
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m[..3].eq_ignore_ascii_case(abbr))
        .map(|i| i as u32 + 1)
}

pub fn row_to_employee(row: &Row, history_year: i32) -> Option<ImportedEmployee> {
    let employee_id = field(row, &["Employee No", "EmployeeNo", "employee_no"])?.to_uppercase();

    let credential = field(row, &["DOB", "DateOfBirth", "date_of_birth"])
        .and_then(valid_dob)
        .and_then(|dob| match hash_password(&dob) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(error = %e, employee_id = %employee_id, "Failed to hash credential");
                None
            }
        });

    let employee = Employee {
        id: employee_id.clone(),
        employee_id,
        name: text(row, &["Employee Name", "EmployeeName", "Name"])
            .unwrap_or_else(|| "Unknown".to_string()),
        email: text(row, &["Company Email Address", "Email"]),
        department: text(row, &["Department"]).unwrap_or_default(),
        entity: text(row, &["Entity", "Company"]),
        position: text(row, &["Job Title", "Position", "JobTitle"]),
        location: text(row, &["Location"]).unwrap_or_else(|| "Head Office".to_string()),
        joining_date: field(row, &["Joining Date", "JoiningDate"]).and_then(parse_date),
        annual_leave_entitlement: number_or(
            row,
            &["Annual Leave Entitlement"],
            DEFAULT_ENTITLEMENT,
        ),
        opening_balance: number_or(row, &["Opening Balance from previous year"], 0.0),
        offset_balance: number_or(row, &["Offset Balance"], 0.0),
        manager_email: text(row, &["Manager Email"]),
        is_manager: field(row, &["Is Manager"]).is_some_and(|v| v.eq_ignore_ascii_case("yes")),
        credential,
    };

    let records = MONTH_NAMES
        .iter()
        .zip(month_labels(history_year))
        .map(|(name, month)| LeaveHistoryRecord {
            month,
            leaves_availed: number_or(row, &[format!("{} Annual", name).as_str()], 0.0),
        })
        .collect();

    Some(ImportedEmployee {
        employee,
        history: LeaveHistory::new(history_year, records),
    })
}
