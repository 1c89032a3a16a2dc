// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reading the membership CSV.
//!
//! The file has one `(group, user)` pair per row under the headers
//! `group_name_or_id` and `user_email_or_id`. Header matching is
//! case-insensitive and whitespace-tolerant; extra columns are ignored.
//! Cells are passed on untrimmed because resolution treats padded digits
//! as text.

use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use ugsync_domain::{GROUP_COLUMN, MembershipRow, USER_COLUMN};

use crate::error::{ApiError, ApiResult};

/// Required CSV column headers (normalized).
const REQUIRED_HEADERS: &[&str] = &[GROUP_COLUMN, USER_COLUMN];

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> ApiResult<HashMap<String, usize>> {
    let mut header_map: HashMap<String, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        header_map.entry(normalize_header(header)).or_insert(idx);
    }

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsv(format!(
            "Missing required headers: {}",
            missing.join(", ")
        )));
    }

    Ok(header_map)
}

/// Parses membership rows from CSV content.
///
/// Short rows are accepted; their missing cells read as blank and are
/// rejected later during reconciliation.
///
/// # Errors
///
/// Returns an error if the header row is unreadable or lacks a required
/// column, or if a record cannot be parsed.
pub fn parse_membership_csv(content: &str) -> ApiResult<Vec<MembershipRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: StringRecord = reader.headers()?.clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;
    let group_idx: usize = header_map[GROUP_COLUMN];
    let user_idx: usize = header_map[USER_COLUMN];

    let mut rows: Vec<MembershipRow> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record: StringRecord = result?;
        rows.push(MembershipRow::new(
            idx + 1,
            record.get(group_idx).unwrap_or_default(),
            record.get(user_idx).unwrap_or_default(),
        ));
    }

    Ok(rows)
}

/// Reads and parses a membership CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid membership CSV.
pub fn read_membership_csv(path: &Path) -> ApiResult<Vec<MembershipRow>> {
    let content: String = std::fs::read_to_string(path)?;
    parse_membership_csv(&content)
}
