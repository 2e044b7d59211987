//! Past-sales input parsing.
//!
//! A history arrives either as comma-delimited text typed into the
//! sidebar, or as an uploaded headerless CSV file of which only the
//! first row is used. An upload takes precedence over typed text.

use crate::types::ForecastError;

/// Parse `"10, 12, 11.5"` into values. Blank input is an empty history.
pub fn parse_text(input: &str) -> Result<Vec<f64>, ForecastError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .enumerate()
        .map(|(idx, token)| parse_value(token, idx))
        .collect()
}

/// Parse the first row of a headerless CSV upload.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<f64>, ForecastError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let record = match reader.records().next() {
        Some(record) => record
            .map_err(|e| ForecastError::InvalidInput(format!("unreadable CSV upload: {e}")))?,
        None => {
            return Err(ForecastError::InvalidInput(
                "uploaded file contains no rows".into(),
            ))
        }
    };

    record
        .iter()
        .enumerate()
        .map(|(idx, field)| parse_value(field, idx))
        .collect()
}

/// Pick the history source: the upload if present, else the text field.
pub fn resolve(text: Option<&str>, upload: Option<&[u8]>) -> Result<Vec<f64>, ForecastError> {
    match (upload, text) {
        (Some(bytes), _) => parse_csv(bytes),
        (None, Some(text)) => parse_text(text),
        (None, None) => Ok(Vec::new()),
    }
}

fn parse_value(token: &str, idx: usize) -> Result<f64, ForecastError> {
    let token = token.trim();
    let value: f64 = token.parse().map_err(|_| {
        ForecastError::InvalidInput(format!("value {} is not a number: {token:?}", idx + 1))
    })?;
    if !value.is_finite() {
        return Err(ForecastError::InvalidInput(format!(
            "value {} must be finite, got {token}",
            idx + 1
        )));
    }
    Ok(value)
}
