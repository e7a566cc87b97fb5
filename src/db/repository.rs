use crate::error::{DecodeError, StorageError};
use crate::models::spend::{NewSpend, SpendingRecord};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

pub fn insert_spend(conn: &Connection, spend: &NewSpend) -> Result<SpendingRecord, StorageError> {
    conn.execute(
        "INSERT INTO p_finance (date, industry, business, items, cost, note) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            spend.date().format("%Y-%m-%d").to_string(),
            spend.industry(),
            spend.business(),
            spend.items(),
            spend.cost().to_string(),
            spend.note(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, business = spend.business(), "Inserted spending record");
    Ok(SpendingRecord::from_new(id, spend.clone()))
}

/// Every stored record, oldest insert first.
pub fn get_all_spends(conn: &Connection) -> Result<Vec<SpendingRecord>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, date, industry, business, items, cost, note FROM p_finance ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(StoredRow {
            id: row.get(0)?,
            date: row.get(1)?,
            industry: row.get(2)?,
            business: row.get(3)?,
            items: row.get(4)?,
            cost: row.get(5)?,
            note: row.get(6)?,
        })
    })?;

    let mut spends = Vec::new();
    for row in rows {
        spends.push(row?.decode()?);
    }
    debug!(count = spends.len(), "Loaded spending records");
    Ok(spends)
}

/// A row exactly as SQLite returns it, before date and cost are parsed.
struct StoredRow {
    id: i64,
    date: String,
    industry: String,
    business: String,
    items: String,
    cost: String,
    note: Option<String>,
}

impl StoredRow {
    fn decode(self) -> Result<SpendingRecord, DecodeError> {
        let date = parse_stored_date(&self.date).ok_or_else(|| DecodeError::UnparseableDate {
            id: self.id,
            value: self.date.clone(),
        })?;
        let cost = Decimal::from_str(self.cost.trim()).map_err(|_| DecodeError::UnparseableCost {
            id: self.id,
            value: self.cost.clone(),
        })?;

        Ok(SpendingRecord {
            id: self.id,
            date,
            industry: self.industry,
            business: self.business,
            items: self.items,
            cost,
            note: self.note,
        })
    }
}

/// Accepts plain dates as well as ISO-8601 timestamps.
fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
}
