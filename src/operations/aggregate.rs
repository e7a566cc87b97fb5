//! Turns the stored spending history into the views drawn by the report.
//!
//! All-time views cover every record. The `current_month_*` views only cover
//! records dated inside `[start of month, start of next month)` relative to
//! the `now` passed in by the caller.

use crate::models::report::{ReportViews, Totals};
use crate::models::spend::SpendingRecord;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

pub fn aggregate(records: &[SpendingRecord], now: NaiveDateTime) -> ReportViews {
    let labelled: Vec<(String, &SpendingRecord)> = records
        .iter()
        .map(|record| (month_label(record.date), record))
        .collect();

    let monthly_totals = sum_by(labelled.iter().map(|(month, r)| (month.clone(), r.cost)));
    let business_frequency = count_by(records.iter().map(|r| r.business.clone()));

    let (month_start, next_month_start) = current_month_window(now.date());
    let this_month: Vec<&SpendingRecord> = records
        .iter()
        .filter(|r| r.date >= month_start && r.date < next_month_start)
        .collect();

    debug!(
        total = records.len(),
        current_month = this_month.len(),
        %month_start,
        %next_month_start,
        "Aggregating spending records"
    );

    ReportViews {
        monthly_totals,
        business_frequency,
        current_month_business_totals: sum_by(
            this_month.iter().map(|r| (r.business.clone(), r.cost)),
        ),
        current_month_industry_totals: sum_by(
            this_month.iter().map(|r| (r.industry.clone(), r.cost)),
        ),
        current_month_item_totals: sum_by(this_month.iter().map(|r| (r.items.clone(), r.cost))),
        current_month_daily_totals: sum_by(this_month.iter().map(|r| (r.date, r.cost))),
    }
}

/// Full English month name, e.g. "March".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Returns `(first day of the month, first day of the next month)`.
pub fn current_month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Days::new(u64::from(today.day0()));
    let next = start
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    (start, next)
}

fn sum_by<K, I>(pairs: I) -> Totals<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, Decimal)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Totals<K> = Vec::new();
    for (key, amount) in pairs {
        match index.get(&key) {
            // Saturates at Decimal::MAX instead of panicking on overflow.
            Some(&idx) => totals[idx].1 = totals[idx].1.saturating_add(amount),
            None => {
                index.insert(key.clone(), totals.len());
                totals.push((key, amount));
            }
        }
    }
    totals
}

fn count_by<I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match index.get(&key) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        date(year, month, day).and_hms_opt(12, 30, 0).unwrap()
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn record(
        id: i64,
        date: NaiveDate,
        industry: &str,
        business: &str,
        items: &str,
        cost: &str,
    ) -> SpendingRecord {
        SpendingRecord {
            id,
            date,
            industry: industry.to_string(),
            business: business.to_string(),
            items: items.to_string(),
            cost: dec(cost),
            note: None,
        }
    }

    fn sample_records() -> Vec<SpendingRecord> {
        vec![
            record(1, date(2024, 3, 1), "grocery", "storeA", "milk", "2.50"),
            record(2, date(2024, 3, 15), "grocery", "storeA", "bread", "1.20"),
            record(3, date(2024, 4, 1), "grocery", "storeB", "eggs", "3.00"),
        ]
    }

    #[test]
    fn test_aggregate_end_to_end() {
        let views = aggregate(&sample_records(), at(2024, 3, 20));

        assert_eq!(
            views.current_month_business_totals,
            vec![("storeA".to_string(), dec("3.70"))]
        );
        assert_eq!(
            views.monthly_totals,
            vec![
                ("March".to_string(), dec("3.70")),
                ("April".to_string(), dec("3.00")),
            ]
        );
        assert_eq!(
            views.business_frequency,
            vec![("storeA".to_string(), 2), ("storeB".to_string(), 1)]
        );
        assert_eq!(
            views.current_month_industry_totals,
            vec![("grocery".to_string(), dec("3.70"))]
        );
        assert_eq!(
            views.current_month_item_totals,
            vec![
                ("milk".to_string(), dec("2.50")),
                ("bread".to_string(), dec("1.20")),
            ]
        );
        assert_eq!(
            views.current_month_daily_totals,
            vec![(date(2024, 3, 1), dec("2.50")), (date(2024, 3, 15), dec("1.20"))]
        );
    }

    #[test]
    fn test_aggregate_empty_input() {
        let views = aggregate(&[], at(2024, 3, 20));
        assert_eq!(views, ReportViews::default());
        assert!(views.is_empty());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = sample_records();
        let now = at(2024, 3, 20);
        assert_eq!(aggregate(&records, now), aggregate(&records, now));
    }

    #[test]
    fn test_month_boundaries() {
        let records = vec![
            record(1, date(2024, 3, 1), "pub", "the swan", "beer", "4.00"),
            record(2, date(2024, 4, 1), "pub", "the crown", "cider", "5.00"),
            record(3, date(2024, 2, 29), "pub", "the bell", "wine", "6.00"),
        ];
        let views = aggregate(&records, at(2024, 3, 31));

        assert_eq!(
            views.current_month_business_totals,
            vec![("the swan".to_string(), dec("4.00"))]
        );
        assert_eq!(views.current_month_daily_totals.len(), 1);
        assert_eq!(views.current_month_daily_totals[0].0, date(2024, 3, 1));
    }

    #[test]
    fn test_december_window_rolls_into_next_year() {
        let (start, next) = current_month_window(date(2023, 12, 31));
        assert_eq!(start, date(2023, 12, 1));
        assert_eq!(next, date(2024, 1, 1));
    }

    #[test]
    fn test_monthly_totals_keep_first_seen_order() {
        let records = vec![
            record(1, date(2024, 5, 2), "transport", "bus", "ticket", "2.00"),
            record(2, date(2024, 1, 9), "transport", "train", "ticket", "10.00"),
            record(3, date(2024, 5, 30), "transport", "bus", "ticket", "2.00"),
        ];
        let views = aggregate(&records, at(2024, 6, 1));

        assert_eq!(
            views.monthly_totals,
            vec![
                ("May".to_string(), dec("4.00")),
                ("January".to_string(), dec("10.00")),
            ]
        );
        assert!(views.current_month_business_totals.is_empty());
    }

    #[test]
    fn test_same_month_name_in_different_years_shares_a_label() {
        let records = vec![
            record(1, date(2023, 3, 10), "pub", "the swan", "beer", "4.00"),
            record(2, date(2024, 3, 10), "pub", "the swan", "beer", "4.50"),
        ];
        let views = aggregate(&records, at(2024, 3, 20));

        assert_eq!(views.monthly_totals, vec![("March".to_string(), dec("8.50"))]);
        assert_eq!(views.current_month_business_totals[0].1, dec("4.50"));
    }

    #[test]
    fn test_sums_many_small_amounts_without_drift() {
        let records: Vec<SpendingRecord> = (0..1000)
            .map(|i| record(i, date(2024, 3, 10), "cafe", "kiosk", "gum", "0.10"))
            .collect();
        let views = aggregate(&records, at(2024, 3, 20));

        assert_eq!(views.current_month_business_totals[0].1, dec("100.00"));
        assert_eq!(views.business_frequency, vec![("kiosk".to_string(), 1000)]);
    }

    #[test]
    fn test_huge_costs_saturate_instead_of_overflowing() {
        let mut records = vec![
            record(1, date(2024, 3, 1), "property", "agent", "house", "1"),
            record(2, date(2024, 3, 2), "property", "agent", "castle", "1"),
        ];
        for r in records.iter_mut() {
            r.cost = Decimal::MAX;
        }

        let views = aggregate(&records, at(2024, 3, 20));

        assert_eq!(views.monthly_totals, vec![("March".to_string(), Decimal::MAX)]);
        assert_eq!(
            views.current_month_business_totals,
            vec![("agent".to_string(), Decimal::MAX)]
        );
        assert_eq!(views.business_frequency, vec![("agent".to_string(), 2)]);
    }
}
