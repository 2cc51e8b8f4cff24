//! Hourly focus quality and per-category totals.
//!
//! Both projections are pure functions over a slice of records. Sums are
//! kept in integer milliseconds (hourly) and hundredths of a minute
//! (categories) so the result does not depend on input order.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::record::SessionRecord;
use crate::error::FlowError;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Focus quality for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyQuality {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Overlap-weighted mean focus level, 1.0-5.0.
    pub quality: f64,
    /// Minutes of session time inside this hour.
    pub active_minutes: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct HourlyBucket {
    weighted_focus_millis: i128,
    active_millis: i64,
}

/// Overlap-weighted focus quality for every hour any record touches.
///
/// Records must lie within one calendar day: the day of the earliest start,
/// from midnight up to and including the following midnight. Hours with no
/// activity are omitted. An empty slice yields an empty result.
///
/// # Errors
///
/// Returns `FlowError::CrossMidnight` if any record ends after the
/// following midnight.
#[allow(clippy::cast_precision_loss)]
pub fn hourly_focus_quality(records: &[SessionRecord]) -> Result<Vec<HourlyQuality>, FlowError> {
    let Some(first_start) = records.iter().map(|r| r.start_timestamp).min() else {
        return Ok(Vec::new());
    };

    let day = first_start.date();
    let day_start = day.and_time(NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    if let Some(stray) = records.iter().find(|r| r.end_timestamp > day_end) {
        return Err(FlowError::CrossMidnight {
            first: day,
            last: stray.end_timestamp.date(),
        });
    }

    let last_end = records
        .iter()
        .map(|r| r.end_timestamp)
        .max()
        .unwrap_or(first_start);

    let min_hour = first_start.hour();
    let max_hour = if last_end >= day_end { 23 } else { last_end.hour() };

    let mut result = Vec::new();
    for hour in min_hour..=max_hour {
        let window_start = day_start + Duration::hours(i64::from(hour));
        let window_end = window_start + Duration::hours(1);

        let bucket = fill_bucket(records, window_start, window_end);
        if bucket.active_millis == 0 {
            continue;
        }

        result.push(HourlyQuality {
            hour,
            quality: bucket.weighted_focus_millis as f64 / bucket.active_millis as f64,
            active_minutes: bucket.active_millis as f64 / MILLIS_PER_MINUTE,
        });
    }

    Ok(result)
}

fn fill_bucket(
    records: &[SessionRecord],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> HourlyBucket {
    records.iter().fold(HourlyBucket::default(), |mut bucket, record| {
        let overlap = record.overlap_millis(window_start, window_end);
        if overlap > 0 {
            bucket.weighted_focus_millis +=
                i128::from(overlap) * i128::from(record.focus_level.get());
            bucket.active_millis += overlap;
        }
        bucket
    })
}

/// Total actual minutes per category.
///
/// The values sum to the total `actual_minutes` of the input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn category_totals(records: &[SessionRecord]) -> BTreeMap<String, f64> {
    let mut hundredths: BTreeMap<String, i64> = BTreeMap::new();
    for record in records {
        *hundredths.entry(record.category.clone()).or_default() += record.actual_hundredths();
    }

    hundredths
        .into_iter()
        .map(|(category, total)| (category, total as f64 / 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::record::RecordDraft;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(category: &str, start: NaiveDateTime, minutes: f64, focus: i64) -> SessionRecord {
        RecordDraft {
            category: category.to_string(),
            task_name: "task".to_string(),
            estimated_minutes: 25,
            actual_minutes: minutes,
            completed: true,
            notes: String::new(),
            focus_level: focus,
            start_timestamp: start,
        }
        .finalize()
        .unwrap()
    }

    fn mixed_day() -> Vec<SessionRecord> {
        vec![
            record("Work", at(8, 45), 30.0, 4),
            record("Study", at(9, 20), 55.5, 2),
            record("Work", at(11, 0), 25.0, 3),
            record("Code", at(11, 25), 30.0, 5),
            record("Admin", at(14, 10), 12.33, 1),
            record("Code", at(15, 50), 95.25, 5),
        ]
    }

    #[test]
    fn test_single_record_one_hour() {
        let hours = hourly_focus_quality(&[record("Work", at(9, 0), 35.0, 4)]).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].hour, 9);
        assert_eq!(hours[0].quality, 4.0);
        assert!((hours[0].active_minutes - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_records_same_hour() {
        let records = [
            record("Work", at(11, 0), 25.0, 3),
            record("Work", at(11, 25), 30.0, 5),
        ];
        let hours = hourly_focus_quality(&records).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].hour, 11);
        assert!((hours[0].quality - 225.0 / 55.0).abs() < 1e-12);
        assert!((hours[0].active_minutes - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_spanning_hours() {
        let hours = hourly_focus_quality(&[record("Work", at(8, 45), 30.0, 4)]).unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!((hours[0].hour, hours[1].hour), (8, 9));
        for h in &hours {
            assert_eq!(h.quality, 4.0);
            assert!((h.active_minutes - 15.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(hourly_focus_quality(&[]).unwrap().is_empty());
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn test_inactive_hours_omitted() {
        let records = [
            record("Work", at(8, 0), 30.0, 2),
            record("Work", at(12, 0), 30.0, 4),
        ];
        let hours: Vec<u32> = hourly_focus_quality(&records)
            .unwrap()
            .iter()
            .map(|h| h.hour)
            .collect();
        assert_eq!(hours, vec![8, 12]);
    }

    #[test]
    fn test_record_ending_on_hour_boundary() {
        let hours = hourly_focus_quality(&[record("Work", at(9, 0), 60.0, 3)]).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].hour, 9);
    }

    #[test]
    fn test_record_ending_at_midnight() {
        let hours = hourly_focus_quality(&[record("Work", at(23, 30), 30.0, 5)]).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].hour, 23);
    }

    #[test]
    fn test_cross_midnight_rejected() {
        let records = [
            record("Work", at(22, 0), 30.0, 3),
            record("Work", at(23, 30), 45.0, 4),
        ];
        let err = hourly_focus_quality(&records).unwrap_err();
        assert!(matches!(
            err,
            FlowError::CrossMidnight { first, last }
                if first == at(0, 0).date() && last == NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        ));
    }

    #[test]
    fn test_zero_length_record_contributes_nothing() {
        let records = [
            record("Work", at(10, 0), 0.0, 1),
            record("Work", at(10, 0), 20.0, 5),
        ];
        let hours = hourly_focus_quality(&records).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].quality, 5.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = mixed_day();
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(2);

        let expected_hours = hourly_focus_quality(&forward).unwrap();
        let expected_totals = category_totals(&forward);
        for variant in [reversed, rotated] {
            assert_eq!(hourly_focus_quality(&variant).unwrap(), expected_hours);
            assert_eq!(category_totals(&variant), expected_totals);
        }
    }

    #[test]
    fn test_quality_within_contributing_bounds() {
        let records = mixed_day();
        for hour in hourly_focus_quality(&records).unwrap() {
            let window_start = at(hour.hour, 0);
            let window_end = window_start + Duration::hours(1);
            let levels: Vec<u8> = records
                .iter()
                .filter(|r| r.overlap_millis(window_start, window_end) > 0)
                .map(|r| r.focus_level.get())
                .collect();

            let lo = f64::from(*levels.iter().min().unwrap());
            let hi = f64::from(*levels.iter().max().unwrap());
            assert!(hour.quality >= lo && hour.quality <= hi, "hour {}", hour.hour);
        }
    }

    #[test]
    fn test_category_totals_partition() {
        let records = mixed_day();
        let totals = category_totals(&records);

        assert_eq!(totals.len(), 4);
        assert!((totals["Work"] - 55.0).abs() < 1e-9);
        assert!((totals["Code"] - 125.25).abs() < 1e-9);

        let by_category: f64 = totals.values().sum();
        let overall: f64 = records.iter().map(|r| r.actual_minutes).sum();
        assert!((by_category - overall).abs() < 1e-9);
    }

    #[test]
    fn test_category_totals_ignore_day_boundaries() {
        let records = [
            record("Study", at(23, 30), 90.0, 3),
            record("Study", at(9, 0), 10.0, 3),
        ];
        assert!((category_totals(&records)["Study"] - 100.0).abs() < 1e-9);
    }
}
