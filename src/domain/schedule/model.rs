//! Toll fee schedule, the rule engine for passage fees and capped
//! daily totals

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::vehicle::{Vehicle, VehicleType};

/// One chargeable time-of-day span, inclusive at both ends on whole
/// minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Fee in currency units for passages inside the span
    pub fee: u32,
}

impl FeeSpan {
    pub fn new(start: NaiveTime, end: NaiveTime, fee: u32) -> Self {
        Self { start, end, fee }
    }

    /// Seconds are ignored: a span ending at 06:29 still covers 06:29:59
    fn contains(&self, time: NaiveTime) -> bool {
        let minute = minute_of_day(time);
        minute_of_day(self.start) <= minute && minute <= minute_of_day(self.end)
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Time-of-day fee table plus the toll-free calendar.
///
/// `Default` reproduces the 2013 Gothenburg congestion-charge values
/// that the rest of the system is contracted against; both the spans
/// and the calendar can be swapped for other data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TollSchedule {
    /// Chargeable spans; any time outside every span is free
    pub spans: Vec<FeeSpan>,
    /// Toll-free dates on top of the weekend rule
    pub toll_free_dates: BTreeSet<NaiveDate>,
}

impl TollSchedule {
    /// Most a single vehicle is charged over one calendar day
    pub const DAILY_FEE_CAP: u32 = 60;

    /// Passages closer together than this share one charge window
    pub const FEE_WINDOW_MINUTES: i64 = 60;

    /// Weekends are always toll-free; other dates only when listed in
    /// the calendar
    pub fn is_toll_free_date(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            || self.toll_free_dates.contains(&date)
    }

    /// Fee for a single passage at the given instant
    pub fn passage_fee(&self, vehicle_type: VehicleType, timestamp: NaiveDateTime) -> u32 {
        if vehicle_type.is_toll_exempt() || self.is_toll_free_date(timestamp.date()) {
            return 0;
        }
        self.time_fee(timestamp.time())
    }

    fn time_fee(&self, time: NaiveTime) -> u32 {
        self.spans
            .iter()
            .find(|span| span.contains(time))
            .map_or(0, |span| span.fee)
    }

    /// Total toll for one vehicle over the passages of a single
    /// calendar day.
    ///
    /// Passages within [`Self::FEE_WINDOW_MINUTES`] of the window
    /// anchor are charged once, at the window's highest rate; a passage
    /// a full window after the anchor closes the window and opens a new
    /// one anchored at itself. The total never exceeds
    /// [`Self::DAILY_FEE_CAP`]. Timestamps are sorted first, so input
    /// order does not affect the result.
    pub fn daily_fee(
        &self,
        vehicle_type: VehicleType,
        timestamps: &[NaiveDateTime],
    ) -> DomainResult<u32> {
        let first = match timestamps.first() {
            Some(first) => *first,
            None => return Ok(0),
        };
        if timestamps.iter().any(|t| t.date() != first.date()) {
            return Err(DomainError::MultipleDatesInSingleDayQuery);
        }
        if vehicle_type.is_toll_exempt() || self.is_toll_free_date(first.date()) {
            return Ok(0);
        }

        let mut ordered = timestamps.to_vec();
        ordered.sort_unstable();

        let mut total = 0;
        let mut window_start = ordered[0];
        let mut window_fee = self.time_fee(window_start.time());
        for &timestamp in &ordered[1..] {
            let fee = self.time_fee(timestamp.time());
            let elapsed = timestamp - window_start;
            if elapsed.num_minutes() >= Self::FEE_WINDOW_MINUTES {
                total += window_fee;
                if total >= Self::DAILY_FEE_CAP {
                    return Ok(Self::DAILY_FEE_CAP);
                }
                window_start = timestamp;
                window_fee = fee;
            } else if fee > window_fee {
                window_fee = fee;
            }
        }

        Ok((total + window_fee).min(Self::DAILY_FEE_CAP))
    }

    /// Daily totals for one vehicle, one [`DailyFee`] per calendar date
    /// present in the input, ascending by date
    pub fn daily_fees_by_date(
        &self,
        vehicle: &Vehicle,
        timestamps: &[NaiveDateTime],
    ) -> DomainResult<Vec<DailyFee>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<NaiveDateTime>> = BTreeMap::new();
        for &timestamp in timestamps {
            by_date.entry(timestamp.date()).or_default().push(timestamp);
        }

        let mut fees = Vec::with_capacity(by_date.len());
        for (date, day_stamps) in by_date {
            let fee = self.daily_fee(vehicle.vehicle_type, &day_stamps)?;
            fees.push(DailyFee {
                vehicle: vehicle.clone(),
                date,
                fee,
            });
        }
        Ok(fees)
    }
}

impl Default for TollSchedule {
    fn default() -> Self {
        let spans = vec![
            FeeSpan::new(hm(6, 0), hm(6, 29), 8),
            FeeSpan::new(hm(6, 30), hm(6, 59), 13),
            FeeSpan::new(hm(7, 0), hm(7, 59), 18),
            FeeSpan::new(hm(8, 0), hm(8, 29), 13),
            FeeSpan::new(hm(8, 30), hm(14, 59), 8),
            FeeSpan::new(hm(15, 0), hm(15, 29), 13),
            FeeSpan::new(hm(15, 30), hm(16, 59), 18),
            FeeSpan::new(hm(17, 0), hm(17, 59), 13),
            FeeSpan::new(hm(18, 0), hm(18, 29), 8),
        ];
        Self {
            spans,
            toll_free_dates: holidays_2013(),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("whole-minute time of day")
}

/// Swedish public holidays and adjacent toll-free days of 2013, plus
/// the whole of July
fn holidays_2013() -> BTreeSet<NaiveDate> {
    let mut days: Vec<(u32, u32)> = vec![
        (1, 1),
        (3, 28),
        (3, 29),
        (4, 1),
        (4, 30),
        (5, 1),
        (5, 8),
        (5, 9),
        (6, 5),
        (6, 6),
        (6, 21),
        (11, 1),
        (12, 24),
        (12, 25),
        (12, 26),
        (12, 31),
    ];
    days.extend((1..=31).map(|day| (7, day)));
    days.into_iter()
        .filter_map(|(month, day)| NaiveDate::from_ymd_opt(2013, month, day))
        .collect()
}

/// Toll total for one vehicle on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyFee {
    pub vehicle: Vehicle,
    pub date: NaiveDate,
    pub fee: u32,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(y: i32, mo: u32, d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    // 2013-01-02 was a Wednesday with no holiday attached
    fn charged_day(h: u32, m: u32) -> NaiveDateTime {
        stamp(2013, 1, 2, h, m)
    }

    fn schedule() -> TollSchedule {
        TollSchedule::default()
    }

    #[test]
    fn fee_table_is_reproduced_minute_by_minute() {
        let schedule = schedule();
        let table = [
            ((0, 0), (5, 59), 0),
            ((6, 0), (6, 29), 8),
            ((6, 30), (6, 59), 13),
            ((7, 0), (7, 59), 18),
            ((8, 0), (8, 29), 13),
            ((8, 30), (14, 59), 8),
            ((15, 0), (15, 29), 13),
            ((15, 30), (16, 59), 18),
            ((17, 0), (17, 59), 13),
            ((18, 0), (18, 29), 8),
            ((18, 30), (23, 59), 0),
        ];
        for ((start_h, start_m), (end_h, end_m), fee) in table {
            let mut minute = start_h * 60 + start_m;
            let last = end_h * 60 + end_m;
            while minute <= last {
                let timestamp = charged_day(minute / 60, minute % 60);
                assert_eq!(
                    schedule.passage_fee(VehicleType::Car, timestamp),
                    fee,
                    "fee at {timestamp}"
                );
                minute += 1;
            }
        }
    }

    #[test]
    fn seconds_do_not_affect_the_fee() {
        let schedule = schedule();
        let timestamp = NaiveDate::from_ymd_opt(2013, 1, 2)
            .unwrap()
            .and_hms_milli_opt(6, 29, 59, 999)
            .unwrap();
        assert_eq!(schedule.passage_fee(VehicleType::Car, timestamp), 8);
    }

    #[test]
    fn exempt_vehicle_types_never_pay() {
        let schedule = schedule();
        let rush_hour = charged_day(7, 30);
        for ty in [
            VehicleType::Motorbike,
            VehicleType::Tractor,
            VehicleType::Emergency,
            VehicleType::Diplomat,
            VehicleType::Foreign,
            VehicleType::Military,
        ] {
            assert_eq!(schedule.passage_fee(ty, rush_hour), 0);
        }
        assert_eq!(schedule.passage_fee(VehicleType::Car, rush_hour), 18);
    }

    #[test]
    fn weekends_are_toll_free_in_any_year() {
        let schedule = schedule();
        // First Saturday and Sunday of February 2013
        assert_eq!(
            schedule.passage_fee(VehicleType::Car, stamp(2013, 2, 2, 7, 30)),
            0
        );
        assert_eq!(
            schedule.passage_fee(VehicleType::Car, stamp(2013, 2, 3, 7, 30)),
            0
        );
        // 2000-01-01 was a Saturday
        assert!(schedule.is_toll_free_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
        assert!(schedule.is_toll_free_date(NaiveDate::from_ymd_opt(2000, 1, 2).unwrap()));
    }

    #[test]
    fn listed_2013_holidays_are_toll_free() {
        let schedule = schedule();
        let holidays = [
            (1, 1),
            (3, 28),
            (3, 29),
            (4, 1),
            (4, 30),
            (5, 1),
            (5, 8),
            (5, 9),
            (6, 5),
            (6, 6),
            (6, 21),
            (11, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ];
        for (month, day) in holidays {
            assert_eq!(
                schedule.passage_fee(VehicleType::Car, stamp(2013, month, day, 7, 30)),
                0,
                "2013-{month:02}-{day:02}"
            );
        }
    }

    #[test]
    fn all_of_july_2013_is_toll_free() {
        let schedule = schedule();
        for day in 1..=31 {
            assert_eq!(
                schedule.passage_fee(VehicleType::Car, stamp(2013, 7, day, 7, 30)),
                0,
                "2013-07-{day:02}"
            );
        }
    }

    #[test]
    fn holiday_calendar_only_covers_2013() {
        let schedule = schedule();
        // 2014-01-01 fell on a Wednesday, 2014-07-15 on a Tuesday
        assert_eq!(
            schedule.passage_fee(VehicleType::Car, stamp(2014, 1, 1, 7, 30)),
            18
        );
        assert_eq!(
            schedule.passage_fee(VehicleType::Car, stamp(2014, 7, 15, 7, 30)),
            18
        );
    }

    #[test]
    fn custom_schedule_is_honoured() {
        let schedule = TollSchedule {
            spans: vec![FeeSpan::new(hm(9, 0), hm(9, 59), 25)],
            toll_free_dates: BTreeSet::new(),
        };
        assert_eq!(schedule.passage_fee(VehicleType::Car, charged_day(9, 30)), 25);
        assert_eq!(schedule.passage_fee(VehicleType::Car, charged_day(7, 30)), 0);
    }

    #[test]
    fn daily_fee_of_no_passages_is_zero() {
        assert_eq!(schedule().daily_fee(VehicleType::Car, &[]), Ok(0));
    }

    #[test]
    fn daily_fee_rejects_mixed_dates() {
        let result = schedule().daily_fee(
            VehicleType::Car,
            &[
                charged_day(0, 0),
                charged_day(16, 45),
                stamp(2013, 1, 3, 6, 30),
            ],
        );
        assert_eq!(result, Err(DomainError::MultipleDatesInSingleDayQuery));
        assert_eq!(
            DomainError::MultipleDatesInSingleDayQuery.to_string(),
            "All time stamps must be from the same date"
        );
    }

    #[test]
    fn single_window_charges_its_highest_fee() {
        let schedule = schedule();
        // 8, 13 and 18 within one hour
        let rising = [charged_day(6, 29), charged_day(6, 30), charged_day(7, 0)];
        assert_eq!(schedule.daily_fee(VehicleType::Car, &rising), Ok(18));
        // 18, 13 and 8 within one hour
        let falling = [charged_day(7, 59), charged_day(8, 0), charged_day(8, 30)];
        assert_eq!(schedule.daily_fee(VehicleType::Car, &falling), Ok(18));
    }

    #[test]
    fn window_maxima_add_up_across_the_day() {
        let schedule = schedule();
        let passages = [
            charged_day(6, 29),  // 8
            charged_day(6, 30),  // 13
            charged_day(7, 0),   // 18, first window max
            charged_day(7, 59),  // 18, second window max
            charged_day(8, 0),   // 13
            charged_day(8, 30),  // 8
            charged_day(14, 44), // 8, third window max
        ];
        // 18 + 18 + 8
        assert_eq!(schedule.daily_fee(VehicleType::Car, &passages), Ok(44));
    }

    #[test]
    fn daily_fee_is_capped_at_sixty() {
        let schedule = schedule();
        let passages = [
            charged_day(6, 29),  // 8
            charged_day(7, 0),   // 18, first window max
            charged_day(7, 59),  // 18, second window max
            charged_day(8, 30),  // 8
            charged_day(14, 44), // 8, third window max
            charged_day(16, 59), // 18, fourth window max
        ];
        // 18 + 18 + 8 + 18 = 62, capped
        assert_eq!(schedule.daily_fee(VehicleType::Car, &passages), Ok(60));
    }

    #[test]
    fn exactly_one_hour_after_the_anchor_opens_a_new_window() {
        let schedule = schedule();
        // 59 minutes apart: one window, highest fee wins
        assert_eq!(
            schedule.daily_fee(VehicleType::Car, &[charged_day(6, 0), charged_day(6, 59)]),
            Ok(13)
        );
        // 60 minutes apart: two windows, fees add up
        assert_eq!(
            schedule.daily_fee(VehicleType::Car, &[charged_day(6, 0), charged_day(7, 0)]),
            Ok(26)
        );
    }

    #[test]
    fn daily_fee_ignores_input_order() {
        let schedule = schedule();
        let shuffled = [
            charged_day(14, 44),
            charged_day(7, 0),
            charged_day(8, 30),
            charged_day(6, 29),
            charged_day(7, 59),
        ];
        assert_eq!(schedule.daily_fee(VehicleType::Car, &shuffled), Ok(44));
    }

    #[test]
    fn toll_free_day_costs_nothing_regardless_of_passages() {
        let schedule = schedule();
        let july = [stamp(2013, 7, 3, 7, 59), stamp(2013, 7, 3, 15, 45)];
        assert_eq!(schedule.daily_fee(VehicleType::Car, &july), Ok(0));
    }

    #[test]
    fn exempt_vehicle_daily_fee_is_zero() {
        let schedule = schedule();
        let passages = [charged_day(7, 0), charged_day(8, 30), charged_day(15, 45)];
        assert_eq!(schedule.daily_fee(VehicleType::Motorbike, &passages), Ok(0));
    }

    #[test]
    fn daily_fees_by_date_splits_per_day_ascending() {
        let schedule = schedule();
        let car = Vehicle::new("ABC 123", VehicleType::Car);
        let timestamps = [
            stamp(2013, 1, 3, 6, 29),
            stamp(2013, 1, 3, 7, 0),
            charged_day(7, 0),
            stamp(2013, 7, 3, 7, 59),
        ];
        let fees = schedule.daily_fees_by_date(&car, &timestamps).unwrap();
        assert_eq!(
            fees,
            vec![
                DailyFee {
                    vehicle: car.clone(),
                    date: NaiveDate::from_ymd_opt(2013, 1, 2).unwrap(),
                    fee: 18,
                },
                DailyFee {
                    vehicle: car.clone(),
                    date: NaiveDate::from_ymd_opt(2013, 1, 3).unwrap(),
                    fee: 18,
                },
                DailyFee {
                    vehicle: car,
                    date: NaiveDate::from_ymd_opt(2013, 7, 3).unwrap(),
                    fee: 0,
                },
            ]
        );
    }
}
