//! Demonstration front end for the tollgate library.
//!
//! Seeds the registry with a year of passages for a handful of
//! vehicles, then prints the stored passages and the daily fee
//! summaries as JSON.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use tollgate::{NewPassage, PassageRegistry, VehicleType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut registry = PassageRegistry::new();
    registry.register_passages(&demo_passages());

    let from = stamp(2013, 1, 1, 0, 0);
    let to = stamp(2013, 12, 31, 23, 59);

    let passages = registry.list_passages(from, to)?;
    info!(count = passages.len(), "Passages during 2013");
    println!("{}", serde_json::to_string_pretty(&passages)?);

    let daily_fees = registry.list_daily_fees(from, to)?;
    info!(count = daily_fees.len(), "Daily fees during 2013");
    println!("{}", serde_json::to_string_pretty(&daily_fees)?);

    let plate = "ABC 123";
    let single = registry.list_daily_fees_for(plate, from, to)?;
    info!(license_number = plate, count = single.len(), "Daily fees for one vehicle");
    println!("{}", serde_json::to_string_pretty(&single)?);

    Ok(())
}

/// Passages for three cars and a motorbike: a day hitting the daily
/// cap, a cheaper day, off-peak times, two plain weekdays and two July
/// dates
fn demo_passages() -> Vec<NewPassage> {
    let timestamps = [
        // 2013-01-02: window maxima 18 + 18 + 8 + 18, capped at 60
        stamp(2013, 1, 2, 6, 29),
        stamp(2013, 1, 2, 7, 0),
        stamp(2013, 1, 2, 7, 59),
        stamp(2013, 1, 2, 8, 30),
        stamp(2013, 1, 2, 14, 44),
        stamp(2013, 1, 2, 16, 59),
        // 2013-01-03: window maxima 18 + 18
        stamp(2013, 1, 3, 6, 29),
        stamp(2013, 1, 3, 7, 0),
        stamp(2013, 1, 3, 7, 59),
        stamp(2013, 1, 3, 8, 30),
        // 2013-01-04: outside the charge hours
        stamp(2013, 1, 4, 0, 0),
        stamp(2013, 1, 4, 5, 29),
        stamp(2013, 1, 4, 21, 29),
        // Plain working days
        stamp(2013, 1, 7, 10, 0),
        stamp(2013, 1, 8, 10, 0),
        // July is toll-free
        stamp(2013, 7, 3, 7, 59),
        stamp(2013, 7, 31, 7, 59),
    ];

    let mut passages = Vec::new();
    for plate in ["ABC 123", "DEF 456", "GHI 789"] {
        for &timestamp in &timestamps {
            passages.push(NewPassage::new(plate, VehicleType::Car, timestamp));
        }
    }
    for &timestamp in &timestamps {
        passages.push(NewPassage::new("MC 1000", VehicleType::Motorbike, timestamp));
    }
    passages
}

fn stamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid demo timestamp")
}
