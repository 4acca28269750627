//! Passage registry, the stateful entry point for toll accounting

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::domain::{
    DailyFee, DomainError, DomainResult, NewPassage, Passage, TollSchedule, Vehicle, VehicleType,
};

/// In-memory store of registered passages, bucketed by license number,
/// with fee queries backed by a [`TollSchedule`].
///
/// Registration takes `&mut self` and queries take `&self`; callers
/// that share a registry across threads wrap it in their own lock.
#[derive(Debug, Clone)]
pub struct PassageRegistry {
    passages: BTreeMap<String, Vec<Passage>>,
    schedule: TollSchedule,
}

impl PassageRegistry {
    /// Registry charging by the default [`TollSchedule`]
    pub fn new() -> Self {
        Self::with_schedule(TollSchedule::default())
    }

    pub fn with_schedule(schedule: TollSchedule) -> Self {
        Self {
            passages: BTreeMap::new(),
            schedule,
        }
    }

    pub fn schedule(&self) -> &TollSchedule {
        &self.schedule
    }

    /// Stores one passage, truncated to the minute.
    ///
    /// Returns `Ok(false)` without storing when the license number is
    /// empty or when the same license number already has a passage in
    /// the same minute. Vehicle types that cannot be registered are an
    /// error.
    pub fn register_passage(
        &mut self,
        license_number: &str,
        vehicle_type: VehicleType,
        timestamp: NaiveDateTime,
    ) -> DomainResult<bool> {
        if license_number.is_empty() {
            debug!("Rejected passage without a license number");
            return Ok(false);
        }
        let vehicle = Vehicle::registrable(license_number, vehicle_type)?;
        let passage = Passage::new(vehicle, timestamp);

        let duplicate = self
            .passages
            .get(license_number)
            .map_or(false, |bucket| {
                bucket.iter().any(|stored| stored.timestamp == passage.timestamp)
            });
        if duplicate {
            debug!(
                license_number,
                timestamp = %passage.timestamp,
                "Rejected duplicate passage"
            );
            return Ok(false);
        }

        debug!(
            license_number,
            %vehicle_type,
            timestamp = %passage.timestamp,
            "Registered passage"
        );
        self.passages
            .entry(license_number.to_string())
            .or_default()
            .push(passage);
        Ok(true)
    }

    /// Registers a batch, skipping rejected entries, and returns how
    /// many were stored
    pub fn register_passages(&mut self, passages: &[NewPassage]) -> usize {
        let mut stored = 0;
        for item in passages {
            match self.register_passage(&item.license_number, item.vehicle_type, item.timestamp) {
                Ok(true) => stored += 1,
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        license_number = item.license_number.as_str(),
                        %error,
                        "Skipped passage during batch registration"
                    );
                }
            }
        }
        info!(received = passages.len(), stored, "Registered passage batch");
        stored
    }

    /// All stored passages with `from <= timestamp <= to`, ordered by
    /// license number and then by registration order
    pub fn list_passages(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<Passage>> {
        check_range(from, to)?;
        let passages: Vec<Passage> = self
            .passages
            .values()
            .flat_map(|bucket| bucket.iter())
            .filter(|passage| passage.is_within(from, to))
            .cloned()
            .collect();
        debug!(count = passages.len(), %from, %to, "Listed passages for all vehicles");
        Ok(passages)
    }

    /// One vehicle's passages with `from <= timestamp <= to`, ordered
    /// by timestamp
    pub fn list_passages_for(
        &self,
        license_number: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<Passage>> {
        if license_number.is_empty() {
            return Err(DomainError::InvalidLicenseNumber);
        }
        check_range(from, to)?;
        let mut passages: Vec<Passage> = self
            .passages
            .get(license_number)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|passage| passage.is_within(from, to))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        passages.sort_by_key(|passage| passage.timestamp);
        debug!(license_number, count = passages.len(), "Listed passages");
        Ok(passages)
    }

    /// Daily toll totals for every vehicle with in-range passages,
    /// ordered by license number and then by date
    pub fn list_daily_fees(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<DailyFee>> {
        check_range(from, to)?;
        let mut fees = Vec::new();
        for bucket in self.passages.values() {
            fees.extend(self.bucket_daily_fees(bucket, from, to)?);
        }
        debug!(count = fees.len(), %from, %to, "Listed daily fees for all vehicles");
        Ok(fees)
    }

    /// One vehicle's daily toll totals, ordered by date
    pub fn list_daily_fees_for(
        &self,
        license_number: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<DailyFee>> {
        if license_number.is_empty() {
            return Err(DomainError::InvalidLicenseNumber);
        }
        check_range(from, to)?;
        let fees = match self.passages.get(license_number) {
            Some(bucket) => self.bucket_daily_fees(bucket, from, to)?,
            None => Vec::new(),
        };
        debug!(license_number, count = fees.len(), "Listed daily fees");
        Ok(fees)
    }

    /// Fees for one license bucket's in-range passages.
    ///
    /// The vehicle on the returned rows is the first in-range passage's
    /// vehicle, so a license number re-registered under another type
    /// keeps its first-seen type here.
    fn bucket_daily_fees(
        &self,
        bucket: &[Passage],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DomainResult<Vec<DailyFee>> {
        let in_range: Vec<&Passage> = bucket
            .iter()
            .filter(|passage| passage.is_within(from, to))
            .collect();
        match in_range.first() {
            Some(first) => {
                let timestamps: Vec<NaiveDateTime> =
                    in_range.iter().map(|passage| passage.timestamp).collect();
                self.schedule.daily_fees_by_date(&first.vehicle, &timestamps)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Number of stored passages across all vehicles
    pub fn len(&self) -> usize {
        self.passages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

impl Default for PassageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(from: NaiveDateTime, to: NaiveDateTime) -> DomainResult<()> {
    if from > to {
        return Err(DomainError::InvertedTimeRange { from, to });
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
