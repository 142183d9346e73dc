//! Production rules for instants, durations and unique identifiers.
//!
//! Calendar values are composed from independently ranged fields, with days
//! capped at 28 so any month is valid. Identifiers are built from bytes
//! drawn off the session RNG, so seeded providers reproduce them.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rand::Rng;
use rand::RngCore;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::SpecimenError;
use crate::session::Session;
use crate::specimen::Specimen;

fn random_date(rng: &mut dyn RngCore) -> Result<NaiveDate, SpecimenError> {
    let year = rng.gen_range(1970..=2099);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SpecimenError::internal("calendar fields out of range"))
}

fn random_time(rng: &mut dyn RngCore) -> Result<NaiveTime, SpecimenError> {
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..60);
    let second = rng.gen_range(0..60);
    let milli = rng.gen_range(0..1000);
    NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
        .ok_or_else(|| SpecimenError::internal("clock fields out of range"))
}

impl Specimen for NaiveDate {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        random_date(session.rng())
    }
}

impl Specimen for NaiveTime {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        random_time(session.rng())
    }
}

impl Specimen for NaiveDateTime {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let date = random_date(rng)?;
        let time = random_time(rng)?;
        Ok(date.and_time(time))
    }
}

impl Specimen for DateTime<Utc> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let naive = session.synthesize::<NaiveDateTime>()?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

impl Specimen for DateTime<FixedOffset> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let naive = session.synthesize::<NaiveDateTime>()?;
        let hours = session.rng().gen_range(-12i32..=12);
        let offset = FixedOffset::east_opt(hours * 3600)
            .ok_or_else(|| SpecimenError::internal("zone offset out of range"))?;
        Ok(offset.from_utc_datetime(&naive))
    }
}

impl Specimen for chrono::Duration {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let days = rng.gen_range(0..365);
        let hours = rng.gen_range(0..24);
        let minutes = rng.gen_range(0..60);
        let seconds = rng.gen_range(0..60);
        let millis = rng.gen_range(0..1000);
        Ok(chrono::Duration::days(days)
            + chrono::Duration::hours(hours)
            + chrono::Duration::minutes(minutes)
            + chrono::Duration::seconds(seconds)
            + chrono::Duration::milliseconds(millis))
    }
}

impl Specimen for Duration {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let days: u64 = rng.gen_range(0..365);
        let hours: u64 = rng.gen_range(0..24);
        let minutes: u64 = rng.gen_range(0..60);
        let seconds: u64 = rng.gen_range(0..60);
        let millis: u32 = rng.gen_range(0..1000);
        let total_secs = days * 86_400 + hours * 3_600 + minutes * 60 + seconds;
        Ok(Duration::new(total_secs, millis * 1_000_000))
    }
}

impl Specimen for SystemTime {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let rng = session.rng();
        let secs: u64 = rng.gen_range(1..=4_000_000_000);
        let millis: u32 = rng.gen_range(0..1000);
        Ok(UNIX_EPOCH + Duration::new(secs, millis * 1_000_000))
    }
}

impl Specimen for Uuid {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let mut bytes = [0u8; 16];
        session.rng().fill_bytes(&mut bytes);
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}
