//! Time utilities: the "today" that month and period calculations run against.

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Build a clock for an IANA timezone like "America/Sao_Paulo".
    pub fn new(tz: &str) -> Result<Self> {
        let tz: Tz = tz
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
        Ok(Self { tz })
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}
