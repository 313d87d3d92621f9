// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weekly day mask
//!
//! A `DaySet` packs the days of a week into the low 7 bits of a byte.
//! Bit `d` stands for day `d`, counting from Sunday = 0 to Saturday = 6.
//! Bits above bit 6 are never set.

use crate::error::CoreError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days in the repeat cycle
pub const DAYS_PER_WEEK: u8 = 7;

const MASK: u8 = 0x7f;

const NAMES: [&str; DAYS_PER_WEEK as usize] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Day index (Sunday = 0) of a chrono weekday
pub fn day_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Immutable set of days of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    pub const ALL: DaySet = DaySet(MASK);
    /// Monday through Friday
    pub const WEEKDAYS: DaySet = DaySet(0b011_1110);
    pub const WEEKEND: DaySet = DaySet(0b100_0001);

    /// Build from raw bits, rejecting anything above bit 6
    pub fn from_bits(bits: u8) -> Result<Self, CoreError> {
        if bits & !MASK != 0 {
            return Err(CoreError::InvalidDayBits(bits));
        }
        Ok(Self(bits))
    }

    /// Build from raw bits, dropping anything above bit 6
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & MASK)
    }

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        days.into_iter()
            .fold(Self::EMPTY, |set, day| set.with(day_index(day)))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// A copy of this set with `day` added
    pub fn with(self, day: u8) -> Self {
        Self(self.0 | (1 << (day % DAYS_PER_WEEK)))
    }

    /// Whether the set contains day `day` (taken modulo 7)
    pub fn is_set(self, day: u8) -> bool {
        self.0 & (1 << (day % DAYS_PER_WEEK)) != 0
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.is_set(day_index(weekday))
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self.0 == MASK
    }

    /// Days back to the closest set day strictly before `from_day`.
    ///
    /// The walk starts at `from_day - 1` and may wrap once, so the result is
    /// in `1..=7`; 7 means only `from_day` itself is set.
    pub fn distance_to_previous_set(self, from_day: u8) -> Option<u8> {
        let from = from_day % DAYS_PER_WEEK;
        (1..=DAYS_PER_WEEK).find(|&distance| {
            self.is_set((from + DAYS_PER_WEEK - distance % DAYS_PER_WEEK) % DAYS_PER_WEEK)
        })
    }

    /// Days forward to the closest set day at or after `from_day`, in `0..=6`.
    pub fn distance_to_next_set(self, from_day: u8) -> Option<u8> {
        let from = from_day % DAYS_PER_WEEK;
        (0..DAYS_PER_WEEK).find(|&distance| self.is_set((from + distance) % DAYS_PER_WEEK))
    }

    /// Day indices in the set, Sunday first
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..DAYS_PER_WEEK).filter(move |&day| self.is_set(day))
    }
}

impl TryFrom<u8> for DaySet {
    type Error = CoreError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<DaySet> for u8 {
    fn from(set: DaySet) -> u8 {
        set.0
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.iter().map(|day| NAMES[day as usize]).collect();
        write!(f, "{}", names.join(","))
    }
}

#[cfg(test)]
#[path = "days_tests.rs"]
mod tests;
