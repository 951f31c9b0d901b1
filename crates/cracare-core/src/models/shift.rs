//! Shift assignment domain model.
//!
//! A shift assignment places one staff member into a named slot of a team
//! lead's calendar for one day. The key is `(supervisor_id, date, slot)`;
//! an unassigned slot has no row at all.
//!
//! Two parallel tracks exist: the operational track (`RAA` assigns `OSS`)
//! and the nursing track (`RAS` assigns `ENFERMERA`). Each has its own
//! fixed slot set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CraError, CraResult};
use crate::models::role::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShiftTrack {
    Operational,
    Nursing,
}

const OPERATIONAL_SLOTS: [ShiftSlot; 5] = [
    ShiftSlot::Morning1,
    ShiftSlot::Morning2,
    ShiftSlot::Afternoon1,
    ShiftSlot::Afternoon2,
    ShiftSlot::OnCall,
];

const NURSING_SLOTS: [ShiftSlot; 5] = [
    ShiftSlot::Morning1,
    ShiftSlot::Morning2,
    ShiftSlot::Morning3,
    ShiftSlot::Afternoon1,
    ShiftSlot::Afternoon2,
];

impl ShiftTrack {
    /// Role allowed to edit this track's calendar.
    pub fn lead_role(&self) -> Role {
        match self {
            ShiftTrack::Operational => Role::AssistantLead,
            ShiftTrack::Nursing => Role::NursingLead,
        }
    }

    /// Role of the staff that can be placed into this track's slots.
    pub fn member_role(&self) -> Role {
        match self {
            ShiftTrack::Operational => Role::CareAssistant,
            ShiftTrack::Nursing => Role::Nurse,
        }
    }

    /// Slot codes in declaration order.
    pub fn slots(&self) -> &'static [ShiftSlot] {
        match self {
            ShiftTrack::Operational => &OPERATIONAL_SLOTS,
            ShiftTrack::Nursing => &NURSING_SLOTS,
        }
    }

    pub fn has_slot(&self, slot: ShiftSlot) -> bool {
        self.slots().contains(&slot)
    }

    /// Position of `slot` within this track's declaration order.
    pub fn slot_index(&self, slot: ShiftSlot) -> usize {
        self.slots()
            .iter()
            .position(|s| *s == slot)
            .unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftSlot {
    #[serde(rename = "MANANA_1")]
    Morning1,
    #[serde(rename = "MANANA_2")]
    Morning2,
    #[serde(rename = "MANANA_3")]
    Morning3,
    #[serde(rename = "TARDE_1")]
    Afternoon1,
    #[serde(rename = "TARDE_2")]
    Afternoon2,
    #[serde(rename = "GUARDIA")]
    OnCall,
}

impl ShiftSlot {
    pub const ALL: [ShiftSlot; 6] = [
        ShiftSlot::Morning1,
        ShiftSlot::Morning2,
        ShiftSlot::Morning3,
        ShiftSlot::Afternoon1,
        ShiftSlot::Afternoon2,
        ShiftSlot::OnCall,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ShiftSlot::Morning1 => "MANANA_1",
            ShiftSlot::Morning2 => "MANANA_2",
            ShiftSlot::Morning3 => "MANANA_3",
            ShiftSlot::Afternoon1 => "TARDE_1",
            ShiftSlot::Afternoon2 => "TARDE_2",
            ShiftSlot::OnCall => "GUARDIA",
        }
    }
}

impl fmt::Display for ShiftSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ShiftSlot {
    type Err = CraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShiftSlot::ALL
            .into_iter()
            .find(|slot| slot.code() == s)
            .ok_or_else(|| CraError::validation(format!("unknown shift slot '{s}'")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftAssignment {
    pub track: ShiftTrack,
    pub supervisor_id: Uuid,
    pub date: NaiveDate,
    pub slot: ShiftSlot,
    pub staff_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// Years a calendar accepts. Dates are stored as `YYYY-MM-DD` text, which
/// only orders correctly with four-digit years.
pub const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Reject calendar dates outside [`CALENDAR_YEARS`].
pub fn check_calendar_date(date: NaiveDate) -> CraResult<NaiveDate> {
    if CALENDAR_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(CraError::validation(format!("date out of range: {date}")))
    }
}

/// Inclusive date range `[first, last]` covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl MonthRange {
    pub fn new(year: i32, month: u32) -> CraResult<Self> {
        let invalid = || CraError::validation(format!("invalid year/month: {year}-{month:02}"));
        if !CALENDAR_YEARS.contains(&year) {
            return Err(invalid());
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next_first| next_first.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self { first, last })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }
}

/// Requested contents of one calendar day: slot code -> staff id.
///
/// Ids arrive as raw strings; blank or missing means "unassign". Ids that
/// do not parse or do not belong to the caller's team are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub assignments: std::collections::BTreeMap<String, Option<String>>,
}

/// Outcome of a `set_day` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    /// Every row present for `(supervisor, date)` after the write.
    pub rows: Vec<ShiftAssignment>,
    pub assigned: Vec<ShiftSlot>,
    /// Slots requested empty whose row was removed by this call.
    pub cleared: Vec<ShiftSlot>,
    /// Slots whose requested assignee is not an active member of the team.
    /// Their rows are left untouched.
    pub skipped: Vec<ShiftSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_declare_distinct_slot_sets() {
        assert!(ShiftTrack::Operational.has_slot(ShiftSlot::OnCall));
        assert!(!ShiftTrack::Operational.has_slot(ShiftSlot::Morning3));
        assert!(ShiftTrack::Nursing.has_slot(ShiftSlot::Morning3));
        assert!(!ShiftTrack::Nursing.has_slot(ShiftSlot::OnCall));
    }

    #[test]
    fn tracks_map_to_lead_and_member_roles() {
        assert_eq!(ShiftTrack::Operational.lead_role(), Role::AssistantLead);
        assert_eq!(ShiftTrack::Operational.member_role(), Role::CareAssistant);
        assert_eq!(ShiftTrack::Nursing.lead_role(), Role::NursingLead);
        assert_eq!(ShiftTrack::Nursing.member_role(), Role::Nurse);
    }

    #[test]
    fn slot_codes_parse() {
        for slot in ShiftSlot::ALL {
            assert_eq!(slot.code().parse::<ShiftSlot>().unwrap(), slot);
        }
        assert!("NOCHE".parse::<ShiftSlot>().is_err());
    }

    #[test]
    fn slot_serializes_as_code() {
        let json = serde_json::to_string(&ShiftSlot::Afternoon2).unwrap();
        assert_eq!(json, "\"TARDE_2\"");
    }

    #[test]
    fn month_range_ends_on_the_last_day() {
        let range = MonthRange::new(2024, 2).unwrap();
        assert_eq!(range.first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn december_stays_in_its_year() {
        let range = MonthRange::new(2023, 12).unwrap();
        assert_eq!(range.last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        let range = MonthRange::new(9999, 12).unwrap();
        assert_eq!(range.last.to_string(), "9999-12-31");
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthRange::new(2024, 0).is_err());
        assert!(MonthRange::new(2024, 13).is_err());
        assert!(MonthRange::new(0, 6).is_err());
        assert!(MonthRange::new(10000, 1).is_err());
    }

    #[test]
    fn calendar_dates_need_four_digit_years() {
        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(check_calendar_date(last).unwrap(), last);
        assert!(check_calendar_date(NaiveDate::from_ymd_opt(10000, 1, 1).unwrap()).is_err());
        assert!(check_calendar_date(NaiveDate::from_ymd_opt(0, 1, 1).unwrap()).is_err());
    }
}
