//! Shift scheduling for one track.
//!
//! A team lead edits their own calendar: every row is keyed by the lead's id,
//! and only active staff reporting to that lead can be placed into a slot.
//! The same service serves both tracks; the track comes from the injected
//! [`ShiftRepository`].

use std::collections::{HashMap, HashSet};

use cracare_core::access::{Action, Caller};
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::shift::{
    DaySchedule, MonthRange, SetDay, ShiftAssignment, ShiftSlot, ShiftTrack, check_calendar_date,
};
use cracare_core::models::staff::StaffMember;
use cracare_core::repository::{ShiftRepository, StaffRepository};
use tracing::{info, warn};
use uuid::Uuid;

pub struct ScheduleService<S: ShiftRepository, T: StaffRepository> {
    shifts: S,
    staff: T,
}

impl<S: ShiftRepository, T: StaffRepository> ScheduleService<S, T> {
    pub fn new(shifts: S, staff: T) -> Self {
        Self { shifts, staff }
    }

    pub fn track(&self) -> ShiftTrack {
        self.shifts.track()
    }

    /// Active staff the caller may place into their calendar.
    pub async fn team(&self, caller: &Caller) -> CraResult<Vec<StaffMember>> {
        let track = self.track();
        caller.require(Action::schedule(track))?;
        self.staff
            .list_subordinates(caller.id, track.member_role())
            .await
    }

    /// The caller's calendar for one month, by date then slot order.
    pub async fn month(
        &self,
        caller: &Caller,
        year: i32,
        month: u32,
    ) -> CraResult<Vec<ShiftAssignment>> {
        caller.require(Action::schedule(self.track()))?;
        let range = MonthRange::new(year, month)?;
        self.shifts
            .list_by_supervisor(caller.id, range.first, range.last)
            .await
    }

    /// Rows in which the caller is the assignee, for one month.
    pub async fn mine(
        &self,
        caller: &Caller,
        year: i32,
        month: u32,
    ) -> CraResult<Vec<ShiftAssignment>> {
        caller.require(Action::mine(self.track()))?;
        let range = MonthRange::new(year, month)?;
        self.shifts
            .list_by_staff(caller.id, range.first, range.last)
            .await
    }

    /// Replace the caller's assignments for one day.
    ///
    /// Slots are processed in declaration order and written independently.
    /// A blank or missing id clears the slot; `cleared` lists only slots that
    /// had a row. An id outside the caller's active team is skipped and its
    /// row left as it was.
    pub async fn set_day(&self, caller: &Caller, request: SetDay) -> CraResult<DaySchedule> {
        let track = self.track();
        caller.require(Action::schedule(track))?;

        let date = check_calendar_date(request.date)?;

        let mut requested: HashMap<ShiftSlot, Option<String>> = HashMap::new();
        for (code, value) in request.assignments {
            let slot: ShiftSlot = code.parse()?;
            if !track.has_slot(slot) {
                return Err(CraError::validation(format!(
                    "slot '{slot}' is not used by this calendar"
                )));
            }
            requested.insert(slot, value);
        }

        let pool: HashSet<Uuid> = self
            .staff
            .list_subordinates(caller.id, track.member_role())
            .await?
            .into_iter()
            .map(|member| member.id)
            .collect();

        let mut assigned = Vec::new();
        let mut cleared = Vec::new();
        let mut skipped = Vec::new();

        for &slot in track.slots() {
            let wanted = requested
                .remove(&slot)
                .flatten()
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty());

            let Some(raw) = wanted else {
                if self.shifts.remove(caller.id, date, slot).await? {
                    cleared.push(slot);
                }
                continue;
            };

            match raw.parse::<Uuid>().ok().filter(|id| pool.contains(id)) {
                Some(staff_id) => {
                    self.shifts.upsert(caller.id, date, slot, staff_id).await?;
                    assigned.push(slot);
                }
                None => {
                    warn!(
                        supervisor_id = %caller.id,
                        %date,
                        %slot,
                        requested = %raw,
                        "Skipping assignment outside the team"
                    );
                    skipped.push(slot);
                }
            }
        }

        let rows = self
            .shifts
            .list_by_supervisor(caller.id, date, date)
            .await?;

        info!(
            supervisor_id = %caller.id,
            track = ?track,
            %date,
            assigned = assigned.len(),
            cleared = cleared.len(),
            skipped = skipped.len(),
            "Day schedule saved"
        );

        Ok(DaySchedule {
            date,
            rows,
            assigned,
            cleared,
            skipped,
        })
    }
}
