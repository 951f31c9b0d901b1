//! Reception desk: visitors and their appointments with residents.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use cracare_core::access::{Action, Caller};
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::visit::{
    Appointment, AppointmentFilter, AppointmentStatus, CreateAppointment, CreateVisitor,
    UpdateAppointment, UpdateVisitor, Visitor,
};
use cracare_core::repository::{AppointmentRepository, PatientRepository, VisitorRepository};
use tracing::info;
use uuid::Uuid;

use crate::input::{nullable, optional, required, required_patch};

pub const VISITOR_SEARCH_LIMIT: u64 = 100;
pub const APPOINTMENT_LIST_LIMIT: u64 = 500;
pub const UPCOMING_LIMIT: u64 = 100;

/// Appointment listing filters as received from the client.
///
/// `date` selects one calendar day (UTC) and takes precedence over
/// `from`/`to`.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AppointmentQuery {
    fn into_filter(self) -> CraResult<AppointmentFilter> {
        let (from, until) = match self.date {
            Some(date) => {
                let start = date.and_time(NaiveTime::MIN).and_utc();
                let end = start
                    .checked_add_days(Days::new(1))
                    .and_then(|next| next.checked_sub_signed(TimeDelta::milliseconds(1)))
                    .ok_or_else(|| CraError::validation(format!("date out of range: {date}")))?;
                (Some(start), Some(end))
            }
            None => (self.from, self.to),
        };

        Ok(AppointmentFilter {
            patient_id: self.patient_id,
            status: self.status,
            from,
            until,
            limit: APPOINTMENT_LIST_LIMIT,
        })
    }
}

pub struct VisitService<V, A, P>
where
    V: VisitorRepository,
    A: AppointmentRepository,
    P: PatientRepository,
{
    visitors: V,
    appointments: A,
    patients: P,
}

impl<V, A, P> VisitService<V, A, P>
where
    V: VisitorRepository,
    A: AppointmentRepository,
    P: PatientRepository,
{
    pub fn new(visitors: V, appointments: A, patients: P) -> Self {
        Self {
            visitors,
            appointments,
            patients,
        }
    }

    // -- Visitors ----------------------------------------------------------

    pub async fn search_visitors(
        &self,
        caller: &Caller,
        query: Option<&str>,
    ) -> CraResult<Vec<Visitor>> {
        caller.require(Action::Visits)?;
        self.visitors.search(query, VISITOR_SEARCH_LIMIT).await
    }

    pub async fn get_visitor(&self, caller: &Caller, id: Uuid) -> CraResult<Visitor> {
        caller.require(Action::Visits)?;
        self.visitors.get_by_id(id).await
    }

    pub async fn create_visitor(&self, caller: &Caller, input: CreateVisitor) -> CraResult<Visitor> {
        caller.require(Action::Visits)?;
        let visitor = self
            .visitors
            .create(CreateVisitor {
                first_name: required("first_name", &input.first_name)?,
                last_name: optional(input.last_name),
                phone: optional(input.phone),
                email: optional(input.email),
                relationship: optional(input.relationship),
                document: optional(input.document),
            })
            .await?;

        info!(visitor_id = %visitor.id, created_by = %caller.id, "Visitor registered");
        Ok(visitor)
    }

    pub async fn update_visitor(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdateVisitor,
    ) -> CraResult<Visitor> {
        caller.require(Action::Visits)?;
        self.visitors.get_by_id(id).await?;
        self.visitors
            .update(
                id,
                UpdateVisitor {
                    first_name: required_patch("first_name", input.first_name)?,
                    last_name: nullable(input.last_name),
                    phone: nullable(input.phone),
                    email: nullable(input.email),
                    relationship: nullable(input.relationship),
                    document: nullable(input.document),
                },
            )
            .await
    }

    // -- Appointments ------------------------------------------------------

    pub async fn list_appointments(
        &self,
        caller: &Caller,
        query: AppointmentQuery,
    ) -> CraResult<Vec<Appointment>> {
        caller.require(Action::Visits)?;
        self.appointments.list(query.into_filter()?).await
    }

    /// Scheduled appointments from now on, earliest first.
    pub async fn upcoming(&self, caller: &Caller) -> CraResult<Vec<Appointment>> {
        caller.require(Action::Visits)?;
        self.appointments
            .list(AppointmentFilter {
                status: Some(AppointmentStatus::Scheduled),
                from: Some(Utc::now()),
                limit: UPCOMING_LIMIT,
                ..AppointmentFilter::default()
            })
            .await
    }

    pub async fn get_appointment(&self, caller: &Caller, id: Uuid) -> CraResult<Appointment> {
        caller.require(Action::Visits)?;
        self.appointments.get_by_id(id).await
    }

    /// Book a visit. Both the resident and the visitor must exist.
    pub async fn create_appointment(
        &self,
        caller: &Caller,
        input: CreateAppointment,
    ) -> CraResult<Appointment> {
        caller.require(Action::Visits)?;
        self.patients.get_by_id(input.patient_id).await?;
        self.visitors.get_by_id(input.visitor_id).await?;

        let appointment = self
            .appointments
            .create(CreateAppointment {
                notes: optional(input.notes),
                ..input
            })
            .await?;

        info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            visitor_id = %appointment.visitor_id,
            scheduled_at = %appointment.scheduled_at,
            "Appointment booked"
        );
        Ok(appointment)
    }

    pub async fn update_appointment(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdateAppointment,
    ) -> CraResult<Appointment> {
        caller.require(Action::Visits)?;
        self.appointments.get_by_id(id).await?;

        let appointment = self
            .appointments
            .update(
                id,
                UpdateAppointment {
                    notes: nullable(input.notes),
                    ..input
                },
            )
            .await?;

        info!(appointment_id = %id, status = %appointment.status, "Appointment updated");
        Ok(appointment)
    }

    pub async fn delete_appointment(&self, caller: &Caller, id: Uuid) -> CraResult<()> {
        caller.require(Action::Visits)?;
        self.appointments.delete(id).await?;
        info!(appointment_id = %id, deleted_by = %caller.id, "Appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_filter_covers_the_whole_day() {
        let query = AppointmentQuery {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            from: Some(Utc::now()),
            ..AppointmentQuery::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(
            filter.from.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(
            filter.until.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(filter.limit, APPOINTMENT_LIST_LIMIT);
    }

    #[test]
    fn range_filter_passes_through() {
        let from = Utc::now();
        let filter = AppointmentQuery {
            from: Some(from),
            ..AppointmentQuery::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.from, Some(from));
        assert_eq!(filter.until, None);
    }
}
