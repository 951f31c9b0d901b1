//! Supply request workflow.
//!
//! `PENDIENTE -> RECIBIDA -> PEDIDO_LISTO` is driven by the administrator,
//! one step at a time. Only the lead who raised the request can close it
//! (`COMPLETADA`), and only once it is ready.

use cracare_core::access::{Action, Caller};
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::role::Role;
use cracare_core::models::supply_request::{
    CreateSupplyRequest, SupplyRequest, SupplyRequestStatus,
};
use cracare_core::repository::SupplyRequestRepository;
use tracing::info;
use uuid::Uuid;

use crate::input::required;

pub struct SupplyRequestService<R: SupplyRequestRepository> {
    repo: R,
}

impl<R: SupplyRequestRepository> SupplyRequestService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Administrators see every request; leads see the ones they raised.
    pub async fn list(&self, caller: &Caller) -> CraResult<Vec<SupplyRequest>> {
        caller.require(Action::SupplyRequestList)?;
        let requester = match caller.role {
            Role::Administrator => None,
            _ => Some(caller.id),
        };
        self.repo.list(requester).await
    }

    pub async fn raise(&self, caller: &Caller, description: &str) -> CraResult<SupplyRequest> {
        caller.require(Action::SupplyRequestRaise)?;
        let request = self
            .repo
            .create(CreateSupplyRequest {
                requester_id: caller.id,
                description: required("description", description)?,
            })
            .await?;

        info!(request_id = %request.id, requester_id = %caller.id, "Supply request raised");
        Ok(request)
    }

    /// Administrator step. `status` must be the next state after the
    /// current one; skipping or repeating a step is rejected.
    pub async fn advance(
        &self,
        caller: &Caller,
        id: Uuid,
        status: SupplyRequestStatus,
    ) -> CraResult<SupplyRequest> {
        caller.require(Action::SupplyRequestAdvance)?;

        if !matches!(
            status,
            SupplyRequestStatus::Received | SupplyRequestStatus::Ready
        ) {
            return Err(CraError::validation(format!(
                "status must be RECIBIDA or PEDIDO_LISTO, got {status}"
            )));
        }

        let current = self.repo.get_by_id(id).await?;
        if current.status.admin_next() != Some(status) {
            return Err(CraError::validation(format!(
                "cannot move request from {} to {status}",
                current.status
            )));
        }

        let request = self.repo.set_status(id, status).await?;
        info!(request_id = %id, from = %current.status, to = %status, "Supply request advanced");
        Ok(request)
    }

    /// Requester confirms receipt of a ready request.
    pub async fn complete(&self, caller: &Caller, id: Uuid) -> CraResult<SupplyRequest> {
        caller.require(Action::SupplyRequestComplete)?;

        let current = self.repo.get_by_id(id).await?;
        if current.requester_id != caller.id {
            return Err(CraError::denied(
                "only the requester can complete a supply request",
            ));
        }
        if current.status != SupplyRequestStatus::Ready {
            return Err(CraError::validation(format!(
                "request is {}, only PEDIDO_LISTO can be completed",
                current.status
            )));
        }

        let request = self
            .repo
            .set_status(id, SupplyRequestStatus::Completed)
            .await?;
        info!(request_id = %id, requester_id = %caller.id, "Supply request completed");
        Ok(request)
    }
}
