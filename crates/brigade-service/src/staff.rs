//! # Staff Service
//!
//! Staff scheduling: shift creation, shift status transitions and staff
//! directory operations. Every mutation is staff-gated through the access
//! policy; shift status changes go through the transition table in
//! brigade-core exactly the way order status changes do.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use brigade_core::lifecycle::check_shift_transition;
use brigade_core::policy::{authorize, Action};
use brigade_core::validation::validate_shift_window;
use brigade_core::{CoreError, Identity, Role, Shift, ShiftStatus, User};

use crate::dto::NewShiftRequest;
use crate::error::{ServiceError, ServiceResult};
use crate::store::StaffStore;

/// Staff scheduling service.
pub struct StaffService {
    staff: Arc<dyn StaffStore>,
}

impl StaffService {
    /// Creates a new StaffService over the given store.
    pub fn new(staff: Arc<dyn StaffStore>) -> Self {
        StaffService { staff }
    }

    // =========================================================================
    // Staff Directory
    // =========================================================================

    /// Creates a staff account. Staff-like only.
    pub async fn add_staff_member(
        &self,
        identity: &Identity,
        name: &str,
        email: &str,
        roles: Vec<Role>,
    ) -> ServiceResult<User> {
        authorize(identity, Action::ManageStaff, None)?;

        if !roles.iter().any(Role::is_staff_like) {
            return Err(ServiceError::invalid(
                "A staff account needs at least one staff-like role",
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            roles,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        if user.name.is_empty() || user.email.is_empty() {
            return Err(ServiceError::invalid("Name and email are required"));
        }

        self.staff.insert_user(&user).await?;

        info!(user_id = %user.id, "Staff account created");
        Ok(user)
    }

    /// Lists active staff-like users. Staff-like only.
    pub async fn list_staff(&self, identity: &Identity) -> ServiceResult<Vec<User>> {
        authorize(identity, Action::ViewShifts, None)?;
        Ok(self.staff.list_staff().await?)
    }

    // =========================================================================
    // Shifts
    // =========================================================================

    /// Schedules a shift for a staff member. Staff-like only.
    pub async fn schedule_shift(
        &self,
        identity: &Identity,
        req: NewShiftRequest,
    ) -> ServiceResult<Shift> {
        authorize(identity, Action::ManageShifts, None)?;

        validate_shift_window(req.starts_at, req.ends_at)
            .map_err(|e| ServiceError::invalid(e.to_string()))?;

        let worker = self
            .staff
            .get_user(&req.staff_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &req.staff_id))?;

        if !worker.roles.iter().any(Role::is_staff_like) {
            return Err(ServiceError::invalid(format!(
                "{} does not hold a staff role",
                worker.name
            )));
        }

        let now = Utc::now();
        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            staff_id: req.staff_id,
            role: req.role,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            status: ShiftStatus::Scheduled,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };

        self.staff.insert_shift(&shift).await?;

        info!(shift_id = %shift.id, staff_id = %shift.staff_id, "Shift scheduled");
        Ok(shift)
    }

    /// Moves a shift through its lifecycle
    /// (scheduled → checked_in → completed, scheduled → cancelled).
    /// Staff-like only.
    pub async fn update_shift_status(
        &self,
        identity: &Identity,
        shift_id: &str,
        new_status: ShiftStatus,
    ) -> ServiceResult<Shift> {
        authorize(identity, Action::ManageShifts, None)?;

        let shift = self.load_shift(shift_id).await?;
        check_shift_transition(shift.status, new_status)?;

        if !self
            .staff
            .update_shift_status(shift_id, shift.status, new_status)
            .await?
        {
            // The guard missed: a concurrent change won. Report the
            // transition for the status actually there now.
            let current = self.load_shift(shift_id).await?;
            return Err(CoreError::InvalidShiftTransition {
                from: current.status,
                to: new_status,
            }
            .into());
        }

        info!(shift_id = %shift_id, from = %shift.status, to = %new_status, "Shift status updated");

        self.load_shift(shift_id).await
    }

    /// Lists a staff member's shifts, soonest first. Staff members see
    /// their own; staff-like see anyone's.
    pub async fn list_shifts(
        &self,
        identity: &Identity,
        staff_id: &str,
        limit: u32,
    ) -> ServiceResult<Vec<Shift>> {
        authorize(identity, Action::ViewShifts, Some(staff_id))?;
        Ok(self.staff.list_shifts_for_staff(staff_id, limit).await?)
    }

    async fn load_shift(&self, shift_id: &str) -> ServiceResult<Shift> {
        self.staff
            .get_shift(shift_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Shift", shift_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
