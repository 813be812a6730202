//! # Staff Repository
//!
//! Database operations for users and staff shifts.
//!
//! Users store their role set as a JSON array in a TEXT column
//! (`["customer"]`, `["staff","manager"]`, ...), decoded through a private
//! row type so the domain `User` keeps its typed `Vec<Role>`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use brigade_core::{Role, Shift, ShiftStatus, User};

/// Columns selected for every Shift read, in struct field order.
const SHIFT_COLUMNS: &str =
    "id, staff_id, role, starts_at, ends_at, status, notes, created_at, updated_at";

/// Raw user row; `roles` is the JSON column before decoding.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    roles: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> DbResult<User> {
        let roles: Vec<Role> = serde_json::from_str(&self.roles)
            .map_err(|e| DbError::Internal(format!("corrupt roles column for {}: {e}", self.id)))?;

        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            roles,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user and shift operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Inserts a new user.
    pub async fn insert_user(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        let roles = serde_json::to_string(&user.roles)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, roles, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(roles)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, roles, is_active, created_at, updated_at \
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Gets a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, roles, is_active, created_at, updated_at \
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Lists active users holding a staff-like role.
    ///
    /// Role membership lives in the JSON column, so the filter happens
    /// after decoding; the staff directory is small.
    pub async fn list_staff(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, roles, is_active, created_at, updated_at \
             FROM users WHERE is_active = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut staff = Vec::new();
        for row in rows {
            let user = row.into_user()?;
            if user.roles.iter().any(Role::is_staff_like) {
                staff.push(user);
            }
        }

        Ok(staff)
    }

    /// Sets a user's active flag (soft delete).
    pub async fn set_user_active(&self, id: &str, active: bool) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE users SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(active)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    // =========================================================================
    // Shifts
    // =========================================================================

    /// Inserts a new shift.
    pub async fn insert_shift(&self, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, staff_id = %shift.staff_id, "Inserting shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, staff_id, role, starts_at, ends_at, status, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.staff_id)
        .bind(&shift.role)
        .bind(shift.starts_at)
        .bind(shift.ends_at)
        .bind(shift.status)
        .bind(&shift.notes)
        .bind(shift.created_at)
        .bind(shift.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a shift by ID.
    pub async fn get_shift(&self, id: &str) -> DbResult<Option<Shift>> {
        let sql = format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1");

        let shift = sqlx::query_as::<_, Shift>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(shift)
    }

    /// Applies a shift status transition with a compare-and-swap guard on
    /// the previous status. Returns false when the guard matched nothing.
    pub async fn update_shift_status(
        &self,
        id: &str,
        from: ShiftStatus,
        to: ShiftStatus,
    ) -> DbResult<bool> {
        debug!(id = %id, from = %from, to = %to, "Updating shift status");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE shifts SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a staff member's shifts, soonest first.
    pub async fn list_shifts_for_staff(
        &self,
        staff_id: &str,
        limit: u32,
    ) -> DbResult<Vec<Shift>> {
        let sql = format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts \
             WHERE staff_id = ?1 ORDER BY starts_at LIMIT ?2"
        );

        let shifts = sqlx::query_as::<_, Shift>(&sql)
            .bind(staff_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(shifts)
    }
}

/// Helper to generate a new user ID.
pub fn generate_user_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new shift ID.
pub fn generate_shift_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_user(id: &str, roles: Vec<Role>) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            roles,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_shift(staff_id: &str) -> Shift {
        let now = Utc::now();
        Shift {
            id: generate_shift_id(),
            staff_id: staff_id.to_string(),
            role: "server".to_string(),
            starts_at: now + Duration::hours(1),
            ends_at: now + Duration::hours(9),
            status: ShiftStatus::Scheduled,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_user_roundtrip_preserves_roles() {
        let db = test_db().await;
        let repo = db.staff();

        let user = sample_user("carol", vec![Role::Customer, Role::Staff]);
        repo.insert_user(&user).await.unwrap();

        let loaded = repo.get_user("carol").await.unwrap().unwrap();
        assert_eq!(loaded.roles, vec![Role::Customer, Role::Staff]);

        let by_email = repo.get_user_by_email("carol@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        let repo = db.staff();

        repo.insert_user(&sample_user("a", vec![Role::Customer])).await.unwrap();

        let mut dup = sample_user("b", vec![Role::Customer]);
        dup.email = "a@example.com".to_string();
        assert!(matches!(
            repo.insert_user(&dup).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_staff_filters_customers() {
        let db = test_db().await;
        let repo = db.staff();

        repo.insert_user(&sample_user("alice", vec![Role::Customer])).await.unwrap();
        repo.insert_user(&sample_user("carol", vec![Role::Staff])).await.unwrap();
        repo.insert_user(&sample_user("dan", vec![Role::Manager])).await.unwrap();

        let staff = repo.list_staff().await.unwrap();
        let ids: Vec<&str> = staff.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["carol", "dan"]);
    }

    #[tokio::test]
    async fn test_shift_status_guard() {
        let db = test_db().await;
        let repo = db.staff();

        repo.insert_user(&sample_user("carol", vec![Role::Staff])).await.unwrap();
        let shift = sample_shift("carol");
        repo.insert_shift(&shift).await.unwrap();

        // Guard mismatch: shift is scheduled, not checked in
        let moved = repo
            .update_shift_status(&shift.id, ShiftStatus::CheckedIn, ShiftStatus::Completed)
            .await
            .unwrap();
        assert!(!moved);

        assert!(repo
            .update_shift_status(&shift.id, ShiftStatus::Scheduled, ShiftStatus::CheckedIn)
            .await
            .unwrap());

        let loaded = repo.get_shift(&shift.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ShiftStatus::CheckedIn);
    }

    #[tokio::test]
    async fn test_list_shifts_for_staff() {
        let db = test_db().await;
        let repo = db.staff();

        repo.insert_user(&sample_user("carol", vec![Role::Staff])).await.unwrap();
        repo.insert_shift(&sample_shift("carol")).await.unwrap();
        repo.insert_shift(&sample_shift("carol")).await.unwrap();

        assert_eq!(repo.list_shifts_for_staff("carol", 50).await.unwrap().len(), 2);
        assert!(repo.list_shifts_for_staff("nobody", 50).await.unwrap().is_empty());
    }
}
