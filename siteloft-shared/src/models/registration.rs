/// Temporary registration records and the onboarding step machine
///
/// A `TempRegistration` exists only between "registration begins" and
/// "account is created". It accumulates interview answers and tracks the
/// current onboarding step. Rows have no foreign keys so abandoned
/// registrations can be garbage-collected independently.
///
/// The step only advances forward, one step at a time, and only when the
/// caller explicitly asserts the current step is complete. The advance is a
/// compare-and-swap on the current step so a stale client can never move the
/// record backwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE temp_registrations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     token VARCHAR(255) NOT NULL UNIQUE,
///     current_step TEXT NOT NULL DEFAULT 'profile',
///     interview_data JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT temp_registrations_step_check CHECK (
///         current_step IN ('profile', 'interview', 'sites', 'plan')
///     )
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Ordered onboarding steps, ending in Plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStep {
    /// Basic profile details
    Profile,

    /// Onboarding interview questions
    Interview,

    /// Initial site setup answers
    Sites,

    /// Plan selection; terminal step
    Plan,
}

impl RegistrationStep {
    /// Converts the step to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStep::Profile => "profile",
            RegistrationStep::Interview => "interview",
            RegistrationStep::Sites => "sites",
            RegistrationStep::Plan => "plan",
        }
    }

    /// Parses a step from its database representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(RegistrationStep::Profile),
            "interview" => Some(RegistrationStep::Interview),
            "sites" => Some(RegistrationStep::Sites),
            "plan" => Some(RegistrationStep::Plan),
            _ => None,
        }
    }

    /// Returns the step that follows this one, or None at Plan
    pub fn next(&self) -> Option<Self> {
        match self {
            RegistrationStep::Profile => Some(RegistrationStep::Interview),
            RegistrationStep::Interview => Some(RegistrationStep::Sites),
            RegistrationStep::Sites => Some(RegistrationStep::Plan),
            RegistrationStep::Plan => None,
        }
    }
}

impl TryFrom<String> for RegistrationStep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RegistrationStep::from_str(&value)
            .ok_or_else(|| format!("unknown registration step: {value}"))
    }
}

/// Ephemeral pre-account registration record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TempRegistration {
    /// Unique registration ID (UUID v4)
    pub id: Uuid,

    /// Opaque token carried in the registration cookie
    #[serde(skip_serializing)]
    pub token: String,

    /// Current onboarding step
    #[sqlx(try_from = "String")]
    pub current_step: RegistrationStep,

    /// Accumulated interview answers (shallow-merged JSON object)
    pub interview_data: JsonValue,

    /// When the registration began
    pub created_at: DateTime<Utc>,

    /// When the registration was last touched
    pub updated_at: DateTime<Utc>,
}

impl TempRegistration {
    /// Begins a new registration with the given opaque token
    pub async fn create(pool: &PgPool, token: &str) -> Result<Self, sqlx::Error> {
        let registration = sqlx::query_as::<_, TempRegistration>(
            r#"
            INSERT INTO temp_registrations (token)
            VALUES ($1)
            RETURNING id, token, current_step, interview_data, created_at, updated_at
            "#,
        )
        .bind(token)
        .fetch_one(pool)
        .await?;

        Ok(registration)
    }

    /// Finds a registration by ID
    ///
    /// Returns None when the row has been consumed or garbage-collected;
    /// the caller must treat that as "registration no longer exists", not as
    /// an internal error.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let registration = sqlx::query_as::<_, TempRegistration>(
            r#"
            SELECT id, token, current_step, interview_data, created_at, updated_at
            FROM temp_registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(registration)
    }

    /// Shallow-merges answers into the accumulated interview data
    ///
    /// JSONB `||` keeps existing keys and overwrites ones present in the new
    /// object, which is exactly the required merge: data saved in one call
    /// is visible to all later calls, and re-saving a key replaces its value.
    ///
    /// Returns the updated record, or None if the registration is gone.
    pub async fn merge_interview_data(
        pool: &PgPool,
        id: Uuid,
        answers: &JsonValue,
    ) -> Result<Option<Self>, sqlx::Error> {
        let registration = sqlx::query_as::<_, TempRegistration>(
            r#"
            UPDATE temp_registrations
            SET interview_data = interview_data || $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, token, current_step, interview_data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(answers)
        .fetch_optional(pool)
        .await?;

        Ok(registration)
    }

    /// Advances the step from `from` to its successor, forward only
    ///
    /// The WHERE clause pins the expected current step, so a repeated or
    /// out-of-date advance is a no-op rather than a regression. Returns
    /// `true` if the step moved.
    pub async fn advance_step(
        pool: &PgPool,
        id: Uuid,
        from: RegistrationStep,
    ) -> Result<bool, sqlx::Error> {
        let Some(next) = from.next() else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE temp_registrations
            SET current_step = $3, updated_at = NOW()
            WHERE id = $1 AND current_step = $2
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(next.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the registration record
    ///
    /// Called when the real account has been created (the record is
    /// consumed) or by garbage collection of abandoned registrations.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM temp_registrations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes abandoned registrations older than the given number of days
    ///
    /// Returns the number of rows removed. Safe to run at any time: rows
    /// have no foreign keys and active registrations touch `updated_at` on
    /// every save.
    pub async fn prune_abandoned(pool: &PgPool, older_than_days: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM temp_registrations
            WHERE updated_at < NOW() - make_interval(days => $1)
            "#,
        )
        .bind(older_than_days)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_round_trip() {
        for step in [
            RegistrationStep::Profile,
            RegistrationStep::Interview,
            RegistrationStep::Sites,
            RegistrationStep::Plan,
        ] {
            assert_eq!(RegistrationStep::from_str(step.as_str()), Some(step));
        }
        assert_eq!(RegistrationStep::from_str("billing"), None);
    }

    #[test]
    fn test_step_ordering_ends_in_plan() {
        let mut step = RegistrationStep::Profile;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            assert!(next > step, "steps must only move forward");
            step = next;
            seen.push(step);
        }
        assert_eq!(step, RegistrationStep::Plan);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_plan_is_terminal() {
        assert_eq!(RegistrationStep::Plan.next(), None);
    }
}
