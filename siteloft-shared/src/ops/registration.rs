/// Registration workflow operations
///
/// The onboarding workflow runs against a [`TempRegistration`] resolved from
/// the registration token, independent of any user session. Interview
/// answers can be saved at any step without advancing; the recorded step
/// moves forward only when the caller explicitly asserts completion.
///
/// Completion consumes the temp record inside one transaction: the account,
/// its owner membership, and the user's account selection are created
/// together or not at all. Slug uniqueness is decided by the database
/// constraint at commit; the advisory pre-check merely produces a friendlier
/// early answer.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::OpError;
use crate::auth::session::{resolve_registration_record, Identity};
use crate::models::account::Account;
use crate::models::member::AccountMember;
use crate::models::registration::TempRegistration;
use crate::slug::{is_slug_unique_violation, validate_slug_format, SlugError};

/// Result of an interview save
#[derive(Debug, Clone)]
pub struct InterviewOutcome {
    /// The registration after the save (and advance, if any)
    pub registration: TempRegistration,

    /// Whether the recorded step advanced
    pub advanced: bool,
}

/// Saves interview answers against the caller's registration
///
/// Answers are shallow-merged into the accumulated interview data: new keys
/// overwrite previous values, everything else is preserved. The step
/// advances to its successor only when `is_complete` is true; passing false
/// (or omitting it at the wire level) never changes the step.
///
/// # Errors
///
/// - `Validation`: answers are not a JSON object
/// - `RegistrationExpired`: the token no longer maps to a registration; the
///   caller must clear the dangling token and start over
pub async fn save_interview(
    pool: &PgPool,
    registration_token: &str,
    answers: &JsonValue,
    is_complete: bool,
) -> Result<InterviewOutcome, OpError> {
    if !answers.is_object() {
        return Err(OpError::Validation("interview_data must be an object"));
    }

    let registration = resolve_registration_record(pool, registration_token)
        .await?
        .ok_or(OpError::RegistrationExpired)?;

    let mut registration = TempRegistration::merge_interview_data(pool, registration.id, answers)
        .await?
        // The row can vanish between resolve and merge (concurrent GC).
        .ok_or(OpError::RegistrationExpired)?;

    let mut advanced = false;
    if is_complete {
        let current = registration.current_step;
        advanced = TempRegistration::advance_step(pool, registration.id, current).await?;
        if advanced {
            if let Some(next) = current.next() {
                registration.current_step = next;
            }
        }
    }

    tracing::debug!(
        registration_id = %registration.id,
        step = registration.current_step.as_str(),
        advanced,
        "Interview answers saved"
    );

    Ok(InterviewOutcome {
        registration,
        advanced,
    })
}

/// Result of a completed registration
#[derive(Debug, Clone)]
pub struct CompletedRegistration {
    /// The newly created account
    pub account: Account,

    /// The creator's owner membership
    pub member: AccountMember,
}

/// Completes the registration: creates the account and consumes the temp
/// record
///
/// Runs in a single transaction:
/// 1. insert the account (the slug unique constraint is the authoritative
///    uniqueness check; a violation maps to the "already taken" reason);
/// 2. insert the caller's membership as ACTIVE owner;
/// 3. record the account as the user's active account and stamp the user's
///    registration step;
/// 4. delete the temp registration.
///
/// # Errors
///
/// - `Slug`: format rejection or slug taken (pre-check or commit-time)
/// - `RegistrationExpired`: the token no longer maps to a registration
pub async fn complete_registration(
    pool: &PgPool,
    identity: &Identity,
    registration_token: &str,
    slug: &str,
    account_name: &str,
) -> Result<CompletedRegistration, OpError> {
    validate_slug_format(slug)?;

    let registration = resolve_registration_record(pool, registration_token)
        .await?
        .ok_or(OpError::RegistrationExpired)?;

    let mut tx = pool.begin().await?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (slug, name)
        VALUES ($1, $2)
        RETURNING id, slug, name, created_at, updated_at
        "#,
    )
    .bind(slug)
    .bind(account_name)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| {
        if is_slug_unique_violation(&err) {
            OpError::Slug(SlugError::Taken)
        } else {
            OpError::Database(err)
        }
    })?;

    let member = sqlx::query_as::<_, AccountMember>(
        r#"
        INSERT INTO account_members (account_id, user_id, is_owner)
        VALUES ($1, $2, TRUE)
        RETURNING id, account_id, user_id, status, is_owner, role_id,
                  last_selected_site_id, created_at, updated_at
        "#,
    )
    .bind(account.id)
    .bind(identity.user_id())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE users
        SET last_selected_account_id = $2,
            registration_step = $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(identity.user_id())
    .bind(account.id)
    .bind(registration.current_step.as_str())
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM temp_registrations WHERE id = $1")
        .bind(registration.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        account_id = %account.id,
        slug = %account.slug,
        user_id = %identity.user_id(),
        "Registration completed"
    );

    Ok(CompletedRegistration { account, member })
}
