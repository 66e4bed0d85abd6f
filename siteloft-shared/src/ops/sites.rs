/// Site selection and per-site preferences
///
/// Site selection is scoped to the user's currently active account. A site
/// under a different account is reported as NotFound, never Forbidden, so
/// the response cannot confirm the site's existence under another tenant.

use sqlx::PgPool;
use uuid::Uuid;

use super::OpError;
use crate::auth::session::Identity;
use crate::models::member::AccountMember;
use crate::models::site::Site;
use crate::models::site_preference::UserSitePreference;

/// Marks a site as the user's selection within their active account
///
/// Idempotent: reselecting the current site succeeds and changes nothing.
/// The update is applied to every membership row matching (user, account)
/// so no duplicate row can hold a stale selection.
///
/// # Errors
///
/// - `NotFound`: the user has no active account, or the site does not exist
///   inside it (including sites that exist under other accounts)
pub async fn select_site(
    pool: &PgPool,
    identity: &Identity,
    site_id: Uuid,
) -> Result<(), OpError> {
    let account_id = identity
        .active_account_id()
        .ok_or(OpError::NotFound("No active account"))?;

    if !Site::belongs_to_account(pool, site_id, account_id).await? {
        return Err(OpError::NotFound("Site not found"));
    }

    AccountMember::set_last_selected_site(pool, identity.user_id(), account_id, site_id).await?;

    tracing::debug!(user_id = %identity.user_id(), site_id = %site_id, "Site selected");
    Ok(())
}

/// Fetches the user's preference overrides for a site
///
/// Returns None when the user has never set overrides for this site.
pub async fn get_site_preference(
    pool: &PgPool,
    identity: &Identity,
    site_id: Uuid,
) -> Result<Option<UserSitePreference>, OpError> {
    let pref = UserSitePreference::find(pool, identity.user_id(), site_id).await?;
    Ok(pref)
}
