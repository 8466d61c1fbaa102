//! User resolution for authenticated callers

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::Claims;
use crate::error::ApiError;
use crate::models::User;

/// Counts embedded in the caller's own profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub items_listed: i64,
    pub swaps_initiated: i64,
    pub swaps_received: i64,
}

/// Counts embedded in a public profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileStats {
    pub items_available: i64,
    pub total_swaps: i64,
}

/// Resolves verified token claims to a local user row.
pub struct AuthService {
    db_pool: PgPool,
}

impl AuthService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Look up the caller by email, creating the row on first successful
    /// authentication. Users are never hard-deleted, so this is the only
    /// write path for the users table outside the points ledger.
    pub async fn resolve_user(&self, claims: &Claims) -> Result<User, ApiError> {
        let name = claims
            .name
            .clone()
            .unwrap_or_else(|| default_name(&claims.email));

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&claims.email)
        .bind(&name)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn get_user(&self, id: &Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(user)
    }

    /// Listing and swap counts for the caller's own profile.
    pub async fn profile_stats(&self, user_id: &Uuid) -> Result<ProfileStats, ApiError> {
        let (items_listed, swaps_initiated, swaps_received): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items WHERE user_id = $1),
                (SELECT COUNT(*) FROM swaps WHERE initiator_id = $1),
                (SELECT COUNT(*) FROM swaps WHERE receiver_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(ProfileStats {
            items_listed,
            swaps_initiated,
            swaps_received,
        })
    }

    /// Counts shown on a user's public profile.
    pub async fn public_profile_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<PublicProfileStats, ApiError> {
        let (items_available, total_swaps): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items WHERE user_id = $1 AND status = 'AVAILABLE'),
                (SELECT COUNT(*) FROM swaps WHERE initiator_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(PublicProfileStats {
            items_available,
            total_swaps,
        })
    }
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
