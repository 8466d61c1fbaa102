//! Points ledger service
//!
//! The point_transactions table is the authoritative ledger; users.points
//! is a denormalized running balance kept for read efficiency. The two are
//! only ever written together, inside the same database transaction, via
//! `credit` / `debit` below.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{PointTransaction, PointTransactionKind};

/// Points ledger service
pub struct PointsService {
    db_pool: PgPool,
}

/// Filter for the transaction history endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    Earned,
    Redeemed,
    #[default]
    All,
}

/// Lifetime totals alongside the current balance
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsSummary {
    pub total_earned: i64,
    pub total_redeemed: i64,
    pub current_balance: i64,
}

/// Leaderboard row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub name: String,
    pub points: i32,
    pub items_swapped: i64,
}

impl PointsService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Append an EARNED ledger entry and bump the balance in one unit of
    /// work. Runs on the caller's connection so it participates in the
    /// caller's transaction. Returns the new balance.
    pub async fn credit(
        conn: &mut PgConnection,
        user_id: Uuid,
        item_id: Uuid,
        amount: i32,
    ) -> Result<i32, ApiError> {
        sqlx::query(
            r#"
            INSERT INTO point_transactions (user_id, item_id, amount, kind)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(amount)
        .bind(PointTransactionKind::Earned)
        .execute(&mut *conn)
        .await?;

        let (balance,): (i32,) = sqlx::query_as(
            "UPDATE users SET points = points + $1, updated_at = now() WHERE id = $2 RETURNING points",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(balance)
    }

    /// Append a REDEEMED ledger entry and decrement the balance in one
    /// unit of work. The user row is locked first so the balance check
    /// holds until commit; fails with `InsufficientFunds` when the balance
    /// does not cover the amount.
    pub async fn debit(
        conn: &mut PgConnection,
        user_id: Uuid,
        item_id: Uuid,
        amount: i32,
    ) -> Result<i32, ApiError> {
        let (points,): (i32,) = sqlx::query_as("SELECT points FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if points < amount {
            return Err(ApiError::InsufficientFunds { required: amount });
        }

        sqlx::query(
            r#"
            INSERT INTO point_transactions (user_id, item_id, amount, kind)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(-amount)
        .bind(PointTransactionKind::Redeemed)
        .execute(&mut *conn)
        .await?;

        let (balance,): (i32,) = sqlx::query_as(
            "UPDATE users SET points = points - $1, updated_at = now() WHERE id = $2 RETURNING points",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(balance)
    }

    /// Current balance for a user.
    pub async fn balance(&self, user_id: &Uuid) -> Result<i32, ApiError> {
        let (points,): (i32,) = sqlx::query_as("SELECT points FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(points)
    }

    /// Paginated ledger history with lifetime totals.
    pub async fn transaction_history(
        &self,
        user_id: &Uuid,
        filter: HistoryFilter,
        page: i32,
        limit: i32,
    ) -> Result<(Vec<PointTransaction>, i64, PointsSummary), ApiError> {
        let offset = (page - 1) * limit;
        let kind = match filter {
            HistoryFilter::Earned => Some(PointTransactionKind::Earned),
            HistoryFilter::Redeemed => Some(PointTransactionKind::Redeemed),
            HistoryFilter::All => None,
        };

        let transactions = sqlx::query_as::<_, PointTransaction>(
            r#"
            SELECT * FROM point_transactions
            WHERE user_id = $1 AND ($2::point_transaction_kind IS NULL OR kind = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.db_pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM point_transactions
            WHERE user_id = $1 AND ($2::point_transaction_kind IS NULL OR kind = $2)
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_one(&self.db_pool)
        .await?;

        let (total_earned, total_redeemed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE kind = 'EARNED'), 0),
                COALESCE(ABS(SUM(amount) FILTER (WHERE kind = 'REDEEMED')), 0)
            FROM point_transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        let summary = PointsSummary {
            total_earned,
            total_redeemed,
            current_balance: total_earned - total_redeemed,
        };

        Ok((transactions, total, summary))
    }

    /// Top users by points, with their completed-swap counts.
    pub async fn leaderboard(&self, limit: i32) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let entries = sqlx::query_as::<_, (Uuid, String, i32, i64)>(
            r#"
            SELECT u.id, u.name, u.points,
                   (SELECT COUNT(*) FROM items i WHERE i.user_id = u.id AND i.status = 'SWAPPED')
            FROM users u
            WHERE u.points > 0
            ORDER BY u.points DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, name, points, items_swapped))| LeaderboardEntry {
                rank: i as i64 + 1,
                user_id,
                name,
                points,
                items_swapped,
            })
            .collect())
    }
}
