//! Swap service - the request state machine and the completion
//! transaction.
//!
//! Requests move PENDING -> {ACCEPTED, REJECTED, CANCELLED}; all three are
//! terminal. Creation has no side effects on items or points: everything
//! settles inside the completion transaction on acceptance, under row
//! locks, so points can never be double-spent and an item can never be
//! swapped twice. A redemption's balance is checked at creation time but
//! not reserved; the accept path re-checks it under a lock, so the request
//! can legitimately fail with `InsufficientFunds` at acceptance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    Item, ItemStatus, PaginationParams, PublicUser, Swap, SwapRequest, SwapRequestStatus,
};
use crate::services::{ItemService, PointsService};

/// Payload for creating a swap request. With `offered_item_id` it is a
/// direct swap; without, a point redemption.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequestInput {
    pub item_id: Uuid,
    pub offered_item_id: Option<Uuid>,
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

/// Accept or reject, decided by the target item's owner
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwapAction {
    Accept,
    Reject,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondToSwapRequestInput {
    pub action: SwapAction,
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

/// Which side of a request the caller wants to see
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestScope {
    Sent,
    Received,
    #[default]
    All,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSwapRequestsQuery {
    #[serde(rename = "type", default)]
    pub scope: RequestScope,
    pub status: Option<SwapRequestStatus>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// A swap request with its target item and requester attached
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestView {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub item: Item,
    pub requester: PublicUser,
    pub is_point_redemption: bool,
    pub is_sent: bool,
    pub is_received: bool,
}

/// Full detail for a single request, participants only
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestDetails {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub item: Item,
    pub requester: PublicUser,
    pub swap: Option<Swap>,
    pub points_required: Option<i32>,
    pub user_role: &'static str,
}

/// Result of responding to a request; `swap` is present on acceptance
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponseOutcome {
    pub swap_request: SwapRequest,
    pub swap: Option<Swap>,
}

/// A completed swap with both items attached
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapHistoryEntry {
    #[serde(flatten)]
    pub swap: Swap,
    pub item_given: Item,
    pub item_received: Item,
    pub is_point_redemption: bool,
    pub user_role: &'static str,
}

/// Request counts by status, one side of a user's swap activity
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

/// A user's swap activity for the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSwapStats {
    pub sent: RequestStatusCounts,
    pub received: RequestStatusCounts,
    pub completed: i64,
}

/// Swap service for the request lifecycle and completion
pub struct SwapService {
    db_pool: PgPool,
}

impl SwapService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a swap request (direct swap or point redemption). No side
    /// effects on items or points; those happen on acceptance.
    pub async fn create_swap_request(
        &self,
        requester_id: Uuid,
        input: CreateSwapRequestInput,
    ) -> Result<SwapRequest, ApiError> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(input.item_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Requested item not found".to_string()))?;

        if item.status != ItemStatus::Available {
            return Err(ApiError::InvalidState(
                "Item is not available for swapping".to_string(),
            ));
        }
        if item.user_id == requester_id {
            return Err(ApiError::InvalidOperation(
                "Cannot request your own item".to_string(),
            ));
        }

        if let Some(offered_item_id) = input.offered_item_id {
            let offered = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
                .bind(offered_item_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Offered item not found".to_string()))?;

            if offered.user_id != requester_id {
                return Err(ApiError::Forbidden(
                    "You can only offer your own items".to_string(),
                ));
            }
            if offered.status != ItemStatus::Available {
                return Err(ApiError::InvalidState(
                    "Offered item is not available for swapping".to_string(),
                ));
            }
        } else {
            // Redemption: the balance must cover the item's current points
            // value. Checked again at acceptance; nothing is reserved here.
            let required = item.condition.points_value();
            let (points,): (i32,) = sqlx::query_as("SELECT points FROM users WHERE id = $1")
                .bind(requester_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

            if points < required {
                return Err(ApiError::InsufficientFunds { required });
            }
        }

        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM swap_requests
            WHERE requester_id = $1 AND item_id = $2 AND status = 'PENDING'
            "#,
        )
        .bind(requester_id)
        .bind(input.item_id)
        .fetch_optional(&self.db_pool)
        .await?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "You already have a pending request for this item".to_string(),
            ));
        }

        let request = sqlx::query_as::<_, SwapRequest>(
            r#"
            INSERT INTO swap_requests (requester_id, item_id, offered_item_id, message, status)
            VALUES ($1, $2, $3, $4, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(input.item_id)
        .bind(input.offered_item_id)
        .bind(input.message.as_deref().map(str::trim))
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| match &e {
            // Concurrent duplicate creation lands on the partial unique index.
            sqlx::Error::Database(db)
                if db.constraint() == Some("swap_requests_one_pending_idx") =>
            {
                ApiError::Conflict("You already have a pending request for this item".to_string())
            }
            _ => ApiError::from(e),
        })?;

        tracing::info!(
            request_id = %request.id,
            requester_id = %requester_id,
            item_id = %input.item_id,
            redemption = request.is_point_redemption(),
            "swap request created"
        );

        Ok(request)
    }

    /// Accept or reject a pending request. Only the target item's owner
    /// may respond; acceptance runs the completion transaction.
    pub async fn respond_to_swap_request(
        &self,
        swap_request_id: &Uuid,
        owner_id: &Uuid,
        input: RespondToSwapRequestInput,
    ) -> Result<SwapResponseOutcome, ApiError> {
        let request =
            sqlx::query_as::<_, SwapRequest>("SELECT * FROM swap_requests WHERE id = $1")
                .bind(swap_request_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Swap request not found".to_string()))?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(request.item_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Requested item not found".to_string()))?;

        if item.user_id != *owner_id {
            return Err(ApiError::Forbidden(
                "You can only respond to requests for your own items".to_string(),
            ));
        }
        if request.status.is_terminal() {
            return Err(ApiError::InvalidState(
                "This request has already been processed".to_string(),
            ));
        }

        match input.action {
            SwapAction::Reject => {
                // Guarded update in case the request was processed since
                // the read above.
                let updated = sqlx::query_as::<_, SwapRequest>(
                    r#"
                    UPDATE swap_requests SET status = 'REJECTED', updated_at = now()
                    WHERE id = $1 AND status = 'PENDING'
                    RETURNING *
                    "#,
                )
                .bind(swap_request_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| {
                    ApiError::InvalidState("This request has already been processed".to_string())
                })?;

                Ok(SwapResponseOutcome {
                    swap_request: updated,
                    swap: None,
                })
            }
            SwapAction::Accept => self.complete_swap(swap_request_id).await,
        }
    }

    /// The swap completion transaction. Everything here happens inside a
    /// single database transaction with row locks on the swap request, the
    /// involved items, and (for a redemption) the requester's user row; on
    /// any error the transaction rolls back and the request stays PENDING.
    async fn complete_swap(&self, swap_request_id: &Uuid) -> Result<SwapResponseOutcome, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        // Re-fetch under lock: the caller's read happened outside the
        // transaction and a concurrent accept may have won.
        let request = sqlx::query_as::<_, SwapRequest>(
            "SELECT * FROM swap_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(swap_request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Swap request not found".to_string()))?;

        if request.status != SwapRequestStatus::Pending {
            return Err(ApiError::InvalidState(
                "This request has already been processed".to_string(),
            ));
        }

        // Lock the involved item rows in id order so concurrent accepts
        // touching the same items cannot deadlock.
        let mut involved = vec![request.item_id];
        if let Some(offered_item_id) = request.offered_item_id {
            involved.push(offered_item_id);
        }
        involved.sort();

        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&involved)
        .fetch_all(&mut *tx)
        .await?;

        let target = items
            .iter()
            .find(|i| i.id == request.item_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Requested item not found".to_string()))?;

        let swap = if let Some(offered_item_id) = request.offered_item_id {
            if !items.iter().any(|i| i.id == offered_item_id) {
                return Err(ApiError::NotFound("Offered item not found".to_string()));
            }

            ItemService::mark_swapped(&mut tx, &involved).await?;
            Self::insert_swap(&mut tx, &request, target.user_id, offered_item_id, target.id)
                .await?
        } else {
            // Lock both user rows in id order before the ledger writes;
            // the debit/credit pair takes them in role order, which lets
            // two mirrored accepts deadlock.
            let mut participants = vec![request.requester_id, target.user_id];
            participants.sort();
            sqlx::query("SELECT id FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
                .bind(&participants)
                .execute(&mut *tx)
                .await?;

            // Points value is re-derived from the item's current
            // condition, and the balance re-checked under lock; it can
            // have dropped since the request was created.
            let points = target.condition.points_value();
            PointsService::debit(&mut tx, request.requester_id, target.id, points).await?;
            PointsService::credit(&mut tx, target.user_id, target.id, points).await?;
            ItemService::mark_swapped(&mut tx, &[target.id]).await?;
            Self::insert_swap(&mut tx, &request, target.user_id, target.id, target.id).await?
        };

        let accepted = sqlx::query_as::<_, SwapRequest>(
            r#"
            UPDATE swap_requests SET status = 'ACCEPTED', updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?;

        // Every other pending request touching the involved items (as
        // target or as offer) is now stale.
        let cancelled = sqlx::query(
            r#"
            UPDATE swap_requests SET status = 'CANCELLED', updated_at = now()
            WHERE id != $1 AND status = 'PENDING'
              AND (item_id = ANY($2) OR offered_item_id = ANY($2))
            "#,
        )
        .bind(request.id)
        .bind(&involved)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = %accepted.id,
            swap_id = %swap.id,
            competing_cancelled = cancelled.rows_affected(),
            "swap completed"
        );

        Ok(SwapResponseOutcome {
            swap_request: accepted,
            swap: Some(swap),
        })
    }

    async fn insert_swap(
        conn: &mut PgConnection,
        request: &SwapRequest,
        receiver_id: Uuid,
        item_given_id: Uuid,
        item_received_id: Uuid,
    ) -> Result<Swap, ApiError> {
        let swap = sqlx::query_as::<_, Swap>(
            r#"
            INSERT INTO swaps (swap_request_id, initiator_id, receiver_id, item_given_id, item_received_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(request.requester_id)
        .bind(receiver_id)
        .bind(item_given_id)
        .bind(item_received_id)
        .fetch_one(conn)
        .await?;

        Ok(swap)
    }

    /// Cancel a pending request. Requester-only; no other side effects.
    pub async fn cancel_swap_request(
        &self,
        swap_request_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<SwapRequest, ApiError> {
        let request =
            sqlx::query_as::<_, SwapRequest>("SELECT * FROM swap_requests WHERE id = $1")
                .bind(swap_request_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Swap request not found".to_string()))?;

        if request.requester_id != *user_id {
            return Err(ApiError::Forbidden(
                "You can only cancel your own requests".to_string(),
            ));
        }
        if request.status.is_terminal() {
            return Err(ApiError::InvalidState(
                "Only pending requests can be cancelled".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, SwapRequest>(
            r#"
            UPDATE swap_requests SET status = 'CANCELLED', updated_at = now()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(swap_request_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidState("Only pending requests can be cancelled".to_string())
        })?;

        Ok(updated)
    }

    /// List a user's requests, sent and/or received, newest first.
    pub async fn list_swap_requests(
        &self,
        user_id: &Uuid,
        query: &ListSwapRequestsQuery,
    ) -> Result<(Vec<SwapRequestView>, i64), ApiError> {
        let (page, limit, _) = PaginationParams {
            page: query.page,
            limit: query.limit,
        }
        .resolve();
        let offset = (page - 1) * limit;

        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT sr.* FROM swap_requests sr JOIN items i ON i.id = sr.item_id WHERE ",
        );
        Self::apply_scope(&mut qb, query, user_id);
        qb.push(" ORDER BY sr.created_at DESC LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(offset));

        let requests = qb
            .build_query_as::<SwapRequest>()
            .fetch_all(&self.db_pool)
            .await?;

        let mut count_qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM swap_requests sr JOIN items i ON i.id = sr.item_id WHERE ",
        );
        Self::apply_scope(&mut count_qb, query, user_id);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(&self.db_pool)
            .await?;

        let views = self.attach_context(requests, user_id).await?;

        Ok((views, total))
    }

    fn apply_scope(
        qb: &mut QueryBuilder<'_, sqlx::Postgres>,
        query: &ListSwapRequestsQuery,
        user_id: &Uuid,
    ) {
        match query.scope {
            RequestScope::Sent => {
                qb.push("sr.requester_id = ");
                qb.push_bind(*user_id);
            }
            RequestScope::Received => {
                qb.push("i.user_id = ");
                qb.push_bind(*user_id);
            }
            RequestScope::All => {
                qb.push("(sr.requester_id = ");
                qb.push_bind(*user_id);
                qb.push(" OR i.user_id = ");
                qb.push_bind(*user_id);
                qb.push(")");
            }
        }

        if let Some(status) = query.status {
            qb.push(" AND sr.status = ");
            qb.push_bind(status);
        }
    }

    async fn attach_context(
        &self,
        requests: Vec<SwapRequest>,
        user_id: &Uuid,
    ) -> Result<Vec<SwapRequestView>, ApiError> {
        let item_ids: Vec<Uuid> = requests.iter().map(|r| r.item_id).collect();
        let requester_ids: Vec<Uuid> = requests.iter().map(|r| r.requester_id).collect();

        let items: HashMap<Uuid, Item> =
            sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ANY($1)")
                .bind(&item_ids)
                .fetch_all(&self.db_pool)
                .await?
                .into_iter()
                .map(|i| (i.id, i))
                .collect();

        let requesters: HashMap<Uuid, PublicUser> = sqlx::query_as::<_, PublicUser>(
            "SELECT id, name, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(&requester_ids)
        .fetch_all(&self.db_pool)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let item = items
                .get(&request.item_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("Requested item not found".to_string()))?;
            let requester = requesters
                .get(&request.requester_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

            let is_sent = request.requester_id == *user_id;
            let is_received = item.user_id == *user_id;
            let is_point_redemption = request.is_point_redemption();

            views.push(SwapRequestView {
                request,
                item,
                requester,
                is_point_redemption,
                is_sent,
                is_received,
            });
        }

        Ok(views)
    }

    /// Detail view for a single request. Only the requester and the
    /// target item's owner may see it.
    pub async fn swap_request_details(
        &self,
        swap_request_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<SwapRequestDetails, ApiError> {
        let request =
            sqlx::query_as::<_, SwapRequest>("SELECT * FROM swap_requests WHERE id = $1")
                .bind(swap_request_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Swap request not found".to_string()))?;

        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(request.item_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Requested item not found".to_string()))?;

        let is_requester = request.requester_id == *user_id;
        let is_owner = item.user_id == *user_id;
        if !is_requester && !is_owner {
            return Err(ApiError::Forbidden(
                "You are not involved in this swap request".to_string(),
            ));
        }

        let requester = sqlx::query_as::<_, PublicUser>(
            "SELECT id, name, created_at FROM users WHERE id = $1",
        )
        .bind(request.requester_id)
        .fetch_one(&self.db_pool)
        .await?;

        let swap = sqlx::query_as::<_, Swap>("SELECT * FROM swaps WHERE swap_request_id = $1")
            .bind(request.id)
            .fetch_optional(&self.db_pool)
            .await?;

        let points_required = request
            .is_point_redemption()
            .then(|| item.condition.points_value());

        Ok(SwapRequestDetails {
            user_role: if is_requester { "requester" } else { "owner" },
            points_required,
            request,
            item,
            requester,
            swap,
        })
    }

    /// Sent/received request counts by status plus completed swaps, for
    /// the dashboard.
    pub async fn user_swap_stats(&self, user_id: &Uuid) -> Result<UserSwapStats, ApiError> {
        let sent: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'PENDING'),
                   COUNT(*) FILTER (WHERE status = 'ACCEPTED'),
                   COUNT(*) FILTER (WHERE status = 'REJECTED')
            FROM swap_requests
            WHERE requester_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        let received: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE sr.status = 'PENDING'),
                   COUNT(*) FILTER (WHERE sr.status = 'ACCEPTED'),
                   COUNT(*) FILTER (WHERE sr.status = 'REJECTED')
            FROM swap_requests sr
            JOIN items i ON i.id = sr.item_id
            WHERE i.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        let (completed,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM swaps WHERE initiator_id = $1 OR receiver_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(UserSwapStats {
            sent: RequestStatusCounts {
                total: sent.0,
                pending: sent.1,
                accepted: sent.2,
                rejected: sent.3,
            },
            received: RequestStatusCounts {
                total: received.0,
                pending: received.1,
                accepted: received.2,
                rejected: received.3,
            },
            completed,
        })
    }

    /// Completed swaps involving the user, newest first.
    pub async fn swap_history(
        &self,
        user_id: &Uuid,
        page: i32,
        limit: i32,
    ) -> Result<(Vec<SwapHistoryEntry>, i64), ApiError> {
        let offset = (page - 1) * limit;

        let swaps = sqlx::query_as::<_, Swap>(
            r#"
            SELECT * FROM swaps
            WHERE initiator_id = $1 OR receiver_id = $1
            ORDER BY completed_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.db_pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM swaps WHERE initiator_id = $1 OR receiver_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        let mut item_ids: Vec<Uuid> = Vec::with_capacity(swaps.len() * 2);
        for swap in &swaps {
            item_ids.push(swap.item_given_id);
            item_ids.push(swap.item_received_id);
        }

        let items: HashMap<Uuid, Item> =
            sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ANY($1)")
                .bind(&item_ids)
                .fetch_all(&self.db_pool)
                .await?
                .into_iter()
                .map(|i| (i.id, i))
                .collect();

        let mut entries = Vec::with_capacity(swaps.len());
        for swap in swaps {
            let item_given = items
                .get(&swap.item_given_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;
            let item_received = items
                .get(&swap.item_received_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

            let is_point_redemption = swap.item_given_id == swap.item_received_id;
            let user_role = if swap.initiator_id == *user_id {
                "initiator"
            } else {
                "receiver"
            };

            entries.push(SwapHistoryEntry {
                swap,
                item_given,
                item_received,
                is_point_redemption,
                user_role,
            });
        }

        Ok((entries, total))
    }
}
