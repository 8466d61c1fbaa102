//! Item registry service - listing CRUD, moderation, and the swap-facing
//! status transition.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::models::{
    Item, ItemCategory, ItemCondition, ItemKind, ItemSize, ItemStatus, PaginationParams,
};

/// Create-item payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[validate(length(min = 10, max = 1000))]
    pub description: String,
    pub category: ItemCategory,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub size: ItemSize,
    pub condition: ItemCondition,
    #[validate(length(min = 1, max = 10), custom = "validate_tags")]
    pub tags: Vec<String>,
    #[validate(length(min = 1, max = 5), custom = "validate_images")]
    pub images: Vec<String>,
}

/// Update-item payload; every field optional
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(length(min = 3, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 1000))]
    pub description: Option<String>,
    pub category: Option<ItemCategory>,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub size: Option<ItemSize>,
    pub condition: Option<ItemCondition>,
    #[validate(length(min = 1, max = 10), custom = "validate_tags")]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 1, max = 5), custom = "validate_images")]
    pub images: Option<Vec<String>>,
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().all(|t| (2..=20).contains(&t.trim().len())) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "each tag must be between 2 and 20 characters",
        ))
    }
}

fn validate_images(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().all(|u| u.starts_with("https://")) {
        Ok(())
    } else {
        Err(ValidationError::new("image URLs must be https"))
    }
}

/// Sortable columns for listings. Closed set so the column name can be
/// pushed into SQL directly.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemSortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl ItemSortBy {
    fn column(self) -> &'static str {
        match self {
            ItemSortBy::CreatedAt => "created_at",
            ItemSortBy::UpdatedAt => "updated_at",
            ItemSortBy::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    pub category: Option<ItemCategory>,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub size: Option<ItemSize>,
    pub condition: Option<ItemCondition>,
    /// Comma-separated tag list; matches items carrying any of them.
    pub tags: Option<String>,
    pub search: Option<String>,
    pub status: Option<ItemStatus>,
    pub user_id: Option<Uuid>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
    #[serde(default)]
    pub sort_by: ItemSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// A user's item counts by status, for the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItemStats {
    pub total: i64,
    pub pending: i64,
    pub available: i64,
    pub swapped: i64,
    pub rejected: i64,
}

/// Item with its pending-request count attached
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: Item,
    pub pending_requests: i64,
}

/// Platform-wide counts for the admin overview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_items: i64,
    pub pending_items: i64,
    pub available_items: i64,
    pub swapped_items: i64,
    pub rejected_items: i64,
    pub completed_swaps: i64,
}

/// Item service for listing lifecycle and moderation
pub struct ItemService {
    db_pool: PgPool,
}

impl ItemService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a new listing. Items start PENDING and only become visible
    /// once an admin approves them.
    pub async fn create_item(
        &self,
        user_id: Uuid,
        request: CreateItemRequest,
    ) -> Result<Item, ApiError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (user_id, title, description, category, kind, size, condition, tags, images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(request.title.trim())
        .bind(request.description.trim())
        .bind(request.category)
        .bind(request.kind)
        .bind(request.size)
        .bind(request.condition)
        .bind(&request.tags)
        .bind(&request.images)
        .bind(ItemStatus::Pending)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(item)
    }

    /// Get a single item by ID.
    pub async fn get_item(&self, id: &Uuid) -> Result<Option<Item>, ApiError> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(item)
    }

    async fn get_item_required(&self, id: &Uuid) -> Result<Item, ApiError> {
        self.get_item(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))
    }

    /// List items with filtering, pagination, and sorting. When
    /// `public_only` is set, only AVAILABLE items are returned and any
    /// status filter in the query is ignored.
    pub async fn list_items(
        &self,
        query: &ListItemsQuery,
        public_only: bool,
    ) -> Result<(Vec<Item>, i64), ApiError> {
        let (page, limit, _) = PaginationParams {
            page: query.page,
            limit: query.limit,
        }
        .resolve();
        let offset = (page - 1) * limit;

        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("SELECT * FROM items");
        Self::apply_filters(&mut qb, query, public_only);
        qb.push(" ORDER BY ");
        qb.push(query.sort_by.column());
        qb.push(" ");
        qb.push(query.sort_order.keyword());
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(offset));

        let items = qb
            .build_query_as::<Item>()
            .fetch_all(&self.db_pool)
            .await?;

        let mut count_qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM items");
        Self::apply_filters(&mut count_qb, query, public_only);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(&self.db_pool)
            .await?;

        Ok((items, total))
    }

    fn apply_filters(
        qb: &mut QueryBuilder<'_, sqlx::Postgres>,
        query: &ListItemsQuery,
        public_only: bool,
    ) {
        qb.push(" WHERE 1=1");

        if public_only {
            qb.push(" AND status = ");
            qb.push_bind(ItemStatus::Available);
        } else if let Some(status) = query.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        if let Some(category) = query.category {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }
        if let Some(kind) = query.kind {
            qb.push(" AND kind = ");
            qb.push_bind(kind);
        }
        if let Some(size) = query.size {
            qb.push(" AND size = ");
            qb.push_bind(size);
        }
        if let Some(condition) = query.condition {
            qb.push(" AND condition = ");
            qb.push_bind(condition);
        }
        if let Some(user_id) = query.user_id {
            qb.push(" AND user_id = ");
            qb.push_bind(user_id);
        }
        if let Some(tags) = &query.tags {
            let tags: Vec<String> = tags
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !tags.is_empty() {
                qb.push(" AND tags && ");
                qb.push_bind(tags);
            }
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }

    /// Recently approved items for the landing page.
    pub async fn featured_items(&self, limit: i32) -> Result<Vec<Item>, ApiError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE status = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(ItemStatus::Available)
        .bind(i64::from(limit.clamp(1, 50)))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(items)
    }

    /// Update a listing. Owner-only unless admin; SWAPPED items are
    /// immutable; a non-admin edit of an AVAILABLE item sends it back to
    /// review.
    pub async fn update_item(
        &self,
        item_id: &Uuid,
        user_id: &Uuid,
        request: UpdateItemRequest,
        is_admin: bool,
    ) -> Result<Item, ApiError> {
        let item = self.get_item_required(item_id).await?;

        if !is_admin && item.user_id != *user_id {
            return Err(ApiError::Forbidden(
                "You can only update your own items".to_string(),
            ));
        }
        if item.status == ItemStatus::Swapped {
            return Err(ApiError::InvalidState(
                "Cannot update swapped items".to_string(),
            ));
        }

        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE items SET updated_at = now()");

        if let Some(title) = &request.title {
            qb.push(", title = ");
            qb.push_bind(title.trim().to_string());
        }
        if let Some(description) = &request.description {
            qb.push(", description = ");
            qb.push_bind(description.trim().to_string());
        }
        if let Some(category) = request.category {
            qb.push(", category = ");
            qb.push_bind(category);
        }
        if let Some(kind) = request.kind {
            qb.push(", kind = ");
            qb.push_bind(kind);
        }
        if let Some(size) = request.size {
            qb.push(", size = ");
            qb.push_bind(size);
        }
        if let Some(condition) = request.condition {
            qb.push(", condition = ");
            qb.push_bind(condition);
        }
        if let Some(tags) = &request.tags {
            qb.push(", tags = ");
            qb.push_bind(tags.clone());
        }
        if let Some(images) = &request.images {
            qb.push(", images = ");
            qb.push_bind(images.clone());
        }

        // An approved item edited by its owner needs re-approval.
        if !is_admin
            && item.status == ItemStatus::Available
            && item.status.can_transition_to(ItemStatus::Pending)
        {
            qb.push(", status = ");
            qb.push_bind(ItemStatus::Pending);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(*item_id);
        qb.push(" RETURNING *");

        let updated = qb
            .build_query_as::<Item>()
            .fetch_one(&self.db_pool)
            .await?;

        Ok(updated)
    }

    /// Delete a listing. SWAPPED items and items referenced by pending
    /// swap requests cannot be deleted.
    pub async fn delete_item(
        &self,
        item_id: &Uuid,
        user_id: &Uuid,
        is_admin: bool,
    ) -> Result<(), ApiError> {
        let item = self.get_item_required(item_id).await?;

        if !is_admin && item.user_id != *user_id {
            return Err(ApiError::Forbidden(
                "You can only delete your own items".to_string(),
            ));
        }
        if item.status == ItemStatus::Swapped {
            return Err(ApiError::InvalidState(
                "Cannot delete swapped items".to_string(),
            ));
        }

        let (pending,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM swap_requests
            WHERE (item_id = $1 OR offered_item_id = $1) AND status = 'PENDING'
            "#,
        )
        .bind(item_id)
        .fetch_one(&self.db_pool)
        .await?;

        if pending > 0 {
            return Err(ApiError::InvalidOperation(
                "Cannot delete item with pending swap requests".to_string(),
            ));
        }

        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    /// Admin approval/rejection of a PENDING item.
    pub async fn moderate_item(&self, item_id: &Uuid, approve: bool) -> Result<Item, ApiError> {
        let item = self.get_item_required(item_id).await?;

        let next = if approve {
            ItemStatus::Available
        } else {
            ItemStatus::Rejected
        };

        if !item.status.can_transition_to(next) {
            return Err(ApiError::InvalidState(
                "Can only approve or reject pending items".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Item>(
            "UPDATE items SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(next)
        .bind(item_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(updated)
    }

    /// Items owned by a user. Owners and admins see everything; everyone
    /// else sees only AVAILABLE listings.
    pub async fn items_by_user(
        &self,
        user_id: &Uuid,
        requester_id: &Uuid,
        is_admin: bool,
    ) -> Result<Vec<Item>, ApiError> {
        let all = is_admin || user_id == requester_id;

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE user_id = $1 AND ($2 OR status = 'AVAILABLE')
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(all)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(items)
    }

    /// PENDING items awaiting moderation, oldest first.
    pub async fn pending_items(&self, page: i32, limit: i32) -> Result<(Vec<Item>, i64), ApiError> {
        let offset = (page - 1) * limit;

        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE status = 'PENDING' ORDER BY created_at ASC LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.db_pool)
        .await?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM items WHERE status = 'PENDING'")
                .fetch_one(&self.db_pool)
                .await?;

        Ok((items, total))
    }

    /// A user's item counts by status, for the dashboard.
    pub async fn user_item_stats(&self, user_id: &Uuid) -> Result<UserItemStats, ApiError> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'PENDING'),
                   COUNT(*) FILTER (WHERE status = 'AVAILABLE'),
                   COUNT(*) FILTER (WHERE status = 'SWAPPED'),
                   COUNT(*) FILTER (WHERE status = 'REJECTED')
            FROM items
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(UserItemStats {
            total: row.0,
            pending: row.1,
            available: row.2,
            swapped: row.3,
            rejected: row.4,
        })
    }

    /// A user's most recent listings with their pending-request counts.
    pub async fn recent_items(
        &self,
        user_id: &Uuid,
        limit: i32,
    ) -> Result<Vec<RecentItem>, ApiError> {
        let items = sqlx::query_as::<_, RecentItem>(
            r#"
            SELECT i.*,
                   (SELECT COUNT(*) FROM swap_requests sr
                    WHERE sr.item_id = i.id AND sr.status = 'PENDING') AS pending_requests
            FROM items i
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(items)
    }

    /// Platform counts for the admin overview.
    pub async fn platform_stats(&self) -> Result<PlatformStats, ApiError> {
        let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM items),
                (SELECT COUNT(*) FROM items WHERE status = 'PENDING'),
                (SELECT COUNT(*) FROM items WHERE status = 'AVAILABLE'),
                (SELECT COUNT(*) FROM items WHERE status = 'SWAPPED'),
                (SELECT COUNT(*) FROM items WHERE status = 'REJECTED'),
                (SELECT COUNT(*) FROM swaps)
            "#,
        )
        .fetch_one(&self.db_pool)
        .await?;

        Ok(PlatformStats {
            total_users: row.0,
            total_items: row.1,
            pending_items: row.2,
            available_items: row.3,
            swapped_items: row.4,
            rejected_items: row.5,
            completed_swaps: row.6,
        })
    }

    /// Transition items to SWAPPED on the caller's (transactional)
    /// connection. Guarded with `status = 'AVAILABLE'` and an
    /// affected-row check so a concurrent accept cannot swap an item
    /// twice.
    pub async fn mark_swapped(conn: &mut PgConnection, ids: &[Uuid]) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            UPDATE items SET status = 'SWAPPED', updated_at = now()
            WHERE id = ANY($1) AND status = 'AVAILABLE'
            "#,
        )
        .bind(ids)
        .execute(conn)
        .await?;

        if result.rows_affected() != ids.len() as u64 {
            return Err(ApiError::InvalidState(
                "Item is no longer available for swapping".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateItemRequest {
        CreateItemRequest {
            title: "Denim jacket".to_string(),
            description: "Lightly worn denim jacket.".to_string(),
            category: ItemCategory::Unisex,
            kind: ItemKind::Jacket,
            size: ItemSize::M,
            condition: ItemCondition::Good,
            tags: vec!["denim".to_string(), "jacket".to_string()],
            images: vec!["https://example.com/jacket.jpg".to_string()],
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn short_title_is_rejected() {
        let mut p = payload();
        p.title = "ab".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn tag_length_bounds() {
        let mut p = payload();
        p.tags = vec!["x".to_string()];
        assert!(p.validate().is_err());

        p.tags = vec!["a".repeat(21)];
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_https_image_is_rejected() {
        let mut p = payload();
        p.images = vec!["http://example.com/jacket.jpg".to_string()];
        assert!(p.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        let update = UpdateItemRequest {
            title: None,
            description: None,
            category: None,
            kind: None,
            size: None,
            condition: None,
            tags: None,
            images: None,
        };
        assert!(update.validate().is_ok());
    }
}
