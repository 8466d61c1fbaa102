//! Data models for the ReWear backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub points: i32,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to embed in listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Item listing model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ItemCategory,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub size: ItemSize,
    pub condition: ItemCondition,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "item_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Pending,
    Available,
    Swapped,
    Rejected,
}

impl ItemStatus {
    /// Transition table for the item lifecycle. SWAPPED and REJECTED are
    /// terminal; an owner edit sends an AVAILABLE item back to review.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (ItemStatus::Pending, ItemStatus::Available)
                | (ItemStatus::Pending, ItemStatus::Rejected)
                | (ItemStatus::Available, ItemStatus::Pending)
                | (ItemStatus::Available, ItemStatus::Swapped)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Swapped | ItemStatus::Rejected)
    }
}

/// Item categories
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "item_category", rename_all = "UPPERCASE")]
pub enum ItemCategory {
    Men,
    Women,
    Kids,
    Unisex,
}

/// Garment types
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "item_kind", rename_all = "UPPERCASE")]
pub enum ItemKind {
    Shirt,
    Pants,
    Dress,
    Jacket,
    Shoes,
    Accessories,
    Other,
}

/// Garment sizes
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "item_size", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSize {
    #[serde(rename = "XS")]
    Xs,
    S,
    M,
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "XXXL")]
    Xxxl,
    #[serde(rename = "One Size")]
    OneSize,
}

/// Item condition, the sole input to an item's points value
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "item_condition", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCondition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    /// Points value of an item, derived from its condition alone.
    pub fn points_value(self) -> i32 {
        match self {
            ItemCondition::New => 50,
            ItemCondition::LikeNew => 40,
            ItemCondition::Good => 30,
            ItemCondition::Fair => 20,
            ItemCondition::Poor => 10,
        }
    }
}

/// Swap request model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_id: Uuid,
    pub offered_item_id: Option<Uuid>,
    pub message: Option<String>,
    pub status: SwapRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapRequest {
    /// A request with no offered item is settled in points.
    pub fn is_point_redemption(&self) -> bool {
        self.offered_item_id.is_none()
    }
}

/// Swap request lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "swap_request_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SwapRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapRequestStatus {
    /// Transition table for swap requests. Everything other than PENDING
    /// is terminal.
    pub fn can_transition_to(self, next: SwapRequestStatus) -> bool {
        self == SwapRequestStatus::Pending && next != SwapRequestStatus::Pending
    }

    pub fn is_terminal(self) -> bool {
        self != SwapRequestStatus::Pending
    }
}

/// Completed-exchange record, created atomically with acceptance
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub id: Uuid,
    pub swap_request_id: Uuid,
    pub initiator_id: Uuid,
    pub receiver_id: Uuid,
    pub item_given_id: Uuid,
    pub item_received_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

/// Points ledger entry. Append-only; the user's balance is the running sum.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub amount: i32,
    pub kind: PointTransactionKind,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry kinds
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "point_transaction_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PointTransactionKind {
    Earned,
    Redeemed,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl PaginationParams {
    /// Clamped (page, limit, offset) with the defaults used across the API.
    pub fn resolve(self) -> (i32, i32, i32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        (page, limit, (page - 1) * limit)
    }
}

/// Paginated response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i32,
    pub limit: i32,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: i32, limit: i32) -> Self {
        let total_pages = (total + i64::from(limit) - 1) / i64::from(limit);
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapped_is_terminal() {
        assert!(ItemStatus::Swapped.is_terminal());
        for next in [
            ItemStatus::Pending,
            ItemStatus::Available,
            ItemStatus::Swapped,
            ItemStatus::Rejected,
        ] {
            assert!(!ItemStatus::Swapped.can_transition_to(next));
            assert!(!ItemStatus::Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn item_transitions() {
        assert!(ItemStatus::Pending.can_transition_to(ItemStatus::Available));
        assert!(ItemStatus::Pending.can_transition_to(ItemStatus::Rejected));
        assert!(ItemStatus::Available.can_transition_to(ItemStatus::Pending));
        assert!(ItemStatus::Available.can_transition_to(ItemStatus::Swapped));
        assert!(!ItemStatus::Pending.can_transition_to(ItemStatus::Swapped));
        assert!(!ItemStatus::Available.can_transition_to(ItemStatus::Rejected));
    }

    #[test]
    fn request_transitions_are_one_way() {
        use SwapRequestStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        for terminal in [Accepted, Rejected, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Accepted, Rejected, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn points_by_condition() {
        assert_eq!(ItemCondition::New.points_value(), 50);
        assert_eq!(ItemCondition::LikeNew.points_value(), 40);
        assert_eq!(ItemCondition::Good.points_value(), 30);
        assert_eq!(ItemCondition::Fair.points_value(), 20);
        assert_eq!(ItemCondition::Poor.points_value(), 10);
    }

    #[test]
    fn condition_wire_names() {
        let json = serde_json::to_string(&ItemCondition::LikeNew).unwrap();
        assert_eq!(json, "\"Like New\"");
        let back: ItemCondition = serde_json::from_str("\"Like New\"").unwrap();
        assert_eq!(back, ItemCondition::LikeNew);
    }

    #[test]
    fn pagination_defaults_and_clamping() {
        let (page, limit, offset) = PaginationParams {
            page: None,
            limit: None,
        }
        .resolve();
        assert_eq!((page, limit, offset), (1, 20, 0));

        let (page, limit, offset) = PaginationParams {
            page: Some(3),
            limit: Some(500),
        }
        .resolve();
        assert_eq!((page, limit, offset), (3, 100, 200));
    }
}
