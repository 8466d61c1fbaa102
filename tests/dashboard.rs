//! Profile and dashboard aggregation tests. See `common` for the
//! database setup; the suite is a no-op without `TEST_DATABASE_URL`.

mod common;

use common::*;

use rewear_server::auth::AuthService;
use rewear_server::models::{ItemCondition, ItemStatus};
use rewear_server::services::{ItemService, SwapService};

#[tokio::test]
async fn profile_stats_count_listings_and_swaps() {
    let Some(pool) = test_pool().await else { return };
    let auth = AuthService::new(pool.clone());
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 50).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;
    create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Pending).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .unwrap();
    swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .unwrap();

    let owner_stats = auth.profile_stats(&owner.id).await.unwrap();
    assert_eq!(owner_stats.items_listed, 2);
    assert_eq!(owner_stats.swaps_initiated, 0);
    assert_eq!(owner_stats.swaps_received, 1);

    // The seeded requester carries the ledger anchor listing.
    let requester_stats = auth.profile_stats(&requester.id).await.unwrap();
    assert_eq!(requester_stats.items_listed, 1);
    assert_eq!(requester_stats.swaps_initiated, 1);
    assert_eq!(requester_stats.swaps_received, 0);
}

#[tokio::test]
async fn public_profile_stats_expose_available_items_and_initiated_swaps() {
    let Some(pool) = test_pool().await else { return };
    let auth = AuthService::new(pool.clone());
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 50).await;
    create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Available).await;
    let target = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(target.id))
        .await
        .unwrap();
    swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .unwrap();

    let owner_public = auth.public_profile_stats(&owner.id).await.unwrap();
    assert_eq!(owner_public.items_available, 1);
    assert_eq!(owner_public.total_swaps, 0);

    let requester_public = auth.public_profile_stats(&requester.id).await.unwrap();
    assert_eq!(requester_public.items_available, 0);
    assert_eq!(requester_public.total_swaps, 1);
}

#[tokio::test]
async fn dashboard_stats_aggregate_by_status() {
    let Some(pool) = test_pool().await else { return };
    let items_svc = ItemService::new(pool.clone());
    let swaps_svc = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 100).await;

    let available =
        create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Available).await;
    let target = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;
    create_item(&pool, owner.id, ItemCondition::Fair, ItemStatus::Pending).await;
    create_item(&pool, owner.id, ItemCondition::Poor, ItemStatus::Rejected).await;

    let accepted_request = swaps_svc
        .create_swap_request(requester.id, redemption_input(target.id))
        .await
        .unwrap();
    let pending_request = swaps_svc
        .create_swap_request(requester.id, redemption_input(available.id))
        .await
        .unwrap();
    swaps_svc
        .respond_to_swap_request(&accepted_request.id, &owner.id, accept())
        .await
        .unwrap();

    let item_stats = items_svc.user_item_stats(&owner.id).await.unwrap();
    assert_eq!(item_stats.total, 4);
    assert_eq!(item_stats.available, 1);
    assert_eq!(item_stats.pending, 1);
    assert_eq!(item_stats.swapped, 1);
    assert_eq!(item_stats.rejected, 1);

    let owner_swaps = swaps_svc.user_swap_stats(&owner.id).await.unwrap();
    assert_eq!(owner_swaps.sent.total, 0);
    assert_eq!(owner_swaps.received.total, 2);
    assert_eq!(owner_swaps.received.pending, 1);
    assert_eq!(owner_swaps.received.accepted, 1);
    assert_eq!(owner_swaps.completed, 1);

    let requester_swaps = swaps_svc.user_swap_stats(&requester.id).await.unwrap();
    assert_eq!(requester_swaps.sent.total, 2);
    assert_eq!(requester_swaps.sent.pending, 1);
    assert_eq!(requester_swaps.sent.accepted, 1);
    assert_eq!(requester_swaps.completed, 1);

    let recent = items_svc.recent_items(&owner.id, 5).await.unwrap();
    assert_eq!(recent.len(), 4);
    let still_requested = recent
        .iter()
        .find(|r| r.item.id == available.id)
        .unwrap();
    assert_eq!(still_requested.pending_requests, 1);
    let swapped_entry = recent.iter().find(|r| r.item.id == target.id).unwrap();
    assert_eq!(swapped_entry.pending_requests, 0);

    assert!(!fetch_request(&pool, pending_request.id).await.status.is_terminal());
}
