//! Swap lifecycle integration tests. See `common` for the database
//! setup; the suite is a no-op without `TEST_DATABASE_URL`.

mod common;

use common::*;
use uuid::Uuid;

use rewear_server::error::ApiError;
use rewear_server::models::{ItemCondition, ItemStatus, SwapRequestStatus};
use rewear_server::services::swap_service::{
    CreateSwapRequestInput, RespondToSwapRequestInput, SwapAction,
};
use rewear_server::services::{ItemService, PointsService, SwapService};

#[tokio::test]
async fn redemption_happy_path() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 60).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect("create redemption request");
    assert_eq!(request.status, SwapRequestStatus::Pending);

    let outcome = swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .expect("accept redemption");

    assert_eq!(outcome.swap_request.status, SwapRequestStatus::Accepted);
    let swap = outcome.swap.expect("swap record created");
    assert_eq!(swap.initiator_id, requester.id);
    assert_eq!(swap.receiver_id, owner.id);
    assert_eq!(swap.item_given_id, item.id);
    assert_eq!(swap.item_received_id, item.id);

    assert_eq!(balance_of(&pool, requester.id).await, 10);
    assert_eq!(balance_of(&pool, owner.id).await, 50);
    assert_eq!(fetch_item(&pool, item.id).await.status, ItemStatus::Swapped);

    assert_balance_invariant(&pool, requester.id).await;
    assert_balance_invariant(&pool, owner.id).await;
}

#[tokio::test]
async fn redemption_rejected_at_creation_when_balance_insufficient() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "poor-requester").await;
    seed_points(&pool, requester.id, 10).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let err = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect_err("creation must fail");
    assert!(matches!(err, ApiError::InsufficientFunds { required: 50 }));
}

#[tokio::test]
async fn redemption_rejected_at_accept_when_balance_dropped() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 60).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect("create redemption request");

    // The requester spends points elsewhere before the owner responds.
    let sink = create_item(&pool, requester.id, ItemCondition::Good, ItemStatus::Pending).await;
    let mut conn = pool.acquire().await.unwrap();
    PointsService::debit(&mut conn, requester.id, sink.id, 20)
        .await
        .expect("spend points elsewhere");
    drop(conn);

    let err = swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .expect_err("accept must fail");
    assert!(matches!(err, ApiError::InsufficientFunds { required: 50 }));

    // Nothing happened: the request is still pending, the item still
    // available, and no points moved.
    assert_eq!(
        fetch_request(&pool, request.id).await.status,
        SwapRequestStatus::Pending
    );
    assert_eq!(
        fetch_item(&pool, item.id).await.status,
        ItemStatus::Available
    );
    assert_eq!(balance_of(&pool, requester.id).await, 40);
    assert_eq!(balance_of(&pool, owner.id).await, 0);
    assert_balance_invariant(&pool, requester.id).await;
    assert_balance_invariant(&pool, owner.id).await;
}

#[tokio::test]
async fn accept_rolls_back_fully_when_item_mark_fails() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 60).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect("create redemption request");

    // Force the item out from under the request so the completion
    // transaction fails after the points have been debited and credited.
    sqlx::query("UPDATE items SET status = 'SWAPPED' WHERE id = $1")
        .bind(item.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .expect_err("accept must fail");
    assert!(matches!(err, ApiError::InvalidState(_)));

    // The debit and credit inside the failed transaction must not be
    // observable.
    assert_eq!(balance_of(&pool, requester.id).await, 60);
    assert_eq!(balance_of(&pool, owner.id).await, 0);
    assert_eq!(
        fetch_request(&pool, request.id).await.status,
        SwapRequestStatus::Pending
    );
    let (swap_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM swaps WHERE swap_request_id = $1")
            .bind(request.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(swap_count, 0);
    assert_balance_invariant(&pool, requester.id).await;
    assert_balance_invariant(&pool, owner.id).await;
}

#[tokio::test]
async fn direct_swap_marks_both_items_and_cancels_competitors() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let carol = create_user(&pool, "carol").await;
    let dave = create_user(&pool, "dave").await;

    let item_a = create_item(&pool, alice.id, ItemCondition::Good, ItemStatus::Available).await;
    let item_b = create_item(&pool, bob.id, ItemCondition::Fair, ItemStatus::Available).await;

    // Bob offers his item for Alice's.
    let request = swaps
        .create_swap_request(
            bob.id,
            CreateSwapRequestInput {
                item_id: item_a.id,
                offered_item_id: Some(item_b.id),
                message: Some("trade?".to_string()),
            },
        )
        .await
        .expect("create direct swap request");

    // Competing pending requests touching either item.
    seed_points(&pool, carol.id, 50).await;
    let competing_a = swaps
        .create_swap_request(carol.id, redemption_input(item_a.id))
        .await
        .expect("carol requests item A");
    seed_points(&pool, dave.id, 50).await;
    let competing_b = swaps
        .create_swap_request(dave.id, redemption_input(item_b.id))
        .await
        .expect("dave requests item B");

    let outcome = swaps
        .respond_to_swap_request(&request.id, &alice.id, accept())
        .await
        .expect("accept direct swap");

    let swap = outcome.swap.expect("swap record created");
    assert_eq!(swap.item_given_id, item_b.id);
    assert_eq!(swap.item_received_id, item_a.id);
    assert_eq!(swap.initiator_id, bob.id);
    assert_eq!(swap.receiver_id, alice.id);

    assert_eq!(fetch_item(&pool, item_a.id).await.status, ItemStatus::Swapped);
    assert_eq!(fetch_item(&pool, item_b.id).await.status, ItemStatus::Swapped);

    assert_eq!(
        fetch_request(&pool, competing_a.id).await.status,
        SwapRequestStatus::Cancelled
    );
    assert_eq!(
        fetch_request(&pool, competing_b.id).await.status,
        SwapRequestStatus::Cancelled
    );

    // No points move in a direct swap.
    assert_eq!(balance_of(&pool, alice.id).await, 0);
    assert_eq!(balance_of(&pool, bob.id).await, 0);
}

#[tokio::test]
async fn mirrored_redemption_accepts_both_complete() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    seed_points(&pool, alice.id, 50).await;
    seed_points(&pool, bob.id, 50).await;
    let item_a = create_item(&pool, alice.id, ItemCondition::New, ItemStatus::Available).await;
    let item_b = create_item(&pool, bob.id, ItemCondition::New, ItemStatus::Available).await;

    let bob_request = swaps
        .create_swap_request(bob.id, redemption_input(item_a.id))
        .await
        .unwrap();
    let alice_request = swaps
        .create_swap_request(alice.id, redemption_input(item_b.id))
        .await
        .unwrap();

    // Accept both at once. The completion transaction locks the two user
    // rows in id order, so the mirrored accepts serialize instead of
    // deadlocking.
    let (first, second) = tokio::join!(
        swaps.respond_to_swap_request(&bob_request.id, &alice.id, accept()),
        swaps.respond_to_swap_request(&alice_request.id, &bob.id, accept()),
    );
    first.expect("alice accepts bob's redemption");
    second.expect("bob accepts alice's redemption");

    assert_eq!(fetch_item(&pool, item_a.id).await.status, ItemStatus::Swapped);
    assert_eq!(fetch_item(&pool, item_b.id).await.status, ItemStatus::Swapped);

    // 50 out, 50 in on both sides.
    assert_eq!(balance_of(&pool, alice.id).await, 50);
    assert_eq!(balance_of(&pool, bob.id).await, 50);
    assert_balance_invariant(&pool, alice.id).await;
    assert_balance_invariant(&pool, bob.id).await;
}

#[tokio::test]
async fn accepted_request_cannot_be_processed_again() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 50).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .unwrap();
    swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .expect("first accept succeeds");

    let err = swaps
        .respond_to_swap_request(&request.id, &owner.id, accept())
        .await
        .expect_err("second accept must fail");
    assert!(matches!(err, ApiError::InvalidState(_)));

    let err = swaps
        .respond_to_swap_request(
            &request.id,
            &owner.id,
            RespondToSwapRequestInput {
                action: SwapAction::Reject,
                message: None,
            },
        )
        .await
        .expect_err("reject after accept must fail");
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn duplicate_pending_request_conflicts() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 100).await;
    let item = create_item(&pool, owner.id, ItemCondition::Poor, ItemStatus::Available).await;

    swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect("first request succeeds");

    let err = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .expect_err("duplicate must conflict");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn creation_preconditions() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    seed_points(&pool, requester.id, 100).await;

    // Own item.
    let own = create_item(&pool, requester.id, ItemCondition::Good, ItemStatus::Available).await;
    let err = swaps
        .create_swap_request(requester.id, redemption_input(own.id))
        .await
        .expect_err("own item must be rejected");
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    // Target not available.
    let pending = create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Pending).await;
    let err = swaps
        .create_swap_request(requester.id, redemption_input(pending.id))
        .await
        .expect_err("pending target must be rejected");
    assert!(matches!(err, ApiError::InvalidState(_)));

    // Missing target.
    let err = swaps
        .create_swap_request(requester.id, redemption_input(Uuid::new_v4()))
        .await
        .expect_err("missing target must be rejected");
    assert!(matches!(err, ApiError::NotFound(_)));

    // Offered item not owned by the requester.
    let target = create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Available).await;
    let someone_elses =
        create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Available).await;
    let err = swaps
        .create_swap_request(
            requester.id,
            CreateSwapRequestInput {
                item_id: target.id,
                offered_item_id: Some(someone_elses.id),
                message: None,
            },
        )
        .await
        .expect_err("offering another user's item must be rejected");
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn cancel_is_requester_only_and_pending_only() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    let stranger = create_user(&pool, "stranger").await;
    seed_points(&pool, requester.id, 50).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .unwrap();

    let err = swaps
        .cancel_swap_request(&request.id, &stranger.id)
        .await
        .expect_err("stranger cannot cancel");
    assert!(matches!(err, ApiError::Forbidden(_)));

    let cancelled = swaps
        .cancel_swap_request(&request.id, &requester.id)
        .await
        .expect("requester cancels");
    assert_eq!(cancelled.status, SwapRequestStatus::Cancelled);

    let err = swaps
        .cancel_swap_request(&request.id, &requester.id)
        .await
        .expect_err("cancel is terminal");
    assert!(matches!(err, ApiError::InvalidState(_)));

    // Cancellation has no other side effects.
    assert_eq!(
        fetch_item(&pool, item.id).await.status,
        ItemStatus::Available
    );
    assert_eq!(balance_of(&pool, requester.id).await, 50);
}

#[tokio::test]
async fn only_the_owner_may_respond() {
    let Some(pool) = test_pool().await else { return };
    let swaps = SwapService::new(pool.clone());

    let owner = create_user(&pool, "owner").await;
    let requester = create_user(&pool, "requester").await;
    let stranger = create_user(&pool, "stranger").await;
    seed_points(&pool, requester.id, 50).await;
    let item = create_item(&pool, owner.id, ItemCondition::New, ItemStatus::Available).await;

    let request = swaps
        .create_swap_request(requester.id, redemption_input(item.id))
        .await
        .unwrap();

    for uid in [&requester.id, &stranger.id] {
        let err = swaps
            .respond_to_swap_request(&request.id, uid, accept())
            .await
            .expect_err("non-owner cannot respond");
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}

#[tokio::test]
async fn swapped_items_cannot_be_marked_again() {
    let Some(pool) = test_pool().await else { return };

    let owner = create_user(&pool, "owner").await;
    let item = create_item(&pool, owner.id, ItemCondition::Good, ItemStatus::Swapped).await;

    let mut tx = pool.begin().await.unwrap();
    let err = ItemService::mark_swapped(&mut tx, &[item.id])
        .await
        .expect_err("swapped item cannot be marked again");
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn debit_is_refused_below_balance() {
    let Some(pool) = test_pool().await else { return };

    let user = create_user(&pool, "user").await;
    seed_points(&pool, user.id, 30).await;
    let anchor = create_item(&pool, user.id, ItemCondition::Good, ItemStatus::Pending).await;

    let mut tx = pool.begin().await.unwrap();
    let err = PointsService::debit(&mut tx, user.id, anchor.id, 31)
        .await
        .expect_err("debit beyond balance must fail");
    assert!(matches!(err, ApiError::InsufficientFunds { required: 31 }));
    drop(tx);

    let mut tx = pool.begin().await.unwrap();
    let balance = PointsService::debit(&mut tx, user.id, anchor.id, 30)
        .await
        .expect("exact debit succeeds");
    assert_eq!(balance, 0);
    tx.commit().await.unwrap();

    assert_balance_invariant(&pool, user.id).await;
}
