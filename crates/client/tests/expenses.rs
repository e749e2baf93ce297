use client::{
    ClientError, DEFAULT_CATEGORY, ExpenseFields, QueryKey, QueryState, Route, types::ExpenseUpdate,
};

mod common;

use common::spawn_backend;

fn lunch() -> ExpenseFields {
    ExpenseFields::new("Lunch", "12.50")
        .description("sandwich")
        .category("Food")
        .date("2025-02-12T12:00:00.000Z")
}

#[tokio::test]
async fn created_expense_reads_back_unchanged() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let owner = alice.current_user().await.unwrap();

    let created = alice.create_expense(lunch()).await.unwrap();
    let fetched = alice.get_expense(&created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Lunch");
    assert_eq!(fetched.amount, "12.50");
    assert_eq!(fetched.description, "sandwich");
    assert_eq!(fetched.category.as_deref(), Some("Food"));
    assert_eq!(fetched.date.as_deref(), Some("2025-02-12T12:00:00.000Z"));
    assert_eq!(fetched.user_id, owner.id);
    assert!(!fetched.id.is_empty());
    assert!(!fetched.created_at.is_empty());
}

#[tokio::test]
async fn create_fills_default_category_and_date() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;

    let created = alice
        .create_expense(ExpenseFields::new("Bus", "2.00"))
        .await
        .unwrap();

    assert_eq!(created.category.as_deref(), Some(DEFAULT_CATEGORY));
    assert!(created.date.is_some());
}

#[tokio::test]
async fn list_never_shows_other_owners() {
    let backend = spawn_backend().await;
    // Ids are handed out in order: alice is "1", the tenth user is "10",
    // which the backend's substring filter would match for alice.
    let alice = backend.user("alice").await;
    let mut others = Vec::new();
    for n in 2..=10 {
        others.push(backend.user(&format!("user{n}")).await);
    }
    let other = others.pop().unwrap();
    assert_eq!(other.current_user().await.unwrap().id, "10");

    alice.create_expense(lunch()).await.unwrap();
    other.create_expense(lunch()).await.unwrap();

    let alice_id = alice.current_user().await.unwrap().id;
    let mine = alice.list_expenses().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine.iter().all(|e| e.user_id == alice_id));

    let theirs = other.list_expenses().await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert!(theirs.iter().all(|e| e.user_id == "10"));
}

#[tokio::test]
async fn get_of_foreign_expense_is_unauthorized() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let bob = backend.user("bob").await;
    let created = alice.create_expense(lunch()).await.unwrap();

    let err = bob.get_expense(&created.id).await.unwrap_err();
    assert_eq!(err, ClientError::Unauthorized);
    assert_eq!(err.fallback_route(), Some(Route::Back));
}

#[tokio::test]
async fn duplicate_names_are_per_owner_and_case_insensitive() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let bob = backend.user("bob").await;
    alice.create_expense(lunch()).await.unwrap();

    let err = alice
        .create_expense(ExpenseFields::new("  LUNCH ", "3.00"))
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::DuplicateName("LUNCH".to_string()));

    bob.create_expense(lunch()).await.unwrap();
    assert_eq!(backend.state.expenses().await.len(), 2);
}

#[tokio::test]
async fn update_may_keep_its_own_name_but_not_take_another() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let first = alice.create_expense(lunch()).await.unwrap();
    alice
        .create_expense(ExpenseFields::new("Dinner", "20.00"))
        .await
        .unwrap();

    let updated = alice
        .update_expense(
            &first.id,
            ExpenseUpdate {
                name: Some("lunch".to_string()),
                amount: Some("13.00".to_string()),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "lunch");
    assert_eq!(updated.amount, "13.00");

    let err = alice
        .update_expense(
            &first.id,
            ExpenseUpdate {
                name: Some("dinner".to_string()),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::DuplicateName("dinner".to_string()));
}

#[tokio::test]
async fn update_trims_new_name() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let created = alice.create_expense(lunch()).await.unwrap();

    let updated = alice
        .update_expense(
            &created.id,
            ExpenseUpdate {
                name: Some("  Dinner  ".to_string()),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Dinner");
    assert_eq!(backend.state.expense(&created.id).await.unwrap().name, "Dinner");
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let bob = backend.user("bob").await;
    let created = alice.create_expense(lunch()).await.unwrap();

    let patch = ExpenseUpdate {
        amount: Some("0.01".to_string()),
        ..ExpenseUpdate::default()
    };
    assert_eq!(
        bob.update_expense(&created.id, patch).await.unwrap_err(),
        ClientError::Unauthorized
    );
    assert_eq!(
        bob.delete_expense(&created.id).await.unwrap_err(),
        ClientError::Unauthorized
    );

    let unchanged = alice.get_expense(&created.id).await.unwrap();
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn update_cannot_reassign_owner() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let bob = backend.user("bob").await;
    let bob_id = bob.current_user().await.unwrap().id;
    let created = alice.create_expense(lunch()).await.unwrap();

    let updated = alice
        .update_expense(
            &created.id,
            ExpenseUpdate {
                user_id: Some(bob_id),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.user_id, created.user_id);
}

#[tokio::test]
async fn delete_removes_and_invalidates() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let created = alice.create_expense(lunch()).await.unwrap();
    assert_eq!(alice.list_expenses().await.unwrap().len(), 1);

    alice.delete_expense(&created.id).await.unwrap();

    assert!(alice.list_expenses().await.unwrap().is_empty());
    assert!(backend.state.expense(&created.id).await.is_none());
    assert!(matches!(
        alice.get_expense(&created.id).await.unwrap_err(),
        ClientError::Transport(_)
    ));
}

#[tokio::test]
async fn list_reflects_create_after_cached_read() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;

    assert_eq!(alice.cache_state(&QueryKey::Expenses).await, QueryState::Empty);
    assert!(alice.list_expenses().await.unwrap().is_empty());
    assert_eq!(alice.cache_state(&QueryKey::Expenses).await, QueryState::Fresh);

    alice.create_expense(lunch()).await.unwrap();
    assert_eq!(alice.cache_state(&QueryKey::Expenses).await, QueryState::Stale);

    let listed = alice.list_expenses().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(alice.cache_state(&QueryKey::Expenses).await, QueryState::Fresh);
}

#[tokio::test]
async fn update_refreshes_cached_expense() {
    let backend = spawn_backend().await;
    let alice = backend.user("alice").await;
    let created = alice.create_expense(lunch()).await.unwrap();
    let key = QueryKey::expense(&created.id);

    alice.get_expense(&created.id).await.unwrap();
    assert_eq!(alice.cache_state(&key).await, QueryState::Fresh);

    alice
        .update_expense(
            &created.id,
            ExpenseUpdate {
                description: Some("with soup".to_string()),
                ..ExpenseUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(alice.cache_state(&key).await, QueryState::Stale);

    let fetched = alice.get_expense(&created.id).await.unwrap();
    assert_eq!(fetched.description, "with soup");
}

#[tokio::test]
async fn login_switch_drops_previous_users_cache() {
    let backend = spawn_backend().await;
    backend.user("bob").await;
    let client = backend.user("alice").await;
    client.create_expense(lunch()).await.unwrap();
    assert_eq!(client.list_expenses().await.unwrap().len(), 1);

    client.login("bob", "secret").await.unwrap();

    assert_eq!(client.cache_state(&QueryKey::Expenses).await, QueryState::Empty);
    assert!(client.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn operations_require_a_session() {
    let backend = spawn_backend().await;
    let client = backend.client();

    let err = client.create_expense(lunch()).await.unwrap_err();
    assert_eq!(err, ClientError::Unauthenticated);
    assert_eq!(err.fallback_route(), Some(Route::Login));
    assert!(backend.state.expenses().await.is_empty());
}
