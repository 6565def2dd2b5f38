//! Repository integration tests.
//!
//! Each test runs against its own database provisioned from
//! `DATABASE_URL` with the crate migrations applied.

use billing_db::{CustomerRepo, DbError, OperationRepo, WalletRepo};
use sqlx::PgPool;

#[sqlx::test]
async fn create_customer_creates_wallet(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let wallets = WalletRepo::new(pool.clone());

    let customer = customers.create("Ivanov").await.unwrap();
    assert_eq!(customer.name, "Ivanov");
    assert!(!customer.deleted);

    // The wallet is born in the same transaction, empty.
    let wallet = wallets
        .find_by_customer(customer.id)
        .await
        .unwrap()
        .expect("wallet should exist");
    assert_eq!(wallet.customer_id, customer.id);
    assert_eq!(wallet.amount, 0);
}

#[sqlx::test]
async fn create_customer_rejects_empty_name(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());

    let result = customers.create("   ").await;

    assert!(matches!(result, Err(DbError::InvalidInput(_))));
}

#[sqlx::test]
async fn find_by_id_excludes_deleted(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let customer = customers.create("Ivanov").await.unwrap();

    assert!(customers.find_by_id(customer.id).await.unwrap().is_some());

    customers.soft_delete(customer.id).await.unwrap();

    assert!(customers.find_by_id(customer.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn rename_updates_name_and_timestamp(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let customer = customers.create("Ivanov").await.unwrap();
    assert!(customer.updated_at.is_none());

    let renamed = customers.rename(customer.id, "Sidorov").await.unwrap();

    assert_eq!(renamed.id, customer.id);
    assert_eq!(renamed.name, "Sidorov");
    assert!(renamed.updated_at.is_some());
}

#[sqlx::test]
async fn rename_missing_customer(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());

    let result = customers.rename(1, "Sidorov").await;

    assert!(matches!(result, Err(DbError::NotFound(_))));
}

#[sqlx::test]
async fn soft_delete_hides_wallet_but_keeps_row(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let wallets = WalletRepo::new(pool.clone());
    let customer = customers.create("Ivanov").await.unwrap();
    let wallet = wallets
        .find_by_customer(customer.id)
        .await
        .unwrap()
        .expect("wallet should exist");

    customers.soft_delete(customer.id).await.unwrap();

    // Invisible through the owner, still reachable by its own id.
    assert!(wallets.find_by_customer(customer.id).await.unwrap().is_none());
    assert!(wallets.find_by_id(wallet.id).await.unwrap().is_some());
}

#[sqlx::test]
async fn soft_delete_twice_reports_not_found(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let customer = customers.create("Ivanov").await.unwrap();

    customers.soft_delete(customer.id).await.unwrap();
    let result = customers.soft_delete(customer.id).await;

    assert!(matches!(result, Err(DbError::NotFound(_))));
}

#[sqlx::test]
async fn purge_cascades_to_wallet_and_operations(pool: PgPool) {
    let customers = CustomerRepo::new(pool.clone());
    let wallets = WalletRepo::new(pool.clone());
    let operations = OperationRepo::new(pool.clone());

    let customer = customers.create("Ivanov").await.unwrap();
    let wallet = wallets
        .find_by_customer(customer.id)
        .await
        .unwrap()
        .expect("wallet should exist");

    // Seed one journal row the way the engine would.
    sqlx::query(
        r#"
        INSERT INTO operations
            (transaction_id, wallet_id, amount_was, amount_become, operation_amount)
        VALUES ($1, $2, 0, 100, 100)
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(wallet.id)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("UPDATE wallets SET amount = 100 WHERE id = $1")
        .bind(wallet.id)
        .execute(&pool)
        .await
        .unwrap();

    customers.purge(customer.id).await.unwrap();

    assert!(wallets.find_by_id(wallet.id).await.unwrap().is_none());
    assert!(operations.list_by_wallet(wallet.id).await.unwrap().is_empty());
}
