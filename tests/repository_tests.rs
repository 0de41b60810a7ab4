//! 仓库层集成测试
//!
//! 重点验证范围收窄真正落到 SQL 上：空范围查不出任何行，
//! 受限范围只查出范围内的行。需要 TEST_DATABASE_URL。

use estate_system::repository::{
    ApartmentRepository, BuildingRepository, TransactionRepository, UserRepository,
};
use estate_system::models::transaction::TransactionListQuery;
use estate_system::scope::{Actor, DataFilterAssembler};

mod common;

const ROLE_ADMIN: i32 = 1;
const ROLE_STAFF: i32 = 3;

#[tokio::test]
#[ignore] // 需要数据库
async fn test_empty_scope_lists_nothing_from_populated_table() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    // 表里有数据
    let b = common::create_building(&pool, "Tower A").await;
    let f = common::create_floor(&pool, b, 1).await;
    common::create_apartment(&pool, f, "101").await;

    // 未指派的员工
    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;
    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    let buildings = BuildingRepository::new(pool.clone())
        .list(&filter, 50, 0)
        .await
        .unwrap();
    assert!(buildings.is_empty());

    let apartments = ApartmentRepository::new(pool.clone())
        .list(&filter, 50, 0)
        .await
        .unwrap();
    assert!(apartments.is_empty());

    assert_eq!(
        BuildingRepository::new(pool.clone())
            .count_scoped(&filter)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_restricted_scope_lists_only_assigned_rows() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let building_a = common::create_building(&pool, "Tower A").await;
    let building_b = common::create_building(&pool, "Tower B").await;

    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;
    common::assign_building(&pool, staff_id, building_a).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    let buildings = BuildingRepository::new(pool.clone())
        .list(&filter, 50, 0)
        .await
        .unwrap();

    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].id, building_a);
    assert!(buildings.iter().all(|b| b.id != building_b));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_admin_lists_all_rows() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    common::create_building(&pool, "Tower A").await;
    common::create_building(&pool, "Tower B").await;

    let admin_id = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;
    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: admin_id, role_id: ROLE_ADMIN })
        .await
        .unwrap();

    let buildings = BuildingRepository::new(pool.clone())
        .list(&filter, 50, 0)
        .await
        .unwrap();
    assert_eq!(buildings.len(), 2);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_user_list_respects_manageable_scope() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let owner = common::create_user(&pool, "owner", "OwnerPass1", 2, None).await;
    let staff_a = common::create_user(&pool, "staff_a", "StaffPass1", ROLE_STAFF, Some(owner)).await;
    let _other = common::create_user(&pool, "other", "StaffPass1", ROLE_STAFF, None).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: owner, role_id: 2 })
        .await
        .unwrap();

    let users = UserRepository::new(pool.clone())
        .list(&filter, 50, 0)
        .await
        .unwrap();

    let mut ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    ids.sort_unstable();
    let mut expected = vec![owner, staff_a];
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_transaction_list_combines_scope_and_business_filters() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let admin_id = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;
    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;

    let villa_a = common::create_villa(&pool, "Rose Villa").await;
    let villa_b = common::create_villa(&pool, "Other Villa").await;
    common::assign_villa(&pool, staff_id, villa_a).await;

    let tx_rent =
        common::create_transaction(&pool, None, Some(villa_a), 500000, "rent_payment", admin_id)
            .await;
    let _tx_deposit =
        common::create_transaction(&pool, None, Some(villa_a), 100000, "deposit", admin_id).await;
    let _tx_outside =
        common::create_transaction(&pool, None, Some(villa_b), 1, "rent_payment", admin_id).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    // 范围 + kind 过滤叠加
    let query = TransactionListQuery {
        kind: Some("rent_payment".to_string()),
        ..Default::default()
    };
    let transactions = TransactionRepository::new(pool.clone())
        .list(&filter, &query)
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].id, tx_rent);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_transaction_summary_is_scoped() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let admin_id = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;
    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;

    let villa_a = common::create_villa(&pool, "Rose Villa").await;
    let villa_b = common::create_villa(&pool, "Other Villa").await;
    common::assign_villa(&pool, staff_id, villa_a).await;

    common::create_transaction(&pool, None, Some(villa_a), 300, "rent_payment", admin_id).await;
    common::create_transaction(&pool, None, Some(villa_a), 200, "rent_payment", admin_id).await;
    common::create_transaction(&pool, None, Some(villa_b), 999, "rent_payment", admin_id).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    let totals = TransactionRepository::new(pool.clone())
        .summary(&filter)
        .await
        .unwrap();

    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].kind, "rent_payment");
    assert_eq!(totals[0].total_cents, 500);
    assert_eq!(totals[0].count, 2);
}
