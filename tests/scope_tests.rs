//! 范围解析集成测试
//!
//! 覆盖角色分类、指派解析、传递展开和可管理用户链。
//! 标注 #[ignore] 的用例需要 TEST_DATABASE_URL 指向的 PostgreSQL。

use estate_system::scope::{Actor, DataFilterAssembler, ScopeResolver, ScopeSet};
use rand::seq::SliceRandom;
use rand::Rng;

mod common;

const ROLE_ADMIN: i32 = 1;
const ROLE_OWNER: i32 = 2;
const ROLE_STAFF: i32 = 3;
const ROLE_CUSTOM: i32 = 9;

#[tokio::test]
#[ignore] // 需要数据库
async fn test_admin_sees_everything_regardless_of_assignments() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let admin_id = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;

    // 管理员没有任何指派记录，但仍然不受限
    let b1 = common::create_building(&pool, "Tower A").await;
    let _b2 = common::create_building(&pool, "Tower B").await;

    let resolver = ScopeResolver::new(pool.clone());
    let actor = Actor { user_id: admin_id, role_id: ROLE_ADMIN };

    let buildings = resolver.assigned_buildings(&actor).await.unwrap();
    assert_eq!(buildings, ScopeSet::Unrestricted);

    // 即使有指派记录也不会降级为受限
    common::assign_building(&pool, admin_id, b1).await;
    let buildings = resolver.assigned_buildings(&actor).await.unwrap();
    assert_eq!(buildings, ScopeSet::Unrestricted);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_unassigned_staff_gets_empty_scopes() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;

    // 系统里有数据，但该员工没有任何指派
    let b = common::create_building(&pool, "Tower A").await;
    let f = common::create_floor(&pool, b, 1).await;
    let _a = common::create_apartment(&pool, f, "101").await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    assert_eq!(filter.assigned_buildings, ScopeSet::Empty);
    assert_eq!(filter.assigned_villas, ScopeSet::Empty);
    // 派生范围跟随父范围，全部为空
    assert_eq!(filter.accessible_apartments, ScopeSet::Empty);
    assert_eq!(filter.accessible_tenants, ScopeSet::Empty);
    assert_eq!(filter.accessible_transactions, ScopeSet::Empty);
    // 自己仍然可管理
    assert_eq!(filter.manageable_users, ScopeSet::restricted(vec![staff_id]));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_apartment_and_tenant_scopes_follow_building_assignments() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;

    // 楼栋 A：2 层，每层一套公寓；楼栋 B：1 层 1 套
    let building_a = common::create_building(&pool, "Tower A").await;
    let fa1 = common::create_floor(&pool, building_a, 1).await;
    let fa2 = common::create_floor(&pool, building_a, 2).await;
    let apt_a1 = common::create_apartment(&pool, fa1, "101").await;
    let apt_a2 = common::create_apartment(&pool, fa2, "201").await;

    let building_b = common::create_building(&pool, "Tower B").await;
    let fb1 = common::create_floor(&pool, building_b, 1).await;
    let apt_b1 = common::create_apartment(&pool, fb1, "101").await;

    // 租户 1 住楼栋 A，租户 2 住楼栋 B
    let tenant_a = common::create_tenant(&pool, "Alice").await;
    let tenant_b = common::create_tenant(&pool, "Bob").await;
    common::assign_apartment(&pool, tenant_a, apt_a1).await;
    common::assign_apartment(&pool, tenant_b, apt_b1).await;

    // 员工只被指派楼栋 A
    common::assign_building(&pool, staff_id, building_a).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    assert_eq!(filter.assigned_buildings, ScopeSet::restricted(vec![building_a]));
    assert_eq!(
        filter.accessible_apartments,
        ScopeSet::restricted(vec![apt_a1, apt_a2])
    );
    assert_eq!(filter.accessible_tenants, ScopeSet::restricted(vec![tenant_a]));
    assert!(!filter.accessible_apartments.contains(apt_b1));
    assert!(!filter.accessible_tenants.contains(tenant_b));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_transaction_scope_unions_building_and_villa_paths() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let admin_id = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;
    let staff_id = common::create_user(&pool, "staff", "StaffPass1", ROLE_STAFF, None).await;

    // 楼栋路径：楼栋 → 楼层 → 公寓 → 租户 → 流水
    let building = common::create_building(&pool, "Tower A").await;
    let floor = common::create_floor(&pool, building, 1).await;
    let apartment = common::create_apartment(&pool, floor, "101").await;
    let tenant = common::create_tenant(&pool, "Alice").await;
    common::assign_apartment(&pool, tenant, apartment).await;

    // 别墅路径：别墅 → 流水
    let villa = common::create_villa(&pool, "Rose Villa").await;

    // 范围外的流水
    let other_villa = common::create_villa(&pool, "Other Villa").await;

    let tx_tenant =
        common::create_transaction(&pool, Some(tenant), None, 100000, "rent_payment", admin_id)
            .await;
    let tx_villa =
        common::create_transaction(&pool, None, Some(villa), 500000, "rent_payment", admin_id)
            .await;
    let tx_other =
        common::create_transaction(&pool, None, Some(other_villa), 1, "deposit", admin_id).await;

    common::assign_building(&pool, staff_id, building).await;
    common::assign_villa(&pool, staff_id, villa).await;

    let assembler = DataFilterAssembler::new(pool.clone());
    let filter = assembler
        .build(Actor { user_id: staff_id, role_id: ROLE_STAFF })
        .await
        .unwrap();

    assert_eq!(
        filter.accessible_transactions,
        ScopeSet::restricted(vec![tx_tenant, tx_villa])
    );
    assert!(!filter.accessible_transactions.contains(tx_other));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_owner_manages_created_staff_and_self() {
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    // 创建链：业主 2 创建员工 3 和 4，员工 5 无创建者
    let _admin = common::create_user(&pool, "admin", "AdminPass1", ROLE_ADMIN, None).await;
    let owner = common::create_user(&pool, "owner", "OwnerPass1", ROLE_OWNER, None).await;
    let staff_a = common::create_user(&pool, "staff_a", "StaffPass1", ROLE_STAFF, Some(owner)).await;
    let staff_b = common::create_user(&pool, "staff_b", "StaffPass1", ROLE_STAFF, Some(owner)).await;
    let orphan = common::create_user(&pool, "orphan", "StaffPass1", ROLE_STAFF, None).await;

    let resolver = ScopeResolver::new(pool.clone());

    let scope = resolver
        .manageable_users(&Actor { user_id: owner, role_id: ROLE_OWNER })
        .await
        .unwrap();
    assert_eq!(scope, ScopeSet::restricted(vec![owner, staff_a, staff_b]));
    assert!(!scope.contains(orphan));

    // 员工只能管理自己
    let scope = resolver
        .manageable_users(&Actor { user_id: staff_a, role_id: ROLE_STAFF })
        .await
        .unwrap();
    assert_eq!(scope, ScopeSet::restricted(vec![staff_a]));
}

#[tokio::test]
async fn test_staff_and_custom_self_scope_needs_no_store() {
    // 员工与自定义角色的可管理范围是纯计算，不触库：死池也能得到结果
    let resolver = ScopeResolver::new(common::lazy_test_pool());

    let scope = resolver
        .manageable_users(&Actor { user_id: 42, role_id: ROLE_STAFF })
        .await
        .unwrap();
    assert_eq!(scope, ScopeSet::restricted(vec![42]));

    let scope = resolver
        .manageable_users(&Actor { user_id: 77, role_id: ROLE_CUSTOM })
        .await
        .unwrap();
    assert_eq!(scope, ScopeSet::restricted(vec![77]));
}

#[tokio::test]
async fn test_resolver_failure_is_surfaced_not_swallowed() {
    // 存储不可达时必须拿到错误，而不是悄悄得到空范围
    use estate_system::error::AppError;

    let resolver = ScopeResolver::new(common::lazy_test_pool());
    let result = resolver
        .assigned_buildings(&Actor { user_id: 5, role_id: ROLE_STAFF })
        .await;

    match result {
        Err(AppError::DataFiltering { .. }) => {}
        Err(other) => panic!("expected DataFiltering error, got {other:?}"),
        Ok(scope) => panic!("dead store must not yield a scope, got {scope:?}"),
    }
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_derived_scopes_are_monotonic_in_assignments() {
    // 随机指派子集：派生的公寓范围必须恰好等于
    // 被指派楼栋下全部公寓的并集
    let config = common::create_test_config();
    let pool = common::setup_test_db(&config).await;

    let mut rng = rand::thread_rng();

    // 5 栋楼，每栋 1-3 套公寓
    let mut buildings = Vec::new();
    let mut apartments_by_building = std::collections::HashMap::new();
    for i in 0..5 {
        let b = common::create_building(&pool, &format!("Tower {i}")).await;
        let f = common::create_floor(&pool, b, 1).await;
        let mut apts = Vec::new();
        for unit in 0..rng.gen_range(1..=3) {
            apts.push(common::create_apartment(&pool, f, &format!("10{unit}")).await);
        }
        apartments_by_building.insert(b, apts);
        buildings.push(b);
    }

    for round in 0..5 {
        let staff_id = common::create_user(
            &pool,
            &format!("staff_{round}"),
            "StaffPass1",
            ROLE_STAFF,
            None,
        )
        .await;

        let count = rng.gen_range(0..=buildings.len());
        let assigned: Vec<i64> = buildings
            .choose_multiple(&mut rng, count)
            .copied()
            .collect();
        for &b in &assigned {
            common::assign_building(&pool, staff_id, b).await;
        }

        let mut expected: Vec<i64> = assigned
            .iter()
            .flat_map(|b| apartments_by_building[b].iter().copied())
            .collect();
        expected.sort_unstable();

        let resolver = ScopeResolver::new(pool.clone());
        let actor = Actor { user_id: staff_id, role_id: ROLE_STAFF };
        let building_scope = resolver.assigned_buildings(&actor).await.unwrap();
        let apartment_scope = resolver
            .accessible_apartments(&actor, &building_scope)
            .await
            .unwrap();

        assert_eq!(apartment_scope, ScopeSet::restricted(expected));
    }
}
