use kbbq_core::{desired_level_roles, reconcile, GuildId, LevelRole, RoleId};
use std::collections::BTreeSet;

fn ids(values: &[u64]) -> BTreeSet<RoleId> {
    values.iter().copied().map(RoleId).collect()
}

#[test]
fn test_reconcile_scenario() {
    let out = reconcile(&ids(&[1, 2, 3]), &ids(&[1, 2, 3, 4]), &ids(&[2, 4]));
    assert_eq!(out.new_roles, ids(&[2, 4]));
    assert_eq!(out.added, ids(&[4]));
    assert_eq!(out.removed, ids(&[1, 3]));
}

#[test]
fn test_reconcile_is_idempotent() {
    let managed = ids(&[1, 2, 3, 4]);
    let desired = ids(&[2, 4]);
    let first = reconcile(&ids(&[1, 2, 3, 9]), &managed, &desired);
    let second = reconcile(&first.new_roles, &managed, &desired);
    assert!(second.is_noop());
    assert_eq!(second.new_roles, first.new_roles);
}

#[test]
fn test_reconcile_leaves_unmanaged_roles_alone() {
    let current = ids(&[10, 11, 1]);
    let managed = ids(&[1, 2]);
    let out = reconcile(&current, &managed, &ids(&[2]));
    assert!(out.new_roles.contains(&RoleId(10)));
    assert!(out.new_roles.contains(&RoleId(11)));
    assert!(out.added.is_subset(&managed));
    assert!(out.removed.is_subset(&managed));
}

#[test]
fn test_reconcile_ignores_unmanaged_desired_roles() {
    let out = reconcile(&ids(&[]), &ids(&[1]), &ids(&[1, 99]));
    assert_eq!(out.new_roles, ids(&[1]));
    assert_eq!(out.added, ids(&[1]));
}

#[test]
fn test_level_ladder_is_cumulative() {
    let rung = |id, role, level| LevelRole {
        id,
        guild_id: GuildId(1),
        role_id: RoleId(role),
        required_level: level,
    };
    let ladder = vec![rung(1, 100, 5), rung(2, 200, 10), rung(3, 300, 20)];

    let (managed, desired) = desired_level_roles(&ladder, 12);
    assert_eq!(managed, ids(&[100, 200, 300]));
    assert_eq!(desired, ids(&[100, 200]));

    let (_, desired) = desired_level_roles(&ladder, 0);
    assert!(desired.is_empty());
}
