//! Managed-role reconciliation.

use crate::{LevelRole, RoleId};
use std::collections::BTreeSet;

/// Outcome of reconciling a member's roles against a managed role set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleReconciliation {
    /// The full role list to write back in a single replacement call
    pub new_roles: BTreeSet<RoleId>,
    /// Managed roles the member gains
    pub added: BTreeSet<RoleId>,
    /// Managed roles the member loses
    pub removed: BTreeSet<RoleId>,
}

impl RoleReconciliation {
    /// True when the member already holds exactly the desired managed roles.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Move `current` to the desired managed state.
///
/// `new_roles = (current − managed) ∪ desired`. Roles outside `managed` are
/// never added or removed; desired roles that are not managed are ignored.
///
/// # Examples
///
/// ```
/// use kbbq_core::{reconcile, RoleId};
/// use std::collections::BTreeSet;
///
/// let ids = |v: &[u64]| v.iter().copied().map(RoleId).collect::<BTreeSet<_>>();
/// let out = reconcile(&ids(&[1, 2, 3]), &ids(&[1, 2, 3, 4]), &ids(&[2, 4]));
/// assert_eq!(out.new_roles, ids(&[2, 4]));
/// assert_eq!(out.added, ids(&[4]));
/// assert_eq!(out.removed, ids(&[1, 3]));
/// ```
pub fn reconcile(
    current: &BTreeSet<RoleId>,
    managed: &BTreeSet<RoleId>,
    desired: &BTreeSet<RoleId>,
) -> RoleReconciliation {
    let desired: BTreeSet<RoleId> = desired.intersection(managed).copied().collect();

    let new_roles = current
        .difference(managed)
        .copied()
        .chain(desired.iter().copied())
        .collect();
    let added = desired.difference(current).copied().collect();
    let removed = current
        .intersection(managed)
        .filter(|role| !desired.contains(role))
        .copied()
        .collect();

    RoleReconciliation {
        new_roles,
        added,
        removed,
    }
}

/// Managed and desired role sets of a level ladder for a user at `level`.
///
/// Every rung at or below `level` is desired; rungs sharing a role collapse.
pub fn desired_level_roles(ladder: &[LevelRole], level: u64) -> (BTreeSet<RoleId>, BTreeSet<RoleId>) {
    let managed = ladder.iter().map(|rung| rung.role_id).collect();
    let desired = ladder
        .iter()
        .filter(|rung| rung.required_level <= level)
        .map(|rung| rung.role_id)
        .collect();
    (managed, desired)
}
