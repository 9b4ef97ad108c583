//! Level-change notices.

use crate::{RoleId, UserId};

/// A user moving from one level to another, with the level roles it cost or earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    /// The user whose level changed
    pub user_id: UserId,
    /// Level before the change
    pub previous_level: u64,
    /// Level after the change
    pub new_level: u64,
    /// Level roles gained
    pub added: Vec<RoleId>,
    /// Level roles lost
    pub removed: Vec<RoleId>,
}

impl LevelChange {
    /// True when the level went up.
    pub fn is_up(&self) -> bool {
        self.new_level > self.previous_level
    }

    /// The public notice for this change.
    ///
    /// # Examples
    ///
    /// ```
    /// use kbbq_core::{LevelChange, RoleId, UserId};
    ///
    /// let change = LevelChange {
    ///     user_id: UserId(7),
    ///     previous_level: 4,
    ///     new_level: 5,
    ///     added: vec![RoleId(1)],
    ///     removed: vec![RoleId(2)],
    /// };
    /// assert_eq!(
    ///     change.notice(),
    ///     "<@7> has leveled up to level 5 and earned the <@&1> role and lost the <@&2> role!"
    /// );
    /// ```
    pub fn notice(&self) -> String {
        let direction = if self.is_up() { "up" } else { "down" };
        let mut notice = format!(
            "<@{}> has leveled {} to level {}",
            self.user_id, direction, self.new_level
        );

        if !self.added.is_empty() {
            notice.push_str(&format!(" and earned the {}", role_phrase(&self.added)));
        }
        if !self.removed.is_empty() {
            notice.push_str(&format!(" and lost the {}", role_phrase(&self.removed)));
        }
        notice.push('!');
        notice
    }
}

fn role_phrase(roles: &[RoleId]) -> String {
    let mentions = roles
        .iter()
        .map(|role| format!("<@&{role}>"))
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if roles.len() == 1 { "role" } else { "roles" };
    format!("{mentions} {noun}")
}
