//! Values crossing the trait seams.

use kbbq_core::{RoleId, UserId, UserLevel, WeeklyActivity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The parts of a guild member the engines read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MemberSnapshot {
    /// Member's user id
    pub user_id: UserId,
    /// Account name
    pub username: String,
    /// Legacy discriminator, absent for migrated accounts
    pub discriminator: Option<u16>,
    /// Account avatar hash
    pub avatar: Option<String>,
    /// Guild-specific avatar hash
    pub guild_avatar: Option<String>,
    /// Roles currently held
    pub roles: BTreeSet<RoleId>,
}

/// Role metadata kept in the guild role cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct GuildRole {
    /// Role id
    pub id: RoleId,
    /// Display name
    pub name: String,
    /// Position in the role hierarchy
    pub position: u16,
}

/// A [`UserLevel`] with its one-based leaderboard rank.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RankedLevel {
    rank: u64,
    record: UserLevel,
}

impl RankedLevel {
    /// Pair a record with its rank.
    pub fn new(rank: u64, record: UserLevel) -> Self {
        Self { rank, record }
    }
}

/// A [`WeeklyActivity`] with its one-based leaderboard rank.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RankedActivity {
    rank: u64,
    record: WeeklyActivity,
}

impl RankedActivity {
    /// Pair a record with its rank.
    pub fn new(rank: u64, record: WeeklyActivity) -> Self {
        Self { rank, record }
    }
}
