//! Trait seams between the kbbq engines and the outside world.
//!
//! Persistence is split per record family ([`LevelingRepository`],
//! [`ActivityRepository`], ...) and gathered under [`KbbqRepository`].
//! The platform REST surface the engines need is [`GuildApi`].
//! [`InMemoryRepository`] implements every repository trait without a
//! database.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod traits;
mod types;

pub use memory::InMemoryRepository;
pub use traits::{
    ActivityRepository, EmbedRepository, GuildApi, KbbqRepository, LevelRoleRepository,
    LevelingRepository, StatusRoleRepository, WelcomeMessageRepository,
};
pub use types::{GuildRole, MemberSnapshot, RankedActivity, RankedLevel};
