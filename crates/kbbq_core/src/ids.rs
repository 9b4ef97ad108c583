//! Snowflake identifiers.
//!
//! The platform hands out 64-bit unsigned snowflakes; PostgreSQL stores them
//! as signed bigints. `to_db`/`from_db` do the bit-preserving conversion.

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The raw snowflake.
            pub fn get(self) -> u64 {
                self.0
            }

            /// Bit-preserving conversion to a PostgreSQL bigint.
            pub fn to_db(self) -> i64 {
                self.0 as i64
            }

            /// Inverse of [`Self::to_db`].
            pub fn from_db(value: i64) -> Self {
                Self(value as u64)
            }
        }
    };
}

snowflake!(
    /// A guild (server) id.
    GuildId
);
snowflake!(
    /// A user id.
    UserId
);
snowflake!(
    /// A role id.
    RoleId
);
snowflake!(
    /// A channel id.
    ChannelId
);
snowflake!(
    /// A message id.
    MessageId
);
