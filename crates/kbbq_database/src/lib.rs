//! PostgreSQL persistence for the kbbq bot.
//!
//! Diesel models and synchronous query functions live in one module per
//! record family; [`PostgresRepository`] runs them on the blocking pool
//! and implements the `kbbq_interface` repository traits.
//!
//! Counter mutations are single `INSERT ... ON CONFLICT DO UPDATE`
//! statements, so concurrent increments of the same key never lose
//! updates and no application-side read-modify-write happens.
//!
//! # Example
//!
//! ```rust,ignore
//! use kbbq_database::{establish_pool, run_migrations, PostgresRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool("postgres://localhost/kbbq", 8)?;
//! run_migrations(&mut pool.get()?)?;
//! let repo = PostgresRepository::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod activity;
mod connection;
mod embeds;
mod leveling;
mod models;
mod repository;
mod roles;
mod welcome;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use connection::{establish_connection, establish_pool, run_migrations, PgPool};
pub use models::{
    EmbedRow, LevelRoleRow, MessageComponentRow, NewLevelRoleRow, NewMessageComponentRow,
    NewStatusRoleRow, NewUserLevelRow, NewWeeklyActivityRow, NewWelcomeMessageRow, StatusRoleRow,
    UserLevelRow, WeeklyActivityRow, WelcomeMessageRow,
};
pub use repository::PostgresRepository;

use kbbq_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
