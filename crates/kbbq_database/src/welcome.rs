//! welcome_messages queries.

use crate::models::{NewWelcomeMessageRow, WelcomeMessageRow};
use crate::schema::welcome_messages;
use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use kbbq_core::GuildId;

pub(crate) fn list(
    conn: &mut PgConnection,
    guild_id: GuildId,
) -> DatabaseResult<Vec<WelcomeMessageRow>> {
    welcome_messages::table
        .filter(welcome_messages::guild_id.eq(guild_id.to_db()))
        .order(welcome_messages::id.asc())
        .select(WelcomeMessageRow::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub(crate) fn create(
    conn: &mut PgConnection,
    row: &NewWelcomeMessageRow,
) -> DatabaseResult<WelcomeMessageRow> {
    diesel::insert_into(welcome_messages::table)
        .values(row)
        .returning(WelcomeMessageRow::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub(crate) fn delete(conn: &mut PgConnection, guild_id: GuildId, id: i64) -> DatabaseResult<bool> {
    let deleted = diesel::delete(
        welcome_messages::table
            .filter(welcome_messages::guild_id.eq(guild_id.to_db()))
            .filter(welcome_messages::id.eq(id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}
