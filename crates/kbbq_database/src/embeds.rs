//! embeds and message_components queries.

use crate::models::{EmbedRow, MessageComponentRow, NewMessageComponentRow};
use crate::schema::{embeds, message_components};
use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use kbbq_core::{GuildId, NewMessageComponent};

pub(crate) fn get(
    conn: &mut PgConnection,
    guild_id: GuildId,
    name: &str,
) -> DatabaseResult<Option<EmbedRow>> {
    embeds::table
        .find((guild_id.to_db(), name))
        .select(EmbedRow::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub(crate) fn upsert(conn: &mut PgConnection, row: &EmbedRow) -> DatabaseResult<EmbedRow> {
    diesel::insert_into(embeds::table)
        .values(row)
        .on_conflict((embeds::guild_id, embeds::embed_name))
        .do_update()
        .set(embeds::message_payload.eq(excluded(embeds::message_payload)))
        .returning(EmbedRow::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

/// Delete an embed; its buttons go with it through the foreign key.
pub(crate) fn delete(conn: &mut PgConnection, guild_id: GuildId, name: &str) -> DatabaseResult<bool> {
    let deleted = diesel::delete(embeds::table.find((guild_id.to_db(), name))).execute(conn)?;
    Ok(deleted > 0)
}

pub(crate) fn list(conn: &mut PgConnection, guild_id: GuildId) -> DatabaseResult<Vec<EmbedRow>> {
    embeds::table
        .filter(embeds::guild_id.eq(guild_id.to_db()))
        .order(embeds::embed_name.asc())
        .select(EmbedRow::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub(crate) fn list_components(
    conn: &mut PgConnection,
    guild_id: GuildId,
    embed_name: &str,
) -> DatabaseResult<Vec<MessageComponentRow>> {
    message_components::table
        .filter(message_components::guild_id.eq(guild_id.to_db()))
        .filter(message_components::embed_name.eq(embed_name))
        .order(message_components::position.asc())
        .select(MessageComponentRow::as_select())
        .load(conn)
        .map_err(Into::into)
}

/// Lock the embed row so concurrent button edits on it run one at a time.
///
/// Fails with `NotFound` when the embed does not exist.
fn lock_embed(
    conn: &mut PgConnection,
    guild_id: i64,
    embed_name: &str,
) -> QueryResult<i64> {
    embeds::table
        .find((guild_id, embed_name))
        .select(embeds::guild_id)
        .for_update()
        .first(conn)
}

/// Append a button after the embed's current last position.
pub(crate) fn add_component(
    conn: &mut PgConnection,
    component: NewMessageComponent,
) -> DatabaseResult<MessageComponentRow> {
    conn.transaction(|conn| {
        lock_embed(conn, component.guild_id.to_db(), &component.embed_name)?;
        let count: i64 = message_components::table
            .filter(message_components::guild_id.eq(component.guild_id.to_db()))
            .filter(message_components::embed_name.eq(&component.embed_name))
            .count()
            .get_result(conn)?;
        let row = NewMessageComponentRow::at_position(component, count as i32);
        diesel::insert_into(message_components::table)
            .values(&row)
            .returning(MessageComponentRow::as_returning())
            .get_result(conn)
    })
    .map_err(Into::into)
}

/// Remove a button and close the gap it leaves.
pub(crate) fn remove_component(
    conn: &mut PgConnection,
    guild_id: GuildId,
    id: i64,
) -> DatabaseResult<bool> {
    conn.transaction(|conn| {
        let owner: Option<String> = message_components::table
            .filter(message_components::guild_id.eq(guild_id.to_db()))
            .filter(message_components::id.eq(id))
            .select(message_components::embed_name)
            .first(conn)
            .optional()?;
        let Some(embed_name) = owner else {
            return Ok(false);
        };
        lock_embed(conn, guild_id.to_db(), &embed_name)?;

        let removed: Option<MessageComponentRow> = diesel::delete(
            message_components::table
                .filter(message_components::guild_id.eq(guild_id.to_db()))
                .filter(message_components::id.eq(id)),
        )
        .returning(MessageComponentRow::as_returning())
        .get_result(conn)
        .optional()?;

        let Some(removed) = removed else {
            return Ok(false);
        };
        diesel::update(
            message_components::table
                .filter(message_components::guild_id.eq(removed.guild_id))
                .filter(message_components::embed_name.eq(&removed.embed_name))
                .filter(message_components::position.gt(removed.position)),
        )
        .set(message_components::position.eq(message_components::position - 1))
        .execute(conn)?;
        Ok(true)
    })
    .map_err(|e: diesel::result::Error| e.into())
}
