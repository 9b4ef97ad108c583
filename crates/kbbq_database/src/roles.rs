//! status_roles and level_roles queries.

use crate::models::{LevelRoleRow, NewLevelRoleRow, NewStatusRoleRow, StatusRoleRow};
use crate::schema::{level_roles, status_roles};
use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use kbbq_core::{GuildId, RoleId};

pub(crate) fn list_status_roles(
    conn: &mut PgConnection,
    guild_id: GuildId,
) -> DatabaseResult<Vec<StatusRoleRow>> {
    status_roles::table
        .filter(status_roles::guild_id.eq(guild_id.to_db()))
        .order(status_roles::id.asc())
        .select(StatusRoleRow::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub(crate) fn upsert_status_role(
    conn: &mut PgConnection,
    role: &NewStatusRoleRow,
) -> DatabaseResult<StatusRoleRow> {
    diesel::insert_into(status_roles::table)
        .values(role)
        .on_conflict((
            status_roles::guild_id,
            status_roles::role_id,
            status_roles::required_text,
        ))
        .do_update()
        .set((
            status_roles::embed_name.eq(excluded(status_roles::embed_name)),
            status_roles::channel_id.eq(excluded(status_roles::channel_id)),
        ))
        .returning(StatusRoleRow::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub(crate) fn delete_status_role(
    conn: &mut PgConnection,
    guild_id: GuildId,
    id: i64,
) -> DatabaseResult<bool> {
    let deleted = diesel::delete(
        status_roles::table
            .filter(status_roles::guild_id.eq(guild_id.to_db()))
            .filter(status_roles::id.eq(id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

pub(crate) fn delete_status_roles_for_role(
    conn: &mut PgConnection,
    guild_id: GuildId,
    role_id: RoleId,
) -> DatabaseResult<u64> {
    let deleted = diesel::delete(
        status_roles::table
            .filter(status_roles::guild_id.eq(guild_id.to_db()))
            .filter(status_roles::role_id.eq(role_id.to_db())),
    )
    .execute(conn)?;
    Ok(deleted as u64)
}

pub(crate) fn list_level_roles(
    conn: &mut PgConnection,
    guild_id: GuildId,
) -> DatabaseResult<Vec<LevelRoleRow>> {
    level_roles::table
        .filter(level_roles::guild_id.eq(guild_id.to_db()))
        .order((level_roles::required_level.asc(), level_roles::id.asc()))
        .select(LevelRoleRow::as_select())
        .load(conn)
        .map_err(Into::into)
}

/// Insert a rung; an existing identical rung is returned as-is.
pub(crate) fn upsert_level_role(
    conn: &mut PgConnection,
    role: &NewLevelRoleRow,
) -> DatabaseResult<LevelRoleRow> {
    diesel::insert_into(level_roles::table)
        .values(role)
        .on_conflict((
            level_roles::guild_id,
            level_roles::role_id,
            level_roles::required_level,
        ))
        .do_update()
        .set(level_roles::required_level.eq(excluded(level_roles::required_level)))
        .returning(LevelRoleRow::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub(crate) fn delete_level_role(
    conn: &mut PgConnection,
    guild_id: GuildId,
    id: i64,
) -> DatabaseResult<bool> {
    let deleted = diesel::delete(
        level_roles::table
            .filter(level_roles::guild_id.eq(guild_id.to_db()))
            .filter(level_roles::id.eq(id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}
