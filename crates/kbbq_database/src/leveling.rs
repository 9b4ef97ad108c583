//! user_levels queries.

use crate::models::{signed, NewUserLevelRow, UserLevelRow};
use crate::schema::user_levels;
use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use kbbq_core::{ExperienceChange, GuildId, LeaderboardOrder, UserId};

diesel::define_sql_function! {
    /// SQL `GREATEST` over two bigints.
    fn greatest(a: BigInt, b: BigInt) -> BigInt;
}

/// Create the row or apply `change` in one statement.
///
/// Increments are clamped at zero by the database, never by a read in
/// application code.
pub(crate) fn upsert_experience(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    change: ExperienceChange,
) -> DatabaseResult<UserLevelRow> {
    let insert = diesel::insert_into(user_levels::table);
    let row = match change {
        ExperienceChange::Increment(delta) => insert
            .values(NewUserLevelRow {
                guild_id: guild_id.to_db(),
                user_id: user_id.to_db(),
                experience: delta.max(0),
                level: 0,
            })
            .on_conflict((user_levels::guild_id, user_levels::user_id))
            .do_update()
            .set((
                user_levels::experience.eq(greatest(user_levels::experience + delta, 0_i64)),
                user_levels::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserLevelRow::as_returning())
            .get_result(conn)?,
        ExperienceChange::Set(value) => insert
            .values(NewUserLevelRow {
                guild_id: guild_id.to_db(),
                user_id: user_id.to_db(),
                experience: signed(value),
                level: 0,
            })
            .on_conflict((user_levels::guild_id, user_levels::user_id))
            .do_update()
            .set((
                user_levels::experience.eq(signed(value)),
                user_levels::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserLevelRow::as_returning())
            .get_result(conn)?,
    };
    Ok(row)
}

/// Add `delta` to every listed user with one multi-row upsert.
pub(crate) fn increment_batch(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_ids: &[UserId],
    delta: u64,
) -> DatabaseResult<Vec<UserLevelRow>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    let delta = signed(delta);
    let rows: Vec<NewUserLevelRow> = user_ids
        .iter()
        .map(|user_id| NewUserLevelRow {
            guild_id: guild_id.to_db(),
            user_id: user_id.to_db(),
            experience: delta,
            level: 0,
        })
        .collect();

    conn.transaction(|conn| {
        diesel::insert_into(user_levels::table)
            .values(&rows)
            .on_conflict((user_levels::guild_id, user_levels::user_id))
            .do_update()
            .set((
                user_levels::experience.eq(user_levels::experience + delta),
                user_levels::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserLevelRow::as_returning())
            .get_results(conn)
    })
    .map_err(Into::into)
}

pub(crate) fn get(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
) -> DatabaseResult<Option<UserLevelRow>> {
    user_levels::table
        .find((guild_id.to_db(), user_id.to_db()))
        .select(UserLevelRow::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub(crate) fn set_level(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    level: u64,
) -> DatabaseResult<()> {
    let updated = diesel::update(user_levels::table.find((guild_id.to_db(), user_id.to_db())))
        .set((
            user_levels::level.eq(signed(level)),
            user_levels::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(diesel::result::Error::NotFound.into());
    }
    Ok(())
}

pub(crate) fn leaderboard(
    conn: &mut PgConnection,
    guild_id: GuildId,
    order: LeaderboardOrder,
    offset: u64,
    limit: u64,
) -> DatabaseResult<Vec<UserLevelRow>> {
    let query = user_levels::table
        .filter(user_levels::guild_id.eq(guild_id.to_db()))
        .select(UserLevelRow::as_select())
        .into_boxed();
    let query = match order {
        LeaderboardOrder::Experience => {
            query.order((user_levels::experience.desc(), user_levels::user_id.asc()))
        }
        LeaderboardOrder::Level => query.order((
            user_levels::level.desc(),
            user_levels::experience.desc(),
            user_levels::user_id.asc(),
        )),
    };
    query
        .offset(signed(offset))
        .limit(signed(limit))
        .load(conn)
        .map_err(Into::into)
}

pub(crate) fn count(conn: &mut PgConnection, guild_id: GuildId) -> DatabaseResult<u64> {
    let total: i64 = user_levels::table
        .filter(user_levels::guild_id.eq(guild_id.to_db()))
        .count()
        .get_result(conn)?;
    Ok(total.max(0) as u64)
}

/// One-based rank, counting the rows ordered strictly ahead of the user.
pub(crate) fn rank(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    order: LeaderboardOrder,
) -> DatabaseResult<Option<u64>> {
    let Some(me) = get(conn, guild_id, user_id)? else {
        return Ok(None);
    };
    let in_guild = user_levels::table.filter(user_levels::guild_id.eq(me.guild_id));
    let ahead: i64 = match order {
        LeaderboardOrder::Experience => in_guild
            .filter(
                user_levels::experience.gt(me.experience).or(user_levels::experience
                    .eq(me.experience)
                    .and(user_levels::user_id.lt(me.user_id))),
            )
            .count()
            .get_result(conn)?,
        LeaderboardOrder::Level => in_guild
            .filter(
                user_levels::level.gt(me.level).or(user_levels::level.eq(me.level).and(
                    user_levels::experience.gt(me.experience).or(user_levels::experience
                        .eq(me.experience)
                        .and(user_levels::user_id.lt(me.user_id))),
                )),
            )
            .count()
            .get_result(conn)?,
    };
    Ok(Some(ahead.max(0) as u64 + 1))
}
