//! weekly_activities queries.

use crate::models::{signed, WeeklyActivityRow};
use crate::schema::weekly_activities;
use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use kbbq_core::{ActivityKind, GuildId, UserId};

fn new_row(guild_id: GuildId, user_id: UserId, week: &str, kind: ActivityKind, amount: i64) -> WeeklyActivityRow {
    let (messages, minutes_in_voice) = match kind {
        ActivityKind::Messages => (amount, 0),
        ActivityKind::Voice => (0, amount),
    };
    WeeklyActivityRow {
        guild_id: guild_id.to_db(),
        user_id: user_id.to_db(),
        week: week.to_string(),
        messages,
        minutes_in_voice,
    }
}

pub(crate) fn record(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    week: &str,
    kind: ActivityKind,
    amount: u64,
) -> DatabaseResult<WeeklyActivityRow> {
    let amount = signed(amount);
    let insert = diesel::insert_into(weekly_activities::table)
        .values(new_row(guild_id, user_id, week, kind, amount))
        .on_conflict((
            weekly_activities::guild_id,
            weekly_activities::user_id,
            weekly_activities::week,
        ))
        .do_update();
    let row = match kind {
        ActivityKind::Messages => insert
            .set(weekly_activities::messages.eq(weekly_activities::messages + amount))
            .returning(WeeklyActivityRow::as_returning())
            .get_result(conn)?,
        ActivityKind::Voice => insert
            .set(
                weekly_activities::minutes_in_voice
                    .eq(weekly_activities::minutes_in_voice + amount),
            )
            .returning(WeeklyActivityRow::as_returning())
            .get_result(conn)?,
    };
    Ok(row)
}

pub(crate) fn record_voice_batch(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_ids: &[UserId],
    week: &str,
    minutes: u64,
) -> DatabaseResult<()> {
    if user_ids.is_empty() {
        return Ok(());
    }
    let minutes = signed(minutes);
    let rows: Vec<WeeklyActivityRow> = user_ids
        .iter()
        .map(|user_id| new_row(guild_id, *user_id, week, ActivityKind::Voice, minutes))
        .collect();

    conn.transaction(|conn| {
        diesel::insert_into(weekly_activities::table)
            .values(&rows)
            .on_conflict((
                weekly_activities::guild_id,
                weekly_activities::user_id,
                weekly_activities::week,
            ))
            .do_update()
            .set(
                weekly_activities::minutes_in_voice
                    .eq(weekly_activities::minutes_in_voice + minutes),
            )
            .execute(conn)
    })?;
    Ok(())
}

pub(crate) fn get(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    week: &str,
) -> DatabaseResult<Option<WeeklyActivityRow>> {
    weekly_activities::table
        .find((guild_id.to_db(), user_id.to_db(), week))
        .select(WeeklyActivityRow::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub(crate) fn leaderboard(
    conn: &mut PgConnection,
    guild_id: GuildId,
    week: &str,
    kind: ActivityKind,
    offset: u64,
    limit: u64,
) -> DatabaseResult<Vec<WeeklyActivityRow>> {
    let query = weekly_activities::table
        .filter(weekly_activities::guild_id.eq(guild_id.to_db()))
        .filter(weekly_activities::week.eq(week))
        .select(WeeklyActivityRow::as_select())
        .into_boxed();
    let query = match kind {
        ActivityKind::Messages => query.order((
            weekly_activities::messages.desc(),
            weekly_activities::user_id.asc(),
        )),
        ActivityKind::Voice => query.order((
            weekly_activities::minutes_in_voice.desc(),
            weekly_activities::user_id.asc(),
        )),
    };
    query
        .offset(signed(offset))
        .limit(signed(limit))
        .load(conn)
        .map_err(Into::into)
}

pub(crate) fn count(conn: &mut PgConnection, guild_id: GuildId, week: &str) -> DatabaseResult<u64> {
    let total: i64 = weekly_activities::table
        .filter(weekly_activities::guild_id.eq(guild_id.to_db()))
        .filter(weekly_activities::week.eq(week))
        .count()
        .get_result(conn)?;
    Ok(total.max(0) as u64)
}

pub(crate) fn rank(
    conn: &mut PgConnection,
    guild_id: GuildId,
    user_id: UserId,
    week: &str,
    kind: ActivityKind,
) -> DatabaseResult<Option<u64>> {
    let Some(me) = get(conn, guild_id, user_id, week)? else {
        return Ok(None);
    };
    let in_week = weekly_activities::table
        .filter(weekly_activities::guild_id.eq(me.guild_id))
        .filter(weekly_activities::week.eq(&me.week));
    let ahead: i64 = match kind {
        ActivityKind::Messages => in_week
            .filter(
                weekly_activities::messages.gt(me.messages).or(weekly_activities::messages
                    .eq(me.messages)
                    .and(weekly_activities::user_id.lt(me.user_id))),
            )
            .count()
            .get_result(conn)?,
        ActivityKind::Voice => in_week
            .filter(
                weekly_activities::minutes_in_voice
                    .gt(me.minutes_in_voice)
                    .or(weekly_activities::minutes_in_voice
                        .eq(me.minutes_in_voice)
                        .and(weekly_activities::user_id.lt(me.user_id))),
            )
            .count()
            .get_result(conn)?,
    };
    Ok(Some(ahead.max(0) as u64 + 1))
}
