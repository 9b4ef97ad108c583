//! Placeholder substitution for stored message payloads.
//!
//! Substitution is plain string replacement over the serialized JSON, which
//! is then parsed again. A replacement value that breaks the JSON (an
//! unescaped quote in a username, say) surfaces as
//! [`TemplateErrorKind::InvalidJson`].

use crate::{action_rows, GuildId, MessageComponent, UserId};
use kbbq_error::{TemplateError, TemplateErrorKind};
use serde_json::{json, Value};

const CDN: &str = "https://cdn.discordapp.com/";

/// Values substituted into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    /// Replaces `{{user}}`, normally a mention
    pub user: String,
    /// Replaces `{{tag}}`
    pub tag: String,
    /// Replaces `{{avatar}}`
    pub avatar: String,
}

impl TemplateVars {
    /// Variables for a member.
    pub fn for_member(
        guild_id: GuildId,
        user_id: UserId,
        username: &str,
        discriminator: Option<u16>,
        guild_avatar: Option<&str>,
        user_avatar: Option<&str>,
    ) -> Self {
        let tag = match discriminator {
            Some(discriminator) => format!("{username}#{discriminator:04}"),
            None => format!("{username}#0"),
        };
        Self {
            user: format!("<@{user_id}>"),
            tag,
            avatar: avatar_url(
                guild_id,
                user_id,
                guild_avatar,
                user_avatar,
                discriminator.unwrap_or(0),
            ),
        }
    }
}

/// CDN url of the avatar a member shows in a guild.
///
/// # Examples
///
/// ```
/// use kbbq_core::{avatar_url, GuildId, UserId};
///
/// assert_eq!(
///     avatar_url(GuildId(1), UserId(2), None, Some("abc"), 0),
///     "https://cdn.discordapp.com/avatars/2/abc.png"
/// );
/// assert_eq!(
///     avatar_url(GuildId(1), UserId(2), None, None, 13),
///     "https://cdn.discordapp.com/embed/avatars/1.png"
/// );
/// ```
pub fn avatar_url(
    guild_id: GuildId,
    user_id: UserId,
    guild_avatar: Option<&str>,
    user_avatar: Option<&str>,
    discriminator: u16,
) -> String {
    match (guild_avatar, user_avatar) {
        (Some(hash), _) => format!("{CDN}guilds/{guild_id}/users/{user_id}/avatars/{hash}.png"),
        (None, Some(hash)) => format!("{CDN}avatars/{user_id}/{hash}.png"),
        (None, None) => format!("{CDN}embed/avatars/{}.png", discriminator % 6),
    }
}

/// Parse an administrator-supplied payload; it must be a JSON object.
pub fn parse_payload(raw: &str) -> Result<Value, TemplateError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TemplateError::new(TemplateErrorKind::InvalidJson(e.to_string())))?;
    if !value.is_object() {
        return Err(TemplateError::new(TemplateErrorKind::InvalidJson(
            "message payload must be a JSON object".to_string(),
        )));
    }
    Ok(value)
}

/// Replace `{{user}}`, `{{tag}}` and `{{avatar}}` in `payload`.
///
/// # Examples
///
/// ```
/// use kbbq_core::{render, TemplateVars};
/// use serde_json::json;
///
/// let vars = TemplateVars {
///     user: "<@1>".into(),
///     tag: "someone#0001".into(),
///     avatar: "https://cdn.example/a.png".into(),
/// };
/// let out = render(&json!({"content": "hi {{user}} ({{tag}})"}), &vars).unwrap();
/// assert_eq!(out["content"], "hi <@1> (someone#0001)");
/// ```
pub fn render(payload: &Value, vars: &TemplateVars) -> Result<Value, TemplateError> {
    let serialized = serde_json::to_string(payload)
        .map_err(|e| TemplateError::new(TemplateErrorKind::InvalidJson(e.to_string())))?;
    let replaced = serialized
        .replace("{{user}}", &vars.user)
        .replace("{{tag}}", &vars.tag)
        .replace("{{avatar}}", &vars.avatar);
    serde_json::from_str(&replaced)
        .map_err(|e| TemplateError::new(TemplateErrorKind::InvalidJson(e.to_string())))
}

/// Build the create-message body for delivering an embed to `target`.
///
/// The stored payload gains its link buttons and an allow-list that pings
/// only the target, then the placeholders are substituted.
pub fn build_delivery_payload(
    payload: &Value,
    components: &[MessageComponent],
    target: UserId,
    vars: &TemplateVars,
) -> Result<Value, TemplateError> {
    let mut body = match payload {
        Value::Object(map) => map.clone(),
        _ => {
            return Err(TemplateError::new(TemplateErrorKind::InvalidJson(
                "message payload must be a JSON object".to_string(),
            )));
        }
    };
    body.insert("components".to_string(), Value::Array(action_rows(components)));
    body.insert(
        "allowed_mentions".to_string(),
        json!({ "parse": [], "users": [target.to_string()] }),
    );
    render(&Value::Object(body), vars)
}
