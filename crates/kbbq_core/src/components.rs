//! Link-button components.

use crate::MessageComponent;
use kbbq_error::{TemplateError, TemplateErrorKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;

/// Longest label the platform accepts on a button.
pub const MAX_BUTTON_LABEL_LEN: usize = 80;

const BUTTONS_PER_ROW: usize = 5;

static CUSTOM_EMOJI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^<(a?):(\w+):(\d+)>$").ok());

/// Emoji shown on a link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonEmoji {
    /// A guild emoji, written `<:name:id>` or `<a:name:id>`
    Custom {
        /// Emoji name
        name: String,
        /// Emoji id
        id: u64,
        /// Animated emoji
        animated: bool,
    },
    /// A standard unicode emoji
    Unicode(String),
}

impl ButtonEmoji {
    fn to_json(&self) -> Value {
        match self {
            Self::Custom { name, id, animated } => {
                json!({ "name": name, "id": id.to_string(), "animated": animated })
            }
            Self::Unicode(name) => json!({ "name": name }),
        }
    }
}

/// Parse a user-supplied emoji for a button.
///
/// # Examples
///
/// ```
/// use kbbq_core::{parse_button_emoji, ButtonEmoji};
///
/// let emoji = parse_button_emoji("<a:party:123>").unwrap();
/// assert_eq!(
///     emoji,
///     ButtonEmoji::Custom { name: "party".into(), id: 123, animated: true }
/// );
/// assert!(parse_button_emoji("<:broken>").is_err());
/// ```
pub fn parse_button_emoji(raw: &str) -> Result<ButtonEmoji, TemplateError> {
    let raw = raw.trim();
    let invalid =
        || TemplateError::new(TemplateErrorKind::InvalidArgument(format!("invalid emoji: {raw}")));

    if let Some(captures) = CUSTOM_EMOJI.as_ref().and_then(|re| re.captures(raw)) {
        let id = captures[3].parse::<u64>().map_err(|_| invalid())?;
        return Ok(ButtonEmoji::Custom {
            name: captures[2].to_string(),
            id,
            animated: !captures[1].is_empty(),
        });
    }

    if raw.is_empty() || raw.contains(['<', '>', ':']) || raw.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(ButtonEmoji::Unicode(raw.to_string()))
}

/// Lay out link buttons in action rows of five, ordered by position.
pub fn action_rows(components: &[MessageComponent]) -> Vec<Value> {
    let mut ordered: Vec<&MessageComponent> = components.iter().collect();
    ordered.sort_by_key(|component| component.position);

    ordered
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            let buttons: Vec<Value> = row
                .iter()
                .map(|component| {
                    let mut button = json!({
                        "type": 2,
                        "style": 5,
                        "label": component.label,
                        "url": component.url,
                    });
                    if let Some(emoji) = &component.emoji {
                        button["emoji"] = emoji.to_json();
                    }
                    button
                })
                .collect();
            json!({ "type": 1, "components": buttons })
        })
        .collect()
}
