//! Interaction options parsed into [`Command`] values.

use kbbq_bot::{Command, ExperienceAction, LeaderboardKind};
use kbbq_core::{ChannelId, RoleId, UserId};
use kbbq_error::{TemplateError, TemplateErrorKind};
use serenity::all::{CommandDataOption, CommandDataOptionValue};
use std::collections::HashMap;
use std::str::FromStr;

/// A leaf option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Free text
    String(String),
    /// Whole number
    Integer(i64),
    /// Flag
    Boolean(bool),
    /// User mention
    User(UserId),
    /// Role mention
    Role(RoleId),
    /// Channel mention
    Channel(ChannelId),
}

/// Flattened options of one invocation: the subcommand path plus leaf values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOptions {
    path: Vec<String>,
    values: HashMap<String, OptionValue>,
}

impl CommandOptions {
    /// No subcommand, no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a subcommand (or group).
    pub fn with_subcommand(mut self, name: impl Into<String>) -> Self {
        self.path.push(name.into());
        self
    }

    /// Add a leaf value.
    pub fn with(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Flatten serenity's option tree.
    pub fn from_interaction(options: &[CommandDataOption]) -> Self {
        let mut flattened = Self::new();
        flattened.absorb(options);
        flattened
    }

    fn absorb(&mut self, options: &[CommandDataOption]) {
        for option in options {
            let value = match &option.value {
                CommandDataOptionValue::SubCommand(nested)
                | CommandDataOptionValue::SubCommandGroup(nested) => {
                    self.path.push(option.name.clone());
                    self.absorb(nested);
                    continue;
                }
                CommandDataOptionValue::String(text) => OptionValue::String(text.clone()),
                CommandDataOptionValue::Integer(number) => OptionValue::Integer(*number),
                CommandDataOptionValue::Boolean(flag) => OptionValue::Boolean(*flag),
                CommandDataOptionValue::User(id) => OptionValue::User(UserId(id.get())),
                CommandDataOptionValue::Role(id) => OptionValue::Role(RoleId(id.get())),
                CommandDataOptionValue::Channel(id) => OptionValue::Channel(ChannelId(id.get())),
                _ => continue,
            };
            self.values.insert(option.name.clone(), value);
        }
    }

    /// The innermost subcommand.
    pub fn subcommand(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptionValue::String(text)) => Some(text),
            _ => None,
        }
    }

    fn required_string(&self, name: &str) -> Result<String, TemplateError> {
        self.string(name)
            .map(str::to_string)
            .ok_or_else(|| missing(name))
    }

    fn integer(&self, name: &str) -> Result<Option<u64>, TemplateError> {
        match self.values.get(name) {
            Some(OptionValue::Integer(number)) => u64::try_from(*number)
                .map(Some)
                .map_err(|_| invalid(format!("`{name}` must not be negative"))),
            _ => Ok(None),
        }
    }

    fn required_integer(&self, name: &str) -> Result<u64, TemplateError> {
        self.integer(name)?.ok_or_else(|| missing(name))
    }

    fn id(&self, name: &str) -> Result<i64, TemplateError> {
        match self.values.get(name) {
            Some(OptionValue::Integer(number)) => Ok(*number),
            _ => Err(missing(name)),
        }
    }

    fn user(&self, name: &str) -> Option<UserId> {
        match self.values.get(name) {
            Some(OptionValue::User(id)) => Some(*id),
            _ => None,
        }
    }

    fn role(&self, name: &str) -> Result<RoleId, TemplateError> {
        match self.values.get(name) {
            Some(OptionValue::Role(id)) => Ok(*id),
            _ => Err(missing(name)),
        }
    }

    fn channel(&self, name: &str) -> Option<ChannelId> {
        match self.values.get(name) {
            Some(OptionValue::Channel(id)) => Some(*id),
            _ => None,
        }
    }
}

#[track_caller]
fn invalid(detail: impl Into<String>) -> TemplateError {
    TemplateError::new(TemplateErrorKind::InvalidArgument(detail.into()))
}

#[track_caller]
fn missing(name: &str) -> TemplateError {
    invalid(format!("missing option `{name}`"))
}

fn parse_choice<T: FromStr>(option: &str, value: &str) -> Result<T, TemplateError> {
    T::from_str(value).map_err(|_| invalid(format!("unknown {option} `{value}`")))
}

/// Build the [`Command`] for an invocation of `name`.
///
/// # Examples
///
/// ```
/// use kbbq_bot::{Command, LeaderboardKind};
/// use kbbq_social::{parse_command, CommandOptions};
///
/// let options = CommandOptions::new().with_subcommand("voice");
/// assert_eq!(
///     parse_command("leaderboard", &options).ok(),
///     Some(Command::Leaderboard(LeaderboardKind::Voice))
/// );
/// ```
pub fn parse_command(name: &str, options: &CommandOptions) -> Result<Command, TemplateError> {
    let sub = options.subcommand().unwrap_or_default();
    let command = match (name, sub) {
        ("ping", _) => Command::Ping,
        ("level", _) => Command::Level {
            user: options.user("user"),
        },
        ("leaderboard", kind) => Command::Leaderboard(parse_choice::<LeaderboardKind>("leaderboard", kind)?),
        ("edit-exp", _) => Command::EditExperience {
            user: options.user("user").ok_or_else(|| missing("user"))?,
            action: parse_choice::<ExperienceAction>("action", &options.required_string("action")?)?,
            amount: options.required_integer("amount")?,
        },
        ("status-role", "create") => Command::StatusRoleCreate {
            role: options.role("role")?,
            text: options.required_string("text")?,
            channel: options.channel("channel"),
            embed: options.string("embed").map(str::to_string),
        },
        ("status-role", "delete") => Command::StatusRoleDelete {
            id: options.id("id")?,
        },
        ("status-role", "list") => Command::StatusRoleList,
        ("level-role", "set") => Command::LevelRoleSet {
            role: options.role("role")?,
            level: options.required_integer("level")?,
        },
        ("level-role", "remove") => Command::LevelRoleRemove {
            id: options.id("id")?,
        },
        ("level-role", "list") => Command::LevelRoleList,
        ("embed", "create") => Command::EmbedCreate {
            name: options.required_string("name")?,
            json: options.required_string("json")?,
        },
        ("embed", "delete") => Command::EmbedDelete {
            name: options.required_string("name")?,
        },
        ("embed", "list") => Command::EmbedList,
        ("embed", "send") => Command::EmbedSend {
            name: options.required_string("name")?,
            channel: options.channel("channel").ok_or_else(|| missing("channel"))?,
        },
        ("embed", "button-add") => Command::EmbedButtonAdd {
            name: options.required_string("name")?,
            label: options.required_string("label")?,
            url: options.required_string("url")?,
            emoji: options.string("emoji").map(str::to_string),
        },
        ("embed", "button-remove") => Command::EmbedButtonRemove {
            id: options.id("id")?,
        },
        ("welcome-message", "create") => Command::WelcomeCreate {
            embed: options.required_string("embed")?,
            channel: options.channel("channel").ok_or_else(|| missing("channel"))?,
            expiry_secs: options.integer("expiry")?,
        },
        ("welcome-message", "delete") => Command::WelcomeDelete {
            id: options.id("id")?,
        },
        (name, "") => return Err(invalid(format!("unknown command `{name}`"))),
        (name, sub) => return Err(invalid(format!("unknown command `{name} {sub}`"))),
    };
    Ok(command)
}
