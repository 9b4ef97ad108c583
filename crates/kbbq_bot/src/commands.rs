//! Platform-agnostic application commands.
//!
//! The gateway adapter parses interaction options into a [`Command`] and
//! renders the returned [`CommandReply`]. Validation problems come back as
//! warning replies; only unclassified failures are returned as errors.

use crate::{BotContext, EmbedDelivery, LevelRoleService, Metric, MetricOp};
use kbbq_core::{
    current_week, parse_button_emoji, parse_payload, ActivityKind, ChannelId, Embed,
    ExperienceChange, GuildId, LeaderboardOrder, LevelProgress, NewLevelRole,
    NewMessageComponent, NewStatusRole, NewWelcomeMessage, RoleId, UserId,
    MAX_BUTTON_LABEL_LEN,
};
use kbbq_error::{KbbqError, KbbqResult, PlatformErrorKind, TemplateError, TemplateErrorKind};
use kbbq_interface::MemberSnapshot;
use tracing::{debug, instrument};

/// Brand color for informational replies.
pub const COLOR_PRIMARY: u32 = 0x5865f2;
/// Color for successful changes.
pub const COLOR_SUCCESS: u32 = 0x57f287;
/// Color for validation problems.
pub const COLOR_WARNING: u32 = 0xfee75c;
/// Color for failures.
pub const COLOR_ERROR: u32 = 0xed4245;

const LEADERBOARD_SIZE: u64 = 10;
const SEPARATOR: &str = "━━━━━━━━━━━━━━";

/// Which leaderboard to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LeaderboardKind {
    /// All-time experience
    Levels,
    /// Messages this week
    Messages,
    /// Voice minutes this week
    Voice,
}

/// How `edit-exp` changes a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ExperienceAction {
    /// Add to the total
    Add,
    /// Subtract, stopping at zero
    Remove,
    /// Replace the total
    Set,
}

/// A parsed application command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Liveness check
    Ping,
    /// Show a member's level
    Level {
        /// Member to show; the invoker when absent
        user: Option<UserId>,
    },
    /// Show a leaderboard
    Leaderboard(LeaderboardKind),
    /// Change a member's experience
    EditExperience {
        /// Member to change
        user: UserId,
        /// Kind of change
        action: ExperienceAction,
        /// Amount
        amount: u64,
    },
    /// Create or update a status role
    StatusRoleCreate {
        /// Role to grant
        role: RoleId,
        /// Text the status must contain
        text: String,
        /// Announcement channel
        channel: Option<ChannelId>,
        /// Announcement embed
        embed: Option<String>,
    },
    /// Delete a status role
    StatusRoleDelete {
        /// Status role id
        id: i64,
    },
    /// List status roles
    StatusRoleList,
    /// Add a rung to the level-role ladder
    LevelRoleSet {
        /// Role to grant
        role: RoleId,
        /// Level required
        level: u64,
    },
    /// Remove a ladder rung
    LevelRoleRemove {
        /// Level role id
        id: i64,
    },
    /// List the ladder
    LevelRoleList,
    /// Create or replace an embed
    EmbedCreate {
        /// Embed name
        name: String,
        /// Raw create-message JSON
        json: String,
    },
    /// Delete an embed and its buttons
    EmbedDelete {
        /// Embed name
        name: String,
    },
    /// List embeds
    EmbedList,
    /// Post an embed addressed to the invoker
    EmbedSend {
        /// Embed name
        name: String,
        /// Target channel
        channel: ChannelId,
    },
    /// Append a link button to an embed
    EmbedButtonAdd {
        /// Embed name
        name: String,
        /// Button label
        label: String,
        /// Button URL
        url: String,
        /// Custom or unicode emoji
        emoji: Option<String>,
    },
    /// Remove a link button
    EmbedButtonRemove {
        /// Button id
        id: i64,
    },
    /// Greet new members with an embed
    WelcomeCreate {
        /// Embed name
        embed: String,
        /// Target channel
        channel: ChannelId,
        /// Seconds before the greeting is deleted
        expiry_secs: Option<u64>,
    },
    /// Remove a welcome message
    WelcomeDelete {
        /// Welcome message id
        id: i64,
    },
}

impl Command {
    /// Top-level command name, used as the `command` metric label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Level { .. } => "level",
            Self::Leaderboard(_) => "leaderboard",
            Self::EditExperience { .. } => "edit-exp",
            Self::StatusRoleCreate { .. } | Self::StatusRoleDelete { .. } | Self::StatusRoleList => {
                "status-role"
            }
            Self::LevelRoleSet { .. } | Self::LevelRoleRemove { .. } | Self::LevelRoleList => {
                "level-role"
            }
            Self::EmbedCreate { .. }
            | Self::EmbedDelete { .. }
            | Self::EmbedList
            | Self::EmbedSend { .. }
            | Self::EmbedButtonAdd { .. }
            | Self::EmbedButtonRemove { .. } => "embed",
            Self::WelcomeCreate { .. } | Self::WelcomeDelete { .. } => "welcome-message",
        }
    }
}

/// Who ran a command, and where.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Guild, absent in direct messages
    pub guild_id: Option<GuildId>,
    /// Invoking member
    pub invoker: MemberSnapshot,
    /// Shard that received the interaction
    pub shard: u32,
}

/// The reply rendered as a single embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Embed title
    pub title: String,
    /// Embed description
    pub description: String,
    /// Embed color
    pub color: u32,
    /// Visible to the invoker only
    pub ephemeral: bool,
}

impl CommandReply {
    fn new(title: impl Into<String>, description: impl Into<String>, color: u32, ephemeral: bool) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            ephemeral,
        }
    }

    /// A public informational reply.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, COLOR_PRIMARY, false)
    }

    /// A private confirmation.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, COLOR_SUCCESS, true)
    }

    /// A private validation problem.
    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, COLOR_WARNING, true)
    }

    /// A private failure notice.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, COLOR_ERROR, true)
    }

    /// Whether the command did what was asked.
    pub fn is_success(&self) -> bool {
        self.color != COLOR_WARNING && self.color != COLOR_ERROR
    }
}

/// Runs commands against the repository and platform API.
#[derive(Clone)]
pub struct CommandService {
    ctx: BotContext,
    roles: LevelRoleService,
    embeds: EmbedDelivery,
}

impl CommandService {
    /// Create the service.
    pub fn new(ctx: BotContext, roles: LevelRoleService, embeds: EmbedDelivery) -> Self {
        Self { ctx, roles, embeds }
    }

    /// Run a command and report it to `commands_used`.
    #[instrument(skip(self, context), fields(command = command.name(), shard = context.shard))]
    pub async fn execute(&self, context: &CommandContext, command: Command) -> KbbqResult<CommandReply> {
        let name = command.name();
        let result = match context.guild_id {
            None => Ok(CommandReply::warning(
                "Server only",
                "This command can only be used in a server.",
            )),
            Some(guild_id) => self.dispatch(guild_id, context, command).await,
        };
        let result = result.or_else(validation_reply);

        let success = result.as_ref().is_ok_and(CommandReply::is_success);
        let success_label = success.to_string();
        let shard_label = context.shard.to_string();
        self.ctx.metrics().submit(
            Metric::CommandsUsed,
            MetricOp::Inc,
            1.0,
            &[
                ("command", name),
                ("type", "chat_input"),
                ("success", success_label.as_str()),
                ("shard", shard_label.as_str()),
            ],
        );
        debug!(success, "Command finished");
        result
    }

    async fn dispatch(
        &self,
        guild_id: GuildId,
        context: &CommandContext,
        command: Command,
    ) -> KbbqResult<CommandReply> {
        match command {
            Command::Ping => Ok(CommandReply::info("Pong!", "The bot is online.")),
            Command::Level { user } => {
                self.level(guild_id, user.unwrap_or(context.invoker.user_id))
                    .await
            }
            Command::Leaderboard(kind) => self.leaderboard(guild_id, context, kind).await,
            Command::EditExperience {
                user,
                action,
                amount,
            } => self.edit_experience(guild_id, user, action, amount).await,
            Command::StatusRoleCreate {
                role,
                text,
                channel,
                embed,
            } => {
                self.create_status_role(guild_id, role, text, channel, embed)
                    .await
            }
            Command::StatusRoleDelete { id } => {
                let deleted = self
                    .ctx
                    .repository()
                    .delete_status_role(guild_id, id)
                    .await?;
                Ok(deletion_reply(deleted, "Status role deleted", "status role", id))
            }
            Command::StatusRoleList => self.list_status_roles(guild_id).await,
            Command::LevelRoleSet { role, level } => self.set_level_role(guild_id, role, level).await,
            Command::LevelRoleRemove { id } => {
                let deleted = self.ctx.repository().delete_level_role(guild_id, id).await?;
                Ok(deletion_reply(deleted, "Level role removed", "level role", id))
            }
            Command::LevelRoleList => self.list_level_roles(guild_id).await,
            Command::EmbedCreate { name, json } => self.create_embed(guild_id, name, &json).await,
            Command::EmbedDelete { name } => {
                if self.ctx.repository().delete_embed(guild_id, &name).await? {
                    Ok(CommandReply::success(
                        "Embed deleted",
                        format!("Deleted `{name}` and its buttons."),
                    ))
                } else {
                    Ok(missing_embed(&name))
                }
            }
            Command::EmbedList => self.list_embeds(guild_id).await,
            Command::EmbedSend { name, channel } => {
                match self
                    .embeds
                    .send(guild_id, channel, &name, &context.invoker)
                    .await?
                {
                    Some(_) => Ok(CommandReply::success(
                        "Embed sent",
                        format!("Sent `{name}` to <#{channel}>."),
                    )),
                    None => Ok(missing_embed(&name)),
                }
            }
            Command::EmbedButtonAdd {
                name,
                label,
                url,
                emoji,
            } => self.add_button(guild_id, name, label, url, emoji).await,
            Command::EmbedButtonRemove { id } => {
                let removed = self.ctx.repository().remove_component(guild_id, id).await?;
                Ok(deletion_reply(removed, "Button removed", "button", id))
            }
            Command::WelcomeCreate {
                embed,
                channel,
                expiry_secs,
            } => {
                self.create_welcome_message(guild_id, embed, channel, expiry_secs)
                    .await
            }
            Command::WelcomeDelete { id } => {
                let deleted = self
                    .ctx
                    .repository()
                    .delete_welcome_message(guild_id, id)
                    .await?;
                Ok(deletion_reply(deleted, "Welcome message deleted", "welcome message", id))
            }
        }
    }

    async fn level(&self, guild_id: GuildId, user_id: UserId) -> KbbqResult<CommandReply> {
        let repository = self.ctx.repository();
        let Some(record) = repository.get_experience(guild_id, user_id).await? else {
            return Ok(CommandReply::info(
                "No experience yet",
                format!("<@{user_id}> hasn't earned any experience yet."),
            ));
        };
        let progress = LevelProgress::from_experience(record.experience);
        let rank = repository
            .rank(guild_id, user_id, LeaderboardOrder::Experience)
            .await?
            .map(|rank| format!(" (rank #{rank})"))
            .unwrap_or_default();

        Ok(CommandReply::info(
            format!("Level {}", progress.level()),
            format!(
                "<@{user_id}> is level **{}**{rank}\n**{}** experience, **{}** more to reach level {}",
                progress.level(),
                progress.experience(),
                progress.remaining(),
                progress.level() + 1,
            ),
        ))
    }

    async fn leaderboard(
        &self,
        guild_id: GuildId,
        context: &CommandContext,
        kind: LeaderboardKind,
    ) -> KbbqResult<CommandReply> {
        let repository = self.ctx.repository();
        let invoker = context.invoker.user_id;
        let guild_label = guild_id.to_string();
        let shard_label = context.shard.to_string();

        let (title, mut lines, invoker_rank, total) = match kind {
            LeaderboardKind::Levels => {
                let order = LeaderboardOrder::Experience;
                let page = repository
                    .leaderboard(guild_id, order, 0, LEADERBOARD_SIZE)
                    .await?;
                let total = repository.count_levels(guild_id).await?;
                self.ctx.metrics().submit(
                    Metric::UserLevels,
                    MetricOp::Set,
                    total as f64,
                    &[("guildId", guild_label.as_str()), ("shard", shard_label.as_str())],
                );
                let rank = repository.rank(guild_id, invoker, order).await?;
                let lines = page.iter().map(level_line).collect::<Vec<_>>();
                ("Level leaderboard", lines, rank, total)
            }
            LeaderboardKind::Messages | LeaderboardKind::Voice => {
                let activity = activity_kind(kind);
                let week = current_week();
                let page = repository
                    .activity_leaderboard(guild_id, &week, activity, 0, LEADERBOARD_SIZE)
                    .await?;
                let total = repository.count_activity(guild_id, &week).await?;
                let kind_label = activity.to_string();
                self.ctx.metrics().submit(
                    Metric::UserActivity,
                    MetricOp::Set,
                    total as f64,
                    &[
                        ("guildId", guild_label.as_str()),
                        ("shard", shard_label.as_str()),
                        ("currentWeek", week.as_str()),
                        ("type", kind_label.as_str()),
                    ],
                );
                let rank = repository
                    .activity_rank(guild_id, invoker, &week, activity)
                    .await?;
                let lines = page
                    .iter()
                    .map(|entry| activity_line(entry, activity))
                    .collect::<Vec<_>>();
                let title = match activity {
                    ActivityKind::Messages => "Message leaderboard",
                    ActivityKind::Voice => "Voice leaderboard",
                };
                (title, lines, rank, total)
            }
        };

        if lines.is_empty() {
            return Ok(CommandReply::info(title, "Nobody is on this leaderboard yet."));
        }

        if let Some(rank) = invoker_rank.filter(|rank| *rank > LEADERBOARD_SIZE) {
            let offset = rank - 2;
            let neighbours = match kind {
                LeaderboardKind::Levels => repository
                    .leaderboard(guild_id, LeaderboardOrder::Experience, offset, 3)
                    .await?
                    .iter()
                    .map(level_line)
                    .collect::<Vec<_>>(),
                LeaderboardKind::Messages | LeaderboardKind::Voice => {
                    let activity = activity_kind(kind);
                    repository
                        .activity_leaderboard(guild_id, &current_week(), activity, offset, 3)
                        .await?
                        .iter()
                        .map(|entry| activity_line(entry, activity))
                        .collect::<Vec<_>>()
                }
            };
            lines.push(SEPARATOR.to_string());
            lines.extend(neighbours);
        }
        lines.push(format!("\n{total} ranked members"));

        Ok(CommandReply::info(title, lines.join("\n")))
    }

    async fn edit_experience(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        action: ExperienceAction,
        amount: u64,
    ) -> KbbqResult<CommandReply> {
        let signed = i64::try_from(amount).map_err(|_| invalid(format!("{amount} is too large")))?;
        let change = match action {
            ExperienceAction::Add => ExperienceChange::Increment(signed),
            ExperienceAction::Remove => ExperienceChange::Increment(-signed),
            ExperienceAction::Set => ExperienceChange::Set(amount),
        };
        let record = self
            .ctx
            .repository()
            .upsert_experience(guild_id, user_id, change)
            .await?;
        self.roles.sync_level(&record).await?;

        Ok(CommandReply::success(
            "Experience updated",
            format!(
                "<@{user_id}> now has **{}** experience (level **{}**).",
                record.experience,
                record.computed_level()
            ),
        ))
    }

    async fn create_status_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        text: String,
        channel_id: Option<ChannelId>,
        embed_name: Option<String>,
    ) -> KbbqResult<CommandReply> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(invalid("the required text cannot be empty"));
        }
        match (&embed_name, channel_id) {
            (Some(_), None) => return Err(invalid("an announcement embed needs a channel")),
            (None, Some(_)) => return Err(invalid("an announcement channel needs an embed")),
            _ => {}
        }
        if let Some(name) = &embed_name {
            if self.ctx.repository().get_embed(guild_id, name).await?.is_none() {
                return Ok(missing_embed(name));
            }
        }

        let role = self
            .ctx
            .repository()
            .upsert_status_role(NewStatusRole {
                guild_id,
                role_id,
                required_text: text,
                embed_name,
                channel_id,
            })
            .await?;
        Ok(CommandReply::success(
            "Status role created",
            format!(
                "<@&{}> will be given to members whose status contains `{}`.",
                role.role_id, role.required_text
            ),
        ))
    }

    async fn list_status_roles(&self, guild_id: GuildId) -> KbbqResult<CommandReply> {
        let roles = self.ctx.repository().list_status_roles(guild_id).await?;
        if roles.is_empty() {
            return Ok(CommandReply::info("Status roles", "No status roles are configured."));
        }
        let lines = roles
            .iter()
            .map(|role| {
                let announcement = role
                    .announcement()
                    .map(|(channel, embed)| format!(" (announces `{embed}` in <#{channel}>)"))
                    .unwrap_or_default();
                format!(
                    "`{}` `{}`: <@&{}>{announcement}",
                    role.id, role.required_text, role.role_id
                )
            })
            .collect::<Vec<_>>();
        Ok(CommandReply::info("Status roles", lines.join("\n")))
    }

    async fn set_level_role(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        level: u64,
    ) -> KbbqResult<CommandReply> {
        if level == 0 {
            return Err(invalid("the required level must be at least 1"));
        }
        let role = self
            .ctx
            .repository()
            .upsert_level_role(NewLevelRole {
                guild_id,
                role_id,
                required_level: level,
            })
            .await?;
        Ok(CommandReply::success(
            "Level role set",
            format!(
                "<@&{}> will be given from level **{}**.",
                role.role_id, role.required_level
            ),
        ))
    }

    async fn list_level_roles(&self, guild_id: GuildId) -> KbbqResult<CommandReply> {
        let ladder = self.ctx.repository().list_level_roles(guild_id).await?;
        if ladder.is_empty() {
            return Ok(CommandReply::info("Level roles", "No level roles are configured."));
        }
        let lines = ladder
            .iter()
            .map(|rung| format!("`{}` level {}: <@&{}>", rung.id, rung.required_level, rung.role_id))
            .collect::<Vec<_>>();
        Ok(CommandReply::info("Level roles", lines.join("\n")))
    }

    async fn create_embed(&self, guild_id: GuildId, name: String, json: &str) -> KbbqResult<CommandReply> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("the embed name cannot be empty"));
        }
        let payload = parse_payload(json)?;
        let embed = self
            .ctx
            .repository()
            .upsert_embed(Embed {
                guild_id,
                name,
                payload,
            })
            .await?;
        Ok(CommandReply::success(
            "Embed saved",
            format!("Saved `{}`.", embed.name),
        ))
    }

    async fn list_embeds(&self, guild_id: GuildId) -> KbbqResult<CommandReply> {
        let embeds = self.ctx.repository().list_embeds(guild_id).await?;
        if embeds.is_empty() {
            return Ok(CommandReply::info("Embeds", "No embeds are saved."));
        }
        let lines = embeds
            .iter()
            .map(|embed| format!("`{}`", embed.name))
            .collect::<Vec<_>>();
        Ok(CommandReply::info("Embeds", lines.join("\n")))
    }

    async fn add_button(
        &self,
        guild_id: GuildId,
        embed_name: String,
        label: String,
        url: String,
        emoji: Option<String>,
    ) -> KbbqResult<CommandReply> {
        let length = label.chars().count();
        if length == 0 || length > MAX_BUTTON_LABEL_LEN {
            return Err(invalid(format!(
                "button labels must be 1 to {MAX_BUTTON_LABEL_LEN} characters"
            )));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(invalid("button URLs must start with http:// or https://"));
        }
        let emoji = emoji
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_button_emoji)
            .transpose()?;

        let repository = self.ctx.repository();
        if repository.get_embed(guild_id, &embed_name).await?.is_none() {
            return Ok(missing_embed(&embed_name));
        }
        let component = repository
            .add_component(NewMessageComponent {
                guild_id,
                embed_name,
                label,
                url,
                emoji,
            })
            .await?;
        Ok(CommandReply::success(
            "Button added",
            format!(
                "Added button `{}` to `{}` at position {}.",
                component.id,
                component.embed_name,
                component.position + 1
            ),
        ))
    }

    async fn create_welcome_message(
        &self,
        guild_id: GuildId,
        embed_name: String,
        channel_id: ChannelId,
        expiry_secs: Option<u64>,
    ) -> KbbqResult<CommandReply> {
        if expiry_secs == Some(0) {
            return Err(invalid("the expiry must be at least one second"));
        }
        let repository = self.ctx.repository();
        if repository.get_embed(guild_id, &embed_name).await?.is_none() {
            return Ok(missing_embed(&embed_name));
        }
        let message = repository
            .create_welcome_message(NewWelcomeMessage {
                guild_id,
                channel_id,
                embed_name,
                expiry_secs,
            })
            .await?;
        Ok(CommandReply::success(
            "Welcome message created",
            format!(
                "New members will get `{}` in <#{}> (id `{}`).",
                message.embed_name, message.channel_id, message.id
            ),
        ))
    }
}

fn activity_kind(kind: LeaderboardKind) -> ActivityKind {
    match kind {
        LeaderboardKind::Voice => ActivityKind::Voice,
        LeaderboardKind::Levels | LeaderboardKind::Messages => ActivityKind::Messages,
    }
}

fn level_line(entry: &kbbq_interface::RankedLevel) -> String {
    let record = entry.record();
    format!(
        "`#{}` <@{}> · level {} ({} experience)",
        entry.rank(),
        record.user_id,
        record.computed_level(),
        record.experience
    )
}

fn activity_line(entry: &kbbq_interface::RankedActivity, kind: ActivityKind) -> String {
    let record = entry.record();
    let amount = match kind {
        ActivityKind::Messages => format!("{} messages", record.messages),
        ActivityKind::Voice => format!("{} minutes", record.minutes_in_voice),
    };
    format!("`#{}` <@{}> · {amount}", entry.rank(), record.user_id)
}

fn deletion_reply(deleted: bool, title: &str, noun: &str, id: i64) -> CommandReply {
    if deleted {
        CommandReply::success(title, format!("Deleted {noun} `{id}`."))
    } else {
        CommandReply::warning("Not found", format!("No {noun} has id `{id}`."))
    }
}

fn missing_embed(name: &str) -> CommandReply {
    CommandReply::warning("Unknown embed", format!("No embed is named `{name}`."))
}

#[track_caller]
fn invalid(message: impl Into<String>) -> KbbqError {
    TemplateError::new(TemplateErrorKind::InvalidArgument(message.into())).into()
}

/// Turn user-caused failures into warning replies.
fn validation_reply(err: KbbqError) -> KbbqResult<CommandReply> {
    if let Some(template) = err.as_template() {
        let description = match &template.kind {
            TemplateErrorKind::InvalidJson(detail) => format!("That is not a valid message payload: {detail}"),
            TemplateErrorKind::InvalidArgument(detail) => detail.clone(),
        };
        return Ok(CommandReply::warning("Invalid argument", description));
    }
    if let Some(platform) = err.as_platform() {
        let reply = match &platform.kind {
            PlatformErrorKind::MissingPermissions(_) => Some(CommandReply::error(
                "Missing permissions",
                "I don't have permission to do that.",
            )),
            PlatformErrorKind::UnknownChannel => Some(CommandReply::warning(
                "Unknown channel",
                "That channel no longer exists.",
            )),
            PlatformErrorKind::UnknownMember => Some(CommandReply::warning(
                "Unknown member",
                "That member is not in this server.",
            )),
            PlatformErrorKind::UnknownRole => Some(CommandReply::warning(
                "Unknown role",
                "That role no longer exists.",
            )),
            PlatformErrorKind::InvalidPayload(detail) => Some(CommandReply::warning(
                "Invalid embed",
                format!("The platform rejected this embed: {detail}"),
            )),
            PlatformErrorKind::Http(_) => None,
        };
        if let Some(reply) = reply {
            return Ok(reply);
        }
    }
    Err(err)
}
