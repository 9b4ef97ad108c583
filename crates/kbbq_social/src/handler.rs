//! Serenity event handler dispatching gateway events to the engines.

use crate::conversions::{
    custom_status, guild_id, guild_role, guild_snapshot, incoming_message, member_snapshot,
    role_id, user_id, voice_snapshot,
};
use crate::{CommandOptions, command_definitions, parse_command, registers_commands};
use kbbq_bot::{CommandContext, CommandReply, Engines, Metric, MetricOp, WebhookChannel};
use kbbq_error::{KbbqError, TemplateErrorKind};
use kbbq_interface::MemberSnapshot;
use serenity::all::{
    Command as RegisteredCommand, CommandInteraction, Context, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler, GatewayIntents,
    Guild, GuildId, Interaction, Member, Message, Presence, Ready, Role, RoleId, UnavailableGuild,
    VoiceState,
};
use serenity::async_trait;
use tracing::{debug, error, info, warn};

/// Event handler for the kbbq bot.
pub struct KbbqHandler {
    engines: Engines,
}

impl KbbqHandler {
    /// Dispatch events to `engines`.
    pub fn new(engines: Engines) -> Self {
        Self { engines }
    }

    /// Gateway intents the engines need.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::GUILD_PRESENCES
    }

    fn record_event(&self, ctx: &Context, kind: &str) {
        let shard = ctx.shard_id.0.to_string();
        self.engines.context().metrics().submit(
            Metric::WebsocketEvents,
            MetricOp::Inc,
            1.0,
            &[("type", kind), ("shard", shard.as_str())],
        );
    }

    /// Last-resort reporting for errors no engine classified.
    async fn report(&self, event: &'static str, err: &KbbqError) {
        error!(event, error = %err, "Unhandled error");
        self.engines
            .context()
            .webhooks()
            .log(WebhookChannel::Error, &format!("**{event}** failed: `{err}`"))
            .await;
    }

    async fn run_command(&self, ctx: &Context, interaction: &CommandInteraction) -> CommandReply {
        let shard = ctx.shard_id.0;
        let shard_label = shard.to_string();
        self.engines.context().metrics().submit(
            Metric::InteractionsCreated,
            MetricOp::Inc,
            1.0,
            &[
                ("name", interaction.data.name.as_str()),
                ("type", "chat_input"),
                ("shard", shard_label.as_str()),
            ],
        );

        let options = CommandOptions::from_interaction(&interaction.data.options);
        let command = match parse_command(&interaction.data.name, &options) {
            Ok(command) => command,
            Err(e) => {
                let detail = match e.kind {
                    TemplateErrorKind::InvalidArgument(detail) | TemplateErrorKind::InvalidJson(detail) => detail,
                };
                return CommandReply::warning("Invalid argument", detail);
            }
        };

        let invoker = match &interaction.member {
            Some(member) => member_snapshot(member),
            None => MemberSnapshot::new(
                user_id(interaction.user.id),
                interaction.user.name.clone(),
                interaction.user.discriminator.map(|d| d.get()),
                interaction.user.avatar.map(|hash| hash.to_string()),
                None,
                Default::default(),
            ),
        };
        let context = CommandContext {
            guild_id: interaction.guild_id.map(guild_id),
            invoker,
            shard,
        };

        match self.engines.commands().execute(&context, command).await {
            Ok(reply) => reply,
            Err(e) => {
                self.report("interaction_create", &e).await;
                CommandReply::error("Something went wrong", "The command failed. Please try again later.")
            }
        }
    }
}

fn render_reply(reply: CommandReply) -> CreateInteractionResponse {
    let embed = CreateEmbed::new()
        .title(reply.title)
        .description(reply.description)
        .colour(reply.color);
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed)
            .ephemeral(reply.ephemeral),
    )
}

#[async_trait]
impl EventHandler for KbbqHandler {
    /// Called when the shard finishes its handshake.
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.record_event(&ctx, "READY");
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            shard = ctx.shard_id.0,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        if registers_commands(ctx.shard_id.0) {
            match RegisteredCommand::set_global_commands(&ctx, command_definitions()).await {
                Ok(commands) => debug!(count = commands.len(), "Registered application commands"),
                Err(e) => error!(error = %e, "Failed to register application commands"),
            }
        }

        let content = format!(
            "**__Shard Ready__**\n**User:** `{}`\n**Shard ID:** `{}`\n**Guilds:** `{}`",
            ready.user.name,
            ctx.shard_id.0,
            ready.guilds.len()
        );
        self.engines
            .context()
            .webhooks()
            .log(WebhookChannel::Console, &content)
            .await;
    }

    /// Called when a guild becomes available or the bot joins one.
    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        self.record_event(&ctx, "GUILD_CREATE");
        debug!(guild_id = %guild.id, roles = guild.roles.len(), "Guild available");
        self.engines
            .lifecycle()
            .on_guild_create(guild_snapshot(&guild), ctx.shard_id.0)
            .await;
    }

    /// Called when the bot leaves a guild or a guild has an outage.
    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        self.record_event(&ctx, "GUILD_DELETE");
        self.engines.lifecycle().on_guild_delete(
            guild_id(incomplete.id),
            incomplete.unavailable,
            ctx.shard_id.0,
        );
    }

    async fn message(&self, ctx: Context, message: Message) {
        self.record_event(&ctx, "MESSAGE_CREATE");
        if let Err(e) = self
            .engines
            .leveling()
            .handle_message(&incoming_message(&message))
            .await
        {
            self.report("message_create", &e).await;
        }
    }

    async fn presence_update(&self, ctx: Context, presence: Presence) {
        self.record_event(&ctx, "PRESENCE_UPDATE");
        let Some(guild) = presence.guild_id else {
            return;
        };
        let status = custom_status(&presence.activities);
        if let Err(e) = self
            .engines
            .status_roles()
            .handle_presence(guild_id(guild), user_id(presence.user.id), status)
            .await
        {
            self.report("presence_update", &e).await;
        }
    }

    async fn voice_state_update(&self, ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
        self.record_event(&ctx, "VOICE_STATE_UPDATE");
        let Some(guild) = new.guild_id else {
            return;
        };
        self.engines
            .lifecycle()
            .on_voice_state(guild_id(guild), &voice_snapshot(&new));
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        self.record_event(&ctx, "GUILD_MEMBER_ADD");
        let snapshot = member_snapshot(&member);
        match self
            .engines
            .welcome()
            .handle_member_join(guild_id(member.guild_id), &snapshot)
            .await
        {
            Ok(summary) if summary.failed > 0 => {
                warn!(guild_id = %member.guild_id, failed = summary.failed, "Some welcome messages failed");
            }
            Ok(_) => {}
            Err(e) => self.report("guild_member_add", &e).await,
        }
    }

    async fn guild_role_create(&self, ctx: Context, role: Role) {
        self.record_event(&ctx, "GUILD_ROLE_CREATE");
        self.engines
            .lifecycle()
            .on_role_upsert(guild_id(role.guild_id), guild_role(&role));
    }

    async fn guild_role_update(&self, ctx: Context, _old: Option<Role>, role: Role) {
        self.record_event(&ctx, "GUILD_ROLE_UPDATE");
        self.engines
            .lifecycle()
            .on_role_upsert(guild_id(role.guild_id), guild_role(&role));
    }

    async fn guild_role_delete(&self, ctx: Context, guild: GuildId, removed: RoleId, _role: Option<Role>) {
        self.record_event(&ctx, "GUILD_ROLE_DELETE");
        self.engines
            .lifecycle()
            .on_role_delete(guild_id(guild), role_id(removed));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        self.record_event(&ctx, "INTERACTION_CREATE");
        let Interaction::Command(command) = interaction else {
            return;
        };
        let reply = self.run_command(&ctx, &command).await;
        if let Err(e) = command.create_response(&ctx, render_reply(reply)).await {
            warn!(command = %command.data.name, error = %e, "Failed to answer interaction");
        }
    }
}
