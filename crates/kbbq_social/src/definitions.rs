//! Application command registrations.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};

fn option(kind: CommandOptionType, name: &str, description: &str, required: bool) -> CreateCommandOption {
    CreateCommandOption::new(kind, name, description).required(required)
}

fn subcommand(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
}

fn id_subcommand(name: &str, description: &str) -> CreateCommandOption {
    subcommand(name, description).add_sub_option(option(
        CommandOptionType::Integer,
        "id",
        "Id shown by the list subcommand",
        true,
    ))
}

fn managed(name: &str, description: &str) -> CreateCommand {
    CreateCommand::new(name)
        .description(description)
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .dm_permission(false)
}

/// Whether the shard with this id publishes the global command set.
///
/// Global commands are process-wide, so only shard 0 registers them.
pub fn registers_commands(shard_id: u32) -> bool {
    shard_id == 0
}

/// Every command the bot registers globally.
pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("ping").description("Check that the bot is alive"),
        CreateCommand::new("level")
            .description("Show a member's level")
            .dm_permission(false)
            .add_option(option(CommandOptionType::User, "user", "Member to show", false)),
        CreateCommand::new("leaderboard")
            .description("Show the guild leaderboards")
            .dm_permission(false)
            .add_option(subcommand("levels", "Most experience"))
            .add_option(subcommand("messages", "Most messages this week"))
            .add_option(subcommand("voice", "Most voice minutes this week")),
        managed("edit-exp", "Change a member's experience")
            .add_option(option(CommandOptionType::User, "user", "Member to change", true))
            .add_option(
                option(CommandOptionType::String, "action", "Kind of change", true)
                    .add_string_choice("Add", "add")
                    .add_string_choice("Remove", "remove")
                    .add_string_choice("Set", "set"),
            )
            .add_option(option(CommandOptionType::Integer, "amount", "Experience", true)),
        managed("status-role", "Roles granted by custom status text")
            .add_option(
                subcommand("create", "Grant a role while a status contains text")
                    .add_sub_option(option(CommandOptionType::Role, "role", "Role to grant", true))
                    .add_sub_option(option(CommandOptionType::String, "text", "Text to look for", true))
                    .add_sub_option(option(
                        CommandOptionType::Channel,
                        "channel",
                        "Where to announce new holders",
                        false,
                    ))
                    .add_sub_option(option(CommandOptionType::String, "embed", "Announcement embed", false)),
            )
            .add_option(id_subcommand("delete", "Delete a status role"))
            .add_option(subcommand("list", "List status roles")),
        managed("level-role", "Roles granted by level")
            .add_option(
                subcommand("set", "Grant a role from a level on")
                    .add_sub_option(option(CommandOptionType::Role, "role", "Role to grant", true))
                    .add_sub_option(option(CommandOptionType::Integer, "level", "Level required", true)),
            )
            .add_option(id_subcommand("remove", "Remove a level role"))
            .add_option(subcommand("list", "List level roles")),
        managed("embed", "Stored message templates")
            .add_option(
                subcommand("create", "Create or replace an embed")
                    .add_sub_option(option(CommandOptionType::String, "name", "Embed name", true))
                    .add_sub_option(option(CommandOptionType::String, "json", "Message JSON", true)),
            )
            .add_option(
                subcommand("delete", "Delete an embed")
                    .add_sub_option(option(CommandOptionType::String, "name", "Embed name", true)),
            )
            .add_option(subcommand("list", "List embeds"))
            .add_option(
                subcommand("send", "Post an embed")
                    .add_sub_option(option(CommandOptionType::String, "name", "Embed name", true))
                    .add_sub_option(option(CommandOptionType::Channel, "channel", "Target channel", true)),
            )
            .add_option(
                subcommand("button-add", "Add a link button")
                    .add_sub_option(option(CommandOptionType::String, "name", "Embed name", true))
                    .add_sub_option(option(CommandOptionType::String, "label", "Button label", true))
                    .add_sub_option(option(CommandOptionType::String, "url", "Link target", true))
                    .add_sub_option(option(CommandOptionType::String, "emoji", "Button emoji", false)),
            )
            .add_option(id_subcommand("button-remove", "Remove a link button")),
        managed("welcome-message", "Greet new members")
            .add_option(
                subcommand("create", "Greet new members with an embed")
                    .add_sub_option(option(CommandOptionType::String, "embed", "Embed name", true))
                    .add_sub_option(option(CommandOptionType::Channel, "channel", "Target channel", true))
                    .add_sub_option(option(
                        CommandOptionType::Integer,
                        "expiry",
                        "Seconds before the greeting is deleted",
                        false,
                    )),
            )
            .add_option(id_subcommand("delete", "Remove a welcome message")),
    ]
}
