use chrono::{DateTime, Utc};
use relay_core::{Author, InboundMessage};
use serenity::all::Message;

/// Longest message the bot may send as a command reply.
pub const MAX_REPLY_CHARS: usize = 2000;

/// Permalink to a message; direct messages use `@me` in place of the guild.
pub fn message_link(guild_id: Option<u64>, channel_id: u64, message_id: u64) -> String {
    let guild = guild_id.map_or_else(|| "@me".to_string(), |g| g.to_string());
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild, channel_id, message_id
    )
}

/// Converts a gateway message. The display name prefers the server nickname, then the global
/// display name; [`Author::identity`] falls back to the account name.
pub fn to_inbound(msg: &Message) -> InboundMessage {
    let guild_id = msg.guild_id.map(|g| g.get());
    let display_name = msg
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .or_else(|| msg.author.global_name.clone());

    InboundMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        guild_id,
        author: Author {
            id: msg.author.id.get(),
            name: msg.author.name.clone(),
            display_name,
            avatar_url: Some(msg.author.face()),
        },
        content: msg.content.clone(),
        webhook_id: msg.webhook_id.map(|w| w.get()),
        link: message_link(guild_id, msg.channel_id.get(), msg.id.get()),
        created_at: DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now),
    }
}

/// Cuts a reply to what Discord accepts, on a char boundary.
pub fn truncate_reply(text: &str) -> &str {
    match text.char_indices().nth(MAX_REPLY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
