//! Chat command parsing. Commands are prefixed words (`!temp`, `!route`, `!transform`,
//! `!status`); anything else is an ordinary message and goes on to the relay.

use relay_core::{
    parse_webhook_url, CommandError, Route, RouteKind, WebhookEndpoint, MAX_RECURSION_DEPTH,
};
use std::fmt::Write;

const USAGE_TEMP: &str = "temp <value between 0.1 and 3.0>";
const USAGE_ROUTE: &str = "route channel|server|author <destination_channel_id> <webhook_url> \
| route model <key> <model> | route depth <key> <n> | route delete <key> on|off \
| route mask <key> <n> | route remove <key> | route list";
const USAGE_TRANSFORM: &str = "transform [depth] <text>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Temp(f32),
    /// Create the route, or toggle it when it already exists.
    RouteToggle {
        kind: RouteKind,
        destination_channel: u64,
        endpoint: WebhookEndpoint,
    },
    RouteModel { key: String, model: String },
    RouteDepth { key: String, depth: u32 },
    RouteDelete { key: String, enabled: bool },
    RouteMask { key: String, words: u32 },
    RouteRemove { key: String },
    RouteList,
    Transform { depth: u32, text: String },
    Status,
}

impl Command {
    /// Route management is limited to the admin allowlist.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Command::RouteToggle { .. }
                | Command::RouteModel { .. }
                | Command::RouteDepth { .. }
                | Command::RouteDelete { .. }
                | Command::RouteMask { .. }
                | Command::RouteRemove { .. }
        )
    }
}

/// Parses `content` as a command. `None` means it is not a command at all (no prefix or an
/// unknown command word); `Some(Err)` is a known command with bad arguments.
pub fn parse_command(content: &str, prefix: &str) -> Option<Result<Command, CommandError>> {
    let body = content.trim_start().strip_prefix(prefix)?;
    let (name, rest) = split_word(body);
    if body.starts_with(char::is_whitespace) || name.is_empty() {
        return None;
    }
    match name.to_ascii_lowercase().as_str() {
        "temp" => Some(parse_temp(rest)),
        "route" => Some(parse_route(rest)),
        "transform" => Some(parse_transform(rest)),
        "status" => Some(Ok(Command::Status)),
        _ => None,
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn parse_temp(rest: &str) -> Result<Command, CommandError> {
    let (value, _) = split_word(rest);
    if value.is_empty() {
        return Err(CommandError::Usage(USAGE_TEMP));
    }
    value
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite())
        .map(Command::Temp)
        .ok_or_else(|| CommandError::InvalidArgument(format!("not a number: {}", value)))
}

fn parse_route(rest: &str) -> Result<Command, CommandError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let usage = || CommandError::Usage(USAGE_ROUTE);
    let sub = args.first().ok_or_else(usage)?.to_ascii_lowercase();

    match (sub.as_str(), &args[1..]) {
        ("channel" | "server" | "author", [destination, url]) => {
            let kind = match sub.as_str() {
                "channel" => RouteKind::Channel,
                "server" => RouteKind::Server,
                _ => RouteKind::Author,
            };
            Ok(Command::RouteToggle {
                kind,
                destination_channel: parse_channel_id(destination)?,
                endpoint: parse_webhook_url(url)?,
            })
        }
        ("model", [key, model]) => Ok(Command::RouteModel {
            key: key.to_string(),
            model: model.to_string(),
        }),
        ("depth", [key, n]) => Ok(Command::RouteDepth {
            key: key.to_string(),
            depth: parse_number(n)?.min(MAX_RECURSION_DEPTH),
        }),
        ("delete", [key, flag]) => Ok(Command::RouteDelete {
            key: key.to_string(),
            enabled: parse_flag(flag)?,
        }),
        ("mask", [key, n]) => Ok(Command::RouteMask {
            key: key.to_string(),
            words: parse_number(n)?,
        }),
        ("remove", [key]) => Ok(Command::RouteRemove {
            key: key.to_string(),
        }),
        ("list", []) => Ok(Command::RouteList),
        _ => Err(usage()),
    }
}

fn parse_transform(rest: &str) -> Result<Command, CommandError> {
    let (first, tail) = split_word(rest);
    match first.parse::<u32>() {
        Ok(depth) if !tail.is_empty() => Ok(Command::Transform {
            depth: depth.min(MAX_RECURSION_DEPTH),
            text: tail.to_string(),
        }),
        _ if rest.trim().is_empty() => Err(CommandError::Usage(USAGE_TRANSFORM)),
        _ => Ok(Command::Transform {
            depth: 0,
            text: rest.trim().to_string(),
        }),
    }
}

/// Accepts a raw id or a channel mention (`<#123>`).
fn parse_channel_id(raw: &str) -> Result<u64, CommandError> {
    let id = raw
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    id.parse()
        .map_err(|_| CommandError::InvalidArgument(format!("not a channel id: {}", raw)))
}

fn parse_number(raw: &str) -> Result<u32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArgument(format!("not a number: {}", raw)))
}

fn parse_flag(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CommandError::InvalidArgument(format!("expected on or off: {}", raw))),
    }
}

/// One line per route, in key order.
pub fn format_route_list(routes: &[Route]) -> String {
    if routes.is_empty() {
        return "No routes configured.".to_string();
    }
    let mut out = String::new();
    for r in routes {
        let _ = writeln!(
            out,
            "{} [{}] -> <#{}> model={} depth={} delete={} mask={}",
            r.key,
            if r.disabled { "off" } else { "on" },
            r.destination_channel,
            r.model,
            r.recursion_depth,
            r.delete_original,
            r.mask_words,
        );
    }
    out.trim_end().to_string()
}
