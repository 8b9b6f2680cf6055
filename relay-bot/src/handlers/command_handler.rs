use async_trait::async_trait;
use relay_core::{
    CommandError, Handler, HandlerResponse, InboundMessage, RelayError, Result, Route, RouteKind,
};
use route_store::{StoreError, ToggleOutcome};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::commands::{format_route_list, parse_command, Command};
use crate::context::RelayContext;

/// Answers chat commands. Non-command messages pass through untouched.
pub struct CommandHandler {
    ctx: Arc<RelayContext>,
}

impl CommandHandler {
    pub fn new(ctx: Arc<RelayContext>) -> Self {
        Self { ctx }
    }

    /// Executes one parsed command and returns the reply text.
    #[instrument(skip(self, message), fields(author_id = message.author.id))]
    pub async fn execute(&self, command: Command, message: &InboundMessage) -> Result<String> {
        if command.requires_admin() && !self.ctx.settings.is_admin(message.author.id) {
            warn!(author_id = message.author.id, "route command refused, not an admin");
            return Err(CommandError::Unauthorized.into());
        }

        match command {
            Command::Temp(requested) => {
                let kept = self.ctx.sampling.set_temperature(requested);
                info!(requested, kept, "temperature changed");
                Ok(format!("Temperature set to {:.2}", kept))
            }
            Command::RouteToggle {
                kind,
                destination_channel,
                endpoint,
            } => {
                let source = match kind {
                    RouteKind::Channel => message.channel_id,
                    RouteKind::Server => message.guild_id.ok_or(CommandError::NotInServer)?,
                    RouteKind::Author => message.author.id,
                };
                let route = Route::new(
                    kind,
                    source,
                    destination_channel,
                    endpoint,
                    self.ctx.settings.default_model.clone(),
                );
                let outcome = self.ctx.routes.toggle(route).await.map_err(store_error)?;
                let verb = match &outcome {
                    ToggleOutcome::Created(_) => "created",
                    ToggleOutcome::Enabled(_) => "enabled",
                    ToggleOutcome::Disabled(_) => "disabled",
                };
                Ok(format!("Route {} {}", outcome.route().key, verb))
            }
            Command::RouteModel { key, model } => {
                let route = self
                    .ctx
                    .routes
                    .update(&key, |r| r.model = model)
                    .await
                    .map_err(store_error)?;
                Ok(format!("Route {} now uses model {}", route.key, route.model))
            }
            Command::RouteDepth { key, depth } => {
                let route = self
                    .ctx
                    .routes
                    .update(&key, |r| r.set_recursion_depth(depth))
                    .await
                    .map_err(store_error)?;
                Ok(format!(
                    "Route {} recursion depth set to {}",
                    route.key, route.recursion_depth
                ))
            }
            Command::RouteDelete { key, enabled } => {
                let route = self
                    .ctx
                    .routes
                    .update(&key, |r| r.delete_original = enabled)
                    .await
                    .map_err(store_error)?;
                Ok(format!(
                    "Route {} {} original messages",
                    route.key,
                    if route.delete_original { "deletes" } else { "keeps" }
                ))
            }
            Command::RouteMask { key, words } => {
                let route = self
                    .ctx
                    .routes
                    .update(&key, |r| r.mask_words = words)
                    .await
                    .map_err(store_error)?;
                Ok(format!("Route {} masks {} words", route.key, route.mask_words))
            }
            Command::RouteRemove { key } => {
                let route = self.ctx.routes.remove(&key).await.map_err(store_error)?;
                Ok(format!("Route {} removed", route.key))
            }
            Command::RouteList => Ok(format_route_list(&self.ctx.routes.snapshot().await)),
            Command::Transform { depth, text } => {
                let _busy = self.ctx.busy.enter();
                let outputs = self
                    .ctx
                    .chain
                    .run(&text, &self.ctx.settings.default_model, depth)
                    .await;
                if outputs.is_empty() {
                    Ok("Transform service did not answer.".to_string())
                } else {
                    Ok(outputs.join("\n"))
                }
            }
            Command::Status => Ok(self.status().await),
        }
    }

    async fn status(&self) -> String {
        let availability = if self.ctx.transformer.is_available() {
            "available"
        } else {
            "unavailable"
        };
        format!(
            "Transform service: {}\nRoutes: {}\nCached identities: {}\nTemperature: {:.2}\nIn flight: {}",
            availability,
            self.ctx.routes.len().await,
            self.ctx.identities.len().await,
            self.ctx.sampling.current().temperature,
            self.ctx.busy.in_flight(),
        )
    }
}

#[async_trait]
impl Handler for CommandHandler {
    async fn handle(&self, message: &InboundMessage) -> Result<HandlerResponse> {
        let Some(parsed) = parse_command(&message.content, &self.ctx.settings.command_prefix)
        else {
            return Ok(HandlerResponse::Continue);
        };

        let outcome = match parsed {
            Ok(command) => self.execute(command, message).await,
            Err(e) => Err(e.into()),
        };
        let reply = match outcome {
            Ok(text) => text,
            Err(RelayError::Command(e)) => e.to_string(),
            Err(e) => {
                error!(error = %e, message_id = message.id, "Command failed");
                format!("Command failed: {}", e)
            }
        };
        Ok(HandlerResponse::Reply(reply))
    }
}

fn store_error(e: StoreError) -> RelayError {
    match e {
        StoreError::NotFound(key) => CommandError::RouteNotFound(key).into(),
        other => RelayError::Store(other.to_string()),
    }
}
