// ABOUTME: Member-join handling: renders the welcome card, posts it, assigns the role
// ABOUTME: Each sub-step fails independently; nothing here panics out of the gateway task

use crate::config::Config;
use anyhow::{Context as _, Result};
use serenity::all::{
    ChannelId, Context, CreateAttachment, CreateMessage, EventHandler, GuildId, Member,
    Mentionable, Ready, RoleId,
};
use serenity::async_trait;
use std::collections::HashSet;
use welcomer_core::{RenderOptions, WelcomeContext, WelcomeRenderer, WelcomerError};

pub struct Welcomer {
    config: Config,
    renderer: WelcomeRenderer,
}

/// Guild data copied out of the gateway cache before any await point.
struct GuildSnapshot {
    name: String,
    system_channel: Option<ChannelId>,
    channel_ids: HashSet<ChannelId>,
    role_ids: HashSet<RoleId>,
}

impl Welcomer {
    pub fn new(config: Config) -> Result<Self> {
        let options = RenderOptions {
            frames_dir: config.frames_dir(),
            font_path: config.welcome_font(),
            ..RenderOptions::default()
        };
        let renderer =
            WelcomeRenderer::new(options).context("failed to construct the welcome renderer")?;
        Ok(Self { config, renderer })
    }

    async fn handle_member_join(&self, ctx: &Context, member: &Member) {
        let snapshot = match snapshot_guild(ctx, member.guild_id) {
            Some(snapshot) => snapshot,
            None => {
                log::error!(
                    "guild {} missing from the cache, skipping welcome for {}",
                    member.guild_id,
                    member.user.name
                );
                return;
            }
        };

        // Message and role are independent sub-steps: a failure in one
        // never blocks or rolls back the other.
        self.post_welcome(ctx, member, &snapshot).await;
        self.assign_role(ctx, member, &snapshot).await;
    }

    async fn post_welcome(&self, ctx: &Context, member: &Member, snapshot: &GuildSnapshot) {
        let welcome_ctx = WelcomeContext {
            member_name: member.user.name.clone(),
            guild_name: snapshot.name.clone(),
            avatar_url: member.face(),
        };

        let artifact = match self.renderer.render(&welcome_ctx).await {
            Ok(artifact) => artifact,
            Err(e) => {
                log::error!("no welcome card for {}: {}", member.user.name, e);
                return;
            }
        };

        let channel = match resolve_welcome_channel(
            snapshot.system_channel,
            self.config.fallback_channel_id,
            &snapshot.channel_ids,
        ) {
            Ok(channel) => channel,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let attachment = CreateAttachment::bytes(artifact.bytes, artifact.file_name);
        let message = CreateMessage::new()
            .content(format!("Welcome to the server, {}!", member.mention()))
            .add_file(attachment);

        if let Err(e) = channel.send_message(&ctx.http, message).await {
            log::error!("failed to post welcome message to {}: {}", channel, e);
        }
    }

    async fn assign_role(&self, ctx: &Context, member: &Member, snapshot: &GuildSnapshot) {
        let role = match resolve_role(self.config.role_id, &snapshot.role_ids) {
            Ok(Some(role)) => role,
            Ok(None) => return,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        if let Err(e) = member.add_role(&ctx.http, role).await {
            log::error!(
                "failed to assign role {} to {}: {}",
                role,
                member.user.name,
                e
            );
        }
    }
}

#[async_trait]
impl EventHandler for Welcomer {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("welcomer connected as {}", ready.user.name);
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        log::info!(
            "member {} joined guild {}",
            new_member.user.name,
            new_member.guild_id
        );
        self.handle_member_join(&ctx, &new_member).await;
    }
}

fn snapshot_guild(ctx: &Context, guild_id: GuildId) -> Option<GuildSnapshot> {
    ctx.cache.guild(guild_id).map(|guild| GuildSnapshot {
        name: guild.name.clone(),
        system_channel: guild.system_channel_id,
        channel_ids: guild.channels.keys().copied().collect(),
        role_ids: guild.roles.keys().copied().collect(),
    })
}

/// System channel first, then the configured fallback if the guild
/// actually has it.
fn resolve_welcome_channel(
    system_channel: Option<ChannelId>,
    fallback_channel_id: Option<u64>,
    known_channels: &HashSet<ChannelId>,
) -> Result<ChannelId, WelcomerError> {
    if let Some(channel) = system_channel {
        return Ok(channel);
    }
    if let Some(id) = fallback_channel_id {
        let channel = ChannelId::new(id);
        if known_channels.contains(&channel) {
            return Ok(channel);
        }
    }
    Err(WelcomerError::ChannelResolution)
}

fn resolve_role(
    role_id: Option<u64>,
    known_roles: &HashSet<RoleId>,
) -> Result<Option<RoleId>, WelcomerError> {
    match role_id {
        None => Ok(None),
        Some(id) => {
            let role = RoleId::new(id);
            if known_roles.contains(&role) {
                Ok(Some(role))
            } else {
                Err(WelcomerError::RoleResolution(id))
            }
        }
    }
}
