//! REST platform client
//!
//! Implements the [`Platform`] port over a Discord-v10-shaped HTTP API.
//! A 404 on a lookup is `Ok(None)`; a 404 on a delete counts as done.
//! A 429 is waited out and retried a bounded number of times.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use rolebot_common::PlatformConfig;
use rolebot_core::{
    Channel, CustomEmoji, Emoji, Guild, Member, Message, Platform, PlatformError, PlatformResult,
    Role, Snowflake, User,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::wire::{
    ChannelResponse, CreateMessageRequest, EmojiResponse, GuildResponse, MemberResponse,
    MessageResponse, RateLimitResponse, RoleResponse, UserResponse,
};

/// Page size of reaction-user listings
const REACTION_PAGE_LIMIT: usize = 100;

const USER_AGENT_VALUE: &str = concat!("rolebot (", env!("CARGO_PKG_VERSION"), ")");

#[derive(Debug, Clone)]
pub struct RestPlatformConfig {
    pub api_url: String,
    pub bot_token: String,
    pub timeout: Duration,
    pub rate_limit_retries: u32,
}

impl From<&PlatformConfig> for RestPlatformConfig {
    fn from(config: &PlatformConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            bot_token: config.bot_token.clone(),
            timeout: config.timeout(),
            rate_limit_retries: config.rate_limit_retries,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestPlatform {
    client: Client,
    base: Url,
    rate_limit_retries: u32,
}

impl RestPlatform {
    pub fn new(config: &RestPlatformConfig) -> PlatformResult<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| PlatformError::Transport(format!("invalid api url '{}': {e}", config.api_url)))?;
        if base.cannot_be_a_base() {
            return Err(PlatformError::Transport(format!(
                "invalid api url '{}'",
                config.api_url
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.bot_token.trim()))
            .map_err(|_| PlatformError::Unauthorized("bot token is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base,
            rate_limit_retries: config.rate_limit_retries,
        })
    }

    /// Endpoint URL; each segment is percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.url(segments))
    }

    /// Send, sleeping through rate limits until the retry budget is spent
    ///
    /// Never returns a 429 response; an exhausted budget is `RateLimited`.
    async fn send(&self, mut builder: RequestBuilder) -> PlatformResult<Response> {
        let mut retries = 0;
        loop {
            let retry = builder.try_clone();
            let response = builder
                .send()
                .await
                .map_err(|e| PlatformError::Transport(e.to_string()))?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let retry_after_ms = rate_limit_delay(response).await;
            match retry {
                Some(next) if retries < self.rate_limit_retries => {
                    retries += 1;
                    warn!(retry_after_ms, retries, "Rate limited, retrying");
                    tokio::time::sleep(Duration::from_millis(retry_after_ms)).await;
                    builder = next;
                }
                _ => return Err(PlatformError::RateLimited { retry_after_ms }),
            }
        }
    }

    /// GET a resource, `None` on 404
    async fn get_optional<T: DeserializeOwned>(&self, segments: &[&str]) -> PlatformResult<Option<T>> {
        let response = self.send(self.request(Method::GET, segments)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check(response).await?;
        decode(response).await.map(Some)
    }

    /// Request without a response body; 404 counts as success when `missing_ok`
    async fn execute(&self, builder: RequestBuilder, missing_ok: bool) -> PlatformResult<()> {
        let response = self.send(builder).await?;
        if missing_ok && response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response).await.map(|_| ())
    }
}

/// Map non-2xx responses to errors
async fn check(response: Response) -> PlatformResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::Unauthorized(format!("{status}: {body}")))
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Wait a 429 asks for; the body value wins over the header
async fn rate_limit_delay(response: Response) -> u64 {
    let header_ms = retry_after_header(response.headers());
    let body_ms = response
        .json::<RateLimitResponse>()
        .await
        .ok()
        .map(|body| seconds_to_ms(body.retry_after));
    body_ms.or(header_ms).unwrap_or_default()
}

async fn decode<T: DeserializeOwned>(response: Response) -> PlatformResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| PlatformError::Decode(e.to_string()))
}

fn retry_after_header(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<f64>().ok().map(seconds_to_ms)
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).ceil() as u64
}

#[async_trait]
impl Platform for RestPlatform {
    #[instrument(skip(self))]
    async fn fetch_guild(&self, guild_id: Snowflake) -> PlatformResult<Option<Guild>> {
        let guild: Option<GuildResponse> = self.get_optional(&["guilds", &guild_id.to_string()]).await?;
        Ok(guild.map(Guild::from))
    }

    #[instrument(skip(self))]
    async fn fetch_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>> {
        let channel: Option<ChannelResponse> =
            self.get_optional(&["channels", &channel_id.to_string()]).await?;
        Ok(channel.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<Message>> {
        let message: Option<MessageResponse> = self
            .get_optional(&[
                "channels",
                &channel_id.to_string(),
                "messages",
                &message_id.to_string(),
            ])
            .await?;
        Ok(message.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Option<Member>> {
        let member: Option<MemberResponse> = self
            .get_optional(&["guilds", &guild_id.to_string(), "members", &user_id.to_string()])
            .await?;
        Ok(member.map(|m| m.into_member(guild_id)))
    }

    #[instrument(skip(self))]
    async fn fetch_user(&self, user_id: Snowflake) -> PlatformResult<Option<User>> {
        let user: Option<UserResponse> = self.get_optional(&["users", &user_id.to_string()]).await?;
        Ok(user.map(User::from))
    }

    #[instrument(skip(self))]
    async fn fetch_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<Option<Role>> {
        let role: Option<RoleResponse> = self
            .get_optional(&["guilds", &guild_id.to_string(), "roles", &role_id.to_string()])
            .await?;
        Ok(role.map(|r| r.into_role(guild_id)))
    }

    #[instrument(skip(self))]
    async fn fetch_emoji(
        &self,
        guild_id: Snowflake,
        emoji_id: Snowflake,
    ) -> PlatformResult<Option<CustomEmoji>> {
        let emoji: Option<EmojiResponse> = self
            .get_optional(&["guilds", &guild_id.to_string(), "emojis", &emoji_id.to_string()])
            .await?;
        Ok(emoji.and_then(EmojiResponse::into_custom))
    }

    #[instrument(skip(self, emoji), fields(emoji = %emoji))]
    async fn list_reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<Vec<User>> {
        let channel = channel_id.to_string();
        let message = message_id.to_string();
        let identifier = emoji.reaction_identifier();
        let segments: [&str; 6] = ["channels", &channel, "messages", &message, "reactions", &identifier];

        let mut users = Vec::new();
        let mut after: Option<Snowflake> = None;
        loop {
            let mut builder = self
                .request(Method::GET, &segments)
                .query(&[("limit", REACTION_PAGE_LIMIT.to_string())]);
            if let Some(after) = after {
                builder = builder.query(&[("after", after.to_string())]);
            }

            let response = check(self.send(builder).await?).await?;
            let page: Vec<UserResponse> = decode(response).await?;
            let full_page = page.len() == REACTION_PAGE_LIMIT;
            after = page.last().map(|user| user.id);
            users.extend(page.into_iter().map(User::from));

            if !full_page || after.is_none() {
                break;
            }
        }

        debug!(count = users.len(), "Listed reaction users");
        Ok(users)
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Message> {
        let builder = self
            .request(Method::POST, &["channels", &channel_id.to_string(), "messages"])
            .json(&CreateMessageRequest { content });
        let response = check(self.send(builder).await?).await?;
        let message: MessageResponse = decode(response).await?;
        Ok(message.into())
    }

    #[instrument(skip(self))]
    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<()> {
        let builder = self.request(
            Method::DELETE,
            &["channels", &channel_id.to_string(), "messages", &message_id.to_string()],
        );
        self.execute(builder, true).await
    }

    #[instrument(skip(self, emoji), fields(emoji = %emoji))]
    async fn remove_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        let builder = self.request(
            Method::DELETE,
            &[
                "channels",
                &channel_id.to_string(),
                "messages",
                &message_id.to_string(),
                "reactions",
                &emoji.reaction_identifier(),
            ],
        );
        self.execute(builder, true).await
    }

    #[instrument(skip(self, emoji), fields(emoji = %emoji))]
    async fn remove_user_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
        user_id: Snowflake,
    ) -> PlatformResult<()> {
        let builder = self.request(
            Method::DELETE,
            &[
                "channels",
                &channel_id.to_string(),
                "messages",
                &message_id.to_string(),
                "reactions",
                &emoji.reaction_identifier(),
                &user_id.to_string(),
            ],
        );
        self.execute(builder, true).await
    }

    #[instrument(skip(self))]
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let builder = self.request(
            Method::PUT,
            &[
                "guilds",
                &guild_id.to_string(),
                "members",
                &user_id.to_string(),
                "roles",
                &role_id.to_string(),
            ],
        );
        self.execute(builder, false).await
    }

    #[instrument(skip(self))]
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let builder = self.request(
            Method::DELETE,
            &[
                "guilds",
                &guild_id.to_string(),
                "members",
                &user_id.to_string(),
                "roles",
                &role_id.to_string(),
            ],
        );
        self.execute(builder, false).await
    }
}
