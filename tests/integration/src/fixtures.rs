//! Test doubles for the store and platform ports
//!
//! [`MemoryStore`] keeps tracked rows in memory with the same constraints as
//! the PostgreSQL schema. [`FakePlatform`] holds a scripted guild world,
//! records every mutation, and can be told to fail individual operations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rolebot_core::{
    Channel, CreateStage, CreateTrackedError, CustomEmoji, Emoji, Guild, Member, Message,
    MessageReaction, Permissions, Platform, PlatformError, PlatformResult, RepoResult, Role,
    SchemaRepository, Snowflake, StoreError, TrackedEmoji, TrackedMessage,
    TrackedMessageRepository, TrackedRole, User,
};
use tokio::sync::Notify;

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Debug, Default)]
struct StoreState {
    schema: bool,
    next_id: i32,
    messages: Vec<TrackedMessage>,
    emojis: Vec<TrackedEmoji>,
    roles: Vec<TrackedRole>,
    fail_create: bool,
    fail_emoji_at: Option<i32>,
    fail_role_at: Option<i32>,
    ensure_schema_calls: usize,
}

impl StoreState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn exists(&self, id: i32) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    fn emoji_at(&self, tracked_message_id: i32, position: i32) -> bool {
        self.emojis
            .iter()
            .any(|e| e.tracked_message_id == tracked_message_id && e.position == position)
    }

    fn role_at(&self, tracked_message_id: i32, position: i32) -> bool {
        self.roles
            .iter()
            .any(|r| r.tracked_message_id == tracked_message_id && r.position == position)
    }

    fn is_tracked(&self, platform_message_id: Snowflake) -> bool {
        self.messages
            .iter()
            .any(|m| m.platform_message_id == platform_message_id)
    }
}

/// Parks the store after each successful write until the test resumes it
#[derive(Debug, Default)]
pub struct WriteGate {
    written: Notify,
    resume: Notify,
}

impl WriteGate {
    /// Wait until the store has finished a write and is parked
    pub async fn written(&self) {
        self.written.notified().await;
    }

    /// Let the parked write return
    pub fn resume(&self) {
        self.resume.notify_one();
    }

    async fn park(&self) {
        self.written.notify_one();
        self.resume.notified().await;
    }
}

/// In-memory tracked-mapping store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    gate: Mutex<Option<Arc<WriteGate>>>,
}

impl MemoryStore {
    /// Store whose schema already exists
    pub fn new() -> Self {
        let store = Self::default();
        store.lock().schema = true;
        store
    }

    /// Store on first run, without a schema
    pub fn fresh() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn fail_create(&self) {
        self.lock().fail_create = true;
    }

    /// Fail the emoji insert at `position`
    pub fn fail_emoji_at(&self, position: i32) {
        self.lock().fail_emoji_at = Some(position);
    }

    /// Fail the role insert at `position`
    pub fn fail_role_at(&self, position: i32) {
        self.lock().fail_role_at = Some(position);
    }

    /// From now on, park after every create or insert until resumed
    pub fn gate_writes(&self) -> Arc<WriteGate> {
        let gate = Arc::new(WriteGate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Stop parking; writes already parked still need `resume`
    pub fn ungate_writes(&self) {
        *self.gate.lock().unwrap() = None;
    }

    async fn after_write(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.park().await;
        }
    }

    /// Seed rows with explicit positions, bypassing every check
    pub fn seed_positioned(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        platform_message_id: Snowflake,
        emojis: &[(i32, &str)],
        roles: &[(i32, &str)],
    ) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.messages.push(TrackedMessage {
            id,
            guild_id,
            channel_id,
            platform_message_id,
        });
        for &(position, emoji) in emojis {
            let row_id = state.next_id();
            state.emojis.push(TrackedEmoji {
                id: row_id,
                tracked_message_id: id,
                position,
                emoji: emoji.to_string(),
            });
        }
        for &(position, role) in roles {
            let row_id = state.next_id();
            state.roles.push(TrackedRole {
                id: row_id,
                tracked_message_id: id,
                position,
                role: role.to_string(),
            });
        }
        id
    }

    /// Insert rows directly at positions 0..n, bypassing the creation flow
    pub fn seed(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        platform_message_id: Snowflake,
        emojis: &[&str],
        roles: &[&str],
    ) -> i32 {
        let emojis: Vec<(i32, &str)> = (0i32..).zip(emojis.iter().copied()).collect();
        let roles: Vec<(i32, &str)> = (0i32..).zip(roles.iter().copied()).collect();
        self.seed_positioned(guild_id, channel_id, platform_message_id, &emojis, &roles)
    }

    pub fn tracked_messages(&self) -> Vec<TrackedMessage> {
        self.lock().messages.clone()
    }

    /// Total rows across the three tables
    pub fn row_count(&self) -> usize {
        let state = self.lock();
        state.messages.len() + state.emojis.len() + state.roles.len()
    }

    pub fn has_rows_for(&self, platform_message_id: Snowflake) -> bool {
        let state = self.lock();
        let ids: Vec<i32> = state
            .messages
            .iter()
            .filter(|m| m.platform_message_id == platform_message_id)
            .map(|m| m.id)
            .collect();
        !ids.is_empty()
            || state
                .emojis
                .iter()
                .any(|e| ids.contains(&e.tracked_message_id))
    }

    pub fn ensure_schema_calls(&self) -> usize {
        self.lock().ensure_schema_calls
    }

    /// Comparable view of every row
    pub fn snapshot(&self) -> (Vec<TrackedMessage>, Vec<TrackedEmoji>, Vec<TrackedRole>) {
        let state = self.lock();
        (state.messages.clone(), state.emojis.clone(), state.roles.clone())
    }
}

fn injected() -> StoreError {
    StoreError::Database("injected failure".to_string())
}

#[async_trait]
impl TrackedMessageRepository for MemoryStore {
    async fn create(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<i32> {
        let id = {
            let mut state = self.lock();
            if state.fail_create {
                return Err(injected());
            }
            if state.is_tracked(platform_message_id) {
                return Err(StoreError::AlreadyTracked(platform_message_id));
            }
            let id = state.next_id();
            state.messages.push(TrackedMessage {
                id,
                guild_id,
                channel_id,
                platform_message_id,
            });
            id
        };
        self.after_write().await;
        Ok(id)
    }

    async fn create_with_pairs(
        &self,
        platform_message_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
        pairs: &[(&str, &str)],
    ) -> Result<i32, CreateTrackedError> {
        let id = {
            let mut state = self.lock();
            if state.fail_create {
                return Err(CreateTrackedError::new(CreateStage::Message, injected()));
            }
            if state.is_tracked(platform_message_id) {
                return Err(CreateTrackedError::new(
                    CreateStage::Message,
                    StoreError::AlreadyTracked(platform_message_id),
                ));
            }
            for position in (0i32..).take(pairs.len()) {
                if state.fail_emoji_at == Some(position) {
                    return Err(CreateTrackedError::new(CreateStage::Emoji { position }, injected()));
                }
                if state.fail_role_at == Some(position) {
                    return Err(CreateTrackedError::new(CreateStage::Role { position }, injected()));
                }
            }

            let id = state.next_id();
            state.messages.push(TrackedMessage {
                id,
                guild_id,
                channel_id,
                platform_message_id,
            });
            for (position, &(emoji, role)) in (0i32..).zip(pairs) {
                let emoji_id = state.next_id();
                state.emojis.push(TrackedEmoji {
                    id: emoji_id,
                    tracked_message_id: id,
                    position,
                    emoji: emoji.to_string(),
                });
                let role_id = state.next_id();
                state.roles.push(TrackedRole {
                    id: role_id,
                    tracked_message_id: id,
                    position,
                    role: role.to_string(),
                });
            }
            id
        };
        self.after_write().await;
        Ok(id)
    }

    async fn add_emoji(&self, tracked_message_id: i32, position: i32, emoji: &str) -> RepoResult<i32> {
        let id = {
            let mut state = self.lock();
            if state.fail_emoji_at == Some(position) {
                return Err(injected());
            }
            if !state.exists(tracked_message_id) {
                return Err(StoreError::TrackedMessageNotFound(tracked_message_id));
            }
            if state.emoji_at(tracked_message_id, position) {
                return Err(StoreError::DuplicatePosition {
                    tracked_message_id,
                    position,
                });
            }
            let id = state.next_id();
            state.emojis.push(TrackedEmoji {
                id,
                tracked_message_id,
                position,
                emoji: emoji.to_string(),
            });
            id
        };
        self.after_write().await;
        Ok(id)
    }

    async fn add_role(&self, tracked_message_id: i32, position: i32, role: &str) -> RepoResult<i32> {
        let id = {
            let mut state = self.lock();
            if state.fail_role_at == Some(position) {
                return Err(injected());
            }
            if !state.exists(tracked_message_id) {
                return Err(StoreError::TrackedMessageNotFound(tracked_message_id));
            }
            if state.role_at(tracked_message_id, position) {
                return Err(StoreError::DuplicatePosition {
                    tracked_message_id,
                    position,
                });
            }
            let id = state.next_id();
            state.roles.push(TrackedRole {
                id,
                tracked_message_id,
                position,
                role: role.to_string(),
            });
            id
        };
        self.after_write().await;
        Ok(id)
    }

    async fn list_emojis(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedEmoji>> {
        let mut rows: Vec<_> = self
            .lock()
            .emojis
            .iter()
            .filter(|e| e.tracked_message_id == tracked_message_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.position, e.id));
        Ok(rows)
    }

    async fn list_roles(&self, tracked_message_id: i32) -> RepoResult<Vec<TrackedRole>> {
        let mut rows: Vec<_> = self
            .lock()
            .roles
            .iter()
            .filter(|r| r.tracked_message_id == tracked_message_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.position, r.id));
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> RepoResult<Option<TrackedMessage>> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_platform_ids(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        platform_message_id: Snowflake,
    ) -> RepoResult<Option<TrackedMessage>> {
        Ok(self
            .lock()
            .messages
            .iter()
            .find(|m| {
                m.guild_id == guild_id
                    && m.channel_id == channel_id
                    && m.platform_message_id == platform_message_id
            })
            .cloned())
    }

    async fn list_all(&self) -> RepoResult<Vec<TrackedMessage>> {
        Ok(self.lock().messages.clone())
    }

    async fn delete_emojis(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let mut state = self.lock();
        let before = state.emojis.len();
        state.emojis.retain(|e| e.tracked_message_id != tracked_message_id);
        Ok((before - state.emojis.len()) as u64)
    }

    async fn delete_roles(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let mut state = self.lock();
        let before = state.roles.len();
        state.roles.retain(|r| r.tracked_message_id != tracked_message_id);
        Ok((before - state.roles.len()) as u64)
    }

    async fn delete_message(&self, tracked_message_id: i32) -> RepoResult<u64> {
        let mut state = self.lock();
        let before = state.messages.len();
        state.messages.retain(|m| m.id != tracked_message_id);
        Ok((before - state.messages.len()) as u64)
    }
}

#[async_trait]
impl SchemaRepository for MemoryStore {
    async fn has_schema(&self) -> RepoResult<bool> {
        Ok(self.lock().schema)
    }

    async fn ensure_schema(&self) -> RepoResult<()> {
        let mut state = self.lock();
        state.messages.clear();
        state.emojis.clear();
        state.roles.clear();
        state.schema = true;
        state.ensure_schema_calls += 1;
        Ok(())
    }

    async fn drop_schema(&self) -> RepoResult<()> {
        let mut state = self.lock();
        state.messages.clear();
        state.emojis.clear();
        state.roles.clear();
        state.schema = false;
        Ok(())
    }
}

// ============================================================================
// FakePlatform
// ============================================================================

/// A recorded platform mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    SendMessage {
        channel_id: Snowflake,
        content: String,
    },
    DeleteMessage {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    RemoveReaction {
        message_id: Snowflake,
        emoji: Emoji,
    },
    RemoveUserReaction {
        message_id: Snowflake,
        emoji: Emoji,
        user_id: Snowflake,
    },
    GrantRole {
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    },
    RevokeRole {
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    },
}

#[derive(Debug, Clone)]
struct StoredMessage {
    channel_id: Snowflake,
    guild_id: Option<Snowflake>,
    content: String,
    /// Reaction buckets in the order they were first added
    reactions: Vec<(Emoji, Vec<Snowflake>)>,
}

#[derive(Debug, Default)]
struct PlatformState {
    guilds: HashMap<Snowflake, Guild>,
    channels: HashMap<Snowflake, Channel>,
    messages: HashMap<Snowflake, StoredMessage>,
    users: HashMap<Snowflake, User>,
    members: HashMap<(Snowflake, Snowflake), Member>,
    roles: HashMap<(Snowflake, Snowflake), Role>,
    emojis: HashMap<(Snowflake, Snowflake), CustomEmoji>,
    next_message_id: i64,
    calls: Vec<PlatformCall>,
    failing: HashSet<&'static str>,
}

/// Scripted platform
#[derive(Debug, Default)]
pub struct FakePlatform {
    state: Mutex<PlatformState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.lock().next_message_id = 900_000;
        platform
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap()
    }

    fn check(&self, op: &'static str) -> PlatformResult<()> {
        if self.lock().failing.contains(op) {
            return Err(PlatformError::Transport(format!("injected failure in {op}")));
        }
        Ok(())
    }

    // --- scripting ---

    /// Make every call of `op` (the port method name) fail
    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    pub fn add_guild(&self, guild_id: Snowflake, owner_id: Snowflake) {
        self.lock()
            .guilds
            .insert(guild_id, Guild::new(guild_id, format!("guild-{guild_id}"), owner_id));
    }

    pub fn remove_guild(&self, guild_id: Snowflake) {
        self.lock().guilds.remove(&guild_id);
    }

    pub fn add_channel(&self, channel: Channel) {
        self.lock().channels.insert(channel.id, channel);
    }

    pub fn add_text_channel(&self, channel_id: Snowflake, guild_id: Snowflake) {
        self.add_channel(Channel::new_text(channel_id, guild_id, format!("channel-{channel_id}")));
    }

    pub fn add_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    pub fn add_member(&self, guild_id: Snowflake, user_id: Snowflake, role_ids: &[Snowflake]) {
        let mut state = self.lock();
        state
            .users
            .entry(user_id)
            .or_insert_with(|| User::new(user_id, format!("user-{user_id}")));
        let mut member = Member::new(guild_id, user_id);
        member.role_ids = role_ids.to_vec();
        state.members.insert((guild_id, user_id), member);
    }

    /// The user leaves the guild but still exists
    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        let mut state = self.lock();
        state.members.remove(&(guild_id, user_id));
        state
            .users
            .entry(user_id)
            .or_insert_with(|| User::new(user_id, format!("user-{user_id}")));
    }

    pub fn add_role(&self, guild_id: Snowflake, role_id: Snowflake, permissions: Permissions) {
        self.lock().roles.insert(
            (guild_id, role_id),
            Role::new(role_id, guild_id, format!("role-{role_id}")).with_permissions(permissions),
        );
    }

    pub fn remove_role(&self, guild_id: Snowflake, role_id: Snowflake) {
        self.lock().roles.remove(&(guild_id, role_id));
    }

    pub fn add_custom_emoji(&self, guild_id: Snowflake, emoji_id: Snowflake, name: &str) {
        self.lock()
            .emojis
            .insert((guild_id, emoji_id), CustomEmoji::new(emoji_id, name));
    }

    pub fn remove_custom_emoji(&self, guild_id: Snowflake, emoji_id: Snowflake) {
        self.lock().emojis.remove(&(guild_id, emoji_id));
    }

    /// Put an existing message in a channel
    pub fn post_message(&self, channel_id: Snowflake, message_id: Snowflake, content: &str) {
        let mut state = self.lock();
        let guild_id = state.channels.get(&channel_id).and_then(Channel::guild_id);
        state.messages.insert(
            message_id,
            StoredMessage {
                channel_id,
                guild_id,
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
    }

    /// Message disappears without going through the bot
    pub fn vanish_message(&self, message_id: Snowflake) {
        self.lock().messages.remove(&message_id);
    }

    /// A user reacts; not recorded as a bot call
    pub fn react(&self, message_id: Snowflake, emoji: &Emoji, user_id: Snowflake) {
        let mut state = self.lock();
        state
            .users
            .entry(user_id)
            .or_insert_with(|| User::new(user_id, format!("user-{user_id}")));
        let Some(message) = state.messages.get_mut(&message_id) else {
            return;
        };
        match message.reactions.iter_mut().find(|(e, _)| e == emoji) {
            Some((_, users)) if users.contains(&user_id) => {}
            Some((_, users)) => users.push(user_id),
            None => message.reactions.push((emoji.clone(), vec![user_id])),
        }
    }

    // --- inspection ---

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Role grants and revokes only
    pub fn role_calls(&self) -> Vec<PlatformCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    PlatformCall::GrantRole { .. } | PlatformCall::RevokeRole { .. }
                )
            })
            .collect()
    }

    pub fn member_roles(&self, guild_id: Snowflake, user_id: Snowflake) -> Vec<Snowflake> {
        self.lock()
            .members
            .get(&(guild_id, user_id))
            .map(|m| m.role_ids.clone())
            .unwrap_or_default()
    }

    pub fn message_exists(&self, message_id: Snowflake) -> bool {
        self.lock().messages.contains_key(&message_id)
    }

    pub fn message_content(&self, message_id: Snowflake) -> Option<String> {
        self.lock().messages.get(&message_id).map(|m| m.content.clone())
    }

    /// Current reaction buckets of a message
    pub fn reactions(&self, message_id: Snowflake) -> Vec<(Emoji, Vec<Snowflake>)> {
        self.lock()
            .messages
            .get(&message_id)
            .map(|m| m.reactions.clone())
            .unwrap_or_default()
    }

    /// Messages the bot sent, in order
    pub fn sent_messages(&self) -> Vec<(Snowflake, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::SendMessage {
                    channel_id,
                    content,
                } => Some((channel_id, content)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn fetch_guild(&self, guild_id: Snowflake) -> PlatformResult<Option<Guild>> {
        self.check("fetch_guild")?;
        Ok(self.lock().guilds.get(&guild_id).cloned())
    }

    async fn fetch_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>> {
        self.check("fetch_channel")?;
        Ok(self.lock().channels.get(&channel_id).cloned())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<Message>> {
        self.check("fetch_message")?;
        let state = self.lock();
        let Some(stored) = state
            .messages
            .get(&message_id)
            .filter(|m| m.channel_id == channel_id)
        else {
            return Ok(None);
        };
        Ok(Some(Message {
            id: message_id,
            channel_id,
            guild_id: stored.guild_id,
            content: stored.content.clone(),
            reactions: stored
                .reactions
                .iter()
                .map(|(emoji, users)| MessageReaction {
                    emoji: emoji.clone(),
                    count: users.len() as u32,
                    me: false,
                })
                .collect(),
        }))
    }

    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Option<Member>> {
        self.check("fetch_member")?;
        Ok(self.lock().members.get(&(guild_id, user_id)).cloned())
    }

    async fn fetch_user(&self, user_id: Snowflake) -> PlatformResult<Option<User>> {
        self.check("fetch_user")?;
        Ok(self.lock().users.get(&user_id).cloned())
    }

    async fn fetch_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<Option<Role>> {
        self.check("fetch_role")?;
        let state = self.lock();
        // @everyone always exists while the guild does
        if role_id == guild_id && state.guilds.contains_key(&guild_id) {
            return Ok(Some(Role::new(role_id, guild_id, "@everyone")));
        }
        Ok(state.roles.get(&(guild_id, role_id)).cloned())
    }

    async fn fetch_emoji(
        &self,
        guild_id: Snowflake,
        emoji_id: Snowflake,
    ) -> PlatformResult<Option<CustomEmoji>> {
        self.check("fetch_emoji")?;
        Ok(self.lock().emojis.get(&(guild_id, emoji_id)).cloned())
    }

    async fn list_reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<Vec<User>> {
        self.check("list_reaction_users")?;
        let state = self.lock();
        let Some(stored) = state
            .messages
            .get(&message_id)
            .filter(|m| m.channel_id == channel_id)
        else {
            return Err(PlatformError::UnexpectedStatus {
                status: 404,
                body: "Unknown Message".to_string(),
            });
        };
        let users = stored
            .reactions
            .iter()
            .find(|(e, _)| e == emoji)
            .map(|(_, users)| users.clone())
            .unwrap_or_default();
        Ok(users
            .into_iter()
            .map(|id| {
                state
                    .users
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| User::new(id, format!("user-{id}")))
            })
            .collect())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Message> {
        self.check("send_message")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::SendMessage {
            channel_id,
            content: content.to_string(),
        });
        let Some(guild_id) = state.channels.get(&channel_id).map(Channel::guild_id) else {
            return Err(PlatformError::UnexpectedStatus {
                status: 404,
                body: "Unknown Channel".to_string(),
            });
        };

        state.next_message_id += 1;
        let id = Snowflake::new(state.next_message_id);
        state.messages.insert(
            id,
            StoredMessage {
                channel_id,
                guild_id,
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );

        let mut message = Message::new(id, channel_id, content);
        message.guild_id = guild_id;
        Ok(message)
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<()> {
        self.check("delete_message")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::DeleteMessage {
            channel_id,
            message_id,
        });
        state.messages.remove(&message_id);
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        self.check("remove_reaction")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::RemoveReaction {
            message_id,
            emoji: emoji.clone(),
        });
        if let Some(message) = state.messages.get_mut(&message_id) {
            message.reactions.retain(|(e, _)| e != emoji);
        }
        Ok(())
    }

    async fn remove_user_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
        user_id: Snowflake,
    ) -> PlatformResult<()> {
        self.check("remove_user_reaction")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::RemoveUserReaction {
            message_id,
            emoji: emoji.clone(),
            user_id,
        });
        if let Some(message) = state.messages.get_mut(&message_id) {
            for (e, users) in &mut message.reactions {
                if e == emoji {
                    users.retain(|u| *u != user_id);
                }
            }
            message.reactions.retain(|(_, users)| !users.is_empty());
        }
        Ok(())
    }

    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.check("grant_role")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::GrantRole {
            guild_id,
            user_id,
            role_id,
        });
        let Some(member) = state.members.get_mut(&(guild_id, user_id)) else {
            return Err(PlatformError::UnexpectedStatus {
                status: 404,
                body: "Unknown Member".to_string(),
            });
        };
        if !member.role_ids.contains(&role_id) {
            member.role_ids.push(role_id);
        }
        Ok(())
    }

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.check("revoke_role")?;
        let mut state = self.lock();
        state.calls.push(PlatformCall::RevokeRole {
            guild_id,
            user_id,
            role_id,
        });
        if let Some(member) = state.members.get_mut(&(guild_id, user_id)) {
            member.role_ids.retain(|r| *r != role_id);
        }
        Ok(())
    }
}
