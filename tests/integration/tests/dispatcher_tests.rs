//! Event dispatch and operator commands end to end

use std::sync::Arc;

use integration_tests::*;
use rolebot_cache::{EventEnvelope, ReceivedMessage};
use rolebot_core::{PlatformEvent, ReactionAction};
use rolebot_engine::{MessageLocks, ReactionOutcome};
use rolebot_gateway::commands::{CommandHandler, CommandRegistry, IntakeOutcome};
use rolebot_gateway::{EventDispatcher, EventOutcome};
use serde_json::json;
use tokio::sync::broadcast;

fn dispatcher(env: &TestEnv) -> EventDispatcher {
    let commands = CommandHandler::new(Arc::new(CommandRegistry::with_defaults()), "!");
    EventDispatcher::new(env.ctx.clone())
        .with_commands(Arc::new(commands))
        .with_message_locks(MessageLocks::new())
}

fn received(event_type: &str, data: serde_json::Value) -> ReceivedMessage {
    let envelope = EventEnvelope::new(event_type, data);
    ReceivedMessage::new(
        "events:guild",
        Some("events:*".to_string()),
        serde_json::to_string(&envelope).unwrap(),
    )
}

const RRC: &str = "!rrc Pick a team -e 🔵,🟢 -r <@&3001>,<@&3002>";

#[tokio::test]
async fn test_rrc_from_owner_creates_tracked_message() {
    let env = TestEnv::new();
    let dispatcher = dispatcher(&env);

    let outcome = dispatcher
        .handle_event(PlatformEvent::MessageCreate(command_message(OWNER, RRC)))
        .await;

    assert_eq!(
        outcome,
        EventOutcome::Command(IntakeOutcome::Executed {
            handle: "rrc".to_string()
        })
    );
    let tracked = env.store.tracked_messages();
    assert_eq!(tracked.len(), 1);
    assert_eq!(
        env.platform.message_content(tracked[0].platform_message_id).as_deref(),
        Some("Pick a team\n- 🔵 => <@&3001>\n- 🟢 => <@&3002>")
    );
}

#[tokio::test]
async fn test_rrc_from_administrator_role() {
    let env = TestEnv::new();
    env.platform.add_member(GUILD, BOB, &[ADMIN_ROLE]);

    dispatcher(&env)
        .handle_event(PlatformEvent::MessageCreate(command_message(BOB, RRC)))
        .await;

    assert_eq!(env.store.tracked_messages().len(), 1);
}

#[tokio::test]
async fn test_rrc_refused_for_regular_member() {
    let env = TestEnv::new();

    let outcome = dispatcher(&env)
        .handle_event(PlatformEvent::MessageCreate(command_message(ALICE, RRC)))
        .await;

    assert_eq!(
        outcome,
        EventOutcome::Command(IntakeOutcome::Executed {
            handle: "rrc".to_string()
        })
    );
    assert!(env.store.tracked_messages().is_empty());
    assert_eq!(
        env.platform.sent_messages(),
        vec![(
            CHANNEL,
            "<@4001>, Error: ```You don't have permission to execute this command!```".to_string()
        )]
    );
}

#[tokio::test]
async fn test_rrc_count_mismatch_is_reported() {
    let env = TestEnv::new();

    dispatcher(&env)
        .handle_event(PlatformEvent::MessageCreate(command_message(
            OWNER,
            "!rrc Pick -e 🔵,🟢 -r <@&3001>",
        )))
        .await;

    assert!(env.store.tracked_messages().is_empty());
    let sent = env.platform.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .1
        .contains("Number of emojis: 2; Number of roles: 1; Number of descriptions: undefined"));
}

#[tokio::test]
async fn test_rrc_into_other_channel() {
    let env = TestEnv::new();
    let target = rolebot_core::Snowflake::new(2_500);
    env.platform.add_text_channel(target, GUILD);

    dispatcher(&env)
        .handle_event(PlatformEvent::MessageCreate(command_message(
            OWNER,
            "!rrc Pick -e 🔵 -r <@&3001> -c <#2500>",
        )))
        .await;

    let tracked = env.store.tracked_messages();
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].channel_id, target);
}

#[tokio::test]
async fn test_ping_and_unknown_command() {
    let env = TestEnv::new();
    let dispatcher = dispatcher(&env);

    let outcome = dispatcher
        .handle_event(PlatformEvent::MessageCreate(command_message(ALICE, "!PING")))
        .await;
    assert_eq!(
        outcome,
        EventOutcome::Command(IntakeOutcome::Executed {
            handle: "ping".to_string()
        })
    );
    let sent = env.platform.sent_messages();
    assert!(sent[0].1.starts_with("<@4001>, "));
    assert!(sent[0].1.ends_with(" ms pong!"));

    let outcome = dispatcher
        .handle_event(PlatformEvent::MessageCreate(command_message(ALICE, "!nope")))
        .await;
    assert_eq!(outcome, EventOutcome::Command(IntakeOutcome::UnknownCommand));

    let outcome = dispatcher
        .handle_event(PlatformEvent::MessageCreate(command_message(ALICE, "hello !ping")))
        .await;
    assert_eq!(outcome, EventOutcome::Command(IntakeOutcome::Ignored));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let env = TestEnv::new();

    dispatcher(&env)
        .handle_event(PlatformEvent::MessageCreate(command_message(ALICE, "!help")))
        .await;

    let sent = env.platform.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("ping"));
    assert!(sent[0].1.contains("rrc, react-role-create"));
}

#[tokio::test]
async fn test_dispatcher_routes_reactions_and_deletes() {
    let env = TestEnv::new();
    let message_id = env.create_blue_green().await.message.id;
    let dispatcher = dispatcher(&env);

    let outcome = dispatcher
        .handle_event(PlatformEvent::ReactionAdd(partial_reaction(
            ReactionAction::Add,
            message_id,
            ALICE,
            blue(),
        )))
        .await;
    assert_eq!(
        outcome,
        EventOutcome::Reaction(ReactionOutcome::Granted { role_id: ROLE_A })
    );

    let outcome = dispatcher
        .handle_event(PlatformEvent::MessageDelete(message_deleted(message_id)))
        .await;
    assert!(matches!(outcome, EventOutcome::MessageDelete(_)));
    assert!(env.store.tracked_messages().is_empty());

    assert_eq!(
        dispatcher.handle_event(PlatformEvent::Ready).await,
        EventOutcome::Ignored
    );
}

#[tokio::test]
async fn test_run_consumes_bus_until_closed() {
    let env = TestEnv::new();
    let message_id = env.create_blue_green().await.message.id;
    let dispatcher = dispatcher(&env);
    let (tx, rx) = broadcast::channel(16);

    tx.send(received(
        "MESSAGE_REACTION_ADD",
        json!({
            "user_id": ALICE.to_string(),
            "channel_id": CHANNEL.to_string(),
            "message_id": message_id.to_string(),
            "guild_id": GUILD.to_string(),
            "emoji": {"id": null, "name": "🔵"},
        }),
    ))
    .unwrap();
    tx.send(received("TYPING_START", json!({}))).unwrap();
    tx.send(ReceivedMessage::new("events:guild", None, "not json"))
        .unwrap();
    tx.send(received(
        "MESSAGE_REACTION_ADD",
        json!({
            "user_id": BOB.to_string(),
            "channel_id": CHANNEL.to_string(),
            "message_id": message_id.to_string(),
            "guild_id": GUILD.to_string(),
            "emoji": "🟢",
        }),
    ))
    .unwrap();
    drop(tx);

    dispatcher.run(rx, std::future::pending()).await;

    assert_eq!(env.platform.member_roles(GUILD, ALICE), vec![ROLE_A]);
    assert_eq!(env.platform.member_roles(GUILD, BOB), vec![ROLE_B]);
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let env = TestEnv::new();
    let (_tx, rx) = broadcast::channel::<ReceivedMessage>(4);

    let finished = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        dispatcher(&env).run(rx, async {}),
    )
    .await;
    assert!(finished.is_ok());
}
