//! Dispatch events flowing through the router into commands and approvals

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{eventually, TestBot};
use picbot_core::entities::APPROVE_EMOJI;
use picbot_core::Snowflake;
use picbot_gateway::connection::DispatchEvent;
use picbot_gateway::handlers::{CommandHandler, EventRouter, Routed};
use serde_json::{json, Value};

const CHANNEL: i64 = 100;

fn router(bot: &TestBot) -> EventRouter {
    EventRouter::new(
        CommandHandler::new(Arc::clone(&bot.ctx), "!"),
        Arc::clone(bot.registry()),
    )
}

fn event(name: &str, data: Value) -> DispatchEvent {
    DispatchEvent {
        event: name.to_string(),
        data,
    }
}

fn message(author: i64, content: &str) -> DispatchEvent {
    event(
        "MESSAGE_CREATE",
        json!({
            "id": "555",
            "channel_id": CHANNEL.to_string(),
            "guild_id": "5",
            "author": {"id": author.to_string(), "username": "alice"},
            "content": content,
        }),
    )
}

fn reaction(message_id: Snowflake) -> DispatchEvent {
    event(
        "MESSAGE_REACTION_ADD",
        json!({
            "user_id": "1",
            "channel_id": "900001",
            "message_id": message_id.to_string(),
            "emoji": APPROVE_EMOJI,
        }),
    )
}

#[tokio::test]
async fn test_addpic_approved_through_reaction_event() {
    let bot = TestBot::new();
    bot.fetcher
        .serve("https://media.test/cat.png", b"\x89PNG cat pixels");
    let router = router(&bot);

    let routed = router
        .route(message(7, "!addpic cats <https://media.test/cat.png>"))
        .unwrap();
    assert_eq!(routed, Routed::Command);

    let request_id = bot.proposal_for("cats").await;
    bot.chat.react(request_id, APPROVE_EMOJI);
    assert_eq!(router.route(reaction(request_id)).unwrap(), Routed::Approval);

    let channel = Snowflake::new(CHANNEL);
    eventually(|| {
        bot.chat
            .messages_in(channel)
            .iter()
            .any(|m| m.contains("created `cats`"))
    })
    .await;
    assert!(bot.registry().is_empty());
    assert!(bot.store.object("pictures/cats/cat.png").is_some());
}

#[tokio::test]
async fn test_reaction_on_other_message() {
    let bot = TestBot::new();
    let routed = router(&bot).route(reaction(Snowflake::new(42))).unwrap();
    assert_eq!(routed, Routed::UnrelatedReaction);
}

#[tokio::test]
async fn test_unhandled_and_malformed_events() {
    let bot = TestBot::new();
    let router = router(&bot);

    assert_eq!(
        router.route(event("TYPING_START", json!({}))).unwrap(),
        Routed::Ignored
    );
    assert_eq!(
        router
            .route(event(
                "READY",
                json!({"user": {"id": "1", "username": "picbot", "bot": true}, "session_id": "s"})
            ))
            .unwrap(),
        Routed::Ignored
    );
    assert!(router
        .route(event("MESSAGE_CREATE", json!({"content": "!pics"})))
        .is_err());
}

#[tokio::test]
async fn test_pics_lists_visible_collections() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", b"cat", 7, None);
    bot.db.seed_collection("dogs", 7, &[6]);
    bot.seed_image("dogs", "dog.png", b"dog", 7, Some(6));

    router(&bot).route(message(9, "!pics")).unwrap();

    let channel = Snowflake::new(CHANNEL);
    eventually(|| !bot.chat.messages_in(channel).is_empty()).await;
    assert_eq!(bot.chat.messages_in(channel), ["`cats` (1)"]);
}

#[tokio::test]
async fn test_implicit_pic_is_silent_when_unknown() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", b"cat", 7, None);
    let router = router(&bot);
    let channel = Snowflake::new(CHANNEL);

    router.route(message(9, "!nosuchthing")).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(bot.chat.messages_in(channel).is_empty());

    router.route(message(9, "!pic nosuchthing")).unwrap();
    eventually(|| !bot.chat.messages_in(channel).is_empty()).await;
    assert!(bot.chat.messages_in(channel)[0].starts_with("<@9>"));

    router.route(message(9, "!cats")).unwrap();
    eventually(|| bot.chat.messages_in(channel).len() == 2).await;
    assert_eq!(
        bot.chat.messages_in(channel)[1],
        "https://cdn.test/pictures/cats/cat.png"
    );
}

#[tokio::test]
async fn test_bot_authors_are_ignored() {
    let bot = TestBot::new();
    let mut payload = message(9, "!pics").data;
    payload["author"]["bot"] = json!(true);

    router(&bot).route(event("MESSAGE_CREATE", payload)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(bot.chat.sent().is_empty());
}
