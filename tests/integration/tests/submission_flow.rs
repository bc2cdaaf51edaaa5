//! End-to-end tests of the `addpic` flow: intake, duplicate check,
//! moderator approval and commit

use integration_tests::{eventually, finish, TestBot};
use picbot_core::entities::{Invocation, SubmissionSource, APPROVE_EMOJI, REJECT_EMOJI};
use picbot_core::Snowflake;
use picbot_service::{SubmissionOutcome, SubmissionRequest};

const CAT: &[u8] = b"\x89PNG cat pixels";
const OTHER_CAT: &[u8] = b"\x89PNG another cat";
const DOG: &[u8] = b"\x89PNG dog pixels";

fn submitter() -> Invocation {
    Invocation::in_server(7, 100, 5)
}

#[tokio::test]
async fn test_approved_submission_creates_collection() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    let proposal = bot.chat.proposals().remove(0);
    assert_eq!(proposal.channel_id, bot.moderator_dm());
    assert!(proposal.content.contains("<@7>"));

    bot.decide(request_id, APPROVE_EMOJI);

    let SubmissionOutcome::Added(image) = finish(handle).await else {
        panic!("expected the picture to be added");
    };
    assert_eq!(image.storage_key, "cat.png");
    assert!(image.created_collection);
    assert_eq!(image.url, "https://cdn.test/pictures/cats/cat.png");

    let stored = bot.store.object("pictures/cats/cat.png").unwrap();
    assert_eq!(stored.bytes, CAT);
    assert_eq!(stored.content_type, "image/png");
    assert!(stored.public_read);

    let collection = bot.db.collection("cats").unwrap();
    assert_eq!(collection.owner_id, Some(Snowflake::new(7)));
    assert_eq!(bot.db.servers("cats"), vec![Snowflake::new(5)]);
    assert_eq!(bot.db.images("cats")[0].server_id, Some(Snowflake::new(5)));

    assert!(bot.registry().is_empty());
    let replies = bot.chat.messages_in(Snowflake::new(100));
    assert!(replies[0].contains("waiting for approval"));
    assert!(replies.last().unwrap().contains("created `cats`"));

    // scratch directory is gone once the flow ends
    assert!(!proposal.file.unwrap().exists());
}

#[tokio::test]
async fn test_same_file_name_gets_numbered_key() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", CAT, 7, Some(5));
    bot.db.seed_collection("cats", 7, &[5]);

    let handle = bot.submit_url("cats", "https://media.test/cat.png", OTHER_CAT, submitter());
    let request_id = bot.proposal_for("cats").await;
    bot.decide(request_id, APPROVE_EMOJI);

    let SubmissionOutcome::Added(image) = finish(handle).await else {
        panic!("expected the picture to be added");
    };
    assert_eq!(image.storage_key, "cat0.png");
    assert!(!image.created_collection);
    assert!(bot.store.object("pictures/cats/cat0.png").is_some());
    assert_eq!(bot.db.images("cats").len(), 2);
}

#[tokio::test]
async fn test_duplicate_rejected_before_approval() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", CAT, 7, None);

    let handle = bot.submit_url("cats", "https://media.test/again.png", CAT, submitter());

    assert_eq!(
        finish(handle).await,
        SubmissionOutcome::Duplicate {
            collection: "cats".to_string()
        }
    );
    assert!(bot.chat.proposals().is_empty());
    assert!(bot.chat.messages_in(bot.moderator_dm()).is_empty());
    assert!(bot.registry().is_empty());
    assert!(bot.chat.messages_in(Snowflake::new(100))[0].contains("already in `cats`"));
}

#[tokio::test]
async fn test_same_content_in_another_collection_is_allowed() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", CAT, 7, None);

    let handle = bot.submit_url("felines", "https://media.test/cat.png", CAT, submitter());
    let request_id = bot.proposal_for("felines").await;
    bot.decide(request_id, APPROVE_EMOJI);

    assert!(finish(handle).await.is_added());
}

#[tokio::test]
async fn test_duplicate_approved_twice_is_committed_once() {
    let bot = TestBot::new();
    let first = bot.submit_url("cats", "https://media.test/a.png", CAT, submitter());
    let second = bot.submit_url(
        "cats",
        "https://media.test/b.png",
        CAT,
        Invocation::in_server(8, 100, 5),
    );

    eventually(|| bot.registry().len() == 2).await;
    let pending = bot.registry().pending();
    // wait for both reaction seeds
    eventually(|| {
        pending
            .iter()
            .all(|id| bot.chat.reactions_on(*id).len() == 2)
    })
    .await;

    for id in &pending {
        bot.decide(*id, APPROVE_EMOJI);
    }

    let outcomes = [finish(first).await, finish(second).await];
    assert_eq!(outcomes.iter().filter(|o| o.is_added()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, SubmissionOutcome::Duplicate { .. })));
    assert_eq!(bot.db.images("cats").len(), 1);
    assert_eq!(bot.store.keys().len(), 1);
}

#[tokio::test]
async fn test_duplicate_racing_an_upload_keeps_the_first_object() {
    let bot = TestBot::new();
    let first = bot.submit_url("cats", "https://a.test/cat.png", CAT, submitter());
    let second = bot.submit_url(
        "cats",
        "https://b.test/cat.png",
        CAT,
        Invocation::in_server(8, 100, 5),
    );
    let first_id = bot.proposal_from("cats", 7).await;
    let second_id = bot.proposal_from("cats", 8).await;

    bot.store.pause_uploads();
    bot.decide(first_id, APPROVE_EMOJI);
    eventually(|| bot.store.parked_uploads() == 1).await;

    // the first commit holds `cat.png` while its upload is in flight
    bot.decide(second_id, APPROVE_EMOJI);
    assert_eq!(
        finish(second).await,
        SubmissionOutcome::Duplicate {
            collection: "cats".to_string()
        }
    );

    bot.store.resume_uploads();
    let SubmissionOutcome::Added(image) = finish(first).await else {
        panic!("expected the first picture to be added");
    };
    assert_eq!(image.storage_key, "cat.png");
    assert_eq!(bot.db.images("cats").len(), 1);
    assert_eq!(bot.store.object("pictures/cats/cat.png").unwrap().bytes, CAT);
}

#[tokio::test]
async fn test_concurrent_commits_of_one_file_name_get_distinct_keys() {
    let bot = TestBot::new();
    let first = bot.submit_url("cats", "https://a.test/cat.png", CAT, submitter());
    let second = bot.submit_url(
        "cats",
        "https://b.test/cat.png",
        OTHER_CAT,
        Invocation::in_server(8, 100, 5),
    );
    let first_id = bot.proposal_from("cats", 7).await;
    let second_id = bot.proposal_from("cats", 8).await;

    bot.store.pause_uploads();
    bot.decide(first_id, APPROVE_EMOJI);
    eventually(|| bot.store.parked_uploads() == 1).await;
    bot.decide(second_id, APPROVE_EMOJI);
    eventually(|| bot.store.parked_uploads() == 2).await;
    bot.store.resume_uploads();

    let keys: Vec<_> = [finish(first).await, finish(second).await]
        .into_iter()
        .map(|outcome| match outcome {
            SubmissionOutcome::Added(image) => image.storage_key,
            other => panic!("expected the picture to be added, got {other:?}"),
        })
        .collect();
    assert_eq!(keys, ["cat.png", "cat0.png"]);

    assert_eq!(bot.db.images("cats").len(), 2);
    assert_eq!(bot.store.object("pictures/cats/cat.png").unwrap().bytes, CAT);
    assert_eq!(
        bot.store.object("pictures/cats/cat0.png").unwrap().bytes,
        OTHER_CAT
    );
}

#[tokio::test]
async fn test_rejection_leaves_nothing_behind() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    bot.decide(request_id, REJECT_EMOJI);

    assert_eq!(
        finish(handle).await,
        SubmissionOutcome::Rejected {
            collection: "cats".to_string()
        }
    );
    assert!(bot.store.keys().is_empty());
    assert!(bot.db.collection("cats").is_none());
    assert!(bot.registry().is_empty());
    assert!(bot
        .chat
        .messages_in(Snowflake::new(100))
        .last()
        .unwrap()
        .contains("was rejected"));
}

#[tokio::test]
async fn test_interleaved_requests_resolve_from_their_own_message() {
    let bot = TestBot::new();
    let cats = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());
    let dogs = bot.submit_url(
        "dogs",
        "https://media.test/dog.png",
        DOG,
        Invocation::direct(8, 200),
    );

    let cats_request = bot.proposal_for("cats").await;
    let dogs_request = bot.proposal_for("dogs").await;

    // deciding the later request first must not touch the earlier one
    bot.decide(dogs_request, APPROVE_EMOJI);
    let dogs_outcome = finish(dogs).await;
    assert!(dogs_outcome.is_added());
    assert!(!cats.is_finished());
    assert!(bot.registry().contains(cats_request));

    bot.decide(cats_request, REJECT_EMOJI);
    assert!(matches!(
        finish(cats).await,
        SubmissionOutcome::Rejected { .. }
    ));

    // submitted from a DM: no server association, the image stays unclaimed
    assert!(bot.db.servers("dogs").is_empty());
    assert_eq!(bot.db.images("dogs")[0].server_id, None);
    assert!(bot.db.collection("cats").is_none());
}

#[tokio::test]
async fn test_seeded_reactions_alone_do_not_decide() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    // an event with only the bot's own reactions present
    bot.registry().notify(request_id);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    // a third party piling on does not count either
    bot.chat.react(request_id, APPROVE_EMOJI);
    bot.decide(request_id, APPROVE_EMOJI);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    bot.chat.unreact(request_id, APPROVE_EMOJI);
    bot.registry().notify(request_id);
    assert!(finish(handle).await.is_added());
}

#[tokio::test]
async fn test_double_reaction_is_reported_until_resolved() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    bot.chat.react(request_id, APPROVE_EMOJI);
    bot.chat.react(request_id, REJECT_EMOJI);
    bot.registry().notify(request_id);

    let dm = bot.moderator_dm();
    eventually(|| {
        bot.chat
            .messages_in(dm)
            .iter()
            .any(|m| m.contains("both approve and reject"))
    })
    .await;

    // further events while still ambiguous do not repeat the notice
    bot.registry().notify(request_id);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!handle.is_finished());
    let notices = bot
        .chat
        .messages_in(dm)
        .iter()
        .filter(|m| m.contains("both approve and reject"))
        .count();
    assert_eq!(notices, 1);

    bot.chat.unreact(request_id, REJECT_EMOJI);
    bot.registry().notify(request_id);
    assert!(finish(handle).await.is_added());
}

#[tokio::test]
async fn test_transient_read_failures_are_retried() {
    let bot = TestBot::new();
    bot.chat.fail_reads(3);
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    eventually(|| bot.chat.remaining_failures() == 0).await;
    bot.decide(request_id, APPROVE_EMOJI);

    assert!(finish(handle).await.is_added());
}

#[tokio::test]
async fn test_cancelled_submission_releases_registry_and_scratch() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    let file = bot.chat.proposals()[0].file.clone().unwrap();
    assert!(file.exists());

    handle.abort();
    let _ = handle.await;

    assert!(!bot.registry().contains(request_id));
    assert!(bot.registry().is_empty());
    assert!(!file.exists());
    assert!(bot.store.keys().is_empty());
}

#[tokio::test]
async fn test_cancel_racing_a_decision() {
    let bot = TestBot::new();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    bot.decide(request_id, APPROVE_EMOJI);
    handle.abort();
    let _ = handle.await;

    assert!(bot.registry().is_empty());
    // a late reaction event finds nobody waiting
    assert!(!bot.registry().notify(request_id));
}

#[tokio::test]
async fn test_missing_media_is_a_user_error() {
    let bot = TestBot::new();
    let outcome = bot
        .adder()
        .submit(SubmissionRequest::new(
            "cats",
            submitter(),
            SubmissionSource::Attachments(vec![]),
        ))
        .await;

    assert!(matches!(outcome, SubmissionOutcome::UserError { .. }));
    assert!(bot.chat.proposals().is_empty());
    assert_eq!(bot.chat.messages_in(Snowflake::new(100)).len(), 1);
    // user errors stay between the bot and the submitter
    assert!(bot.chat.messages_in(bot.moderator_dm()).is_empty());
}

#[tokio::test]
async fn test_invalid_collection_name_is_a_user_error() {
    let bot = TestBot::new();
    let handle = bot.submit_url("no/slashes", "https://media.test/cat.png", CAT, submitter());

    assert!(matches!(
        finish(handle).await,
        SubmissionOutcome::UserError { .. }
    ));
    assert!(bot.chat.proposals().is_empty());
}

#[tokio::test]
async fn test_failed_insert_uploads_nothing_and_tells_moderator() {
    let bot = TestBot::new();
    bot.db.fail_image_inserts();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    bot.decide(request_id, APPROVE_EMOJI);

    assert!(matches!(
        finish(handle).await,
        SubmissionOutcome::Failed { .. }
    ));
    assert!(bot.store.keys().is_empty());
    assert!(bot
        .chat
        .messages_in(bot.moderator_dm())
        .iter()
        .any(|m| m.contains("something went wrong")));
}

#[tokio::test]
async fn test_failed_upload_releases_the_claimed_row() {
    let bot = TestBot::new();
    bot.store.fail_uploads();
    let handle = bot.submit_url("cats", "https://media.test/cat.png", CAT, submitter());

    let request_id = bot.proposal_for("cats").await;
    bot.decide(request_id, APPROVE_EMOJI);

    assert!(matches!(
        finish(handle).await,
        SubmissionOutcome::Failed { .. }
    ));
    assert!(bot.db.images("cats").is_empty());
    // the collection was created for this picture alone
    assert!(bot.db.collection("cats").is_none());
}

#[tokio::test]
async fn test_global_collection_stays_global() {
    let bot = TestBot::new();
    bot.db.seed_collection("memes", 3, &[]);

    let handle = bot.submit_url("memes", "https://media.test/meme.png", CAT, submitter());
    let request_id = bot.proposal_for("memes").await;
    bot.decide(request_id, APPROVE_EMOJI);

    let SubmissionOutcome::Added(image) = finish(handle).await else {
        panic!("expected the picture to be added");
    };
    assert!(!image.created_collection);
    assert!(bot.db.servers("memes").is_empty());
    assert_eq!(bot.db.collection("memes").unwrap().owner_id, Some(Snowflake::new(3)));
}
