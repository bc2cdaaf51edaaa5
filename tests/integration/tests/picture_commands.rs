//! Picture commands: showing, listing, removing and aliasing collections

use integration_tests::{TestBot, MODERATOR_ID};
use picbot_core::entities::Invocation;
use picbot_core::{DomainError, Snowflake};
use picbot_service::{CreateAliasRequest, PictureService, RemovePictureRequest, ServiceError};

const OWNER: i64 = 7;
const STRANGER: i64 = 9;

fn alias_request(alias: &str, target: &str) -> CreateAliasRequest {
    CreateAliasRequest {
        alias: alias.to_string(),
        target: target.to_string(),
    }
}

#[tokio::test]
async fn test_unclaimed_image_is_claimed_where_shown() {
    let bot = TestBot::new();
    let image = bot.seed_image("cats", "cat.png", b"cat", OWNER, None);
    let pictures = PictureService::new(&bot.ctx);

    let picture = pictures
        .random_picture("Cats", &Invocation::in_server(STRANGER, 100, 5))
        .await
        .unwrap();
    assert_eq!(picture.url, "https://cdn.test/pictures/cats/cat.png");
    assert_eq!(picture.storage_key, "cat.png");

    let claimed = &bot.db.images("cats")[0];
    assert_eq!(claimed.id, image.id);
    assert_eq!(claimed.server_id, Some(Snowflake::new(5)));

    // now out of reach for other servers, but not for its submitter
    let err = pictures
        .random_picture("cats", &Invocation::in_server(STRANGER, 100, 6))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NoVisibleImages(_))
    ));
    assert!(pictures
        .random_picture("cats", &Invocation::in_server(OWNER, 100, 6))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_picture_in_dm_is_not_claimed() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", b"cat", OWNER, None);

    PictureService::new(&bot.ctx)
        .random_picture("cats", &Invocation::direct(STRANGER, 300))
        .await
        .unwrap();
    assert_eq!(bot.db.images("cats")[0].server_id, None);
}

#[tokio::test]
async fn test_server_collection_hidden_elsewhere() {
    let bot = TestBot::new();
    bot.db.seed_collection("dogs", OWNER, &[5]);
    bot.seed_image("dogs", "dog.png", b"dog", OWNER, Some(5));
    let pictures = PictureService::new(&bot.ctx);

    for outsider in [
        Invocation::in_server(STRANGER, 100, 6),
        Invocation::direct(STRANGER, 300),
    ] {
        let err = pictures.random_picture("dogs", &outsider).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::CollectionNotFound(_))
        ));
    }

    assert!(pictures
        .random_picture("dogs", &Invocation::direct(OWNER, 300))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unknown_collection() {
    let bot = TestBot::new();
    let err = PictureService::new(&bot.ctx)
        .random_picture("nothing", &Invocation::in_server(STRANGER, 100, 5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::CollectionNotFound(_))
    ));
}

#[tokio::test]
async fn test_listing_filters_by_visibility() {
    let bot = TestBot::new();
    bot.seed_image("cats", "a.png", b"a", OWNER, None);
    bot.seed_image("cats", "b.png", b"b", OWNER, None);
    bot.db.seed_collection("dogs", OWNER, &[5]);
    bot.seed_image("dogs", "dog.png", b"dog", OWNER, Some(5));
    let pictures = PictureService::new(&bot.ctx);

    let elsewhere = pictures
        .list_collections(&Invocation::in_server(STRANGER, 100, 6))
        .await
        .unwrap();
    assert_eq!(elsewhere.len(), 1);
    assert_eq!(elsewhere[0].name, "cats");
    assert_eq!(elsewhere[0].image_count, 2);

    let home = pictures
        .list_collections(&Invocation::in_server(STRANGER, 100, 5))
        .await
        .unwrap();
    let names: Vec<_> = home.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["cats", "dogs"]);
}

#[tokio::test]
async fn test_remove_picture_permissions_and_cleanup() {
    let bot = TestBot::new();
    bot.seed_image("cats", "a.png", b"a", OWNER, None);
    bot.seed_image("cats", "b.png", b"b", OWNER, None);
    let pictures = PictureService::new(&bot.ctx);

    let request = |key: &str| RemovePictureRequest {
        collection: "cats".to_string(),
        storage_key: key.to_string(),
    };

    let err = pictures
        .remove_picture(request("a.png"), &Invocation::in_server(STRANGER, 100, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotImageOwner)));

    pictures
        .remove_picture(request("a.png"), &Invocation::in_server(OWNER, 100, 5))
        .await
        .unwrap();
    assert!(bot.store.object("pictures/cats/a.png").is_none());
    assert!(bot.db.collection("cats").is_some());

    // the moderator may remove anything; the last image takes the collection along
    pictures
        .remove_picture(request("b.png"), &Invocation::direct(MODERATOR_ID, 300))
        .await
        .unwrap();
    assert!(bot.store.keys().is_empty());
    assert!(bot.db.collection("cats").is_none());

    let err = pictures
        .remove_picture(request("b.png"), &Invocation::direct(MODERATOR_ID, 300))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ImageNotFound { .. })
    ));
}

#[tokio::test]
async fn test_alias_lifecycle() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", b"cat", OWNER, None);
    let pictures = PictureService::new(&bot.ctx);
    let owner = Invocation::in_server(OWNER, 100, 5);

    pictures
        .add_alias(alias_request("kitties", "cats"), &owner)
        .await
        .unwrap();
    assert_eq!(bot.db.alias_target("kitties").unwrap().as_str(), "cats");
    assert_eq!(pictures.resolve("Kitties").await.unwrap().as_str(), "cats");

    let picture = pictures.random_picture("kitties", &owner).await.unwrap();
    assert_eq!(picture.collection, "cats");

    // an alias of an alias points at the collection itself
    pictures
        .add_alias(alias_request("felines", "kitties"), &owner)
        .await
        .unwrap();
    assert_eq!(bot.db.alias_target("felines").unwrap().as_str(), "cats");

    pictures
        .remove_alias("kitties", &Invocation::direct(MODERATOR_ID, 300))
        .await
        .unwrap();
    assert!(bot.db.alias_target("kitties").is_none());

    let err = pictures.remove_alias("kitties", &owner).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AliasNotFound(_))
    ));
}

#[tokio::test]
async fn test_alias_rules() {
    let bot = TestBot::new();
    bot.seed_image("cats", "cat.png", b"cat", OWNER, None);
    bot.seed_image("dogs", "dog.png", b"dog", OWNER, None);
    let pictures = PictureService::new(&bot.ctx);

    let err = pictures
        .add_alias(alias_request("kitties", "cats"), &Invocation::direct(STRANGER, 300))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));

    let err = pictures
        .add_alias(alias_request("dogs", "cats"), &Invocation::direct(OWNER, 300))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NameTaken(_))));

    let err = pictures
        .add_alias(alias_request("kitties", "birds"), &Invocation::direct(OWNER, 300))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::CollectionNotFound(_))
    ));
}
