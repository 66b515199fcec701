use resource_app::clients::{MessageClient, PostClient, UserClient};
use resource_app::config::AppConfig;
use resource_app::message_actor::MessageError;
use resource_app::model::{Post, PostId, User, UserId};
use resource_app::post_actor::PostError;
use resource_framework::mock::MockClient;
use resource_framework::{ActorClient, FrameworkError, Payload};

/// Real Post actor with a mocked User dependency.
///
/// The owner check in `Post::on_create` goes through the mock, so the post actor is tested
/// without a user actor behind it.
#[tokio::test]
async fn test_post_actor_with_mocked_users() {
    let mut user_mock = MockClient::<User>::new();
    user_mock
        .expect_find(UserId(1))
        .return_ok(Some(User::new(UserId(1), "Alice", "alice@example.com")));
    let user_client = UserClient::new(user_mock.client());

    let (post_actor, post_client): (_, PostClient) =
        resource_app::post_actor::new(&AppConfig::default());
    let actor_handle = tokio::spawn(post_actor.run(user_client.clone()));

    let result = post_client
        .create_post(
            UserId(1),
            Payload::new().with("title", "Hello").with("body", "World"),
        )
        .await;
    assert!(result.is_ok(), "Post creation failed: {:?}", result.err());
    let post = result.unwrap();

    let retrieved = post_client.find(post.id).await.unwrap().unwrap();
    assert_eq!(retrieved.user_id, UserId(1));
    assert_eq!(retrieved.title, "Hello");
    assert_eq!(retrieved.body, "World");

    user_mock.verify();

    drop(post_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_post_actor_rejects_unknown_owner_and_blank_title() {
    let mut user_mock = MockClient::<User>::new();
    user_mock.expect_find(UserId(7)).return_ok(None);
    let user_client = UserClient::new(user_mock.client());

    let (post_actor, post_client) = resource_app::post_actor::new(&AppConfig::default());
    let actor_handle = tokio::spawn(post_actor.run(user_client));

    // the title is checked before the owner, so this one never reaches the mock
    let blank = post_client
        .create_post(UserId(7), Payload::new().with("title", "   "))
        .await;
    assert!(matches!(blank, Err(PostError::ValidationError(_))));

    let orphan = post_client
        .create_post(UserId(7), Payload::new().with("title", "Orphan"))
        .await;
    assert_eq!(orphan.unwrap_err(), PostError::InvalidUser("7".into()));

    // failed creates leave nothing behind
    assert!(post_client.all().await.unwrap().is_empty());
    user_mock.verify();

    drop(post_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_post_client_maps_framework_errors() {
    let mut post_mock = MockClient::<Post>::new();
    post_mock
        .expect_find(PostId(3))
        .return_err(FrameworkError::NotFound("3".into()));
    let posts = PostClient::new(post_mock.client());

    let result = posts.find(PostId(3)).await;
    assert_eq!(result.unwrap_err(), PostError::NotFound("3".into()));
    post_mock.verify();
}

#[tokio::test]
async fn test_message_actor_with_user_lookup_failure() {
    let mut user_mock = MockClient::<User>::new();
    user_mock
        .expect_find(UserId(2))
        .return_err(FrameworkError::ActorClosed);
    let user_client = UserClient::new(user_mock.client());

    let (message_actor, messages): (_, MessageClient) =
        resource_app::message_actor::new(&AppConfig::default());
    let actor_handle = tokio::spawn(message_actor.run(user_client));

    assert_eq!(
        messages.send(UserId(2), "").await.unwrap_err(),
        MessageError::EmptyMessage
    );
    let err = messages.send(UserId(2), "hi").await.unwrap_err();
    assert!(matches!(err, MessageError::ActorCommunicationError(_)));
    user_mock.verify();

    drop(messages);
    actor_handle.await.unwrap();
}
