use resource_app::config::AppConfig;
use resource_app::controller::{FlashKind, Redirect, Request, Session, UploadedFile, TASK_CREATE};
use resource_app::lifecycle::AppSystem;
use resource_app::model::{Role, User, STATUS_HIDDEN, STATUS_VISIBLE};
use resource_app::post_actor::PostError;
use resource_app::upload::ImageSize;
use resource_framework::{ActorClient, ModifyAction, Payload};

async fn register(system: &AppSystem, name: &str, role: Role) -> User {
    system
        .user_client
        .register(
            Payload::new()
                .with("name", name)
                .with("email", format!("{}@example.com", name.to_lowercase())),
            role,
        )
        .await
        .expect("Failed to register user")
}

fn modify_request(task: &str) -> Request {
    Request::new(Payload::new().with("task", task))
}

/// Full end-to-end test with all real actors.
#[tokio::test]
async fn test_full_post_lifecycle() {
    let system = AppSystem::new(&AppConfig::default());
    let alice = register(&system, "Alice", Role::Client).await;

    let retrieved = system
        .user_client
        .find(alice.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(retrieved.name, "Alice");
    assert_eq!(retrieved.role, Role::Client);

    let posts = system.post_controller();
    let mut session = Session::new();
    let request = Request::new(
        Payload::new()
            .with("task", TASK_CREATE)
            .with("title", "Hello")
            .with("body", "First post")
            .with("photo", "uploads/hello.png")
            .with("status", 0)
            .with("user_id", 999),
    );
    let post = posts
        .store(&alice, request, &mut session)
        .await
        .expect("Store failed")
        .resource
        .expect("Post not created");

    // owner comes from the session user, status from the defaults
    assert_eq!(post.user_id, alice.id);
    assert_eq!(post.status, STATUS_VISIBLE);
    assert_eq!(post.photo.as_deref(), Some("uploads/hello.png"));
    assert_eq!(
        session.take(FlashKind::Success),
        vec!["Post has been created.".to_string()]
    );

    let hidden = posts
        .modify(&alice, post.id, &modify_request("hide"), &mut session)
        .await
        .expect("Hide failed");
    assert_eq!(hidden.redirect, Redirect::Back);
    assert_eq!(hidden.resource.map(|p| p.status), Some(STATUS_HIDDEN));
    assert_eq!(
        session.take(FlashKind::Success),
        vec!["Post status has been changed.".to_string()]
    );

    let shown = posts
        .modify(&alice, post.id, &modify_request("show"), &mut session)
        .await
        .expect("Show failed")
        .resource
        .expect("Post missing");
    assert_eq!(shown.status, STATUS_VISIBLE);

    let destroyed = posts
        .modify(&alice, post.id, &modify_request("destroy"), &mut session)
        .await
        .expect("Destroy failed")
        .resource
        .expect("Post missing");
    assert_eq!(destroyed.photo, None);
    assert_eq!(destroyed.icon, None);
    assert_eq!(destroyed.title, "Hello");
    assert_eq!(destroyed.deleted, 0);

    let deleted = posts
        .modify(&alice, post.id, &modify_request("delete"), &mut session)
        .await
        .expect("Delete failed")
        .resource
        .expect("Post missing");
    assert_eq!(deleted.deleted, 1);
    assert_eq!(deleted.title, "Hello");
    assert_eq!(
        session.take(FlashKind::Success),
        vec!["Post has been deleted.".to_string()]
    );

    // the row is still there after a soft delete
    let stored = system
        .post_client
        .find(post.id)
        .await
        .expect("Find failed")
        .expect("Post gone");
    assert_eq!(stored.deleted, 1);

    drop(posts);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_stranger_is_redirected_to_dashboard() {
    let system = AppSystem::new(&AppConfig::default());
    let alice = register(&system, "Alice", Role::Client).await;
    let mallory = register(&system, "Mallory", Role::Editor).await;
    let admin = register(&system, "Root", Role::Administrator).await;

    let post = system
        .post_client
        .create_post(alice.id, Payload::new().with("title", "Mine"))
        .await
        .expect("Failed to create post");

    let posts = system.post_controller();
    let mut session = Session::new();
    let outcome = posts
        .modify(&mallory, post.id, &modify_request("delete"), &mut session)
        .await
        .expect("Modify failed");

    assert_eq!(outcome.redirect, Redirect::Route("editor-dashboard".into()));
    assert!(outcome.resource.is_none());
    assert_eq!(
        session.take(FlashKind::Error),
        vec!["You are not allowed to perform this action.".to_string()]
    );
    let untouched = system.post_client.find(post.id).await.unwrap().unwrap();
    assert_eq!(untouched.deleted, 0);

    // administrators may modify anybody's post
    let outcome = posts
        .modify(&admin, post.id, &modify_request("hide"), &mut session)
        .await
        .expect("Modify failed");
    assert_eq!(outcome.resource.map(|p| p.status), Some(STATUS_HIDDEN));

    drop(posts);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_update_through_controller() {
    let system = AppSystem::new(&AppConfig::default());
    let alice = register(&system, "Alice", Role::Client).await;
    let post = system
        .post_client
        .create_post(alice.id, Payload::new().with("title", "Draft"))
        .await
        .unwrap();

    let posts = system.post_controller();
    let mut session = Session::new();
    let request = Request::new(
        Payload::new()
            .with("task", "update")
            .with("id", post.id)
            .with("title", "Final")
            .with("deleted", 1),
    );
    let updated = posts
        .store(&alice, request, &mut session)
        .await
        .expect("Update failed")
        .resource
        .expect("Post missing");

    assert_eq!(updated.id, post.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.deleted, 0);
    assert_eq!(
        session.take(FlashKind::Success),
        vec!["Post has been updated.".to_string()]
    );

    drop(posts);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_post_requires_existing_owner() {
    let system = AppSystem::new(&AppConfig::default());

    let result = system
        .post_client
        .create_post(
            resource_app::model::UserId(42),
            Payload::new().with("title", "Orphan"),
        )
        .await;
    assert_eq!(result.unwrap_err(), PostError::InvalidUser("42".into()));

    let all = system.post_client.all().await.unwrap();
    assert!(all.is_empty());

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_modify_repeated_delete_and_unknown_task() {
    let system = AppSystem::new(&AppConfig::default());
    let alice = register(&system, "Alice", Role::Client).await;
    let post = system
        .post_client
        .create_post(alice.id, Payload::new().with("title", "Twice"))
        .await
        .unwrap();

    let first = system
        .post_client
        .modify(post.id, ModifyAction::Delete, None)
        .await
        .unwrap();
    let second = system
        .post_client
        .modify(post.id, ModifyAction::Delete, None)
        .await
        .unwrap();
    assert_eq!(first.deleted, 1);
    assert_eq!(second.deleted, 1);

    let posts = system.post_controller();
    let mut session = Session::new();
    let result = posts
        .modify(&alice, post.id, &modify_request("publish"), &mut session)
        .await;
    assert!(matches!(
        result,
        Err(resource_app::controller::ControllerError::Schema(
            resource_framework::SchemaError::UnknownAction(_)
        ))
    ));

    drop(posts);
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_concurrent_posts() {
    let system = AppSystem::new(&AppConfig::default());
    let alice = register(&system, "Alice", Role::Client).await;

    let mut handles = vec![];
    for i in 0..10 {
        let client = system.post_client.clone();
        let owner = alice.id;
        handles.push(tokio::spawn(async move {
            client
                .create_post(owner, Payload::new().with("title", format!("Post {i}")))
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let all = system.post_client.all().await.unwrap();
    assert_eq!(all.len(), 10);
    let mut ids: Vec<u32> = all.iter().map(|p| p.id.0).collect();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_uploaded_photo_is_resized_before_store() {
    let public = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(public.path().join("uploads")).unwrap();
    let config = AppConfig {
        public_root: public.path().to_path_buf(),
        ..AppConfig::default()
    };
    let system = AppSystem::new(&config);
    let alice = register(&system, "Alice", Role::Client).await;

    let source = public.path().join("upload.png");
    image::RgbImage::new(32, 32).save(&source).unwrap();
    let mut request = Request::new(
        Payload::new()
            .with("task", TASK_CREATE)
            .with("title", "With photo"),
    )
    .with_file("photo", UploadedFile::new(&source, "cat.png"));

    let sizes = ImageSize::Multi(vec![(16, 16), (8, 8)]);
    let name = system
        .image_maker()
        .make_image(&mut request, "photo", "uploads/", Some(&sizes), false, Some("cat"))
        .unwrap();
    assert_eq!(name, "cat-8-8.png");
    assert!(public.path().join("uploads/cat-16-16.png").exists());

    let posts = system.post_controller();
    let mut session = Session::new();
    let post = posts
        .store_with(&alice, request, &mut session, |mut payload| {
            let file = payload
                .get("photo")
                .and_then(|v| v.as_text())
                .map(|name| format!("uploads/{name}"));
            if let Some(file) = file {
                payload.insert("photo", file);
            }
            payload
        })
        .await
        .unwrap()
        .resource
        .expect("Post not created");

    assert_eq!(post.photo.as_deref(), Some("uploads/cat-8-8.png"));
    assert_eq!(post.user_id, alice.id);

    drop(posts);
    system.shutdown().await.unwrap();
}
