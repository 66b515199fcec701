//! Starts the resource app: seeds two users and a sample post, then serves HTTP until Ctrl-C.
//!
//! ```bash
//! RUST_LOG=info cargo run -p resource-app
//! curl -H 'x-user-id: 2' localhost:3000/messages
//! ```

use resource_app::config::AppConfig;
use resource_app::controller::{Request, Session, TASK_CREATE};
use resource_app::http::{self, AppState};
use resource_app::lifecycle::{setup_tracing, AppSystem};
use resource_app::model::Role;
use resource_framework::{ActorClient, ModifyAction, Payload};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(addr = %config.http_addr, "Starting resource app");

    let system = AppSystem::new(&config);

    let span = tracing::info_span!("seeding");
    let (admin, alice) = async {
        let admin = system
            .user_client
            .register(
                Payload::new()
                    .with("name", "Admin")
                    .with("email", "admin@example.com"),
                Role::Administrator,
            )
            .await
            .map_err(|e| e.to_string())?;
        let alice = system
            .user_client
            .register(
                Payload::new()
                    .with("name", "Alice")
                    .with("email", "alice@example.com"),
                Role::Client,
            )
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((admin, alice))
    }
    .instrument(span)
    .await?;
    info!(admin_id = %admin.id, alice_id = %alice.id, "Users seeded");

    let posts = system.post_controller();
    let mut session = Session::new();
    let request = Request::new(
        Payload::new()
            .with("task", TASK_CREATE)
            .with("title", "Hello")
            .with("body", "First post")
            .with("icon", "icons/hello.png"),
    );
    match posts.store(&alice, request, &mut session).await {
        Ok(outcome) => {
            if let Some(post) = outcome.resource {
                info!(post_id = %post.id, "Sample post created");
                if let Err(e) = system
                    .post_client
                    .modify(post.id, ModifyAction::Hide, None)
                    .await
                {
                    error!(error = %e, "Hiding the sample post failed");
                }
            }
        }
        Err(e) => error!(error = %e, "Sample post failed"),
    }

    let chat = system.chat();
    if let Err(e) = chat.send_message(&admin, "Welcome!", None).await {
        error!(error = %e, "Welcome message failed");
    }

    let state = AppState {
        users: system.user_client.clone(),
        posts,
        chat,
    };
    if let Err(e) = http::serve(config.http_addr, state).await {
        error!(error = %e, "HTTP server failed");
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
