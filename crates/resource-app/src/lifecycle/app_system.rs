use crate::chat::{Broadcaster, ChatService};
use crate::clients::{MessageClient, PostClient, UserClient};
use crate::config::AppConfig;
use crate::controller::ResourceController;
use crate::model::Post;
use crate::upload::ImageMaker;
use crate::{message_actor, post_actor, user_actor};
use resource_framework::ActorClient;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running application: one actor per resource plus the chat broadcaster.
///
/// # Example
///
/// ```ignore
/// let system = AppSystem::new(&AppConfig::default());
///
/// let user = system.user_client.register(input, Role::Client).await?;
/// let post = system.post_client.create_post(user.id, post_input).await?;
/// system.chat().send_message(&user, "hi", None).await?;
///
/// system.shutdown().await?;
/// ```
pub struct AppSystem {
    pub config: AppConfig,
    pub user_client: UserClient,
    pub post_client: PostClient,
    pub message_client: MessageClient,
    pub broadcaster: Broadcaster,
    handles: Vec<JoinHandle<()>>,
}

impl AppSystem {
    /// Spawns every actor. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> Self {
        let (user_actor, user_client) = user_actor::new(config);
        let (post_actor, post_client) = post_actor::new(config);
        let (message_actor, message_client) = message_actor::new(config);

        let handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(post_actor.run(user_client.clone())),
            tokio::spawn(message_actor.run(user_client.clone())),
        ];
        info!(actors = handles.len(), "System started");

        Self {
            config: config.clone(),
            user_client,
            post_client,
            message_client,
            broadcaster: Broadcaster::new(config.broadcast_capacity),
            handles,
        }
    }

    pub fn chat(&self) -> ChatService {
        ChatService::new(
            self.message_client.clone(),
            self.user_client.clone(),
            self.broadcaster.clone(),
        )
    }

    /// Controller for posts; new posts are owned by the user who submits them.
    pub fn post_controller(&self) -> ResourceController<Post> {
        ResourceController::new(self.post_client.inner().clone(), "Post").owner_field("user_id")
    }

    pub fn image_maker(&self) -> ImageMaker {
        ImageMaker::new(self.config.public_root.clone())
    }

    /// Drops the clients and waits for every actor to finish.
    ///
    /// Anything still holding a client clone (a controller, the chat service) keeps its actor
    /// alive, so drop those first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.user_client);
        drop(self.post_client);
        drop(self.message_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
