//! In-memory post repository - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{Post, PostId};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

/// In-memory post store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(id).cloned())
    }

    async fn insert_entity(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!(
                "Post {} already exists",
                post.id
            )));
        }

        store.insert(post.id.clone(), post.clone());
        tracing::debug!(post_id = %post.id, "Inserted post");
        Ok(post)
    }

    async fn update_entity(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        let slot = store.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        tracing::debug!(post_id = %post.id, "Updated post");
        Ok(post)
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), RepoError> {
        let mut store = self.store.write().await;

        store.remove(id).ok_or(RepoError::NotFound)?;
        tracing::debug!(post_id = %id, "Deleted post");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;

        let mut posts: Vec<Post> = store.values().cloned().collect();
        posts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(posts)
    }
}
