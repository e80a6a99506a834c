use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::RepoError;

/// Generic repository trait defining single-row CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: &ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with `Constraint` if the ID is taken.
    async fn insert_entity(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if no row matched.
    async fn update_entity(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with `NotFound` if no row existed.
    async fn delete_by_id(&self, id: &ID) -> Result<(), RepoError>;
}

/// Post repository - the persistence gateway for the `posts` table.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// All posts, oldest first (ties broken by id).
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Zero or one post.
    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        self.find_by_id(id).await
    }

    /// Persist a new post with a server-generated id and timestamps.
    async fn insert(&self, input: NewPost) -> Result<Post, RepoError> {
        self.insert_entity(Post::new(input)).await
    }

    /// Apply only the provided fields and refresh `updated_at`.
    async fn update_by_id(&self, id: &PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut post = self.find_by_id(id).await?.ok_or(RepoError::NotFound)?;
        post.apply(changes);
        self.update_entity(post).await
    }
}
