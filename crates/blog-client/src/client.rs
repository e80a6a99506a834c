use blog_shared::{
    CreatePostRequest, ErrorResponse, MessageResponse, PostResponse, UpdatePostRequest,
};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Client for the posts API.
///
/// One method per endpoint. No retries, caching or timeouts are applied
/// beyond what the supplied `reqwest::Client` is configured with.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: Client,
    base_url: String,
}

impl PostsClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// GET /api/posts
    pub async fn list_posts(&self) -> Result<Vec<PostResponse>, ClientError> {
        let res = self.http.get(self.url(None)?).send().await?;
        decode(res, "Failed to fetch posts").await
    }

    /// GET /api/posts/{id}
    pub async fn get_post(&self, id: &str) -> Result<PostResponse, ClientError> {
        let res = self.http.get(self.url(Some(id))?).send().await?;
        decode(res, "Post not found").await
    }

    /// POST /api/posts
    pub async fn create_post(&self, body: &CreatePostRequest) -> Result<PostResponse, ClientError> {
        let res = self.http.post(self.url(None)?).json(body).send().await?;
        decode(res, "Failed to create post").await
    }

    /// PUT /api/posts/{id}
    pub async fn update_post(
        &self,
        id: &str,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        let res = self
            .http
            .put(self.url(Some(id))?)
            .json(body)
            .send()
            .await?;
        decode(res, "Failed to update post").await
    }

    /// DELETE /api/posts/{id}
    pub async fn delete_post(&self, id: &str) -> Result<MessageResponse, ClientError> {
        let res = self.http.delete(self.url(Some(id))?).send().await?;
        decode(res, "Failed to delete post").await
    }

    /// `{base}/api/posts`, plus the id as a single percent-encoded segment.
    fn url(&self, id: Option<&str>) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?;
            segments.pop_if_empty().extend(["api", "posts"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

/// Decode a success body, or turn a failure into `ClientError::Api` with the
/// server's message (or `fallback` when the body is not a `{message}` object).
async fn decode<T: DeserializeOwned>(res: Response, fallback: &str) -> Result<T, ClientError> {
    let status = res.status();

    if !status.is_success() {
        let message = match res.json::<ErrorResponse>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => fallback.to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "Posts API request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(res.json::<T>().await?)
}
