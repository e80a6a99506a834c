//! Input validation - declarative schemas for post create, update and id lookup.
//!
//! Each check is a pure function from untyped input to a typed value or a
//! [`ValidationError`] listing every violated constraint.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::domain::{NewPost, PostChanges, PostId};
use crate::error::ValidationError;

pub const TITLE_MAX_CHARS: u64 = 255;
pub const CONTENT_MAX_CHARS: u64 = 10_000;

static POST_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("post id pattern is a valid regex"));

#[derive(Debug, Deserialize, Validate)]
struct CreatePostSchema {
    #[serde(default)]
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters")
    )]
    title: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "Content is required"),
        length(min = 1, max = 10000, message = "Content must be between 1 and 10,000 characters")
    )]
    content: Option<String>,
}

/// Raw update body. A missing key is `None`, an explicit `null` is `Some(None)`.
#[derive(Debug, Deserialize)]
struct UpdatePostBody {
    #[serde(default, deserialize_with = "present")]
    title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    content: Option<Option<String>>,
}

#[derive(Debug, Validate)]
struct UpdatePostSchema {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    title: Option<String>,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content must be between 1 and 10,000 characters"
    ))]
    content: Option<String>,
}

#[derive(Debug, Validate)]
struct PostIdSchema {
    #[validate(
        length(min = 1, message = "Post ID is required"),
        regex(path = *POST_ID_PATTERN, message = "Post ID must be alphanumeric")
    )]
    id: String,
}

/// Create check: `title` and `content` are both mandatory.
pub fn check_create(input: &Value) -> Result<NewPost, ValidationError> {
    let schema: CreatePostSchema = decode(input)?;
    schema.validate().map_err(collect_messages)?;

    match (schema.title, schema.content) {
        (Some(title), Some(content)) => Ok(NewPost { title, content }),
        // `required` above rejects both of these
        (None, _) => Err(ValidationError::single("Title is required")),
        (_, None) => Err(ValidationError::single("Content is required")),
    }
}

/// Update check: both fields optional, absent fields stay `None`.
/// A field that is present must be a string; `null` is rejected.
pub fn check_update(input: &Value) -> Result<PostChanges, ValidationError> {
    let body: UpdatePostBody = decode(input)?;

    let mut null_fields = Vec::new();
    if body.content == Some(None) {
        null_fields.push("Content must be a string".to_string());
    }
    if body.title == Some(None) {
        null_fields.push("Title must be a string".to_string());
    }
    if !null_fields.is_empty() {
        return Err(ValidationError::new(null_fields));
    }

    let schema = UpdatePostSchema {
        title: body.title.flatten(),
        content: body.content.flatten(),
    };
    schema.validate().map_err(collect_messages)?;

    Ok(PostChanges {
        title: schema.title,
        content: schema.content,
    })
}

/// Id check: a non-empty ASCII alphanumeric string.
pub fn check_id(raw: &str) -> Result<PostId, ValidationError> {
    let schema = PostIdSchema {
        id: raw.to_string(),
    };
    schema.validate().map_err(collect_messages)?;

    Ok(PostId::from_validated(schema.id))
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}

fn decode<'a, T: Deserialize<'a>>(input: &'a Value) -> Result<T, ValidationError> {
    if !input.is_object() {
        return Err(ValidationError::single("Request body must be a JSON object"));
    }

    T::deserialize(input).map_err(|e| ValidationError::single(format!("Invalid request body: {e}")))
}

fn collect_messages(errors: ValidationErrors) -> ValidationError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    ValidationError::new(messages)
}
