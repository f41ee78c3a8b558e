//! Request handlers.
//!
//! Thin adapters: decode the form, call the feed service or a collaborator,
//! encode the result. File access runs on the blocking pool.

use axum::{extract::State, Form, Json};
use serde::Deserialize;

use crate::feeds::{FeedError, FeedListItem, FeedPatch, NestedMerge, NewFeed};
use crate::http::response::{ApiError, ChangelogResponse, MessageResponse};
use crate::http::server::AppState;
use crate::reload::reload_and_clear;

/// Form of `POST /add`.
#[derive(Debug, Default, Deserialize)]
pub struct AddFeedForm {
    #[serde(rename = "youtubeUrl")]
    pub youtube_url: Option<String>,
    pub update_period: Option<String>,
    pub format: Option<String>,
    pub clean_keep_last: Option<String>,
    pub max_age: Option<String>,
}

/// Form of `POST /modify`.
#[derive(Debug, Default, Deserialize)]
pub struct ModifyFeedForm {
    #[serde(rename = "feedKey")]
    pub feed_key: Option<String>,
    pub update_period: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub page_size: Option<String>,
    pub clean_keep_last: Option<String>,
    pub max_age: Option<String>,
    /// `deep` (default) or `replace`.
    pub nested: Option<String>,
}

/// Form of `POST /remove`.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveFeedForm {
    #[serde(rename = "feedKey")]
    pub feed_key: Option<String>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_feeds(State(state): State<AppState>) -> Result<Json<Vec<FeedListItem>>, ApiError> {
    let feeds = state.feeds.clone();
    let items = blocking(move || feeds.list()).await?;
    Ok(Json(items))
}

pub async fn add_feed(
    State(state): State<AppState>,
    Form(form): Form<AddFeedForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let source = required(form.youtube_url, "YouTube URL is required")?;
    let opts = NewFeed {
        update_period: non_empty(form.update_period),
        format: non_empty(form.format),
        keep_last: parse_int("clean_keep_last", form.clean_keep_last)?,
        max_age: parse_int("max_age", form.max_age)?,
    };

    let channel = state.lookup.lookup(&source).await?;
    let title = channel.title.clone();

    let feeds = state.feeds.clone();
    blocking(move || feeds.add(&channel, &opts)).await?;

    Ok(MessageResponse::new(format!(
        "Feed for channel '{}' added successfully!",
        title
    )))
}

pub async fn modify_feed(
    State(state): State<AppState>,
    Form(form): Form<ModifyFeedForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = required(form.feed_key, "feedKey is required")?;
    let nested = match non_empty(form.nested).as_deref() {
        None | Some("deep") => NestedMerge::Deep,
        Some("replace") => NestedMerge::Replace,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "nested must be 'deep' or 'replace', got '{}'",
                other
            )))
        }
    };
    let patch = FeedPatch {
        update_period: non_empty(form.update_period),
        format: non_empty(form.format),
        quality: non_empty(form.quality),
        page_size: parse_int("page_size", form.page_size)?,
        keep_last: parse_int("clean_keep_last", form.clean_keep_last)?,
        max_age: parse_int("max_age", form.max_age)?,
        nested,
    };

    let feeds = state.feeds.clone();
    let feed_key = key.clone();
    blocking(move || feeds.modify(&feed_key, &patch)).await?;

    Ok(MessageResponse::new(format!("Feed '{}' modified successfully!", key)))
}

pub async fn remove_feed(
    State(state): State<AppState>,
    Form(form): Form<RemoveFeedForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = required(form.feed_key, "feedKey is required")?;

    let feeds = state.feeds.clone();
    let feed_key = key.clone();
    blocking(move || feeds.remove(&feed_key)).await?;

    Ok(MessageResponse::new(format!("Feed '{}' removed successfully!", key)))
}

pub async fn changelog(State(state): State<AppState>) -> Json<ChangelogResponse> {
    let pending = state.feeds.changes().get_changes();
    let messages = pending.iter().map(|c| c.message()).collect();
    Json(ChangelogResponse { pending, messages })
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    reload_and_clear(state.reloader.as_ref(), state.feeds.changes()).await?;
    Ok(MessageResponse::new(format!(
        "Container '{}' reloaded successfully!",
        state.reloader.target()
    )))
}

async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, FeedError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    non_empty(value).ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

fn parse_int(field: &str, value: Option<String>) -> Result<Option<i64>, ApiError> {
    non_empty(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("{} must be an integer, got '{}'", field, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("x", None).unwrap(), None);
        assert_eq!(parse_int("x", Some("  ".into())).unwrap(), None);
        assert_eq!(parse_int("x", Some(" 42 ".into())).unwrap(), Some(42));
        assert!(matches!(parse_int("x", Some("4x".into())), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_required() {
        assert!(required(None, "missing").is_err());
        assert!(required(Some("".into()), "missing").is_err());
        assert_eq!(required(Some(" k ".into()), "missing").unwrap(), "k");
    }
}
