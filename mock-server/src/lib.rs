use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    pub id: u64,
    pub by: String,
    pub time: i64,
    pub title: String,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Story {
    pub fn new(id: u64, score: i64) -> Self {
        Self {
            id,
            by: format!("user{}", id % 17),
            time: 1_700_000_000 + id as i64 * 60,
            title: format!("Story number {id}"),
            score,
            url: Some(format!("https://example.com/stories/{id}")),
            kind: "story".to_string(),
        }
    }

    /// A text post: no `url` key on the wire.
    pub fn text(id: u64, score: i64) -> Self {
        Self {
            url: None,
            ..Self::new(id, score)
        }
    }
}

/// Canned content served by the mock API.
///
/// Lists are keyed by resource stem (`topstories`). An identifier with no
/// story answers `null`, like the real API; a failing identifier answers 500.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    lists: HashMap<String, Vec<u64>>,
    stories: HashMap<u64, Story>,
    failing: HashSet<u64>,
}

impl Fixture {
    pub fn with_list(mut self, name: &str, ids: Vec<u64>) -> Self {
        self.lists.insert(name.to_string(), ids);
        self
    }

    pub fn with_story(mut self, story: Story) -> Self {
        self.stories.insert(story.id, story);
        self
    }

    pub fn with_failing_item(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    /// Sixty stories spread over the three lists.
    pub fn sample() -> Self {
        let stories: Vec<Story> = (0..60u64)
            .map(|n| {
                let id = 40_000_000 + n;
                let score = ((n * 37) % 500) as i64;
                if n % 9 == 0 {
                    Story::text(id, score)
                } else {
                    Story::new(id, score)
                }
            })
            .collect();

        let mut by_score = stories.clone();
        by_score.sort_by(|a, b| b.score.cmp(&a.score));
        let top = by_score.iter().take(30).map(|s| s.id).collect();
        let best = by_score.iter().take(50).map(|s| s.id).collect();
        let new = stories.iter().rev().map(|s| s.id).collect();

        stories
            .into_iter()
            .fold(Fixture::default(), Fixture::with_story)
            .with_list("topstories", top)
            .with_list("newstories", new)
            .with_list("beststories", best)
    }
}

pub type Db = Arc<Fixture>;

pub fn app(fixture: Fixture) -> Router {
    Router::new()
        .route("/v0/{list}", get(get_list))
        .route("/v0/item/{file}", get(get_item))
        .with_state(Arc::new(fixture))
}

pub async fn run(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app(fixture)).await
}

async fn get_list(
    State(db): State<Db>,
    Path(list): Path<String>,
) -> Result<Json<Vec<u64>>, StatusCode> {
    let stem = list.strip_suffix(".json").ok_or(StatusCode::NOT_FOUND)?;
    db.lists.get(stem).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_item(State(db): State<Db>, Path(file): Path<String>) -> Response {
    let Some(id) = file
        .strip_suffix(".json")
        .and_then(|stem| stem.parse::<u64>().ok())
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if db.failing.contains(&id) {
        tracing::debug!(id, "serving injected failure");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match db.stories.get(&id) {
        Some(story) => Json(story.clone()).into_response(),
        None => ([(header::CONTENT_TYPE, "application/json")], "null").into_response(),
    }
}
