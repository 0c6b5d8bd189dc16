use crate::api::models::{AppState, EndpointDescriptor};
use crate::api::thoughts::handlers::*;
use axum::{
    routing::{get, patch, post},
    Router,
};

pub const THOUGHTS_PATH: &str = "/thoughts";
pub const THOUGHT_PATH: &str = "/thoughts/{id}";
pub const THOUGHT_LIKES_PATH: &str = "/thoughts/{id}/likes";

/// Listed with `:id` placeholders, the form existing clients of `GET /` expect.
pub const ENDPOINTS: &[EndpointDescriptor] = &[
    EndpointDescriptor {
        path: THOUGHTS_PATH,
        methods: &["GET", "POST"],
    },
    EndpointDescriptor {
        path: "/thoughts/:id/likes",
        methods: &["POST"],
    },
    EndpointDescriptor {
        path: "/thoughts/:id",
        methods: &["PATCH", "PUT", "DELETE"],
    },
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            THOUGHTS_PATH,
            get(list_thoughts_handler).post(create_thought_handler),
        )
        .route(THOUGHT_LIKES_PATH, post(like_thought_handler))
        .route(
            THOUGHT_PATH,
            patch(update_thought_handler)
                .put(replace_thought_handler)
                .delete(delete_thought_handler),
        )
}
