pub mod config;
pub mod groups;
pub mod lists;
pub mod pipeline;
pub mod replies;
pub mod shared;
pub mod store;

use std::sync::Arc;

use axum::Router;

use crate::shared::state::AppState;

/// All CRM API routes, ready to mount on a server.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(pipeline::pipeline_routes())
        .merge(lists::list_routes())
        .merge(replies::reply_routes())
        .merge(groups::group_routes())
}
