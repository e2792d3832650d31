use axum::routing::get;
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// ```text
/// GET /maintenance[?template=]  -> maintenance_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/maintenance", get(maintenance::maintenance_status))
}
