pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers as tailoring;
use crate::workspace::handlers as workspace;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé
        .route(
            "/api/v1/resume",
            get(workspace::handle_get_resume).put(workspace::handle_save_resume),
        )
        .route(
            "/api/v1/resume/upload",
            post(workspace::handle_upload_resume),
        )
        // Job descriptions
        .route(
            "/api/v1/jobs",
            get(workspace::handle_list_jobs).post(workspace::handle_add_job),
        )
        .route("/api/v1/jobs/selection", put(workspace::handle_select_job))
        .route("/api/v1/jobs/:id", delete(workspace::handle_remove_job))
        // Credential
        .route(
            "/api/v1/credential",
            get(workspace::handle_get_credential).put(workspace::handle_set_credential),
        )
        .route(
            "/api/v1/credential/persist",
            post(workspace::handle_persist_credential),
        )
        // Tailoring
        .route(
            "/api/v1/tailor",
            get(tailoring::handle_status)
                .post(tailoring::handle_submit)
                .delete(tailoring::handle_cancel),
        )
        .route("/api/v1/tailor/reset", post(tailoring::handle_reset))
        .with_state(state)
}
