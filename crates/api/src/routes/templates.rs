//! Route definitions for the `/templates` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use wedsite_core::upload::MAX_UPLOAD_BYTES;

use crate::handlers::{activity, images, rsvp, templates, translations};
use crate::state::AppState;

/// Room for multipart boundaries and the text fields around the file part.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/templates`.
///
/// Every route names its template `{template_id}`. Public reads accept an id
/// or a slug; gated routes expect the id.
///
/// ```text
/// GET    /                                        -> list_templates
/// POST   /                                        -> create_template
/// DELETE /{template_id}                           -> delete_template
/// GET    /{template_id}/config                    -> get_config
/// PUT    /{template_id}/config                    -> update_config
/// PUT    /{template_id}/maintenance               -> set_maintenance
/// POST   /{template_id}/unlock                    -> unlock
/// GET    /{template_id}/activity                  -> list_activity
/// POST   /{template_id}/rsvp                      -> submit_rsvp
/// GET    /{template_id}/rsvps                     -> list_rsvps
/// DELETE /{template_id}/rsvps/{rsvp_id}           -> delete_rsvp
/// GET    /{template_id}/images                    -> list_images
/// POST   /{template_id}/photos/upload             -> upload_image
/// PUT    /{template_id}/images/order              -> reorder_images
/// DELETE /{template_id}/images/{image_id}         -> delete_image
/// GET    /{template_id}/translations/{locale}     -> get_translations
/// PUT    /{template_id}/translations/{locale}     -> put_translations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/{template_id}", delete(templates::delete_template))
        .route(
            "/{template_id}/config",
            get(templates::get_config).put(templates::update_config),
        )
        .route("/{template_id}/maintenance", put(templates::set_maintenance))
        .route("/{template_id}/unlock", post(templates::unlock))
        .route("/{template_id}/activity", get(activity::list_activity))
        .route("/{template_id}/rsvp", post(rsvp::submit_rsvp))
        .route("/{template_id}/rsvps", get(rsvp::list_rsvps))
        .route("/{template_id}/rsvps/{rsvp_id}", delete(rsvp::delete_rsvp))
        .route("/{template_id}/images", get(images::list_images))
        .route(
            "/{template_id}/photos/upload",
            post(images::upload_image)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/{template_id}/images/order", put(images::reorder_images))
        .route("/{template_id}/images/{image_id}", delete(images::delete_image))
        .route(
            "/{template_id}/translations/{locale}",
            get(translations::get_translations).put(translations::put_translations),
        )
}
