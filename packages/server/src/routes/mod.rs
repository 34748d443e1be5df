use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_csv))
        .layer(handlers::upload::upload_body_limit(config.upload.max_bytes));

    OpenApiRouter::new()
        .routes(routes!(handlers::dashboard::get_summary))
        .routes(routes!(handlers::dashboard::list_history))
        .routes(routes!(handlers::report::export_pdf))
        .merge(upload)
}
