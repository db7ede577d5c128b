use crate::errors::{AppError, OperationError};
use crate::forms::{CampaignForm, DeleteForm, FileUpload, RunForm, SegmentForm, TemplateForm};
use crate::models::Region;
use crate::state::AppState;
use crate::ui::render_page;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde_json::Value;
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    state.controller.warm_up().await;
    let page = state.page().lock().await;
    Html(render_page(&page))
}

pub async fn get_view(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let page = state.page().lock().await;
    let view = serde_json::to_value(&*page).map_err(AppError::internal)?;
    Ok(Json(view))
}

pub async fn upload_users(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    match collect_files(multipart).await {
        Ok(files) => state.controller.upload_users(files).await,
        Err(err) => {
            state
                .controller
                .reject(Region::UploadResult, unreadable(err))
                .await
        }
    }
    Redirect::to("/")
}

pub async fn upload_events(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    match collect_files(multipart).await {
        Ok(files) => state.controller.upload_events(files).await,
        Err(err) => {
            state
                .controller
                .reject(Region::EventResult, unreadable(err))
                .await
        }
    }
    Redirect::to("/")
}

pub async fn create_template(
    State(state): State<AppState>,
    Form(form): Form<TemplateForm>,
) -> Redirect {
    state.controller.create_template(&form).await;
    Redirect::to("/")
}

pub async fn delete_template(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    state.controller.delete_template(&form).await;
    Redirect::to("/")
}

pub async fn create_segment(
    State(state): State<AppState>,
    Form(form): Form<SegmentForm>,
) -> Redirect {
    state.controller.create_segment(&form).await;
    Redirect::to("/")
}

pub async fn delete_segment(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    state.controller.delete_segment(&form).await;
    Redirect::to("/")
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Form(form): Form<CampaignForm>,
) -> Redirect {
    state.controller.create_campaign(&form).await;
    Redirect::to("/")
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    state.controller.delete_campaign(&form).await;
    Redirect::to("/")
}

pub async fn run_campaign(State(state): State<AppState>, Form(form): Form<RunForm>) -> Redirect {
    state.controller.run_campaign(&form).await;
    Redirect::to("/")
}

pub async fn load_inbound(State(state): State<AppState>) -> Redirect {
    state.controller.load_inbound().await;
    Redirect::to("/")
}

pub async fn load_stats(State(state): State<AppState>) -> Redirect {
    state.controller.load_stats().await;
    Redirect::to("/")
}

/// Every part named `file`, in submission order.
async fn collect_files(mut multipart: Multipart) -> Result<Vec<FileUpload>, MultipartError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?.to_vec();
        files.push(FileUpload {
            file_name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

fn unreadable(err: MultipartError) -> OperationError {
    warn!("upload body could not be read: {err}");
    OperationError::validation(format!("Upload could not be read: {}", err.body_text()))
}
