use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    assets::{UploadFile, MAX_FILE_SIZE},
    dto::{DeletedResponse, NewProject, ProjectPatch},
    repo_types::Project,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        // two images plus text fields
        .layer(DefaultBodyLimit::max(2 * MAX_FILE_SIZE + 2 * 1024 * 1024))
}

/// Multipart body of project create/update.
/// Fields: name, description, skills (repeated), repository_url; files: thumbnail, avatar.
#[derive(Debug, Default)]
struct ProjectForm {
    name: Option<String>,
    description: Option<String>,
    skills: Option<Vec<String>>,
    repository_url: Option<String>,
    thumbnail: Option<UploadFile>,
    avatar: Option<UploadFile>,
}

impl ProjectForm {
    async fn read(mut mp: Multipart) -> AppResult<Self> {
        let mut form = ProjectForm::default();
        while let Some(field) = mp
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "thumbnail" | "avatar" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let body = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("{}: {}", name, e)))?;
                    // an empty file input is sent as a nameless, empty part
                    if file_name.is_empty() && body.is_empty() {
                        continue;
                    }
                    let file = Some(UploadFile { file_name, body });
                    if name == "thumbnail" {
                        form.thumbnail = file;
                    } else {
                        form.avatar = file;
                    }
                }
                "name" | "description" | "skills" | "repository_url" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("{}: {}", name, e)))?;
                    match name.as_str() {
                        "name" => form.name = Some(text),
                        "description" => form.description = Some(text),
                        "repository_url" => form.repository_url = Some(text),
                        _ => form.skills.get_or_insert_with(Vec::new).push(text),
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn into_new(self) -> (NewProject, Option<UploadFile>, Option<UploadFile>) {
        let input = NewProject {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            skills: self.skills.unwrap_or_default(),
            repository_url: self.repository_url.unwrap_or_default(),
        };
        (input, self.thumbnail, self.avatar)
    }

    fn into_patch(self) -> (ProjectPatch, Option<UploadFile>, Option<UploadFile>) {
        let patch = ProjectPatch {
            name: self.name,
            description: self.description,
            skills: self.skills,
            repository_url: self.repository_url,
        };
        (patch, self.thumbnail, self.avatar)
    }
}

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(services::list_projects(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    Ok(Json(services::get_project(&state, id).await?))
}

#[instrument(skip(state, auth, mp), fields(user_id = %auth.0.sub))]
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    mp: Multipart,
) -> AppResult<(StatusCode, Json<Project>)> {
    let (input, thumbnail, avatar) = ProjectForm::read(mp).await?.into_new();
    let project = services::create_project(&state, input, thumbnail, avatar).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(skip(state, auth, mp), fields(user_id = %auth.0.sub))]
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> AppResult<Json<Project>> {
    let (patch, thumbnail, avatar) = ProjectForm::read(mp).await?.into_patch();
    let project = services::update_project(&state, id, patch, thumbnail, avatar).await?;
    Ok(Json(project))
}

#[instrument(skip(state, auth), fields(user_id = %auth.0.sub))]
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = services::delete_project(&state, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
