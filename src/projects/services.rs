use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    projects::{
        assets::{discard_asset, replace_asset, validate_image, UploadFile},
        dto::{NewProject, ProjectPatch},
        repo_types::{AssetSlot, Project, ProjectAssets, ProjectDraft},
    },
    state::AppState,
};

fn required_text(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(field.into()));
    }
    Ok(value)
}

fn required_skills(skills: Vec<String>) -> AppResult<Vec<String>> {
    let skills: Vec<String> = skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Err(AppError::Validation("skills".into()));
    }
    Ok(skills)
}

fn check_files(files: [&Option<UploadFile>; 2]) -> AppResult<()> {
    files.into_iter().flatten().try_for_each(validate_image)
}

pub async fn list_projects(st: &AppState) -> AppResult<Vec<Project>> {
    st.projects.find_all().await
}

pub async fn get_project(st: &AppState, id: Uuid) -> AppResult<Project> {
    st.projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {id}")))
}

/// Validates, uploads the provided images and stores the project.
/// An image uploaded before a later failure stays on the host.
pub async fn create_project(
    st: &AppState,
    input: NewProject,
    thumbnail: Option<UploadFile>,
    avatar: Option<UploadFile>,
) -> AppResult<Project> {
    let mut draft = ProjectDraft {
        name: required_text("name", input.name)?,
        description: required_text("description", input.description)?,
        skills: required_skills(input.skills)?,
        repository_url: required_text("repository_url", input.repository_url)?,
        assets: ProjectAssets::default(),
    };
    check_files([&thumbnail, &avatar])?;

    replace_asset(st, &mut draft.assets, AssetSlot::Thumbnail, thumbnail).await?;
    replace_asset(st, &mut draft.assets, AssetSlot::Avatar, avatar).await?;

    let project = st.projects.insert(draft).await?;
    info!(project_id = %project.id, name = %project.name, "project created");
    Ok(project)
}

/// Applies the present fields and replaces the provided images.
pub async fn update_project(
    st: &AppState,
    id: Uuid,
    patch: ProjectPatch,
    thumbnail: Option<UploadFile>,
    avatar: Option<UploadFile>,
) -> AppResult<Project> {
    let mut project = get_project(st, id).await?;

    if let Some(name) = patch.name {
        project.name = required_text("name", name)?;
    }
    if let Some(description) = patch.description {
        project.description = required_text("description", description)?;
    }
    if let Some(skills) = patch.skills {
        project.skills = required_skills(skills)?;
    }
    if let Some(repository_url) = patch.repository_url {
        project.repository_url = required_text("repository_url", repository_url)?;
    }
    check_files([&thumbnail, &avatar])?;

    replace_asset(st, &mut project.assets, AssetSlot::Thumbnail, thumbnail).await?;
    replace_asset(st, &mut project.assets, AssetSlot::Avatar, avatar).await?;

    let project = st
        .projects
        .update(&project)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {id}")))?;
    info!(project_id = %project.id, "project updated");
    Ok(project)
}

/// Removes the project's images (best-effort) and then the project itself.
pub async fn delete_project(st: &AppState, id: Uuid) -> AppResult<bool> {
    let project = get_project(st, id).await?;

    for slot in AssetSlot::ALL {
        if let Some(asset) = project.assets.slot(slot) {
            discard_asset(st, slot, asset).await;
        }
    }

    if st.projects.delete(id).await? == 0 {
        return Err(AppError::NotFound(format!("project {id}")));
    }
    info!(project_id = %id, "project deleted");
    Ok(true)
}
