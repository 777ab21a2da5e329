use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::projects::repo_types::{Asset, Project, ProjectDraft, ProjectRow};

/// Project catalog: persistence for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Project>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;
    async fn insert(&self, draft: ProjectDraft) -> AppResult<Project>;
    /// Overwrites every mutable column. `None` when no row has `project.id`.
    async fn update(&self, project: &Project) -> AppResult<Option<Project>>;
    /// Number of deleted rows.
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgProjectRepository {
    db: PgPool,
}

impl PgProjectRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn split(asset: Option<&Asset>) -> (Option<&str>, Option<&str>) {
    match asset {
        Some(a) => (Some(a.url.as_str()), Some(a.public_id.as_str())),
        None => (None, None),
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn find_all(&self) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, skills, repository_url,
                   thumbnail_url, thumbnail_public_id, avatar_url, avatar_public_id,
                   created_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, skills, repository_url,
                   thumbnail_url, thumbnail_public_id, avatar_url, avatar_public_id,
                   created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Project::from))
    }

    async fn insert(&self, draft: ProjectDraft) -> AppResult<Project> {
        let (thumbnail_url, thumbnail_public_id) = split(draft.assets.thumbnail.as_ref());
        let (avatar_url, avatar_public_id) = split(draft.assets.avatar.as_ref());
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (name, description, skills, repository_url,
                                  thumbnail_url, thumbnail_public_id,
                                  avatar_url, avatar_public_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, skills, repository_url,
                      thumbnail_url, thumbnail_public_id, avatar_url, avatar_public_id,
                      created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.skills)
        .bind(&draft.repository_url)
        .bind(thumbnail_url)
        .bind(thumbnail_public_id)
        .bind(avatar_url)
        .bind(avatar_public_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, project: &Project) -> AppResult<Option<Project>> {
        let (thumbnail_url, thumbnail_public_id) = split(project.assets.thumbnail.as_ref());
        let (avatar_url, avatar_public_id) = split(project.assets.avatar.as_ref());
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
               SET name = $2, description = $3, skills = $4, repository_url = $5,
                   thumbnail_url = $6, thumbnail_public_id = $7,
                   avatar_url = $8, avatar_public_id = $9
             WHERE id = $1
            RETURNING id, name, description, skills, repository_url,
                      thumbnail_url, thumbnail_public_id, avatar_url, avatar_public_id,
                      created_at
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.skills)
        .bind(&project.repository_url)
        .bind(thumbnail_url)
        .bind(thumbnail_public_id)
        .bind(avatar_url)
        .bind(avatar_public_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Project::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let res = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
