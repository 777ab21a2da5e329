use serde::Serialize;

/// Fields of a project to create.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub repository_url: String,
}

/// Partial project update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub repository_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}
