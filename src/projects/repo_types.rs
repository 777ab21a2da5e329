use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::UploadedAsset;

/// Image stored on the asset host. URL and public id are always set together.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Asset {
    pub url: String,
    pub public_id: String,
}

impl From<UploadedAsset> for Asset {
    fn from(u: UploadedAsset) -> Self {
        Self {
            url: u.url,
            public_id: u.public_id,
        }
    }
}

/// Which image of a project an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    Thumbnail,
    Avatar,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 2] = [AssetSlot::Thumbnail, AssetSlot::Avatar];

    pub fn name(self) -> &'static str {
        match self {
            AssetSlot::Thumbnail => "thumbnail",
            AssetSlot::Avatar => "avatar",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ProjectAssets {
    pub thumbnail: Option<Asset>,
    pub avatar: Option<Asset>,
}

impl ProjectAssets {
    pub fn slot(&self, slot: AssetSlot) -> Option<&Asset> {
        match slot {
            AssetSlot::Thumbnail => self.thumbnail.as_ref(),
            AssetSlot::Avatar => self.avatar.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: AssetSlot) -> &mut Option<Asset> {
        match slot {
            AssetSlot::Thumbnail => &mut self.thumbnail,
            AssetSlot::Avatar => &mut self.avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub repository_url: String,
    #[serde(flatten)]
    pub assets: ProjectAssets,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated project not yet stored; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub repository_url: String,
    pub assets: ProjectAssets,
}

/// Row shape of the `projects` table.
#[derive(Debug, FromRow)]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub repository_url: String,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_public_id: Option<String>,
    pub created_at: OffsetDateTime,
}

fn pair(url: Option<String>, public_id: Option<String>) -> Option<Asset> {
    match (url, public_id) {
        (Some(url), Some(public_id)) => Some(Asset { url, public_id }),
        _ => None,
    }
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            skills: r.skills,
            repository_url: r.repository_url,
            assets: ProjectAssets {
                thumbnail: pair(r.thumbnail_url, r.thumbnail_public_id),
                avatar: pair(r.avatar_url, r.avatar_public_id),
            },
            created_at: r.created_at,
        }
    }
}
