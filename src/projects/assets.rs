use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    error::{AppError, AppResult},
    projects::repo_types::{Asset, AssetSlot, ProjectAssets},
    state::AppState,
    storage::extension_of,
};

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub body: Bytes,
}

/// Local policy checked before the asset host is contacted.
pub fn validate_image(file: &UploadFile) -> AppResult<()> {
    let ext = extension_of(&file.file_name).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::InvalidAsset(format!(
            "file type '{}' is not allowed, use jpg, jpeg, png or gif",
            ext
        )));
    }
    if file.body.len() > MAX_FILE_SIZE {
        return Err(AppError::InvalidAsset(format!(
            "file '{}' exceeds the 5 MiB limit",
            file.file_name
        )));
    }
    Ok(())
}

async fn upload(st: &AppState, file: UploadFile) -> AppResult<Asset> {
    validate_image(&file)?;
    let uploaded = st
        .assets
        .upload(&file.file_name, file.body)
        .await
        .map_err(|e| AppError::UploadFailed(format!("{:#}", e)))?;
    Ok(uploaded.into())
}

pub async fn delete_asset(st: &AppState, asset: &Asset) -> AppResult<()> {
    match st.assets.delete(&asset.public_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::DeleteFailed(format!(
            "host refused to delete {}",
            asset.public_id
        ))),
        Err(e) => Err(AppError::DeleteFailed(format!("{:#}", e))),
    }
}

/// Best-effort delete: failures are logged and swallowed.
pub async fn discard_asset(st: &AppState, slot: AssetSlot, asset: &Asset) {
    match delete_asset(st, asset).await {
        Ok(()) => debug!(slot = slot.name(), public_id = %asset.public_id, "asset removed"),
        Err(e) => warn!(slot = slot.name(), public_id = %asset.public_id, error = %e, "asset cleanup failed"),
    }
}

/// Uploads `file` into `slot`, then discards whatever the slot held before.
/// A `None` file leaves the slot untouched.
pub async fn replace_asset(
    st: &AppState,
    assets: &mut ProjectAssets,
    slot: AssetSlot,
    file: Option<UploadFile>,
) -> AppResult<()> {
    let Some(file) = file else {
        return Ok(());
    };
    let fresh = upload(st, file).await?;
    if let Some(old) = assets.slot_mut(slot).replace(fresh) {
        discard_asset(st, slot, &old).await;
    }
    Ok(())
}
