//! Catalog access through the gateway
//!
//! Loading maps backend rows into [`Track`]s and drops rows that fail
//! validation, so one corrupt record cannot hide the rest of the catalog.
//! Uploads and deletions are admin-only.

use bridge_traits::gateway::{AssetKind, CatalogGateway};
use core_auth::AuthState;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{LibraryError, Result};
use crate::models::{AssetPayload, Track, TrackUpload};

/// Result of loading the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedCatalog {
    /// Valid tracks, newest first
    pub tracks: Vec<Track>,
    /// Number of rows dropped by validation
    pub skipped: usize,
}

pub struct CatalogService {
    gateway: Arc<dyn CatalogGateway>,
}

impl CatalogService {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch every track, newest first.
    #[instrument(skip(self))]
    pub async fn load_tracks(&self) -> Result<LoadedCatalog> {
        let records = self.gateway.fetch_tracks().await?;
        let total = records.len();

        let mut tracks = Vec::with_capacity(total);
        for record in records {
            match Track::try_from(record) {
                Ok(track) => tracks.push(track),
                Err(err) => warn!(error = %err, "Skipping invalid catalog row"),
            }
        }
        tracks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skipped = total - tracks.len();
        debug!(count = tracks.len(), skipped, "Loaded catalog");
        Ok(LoadedCatalog { tracks, skipped })
    }

    /// Store both assets and insert the track row.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` / `Forbidden` unless the caller is an admin
    /// - `InvalidInput` if a field is blank or a file is missing
    /// - `Persistence` if an upload or the insert fails
    #[instrument(skip(self, auth, upload), fields(title = %upload.title))]
    pub async fn upload_track(&self, auth: &AuthState, upload: TrackUpload) -> Result<Track> {
        let principal = auth.require_admin()?;
        let (image, audio) = upload.validate()?;

        let owner = principal.user_id();
        let image_path = asset_path(owner, image);
        let audio_path = asset_path(owner, audio);

        let (image_url, audio_url) = futures::try_join!(
            self.gateway
                .upload_asset(AssetKind::Image, &image_path, image.data.clone()),
            self.gateway
                .upload_asset(AssetKind::Audio, &audio_path, audio.data.clone()),
        )?;
        debug!(image_path = %image_path, audio_path = %audio_path, "Uploaded track assets");

        let record = upload.into_record(image_url, audio_url, owner);
        let track = Track::try_from(self.gateway.create_track_record(record).await?)?;

        info!(track_id = %track.id, "Uploaded track");
        Ok(track)
    }

    /// Remove a track from the catalog.
    #[instrument(skip(self, auth))]
    pub async fn delete_track(&self, auth: &AuthState, track_id: &str) -> Result<()> {
        auth.require_admin()?;

        if track_id.trim().is_empty() {
            return Err(LibraryError::invalid_input("track_id", "must not be empty"));
        }

        self.gateway
            .delete_track(track_id)
            .await
            .map_err(|err| match err {
                e if e.is_not_found() => LibraryError::not_found("track", track_id),
                e => e.into(),
            })?;

        info!(track_id, "Deleted track");
        Ok(())
    }
}

/// Storage path of an upload: `<owner>/<random id>.<ext>`
fn asset_path(owner: &str, asset: &AssetPayload) -> String {
    format!("{}/{}.{}", owner, Uuid::new_v4(), asset.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_layout() {
        let path = asset_path("admin-1", &AssetPayload::new("Cover.PNG", vec![1]));

        let (owner, file) = path.split_once('/').unwrap();
        assert_eq!(owner, "admin-1");
        let (id, ext) = file.rsplit_once('.').unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(ext, "png");
    }
}
