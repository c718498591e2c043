//! User-facing messages for operation outcomes

use core_library::LibraryError;
use core_runtime::events::Notification;

pub const LOGIN_SUCCEEDED: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Invalid credentials";
pub const SIGNED_OUT: &str = "Signed out";
pub const CATALOG_LOAD_FAILED: &str = "Failed to load songs";
pub const UPLOAD_SUCCEEDED: &str = "Song uploaded successfully!";
pub const UPLOAD_INCOMPLETE: &str = "Please fill all fields and upload files";
pub const UPLOAD_FAILED: &str = "Failed to upload song";
pub const TRACK_DELETED: &str = "Song deleted";
pub const DOWNLOAD_STARTED: &str = "Download started!";
pub const PLAYLIST_CREATED: &str = "Playlist created!";
pub const ALREADY_IN_PLAYLIST: &str = "Song already in this playlist";
pub const REMOVED_FROM_PLAYLIST: &str = "Removed from playlist";
pub const SIGN_IN_REQUIRED: &str = "Please sign in first";
pub const NOT_PERMITTED: &str = "You don't have permission to do that";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again";

/// Default error notification for a failed library operation
pub fn failure(err: &LibraryError) -> Notification {
    let message = match err {
        LibraryError::InvalidInput { message, .. } => message.clone(),
        LibraryError::AuthRequired => SIGN_IN_REQUIRED.to_string(),
        LibraryError::Forbidden(_) => NOT_PERMITTED.to_string(),
        LibraryError::NotFound { entity_type, .. } => {
            format!("That {} no longer exists", entity_type)
        }
        LibraryError::Duplicate { .. } => ALREADY_IN_PLAYLIST.to_string(),
        LibraryError::InvalidRecord { .. } | LibraryError::Persistence(_) => {
            GENERIC_FAILURE.to_string()
        }
    };
    Notification::error(message)
}

/// Upload failures collapse validation into one prompt
pub fn upload_failure(err: &LibraryError) -> Notification {
    match err {
        LibraryError::InvalidInput { .. } => Notification::error(UPLOAD_INCOMPLETE),
        LibraryError::InvalidRecord { .. } | LibraryError::Persistence(_) => {
            Notification::error(UPLOAD_FAILED)
        }
        other => failure(other),
    }
}

pub fn added_to_playlist(track_title: &str, playlist_name: &str) -> Notification {
    Notification::success(format!(
        "Added \"{}\" to \"{}\"",
        track_title, playlist_name
    ))
}
