//! Defines the endpoint for downloading an attachment's file contents.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    attachment::{get_attachment, get_attachment_data},
    database_id::AttachmentId,
};

/// The state needed to download an attachment.
#[derive(Debug, Clone)]
pub struct DownloadAttachmentState {
    /// The database connection for reading attachments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DownloadAttachmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that serves an attachment's blob with its stored media
/// type and original file name.
pub async fn download_attachment_endpoint(
    State(state): State<DownloadAttachmentState>,
    Path(attachment_id): Path<AttachmentId>,
) -> Result<Response, Error> {
    let (attachment, data) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let attachment = get_attachment(attachment_id, &connection)?;
        let data = get_attachment_data(attachment_id, &connection)?;

        (attachment, data)
    };

    // Quotes in the file name would break the header value.
    let safe_file_name = attachment.file_name.replace('"', "");

    Ok((
        [
            (CONTENT_TYPE, attachment.content_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{safe_file_name}\""),
            ),
        ],
        data,
    )
        .into_response())
}
