//! Defines the endpoint for uploading attachments to an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Path, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    attachment::{NewAttachment, create_attachment},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
};

/// A file read out of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// The name of the uploaded file.
    pub file_name: String,
    /// The media type reported by the client, or "application/octet-stream".
    pub content_type: String,
    /// The raw file contents.
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Convert the upload into a [NewAttachment] for `transaction_id`.
    pub fn into_new_attachment(self, transaction_id: TransactionId) -> NewAttachment {
        NewAttachment {
            transaction_id,
            file_name: self.file_name,
            content_type: self.content_type,
            data: self.data,
        }
    }
}

/// Read one file field of a multipart form into memory.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingFileName] if the field carries no file name,
/// - or [Error::MultipartError] if the field's bytes cannot be read.
pub async fn read_uploaded_file(field: Field<'_>) -> Result<UploadedFile, Error> {
    let file_name = field
        .file_name()
        .filter(|file_name| !file_name.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(Error::MissingFileName)?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();

    let data = field
        .bytes()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
        .to_vec();

    Ok(UploadedFile {
        file_name,
        content_type,
        data,
    })
}

/// Whether a multipart field is a file input the user left empty.
///
/// Browsers submit file inputs with no selection as a field with an empty
/// file name, which should be skipped rather than treated as an upload.
pub(crate) fn is_empty_file_field(field: &Field<'_>) -> bool {
    field.file_name().is_none_or(|file_name| file_name.is_empty())
}

/// The state needed to upload attachments.
#[derive(Debug, Clone)]
pub struct UploadAttachmentsState {
    /// The database connection for managing attachments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UploadAttachmentsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for attaching files to an existing transaction.
///
/// All files are stored in a single SQL transaction, so either every upload
/// is saved or none are. Redirects to the transaction's detail view on
/// success.
pub async fn upload_attachments_endpoint(
    State(state): State<UploadAttachmentsState>,
    Path(transaction_id): Path<TransactionId>,
    mut multipart: Multipart,
) -> Response {
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::error!("Failed to read multipart field: {error}");
                return Error::MultipartError(error.to_string()).into_alert_response();
            }
        };

        if is_empty_file_field(&field) {
            continue;
        }

        match read_uploaded_file(field).await {
            Ok(file) => files.push(file),
            Err(error) => {
                tracing::error!("Failed to read uploaded file: {error}");
                return error.into_alert_response();
            }
        }
    }

    if files.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Alert::ErrorSimple {
                message: "Select a file to attach first.".to_owned(),
            }
            .into_html(),
        )
            .into_response();
    }

    if let Err(error) = store_files(transaction_id, files, &state) {
        tracing::error!("Could not store attachments for transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(format_endpoint(
            endpoints::TRANSACTION_DETAIL_VIEW,
            transaction_id,
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn store_files(
    transaction_id: TransactionId,
    files: Vec<UploadedFile>,
    state: &UploadAttachmentsState,
) -> Result<(), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let sql_transaction = connection.unchecked_transaction()?;

    for file in files {
        create_attachment(file.into_new_attachment(transaction_id), &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{UploadedFile, UploadAttachmentsState, store_files};

    fn get_test_state() -> UploadAttachmentsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        UploadAttachmentsState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[test]
    fn store_files_saves_all_files() {
        let state = get_test_state();
        let transaction_id = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(-5.0, date!(2025 - 10 - 01), "Stationery"),
                &connection,
            )
            .unwrap()
            .id
        };
        let files = vec![
            UploadedFile {
                file_name: "receipt.png".to_owned(),
                content_type: "image/png".to_owned(),
                data: vec![1, 2, 3],
            },
            UploadedFile {
                file_name: "invoice.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                data: vec![4, 5, 6],
            },
        ];

        store_files(transaction_id, files, &state).expect("Could not store files");

        let connection = state.db_connection.lock().unwrap();
        let attachments =
            crate::attachment::get_attachments_for_transaction(transaction_id, &connection)
                .unwrap();
        assert_eq!(attachments.len(), 2);
    }

    #[test]
    fn store_files_rolls_back_on_dangling_transaction() {
        let state = get_test_state();
        let files = vec![UploadedFile {
            file_name: "receipt.png".to_owned(),
            content_type: "image/png".to_owned(),
            data: vec![1, 2, 3],
        }];

        let result = store_files(999, files, &state);

        assert!(result.is_err());
        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM attachment", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "failed upload should not leave rows behind");
    }
}
