//! Defines the endpoint for deleting an attachment.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{AppState, Error, database_id::AttachmentId};

/// The state needed to delete an attachment.
#[derive(Debug, Clone)]
pub struct DeleteAttachmentState {
    /// The database connection for managing attachments.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAttachmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an attachment.
///
/// On success the response replaces the attachment's table row with nothing,
/// which is how htmx removes the row from the page.
pub async fn delete_attachment_endpoint(
    State(state): State<DeleteAttachmentState>,
    Path(attachment_id): Path<AttachmentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_alert_response(),
    };

    match delete_attachment(attachment_id, &connection) {
        // The status code has to be 200 OK or HTMX will not remove the table row.
        Ok(()) => (StatusCode::OK, html! {}).into_response(),
        Err(error @ Error::DeleteMissingAttachment) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete attachment {attachment_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Delete an attachment by ID. The blob row goes with it via the cascading
/// foreign key.
fn delete_attachment(id: AttachmentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM attachment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAttachment);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        attachment::{NewAttachment, create_attachment, get_attachment, get_attachment_data},
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::delete_attachment;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn deletes_attachment_and_data() {
        let connection = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(-1.0, date!(2025 - 10 - 01), "Dairy"),
            &connection,
        )
        .unwrap();
        let attachment = create_attachment(
            NewAttachment {
                transaction_id: transaction.id,
                file_name: "receipt.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                data: vec![1, 2, 3],
            },
            &connection,
        )
        .unwrap();

        let result = delete_attachment(attachment.id, &connection);

        assert_eq!(result, Ok(()));
        assert_eq!(
            get_attachment(attachment.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_attachment_data(attachment.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn deleting_missing_attachment_fails() {
        let connection = get_test_connection();

        let result = delete_attachment(42, &connection);

        assert_eq!(result, Err(Error::DeleteMissingAttachment));
    }
}
