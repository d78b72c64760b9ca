//! Defines the core data model and database queries for attachments.
//!
//! Attachment metadata and the blob contents live in separate tables so that
//! listing a transaction's attachments never reads the file data. Both tables
//! hang off the transaction table with cascading deletes, so removing a
//! transaction removes its files too.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::{AttachmentId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// A file attached to a transaction, e.g. a receipt scan.
///
/// This is metadata only. The file contents are fetched separately with
/// [get_attachment_data].
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// The ID of the attachment.
    pub id: AttachmentId,
    /// The ID of the transaction this file belongs to.
    pub transaction_id: TransactionId,
    /// The name of the uploaded file, e.g. "receipt.png".
    pub file_name: String,
    /// The media type reported for the uploaded file, e.g. "image/png".
    pub content_type: String,
}

/// An attachment that has not been saved to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    /// The ID of the transaction the file belongs to.
    pub transaction_id: TransactionId,
    /// The name of the uploaded file.
    pub file_name: String,
    /// The media type reported for the uploaded file.
    pub content_type: String,
    /// The raw file contents.
    pub data: Vec<u8>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store an attachment and its file contents.
///
/// The metadata row and the blob row are written back to back, so callers
/// that need atomicity should wrap the call in an SQL transaction (the upload
/// endpoints do).
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransaction] if the transaction ID does not refer to a real transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_attachment(new: NewAttachment, connection: &Connection) -> Result<Attachment, Error> {
    connection
        .execute(
            "INSERT INTO attachment (transaction_id, file_name, content_type)
             VALUES (?1, ?2, ?3)",
            (new.transaction_id, &new.file_name, &new.content_type),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidTransaction(new.transaction_id),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    connection.execute(
        "INSERT INTO attachment_data (attachment_id, data) VALUES (?1, ?2)",
        (id, &new.data),
    )?;

    Ok(Attachment {
        id,
        transaction_id: new.transaction_id,
        file_name: new.file_name,
        content_type: new.content_type,
    })
}

/// Retrieve an attachment's metadata by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid attachment,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_attachment(id: AttachmentId, connection: &Connection) -> Result<Attachment, Error> {
    connection
        .prepare(
            "SELECT id, transaction_id, file_name, content_type FROM attachment WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_attachment_row)
        .map_err(|error| error.into())
}

/// Retrieve the metadata of all attachments belonging to a transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_attachments_for_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<Attachment>, Error> {
    connection
        .prepare(
            "SELECT id, transaction_id, file_name, content_type FROM attachment
             WHERE transaction_id = :transaction_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":transaction_id", &transaction_id)], map_attachment_row)?
        .map(|maybe_attachment| maybe_attachment.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the raw file contents of an attachment.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid attachment,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_attachment_data(id: AttachmentId, connection: &Connection) -> Result<Vec<u8>, Error> {
    connection
        .prepare("SELECT data FROM attachment_data WHERE attachment_id = :id")?
        .query_one(&[(":id", &id)], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the attachment metadata table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_attachment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS attachment (
            id INTEGER PRIMARY KEY,
            transaction_id INTEGER NOT NULL,
            file_name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            FOREIGN KEY(transaction_id) REFERENCES \"transaction\"(id)
                ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_attachment_transaction ON attachment(transaction_id);",
    )?;

    Ok(())
}

/// Create the attachment file data table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_attachment_data_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS attachment_data (
            attachment_id INTEGER PRIMARY KEY,
            data BLOB NOT NULL,
            FOREIGN KEY(attachment_id) REFERENCES attachment(id)
                ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

fn map_attachment_row(row: &Row) -> Result<Attachment, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_id = row.get(1)?;
    let file_name = row.get(2)?;
    let content_type = row.get(3)?;

    Ok(Attachment {
        id,
        transaction_id,
        file_name,
        content_type,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        attachment::{
            NewAttachment, create_attachment, get_attachment, get_attachment_data,
            get_attachments_for_transaction,
        },
        database_id::TransactionId,
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_transaction(conn: &Connection) -> TransactionId {
        create_transaction(
            Transaction::build(-9.99, date!(2025 - 10 - 01), "Hardware store"),
            conn,
        )
        .expect("Could not create test transaction")
        .id
    }

    fn receipt(transaction_id: TransactionId) -> NewAttachment {
        NewAttachment {
            transaction_id,
            file_name: "receipt.png".to_owned(),
            content_type: "image/png".to_owned(),
            data: vec![0x89, 0x50, 0x4E, 0x47],
        }
    }

    #[test]
    fn create_stores_metadata_and_data() {
        let conn = get_test_connection();
        let transaction_id = create_test_transaction(&conn);

        let attachment =
            create_attachment(receipt(transaction_id), &conn).expect("Could not create attachment");

        assert!(attachment.id > 0);
        assert_eq!(attachment.transaction_id, transaction_id);
        assert_eq!(attachment.file_name, "receipt.png");
        assert_eq!(attachment.content_type, "image/png");

        let data = get_attachment_data(attachment.id, &conn).expect("Could not get file data");
        assert_eq!(data, vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn create_fails_on_dangling_transaction_id() {
        let conn = get_test_connection();

        let result = create_attachment(receipt(999), &conn);

        assert_eq!(result, Err(Error::InvalidTransaction(999)));
    }

    #[test]
    fn get_succeeds() {
        let conn = get_test_connection();
        let transaction_id = create_test_transaction(&conn);
        let inserted = create_attachment(receipt(transaction_id), &conn).unwrap();

        let got = get_attachment(inserted.id, &conn);

        assert_eq!(got, Ok(inserted));
    }

    #[test]
    fn get_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        let got = get_attachment(123, &conn);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn lists_attachments_for_transaction_only() {
        let conn = get_test_connection();
        let first_transaction = create_test_transaction(&conn);
        let second_transaction = create_test_transaction(&conn);
        let first = create_attachment(receipt(first_transaction), &conn).unwrap();
        create_attachment(receipt(second_transaction), &conn).unwrap();

        let got = get_attachments_for_transaction(first_transaction, &conn)
            .expect("Could not list attachments");

        assert_eq!(got, vec![first]);
    }

    #[test]
    fn deleting_transaction_cascades_to_attachments() {
        let conn = get_test_connection();
        let transaction_id = create_test_transaction(&conn);
        let attachment = create_attachment(receipt(transaction_id), &conn).unwrap();

        conn.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1",
            [transaction_id],
        )
        .unwrap();

        assert_eq!(get_attachment(attachment.id, &conn), Err(Error::NotFound));
        assert_eq!(
            get_attachment_data(attachment.id, &conn),
            Err(Error::NotFound)
        );
    }
}
