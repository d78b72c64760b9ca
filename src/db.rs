//! Creates the application database schema.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    attachment::{create_attachment_data_table, create_attachment_table},
    transaction::create_transaction_table,
};

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// Foreign key enforcement is switched on for the connection, so deleting a
/// transaction also removes its attachments and their file data.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&sql_transaction)?;
    create_attachment_table(&sql_transaction)?;
    create_attachment_data_table(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let mut statement = connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let table_names: Vec<String> = statement
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .collect();

        for want in ["attachment", "attachment_data", "transaction"] {
            assert!(
                table_names.iter().any(|name| name == want),
                "want table {want}, got tables {table_names:?}"
            );
        }
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Second initialize should succeed");
    }

    #[test]
    fn enforces_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let result = connection.execute(
            "INSERT INTO attachment (transaction_id, file_name, content_type)
             VALUES (999, 'receipt.png', 'image/png')",
            (),
        );

        assert!(
            result.is_err(),
            "inserting an attachment with a dangling transaction ID should fail"
        );
    }
}
