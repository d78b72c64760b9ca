//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The format of dates submitted by `<input type="date">` elements.
const FORM_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

use crate::{
    AppState, Error,
    alert::Alert,
    attachment::{UploadedFile, create_attachment, is_empty_file_field, read_uploaded_file},
    endpoints,
    timezone::local_date_today,
    transaction::{TransactionBuilder, core::create_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The parsed fields of the new transaction form.
#[derive(Debug, Default)]
struct TransactionForm {
    payee: String,
    amount: Option<f64>,
    date: Option<Date>,
    notes: String,
    files: Vec<UploadedFile>,
}

/// A route handler for recording a new transaction, redirects to the
/// transactions view on success.
///
/// The form arrives as multipart data so that any chosen attachment files
/// come along with the transaction fields. The transaction and its
/// attachments are stored atomically.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    multipart: Multipart,
) -> Response {
    let form = match parse_transaction_form(multipart).await {
        Ok(form) => form,
        Err(error) => {
            tracing::error!("Failed to parse transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let (amount, date) = match (form.amount, form.date) {
        (Some(amount), Some(date)) => (amount, date),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "An amount and a date are required.".to_owned(),
                }
                .into_html(),
            )
                .into_response();
        }
    };

    let today = match local_date_today(&state.local_timezone) {
        Some(today) => today,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    if date > today {
        return Error::FutureDate(date).into_alert_response();
    }

    let builder = TransactionBuilder {
        payee: form.payee,
        amount,
        date,
        notes: form.notes,
    };

    if let Err(error) = store_transaction(builder, form.files, &state) {
        tracing::error!("Could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

async fn parse_transaction_form(mut multipart: Multipart) -> Result<TransactionForm, Error> {
    let mut form = TransactionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        match name.as_str() {
            "attachments" => {
                if is_empty_file_field(&field) {
                    continue;
                }

                form.files.push(read_uploaded_file(field).await?);
            }
            "amount" => {
                form.amount = field_text(field).await?.trim().parse().ok();
            }
            "date" => {
                let text = field_text(field).await?;
                form.date = Date::parse(text.trim(), FORM_DATE_FORMAT).ok();
            }
            "payee" => form.payee = field_text(field).await?,
            "notes" => form.notes = field_text(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))
}

fn store_transaction(
    builder: TransactionBuilder,
    files: Vec<UploadedFile>,
    state: &CreateTransactionState,
) -> Result<(), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = create_transaction(builder, &sql_transaction)?;

    for file in files {
        create_attachment(file.into_new_attachment(transaction.id), &sql_transaction)?;
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
        attachment::{UploadedFile, get_attachments_for_transaction},
        db::initialize,
        transaction::{Transaction, TransactionBuilder, get_transaction},
    };

    use super::{CreateTransactionState, store_transaction};

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        CreateTransactionState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[test]
    fn stores_transaction_with_attachments() {
        let state = get_test_state();
        let builder = TransactionBuilder {
            payee: "Supermarket".to_owned(),
            amount: -56.78,
            date: date!(2025 - 10 - 01),
            notes: "weekly shop".to_owned(),
        };
        let files = vec![UploadedFile {
            file_name: "receipt.png".to_owned(),
            content_type: "image/png".to_owned(),
            data: vec![1, 2, 3],
        }];

        store_transaction(builder, files, &state).expect("Could not store transaction");

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.payee, "Supermarket");
        assert_eq!(transaction.amount, -56.78);
        let attachments = get_attachments_for_transaction(transaction.id, &connection).unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "receipt.png");
    }

    #[test]
    fn stores_transaction_without_attachments() {
        let state = get_test_state();

        store_transaction(
            Transaction::build(100.0, date!(2025 - 09 - 15), "Refund"),
            Vec::new(),
            &state,
        )
        .expect("Could not store transaction");

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 100.0);
        assert!(
            get_attachments_for_transaction(transaction.id, &connection)
                .unwrap()
                .is_empty()
        );
    }
}
