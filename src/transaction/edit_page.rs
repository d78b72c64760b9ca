//! Defines the route handler for the page for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    navigation::NavBar,
    timezone::local_date_today,
    transaction::{
        Transaction,
        core::get_transaction,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, loading_spinner, render,
    },
};

fn edit_transaction_view(transaction: &Transaction, max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let spinner = loading_spinner();
    let update_route = format_endpoint(endpoints::PUT_TRANSACTION, transaction.id);
    let detail_route = format_endpoint(endpoints::TRANSACTION_DETAIL_VIEW, transaction.id);
    let defaults = TransactionFormDefaults {
        payee: Some(&transaction.payee),
        amount: Some(transaction.amount),
        date: transaction.date,
        notes: Some(&transaction.notes),
        max_date,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (transaction_form_fields(&defaults))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Changes"
                }

                a href=(detail_route) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &content)
}

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_transaction(transaction_id, &connection)?
    };

    let max_date = local_date_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    Ok(render(
        StatusCode::OK,
        edit_transaction_view(&transaction, max_date),
    ))
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Path, State},
        http::StatusCode,
        response::Response,
    };
    use rusqlite::Connection;
    use scraper::Html;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    fn get_test_state() -> EditTransactionPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        EditTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn edit_page_prefills_form() {
        let state = get_test_state();
        let transaction_id = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(-12.5, date!(2025 - 10 - 01), "Bookshop").notes("paperback"),
                &connection,
            )
            .unwrap()
            .id
        };

        let response = get_edit_transaction_page(State(state), Path(transaction_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html(response).await;

        let amount_selector = scraper::Selector::parse("input[name=amount]").unwrap();
        let amount = document.select(&amount_selector).next().unwrap();
        assert_eq!(amount.value().attr("value"), Some("-12.50"));

        let payee_selector = scraper::Selector::parse("input[name=payee]").unwrap();
        let payee = document.select(&payee_selector).next().unwrap();
        assert_eq!(payee.value().attr("value"), Some("Bookshop"));

        let form_selector = scraper::Selector::parse("form").unwrap();
        let form = document.select(&form_selector).next().unwrap();
        assert_eq!(
            form.value().attr("hx-put"),
            Some(format!("/api/transactions/{transaction_id}").as_str())
        );
    }

    #[tokio::test]
    async fn edit_page_for_missing_transaction_returns_not_found() {
        let state = get_test_state();

        let result = get_edit_transaction_page(State(state), Path(999)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }
}
