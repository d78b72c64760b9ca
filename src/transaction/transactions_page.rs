//! Defines the route handler for the page listing recorded transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::{Transaction, core::count_transactions, core::get_transaction_page},
    view_templates::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, render,
    },
};

/// The max number of graphemes to display in the notes column before
/// truncating and displaying ellipses.
const MAX_NOTES_GRAPHEMES: usize = 32;

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn truncate_notes(notes: &str) -> String {
    let graphemes: Vec<&str> = notes.graphemes(true).collect();

    if graphemes.len() <= MAX_NOTES_GRAPHEMES {
        notes.to_owned()
    } else {
        format!("{}...", graphemes[..MAX_NOTES_GRAPHEMES].concat())
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let detail_route = format_endpoint(endpoints::TRANSACTION_DETAIL_VIEW, transaction.id);
    let edit_route = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_route = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.payee) }
            td class={ (TABLE_CELL_STYLE) " " (amount_class(transaction.amount)) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE) { (truncate_notes(&transaction.notes)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="space-x-4"
                {
                    a href=(detail_route) class=(LINK_STYLE) { "View" }
                    a href=(edit_route) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_route)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-confirm="Delete this transaction and its attachments?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn pagination_html(indicators: &[PaginationIndicator]) -> Markup {
    let page_link = |page: u64, label: String, is_current: bool| {
        let style = if is_current {
            "px-3 py-2 text-blue-600 border border-gray-300 bg-blue-50 dark:border-gray-700 dark:bg-gray-700 dark:text-white"
        } else {
            "px-3 py-2 text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 hover:text-gray-700 dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400"
        };

        html! {
            a href={ (endpoints::TRANSACTIONS_VIEW) "?page=" (page) } class=(style) { (label) }
        }
    };

    html! {
        nav aria-label="Transaction pages" class="flex justify-center py-4"
        {
            div class="inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    @match indicator {
                        PaginationIndicator::BackButton(page) => {
                            (page_link(*page, "Previous".to_owned(), false))
                        }
                        PaginationIndicator::Page(page) => {
                            (page_link(*page, page.to_string(), false))
                        }
                        PaginationIndicator::CurrPage(page) => {
                            (page_link(*page, page.to_string(), true))
                        }
                        PaginationIndicator::Ellipsis => {
                            span class="px-3 py-2 text-gray-500" { "..." }
                        }
                        PaginationIndicator::NextButton(page) => {
                            (page_link(*page, "Next".to_owned(), false))
                        }
                    }
                }
            }
        }
    }
}

fn transactions_view(transactions: &[Transaction], indicators: &[PaginationIndicator]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                @if transactions.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No transactions yet. Record your first one!"
                    }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payee" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }

                    (pagination_html(indicators))
                }
            }
        }
    };

    base("Transactions", &content)
}

/// The query parameters for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// The page of transactions to display, one-based.
    pub page: Option<u64>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page listing recorded transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let page_size = state.pagination_config.default_page_size;
    let requested_page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);

    let (transactions, page, page_count) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction_count = count_transactions(&connection)?;
        let page_count = transaction_count.div_ceil(page_size).max(1);
        // A page number past the end falls back to the last page so the
        // pagination indicators always have a current page.
        let page = requested_page.min(page_count);
        let transactions = get_transaction_page(page, page_size, &connection)?;

        (transactions, page, page_count)
    };

    let indicators =
        create_pagination_indicators(page, page_count, state.pagination_config.max_pages);

    Ok(render(
        StatusCode::OK,
        transactions_view(&transactions, &indicators),
    ))
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Query, State},
        http::StatusCode,
        response::Response,
    };
    use rusqlite::Connection;
    use scraper::Html;
    use time::macros::date;

    use crate::{
        db::initialize,
        pagination::PaginationConfig,
        transaction::{Transaction, create_transaction},
    };

    use super::{TransactionsPageState, TransactionsQuery, get_transactions_page, truncate_notes};

    fn get_test_state() -> TransactionsPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        TransactionsPageState {
            pagination_config: PaginationConfig::default(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn empty_database_shows_empty_state() {
        let state = get_test_state();

        let response = get_transactions_page(State(state), Query(TransactionsQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("No transactions yet."));
    }

    #[tokio::test]
    async fn lists_transactions_in_table() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(-12.34, date!(2025 - 10 - 01), "Greengrocer"),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(1500.0, date!(2025 - 10 - 02), "Employer"),
                &connection,
            )
            .unwrap();
        }

        let response = get_transactions_page(State(state), Query(TransactionsQuery::default()))
            .await
            .unwrap();

        let text = body_text(response).await;
        let document = Html::parse_document(&text);
        let row_selector = scraper::Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&row_selector).count(), 2);
        assert!(text.contains("-$12.34"));
        assert!(text.contains("$1,500.00"));
    }

    #[tokio::test]
    async fn second_page_shows_remaining_transactions() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            // One more than a full page.
            for i in 1..=21 {
                create_transaction(
                    Transaction::build(i as f64, date!(2025 - 10 - 01), ""),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery { page: Some(2) }),
        )
        .await
        .unwrap();

        let text = body_text(response).await;
        let document = Html::parse_document(&text);
        let row_selector = scraper::Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&row_selector).count(), 1);
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped_to_last_page() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            for i in 1..=21 {
                create_transaction(
                    Transaction::build(i as f64, date!(2025 - 10 - 01), ""),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_transactions_page(
            State(state),
            Query(TransactionsQuery {
                page: Some(u64::MAX),
            }),
        )
        .await
        .unwrap();

        let text = body_text(response).await;
        let document = Html::parse_document(&text);
        // Clamped to page 2 of 2, which holds the one leftover transaction.
        let row_selector = scraper::Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&row_selector).count(), 1);
    }

    #[test]
    fn truncate_notes_leaves_short_notes_alone() {
        assert_eq!(truncate_notes("coffee"), "coffee");
    }

    #[test]
    fn truncate_notes_shortens_long_notes() {
        let notes = "a".repeat(100);

        let got = truncate_notes(&notes);

        assert_eq!(got, format!("{}...", "a".repeat(32)));
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        String::from_utf8_lossy(&body).to_string()
    }
}
