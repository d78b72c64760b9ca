//! Defines the route handler for viewing a single transaction and its
//! attachments.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Response,
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    attachment::{Attachment, get_attachments_for_transaction},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    navigation::NavBar,
    transaction::{Transaction, core::get_transaction},
    view_templates::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, render,
    },
};

fn attachment_row(attachment: &Attachment) -> Markup {
    let download_route = format_endpoint(endpoints::ATTACHMENT_DOWNLOAD, attachment.id);
    let delete_route = format_endpoint(endpoints::DELETE_ATTACHMENT, attachment.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (attachment.file_name) }
            td class=(TABLE_CELL_STYLE) { (attachment.content_type) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(download_route) class=(LINK_STYLE) { "Download" }
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_route)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-confirm="Delete this attachment?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn detail_view(transaction: &Transaction, attachments: &[Attachment]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let edit_route = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_route = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let upload_route = format_endpoint(endpoints::POST_ATTACHMENTS, transaction.id);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-2xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transaction" }

                    div class="space-x-4"
                    {
                        a href=(edit_route) class=(LINK_STYLE) { "Edit" }

                        button
                            hx-delete=(delete_route)
                            hx-confirm="Delete this transaction and its attachments?"
                            hx-target-error="#alert-container"
                            // Deleting from the detail page leaves nothing to
                            // look at, so go back to the listing.
                            "hx-on::after-request"="if(event.detail.successful) window.location='/transactions'"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }

                dl class="grid grid-cols-[max-content_1fr] gap-x-8 gap-y-2"
                {
                    dt class="font-medium" { "Payee" }
                    dd { (transaction.payee) }

                    dt class="font-medium" { "Amount" }
                    dd { (format_currency(transaction.amount)) }

                    dt class="font-medium" { "Date" }
                    dd { (transaction.date) }

                    dt class="font-medium" { "Notes" }
                    dd class="whitespace-pre-wrap" { (transaction.notes) }
                }

                h2 class="text-lg font-bold" { "Attachments" }

                @if attachments.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" { "No attachments." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "File" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for attachment in attachments {
                                (attachment_row(attachment))
                            }
                        }
                    }
                }

                form
                    hx-post=(upload_route)
                    hx-encoding="multipart/form-data"
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div
                    {
                        label for="attachments" class=(FORM_LABEL_STYLE) { "Add attachments" }

                        input
                            name="attachments"
                            id="attachments"
                            type="file"
                            multiple
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload" }
                }
            }
        }
    };

    base("Transaction", &content)
}

/// The state needed for the transaction detail page.
#[derive(Debug, Clone)]
pub struct TransactionDetailPageState {
    /// The database connection for reading transactions and attachments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the detail page for a transaction, including its attachments.
pub async fn get_transaction_detail_page(
    State(state): State<TransactionDetailPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let (transaction, attachments) = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = get_transaction(transaction_id, &connection)?;
        let attachments = get_attachments_for_transaction(transaction_id, &connection)?;

        (transaction, attachments)
    };

    Ok(render(
        StatusCode::OK,
        detail_view(&transaction, &attachments),
    ))
}
