//! The form fields shared by the create and edit transaction pages.

use maud::{Markup, html};
use time::Date;

use crate::view_templates::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE};

/// Prefilled values for the transaction form.
pub struct TransactionFormDefaults<'a> {
    pub payee: Option<&'a str>,
    pub amount: Option<f64>,
    pub date: Date,
    pub notes: Option<&'a str>,
    pub max_date: Date,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.00"
                required
                autofocus
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="payee"
                class=(FORM_LABEL_STYLE)
            {
                "Payee"
            }

            input
                name="payee"
                id="payee"
                type="text"
                placeholder="Who the money went to"
                value=[defaults.payee]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="notes"
                class=(FORM_LABEL_STYLE)
            {
                "Notes"
            }

            textarea
                name="notes"
                id="notes"
                rows="4"
                placeholder="Notes"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @if let Some(notes) = defaults.notes { (notes) }
            }
        }
    }
}
