//! Alert partials for displaying error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element via htmx
//! out-of-band swaps so that endpoints can report failures without a full
//! page reload.

use maud::{Markup, html};

const ALERT_ERROR_STYLE: &str = "flex items-center p-4 mb-4 text-red-800 \
    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// A message displayed to the user after a failed action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action failed.
    Error {
        /// Short headline, e.g. "Could not delete transaction".
        message: String,
        /// Explanatory text shown under the headline.
        details: String,
    },
    /// The action failed, no extra detail to give.
    ErrorSimple {
        /// Short headline.
        message: String,
    },
}

impl Alert {
    /// Render the alert as a partial targetting the alert container.
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::ErrorSimple { message } => (message, String::new()),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(ALERT_ERROR_STYLE) role="alert"
                {
                    div
                    {
                        span class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="text-sm" { (details) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn error_alert_targets_alert_container() {
        let html = Alert::Error {
            message: "Could not delete transaction".to_owned(),
            details: "The transaction could not be found.".to_owned(),
        }
        .into_html()
        .into_string();

        assert!(html.contains("id=\"alert-container\""));
        assert!(html.contains("hx-swap-oob"));
        assert!(html.contains("Could not delete transaction"));
        assert!(html.contains("The transaction could not be found."));
    }

    #[test]
    fn simple_error_alert_has_no_details_paragraph() {
        let html = Alert::ErrorSimple {
            message: "Select a file to attach first.".to_owned(),
        }
        .into_html()
        .into_string();

        assert!(html.contains("Select a file to attach first."));
        assert!(!html.contains("<p"));
    }
}
