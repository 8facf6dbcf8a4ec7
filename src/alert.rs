//! Alert messages shown to the user after a form submission or action.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the base page.

use maud::{Markup, html};

/// A dismissable success or error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The action completed.
    Success { message: String, details: String },
    /// The action failed.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, icon, message, details) = match self {
            Alert::Success { message, details } => (
                "flex items-start gap-3 p-4 mb-4 text-green-800 border border-green-300 \
                rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800",
                "✓",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "flex items-start gap-3 p-4 mb-4 text-red-800 border border-red-300 \
                rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800",
                "!",
                message,
                details,
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    span class="font-bold" aria-hidden="true" { (icon) }

                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="ms-auto text-sm font-semibold"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let alert = Alert::Error {
            message: "Could not delete transaction".to_owned(),
            details: "The transaction could not be found.".to_owned(),
        };

        let fragment = Html::parse_fragment(&alert.into_html().into_string());

        let paragraphs: Vec<String> = fragment
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect())
            .collect();
        assert_eq!(
            paragraphs,
            vec![
                "Could not delete transaction",
                "The transaction could not be found."
            ]
        );
        let alert = fragment
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("alert element missing");
        assert!(alert.value().attr("class").unwrap().contains("text-red-800"));
    }

    #[test]
    fn empty_details_are_omitted() {
        let alert = Alert::Success {
            message: "Done".to_owned(),
            details: String::new(),
        };

        let fragment = Html::parse_fragment(&alert.into_html().into_string());

        assert_eq!(fragment.select(&Selector::parse("p").unwrap()).count(), 1);
    }
}
