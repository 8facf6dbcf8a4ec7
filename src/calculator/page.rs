//! Defines the calculator page and the endpoint its keys post to.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

use super::core::{Calculator, Key, Operator, format_value};

const DIGIT_BUTTON_STYLE: &str = "h-16 rounded-full text-lg font-medium bg-white \
    dark:bg-gray-800 text-gray-900 dark:text-white hover:bg-gray-100 dark:hover:bg-gray-700";
const FUNCTION_BUTTON_STYLE: &str = "h-16 rounded-full text-lg font-medium bg-gray-200 \
    dark:bg-gray-700 text-gray-900 dark:text-white hover:bg-gray-300 dark:hover:bg-gray-600";
const OPERATOR_BUTTON_STYLE: &str = "h-16 rounded-full text-lg font-medium bg-blue-500 \
    dark:bg-blue-600 text-white hover:bg-blue-600 dark:hover:bg-blue-500";

/// The keys in the order they are laid out, with their style.
const KEYPAD: [(&str, &str); 20] = [
    ("C", FUNCTION_BUTTON_STYLE),
    ("+/-", FUNCTION_BUTTON_STYLE),
    ("%", FUNCTION_BUTTON_STYLE),
    ("÷", OPERATOR_BUTTON_STYLE),
    ("7", DIGIT_BUTTON_STYLE),
    ("8", DIGIT_BUTTON_STYLE),
    ("9", DIGIT_BUTTON_STYLE),
    ("×", OPERATOR_BUTTON_STYLE),
    ("4", DIGIT_BUTTON_STYLE),
    ("5", DIGIT_BUTTON_STYLE),
    ("6", DIGIT_BUTTON_STYLE),
    ("-", OPERATOR_BUTTON_STYLE),
    ("1", DIGIT_BUTTON_STYLE),
    ("2", DIGIT_BUTTON_STYLE),
    ("3", DIGIT_BUTTON_STYLE),
    ("+", OPERATOR_BUTTON_STYLE),
    ("mod", FUNCTION_BUTTON_STYLE),
    ("0", DIGIT_BUTTON_STYLE),
    (".", DIGIT_BUTTON_STYLE),
    ("=", OPERATOR_BUTTON_STYLE),
];

/// The calculator state posted by the page along with the pressed key.
#[derive(Debug, Deserialize)]
pub struct CalculatorForm {
    /// The key that was pressed.
    pub key: String,
    pub display: String,
    #[serde(default)]
    pub secondary_display: String,
    #[serde(default)]
    pub operation: Option<Operator>,
    #[serde(default)]
    pub previous_value: Option<Decimal>,
    #[serde(default)]
    pub should_reset: bool,
    #[serde(default)]
    pub awaiting_operand: bool,
}

impl CalculatorForm {
    fn into_parts(self) -> (String, Calculator) {
        (
            self.key,
            Calculator {
                display: self.display,
                secondary_display: self.secondary_display,
                operation: self.operation,
                previous_value: self.previous_value,
                should_reset: self.should_reset,
                awaiting_operand: self.awaiting_operand,
            },
        )
    }
}

/// The calculator widget, a form that replaces itself with the new state on
/// every key press.
fn calculator_widget(calculator: &Calculator) -> Markup {
    html! {
        form
            id="calculator"
            hx-post=(endpoints::CALCULATOR_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-80 rounded-2xl overflow-hidden bg-gray-100 dark:bg-gray-900"
        {
            input type="hidden" name="display" value=(calculator.display);
            input type="hidden" name="secondary_display" value=(calculator.secondary_display);
            @if let Some(operation) = calculator.operation {
                input type="hidden" name="operation" value=(operation.symbol());
            }
            @if let Some(previous_value) = calculator.previous_value {
                input type="hidden" name="previous_value" value=(format_value(previous_value));
            }
            input type="hidden" name="should_reset" value=(calculator.should_reset.to_string());
            input type="hidden" name="awaiting_operand" value=(calculator.awaiting_operand.to_string());

            div class="px-6 pt-8 pb-6 bg-white dark:bg-gray-800"
            {
                div
                    class="h-6 mb-1 text-right text-sm font-mono text-gray-500 dark:text-gray-400"
                    data-secondary-display="true"
                {
                    (calculator.secondary_display)
                }
                output
                    class="block text-right text-4xl font-semibold text-gray-900 dark:text-white overflow-x-auto"
                    data-display="true"
                {
                    (calculator.display)
                }
            }

            div class="grid grid-cols-4 gap-3 p-4"
            {
                @for (key, style) in KEYPAD {
                    button type="submit" name="key" value=(key) class=(style) { (key) }
                }
            }
        }
    }
}

/// Renders the calculator page.
pub async fn get_calculator_page() -> Response {
    let nav_bar = NavBar::new(endpoints::CALCULATOR_VIEW).into_html();
    let widget = calculator_widget(&Calculator::default());

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Calculator" }

            (widget)
        }
    };

    base("Calculator", &[], &content).into_response()
}

/// A route handler for a calculator key press, responds with the updated
/// calculator widget.
pub async fn press_calculator_key(Form(form): Form<CalculatorForm>) -> Response {
    let (key, mut calculator) = form.into_parts();

    let key = match key.parse::<Key>() {
        Ok(key) => key,
        Err(error) => {
            tracing::debug!("rejected calculator key: {error}");
            return error.into_alert_response();
        }
    };

    calculator.press(key);

    calculator_widget(&calculator).into_response()
}
