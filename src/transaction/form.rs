//! The form fields shared by the create and edit transaction pages, and the
//! validation of the submitted form.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, format_amount,
    },
    ledger::parse_amount,
    transaction::{Transaction, TransactionBuilder},
};

/// Category names offered as suggestions in the form.
pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Food",
    "Transport",
    "Housing",
    "Leisure",
    "Health",
    "Education",
    "Shopping",
    "Travel",
    "Salary",
    "Investment",
];

/// Payment methods offered as suggestions in the form.
pub const SUGGESTED_PAYMENT_METHODS: [&str; 5] =
    ["Card", "Cash", "Transfer", "Cheque", "Direct debit"];

/// Whether the amount entered in the form leaves or enters the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money leaving the account.
    Debit,
    /// Money entering the account.
    Credit,
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether `amount` is a debit or a credit.
    pub kind: TransactionKind,
    /// The amount as typed by the user.
    pub amount: String,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub notes: String,
    /// An optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// An optional payment method label.
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl TransactionForm {
    /// Check the form and convert it into the fields of a transaction.
    ///
    /// The amount goes to the side chosen by `kind`, the other side is zero.
    /// Blank category and payment method labels are stored as none.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyNotes] if the notes are empty or only whitespace,
    /// - or [Error::InvalidAmount] if the amount is not greater than zero.
    pub fn validate(self) -> Result<TransactionBuilder, Error> {
        let notes = self.notes.trim();
        if notes.is_empty() {
            return Err(Error::EmptyNotes);
        }

        let amount = parse_amount(&self.amount);
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(self.amount));
        }

        let builder = Transaction::build(self.date, notes)
            .category(non_blank(self.category))
            .payment_method(non_blank(self.payment_method));

        Ok(match self.kind {
            TransactionKind::Debit => builder.debit(amount),
            TransactionKind::Credit => builder.credit(amount),
        })
    }
}

fn non_blank(label: Option<String>) -> Option<String> {
    label
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
}

/// The values the form fields start with.
pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionKind,
    pub amount: Option<Decimal>,
    pub date: Date,
    pub notes: Option<&'a str>,
    pub category: Option<&'a str>,
    pub payment_method: Option<&'a str>,
    pub autofocus_amount: bool,
}

impl<'a> TransactionFormDefaults<'a> {
    /// Defaults for a new transaction on `date`.
    pub fn new_transaction(date: Date) -> Self {
        Self {
            kind: TransactionKind::Debit,
            amount: None,
            date,
            notes: None,
            category: None,
            payment_method: None,
            autofocus_amount: true,
        }
    }

    /// Defaults that show the current values of `transaction`.
    ///
    /// A transaction with both a debit and a credit is shown by its larger side.
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        let (kind, amount) = if transaction.credit > transaction.debit {
            (TransactionKind::Credit, transaction.credit)
        } else {
            (TransactionKind::Debit, transaction.debit)
        };

        Self {
            kind,
            amount: Some(amount),
            date: transaction.date,
            notes: Some(&transaction.notes),
            category: transaction.category.as_deref(),
            payment_method: transaction.payment_method.as_deref(),
            autofocus_amount: false,
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_debit = matches!(defaults.kind, TransactionKind::Debit);
    let amount_str = defaults.amount.map(format_amount);

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-debit"
                        type="radio"
                        value="debit"
                        checked[is_debit]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-debit"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Debit"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-credit"
                        type="radio"
                        value="credit"
                        checked[!is_debit]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-credit"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Credit"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
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
                value=(defaults.date)
                required
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

            input
                name="notes"
                id="notes"
                type="text"
                placeholder="What was this for?"
                value=[defaults.notes]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                list="category-suggestions"
                placeholder="Optional"
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-suggestions"
            {
                @for category in SUGGESTED_CATEGORIES {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label
                for="payment_method"
                class=(FORM_LABEL_STYLE)
            {
                "Payment method"
            }

            input
                name="payment_method"
                id="payment_method"
                type="text"
                list="payment-method-suggestions"
                placeholder="Optional"
                value=[defaults.payment_method]
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="payment-method-suggestions"
            {
                @for payment_method in SUGGESTED_PAYMENT_METHODS {
                    option value=(payment_method) {}
                }
            }
        }
    }
}
