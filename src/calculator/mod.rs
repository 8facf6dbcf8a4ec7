//! A four-function calculator served as an htmx widget.

mod core;
mod page;

pub use page::{get_calculator_page, press_calculator_key};
