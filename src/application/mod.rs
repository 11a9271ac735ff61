//! Application layer
//!
//! Use cases that drive the invoice draft and the saved-invoice history.

pub mod invoice;
