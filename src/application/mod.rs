//! Application layer orchestrating the checkout.
//!
//! `CheckoutController` sequences validation, tokenization and order hand-off
//! for a single page, reaching the outside world only through the domain ports.

pub mod controller;
