//! Domain types of the checkout: the order form, its validation rules,
//! payment tokens, and the ports the workflow talks through.

pub mod order;
pub mod payment;
pub mod ports;
pub mod validation;
