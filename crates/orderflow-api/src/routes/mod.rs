//! Route modules organized by resource.

pub mod health;
pub mod items;
pub mod order_lines;
pub mod orders;
