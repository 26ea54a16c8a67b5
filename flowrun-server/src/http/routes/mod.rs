//! Route handlers organized by resource

pub mod flows;
pub mod health;
pub mod ui;
