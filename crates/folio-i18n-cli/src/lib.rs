pub mod commands;
pub mod errors;
pub mod ui;
