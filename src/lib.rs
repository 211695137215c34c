pub mod canon;
pub mod chapter;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod favorites;
pub mod history;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod preferences;
pub mod search;
pub mod session;
pub mod settings;
pub mod storage;
pub mod ui;
