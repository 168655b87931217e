//! SQLite storage for the Netherlink panel.
//!
//! Provides persistence for launcher assets, the Java runtime singleton,
//! API keys, news, and the HWID ledger.

mod db;
mod models;
mod queries_assets;
mod queries_hwid;
mod queries_keys;
mod queries_news;


pub use db::PanelDatabase;
pub use models::*;
pub use queries_hwid::{
    DEFAULT_SEARCH_LIMIT, HwidSearchPage, HwidSearchParams, MAX_SEARCH_LIMIT, NewHwidLog,
};
