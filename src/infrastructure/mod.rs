pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod state;

pub use state::AppState;
