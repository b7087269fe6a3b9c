pub mod config;
pub mod debounce;
pub mod fotmob_provider;
pub mod history;
pub mod http;
pub mod input;
pub mod mock_provider;
pub mod provider;
pub mod state;
pub mod suggest;
