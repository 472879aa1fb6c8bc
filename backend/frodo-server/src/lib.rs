pub mod app_state;
pub mod cli;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod stats;
pub mod status;
pub mod stream;


pub use app_state::AppState;
pub use cli::Cli;
pub use error::{Result, ServerError};
pub use routes::build_router;
pub use stats::StatsResponse;
pub use status::{BrokerStatus, CacheStatus};
