pub mod handlers;
pub mod routes;
pub mod service;
pub mod state;

pub use routes::{api_router, app_router, StaticAssets};
pub use service::TodoService;
pub use state::{build_store, AppState};
