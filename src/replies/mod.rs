mod handlers;
mod service;
mod types;

pub use handlers::*;
pub use service::*;
pub use types::*;
