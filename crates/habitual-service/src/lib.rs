mod http;
mod traits;

pub use http::HttpService;
pub use traits::{HabitService, ServiceError};
