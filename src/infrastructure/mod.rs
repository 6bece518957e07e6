pub mod cache;
pub mod clients;
pub mod config;
pub mod config_api;
pub mod department_api;
pub mod employee_api;
pub mod event_bus;
pub mod persistence;
pub mod problem;
pub mod product_api;
pub mod server;
pub mod trace;

pub use cache::*;
pub use clients::*;
pub use config::*;
pub use event_bus::*;
pub use persistence::*;
pub use problem::*;
pub use server::*;
