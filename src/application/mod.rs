pub mod dto;
pub mod idempotency;
pub mod use_cases;

pub use dto::*;
pub use idempotency::*;
pub use use_cases::*;
