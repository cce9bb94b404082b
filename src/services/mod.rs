pub mod counter_service;
pub mod identifier_service;
pub mod profile_service;
pub mod role_registry;
pub mod user_service;

pub use profile_service::*;
pub use user_service::*;
