pub mod counter;
pub mod doctor;
pub mod patient;
pub mod staff;
pub mod user;

pub use counter::*;
pub use doctor::*;
pub use patient::*;
pub use staff::*;
pub use user::*;
