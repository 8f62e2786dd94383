// Data contracts exchanged with the backend

pub mod activity;
pub mod common;
pub mod friend;
pub mod place;
pub mod user;

pub use activity::*;
pub use common::*;
pub use friend::*;
pub use place::*;
pub use user::*;
