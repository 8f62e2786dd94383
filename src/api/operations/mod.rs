// Backend operations
// Each file adds the endpoints of one resource to `ApiClient`

pub mod activity;
pub mod friend;
pub mod health;
pub mod place;
pub mod user;
