pub mod auth;
pub mod features;
pub mod uploads;
pub mod users;
