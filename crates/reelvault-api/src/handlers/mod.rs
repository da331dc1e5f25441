pub mod health;
pub mod register;
pub mod upload_auth;
pub mod videos;
