pub mod home;
pub mod oauth;
