pub mod seed_service;
pub mod signup_service;
