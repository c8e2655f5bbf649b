pub mod admin_dto;
pub mod auth_dto;
pub mod stats_dto;
pub mod user_dto;
