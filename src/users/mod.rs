pub mod domain;
mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
pub mod services;
