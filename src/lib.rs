//! Two-tier leave approval service: a storage-agnostic workflow engine plus
//! its MySQL adapters and actix-web surface.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod model;
pub mod repository;
pub mod routes;
pub mod workflow;
