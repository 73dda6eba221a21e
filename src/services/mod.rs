// src/services/mod.rs
pub mod camera;
pub mod capture;
pub mod chat_log;
pub mod frame;
pub mod relay_client;
pub mod vision_client;
