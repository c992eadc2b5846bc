pub mod app;
pub mod fetch;
pub mod render;
pub mod stations;
pub mod traffic;
pub mod trips;
