//! Modelos del dominio y de almacenamiento

pub mod persisted_route;
pub mod route_template;

pub use persisted_route::*;
pub use route_template::*;
