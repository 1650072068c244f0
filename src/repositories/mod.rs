//! Repositorios de acceso a datos

pub mod route_repository;

pub use route_repository::{PgRouteRepository, RouteRepository};
