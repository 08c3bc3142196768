//! Service catalog: the named products subscriptions point at.

pub mod repository;
pub mod service;

pub use repository::{Service, ServiceRepository};
pub use service::{CreateService, ServiceCatalog};
