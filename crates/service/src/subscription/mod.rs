//! Subscriptions: domain types, repository contract and lifecycle rules.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{CreateSubscription, NewSubscription, Subscription, SumFilter, SumQuery, UpdateSubscription};
pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
