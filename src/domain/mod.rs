//! Domain layer containing business entities and the persistence contract.
//!
//! This module defines what a short link *is* and what the allocation engine
//! requires from storage, independent of any database or HTTP concern.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures ([`entities::ShortKey`], [`entities::UrlMapping`])
//! - [`repositories`] - The [`repositories::MappingStore`] contract
//! - [`errors`] - Store and allocation error taxonomy
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Storage traits define contracts implemented by the infrastructure layer
//! - Allocation logic lives in [`crate::application::services`]

pub mod entities;
pub mod errors;
pub mod repositories;
