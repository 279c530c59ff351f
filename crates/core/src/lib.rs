//! `databox-core`: shared domain building blocks.
//!
//! Identifiers, the domain error model and numeric guards used by every other
//! crate. No IO, no async, no infrastructure concerns.

pub mod entity;
pub mod error;
pub mod id;
pub mod number;

pub use entity::{Entity, position_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, Sku};
pub use number::{non_negative_finite, round_half_up};
