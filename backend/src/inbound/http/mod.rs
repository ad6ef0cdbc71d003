//! HTTP inbound adapters.
//!
//! Only operational endpoints live here; the user-facing CRUD surface is an
//! external layer that drives the domain ports directly.

pub mod health;
