//! Type families installed into a [`Scheme`](crate::scheme::Scheme).
//!
//! Each submodule exposes an `add_to_scheme` function which registers every
//! kind of its family.

pub mod apiserver;
pub mod builtin;
pub mod config;
