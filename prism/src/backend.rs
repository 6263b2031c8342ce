//! Backend interfacing.
//!
//! Everything in here is `unsafe` to implement and to call: it is the contract between the
//! typed, safe API of this crate and whatever graphics technology sits behind it.

pub mod shader;
