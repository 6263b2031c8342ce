//! OpenGL backends.
//!
//! This crate exports [OpenGL](https://www.khronos.org/opengl/) backends for
//! [prism](https://crates.io/crates/prism). Pick a _backend type_ (for now, only [`GL33`]) and
//! wrap it in a graphics context, or let a windowing crate do it for you.

pub mod gl33;

pub use gl33::GL33;
