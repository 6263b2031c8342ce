//! Graphics context.
//!
//! A graphics context is an object that abstracts all the low-level operations that happen on a
//! graphics device (it can be a GPU or a software implementation, for instance).
//!
//! This crate doesn’t create contexts. You must do it yourself or rely on a windowing crate
//! doing it for you.
//!
//! # On context and threads
//!
//!   - An object which type implements [`GraphicsContext`] must be `!Send` and `!Sync`: it cannot
//!     be moved nor shared between threads.
//!   - You can only create a single context per thread. Doing otherwise is undefined behavior.
//!   - Every resource created with a context (stages, programs) must be used on the thread that
//!     owns the context.

use crate::backend::shader::Shader;
use crate::shader::ProgramBuilder;

/// Class of graphics context.
///
/// Such a context must not be Send nor Sync, which means that you cannot share it between
/// threads in any way (move / borrow).
pub unsafe trait GraphicsContext {
  /// Backend the context gives access to.
  type Backend: ?Sized;

  /// Access the underlying backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Start building a new shader program.
  fn new_shader_program(&mut self) -> ProgramBuilder<'_, Self>
  where
    Self::Backend: Shader,
  {
    ProgramBuilder::new(self)
  }
}
