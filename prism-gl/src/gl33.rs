//! OpenGL 3.3 backend.
//!
//! This module implements an OpenGL 3.3 backend for prism. The backend type is [`GL33`].

mod shader;
mod state;

pub use self::shader::{Program, Stage, UniformLocation};
pub use self::state::GLState;
pub use self::state::StateQueryError;
use gl::types::*;
use std::cell::RefCell;
use std::rc::Rc;

/// An OpenGL 3.3 backend.
///
/// This type is to be used as a prism backend type. It implements the whole shader API.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend.
  ///
  /// An OpenGL context must be current on the calling thread and its function pointers loaded.
  /// Only one backend can be created per thread.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL33 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Set the viewport (`[x, y, width, height]`).
  pub fn set_viewport(&mut self, viewport: [GLint; 4]) {
    unsafe { self.state.borrow_mut().set_viewport(viewport) }
  }

  /// Clear the color buffer of the bound framebuffer with `color`.
  pub fn clear_color_buffer(&mut self, color: [GLfloat; 4]) {
    unsafe {
      self.state.borrow_mut().set_clear_color(color);
      gl::Clear(gl::COLOR_BUFFER_BIT);
    }
  }

  /// Internal access to the backend state.
  ///
  /// # Unsafety
  ///
  /// This method is **highly unsafe** as it exposes the internals of the backend. Playing with it
  /// should be done with extreme caution.
  pub unsafe fn state(&self) -> &Rc<RefCell<GLState>> {
    &self.state
  }
}
