//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costy GPU commands if we know the target value is
/// already set to what the command tries to set.
#[derive(Debug)]
struct Cached<T>(T)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  fn new(initial: T) -> Self {
    Cached(initial)
  }

  fn set(&mut self, value: T) {
    self.0 = value;
  }

  /// A cached value is invalid if it’s not equal ([`PartialEq`]) to the input value.
  fn is_invalid(&self, new_val: &T) -> bool {
    self.0 != *new_val
  }
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It adds a small cache layer
/// over the low-level API to prevent from issuing the same API call (with the same parameters).
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // viewport
  viewport: Cached<[GLint; 4]>,

  // clear buffers
  clear_color: Cached<[GLfloat; 4]>,

  // vertex arrays
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Get a `GLState` from the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let viewport = Cached::new(get_ctx_viewport()?);
      let clear_color = Cached::new(get_ctx_clear_color()?);
      let bound_vertex_array = get_ctx_bound_vertex_array()?;
      let current_program = get_ctx_current_program()?;

      Ok(GLState {
        _a: PhantomData,
        viewport,
        clear_color,
        bound_vertex_array,
        current_program,
      })
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  /// Bind a vertex array object, skipping the call if it is already bound.
  pub unsafe fn bind_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;
    }
  }

  /// Forget about a vertex array object that is about to be deleted.
  pub fn forget_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array == handle {
      self.bound_vertex_array = 0;
    }
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }
  }

  // deleting the program in use doesn’t unbind it on the GL side, but its name can be recycled
  pub(crate) fn forget_program(&mut self, handle: GLuint) {
    if self.current_program == handle {
      self.current_program = 0;
    }
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The [`GLState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one state on the same thread, for instance.
  UnavailableGLState,
  /// The OpenGL context reported an error while being queried.
  ContextError(GLenum),
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::ContextError(e) => write!(f, "OpenGL error while querying state: 0x{:x}", e),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn check_ctx_error() -> Result<(), StateQueryError> {
  match gl::GetError() {
    gl::NO_ERROR => Ok(()),
    e => Err(StateQueryError::ContextError(e)),
  }
}

unsafe fn get_ctx_viewport() -> Result<[GLint; 4], StateQueryError> {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  check_ctx_error()?;
  Ok(data)
}

unsafe fn get_ctx_clear_color() -> Result<[GLfloat; 4], StateQueryError> {
  let mut data = [0.; 4];
  gl::GetFloatv(gl::COLOR_CLEAR_VALUE, data.as_mut_ptr());
  check_ctx_error()?;
  Ok(data)
}

unsafe fn get_ctx_bound_vertex_array() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound);
  check_ctx_error()?;
  Ok(bound as GLuint)
}

unsafe fn get_ctx_current_program() -> Result<GLuint, StateQueryError> {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  check_ctx_error()?;
  Ok(used as GLuint)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cached_values() {
    let mut cached = Cached::new([0, 0, 800, 600]);

    assert!(!cached.is_invalid(&[0, 0, 800, 600]));
    assert!(cached.is_invalid(&[0, 0, 1600, 1200]));

    cached.set([0, 0, 1600, 1200]);
    assert!(!cached.is_invalid(&[0, 0, 1600, 1200]));
    assert!(cached.is_invalid(&[0, 0, 800, 600]));
  }

  #[test]
  fn state_query_error_display() {
    assert_eq!(
      StateQueryError::UnavailableGLState.to_string(),
      "unavailable graphics state"
    );
    assert_eq!(
      StateQueryError::ContextError(gl::INVALID_OPERATION).to_string(),
      "OpenGL error while querying state: 0x502"
    );
  }
}
