//! [GLFW](https://crates.io/crates/glfw) backend for [prism](https://crates.io/crates/prism).

#![deny(missing_docs)]

use glfw::{self, Context as _, Glfw, InitError, Window, WindowEvent, WindowMode};
use prism::context::GraphicsContext;
pub use prism_gl::gl33::StateQueryError;
use prism_gl::GL33;
use prism_windowing::{CursorMode, WindowDim, WindowOpt};
use std::{error, fmt, os::raw::c_void, sync::mpsc::Receiver};

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// Initialization of the surface went wrong.
  ///
  /// This variant exposes a **glfw** error for further information about what went wrong.
  InitError(InitError),

  /// Fullscreen was requested but no primary monitor is available.
  NoPrimaryMonitor,

  /// The primary monitor has no video mode.
  NoVideoMode,

  /// GLFW failed to create the window or its OpenGL context.
  WindowCreationFailed,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::NoPrimaryMonitor => f.write_str("no primary monitor"),
      GlfwSurfaceError::NoVideoMode => f.write_str("no primary monitor video mode"),
      GlfwSurfaceError::WindowCreationFailed => f.write_str("failed to create GLFW window"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<InitError> for GlfwSurfaceError {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl From<StateQueryError> for GlfwSurfaceError {
  fn from(e: StateQueryError) -> Self {
    GlfwSurfaceError::GraphicsStateError(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
      _ => None,
    }
  }
}

/// GLFW surface.
///
/// This type is a helper that exposes two important concepts: the GLFW event receiver that you can
/// use it with to poll events and the [`GL33Context`], which allows you to perform the rendering
/// part.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped prism context.
  pub context: GL33Context,
}

impl GlfwSurface {
  /// Initialize GLFW to provide a prism environment.
  ///
  /// `create_window` is handed GLFW once the OpenGL 3.3 core hints are set; it must create the
  /// window and make its context current.
  pub fn new(
    create_window: impl FnOnce(
      &mut Glfw,
    ) -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError>,
  ) -> Result<Self, GlfwSurfaceError> {
    #[cfg(feature = "log-errors")]
    let error_cbk = glfw::LOG_ERRORS;
    #[cfg(not(feature = "log-errors"))]
    let error_cbk = glfw::FAIL_ON_ERRORS;

    let mut glfw = glfw::init(error_cbk)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
    glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));

    let (mut window, events_rx) = create_window(&mut glfw)?;

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let gl = GL33::new()?;
    let mut context = GL33Context { window, gl };
    context.set_viewport();

    log::info!(
      "OpenGL context ready, framebuffer {:?}",
      context.framebuffer_size()
    );

    Ok(GlfwSurface { events_rx, context })
  }

  /// Create a window with an OpenGL 3.3 core context, configured with `win_opt`.
  ///
  /// The window polls framebuffer size, key and close events.
  pub fn new_gl33(title: &str, win_opt: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    GlfwSurface::new(|glfw| {
      glfw.window_hint(glfw::WindowHint::Samples(win_opt.num_samples()));

      let (mut window, events_rx) = match *win_opt.dim() {
        WindowDim::Windowed { width, height } => glfw
          .create_window(width, height, title, WindowMode::Windowed)
          .ok_or(GlfwSurfaceError::WindowCreationFailed)?,

        WindowDim::Fullscreen => glfw.with_primary_monitor(|glfw, monitor| {
          let monitor = monitor.ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;
          let mode = monitor
            .get_video_mode()
            .ok_or(GlfwSurfaceError::NoVideoMode)?;

          glfw
            .create_window(mode.width, mode.height, title, WindowMode::FullScreen(monitor))
            .ok_or(GlfwSurfaceError::WindowCreationFailed)
        })?,

        WindowDim::FullscreenRestricted { width, height } => {
          glfw.with_primary_monitor(|glfw, monitor| {
            let monitor = monitor.ok_or(GlfwSurfaceError::NoPrimaryMonitor)?;

            glfw
              .create_window(width, height, title, WindowMode::FullScreen(monitor))
              .ok_or(GlfwSurfaceError::WindowCreationFailed)
          })?
        }
      };

      window.make_current();

      match win_opt.cursor_mode() {
        CursorMode::Visible => window.set_cursor_mode(glfw::CursorMode::Normal),
        CursorMode::Invisible => window.set_cursor_mode(glfw::CursorMode::Hidden),
        CursorMode::Disabled => window.set_cursor_mode(glfw::CursorMode::Disabled),
      }

      window.set_framebuffer_size_polling(true);
      window.set_key_polling(true);
      window.set_close_polling(true);
      glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

      Ok((window, events_rx))
    })
  }
}

/// prism OpenGL 3.3 context.
///
/// This type also re-exports the GLFW window, if you need access to it.
#[derive(Debug)]
pub struct GL33Context {
  /// Wrapped GLFW window.
  pub window: Window,

  /// OpenGL 3.3 state.
  gl: GL33,
}

impl GL33Context {
  /// Size of the window’s framebuffer, in pixels.
  pub fn framebuffer_size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w.max(0) as u32, h.max(0) as u32]
  }

  /// Make the viewport cover the whole framebuffer.
  ///
  /// Call it whenever the framebuffer is resized.
  pub fn set_viewport(&mut self) {
    let (w, h) = self.window.get_framebuffer_size();
    self.gl.set_viewport([0, 0, w, h]);
  }

  /// Clear the framebuffer with `color`.
  pub fn clear(&mut self, color: [f32; 4]) {
    self.gl.clear_color_buffer(color);
  }
}

unsafe impl GraphicsContext for GL33Context {
  type Backend = GL33;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }
}
