//! prism demos.
//!
//! This project provides a set of small shader program demos that can be run by any platform code
//! able to hand out an OpenGL 3.3 graphics context. The demos are platform-agnostic on purpose:
//! they never see system events or windows, only the abstract [`InputAction`]s and the
//! [`InputState`] the platform feeds them.
//!
//! # Demo architecture
//!
//! Demos are simple modules exposed from this crate. Each one allocates its programs and geometry
//! in [`Example::bootstrap`] and renders one frame per [`Example::render_frame`] call. Resources
//! are released when the demo is dropped.

use prism::context::GraphicsContext;
use prism::shader::ProgramError;
use prism_gl::GL33;
use std::{error, fmt, path::PathBuf};

pub mod geometry;
pub mod hello_triangle;
pub mod shader_offset;
pub mod two_triangles;

use geometry::GeometryError;

/// Directory holding the demo shader files shipped with this crate.
pub const DEFAULT_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

/// Color the framebuffer is cleared with before each frame.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.];

/// Demo interface.
pub trait Example: Sized {
  /// Bootstrap the demo.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> Result<Self, DemoError>;

  /// Render a frame of the demo.
  ///
  /// `input` is the state of the held inputs for this frame; `actions` are the one-shot actions
  /// that happened since the previous frame.
  fn render_frame(
    &mut self,
    input: &InputState,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> LoopFeedback;
}

/// Services a platform provides to demos.
pub trait PlatformServices {
  /// Path of the shader file called `name`.
  fn shader_path(&self, name: &str) -> PathBuf;
}

/// A direction input.
///
/// Variants are declared in precedence order: when several directions are held, the first one
/// wins.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
  /// Typically bound to W.
  Up,
  /// Typically bound to A.
  Left,
  /// Typically bound to S.
  Down,
  /// Typically bound to D.
  Right,
}

impl Direction {
  const ALL: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Down,
    Direction::Right,
  ];

  fn index(self) -> usize {
    match self {
      Direction::Up => 0,
      Direction::Left => 1,
      Direction::Down => 2,
      Direction::Right => 3,
    }
  }
}

/// A type used to pass “inputs” to demos.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Rebuild shader programs from their sources.
  Reload,

  /// A direction started being held.
  Pressed(Direction),

  /// A direction stopped being held.
  Released(Direction),
}

/// Per-frame input state.
///
/// Platforms update it with every [`InputAction`] they produce and pass it to each frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InputState {
  held: [bool; 4],
}

impl InputState {
  /// Track a new action.
  pub fn apply(&mut self, action: InputAction) {
    match action {
      InputAction::Pressed(dir) => self.held[dir.index()] = true,
      InputAction::Released(dir) => self.held[dir.index()] = false,
      _ => (),
    }
  }

  /// Whether `dir` is currently held.
  pub fn is_held(&self, dir: Direction) -> bool {
    self.held[dir.index()]
  }

  /// The held direction with the highest precedence, if any.
  pub fn direction(&self) -> Option<Direction> {
    Direction::ALL.iter().copied().find(|dir| self.is_held(*dir))
  }
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback {
  Continue,
  Exit,
}

/// Errors demos can fail to bootstrap with.
#[derive(Debug)]
pub enum DemoError {
  /// A shader program could not be built.
  Program(ProgramError),
  /// Geometry data was rejected.
  Geometry(GeometryError),
}

impl fmt::Display for DemoError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DemoError::Program(ref e) => write!(f, "cannot build program: {}", e),
      DemoError::Geometry(ref e) => write!(f, "invalid geometry: {}", e),
    }
  }
}

impl error::Error for DemoError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      DemoError::Program(e) => Some(e),
      DemoError::Geometry(e) => Some(e),
    }
  }
}

impl From<ProgramError> for DemoError {
  fn from(e: ProgramError) -> Self {
    DemoError::Program(e)
  }
}

impl From<GeometryError> for DemoError {
  fn from(e: GeometryError) -> Self {
    DemoError::Geometry(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nothing_held_by_default() {
    assert_eq!(InputState::default().direction(), None);
  }

  #[test]
  fn press_and_release() {
    let mut input = InputState::default();

    input.apply(InputAction::Pressed(Direction::Down));
    assert!(input.is_held(Direction::Down));
    assert_eq!(input.direction(), Some(Direction::Down));

    input.apply(InputAction::Reload);
    assert_eq!(input.direction(), Some(Direction::Down));

    input.apply(InputAction::Released(Direction::Down));
    assert_eq!(input.direction(), None);
  }

  #[test]
  fn direction_precedence() {
    let mut input = InputState::default();

    input.apply(InputAction::Pressed(Direction::Right));
    input.apply(InputAction::Pressed(Direction::Down));
    assert_eq!(input.direction(), Some(Direction::Down));

    input.apply(InputAction::Pressed(Direction::Left));
    assert_eq!(input.direction(), Some(Direction::Left));

    input.apply(InputAction::Pressed(Direction::Up));
    assert_eq!(input.direction(), Some(Direction::Up));

    input.apply(InputAction::Released(Direction::Up));
    input.apply(InputAction::Released(Direction::Left));
    assert_eq!(input.direction(), Some(Direction::Down));
  }
}
