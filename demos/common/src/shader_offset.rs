//! A triangle moved around with uniforms.
//!
//! The shader sources are read from `shader.vert` and `shader.frag` in the platform shader
//! directory. Holding a direction moves the triangle by a fixed step per frame through the
//! `xOffset` and `yOffset` uniforms. The reload action rebuilds the program from disk; a broken
//! edit is logged and the previous program keeps being used.

use crate::{
  geometry::{Geometry, GeometryData},
  DemoError, Direction, Example, InputAction, InputState, LoopFeedback, PlatformServices,
  CLEAR_COLOR,
};
use prism::context::GraphicsContext;
use prism::shader::Program;
use prism_gl::GL33;

/// Distance covered per frame while a direction is held.
pub const STEP: f32 = 0.005;

#[rustfmt::skip]
const VERTICES: [f32; 18] = [
  // position       // color
   0.0,  0.5, 0.0,  1.0, 0.0, 1.0,
   0.5, -0.5, 0.0,  1.0, 1.0, 0.0,
  -0.5, -0.5, 0.0,  0.0, 1.0, 1.0,
];

const INDICES: [u32; 3] = [0, 1, 2];

/// Offset after one frame of `input`. Only one direction is applied per frame.
pub fn step_offset(offset: [f32; 2], input: &InputState) -> [f32; 2] {
  let [x, y] = offset;

  match input.direction() {
    Some(Direction::Up) => [x, y + STEP],
    Some(Direction::Left) => [x - STEP, y],
    Some(Direction::Down) => [x, y - STEP],
    Some(Direction::Right) => [x + STEP, y],
    None => offset,
  }
}

pub struct LocalExample {
  program: Program<GL33>,
  triangle: Geometry,
  offset: [f32; 2],
}

impl Example for LocalExample {
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> Result<Self, DemoError> {
    let program = context.new_shader_program().from_files(
      platform.shader_path("shader.vert"),
      platform.shader_path("shader.frag"),
    )?;
    let data = GeometryData::new(VERTICES.to_vec(), &[3, 3], INDICES.to_vec())?;
    let triangle = Geometry::new(context, &data);

    Ok(Self {
      program,
      triangle,
      offset: [0., 0.],
    })
  }

  fn render_frame(
    &mut self,
    input: &InputState,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> LoopFeedback {
    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::Reload => match self.program.reload(context) {
          Ok(()) => log::info!("shaders reloaded"),
          Err(e) => log::warn!("cannot reload shaders, keeping the previous ones: {}", e),
        },

        _ => (),
      }
    }

    self.offset = step_offset(self.offset, input);
    let [x, y] = self.offset;

    context.backend().clear_color_buffer(CLEAR_COLOR);
    self.program.activate(context);
    self.program.set_uniform(context, "xOffset", x);
    self.program.set_uniform(context, "yOffset", y);
    self.triangle.draw();

    LoopFeedback::Continue
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::DEFAULT_SHADER_DIR;
  use prism::shader::ProgramSources;
  use std::path::Path;

  #[test]
  fn steps_follow_the_held_direction() {
    let mut input = InputState::default();
    assert_eq!(step_offset([0., 0.], &input), [0., 0.]);

    input.apply(InputAction::Pressed(Direction::Right));
    assert_eq!(step_offset([0., 0.], &input), [STEP, 0.]);

    input.apply(InputAction::Pressed(Direction::Down));
    assert_eq!(step_offset([0., 0.], &input), [0., -STEP]);

    input.apply(InputAction::Pressed(Direction::Up));
    assert_eq!(step_offset([0., 0.], &input), [0., STEP]);
  }

  #[test]
  fn offset_accumulates_over_frames() {
    let mut input = InputState::default();
    input.apply(InputAction::Pressed(Direction::Left));

    let offset = (0..10).fold([0., 0.], |offset, _| step_offset(offset, &input));

    assert!((offset[0] + 10. * STEP).abs() < 1e-6);
    assert_eq!(offset[1], 0.);
  }

  #[test]
  fn shipped_shaders_declare_the_offsets() {
    let dir = Path::new(DEFAULT_SHADER_DIR);
    let sources =
      ProgramSources::from_files(dir.join("shader.vert"), dir.join("shader.frag")).unwrap();

    assert!(sources.declares_uniform("xOffset"));
    assert!(sources.declares_uniform("yOffset"));
  }

  #[test]
  fn geometry_is_valid() {
    let data = GeometryData::new(VERTICES.to_vec(), &[3, 3], INDICES.to_vec()).unwrap();
    assert_eq!(data.vertex_count(), 3);
  }
}
