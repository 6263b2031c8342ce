//! Hello triangle: the smallest useful program, a single triangle with one color per vertex.
//!
//! The colors are interpolated over the triangle by the rasterizer. The vertex stage sources
//! carry no `#version` directive: the backend picks GLSL 3.30 core for them.

use crate::{
  geometry::{Geometry, GeometryData},
  DemoError, Example, InputAction, InputState, LoopFeedback, PlatformServices, CLEAR_COLOR,
};
use prism::context::GraphicsContext;
use prism::shader::Program;
use prism_gl::GL33;

const VS: &str = include_str!("hello-triangle-vs.glsl");
const FS: &str = include_str!("hello-triangle-fs.glsl");

#[rustfmt::skip]
const VERTICES: [f32; 18] = [
  // position       // color
   0.0,  0.5, 0.0,  1.0, 0.0, 1.0,
   0.5, -0.5, 0.0,  1.0, 1.0, 0.0,
  -0.5, -0.5, 0.0,  0.0, 1.0, 1.0,
];

const INDICES: [u32; 3] = [0, 1, 2];

pub struct LocalExample {
  program: Program<GL33>,
  triangle: Geometry,
}

impl Example for LocalExample {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> Result<Self, DemoError> {
    let program = context.new_shader_program().from_strings(VS, FS)?;
    let data = GeometryData::new(VERTICES.to_vec(), &[3, 3], INDICES.to_vec())?;
    let triangle = Geometry::new(context, &data);

    Ok(Self { program, triangle })
  }

  fn render_frame(
    &mut self,
    _input: &InputState,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> LoopFeedback {
    for action in actions {
      if action == InputAction::Quit {
        return LoopFeedback::Exit;
      }
    }

    context.backend().clear_color_buffer(CLEAR_COLOR);
    self.program.activate(context);
    self.triangle.draw();

    LoopFeedback::Continue
  }
}
