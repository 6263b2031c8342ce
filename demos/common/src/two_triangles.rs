//! Two groups of triangles drawn with two programs.
//!
//! Both programs share the same vertex stage, compiled once, and differ by their fragment stage,
//! each of which outputs a constant color.

use crate::{
  geometry::{Geometry, GeometryData},
  DemoError, Example, InputAction, InputState, LoopFeedback, PlatformServices, CLEAR_COLOR,
};
use prism::context::GraphicsContext;
use prism::shader::{Program, ProgramError, Stage, StageType};
use prism_gl::GL33;

const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;

void main() {
  gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}";

const PRIMARY_FS: &str = "#version 330 core
out vec4 FragColor;

void main() {
  FragColor = vec4(0.07f, 0.13f, 0.36f, 1.0f);
}";

const SECONDARY_FS: &str = "#version 330 core
out vec4 FragColor;

void main() {
  FragColor = vec4(0.17f, 0.47f, 0.70f, 1.0f);
}";

#[rustfmt::skip]
const LEFT_VERTICES: [f32; 24] = [
  -0.6,  0.7, 0.0,
  -0.6, -0.7, 0.0,
  -0.3, -0.7, 0.0,
   0.3,  0.7, 0.0,
   0.6,  0.7, 0.0,
   0.3, -0.7, 0.0,
  -0.6,  0.5, 0.0,
   0.6, -0.5, 0.0,
];

#[rustfmt::skip]
const RIGHT_VERTICES: [f32; 24] = [
  -0.6,  0.7, 0.0,
  -0.3,  0.7, 0.0,
  -0.3, -0.7, 0.0,
   0.6,  0.7, 0.0,
   0.3, -0.7, 0.0,
   0.6, -0.7, 0.0,
  -0.6,  0.5, 0.0,
   0.6, -0.5, 0.0,
];

const LEFT_INDICES: [u32; 9] = [0, 1, 2, 3, 4, 5, 5, 6, 7];
const RIGHT_INDICES: [u32; 9] = [0, 1, 2, 3, 4, 5, 1, 6, 7];

pub struct LocalExample {
  // (program, geometry) pairs, drawn in order
  passes: Vec<(Program<GL33>, Geometry)>,
}

impl Example for LocalExample {
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = GL33>,
  ) -> Result<Self, DemoError> {
    let vs = Stage::new(context, StageType::VertexShader, VS).map_err(ProgramError::from)?;
    let primary_fs =
      Stage::new(context, StageType::FragmentShader, PRIMARY_FS).map_err(ProgramError::from)?;
    let secondary_fs =
      Stage::new(context, StageType::FragmentShader, SECONDARY_FS).map_err(ProgramError::from)?;

    let primary = context.new_shader_program().from_stages(&vs, &primary_fs)?;
    let secondary = context
      .new_shader_program()
      .from_stages(&vs, &secondary_fs)?;

    let left = GeometryData::new(LEFT_VERTICES.to_vec(), &[3], LEFT_INDICES.to_vec())?;
    let right = GeometryData::new(RIGHT_VERTICES.to_vec(), &[3], RIGHT_INDICES.to_vec())?;

    let passes = vec![
      (primary, Geometry::new(context, &left)),
      (secondary, Geometry::new(context, &right)),
    ];

    Ok(Self { passes })
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

    for (program, geometry) in &self.passes {
      program.activate(context);
      geometry.draw();
    }

    LoopFeedback::Continue
  }
}
