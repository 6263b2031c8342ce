//! Stages never outlive program construction, whatever the outcome.

use crate::common;
use prism::context::GraphicsContext as _;
use prism::shader::ProgramError;

// fragment input the vertex stage doesn’t write
const UNMATCHED_FS: &str = "in vec3 normal;
out vec4 frag;

void main() {
  frag = vec4(normal, 1.);
}";

const PROBE: u32 = 256;

pub fn fixture() {
  let mut surface = common::surface("fixture-stage-cleanup");
  let context = &mut surface.context;

  assert_eq!(common::live_names(PROBE), (0, 0));

  match context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, UNMATCHED_FS)
  {
    Err(ProgramError::LinkFailed(log)) => println!("link failed as expected: {}", log),
    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("program linked with an unmatched varying"),
  }

  let (shaders, programs) = common::live_names(PROBE);
  if (shaders, programs) != (0, 0) {
    panic!(
      "{} shaders and {} programs leaked after a link failure",
      shaders, programs
    );
  }

  let program = context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, common::UNIFORM_COLOR_FS)
    .expect("program");

  assert_eq!(common::live_names(PROBE), (0, 1));

  program.destroy();

  assert_eq!(common::live_names(PROBE), (0, 0));
}
