//! A stage that doesn’t compile is reported with its type and a bounded log.

use crate::common;
use prism::context::GraphicsContext as _;
use prism::shader::{ProgramError, StageError, StageType, MAX_INFO_LOG_LEN};

// enough errors to produce a log longer than the bound
fn broken_vertex_source() -> String {
  let mut src = String::from("void main() {\n");

  for i in 0..200 {
    src.push_str(&format!("  undeclared_{} = 1.;\n", i));
  }

  src.push('}');
  src
}

pub fn fixture() {
  let mut surface = common::surface("fixture-compile-error");
  let context = &mut surface.context;

  match context
    .new_shader_program()
    .from_strings(broken_vertex_source(), common::UNIFORM_COLOR_FS)
  {
    Err(ProgramError::StageError(StageError::CompilationFailed(StageType::VertexShader, log))) => {
      assert!(!log.is_empty(), "empty compiler log");
      assert!(log.chars().count() <= MAX_INFO_LOG_LEN, "unbounded compiler log");
    }

    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("broken vertex stage compiled"),
  }

  match context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, "void main() { frag = ; }")
  {
    Err(ProgramError::StageError(e)) => assert_eq!(e.stage_type(), StageType::FragmentShader),
    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("broken fragment stage compiled"),
  }
}
