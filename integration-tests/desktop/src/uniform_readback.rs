//! A value set through `set_uniform` is what the driver reads back.

use crate::common;
use gl::types::*;
use prism::context::GraphicsContext as _;
use prism::shader::types::Vec4;
use std::ffi::CString;

pub fn fixture() {
  let mut surface = common::surface("fixture-uniform-readback");
  let context = &mut surface.context;

  let mut program = context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, common::UNIFORM_COLOR_FS)
    .expect("program");

  program.activate(context);
  let color = Vec4::new(0.25f32, 0.5, 0.75, 1.);
  assert!(program.set_uniform(context, "color", color));
  assert!(!program.set_uniform(context, "colour", color));

  let handle = common::current_program();
  assert_ne!(handle, 0, "no program in use after activation");

  let name = CString::new("color").unwrap();
  let mut read_back = [0. as GLfloat; 4];

  unsafe {
    let location = gl::GetUniformLocation(handle, name.as_ptr());
    assert!(location >= 0);
    gl::GetUniformfv(handle, location, read_back.as_mut_ptr());
  }

  if read_back != [0.25, 0.5, 0.75, 1.] {
    panic!("uniform read back as {:?}", read_back);
  }
}
