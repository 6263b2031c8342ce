//! Two programs built from identical sources draw identical pixels.

use crate::common;
use prism::context::GraphicsContext as _;
use prism::shader::types::Vec4;

const CLEAR_COLOR: [f32; 4] = [0., 0., 0., 1.];

pub fn fixture() {
  let mut surface = common::surface("fixture-pixel-readback");
  let context = &mut surface.context;

  let mut first = context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, common::UNIFORM_COLOR_FS)
    .expect("first program");
  let mut second = context
    .new_shader_program()
    .from_strings(common::FULLSCREEN_VS, common::UNIFORM_COLOR_FS)
    .expect("second program");

  let color = Vec4::new(1.0f32, 0.5, 0., 1.);
  let mut pixels = Vec::new();

  for program in [&mut first, &mut second] {
    context.clear(CLEAR_COLOR);
    program.activate(context);
    program.set_uniform(context, "color", color);
    common::draw_fullscreen(context);
    pixels.push(common::center_pixel(context));
  }

  if pixels[0] != pixels[1] {
    panic!("identical programs drew {:?} and {:?}", pixels[0], pixels[1]);
  }

  if pixels[0] == [0, 0, 0, 255] {
    panic!("nothing was drawn");
  }
}
