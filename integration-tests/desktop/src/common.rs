//! Helpers shared by the fixtures.

use gl::types::*;
use prism::context::GraphicsContext as _;
use prism_glfw::{GL33Context, GlfwSurface};
use prism_windowing::{WindowDim, WindowOpt};

/// Vertex stage covering the whole viewport with a single triangle, without any attribute.
pub const FULLSCREEN_VS: &str = "const vec2[3] CORNERS = vec2[](vec2(-1., -1.), vec2(3., -1.), vec2(-1., 3.));

void main() {
  gl_Position = vec4(CORNERS[gl_VertexID], 0., 1.);
}";

/// Fragment stage writing the `color` uniform.
pub const UNIFORM_COLOR_FS: &str = "uniform vec4 color;
out vec4 frag;

void main() {
  frag = color;
}";

pub fn surface(name: &str) -> GlfwSurface {
  let dim = WindowDim::Windowed {
    width: 64,
    height: 64,
  };

  GlfwSurface::new_gl33(name, WindowOpt::default().set_dim(dim)).expect("GLFW surface")
}

/// Name of the program in use, as seen by the driver.
pub fn current_program() -> GLuint {
  let mut handle: GLint = 0;
  unsafe { gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut handle) };
  handle as GLuint
}

/// Number of live shader and program names among the first `probe` names.
pub fn live_names(probe: GLuint) -> (usize, usize) {
  let shaders = (1..=probe)
    .filter(|&name| unsafe { gl::IsShader(name) } == gl::TRUE)
    .count();
  let programs = (1..=probe)
    .filter(|&name| unsafe { gl::IsProgram(name) } == gl::TRUE)
    .count();

  (shaders, programs)
}

/// Draw a viewport-sized triangle with the active program.
pub fn draw_fullscreen(context: &mut GL33Context) {
  let state = unsafe { context.backend().state().clone() };
  let mut vao: GLuint = 0;

  unsafe {
    gl::GenVertexArrays(1, &mut vao);
    state.borrow_mut().bind_vertex_array(vao);
    gl::DrawArrays(gl::TRIANGLES, 0, 3);
    gl::Finish();

    state.borrow_mut().forget_vertex_array(vao);
    gl::DeleteVertexArrays(1, &vao);
  }
}

/// RGBA value of the pixel at the center of the framebuffer.
pub fn center_pixel(context: &GL33Context) -> [u8; 4] {
  let [w, h] = context.framebuffer_size();
  let mut pixel = [0u8; 4];

  unsafe {
    gl::ReadPixels(
      (w / 2) as GLint,
      (h / 2) as GLint,
      1,
      1,
      gl::RGBA,
      gl::UNSIGNED_BYTE,
      pixel.as_mut_ptr() as *mut _,
    );
  }

  pixel
}
