use crate::gl33::state::GLState;
use crate::gl33::GL33;
use gl::{self, types::*};
use prism::{
  backend::shader::{Shader, Uniformable},
  shader::{
    types::{Mat22, Mat33, Mat44, Vec2, Vec3, Vec4},
    ProgramError, StageError, StageType,
  },
};
use std::{
  cell::RefCell,
  ffi::CString,
  ptr::{null, null_mut},
  rc::Rc,
};

#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

#[derive(Debug)]
pub struct Program {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Program {
  fn link(&self) -> Result<(), ProgramError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log = vec![0u8; log_len.max(0) as usize];
        gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        Err(ProgramError::link_failed(String::from_utf8_lossy(&log)))
      }
    }
  }
}

/// Location of an active uniform in a linked program.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UniformLocation(GLint);

unsafe impl Shader for GL33 {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  type UniformRepr = UniformLocation;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let c_src = CString::new(glsl_version_src(src))
      .map_err(|_| StageError::compilation_failed(ty, "shader source contains a NUL byte"))?;

    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(StageError::unsupported_type(ty));
    }

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(Stage { handle, ty })
    } else {
      let mut log_len: GLint = 0;
      gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log = vec![0u8; log_len.max(0) as usize];
      gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

      gl::DeleteShader(handle);

      Err(StageError::compilation_failed(
        ty,
        String::from_utf8_lossy(&log),
      ))
    }
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    log::trace!("deleting {} {}", stage.ty, stage.handle);
    gl::DeleteShader(stage.handle);
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      return Err(ProgramError::link_failed("unable to create shader program"));
    }

    gl::AttachShader(handle, vertex.handle);
    gl::AttachShader(handle, fragment.handle);

    let program = Program {
      handle,
      state: self.state.clone(),
    };
    let linked = program.link();

    // stages are not needed by a linked program; detaching them lets them be deleted right away
    gl::DetachShader(handle, vertex.handle);
    gl::DetachShader(handle, fragment.handle);

    match linked {
      Ok(()) => Ok(program),

      Err(e) => {
        gl::DeleteProgram(handle);
        Err(e)
      }
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    program.state.borrow_mut().forget_program(program.handle);
    gl::DeleteProgram(program.handle);
  }

  unsafe fn use_program(&mut self, program: &Self::ProgramRepr) {
    self.state.borrow_mut().use_program(program.handle);
  }

  unsafe fn uniform_location(
    &mut self,
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Option<Self::UniformRepr> {
    let c_name = CString::new(name.as_bytes()).ok()?;
    let location = gl::GetUniformLocation(program.handle, c_name.as_ptr() as *const GLchar);

    // ensure the location smells good
    if location < 0 {
      None
    } else {
      Some(UniformLocation(location))
    }
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

const GLSL_VERSION: &str = "#version 330 core\n";

// Sources without a #version directive are compiled as GLSL 3.30 core.
fn glsl_version_src(src: &str) -> String {
  let has_version = src
    .lines()
    .any(|line| line.trim_start().starts_with("#version"));

  if has_version {
    src.to_owned()
  } else {
    let mut versioned = String::from(GLSL_VERSION);
    versioned.push_str(src);
    versioned
  }
}

macro_rules! impl_Uniformable {
  (vec $t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(&mut self, _: &Program, location: &UniformLocation, value: $t) {
        gl::$f(location.0, 1, value.as_ptr());
      }
    }
  };

  (mat $t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(&mut self, _: &Program, location: &UniformLocation, value: $t) {
        gl::$f(location.0, 1, gl::FALSE, value.as_ptr() as _);
      }
    }
  };

  (bvec $t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(&mut self, _: &Program, location: &UniformLocation, value: $t) {
        let v = value.0.map(|b| b as GLuint);
        gl::$f(location.0, 1, v.as_ptr());
      }
    }
  };

  ($t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(&mut self, _: &Program, location: &UniformLocation, value: $t) {
        gl::$f(location.0, value);
      }
    }
  };
}

impl_Uniformable!(i32, Uniform1i);
impl_Uniformable!(vec Vec2<i32>, Uniform2iv);
impl_Uniformable!(vec Vec3<i32>, Uniform3iv);
impl_Uniformable!(vec Vec4<i32>, Uniform4iv);

impl_Uniformable!(u32, Uniform1ui);
impl_Uniformable!(vec Vec2<u32>, Uniform2uiv);
impl_Uniformable!(vec Vec3<u32>, Uniform3uiv);
impl_Uniformable!(vec Vec4<u32>, Uniform4uiv);

impl_Uniformable!(f32, Uniform1f);
impl_Uniformable!(vec Vec2<f32>, Uniform2fv);
impl_Uniformable!(vec Vec3<f32>, Uniform3fv);
impl_Uniformable!(vec Vec4<f32>, Uniform4fv);

impl_Uniformable!(mat Mat22<f32>, UniformMatrix2fv);
impl_Uniformable!(mat Mat33<f32>, UniformMatrix3fv);
impl_Uniformable!(mat Mat44<f32>, UniformMatrix4fv);

impl_Uniformable!(bvec Vec2<bool>, Uniform2uiv);
impl_Uniformable!(bvec Vec3<bool>, Uniform3uiv);
impl_Uniformable!(bvec Vec4<bool>, Uniform4uiv);

unsafe impl Uniformable<bool> for GL33 {
  unsafe fn update(&mut self, _: &Program, location: &UniformLocation, value: bool) {
    gl::Uniform1ui(location.0, value as GLuint);
  }
}
