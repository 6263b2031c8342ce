//! Shader API.
//!
//! A shader *program* is a linked combination of shader *stages*. Here, a program is always made
//! of exactly one vertex stage and one fragment stage. Stages are transient: they only exist to be
//! linked into a program and are released as soon as they are dropped, which happens right after
//! linking when a program is built from strings or files.
//!
//! Programs are activated before issuing draw calls and customized between draw calls with
//! *uniforms*. Looking up a uniform that the program doesn’t have is not an error: compilers
//! legally strip unused uniforms, so [`Program::set_uniform`] just returns `false` and records a
//! [`UniformWarning`].

mod sources;
pub mod types;

use std::collections::HashMap;
use std::error;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::mem;
use std::path::{Path, PathBuf};

use crate::backend::shader::{Shader, Uniformable};
use crate::context::GraphicsContext;

pub use self::sources::ProgramSources;

/// Maximum number of characters kept from compiler and linker logs.
pub const MAX_INFO_LOG_LEN: usize = 512;

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that shader stages can emit.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// Occurs when a shader fails to compile. Carries the (bounded) compiler log.
  CompilationFailed(StageType, String),
  /// Occurs when you try to create a shader which type is not supported on the current hardware.
  UnsupportedType(StageType),
}

impl StageError {
  /// Shader compilation failed.
  ///
  /// The log is bounded to [`MAX_INFO_LOG_LEN`] characters.
  pub fn compilation_failed(ty: StageType, reason: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, bounded_log(reason))
  }

  /// Unsupported shader type.
  pub fn unsupported_type(ty: StageType) -> Self {
    StageError::UnsupportedType(ty)
  }

  /// Type of the stage that failed.
  pub fn stage_type(&self) -> StageType {
    match *self {
      StageError::CompilationFailed(ty, _) | StageError::UnsupportedType(ty) => ty,
    }
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ref ty, ref r) => write!(f, "{} compilation error: {}", ty, r),

      StageError::UnsupportedType(ty) => write!(f, "unsupported {}", ty),
    }
  }
}

impl error::Error for StageError {}

/// Errors that a [`Program`] can generate.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// A shader source file could not be read. No stage was compiled.
  FileRead(PathBuf, io::Error),
  /// A shader stage failed to compile. Linking was not attempted.
  StageError(StageError),
  /// A stage of the wrong type was passed where another one was expected.
  ///
  /// The first type is the expected one; the second one is what was found.
  StageTypeMismatch(StageType, StageType),
  /// Program link failed. Carries the (bounded) linker log.
  LinkFailed(String),
}

impl ProgramError {
  /// A shader source file could not be read.
  pub fn file_read(path: impl Into<PathBuf>, err: io::Error) -> Self {
    ProgramError::FileRead(path.into(), err)
  }

  /// Program link failed.
  ///
  /// The log is bounded to [`MAX_INFO_LOG_LEN`] characters.
  pub fn link_failed(reason: impl Into<String>) -> Self {
    ProgramError::LinkFailed(bounded_log(reason))
  }
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::FileRead(ref path, ref e) => {
        write!(f, "cannot read shader source {}: {}", path.display(), e)
      }

      ProgramError::StageError(ref e) => write!(f, "shader program has stage error: {}", e),

      ProgramError::StageTypeMismatch(expected, found) => {
        write!(f, "expected a {}, got a {}", expected, found)
      }

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::FileRead(_, e) => Some(e),
      ProgramError::StageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::StageError(e)
  }
}

/// Warnings related to uniform lookups.
///
/// Those are never errors: they are reported once per uniform name, the first time a lookup for
/// that name fails.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UniformWarning {
  /// The uniform is declared in the sources but is not active in the linked program. The compiler
  /// probably optimized it away because it doesn’t contribute to the output.
  Inactive(String),
  /// No source of the program declares a uniform with that name. Probably a typo.
  Undeclared(String),
}

impl UniformWarning {
  /// Create an inactive uniform warning.
  pub fn inactive<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::Inactive(name.into())
  }

  /// Create an undeclared uniform warning.
  pub fn undeclared<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::Undeclared(name.into())
  }

  /// Name of the uniform the warning is about.
  pub fn name(&self) -> &str {
    match self {
      UniformWarning::Inactive(name) | UniformWarning::Undeclared(name) => name,
    }
  }
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformWarning::Inactive(ref s) => write!(f, "inactive {} uniform", s),
      UniformWarning::Undeclared(ref s) => write!(f, "undeclared {} uniform", s),
    }
  }
}

impl error::Error for UniformWarning {}

/// A compiled shader stage.
///
/// Stages are only useful to build [`Program`]s. The underlying backend resource is released when
/// the stage is dropped; a program keeps working after its stages are gone.
pub struct Stage<B>
where
  B: ?Sized + Shader,
{
  repr: B::StageRepr,
  ty: StageType,
  src: String,
}

impl<B> Stage<B>
where
  B: ?Sized + Shader,
{
  /// Compile a new stage of type `ty` from `src`.
  pub fn new<C, R>(ctx: &mut C, ty: StageType, src: R) -> Result<Self, StageError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
    R: AsRef<str>,
  {
    let src = src.as_ref();
    let repr = unsafe { ctx.backend().new_stage(ty, src)? };

    log::debug!("compiled {} ({} bytes)", ty, src.len());

    Ok(Stage {
      repr,
      ty,
      src: src.to_owned(),
    })
  }

  /// Type of the stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }

  /// Source the stage was compiled from.
  pub fn source(&self) -> &str {
    &self.src
  }
}

impl<B> Drop for Stage<B>
where
  B: ?Sized + Shader,
{
  fn drop(&mut self) {
    unsafe { B::destroy_stage(&mut self.repr) }
  }
}

/// A linked shader program.
///
/// A `Program` value always refers to a successfully linked program: construction either yields a
/// usable program or an error. The underlying resource is released exactly once, when the value is
/// dropped (or passed to [`Program::destroy`]).
pub struct Program<B>
where
  B: ?Sized + Shader,
{
  repr: B::ProgramRepr,
  sources: ProgramSources,
  // cached lookups, including misses
  uniforms: HashMap<String, Option<B::UniformRepr>>,
  warnings: Vec<UniformWarning>,
  _not_send: PhantomData<*const ()>,
}

impl<B> Drop for Program<B>
where
  B: ?Sized + Shader,
{
  fn drop(&mut self) {
    unsafe { B::destroy_program(&mut self.repr) }
  }
}

impl<B> Program<B>
where
  B: ?Sized + Shader,
{
  /// Link a program out of two already compiled stages.
  ///
  /// The stages are left untouched and can be reused or dropped afterwards.
  pub fn from_stages<C>(
    ctx: &mut C,
    vertex: &Stage<B>,
    fragment: &Stage<B>,
  ) -> Result<Self, ProgramError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    if vertex.ty() != StageType::VertexShader {
      return Err(ProgramError::StageTypeMismatch(
        StageType::VertexShader,
        vertex.ty(),
      ));
    }

    if fragment.ty() != StageType::FragmentShader {
      return Err(ProgramError::StageTypeMismatch(
        StageType::FragmentShader,
        fragment.ty(),
      ));
    }

    let repr = unsafe { ctx.backend().new_program(&vertex.repr, &fragment.repr)? };
    let sources = ProgramSources::new(vertex.source(), fragment.source());

    Ok(Program::from_repr(repr, sources))
  }

  /// Compile both stages of `sources` and link them.
  ///
  /// The vertex stage is compiled first; if it fails, the fragment stage is not compiled. Both
  /// stages are released before returning, whatever the outcome.
  pub fn from_sources<C>(ctx: &mut C, sources: ProgramSources) -> Result<Self, ProgramError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    let repr = {
      let vertex = Stage::new(ctx, StageType::VertexShader, sources.vertex())?;
      let fragment = Stage::new(ctx, StageType::FragmentShader, sources.fragment())?;

      unsafe { ctx.backend().new_program(&vertex.repr, &fragment.repr)? }
    };

    match sources.paths() {
      Some((vs, fs)) => log::debug!("linked program from {} and {}", vs.display(), fs.display()),
      None => log::debug!("linked program"),
    }

    Ok(Program::from_repr(repr, sources))
  }

  /// Compile and link a program out of in-memory sources.
  pub fn from_strings<C, V, F>(ctx: &mut C, vertex: V, fragment: F) -> Result<Self, ProgramError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
    V: Into<String>,
    F: Into<String>,
  {
    Self::from_sources(ctx, ProgramSources::new(vertex, fragment))
  }

  /// Read both source files, then compile and link them.
  ///
  /// Reading happens before any compilation: an unreadable file is reported as
  /// [`ProgramError::FileRead`] and nothing is allocated on the backend side.
  pub fn from_files<C, V, F>(ctx: &mut C, vertex: V, fragment: F) -> Result<Self, ProgramError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
    V: AsRef<Path>,
    F: AsRef<Path>,
  {
    Self::from_sources(ctx, ProgramSources::from_files(vertex, fragment)?)
  }

  fn from_repr(repr: B::ProgramRepr, sources: ProgramSources) -> Self {
    Program {
      repr,
      sources,
      uniforms: HashMap::new(),
      warnings: Vec::new(),
      _not_send: PhantomData,
    }
  }

  /// Make this program the one used by subsequent draw calls, until another one is activated.
  pub fn activate<C>(&self, ctx: &mut C)
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    unsafe { ctx.backend().use_program(&self.repr) }
  }

  /// Set the uniform called `name` to `value`.
  ///
  /// The value is written into the *currently active* program: call [`Program::activate`] first.
  ///
  /// Returns `false` if the program has no active uniform called `name`, in which case nothing is
  /// written. The declared type of the uniform is not checked against `T`.
  pub fn set_uniform<C, T>(&mut self, ctx: &mut C, name: &str, value: T) -> bool
  where
    C: ?Sized + GraphicsContext<Backend = B>,
    B: Uniformable<T>,
  {
    match self.uniform_location(ctx, name) {
      Some(location) => {
        unsafe { ctx.backend().update(&self.repr, &location, value) };
        true
      }

      None => false,
    }
  }

  /// Whether the program has an active uniform called `name`.
  pub fn has_uniform<C>(&mut self, ctx: &mut C, name: &str) -> bool
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    self.uniform_location(ctx, name).is_some()
  }

  fn uniform_location<C>(&mut self, ctx: &mut C, name: &str) -> Option<B::UniformRepr>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    if let Some(cached) = self.uniforms.get(name) {
      return cached.clone();
    }

    let location = unsafe { ctx.backend().uniform_location(&self.repr, name) };

    if location.is_none() {
      let warning = if self.sources.declares_uniform(name) {
        log::debug!("uniform {} is declared but inactive", name);
        UniformWarning::inactive(name)
      } else {
        log::warn!("uniform {} is not declared in any stage", name);
        UniformWarning::undeclared(name)
      };

      self.warnings.push(warning);
    }

    self.uniforms.insert(name.to_owned(), location.clone());
    location
  }

  /// Warnings collected by failed uniform lookups so far, one per name.
  pub fn uniform_warnings(&self) -> &[UniformWarning] {
    &self.warnings
  }

  /// Sources the program was built from.
  pub fn sources(&self) -> &ProgramSources {
    &self.sources
  }

  /// Rebuild the program from its sources.
  ///
  /// File-based programs re-read their files first. On success, the previous program is released
  /// and the uniform cache starts over. On failure, the error is returned and the previous
  /// program is kept as-is, still usable.
  pub fn reload<C>(&mut self, ctx: &mut C) -> Result<(), ProgramError>
  where
    C: ?Sized + GraphicsContext<Backend = B>,
  {
    let sources = self.sources.reread()?;
    let mut rebuilt = Self::from_sources(ctx, sources)?;

    // the old program is released when rebuilt goes out of scope
    mem::swap(self, &mut rebuilt);

    Ok(())
  }

  /// Release the program.
  ///
  /// This is what dropping the program does; it consumes `self`, so a program cannot be
  /// released twice.
  pub fn destroy(self) {}
}

/// Program builder, obtained from [`GraphicsContext::new_shader_program`].
pub struct ProgramBuilder<'a, C>
where
  C: ?Sized,
{
  ctx: &'a mut C,
}

impl<'a, C> ProgramBuilder<'a, C>
where
  C: ?Sized + GraphicsContext,
  C::Backend: Shader,
{
  pub(crate) fn new(ctx: &'a mut C) -> Self {
    ProgramBuilder { ctx }
  }

  /// See [`Program::from_strings`].
  pub fn from_strings<V, F>(self, vertex: V, fragment: F) -> Result<Program<C::Backend>, ProgramError>
  where
    V: Into<String>,
    F: Into<String>,
  {
    Program::from_strings(self.ctx, vertex, fragment)
  }

  /// See [`Program::from_files`].
  pub fn from_files<V, F>(self, vertex: V, fragment: F) -> Result<Program<C::Backend>, ProgramError>
  where
    V: AsRef<Path>,
    F: AsRef<Path>,
  {
    Program::from_files(self.ctx, vertex, fragment)
  }

  /// See [`Program::from_sources`].
  pub fn from_sources(self, sources: ProgramSources) -> Result<Program<C::Backend>, ProgramError> {
    Program::from_sources(self.ctx, sources)
  }

  /// See [`Program::from_stages`].
  pub fn from_stages(
    self,
    vertex: &Stage<C::Backend>,
    fragment: &Stage<C::Backend>,
  ) -> Result<Program<C::Backend>, ProgramError> {
    Program::from_stages(self.ctx, vertex, fragment)
  }
}

// Drivers tend to pad logs with NUL terminators and newlines.
fn bounded_log(log: impl Into<String>) -> String {
  let mut log = log.into();

  let trimmed = log
    .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
    .len();
  log.truncate(trimmed);

  if let Some((index, _)) = log.char_indices().nth(MAX_INFO_LOG_LEN) {
    log.truncate(index);
  }

  log
}
