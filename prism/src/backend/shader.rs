//! Shader backend.

use crate::shader::{ProgramError, StageError, StageType};

/// Shader stages and programs.
///
/// # Unsafety
///
/// Every representation handed out by [`Shader::new_stage`] and [`Shader::new_program`] must be
/// released exactly once by the matching `destroy_*` function. Releasing the same representation
/// twice is a contract violation; backends are free to abort or exhibit undefined behavior.
///
/// All methods assume the graphics context of the backend is current on the calling thread.
pub unsafe trait Shader {
  /// Representation of a compiled stage.
  type StageRepr;

  /// Representation of a linked program.
  type ProgramRepr;

  /// Representation of a uniform location inside a linked program.
  type UniformRepr: Clone;

  /// Compile a stage of type `ty` from `src`.
  ///
  /// On failure, no stage resource must remain allocated.
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError>;

  /// Release a stage.
  unsafe fn destroy_stage(stage: &mut Self::StageRepr);

  /// Link a vertex and a fragment stage into a program.
  ///
  /// The stages are not consumed: they can be released right after this call, whatever its
  /// outcome. On failure, no program resource must remain allocated.
  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError>;

  /// Release a program.
  unsafe fn destroy_program(program: &mut Self::ProgramRepr);

  /// Make `program` the active program for subsequent draw calls.
  unsafe fn use_program(&mut self, program: &Self::ProgramRepr);

  /// Look up the location of a uniform by name.
  ///
  /// `None` means the program doesn’t have any active uniform with that name.
  unsafe fn uniform_location(
    &mut self,
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Option<Self::UniformRepr>;
}

/// Values of type `T` that can be written into uniforms.
///
/// # Unsafety
///
/// [`Uniformable::update`] writes into the *currently active* program, which is not necessarily
/// `program`. Callers must activate `program` first. The declared type of the uniform in the
/// shader source is not checked against `T`.
pub unsafe trait Uniformable<T>: Shader {
  /// Write `value` at `location`.
  unsafe fn update(&mut self, program: &Self::ProgramRepr, location: &Self::UniformRepr, value: T);
}
