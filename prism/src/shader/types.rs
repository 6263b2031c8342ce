//! Uniform value types.
//!
//! Plain array newtypes used to pass vectors and matrices to [`Program::set_uniform`]. Scalars
//! (`i32`, `u32`, `f32`, `bool`) are passed as-is.
//!
//! Matrices are stored column by column, which is what GLSL expects: `Mat44([c0, c1, c2, c3])`.
//!
//! [`Program::set_uniform`]: crate::shader::Program::set_uniform

use std::ops::{Deref, DerefMut};

macro_rules! array_wrapper {
  ($(#[$doc:meta])* $t:ident, $repr:ty) => {
    $(#[$doc])*
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct $t<T>(pub $repr);

    impl<T> From<$repr> for $t<T> {
      fn from(a: $repr) -> Self {
        $t(a)
      }
    }

    impl<T> From<$t<T>> for $repr {
      fn from($t(a): $t<T>) -> Self {
        a
      }
    }

    impl<T> AsRef<$repr> for $t<T> {
      fn as_ref(&self) -> &$repr {
        &self.0
      }
    }

    impl<T> Deref for $t<T> {
      type Target = $repr;

      fn deref(&self) -> &Self::Target {
        &self.0
      }
    }

    impl<T> DerefMut for $t<T> {
      fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
      }
    }
  };
}

array_wrapper!(
  /// A 2 dimensional vector (`vec2`, `ivec2`, `uvec2`, `bvec2`).
  Vec2,
  [T; 2]
);
array_wrapper!(
  /// A 3 dimensional vector (`vec3`, `ivec3`, `uvec3`, `bvec3`).
  Vec3,
  [T; 3]
);
array_wrapper!(
  /// A 4 dimensional vector (`vec4`, `ivec4`, `uvec4`, `bvec4`).
  Vec4,
  [T; 4]
);
array_wrapper!(
  /// A 2×2 matrix (`mat2`), column-major.
  Mat22,
  [[T; 2]; 2]
);
array_wrapper!(
  /// A 3×3 matrix (`mat3`), column-major.
  Mat33,
  [[T; 3]; 3]
);
array_wrapper!(
  /// A 4×4 matrix (`mat4`), column-major.
  Mat44,
  [[T; 4]; 4]
);

impl<T> Vec2<T> {
  /// Create a new vector.
  pub const fn new(x: T, y: T) -> Self {
    Self([x, y])
  }
}

impl<T> Vec3<T> {
  /// Create a new vector.
  pub const fn new(x: T, y: T, z: T) -> Self {
    Self([x, y, z])
  }
}

impl<T> Vec4<T> {
  /// Create a new vector.
  pub const fn new(x: T, y: T, z: T, w: T) -> Self {
    Self([x, y, z, w])
  }
}

impl Mat44<f32> {
  /// The identity matrix.
  pub const IDENTITY: Self = Mat44([
    [1., 0., 0., 0.],
    [0., 1., 0., 0.],
    [0., 0., 1., 0.],
    [0., 0., 0., 1.],
  ]);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vectors_deref_to_arrays() {
    let mut v = Vec2::new(0.5f32, -0.5);
    v[1] += 1.;

    assert_eq!(*v, [0.5, 0.5]);
    assert_eq!(<[f32; 2]>::from(v), [0.5, 0.5]);
  }

  #[test]
  fn identity_is_column_major_diagonal() {
    for (c, column) in Mat44::IDENTITY.iter().enumerate() {
      for (r, x) in column.iter().enumerate() {
        assert_eq!(*x, if c == r { 1. } else { 0. });
      }
    }
  }
}
