//! Indexed triangle geometry.
//!
//! [`GeometryData`] is the CPU side: owned, validated vertex and index data. [`Geometry`] is its
//! GPU counterpart, a vertex array object with its vertex and index buffers.

use gl::types::*;
use prism::context::GraphicsContext;
use prism_gl::gl33::GLState;
use prism_gl::GL33;
use std::{cell::RefCell, error, fmt, mem, os::raw::c_void, ptr, rc::Rc};

/// Errors [`GeometryData::new`] rejects data with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GeometryError {
  /// Attribute layouts must have between 1 and 4 components per attribute.
  InvalidLayout(Vec<usize>),
  /// No vertex at all.
  NoVertices,
  /// The number of floats is not a multiple of the vertex stride.
  MisalignedVertices {
    /// Number of floats.
    len: usize,
    /// Floats per vertex.
    stride: usize,
  },
  /// No index at all, or not a whole number of triangles.
  IncompleteTriangles(usize),
  /// An index points past the last vertex.
  IndexOutOfRange {
    /// Faulty index.
    index: u32,
    /// Number of vertices.
    vertex_count: usize,
  },
}

impl fmt::Display for GeometryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      GeometryError::InvalidLayout(ref layout) => write!(f, "invalid attribute layout {:?}", layout),
      GeometryError::NoVertices => f.write_str("no vertices"),
      GeometryError::MisalignedVertices { len, stride } => {
        write!(f, "{} floats cannot be split in vertices of {} floats", len, stride)
      }
      GeometryError::IncompleteTriangles(count) => {
        write!(f, "{} indices do not make whole triangles", count)
      }
      GeometryError::IndexOutOfRange {
        index,
        vertex_count,
      } => write!(f, "index {} out of range ({} vertices)", index, vertex_count),
    }
  }
}

impl error::Error for GeometryError {}

/// Interleaved float vertices with their attribute layout, and triangle indices.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryData {
  vertices: Vec<f32>,
  layout: Vec<usize>,
  indices: Vec<u32>,
}

impl GeometryData {
  /// Validate vertex and index data.
  ///
  /// `layout` lists the number of components of each attribute, in location order: `&[3, 3]` is
  /// a `vec3` at location 0 followed by a `vec3` at location 1.
  pub fn new(
    vertices: Vec<f32>,
    layout: &[usize],
    indices: Vec<u32>,
  ) -> Result<Self, GeometryError> {
    if layout.is_empty() || layout.iter().any(|&c| c == 0 || c > 4) {
      return Err(GeometryError::InvalidLayout(layout.to_owned()));
    }

    if vertices.is_empty() {
      return Err(GeometryError::NoVertices);
    }

    let stride = layout.iter().sum::<usize>();
    if vertices.len() % stride != 0 {
      return Err(GeometryError::MisalignedVertices {
        len: vertices.len(),
        stride,
      });
    }

    if indices.is_empty() || indices.len() % 3 != 0 {
      return Err(GeometryError::IncompleteTriangles(indices.len()));
    }

    let vertex_count = vertices.len() / stride;
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
      return Err(GeometryError::IndexOutOfRange {
        index,
        vertex_count,
      });
    }

    Ok(GeometryData {
      vertices,
      layout: layout.to_owned(),
      indices,
    })
  }

  /// Number of floats per vertex.
  pub fn stride(&self) -> usize {
    self.layout.iter().sum()
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len() / self.stride()
  }

  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  // (location, components, offset in floats)
  fn attributes(&self) -> impl Iterator<Item = (GLuint, usize, usize)> + '_ {
    self
      .layout
      .iter()
      .scan(0, |offset, &components| {
        let attr = (components, *offset);
        *offset += components;
        Some(attr)
      })
      .enumerate()
      .map(|(location, (components, offset))| (location as GLuint, components, offset))
  }
}

/// GPU geometry: a vertex array object, a vertex buffer and an index buffer.
#[derive(Debug)]
pub struct Geometry {
  vao: GLuint,
  vbo: GLuint,
  ebo: GLuint,
  index_count: GLsizei,
  state: Rc<RefCell<GLState>>,
}

impl Geometry {
  /// Upload `data`.
  pub fn new(context: &mut impl GraphicsContext<Backend = GL33>, data: &GeometryData) -> Self {
    let state = unsafe { context.backend().state().clone() };
    let float_size = mem::size_of::<f32>();

    let mut vao: GLuint = 0;
    let mut buffers: [GLuint; 2] = [0, 0];

    unsafe {
      gl::GenVertexArrays(1, &mut vao);
      gl::GenBuffers(2, buffers.as_mut_ptr());
      let [vbo, ebo] = buffers;

      let mut st = state.borrow_mut();
      st.bind_vertex_array(vao);

      gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
      gl::BufferData(
        gl::ARRAY_BUFFER,
        (data.vertices.len() * float_size) as GLsizeiptr,
        data.vertices.as_ptr() as *const c_void,
        gl::STATIC_DRAW,
      );

      // the element array binding is part of the vertex array state
      gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
      gl::BufferData(
        gl::ELEMENT_ARRAY_BUFFER,
        (data.indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
        data.indices.as_ptr() as *const c_void,
        gl::STATIC_DRAW,
      );

      let stride = (data.stride() * float_size) as GLsizei;
      for (location, components, offset) in data.attributes() {
        gl::VertexAttribPointer(
          location,
          components as GLint,
          gl::FLOAT,
          gl::FALSE,
          stride,
          (offset * float_size) as *const c_void,
        );
        gl::EnableVertexAttribArray(location);
      }

      gl::BindBuffer(gl::ARRAY_BUFFER, 0);
      st.bind_vertex_array(0);
    }

    log::debug!(
      "uploaded {} vertices, {} indices",
      data.vertex_count(),
      data.indices.len()
    );

    Geometry {
      vao,
      vbo: buffers[0],
      ebo: buffers[1],
      index_count: data.indices.len() as GLsizei,
      state,
    }
  }

  /// Draw all the triangles with the currently active program.
  pub fn draw(&self) {
    unsafe {
      self.state.borrow_mut().bind_vertex_array(self.vao);
      gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
    }
  }
}

impl Drop for Geometry {
  fn drop(&mut self) {
    self.state.borrow_mut().forget_vertex_array(self.vao);

    unsafe {
      gl::DeleteVertexArrays(1, &self.vao);
      gl::DeleteBuffers(2, [self.vbo, self.ebo].as_ptr());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interleaved_attributes() {
    let data = GeometryData::new(vec![0.; 18], &[3, 3], vec![0, 1, 2]).unwrap();

    assert_eq!(data.stride(), 6);
    assert_eq!(data.vertex_count(), 3);
    assert_eq!(
      data.attributes().collect::<Vec<_>>(),
      vec![(0, 3, 0), (1, 3, 3)]
    );
  }

  #[test]
  fn rejects_bad_layouts() {
    assert_eq!(
      GeometryData::new(vec![0.; 9], &[], vec![0, 1, 2]),
      Err(GeometryError::InvalidLayout(Vec::new()))
    );
    assert_eq!(
      GeometryData::new(vec![0.; 9], &[3, 0], vec![0, 1, 2]),
      Err(GeometryError::InvalidLayout(vec![3, 0]))
    );
    assert_eq!(
      GeometryData::new(vec![0.; 10], &[5], vec![0, 1, 2]),
      Err(GeometryError::InvalidLayout(vec![5]))
    );
  }

  #[test]
  fn rejects_misaligned_vertices() {
    assert_eq!(
      GeometryData::new(vec![0.; 10], &[3], vec![0, 1, 2]),
      Err(GeometryError::MisalignedVertices { len: 10, stride: 3 })
    );
    assert_eq!(
      GeometryData::new(Vec::new(), &[3], vec![0, 1, 2]),
      Err(GeometryError::NoVertices)
    );
  }

  #[test]
  fn rejects_bad_indices() {
    assert_eq!(
      GeometryData::new(vec![0.; 9], &[3], Vec::new()),
      Err(GeometryError::IncompleteTriangles(0))
    );
    assert_eq!(
      GeometryData::new(vec![0.; 9], &[3], vec![0, 1]),
      Err(GeometryError::IncompleteTriangles(2))
    );
    assert_eq!(
      GeometryData::new(vec![0.; 9], &[3], vec![0, 1, 3]),
      Err(GeometryError::IndexOutOfRange {
        index: 3,
        vertex_count: 3
      })
    );
  }
}
