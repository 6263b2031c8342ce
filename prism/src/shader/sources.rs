use std::fs;
use std::path::{Path, PathBuf};

use super::ProgramError;

/// Vertex and fragment sources of a program.
///
/// Sources either come from memory or from two files. File-based sources remember their paths so
/// that a program can be rebuilt from disk later on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProgramSources {
  vertex: String,
  fragment: String,
  paths: Option<(PathBuf, PathBuf)>,
}

impl ProgramSources {
  /// Sources from in-memory strings.
  pub fn new<V, F>(vertex: V, fragment: F) -> Self
  where
    V: Into<String>,
    F: Into<String>,
  {
    ProgramSources {
      vertex: vertex.into(),
      fragment: fragment.into(),
      paths: None,
    }
  }

  /// Read both sources from disk, vertex first.
  pub fn from_files<V, F>(vertex: V, fragment: F) -> Result<Self, ProgramError>
  where
    V: AsRef<Path>,
    F: AsRef<Path>,
  {
    let vertex_path = vertex.as_ref().to_owned();
    let fragment_path = fragment.as_ref().to_owned();

    let vertex = read_source(&vertex_path)?;
    let fragment = read_source(&fragment_path)?;

    Ok(ProgramSources {
      vertex,
      fragment,
      paths: Some((vertex_path, fragment_path)),
    })
  }

  /// Vertex stage source.
  pub fn vertex(&self) -> &str {
    &self.vertex
  }

  /// Fragment stage source.
  pub fn fragment(&self) -> &str {
    &self.fragment
  }

  /// Vertex and fragment paths, if the sources were read from files.
  pub fn paths(&self) -> Option<(&Path, &Path)> {
    self
      .paths
      .as_ref()
      .map(|(vs, fs)| (vs.as_path(), fs.as_path()))
  }

  /// Fresh copy of the sources: re-read from disk for file-based sources, cloned otherwise.
  pub fn reread(&self) -> Result<Self, ProgramError> {
    match self.paths {
      Some((ref vs, ref fs)) => Self::from_files(vs, fs),
      None => Ok(self.clone()),
    }
  }

  /// Whether any of the two sources declares a uniform called `name`.
  pub fn declares_uniform(&self, name: &str) -> bool {
    declares_uniform(&self.vertex, name) || declares_uniform(&self.fragment, name)
  }
}

fn read_source(path: &Path) -> Result<String, ProgramError> {
  fs::read_to_string(path).map_err(|e| ProgramError::file_read(path, e))
}

const PRECISION_QUALIFIERS: &[&str] = &["lowp", "mediump", "highp"];

// Scans declarations such as `uniform float a, b;` or `layout(location = 0) uniform vec3 c[4];`.
// Uniform blocks are not looked into.
fn declares_uniform(src: &str, name: &str) -> bool {
  strip_comments(src)
    .split(|c| c == ';' || c == '{' || c == '}')
    .any(|decl| uniform_names(decl).any(|declared| declared == name))
}

// Names declared by a `uniform` statement, if `decl` is one.
fn uniform_names(decl: &str) -> impl Iterator<Item = &str> {
  let mut rest = Some(decl);
  let mut is_uniform = false;

  // skip up to the keyword, then precision qualifiers and the type
  while let Some((ident, tail)) = rest.and_then(next_identifier) {
    rest = Some(tail);

    if ident == "uniform" {
      is_uniform = true;
      break;
    }
  }

  if !is_uniform {
    rest = None;
  }

  while let Some((ident, tail)) = rest.and_then(next_identifier) {
    rest = Some(tail);

    if !PRECISION_QUALIFIERS.contains(&ident) {
      break;
    }
  }

  // `float[2] a` declares `a` as an array too
  let declarators = rest.map(|tail| {
    let tail = tail.trim_start();

    match tail.strip_prefix('[') {
      Some(sized) => sized.find(']').map_or("", |end| &sized[end + 1..]),
      None => tail,
    }
  });

  declarators
    .into_iter()
    .flat_map(split_top_level)
    .filter_map(|declarator| {
      let name = declarator.split(|c| c == '=' || c == '[').next()?.trim();

      if !name.is_empty() && name.chars().all(is_identifier_char) {
        Some(name)
      } else {
        None
      }
    })
}

fn is_identifier_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

fn next_identifier(s: &str) -> Option<(&str, &str)> {
  let start = s.find(is_identifier_char)?;
  let s = &s[start..];
  let end = s.find(|c| !is_identifier_char(c)).unwrap_or(s.len());

  Some((&s[..end], &s[end..]))
}

// Commas inside parentheses or brackets belong to initializers and array sizes.
fn split_top_level(s: &str) -> Vec<&str> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut start = 0;

  for (i, c) in s.char_indices() {
    match c {
      '(' | '[' => depth += 1,
      ')' | ']' => depth = depth.saturating_sub(1),
      ',' if depth == 0 => {
        parts.push(&s[start..i]);
        start = i + 1;
      }
      _ => (),
    }
  }

  parts.push(&s[start..]);
  parts
}

fn strip_comments(src: &str) -> String {
  let mut code = String::with_capacity(src.len());
  let mut rest = src;

  while let Some(slash) = rest.find('/') {
    code.push_str(&rest[..slash]);
    let tail = &rest[slash..];

    if tail.starts_with("//") {
      rest = tail.find('\n').map_or("", |end| &tail[end..]);
      code.push(' ');
    } else if let Some(block) = tail.strip_prefix("/*") {
      rest = block.find("*/").map_or("", |end| &block[end + 2..]);
      code.push(' ');
    } else {
      code.push('/');
      rest = &tail[1..];
    }
  }

  code.push_str(rest);
  code
}

#[cfg(test)]
mod tests {
  use super::*;

  const VS: &str = "layout (location = 0) in vec3 aPos;
uniform float xOffset;
uniform float yOffset, zOffset; // zOffset is unused
// uniform float commented;
void main() {
  gl_Position = vec4(aPos.x + xOffset, aPos.y + yOffset, aPos.z, 1.0);
}";

  const FS: &str = "out vec4 FragColor;
layout(std140) uniform Lights { vec3 lightPos; };
uniform mat4 view[2];
void main() {
  FragColor = vec4(1.0);
}";

  #[test]
  fn finds_declared_uniforms() {
    let sources = ProgramSources::new(VS, FS);

    assert!(sources.declares_uniform("xOffset"));
    assert!(sources.declares_uniform("zOffset"));
    assert!(sources.declares_uniform("view"));
  }

  #[test]
  fn ignores_non_uniforms() {
    let sources = ProgramSources::new(VS, FS);

    assert!(!sources.declares_uniform("aPos"));
    assert!(!sources.declares_uniform("FragColor"));
    assert!(!sources.declares_uniform("commented"));
    assert!(!sources.declares_uniform("xOfset"));
    assert!(!sources.declares_uniform("uniform"));
  }

  #[test]
  fn block_comments_declare_nothing() {
    let vs = "/* uniform float ghost; */
uniform float real; /* uniform float
  phantom; */
void main() {}";
    let sources = ProgramSources::new(vs, "void main() {}");

    assert!(sources.declares_uniform("real"));
    assert!(!sources.declares_uniform("ghost"));
    assert!(!sources.declares_uniform("phantom"));
  }

  #[test]
  fn only_declared_names_match() {
    let fs = "uniform highp float scale = 2.0, bias = scale;
uniform vec3 colors[MAX_COLORS], fallback = vec3(0., 0., 1.);
uniform float[2] weights;
void main() {}";
    let sources = ProgramSources::new("void main() {}", fs);

    for declared in &["scale", "bias", "colors", "fallback", "weights"] {
      assert!(sources.declares_uniform(declared), "{} not found", declared);
    }

    for other in &["float", "highp", "vec3", "MAX_COLORS", "2", "main"] {
      assert!(!sources.declares_uniform(other), "{} found", other);
    }
  }

  #[test]
  fn in_memory_sources_have_no_paths() {
    let sources = ProgramSources::new(VS, FS);

    assert_eq!(sources.paths(), None);
    assert_eq!(sources.reread().ok(), Some(sources.clone()));
  }

  #[test]
  fn missing_file_reports_its_path() {
    let dir = std::env::temp_dir().join("prism-sources-missing");
    let vs = dir.join("nope.vert");
    let fs = dir.join("nope.frag");

    match ProgramSources::from_files(&vs, &fs) {
      Err(ProgramError::FileRead(path, _)) => assert_eq!(path, vs),
      r => panic!("unexpected result: {:?}", r),
    }
  }

  #[test]
  fn reads_and_rereads_files() {
    let dir = std::env::temp_dir().join(format!("prism-sources-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let vs = dir.join("shader.vert");
    let fs_path = dir.join("shader.frag");
    fs::write(&vs, VS).unwrap();
    fs::write(&fs_path, FS).unwrap();

    let sources = ProgramSources::from_files(&vs, &fs_path).unwrap();
    assert_eq!(sources.vertex(), VS);
    assert_eq!(sources.fragment(), FS);
    assert_eq!(sources.paths(), Some((vs.as_path(), fs_path.as_path())));

    fs::write(&fs_path, "void main() {}").unwrap();
    let reread = sources.reread().unwrap();
    assert_eq!(reread.fragment(), "void main() {}");

    fs::remove_dir_all(&dir).unwrap();
  }
}
