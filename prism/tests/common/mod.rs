//! A deterministic software backend.
//!
//! It “compiles” GLSL-looking sources with a handful of rules (a `main` function, balanced
//! delimiters, no stray characters), links by matching fragment inputs against vertex outputs and
//! keeps track of every live stage and program so that tests can check nothing leaks.

#![allow(dead_code)]

use prism::backend::shader::{Shader, Uniformable};
use prism::context::GraphicsContext;
use prism::shader::types::{Mat22, Mat33, Mat44, Vec2, Vec3, Vec4};
use prism::shader::{ProgramError, StageError, StageType};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Value stored in a uniform slot.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
  Float(Vec<f32>),
  Int(Vec<i32>),
  UInt(Vec<u32>),
  Bool(Vec<bool>),
}

/// What a draw call with the current program would produce.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
  pub vertex: String,
  pub fragment: String,
  pub uniforms: BTreeMap<String, UniformValue>,
}

#[derive(Debug)]
struct Interface {
  ty: StageType,
  src: String,
  inputs: Vec<String>,
  outputs: Vec<String>,
  used_uniforms: Vec<String>,
}

#[derive(Debug)]
struct Linked {
  vertex: String,
  fragment: String,
  active_uniforms: Vec<String>,
  values: BTreeMap<String, UniformValue>,
}

#[derive(Debug, Default)]
struct Registry {
  next_id: u32,
  stages: HashMap<u32, Rc<Interface>>,
  programs: HashMap<u32, Linked>,
  current: Option<u32>,
  stages_created: usize,
  programs_created: usize,
  programs_released: usize,
  invalid_operations: usize,
  unsupported: Vec<StageType>,
}

impl Registry {
  fn next_id(&mut self) -> u32 {
    self.next_id += 1;
    self.next_id
  }
}

#[derive(Debug)]
pub struct SoftStage {
  id: u32,
  interface: Rc<Interface>,
  registry: Rc<RefCell<Registry>>,
}

#[derive(Debug)]
pub struct SoftProgram {
  id: u32,
  registry: Rc<RefCell<Registry>>,
}

#[derive(Clone, Debug)]
pub struct SoftLocation {
  program: u32,
  name: String,
}

#[derive(Debug, Default)]
pub struct SoftBackend {
  registry: Rc<RefCell<Registry>>,
}

impl SoftBackend {
  pub fn live_stages(&self) -> usize {
    self.registry.borrow().stages.len()
  }

  pub fn live_programs(&self) -> usize {
    self.registry.borrow().programs.len()
  }

  pub fn stages_created(&self) -> usize {
    self.registry.borrow().stages_created
  }

  pub fn programs_created(&self) -> usize {
    self.registry.borrow().programs_created
  }

  pub fn programs_released(&self) -> usize {
    self.registry.borrow().programs_released
  }

  pub fn invalid_operations(&self) -> usize {
    self.registry.borrow().invalid_operations
  }

  /// Read a uniform back from the currently active program.
  pub fn uniform_value(&self, name: &str) -> Option<UniformValue> {
    let registry = self.registry.borrow();
    let current = registry.current?;
    registry.programs.get(&current)?.values.get(name).cloned()
  }

  /// Draw with the currently active program.
  pub fn draw(&self) -> Option<Frame> {
    let registry = self.registry.borrow();
    let linked = registry.programs.get(&registry.current?)?;

    Some(Frame {
      vertex: linked.vertex.clone(),
      fragment: linked.fragment.clone(),
      uniforms: linked.values.clone(),
    })
  }

  fn write(&mut self, location: &SoftLocation, value: UniformValue) {
    let mut registry = self.registry.borrow_mut();

    // the write targets whatever program is in use; a location from another program is an error
    let current = registry.current;

    match current {
      Some(current) if current == location.program => {
        if let Some(linked) = registry.programs.get_mut(&current) {
          linked.values.insert(location.name.clone(), value);
        }
      }

      _ => registry.invalid_operations += 1,
    }
  }
}

#[derive(Debug, Default)]
pub struct SoftContext {
  backend: SoftBackend,
}

impl SoftContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// A context whose backend cannot create stages of type `ty`.
  pub fn without_stage(ty: StageType) -> Self {
    let ctx = Self::default();
    ctx.backend.registry.borrow_mut().unsupported.push(ty);
    ctx
  }
}

unsafe impl GraphicsContext for SoftContext {
  type Backend = SoftBackend;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.backend
  }
}

unsafe impl Shader for SoftBackend {
  type StageRepr = SoftStage;

  type ProgramRepr = SoftProgram;

  type UniformRepr = SoftLocation;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    if self.registry.borrow().unsupported.contains(&ty) {
      return Err(StageError::unsupported_type(ty));
    }

    let interface = compile(ty, src).map_err(|log| StageError::compilation_failed(ty, log))?;
    let interface = Rc::new(interface);

    let mut registry = self.registry.borrow_mut();
    let id = registry.next_id();
    registry.stages.insert(id, interface.clone());
    registry.stages_created += 1;

    Ok(SoftStage {
      id,
      interface,
      registry: self.registry.clone(),
    })
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    let mut registry = stage.registry.borrow_mut();

    if registry.stages.remove(&stage.id).is_none() {
      panic!("stage {} released twice", stage.id);
    }
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let mut registry = self.registry.borrow_mut();

    for stage in &[vertex, fragment] {
      if !registry.stages.contains_key(&stage.id) {
        panic!("stage {} used after release", stage.id);
      }
    }

    let (vs, fs) = (&vertex.interface, &fragment.interface);

    if let Some(input) = fs.inputs.iter().find(|input| !vs.outputs.contains(input)) {
      return Err(ProgramError::link_failed(format!(
        "error: fragment shader input '{}' is not written by the vertex shader\n",
        input
      )));
    }

    let mut active_uniforms = vs.used_uniforms.clone();
    active_uniforms.extend(fs.used_uniforms.iter().cloned());

    let id = registry.next_id();
    registry.programs.insert(
      id,
      Linked {
        vertex: vs.src.clone(),
        fragment: fs.src.clone(),
        active_uniforms,
        values: BTreeMap::new(),
      },
    );
    registry.programs_created += 1;

    Ok(SoftProgram {
      id,
      registry: self.registry.clone(),
    })
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    let mut registry = program.registry.borrow_mut();

    if registry.programs.remove(&program.id).is_none() {
      panic!("program {} released twice", program.id);
    }

    registry.programs_released += 1;

    if registry.current == Some(program.id) {
      registry.current = None;
    }
  }

  unsafe fn use_program(&mut self, program: &Self::ProgramRepr) {
    let mut registry = self.registry.borrow_mut();
    assert!(
      registry.programs.contains_key(&program.id),
      "program {} used after release",
      program.id
    );
    registry.current = Some(program.id);
  }

  unsafe fn uniform_location(
    &mut self,
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Option<Self::UniformRepr> {
    let registry = self.registry.borrow();
    let linked = registry.programs.get(&program.id)?;

    if linked.active_uniforms.iter().any(|u| u == name) {
      Some(SoftLocation {
        program: program.id,
        name: name.to_owned(),
      })
    } else {
      None
    }
  }
}

macro_rules! impl_Uniformable {
  ($t:ty, $variant:ident, |$v:ident| $e:expr) => {
    unsafe impl Uniformable<$t> for SoftBackend {
      unsafe fn update(&mut self, _: &SoftProgram, location: &SoftLocation, $v: $t) {
        self.write(location, UniformValue::$variant($e));
      }
    }
  };
}

impl_Uniformable!(f32, Float, |v| vec![v]);
impl_Uniformable!(Vec2<f32>, Float, |v| v.to_vec());
impl_Uniformable!(Vec3<f32>, Float, |v| v.to_vec());
impl_Uniformable!(Vec4<f32>, Float, |v| v.to_vec());
impl_Uniformable!(Mat22<f32>, Float, |m| m.iter().flatten().copied().collect());
impl_Uniformable!(Mat33<f32>, Float, |m| m.iter().flatten().copied().collect());
impl_Uniformable!(Mat44<f32>, Float, |m| m.iter().flatten().copied().collect());
impl_Uniformable!(i32, Int, |v| vec![v]);
impl_Uniformable!(Vec2<i32>, Int, |v| v.to_vec());
impl_Uniformable!(u32, UInt, |v| vec![v]);
impl_Uniformable!(bool, Bool, |v| vec![v]);
impl_Uniformable!(Vec4<bool>, Bool, |v| v.to_vec());

fn compile(ty: StageType, src: &str) -> Result<Interface, String> {
  for (line, text) in src.lines().enumerate() {
    if let Some(c) = text.chars().find(|c| matches!(c, '@' | '$' | '`')) {
      return Err(format!("ERROR: 0:{}: '{}' : syntax error\n", line + 1, c));
    }
  }

  for (open, close) in &[('{', '}'), ('(', ')'), ('[', ']')] {
    let opened = src.matches(*open).count();
    let closed = src.matches(*close).count();

    if opened != closed {
      return Err(format!(
        "ERROR: 0:{}: '{}' : syntax error: unbalanced delimiters\n",
        src.lines().count(),
        if opened > closed { close } else { open }
      ));
    }
  }

  if !src.contains("void main") {
    return Err("ERROR: 0:1: 'main' : function not defined\n".to_owned());
  }

  let mut interface = Interface {
    ty,
    src: src.to_owned(),
    inputs: Vec::new(),
    outputs: Vec::new(),
    used_uniforms: Vec::new(),
  };

  let idents = |s: &str| -> Vec<String> {
    s.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
      .filter(|i| !i.is_empty())
      .map(str::to_owned)
      .collect()
  };
  let all_idents = idents(src);

  for decl in src.split(|c| c == ';' || c == '{' || c == '}') {
    let tokens = idents(decl);
    let qualifier = tokens
      .iter()
      .position(|t| t == "in" || t == "out" || t == "uniform");

    let q = match qualifier {
      Some(q) => q,
      None => continue,
    };

    // skip the type
    let names = tokens[q + 1..]
      .iter()
      .skip(1)
      .filter(|t| !t.starts_with(|c: char| c.is_ascii_digit()));

    for name in names {
      match tokens[q].as_str() {
        "in" => interface.inputs.push(name.clone()),
        "out" => interface.outputs.push(name.clone()),
        _ => {
          if all_idents.iter().filter(|i| *i == name).count() > 1 {
            interface.used_uniforms.push(name.clone());
          }
        }
      }
    }
  }

  // built-in outputs never need a matching input
  if ty == StageType::FragmentShader {
    interface.outputs.clear();
  }

  Ok(interface)
}
