//! Platform services implementation.

use crate::CLIOpts;
use prism_demos::{PlatformServices, DEFAULT_SHADER_DIR};
use std::path::PathBuf;

/// Desktop implementation of the [`PlatformServices`] API.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  shader_dir: PathBuf,
}

impl DesktopPlatformServices {
  pub fn new(cli_opts: &CLIOpts) -> Self {
    let shader_dir = cli_opts
      .shaders
      .clone()
      .unwrap_or_else(|| PathBuf::from(DEFAULT_SHADER_DIR));

    log::debug!("shader directory: {}", shader_dir.display());

    Self { shader_dir }
  }
}

impl PlatformServices for DesktopPlatformServices {
  fn shader_path(&self, name: &str) -> PathBuf {
    self.shader_dir.join(name)
  }
}
