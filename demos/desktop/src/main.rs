mod platform;

use glfw::{Action, Context as _, Key, WindowEvent};
use platform::DesktopPlatformServices;
use prism_demos::{Direction, Example, InputAction, InputState, LoopFeedback};
use prism_glfw::GlfwSurface;
use prism_windowing::{WindowDim, WindowOpt};
use std::{error::Error, path::PathBuf, process};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long)]
  /// Directory where to pick shader files from.
  shaders: Option<PathBuf>,

  #[structopt(long, default_value = "800")]
  /// Width of the window.
  width: u32,

  #[structopt(long, default_value = "600")]
  /// Height of the window.
  height: u32,

  #[structopt(short, long)]
  /// List available examples.
  list_examples: bool,

  /// Example to run.
  example: Option<String>,
}

/// Macro to declaratively add examples.
macro_rules! examples {
  ($($ex_name:literal, $ex_ident:ident),* $(,)?) => {
    fn show_available_examples() {
      println!("available examples:");
      $( println!("  - {}", $ex_name); )*
    }

    // create a function that will run an example based on its name
    fn pick_and_run_example(cli_opts: CLIOpts) -> Result<(), Box<dyn Error>> {
      let example_name = cli_opts.example.clone();

      match example_name.as_deref() {
        $(
          Some($ex_name) => {
            run_example::<prism_demos::$ex_ident::LocalExample>(cli_opts, $ex_name)
          }
        ),*

        _ => {
          log::error!("no example found");
          show_available_examples();
          Ok(())
        }
      }
    }
  }
}

// Run an example.
fn run_example<E>(cli_opts: CLIOpts, name: &str) -> Result<(), Box<dyn Error>>
where
  E: Example,
{
  let mut services = DesktopPlatformServices::new(&cli_opts);

  // First thing first: we create a new surface to render to and get events from.
  let dim = WindowDim::Windowed {
    width: cli_opts.width,
    height: cli_opts.height,
  };
  let surface = GlfwSurface::new_gl33("prism", WindowOpt::default().set_dim(dim))?;
  let mut context = surface.context;
  let events = surface.events_rx;

  let mut example = E::bootstrap(&mut services, &mut context)?;
  let mut input = InputState::default();

  log::info!("running {}", name);

  'app: loop {
    // handle events
    context.window.glfw.poll_events();

    let mut actions = Vec::new();
    for (_, event) in glfw::flush_messages(&events) {
      if let WindowEvent::FramebufferSize(..) = event {
        context.set_viewport();
      } else if let Some(action) = adapt_events(event) {
        input.apply(action);
        actions.push(action);
      }
    }

    match example.render_frame(&input, actions.into_iter(), &mut context) {
      LoopFeedback::Continue => context.window.swap_buffers(),
      LoopFeedback::Exit => break 'app,
    }
  }

  Ok(())
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
      Some(InputAction::Quit)
    }

    WindowEvent::Key(Key::R, _, Action::Press, _) => Some(InputAction::Reload),

    WindowEvent::Key(key, _, Action::Press, _) => {
      log::debug!("key press: {:?}", key);
      key_direction(key).map(InputAction::Pressed)
    }

    WindowEvent::Key(key, _, Action::Release, _) => key_direction(key).map(InputAction::Released),

    _ => None,
  }
}

fn key_direction(key: Key) -> Option<Direction> {
  match key {
    Key::W => Some(Direction::Up),
    Key::A => Some(Direction::Left),
    Key::S => Some(Direction::Down),
    Key::D => Some(Direction::Right),
    _ => None,
  }
}

examples! {
  "hello-triangle", hello_triangle,
  "two-triangles", two_triangles,
  "shader-offset", shader_offset,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_examples {
    show_available_examples();
  } else if let Err(e) = pick_and_run_example(cli_opts) {
    log::error!("{}", e);
    process::exit(1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wasd_maps_to_directions() {
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::W, 0, Action::Press, glfw::Modifiers::empty())),
      Some(InputAction::Pressed(Direction::Up))
    );
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::D, 0, Action::Release, glfw::Modifiers::empty())),
      Some(InputAction::Released(Direction::Right))
    );
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::Q, 0, Action::Press, glfw::Modifiers::empty())),
      None
    );
  }

  #[test]
  fn quit_and_reload() {
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::Escape, 0, Action::Press, glfw::Modifiers::empty())),
      Some(InputAction::Quit)
    );
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::R, 0, Action::Press, glfw::Modifiers::empty())),
      Some(InputAction::Reload)
    );
  }

  #[test]
  fn cli_defaults() {
    let opts = CLIOpts::from_iter(&["prism-demos-desktop", "shader-offset"]);

    assert_eq!(opts.width, 800);
    assert_eq!(opts.height, 600);
    assert_eq!(opts.shaders, None);
    assert_eq!(opts.example.as_deref(), Some("shader-offset"));
  }
}
