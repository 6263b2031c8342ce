//! # Shader programs, without the boilerplate
//!
//! prism wraps the compile / link / use / set-uniform lifecycle of GPU shader programs behind a
//! small, typed API. A [`Program`] can only be obtained from a successful compilation and link:
//! if a stage fails to compile or the stages fail to link, you get an error back and there is no
//! half-built program lying around that could be activated by mistake.
//!
//! prism is not a rendering engine. It doesn’t know about vertex buffers, draw calls, windows or
//! scenes; those are owned by your render loop. It only gives you:
//!
//! - **Stages**: a compiled vertex or fragment stage, released as soon as it is dropped.
//! - **Programs**: a linked vertex + fragment pair you can activate and feed with uniforms.
//! - **Uniforms**: named, typed values that stay constant for a whole draw call. Setting a
//!   uniform that doesn’t exist in the program (because the compiler optimized it away or
//!   because of a typo) is not an error; it is a no-op reported through the `log` crate and
//!   [`Program::uniform_warnings`].
//!
//! # Backends
//!
//! The code here is parametric over a backend type, by convention `B`. A backend implements the traits of
//! [`backend::shader`] and is reached through a [`GraphicsContext`]. Backends are provided by
//! other crates, such as `prism-gl` for OpenGL 3.3.
//!
//! ```ignore
//! let mut program = context
//!   .new_shader_program()
//!   .from_files("shaders/shader.vert", "shaders/shader.frag")?;
//!
//! // every frame
//! program.activate(&mut context);
//! program.set_uniform(&mut context, "xOffset", x);
//! program.set_uniform(&mut context, "yOffset", y);
//! // … issue draw calls
//! ```
//!
//! # Threads
//!
//! Graphics contexts are bound to a single thread. Neither contexts nor programs can be sent or
//! shared across threads.
//!
//! [`Program`]: crate::shader::Program
//! [`Program::uniform_warnings`]: crate::shader::Program::uniform_warnings
//! [`GraphicsContext`]: crate::context::GraphicsContext

#![deny(missing_docs)]

pub mod backend;
pub mod context;
pub mod shader;
