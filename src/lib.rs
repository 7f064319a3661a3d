//! flow-gui3d
//!
//! 3D GUI picking and procedural node-material blocks for instancing-oriented
//! wgpu engines, with native and WASM support. Pointer input is hit-tested
//! against an overlay scene and routed to the topmost interactive 3D control;
//! node-material blocks expand into GLSL text for a material to compile.
//!
//! High-level modules
//! - `camera`: camera and projection types, screen-to-world rays
//! - `data_structures`: transforms, pickable meshes, rays and pick results
//! - `gui3d`: 3D controls and the manager dispatching pointer input to them
//! - `node_material`: node-material blocks, sockets and the build state
//! - `observable`: callback lists with explicit subscription handles
//! - `pointer`: unified pointer events and winit event translation
//! - `scene`: pickable scenes hosting pointer input
//! - `utility_layer`: the overlay scene holding 3D GUI geometry
//!

pub mod camera;
pub mod data_structures;
pub mod gui3d;
pub mod node_material;
pub mod observable;
pub mod pointer;
pub mod scene;
pub mod utility_layer;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;

/// Installs the platform logger: `env_logger` natively, `console_log` on the web.
///
/// Safe to call more than once.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
