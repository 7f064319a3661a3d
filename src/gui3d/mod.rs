//! 3D GUI: interactive controls living in an overlay scene.
//!
//! - `control`: the [`control::Control3D`] trait and shared pointer bookkeeping
//! - `container`: a control holding child controls
//! - `button`: a pressable box
//! - `manager`: hit-tests pointer input and drives the controls' callbacks

pub mod button;
pub mod container;
pub mod control;
pub mod manager;

pub use button::Button3D;
pub use container::Container3D;
pub use control::{Control3D, ControlId, ControlState, PointerPoint};
pub use manager::Gui3dManager;
