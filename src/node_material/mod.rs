//! Node-material blocks generating GLSL fragments.
//!
//! Only text is produced here; compiling and binding the resulting shader is
//! up to the material that owns the blocks.

pub mod block;
pub mod build_state;
pub mod cloud_block;
pub mod connection_point;

pub use block::{BlockBase, NodeMaterialBlock, NodeMaterialBlockTargets};
pub use build_state::NodeMaterialBuildState;
pub use cloud_block::CloudBlock;
pub use connection_point::{
    ConnectionPointDirection, ConnectionPointType, NodeMaterialConnectionPoint, PointId, connect,
    disconnect,
};
