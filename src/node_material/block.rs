//! The node-material block abstraction.
//!
//! A block owns a fixed, ordered set of input and output sockets. Building a
//! block appends its GLSL to a [`NodeMaterialBuildState`]: the shared
//! [`NodeMaterialBlock::build`] step names the outputs, then the block's own
//! [`NodeMaterialBlock::build_block`] emits the code.

use crate::node_material::{
    build_state::NodeMaterialBuildState,
    connection_point::{ConnectionPointType, NodeMaterialConnectionPoint},
};

/// Shader stage(s) a block or build applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeMaterialBlockTargets {
    Vertex,
    Fragment,
    VertexAndFragment,
    /// Runs in whichever stage needs it.
    Neutral,
}

impl NodeMaterialBlockTargets {
    pub fn intersects(self, other: Self) -> bool {
        use NodeMaterialBlockTargets::*;
        match (self, other) {
            (Neutral, _) | (_, Neutral) => true,
            (VertexAndFragment, _) | (_, VertexAndFragment) => true,
            (lhs, rhs) => lhs == rhs,
        }
    }
}

#[derive(Debug)]
pub struct BlockBase {
    pub name: String,
    pub target: NodeMaterialBlockTargets,
    inputs: Vec<NodeMaterialConnectionPoint>,
    outputs: Vec<NodeMaterialConnectionPoint>,
}

impl BlockBase {
    pub fn new(name: &str, target: NodeMaterialBlockTargets) -> Self {
        Self {
            name: name.to_string(),
            target,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn register_input(&mut self, name: &str, point_type: ConnectionPointType, is_optional: bool) {
        self.inputs
            .push(NodeMaterialConnectionPoint::input(name, point_type, is_optional));
    }

    pub fn register_output(&mut self, name: &str, point_type: ConnectionPointType) {
        self.outputs
            .push(NodeMaterialConnectionPoint::output(name, point_type));
    }

    pub fn inputs(&self) -> &[NodeMaterialConnectionPoint] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[NodeMaterialConnectionPoint] {
        &self.outputs
    }

    pub fn inputs_mut(&mut self) -> &mut [NodeMaterialConnectionPoint] {
        &mut self.inputs
    }

    pub fn outputs_mut(&mut self) -> &mut [NodeMaterialConnectionPoint] {
        &mut self.outputs
    }

    pub fn input(&self, name: &str) -> Option<&NodeMaterialConnectionPoint> {
        self.inputs.iter().find(|point| point.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&NodeMaterialConnectionPoint> {
        self.outputs.iter().find(|point| point.name == name)
    }

    /// `<gl type> <variable>` for declaring `output` in the compilation string.
    pub fn declare_output(
        &self,
        output: &NodeMaterialConnectionPoint,
        state: &NodeMaterialBuildState,
    ) -> String {
        format!(
            "{} {}",
            state.gl_type(output.point_type()),
            output.associated_variable_name()
        )
    }
}

pub trait NodeMaterialBlock {
    fn base(&self) -> &BlockBase;

    fn base_mut(&mut self) -> &mut BlockBase;

    fn class_name(&self) -> &'static str {
        "NodeMaterialBlock"
    }

    fn name(&self) -> &str {
        &self.base().name
    }

    /// Block specific code generation, run after outputs got their variables.
    fn build_block(&mut self, state: &mut NodeMaterialBuildState);

    /// Assigns variable names to unnamed outputs, then emits the block's code.
    ///
    /// Blocks whose target doesn't apply to the state's stage emit nothing.
    fn build(&mut self, state: &mut NodeMaterialBuildState) {
        let base = self.base();
        if !base.target.intersects(state.target) {
            log::debug!(
                "Skipping block {}: target {:?} does not apply to {:?}",
                base.name,
                base.target,
                state.target
            );
            return;
        }
        for output in base.outputs() {
            if output.associated_variable_name().is_empty() {
                let name = state.get_free_variable_name(&output.name);
                output.set_associated_variable_name(&name);
            }
        }
        if state.emit_comments {
            state.compilation_string.push_str(&format!("//{}\r\n", base.name));
        }
        self.build_block(state);
    }
}
