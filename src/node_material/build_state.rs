//! Accumulates the GLSL text produced while building node-material blocks.

use std::collections::HashMap;

use crate::node_material::{block::NodeMaterialBlockTargets, connection_point::ConnectionPointType};

/// Names the shader compiler reserves; they never go out bare.
const RESERVED_NAMES: [&str; 2] = ["output", "texture"];

#[derive(Debug)]
pub struct NodeMaterialBuildState {
    /// Prefix every emitted block and function with a comment.
    pub emit_comments: bool,
    pub target: NodeMaterialBlockTargets,
    pub compilation_string: String,
    functions: Vec<(String, String)>,
    variable_names: HashMap<String, u32>,
}

impl NodeMaterialBuildState {
    pub fn new(target: NodeMaterialBlockTargets) -> Self {
        Self {
            emit_comments: false,
            target,
            compilation_string: String::new(),
            functions: Vec::new(),
            variable_names: HashMap::new(),
        }
    }

    /// Registers a function definition under `name`. Only the first one is kept.
    pub fn emit_function(&mut self, name: &str, code: &str, comment: &str) {
        if self.functions.iter().any(|(existing, _)| existing == name) {
            return;
        }
        let code = if self.emit_comments && !comment.is_empty() {
            format!("{comment}\r\n{code}")
        } else {
            code.to_string()
        };
        self.functions.push((name.to_string(), code));
    }

    pub fn function(&self, name: &str) -> Option<&str> {
        self.functions
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, code)| code.as_str())
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|(name, _)| name.as_str())
    }

    /// Returns a variable name starting with `prefix` that is unique in this build.
    ///
    /// Everything but ASCII letters and `_` is stripped from the prefix. The
    /// first request gets the bare prefix, later ones `prefix1`, `prefix2`...
    pub fn get_free_variable_name(&mut self, prefix: &str) -> String {
        let prefix: String = prefix
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || *c == '_')
            .collect();
        match self.variable_names.get_mut(&prefix) {
            Some(counter) => {
                *counter += 1;
                format!("{prefix}{counter}")
            }
            None => {
                self.variable_names.insert(prefix.clone(), 0);
                if RESERVED_NAMES.contains(&prefix.as_str()) {
                    format!("{prefix}0")
                } else {
                    prefix
                }
            }
        }
    }

    pub fn gl_type(&self, point_type: ConnectionPointType) -> &'static str {
        match point_type {
            ConnectionPointType::Float => "float",
            ConnectionPointType::Int => "int",
            ConnectionPointType::Vector2 => "vec2",
            ConnectionPointType::Vector3 | ConnectionPointType::Color3 => "vec3",
            ConnectionPointType::Vector4 | ConnectionPointType::Color4 => "vec4",
            ConnectionPointType::Matrix => "mat4",
        }
    }

    /// Function definitions in emission order, followed by the compilation string.
    pub fn shader_code(&self) -> String {
        let mut code = String::new();
        for (_, function) in &self.functions {
            code.push_str(function);
            code.push('\n');
        }
        code.push_str(&self.compilation_string);
        code
    }
}

impl Default for NodeMaterialBuildState {
    fn default() -> Self {
        Self::new(NodeMaterialBlockTargets::Fragment)
    }
}
