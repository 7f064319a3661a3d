use crate::node_material::{
    block::{BlockBase, NodeMaterialBlock, NodeMaterialBlockTargets},
    build_state::NodeMaterialBuildState,
    connection_point::{ConnectionPointType, NodeMaterialConnectionPoint},
};

const SEED: usize = 0;
const GAIN: usize = 1;
const LACUNARITY: usize = 2;
const TIME: usize = 3;
const OUTPUT: usize = 0;

const CLOUD_FUNCTIONS: &str = r#"float cloudRandom (in vec2 st) {
            return fract(sin(dot(st.xy,
                                 vec2(12.9898,78.233)))*
                43758.5453123);
        }
        
        // Based on Morgan McGuire @morgan3d
        // https://www.shadertoy.com/view/4dS3Wd
        float noise (in vec2 st) {
            vec2 i = floor(st);
            vec2 f = fract(st);
        
            // Four corners in 2D of a tile
            float a = cloudRandom(i);
            float b = cloudRandom(i + vec2(1.0, 0.0));
            float c = cloudRandom(i + vec2(0.0, 1.0));
            float d = cloudRandom(i + vec2(1.0, 1.0));
        
            vec2 u = f * f * (3.0 - 2.0 * f);
        
            return mix(a, b, u.x) +
                    (c - a)* u.y * (1.0 - u.x) +
                    (d - b) * u.x * u.y;
        }
        
        float fbm (in vec2 st, in float gain, in float lacunarity) {
            // Initial values
            float value = 0.0;
            float amplitude = .5;
            float frequency = 0.;

            // Loop of octaves
            for (int i = 0; i < OCTAVES; i++) {
                value += amplitude * noise(st);
                st *= lacunarity;
                amplitude *= gain;
            }
            return value;
        }"#;

/// Fractal Brownian motion clouds.
///
/// Inputs: `seed` (vec2), optional `gain` and `lacunarity` (float) and an
/// optional `time` (vec2) scrolling the pattern. Output: `output` (vec3).
#[derive(Debug)]
pub struct CloudBlock {
    base: BlockBase,
    /// Number of noise layers summed by `fbm`. Truncated to an integer.
    pub octaves: f32,
}

impl CloudBlock {
    pub fn new(name: &str) -> Self {
        let mut base = BlockBase::new(name, NodeMaterialBlockTargets::Neutral);
        base.register_input("seed", ConnectionPointType::Vector2, false);
        base.register_input("gain", ConnectionPointType::Float, true);
        base.register_input("lacunarity", ConnectionPointType::Float, true);
        base.register_input("time", ConnectionPointType::Vector2, true);
        base.register_output("output", ConnectionPointType::Vector3);
        Self { base, octaves: 6.0 }
    }

    pub fn seed(&self) -> &NodeMaterialConnectionPoint {
        &self.base.inputs()[SEED]
    }

    pub fn seed_mut(&mut self) -> &mut NodeMaterialConnectionPoint {
        &mut self.base.inputs_mut()[SEED]
    }

    pub fn gain(&self) -> &NodeMaterialConnectionPoint {
        &self.base.inputs()[GAIN]
    }

    pub fn gain_mut(&mut self) -> &mut NodeMaterialConnectionPoint {
        &mut self.base.inputs_mut()[GAIN]
    }

    pub fn lacunarity(&self) -> &NodeMaterialConnectionPoint {
        &self.base.inputs()[LACUNARITY]
    }

    pub fn lacunarity_mut(&mut self) -> &mut NodeMaterialConnectionPoint {
        &mut self.base.inputs_mut()[LACUNARITY]
    }

    pub fn time(&self) -> &NodeMaterialConnectionPoint {
        &self.base.inputs()[TIME]
    }

    pub fn time_mut(&mut self) -> &mut NodeMaterialConnectionPoint {
        &mut self.base.inputs_mut()[TIME]
    }

    pub fn output(&self) -> &NodeMaterialConnectionPoint {
        &self.base.outputs()[OUTPUT]
    }

    pub fn output_mut(&mut self) -> &mut NodeMaterialConnectionPoint {
        &mut self.base.outputs_mut()[OUTPUT]
    }

    /// The helper functions with the loop bound set to `octaves`.
    pub fn function_code(&self) -> String {
        CLOUD_FUNCTIONS.replace("OCTAVES", &(self.octaves as i32).to_string())
    }

    fn input_or(&self, index: usize, fallback: &str) -> String {
        let input = &self.base.inputs()[index];
        if input.is_connected() {
            input.associated_variable_name()
        } else {
            fallback.to_string()
        }
    }
}

impl NodeMaterialBlock for CloudBlock {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn class_name(&self) -> &'static str {
        "CloudBlock"
    }

    fn build_block(&mut self, state: &mut NodeMaterialBuildState) {
        if !self.seed().is_connected() {
            log::debug!("{}: seed is not connected, emitting nothing", self.base.name);
            return;
        }
        if !self.output().has_endpoints() {
            return;
        }

        state.emit_function("CloudBlockCode", &self.function_code(), "// CloudBlockCode");

        let st = state.get_free_variable_name("st");
        state.compilation_string.push_str(&format!(
            "vec2 {st} = {};\r\n",
            self.seed().associated_variable_name()
        ));
        if self.time().is_connected() {
            state.compilation_string.push_str(&format!(
                "{st} += 0.1 * {};\r\n",
                self.time().associated_variable_name()
            ));
        }
        let gain = self.input_or(GAIN, "0.5");
        let lacunarity = self.input_or(LACUNARITY, "2.0");
        let declaration = self.base.declare_output(self.output(), state);
        state.compilation_string.push_str(&format!(
            "{declaration} = vec3(0.0) + fbm({st}, {gain}, {lacunarity});\r\n"
        ));
    }
}
