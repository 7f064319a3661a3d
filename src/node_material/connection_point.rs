//! Typed sockets of node-material blocks and the connections between them.

use std::{
    cell::RefCell,
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

use anyhow::bail;

static NEXT_POINT_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointId(u32);

impl PointId {
    fn next() -> Self {
        Self(NEXT_POINT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionPointType {
    Float,
    Int,
    Vector2,
    Vector3,
    Vector4,
    Color3,
    Color4,
    Matrix,
}

impl ConnectionPointType {
    /// Colours are interchangeable with vectors of the same width.
    pub fn is_compatible_with(self, other: Self) -> bool {
        use ConnectionPointType::*;
        self == other
            || matches!(
                (self, other),
                (Color3, Vector3) | (Vector3, Color3) | (Color4, Vector4) | (Vector4, Color4)
            )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionPointDirection {
    Input,
    Output,
}

#[derive(Debug)]
struct Connection {
    output: PointId,
    variable: Rc<RefCell<String>>,
}

#[derive(Debug)]
pub struct NodeMaterialConnectionPoint {
    id: PointId,
    pub name: String,
    point_type: ConnectionPointType,
    direction: ConnectionPointDirection,
    is_optional: bool,
    // Shared with the inputs connected to this output.
    variable: Rc<RefCell<String>>,
    connection: Option<Connection>,
    endpoints: Vec<PointId>,
}

impl NodeMaterialConnectionPoint {
    fn new(
        name: &str,
        point_type: ConnectionPointType,
        direction: ConnectionPointDirection,
        is_optional: bool,
    ) -> Self {
        Self {
            id: PointId::next(),
            name: name.to_string(),
            point_type,
            direction,
            is_optional,
            variable: Rc::new(RefCell::new(String::new())),
            connection: None,
            endpoints: Vec::new(),
        }
    }

    pub fn input(name: &str, point_type: ConnectionPointType, is_optional: bool) -> Self {
        Self::new(name, point_type, ConnectionPointDirection::Input, is_optional)
    }

    pub fn output(name: &str, point_type: ConnectionPointType) -> Self {
        Self::new(name, point_type, ConnectionPointDirection::Output, false)
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn point_type(&self) -> ConnectionPointType {
        self.point_type
    }

    pub fn direction(&self) -> ConnectionPointDirection {
        self.direction
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn is_connected(&self) -> bool {
        match self.direction {
            ConnectionPointDirection::Input => self.connection.is_some(),
            ConnectionPointDirection::Output => !self.endpoints.is_empty(),
        }
    }

    pub fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[PointId] {
        &self.endpoints
    }

    /// Id of the output feeding this input.
    pub fn connected_point(&self) -> Option<PointId> {
        self.connection.as_ref().map(|connection| connection.output)
    }

    /// The shader variable holding this point's value.
    ///
    /// Inputs report the variable of the output they are connected to, or an
    /// empty string when unconnected. Outputs report their own, which stays
    /// empty until the owning block is built.
    pub fn associated_variable_name(&self) -> String {
        match &self.connection {
            Some(connection) => connection.variable.borrow().clone(),
            None => self.variable.borrow().clone(),
        }
    }

    pub fn set_associated_variable_name(&self, name: &str) {
        *self.variable.borrow_mut() = name.to_string();
    }
}

/// Connects `output` to `input`.
///
/// Fails if the directions are wrong, the input is already fed by another
/// output or the types don't match.
pub fn connect(
    output: &mut NodeMaterialConnectionPoint,
    input: &mut NodeMaterialConnectionPoint,
) -> anyhow::Result<()> {
    if output.direction != ConnectionPointDirection::Output {
        bail!("Cannot connect from {}: it is not an output", output.name);
    }
    if input.direction != ConnectionPointDirection::Input {
        bail!("Cannot connect to {}: it is not an input", input.name);
    }
    if let Some(existing) = input.connected_point() {
        bail!("Input {} is already connected to {:?}", input.name, existing);
    }
    if !output.point_type.is_compatible_with(input.point_type) {
        bail!(
            "Cannot connect {} ({:?}) to {} ({:?}): incompatible types",
            output.name,
            output.point_type,
            input.name,
            input.point_type
        );
    }
    output.endpoints.push(input.id);
    input.connection = Some(Connection {
        output: output.id,
        variable: output.variable.clone(),
    });
    Ok(())
}

/// Returns false if `input` was not connected to `output`.
pub fn disconnect(
    output: &mut NodeMaterialConnectionPoint,
    input: &mut NodeMaterialConnectionPoint,
) -> bool {
    if input.connected_point() != Some(output.id) {
        return false;
    }
    input.connection = None;
    output.endpoints.retain(|endpoint| *endpoint != input.id);
    true
}
