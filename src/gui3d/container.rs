use crate::gui3d::control::{Control3D, ControlId, ControlState};

/// A control that owns an ordered list of child controls.
///
/// The container has no geometry of its own. Layout of the children is up to
/// the caller (via each child's `transform`).
#[derive(Debug)]
pub struct Container3D {
    state: ControlState,
    children: Vec<Box<dyn Control3D>>,
}

impl Container3D {
    pub fn new(name: &str) -> Self {
        Self {
            state: ControlState::new(name),
            children: Vec::new(),
        }
    }

    pub fn add_control(&mut self, control: Box<dyn Control3D>) -> ControlId {
        let id = control.id();
        self.children.push(control);
        id
    }

    pub fn remove_control(&mut self, id: ControlId) -> Option<Box<dyn Control3D>> {
        let idx = self.children.iter().position(|child| child.id() == id)?;
        Some(self.children.remove(idx))
    }

    /// Only direct children are considered.
    pub fn contains_control(&self, id: ControlId) -> bool {
        self.children.iter().any(|child| child.id() == id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Control3D for Container3D {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn class_name(&self) -> &'static str {
        "Container3D"
    }

    fn children(&self) -> &[Box<dyn Control3D>] {
        &self.children
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Control3D>>> {
        Some(&mut self.children)
    }
}
