//! Unified pointer events and their translation from winit window events.
//!
//! Mouse, touch and pen input are reduced to a [`PointerEvent`] with an
//! optional pointer id, a button index and the screen position in physical
//! pixels. [`PointerTranslator`] keeps the last cursor position around since
//! winit only reports it on `CursorMoved`.

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
};

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventType {
    Down,
    Up,
    Move,
    Wheel,
    Pick,
    Tap,
    DoubleTap,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// `None` for devices that don't report one (the mouse in winit).
    pub pointer_id: Option<PointerId>,
    /// 0 = primary, 1 = middle, 2 = secondary, -1 = no button involved.
    pub button: i32,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(pointer_id: Option<PointerId>, button: i32, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            button,
            x,
            y,
        }
    }

    /// Pointer id with the mouse default of 0.
    pub fn id_or_default(&self) -> PointerId {
        self.pointer_id.unwrap_or(0)
    }
}

pub fn button_index(button: MouseButton) -> i32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(idx) => i32::from(idx),
    }
}

#[derive(Debug, Default)]
pub struct PointerTranslator {
    pub coords: PhysicalPosition<f64>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a window event into a pointer event, if it is one.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<(PointerEventType, PointerEvent)> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.coords = *position;
                Some((PointerEventType::Move, self.mouse_event(-1)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let kind = match state {
                    ElementState::Pressed => PointerEventType::Down,
                    ElementState::Released => PointerEventType::Up,
                };
                Some((kind, self.mouse_event(button_index(*button))))
            }
            WindowEvent::MouseWheel { .. } => Some((PointerEventType::Wheel, self.mouse_event(-1))),
            WindowEvent::Touch(touch) => {
                let (kind, button) = match touch.phase {
                    TouchPhase::Started => (PointerEventType::Down, 0),
                    TouchPhase::Moved => (PointerEventType::Move, -1),
                    TouchPhase::Ended | TouchPhase::Cancelled => (PointerEventType::Up, 0),
                };
                Some((
                    kind,
                    PointerEvent::new(
                        Some(touch.id),
                        button,
                        touch.location.x as f32,
                        touch.location.y as f32,
                    ),
                ))
            }
            _ => None,
        }
    }

    fn mouse_event(&self, button: i32) -> PointerEvent {
        PointerEvent::new(None, button, self.coords.x as f32, self.coords.y as f32)
    }
}
