//! Pointer-driven manipulation of floating elements.

use crate::elements::{ElementId, ElementPatch, FloatingElement, MIN_ELEMENT_SIZE};
use crate::view::{Geometry, rotation_angle, screen_delta_to_doc_delta};
use kurbo::Point;

/// What a drag gesture does to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Dragging the element body.
    Move,
    /// Dragging the bottom-right resize handle.
    Resize,
    /// Dragging the rotation handle.
    Rotate,
}

/// An active drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    pub element_id: ElementId,
    /// Element geometry when the gesture started.
    pub origin: Geometry,
    /// Page-local screen position of the pointer when the gesture started.
    pub pointer_origin: Point,
}

impl DragState {
    /// Geometry of the element for the pointer at `pointer`.
    pub fn geometry_at(&self, pointer: Point, view_scale: f64) -> Geometry {
        let mut geometry = self.origin;
        match self.mode {
            DragMode::Move => {
                let delta = screen_delta_to_doc_delta(pointer - self.pointer_origin, view_scale);
                geometry.position = self.origin.position + delta;
            }
            DragMode::Resize => {
                let delta = screen_delta_to_doc_delta(pointer - self.pointer_origin, view_scale);
                geometry.width = (self.origin.width + delta.x).max(MIN_ELEMENT_SIZE);
                geometry.height = (self.origin.height + delta.y).max(MIN_ELEMENT_SIZE);
            }
            DragMode::Rotate => {
                // Centre is fixed at drag start.
                geometry.rotation = rotation_angle(pointer, self.origin.center(), view_scale);
            }
        }
        geometry
    }

    /// Patch carrying only the fields this mode changes.
    fn patch_at(&self, pointer: Point, view_scale: f64) -> ElementPatch {
        let geometry = self.geometry_at(pointer, view_scale);
        match self.mode {
            DragMode::Move => ElementPatch::position(geometry.position),
            DragMode::Resize => ElementPatch::size(geometry.width, geometry.height),
            DragMode::Rotate => ElementPatch::rotation(geometry.rotation),
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragState),
}

/// Output of the controller, applied by the owner of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Live geometry update during a drag. Not recorded in history.
    ElementUpdated { id: ElementId, patch: ElementPatch },
    /// The drag finished; the gesture should become one history entry.
    ElementCommitted { id: ElementId, origin: Geometry },
    /// The drag was abandoned; the origin geometry should be restored.
    ElementRestored { id: ElementId, patch: ElementPatch },
}

/// Selection plus the move/resize/rotate state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    selection: Option<ElementId>,
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection == Some(id)
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    pub fn select(&mut self, id: ElementId) {
        self.selection = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Start a gesture on `element`. Selects it and captures its geometry.
    /// Any gesture already in progress is replaced.
    pub fn pointer_down(&mut self, element: &FloatingElement, mode: DragMode, pointer: Point) {
        if let InteractionState::Dragging(drag) = &self.state {
            log::debug!("pointer_down while dragging {}, dropping old gesture", drag.element_id);
        }
        self.selection = Some(element.id());
        self.state = InteractionState::Dragging(DragState {
            mode,
            element_id: element.id(),
            origin: element.geometry(),
            pointer_origin: pointer,
        });
    }

    /// Pointer moved while the button is held.
    pub fn pointer_move(&self, pointer: Point, view_scale: f64) -> Option<InteractionEvent> {
        match &self.state {
            InteractionState::Dragging(drag) => Some(InteractionEvent::ElementUpdated {
                id: drag.element_id,
                patch: drag.patch_at(pointer, view_scale),
            }),
            InteractionState::Idle => None,
        }
    }

    /// Button released. Ends the gesture exactly once.
    pub fn pointer_up(&mut self) -> Option<InteractionEvent> {
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => Some(InteractionEvent::ElementCommitted {
                id: drag.element_id,
                origin: drag.origin,
            }),
            InteractionState::Idle => None,
        }
    }

    /// Abandon the gesture in progress, restoring the origin geometry.
    pub fn cancel(&mut self) -> Option<InteractionEvent> {
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => Some(InteractionEvent::ElementRestored {
                id: drag.element_id,
                patch: ElementPatch::geometry(drag.origin),
            }),
            InteractionState::Idle => None,
        }
    }

    /// Forget the gesture in progress without producing an event.
    pub fn reset_drag(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// An element was removed from the document.
    pub fn element_deleted(&mut self, id: ElementId) {
        if self.selection == Some(id) {
            self.selection = None;
        }
        if matches!(&self.state, InteractionState::Dragging(drag) if drag.element_id == id) {
            self.state = InteractionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, TextContent};

    fn element_at(x: f64, y: f64, width: f64, height: f64) -> FloatingElement {
        FloatingElement::new(
            ElementKind::Text(TextContent::default()),
            Geometry::new(Point::new(x, y), width, height),
        )
    }

    fn updated_patch(event: Option<InteractionEvent>) -> ElementPatch {
        match event {
            Some(InteractionEvent::ElementUpdated { patch, .. }) => patch,
            other => panic!("Expected ElementUpdated, got {:?}", other),
        }
    }

    #[test]
    fn test_move_at_unit_scale() {
        let el = element_at(100.0, 100.0, 200.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::new(500.0, 500.0));
        assert_eq!(controller.selection(), Some(el.id()));
        assert!(controller.is_dragging());

        let patch = updated_patch(controller.pointer_move(Point::new(550.0, 530.0), 1.0));
        assert_eq!(patch, ElementPatch::position(Point::new(150.0, 130.0)));
    }

    #[test]
    fn test_move_under_half_scale() {
        let el = element_at(100.0, 100.0, 200.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::new(0.0, 0.0));
        let patch = updated_patch(controller.pointer_move(Point::new(20.0, -10.0), 0.5));
        assert_eq!((patch.x, patch.y), (Some(140.0), Some(80.0)));
    }

    #[test]
    fn test_moves_are_cumulative_from_origin() {
        let el = element_at(10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::new(0.0, 0.0));
        let _ = controller.pointer_move(Point::new(100.0, 100.0), 1.0);
        let patch = updated_patch(controller.pointer_move(Point::new(5.0, 0.0), 1.0));
        assert_eq!((patch.x, patch.y), (Some(15.0), Some(10.0)));
    }

    #[test]
    fn test_resize_never_below_minimum() {
        let el = element_at(0.0, 0.0, 100.0, 60.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Resize, Point::new(100.0, 60.0));

        for (dx, dy) in [(-1000.0, -1000.0), (-90.0, 10.0), (50.0, -45.0), (0.0, 0.0)] {
            let pointer = Point::new(100.0 + dx, 60.0 + dy);
            let patch = updated_patch(controller.pointer_move(pointer, 1.0));
            assert!(patch.width.unwrap() >= MIN_ELEMENT_SIZE);
            assert!(patch.height.unwrap() >= MIN_ELEMENT_SIZE);
        }
        let patch = updated_patch(controller.pointer_move(Point::new(150.0, 80.0), 1.0));
        assert_eq!((patch.width, patch.height), (Some(150.0), Some(80.0)));
    }

    #[test]
    fn test_rotate_uses_fixed_center() {
        // Centre at (100, 100).
        let el = element_at(50.0, 50.0, 100.0, 100.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Rotate, Point::new(100.0, 0.0));

        let patch = updated_patch(controller.pointer_move(Point::new(100.0, 200.0), 1.0));
        assert!((patch.rotation.unwrap() - 90.0).abs() < 1e-9);

        // At half scale the pointer (50, 0) is document (100, 0), straight above.
        let patch = updated_patch(controller.pointer_move(Point::new(50.0, 0.0), 0.5));
        assert!((patch.rotation.unwrap() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_up_commits_exactly_once() {
        let el = element_at(0.0, 0.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::ZERO);

        let event = controller.pointer_up();
        assert_eq!(
            event,
            Some(InteractionEvent::ElementCommitted { id: el.id(), origin: el.geometry() })
        );
        assert!(!controller.is_dragging());
        assert_eq!(controller.pointer_up(), None);
        assert_eq!(controller.pointer_move(Point::new(5.0, 5.0), 1.0), None);
        // Selection survives the release.
        assert_eq!(controller.selection(), Some(el.id()));
    }

    #[test]
    fn test_cancel_restores_origin() {
        let el = element_at(30.0, 40.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::ZERO);
        match controller.cancel() {
            Some(InteractionEvent::ElementRestored { id, patch }) => {
                assert_eq!(id, el.id());
                assert_eq!(patch, ElementPatch::geometry(el.geometry()));
            }
            other => panic!("Expected ElementRestored, got {:?}", other),
        }
        assert_eq!(controller.cancel(), None);
    }

    #[test]
    fn test_element_deleted_clears_selection_and_drag() {
        let el = element_at(0.0, 0.0, 50.0, 50.0);
        let other = element_at(0.0, 0.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&el, DragMode::Move, Point::ZERO);

        controller.element_deleted(other.id());
        assert!(controller.is_dragging());
        assert_eq!(controller.selection(), Some(el.id()));

        controller.element_deleted(el.id());
        assert!(!controller.is_dragging());
        assert_eq!(controller.selection(), None);
        assert_eq!(controller.pointer_up(), None);
    }
}
