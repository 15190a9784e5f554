//! Pointer interaction
//!
//! Converts pointer events to normalized device coordinates, casts a ray from
//! the scene camera and reports what it hit. Hover is tracked across events:
//! moving onto a drawable emits `Enter`, moving off it (or the drawable
//! leaving the scene) emits `Leave`.

use std::any::Any;

use super::Capability;
use crate::config::ViewportConfig;
use crate::error::Result;
use crate::events::{InputEvent, PointerButton};
use crate::foundation::math::Vec2;
use crate::lifecycle::{LifecycleManager, SceneHooks};
use crate::scene::{DrawableId, PickHit, SceneGraph};

/// What happened
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEventKind {
    /// Pointer moved
    Move,
    /// Button pressed
    Press(PointerButton),
    /// Button released
    Release(PointerButton),
    /// Pointer moved onto a drawable
    Enter(DrawableId),
    /// Pointer moved off a drawable
    Leave(DrawableId),
}

/// Pointer event resolved against the scene
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// What happened
    pub kind: PointerEventKind,
    /// Position in pixels from the top-left corner
    pub screen: Vec2,
    /// Position in normalized device coordinates, y up
    pub ndc: Vec2,
    /// Nearest pickable drawable under the pointer
    pub hit: Option<PickHit>,
}

type PointerHandler = Box<dyn FnMut(&PointerEvent)>;

/// Picks drawables under the pointer
#[derive(Default)]
pub struct PointerInteraction {
    handler: Option<PointerHandler>,
    hovered: Option<DrawableId>,
    position: Option<Vec2>,
}

impl PointerInteraction {
    /// Capability with no handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every pointer event
    pub fn set_handler(&mut self, handler: impl FnMut(&PointerEvent) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Drawable currently under the pointer
    pub fn hovered(&self) -> Option<&DrawableId> {
        self.hovered.as_ref()
    }

    /// Last known pointer position in pixels
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    fn emit(&mut self, kind: PointerEventKind, screen: Vec2, ndc: Vec2, hit: Option<PickHit>) {
        if let Some(handler) = self.handler.as_mut() {
            handler(&PointerEvent { kind, screen, ndc, hit });
        }
    }

    fn update_hover(&mut self, screen: Vec2, ndc: Vec2, hit: Option<&PickHit>) {
        let target = hit.map(|h| h.id.clone());
        if self.hovered == target {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            log::trace!("Pointer left '{previous}'");
            self.emit(PointerEventKind::Leave(previous), screen, ndc, hit.cloned());
        }
        if let Some(current) = target {
            log::trace!("Pointer entered '{current}'");
            self.hovered = Some(current.clone());
            self.emit(PointerEventKind::Enter(current), screen, ndc, hit.cloned());
        }
    }
}

/// Pixel position to normalized device coordinates, or `None` for an empty viewport
pub fn screen_to_ndc(x: f64, y: f64, viewport: &ViewportConfig) -> Option<Vec2> {
    if viewport.width == 0 || viewport.height == 0 {
        return None;
    }
    let ndc_x = 2.0 * x / f64::from(viewport.width) - 1.0;
    let ndc_y = 1.0 - 2.0 * y / f64::from(viewport.height);
    Some(Vec2::new(ndc_x as f32, ndc_y as f32))
}

impl Capability for PointerInteraction {
    fn name(&self) -> &'static str {
        "pointer_interaction"
    }

    fn on_event(&mut self, scene: &SceneGraph, viewport: &ViewportConfig, event: &InputEvent) {
        let Some((x, y)) = event.pointer_position() else {
            return;
        };
        let Some(ndc) = screen_to_ndc(x, y, viewport) else {
            return;
        };
        let screen = Vec2::new(x as f32, y as f32);
        self.position = Some(screen);

        let hit = scene.pick(&scene.camera().ray_from_ndc(ndc.x, ndc.y));
        let kind = match *event {
            InputEvent::PointerMoved { .. } => {
                self.update_hover(screen, ndc, hit.as_ref());
                PointerEventKind::Move
            }
            InputEvent::PointerPressed { button, .. } => PointerEventKind::Press(button),
            InputEvent::PointerReleased { button, .. } => PointerEventKind::Release(button),
            InputEvent::Resized { .. } | InputEvent::CloseRequested => return,
        };
        self.emit(kind, screen, ndc, hit);
    }

    fn on_update(&mut self, scene: &SceneGraph, _delta_time: f32) {
        let removed = self.hovered.as_ref().is_some_and(|id| !scene.contains(id.as_str()));
        if removed {
            if let Some(previous) = self.hovered.take() {
                let screen = self.position.unwrap_or_else(Vec2::zeros);
                self.emit(PointerEventKind::Leave(previous), screen, Vec2::zeros(), None);
            }
        }
    }

    fn on_dispose(&mut self) {
        self.hovered = None;
        self.handler = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<H: SceneHooks> LifecycleManager<H> {
    /// Route pointer events to `handler`.
    ///
    /// Fails with a capability error unless [`PointerInteraction`] was added.
    pub fn set_pointer_handler(&mut self, handler: impl FnMut(&PointerEvent) + 'static) -> Result<()> {
        self.capabilities
            .require_mut::<PointerInteraction>("pointer_interaction")?
            .set_handler(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{MaterialDescriptor, MaterialTag, ResourceStore, ShapeDescriptor, ShapeTag};
    use crate::scene::{Camera, ObjectDescriptor, ObjectFactory};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scene_with_cube() -> (ObjectFactory, SceneGraph) {
        let resources = ResourceStore::shared();
        let factory = ObjectFactory::new(resources.clone());
        let mut scene = SceneGraph::new(resources, Camera::default());
        let cube = factory
            .create_drawable(&ObjectDescriptor::new(
                ShapeDescriptor::new(ShapeTag::Box),
                MaterialDescriptor::new(MaterialTag::Unlit),
            ))
            .unwrap();
        scene.add(cube, Some("cube")).unwrap();
        (factory, scene)
    }

    fn recording() -> (PointerInteraction, Rc<RefCell<Vec<PointerEventKind>>>) {
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let sink = kinds.clone();
        let mut pointer = PointerInteraction::new();
        pointer.set_handler(move |e| sink.borrow_mut().push(e.kind.clone()));
        (pointer, kinds)
    }

    #[test]
    fn test_screen_to_ndc() {
        let viewport = ViewportConfig { width: 200, height: 100 };
        let center = screen_to_ndc(100.0, 50.0, &viewport).unwrap();
        assert_relative_eq!(center.x, 0.0);
        assert_relative_eq!(center.y, 0.0);

        let top_left = screen_to_ndc(0.0, 0.0, &viewport).unwrap();
        assert_relative_eq!(top_left.x, -1.0);
        assert_relative_eq!(top_left.y, 1.0);

        assert!(screen_to_ndc(1.0, 1.0, &ViewportConfig { width: 0, height: 10 }).is_none());
    }

    #[test]
    fn test_enter_move_leave() {
        let (_factory, scene) = scene_with_cube();
        let viewport = ViewportConfig::default();
        let (mut pointer, kinds) = recording();

        let center = InputEvent::PointerMoved { x: 640.0, y: 360.0 };
        pointer.on_event(&scene, &viewport, &center);
        assert_eq!(pointer.hovered().map(DrawableId::as_str), Some("cube"));

        pointer.on_event(&scene, &viewport, &center);
        pointer.on_event(&scene, &viewport, &InputEvent::PointerMoved { x: 0.0, y: 0.0 });
        assert!(pointer.hovered().is_none());

        let cube = DrawableId::from("cube");
        assert_eq!(
            *kinds.borrow(),
            vec![
                PointerEventKind::Enter(cube.clone()),
                PointerEventKind::Move,
                PointerEventKind::Move,
                PointerEventKind::Leave(cube),
                PointerEventKind::Move,
            ]
        );
    }

    #[test]
    fn test_press_reports_hit() {
        let (_factory, scene) = scene_with_cube();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = hits.clone();
        let mut pointer = PointerInteraction::new();
        pointer.set_handler(move |e| sink.borrow_mut().push(e.hit.as_ref().map(|h| h.id.clone())));

        let press = InputEvent::PointerPressed { button: PointerButton::Primary, x: 640.0, y: 360.0 };
        pointer.on_event(&scene, &ViewportConfig::default(), &press);
        assert_eq!(*hits.borrow(), vec![Some(DrawableId::from("cube"))]);
    }

    #[test]
    fn test_leave_when_hovered_drawable_removed() {
        let (_factory, mut scene) = scene_with_cube();
        let (mut pointer, kinds) = recording();
        pointer.on_event(&scene, &ViewportConfig::default(), &InputEvent::PointerMoved { x: 640.0, y: 360.0 });

        scene.remove("cube");
        pointer.on_update(&scene, 0.016);
        assert!(pointer.hovered().is_none());
        assert_eq!(kinds.borrow().last(), Some(&PointerEventKind::Leave(DrawableId::from("cube"))));
    }
}
