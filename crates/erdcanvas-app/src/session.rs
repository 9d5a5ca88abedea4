//! Script replay against an interaction controller.

use erdcanvas_core::{
    CanvasConfig, CanvasEvent, ConfigError, DragPayload, EventOutcome, InteractionController, NodeId,
    PaletteError, PaletteSource, RenderScene,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors while running a session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Palette has no template {0}")]
    UnknownTemplate(NodeId),
}

/// One line of a replay script.
///
/// `{"pick": "employees"}` starts a palette drag by template id; anything
/// else is a raw [`CanvasEvent`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Pick { pick: NodeId },
    Event(CanvasEvent),
}

/// Parse a script from its JSON array form.
pub fn parse_script(json: &str) -> Result<Vec<Step>, AppError> {
    Ok(serde_json::from_str(json)?)
}

/// A controller plus the palette it draws from.
///
/// Stands in for the host page: it carries the drag payload from the
/// palette drag start to the canvas drop.
pub struct Session<P: PaletteSource> {
    controller: InteractionController,
    palette: P,
    in_flight: Option<DragPayload>,
}

impl<P: PaletteSource> Session<P> {
    pub fn new(palette: P, config: &CanvasConfig) -> Self {
        Self {
            controller: InteractionController::with_config(config),
            palette,
            in_flight: None,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Apply a single script step.
    pub fn apply(&mut self, step: Step) -> Result<EventOutcome, AppError> {
        let event = match step {
            Step::Pick { pick } => {
                let template = self
                    .palette
                    .template(&pick)
                    .ok_or_else(|| AppError::UnknownTemplate(pick.clone()))?;
                CanvasEvent::PaletteDragStart {
                    template: template.clone(),
                }
            }
            Step::Event(CanvasEvent::CanvasDrop { position, payload }) if payload.is_empty() => {
                CanvasEvent::CanvasDrop {
                    position,
                    payload: self.in_flight.take().unwrap_or_default(),
                }
            }
            Step::Event(event) => event,
        };

        log::trace!("Step: {:?}", event);
        let outcome = self.controller.handle_event(event);
        if let EventOutcome::Payload(payload) = &outcome {
            self.in_flight = Some(payload.clone());
        }
        self.controller.tick();
        Ok(outcome)
    }

    /// Apply every step in order and return the final scene.
    pub fn replay(&mut self, steps: impl IntoIterator<Item = Step>) -> Result<RenderScene, AppError> {
        let mut applied = 0usize;
        let mut total = 0usize;
        for step in steps {
            total += 1;
            if self.apply(step)? != EventOutcome::Ignored {
                applied += 1;
            }
        }
        log::info!("Replayed {} steps ({} applied)", total, applied);
        Ok(self.controller.scene())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erdcanvas_core::{GestureKind, NotificationKind, Palette};

    const SCRIPT: &str = r#"[
        { "pick": "employees" },
        { "type": "canvas_drop", "position": { "x": 40.0, "y": 40.0 } },
        { "pick": "departments" },
        { "type": "canvas_drop", "position": { "x": 500.0, "y": 40.0 } },
        { "type": "grip_down", "node_id": "departments", "position": { "x": 510.0, "y": 50.0 } },
        { "type": "move", "position": { "x": 600.0, "y": 100.0 } },
        { "type": "up", "position": { "x": 600.0, "y": 100.0 } },
        { "type": "column_drag_start", "node_id": "employees", "column_id": "emp_dept" },
        { "type": "column_drag_over", "node_id": "departments", "column_id": "dept_id" },
        { "type": "column_drop", "node_id": "departments", "column_id": "dept_id" }
    ]"#;

    fn session() -> Session<Palette> {
        Session::new(Palette::sample(), &CanvasConfig::default())
    }

    #[test]
    fn test_replay_script() {
        let mut session = session();
        let scene = session.replay(parse_script(SCRIPT).unwrap()).unwrap();

        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.node("departments").unwrap().position, kurbo::Point::new(600.0, 100.0));
        assert_eq!(scene.connections.len(), 1);
        assert_eq!(scene.connections[0].id.as_str(), "employees-emp_dept-departments-dept_id");
        assert_eq!(scene.notification.unwrap().kind, NotificationKind::Connected);
        assert_eq!(scene.gesture, GestureKind::Idle);
        assert_eq!(session.controller().active_listeners(), 0);
    }

    #[test]
    fn test_unknown_template() {
        let mut session = session();
        let err = session.apply(Step::Pick { pick: "orders".to_string() }).unwrap_err();
        assert!(matches!(err, AppError::UnknownTemplate(id) if id == "orders"));
    }

    #[test]
    fn test_drop_without_pick_fails_softly() {
        let mut session = session();
        let steps = parse_script(r#"[{ "type": "canvas_drop", "position": { "x": 1.0, "y": 1.0 } }]"#).unwrap();
        let scene = session.replay(steps).unwrap();
        assert!(scene.nodes.is_empty());
        assert_eq!(scene.notification.unwrap().kind, NotificationKind::Failure);
    }

    #[test]
    fn test_bad_script() {
        assert!(matches!(parse_script("{"), Err(AppError::Script(_))));
    }
}
