//! Debugger session: carries engine actions that need the server through to
//! the REST API and redraws from a fresh fetch afterwards.
//!
//! Every server mutation is followed by a complete re-fetch and redraw, and
//! only after the server acknowledged it. A failed mutation leaves the
//! diagram exactly as it was and is reported to the host once.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use canvas::engine::{Action, EngineCore};
use canvas::model::Point;
use canvas::render::RenderError;
use serde_json::Value;

use crate::api::{ApiError, EngineApi, RefreshKind};
use crate::error::ErrorCode;
use crate::source::DiagramSource;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.error_code(),
            Self::Render(e) => ErrorCode::error_code(e),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.retryable(),
            Self::Render(_) => false,
        }
    }
}

/// Callbacks into the page hosting the viewer.
pub trait DebuggerHost: Send {
    /// The debugger selection changed; `None` clears it.
    fn selection_changed(&mut self, element_id: Option<&str>);

    /// Click-through on an element that is not a selection click.
    fn navigate(&mut self, element_id: &str);

    /// A server call or redraw failed.
    fn notify_failure(&mut self, error: &SessionError);

    /// Fresh data for one side panel.
    fn refreshed(&mut self, kind: RefreshKind, payload: Value);

    /// A new diagram replaced the old one.
    fn diagram_replaced(&mut self, svg: &str);

    /// View-level actions (repaint, resize, tooltips, decorations).
    fn present(&mut self, _action: &Action) {}
}

pub struct DebuggerSession<A, H> {
    api: A,
    host: H,
    engine: EngineCore,
    source: DiagramSource,
}

impl<A: EngineApi, H: DebuggerHost> DebuggerSession<A, H> {
    pub fn new(api: A, host: H, engine: EngineCore, source: DiagramSource) -> Self {
        Self { api, host, engine, source }
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn source(&self) -> &DiagramSource {
        &self.source
    }

    // --- Fetch and redraw ---

    /// Fetch a fresh snapshot and redraw from it.
    ///
    /// # Errors
    ///
    /// Fetch or render failure. The host is notified and the previous
    /// diagram stays in place.
    pub async fn reload(&mut self) -> Result<(), SessionError> {
        let result = self.api.fetch_model(&self.source).await.map_err(SessionError::from);
        self.apply_snapshot(result)
    }

    fn apply_snapshot(&mut self, fetched: Result<canvas::model::Snapshot, SessionError>) -> Result<(), SessionError> {
        let loaded = fetched.and_then(|snapshot| self.engine.load_snapshot(snapshot).map_err(SessionError::from));
        match loaded {
            Ok(actions) => {
                self.forward(&actions);
                if let Some(svg) = self.engine.svg() {
                    self.host.diagram_replaced(&svg);
                }
                if let Some(report) = self.engine.report() {
                    tracing::info!(
                        source = %self.source,
                        elements = report.elements_drawn,
                        flows = report.flows_drawn,
                        skipped = report.skipped.len(),
                        "diagram redrawn"
                    );
                }
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // --- Input ---

    /// Pointer moved on the canvas.
    pub fn pointer_move(&mut self, screen_pt: Point) {
        let actions = self.engine.on_pointer_move(screen_pt);
        self.forward(&actions);
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        let actions = self.engine.on_pointer_leave();
        self.forward(&actions);
    }

    /// Click on the canvas. Marker clicks go to the server.
    ///
    /// # Errors
    ///
    /// See [`DebuggerSession::dispatch`].
    pub async fn click(&mut self, screen_pt: Point) -> Result<(), SessionError> {
        let actions = self.engine.on_click(screen_pt);
        self.dispatch(actions).await
    }

    pub fn zoom_in(&mut self) {
        let actions = self.engine.zoom_in();
        self.forward(&actions);
    }

    pub fn zoom_out(&mut self) {
        let actions = self.engine.zoom_out();
        self.forward(&actions);
    }

    // --- Actions ---

    /// Execute engine actions in order.
    ///
    /// # Errors
    ///
    /// The first failed server call. Actions after it are not executed.
    pub async fn dispatch(&mut self, actions: Vec<Action>) -> Result<(), SessionError> {
        for action in actions {
            match action {
                Action::ToggleBreakpoint { element_id, set } => self.toggle_breakpoint(&element_id, set).await?,
                Action::ContinuePlanItem { plan_item_id } => self.continue_plan_item(&plan_item_id).await?,
                other => self.forward(std::slice::from_ref(&other)),
            }
        }
        Ok(())
    }

    /// Add (`set`) or remove a breakpoint, then redraw once on success.
    ///
    /// # Errors
    ///
    /// The server rejected the change, or the redraw failed.
    pub async fn toggle_breakpoint(&mut self, element_id: &str, set: bool) -> Result<(), SessionError> {
        let acked = if set {
            self.api.add_breakpoint(element_id).await
        } else {
            self.api.remove_breakpoint(element_id).await
        };
        if let Err(e) = acked {
            return Err(self.fail(e.into()));
        }
        tracing::debug!(%element_id, set, "breakpoint acknowledged");
        self.reload().await
    }

    /// Continue a halted plan item, then refresh every panel and the diagram.
    ///
    /// The refreshes run concurrently with no ordering between them. Each
    /// failure is reported; the first is returned.
    ///
    /// # Errors
    ///
    /// The continue call or any refresh failed.
    pub async fn continue_plan_item(&mut self, plan_item_id: &str) -> Result<(), SessionError> {
        if let Err(e) = self.api.continue_plan_item(plan_item_id).await {
            return Err(self.fail(e.into()));
        }
        tracing::debug!(%plan_item_id, "plan item continued");

        let Some(instance_id) = self.source.instance_id() else {
            tracing::warn!(source = %self.source, "no runtime instance; redrawing only");
            return self.reload().await;
        };
        let api = &self.api;
        let source = &self.source;
        let panel = |kind: RefreshKind| async move { (kind, api.fetch_refresh(kind, instance_id).await) };
        let (event_log, variables, plan_items, case_tasks, snapshot) = tokio::join!(
            panel(RefreshKind::EventLog),
            panel(RefreshKind::Variables),
            panel(RefreshKind::PlanItems),
            panel(RefreshKind::CaseTasks),
            api.fetch_model(source),
        );

        let mut first_error = None;
        for (kind, result) in [event_log, variables, plan_items, case_tasks] {
            match result {
                Ok(payload) => self.host.refreshed(kind, payload),
                Err(e) => {
                    let e = self.fail(e.into());
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Err(e) = self.apply_snapshot(snapshot.map_err(SessionError::from)) {
            first_error.get_or_insert(e);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Hand host-local actions to the host.
    fn forward(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::SelectionChanged(id) => self.host.selection_changed(id.as_deref()),
                Action::Navigate { id } => self.host.navigate(id),
                other => self.host.present(other),
            }
        }
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        tracing::error!(code = error.error_code(), error = %error, source = %self.source, "debugger call failed");
        self.host.notify_failure(&error);
        error
    }
}
