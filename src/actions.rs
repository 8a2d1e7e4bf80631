// Click handling for elements carrying `data-action`. Toggles wait for the server's
// acknowledgement before touching the document; nothing is updated optimistically.

use std::sync::Arc;

use crate::dom::{self, NodeId, Selector, SharedDocument};
use crate::error::ApiError;
use crate::models::ApplianceState;
use crate::notify::{NotificationKind, Notifier};
use crate::transport::{self, Transport};

pub const TOGGLE_FAILED_MESSAGE: &str = "Failed to toggle device";

/// Where a toggle control keeps its ON/OFF label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleLabel {
    /// Generic `[data-action="toggle"]` controls: `.state` child, class `state <colour>`.
    #[default]
    State,
    /// Room page `.appliance-toggle` buttons: first `span` child, class `<colour>`.
    Span,
}

impl ToggleLabel {
    fn selector(self) -> Selector {
        match self {
            ToggleLabel::State => Selector::class("state"),
            ToggleLabel::Span => Selector::tag("span"),
        }
    }

    fn class_name(self, state: ApplianceState) -> String {
        match self {
            ToggleLabel::State => format!("state {}", state.color_class()),
            ToggleLabel::Span => state.color_class().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Server acknowledged; the document shows `state`.
    Toggled {
        appliance_id: String,
        state: ApplianceState,
    },
    /// Server or transport failure; the document is unchanged.
    Failed(ApiError),
    /// No action, an unknown action, or a control without `data-id`.
    Ignored,
}

pub struct ActionDispatcher {
    transport: Arc<dyn Transport>,
    document: SharedDocument,
    notifier: Notifier,
}

impl ActionDispatcher {
    pub fn new(transport: Arc<dyn Transport>, document: SharedDocument, notifier: Notifier) -> Self {
        Self {
            transport,
            document,
            notifier,
        }
    }

    /// Click on `node`: routes on its `data-action`.
    pub async fn dispatch(&self, node: NodeId) -> DispatchOutcome {
        let action = dom::lock(&self.document)
            .attr(node, "data-action")
            .map(str::to_owned);
        match action.as_deref() {
            Some("toggle") => self.toggle(node, ToggleLabel::State).await,
            Some(other) => {
                tracing::info!(action = other, "Unknown action: {}", other);
                DispatchOutcome::Ignored
            }
            None => DispatchOutcome::Ignored,
        }
    }

    /// Requests the inverse of the control's `data-state` and applies it once acknowledged.
    pub async fn toggle(&self, node: NodeId, label: ToggleLabel) -> DispatchOutcome {
        // Read under the lock, release it before the request.
        let (appliance_id, current) = {
            let doc = dom::lock(&self.document);
            (
                doc.attr(node, "data-id").map(str::to_owned),
                ApplianceState::from_attr(doc.attr(node, "data-state")),
            )
        };
        let Some(appliance_id) = appliance_id else {
            tracing::warn!(?node, "toggle control without data-id");
            return DispatchOutcome::Ignored;
        };
        let next = current.inverse();

        match transport::toggle_appliance(self.transport.as_ref(), &appliance_id, next).await {
            Ok(()) => {
                {
                    let mut doc = dom::lock(&self.document);
                    doc.set_attr(node, "data-state", next.as_str());
                    if let Some(text) = doc.query_within(node, &label.selector()) {
                        doc.set_text(text, next.label());
                        doc.set_class_name(text, &label.class_name(next));
                    }
                }
                tracing::info!(appliance_id = %appliance_id, state = %next, "appliance toggled");
                self.notifier.notify(
                    &format!("Device {}", next.verb()),
                    NotificationKind::Success,
                );
                DispatchOutcome::Toggled {
                    appliance_id,
                    state: next,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    appliance_id = %appliance_id,
                    operation = "toggle_appliance",
                    "toggle failed"
                );
                self.notifier
                    .notify(TOGGLE_FAILED_MESSAGE, NotificationKind::Error);
                DispatchOutcome::Failed(e)
            }
        }
    }
}
