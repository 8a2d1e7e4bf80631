// Transient banners: slide in, stay for a fixed time, slide out, then leave the document.
// Each banner runs on its own timer task; concurrent banners simply stack.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::dom::{self, Element, NodeId, SharedDocument};

const BANNER_CLASSES: &str =
    "fixed top-4 right-4 p-4 rounded-lg shadow-lg transition-all transform";
/// Present while the banner is off-screen (before entering and while leaving).
const HIDDEN_CLASSES: [&str; 2] = ["translate-x-full", "opacity-0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn classes(self) -> &'static str {
        match self {
            NotificationKind::Info => "bg-blue-500 text-white",
            NotificationKind::Success => "bg-green-500 text-white",
            NotificationKind::Error => "bg-red-500 text-white",
        }
    }
}

/// Banner timeline, all measured from insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub enter_delay: Duration,
    pub display: Duration,
    pub exit_transition: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            enter_delay: Duration::from_millis(10),
            display: Duration::from_millis(3000),
            exit_transition: Duration::from_millis(300),
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    document: SharedDocument,
    timing: NotificationTiming,
}

/// A banner in the document and the task driving its timeline.
pub struct Notification {
    pub node: NodeId,
    pub lifecycle: JoinHandle<()>,
}

impl Notifier {
    pub fn new(document: SharedDocument, timing: NotificationTiming) -> Self {
        Self { document, timing }
    }

    pub fn timing(&self) -> NotificationTiming {
        self.timing
    }

    /// Appends a hidden banner to the body and schedules its enter, exit and removal.
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, message: &str, kind: NotificationKind) -> Option<Notification> {
        let node = {
            let mut doc = dom::lock(&self.document);
            let root = doc.root();
            let class_name = format!(
                "{} {} {}",
                BANNER_CLASSES,
                HIDDEN_CLASSES.join(" "),
                kind.classes()
            );
            doc.append(
                root,
                Element::new("div")
                    .with_class(&class_name)
                    .with_text(message),
            )?
        };
        tracing::debug!(?kind, message, "notification shown");

        let document = self.document.clone();
        let timing = self.timing;
        let inserted = Instant::now();
        let lifecycle = tokio::spawn(async move {
            sleep_until(inserted + timing.enter_delay).await;
            dom::lock(&document).remove_classes(node, &HIDDEN_CLASSES);

            sleep_until(inserted + timing.display).await;
            {
                let mut doc = dom::lock(&document);
                for class in HIDDEN_CLASSES {
                    doc.add_class(node, class);
                }
            }

            sleep_until(inserted + timing.display + timing.exit_transition).await;
            dom::lock(&document).remove(node);
        });

        Some(Notification { node, lifecycle })
    }
}
