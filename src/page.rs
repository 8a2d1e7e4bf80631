// A page view bound to its document, and the lifetime of its poller

use std::sync::Arc;

use crate::dom::{self, Document, SharedDocument};
use crate::poller::{self, PollerConfig, PollerHandle};
use crate::render::PageView;
use crate::transport::Transport;

pub struct Page<V: PageView> {
    view: Arc<V>,
    document: SharedDocument,
}

impl<V: PageView> Page<V> {
    /// Page over the view's own skeleton markup.
    pub fn new(view: V) -> Self {
        let document = view.skeleton();
        Self::with_document(view, document)
    }

    pub fn with_document(view: V, document: Document) -> Self {
        Self {
            view: Arc::new(view),
            document: dom::shared(document),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn document(&self) -> SharedDocument {
        self.document.clone()
    }

    /// Starts polling the view's endpoint and rendering into this page's document.
    /// The returned handle must be stopped when the page goes away.
    pub fn start(&self, transport: Arc<dyn Transport>, config: PollerConfig) -> PollerHandle {
        let view = self.view.clone();
        let document = self.document.clone();
        tracing::info!(
            page = view.name(),
            endpoint = %view.endpoint(),
            interval_ms = config.interval.as_millis() as u64,
            "page polling started"
        );
        poller::start_polling::<V::Snapshot, _>(
            transport,
            view.endpoint(),
            config,
            move |snapshot| {
                let mut doc = dom::lock(&document);
                let before = doc.mutation_count();
                view.render(&mut doc, &snapshot);
                tracing::debug!(
                    page = view.name(),
                    writes = doc.mutation_count() - before,
                    html = %doc.to_html(),
                    "page rendered"
                );
            },
        )
    }
}
