// Page views: each maps one API snapshot onto the nodes of its page.

pub mod battery;
pub mod dashboard;
pub mod floors;
pub mod notifications;
pub mod room;
pub mod rules;
pub mod visitors;

pub use battery::BatteryView;
pub use floors::{FloorDetailView, FloorsView};
pub use room::RoomDetailView;
pub use visitors::VisitorsView;

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::dom::Document;
use crate::transport::Endpoint;

/// One polled page: where its data comes from and how it lands in the document.
///
/// `render` writes into nodes that already exist and skips the ones that do not;
/// only list containers that are rebuilt wholesale create nodes.
pub trait PageView: Send + Sync + 'static {
    type Snapshot: DeserializeOwned + Send + 'static;

    fn name(&self) -> &'static str;

    fn endpoint(&self) -> Endpoint;

    /// Refresh period used when the config does not override it.
    fn default_interval(&self) -> Duration;

    /// Minimal markup carrying every node `render` targets.
    fn skeleton(&self) -> Document;

    fn render(&self, doc: &mut Document, snapshot: &Self::Snapshot);
}

/// Pure form: the next document for `snapshot`, leaving `previous` untouched.
pub fn render<V: PageView>(view: &V, previous: &Document, snapshot: &V::Snapshot) -> Document {
    let mut next = previous.clone();
    view.render(&mut next, snapshot);
    next
}
