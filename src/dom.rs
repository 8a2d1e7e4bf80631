// In-memory document the page views render into (stands in for the browser DOM).
// Nodes live in an arena. Freed slots are reused under a new generation, so a stale NodeId is inert.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Document shared between a page's poller, its action handlers and its notifications.
pub type SharedDocument = Arc<Mutex<Document>>;

pub fn shared(doc: Document) -> SharedDocument {
    Arc::new(Mutex::new(doc))
}

/// Locks a shared document. A panic while rendering leaves the tree usable, so poison is ignored.
pub fn lock(doc: &SharedDocument) -> MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Ordered, without duplicates.
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Adds every whitespace-separated class in `names`.
    pub fn with_class(mut self, names: &str) -> Self {
        for name in names.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Class(name) => self.has_class(name),
            Selector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
            Selector::Attr { name, value: None } => self.attrs.contains_key(name),
            Selector::Attr {
                name,
                value: Some(value),
            } => self.attrs.get(name) == Some(value),
        }
    }
}

/// The subset of CSS selectors the dashboard scripts use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.name`
    Class(String),
    /// `[name]` or `[name="value"]`
    Attr {
        name: String,
        value: Option<String>,
    },
    /// `span`
    Tag(String),
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Selector::Class(name.into())
    }

    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn has_attr(name: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Selector::Tag(tag.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector: {0:?}")]
pub struct SelectorError(String);

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || SelectorError(s.to_string());
        if let Some(name) = s.strip_prefix('.') {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(err());
            }
            return Ok(Selector::class(name));
        }
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim();
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                        .unwrap_or(value);
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(err());
                    }
                    Ok(Selector::attr(name, value))
                }
                None if !inner.trim().is_empty() => Ok(Selector::has_attr(inner.trim())),
                None => Err(err()),
            };
        }
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Ok(Selector::tag(s));
        }
        Err(err())
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Element tree rooted at a `body` node.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    root: NodeId,
    mutations: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                element: Some(Element::new("body")),
            }],
            vacant: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            mutations: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of writes applied since the document was created.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Arena size, live and vacant slots together.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Nodes currently in the tree, root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .element
            .as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let el = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .element
            .as_mut()?;
        self.mutations += 1;
        Some(el)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|el| el.text.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.attrs.get(name).map(String::as_str)
    }

    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.get(id)?.style.get(prop).map(String::as_str)
    }

    pub fn has_class(&self, id: NodeId, name: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_class(name))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// First descendant of the document matching `selector`, in document order.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_within(self.root, selector)
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |id, el| {
            if el.matches(selector) {
                out.push(id);
            }
            false
        });
        out
    }

    /// First descendant of `scope` (excluding `scope` itself) matching `selector`.
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut found = None;
        self.walk(scope, &mut |id, el| {
            if el.matches(selector) {
                found = Some(id);
                return true;
            }
            false
        });
        found
    }

    // Pre-order over descendants of `scope`; the visitor returns true to stop.
    fn walk(&self, scope: NodeId, visit: &mut dyn FnMut(NodeId, &Element) -> bool) -> bool {
        for &child in self.children(scope) {
            let Some(el) = self.get(child) else { continue };
            if visit(child, el) || self.walk(child, visit) {
                return true;
            }
        }
        false
    }

    /// Inserts `element` as the last child of `parent`. Returns None if `parent` is gone.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        element.parent = Some(parent);
        element.children.clear();
        let id = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.get_mut(parent)?.children.push(id);
        Some(id)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.text = text.into();
        }
    }

    pub fn add_class(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.get_mut(id)
            && !el.has_class(name)
        {
            el.classes.push(name.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.retain(|c| c != name);
        }
    }

    pub fn remove_classes(&mut self, id: NodeId, names: &[&str]) {
        if let Some(el) = self.get_mut(id) {
            el.classes.retain(|c| !names.contains(&c.as_str()));
        }
    }

    /// Flips `name`; returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, name: &str) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        if el.has_class(name) {
            el.classes.retain(|c| c != name);
            false
        } else {
            el.classes.push(name.to_string());
            true
        }
    }

    /// Replaces the whole class list, like assigning `className`.
    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.clear();
            for name in class_name.split_whitespace() {
                if !el.classes.iter().any(|c| c == name) {
                    el.classes.push(name.to_string());
                }
            }
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.style.insert(prop.to_string(), value.into());
        }
    }

    /// Drops every descendant of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(el) = self.get_mut(id) else { return };
        let children = std::mem::take(&mut el.children);
        for child in children {
            self.free(child);
        }
    }

    /// Detaches `id` from its parent and drops it with its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        if let Some(parent) = self.parent(id)
            && let Some(p) = self.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.mutations += 1;
        self.free(id);
    }

    fn free(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(el) = slot.element.take() else { return };
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);
        for child in el.children {
            self.free(child);
        }
    }

    /// Serializes the tree as HTML, mainly for logs.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(el) = self.get(id) else { return };
        let _ = write!(out, "<{}", el.tag);
        if !el.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&el.class_name()));
        }
        for (name, value) in &el.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !el.style.is_empty() {
            let style: Vec<String> = el.style.iter().map(|(k, v)| format!("{k}: {v};")).collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join(" ")));
        }
        out.push('>');
        out.push_str(&escape(&el.text));
        for &child in &el.children {
            self.write_html(child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_selectors() {
        assert_eq!(
            ".battery-level".parse::<Selector>().unwrap(),
            Selector::class("battery-level")
        );
        assert_eq!(
            "[data-room-id=\"room2\"]".parse::<Selector>().unwrap(),
            Selector::attr("data-room-id", "room2")
        );
        assert_eq!(
            "[data-status]".parse::<Selector>().unwrap(),
            Selector::has_attr("data-status")
        );
        assert_eq!("span".parse::<Selector>().unwrap(), Selector::tag("span"));
        assert!("".parse::<Selector>().is_err());
        assert!("[]".parse::<Selector>().is_err());
        assert!(". x".parse::<Selector>().is_err());
    }

    #[test]
    fn query_within_excludes_scope_and_respects_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let card = doc
            .append(root, Element::new("div").with_class("card"))
            .unwrap();
        let inner = doc
            .append(card, Element::new("div").with_class("card"))
            .unwrap();
        assert_eq!(doc.query(&Selector::class("card")), Some(card));
        assert_eq!(doc.query_within(card, &Selector::class("card")), Some(inner));
        assert_eq!(doc.query_within(inner, &Selector::class("card")), None);
    }

    #[test]
    fn removed_nodes_are_inert() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.append(root, Element::new("ul")).unwrap();
        let item = doc.append(list, Element::new("li")).unwrap();
        doc.clear_children(list);
        assert!(!doc.contains(item));
        let before = doc.mutation_count();
        doc.set_text(item, "gone");
        assert_eq!(doc.mutation_count(), before);
        assert!(doc.children(list).is_empty());
    }

    #[test]
    fn freed_slots_are_reused_and_old_ids_stay_dead() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.append(root, Element::new("ul")).unwrap();
        let first = doc.append(list, Element::new("li").with_text("a")).unwrap();
        doc.clear_children(list);

        let second = doc.append(list, Element::new("li").with_text("b")).unwrap();
        assert_eq!(doc.slot_count(), 3);
        assert_ne!(first, second);
        assert_eq!(doc.text(first), None);
        assert_eq!(doc.text(second), Some("b"));

        doc.set_text(first, "stale");
        assert_eq!(doc.text(second), Some("b"));
        doc.remove(first);
        assert!(doc.contains(second));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn html_escapes_text() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Element::new("p").with_text("a < b"));
        assert_eq!(doc.to_html(), "<body><p>a &lt; b</p></body>");
    }
}
