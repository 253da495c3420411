pub mod render;

use std::{
    cell::{Cell, Ref, RefCell},
    fmt, mem,
    rc::{Rc, Weak},
    thread_local,
};

use indexmap::IndexMap;

use crate::events::{Event, EventKey, ListenerId};

type Handler = Rc<dyn Fn(&Event)>;

pub(crate) enum NodeKind {
    Element {
        name: String,
        attrs: RefCell<IndexMap<String, String>>,
    },
    Text(RefCell<String>),
    Fragment,
}

#[derive(Clone)]
pub struct Node(Rc<RawNode>);

struct RawNode {
    kind: NodeKind,

    parent: RefCell<Option<Weak<RawNode>>>,
    children: RefCell<Vec<Node>>,

    events: RefCell<IndexMap<ListenerId, EventEntry>>,
}

struct EventEntry {
    name: String,
    handler: Handler,
}

impl Node {
    // Node Creation //

    fn create(kind: NodeKind) -> Self {
        let raw = RawNode {
            kind,
            parent: RefCell::default(),
            children: RefCell::default(),
            events: RefCell::default(),
        };
        Self(Rc::new(raw))
    }

    pub fn element(name: impl Into<String>) -> Self {
        let kind = NodeKind::Element {
            name: name.into(),
            attrs: RefCell::default(),
        };
        Self::create(kind)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::create(NodeKind::Text(RefCell::new(value.into())))
    }

    pub fn fragment() -> Self {
        Self::create(NodeKind::Fragment)
    }

    // Containers //

    /// Inserts `child` before `before`, or at the end.
    ///
    /// A fragment is never inserted itself: its children are moved into
    /// `self` in order and the fragment is left empty.
    pub fn insert(&self, child: &Self, before: Option<&Self>) {
        if let NodeKind::Text(_) = &self.0.kind {
            self.expect_kind(Expect::Container);
        }

        if let NodeKind::Fragment = &child.0.kind {
            let moved = mem::take(&mut *child.0.children.borrow_mut());
            for node in moved {
                node.0.parent.replace(None);
                self.insert(&node, before);
            }
            return;
        }

        if let Some(parent) = child.parent() {
            parent.remove(child);
        }

        let mut children = self.0.children.borrow_mut();
        let index = if let Some(before) = before {
            children
                .iter()
                .position(|node| node == before)
                .expect("insertion point not a child of self")
        } else {
            children.len()
        };
        children.insert(index, child.clone());

        child.0.parent.replace(Some(self.downgrade()));
    }

    pub fn append(&self, child: &Self) {
        self.insert(child, None);
    }

    pub fn remove(&self, child: &Self) {
        let mut children = self.0.children.borrow_mut();
        let index = children
            .iter()
            .position(|node| node == child)
            .expect("removal node not a child of self");
        children.remove(index);

        child.0.parent.replace(None);
    }

    /// Removes every child of `self`, last first, returning how many were removed.
    pub fn clear(&self) -> usize {
        let children = mem::take(&mut *self.0.children.borrow_mut());
        for child in children.iter().rev() {
            child.0.parent.replace(None);
        }
        children.len()
    }

    // Text //

    pub fn set_text(&self, value: impl Into<String>) {
        if let NodeKind::Text(content) = &self.0.kind {
            *content.borrow_mut() = value.into();
        } else {
            self.expect_kind(Expect::Text);
        }
    }

    /// Concatenated text of `self` and every descendant, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Replaces all children with a single text node, like `textContent =`.
    pub fn set_text_content(&self, value: impl Into<String>) {
        match &self.0.kind {
            NodeKind::Text(_) => self.set_text(value),
            _ => {
                self.clear();
                self.append(&Self::text(value));
            }
        }
    }

    // Elements //

    pub fn attr(&self, key: &str) -> Option<String> {
        if let NodeKind::Element { attrs, .. } = &self.0.kind {
            attrs.borrow().get(key).cloned()
        } else {
            self.expect_kind(Expect::Element);
        }
    }

    pub fn set_attr(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        if let NodeKind::Element { attrs, .. } = &self.0.kind {
            attrs.borrow_mut().insert(key.into(), value.into())
        } else {
            self.expect_kind(Expect::Element);
        }
    }

    pub fn remove_attr(&self, key: &str) -> Option<String> {
        if let NodeKind::Element { attrs, .. } = &self.0.kind {
            attrs.borrow_mut().shift_remove(key)
        } else {
            self.expect_kind(Expect::Element);
        }
    }

    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        let mut classes = self.classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_attr("class", classes.join(" "));
        }
    }

    pub fn remove_class(&self, class: &str) {
        let mut classes = self.classes();
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_attr("class", classes.join(" "));
        }
    }

    /// Flips `class` and returns whether it is present afterwards.
    pub fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    // Events //

    pub fn event<K, F>(&self, key: &K, f: F) -> ListenerId
    where
        K: EventKey,
        F: Fn(&Event) + 'static,
    {
        if !matches!(self.0.kind, NodeKind::Element { .. }) {
            self.expect_kind(Expect::Element);
        }

        thread_local!(static ID: Cell<u64> = const { Cell::new(0) });
        let id = ListenerId(ID.replace(ID.get() + 1));

        self.0.events.borrow_mut().insert(
            id,
            EventEntry {
                name: key.name().to_string(),
                handler: Rc::new(f),
            },
        );
        id
    }

    pub fn remove_event(&self, id: ListenerId) -> bool {
        self.0.events.borrow_mut().shift_remove(&id).is_some()
    }

    pub fn listener_count<K: EventKey>(&self, key: &K) -> usize {
        let name = key.name();
        self.0
            .events
            .borrow()
            .values()
            .filter(|entry| entry.name == name)
            .count()
    }

    /// Invokes every listener registered for `key` on `self`, in attach order,
    /// and returns how many ran.
    pub fn dispatch<K: EventKey>(&self, key: &K) -> usize {
        let name = key.name();

        // handlers may touch this node, so release the borrow before calling them
        let handlers: Vec<Handler> = self
            .0
            .events
            .borrow()
            .values()
            .filter(|entry| entry.name == name)
            .map(|entry| entry.handler.clone())
            .collect();

        let event = Event::new(name, self.clone());
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    // Queries //

    /// All descendants of `self` in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Self> {
        let mut out = vec![];
        self.collect_descendants(&mut out);
        out
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<Self>
    where
        P: FnMut(&Self) -> bool,
    {
        self.descendants().into_iter().find(|node| predicate(node))
    }

    pub fn find_all<P>(&self, mut predicate: P) -> Vec<Self>
    where
        P: FnMut(&Self) -> bool,
    {
        self.descendants()
            .into_iter()
            .filter(|node| predicate(node))
            .collect()
    }

    // Other Utilities //

    pub fn is_element(&self) -> bool {
        matches!(self.0.kind, NodeKind::Element { .. })
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.0.kind, NodeKind::Fragment)
    }

    pub fn element_name(&self) -> &str {
        if let NodeKind::Element { name, .. } = &self.0.kind {
            name
        } else {
            self.expect_kind(Expect::Element);
        }
    }

    /// Like [`Self::element_name`], but `None` for non-element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.0.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().as_ref().and_then(Self::upgrade)
    }

    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    pub fn children_ref(&self) -> Ref<Vec<Self>> {
        self.0.children.borrow()
    }

    // Internal //

    fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeKind::Text(content) = &self.0.kind {
            out.push_str(&content.borrow());
        }
        for child in &*self.0.children.borrow() {
            child.collect_text(out);
        }
    }

    fn collect_descendants(&self, out: &mut Vec<Self>) {
        for child in &*self.0.children.borrow() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    fn downgrade(&self) -> Weak<RawNode> {
        Rc::downgrade(&self.0)
    }

    fn upgrade(weak: &Weak<RawNode>) -> Option<Self> {
        weak.upgrade().map(Node)
    }

    fn expect_kind(&self, kind: Expect) -> ! {
        let expected = match kind {
            Expect::Container => "container",
            Expect::Element => "element",
            Expect::Text => "text",
        };
        let found = match &self.0.kind {
            NodeKind::Element { .. } => "element",
            NodeKind::Text(_) => "text",
            NodeKind::Fragment => "fragment",
        };

        panic!("expected {}, found {}", expected, found);
    }
}

impl Eq for Node {}
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            NodeKind::Element { name, attrs } => f
                .debug_struct("Element")
                .field("name", name)
                .field("attrs", &*attrs.borrow())
                .field("children", &self.0.children.borrow().len())
                .finish(),
            NodeKind::Text(content) => f.debug_tuple("Text").field(&*content.borrow()).finish(),
            NodeKind::Fragment => f
                .debug_struct("Fragment")
                .field("children", &self.0.children.borrow().len())
                .finish(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::render(f, render::Mode::empty(), self)
    }
}

pub trait IntoNode: Sized {
    fn into_node(self) -> Node;
}

impl IntoNode for Node {
    fn into_node(self) -> Self {
        self
    }
}

impl IntoNode for &Node {
    fn into_node(self) -> Node {
        self.clone()
    }
}

impl IntoNode for &str {
    fn into_node(self) -> Node {
        Node::text(self)
    }
}

impl IntoNode for String {
    fn into_node(self) -> Node {
        Node::text(self)
    }
}

impl IntoNode for &String {
    fn into_node(self) -> Node {
        Node::text(self.as_str())
    }
}

impl<N> FromIterator<N> for Node
where
    N: IntoNode,
{
    fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
        iter.into_iter().fold(Self::fragment(), |fragment, node| {
            fragment.append(&node.into_node());
            fragment
        })
    }
}

enum Expect {
    Container,

    Element,
    Text,
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::Node;
    use crate::element;

    #[test]
    fn insert_and_remove() {
        let root = Node::element("div");
        let a = Node::text("a");
        let b = Node::text("b");
        root.append(&a);
        root.append(&b);
        assert_eq!(root.children(), vec![a.clone(), b.clone()]);

        let c = Node::element("span");
        root.insert(&c, Some(&b));
        assert_eq!(root.children(), vec![a.clone(), c.clone(), b.clone()]);
        assert_eq!(c.parent(), Some(root.clone()));

        root.remove(&c);
        assert_eq!(root.children(), vec![a, b]);
        assert_eq!(c.parent(), None);
    }

    #[test]
    fn reinserting_moves_the_node() {
        let first = Node::element("div");
        let second = Node::element("div");
        let child = Node::element("p");

        first.append(&child);
        second.append(&child);

        assert!(first.children().is_empty());
        assert_eq!(second.children(), vec![child.clone()]);
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn fragments_are_drained_on_insert() {
        let frag: Node = ["a", "b", "c"].into_iter().collect();
        assert!(frag.is_fragment());
        assert_eq!(frag.children().len(), 3);

        let root = Node::element("main");
        root.append(&frag);

        assert!(frag.children().is_empty());
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.text_content(), "abc");
        assert!(root.children().iter().all(|c| c.parent() == Some(root.clone())));
    }

    #[test]
    fn clear_removes_everything() {
        let root = element!("main"; element!("article"), element!("article"));
        let children = root.children();

        assert_eq!(root.clear(), 2);
        assert!(root.children().is_empty());
        assert!(children.iter().all(|c| c.parent().is_none()));
        assert_eq!(root.clear(), 0);
    }

    #[test]
    fn text_content_replacement() {
        let button = element!("button"; "Show Comments");
        button.set_text_content("Hide Comments");
        assert_eq!(button.text_content(), "Hide Comments");
        assert_eq!(button.children().len(), 1);
    }

    #[test]
    fn class_list() {
        let section = element!("section", "class" => "comments hide");
        assert!(section.has_class("comments"));
        assert!(section.has_class("hide"));

        assert!(!section.toggle_class("hide"));
        assert_eq!(section.attr("class").as_deref(), Some("comments"));

        assert!(section.toggle_class("hide"));
        assert_eq!(section.attr("class").as_deref(), Some("comments hide"));

        section.add_class("comments");
        assert_eq!(section.classes(), vec!["comments", "hide"]);
    }

    #[test]
    fn listeners_attach_dispatch_detach() {
        let button = element!("button");
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let id = button.event(&"click", move |ev| {
            assert_eq!(ev.name(), "click");
            h.set(h.get() + 1);
        });
        assert_eq!(button.listener_count(&"click"), 1);

        assert_eq!(button.dispatch(&"click"), 1);
        assert_eq!(button.dispatch(&"keydown"), 0);
        assert_eq!(hits.get(), 1);

        assert!(button.remove_event(id));
        assert!(!button.remove_event(id));
        assert_eq!(button.dispatch(&"click"), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn handlers_may_mutate_their_target() {
        let button = element!("button"; "Show Comments");
        button.event(&"click", |ev| {
            ev.target().set_text_content("Hide Comments");
        });

        button.dispatch(&"click");
        assert_eq!(button.text_content(), "Hide Comments");
    }

    #[test]
    fn queries_walk_in_document_order() {
        let root = element!("main";
            element!("article";
                element!("button", "data-post-id" => "1"),
                element!("section", "data-post-id" => "1"),
            ),
        );

        let first = root
            .find(|n| n.attr("data-post-id").as_deref() == Some("1"))
            .unwrap();
        assert_eq!(first.element_name(), "button");

        let sections = root.find_all(|n| n.tag() == Some("section"));
        assert_eq!(sections.len(), 1);
        assert_eq!(root.descendants().len(), 3);
    }

    #[test]
    #[should_panic(expected = "expected element, found text")]
    fn attrs_on_text_panic() {
        Node::text("x").set_attr("class", "y");
    }
}
