use std::{cell::RefCell, rc::Rc};

use blogfeed_client::PostId;
use blogfeed_dom::{
    element,
    events::ListenerId,
    render::{render_to_string, Mode},
    Node,
};
use indexmap::IndexMap;

use crate::{controller, POST_ID_ATTR};

/// The page a feed renders into: an author select menu and a `main` element.
///
/// Only [`Self::replace_content`] and [`Self::clear`] change the structure of
/// `main`. Toggle controls and comment sections are reached through a registry
/// keyed by post id that is rebuilt on every replacement.
pub struct RenderSurface {
    body: Node,
    main: Node,
    select_menu: Node,
    registry: Rc<RefCell<Registry>>,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: IndexMap<PostId, Entry>,
}

#[derive(Default)]
struct Entry {
    section: Option<Node>,
    button: Option<Node>,
    listener: Option<ListenerId>,
}

impl Registry {
    pub(crate) fn section(&self, post_id: PostId) -> Option<Node> {
        self.entries.get(&post_id)?.section.clone()
    }

    pub(crate) fn button(&self, post_id: PostId) -> Option<Node> {
        self.entries.get(&post_id)?.button.clone()
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface {
    pub fn new() -> Self {
        let select_menu = element!("select", "id" => "selectMenu");
        let main = element!("main");
        let body = element!("body"; &select_menu, &main);

        Self {
            body,
            main,
            select_menu,
            registry: Rc::default(),
        }
    }

    pub fn main(&self) -> &Node {
        &self.main
    }

    pub fn select_menu(&self) -> &Node {
        &self.select_menu
    }

    /// Swaps the children of `main` for the contents of `fragment`.
    ///
    /// Listeners from the previous content are detached before it is removed,
    /// and one click listener is attached per toggle control of the new content.
    /// Returns the number of listeners attached.
    pub fn replace_content(&self, fragment: &Node) -> usize {
        self.clear();
        self.main.append(fragment);
        self.index();
        self.attach_listeners()
    }

    /// Detaches all toggle listeners and removes every child of `main`.
    pub fn clear(&self) -> usize {
        self.detach_listeners();
        self.registry.borrow_mut().entries.clear();
        self.main.clear()
    }

    /// Dispatches a click on the toggle control for `post_id`, returning
    /// whether any listener handled it.
    pub fn click(&self, post_id: Option<PostId>) -> bool {
        let button = post_id.and_then(|id| self.registry.borrow().button(id));
        match button {
            Some(button) => button.dispatch(&"click") > 0,
            None => false,
        }
    }

    /// Post ids with a registered section or toggle, in document order.
    pub fn post_ids(&self) -> Vec<PostId> {
        self.registry.borrow().entries.keys().copied().collect()
    }

    pub fn render(&self, mode: Mode) -> String {
        render_to_string(mode, &self.body)
    }

    pub(crate) fn registry(&self) -> std::cell::Ref<'_, Registry> {
        self.registry.borrow()
    }

    fn index(&self) {
        let mut registry = self.registry.borrow_mut();

        for node in self.main.descendants() {
            let Some(tag) = node.tag() else {
                continue;
            };
            if tag != "section" && tag != "button" {
                continue;
            }
            let Some(raw) = node.attr(POST_ID_ATTR) else {
                continue;
            };
            let Ok(post_id) = raw.parse::<PostId>() else {
                tracing::debug!(tag, value = %raw, "skipping element without a usable post id");
                continue;
            };

            let entry = registry.entries.entry(post_id).or_default();
            let slot = if tag == "section" {
                &mut entry.section
            } else {
                &mut entry.button
            };
            if slot.is_some() {
                tracing::warn!(%post_id, tag, "duplicate element for post, keeping the first");
            } else {
                *slot = Some(node);
            }
        }
    }

    fn attach_listeners(&self) -> usize {
        let weak = Rc::downgrade(&self.registry);
        let mut registry = self.registry.borrow_mut();

        let mut attached = 0;
        for (&post_id, entry) in registry.entries.iter_mut() {
            let Some(button) = &entry.button else {
                continue;
            };

            let handle = weak.clone();
            let id = button.event(&"click", move |_| {
                if let Some(registry) = handle.upgrade() {
                    controller::toggle_comments(&registry.borrow(), Some(post_id));
                }
            });
            entry.listener = Some(id);
            attached += 1;
        }
        attached
    }

    fn detach_listeners(&self) -> usize {
        let mut registry = self.registry.borrow_mut();

        let mut detached = 0;
        for entry in registry.entries.values_mut() {
            if let (Some(button), Some(id)) = (&entry.button, entry.listener.take()) {
                if button.remove_event(id) {
                    detached += 1;
                }
            }
        }
        detached
    }
}

#[cfg(test)]
mod tests {
    use blogfeed_client::PostId;
    use blogfeed_dom::{element, render::Mode, Node};

    use super::RenderSurface;

    fn article(id: &str) -> Node {
        element!("article";
            element!("button", "data-post-id" => id; "Show Comments"),
            element!("section", "class" => "comments hide", "data-post-id" => id),
        )
    }

    #[test]
    fn starts_empty() {
        let surface = RenderSurface::new();
        assert!(surface.main().children().is_empty());
        assert!(surface.post_ids().is_empty());
        assert_eq!(
            surface.render(Mode::empty()),
            r#"<body><select id="selectMenu"></select><main></main></body>"#
        );
    }

    #[test]
    fn replace_indexes_and_attaches() {
        let surface = RenderSurface::new();
        let fragment: Node = [article("1"), article("2")].into_iter().collect();

        assert_eq!(surface.replace_content(&fragment), 2);
        assert_eq!(surface.main().children().len(), 2);
        assert_eq!(surface.post_ids(), [PostId::new(1).unwrap(), PostId::new(2).unwrap()]);

        let button = surface.registry().button(PostId::new(2).unwrap()).unwrap();
        assert_eq!(button.listener_count(&"click"), 1);
    }

    #[test]
    fn repeated_replacement_keeps_one_listener_per_control() {
        let surface = RenderSurface::new();

        let first: Node = [article("1")].into_iter().collect();
        surface.replace_content(&first);
        let old_button = surface.registry().button(PostId::new(1).unwrap()).unwrap();

        let second: Node = [article("1")].into_iter().collect();
        surface.replace_content(&second);
        let new_button = surface.registry().button(PostId::new(1).unwrap()).unwrap();

        assert_ne!(old_button, new_button);
        assert_eq!(old_button.listener_count(&"click"), 0);
        assert_eq!(new_button.listener_count(&"click"), 1);
        assert_eq!(surface.main().children().len(), 1);
    }

    #[test]
    fn replacing_the_same_nodes_does_not_stack_listeners() {
        let surface = RenderSurface::new();
        let node = article("5");

        for _ in 0..3 {
            let fragment: Node = [node.clone()].into_iter().collect();
            surface.replace_content(&fragment);
        }

        let button = surface.registry().button(PostId::new(5).unwrap()).unwrap();
        assert_eq!(button.listener_count(&"click"), 1);
    }

    #[test]
    fn unparseable_ids_are_skipped() {
        let surface = RenderSurface::new();
        let fragment: Node = [article("0"), article("abc"), article("3")]
            .into_iter()
            .collect();

        assert_eq!(surface.replace_content(&fragment), 1);
        assert_eq!(surface.post_ids(), [PostId::new(3).unwrap()]);
        assert_eq!(surface.main().children().len(), 3);
    }

    #[test]
    fn clear_detaches_and_empties() {
        let surface = RenderSurface::new();
        let fragment: Node = [article("1")].into_iter().collect();
        surface.replace_content(&fragment);
        let button = surface.registry().button(PostId::new(1).unwrap()).unwrap();

        assert_eq!(surface.clear(), 1);
        assert!(surface.main().children().is_empty());
        assert!(surface.post_ids().is_empty());
        assert_eq!(button.listener_count(&"click"), 0);
        assert!(!surface.click(PostId::new(1)));
    }
}
