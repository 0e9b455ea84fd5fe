//! Nested-list markup for menus.
//!
//! [`HtmlTree`] walks any [`TreeNode`] tree depth-first and writes six
//! boundary templates around the rendered items:
//!
//! ```text
//! begin_iteration            <div class="menu"><ul>
//!   begin_current            <li>
//!     (item)                 Home
//!   end_current              </li>
//!   begin_current            <li>
//!     (item)                 About
//!     begin_children         <ul>
//!       begin_current        <li>
//!         (item)             Team
//!       end_current          </li>
//!     end_children           </ul></li>
//! end_iteration              </ul></div>
//! ```
//!
//! A node with children does not get its own `end_current`: the default
//! `end_children` closes the child list and the parent's `<li>` together.
//!
//! Templates may use two placeholders: `{class}` (the configured class)
//! and `{level}` (1-based nesting depth). Items sit at their own depth;
//! `begin_children` and `end_children` report the depth of the children they
//! enclose; the iteration wrappers are level 1.

use crate::item::Item;
use crate::tree::TreeNode;
use maud::html;
use serde::{Deserialize, Serialize};

/// Points in the traversal where a template is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    BeginIteration,
    EndIteration,
    BeginChildren,
    EndChildren,
    BeginCurrent,
    EndCurrent,
}

/// Boundary templates, keyed like the `[menu.templates]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    pub begin_iteration: String,
    pub end_iteration: String,
    pub begin_children: String,
    pub end_children: String,
    pub begin_current: String,
    pub end_current: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            begin_iteration: r#"<div class="{class}"><ul>"#.to_string(),
            end_iteration: "</ul></div>".to_string(),
            begin_children: "<ul>".to_string(),
            end_children: "</ul></li>".to_string(),
            begin_current: "<li>".to_string(),
            end_current: "</li>".to_string(),
        }
    }
}

impl Templates {
    pub fn get(&self, boundary: Boundary) -> &str {
        match boundary {
            Boundary::BeginIteration => &self.begin_iteration,
            Boundary::EndIteration => &self.end_iteration,
            Boundary::BeginChildren => &self.begin_children,
            Boundary::EndChildren => &self.end_children,
            Boundary::BeginCurrent => &self.begin_current,
            Boundary::EndCurrent => &self.end_current,
        }
    }

    pub fn set(&mut self, boundary: Boundary, template: impl Into<String>) {
        let slot = match boundary {
            Boundary::BeginIteration => &mut self.begin_iteration,
            Boundary::EndIteration => &mut self.end_iteration,
            Boundary::BeginChildren => &mut self.begin_children,
            Boundary::EndChildren => &mut self.end_children,
            Boundary::BeginCurrent => &mut self.begin_current,
            Boundary::EndCurrent => &mut self.end_current,
        };
        *slot = template.into();
    }
}

/// Item label, HTML-escaped.
pub fn title_formatter(item: &Item) -> String {
    html! { (item.menu_title()) }.into_string()
}

/// Formatter that renders each item as a link to its route, marking the
/// current page and its ancestors with class `current`.
pub fn link_formatter(current_route: &str) -> impl Fn(&Item) -> String + '_ {
    move |item: &Item| {
        let route = item.route.as_str();
        let is_current = route == current_route
            || (!route.is_empty() && current_route.starts_with(&format!("{route}/")));
        html! {
            a href={ "/" (route) } class=[is_current.then_some("current")] {
                (item.menu_title())
            }
        }
        .into_string()
    }
}

/// Single-use renderer producing one markup string for one tree.
pub struct HtmlTree<'f, T> {
    class: String,
    templates: Templates,
    formatter: Box<dyn Fn(&T) -> String + 'f>,
    output: String,
}

impl HtmlTree<'static, Item> {
    /// Renderer for content items, labelled by [`title_formatter`].
    pub fn new() -> Self {
        Self::with_formatter(title_formatter)
    }
}

impl Default for HtmlTree<'static, Item> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f, T> HtmlTree<'f, T> {
    /// Renderer with a custom per-item formatter. The formatter's output is
    /// written as is.
    pub fn with_formatter(formatter: impl Fn(&T) -> String + 'f) -> Self {
        Self {
            class: "menu".to_string(),
            templates: Templates::default(),
            formatter: Box::new(formatter),
            output: String::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    pub fn set_template(&mut self, boundary: Boundary, template: impl Into<String>) {
        self.templates.set(boundary, template);
    }

    /// Render the trees rooted at `roots`, in order.
    pub fn render<N>(mut self, roots: impl IntoIterator<Item = N>) -> String
    where
        N: TreeNode<Item = T>,
    {
        self.emit(Boundary::BeginIteration, 1);
        for root in roots {
            self.render_node(&root, 1);
        }
        self.emit(Boundary::EndIteration, 1);
        self.output
    }

    fn render_node<N>(&mut self, node: &N, level: usize)
    where
        N: TreeNode<Item = T>,
    {
        self.emit(Boundary::BeginCurrent, level);
        let rendered = (self.formatter)(node.item());
        self.output.push_str(&rendered);

        let mut children = node.children().peekable();
        if children.peek().is_none() {
            self.emit(Boundary::EndCurrent, level);
            return;
        }

        self.emit(Boundary::BeginChildren, level + 1);
        for child in children {
            self.render_node(&child, level + 1);
        }
        self.emit(Boundary::EndChildren, level + 1);
    }

    fn emit(&mut self, boundary: Boundary, level: usize) {
        let template = self.templates.get(boundary);
        let expanded = template
            .replace("{class}", &self.class)
            .replace("{level}", &level.to_string());
        self.output.push_str(&expanded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::test_helpers::*;
    use crate::tree::PageTree;

    /// Plain owned tree, parent to children.
    struct Node {
        title: &'static str,
        children: Vec<Node>,
    }

    fn node(title: &'static str, children: Vec<Node>) -> Node {
        Node { title, children }
    }

    impl<'a> TreeNode for &'a Node {
        type Item = Node;

        fn item(&self) -> &Node {
            self
        }

        fn children(&self) -> impl Iterator<Item = Self> {
            let node: &'a Node = *self;
            node.children.iter()
        }
    }

    fn leveled() -> Templates {
        Templates {
            begin_iteration: "[{class}:{level}".to_string(),
            end_iteration: "]".to_string(),
            begin_children: "(c{level}".to_string(),
            end_children: ")".to_string(),
            begin_current: "<{level}:".to_string(),
            end_current: ">".to_string(),
        }
    }

    fn render_nodes(roots: &[Node], templates: Templates) -> String {
        HtmlTree::with_formatter(|n: &Node| n.title.to_string())
            .with_templates(templates)
            .render(roots.iter())
    }

    #[test]
    fn three_levels_default_markup() {
        let roots = [node("Root", vec![node("Child", vec![node("Grandchild", vec![])])])];
        assert_eq!(
            render_nodes(&roots, Templates::default()),
            concat!(
                r#"<div class="menu"><ul>"#,
                "<li>Root<ul>",
                "<li>Child<ul>",
                "<li>Grandchild</li>",
                "</ul></li>",
                "</ul></li>",
                "</ul></div>",
            )
        );
    }

    #[test]
    fn three_levels_report_depth() {
        let roots = [node("a", vec![node("b", vec![node("c", vec![])])])];
        assert_eq!(
            render_nodes(&roots, leveled()),
            "[menu:1<1:a(c2<2:b(c3<3:c>))]"
        );
    }

    #[test]
    fn one_wrapper_pair_regardless_of_width() {
        let roots: Vec<Node> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|t| node(t, vec![]))
            .collect();
        let html = render_nodes(&roots, Templates::default());

        assert_eq!(html.matches("<div").count(), 1);
        assert_eq!(html.matches("</div>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 4);
        assert_eq!(html, r#"<div class="menu"><ul><li>a</li><li>b</li><li>c</li><li>d</li></ul></div>"#);
    }

    #[test]
    fn siblings_after_subtree_return_to_outer_level() {
        let roots = [
            node("a", vec![node("a1", vec![]), node("a2", vec![])]),
            node("b", vec![]),
        ];
        assert_eq!(
            render_nodes(&roots, leveled()),
            "[menu:1<1:a(c2<2:a1><2:a2>)<1:b>]"
        );
    }

    #[test]
    fn empty_tree_still_wrapped() {
        assert_eq!(
            render_nodes(&[], Templates::default()),
            r#"<div class="menu"><ul></ul></div>"#
        );
    }

    #[test]
    fn class_and_single_template_override() {
        let roots = [node("a", vec![])];
        let mut tree = HtmlTree::with_formatter(|n: &Node| n.title.to_string()).with_class("nav");
        tree.set_template(Boundary::BeginCurrent, r#"<li class="level-{level}">"#);

        assert_eq!(
            tree.render(roots.iter()),
            r#"<div class="nav"><ul><li class="level-1">a</li></ul></div>"#
        );
    }

    #[test]
    fn templates_get_and_set() {
        let mut templates = Templates::default();
        assert_eq!(templates.get(Boundary::EndChildren), "</ul></li>");
        templates.set(Boundary::EndChildren, "</ol></li>");
        assert_eq!(templates.end_children, "</ol></li>");
    }

    #[test]
    fn templates_deserialize_partially() {
        let templates: Templates = toml::from_str(r#"begin_children = "<ol>""#).unwrap();
        assert_eq!(templates.begin_children, "<ol>");
        assert_eq!(templates.begin_current, "<li>");
    }

    // =========================================================================
    // Items
    // =========================================================================

    #[test]
    fn item_titles_are_escaped() {
        let mut collection = Collection::new();
        collection.add_item(make_item("qa", "Q&A <live>", false));
        let tree = PageTree::from_collection(&collection, false);

        let html = HtmlTree::new().render(tree.roots());
        assert_eq!(
            html,
            r#"<div class="menu"><ul><li>Q&amp;A &lt;live&gt;</li></ul></div>"#
        );
    }

    #[test]
    fn untitled_item_uses_route_segment() {
        let mut collection = collection_of(&["docs"]);
        let mut item = make_item("docs/setup", "", false);
        item.data.clear();
        collection.add_item(item);
        let tree = PageTree::from_collection(&collection, false);

        let html = HtmlTree::new().render(tree.roots());
        assert!(html.contains("<li>setup</li>"));
    }

    #[test]
    fn link_formatter_marks_current_branch() {
        let collection = collection_of(&["", "about", "about/team", "blog"]);
        let tree = PageTree::from_collection(&collection, false);

        let html = HtmlTree::with_formatter(link_formatter("about/team")).render(tree.roots());
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains(r#"<a href="/about" class="current">About</a>"#));
        assert!(html.contains(r#"<a href="/about/team" class="current">Team</a>"#));
        assert!(html.contains(r#"<a href="/blog">Blog</a>"#));
    }

    #[test]
    fn fixture_menu() {
        let tmp = setup_fixtures();
        let collection = fixture_builder(&tmp)
            .build(crate::route::DEFAULT_LANGUAGE, None)
            .unwrap();
        let tree = PageTree::from_collection(&collection, false);

        assert_eq!(
            HtmlTree::new().render(tree.roots()),
            concat!(
                r#"<div class="menu"><ul>"#,
                "<li>Home</li>",
                "<li>About<ul><li>Team</li></ul></li>",
                "<li>Blog<ul><li>First post</li></ul></li>",
                "<li>Contact</li>",
                "</ul></div>",
            )
        );
    }
}
