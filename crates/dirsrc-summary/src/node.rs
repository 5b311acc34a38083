//! A lightweight, format-neutral view of a resource document.
//!
//! Both navigators (JSON and XML) produce the same [`SourceNode`] shape:
//!
//! - a resource is a node named after its resource type
//! - every element is a child node; repeating elements are repeated children
//! - primitives carry their value in [`SourceNode::value`]
//! - a nested resource (bundle entry, contained resource) is a node with a
//!   single child named after the nested resource type
//!
//! The harvester only ever looks at a handful of top-level elements, so the
//! node API is deliberately small: child lookup and dotted-path value lookup.

/// One element of a navigated document.
///
/// # Examples
///
/// ```
/// use dirsrc_summary::SourceNode;
///
/// let vs = SourceNode::new("ValueSet")
///     .with_child(SourceNode::leaf("id", "vs1"))
///     .with_child(
///         SourceNode::new("codeSystem").with_child(SourceNode::leaf("system", "http://x/vs")),
///     );
///
/// assert_eq!(vs.value_of("id"), Some("vs1"));
/// assert_eq!(vs.value_of("codeSystem.system"), Some("http://x/vs"));
/// assert_eq!(vs.value_of("codeSystem.version"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceNode {
    /// Element name (or resource type for resource nodes).
    pub name: String,
    /// Primitive value, if any.
    pub value: Option<String>,
    /// Child elements in document order.
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// Creates a node without a value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Creates a primitive node.
    #[must_use]
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Appends a child and returns `self`.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns every child with the given name.
    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Self> + use<'a, 'n> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the value at a dotted path, following the first match at
    /// each step.
    #[must_use]
    pub fn value_of(&self, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(self, |node, step| node.child(step))
            .and_then(|node| node.value.as_deref())
    }

    /// Returns every value at a dotted path, following all matches at each
    /// step.
    #[must_use]
    pub fn values_of(&self, path: &str) -> Vec<&str> {
        let mut current: Vec<&Self> = vec![self];
        for step in path.split('.') {
            current = current
                .into_iter()
                .flat_map(|node| node.children_named(step))
                .collect();
        }
        current
            .into_iter()
            .filter_map(|node| node.value.as_deref())
            .collect()
    }

    /// Returns the nested resource of a wrapper element such as
    /// `entry.resource`.
    #[must_use]
    pub fn nested_resource(&self) -> Option<&Self> {
        self.children.first()
    }
}
