//! Structured DOM operations and the surfaces they are applied to.
//!
//! Renderers never build markup strings: fragments are trees of [`Node`]s
//! whose text is always inserted as text, so snapshot content cannot inject
//! elements or attributes.

use std::collections::{BTreeSet, HashMap};

/// A node in a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element with classes and children. `class` is the only attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a class token. Empty tokens are ignored.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !class.is_empty() {
            self.classes.push(class);
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One write against an element identified by id.
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    SetText {
        target: &'static str,
        text: String,
    },
    SetClass {
        target: &'static str,
        class: &'static str,
        enabled: bool,
    },
    SetVisible {
        target: &'static str,
        visible: bool,
    },
    ReplaceChildren {
        target: &'static str,
        nodes: Vec<Node>,
    },
}

impl DomOp {
    pub fn target(&self) -> &'static str {
        match self {
            Self::SetText { target, .. }
            | Self::SetClass { target, .. }
            | Self::SetVisible { target, .. }
            | Self::ReplaceChildren { target, .. } => *target,
        }
    }
}

/// Something [`DomOp`]s can be applied to.
pub trait Surface {
    /// Apply one operation. Returns `false` when the target element does not
    /// exist, in which case nothing was written.
    fn apply(&mut self, op: &DomOp) -> bool;
}

/// What to do when an operation's target element is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Skip the operation and keep going.
    Defensive,
    /// Stop at the first missing element. Earlier writes are not rolled back.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Ids skipped in defensive mode, in operation order.
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    MissingTarget(&'static str),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTarget(id) => write!(f, "Element with ID '{id}' not found"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Apply `ops` in order under the given lookup mode.
pub fn apply_ops<S: Surface + ?Sized>(
    surface: &mut S,
    ops: &[DomOp],
    mode: LookupMode,
) -> Result<ApplyReport, RenderError> {
    let mut report = ApplyReport::default();
    for op in ops {
        if surface.apply(op) {
            report.applied += 1;
            continue;
        }
        match mode {
            LookupMode::Defensive => report.missing.push(op.target()),
            LookupMode::Strict => return Err(RenderError::MissingTarget(op.target())),
        }
    }
    Ok(report)
}

/// State of one element in a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub visible: bool,
    pub children: Vec<Node>,
}

impl Default for MemoryElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            classes: BTreeSet::new(),
            visible: true,
            children: Vec::new(),
        }
    }
}

/// In-memory stand-in for a document, holding a fixed set of element ids.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<String, MemoryElement>,
    writes: usize,
}

impl MemorySurface {
    pub fn with_targets<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: ids
                .into_iter()
                .map(|id| (id.to_string(), MemoryElement::default()))
                .collect(),
            writes: 0,
        }
    }

    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut MemoryElement> {
        self.elements.get_mut(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    pub fn children(&self, id: &str) -> &[Node] {
        self.elements
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn remove(&mut self, id: &str) {
        self.elements.remove(id);
    }
}

impl Surface for MemorySurface {
    fn apply(&mut self, op: &DomOp) -> bool {
        let Some(element) = self.elements.get_mut(op.target()) else {
            return false;
        };
        match op {
            DomOp::SetText { text, .. } => {
                element.text = text.clone();
                element.children.clear();
            },
            DomOp::SetClass { class, enabled, .. } => {
                if *enabled {
                    element.classes.insert((*class).to_string());
                } else {
                    element.classes.remove(*class);
                }
            },
            DomOp::SetVisible { visible, .. } => element.visible = *visible,
            DomOp::ReplaceChildren { nodes, .. } => {
                element.text.clear();
                element.children = nodes.clone();
            },
        }
        self.writes += 1;
        true
    }
}
