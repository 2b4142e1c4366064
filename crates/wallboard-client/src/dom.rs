use wallboard_core::surface::{DomOp, Node, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::diag;

/// [`Surface`] backed by the live page document.
pub struct DocumentSurface {
    document: web_sys::Document,
}

impl DocumentSurface {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn write(&self, element: &web_sys::Element, op: &DomOp) -> Result<(), JsValue> {
        match op {
            DomOp::SetText { text, .. } => element.set_text_content(Some(text)),
            DomOp::SetClass { class, enabled, .. } => {
                element.class_list().toggle_with_force(class, *enabled)?;
            },
            DomOp::SetVisible { visible, .. } => {
                let html: &web_sys::HtmlElement = element
                    .dyn_ref()
                    .ok_or_else(|| JsValue::from_str("not an HTML element"))?;
                html.style()
                    .set_property("display", if *visible { "block" } else { "none" })?;
            },
            DomOp::ReplaceChildren { nodes, .. } => {
                element.set_text_content(None);
                for node in nodes {
                    element.append_child(&self.build(node)?)?;
                }
            },
        }
        Ok(())
    }

    /// Create a DOM node for a fragment. Text is always a text node.
    fn build(&self, node: &Node) -> Result<web_sys::Node, JsValue> {
        match node {
            Node::Text(text) => Ok(self.document.create_text_node(text).into()),
            Node::Element(el) => {
                let element = self.document.create_element(el.tag)?;
                for class in &el.classes {
                    element.class_list().add_1(class)?;
                }
                for child in &el.children {
                    element.append_child(&self.build(child)?)?;
                }
                Ok(element.into())
            },
        }
    }
}

impl Surface for DocumentSurface {
    fn apply(&mut self, op: &DomOp) -> bool {
        let Some(element) = self.document.get_element_by_id(op.target()) else {
            return false;
        };
        if let Err(e) = self.write(&element, op) {
            diag::console_warn!("Failed to update '{}': {e:?}", op.target());
        }
        true
    }
}
