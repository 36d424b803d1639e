//! Built-in widget kinds.
//!
//! These are the node types a view unit can instantiate by name. Visual
//! kinds implement [`Positionable`]; layouts and timers do not.

use crate::core::Rect;

use super::{LiveObject, Positionable};

/// Visual widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    Button,
    Panel,
    TextInput,
}

impl WidgetKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Button => "Button",
            Self::Panel => "Panel",
            Self::TextInput => "TextInput",
        }
    }
}

/// A visual widget with optional text.
#[derive(Debug, Clone)]
pub struct Widget {
    kind: WidgetKind,
    text: Option<String>,
    rect: Rect,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            text: None,
            rect: Rect::default(),
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl LiveObject for Widget {
    fn type_name(&self) -> &str {
        self.kind.name()
    }

    fn as_positionable(&self) -> Option<&dyn Positionable> {
        Some(self)
    }

    fn as_positionable_mut(&mut self) -> Option<&mut dyn Positionable> {
        Some(self)
    }
}

impl Positionable for Widget {
    fn geometry(&self) -> Rect {
        self.rect
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Box layout. Arranges children; never painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    vertical: bool,
}

impl Layout {
    pub fn vertical() -> Self {
        Self { vertical: true }
    }

    pub fn horizontal() -> Self {
        Self { vertical: false }
    }
}

impl LiveObject for Layout {
    fn type_name(&self) -> &str {
        if self.vertical {
            "VBoxLayout"
        } else {
            "HBoxLayout"
        }
    }
}

/// Periodic timer object. Non-visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub interval_ms: u64,
}

impl LiveObject for Timer {
    fn type_name(&self) -> &str {
        "Timer"
    }
}

/// Top-level frame node representing a window in its own hierarchy.
#[derive(Debug, Clone)]
pub struct Frame {
    type_name: String,
    rect: Rect,
}

impl Frame {
    pub fn new(type_name: impl Into<String>, rect: Rect) -> Self {
        Self {
            type_name: type_name.into(),
            rect,
        }
    }
}

impl LiveObject for Frame {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn as_positionable(&self) -> Option<&dyn Positionable> {
        Some(self)
    }

    fn as_positionable_mut(&mut self) -> Option<&mut dyn Positionable> {
        Some(self)
    }
}

impl Positionable for Frame {
    fn geometry(&self) -> Rect {
        self.rect
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Instantiate a built-in kind by name.
///
/// Returns `None` for names the widget library does not know.
pub fn instantiate(kind: &str, text: Option<&str>, rect: Rect) -> Option<Box<dyn LiveObject>> {
    let visual = |kind: WidgetKind| {
        let mut widget = Widget::new(kind).with_rect(rect);
        if let Some(text) = text {
            widget = widget.with_text(text);
        }
        Box::new(widget) as Box<dyn LiveObject>
    };

    match kind {
        "Label" => Some(visual(WidgetKind::Label)),
        "Button" => Some(visual(WidgetKind::Button)),
        "Panel" => Some(visual(WidgetKind::Panel)),
        "TextInput" => Some(visual(WidgetKind::TextInput)),
        "VBoxLayout" => Some(Box::new(Layout::vertical())),
        "HBoxLayout" => Some(Box::new(Layout::horizontal())),
        "Timer" => Some(Box::new(Timer { interval_ms: 1000 })),
        _ => None,
    }
}

/// Names accepted by [`instantiate`].
#[cfg(test)]
pub const KINDS: &[&str] = &[
    "Label",
    "Button",
    "Panel",
    "TextInput",
    "VBoxLayout",
    "HBoxLayout",
    "Timer",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_capability() {
        let label = instantiate("Label", Some("hi"), Rect::new(0, 0, 10, 10)).unwrap();
        assert_eq!(label.type_name(), "Label");
        assert_eq!(
            label.as_positionable().map(|p| p.geometry()),
            Some(Rect::new(0, 0, 10, 10))
        );

        let layout = instantiate("VBoxLayout", None, Rect::default()).unwrap();
        assert_eq!(layout.type_name(), "VBoxLayout");
        assert!(layout.as_positionable().is_none());
    }

    #[test]
    fn test_unknown_kind() {
        assert!(instantiate("Spinner", None, Rect::default()).is_none());
    }

    #[test]
    fn test_kinds_all_instantiate() {
        for kind in KINDS {
            assert!(instantiate(kind, None, Rect::default()).is_some(), "{kind}");
        }
    }
}
