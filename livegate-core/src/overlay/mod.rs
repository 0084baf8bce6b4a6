// Module: overlay
// Overlay metadata records: position/size/style annotations rendered by the
// frontend on top of the player. Persistence glue only; the store is a
// collaborator behind the `OverlayStore` trait.

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::{JsonFileStore, OverlayStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Image,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A stored overlay document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    /// Image URL or text body, depending on `kind`
    pub content: String,
    pub position: Position,
    pub size: Size,
    #[serde(default = "default_style")]
    pub style: serde_json::Value,
}

/// Creation request: everything but the id, style optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOverlay {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub content: String,
    pub position: Position,
    pub size: Size,
    pub style: Option<serde_json::Value>,
}

/// Partial update: only provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<OverlayKind>,
    pub content: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub style: Option<serde_json::Value>,
}

fn default_style() -> serde_json::Value {
    serde_json::json!({
        "color": "#ffffff",
        "fontSize": "24px",
        "zIndex": 1,
    })
}

impl Overlay {
    #[must_use]
    pub fn from_new(id: String, new: NewOverlay) -> Self {
        Self {
            id,
            name: new.name,
            kind: new.kind,
            content: new.content,
            position: new.position,
            size: new.size,
            style: new.style.unwrap_or_else(default_style),
        }
    }

    pub fn apply(&mut self, patch: OverlayPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_overlay_defaults_style() {
        let new: NewOverlay = serde_json::from_value(serde_json::json!({
            "name": "logo",
            "type": "image",
            "content": "https://example.com/logo.png",
            "position": {"x": 10.0, "y": 20.0},
            "size": {"width": 100.0, "height": 50.0},
        }))
        .expect("deserialize");

        let overlay = Overlay::from_new("abc".to_string(), new);
        assert_eq!(overlay.kind, OverlayKind::Image);
        assert_eq!(overlay.style["color"], "#ffffff");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: std::result::Result<NewOverlay, _> =
            serde_json::from_value(serde_json::json!({
                "name": "bad",
                "type": "video",
                "content": "x",
                "position": {"x": 0.0, "y": 0.0},
                "size": {"width": 1.0, "height": 1.0},
            }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_touches_only_provided_fields() {
        let mut overlay = Overlay {
            id: "1".to_string(),
            name: "ticker".to_string(),
            kind: OverlayKind::Text,
            content: "hello".to_string(),
            position: Position { x: 0.0, y: 0.0 },
            size: Size {
                width: 10.0,
                height: 10.0,
            },
            style: default_style(),
        };

        overlay.apply(OverlayPatch {
            content: Some("breaking news".to_string()),
            ..OverlayPatch::default()
        });

        assert_eq!(overlay.content, "breaking news");
        assert_eq!(overlay.name, "ticker");
        assert_eq!(overlay.kind, OverlayKind::Text);
    }
}
