//! Capability contract for the automation backend
//!
//! The facade only talks to these traits. [`crate::AdbSdk`] implements them
//! on top of `adb` and an OCR engine; tests script them in memory.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Swipe gesture in screen pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub duration_ms: u32,
}

/// Axis-aligned bounding box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle covering both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Center point, handy as a tap target
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }
}

/// One recognized piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub text: String,
    #[serde(rename = "box")]
    pub bbox: Rect,
    /// Confidence in `0.0..=1.0`
    pub score: f32,
}

/// Full result of a recognition pass
pub type Recognition = Vec<TextBox>;

/// Entry point of the automation backend
#[async_trait]
pub trait AutomationSdk: Send + Sync {
    /// Enumerate connectable endpoints
    async fn discover(&self) -> Result<Vec<Arc<dyn Endpoint>>>;

    /// Load a resource bundle rooted at `path`
    async fn load_bundle(&self, path: &Path) -> Result<Arc<dyn Resource>>;

    /// Bind a resource bundle to a controller, producing a recognition session
    async fn bind(
        &self,
        resource: Arc<dyn Resource>,
        controller: Arc<dyn Controller>,
    ) -> Result<Arc<dyn Session>>;
}

/// A discovered device that has not been connected yet
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Stable name the endpoint is registered under
    fn name(&self) -> &str;

    async fn connect(&self) -> Result<Arc<dyn Controller>>;
}

/// A connected device
#[async_trait]
pub trait Controller: Send + Sync {
    async fn screenshot(&self) -> Result<DynamicImage>;

    async fn click(&self, x: i32, y: i32) -> Result<()>;

    async fn swipe(&self, gesture: Swipe) -> Result<()>;

    async fn input_text(&self, text: &str) -> Result<()>;
}

/// A loaded resource bundle
pub trait Resource: Send + Sync {
    fn root(&self) -> &Path;

    /// Recognition model data inside the bundle, if it ships any
    fn model_dir(&self) -> Option<&Path> {
        None
    }
}

/// A controller bound to a resource bundle
#[async_trait]
pub trait Session: Send + Sync {
    fn controller(&self) -> Arc<dyn Controller>;

    async fn recognize(&self, image: &DynamicImage) -> Result<Recognition>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_union() {
        let a = Rect::new(10, 10, 20, 10);
        let b = Rect::new(40, 5, 10, 10);
        assert_eq!(a.union(&b), Rect::new(10, 5, 40, 15));
    }

    #[test]
    fn test_rect_center() {
        assert_eq!(Rect::new(100, 200, 50, 20).center(), (125, 210));
    }

    #[test]
    fn test_rect_extreme_coordinates_saturate() {
        let far = Rect::new(i32::MAX - 5, 0, 100, 10);
        let near = Rect::new(-10, 0, 5, 10);
        assert_eq!(far.union(&near), Rect::new(-10, 0, i32::MAX, 10));
        assert_eq!(Rect::new(i32::MAX, i32::MAX, 100, 100).center(), (i32::MAX, i32::MAX));
    }

    #[test]
    fn test_text_box_serializes_box_field() {
        let text_box = TextBox {
            text: "Settings".to_string(),
            bbox: Rect::new(1, 2, 3, 4),
            score: 0.5,
        };
        let value = serde_json::to_value(&text_box).unwrap();
        assert_eq!(value["text"], "Settings");
        assert_eq!(value["box"]["width"], 3);
        assert_eq!(value["score"], 0.5);
    }
}
