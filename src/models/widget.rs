//! Declarative layout tree handed to the widget host.
//!
//! The host only draws; everything it needs (stacks, text, images, colors,
//! gradients, fonts, padding) is spelled out here and serialized as JSON.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum WidgetFamily {
    Small,
    Medium,
    Large,
    AccessoryRectangular,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Color {
    pub hex: String,
    pub alpha: f64,
}

impl Color {
    pub fn hex(hex: &str) -> Self {
        Self {
            hex: hex.to_string(),
            alpha: 1.0,
        }
    }

    pub fn with_alpha(hex: &str, alpha: f64) -> Self {
        Self {
            hex: hex.to_string(),
            alpha,
        }
    }

    pub fn clear() -> Self {
        Self::with_alpha("#000000", 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    pub locations: Vec<f64>,
    pub colors: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Point>,
}

impl LinearGradient {
    pub fn new(locations: &[f64], colors: Vec<Color>) -> Self {
        Self {
            locations: locations.to_vec(),
            colors,
            start_point: None,
            end_point: None,
        }
    }

    /// Left-to-right through the vertical middle.
    pub fn horizontal(mut self) -> Self {
        self.start_point = Some(Point { x: 0.0, y: 0.5 });
        self.end_point = Some(Point { x: 1.0, y: 0.5 });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    Color(Color),
    Gradient(LinearGradient),
}

/// Edge insets in host order: top, leading, bottom, trailing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl Padding {
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Font {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Stack(Stack),
    Text(Text),
    Image(Image),
    Spacer(Spacer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    pub spacing: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    pub center_content: bool,
    pub children: Vec<Node>,
}

impl Stack {
    fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            size: None,
            padding: None,
            spacing: 0.0,
            background: None,
            corner_radius: None,
            center_content: false,
            children: Vec::new(),
        }
    }

    pub fn horizontal() -> Self {
        Self::with_layout(Layout::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::with_layout(Layout::Vertical)
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn centered(mut self) -> Self {
        self.center_content = true;
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    pub fn spacer(mut self, length: Option<f64>) -> Self {
        self.push(Spacer { length });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: String,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_scale_factor: Option<f64>,
}

impl Text {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            color: None,
            opacity: 1.0,
            line_limit: None,
            minimum_scale_factor: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Single line, shrinking down to `min_scale` before truncating.
    pub fn single_line(mut self, min_scale: f64) -> Self {
        self.line_limit = Some(1);
        self.minimum_scale_factor = Some(min_scale);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub path: PathBuf,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

/// `None` length is a flexible spacer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl From<Stack> for Node {
    fn from(stack: Stack) -> Self {
        Node::Stack(stack)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Image> for Node {
    fn from(image: Image) -> Self {
        Node::Image(image)
    }
}

impl From<Spacer> for Node {
    fn from(spacer: Spacer) -> Self {
        Node::Spacer(spacer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub family: WidgetFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<String>,
    pub children: Vec<Node>,
}

impl Widget {
    pub fn new(family: WidgetFamily) -> Self {
        Self {
            family,
            padding: None,
            background: None,
            refresh_after: None,
            freshness: None,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn add_spacer(&mut self, length: Option<f64>) {
        self.push(Spacer { length });
    }

    /// Every text leaf in document order.
    pub fn texts(&self) -> Vec<&Text> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Text>) {
            for node in nodes {
                match node {
                    Node::Text(t) => out.push(t),
                    Node::Stack(s) => walk(&s.children, out),
                    Node::Image(_) | Node::Spacer(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }
}
