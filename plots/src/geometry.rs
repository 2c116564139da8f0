use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A 2-D coordinate, in scene pixels or in axis units depending on context
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its origin corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Mapping between the scene (widget pixels) and the view (axis units)
///
/// `scene` is the rectangle the plot area occupies on screen and `view` is
/// the range of axis values currently visible in it. Scene y grows downwards
/// while view y grows upwards unless `invert_y` is false.
///
/// # Example
///
/// ```rust
/// use iquip_plots::{Point, Rect, ViewBox};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let view_box = ViewBox::new()
///     .scene(Rect::new(0.0, 0.0, 400.0, 200.0))
///     .view(Rect::new(0.0, 0.0, 10.0, 1.0))
///     .build()?;
/// assert_eq!(view_box.map_scene_to_view(Point::new(200.0, 200.0)), Point::new(5.0, 0.0));
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct ViewBox {
    /// Plot area in scene pixels
    pub scene: Rect,

    /// Visible range in axis units
    pub view: Rect,

    /// Whether the view y axis points up while the scene y axis points down
    #[builder(default = "true")]
    pub invert_y: bool,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            scene: Rect::default(),
            view: Rect::default(),
            invert_y: true,
        }
    }
}

impl ViewBox {
    /// Create a new builder for ViewBox
    pub fn new() -> ViewBoxBuilder {
        ViewBoxBuilder::default()
    }

    /// Scene pixels per axis unit along x and y
    pub fn pixels_per_unit(&self) -> (f64, f64) {
        (
            self.scene.width / self.view.width,
            self.scene.height / self.view.height,
        )
    }

    pub fn map_scene_to_view(&self, scene: Point) -> Point {
        let (rx, ry) = self.pixels_per_unit();
        let x = self.view.x + (scene.x - self.scene.x) / rx;
        let dy = (scene.y - self.scene.y) / ry;
        let y = if self.invert_y {
            self.view.y + self.view.height - dy
        } else {
            self.view.y + dy
        };
        Point::new(x, y)
    }

    pub fn map_view_to_scene(&self, view: Point) -> Point {
        let (rx, ry) = self.pixels_per_unit();
        let x = self.scene.x + (view.x - self.view.x) * rx;
        let dy = if self.invert_y {
            self.view.y + self.view.height - view.y
        } else {
            view.y - self.view.y
        };
        Point::new(x, self.scene.y + dy * ry)
    }
}
