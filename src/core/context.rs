//! The render context is handed (read-only) to every stage of the
//! pipeline. It knows the render options, the camera and how to get
//! from one named coordinate system to another.
//!
//! Named spaces are `"object"`, `"world"`, `"camera"` (also
//! `"current"`), `"screen"`, `"NDC"` and `"raster"`.

// reyes
use crate::core::error::DiceError;
use crate::core::geometry::Vector3f;
use crate::core::paramset::Options;
use crate::core::reyes::Float;
use crate::core::stats::Statistics;
use crate::core::transform::Transform;

pub struct RenderContext {
    pub options: Options,
    pub world_to_camera: Transform,
    pub camera_to_screen: Transform,
    pub screen_to_raster: Transform,
    pub stats: Statistics,
}

impl RenderContext {
    /// Set up the projection from the camera options. The screen window
    /// spans `-1..1` along the shorter image axis.
    pub fn new(options: Options, world_to_camera: Transform) -> Self {
        let (near, far) = options.clipping();
        let camera_to_screen: Transform = if options.is_perspective() {
            Transform::perspective(options.field_of_view(), near, far)
        } else {
            Transform::orthographic(near, far)
        };
        let (xres, yres) = options.resolution();
        let aspect: Float = xres as Float / yres as Float;
        let (sx, sy) = if aspect > 1.0 as Float {
            (aspect, 1.0 as Float)
        } else {
            (1.0 as Float, 1.0 as Float / aspect)
        };
        let screen_to_raster: Transform = Transform::scale(xres as Float, yres as Float, 1.0)
            * Transform::scale(1.0 / (2.0 * sx), 1.0 / (-2.0 * sy), 1.0)
            * Transform::translate(&Vector3f {
                x: sx,
                y: -sy,
                z: 0.0,
            });
        RenderContext {
            options,
            world_to_camera,
            camera_to_screen,
            screen_to_raster,
            stats: Statistics::default(),
        }
    }
    pub fn camera_to_raster(&self) -> Transform {
        self.screen_to_raster * self.camera_to_screen
    }
    fn ndc_to_raster(&self) -> Transform {
        let (xres, yres) = self.options.resolution();
        Transform::scale(xres as Float, yres as Float, 1.0)
    }
    fn to_camera(&self, space: &str, object_to_world: &Transform) -> Result<Transform, DiceError> {
        match space {
            "object" | "shader" => Ok(self.world_to_camera * *object_to_world),
            "world" => Ok(self.world_to_camera),
            "camera" | "current" => Ok(Transform::default()),
            "screen" => Ok(Transform::inverse(&self.camera_to_screen)),
            "NDC" => Ok(Transform::inverse(&self.camera_to_raster()) * self.ndc_to_raster()),
            "raster" => Ok(Transform::inverse(&self.camera_to_raster())),
            _ => Err(DiceError::UnknownSpace(space.to_string())),
        }
    }
    /// The transform from space *from* to space *to*, *object_to_world*
    /// defines what `"object"` means.
    pub fn mat_space_to_space(
        &self,
        from: &str,
        to: &str,
        object_to_world: &Transform,
    ) -> Result<Transform, DiceError> {
        let from_to_camera: Transform = self.to_camera(from, object_to_world)?;
        let to_to_camera: Transform = self.to_camera(to, object_to_world)?;
        Ok(Transform::inverse(&to_to_camera) * from_to_camera)
    }
    /// Like **mat_space_to_space()** but for normals. Applying the
    /// returned matrix with `transform_point` carries a normal.
    pub fn mat_n_space_to_space(
        &self,
        from: &str,
        to: &str,
        object_to_world: &Transform,
    ) -> Result<Transform, DiceError> {
        Ok(Transform::inverse_transpose(&self.mat_space_to_space(
            from,
            to,
            object_to_world,
        )?))
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext::new(Options::default(), Transform::default())
    }
}
