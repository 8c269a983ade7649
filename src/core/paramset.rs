//! Bundle up attributes and options and their values in a generic
//! way.
//!
//! Values are addressed by a category and a name, e.g. `("System",
//! "ShadingRate")` or `("limits", "gridsize")`, the same way the
//! RenderMan `Attribute` and `Option` calls address them. Lookups
//! return `None` if nothing was stored under that key, the typed
//! accessors on **Attributes** and **Options** fall back to the
//! standard defaults.

// reyes
use crate::core::grid::Uses;
use crate::core::reyes::Float;
use crate::core::spectrum::Color;

pub struct ParamSetItem<T> {
    pub category: String,
    pub name: String,
    pub values: Vec<T>,
    pub n_values: usize,
}

impl<T: Clone> Clone for ParamSetItem<T> {
    fn clone(&self) -> Self {
        ParamSetItem::<T> {
            category: self.category.clone(),
            name: self.name.clone(),
            values: self.values.clone(),
            n_values: self.n_values,
        }
    }
}

#[derive(Default, Clone)]
pub struct AttributeSet {
    pub floats: Vec<ParamSetItem<Float>>,
    pub ints: Vec<ParamSetItem<i32>>,
    pub strings: Vec<ParamSetItem<String>>,
}

fn find_item<'a, T>(
    items: &'a [ParamSetItem<T>],
    category: &str,
    name: &str,
) -> Option<&'a ParamSetItem<T>> {
    items
        .iter()
        .find(|item| item.category == category && item.name == name)
}

fn store_item<T>(items: &mut Vec<ParamSetItem<T>>, category: &str, name: &str, values: Vec<T>) {
    let n_values: usize = values.len();
    if let Some(item) = items
        .iter_mut()
        .find(|item| item.category == category && item.name == name)
    {
        item.values = values;
        item.n_values = n_values;
        return;
    }
    items.push(ParamSetItem::<T> {
        category: category.to_string(),
        name: name.to_string(),
        values,
        n_values,
    });
}

impl AttributeSet {
    /// Store (or overwrite) floats under *category* and *name*.
    pub fn add_floats(&mut self, category: &str, name: &str, values: Vec<Float>) {
        store_item(&mut self.floats, category, name, values);
    }
    pub fn add_float(&mut self, category: &str, name: &str, value: Float) {
        self.add_floats(category, name, vec![value]);
    }
    pub fn add_ints(&mut self, category: &str, name: &str, values: Vec<i32>) {
        store_item(&mut self.ints, category, name, values);
    }
    pub fn add_int(&mut self, category: &str, name: &str, value: i32) {
        self.add_ints(category, name, vec![value]);
    }
    pub fn add_string(&mut self, category: &str, name: &str, value: String) {
        store_item(&mut self.strings, category, name, vec![value]);
    }
    pub fn get_floats(&self, category: &str, name: &str) -> Option<&[Float]> {
        find_item(&self.floats, category, name).map(|item| &item.values[..])
    }
    pub fn get_ints(&self, category: &str, name: &str) -> Option<&[i32]> {
        find_item(&self.ints, category, name).map(|item| &item.values[..])
    }
    pub fn get_string(&self, category: &str, name: &str) -> Option<&str> {
        find_item(&self.strings, category, name)
            .and_then(|item| item.values.first())
            .map(|s| s.as_str())
    }
    pub fn find_one_float(&self, category: &str, name: &str, d: Float) -> Float {
        match self.get_floats(category, name) {
            Some(values) if !values.is_empty() => values[0],
            _ => d,
        }
    }
    pub fn find_one_int(&self, category: &str, name: &str, d: i32) -> i32 {
        match self.get_ints(category, name) {
            Some(values) if !values.is_empty() => values[0],
            _ => d,
        }
    }
}

/// The attribute state a primitive was created with, shared between
/// a primitive and all of its split children.
#[derive(Clone)]
pub struct Attributes {
    pub values: AttributeSet,
    /// Grid channels the attached shaders read.
    pub uses: Uses,
}

impl Default for Attributes {
    fn default() -> Self {
        let mut values: AttributeSet = AttributeSet::default();
        values.add_float("System", "ShadingRate", 1.0);
        values.add_int("System", "Orientation", 0);
        values.add_int("dice", "binary", 0);
        values.add_floats("System", "Color", vec![1.0, 1.0, 1.0]);
        values.add_floats("System", "Opacity", vec![1.0, 1.0, 1.0]);
        values.add_floats(
            "System",
            "TextureCoordinates",
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        );
        Attributes {
            values,
            uses: Uses::standard(),
        }
    }
}

impl Attributes {
    pub fn get_float_attribute(&self, category: &str, name: &str) -> Option<&[Float]> {
        self.values.get_floats(category, name)
    }
    pub fn get_integer_attribute(&self, category: &str, name: &str) -> Option<&[i32]> {
        self.values.get_ints(category, name)
    }
    pub fn get_color_attribute(&self, category: &str, name: &str) -> Option<Color> {
        match self.values.get_floats(category, name) {
            Some(values) if values.len() >= 3 => Some(Color::from_slice(values)),
            _ => None,
        }
    }
    pub fn set_shading_rate(&mut self, shading_rate: Float) {
        self.values.add_float("System", "ShadingRate", shading_rate);
    }
    pub fn shading_rate(&self) -> Float {
        self.values
            .find_one_float("System", "ShadingRate", 1.0 as Float)
            .max(std::f32::MIN_POSITIVE)
    }
    /// The estimator works with linear distances, so it needs the
    /// square root of the shading rate (which is an area).
    pub fn shading_rate_sqrt(&self) -> Float {
        self.shading_rate().sqrt()
    }
    /// A non-zero orientation flips the geometric normals.
    pub fn orientation_flipped(&self) -> bool {
        self.values.find_one_int("System", "Orientation", 0) != 0
    }
    pub fn binary_dicing(&self) -> bool {
        self.values.find_one_int("dice", "binary", 0) != 0
    }
    /// Texture coordinates of the four parametric corners, ordered
    /// (0,0), (1,0), (0,1), (1,1).
    pub fn texture_coordinates(&self) -> [(Float, Float); 4] {
        let mut st: [(Float, Float); 4] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        if let Some(values) = self.get_float_attribute("System", "TextureCoordinates") {
            if values.len() >= 8 {
                for (i, corner) in st.iter_mut().enumerate() {
                    *corner = (values[i * 2], values[i * 2 + 1]);
                }
            }
        }
        st
    }
}

/// Global render options (resolution, camera, limits).
#[derive(Clone)]
pub struct Options {
    pub values: AttributeSet,
}

impl Default for Options {
    fn default() -> Self {
        let mut values: AttributeSet = AttributeSet::default();
        values.add_ints("Format", "Resolution", vec![640, 480]);
        values.add_float("Camera", "FieldOfView", 90.0);
        values.add_floats("Camera", "Clipping", vec![0.01, 1000.0]);
        values.add_string("Camera", "Projection", String::from("perspective"));
        values.add_ints("limits", "bucketsize", vec![16, 16]);
        values.add_int("limits", "eyesplits", 10);
        values.add_int("limits", "splitdepth", 32);
        Options { values }
    }
}

impl Options {
    pub fn get_float_option(&self, category: &str, name: &str) -> Option<&[Float]> {
        self.values.get_floats(category, name)
    }
    pub fn get_integer_option(&self, category: &str, name: &str) -> Option<&[i32]> {
        self.values.get_ints(category, name)
    }
    pub fn get_string_option(&self, category: &str, name: &str) -> Option<&str> {
        self.values.get_string(category, name)
    }
    /// Explicit `limits:gridsize`, `None` if it was never set.
    pub fn grid_size(&self) -> Option<i32> {
        self.get_integer_option("limits", "gridsize")
            .and_then(|values| values.first().copied())
    }
    /// Maximum number of grid samples for quadrics, 256 unless set and
    /// never less than one.
    pub fn quadric_grid_size(&self) -> i32 {
        self.grid_size().unwrap_or(256).max(1)
    }
    pub fn bucket_size(&self) -> (i32, i32) {
        match self.get_integer_option("limits", "bucketsize") {
            Some(values) if values.len() >= 2 => (values[0].max(1), values[1].max(1)),
            _ => (16, 16),
        }
    }
    pub fn eye_splits(&self) -> i32 {
        self.values.find_one_int("limits", "eyesplits", 10)
    }
    pub fn split_depth(&self) -> i32 {
        self.values.find_one_int("limits", "splitdepth", 32)
    }
    pub fn resolution(&self) -> (i32, i32) {
        match self.get_integer_option("Format", "Resolution") {
            Some(values) if values.len() >= 2 => (values[0].max(1), values[1].max(1)),
            _ => (640, 480),
        }
    }
    pub fn field_of_view(&self) -> Float {
        self.values.find_one_float("Camera", "FieldOfView", 90.0)
    }
    pub fn clipping(&self) -> (Float, Float) {
        match self.get_float_option("Camera", "Clipping") {
            Some(values) if values.len() >= 2 => (values[0], values[1]),
            _ => (0.01, 1000.0),
        }
    }
    pub fn is_perspective(&self) -> bool {
        self.get_string_option("Camera", "Projection") != Some("orthographic")
    }
}
