//! RenderMan primitive variables.
//!
//! A primitive variable has a storage class (how many values a
//! primitive carries and how they get spread across a grid) and a
//! type. Both come from a declaration string like `"varying float
//! width"`. Well known names (`P`, `N`, `Cs`, `Os`, `s`, `t`,
//! `width`, ...) are predeclared.
//!
//! For quadrics the varying classes carry one value per parametric
//! corner, ordered (umin,vmin), (umax,vmin), (umin,vmax),
//! (umax,vmax). Dicing interpolates them bilinearly, splitting
//! subdivides them so that both children see the same values along
//! their shared edge.

// std
use std::collections::HashMap;
use std::str::FromStr;
// others
use lazy_static::lazy_static;
use strum_macros::{Display, EnumString};
// reyes
use crate::core::error::DiceError;
use crate::core::geometry::{Normal3f, Point3f, Point4f, Vector3f};
use crate::core::reyes::{bilerp, grid_fraction, lerp, Float};
use crate::core::spectrum::Color;
use crate::core::transform::Matrix4x4;

#[derive(EnumString, Display, Debug, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    Float,
    Integer,
    Point,
    Vector,
    Normal,
    HPoint,
    Color,
    String,
    Matrix,
}

impl ParamType {
    /// Number of floats one element of this type is made of.
    pub fn n_floats(&self) -> usize {
        match self {
            ParamType::Float | ParamType::Integer | ParamType::String => 1,
            ParamType::Point | ParamType::Vector | ParamType::Normal | ParamType::Color => 3,
            ParamType::HPoint => 4,
            ParamType::Matrix => 16,
        }
    }
}

#[derive(EnumString, Display, Debug, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ParamClass {
    Constant,
    Uniform,
    Varying,
    Vertex,
    FaceVarying,
}

impl ParamClass {
    /// Does the class carry a value per parametric corner (or per
    /// point)?
    pub fn is_varying(&self) -> bool {
        match self {
            ParamClass::Varying | ParamClass::Vertex | ParamClass::FaceVarying => true,
            _ => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Declaration {
    pub class: ParamClass,
    pub ptype: ParamType,
    pub array_size: usize,
}

impl Declaration {
    pub fn new(class: ParamClass, ptype: ParamType) -> Self {
        Declaration {
            class,
            ptype,
            array_size: 1,
        }
    }
}

lazy_static! {
    static ref STANDARD_DECLARATIONS: HashMap<&'static str, Declaration> = {
        let mut m = HashMap::new();
        m.insert("P", Declaration::new(ParamClass::Vertex, ParamType::Point));
        m.insert("Pw", Declaration::new(ParamClass::Vertex, ParamType::HPoint));
        m.insert("N", Declaration::new(ParamClass::Varying, ParamType::Normal));
        m.insert("Cs", Declaration::new(ParamClass::Varying, ParamType::Color));
        m.insert("Os", Declaration::new(ParamClass::Varying, ParamType::Color));
        m.insert("s", Declaration::new(ParamClass::Varying, ParamType::Float));
        m.insert("t", Declaration::new(ParamClass::Varying, ParamType::Float));
        m.insert("u", Declaration::new(ParamClass::Varying, ParamType::Float));
        m.insert("v", Declaration::new(ParamClass::Varying, ParamType::Float));
        m.insert(
            "st",
            Declaration {
                class: ParamClass::Varying,
                ptype: ParamType::Float,
                array_size: 2,
            },
        );
        m.insert("width", Declaration::new(ParamClass::Varying, ParamType::Float));
        m.insert(
            "constantwidth",
            Declaration::new(ParamClass::Constant, ParamType::Float),
        );
        m
    };
}

/// Look up one of the predeclared RenderMan variables.
pub fn standard_declaration(name: &str) -> Option<Declaration> {
    STANDARD_DECLARATIONS.get(name).copied()
}

/// Parse a parameter token, either a predeclared name or an inline
/// declaration like `"varying color[2] tint"`. Returns the
/// declaration and the bare name.
pub fn parse_declaration(token: &str) -> Result<(Declaration, String), DiceError> {
    let words: Vec<&str> = token.split_whitespace().collect();
    if words.len() == 1 {
        return match standard_declaration(words[0]) {
            Some(decl) => Ok((decl, words[0].to_string())),
            None => Err(DiceError::BadDeclaration(token.to_string())),
        };
    }
    if words.len() < 2 || words.len() > 3 {
        return Err(DiceError::BadDeclaration(token.to_string()));
    }
    let (class, type_word, name) = if words.len() == 3 {
        let class: ParamClass = ParamClass::from_str(&words[0].to_lowercase())
            .map_err(|_| DiceError::BadDeclaration(token.to_string()))?;
        (class, words[1], words[2])
    } else {
        // no class given, RenderMan defaults to uniform
        (ParamClass::Uniform, words[0], words[1])
    };
    let (type_name, array_size) = match type_word.find('[') {
        Some(open) => {
            let close: usize = type_word
                .find(']')
                .ok_or_else(|| DiceError::BadDeclaration(token.to_string()))?;
            let size: usize = type_word[open + 1..close]
                .parse()
                .map_err(|_| DiceError::BadDeclaration(token.to_string()))?;
            (&type_word[..open], size)
        }
        None => (type_word, 1),
    };
    if array_size == 0 {
        return Err(DiceError::BadDeclaration(token.to_string()));
    }
    let ptype: ParamType = ParamType::from_str(&type_name.to_lowercase())
        .map_err(|_| DiceError::BadDeclaration(token.to_string()))?;
    Ok((
        Declaration {
            class,
            ptype,
            array_size,
        },
        name.to_string(),
    ))
}

/// Values which can be spread across a grid from four corner values.
pub trait GridValue: Clone {
    fn bilerp(u: Float, v: Float, c0: &Self, c1: &Self, c2: &Self, c3: &Self) -> Self;
    fn midpoint(a: &Self, b: &Self) -> Self;
}

macro_rules! lerp_grid_value {
    ($t:ty) => {
        impl GridValue for $t {
            fn bilerp(u: Float, v: Float, c0: &Self, c1: &Self, c2: &Self, c3: &Self) -> Self {
                bilerp(u, v, *c0, *c1, *c2, *c3)
            }
            fn midpoint(a: &Self, b: &Self) -> Self {
                lerp(0.5 as Float, *a, *b)
            }
        }
    };
}

lerp_grid_value!(Float);
lerp_grid_value!(Point3f);
lerp_grid_value!(Vector3f);
lerp_grid_value!(Normal3f);
lerp_grid_value!(Point4f);
lerp_grid_value!(Color);
lerp_grid_value!(Matrix4x4);

impl GridValue for i32 {
    fn bilerp(u: Float, v: Float, c0: &Self, c1: &Self, c2: &Self, c3: &Self) -> Self {
        bilerp(u, v, *c0 as Float, *c1 as Float, *c2 as Float, *c3 as Float).round() as i32
    }
    fn midpoint(a: &Self, b: &Self) -> Self {
        lerp(0.5 as Float, *a as Float, *b as Float).round() as i32
    }
}

// strings can't be blended, take the nearest corner
impl GridValue for String {
    fn bilerp(u: Float, v: Float, c0: &Self, c1: &Self, c2: &Self, c3: &Self) -> Self {
        match (u < 0.5 as Float, v < 0.5 as Float) {
            (true, true) => c0.clone(),
            (false, true) => c1.clone(),
            (true, false) => c2.clone(),
            (false, false) => c3.clone(),
        }
    }
    fn midpoint(a: &Self, _b: &Self) -> Self {
        a.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(Vec<Float>),
    Integer(Vec<i32>),
    Point(Vec<Point3f>),
    Vector(Vec<Vector3f>),
    Normal(Vec<Normal3f>),
    HPoint(Vec<Point4f>),
    Color(Vec<Color>),
    String(Vec<String>),
    Matrix(Vec<Matrix4x4>),
}

macro_rules! map_param_value {
    ($value:expr, $values:ident => $body:expr) => {
        match $value {
            ParamValue::Float($values) => ParamValue::Float($body),
            ParamValue::Integer($values) => ParamValue::Integer($body),
            ParamValue::Point($values) => ParamValue::Point($body),
            ParamValue::Vector($values) => ParamValue::Vector($body),
            ParamValue::Normal($values) => ParamValue::Normal($body),
            ParamValue::HPoint($values) => ParamValue::HPoint($body),
            ParamValue::Color($values) => ParamValue::Color($body),
            ParamValue::String($values) => ParamValue::String($body),
            ParamValue::Matrix($values) => ParamValue::Matrix($body),
        }
    };
}

macro_rules! split_param_value {
    ($value:expr, $values:ident => $body:expr) => {
        match $value {
            ParamValue::Float($values) => {
                let (a, b) = $body;
                (ParamValue::Float(a), ParamValue::Float(b))
            }
            ParamValue::Integer($values) => {
                let (a, b) = $body;
                (ParamValue::Integer(a), ParamValue::Integer(b))
            }
            ParamValue::Point($values) => {
                let (a, b) = $body;
                (ParamValue::Point(a), ParamValue::Point(b))
            }
            ParamValue::Vector($values) => {
                let (a, b) = $body;
                (ParamValue::Vector(a), ParamValue::Vector(b))
            }
            ParamValue::Normal($values) => {
                let (a, b) = $body;
                (ParamValue::Normal(a), ParamValue::Normal(b))
            }
            ParamValue::HPoint($values) => {
                let (a, b) = $body;
                (ParamValue::HPoint(a), ParamValue::HPoint(b))
            }
            ParamValue::Color($values) => {
                let (a, b) = $body;
                (ParamValue::Color(a), ParamValue::Color(b))
            }
            ParamValue::String($values) => {
                let (a, b) = $body;
                (ParamValue::String(a), ParamValue::String(b))
            }
            ParamValue::Matrix($values) => {
                let (a, b) = $body;
                (ParamValue::Matrix(a), ParamValue::Matrix(b))
            }
        }
    };
}

fn dice_corners<T: GridValue>(values: &[T], array_size: usize, u_size: i32, v_size: i32) -> Vec<T> {
    let n: usize = ((u_size + 1) * (v_size + 1)) as usize * array_size;
    let mut out: Vec<T> = Vec::with_capacity(n);
    for v in 0..=v_size {
        let vf: Float = grid_fraction(v, v_size);
        for u in 0..=u_size {
            let uf: Float = grid_fraction(u, u_size);
            for k in 0..array_size {
                out.push(T::bilerp(
                    uf,
                    vf,
                    &values[k],
                    &values[array_size + k],
                    &values[2 * array_size + k],
                    &values[3 * array_size + k],
                ));
            }
        }
    }
    out
}

fn subdivide_corners<T: GridValue>(values: &[T], array_size: usize, split_u: bool) -> (Vec<T>, Vec<T>) {
    // each child corner is the midpoint of two parent corners (which
    // may be the same corner)
    let (layout_a, layout_b): ([(usize, usize); 4], [(usize, usize); 4]) = if split_u {
        (
            [(0, 0), (0, 1), (2, 2), (2, 3)],
            [(0, 1), (1, 1), (2, 3), (3, 3)],
        )
    } else {
        (
            [(0, 0), (1, 1), (0, 2), (1, 3)],
            [(0, 2), (1, 3), (2, 2), (3, 3)],
        )
    };
    let build = |layout: &[(usize, usize); 4]| -> Vec<T> {
        let mut out: Vec<T> = Vec::with_capacity(4 * array_size);
        for (from, to) in layout.iter() {
            for k in 0..array_size {
                let a: &T = &values[from * array_size + k];
                if from == to {
                    out.push(a.clone());
                } else {
                    out.push(T::midpoint(a, &values[to * array_size + k]));
                }
            }
        }
        out
    };
    (build(&layout_a), build(&layout_b))
}

fn select_elements<T: Clone>(values: &[T], array_size: usize, indices: &[usize]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(indices.len() * array_size);
    for index in indices {
        for k in 0..array_size {
            out.push(values[index * array_size + k].clone());
        }
    }
    out
}

impl ParamValue {
    pub fn len(&self) -> usize {
        match self {
            ParamValue::Float(values) => values.len(),
            ParamValue::Integer(values) => values.len(),
            ParamValue::Point(values) => values.len(),
            ParamValue::Vector(values) => values.len(),
            ParamValue::Normal(values) => values.len(),
            ParamValue::HPoint(values) => values.len(),
            ParamValue::Color(values) => values.len(),
            ParamValue::String(values) => values.len(),
            ParamValue::Matrix(values) => values.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Integer(_) => ParamType::Integer,
            ParamValue::Point(_) => ParamType::Point,
            ParamValue::Vector(_) => ParamType::Vector,
            ParamValue::Normal(_) => ParamType::Normal,
            ParamValue::HPoint(_) => ParamType::HPoint,
            ParamValue::Color(_) => ParamType::Color,
            ParamValue::String(_) => ParamType::String,
            ParamValue::Matrix(_) => ParamType::Matrix,
        }
    }
    /// Convert a flat list of floats into values of the given type.
    pub fn from_floats(ptype: ParamType, floats: &[Float]) -> Option<ParamValue> {
        let n: usize = ptype.n_floats();
        if floats.len() % n != 0 {
            return None;
        }
        let chunks = floats.chunks(n);
        match ptype {
            ParamType::Float => Some(ParamValue::Float(floats.to_vec())),
            ParamType::Integer => Some(ParamValue::Integer(
                floats.iter().map(|f| f.round() as i32).collect(),
            )),
            ParamType::Point => Some(ParamValue::Point(
                chunks
                    .map(|c| Point3f {
                        x: c[0],
                        y: c[1],
                        z: c[2],
                    })
                    .collect(),
            )),
            ParamType::Vector => Some(ParamValue::Vector(
                chunks
                    .map(|c| Vector3f {
                        x: c[0],
                        y: c[1],
                        z: c[2],
                    })
                    .collect(),
            )),
            ParamType::Normal => Some(ParamValue::Normal(
                chunks
                    .map(|c| Normal3f {
                        x: c[0],
                        y: c[1],
                        z: c[2],
                    })
                    .collect(),
            )),
            ParamType::HPoint => Some(ParamValue::HPoint(
                chunks
                    .map(|c| Point4f {
                        x: c[0],
                        y: c[1],
                        z: c[2],
                        w: c[3],
                    })
                    .collect(),
            )),
            ParamType::Color => Some(ParamValue::Color(chunks.map(Color::from_slice).collect())),
            ParamType::Matrix => Some(ParamValue::Matrix(
                chunks.map(Matrix4x4::from_slice).collect(),
            )),
            ParamType::String => None,
        }
    }
    /// Spread four corner groups of *array_size* elements across a
    /// `(u_size+1) x (v_size+1)` grid.
    pub fn dice_corners(&self, array_size: usize, u_size: i32, v_size: i32) -> ParamValue {
        map_param_value!(self, values => dice_corners(values, array_size, u_size, v_size))
    }
    /// Split four corner groups in two along u or v.
    pub fn subdivide_corners(&self, array_size: usize, split_u: bool) -> (ParamValue, ParamValue) {
        split_param_value!(self, values => subdivide_corners(values, array_size, split_u))
    }
    /// Gather the element groups at the given indices (in that
    /// order).
    pub fn select(&self, array_size: usize, indices: &[usize]) -> ParamValue {
        map_param_value!(self, values => select_elements(values, array_size, indices))
    }
    pub fn as_floats(&self) -> Option<&[Float]> {
        match self {
            ParamValue::Float(values) => Some(&values[..]),
            _ => None,
        }
    }
    pub fn as_colors(&self) -> Option<&[Color]> {
        match self {
            ParamValue::Color(values) => Some(&values[..]),
            _ => None,
        }
    }
    pub fn as_normals(&self) -> Option<&[Normal3f]> {
        match self {
            ParamValue::Normal(values) => Some(&values[..]),
            _ => None,
        }
    }
}

/// A named primitive variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub class: ParamClass,
    pub array_size: usize,
    pub value: ParamValue,
}

impl Parameter {
    /// Create a parameter from a token (predeclared name or inline
    /// declaration) and a value of the declared type. Points, vectors
    /// and normals may be given as each other.
    pub fn new(token: &str, value: ParamValue) -> Result<Parameter, DiceError> {
        let (decl, name) = parse_declaration(token)?;
        let value: ParamValue = match (decl.ptype, value) {
            (ParamType::Point, ParamValue::Vector(v)) => ParamValue::Point(
                v.iter().map(|v| Point3f::from(*v)).collect(),
            ),
            (ParamType::Normal, ParamValue::Vector(v)) => ParamValue::Normal(
                v.iter().map(|v| Normal3f::from(*v)).collect(),
            ),
            (ParamType::Vector, ParamValue::Point(v)) => ParamValue::Vector(
                v.iter().map(|p| Vector3f::from(*p)).collect(),
            ),
            (ptype, ParamValue::Float(floats)) if ptype != ParamType::Float => {
                ParamValue::from_floats(ptype, &floats).ok_or_else(|| {
                    DiceError::ParameterTypeMismatch {
                        name: name.clone(),
                        expected: ptype.to_string(),
                    }
                })?
            }
            (_, value) => value,
        };
        if value.param_type() != decl.ptype {
            return Err(DiceError::ParameterTypeMismatch {
                name,
                expected: decl.ptype.to_string(),
            });
        }
        if value.len() % decl.array_size != 0 {
            return Err(DiceError::ValueCountMismatch {
                name,
                expected: decl.array_size,
                found: value.len(),
            });
        }
        Ok(Parameter {
            name,
            class: decl.class,
            array_size: decl.array_size,
            value,
        })
    }
    pub fn ptype(&self) -> ParamType {
        self.value.param_type()
    }
    /// Number of element groups (one per corner, point or primitive).
    pub fn count(&self) -> usize {
        self.value.len() / self.array_size
    }
}

/// The primitive variables attached to a primitive.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrimitiveVariables {
    pub params: Vec<Parameter>,
}

impl PrimitiveVariables {
    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }
    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
    /// Add or replace a variable.
    pub fn set(&mut self, param: Parameter) {
        if let Some(existing) = self.params.iter_mut().find(|p| p.name == param.name) {
            *existing = param;
        } else {
            self.params.push(param);
        }
    }
    /// Check that every variable carries the number of values its
    /// class asks for, given the number of varying groups
    /// (4 corners for quadrics, one per point for point clouds).
    pub fn validate(&self, n_varying: usize) -> Result<(), DiceError> {
        for param in &self.params {
            let expected: usize = if param.class.is_varying() {
                n_varying
            } else {
                1
            };
            if param.count() != expected {
                return Err(DiceError::ValueCountMismatch {
                    name: param.name.clone(),
                    expected: expected * param.array_size,
                    found: param.value.len(),
                });
            }
        }
        Ok(())
    }
    /// Corner values for the two halves of a quadric split along u (or
    /// v), uniform and constant values are shared.
    pub fn subdivide(&self, split_u: bool) -> (PrimitiveVariables, PrimitiveVariables) {
        let mut a: PrimitiveVariables = PrimitiveVariables::default();
        let mut b: PrimitiveVariables = PrimitiveVariables::default();
        for param in &self.params {
            if param.class.is_varying() && param.count() == 4 {
                let (va, vb) = param.value.subdivide_corners(param.array_size, split_u);
                a.params.push(Parameter {
                    value: va,
                    ..param.clone()
                });
                b.params.push(Parameter {
                    value: vb,
                    ..param.clone()
                });
            } else {
                a.params.push(param.clone());
                b.params.push(param.clone());
            }
        }
        (a, b)
    }
}
