use std::{borrow::Cow, fmt, rc::Rc};

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::{context::GraphicsContext, uniform::UniformType};

/// Anything that can be sampled through a texture unit.
pub trait TextureSource<C: GraphicsContext>: fmt::Debug {
    fn kind(&self) -> TextureKind;

    /// Binds the source to texture unit `unit`.
    fn bind(&self, ctx: &mut C, unit: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// An offscreen drawing surface.
    Graphics,
    /// A static image.
    Image,
    /// The current frame of a video or camera stream.
    Media,
}

/// An RGBA color with normalised channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    rgba: [f32; 4],
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { rgba: [r, g, b, a] }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let n = |c: u8| c as f32 / 255.0;
        Self::rgba(n(r), n(g), n(b), n(a))
    }

    pub fn array(&self) -> &[f32; 4] {
        &self.rgba
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Matrix {
    Mat3(Mat3),
    Mat4(Mat4),
}

impl Matrix {
    /// Column-major 3x3 representation, if this is a 3x3 matrix.
    pub fn mat3(&self) -> Option<[f32; 9]> {
        match self {
            Matrix::Mat3(m) => Some(bytemuck::cast(*m)),
            Matrix::Mat4(_) => None,
        }
    }

    /// Column-major 4x4 representation, if this is a 4x4 matrix.
    pub fn mat4(&self) -> Option<[f32; 16]> {
        match self {
            Matrix::Mat4(m) => Some(bytemuck::cast(*m)),
            Matrix::Mat3(_) => None,
        }
    }
}

/// A value that can be stored in a uniform table.
pub enum UniformValue<C: GraphicsContext> {
    Float(f32),
    Floats(Vec<f32>),
    Vec3(Vec3),
    Color(Color),
    Matrix(Matrix),
    Texture(Rc<dyn TextureSource<C>>),
    /// Several arguments that didn't collapse into a numeric sequence.
    List(Vec<UniformValue<C>>),
}

impl<C: GraphicsContext> UniformValue<C> {
    pub fn texture(source: impl TextureSource<C> + 'static) -> Self {
        UniformValue::Texture(Rc::new(source))
    }

    /// Bundles the arguments of a variadic `set` call into one value.
    ///
    /// A single argument is passed through untouched, and a run of scalars
    /// becomes a sequence so `set("color", r, g, b, a)` reads as a `vec4`.
    pub fn collect(values: impl IntoIterator<Item = UniformValue<C>>) -> Self {
        let mut values: Vec<_> = values.into_iter().collect();
        if values.len() == 1 {
            return values.remove(0);
        }
        let scalars: Option<Vec<f32>> = values
            .iter()
            .map(|v| match v {
                UniformValue::Float(x) => Some(*x),
                _ => None,
            })
            .collect();
        match scalars {
            Some(floats) => UniformValue::Floats(floats),
            None => UniformValue::List(values),
        }
    }

    /// Deduces the uniform type of this value.
    ///
    /// Returns `None` for shapes no uniform call can take.
    pub fn infer(&self) -> Option<UniformType> {
        match self {
            UniformValue::Float(_) => Some(UniformType::Float1),
            UniformValue::Floats(v) => UniformType::vector(v.len()),
            UniformValue::Vec3(_) => Some(UniformType::FloatVec3),
            UniformValue::Color(_) => Some(UniformType::FloatVec4),
            UniformValue::Matrix(Matrix::Mat3(_)) => Some(UniformType::Matrix3),
            UniformValue::Matrix(Matrix::Mat4(_)) => Some(UniformType::Matrix4),
            UniformValue::Texture(_) => Some(UniformType::Texture),
            UniformValue::List(_) => None,
        }
    }

    /// The flat numeric components of this value, if it has any.
    pub fn floats(&self) -> Option<Cow<'_, [f32]>> {
        match self {
            UniformValue::Float(x) => Some(Cow::Owned(vec![*x])),
            UniformValue::Floats(v) => Some(Cow::Borrowed(v.as_slice())),
            UniformValue::Vec3(v) => Some(Cow::Owned(v.to_array().to_vec())),
            UniformValue::Color(c) => Some(Cow::Borrowed(c.array().as_slice())),
            _ => None,
        }
    }

    pub fn mat3(&self) -> Option<[f32; 9]> {
        match self {
            UniformValue::Matrix(m) => m.mat3(),
            _ => None,
        }
    }

    pub fn mat4(&self) -> Option<[f32; 16]> {
        match self {
            UniformValue::Matrix(m) => m.mat4(),
            _ => None,
        }
    }
}

impl<C: GraphicsContext> Clone for UniformValue<C> {
    fn clone(&self) -> Self {
        match self {
            UniformValue::Float(x) => UniformValue::Float(*x),
            UniformValue::Floats(v) => UniformValue::Floats(v.clone()),
            UniformValue::Vec3(v) => UniformValue::Vec3(*v),
            UniformValue::Color(c) => UniformValue::Color(*c),
            UniformValue::Matrix(m) => UniformValue::Matrix(*m),
            UniformValue::Texture(t) => UniformValue::Texture(Rc::clone(t)),
            UniformValue::List(l) => UniformValue::List(l.clone()),
        }
    }
}

impl<C: GraphicsContext> fmt::Debug for UniformValue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
            UniformValue::Floats(v) => f.debug_tuple("Floats").field(v).finish(),
            UniformValue::Vec3(v) => f.debug_tuple("Vec3").field(v).finish(),
            UniformValue::Color(c) => f.debug_tuple("Color").field(c).finish(),
            UniformValue::Matrix(m) => f.debug_tuple("Matrix").field(m).finish(),
            UniformValue::Texture(t) => f.debug_tuple("Texture").field(&t.kind()).finish(),
            UniformValue::List(l) => f.debug_tuple("List").field(l).finish(),
        }
    }
}

impl<C: GraphicsContext> From<f32> for UniformValue<C> {
    fn from(x: f32) -> Self {
        UniformValue::Float(x)
    }
}

impl<C: GraphicsContext, const N: usize> From<[f32; N]> for UniformValue<C> {
    fn from(v: [f32; N]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl<C: GraphicsContext> From<&[f32]> for UniformValue<C> {
    fn from(v: &[f32]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl<C: GraphicsContext> From<Vec<f32>> for UniformValue<C> {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::Floats(v)
    }
}

impl<C: GraphicsContext> From<Vec2> for UniformValue<C> {
    fn from(v: Vec2) -> Self {
        UniformValue::Floats(v.to_array().to_vec())
    }
}

impl<C: GraphicsContext> From<Vec3> for UniformValue<C> {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl<C: GraphicsContext> From<Vec4> for UniformValue<C> {
    fn from(v: Vec4) -> Self {
        UniformValue::Floats(v.to_array().to_vec())
    }
}

impl<C: GraphicsContext> From<Color> for UniformValue<C> {
    fn from(c: Color) -> Self {
        UniformValue::Color(c)
    }
}

impl<C: GraphicsContext> From<Matrix> for UniformValue<C> {
    fn from(m: Matrix) -> Self {
        UniformValue::Matrix(m)
    }
}

impl<C: GraphicsContext> From<Mat3> for UniformValue<C> {
    fn from(m: Mat3) -> Self {
        UniformValue::Matrix(Matrix::Mat3(m))
    }
}

impl<C: GraphicsContext> From<Mat4> for UniformValue<C> {
    fn from(m: Mat4) -> Self {
        UniformValue::Matrix(Matrix::Mat4(m))
    }
}

impl<C: GraphicsContext> From<Rc<dyn TextureSource<C>>> for UniformValue<C> {
    fn from(t: Rc<dyn TextureSource<C>>) -> Self {
        UniformValue::Texture(t)
    }
}
