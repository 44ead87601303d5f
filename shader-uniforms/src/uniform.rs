use std::{collections::BTreeMap, fmt, str::FromStr};

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::{
    context::GraphicsContext,
    value::{Color, TextureSource, UniformValue},
    Policy,
};

/// The uniform call a stored value is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float1,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Matrix3,
    Matrix4,
    Texture,
}

impl UniformType {
    /// The float vector type with `len` components.
    pub fn vector(len: usize) -> Option<Self> {
        match len {
            1 => Some(UniformType::Float1),
            2 => Some(UniformType::FloatVec2),
            3 => Some(UniformType::FloatVec3),
            4 => Some(UniformType::FloatVec4),
            _ => None,
        }
    }

    /// Number of floats per element for the float vector types.
    pub fn components(self) -> Option<usize> {
        match self {
            UniformType::Float1 => Some(1),
            UniformType::FloatVec2 => Some(2),
            UniformType::FloatVec3 => Some(3),
            UniformType::FloatVec4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniformType::Float1 => "float",
            UniformType::FloatVec2 => "vec2",
            UniformType::FloatVec3 => "vec3",
            UniformType::FloatVec4 => "vec4",
            UniformType::Matrix3 => "mat3",
            UniformType::Matrix4 => "mat4",
            UniformType::Texture => "sampler2D",
        };
        f.write_str(name)
    }
}

impl FromStr for UniformType {
    type Err = UniformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "1f" | "1fv" | "float" => UniformType::Float1,
            "2fv" | "vec2" => UniformType::FloatVec2,
            "3fv" | "vec3" => UniformType::FloatVec3,
            "4fv" | "vec4" => UniformType::FloatVec4,
            "Matrix3fv" | "mat3" => UniformType::Matrix3,
            "Matrix4fv" | "mat4" => UniformType::Matrix4,
            "texture" | "sampler2D" => UniformType::Texture,
            _ => return Err(UniformError::UnknownHint(s.to_owned())),
        };
        Ok(ty)
    }
}

pub struct UniformEntry<C: GraphicsContext> {
    pub(crate) ty: UniformType,
    pub(crate) value: UniformValue<C>,
    pub(crate) location: Option<C::UniformLocation>,
}

impl<C: GraphicsContext> UniformEntry<C> {
    pub fn ty(&self) -> UniformType {
        self.ty
    }

    pub fn value(&self) -> &UniformValue<C> {
        &self.value
    }

    /// Location resolved by the last apply, if the program had the uniform.
    pub fn location(&self) -> Option<&C::UniformLocation> {
        self.location.as_ref()
    }
}

impl<C: GraphicsContext> fmt::Debug for UniformEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformEntry")
            .field("ty", &self.ty)
            .field("value", &self.value)
            .field("location", &self.location)
            .finish()
    }
}

/// Named uniform values waiting to be written to a program.
pub struct UniformTable<C: GraphicsContext> {
    entries: BTreeMap<String, UniformEntry<C>>,
    policy: Policy,
}

impl<C: GraphicsContext> UniformTable<C> {
    pub fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self {
            entries: BTreeMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Stores `value` under `name`.
    ///
    /// The type is deduced from the value the first time a name is set, unless
    /// `hint` names it. Under [`Policy::Legacy`] a later `set` only replaces the
    /// value and keeps the first type (a hint still replaces it).
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        let value = value.into();

        if self.policy == Policy::Legacy {
            if let Some(entry) = self.entries.get_mut(name) {
                log::trace!("updating uniform `{}`", name);
                if let Some(ty) = hint {
                    entry.ty = ty;
                }
                entry.value = value;
                return Ok(());
            }
        }

        let ty = match hint.or_else(|| value.infer()) {
            Some(ty) => ty,
            None => {
                log::error!("didn't recognize the type of uniform `{}`: {:?}", name, value);
                return Err(UniformError::UnrecognizedType {
                    name: name.to_owned(),
                });
            }
        };

        log::trace!("setting uniform `{}` as {}", name, ty);
        self.entries.insert(
            name.to_owned(),
            UniformEntry {
                ty,
                value,
                location: None,
            },
        );
        Ok(())
    }

    /// Variadic form of [`set`](Self::set): the values are bundled by
    /// [`UniformValue::collect`] before the type is deduced.
    pub fn set_args(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.set(name, UniformValue::collect(values), hint)
    }

    pub fn set_float(&mut self, name: &str, x: f32) -> Result<(), UniformError> {
        self.set(name, x, Some(UniformType::Float1))
    }

    pub fn set_vec2(&mut self, name: &str, v: Vec2) -> Result<(), UniformError> {
        self.set(name, v, Some(UniformType::FloatVec2))
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) -> Result<(), UniformError> {
        self.set(name, v, Some(UniformType::FloatVec3))
    }

    pub fn set_vec4(&mut self, name: &str, v: Vec4) -> Result<(), UniformError> {
        self.set(name, v, Some(UniformType::FloatVec4))
    }

    pub fn set_color(&mut self, name: &str, c: Color) -> Result<(), UniformError> {
        self.set(name, c, Some(UniformType::FloatVec4))
    }

    pub fn set_mat3(&mut self, name: &str, m: Mat3) -> Result<(), UniformError> {
        self.set(name, m, Some(UniformType::Matrix3))
    }

    pub fn set_mat4(&mut self, name: &str, m: Mat4) -> Result<(), UniformError> {
        self.set(name, m, Some(UniformType::Matrix4))
    }

    pub fn set_texture(
        &mut self,
        name: &str,
        source: impl TextureSource<C> + 'static,
    ) -> Result<(), UniformError> {
        self.set(name, UniformValue::texture(source), Some(UniformType::Texture))
    }

    pub fn get(&self, name: &str) -> Option<&UniformEntry<C>> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&UniformValue<C>> {
        self.get(name).map(UniformEntry::value)
    }

    pub fn remove(&mut self, name: &str) -> Option<UniformValue<C>> {
        self.entries.remove(name).map(|e| e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformEntry<C>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut UniformEntry<C>)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<C: GraphicsContext> Default for UniformTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GraphicsContext> fmt::Debug for UniformTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum UniformError {
    #[error("didn't recognize the type of uniform `{name}`")]
    UnrecognizedType { name: String },
    #[error("unknown uniform type hint `{0}`")]
    UnknownHint(String),
}
