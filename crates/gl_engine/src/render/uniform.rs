//! GLSL type tags and typed uniform values

use std::fmt;

/// Declared type of an active uniform or attribute, as reported by the
/// driver's reflection tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    /// `float`
    Float,
    /// `vec2`
    Vec2,
    /// `vec3`
    Vec3,
    /// `vec4`
    Vec4,
    /// `int`
    Int,
    /// `ivec2`
    IVec2,
    /// `ivec3`
    IVec3,
    /// `ivec4`
    IVec4,
    /// `uint`
    UInt,
    /// `bool`
    Bool,
    /// `mat2`
    Mat2,
    /// `mat3`
    Mat3,
    /// `mat4`
    Mat4,
    /// `sampler2D`
    Sampler2D,
    /// `samplerCube`
    SamplerCube,
    /// Any type this layer does not set directly; carries the raw GL enum
    Other(u32),
}

impl GlslType {
    /// Map a raw GL type enum (`GL_FLOAT_VEC2`, ...) to a tag
    pub const fn from_gl(gl_type: u32) -> Self {
        match gl_type {
            glow::FLOAT => Self::Float,
            glow::FLOAT_VEC2 => Self::Vec2,
            glow::FLOAT_VEC3 => Self::Vec3,
            glow::FLOAT_VEC4 => Self::Vec4,
            glow::INT => Self::Int,
            glow::INT_VEC2 => Self::IVec2,
            glow::INT_VEC3 => Self::IVec3,
            glow::INT_VEC4 => Self::IVec4,
            glow::UNSIGNED_INT => Self::UInt,
            glow::BOOL => Self::Bool,
            glow::FLOAT_MAT2 => Self::Mat2,
            glow::FLOAT_MAT3 => Self::Mat3,
            glow::FLOAT_MAT4 => Self::Mat4,
            glow::SAMPLER_2D => Self::Sampler2D,
            glow::SAMPLER_CUBE => Self::SamplerCube,
            other => Self::Other(other),
        }
    }

    /// Raw GL type enum
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Float => glow::FLOAT,
            Self::Vec2 => glow::FLOAT_VEC2,
            Self::Vec3 => glow::FLOAT_VEC3,
            Self::Vec4 => glow::FLOAT_VEC4,
            Self::Int => glow::INT,
            Self::IVec2 => glow::INT_VEC2,
            Self::IVec3 => glow::INT_VEC3,
            Self::IVec4 => glow::INT_VEC4,
            Self::UInt => glow::UNSIGNED_INT,
            Self::Bool => glow::BOOL,
            Self::Mat2 => glow::FLOAT_MAT2,
            Self::Mat3 => glow::FLOAT_MAT3,
            Self::Mat4 => glow::FLOAT_MAT4,
            Self::Sampler2D => glow::SAMPLER_2D,
            Self::SamplerCube => glow::SAMPLER_CUBE,
            Self::Other(raw) => raw,
        }
    }

    /// Number of scalar components in one element of this type, if it is a
    /// plain float/int vector or matrix
    pub const fn component_count(self) -> Option<u32> {
        match self {
            Self::Float | Self::Int | Self::UInt | Self::Bool => Some(1),
            Self::Vec2 | Self::IVec2 => Some(2),
            Self::Vec3 | Self::IVec3 => Some(3),
            Self::Vec4 | Self::IVec4 | Self::Mat2 => Some(4),
            Self::Mat3 => Some(9),
            Self::Mat4 => Some(16),
            Self::Sampler2D | Self::SamplerCube | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Int => "int",
            Self::IVec2 => "ivec2",
            Self::IVec3 => "ivec3",
            Self::IVec4 => "ivec4",
            Self::UInt => "uint",
            Self::Bool => "bool",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Sampler2D => "sampler2D",
            Self::SamplerCube => "samplerCube",
            Self::Other(raw) => return write!(f, "gl type {raw:#06x}"),
        };
        f.write_str(name)
    }
}

/// A value that can be written to a uniform.
///
/// The variant decides which `glUniform*` entry point is used and which
/// declared type it must match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// One float
    Float(f32),
    /// Two floats
    Vec2([f32; 2]),
    /// Three floats
    Vec3([f32; 3]),
    /// Four floats
    Vec4([f32; 4]),
    /// One int; also used for `bool` and sampler units
    Int(i32),
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
}

impl UniformValue {
    /// The GLSL type this value is written as
    pub const fn glsl_type(&self) -> GlslType {
        match self {
            Self::Float(_) => GlslType::Float,
            Self::Vec2(_) => GlslType::Vec2,
            Self::Vec3(_) => GlslType::Vec3,
            Self::Vec4(_) => GlslType::Vec4,
            Self::Int(_) => GlslType::Int,
            Self::Mat4(_) => GlslType::Mat4,
        }
    }

    /// Whether a uniform declared as `declared` can be set from this value
    pub const fn is_compatible_with(&self, declared: GlslType) -> bool {
        match (self, declared) {
            (Self::Float(_), GlslType::Float)
            | (Self::Vec2(_), GlslType::Vec2)
            | (Self::Vec3(_), GlslType::Vec3)
            | (Self::Vec4(_), GlslType::Vec4)
            | (Self::Mat4(_), GlslType::Mat4)
            | (
                Self::Int(_),
                GlslType::Int | GlslType::Bool | GlslType::Sampler2D | GlslType::SamplerCube,
            ) => true,
            _ => false,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<(f32, f32)> for UniformValue {
    fn from((x, y): (f32, f32)) -> Self {
        Self::Vec2([x, y])
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        Self::Vec2(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vec3(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        Self::Vec4(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<[f32; 16]> for UniformValue {
    fn from(value: [f32; 16]) -> Self {
        Self::Mat4(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl_enum_round_trip_for_known_types() {
        for ty in [GlslType::Float, GlslType::Vec2, GlslType::Mat4, GlslType::Sampler2D] {
            assert_eq!(GlslType::from_gl(ty.gl_enum()), ty);
        }
    }

    #[test]
    fn test_unknown_gl_enum_is_preserved() {
        let ty = GlslType::from_gl(0x1234);
        assert_eq!(ty, GlslType::Other(0x1234));
        assert_eq!(ty.to_string(), "gl type 0x1234");
    }

    #[test]
    fn test_display_uses_glsl_names() {
        assert_eq!(GlslType::Vec2.to_string(), "vec2");
        assert_eq!(GlslType::Sampler2D.to_string(), "sampler2D");
    }

    #[test]
    fn test_float_does_not_match_vec2() {
        assert!(!UniformValue::Float(1.0).is_compatible_with(GlslType::Vec2));
        assert!(!UniformValue::Vec2([1.0, 0.0]).is_compatible_with(GlslType::Float));
        assert!(UniformValue::Vec2([1.0, 0.0]).is_compatible_with(GlslType::Vec2));
    }

    #[test]
    fn test_int_sets_samplers_and_bools() {
        assert!(UniformValue::Int(0).is_compatible_with(GlslType::Sampler2D));
        assert!(UniformValue::Int(1).is_compatible_with(GlslType::Bool));
        assert!(!UniformValue::Int(1).is_compatible_with(GlslType::Float));
    }

    #[test]
    fn test_tuple_converts_to_vec2() {
        assert_eq!(UniformValue::from((1280.0, 768.0)), UniformValue::Vec2([1280.0, 768.0]));
    }
}
