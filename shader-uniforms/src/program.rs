use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::{
    context::{GraphicsContext, ShaderStage},
    globals::Globals,
    uniform::{UniformError, UniformTable, UniformType},
    value::{Color, TextureSource, UniformValue},
    Policy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Unlinked,
    Linked,
    Failed,
}

/// A vertex and fragment shader pair plus the uniforms to feed them.
pub struct ShaderProgram<C: GraphicsContext> {
    vertex: String,
    fragment: String,
    uniforms: UniformTable<C>,
    policy: Policy,
    first_texture_unit: u32,
    texture_unit: u32,
    state: ProgramState,
}

impl<C: GraphicsContext> ShaderProgram<C> {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        ShaderProgramBuilder::new()
            .vertex(vertex)
            .fragment(fragment)
            .build()
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// The texture unit the next texture uniform will be bound to.
    pub fn texture_unit(&self) -> u32 {
        self.texture_unit
    }

    pub fn uniforms(&self) -> &UniformTable<C> {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut UniformTable<C> {
        &mut self.uniforms
    }

    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.uniforms.set(name, value, hint)
    }

    pub fn set_args(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.uniforms.set_args(name, values, hint)
    }

    pub fn set_float(&mut self, name: &str, x: f32) -> Result<(), UniformError> {
        self.uniforms.set_float(name, x)
    }

    pub fn set_vec2(&mut self, name: &str, v: Vec2) -> Result<(), UniformError> {
        self.uniforms.set_vec2(name, v)
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) -> Result<(), UniformError> {
        self.uniforms.set_vec3(name, v)
    }

    pub fn set_vec4(&mut self, name: &str, v: Vec4) -> Result<(), UniformError> {
        self.uniforms.set_vec4(name, v)
    }

    pub fn set_color(&mut self, name: &str, c: Color) -> Result<(), UniformError> {
        self.uniforms.set_color(name, c)
    }

    pub fn set_mat3(&mut self, name: &str, m: Mat3) -> Result<(), UniformError> {
        self.uniforms.set_mat3(name, m)
    }

    pub fn set_mat4(&mut self, name: &str, m: Mat4) -> Result<(), UniformError> {
        self.uniforms.set_mat4(name, m)
    }

    pub fn set_texture(
        &mut self,
        name: &str,
        source: impl TextureSource<C> + 'static,
    ) -> Result<(), UniformError> {
        self.uniforms.set_texture(name, source)
    }

    /// Builds a fresh program from the sources, makes it current and writes
    /// the global uniforms followed by this program's own.
    ///
    /// Nothing is reused between calls: every call creates, compiles and links
    /// new objects. Instance uniforms are written last, so they win over a
    /// global of the same name.
    pub fn compile(
        &mut self,
        ctx: &mut C,
        globals: &mut Globals<C>,
    ) -> Result<C::Program, ShaderError> {
        self.texture_unit = self.first_texture_unit;

        let program = match ctx.create_program() {
            Ok(program) => program,
            Err(e) => {
                self.state = ProgramState::Failed;
                return Err(ShaderError::Context(e));
            }
        };

        let stages = [
            (ShaderStage::Vertex, self.vertex.as_str()),
            (ShaderStage::Fragment, self.fragment.as_str()),
        ];
        let mut shaders = Vec::with_capacity(stages.len());
        for (stage, source) in stages {
            match compile_shader(ctx, stage, source) {
                Ok(shader) => shaders.push(shader),
                Err(e) => {
                    self.state = ProgramState::Failed;
                    return Err(e);
                }
            }
        }
        for shader in &shaders {
            ctx.attach_shader(&program, shader);
        }

        ctx.link_program(&program);
        if !ctx.program_link_status(&program) {
            let log = ctx.program_info_log(&program);
            log::error!("error linking shader program: {}", log);
            if self.policy == Policy::Strict {
                self.state = ProgramState::Failed;
                return Err(ShaderError::Link { log });
            }
        }

        self.state = ProgramState::Linked;
        ctx.use_program(&program);
        log::debug!("using program {:?}", program);

        apply_uniforms(ctx, &program, globals.table_mut(), &mut self.texture_unit);
        apply_uniforms(ctx, &program, &mut self.uniforms, &mut self.texture_unit);

        Ok(program)
    }
}

fn compile_shader<C: GraphicsContext>(
    ctx: &mut C,
    stage: ShaderStage,
    source: &str,
) -> Result<C::Shader, ShaderError> {
    let shader = ctx.create_shader(stage).map_err(ShaderError::Context)?;
    ctx.shader_source(&shader, source);
    ctx.compile_shader(&shader);
    if !ctx.shader_compile_status(&shader) {
        let log = ctx.shader_info_log(&shader);
        log::error!("error compiling {} shader: {}", stage, log);
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Writes every entry of `table` to `program`, which must be current.
///
/// Locations are looked up again on every call. Each texture uniform takes
/// the unit in `texture_unit` and advances it.
pub fn apply_uniforms<C: GraphicsContext>(
    ctx: &mut C,
    program: &C::Program,
    table: &mut UniformTable<C>,
    texture_unit: &mut u32,
) {
    for (name, entry) in table.iter_mut() {
        let location = ctx.uniform_location(program, name);
        if location.is_none() {
            log::trace!("program has no active uniform `{}`", name);
        }
        let loc = location.as_ref();

        match entry.ty {
            UniformType::Texture => match &entry.value {
                UniformValue::Texture(source) => {
                    let unit = *texture_unit;
                    match (i32::try_from(unit), unit.checked_add(1)) {
                        (Ok(slot), Some(next)) => {
                            source.bind(ctx, unit);
                            ctx.uniform_1i(loc, slot);
                            *texture_unit = next;
                        }
                        _ => log::warn!("no texture unit {} for uniform `{}`", unit, name),
                    }
                }
                other => log::warn!("uniform `{}` is a texture but holds {:?}", name, other),
            },
            UniformType::Matrix3 => match entry.value.mat3() {
                Some(m) => ctx.uniform_matrix_3fv(loc, false, &m),
                None => log::warn!("uniform `{}` is a mat3 but holds {:?}", name, entry.value),
            },
            UniformType::Matrix4 => match entry.value.mat4() {
                Some(m) => ctx.uniform_matrix_4fv(loc, false, &m),
                None => log::warn!("uniform `{}` is a mat4 but holds {:?}", name, entry.value),
            },
            ty => write_floats(ctx, loc, name, ty, &entry.value),
        }

        entry.location = location;
    }
}

fn write_floats<C: GraphicsContext>(
    ctx: &mut C,
    loc: Option<&C::UniformLocation>,
    name: &str,
    ty: UniformType,
    value: &UniformValue<C>,
) {
    if let (UniformType::Float1, UniformValue::Float(x)) = (ty, value) {
        ctx.uniform_1f(loc, *x);
        return;
    }

    let data = match value.floats() {
        Some(data) => data,
        None => {
            log::warn!("uniform `{}` is a {} but holds {:?}", name, ty, value);
            return;
        }
    };
    let n = ty.components().unwrap_or(1);
    if data.is_empty() || data.len() % n != 0 {
        log::warn!(
            "uniform `{}` is a {} but holds {} floats",
            name,
            ty,
            data.len()
        );
        return;
    }

    match n {
        1 => ctx.uniform_1fv(loc, &data),
        2 => ctx.uniform_2fv(loc, &data),
        3 => ctx.uniform_3fv(loc, &data),
        _ => ctx.uniform_4fv(loc, &data),
    }
}

pub struct ShaderProgramBuilder {
    vertex: String,
    fragment: String,
    policy: Policy,
    first_texture_unit: u32,
}

impl ShaderProgramBuilder {
    /// Creates a new [`ShaderProgramBuilder`].
    ///
    /// This is the same as calling `ShaderProgramBuilder::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertex<T: Into<String>>(self, source: T) -> Self {
        Self {
            vertex: source.into(),
            ..self
        }
    }

    #[must_use]
    pub fn fragment<T: Into<String>>(self, source: T) -> Self {
        Self {
            fragment: source.into(),
            ..self
        }
    }

    #[must_use]
    pub fn policy(self, policy: Policy) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn first_texture_unit(self, first_texture_unit: u32) -> Self {
        Self {
            first_texture_unit,
            ..self
        }
    }

    /// Consumes the builder and produces an unlinked [`ShaderProgram`].
    pub fn build<C: GraphicsContext>(self) -> ShaderProgram<C> {
        let Self {
            vertex,
            fragment,
            policy,
            first_texture_unit,
        } = self;

        ShaderProgram {
            vertex,
            fragment,
            uniforms: UniformTable::with_policy(policy),
            policy,
            first_texture_unit,
            texture_unit: first_texture_unit,
            state: ProgramState::Unlinked,
        }
    }
}

impl Default for ShaderProgramBuilder {
    fn default() -> Self {
        Self {
            vertex: String::new(),
            fragment: String::new(),
            policy: Policy::Legacy,
            first_texture_unit: 0,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ShaderError {
    #[error("graphics context failed: {0}")]
    Context(String),
    #[error("error compiling {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("error linking shader program: {log}")]
    Link { log: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Recorder, Surface, Write, FRAGMENT, VERTEX};
    use glam::{Mat3, Mat4, Vec3};

    fn program() -> ShaderProgram<Recorder> {
        ShaderProgram::new(VERTEX, FRAGMENT)
    }

    #[test]
    fn compile_and_apply() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        p.set("u_time", 2.0f32, None).unwrap();
        p.set("u_light", Vec3::new(0.0, 1.0, 0.0), None).unwrap();
        p.set("u_normal", Mat3::IDENTITY, None).unwrap();
        p.set("u_mvp", Mat4::IDENTITY, None).unwrap();

        assert_eq!(p.state(), ProgramState::Unlinked);
        let handle = p.compile(&mut ctx, &mut globals).unwrap();
        assert_eq!(p.state(), ProgramState::Linked);
        assert_eq!(ctx.current, Some(handle));

        assert_eq!(ctx.value("u_time"), Some(&Write::Float(2.0)));
        assert_eq!(
            ctx.value("u_light"),
            Some(&Write::Floats(3, vec![0.0, 1.0, 0.0]))
        );
        assert_eq!(
            ctx.value("u_normal"),
            Some(&Write::Matrix(3, Mat3::IDENTITY.to_cols_array().to_vec()))
        );
        assert_eq!(
            ctx.value("u_mvp"),
            Some(&Write::Matrix(4, Mat4::IDENTITY.to_cols_array().to_vec()))
        );
        assert!(p.uniforms().get("u_time").unwrap().location().is_some());
    }

    #[test]
    fn typed_setters() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        p.set_vec3("u_light", Vec3::X).unwrap();
        p.set_vec4("u_tint", glam::Vec4::ONE).unwrap();
        p.set_mat3("u_normal", Mat3::IDENTITY).unwrap();
        p.set_mat4("u_mvp", Mat4::IDENTITY).unwrap();
        p.set_vec2("u_unused", glam::Vec2::ZERO).unwrap();

        assert_eq!(p.uniforms().get("u_light").unwrap().ty(), UniformType::FloatVec3);
        assert_eq!(p.uniforms().get("u_tint").unwrap().ty(), UniformType::FloatVec4);
        assert_eq!(p.uniforms().get("u_normal").unwrap().ty(), UniformType::Matrix3);
        assert_eq!(p.uniforms().get("u_mvp").unwrap().ty(), UniformType::Matrix4);
        assert_eq!(p.uniforms().get("u_unused").unwrap().ty(), UniformType::FloatVec2);

        p.compile(&mut ctx, &mut globals).unwrap();
        assert_eq!(
            ctx.value("u_light"),
            Some(&Write::Floats(3, vec![1.0, 0.0, 0.0]))
        );
        assert_eq!(
            ctx.value("u_tint"),
            Some(&Write::Floats(4, vec![1.0; 4]))
        );
        assert_eq!(ctx.writes_to("u_unused"), 0);
    }

    #[test]
    fn instance_overrides_global() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        globals.set_global("u_tint", Color::BLACK, None).unwrap();

        let mut p = program();
        p.set("u_tint", Color::WHITE, None).unwrap();
        p.compile(&mut ctx, &mut globals).unwrap();

        assert_eq!(ctx.writes_to("u_tint"), 2);
        assert_eq!(
            ctx.value("u_tint"),
            Some(&Write::Floats(4, Color::WHITE.array().to_vec()))
        );
    }

    #[test]
    fn globals_apply_without_instance_value() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        globals.set_global("u_time", 9.0f32, None).unwrap();

        program().compile(&mut ctx, &mut globals).unwrap();
        assert_eq!(ctx.value("u_time"), Some(&Write::Float(9.0)));
    }

    #[test]
    fn texture_units_are_consecutive() {
        let mut ctx = Recorder::default();
        let program = ctx.create_program().unwrap();
        let mut table = UniformTable::<Recorder>::new();
        table.set_texture("a", Surface::image("a")).unwrap();
        table.set_texture("b", Surface::graphics("b")).unwrap();

        let mut unit = 3;
        apply_uniforms(&mut ctx, &program, &mut table, &mut unit);
        assert_eq!(unit, 5);
        assert_eq!(ctx.bound, vec![(3, "a".to_owned()), (4, "b".to_owned())]);
    }

    #[test]
    fn globals_take_texture_units_first() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        globals
            .set_global("u_noise", UniformValue::texture(Surface::image("noise")), None)
            .unwrap();

        let mut p: ShaderProgram<Recorder> = ShaderProgramBuilder::new()
            .vertex(VERTEX)
            .fragment(FRAGMENT)
            .first_texture_unit(1)
            .build();
        p.set_texture("u_image", Surface::media("video")).unwrap();

        p.compile(&mut ctx, &mut globals).unwrap();
        assert_eq!(
            ctx.bound,
            vec![(1, "noise".to_owned()), (2, "video".to_owned())]
        );
        assert_eq!(ctx.value("u_noise"), Some(&Write::Int(1)));
        assert_eq!(ctx.value("u_image"), Some(&Write::Int(2)));
        assert_eq!(p.texture_unit(), 3);

        // the counter starts over with every activation
        ctx.bound.clear();
        p.compile(&mut ctx, &mut globals).unwrap();
        assert_eq!(
            ctx.bound,
            vec![(1, "noise".to_owned()), (2, "video".to_owned())]
        );
    }

    #[test]
    fn out_of_range_texture_unit_is_skipped() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();

        let mut p: ShaderProgram<Recorder> = ShaderProgramBuilder::new()
            .vertex(VERTEX)
            .fragment(FRAGMENT)
            .first_texture_unit(u32::MAX)
            .build();
        p.set_texture("u_image", Surface::image("brick")).unwrap();
        p.set_float("u_time", 1.0).unwrap();

        p.compile(&mut ctx, &mut globals).unwrap();
        assert!(ctx.bound.is_empty());
        assert_eq!(ctx.writes_to("u_image"), 0);
        assert_eq!(ctx.value("u_time"), Some(&Write::Float(1.0)));
        assert_eq!(p.texture_unit(), u32::MAX);

        // past the largest unit a sampler can name
        let mut p: ShaderProgram<Recorder> = ShaderProgramBuilder::new()
            .vertex(VERTEX)
            .fragment(FRAGMENT)
            .first_texture_unit(i32::MAX as u32 + 1)
            .build();
        p.set_texture("u_image", Surface::image("brick")).unwrap();
        p.compile(&mut ctx, &mut globals).unwrap();
        assert!(ctx.bound.is_empty());
        assert_eq!(ctx.writes_to("u_image"), 0);
    }

    #[test]
    fn compile_failure_applies_nothing() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        globals.set_global("u_time", 1.0f32, None).unwrap();

        let mut p: ShaderProgram<Recorder> =
            ShaderProgram::new(VERTEX, "void main() { gl_FragColor = ");
        p.set_float("u_time", 2.0).unwrap();

        let err = p.compile(&mut ctx, &mut globals).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert_eq!(p.state(), ProgramState::Failed);
        assert!(ctx.writes.is_empty());
        assert!(ctx.current.is_none());
    }

    #[test]
    fn link_failure_is_ignored_by_default() {
        let mut ctx = Recorder {
            fail_link: true,
            ..Default::default()
        };
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        p.set_float("u_time", 2.0).unwrap();

        assert!(p.compile(&mut ctx, &mut globals).is_ok());
        assert_eq!(p.state(), ProgramState::Linked);
        assert_eq!(ctx.value("u_time"), Some(&Write::Float(2.0)));
    }

    #[test]
    fn link_failure_aborts_when_strict() {
        let mut ctx = Recorder {
            fail_link: true,
            ..Default::default()
        };
        let mut globals = Globals::<Recorder>::new();
        let mut p: ShaderProgram<Recorder> = ShaderProgramBuilder::new()
            .vertex(VERTEX)
            .fragment(FRAGMENT)
            .policy(Policy::Strict)
            .build();
        p.set_float("u_time", 2.0).unwrap();

        let err = p.compile(&mut ctx, &mut globals).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert_eq!(p.state(), ProgramState::Failed);
        assert!(ctx.writes.is_empty());
    }

    #[test]
    fn every_compile_builds_a_new_program() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        let a = p.compile(&mut ctx, &mut globals).unwrap();
        let b = p.compile(&mut ctx, &mut globals).unwrap();
        assert_ne!(a, b);
        assert_eq!(ctx.compiled, 4);
    }

    #[test]
    fn sticky_mismatch_is_skipped() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        p.set("u_image", UniformValue::texture(Surface::image("a")), None)
            .unwrap();
        p.set("u_image", 1.0f32, None).unwrap();
        p.set("u_light", Vec3::ONE, None).unwrap();
        p.set("u_light", [1.0f32, 2.0], None).unwrap();

        p.compile(&mut ctx, &mut globals).unwrap();
        assert!(ctx.bound.is_empty());
        assert_eq!(ctx.writes_to("u_image"), 0);
        assert_eq!(ctx.writes_to("u_light"), 0);
    }

    #[test]
    fn inactive_uniforms_resolve_no_location() {
        let mut ctx = Recorder::default();
        let mut globals = Globals::<Recorder>::new();
        let mut p = program();
        p.set_float("u_unused", 1.0).unwrap();

        p.compile(&mut ctx, &mut globals).unwrap();
        assert!(ctx.writes.is_empty());
        assert!(p.uniforms().get("u_unused").unwrap().location().is_none());
    }
}
