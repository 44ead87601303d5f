//! OpenGL / WebGL through `glow`.

use glow::HasContext;

use crate::{
    context::{GraphicsContext, ShaderStage},
    value::{TextureKind, TextureSource},
};

type Program = <glow::Context as HasContext>::Program;
type Shader = <glow::Context as HasContext>::Shader;
type Location = <glow::Context as HasContext>::UniformLocation;
type Texture = <glow::Context as HasContext>::Texture;

// SAFETY (every block below): `glow::Context` wraps a loaded, current GL
// context, and the handles passed in were created by that same context.
impl GraphicsContext for glow::Context {
    type Program = Program;
    type Shader = Shader;
    type UniformLocation = Location;

    fn create_program(&mut self) -> Result<Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { HasContext::create_shader(self, kind) }
    }

    fn shader_source(&mut self, shader: &Shader, source: &str) {
        unsafe { HasContext::shader_source(self, *shader, source) }
    }

    fn compile_shader(&mut self, shader: &Shader) {
        unsafe { HasContext::compile_shader(self, *shader) }
    }

    fn shader_compile_status(&self, shader: &Shader) -> bool {
        unsafe { self.get_shader_compile_status(*shader) }
    }

    fn shader_info_log(&self, shader: &Shader) -> String {
        unsafe { self.get_shader_info_log(*shader) }
    }

    fn attach_shader(&mut self, program: &Program, shader: &Shader) {
        unsafe { HasContext::attach_shader(self, *program, *shader) }
    }

    fn link_program(&mut self, program: &Program) {
        unsafe { HasContext::link_program(self, *program) }
    }

    fn program_link_status(&self, program: &Program) -> bool {
        unsafe { self.get_program_link_status(*program) }
    }

    fn program_info_log(&self, program: &Program) -> String {
        unsafe { self.get_program_info_log(*program) }
    }

    fn use_program(&mut self, program: &Program) {
        unsafe { HasContext::use_program(self, Some(*program)) }
    }

    fn uniform_location(&self, program: &Program, name: &str) -> Option<Location> {
        unsafe { self.get_uniform_location(*program, name) }
    }

    fn uniform_1i(&mut self, location: Option<&Location>, value: i32) {
        unsafe { self.uniform_1_i32(location, value) }
    }

    fn uniform_1f(&mut self, location: Option<&Location>, value: f32) {
        unsafe { self.uniform_1_f32(location, value) }
    }

    fn uniform_1fv(&mut self, location: Option<&Location>, values: &[f32]) {
        unsafe { self.uniform_1_f32_slice(location, values) }
    }

    fn uniform_2fv(&mut self, location: Option<&Location>, values: &[f32]) {
        unsafe { self.uniform_2_f32_slice(location, values) }
    }

    fn uniform_3fv(&mut self, location: Option<&Location>, values: &[f32]) {
        unsafe { self.uniform_3_f32_slice(location, values) }
    }

    fn uniform_4fv(&mut self, location: Option<&Location>, values: &[f32]) {
        unsafe { self.uniform_4_f32_slice(location, values) }
    }

    fn uniform_matrix_3fv(&mut self, location: Option<&Location>, transpose: bool, values: &[f32]) {
        unsafe { self.uniform_matrix_3_f32_slice(location, transpose, values) }
    }

    fn uniform_matrix_4fv(&mut self, location: Option<&Location>, transpose: bool, values: &[f32]) {
        unsafe { self.uniform_matrix_4_f32_slice(location, transpose, values) }
    }
}

/// A 2D GL texture usable as a uniform value.
#[derive(Debug, Clone, Copy)]
pub struct GlTexture {
    kind: TextureKind,
    texture: Texture,
}

impl GlTexture {
    pub fn new(kind: TextureKind, texture: Texture) -> Self {
        Self { kind, texture }
    }

    pub fn raw(&self) -> Texture {
        self.texture
    }
}

impl TextureSource<glow::Context> for GlTexture {
    fn kind(&self) -> TextureKind {
        self.kind
    }

    fn bind(&self, gl: &mut glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }
}
