//! A fake graphics context that records what it is asked to do.

use std::collections::HashMap;

use crate::{
    context::{GraphicsContext, ShaderStage},
    value::{TextureKind, TextureSource},
};

pub const VERTEX: &str = "\
uniform mat4 u_mvp;
uniform mat3 u_normal;
attribute vec3 a_position;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
";

pub const FRAGMENT: &str = "\
precision mediump float;
uniform float u_time;
uniform vec3 u_light;
uniform vec4 u_tint;
uniform sampler2D u_noise;
uniform sampler2D u_image;
void main() {
    gl_FragColor = u_tint;
}
";

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Int(i32),
    Float(f32),
    Floats(usize, Vec<f32>),
    Matrix(usize, Vec<f32>),
}

/// Shaders compile when they have a `main` and balanced braces. Uniform
/// locations exist for names declared in an attached shader.
#[derive(Default)]
pub struct Recorder {
    pub next_id: u32,
    pub sources: HashMap<u32, String>,
    pub status: HashMap<u32, bool>,
    pub attached: HashMap<u32, Vec<u32>>,
    pub fail_link: bool,
    pub compiled: usize,
    pub current: Option<u32>,
    pub writes: Vec<(String, Write)>,
    pub bound: Vec<(u32, String)>,
}

impl Recorder {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, location: Option<&String>, write: Write) {
        if let Some(name) = location {
            self.writes.push((name.clone(), write));
        }
    }

    /// The last value written to `name`.
    pub fn value(&self, name: &str) -> Option<&Write> {
        self.writes
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w)
    }

    pub fn writes_to(&self, name: &str) -> usize {
        self.writes.iter().filter(|(n, _)| n == name).count()
    }
}

impl GraphicsContext for Recorder {
    type Program = u32;
    type Shader = u32;
    type UniformLocation = String;

    fn create_program(&mut self) -> Result<u32, String> {
        let id = self.id();
        self.attached.insert(id, Vec::new());
        Ok(id)
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Result<u32, String> {
        Ok(self.id())
    }

    fn shader_source(&mut self, shader: &u32, source: &str) {
        self.sources.insert(*shader, source.to_owned());
    }

    fn compile_shader(&mut self, shader: &u32) {
        self.compiled += 1;
        let source = self.sources.get(shader).map(String::as_str).unwrap_or("");
        let opened = source.matches('{').count();
        let closed = source.matches('}').count();
        let ok = source.contains("void main()") && opened == closed;
        self.status.insert(*shader, ok);
    }

    fn shader_compile_status(&self, shader: &u32) -> bool {
        self.status.get(shader).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &u32) -> String {
        format!("ERROR: 0:1: shader {} has a syntax error", shader)
    }

    fn attach_shader(&mut self, program: &u32, shader: &u32) {
        self.attached.entry(*program).or_default().push(*shader);
    }

    fn link_program(&mut self, _program: &u32) {}

    fn program_link_status(&self, _program: &u32) -> bool {
        !self.fail_link
    }

    fn program_info_log(&self, _program: &u32) -> String {
        "ERROR: one or more attached shaders not successfully compiled".to_owned()
    }

    fn use_program(&mut self, program: &u32) {
        self.current = Some(*program);
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<String> {
        let declaration = format!(" {};", name);
        let shaders = self.attached.get(program)?;
        shaders
            .iter()
            .filter_map(|s| self.sources.get(s))
            .any(|source| source.contains(&declaration))
            .then(|| name.to_owned())
    }

    fn uniform_1i(&mut self, location: Option<&String>, value: i32) {
        self.record(location, Write::Int(value));
    }

    fn uniform_1f(&mut self, location: Option<&String>, value: f32) {
        self.record(location, Write::Float(value));
    }

    fn uniform_1fv(&mut self, location: Option<&String>, values: &[f32]) {
        self.record(location, Write::Floats(1, values.to_vec()));
    }

    fn uniform_2fv(&mut self, location: Option<&String>, values: &[f32]) {
        self.record(location, Write::Floats(2, values.to_vec()));
    }

    fn uniform_3fv(&mut self, location: Option<&String>, values: &[f32]) {
        self.record(location, Write::Floats(3, values.to_vec()));
    }

    fn uniform_4fv(&mut self, location: Option<&String>, values: &[f32]) {
        self.record(location, Write::Floats(4, values.to_vec()));
    }

    fn uniform_matrix_3fv(&mut self, location: Option<&String>, transpose: bool, values: &[f32]) {
        assert!(!transpose);
        self.record(location, Write::Matrix(3, values.to_vec()));
    }

    fn uniform_matrix_4fv(&mut self, location: Option<&String>, transpose: bool, values: &[f32]) {
        assert!(!transpose);
        self.record(location, Write::Matrix(4, values.to_vec()));
    }
}

#[derive(Debug)]
pub struct Surface {
    kind: TextureKind,
    label: String,
}

impl Surface {
    pub fn graphics(label: &str) -> Self {
        Self::new(TextureKind::Graphics, label)
    }

    pub fn image(label: &str) -> Self {
        Self::new(TextureKind::Image, label)
    }

    pub fn media(label: &str) -> Self {
        Self::new(TextureKind::Media, label)
    }

    fn new(kind: TextureKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_owned(),
        }
    }
}

impl TextureSource<Recorder> for Surface {
    fn kind(&self) -> TextureKind {
        self.kind
    }

    fn bind(&self, ctx: &mut Recorder, unit: u32) {
        ctx.bound.push((unit, self.label.clone()));
    }
}
