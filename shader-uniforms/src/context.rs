use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The slice of a graphics API needed to build programs and feed them uniforms.
///
/// Everything is synchronous and assumes a single thread owns the context.
/// Uniform writes with a `None` location do nothing, the same way GL ignores
/// location `-1`.
pub trait GraphicsContext {
    type Program: Clone + fmt::Debug;
    type Shader: Clone + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_program(&mut self) -> Result<Self::Program, String>;
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&mut self, shader: &Self::Shader, source: &str);
    fn compile_shader(&mut self, shader: &Self::Shader);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;

    fn attach_shader(&mut self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&mut self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;

    /// Makes `program` the current program, replacing whichever was current.
    fn use_program(&mut self, program: &Self::Program);

    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn uniform_1i(&mut self, location: Option<&Self::UniformLocation>, value: i32);
    fn uniform_1f(&mut self, location: Option<&Self::UniformLocation>, value: f32);
    fn uniform_1fv(&mut self, location: Option<&Self::UniformLocation>, values: &[f32]);
    fn uniform_2fv(&mut self, location: Option<&Self::UniformLocation>, values: &[f32]);
    fn uniform_3fv(&mut self, location: Option<&Self::UniformLocation>, values: &[f32]);
    fn uniform_4fv(&mut self, location: Option<&Self::UniformLocation>, values: &[f32]);
    fn uniform_matrix_3fv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        transpose: bool,
        values: &[f32],
    );
    fn uniform_matrix_4fv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        transpose: bool,
        values: &[f32],
    );
}
