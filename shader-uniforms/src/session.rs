use crate::{
    context::GraphicsContext,
    globals::Globals,
    program::{ShaderError, ShaderProgram},
    uniform::{UniformError, UniformType},
    value::UniformValue,
    Policy,
};

/// A graphics context together with the global uniforms used with it.
pub struct Session<C: GraphicsContext> {
    ctx: C,
    globals: Globals<C>,
}

impl<C: GraphicsContext> Session<C> {
    pub fn new(ctx: C) -> Self {
        Self::with_policy(ctx, Policy::default())
    }

    /// `policy` governs the global table only; each program keeps its own.
    pub fn with_policy(ctx: C, policy: Policy) -> Self {
        Self {
            ctx,
            globals: Globals::with_policy(policy),
        }
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn globals(&self) -> &Globals<C> {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Globals<C> {
        &mut self.globals
    }

    pub fn set_global(
        &mut self,
        name: &str,
        value: impl Into<UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.globals.set_global(name, value, hint)
    }

    pub fn get_global(&self, name: &str) -> Option<&UniformValue<C>> {
        self.globals.get_global(name)
    }

    /// Compiles `program` against this session's context and globals.
    pub fn compile(&mut self, program: &mut ShaderProgram<C>) -> Result<C::Program, ShaderError> {
        program.compile(&mut self.ctx, &mut self.globals)
    }

    pub fn into_context(self) -> C {
        self.ctx
    }
}
