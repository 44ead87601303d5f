use crate::{
    context::GraphicsContext,
    uniform::{UniformError, UniformTable, UniformType},
    value::UniformValue,
    Policy,
};

/// Uniforms shared by every program compiled in a session.
///
/// They are written before each program's own uniforms, so a program can
/// override any of them by setting the same name.
pub struct Globals<C: GraphicsContext> {
    table: UniformTable<C>,
}

impl<C: GraphicsContext> Globals<C> {
    pub fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self {
            table: UniformTable::with_policy(policy),
        }
    }

    pub fn set_global(
        &mut self,
        name: &str,
        value: impl Into<UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.table.set(name, value, hint)
    }

    pub fn set_global_args(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = UniformValue<C>>,
        hint: Option<UniformType>,
    ) -> Result<(), UniformError> {
        self.table.set_args(name, values, hint)
    }

    pub fn get_global(&self, name: &str) -> Option<&UniformValue<C>> {
        self.table.value(name)
    }

    pub fn table(&self) -> &UniformTable<C> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut UniformTable<C> {
        &mut self.table
    }
}

impl<C: GraphicsContext> Default for Globals<C> {
    fn default() -> Self {
        Self::new()
    }
}
