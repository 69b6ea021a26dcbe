use super::{ValueAccessor, ensure_model_for, lookup};
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, TableModel};
use crate::value::Value;
use std::sync::Arc;

/// Accessor backed by the entity's generated `get_field`/`set_field`.
#[derive(Debug, Clone)]
pub struct ReflectiveAccessor {
    model: Arc<TableModel>,
}

impl ReflectiveAccessor {
    pub fn new<T: Entity>(model: Arc<TableModel>) -> OrmResult<Self> {
        ensure_model_for::<T>(&model)?;
        Ok(Self { model })
    }
}

impl<T: Entity> ValueAccessor<T> for ReflectiveAccessor {
    fn model(&self) -> &Arc<TableModel> {
        &self.model
    }

    fn field(&self, entity: &T, name: &str) -> OrmResult<Value> {
        let field = lookup(&self.model, name)?;
        entity
            .get_field(field.field_name)
            .ok_or_else(|| OrmError::unknown_field(name))
    }

    fn set_field(&self, entity: &mut T, name: &str, value: Value) -> OrmResult<()> {
        let field = lookup(&self.model, name)?;
        entity.set_field(field.field_name, value)
    }
}
