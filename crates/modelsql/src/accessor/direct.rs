use super::{ValueAccessor, ensure_model_for, lookup};
use crate::error::OrmResult;
use crate::model::{Entity, FieldModel, TableModel, check_field_layout};
use crate::value::{FieldType, FromValue, ScalarKind, ToValue, Value, for_each_scalar};
use std::alloc::Layout;
use std::marker::PhantomData;
use std::sync::Arc;

/// Accessor that reads and writes fields in place through their recorded byte offsets.
///
/// Construction checks that the model belongs to `T` and that every recorded offset fits
/// `T`'s layout, which makes the pointer casts below sound under the [`Entity`] contract.
#[derive(Debug)]
pub struct DirectAccessor<T> {
    model: Arc<TableModel>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Entity> DirectAccessor<T> {
    pub fn new(model: Arc<TableModel>) -> OrmResult<Self> {
        ensure_model_for::<T>(&model)?;
        let layout = Layout::new::<T>();
        for field in model.fields() {
            check_field_layout(
                model.type_name(),
                field.field_name,
                field.ty,
                field.offset,
                layout,
            )?;
        }
        Ok(Self {
            model,
            _marker: PhantomData,
        })
    }
}

impl<T: Entity> ValueAccessor<T> for DirectAccessor<T> {
    fn model(&self) -> &Arc<TableModel> {
        &self.model
    }

    fn field(&self, entity: &T, name: &str) -> OrmResult<Value> {
        let field = lookup(&self.model, name)?;
        let base = (entity as *const T).cast::<u8>();
        // SAFETY: offset and type were validated against `T` in `new`.
        Ok(unsafe { read_value(base.add(field.offset), field.ty) })
    }

    fn set_field(&self, entity: &mut T, name: &str, value: Value) -> OrmResult<()> {
        let field = lookup(&self.model, name)?;
        let base = (entity as *mut T).cast::<u8>();
        // SAFETY: as above; `entity` is borrowed mutably for the duration of the write.
        unsafe { write_value(base.add(field.offset), field, value) }
    }
}

/// # Safety
///
/// `ptr` must point to an initialized value of the Rust type described by `ty`.
unsafe fn read_value(ptr: *const u8, ty: FieldType) -> Value {
    let key = (ty.kind, ty.nullable);
    macro_rules! read {
        ($($kind:ident => $ty:ty),* $(,)?) => {
            match key {
                $(
                    (ScalarKind::$kind, false) => unsafe { (*ptr.cast::<$ty>()).to_value() },
                    (ScalarKind::$kind, true) => unsafe { (*ptr.cast::<Option<$ty>>()).to_value() },
                )*
            }
        };
    }
    for_each_scalar!(read)
}

/// Convert `value` to the field's type and overwrite the field, dropping the old value.
/// On a conversion error nothing is written.
///
/// # Safety
///
/// `ptr` must point to an initialized, uniquely borrowed value of the Rust type described by
/// `field.ty`.
unsafe fn write_value(ptr: *mut u8, field: &FieldModel, value: Value) -> OrmResult<()> {
    let key = (field.ty.kind, field.ty.nullable);
    macro_rules! write {
        ($($kind:ident => $ty:ty),* $(,)?) => {
            match key {
                $(
                    (ScalarKind::$kind, false) => {
                        let v = <$ty as FromValue>::from_value(value)
                            .map_err(|m| m.into_error(field.field_name))?;
                        unsafe { *ptr.cast::<$ty>() = v };
                    }
                    (ScalarKind::$kind, true) => {
                        let v = <Option<$ty> as FromValue>::from_value(value)
                            .map_err(|m| m.into_error(field.field_name))?;
                        unsafe { *ptr.cast::<Option<$ty>>() = v };
                    }
                )*
            }
        };
    }
    for_each_scalar!(write);
    Ok(())
}
