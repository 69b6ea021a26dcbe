use super::{Entity, ModelOption, TableModel};
use crate::error::{OrmError, OrmResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cache of [`TableModel`]s keyed by Rust type.
///
/// Reads of cached models run concurrently and are never blocked by a derivation: models
/// are derived outside the lock, which is only taken to insert. The insert re-checks the
/// cache, so concurrent first uses all observe the first `Arc<TableModel>` stored. Failed
/// derivations leave the cache untouched.
#[derive(Debug, Default)]
pub struct Registry {
    models: RwLock<HashMap<TypeId, Arc<TableModel>>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an isolated registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Fetch the cached model for `T`, deriving it on first use.
    pub fn get<T: Entity>(&self) -> OrmResult<Arc<TableModel>> {
        let key = TypeId::of::<T>();
        if let Some(model) = self.read().get(&key) {
            return Ok(Arc::clone(model));
        }

        let derived = Arc::new(TableModel::derive::<T>(&[])?);
        let mut models = self.write();
        if let Some(model) = models.get(&key) {
            // Another caller won the race.
            return Ok(Arc::clone(model));
        }
        tracing::debug!(
            target: "modelsql::registry",
            entity = derived.type_name(),
            table = derived.table_name(),
            fields = derived.fields().len(),
            "derived table model"
        );
        models.insert(key, Arc::clone(&derived));
        Ok(derived)
    }

    /// Register `T` with explicit metadata.
    ///
    /// Fails with `InvalidModel` if a model for `T` is already cached, since cached models
    /// are never replaced.
    pub fn register<T: Entity>(&self, options: &[ModelOption]) -> OrmResult<Arc<TableModel>> {
        let key = TypeId::of::<T>();
        let model = Arc::new(TableModel::derive::<T>(options)?);
        let mut models = self.write();
        if models.contains_key(&key) {
            return Err(OrmError::invalid_model(
                model.type_name(),
                "model is already registered",
            ));
        }
        tracing::debug!(
            target: "modelsql::registry",
            entity = model.type_name(),
            table = model.table_name(),
            options = options.len(),
            "registered table model"
        );
        models.insert(key, Arc::clone(&model));
        Ok(model)
    }

    /// Whether a model for `T` is cached.
    pub fn contains<T: 'static>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Entries are inserted fully built, so a poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<TableModel>>> {
        self.models.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<TableModel>>> {
        self.models.write().unwrap_or_else(|e| e.into_inner())
    }
}
