//! `tokio-postgres` backend.
//!
//! Pair it with the PostgreSQL dialect:
//!
//! ```ignore
//! let (client, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls).await?;
//! tokio::spawn(connection);
//! let db = Db::open(client, DbConfig::new().dialect(DialectKind::Postgres))?;
//! ```

use crate::client::{Executor, Mapping};
use crate::error::{OrmError, OrmResult};
use crate::model::Entity;
use crate::query::Query;
use crate::value::{FieldType, ScalarKind, Value, for_each_scalar};
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{IsNull, ToSql, Type};

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        macro_rules! encode {
            ($($kind:ident => $ty:ty),* $(,)?) => {
                match self {
                    Value::Null => Ok(IsNull::Yes),
                    $(Value::$kind(v) => v.to_sql(ty, out),)*
                }
            };
        }
        for_each_scalar!(encode)
    }

    // The wire type is checked per variant in `to_sql_checked`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        macro_rules! encode_checked {
            ($($kind:ident => $ty:ty),* $(,)?) => {
                match self {
                    Value::Null => Ok(IsNull::Yes),
                    $(Value::$kind(v) => v.to_sql_checked(ty, out),)*
                }
            };
        }
        for_each_scalar!(encode_checked)
    }
}

/// Decode column `idx` of `row` as the Rust type of `ty`.
fn decode_column(row: &Row, idx: usize, ty: FieldType) -> OrmResult<Value> {
    macro_rules! decode {
        ($($kind:ident => $ty:ty),* $(,)?) => {
            match ty.kind {
                $(
                    ScalarKind::$kind => row
                        .try_get::<_, Option<$ty>>(idx)
                        .map(Value::from),
                )*
            }
        };
    }
    for_each_scalar!(decode).map_err(|e| OrmError::decode(row.columns()[idx].name(), e.to_string()))
}

fn map_row<T: Entity + Default>(row: &Row, mapping: &Mapping<T>) -> OrmResult<T> {
    let mut out = mapping.new_row();
    let model = mapping.model();
    for (idx, column) in row.columns().iter().enumerate() {
        let field = model
            .column(column.name())
            .ok_or_else(|| OrmError::unknown_column(column.name()))?;
        let value = decode_column(row, idx, field.ty)?;
        mapping.set_column(&mut out, column.name(), value)?;
    }
    Ok(out)
}

fn params(query: &Query) -> Vec<&(dyn ToSql + Sync)> {
    query
        .args()
        .iter()
        .map(|v| v as &(dyn ToSql + Sync))
        .collect()
}

impl Executor for tokio_postgres::Client {
    async fn execute_query<T: Entity + Default>(
        &self,
        query: &Query,
        mapping: &Mapping<T>,
    ) -> OrmResult<Vec<T>> {
        let rows = tokio_postgres::Client::query(self, query.sql(), &params(query)).await?;
        rows.iter().map(|row| map_row(row, mapping)).collect()
    }

    async fn execute_update(&self, query: &Query) -> OrmResult<u64> {
        Ok(tokio_postgres::Client::execute(self, query.sql(), &params(query)).await?)
    }
}
