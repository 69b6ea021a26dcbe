//! Rendering tests for the statement builders.

use super::*;
use crate::db::{Db, DbConfig};
use crate::dialect::{DialectKind, Postgres};
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, EntityDescriptor};
use crate::value::Value;
use crate::AccessorStrategy;

#[derive(Debug, Default, Clone, crate::Entity)]
struct TestModel {
    id: i64,
    first_name: String,
    age: i32,
    last_name: Option<String>,
    #[orm(column = "mail")]
    email: Option<String>,
}

#[derive(Debug, Default, crate::Entity)]
struct Order {
    id: i64,
    using_col1: String,
    using_col2: String,
}

#[derive(Debug, Default, crate::Entity)]
struct OrderDetail {
    order_id: i64,
    item_id: i64,
    using_col1: String,
    using_col2: String,
}

#[derive(Debug, Default, crate::Entity)]
struct Item {
    id: i64,
}

#[derive(Debug, Default)]
struct Opaque;

unsafe impl Entity for Opaque {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor {
            type_name: "Opaque",
            table: None,
            fields: Vec::new(),
        }
    }

    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, name: &str, _value: Value) -> OrmResult<()> {
        Err(OrmError::unknown_field(name))
    }
}

fn mysql() -> Db {
    Db::offline(DbConfig::new().isolated_registry()).unwrap()
}

fn postgres() -> Db {
    Db::offline(
        DbConfig::new()
            .dialect(DialectKind::Postgres)
            .isolated_registry(),
    )
    .unwrap()
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

// ==================== SELECT ====================

#[test]
fn test_select_all() {
    let q = mysql().selector::<TestModel>().build().unwrap();
    assert_eq!(q.sql(), "SELECT * FROM `test_model`;");
    assert!(q.args().is_empty());
}

#[test]
fn test_select_single_predicate() {
    let q = mysql()
        .selector::<TestModel>()
        .where_([col("id").eq(12i64)])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT * FROM `test_model` WHERE `id` = ?;");
    assert_eq!(q.args(), &[Value::I64(12)]);
}

#[test]
fn test_select_predicates_are_anded() {
    let q = mysql()
        .selector::<TestModel>()
        .where_([col("age").gt(18), col("first_name").eq("Tom")])
        .and_where(col("last_name").like("J%"))
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `test_model` WHERE ((`age` > ?) AND (`first_name` = ?)) AND (`last_name` LIKE ?);"
    );
    assert_eq!(q.args(), &[Value::I32(18), text("Tom"), text("J%")]);
}

#[test]
fn test_parenthesization_preserves_grouping() {
    let db = mysql();
    let a = || col("age").gt(18);
    let b = || col("id").eq(1i64);
    let c = || col("first_name").eq("Tom");

    let left = db
        .selector::<TestModel>()
        .where_([a().and(b()).or(c())])
        .build()
        .unwrap();
    let right = db
        .selector::<TestModel>()
        .where_([a().and(b().or(c()))])
        .build()
        .unwrap();

    assert_eq!(
        left.sql(),
        "SELECT * FROM `test_model` WHERE ((`age` > ?) AND (`id` = ?)) OR (`first_name` = ?);"
    );
    assert_eq!(
        right.sql(),
        "SELECT * FROM `test_model` WHERE (`age` > ?) AND ((`id` = ?) OR (`first_name` = ?));"
    );
    assert_ne!(left.sql(), right.sql());
    assert_eq!(left.args(), right.args());
}

#[test]
fn test_not() {
    let q = mysql()
        .selector::<TestModel>()
        .where_([not(col("id").eq(1i64))])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT * FROM `test_model` WHERE NOT (`id` = ?);");
}

#[test]
fn test_field_name_maps_to_column() {
    let q = mysql()
        .selector::<TestModel>()
        .select([col("email").into()])
        .where_([col("mail").ne(None::<String>)])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT `mail` FROM `test_model` WHERE `mail` != ?;");
    assert_eq!(q.args(), &[Value::Null]);
}

#[test]
fn test_unknown_column() {
    let err = mysql()
        .selector::<TestModel>()
        .where_([col("invalid").eq(1)])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "invalid"));

    let err = mysql()
        .selector::<TestModel>()
        .select([col("nope").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(_)));
}

#[test]
fn test_select_columns_and_aliases() {
    let q = mysql()
        .selector::<TestModel>()
        .select([col("id").into(), col("first_name").alias("name").into()])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT `id`,`first_name` AS `name` FROM `test_model`;");
}

#[test]
fn test_alias_is_quoted() {
    let q = mysql()
        .selector::<TestModel>()
        .select([col("id").alias("we`ird").into()])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT `id` AS `we``ird` FROM `test_model`;");
}

#[test]
fn test_aggregates() {
    let q = mysql()
        .selector::<TestModel>()
        .select([
            avg("age").alias("avg_age").into(),
            sum("age").into(),
            max("age").into(),
            min("age").into(),
            count_all().into(),
        ])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT AVG(`age`) AS `avg_age`,SUM(`age`),MAX(`age`),MIN(`age`),COUNT(*) FROM `test_model`;"
    );
}

#[test]
fn test_group_by_having() {
    let q = mysql()
        .selector::<TestModel>()
        .select([col("first_name").into(), count("id").into()])
        .group_by([col("first_name"), col("last_name")])
        .having([avg("age").gt(18), count_all().ge(2i64)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT `first_name`,COUNT(`id`) FROM `test_model` GROUP BY `first_name`,`last_name` \
         HAVING (AVG(`age`) > ?) AND (COUNT(*) >= ?);"
    );
    assert_eq!(q.args(), &[Value::I32(18), Value::I64(2)]);
}

#[test]
fn test_limit_offset_are_bound() {
    let q = mysql()
        .selector::<TestModel>()
        .where_([col("age").gt(18)])
        .limit(10)
        .offset(20)
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `test_model` WHERE `age` > ? LIMIT ? OFFSET ?;"
    );
    assert_eq!(q.args(), &[Value::I32(18), Value::I64(10), Value::I64(20)]);

    let q = mysql().selector::<TestModel>().limit(0).offset(0).build().unwrap();
    assert_eq!(q.sql(), "SELECT * FROM `test_model`;");
}

#[test]
fn test_table_alias() {
    let t = table_of::<TestModel>().alias("t");
    let q = mysql()
        .selector::<TestModel>()
        .select([t.col("first_name").into()])
        .from(t.clone())
        .where_([t.col("id").eq(1i64)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT `t`.`first_name` FROM `test_model` AS `t` WHERE `t`.`id` = ?;"
    );
}

#[test]
fn test_from_other_table() {
    let q = mysql()
        .selector::<TestModel>()
        .from(table_of::<Order>())
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT * FROM `order`;");
}

// ==================== JOIN ====================

#[test]
fn test_join_using() {
    let q = mysql()
        .selector::<Order>()
        .from(
            table_of::<Order>()
                .join(table_of::<OrderDetail>())
                .using(["using_col1", "using_col2"]),
        )
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM (`order` JOIN `order_detail` USING (`using_col1`,`using_col2`));"
    );
}

#[test]
fn test_join_using_resolves_right_side() {
    let q = mysql()
        .selector::<Order>()
        .from(table_of::<Order>().join(table_of::<OrderDetail>()).using(["order_id"]))
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT * FROM (`order` JOIN `order_detail` USING (`order_id`));");

    let err = mysql()
        .selector::<Order>()
        .from(table_of::<Order>().join(table_of::<Item>()).using(["missing"]))
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(_)));
}

#[test]
fn test_join_on() {
    let t1 = table_of::<Order>().alias("t1");
    let t2 = table_of::<OrderDetail>().alias("t2");
    let q = mysql()
        .selector::<Order>()
        .from(
            t1.clone()
                .join(t2.clone())
                .on([t1.col("id").eq(t2.col("order_id"))]),
        )
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM (`order` AS `t1` JOIN `order_detail` AS `t2` ON `t1`.`id` = `t2`.`order_id`);"
    );
}

#[test]
fn test_join_on_multiple_predicates_with_args() {
    let t1 = table_of::<Order>().alias("t1");
    let t2 = table_of::<OrderDetail>().alias("t2");
    let q = mysql()
        .selector::<Order>()
        .from(t1.clone().left_join(t2.clone()).on([
            t1.col("id").eq(t2.col("order_id")),
            t2.col("item_id").gt(7i64),
        ]))
        .where_([t1.col("using_col1").eq("x")])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM (`order` AS `t1` LEFT JOIN `order_detail` AS `t2` \
         ON (`t1`.`id` = `t2`.`order_id`) AND (`t2`.`item_id` > ?)) WHERE `t1`.`using_col1` = ?;"
    );
    assert_eq!(q.args(), &[Value::I64(7), text("x")]);
}

#[test]
fn test_nested_join() {
    let t1 = table_of::<Order>().alias("t1");
    let t2 = table_of::<OrderDetail>().alias("t2");
    let t3 = t1
        .clone()
        .join(t2.clone())
        .on([t1.col("id").eq(t2.col("order_id"))]);
    let t4 = table_of::<Item>().alias("t4");
    let q = mysql()
        .selector::<Order>()
        .from(t3.right_join(t4.clone()).on([t2.col("item_id").eq(t4.col("id"))]))
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM ((`order` AS `t1` JOIN `order_detail` AS `t2` ON `t1`.`id` = `t2`.`order_id`) \
         RIGHT JOIN `item` AS `t4` ON `t2`.`item_id` = `t4`.`id`);"
    );
}

#[test]
fn test_join_on_takes_precedence_over_using() {
    let t1 = table_of::<Order>().alias("t1");
    let t2 = table_of::<OrderDetail>().alias("t2");
    let mut join = t1
        .clone()
        .join(t2.clone())
        .on([t1.col("id").eq(t2.col("order_id"))]);
    join.using = vec!["using_col1".to_string()];

    let q = mysql().selector::<Order>().from(join).build().unwrap();
    assert!(q.sql().contains(" ON `t1`.`id` = `t2`.`order_id`"));
    assert!(!q.sql().contains("USING"));
}

#[test]
fn test_join_cannot_qualify_column() {
    let join = table_of::<Order>().join(table_of::<Item>()).using(["id"]);
    let column = Column::qualified(join.into(), "id");
    let err = mysql()
        .selector::<Order>()
        .where_([column.eq(1i64)])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnsupportedTableType(_)));
}

// ==================== subqueries ====================

#[test]
fn test_subquery_as_table() {
    let db = mysql();
    let sub = db.selector::<OrderDetail>().as_subquery("sub");
    let q = db.selector::<Order>().from(sub).build().unwrap();
    assert_eq!(q.sql(), "SELECT * FROM (SELECT * FROM `order_detail`) AS `sub`;");
}

#[test]
fn test_subquery_columns_and_args() {
    let db = mysql();
    let sub = db
        .selector::<OrderDetail>()
        .select([col("order_id").into(), col("item_id").alias("item").into()])
        .where_([col("order_id").gt(5i64)])
        .as_subquery("sub");
    let q = db
        .selector::<Order>()
        .select([sub.col("item").into(), sub.col("order_id").into()])
        .from(sub.clone())
        .where_([sub.col("order_id").lt(10i64)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT `sub`.`item`,`sub`.`order_id` FROM (SELECT `order_id`,`item_id` AS `item` \
         FROM `order_detail` WHERE `order_id` > ?) AS `sub` WHERE `sub`.`order_id` < ?;"
    );
    assert_eq!(q.args(), &[Value::I64(5), Value::I64(10)]);
}

#[test]
fn test_subquery_hides_unselected_columns() {
    let db = mysql();
    let sub = db
        .selector::<OrderDetail>()
        .select([col("order_id").into()])
        .as_subquery("sub");
    let err = db
        .selector::<Order>()
        .select([sub.col("item_id").into()])
        .from(sub)
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "item_id"));
}

#[test]
fn test_subquery_star_exposes_model_columns() {
    let db = mysql();
    let sub = db.selector::<OrderDetail>().as_subquery("sub");
    let q = db
        .selector::<Order>()
        .select([sub.col("item_id").into()])
        .from(sub)
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT `sub`.`item_id` FROM (SELECT * FROM `order_detail`) AS `sub`;"
    );
}

#[test]
fn test_subquery_exposes_qualified_column_by_its_table_mapping() {
    let db = mysql();
    let o = table_of::<Order>().alias("o");
    let a = table_of::<TestModel>().alias("a");
    let sub = db
        .selector::<Order>()
        .select([a.col("email").into()])
        .from(o.clone().join(a.clone()).on([o.col("id").eq(a.col("id"))]))
        .as_subquery("s");

    let inner = "(SELECT `a`.`mail` FROM (`order` AS `o` JOIN `test_model` AS `a` \
                 ON `o`.`id` = `a`.`id`)) AS `s`";
    for name in ["email", "mail"] {
        let q = db
            .selector::<Order>()
            .select([sub.col(name).into()])
            .from(sub.clone())
            .build()
            .unwrap();
        assert_eq!(q.sql(), format!("SELECT `s`.`mail` FROM {inner};"));
    }

    // `id` names a column of both tables, but neither is selected.
    let err = db
        .selector::<Order>()
        .select([sub.col("id").into()])
        .from(sub)
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "id"));
}

#[test]
fn test_nested_subquery_column() {
    let db = mysql();
    let inner = db
        .selector::<TestModel>()
        .select([col("email").into()])
        .as_subquery("i");
    let outer = db
        .selector::<TestModel>()
        .select([inner.col("email").into()])
        .from(inner)
        .as_subquery("o");
    let q = db
        .selector::<TestModel>()
        .select([outer.col("email").into()])
        .from(outer)
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT `o`.`mail` FROM (SELECT `i`.`mail` FROM (SELECT `mail` FROM `test_model`) \
         AS `i`) AS `o`;"
    );
}

#[test]
fn test_join_with_subquery() {
    let db = mysql();
    let t1 = table_of::<Order>().alias("t1");
    let sub = db
        .selector::<OrderDetail>()
        .select([col("order_id").into()])
        .as_subquery("sub");
    let q = db
        .selector::<Order>()
        .from(
            t1.clone()
                .join(sub.clone())
                .on([t1.col("id").eq(sub.col("order_id"))]),
        )
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM (`order` AS `t1` JOIN (SELECT `order_id` FROM `order_detail`) AS `sub` \
         ON `t1`.`id` = `sub`.`order_id`);"
    );
}

#[test]
fn test_in_subquery_argument_order() {
    let db = mysql();
    let sub = db
        .selector::<OrderDetail>()
        .select([col("order_id").into()])
        .where_([col("item_id").gt(3i64)])
        .as_subquery("sub");
    let q = db
        .selector::<Order>()
        .where_([
            col("using_col1").eq("a"),
            col("id").in_query(sub),
            col("using_col2").eq("b"),
        ])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `order` WHERE ((`using_col1` = ?) AND (`id` IN (SELECT `order_id` \
         FROM `order_detail` WHERE `item_id` > ?))) AND (`using_col2` = ?);"
    );
    assert_eq!(q.args(), &[text("a"), Value::I64(3), text("b")]);
    assert_eq!(q.sql().matches('?').count(), q.args().len());
}

#[test]
fn test_exists_and_quantifiers() {
    let db = mysql();
    let sub = || {
        db.selector::<OrderDetail>()
            .select([col("order_id").into()])
            .as_subquery("sub")
    };

    let q = db.selector::<Order>().where_([exists(sub())]).build().unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `order` WHERE EXISTS (SELECT `order_id` FROM `order_detail`);"
    );

    let q = db
        .selector::<Order>()
        .where_([col("id").gt(any(sub())), col("id").le(all(sub())), col("id").eq(some(sub()))])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `order` WHERE ((`id` > ANY (SELECT `order_id` FROM `order_detail`)) \
         AND (`id` <= ALL (SELECT `order_id` FROM `order_detail`))) \
         AND (`id` = SOME (SELECT `order_id` FROM `order_detail`));"
    );
}

#[test]
fn test_scalar_subquery_operand() {
    let db = mysql();
    let sub = db
        .selector::<OrderDetail>()
        .select([max("order_id").into()])
        .as_subquery("m");
    let q = db.selector::<Order>().where_([col("id").eq(sub)]).build().unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM `order` WHERE `id` = (SELECT MAX(`order_id`) FROM `order_detail`);"
    );
}

#[test]
fn test_postgres_numbering_through_subqueries() {
    let db = postgres();
    let sub = db
        .selector::<OrderDetail>()
        .select([col("order_id").into()])
        .where_([col("item_id").gt(3i64)])
        .as_subquery("sub");
    let q = db
        .selector::<Order>()
        .where_([
            col("using_col1").eq("a"),
            col("id").in_query(sub),
            col("using_col2").eq("b"),
        ])
        .limit(5)
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT * FROM \"order\" WHERE ((\"using_col1\" = $1) AND (\"id\" IN (SELECT \"order_id\" \
         FROM \"order_detail\" WHERE \"item_id\" > $2))) AND (\"using_col2\" = $3) LIMIT $4;"
    );
    assert_eq!(q.args().len(), 4);
}

#[test]
fn test_model_not_found() {
    let db = mysql();
    let err = db.selector::<Opaque>().build().unwrap_err();
    assert!(matches!(err, OrmError::ModelNotFound { entity: "Opaque", .. }));
    assert!(matches!(err.root_cause(), OrmError::UnsupportedType(_)));

    let err = db
        .selector::<Order>()
        .from(table_of::<Opaque>())
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::ModelNotFound { entity: "Opaque", .. }));
}

// ==================== UPDATE ====================

fn tom() -> TestModel {
    TestModel {
        id: 12,
        first_name: "Tom".to_string(),
        age: 0,
        last_name: None,
        email: None,
    }
}

#[test]
fn test_update_without_assignments() {
    let db = mysql();
    let err = db.updater::<TestModel>().update(&tom()).build().unwrap_err();
    assert!(matches!(err, OrmError::NoUpdatedColumns));

    let err = db.updater::<TestModel>().set([]).build().unwrap_err();
    assert!(matches!(err, OrmError::NoUpdatedColumns));
}

#[test]
fn test_update_assignment() {
    let q = mysql()
        .updater::<TestModel>()
        .set([assign("age", 18).into()])
        .where_([col("id").eq(12i64)])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE `test_model` SET `age` = ? WHERE `id` = ?;");
    assert_eq!(q.args(), &[Value::I32(18), Value::I64(12)]);
}

#[test]
fn test_update_skips_zero_columns() {
    let m = tom();
    let q = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([
            col("first_name").into(),
            col("age").into(),
            col("last_name").into(),
        ])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE `test_model` SET `first_name` = ?;");
    assert_eq!(q.args(), &[text("Tom")]);
    assert!(!q.sql().contains("`age`"));
}

#[test]
fn test_update_some_empty_string_is_not_zero() {
    let m = TestModel {
        last_name: Some(String::new()),
        ..tom()
    };
    let q = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([col("last_name").into(), col("email").into()])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE `test_model` SET `last_name` = ?;");
    assert_eq!(q.args(), &[text("")]);
}

#[test]
fn test_update_multiple_columns_with_where() {
    let m = TestModel { age: 18, ..tom() };
    let q = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([col("first_name").into(), col("age").into()])
        .where_([col("id").eq(m.id)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE `test_model` SET `first_name` = ?,`age` = ? WHERE `id` = ?;"
    );
    assert_eq!(q.args(), &[text("Tom"), Value::I32(18), Value::I64(12)]);
}

#[test]
fn test_update_every_column_zero() {
    let m = TestModel::default();
    let err = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([col("first_name").into(), col("age").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::NoUpdatedColumns));
}

#[test]
fn test_assign_non_zero() {
    let db = mysql();
    let q = db
        .updater::<TestModel>()
        .set([
            assign_non_zero("age", 0).into(),
            assign_non_zero("first_name", "Jerry").into(),
            assign("last_name", "").into(),
        ])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE `test_model` SET `first_name` = ?,`last_name` = ?;"
    );
    assert_eq!(q.args(), &[text("Jerry"), text("")]);

    let err = db
        .updater::<TestModel>()
        .set([assign_non_zero("age", 0).into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::NoUpdatedColumns));
}

#[test]
fn test_assign_expression() {
    let q = mysql()
        .updater::<TestModel>()
        .set([assign("age", col("id")).into()])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE `test_model` SET `age` = `id`;");
    assert!(q.args().is_empty());
}

#[test]
fn test_set_non_zero_columns() {
    let m = TestModel { age: 18, ..tom() };
    let q = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set_non_zero_columns()
        .where_([col("id").eq(m.id)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE `test_model` SET `id` = ?,`first_name` = ?,`age` = ? WHERE `id` = ?;"
    );
    assert_eq!(
        q.args(),
        &[Value::I64(12), text("Tom"), Value::I32(18), Value::I64(12)]
    );
}

#[test]
fn test_bare_column_needs_entity() {
    let err = mysql()
        .updater::<TestModel>()
        .set([col("age").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
}

#[test]
fn test_update_unknown_column() {
    let m = tom();
    let err = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([col("invalid").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(_)));

    let err = mysql()
        .updater::<TestModel>()
        .set([assign("invalid", 1).into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(_)));
}

#[test]
fn test_update_rejects_column_of_another_table() {
    let m = tom();
    let db = mysql();
    let err = db
        .updater::<TestModel>()
        .update(&m)
        .set([table_of::<Order>().col("id").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnsupportedTableType(ref msg) if msg.contains("'id'")));

    let sub = db.selector::<TestModel>().as_subquery("sub");
    let err = db
        .updater::<TestModel>()
        .update(&m)
        .set([sub.col("age").into()])
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::UnsupportedTableType(_)));
}

#[test]
fn test_update_accepts_own_table_qualifier() {
    let m = TestModel { age: 18, ..tom() };
    let q = mysql()
        .updater::<TestModel>()
        .update(&m)
        .set([table_of::<TestModel>().alias("t").col("age").into()])
        .where_([col("id").eq(m.id)])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE `test_model` SET `age` = ? WHERE `id` = ?;");
    assert_eq!(q.args(), &[Value::I32(m.age), Value::I64(m.id)]);
}

#[test]
fn test_update_same_for_both_accessors() {
    let m = TestModel {
        email: Some("tom@example.com".to_string()),
        ..tom()
    };
    let render = |strategy| {
        let db = Db::offline(DbConfig::new().accessor(strategy).isolated_registry()).unwrap();
        db.updater::<TestModel>()
            .update(&m)
            .set_non_zero_columns()
            .build()
            .unwrap()
    };
    let reflective = render(AccessorStrategy::Reflective);
    let direct = render(AccessorStrategy::Direct);
    assert_eq!(reflective, direct);
    assert_eq!(
        direct.sql(),
        "UPDATE `test_model` SET `id` = ?,`first_name` = ?,`mail` = ?;"
    );
}

#[test]
fn test_update_postgres_numbering() {
    let m = TestModel { age: 18, ..tom() };
    let q = postgres()
        .updater::<TestModel>()
        .update(&m)
        .set([col("first_name").into(), col("age").into()])
        .where_([col("id").eq(m.id)])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE \"test_model\" SET \"first_name\" = $1,\"age\" = $2 WHERE \"id\" = $3;"
    );
}

#[test]
fn test_custom_dialect_override() {
    let db = mysql().with_dialect(Postgres);
    let q = db
        .selector::<TestModel>()
        .where_([col("id").eq(1i64)])
        .build()
        .unwrap();
    assert_eq!(q.sql(), "SELECT * FROM \"test_model\" WHERE \"id\" = $1;");
}
