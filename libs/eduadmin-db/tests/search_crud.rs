#![allow(clippy::unwrap_used, clippy::expect_used)]

#[cfg(feature = "sqlite")]
mod common;

#[cfg(feature = "sqlite")]
mod search_crud_tests {
    use crate::common::{audit_log, fetch_raw, memory_db, note, seed};
    use eduadmin_db::crud::{
        CrudOps, InsertCommand, RegistrationError, RemoveCommand, UpdateCommand,
    };
    use eduadmin_db::paging::{PageLimits, PageRequest};
    use eduadmin_db::search::{
        SearchConfigError, SearchField, SearchPlan, SearchRange, SearchRequest, SearchValue,
        Searchable,
    };
    use eduadmin_db::secure::{DataPermission, RecordId, ScopeError};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait, Set};

    #[derive(Debug, Default, Clone, Searchable)]
    struct NoteQuery {
        #[search(op = "contains")]
        title: String,
        #[search(op = "exact")]
        status: String,
        #[search(op = "range", column = "score")]
        score_range: SearchRange<i32>,
        #[search(op = "in", column = "id")]
        ids: Vec<i32>,
        #[search(op = "order", column = "score")]
        sort_score: String,
        #[search(pagination)]
        page: PageRequest,
    }

    #[derive(Default)]
    struct BadColumnQuery {
        #[allow(dead_code)]
        nope: String,
    }

    impl SearchRequest for BadColumnQuery {
        const FIELDS: &'static [SearchField] = &[SearchField {
            field: "nope",
            op: "exact",
            column: "does_not_exist",
        }];

        fn search_values(&self) -> Vec<SearchValue> {
            vec![SearchValue::Text(self.nope.clone())]
        }
    }

    struct BadOperatorQuery;

    impl SearchRequest for BadOperatorQuery {
        const FIELDS: &'static [SearchField] = &[SearchField {
            field: "title",
            op: "like",
            column: "title",
        }];

        fn search_values(&self) -> Vec<SearchValue> {
            vec![SearchValue::Empty]
        }
    }

    struct NewNote {
        title: String,
        dept_id: i32,
    }

    impl InsertCommand<note::Entity> for NewNote {
        fn generate(&self) -> note::ActiveModel {
            note::ActiveModel {
                title: Set(self.title.clone()),
                status: Set("1".to_owned()),
                score: Set(0),
                dept_id: Set(self.dept_id),
                create_by: Set(0),
                update_by: Set(0),
                ..Default::default()
            }
        }
    }

    struct Rename {
        id: RecordId,
        title: String,
    }

    impl UpdateCommand<note::Entity> for Rename {
        fn id(&self) -> RecordId {
            self.id
        }

        fn apply(&self, current: note::Model) -> note::ActiveModel {
            let mut am: note::ActiveModel = current.into();
            am.title = Set(self.title.clone());
            am
        }
    }

    struct Remove(Vec<RecordId>);

    impl RemoveCommand for Remove {
        fn ids(&self) -> &[RecordId] {
            &self.0
        }
    }

    fn plan() -> SearchPlan<note::Entity, NoteQuery> {
        SearchPlan::compile().unwrap()
    }

    fn where_sql(req: &NoteQuery) -> String {
        note::Entity::find()
            .filter(plan().condition(req))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn zero_fields_contribute_nothing() {
        assert!(plan().condition(&NoteQuery::default()).is_empty());
    }

    #[test]
    fn clauses_follow_declaration_order() {
        let req = NoteQuery {
            title: "alg".into(),
            status: "1".into(),
            score_range: SearchRange { from: 10, to: 20 },
            ids: vec![1, 2],
            ..Default::default()
        };
        let sql = where_sql(&req);
        let title = sql.find(r#""note"."title" LIKE '%alg%'"#).expect(&sql);
        let status = sql.find(r#""note"."status" = '1'"#).expect(&sql);
        let score = sql.find(r#""note"."score" BETWEEN 10 AND 20"#).expect(&sql);
        let ids = sql.find(r#""note"."id" IN (1, 2)"#).expect(&sql);
        assert!(title < status && status < score && score < ids, "{sql}");
    }

    #[test]
    fn half_filled_range_emits_one_side() {
        let from_only = where_sql(&NoteQuery {
            score_range: SearchRange { from: 10, to: 0 },
            ..Default::default()
        });
        assert!(from_only.contains(r#""note"."score" >= 10"#), "{from_only}");
        assert!(!from_only.contains("<="), "{from_only}");

        let to_only = where_sql(&NoteQuery {
            score_range: SearchRange { from: 0, to: 5 },
            ..Default::default()
        });
        assert!(to_only.contains(r#""note"."score" <= 5"#), "{to_only}");
    }

    #[test]
    fn order_field_sorts_instead_of_filtering() {
        let req = NoteQuery {
            sort_score: "DESC".into(),
            ..Default::default()
        };
        let ordering = plan().ordering(&req);
        assert!(
            matches!(
                ordering.as_slice(),
                [(note::Column::Score, sea_orm::Order::Desc)]
            ),
            "{ordering:?}"
        );
        assert!(plan().condition(&req).is_empty());
    }

    #[test]
    fn unknown_column_fails_registration() {
        let err = SearchPlan::<note::Entity, BadColumnQuery>::compile().unwrap_err();
        assert_eq!(
            err,
            SearchConfigError::UnknownColumn {
                entity: "note".into(),
                field: "nope",
                column: "does_not_exist",
            }
        );
    }

    #[test]
    fn unsupported_operator_fails_registration() {
        let err = CrudOps::<note::Entity, BadOperatorQuery>::new(PageLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Search(SearchConfigError::UnsupportedOperator(ref op)) if op == "like"
        ));
    }

    #[test]
    fn entity_without_owner_columns_cannot_register() {
        let err = CrudOps::<audit_log::Entity, BadOperatorQuery>::new(PageLimits::default())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingColumn { .. }));
    }

    #[tokio::test]
    async fn empty_status_search_returns_every_status() {
        let db = memory_db().await;
        seed(&db, "a", "1", 1, 1, 7).await;
        seed(&db, "b", "0", 2, 1, 7).await;
        let ops = CrudOps::<note::Entity, NoteQuery>::new(PageLimits::default()).unwrap();

        let page = ops
            .list(&db.secure(), &NoteQuery::default(), &DataPermission::all(1))
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        let only_active = ops
            .list(
                &db.secure(),
                &NoteQuery {
                    status: "1".into(),
                    ..Default::default()
                },
                &DataPermission::all(1),
            )
            .await
            .unwrap();
        assert_eq!(only_active.total, 1);
        assert_eq!(only_active.items[0].title, "a");
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_cover_the_filtered_set() {
        let db = memory_db().await;
        for i in 0..25 {
            let creator = if i % 2 == 0 { 7 } else { 9 };
            seed(&db, &format!("n{i}"), "1", i, 1, creator).await;
        }
        let ops = CrudOps::<note::Entity, NoteQuery>::new(PageLimits::default()).unwrap();
        let perm = DataPermission::own_records(7);
        let secure = db.secure();

        let mut seen = Vec::new();
        for index in 1..=3 {
            let req = NoteQuery {
                page: PageRequest::new(index, 5),
                ..Default::default()
            };
            let page = ops.list(&secure, &req, &perm).await.unwrap();
            assert_eq!(page.total, 13);
            assert_eq!(page.page_index, u64::try_from(index).unwrap());
            seen.extend(page.items.into_iter().map(|n| (n.id, n.create_by)));
        }
        assert_eq!(seen.len(), 13);
        assert!(seen.iter().all(|(_, c)| *c == 7));
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));

        let all = ops
            .list(
                &secure,
                &NoteQuery {
                    page: PageRequest::unbounded(),
                    ..Default::default()
                },
                &perm,
            )
            .await
            .unwrap();
        assert_eq!(all.items.len(), 13);
        assert_eq!(all.page_size, None);
    }

    #[tokio::test]
    async fn total_ignores_paging() {
        let db = memory_db().await;
        for i in 0..12 {
            seed(&db, "x", "1", i, 1, 7).await;
        }
        let ops = CrudOps::<note::Entity, NoteQuery>::new(PageLimits::default()).unwrap();
        let req = |index, size| NoteQuery {
            score_range: SearchRange { from: 3, to: 10 },
            page: PageRequest::new(index, size),
            ..Default::default()
        };
        for (index, size) in [(1, 2), (2, 3), (9, 10), (1, -1)] {
            let page = ops
                .list(&db.secure(), &req(index, size), &DataPermission::all(1))
                .await
                .unwrap();
            assert_eq!(page.total, 8, "index {index} size {size}");
        }
    }

    #[tokio::test]
    async fn crud_round_trip_under_own_records() {
        let db = memory_db().await;
        let foreign = seed(&db, "b", "1", 1, 1, 9).await;
        let ops = CrudOps::<note::Entity, NoteQuery>::new(PageLimits::default()).unwrap();
        let secure = db.secure();
        let perm = DataPermission::own_records(7);

        let id = ops
            .create(
                &secure,
                &NewNote {
                    title: "a".into(),
                    dept_id: 1,
                },
                7,
            )
            .await
            .unwrap();

        let err = ops.get(&secure, foreign.id, &perm).await.unwrap_err();
        assert!(matches!(err, ScopeError::NotFoundOrForbidden));
        let err = ops.get(&secure, 4242, &perm).await.unwrap_err();
        assert!(matches!(err, ScopeError::NotFoundOrForbidden));

        let rename = |id| Rename {
            id,
            title: "x".into(),
        };
        assert!(matches!(
            ops.update(&secure, &rename(foreign.id), &perm).await,
            Err(ScopeError::UpdateDenied)
        ));
        assert!(matches!(
            ops.remove(&secure, &Remove(vec![foreign.id]), &perm).await,
            Err(ScopeError::DeleteDenied)
        ));
        assert_eq!(fetch_raw(&db, foreign.id).await.unwrap(), foreign);

        ops.update(&secure, &rename(id), &perm).await.unwrap();
        assert_eq!(ops.get(&secure, id, &perm).await.unwrap().title, "x");

        assert_eq!(ops.remove(&secure, &Remove(vec![id]), &perm).await.unwrap(), 1);
        assert!(fetch_raw(&db, id).await.is_none());
    }
}
