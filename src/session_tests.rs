#[cfg(test)]
mod tests {
    use crate::testing::{MockRunner, RecordingReceiver};
    use crate::{
        EVENT_EXEC, EVENT_QUERY, Error, ExecResult, Flavor, FromRow, Row, Session, SessionConfig,
        SqlValue, args, eq, insert_by_sql, insert_into, record, select, update,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct User {
        id: i64,
        name: String,
    }

    record!(User { name }, id = id);

    impl FromRow for User {
        fn from_row(row: &Row) -> crate::Result<Self> {
            Ok(Self {
                id: row.get("id")?,
                name: row.get("name")?,
            })
        }
    }

    fn user_row(id: i64, name: &'static str) -> Row {
        Row::new(
            vec!["id".into(), "name".into()],
            vec![SqlValue::I64(id), SqlValue::from(name)],
        )
    }

    fn sqlite(runner: MockRunner) -> Session<MockRunner> {
        Session::new(runner, Flavor::SQLite)
    }

    #[tokio::test]
    async fn exec_runs_one_round_trip_per_chunk() {
        let session = sqlite(MockRunner::new());
        let mut ib = insert_into("users");
        ib.columns(["name", "age"])
            .values(args!["a", 1])
            .values(args!["b", 2])
            .batch_size(1);

        let result = ib.exec(&session).await.unwrap();
        assert_eq!(result.last_insert_id, Some(2));
        assert_eq!(ib.pending_rows(), 0);

        let sql = "INSERT INTO \"users\" (\"name\",\"age\") VALUES (?,?)".to_string();
        assert_eq!(
            session.runner().calls(),
            vec![(sql.clone(), args!["a", 1]), (sql, args!["b", 2])]
        );
    }

    #[tokio::test]
    async fn session_batch_size_applies_to_inserts() {
        let session = sqlite(MockRunner::new())
            .with_config(SessionConfig::new().with_batch_size(2));
        let mut ib = session.insert_into("t");
        ib.columns(["n"]);
        for i in 0..5_i64 {
            ib.values(args![i]);
        }
        ib.exec(&session).await.unwrap();
        let sizes: Vec<usize> = session
            .runner()
            .calls()
            .iter()
            .map(|(_, args)| args.len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn first_chunk_id_is_written_back_once() {
        let session = sqlite(MockRunner::new());
        let mut user = User {
            name: "alice".into(),
            ..User::default()
        };
        {
            let mut ib = insert_into("users");
            ib.batch_size(1)
                .record(&mut user)
                .values(args!["bob"])
                .values(args!["carol"]);
            ib.exec(&session).await.unwrap();
        }
        assert_eq!(user.id, 1);
        assert_eq!(session.runner().calls().len(), 3);
    }

    #[derive(Debug)]
    struct Label {
        name: String,
    }

    record!(Label { name });

    #[tokio::test]
    async fn later_record_takes_over_id_slot() {
        let session = sqlite(MockRunner::new());
        let mut a = User {
            name: "a".into(),
            ..User::default()
        };
        let mut b = User {
            name: "b".into(),
            ..User::default()
        };
        {
            let mut ib = insert_into("users");
            ib.record(&mut a).record(&mut b);
            ib.exec(&session).await.unwrap();
        }
        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
    }

    #[tokio::test]
    async fn record_without_id_keeps_existing_slot() {
        let session = sqlite(MockRunner::new());
        let mut user = User {
            name: "alice".into(),
            ..User::default()
        };
        let mut label = Label { name: "tag".into() };
        {
            let mut ib = insert_into("users");
            ib.record(&mut user).record(&mut label);
            ib.exec(&session).await.unwrap();
        }
        assert_eq!(user.id, 1);
        assert_eq!(label.name, "tag");
    }

    #[tokio::test]
    async fn id_is_left_alone_without_backend_id() {
        let session = sqlite(MockRunner::new().without_ids());
        let mut user = User {
            id: -1,
            name: "alice".into(),
        };
        insert_into("users").record(&mut user).exec(&session).await.unwrap();
        assert_eq!(user.id, -1);
    }

    #[tokio::test]
    async fn error_halts_loop_and_leaves_rows_pending() {
        let session = sqlite(MockRunner::new().failing_on(2));
        let mut ib = insert_into("t");
        ib.columns(["n"]).batch_size(2);
        for i in 0..7_i64 {
            ib.values(args![i]);
        }
        let err = ib.exec(&session).await.unwrap_err();
        assert!(matches!(err, Error::Runner(_)));
        assert_eq!(session.runner().calls().len(), 2);
        assert_eq!(ib.pending_rows(), 3);
    }

    #[tokio::test]
    async fn invalid_insert_never_reaches_runner() {
        let session = sqlite(MockRunner::new());
        let mut ib = insert_into("t");
        ib.values(args![1]);
        let err = ib.exec(&session).await.unwrap_err();
        assert!(matches!(err, Error::ColumnNotSpecified));
        assert!(session.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn empty_insert_is_a_no_op() {
        let session = sqlite(MockRunner::new());
        let mut ib = insert_into("t");
        ib.columns(["n"]);
        assert_eq!(ib.exec(&session).await.unwrap(), ExecResult::default());
        assert!(session.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn raw_insert_executes_once() {
        let session = sqlite(MockRunner::new());
        let mut ib = insert_by_sql("INSERT INTO t (a) VALUES (?)", [1]);
        ib.exec(&session).await.unwrap();
        assert_eq!(session.runner().calls().len(), 1);
    }

    #[tokio::test]
    async fn insert_load_collects_returning_rows_across_chunks() {
        let runner = MockRunner::new().with_rows(vec![user_row(1, "a")]);
        let session = Session::new(runner, Flavor::PostgreSQL);
        let mut ib = insert_into("users");
        ib.columns(["name"])
            .values(args!["a"])
            .values(args!["b"])
            .returning(["id", "name"])
            .batch_size(1);
        let users: Vec<User> = ib.load(&session).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(
            session.runner().calls()[0].0,
            "INSERT INTO \"users\" (\"name\") VALUES ($1) RETURNING \"id\",\"name\""
        );
    }

    #[tokio::test]
    async fn insert_load_stops_at_failing_chunk() {
        let runner = MockRunner::new()
            .with_rows(vec![user_row(1, "a")])
            .failing_on(2);
        let session = Session::new(runner, Flavor::PostgreSQL);
        let mut ib = insert_into("users");
        ib.columns(["name"])
            .values(args!["a"])
            .values(args!["b"])
            .values(args!["c"])
            .returning(["id", "name"])
            .batch_size(1);
        let err = ib.load::<User, _>(&session).await.unwrap_err();
        assert!(matches!(err, Error::Runner(_)));
        assert_eq!(session.runner().calls().len(), 2);
        assert_eq!(ib.pending_rows(), 1);
    }

    #[tokio::test]
    async fn update_without_where_never_reaches_runner() {
        let session = sqlite(MockRunner::new());
        let mut ub = update("users");
        ub.set("age", 5);
        assert!(matches!(
            ub.exec(&session).await.unwrap_err(),
            Error::MissingCondition
        ));
        assert!(session.runner().calls().is_empty());

        ub.where_(eq("id", 1));
        assert_eq!(ub.exec(&session).await.unwrap().rows_affected, 1);
    }

    #[tokio::test]
    async fn select_load_and_load_one() {
        let runner = MockRunner::new().with_rows(vec![user_row(1, "a"), user_row(2, "b")]);
        let session = sqlite(runner);
        let mut sb = select(["id", "name"]);
        sb.from("users");

        let users: Vec<User> = sb.load(&session).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "b");

        let first: User = sb.load_one(&session).await.unwrap();
        assert_eq!(first.id, 1);

        let rows = sb.load_rows(&session).await.unwrap();
        assert_eq!(rows[0].get::<String>("name").unwrap(), "a");
    }

    #[tokio::test]
    async fn load_one_reports_not_found() {
        let session = sqlite(MockRunner::new());
        let err = select("*")
            .from("users")
            .load_one::<Row, _>(&session)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn query_timeout_is_enforced() {
        let runner = MockRunner::new().with_delay(Duration::from_millis(200));
        let session = sqlite(runner)
            .with_config(SessionConfig::new().with_query_timeout(Duration::from_millis(10)));
        let err = select("1").load_rows(&session).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn receiver_sees_success_and_failure() {
        let receiver = Arc::new(RecordingReceiver::default());
        let session = sqlite(MockRunner::new().failing_on(2)).with_receiver(receiver.clone());

        let sb = select("1");
        sb.load_rows(&session).await.unwrap();
        let mut ib = insert_into("t");
        ib.columns(["n"]).values(args![1]);
        ib.exec(&session).await.unwrap_err();

        let events = receiver.events();
        let names: Vec<String> = events.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(
            names,
            vec![format!("timing:{EVENT_QUERY}"), format!("error:{EVENT_EXEC}")]
        );
        assert_eq!(events[0].1.get("sql").map(String::as_str), Some("SELECT 1"));
        assert!(events[1].1.contains_key("time"));
    }

    #[test]
    fn session_to_sql_uses_its_dialect() {
        let session = Session::new(MockRunner::new(), Flavor::PostgreSQL);
        let mut ub = session.update("t");
        ub.set("a", 1).where_(eq("id", 2));
        let (sql, _) = session.to_sql(&ub).unwrap();
        assert_eq!(sql, "UPDATE \"t\" SET \"a\" = $1 WHERE \"id\" = $2");
    }
}
