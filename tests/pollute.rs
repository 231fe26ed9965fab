//! Stage ordering and error tagging of `Polluter::pollute`, against an
//! in-memory engine.

use async_trait::async_trait;
use polluter::{
    build_commands, BuildError, Command, Engine, ExecError, JsonParser, ParseError,
    PolluteError, Polluter, Tree, YamlParser,
};
use std::fmt;
use std::io::Read;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
struct Put(String);

impl Command for Put {
    fn target(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Put {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PUT {}", self.0)
    }
}

/// Records every call; fails the stage it is told to fail.
#[derive(Default)]
struct FakeEngine {
    fail_build: bool,
    fail_exec: bool,
    built: Mutex<usize>,
    executed: Mutex<Vec<Put>>,
}

#[async_trait]
impl Engine for FakeEngine {
    type Command = Put;

    fn build(&self, tree: Tree) -> Result<Vec<Put>, BuildError> {
        *self.built.lock().unwrap() += 1;
        if self.fail_build {
            return Err(BuildError::Decode {
                name: "users".to_string(),
                reason: "unsupported".to_string(),
            });
        }
        Ok(tree.names().map(|name| Put(name.to_string())).collect())
    }

    async fn exec(&self, commands: Vec<Put>) -> Result<(), ExecError> {
        if self.fail_exec {
            return Err(ExecError::command(0, commands[0].target(), "connection refused"));
        }
        self.executed.lock().unwrap().extend(commands);
        Ok(())
    }
}

fn failing_parser() -> Box<dyn polluter::Parser> {
    Box::new(|_: &mut dyn Read| -> Result<Tree, ParseError> {
        Err(ParseError::NotAMapping { found: "array" })
    })
}

const INPUT: &str = r#"{"users":[{"id":1}],"roles":[]}"#;

#[tokio::test]
async fn test_success_executes_in_document_order() {
    let polluter = Polluter::new(FakeEngine::default(), Box::new(JsonParser));

    polluter.pollute(&mut INPUT.as_bytes()).await.unwrap();

    assert_eq!(
        *polluter.engine().executed.lock().unwrap(),
        vec![Put("users".to_string()), Put("roles".to_string())]
    );
}

#[tokio::test]
async fn test_parse_failure_skips_build_and_exec() {
    let polluter = Polluter::new(FakeEngine::default(), failing_parser());

    let err = polluter.pollute(&mut INPUT.as_bytes()).await.unwrap_err();

    assert!(matches!(err, PolluteError::Parse(_)));
    assert_eq!(err.stage(), "parse");
    assert_eq!(
        err.to_string(),
        "parse failed: document root must be a mapping, found array"
    );
    assert_eq!(*polluter.engine().built.lock().unwrap(), 0);
    assert!(polluter.engine().executed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_document_is_a_parse_failure() {
    let polluter = Polluter::new(FakeEngine::default(), Box::new(JsonParser));

    let err = polluter.pollute(&mut "{not json".as_bytes()).await.unwrap_err();

    assert!(matches!(err, PolluteError::Parse(ParseError::Json(_))));
    assert!(err.to_string().starts_with("parse failed: "));
}

#[tokio::test]
async fn test_build_failure_skips_exec() {
    let engine = FakeEngine {
        fail_build: true,
        ..FakeEngine::default()
    };
    let polluter = Polluter::new(engine, Box::new(JsonParser));

    let err = polluter.pollute(&mut INPUT.as_bytes()).await.unwrap_err();

    assert!(matches!(err, PolluteError::Build(_)));
    assert_eq!(
        err.to_string(),
        "build commands failed: failed to decode `users`: unsupported"
    );
    assert!(polluter.engine().executed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_exec_failure_is_tagged() {
    let engine = FakeEngine {
        fail_exec: true,
        ..FakeEngine::default()
    };
    let polluter = Polluter::new(engine, Box::new(JsonParser));

    let err = polluter.pollute(&mut INPUT.as_bytes()).await.unwrap_err();

    assert_eq!(err.stage(), "exec");
    assert_eq!(
        err.to_string(),
        "exec failed: command #0 on `users` failed: connection refused"
    );
}

#[test]
fn test_build_only_does_not_execute() {
    let polluter = Polluter::new(FakeEngine::default(), Box::new(YamlParser));

    let commands = polluter
        .build_only(&mut "roles: []\nusers: []\n".as_bytes())
        .unwrap();

    assert_eq!(
        commands.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["PUT roles", "PUT users"]
    );
    assert!(polluter.engine().executed.lock().unwrap().is_empty());
}

#[test]
fn test_pollute_with_tokio_test_block_on() {
    let polluter = Polluter::new(FakeEngine::default(), Box::new(YamlParser));

    tokio_test::block_on(polluter.pollute(&mut "counters:\n- n: 1\n".as_bytes())).unwrap();

    assert_eq!(polluter.engine().executed.lock().unwrap().len(), 1);
}

#[test]
fn test_build_commands_with_backend_builders() {
    let sets = build_commands(&YamlParser, &mut "count: 1\n".as_bytes(), |tree| {
        polluter::redis::build_sets(tree)
    })
    .unwrap();
    assert_eq!(sets[0].to_string(), r#"SET count = "1""#);

    let inserts = build_commands(
        &JsonParser,
        &mut r#"{"users":[{"id":1,"name":"Roman"}]}"#.as_bytes(),
        |tree| polluter::SqlBuilder::new(polluter::postgresql::PostgreSQLDialect).build(tree),
    )
    .unwrap();
    assert_eq!(
        inserts[0].to_string(),
        r#"INSERT INTO "users" ("id", "name") VALUES ($1, $2);"#
    );
    assert_eq!(inserts[0].args, vec![serde_json::json!(1), serde_json::json!("Roman")]);

    let err = build_commands(&JsonParser, &mut r#"{"users":1}"#.as_bytes(), |tree| {
        polluter::mongodb::build_documents(tree)
    })
    .unwrap_err();
    assert!(matches!(
        err,
        PolluteError::Build(BuildError::NotRecordSequence { .. })
    ));
}
