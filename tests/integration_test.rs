use judge_runner::clients::fake::{FakeResult, JudgeCall};
use judge_runner::models::loaders::parse_problem_run;
use judge_runner::models::ActionResponse;
use judge_runner::utils::logging;
use judge_runner::{
    CodeRunner, Config, Judge0Client, Language, PollPolicy, RunErrorKind, RunSession, RunState,
    ScriptedJudge,
};
use std::time::Duration;

const PROBLEM: &str = r#"
name = "A + B"
language_id = 71
allowed_languages = ["python", "cpp"]

[[test_cases]]
stdin = "1 2"
expected_output = "3"

[[test_cases]]
stdin = "2 2"
expected_output = "4"

[[test_cases]]
stdin = "5 5"
expected_output = "10"
"#;

fn fast() -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts: Some(10),
    }
}

#[tokio::test]
async fn test_problem_file_run_end_to_end() {
    logging::init(true);

    let problem = parse_problem_run(PROBLEM).expect("解析题目失败");
    let mut session = RunSession::from_problem(&problem);
    assert_eq!(session.language(), Language::Python);
    session.set_code("a, b = map(int, input().split())\nprint(a + b + (a == 2))\n");

    let judge = ScriptedJudge::new()
        .with_tokens(["t0", "t1", "t2"])
        .with_result("t0", FakeResult::processing().build())
        .with_result("t0", FakeResult::accepted("3\n").build())
        .with_result("t1", FakeResult::status(4, "Wrong Answer").stdout("5\n").build())
        .with_result("t2", FakeResult::accepted("10\n").build());
    let runner = CodeRunner::new(judge, fast()).expect("创建运行器失败");

    let report = runner.run(&mut session).await;

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[1].status.as_ref().map(|s| s.id), Some(4));
    assert_eq!(report.passed_count(), 2);

    let calls = runner.service().judge().calls();
    assert_eq!(
        calls[0],
        JudgeCall::CreateBatch(vec![
            Some("1 2".to_string()),
            Some("2 2".to_string()),
            Some("5 5".to_string())
        ])
    );

    let json = serde_json::to_value(ActionResponse::ok(&report)).expect("序列化失败");
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["state"], "done");
}

#[tokio::test]
async fn test_python_syntax_error_fails_fast() {
    let problem = parse_problem_run(PROBLEM).expect("解析题目失败");
    let mut session = RunSession::from_problem(&problem);
    session.set_code("print(1\n");

    let judge = ScriptedJudge::new()
        .with_tokens(["t0", "t1", "t2"])
        .with_result(
            "t0",
            FakeResult::status(6, "Compilation Error")
                .compile_output(
                    "  File \"script.py\", line 1\n    print(1\n          ^\nSyntaxError: '(' was never closed\n",
                )
                .build(),
        );
    let runner = CodeRunner::new(judge, fast()).expect("创建运行器失败");

    let report = runner.run(&mut session).await;

    assert_eq!(report.state, RunState::DoneWithDiagnostics);
    assert_eq!(report.error.map(|e| e.kind), Some(RunErrorKind::Compilation));
    assert_eq!(session.annotations()[0].row, 0);
    assert_eq!(runner.service().judge().fetch_count("t1"), 0);
    assert_eq!(runner.service().judge().fetch_count("t2"), 0);
}

#[tokio::test]
#[ignore] // 默认忽略，需要本地评测服务：cargo test -- --ignored
async fn test_live_judge_run() {
    logging::init(true);

    let config = Config::from_env().expect("加载配置失败");
    let client = Judge0Client::new(&config);
    let runner = CodeRunner::new(client, PollPolicy::from_config(&config)).expect("创建运行器失败");

    let problem = parse_problem_run(PROBLEM).expect("解析题目失败");
    let mut session = RunSession::from_problem(&problem);
    session.set_code("a, b = map(int, input().split())\nprint(a + b)\n");

    let report = runner.run(&mut session).await;

    assert!(report.is_success(), "运行应该成功: {:?}", report.error);
    assert_eq!(report.passed_count(), 3);
}
