//! 应用入口
//!
//! 读取题目 TOML 与源代码文件，组装评测客户端和运行器，运行一次并输出每个用例的结果

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::clients::Judge0Client;
use crate::config::Config;
use crate::models::result::{CaseVerdict, ExecutionResult};
use crate::models::{load_problem_run, load_source, ActionResponse, ProblemRun};
use crate::orchestrator::{CodeRunner, RunReport};
use crate::utils::logging::{log_run_summary, log_startup, truncate_text};
use crate::workflow::{PollPolicy, RunErrorKind, RunSession};

/// 应用主结构
pub struct App {
    config: Config,
    runner: CodeRunner<Judge0Client>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = Judge0Client::new(&config);
        let runner = CodeRunner::new(client, PollPolicy::from_config(&config))
            .context("创建代码运行器失败")?;

        Ok(Self { config, runner })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let problem = load_problem_run(Path::new(&self.config.problem_file))
            .await
            .with_context(|| format!("加载题目失败: {}", self.config.problem_file))?;

        let mut session = self.prepare_session(&problem).await?;
        info!(
            "\n📝 题目: {} | 语言: {} | 用例数: {}",
            problem.name,
            session.language(),
            session.test_cases().len()
        );

        let report = self.runner.run(&mut session).await;

        print_case_results(&session, &report);
        log_run_summary(&problem.name, &report);

        let response = ActionResponse::ok(&report);
        debug!("运行报告: {}", serde_json::to_string_pretty(&response)?);

        match &report.error {
            None => Ok(()),
            Some(err) if err.kind == RunErrorKind::Compilation => {
                bail!("编译失败: {}", first_line(err.stderr.as_deref()))
            }
            Some(err) => bail!("运行失败: {}", err),
        }
    }

    /// 用题目、语言和源代码文件构建会话
    async fn prepare_session(&self, problem: &ProblemRun) -> Result<RunSession> {
        let mut session = RunSession::from_problem(problem);

        if let Some(language) = &self.config.language {
            session
                .set_language_by_name(language)
                .with_context(|| format!("无法切换到语言: {}", language))?;
        }

        match &self.config.source_file {
            Some(path) => {
                let code = load_source(Path::new(path))
                    .await
                    .with_context(|| format!("读取源代码失败: {}", path))?;
                session.set_code(code);
            }
            None => warn!("⚠️ 未指定 SOURCE_FILE，使用题目模板或语言默认代码"),
        }

        Ok(session)
    }
}

/// 逐个输出用例结果
fn print_case_results(session: &RunSession, report: &RunReport) {
    for (index, result) in report.results.iter().enumerate() {
        let expected = session
            .test_cases()
            .get(index)
            .and_then(|case| case.expected_output.as_deref());
        info!("{}", describe_case(index, result, expected));
    }

    for annotation in session.annotations() {
        info!(
            "  ↳ 第 {} 行第 {} 列 [{:?}] {}",
            annotation.row + 1,
            annotation.column + 1,
            annotation.severity,
            annotation.text
        );
    }
}

fn describe_case(index: usize, result: &ExecutionResult, expected: Option<&str>) -> String {
    let icon = match result.verdict() {
        CaseVerdict::Accepted => "✅",
        CaseVerdict::Pending => "⏳",
        _ => "❌",
    };
    let status = result
        .status
        .as_ref()
        .map(|s| s.description.as_str())
        .unwrap_or("Unknown");
    let mut line = format!("{} 用例 {}: {}", icon, index + 1, status);
    if let Some(time) = &result.time {
        line.push_str(&format!(" | {}s", time));
    }
    if let Some(memory) = result.memory {
        line.push_str(&format!(" | {} KB", memory));
    }
    if result.verdict() == CaseVerdict::WrongAnswer {
        line.push_str(&format!(
            "\n    期望: {}\n    实际: {}",
            truncate_text(expected.unwrap_or_default().trim_end(), 80),
            truncate_text(result.stdout.as_deref().unwrap_or_default().trim_end(), 80)
        ));
    }
    if let Some(output) = result.error_output() {
        line.push_str(&format!("\n    {}", truncate_text(first_line(Some(output)), 80)));
    }
    line
}

fn first_line(text: Option<&str>) -> &str {
    text.and_then(|t| t.lines().next()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::JudgeStatus;

    #[test]
    fn test_describe_wrong_answer() {
        let result = ExecutionResult {
            status: Some(JudgeStatus::new(4, "Wrong Answer")),
            stdout: Some("5\n".to_string()),
            time: Some(0.01),
            ..Default::default()
        };
        let line = describe_case(1, &result, Some("4\n"));
        assert!(line.starts_with("❌ 用例 2: Wrong Answer | 0.01s"));
        assert!(line.contains("期望: 4"));
        assert!(line.contains("实际: 5"));
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line(Some("a\nb")), "a");
        assert_eq!(first_line(None), "");
    }
}
