use crate::error::{AppError, AppResult, FileError};
use crate::models::problem::ProblemRun;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载题目运行配置
pub async fn load_problem_run(toml_file_path: &Path) -> AppResult<ProblemRun> {
    let path_str = toml_file_path.display().to_string();

    if !toml_file_path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let mut problem = parse_problem_run(&content).map_err(|source| FileError::TomlParseFailed {
        path: path_str.clone(),
        source,
    })?;

    problem.file_path = Some(path_str);

    tracing::info!(
        "成功加载题目 {}，共 {} 个测试用例",
        problem.name,
        problem.test_cases.len()
    );

    Ok(problem)
}

/// 解析 TOML 文本
pub fn parse_problem_run(content: &str) -> Result<ProblemRun, toml::de::Error> {
    toml::from_str(content)
}

/// 读取源代码文件
pub async fn load_source(path: &Path) -> AppResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}
