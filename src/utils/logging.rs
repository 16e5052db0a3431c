/// 日志工具模块
///
/// 提供日志初始化和输出格式化的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunReport;

/// 初始化日志
///
/// 默认级别为 info，`verbose` 为 true 时为 debug；设置了 `RUST_LOG` 时以它为准
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 评测服务: {}", config.judge_api_base_url);
    info!("⏱️ 轮询间隔: {} ms", config.poll_interval_ms);
    match config.max_poll_attempts {
        Some(max) => info!("🔁 最大轮询次数: {}", max),
        None => info!("🔁 最大轮询次数: 不限"),
    }
    info!("{}", "=".repeat(60));
}

/// 打印一次运行的统计信息
///
/// # 参数
/// - `problem_name`: 题目名称
/// - `report`: 运行结果
pub fn log_run_summary(problem_name: &str, report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行完成统计: {}", problem_name);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📌 状态: {:?}", report.state);
    info!("✅ 通过: {}/{}", report.passed_count(), report.results.len());
    if let Some(error) = &report.error {
        info!("❌ 错误: {}", error);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
