//! # Judge Runner
//!
//! 把一段源代码和一组测试用例交给 Judge0 兼容的评测服务运行，
//! 并把编译器 / 解释器输出解析成编辑器可用的标注
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 评测服务 HTTP 调用
//! - `JudgeApi` - 批量提交 / 查询结果的接缝，测试中由 `ScriptedJudge` 替换（`test-util` feature）
//! - `Judge0Client` - reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个提交或单个 token
//! - `SubmissionService` - 校验并创建批量提交，取回并解码结果
//! - `DiagnosticParser` - 按优先级匹配 7 种诊断格式
//! - `annotation_projector` - 诊断 → 编辑器标注 / 标记
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 单个 token 的轮询和运行会话状态
//! - `PollPolicy` / `poll_until_terminal` - 固定间隔轮询直到终态
//! - `RunSession` - 代码、语言、测试用例和上一次运行的结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/code_runner` - 一次完整运行：校验 → 提交 → 首个用例 → 其余用例
//! - `app` - 命令行入口：读取配置、题目和源文件
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
#[cfg(any(test, feature = "test-util"))]
pub use clients::ScriptedJudge;
pub use clients::{Judge0Client, JudgeApi};
pub use config::Config;
pub use error::{AppError, AppResult, TransportError, ValidationError};
pub use models::{ExecutionResult, Language, ProblemRun, TestCase};
pub use orchestrator::{CodeRunner, RunReport};
pub use services::SubmissionService;
pub use workflow::{PollPolicy, RunError, RunErrorKind, RunSession, RunState};
