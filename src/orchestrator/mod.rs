//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! app::App (读取配置、题目和源文件)
//!     ↓
//! code_runner (一次运行：校验 → 批量提交 → 轮询首个用例 → 并发轮询其余用例)
//!     ↓
//! workflow (poller / RunSession)
//!     ↓
//! services (能力层：提交、取回结果、诊断解析)
//!     ↓
//! clients (评测服务 HTTP 接口)
//! ```

pub mod code_runner;

pub use code_runner::{CodeRunner, RunReport};
