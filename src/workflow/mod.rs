//! 流程层（Workflow）
//!
//! - `poller` - 单个 token 的轮询
//! - `run_session` - 代码、语言、测试用例以及上一次运行结果的会话状态

pub mod poller;
pub mod run_session;

pub use poller::{poll_until_terminal, PollPolicy};
pub use run_session::{RunError, RunErrorKind, RunSession, RunState};
