use super::msi::UninstallInvocation;
use crate::modules::common::error::PurgeError;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// 轮询子进程状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 卸载进程的退出信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// 被信号终止时没有退出码
    pub code: Option<i32>,
}

impl ProcessExit {
    /// 0 以及 MSI 的"需要重启"代码 (1641, 3010) 视为成功
    pub fn is_success(&self) -> bool {
        matches!(self.code, Some(0) | Some(1641) | Some(3010))
    }
}

/// 同步启动并等待卸载进程
pub trait ProcessRunner {
    fn run(
        &self,
        invocation: &UninstallInvocation,
        timeout: Duration,
    ) -> Result<ProcessExit, PurgeError>;
}

/// 基于 std::process 的实现，超时后结束子进程
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        invocation: &UninstallInvocation,
        timeout: Duration,
    ) -> Result<ProcessExit, PurgeError> {
        let mut command = build_command(invocation);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = command
            .spawn()
            .map_err(|e| PurgeError::Process(format!("无法启动 {}: {}", invocation.program(), e)))?;

        tracing::debug!("卸载进程 PID: {}", child.id());

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(ProcessExit {
                    code: status.code(),
                });
            }

            if Instant::now() >= deadline {
                // cmd.exe 启动的卸载程序必须一起结束，否则后续阶段会和它同时操作文件
                if let Err(e) = kill_process_tree(&mut child) {
                    tracing::warn!("结束超时进程失败 (PID {}): {}", child.id(), e);
                }
                let _ = child.wait();
                return Err(PurgeError::Timeout(format!(
                    "{} 在 {} 秒内未结束",
                    invocation,
                    timeout.as_secs()
                )));
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(windows)]
fn build_command(invocation: &UninstallInvocation) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new(invocation.program());
    match invocation {
        UninstallInvocation::Msi { .. } => {
            command.args(invocation.args());
        }
        // 卸载命令自带引号，原样交给 cmd
        UninstallInvocation::Shell { command_line } => {
            command.arg("/C").raw_arg(format!("\"{}\"", command_line));
        }
    }
    command
}

#[cfg(not(windows))]
fn build_command(invocation: &UninstallInvocation) -> Command {
    let mut command = Command::new(invocation.program());
    command.args(invocation.args());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // 独立进程组，超时时整组结束
        command.process_group(0);
    }
    command
}

/// 结束进程及其启动的全部子进程
#[cfg(windows)]
fn kill_process_tree(child: &mut Child) -> Result<(), PurgeError> {
    use std::os::windows::process::CommandExt;

    let status = Command::new("taskkill")
        .args(["/T", "/F", "/PID", &child.id().to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(0x08000000) // CREATE_NO_WINDOW
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => {
            tracing::debug!("taskkill 退出码 {:?}，改为只结束主进程", status.code());
            child.kill().map_err(PurgeError::from)
        }
        Err(e) => {
            tracing::debug!("无法执行 taskkill: {}", e);
            child.kill().map_err(PurgeError::from)
        }
    }
}

/// 结束子进程所在的进程组
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) -> Result<(), PurgeError> {
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{}", child.id())])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        _ => child.kill().map_err(PurgeError::from),
    }
}

#[cfg(not(any(windows, unix)))]
fn kill_process_tree(child: &mut Child) -> Result<(), PurgeError> {
    child.kill().map_err(PurgeError::from)
}
