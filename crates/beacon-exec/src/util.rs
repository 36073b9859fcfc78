use std::path::Path;

use tokio::process::{Child, Command};

pub fn cmd_program(program: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

#[cfg(target_family = "unix")]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    if let Some(id) = child.id() {
        // SAFETY: kill(2) on a pid we spawned and have not reaped yet.
        unsafe {
            libc::kill(id as libc::pid_t, libc::SIGTERM);
        }
    }
    let _ = child.kill().await;
    Ok(())
}

#[cfg(not(target_family = "unix"))]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    child.kill().await
}
