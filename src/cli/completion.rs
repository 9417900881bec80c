//! completion 命令 - 生成 shell 补全脚本
//!
//! ```text
//! source <(prw completion bash)
//! prw completion zsh > "${fpath[1]}/_prw"
//! prw completion fish | source
//! prw completion powershell | Out-String | Invoke-Expression
//! ```

use clap::Args;
use clap_complete::Shell;
use std::io::Write;

/// completion 命令参数
#[derive(Args)]
pub struct CompletionArgs {
    /// bash, zsh, fish, powershell 或 elvish
    pub shell: Shell,
}

/// 把 `command` 的补全脚本写到 `out`
pub fn write_completion(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    clap_complete::generate(shell, command, "prw", out);
}

/// 处理 completion 命令，输出到 stdout
pub fn handle_completion(args: CompletionArgs, command: &mut clap::Command) {
    write_completion(args.shell, command, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn command() -> Command {
        Command::new("prw")
            .subcommand(Command::new("watch").arg(Arg::new("url")))
            .subcommand(Command::new("broadcast"))
    }

    #[test]
    fn test_bash_completion_lists_subcommands() {
        let mut out = Vec::new();
        write_completion(Shell::Bash, &mut command(), &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("prw"));
        assert!(script.contains("watch"));
        assert!(script.contains("broadcast"));
    }

    #[test]
    fn test_every_shell_produces_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut out = Vec::new();
            write_completion(shell, &mut command(), &mut out);
            assert!(!out.is_empty(), "{shell} completion should not be empty");
        }
    }
}
