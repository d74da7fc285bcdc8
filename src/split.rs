use super::errors::{CasError, Result};
use std::process::{Child, Command, Stdio};

/// Starts an external command and hands back something that identifies it.
/// Launched jobs are never waited on.
pub trait Launcher {
    type Handle;

    fn launch(&mut self, command: &str) -> Result<Self::Handle>;
}

/// Runs each command through `sh -c` in the current directory.
#[derive(Debug, Default)]
pub struct LocalLauncher;

impl Launcher for LocalLauncher {
    type Handle = Child;

    fn launch(&mut self, command: &str) -> Result<Child> {
        log::info!("Launching: {}", command);
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| CasError::Launch {
                command: command.to_string(),
                source,
            })
    }
}

/// Submits each command to a grid engine with `qsub`, working in the current directory.
#[derive(Debug)]
pub struct GridLauncher {
    pub qsub: String,
    jobs: usize,
}

impl Default for GridLauncher {
    fn default() -> Self {
        GridLauncher {
            qsub: "qsub".to_string(),
            jobs: 0,
        }
    }
}

impl GridLauncher {
    /// The arguments handed to `qsub` for one command.
    /// # Example
    /// ```
    /// use castools::split::GridLauncher;
    /// let args = GridLauncher::submit_args("sub_assembly -a x.cas", 3);
    /// assert_eq!(args[..6], ["-cwd", "-b", "y", "-j", "y", "-N"]);
    /// assert_eq!(args[6], "castools_3");
    /// assert_eq!(args[7], "sub_assembly -a x.cas");
    /// ```
    pub fn submit_args(command: &str, job: usize) -> Vec<String> {
        let mut args: Vec<String> = ["-cwd", "-b", "y", "-j", "y", "-N"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(format!("castools_{}", job));
        args.push(command.to_string());
        args
    }
}

impl Launcher for GridLauncher {
    type Handle = Child;

    fn launch(&mut self, command: &str) -> Result<Child> {
        self.jobs += 1;
        log::info!("Submitting: {}", command);
        Command::new(&self.qsub)
            .args(GridLauncher::submit_args(command, self.jobs))
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| CasError::Launch {
                command: command.to_string(),
                source,
            })
    }
}

/// `sub_assembly` call that pulls reference `idx` out of `casfile`.
/// # Example
/// ```
/// use castools::split::split_command;
/// assert_eq!(
///     split_command("foo.cas", 2),
///     "sub_assembly -a foo.cas -o sa.2.cas -s 2 -e sa.2.pairs.fasta -f sa.2.fragments.fasta -g sa.2.ref.fasta"
/// );
/// ```
pub fn split_command(casfile: &str, idx: u64) -> String {
    format!(
        "sub_assembly -a {casfile} -o sa.{i}.cas -s {i} -e sa.{i}.pairs.fasta -f sa.{i}.fragments.fasta -g sa.{i}.ref.fasta",
        casfile = casfile,
        i = idx
    )
}

/// Launch one `sub_assembly` per reference index in `start..=end`.
pub fn split_assembly<L: Launcher>(
    casfile: &str,
    start: u64,
    end: u64,
    launcher: &mut L,
) -> Result<Vec<L::Handle>> {
    if start > end {
        log::warn!("Start index {} is after end index {}, nothing to do.", start, end);
    }
    (start..=end)
        .map(|idx| launcher.launch(&split_command(casfile, idx)))
        .collect()
}
