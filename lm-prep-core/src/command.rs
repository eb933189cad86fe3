//! Typed invocations of external tools.
//!
//! Each tool gets a builder implementing `ToolCommand`. Arguments are
//! produced from typed fields and checked by `validate` before anything is
//! spawned, so a bad parameter combination surfaces as a `PrepError`
//! instead of the tool's own usage message.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{PrepError, Result};

/// An external program invocation.
pub trait ToolCommand {
	/// Path (or bare name, resolved through `PATH`) of the executable.
	fn program(&self) -> &Path;

	/// Arguments, in order, without the program itself.
	fn args(&self) -> Vec<OsString>;

	/// Checks parameter compatibility before the program is started.
	fn validate(&self) -> Result<()> {
		Ok(())
	}

	fn to_command(&self) -> Command {
		let mut command = Command::new(self.program());
		command.args(self.args());
		command
	}

	/// Shell-like rendering, for logs.
	fn command_line(&self) -> String {
		let mut line = self.program().display().to_string();
		for arg in self.args() {
			line.push(' ');
			line.push_str(&arg.to_string_lossy());
		}
		line
	}
}

/// Validates and runs a tool to completion.
///
/// The tool inherits stdout/stderr. There is no timeout and no retry.
///
/// # Errors
/// - Whatever `validate` reports
/// - `CommandSpawn` if the program cannot be started
/// - `CommandFailed` with the exit code if it exits unsuccessfully
pub fn run_tool<C: ToolCommand + ?Sized>(tool: &C) -> Result<()> {
	tool.validate()?;

	let program = tool.program().display().to_string();
	info!("Running: {}", tool.command_line());

	let status = tool
		.to_command()
		.status()
		.map_err(|source| PrepError::CommandSpawn { program: program.clone(), source })?;

	if !status.success() {
		return Err(PrepError::CommandFailed { program, code: status.code() });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	struct Echo {
		program: PathBuf,
		words: Vec<&'static str>,
	}

	impl ToolCommand for Echo {
		fn program(&self) -> &Path {
			&self.program
		}

		fn args(&self) -> Vec<OsString> {
			self.words.iter().map(OsString::from).collect()
		}

		fn validate(&self) -> Result<()> {
			if self.words.is_empty() {
				return Err(PrepError::InvalidConfig("nothing to say".to_owned()));
			}
			Ok(())
		}
	}

	#[test]
	fn command_line_joins_program_and_args() {
		let echo = Echo { program: PathBuf::from("/bin/echo"), words: vec!["a", "b c"] };
		assert_eq!(echo.command_line(), "/bin/echo a b c");
		assert_eq!(echo.to_command().get_args().count(), 2);
	}

	#[test]
	fn validation_runs_before_spawning() {
		let echo = Echo { program: PathBuf::from("/definitely/not/here"), words: Vec::new() };
		assert!(matches!(run_tool(&echo), Err(PrepError::InvalidConfig(_))));
	}

	#[test]
	fn missing_program_is_a_spawn_error() {
		let echo = Echo { program: PathBuf::from("/definitely/not/here"), words: vec!["x"] };
		assert!(matches!(run_tool(&echo), Err(PrepError::CommandSpawn { .. })));
	}
}
