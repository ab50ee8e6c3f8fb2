//! Program execution (call submission)
//!
//! Submits an encoded median call to the chain. The medianator only hands
//! over already-encoded arguments; account and key handling live behind this
//! trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::process::Command;

use crate::config::ExecutorConfig;
use crate::error::{MedianatorError, Result};

const COLLABORATOR: &str = "executor";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramExecutor: Send + Sync {
    async fn execute(
        &self,
        program_name: &str,
        function_name: &str,
        fee: Decimal,
        inputs: &[String],
    ) -> Result<()>;
}

/// Logs the call instead of submitting it
#[derive(Debug, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl ProgramExecutor for DryRunExecutor {
    async fn execute(
        &self,
        program_name: &str,
        function_name: &str,
        fee: Decimal,
        inputs: &[String],
    ) -> Result<()> {
        tracing::info!(
            program = %program_name,
            function = %function_name,
            fee = %fee,
            inputs = ?inputs,
            "[DRY RUN] Would execute program call"
        );
        Ok(())
    }
}

/// Runs `<command> <args..> <program> <function> <inputs..> --fee <fee>`
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: String,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    fn command_args(
        &self,
        program_name: &str,
        function_name: &str,
        fee: Decimal,
        inputs: &[String],
    ) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(program_name.to_string());
        args.push(function_name.to_string());
        args.extend(inputs.iter().cloned());
        args.push("--fee".to_string());
        args.push(fee.to_string());
        args
    }
}

#[async_trait]
impl ProgramExecutor for CommandExecutor {
    async fn execute(
        &self,
        program_name: &str,
        function_name: &str,
        fee: Decimal,
        inputs: &[String],
    ) -> Result<()> {
        let args = self.command_args(program_name, function_name, fee, inputs);
        tracing::info!(
            command = %self.command,
            program = %program_name,
            function = %function_name,
            fee = %fee,
            "Executing program call"
        );

        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(MedianatorError::collaborator(
                COLLABORATOR,
                format!(
                    "{} exited with {}: {}",
                    self.command,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        tracing::debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "Program call output");
        Ok(())
    }
}

/// Executor selected by configuration
pub fn from_config(config: &ExecutorConfig) -> Result<Box<dyn ProgramExecutor>> {
    match config.mode.as_str() {
        "dry_run" => Ok(Box::new(DryRunExecutor)),
        "command" => Ok(Box::new(CommandExecutor::new(
            config.command.clone(),
            config.args.clone(),
        ))),
        other => Err(MedianatorError::collaborator(
            COLLABORATOR,
            format!("unknown executor mode {:?} (expected dry_run or command)", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn command_args_order() {
        let executor = CommandExecutor::new("snarkos", vec!["developer".into(), "execute".into()]);
        let args = executor.command_args(
            "medianator.aleo",
            "medianator_set_median",
            dec!(0.15),
            &["1u8".to_string(), "[1u64]".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "developer",
                "execute",
                "medianator.aleo",
                "medianator_set_median",
                "1u8",
                "[1u64]",
                "--fee",
                "0.15"
            ]
        );
    }

    #[test]
    fn from_config_rejects_unknown_mode() {
        let config = ExecutorConfig {
            mode: "carrier_pigeon".to_string(),
            command: String::new(),
            args: Vec::new(),
        };
        assert!(from_config(&config).is_err());
    }

    #[test]
    fn dry_run_always_succeeds() {
        let result = tokio_test::block_on(DryRunExecutor.execute("p.aleo", "f", dec!(0.15), &[]));
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failing_command_is_collaborator_error() {
        let executor = CommandExecutor::new("/nonexistent/snarkos", Vec::new());
        let err = executor
            .execute("p.aleo", "f", dec!(0.15), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, MedianatorError::Collaborator { collaborator: "executor", .. }));
    }
}
