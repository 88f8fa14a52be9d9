//! Ordered command registry.

use tracing::debug;

use super::command::{
    CalibrationDoneCommand, CalibrationRequiredCommand, Command, CommandActions, CommandOutcome,
    CoordinateCommand,
};
use super::ProtocolError;

/// Tries each registered [`Command`] in order; the first match executes.
///
/// The registry is fixed at construction.  The default order puts the
/// coordinate command first, ahead of the literal calibration tokens.
pub struct CommandParser {
    commands: Vec<Box<dyn Command>>,
}

impl CommandParser {
    /// Creates a parser with the default registry.
    pub fn new() -> Self {
        Self::with_commands(vec![
            Box::new(CoordinateCommand),
            Box::new(CalibrationRequiredCommand),
            Box::new(CalibrationDoneCommand),
        ])
    }

    /// Creates a parser over a caller-supplied registry, tried in the given order.
    pub fn with_commands(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    /// Names of the registered commands, in priority order.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Classifies `line` and executes the first matching command.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::UnknownCommand`] if no command matches.
    /// - Any error returned by the matching command's `execute`.
    pub fn parse(
        &self,
        line: &str,
        actions: &dyn CommandActions,
    ) -> Result<CommandOutcome, ProtocolError> {
        let command = self
            .commands
            .iter()
            .find(|c| c.matches(line))
            .ok_or_else(|| ProtocolError::UnknownCommand(line.to_string()))?;
        debug!(command = command.name(), "dispatching line {line:?}");
        command.execute(line, actions)
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
