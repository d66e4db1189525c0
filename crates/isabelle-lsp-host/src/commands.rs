//! User commands exposed to the editor.

use strum::{Display, EnumString};

/// Commands the host registers for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum UserCommand {
    /// Focus the output panel.
    ShowOutput,
    /// Focus the state panel.
    ShowState,
    /// Focus the progress panel.
    ShowProgress,
    /// Open all three panels.
    OpenAllWindows,
    /// Ask the server for a fresh progress push.
    RequestProgressRefresh,
}

impl UserCommand {
    /// Every command, in registration order.
    pub const ALL: [Self; 5] = [
        Self::ShowOutput,
        Self::ShowState,
        Self::ShowProgress,
        Self::OpenAllWindows,
        Self::RequestProgressRefresh,
    ];
}

/// Errors encountered while parsing a [`UserCommand`] from its name.
pub type CommandParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("show-output", UserCommand::ShowOutput)]
    #[case("show-state", UserCommand::ShowState)]
    #[case("show-progress", UserCommand::ShowProgress)]
    #[case("open-all-windows", UserCommand::OpenAllWindows)]
    #[case("Request-Progress-Refresh", UserCommand::RequestProgressRefresh)]
    fn parses_command_names(#[case] name: &str, #[case] expected: UserCommand) {
        assert_eq!(name.parse::<UserCommand>(), Ok(expected));
    }

    #[rstest]
    fn names_round_trip_through_display() {
        for command in UserCommand::ALL {
            assert_eq!(command.to_string().parse::<UserCommand>(), Ok(command));
        }
    }

    #[rstest]
    fn rejects_unknown_command() {
        assert!("show-everything".parse::<UserCommand>().is_err());
    }
}
