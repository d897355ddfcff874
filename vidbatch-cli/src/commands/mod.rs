//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `encode` command.
/// This command runs every matched file through the encoder and optionally
/// concatenates the results.
pub mod encode;

/// Module containing the implementation of the `plan` command.
/// This command prints the derived filter chain and arguments without encoding.
pub mod plan;

use vidbatch_core::CoreError;

/// Hint shown under a precondition error, when one applies.
#[must_use]
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => {
            Some("Install ffmpeg or point --encoder (VIDBATCH_ENCODER) at the executable")
        }
        CoreError::NoFilesFound(_) | CoreError::InvalidInputMask { .. } => {
            Some("Check the --input-mask pattern; quote it so the shell does not expand it")
        }
        CoreError::ConfigRead { .. } | CoreError::ConfigParse(_) => {
            Some("Check the --config path and its TOML syntax")
        }
        CoreError::OutputDir { .. } => Some("Choose a writable --output-dir"),
        CoreError::OutputCollision { .. } => {
            Some("Narrow the --input-mask or rename one of the inputs")
        }
        CoreError::ConcatOutputCollision { .. } => {
            Some("Pick a concat output_name that no input maps to")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions() {
        assert!(suggestion_for(&CoreError::DependencyNotFound("ffmpeg".into())).is_some());
        assert!(suggestion_for(&CoreError::NoFilesFound("*.mov".into())).is_some());
        assert!(
            suggestion_for(&CoreError::OutputCollision {
                output: "/out/a.mp4".into(),
                first: "a.mkv".into(),
                second: "a.mov".into(),
            })
            .is_some()
        );
        assert!(suggestion_for(&CoreError::Config("quality".into())).is_none());
    }
}
