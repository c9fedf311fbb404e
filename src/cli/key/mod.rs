//! Key command - prints the composite key for textual arguments

use clap::Args;

use crate::domain::cache::{Argument, ArgumentKeyGenerator, KeyGenerator};

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Arguments of the call, in order
    pub arguments: Vec<String>,

    /// Arguments equal to this token are passed as null
    #[arg(long, default_value = "~")]
    pub null_marker: String,
}

pub fn run(args: KeyArgs) -> anyhow::Result<()> {
    println!("{}", generate(&args)?);
    Ok(())
}

fn generate(args: &KeyArgs) -> anyhow::Result<String> {
    let arguments: Vec<Argument<'_>> = args
        .arguments
        .iter()
        .map(|value| {
            if *value == args.null_marker {
                Argument::null()
            } else {
                Argument::of(value)
            }
        })
        .collect();

    let generator = ArgumentKeyGenerator::default();
    Ok(generator.generate(&(), "cli", &arguments)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_args(arguments: &[&str]) -> KeyArgs {
        KeyArgs {
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            null_marker: "~".to_string(),
        }
    }

    #[test]
    fn test_generate_joins_arguments() {
        assert_eq!(generate(&key_args(&["foo", "42"])).unwrap(), "foo,42");
    }

    #[test]
    fn test_generate_null_marker() {
        assert_eq!(generate(&key_args(&["~", "a", "~"])).unwrap(), ",a,");
    }

    #[test]
    fn test_generate_no_arguments() {
        assert_eq!(generate(&key_args(&[])).unwrap(), "");
    }
}
