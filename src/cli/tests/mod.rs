//! Registry, argument validation and formatting.

use async_trait::async_trait;

use crate::cli::{
    ArgType, CliError, Command, CommandArg, CommandMetadata, CommandRegistry, CommandResult,
    formatting::{format_power, format_volume},
};

struct Echo;

#[async_trait]
impl Command for Echo {
    async fn execute(&self, args: &[String]) -> CommandResult {
        Ok(args.join(" "))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "echo".to_string(),
            description: "Repeat the arguments".to_string(),
            category: "test".to_string(),
            args: vec![
                CommandArg::required("first", "First word", ArgType::String),
                CommandArg::optional("second", "Second word", ArgType::String),
            ],
            examples: vec![],
        }
    }
}

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register_command("test", Box::new(Echo));
    registry
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[tokio::test]
async fn execute_runs_registered_command() {
    let output = registry()
        .execute("test", "echo", &args(&["hello", "there"]))
        .await
        .unwrap();

    assert_eq!(output, "hello there");
}

#[tokio::test]
async fn unknown_category_and_command_are_reported() {
    let registry = registry();

    assert!(matches!(
        registry.execute("nope", "echo", &[]).await,
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(
        registry.execute("test", "nope", &[]).await,
        Err(CliError::CommandNotFound(_))
    ));
}

#[tokio::test]
async fn argument_count_is_checked_before_execution() {
    let registry = registry();

    let too_few = registry.execute("test", "echo", &[]).await;
    let too_many = registry
        .execute("test", "echo", &args(&["a", "b", "c"]))
        .await;

    assert!(matches!(too_few, Err(CliError::InvalidArguments(msg)) if msg.contains("<first>")));
    assert!(matches!(too_many, Err(CliError::InvalidArguments(_))));
}

#[test]
fn list_commands_is_sorted() {
    let mut registry = registry();
    registry.register_command("alpha", Box::new(Echo));

    let categories: Vec<String> = registry
        .list_commands()
        .into_iter()
        .map(|(category, _)| category)
        .collect();

    assert_eq!(categories, vec!["alpha", "test"]);
}

#[test]
fn help_text_shows_usage() {
    let help = registry().help_text();

    assert!(help.contains("echo <first> [second]"));
    assert!(help.contains("Repeat the arguments"));
}

#[test]
fn volume_is_a_whole_percentage() {
    assert_eq!(format_volume(0.55), "55%");
    assert_eq!(format_volume(1.0), "100%");
    assert_eq!(format_volume(0.0), "0%");
}

#[test]
fn power_is_styled_by_state() {
    assert!(format_power(true).contains("on"));
    assert!(format_power(false).contains("off"));
}
