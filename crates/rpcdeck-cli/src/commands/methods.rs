//! Catalog listing

use crate::{
    cli::OutputFormat,
    error::CliResult,
    utils::{truncate_text, ColoredOutput},
};
use rpcdeck_registry::MethodRegistry;
use serde_json::{json, Value as JsonValue};

pub struct MethodsCommand;

impl MethodsCommand {
    pub fn run(registry: &MethodRegistry, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Table => Self::display_table(registry),
            _ => println!("{}", format.format_json(&Self::to_json(registry))?),
        }
        Ok(())
    }

    pub fn to_json(registry: &MethodRegistry) -> JsonValue {
        let categories: Vec<JsonValue> = registry
            .categories()
            .iter()
            .map(|category| {
                let methods: Vec<_> = category.methods().values().map(|m| m.info()).collect();
                json!({
                    "key": category.key,
                    "title": category.title,
                    "methods": methods,
                })
            })
            .collect();
        json!({ "categories": categories })
    }

    fn display_table(registry: &MethodRegistry) {
        if registry.is_empty() {
            println!("{}", ColoredOutput::info("No methods registered"));
            return;
        }

        for category in registry.categories() {
            println!("{}", ColoredOutput::highlight(&category.title));
            println!(
                "  {:<18} {:<28} {:<30} {}",
                ColoredOutput::dim("Name"),
                ColoredOutput::dim("RPC method"),
                ColoredOutput::dim("Parameters"),
                ColoredOutput::dim("Description")
            );
            for method in category.methods().values() {
                let params = method
                    .params()
                    .iter()
                    .map(|p| format!("{}:{}", p.name, p.kind.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "  {:<18} {:<28} {:<30} {}",
                    method.name(),
                    method.wire_method(),
                    truncate_text(&params, 30),
                    method.description().unwrap_or("-")
                );
            }
            println!();
        }
    }
}
