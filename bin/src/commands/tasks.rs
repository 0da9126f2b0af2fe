//! Tasks command implementation.

use anyhow::Result;
use barmill_lib::prelude::*;

/// List the tasks a pipeline definition can name.
pub(crate) fn list_tasks() -> Result<()> {
    let registry = TaskRegistry::with_builtin_tasks(StorageProvider::new());

    println!("{:<15} {:<40}", "NAME", "DESCRIPTION");
    println!("{}", "-".repeat(55));

    for name in registry.names() {
        println!("{:<15} {:<40}", name, describe(name));
    }

    println!("\nTotal: {} tasks", registry.len());
    Ok(())
}

fn describe(name: &str) -> &'static str {
    match name {
        "get_storage" => "Resolve the pipeline's storage backend",
        "read" => "Load a tick table (filename, bucket?)",
        "aggregate" => "Build bars from ticks (unit?, quantity?)",
        "write" => "Write the current table (filename, bucket?)",
        _ => "",
    }
}
