use crate::cli::{SchemaArgs, SchemaKind};
use crate::config::Config;
use crate::planner::task_schema;
use crate::runner::regulation_schema;
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let json = match args.kind {
        SchemaKind::Config => serde_json::to_string_pretty(&schema_for!(Config))?,
        SchemaKind::Task => task_schema(),
        SchemaKind::Regulation => regulation_schema(),
    };
    println!("{}", json);
    Ok(())
}
