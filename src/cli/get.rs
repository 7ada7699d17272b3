//! Get command implementation

use anyhow::Result;
use clap::Args;

use super::utils::{load_inputs, StoreArgs};

#[derive(Args)]
pub struct GetArgs {
    /// Dot-path key to print
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Data files, globs, or key=value pairs to load first
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn run(args: GetArgs) -> Result<()> {
    let mut store = args.store.build_store()?;
    load_inputs(&mut store, &args.inputs)?;

    let Some(value) = store.get(&args.key) else {
        anyhow::bail!("Key not found: {}", args.key);
    };

    match value {
        serde_json::Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}
