//! Load command implementation

use anyhow::Result;
use clap::Args;

use super::utils::{load_inputs, StoreArgs};

#[derive(Args)]
pub struct LoadArgs {
    /// Data files, globs, or key=value pairs, applied in order
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Print the whole host object (cache nested at --prop) instead of the cache
    #[arg(long)]
    pub host: bool,
}

pub fn run(args: LoadArgs) -> Result<()> {
    let mut store = args.store.build_store()?;
    load_inputs(&mut store, &args.inputs)?;

    let value = if args.host {
        serde_json::Value::Object(store.into_host())
    } else {
        serde_json::Value::Object(store.cache().clone())
    };

    let rendered =
        if args.compact { serde_json::to_string(&value)? } else { serde_json::to_string_pretty(&value)? };
    println!("{}", rendered);
    Ok(())
}
