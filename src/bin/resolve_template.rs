//! Resolve a capability template from a definition store document.
//!
//! Loads the store named by `--store` (or `CAPTEMPLATE_STORE`), walks the
//! lookup chain for `--kind`, and prints the resolved template as JSON. Any
//! failure prints the full error chain and exits 1.

use anyhow::Result;
use captemplate::cli_support::{LookupArgs, Parsed};
use captemplate::{TemplateLoader, init_tracing};
use std::env;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = match LookupArgs::parse(env::args_os().skip(1))? {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print!("{}", usage());
            return Ok(());
        }
    };
    let store = args.load_store()?;
    let template = TemplateLoader::new(&store).load_template(args.kind, &args.name)?;
    println!("{}", serde_json::to_string(&template)?);
    Ok(())
}

fn usage() -> &'static str {
    "Usage: resolve-template [--store PATH] --kind component|trait|scope --name NAME\n\
Resolves the template backing a capability and prints it as compact JSON.\n\
The store defaults to $CAPTEMPLATE_STORE; set CAPTEMPLATE_LOG=debug to trace lookups.\n"
}
