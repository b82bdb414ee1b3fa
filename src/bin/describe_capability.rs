//! Print the capability descriptor built from a definition's extension.
//!
//! Uses the same lookup chain as `resolve-template`, but decodes the whole
//! extension payload onto a capability descriptor instead of stopping at the
//! template. Definitions without a template still produce a descriptor.

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
    let capability = TemplateLoader::new(&store).describe_capability(args.kind, &args.name)?;
    println!("{}", serde_json::to_string_pretty(&capability)?);
    Ok(())
}

fn usage() -> &'static str {
    "Usage: describe-capability [--store PATH] --kind component|trait|scope --name NAME\n\
Prints the capability descriptor decoded from the definition's extension as JSON.\n"
}
