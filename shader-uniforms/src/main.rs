use std::path::PathBuf;

use anyhow::{Context, Result};
use shader_uniforms::Manifest;

const HELP: &str = "\
shader-uniforms

Checks that every shader named in a manifest can be read.

USAGE:
  shader-uniforms [--manifest PATH]

OPTIONS:
  -m, --manifest PATH   shader manifest [default: shaders.toml]
  -h, --help            print this message
";

fn main() {
    shader_uniforms::log::init();

    if let Err(e) = run() {
        log::error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }

    let path: PathBuf = args
        .opt_value_from_str(["-m", "--manifest"])?
        .unwrap_or_else(|| "shaders.toml".into());

    let manifest =
        Manifest::load(&path).with_context(|| format!("failed to load manifest {:?}", path))?;

    for name in manifest.names() {
        let sources = manifest
            .sources(name)
            .with_context(|| format!("failed to read shader `{}`", name))?;
        let policy = manifest.policy_of(name)?;
        println!(
            "{:<16} {:>6} B vertex {:>6} B fragment  {:?}",
            name,
            sources.vertex.len(),
            sources.fragment.len(),
            policy
        );
    }

    Ok(())
}
