use serde::Serialize;
use vrlink_frame::{MAGIC, PROTOCOL_VERSION};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    protocol_version: i32,
    magic: String,
    target: &'static str,
    profile: &'static str,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.extended {
        println!("vrlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let out = VersionOutput {
        name: "vrlink",
        version: env!("CARGO_PKG_VERSION"),
        protocol_version: PROTOCOL_VERSION,
        magic: format!("0x{MAGIC:012X}"),
        target: option_env!("VRLINK_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("VRLINK_BUILD_PROFILE").unwrap_or("unknown"),
    };

    if matches!(format, OutputFormat::Json) {
        print_json(&out);
        return Ok(SUCCESS);
    }

    println!("name: {}", out.name);
    println!("version: {}", out.version);
    println!("protocol_version: {}", out.protocol_version);
    println!("magic: {}", out.magic);
    println!("target: {}", out.target);
    println!("profile: {}", out.profile);
    println!("features: peer={}, cli=true", cfg!(feature = "peer"));

    Ok(SUCCESS)
}
