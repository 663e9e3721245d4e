use serde::Serialize;
use vrlink_frame::ENTRIES;

use crate::cmd::FramesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, print_json, shape_label, OutputFormat};

#[derive(Serialize)]
struct FrameInfo {
    tag: i32,
    name: &'static str,
    shape: Vec<&'static str>,
}

#[derive(Serialize)]
struct FramesOutput {
    schema_id: &'static str,
    frames: Vec<FrameInfo>,
}

pub fn run(_args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    match format {
        OutputFormat::Json => {
            let out = FramesOutput {
                schema_id: "vrlink/cli/v1/frames",
                frames: ENTRIES
                    .iter()
                    .map(|entry| FrameInfo {
                        tag: entry.frame_type.tag(),
                        name: entry.frame_type.name(),
                        shape: entry.shape.iter().map(|kind| kind.name()).collect(),
                    })
                    .collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(["TAG", "NAME", "PAYLOAD"]);
            for entry in &ENTRIES {
                table.add_row(vec![
                    entry.frame_type.tag().to_string(),
                    entry.frame_type.name().to_string(),
                    shape_label(entry.shape),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in &ENTRIES {
                println!("{}: {}", entry.frame_type, shape_label(entry.shape));
            }
        }
        OutputFormat::Raw => {
            for entry in &ENTRIES {
                println!("{}", entry.frame_type.tag());
            }
        }
    }

    Ok(SUCCESS)
}
