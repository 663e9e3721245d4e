use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use vrlink_frame::Frame;
use vrlink_stream::{Quaternion, ValueKind, Vector3};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Payload shape as a comma-separated list of value kinds.
pub fn shape_label(shape: &[ValueKind]) -> String {
    if shape.is_empty() {
        return "-".to_string();
    }
    shape
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_vector3(v: Vector3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

pub fn format_quaternion(q: Quaternion) -> String {
    format!("({:.3}, {:.3}, {:.3}, {:.3})", q.x, q.y, q.z, q.w)
}

/// One-line summary of a frame's fields.
pub fn frame_fields(frame: &Frame) -> String {
    match frame {
        Frame::Announcement => String::new(),
        Frame::Rig(pose) => format!(
            "left={} {} right={} {}",
            format_vector3(pose.left_position),
            format_quaternion(pose.left_rotation),
            format_vector3(pose.right_position),
            format_quaternion(pose.right_rotation)
        ),
        Frame::MapTool(state) => format!(
            "hide_flashlight={} left_handed={}",
            state.hide_flashlight, state.left_handed
        ),
        Frame::Headlamp { enabled } => format!("enabled={enabled}"),
        Frame::DominantHand { left_handed } => format!("left_handed={left_handed}"),
    }
}
