use bytes::BytesMut;
use serde::Serialize;
use vrlink_frame::{decode_envelope, Decoded, EnvelopeConfig, Frame, SkipReason};
use vrlink_stream::{wire, StreamReader, ValueStream};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, stream_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{frame_fields, new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct DecodeOutput<'a> {
    schema_id: &'static str,
    values: usize,
    offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<i32>,
    frames: &'a [Frame],
    trailing_values: usize,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = std::fs::read(&args.path)
        .map_err(|err| io_error(&format!("read {}", args.path.display()), err))?;

    let mut buf = BytesMut::from(raw.as_slice());
    let values = wire::decode_values(&mut buf).map_err(|err| stream_error("decode values", err))?;
    let total = values.len();

    if args.offset > total {
        return Err(CliError::new(
            USAGE,
            format!("offset {} is past the end of the stream ({total} values)", args.offset),
        ));
    }

    let mut stream = ValueStream::reader(values);
    for _ in 0..args.offset {
        stream
            .read_next()
            .map_err(|err| stream_error("skip foreign values", err))?;
    }

    let config = EnvelopeConfig {
        max_frames: args.max_frames,
        ..EnvelopeConfig::default()
    };
    let decoded =
        decode_envelope(&mut stream, &config).map_err(|err| frame_error("decode envelope", err))?;
    let trailing_values = stream.remaining().len();

    tracing::debug!(values = total, offset = args.offset, trailing_values, "decoded capture");

    let (frames, skip) = match decoded {
        Decoded::Frames(frames) => (frames, None),
        Decoded::Skipped(reason) => (Vec::new(), Some(reason)),
    };

    let out = DecodeOutput {
        schema_id: "vrlink/cli/v1/decode",
        values: total,
        offset: args.offset,
        skipped: skip.map(skip_label),
        version: match skip {
            Some(SkipReason::UnsupportedVersion { version }) => Some(version),
            _ => None,
        },
        frames: &frames,
        trailing_values,
    };
    print_decoded(&out, format);

    Ok(if skip.is_some() { FAILURE } else { SUCCESS })
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotProtocolData => "not_protocol_data",
        SkipReason::UnsupportedVersion { .. } => "unsupported_version",
    }
}

fn print_decoded(out: &DecodeOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            if let Some(reason) = out.skipped {
                println!("no envelope: {reason}");
                return;
            }
            let mut table = new_table(["#", "FRAME", "FIELDS"]);
            for (index, frame) in out.frames.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    frame.frame_type().to_string(),
                    frame_fields(frame),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Capture:");
            println!("  Values:   {}", out.values);
            println!("  Offset:   {}", out.offset);
            match (out.skipped, out.version) {
                (Some(reason), Some(version)) => {
                    println!("  Envelope: skipped ({reason}, version {version})")
                }
                (Some(reason), None) => println!("  Envelope: skipped ({reason})"),
                (None, _) => println!("  Envelope: {} frames", out.frames.len()),
            }
            for frame in out.frames {
                println!("    {} {}", frame.frame_type(), frame_fields(frame));
            }
            println!("  Trailing: {}", out.trailing_values);
        }
        OutputFormat::Raw => {
            for frame in out.frames {
                println!("{}", frame.tag());
            }
        }
    }
}
