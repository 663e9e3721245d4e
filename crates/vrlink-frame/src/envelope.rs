use vrlink_stream::{StreamReader, StreamWriter, Value};

use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::registry;

/// Presence sentinel at the head of every envelope (48 bits, sent as int64).
pub const MAGIC: i64 = 0x5245_504F_5852;

/// Protocol version written by this build and the only version it reads.
pub const PROTOCOL_VERSION: i32 = 1;

/// Default upper bound on the frame count accepted from a peer.
pub const DEFAULT_MAX_FRAMES: usize = 256;

/// Configuration for the envelope codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Version written on encode and required on decode.
    pub protocol_version: i32,
    /// Largest frame count accepted on decode.
    pub max_frames: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

/// Why an envelope was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The stream does not continue with the magic. Nothing was consumed.
    NotProtocolData,
    /// Magic matched but the version is not ours. Magic and version were
    /// consumed; the rest of the envelope is left alone.
    UnsupportedVersion { version: i32 },
}

/// Result of opening an envelope on a read pass.
pub enum Envelope<'a, R: ?Sized> {
    /// No envelope to process this tick.
    Skipped(SkipReason),
    /// Header accepted; frames follow.
    Open(FrameIter<'a, R>),
}

/// Fully decoded envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Skipped(SkipReason),
    Frames(Vec<Frame>),
}

/// Returns true if the next stream value is the envelope magic.
pub fn peek_magic<R>(stream: &R) -> bool
where
    R: StreamReader + ?Sized,
{
    matches!(stream.peek_next(), Some(Value::Long(MAGIC)))
}

/// Write an envelope carrying `frames` onto the stream.
///
/// More than `config.max_frames` frames is an error and nothing is written,
/// since a peer with the same limit would reject the envelope.
///
/// Wire format:
/// ```text
/// ┌────────────┬───────────┬───────────┬──────────────────────────────┐
/// │ Magic      │ Version   │ Count     │ Frames                       │
/// │ int64      │ int32     │ int32     │ count x (int32 tag, fields)  │
/// │ 0x5245...  │           │           │                              │
/// └────────────┴───────────┴───────────┴──────────────────────────────┘
/// ```
pub fn encode_envelope<W>(stream: &mut W, frames: &[Frame], config: &EnvelopeConfig) -> Result<()>
where
    W: StreamWriter + ?Sized,
{
    let count = i32::try_from(frames.len())
        .ok()
        .filter(|_| frames.len() <= config.max_frames)
        .ok_or(FrameError::InvalidFrameCount {
            count: i64::try_from(frames.len()).unwrap_or(i64::MAX),
            max: config.max_frames,
        })?;

    stream.write_next(Value::Long(MAGIC))?;
    stream.write_next(Value::Int(config.protocol_version))?;
    stream.write_next(Value::Int(count))?;

    for frame in frames {
        stream.write_next(Value::Int(registry::tag_of(frame)))?;
        frame.write_fields(stream)?;
    }

    Ok(())
}

/// Read the envelope header.
///
/// Returns [`Envelope::Skipped`] without touching the stream when the magic
/// is absent. Errors only once the magic has matched and the header that
/// follows is malformed.
pub fn open_envelope<'a, R>(stream: &'a mut R, config: &EnvelopeConfig) -> Result<Envelope<'a, R>>
where
    R: StreamReader + ?Sized,
{
    if !peek_magic(&*stream) {
        return Ok(Envelope::Skipped(SkipReason::NotProtocolData));
    }
    stream.read_next()?;

    let version = stream.read_i32()?;
    if version != config.protocol_version {
        return Ok(Envelope::Skipped(SkipReason::UnsupportedVersion { version }));
    }

    let count = stream.read_i32()?;
    let remaining = usize::try_from(count)
        .ok()
        .filter(|count| *count <= config.max_frames)
        .ok_or(FrameError::InvalidFrameCount {
            count: i64::from(count),
            max: config.max_frames,
        })?;

    tracing::trace!(count = remaining, "opened envelope");
    Ok(Envelope::Open(FrameIter { stream, remaining }))
}

/// Decode a whole envelope, stopping at the first malformed frame.
pub fn decode_envelope<R>(stream: &mut R, config: &EnvelopeConfig) -> Result<Decoded>
where
    R: StreamReader + ?Sized,
{
    match open_envelope(stream, config)? {
        Envelope::Skipped(reason) => Ok(Decoded::Skipped(reason)),
        Envelope::Open(frames) => frames.collect::<Result<Vec<_>>>().map(Decoded::Frames),
    }
}

/// Iterator over the frames of an open envelope, in written order.
///
/// Yields at most one error, after which it is exhausted: without per-frame
/// lengths a bad frame leaves no way to find the next one.
pub struct FrameIter<'a, R: ?Sized> {
    stream: &'a mut R,
    remaining: usize,
}

impl<R> FrameIter<'_, R>
where
    R: StreamReader + ?Sized,
{
    /// Frames announced by the header and not yet read.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_frame(&mut self) -> Result<Frame> {
        let tag = self.stream.read_i32()?;
        let mut frame = registry::create(tag)?;
        frame.read_fields(&mut *self.stream)?;
        Ok(frame)
    }
}

impl<R> Iterator for FrameIter<'_, R>
where
    R: StreamReader + ?Sized,
{
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.read_frame();
        if result.is_err() {
            tracing::trace!(skipped = self.remaining, "frame decode failed");
            self.remaining = 0;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use vrlink_stream::{Quaternion, StreamError, ValueStream, Vector3};

    use super::*;
    use crate::frame::{MapToolState, RigPose};

    fn sample_rig() -> RigPose {
        RigPose {
            left_position: Vector3::new(-0.25, 1.4, 0.3),
            right_position: Vector3::new(0.25, 1.35, 0.32),
            left_rotation: Quaternion::new(0.1, 0.2, 0.3, 0.9),
            right_rotation: Quaternion::new(-0.1, 0.0, 0.0, 0.99),
        }
    }

    fn all_frames() -> Vec<Frame> {
        vec![
            Frame::Announcement,
            Frame::Rig(sample_rig()),
            Frame::MapTool(MapToolState {
                hide_flashlight: true,
                left_handed: true,
            }),
            Frame::Headlamp { enabled: true },
            Frame::DominantHand { left_handed: true },
        ]
    }

    fn encode(frames: &[Frame]) -> ValueStream {
        let mut stream = ValueStream::writer();
        encode_envelope(&mut stream, frames, &EnvelopeConfig::default()).unwrap();
        stream.into_reader()
    }

    #[test]
    fn test_roundtrip_each_variant() {
        for frame in all_frames() {
            let mut stream = encode(&[frame]);
            let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
            assert_eq!(decoded, Decoded::Frames(vec![frame]));
            assert!(stream.remaining().is_empty());
        }
    }

    #[test]
    fn test_headlamp_then_rig_scenario() {
        let pose = sample_rig();
        let mut stream = encode(&[Frame::Headlamp { enabled: true }, Frame::Rig(pose)]);

        let Decoded::Frames(frames) =
            decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap()
        else {
            panic!("envelope should decode");
        };

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], Frame::Headlamp { enabled: true });
        let Frame::Rig(decoded) = frames[1] else {
            panic!("second frame should be a rig frame");
        };
        assert_eq!(decoded.left_position, pose.left_position);
        assert_eq!(decoded.left_rotation, pose.left_rotation);
        assert_eq!(decoded.right_position, pose.right_position);
        assert_eq!(decoded.right_rotation, pose.right_rotation);
    }

    #[test]
    fn test_header_layout() {
        let stream = encode(&[Frame::Headlamp { enabled: false }]);
        assert_eq!(
            stream.values(),
            &[
                Value::Long(MAGIC),
                Value::Int(PROTOCOL_VERSION),
                Value::Int(1),
                Value::Int(4),
                Value::Bool(false),
            ]
        );
    }

    #[test]
    fn test_empty_envelope() {
        let mut stream = encode(&[]);
        let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
        assert_eq!(decoded, Decoded::Frames(Vec::new()));
    }

    #[test]
    fn test_exhausted_stream_is_skipped() {
        let mut stream = ValueStream::reader(Vec::new());
        let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
        assert_eq!(decoded, Decoded::Skipped(SkipReason::NotProtocolData));
    }

    #[test]
    fn test_magic_as_int32_is_not_magic() {
        let mut stream = ValueStream::reader(vec![Value::Int(MAGIC as i32)]);
        let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
        assert_eq!(decoded, Decoded::Skipped(SkipReason::NotProtocolData));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_future_version_skipped() {
        let config = EnvelopeConfig {
            protocol_version: PROTOCOL_VERSION + 1,
            ..EnvelopeConfig::default()
        };
        let mut writer = ValueStream::writer();
        encode_envelope(&mut writer, &all_frames(), &config).unwrap();
        let mut stream = writer.into_reader();

        let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
        assert_eq!(
            decoded,
            Decoded::Skipped(SkipReason::UnsupportedVersion {
                version: PROTOCOL_VERSION + 1
            })
        );
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn test_unknown_tag_is_error() {
        let mut stream = ValueStream::reader(vec![
            Value::Long(MAGIC),
            Value::Int(PROTOCOL_VERSION),
            Value::Int(1),
            Value::Int(99),
        ]);
        let err = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::UnknownFrameType(99)));
    }

    #[test]
    fn test_truncated_envelope_is_error() {
        let mut stream = ValueStream::reader(vec![
            Value::Long(MAGIC),
            Value::Int(PROTOCOL_VERSION),
            Value::Int(2),
            Value::Int(4),
            Value::Bool(true),
        ]);
        let err = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::Stream(StreamError::EndOfStream)));
    }

    #[test]
    fn test_frames_before_fault_are_yielded() {
        let mut stream = ValueStream::reader(vec![
            Value::Long(MAGIC),
            Value::Int(PROTOCOL_VERSION),
            Value::Int(3),
            Value::Int(4),
            Value::Bool(true),
            Value::Int(77),
            Value::Int(5),
            Value::Bool(true),
        ]);
        let Envelope::Open(mut frames) =
            open_envelope(&mut stream, &EnvelopeConfig::default()).unwrap()
        else {
            panic!("header should be accepted");
        };

        assert_eq!(
            frames.next().unwrap().unwrap(),
            Frame::Headlamp { enabled: true }
        );
        assert!(matches!(
            frames.next(),
            Some(Err(FrameError::UnknownFrameType(77)))
        ));
        assert!(frames.next().is_none());
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut stream = ValueStream::reader(vec![
            Value::Long(MAGIC),
            Value::Int(PROTOCOL_VERSION),
            Value::Int(-1),
        ]);
        let err = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrameCount { count: -1, .. }));
    }

    #[test]
    fn test_count_above_limit_rejected() {
        let config = EnvelopeConfig {
            max_frames: 2,
            ..EnvelopeConfig::default()
        };
        let mut stream = ValueStream::reader(vec![
            Value::Long(MAGIC),
            Value::Int(PROTOCOL_VERSION),
            Value::Int(3),
        ]);
        let err = decode_envelope(&mut stream, &config).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidFrameCount { count: 3, max: 2 }
        ));
    }

    #[test]
    fn test_encode_above_limit_writes_nothing() {
        let config = EnvelopeConfig {
            max_frames: 2,
            ..EnvelopeConfig::default()
        };
        let frames = [Frame::Announcement; 3];
        let mut writer = ValueStream::writer();

        let err = encode_envelope(&mut writer, &frames, &config).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidFrameCount { count: 3, max: 2 }
        ));
        assert!(writer.is_empty());

        encode_envelope(&mut writer, &frames[..2], &config).unwrap();
        let mut stream = writer.into_reader();
        let decoded = decode_envelope(&mut stream, &config).unwrap();
        assert_eq!(decoded, Decoded::Frames(frames[..2].to_vec()));
    }

    #[test]
    fn test_envelope_after_foreign_values() {
        let mut writer = ValueStream::writer();
        writer.write_next(Value::Float(12.5)).unwrap();
        writer.write_next(Value::String("grab".into())).unwrap();
        encode_envelope(
            &mut writer,
            &[Frame::DominantHand { left_handed: true }],
            &EnvelopeConfig::default(),
        )
        .unwrap();

        let mut stream = writer.into_reader();
        stream.read_next().unwrap();
        stream.read_next().unwrap();

        let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
        assert_eq!(
            decoded,
            Decoded::Frames(vec![Frame::DominantHand { left_handed: true }])
        );
    }

    fn foreign_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<u8>().prop_map(Value::Byte),
            any::<i32>().prop_map(Value::Int),
            any::<i64>()
                .prop_filter("must not be the magic", |v| *v != MAGIC)
                .prop_map(Value::Long),
            (-1000.0f32..1000.0f32).prop_map(Value::Float),
            ".*".prop_map(Value::String),
        ]
    }

    fn finite() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL | prop::num::f32::ZERO | prop::num::f32::SUBNORMAL
    }

    fn any_vector3() -> impl Strategy<Value = Vector3> {
        (finite(), finite(), finite()).prop_map(|(x, y, z)| Vector3::new(x, y, z))
    }

    fn any_quaternion() -> impl Strategy<Value = Quaternion> {
        (finite(), finite(), finite(), finite()).prop_map(|(x, y, z, w)| Quaternion::new(x, y, z, w))
    }

    fn any_frame() -> impl Strategy<Value = Frame> {
        prop_oneof![
            Just(Frame::Announcement),
            (any_vector3(), any_vector3(), any_quaternion(), any_quaternion()).prop_map(
                |(left_position, right_position, left_rotation, right_rotation)| {
                    Frame::Rig(RigPose {
                        left_position,
                        right_position,
                        left_rotation,
                        right_rotation,
                    })
                }
            ),
            (any::<bool>(), any::<bool>()).prop_map(|(hide_flashlight, left_handed)| {
                Frame::MapTool(MapToolState {
                    hide_flashlight,
                    left_handed,
                })
            }),
            any::<bool>().prop_map(|enabled| Frame::Headlamp { enabled }),
            any::<bool>().prop_map(|left_handed| Frame::DominantHand { left_handed }),
        ]
    }

    proptest! {
        #[test]
        fn prop_frames_roundtrip_in_order(frames in proptest::collection::vec(any_frame(), 0..24)) {
            let mut stream = encode(&frames);
            let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
            prop_assert_eq!(decoded, Decoded::Frames(frames));
            prop_assert!(stream.remaining().is_empty());
        }

        #[test]
        fn prop_non_magic_leading_value_is_untouched(
            values in proptest::collection::vec(foreign_value(), 1..16)
        ) {
            let mut stream = ValueStream::reader(values.clone());
            let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();

            prop_assert_eq!(decoded, Decoded::Skipped(SkipReason::NotProtocolData));
            prop_assert_eq!(stream.position(), 0);
            prop_assert_eq!(stream.remaining(), values.as_slice());
        }

        #[test]
        fn prop_headlamp_and_hand_roundtrip(enabled in any::<bool>(), left in any::<bool>()) {
            let frames = [
                Frame::Headlamp { enabled },
                Frame::DominantHand { left_handed: left },
            ];
            let mut stream = encode(&frames);
            let decoded = decode_envelope(&mut stream, &EnvelopeConfig::default()).unwrap();
            prop_assert_eq!(decoded, Decoded::Frames(frames.to_vec()));
        }
    }
}
