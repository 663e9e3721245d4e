use bytes::BytesMut;
use serde::Serialize;
use vrlink_peer::{PeerId, PeerState, ReadOutcome, Session, SessionConfig, TickReport};
use vrlink_stream::{wire, Quaternion, StreamReader, StreamWriter, Value, ValueStream, Vector3};

use crate::cmd::SimulateArgs;
use crate::exit::{io_error, stream_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{format_vector3, new_table, print_json, OutputFormat};

/// Game values every player writes ahead of the protocol tail.
const FOREIGN_VALUES: usize = 2;

/// A room member. Vanilla players have no session and never write a tail.
struct Player {
    actor: PeerId,
    session: Option<Session>,
}

#[derive(Debug, Default, Serialize)]
struct Stats {
    frames_written: usize,
    envelopes_read: usize,
    skipped: usize,
    malformed: usize,
    handler_failures: usize,
}

#[derive(Serialize)]
struct PeerOutput {
    actor: PeerId,
    #[serde(flatten)]
    state: PeerState,
}

#[derive(Serialize)]
struct PlayerOutput {
    actor: PeerId,
    vr: bool,
    peers: Vec<PeerOutput>,
}

#[derive(Serialize)]
struct SimulateOutput {
    schema_id: &'static str,
    ticks: u32,
    players: Vec<PlayerOutput>,
    stats: Stats,
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    validate(&args)?;

    let mut players = room(args.vr, args.vanilla);
    for index in 0..players.len() {
        let joined: Vec<PeerId> = players
            .iter()
            .filter(|other| other.actor != players[index].actor)
            .map(|other| other.actor)
            .collect();
        if let Some(session) = players[index].session.as_mut() {
            for actor in joined {
                session.on_peer_joined(actor);
            }
        }
    }

    let mut stats = Stats::default();
    let mut captured: Option<Vec<Value>> = None;

    for tick in 0..args.ticks {
        let mut streams = Vec::with_capacity(players.len());
        for player in &mut players {
            let (stream, frames) = write_pass(player, tick)?;
            stats.frames_written += frames;
            streams.push((player.actor, stream));
        }

        if tick + 1 == args.ticks && args.capture.is_some() {
            captured = players
                .iter()
                .zip(&streams)
                .find(|(player, _)| player.session.is_some())
                .map(|(_, (_, stream))| stream.values().to_vec());
        }

        for (sender, stream) in &streams {
            for player in players.iter_mut().filter(|p| p.actor != *sender) {
                read_pass(player, *sender, stream.clone(), &mut stats)?;
            }
        }
        tracing::debug!(tick, frames = stats.frames_written, "tick complete");
    }

    for actor in args.leave.iter().copied().map(PeerId) {
        players.retain(|player| player.actor != actor);
        for session in players.iter_mut().filter_map(|p| p.session.as_mut()) {
            session.on_peer_left(actor);
        }
        tracing::info!(%actor, "player left");
    }

    if let (Some(path), Some(values)) = (&args.capture, captured) {
        let mut buf = BytesMut::new();
        wire::encode_values(&values, &mut buf);
        std::fs::write(path, &buf)
            .map_err(|err| io_error(&format!("write {}", path.display()), err))?;
        tracing::info!(path = %path.display(), values = values.len(), "captured tick");
    }

    let out = SimulateOutput {
        schema_id: "vrlink/cli/v1/simulate",
        ticks: args.ticks,
        players: players
            .iter()
            .map(|player| PlayerOutput {
                actor: player.actor,
                vr: player.session.is_some(),
                peers: player
                    .session
                    .as_ref()
                    .map(|session| {
                        session
                            .directory()
                            .snapshot()
                            .into_iter()
                            .map(|(actor, state)| PeerOutput { actor, state })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect(),
        stats,
    };
    print_simulation(&out, format);

    Ok(SUCCESS)
}

fn validate(args: &SimulateArgs) -> CliResult<()> {
    let total = i32::from(args.vr) + i32::from(args.vanilla);
    if total == 0 {
        return Err(CliError::new(USAGE, "room must have at least one player"));
    }
    if let Some(actor) = args.leave.iter().find(|actor| !(1..=total).contains(*actor)) {
        return Err(CliError::new(
            USAGE,
            format!("--leave {actor}: no such actor (players are 1..={total})"),
        ));
    }
    if args.capture.is_some() && (args.vr == 0 || args.ticks == 0) {
        return Err(CliError::new(
            USAGE,
            "--capture needs at least one VR player and one tick",
        ));
    }
    Ok(())
}

/// Actors are numbered from 1, VR players first.
fn room(vr: u16, vanilla: u16) -> Vec<Player> {
    let vr = (0..vr).map(|_| true);
    let vanilla = (0..vanilla).map(|_| false);
    vr.chain(vanilla)
        .zip(1..)
        .map(|(is_vr, actor)| Player {
            actor: PeerId(actor),
            session: is_vr.then(|| Session::new(SessionConfig::default())),
        })
        .collect()
}

fn write_pass(player: &mut Player, tick: u32) -> CliResult<(ValueStream, usize)> {
    let mut stream = ValueStream::writer();
    let foreign = [
        Value::Float(100.0 - tick as f32),
        Value::Bool(tick % 2 == 0),
    ];
    for value in foreign {
        stream
            .write_next(value)
            .map_err(|err| stream_error("write game values", err))?;
    }

    let Some(session) = player.session.as_mut() else {
        return Ok((stream.into_reader(), 0));
    };

    let lift = tick as f32 * 0.01;
    session.send_rig(
        Vector3::new(-0.2, 1.2 + lift, 0.3),
        Vector3::new(0.2, 1.2 + lift, 0.3),
        Quaternion::IDENTITY,
        Quaternion::IDENTITY,
    );
    session.update_headlamp(tick % 2 == 0);
    session.update_dominant_hand(player.actor.0 % 2 == 0);
    session.update_map_tool(false, player.actor.0 % 2 == 0);

    let frames = match session.on_serialize(player.actor, &mut stream) {
        TickReport::Wrote { frames } => frames,
        TickReport::Read(_) => 0,
    };
    Ok((stream.into_reader(), frames))
}

fn read_pass(
    player: &mut Player,
    sender: PeerId,
    mut stream: ValueStream,
    stats: &mut Stats,
) -> CliResult<()> {
    for _ in 0..FOREIGN_VALUES {
        stream
            .read_next()
            .map_err(|err| stream_error("read game values", err))?;
    }

    let Some(session) = player.session.as_mut() else {
        return Ok(());
    };

    if let TickReport::Read(report) = session.on_serialize(sender, &mut stream) {
        match report.outcome {
            ReadOutcome::Complete => stats.envelopes_read += 1,
            ReadOutcome::Skipped(_) => stats.skipped += 1,
            ReadOutcome::Malformed => stats.malformed += 1,
        }
        stats.handler_failures += report.handler_failures;
    }
    Ok(())
}

fn print_simulation(out: &SimulateOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table([
                "OBSERVER",
                "PEER",
                "HEADLAMP",
                "LEFT HANDED",
                "HIDE FLASHLIGHT",
                "LEFT HAND",
            ]);
            for player in &out.players {
                for peer in &player.peers {
                    table.add_row(vec![
                        player.actor.to_string(),
                        peer.actor.to_string(),
                        peer.state.headlamp_enabled.to_string(),
                        peer.state.left_handed.to_string(),
                        peer.state.map_tool.hide_flashlight.to_string(),
                        format_vector3(peer.state.rig.left_position),
                    ]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Simulation ({} ticks):", out.ticks);
            for player in &out.players {
                let kind = if player.vr { "vr" } else { "vanilla" };
                let peers = player
                    .peers
                    .iter()
                    .map(|peer| peer.actor.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {} ({kind}): [{peers}]", player.actor);
            }
            println!(
                "  Frames written: {}, envelopes read: {}, skipped: {}, malformed: {}",
                out.stats.frames_written,
                out.stats.envelopes_read,
                out.stats.skipped,
                out.stats.malformed
            );
        }
        OutputFormat::Raw => {
            for player in &out.players {
                for peer in &player.peers {
                    println!("{} {}", player.actor.0, peer.actor.0);
                }
            }
        }
    }
}
