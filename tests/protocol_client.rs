//! Text protocol client and loopback controller against a TCP server.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod common;

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    thread,
    time::{Duration, Instant},
};

use common::FakePulse;
use pulselink::services::pulse::{
    LoopbackAction, LoopbackController, ModuleIndex, ProtocolClient, PulseError,
    protocol::{CliCommand, ControlChannel, listing},
};

fn client(port: u16) -> ProtocolClient {
    ProtocolClient::new("127.0.0.1", port, 16, Duration::from_secs(1))
}

#[test]
fn listing_is_drained_across_small_chunks() {
    let server = FakePulse::start()
        .with_sink(1, "living_room")
        .with_loopback("living_room", "tv");

    let modules = client(server.port())
        .send_command(&CliCommand::ListModules)
        .unwrap();
    let sinks = client(server.port())
        .send_command(&CliCommand::ListSinks)
        .unwrap();

    let modules = listing::parse_modules(&modules).unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].argument, "sink=living_room source=tv");
    assert_eq!(listing::parse_sinks(&sinks).unwrap()[0].name, "living_room");
}

#[test]
fn unbounded_timeout_and_buffer_still_drain() {
    let server = FakePulse::start().with_loopback("living_room", "tv");
    let client = ProtocolClient::new(
        "127.0.0.1",
        server.port(),
        usize::MAX,
        Duration::from_secs(u64::MAX),
    );

    let reply = client.send_command(&CliCommand::ListModules).unwrap();

    assert_eq!(listing::parse_modules(&reply).unwrap().len(), 1);
}

#[test]
fn reply_split_by_a_short_pause_is_joined() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        BufReader::new(&stream).read_line(&mut line).unwrap();
        stream.write_all(b"1 module(s) loaded.\n    index: 3\n").unwrap();
        thread::sleep(Duration::from_millis(50));
        stream
            .write_all(b"\tname: <module-loopback>\n\targument: <sink=a source=b>\n")
            .unwrap();
    });

    let reply = client(port).send_raw("list-modules", true).unwrap();

    assert_eq!(
        listing::parse_modules(&reply).unwrap()[0].index,
        ModuleIndex(3)
    );
}

#[test]
fn silent_server_yields_empty_reply_within_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(2));
        drop(stream);
    });

    let started = Instant::now();
    let reply = client(port).send_raw("list-modules", true).unwrap();

    assert!(reply.is_empty());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn refused_connection_is_a_connection_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = client(port).send_command(&CliCommand::ListModules);

    assert!(matches!(result, Err(PulseError::ConnectionFailed(_))));
    assert!(result.unwrap_err().is_connection_loss());
}

#[test]
fn mutations_do_not_wait_for_a_reply() {
    let server = FakePulse::start();

    client(server.port())
        .send_command(&CliCommand::LoadLoopback {
            sink: "out".to_string(),
            source: "in".to_string(),
        })
        .unwrap();

    assert_eq!(server.loopbacks(), vec!["sink=out source=in"]);
}

#[test]
fn controller_reconciles_to_a_single_source() {
    let server = FakePulse::start()
        .with_loopback("out", "tv")
        .with_loopback("out", "radio");
    let mut controller = LoopbackController::new(client(server.port()));

    let actions = controller
        .reconcile_single_source("out", Some("turntable"), &["tv", "radio", "turntable"])
        .unwrap();

    assert_eq!(actions.len(), 3);
    assert!(matches!(actions[2], LoopbackAction::Load { .. }));
    assert_eq!(server.loopbacks(), vec!["sink=out source=turntable"]);

    controller.refresh(true).unwrap();
    assert_eq!(
        controller.is_connected("out", &["tv", "turntable"]),
        Some("turntable")
    );
}

#[test]
fn controller_cache_throttles_unforced_scans() {
    let server = FakePulse::start().with_loopback("out", "tv");
    let mut controller = LoopbackController::new(client(server.port()));

    assert!(controller.refresh(false).unwrap());
    assert!(!controller.refresh(false).unwrap());

    controller.connect("out", "radio").unwrap();
    assert!(controller.refresh(false).unwrap());

    let scans = server
        .log()
        .iter()
        .filter(|line| *line == "list-modules")
        .count();
    assert_eq!(scans, 2);
    assert!(controller.lookup_module_index("out", "radio").is_some());
}
