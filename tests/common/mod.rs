//! TCP stand-in for `module-cli-protocol-tcp`.
//!
//! Handles one connection at a time, in accept order, so a mutation sent
//! without waiting for a reply is applied before the next command is read.

#![allow(dead_code)]

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use pulselink::config::ServerConfig;

const SETTLE: &[u8] = b"# settle\n";

#[derive(Debug, Default)]
struct State {
    modules: Vec<(u32, String, String)>,
    sinks: Vec<(u32, String, u32, bool)>,
    sources: Vec<(u32, String)>,
    next_module: u32,
    log: Vec<String>,
}

pub struct FakePulse {
    port: u16,
    state: Arc<Mutex<State>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl FakePulse {
    pub fn start() -> Self {
        let state = State {
            next_module: 20,
            ..State::default()
        };
        let mut server = Self {
            port: 0,
            state: Arc::new(Mutex::new(state)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        };
        server.listen();
        server
    }

    fn listen(&mut self) {
        let listener = TcpListener::bind(("127.0.0.1", self.port)).unwrap();
        self.port = listener.local_addr().unwrap().port();
        self.running.store(true, Ordering::SeqCst);

        let state = self.state.clone();
        let running = self.running.clone();
        self.worker = Some(thread::spawn(move || {
            for stream in listener.incoming() {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if let Ok(stream) = stream {
                    handle(stream, &state);
                }
            }
        }));
    }

    /// Close the listener; connections are refused until [`FakePulse::resume`]
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = TcpStream::connect(("127.0.0.1", self.port));
        if let Some(worker) = self.worker.take() {
            worker.join().unwrap();
        }
    }

    /// Listen again on the same port
    pub fn resume(&mut self) {
        self.listen();
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: self.port,
            tcp_timeout: 1,
            ..ServerConfig::default()
        }
    }

    /// Wait until every connection opened so far has been handled
    fn settle(&self) {
        if self.worker.is_none() {
            return;
        }
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", self.port)) {
            let _ = stream.write_all(SETTLE);
            let _ = stream.read_to_end(&mut Vec::new());
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_sink(self, index: u32, name: &str) -> Self {
        self.lock().sinks.push((index, name.to_string(), 65536, false));
        self
    }

    pub fn with_source(self, index: u32, name: &str) -> Self {
        self.lock().sources.push((index, name.to_string()));
        self
    }

    pub fn with_loopback(self, sink: &str, source: &str) -> Self {
        {
            let mut state = self.lock();
            let index = state.next_module;
            state.next_module += 1;
            state.modules.push((
                index,
                "module-loopback".to_string(),
                format!("sink={sink} source={source}"),
            ));
        }
        self
    }

    pub fn loopbacks(&self) -> Vec<String> {
        self.settle();
        let mut loopbacks: Vec<String> = self
            .lock()
            .modules
            .iter()
            .filter(|(_, name, _)| name == "module-loopback")
            .map(|(_, _, argument)| argument.clone())
            .collect();
        loopbacks.sort();
        loopbacks
    }

    pub fn log(&self) -> Vec<String> {
        self.settle();
        self.lock().log.clone()
    }

    pub fn sink_state(&self, name: &str) -> Option<(u32, bool)> {
        self.settle();
        self.lock()
            .sinks
            .iter()
            .find(|(_, n, _, _)| n == name)
            .map(|(_, _, raw, muted)| (*raw, *muted))
    }
}

impl Drop for FakePulse {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

fn handle(stream: TcpStream, state: &Mutex<State>) {
    let mut reader = BufReader::new(&stream);
    let mut line = String::new();
    if reader.read_line(&mut line).is_err() || line.is_empty() {
        return;
    }

    if line.as_bytes() == SETTLE {
        let mut stream = &stream;
        let _ = stream.write_all(b"ok\n");
        return;
    }

    let reply = {
        let mut state = state.lock().unwrap();
        let command = line.trim().to_string();
        state.log.push(command.clone());
        respond(&mut state, &command)
    };

    if !reply.is_empty() {
        let mut stream = &stream;
        let _ = stream.write_all(reply.as_bytes());
    }
}

fn respond(state: &mut State, command: &str) -> String {
    let words: Vec<&str> = command.split_whitespace().collect();
    match words.as_slice() {
        ["list-modules"] => {
            let mut text = format!("{} module(s) loaded.\n", state.modules.len());
            for (index, name, argument) in &state.modules {
                text.push_str(&format!(
                    "    index: {index}\n\tname: <{name}>\n\targument: <{argument}>\n\tused: -1\n"
                ));
            }
            text
        }
        ["list-sinks"] => {
            let mut text = format!("{} sink(s) available.\n", state.sinks.len());
            for (index, name, raw, muted) in &state.sinks {
                let muted = if *muted { "yes" } else { "no" };
                text.push_str(&format!(
                    "  * index: {index}\n\tname: <{name}>\n\tvolume: front-left: {raw} / 100% / 0.00 dB,   front-right: {raw} / 100% / 0.00 dB\n\tmuted: {muted}\n"
                ));
            }
            text
        }
        ["list-sources"] => {
            let mut text = format!("{} source(s) available.\n", state.sources.len());
            for (index, name) in &state.sources {
                text.push_str(&format!("    index: {index}\n\tname: <{name}>\n"));
            }
            text
        }
        ["load-module", module, arguments @ ..] => {
            let index = state.next_module;
            state.next_module += 1;
            state
                .modules
                .push((index, module.to_string(), arguments.join(" ")));
            String::new()
        }
        ["unload-module", index] => {
            let index: u32 = index.parse().unwrap_or(u32::MAX);
            state.modules.retain(|(i, _, _)| *i != index);
            String::new()
        }
        ["set-sink-volume", index, raw] => {
            let (index, raw): (u32, u32) = (index.parse().unwrap_or(0), raw.parse().unwrap_or(0));
            if let Some(sink) = state.sinks.iter_mut().find(|sink| sink.0 == index) {
                sink.2 = raw;
            }
            String::new()
        }
        ["set-sink-mute", index, muted] => {
            let index: u32 = index.parse().unwrap_or(0);
            if let Some(sink) = state.sinks.iter_mut().find(|sink| sink.0 == index) {
                sink.3 = *muted == "1";
            }
            String::new()
        }
        _ => format!("Unknown command: {command}\n"),
    }
}
