//! Manual test client that plays the headset side of the handshake:
//! connect, identify as a headset, then sit on the connection forever so
//! the server keeps treating it as alive. Not part of the analysis
//! pipeline.

use annotscope::handshake_format::headset_ident;

use clap::Parser;
use log::info;
use std::io::Write;
use std::net::TcpStream;
use std::thread::sleep;
use std::time::Duration;

#[derive(Debug, Parser)]
#[clap(version, about)]
struct ProbeArgs {
    /// Address of the server to connect to
    #[arg(default_value = "127.0.0.1:8000")]
    server: String,
}

fn main() {
    env_logger::init();
    let args = ProbeArgs::parse();

    let mut stream = TcpStream::connect(&args.server).expect("Failed to connect to the server");
    info!(
        "connected, local address: {}",
        stream.local_addr().expect("Failed to read local address")
    );

    stream
        .write_all(&headset_ident())
        .expect("Failed to send the headset ident");

    loop {
        sleep(Duration::from_secs(1));
    }
}
