//! Manual test client that plays the tablet side of the handshake: connect,
//! identify as a tablet paired with a headset address, then ask the server
//! to open a dataset. Useful for poking at a running server by hand; not
//! part of the analysis pipeline.

use annotscope::handshake_format::{open_dataset, tablet_ident};

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

    /// Headset address to claim a pairing with
    #[arg(long = "headset", default_value = "127.0.0.1")]
    headset_addr: String,

    /// Dataset name to ask the server to open
    #[arg(long = "dataset", default_value = "Agulhas_10_resampled.vtk")]
    dataset: String,
}

fn main() {
    env_logger::init();
    let args = ProbeArgs::parse();

    let mut stream = TcpStream::connect(&args.server).expect("Failed to connect to the server");
    info!(
        "connected, local address: {}",
        stream.local_addr().expect("Failed to read local address")
    );

    println!("Sending login...");
    stream
        .write_all(&tablet_ident(&args.headset_addr))
        .expect("Failed to send the tablet ident");

    sleep(Duration::from_secs(1));

    let frame = open_dataset(&args.dataset, &[1, 1, 0]);
    println!("Sending open dataset {}. Size: {}", args.dataset, frame.len());
    stream
        .write_all(&frame)
        .expect("Failed to send the open-dataset frame");
}
