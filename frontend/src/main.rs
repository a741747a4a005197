use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Arc, mpsc};
use std::thread;

use agc_core::core::machine::Machine;
use agc_machines::{AgcSystem, BootImage};
use clap::Parser;

mod config;
mod emulator;
mod input;
mod pacer;
mod server;

use config::Config;
use emulator::Control;
use server::{Handler, Server};

#[derive(Parser, Debug)]
#[command(name = "agc", about = "Apollo Guidance Computer emulator with a web DSKY")]
struct Args {
    /// Log every executed instruction.
    #[arg(short, long)]
    verbose: bool,

    /// Port for the web DSKY.
    #[arg(long)]
    port: Option<u16>,

    /// Address to listen on.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Page served to the browser.
    #[arg(long, value_name = "PATH")]
    index: Option<PathBuf>,

    /// Program image for fixed memory (big-endian 16-bit words).
    #[arg(long, value_name = "PATH")]
    rom: Option<PathBuf>,

    /// Start the CPU without waiting for a browser.
    #[arg(long)]
    no_wait: bool,

    /// Settings file (default: <config dir>/agc/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    /// Command-line flags win over the settings file.
    fn apply(self, config: &mut Config) {
        if self.verbose {
            config.verbose = true;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(index) = self.index {
            config.index = index;
        }
        if self.rom.is_some() {
            config.rom = self.rom;
        }
        if self.no_wait {
            config.wait_for_client = false;
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_micros()
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    init_logging(config.verbose);

    let image = match &config.rom {
        Some(path) => {
            let image = BootImage::from_file(path)?;
            log::info!("{}: {} words", path.display(), image.program_len());
            image
        }
        None => BootImage::standard(),
    };
    let mut machine = AgcSystem::with_image(image);

    let control = Arc::new(Control::new(!config.wait_for_client));
    {
        let control = Arc::clone(&control);
        ctrlc::set_handler(move || control.stop.store(true, Ordering::Release))?;
    }

    let (events, inbox) = mpsc::channel();
    let handler = Handler::new(
        config.index.clone(),
        input::default_key_map(machine.input_map()),
        machine.display(),
        events,
        Arc::clone(&control),
    );
    let server = Server::bind(&config.listen_addr(), handler)?;
    thread::Builder::new()
        .name("dsky".into())
        .spawn(move || server.serve())?;

    if config.wait_for_client {
        log::info!(
            "waiting for a client: open http://localhost:{}/index.html",
            config.port
        );
    }

    emulator::run(&mut machine, &inbox, &control)?;
    Ok(())
}
