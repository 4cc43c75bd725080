use clap::Parser;
use room_ngin::{
    config::{Args, ViewerConfig},
    flow,
};

fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::from(Args::parse());
    flow::run(config)
}
