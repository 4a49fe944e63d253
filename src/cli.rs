use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// One-shot message to send; omit to start an interactive chat
    pub query: Option<String>,

    /// Model id to start with (see /model for the list)
    #[arg(short, long)]
    pub model: Option<String>,
}
