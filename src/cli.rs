use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Parse and generate proxy share links", long_about = None)]
pub struct Args {
    #[arg(short, long, global = true, help = "Emit debug log")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Codec config (TOML) file path")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse share links into JSON records, one per line
    Parse {
        #[arg(help = "A share link, a file of links, or a subscription URL")]
        input: String,
    },
    /// Generate share links from JSON records
    Generate {
        #[arg(help = "File of JSON records (array or one per line), stdin if omitted")]
        file: Option<String>,
    },
}
