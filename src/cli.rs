use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "shengjing",
    version,
    about = "Read, search and bookmark the Chinese Union Version Bible in the terminal.",
    long_about = None
)]
pub struct Cli {
    /// Print the chapter at LOCATION (default: the first chapter) and exit
    #[clap(long)]
    pub dump: bool,

    /// Search verses containing KEYWORD and print a page of results
    #[clap(short = 's', long, value_name = "KEYWORD")]
    pub search: Option<String>,

    /// Restrict the search to one book ("all" for every book)
    #[clap(short = 'b', long, value_name = "BOOK", default_value = "all")]
    pub book: String,

    /// Page to print for --search and --favorites
    #[clap(long, value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Page size for --search and --favorites
    #[clap(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Print favorite verses
    #[clap(short = 'f', long)]
    pub favorites: bool,

    /// Print search history
    #[clap(short = 'r', long)]
    pub history: bool,

    /// Add or remove the verse at LOCATION (BOOK CH:V, or with --verse)
    /// from favorites
    #[clap(long)]
    pub toggle_favorite: bool,

    /// Verse number used with --toggle-favorite
    #[clap(long, value_name = "N")]
    pub verse: Option<u32>,

    /// Directory holding bible-array.json
    #[clap(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Book [chapter[:verse]] or a /bible/... path
    #[clap(name = "LOCATION")]
    pub location: Vec<String>,
}
