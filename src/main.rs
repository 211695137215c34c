use shengjing::{
    chapter::Location,
    cli::Cli,
    config::{Config, get_app_data_prefix},
    favorites::Toggle,
    logging::{self, LogLevel},
    search::BookFilter,
    session::Session,
    ui::reader::Reader,
};

use clap::Parser;
use crossterm::style::Stylize;
use eyre::{Result, eyre};
use std::io::IsTerminal;

const LOG_FILE: &str = "shengjing.log";

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogLevel::from_flags(cli.verbose, cli.debug));

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::new()?,
    };

    let corpus_dir = Session::corpus_dir(&config, cli.corpus.as_deref())?;
    let mut session = Session::open(config, &corpus_dir)?;

    let location = if cli.location.is_empty() {
        None
    } else {
        Some(Location::parse_args(&cli.location)?)
    };

    // Handle different CLI modes
    if let Some(keyword) = cli.search.as_deref() {
        print_search(&mut session, keyword, &cli)
    } else if cli.favorites {
        print_favorites(&session, &cli);
        Ok(())
    } else if cli.history {
        for keyword in session.history.keywords() {
            println!("{}", keyword);
        }
        Ok(())
    } else if cli.toggle_favorite {
        let location = location.ok_or_else(|| eyre!("--toggle-favorite needs a LOCATION"))?;
        let verse = cli
            .verse
            .or(location.verse)
            .ok_or_else(|| eyre!("--toggle-favorite needs --verse or a BOOK CH:V location"))?;
        let target = Location::new(&location.book, location.chapter).with_verse(verse);
        match session.toggle_favorite(&target, verse)? {
            Toggle::Added => println!("Added {} to favorites", target),
            Toggle::Removed => println!("Removed {} from favorites", target),
        }
        Ok(())
    } else if cli.dump {
        dump_chapter(&session, location)
    } else {
        run_tui(session, location)
    }
}

fn run_tui(session: Session, location: Option<Location>) -> Result<()> {
    // Log lines would tear the alternate screen
    let log_path = get_app_data_prefix()?.join(LOG_FILE);
    if let Err(err) = logging::redirect_to_file(&log_path) {
        logging::warn(format!("Could not open {}: {}", log_path.display(), err));
    }

    let result = Reader::new(session, location).and_then(|mut reader| reader.run());
    logging::redirect_to_stderr();
    result
}

fn dump_chapter(session: &Session, location: Option<Location>) -> Result<()> {
    let reader = session.reader_at(location)?;
    let chapter = reader.chapter()?;

    println!("{} {}", chapter.book, chapter.label);
    for verse in &chapter.verses {
        let (mark, number) = match verse.verse_number() {
            Some(n) if reader.is_favorite(n, &session.favorites) => ("*", n.to_string()),
            Some(n) => (" ", n.to_string()),
            None => (" ", verse.section.clone()),
        };
        println!("{}{:>4} {}", mark, number, verse.content);
    }
    Ok(())
}

fn print_search(session: &mut Session, keyword: &str, cli: &Cli) -> Result<()> {
    let filter = BookFilter::parse(&cli.book);
    let scope = match &filter {
        BookFilter::All => "all books".to_string(),
        BookFilter::Book(book) => book.clone(),
    };

    if !session.search(keyword, filter)? {
        return Err(eyre!("Search keyword is empty"));
    }

    let page_size = cli.page_size.unwrap_or(session.config.settings.page_size);
    session.search.change_page(cli.page, Some(page_size));

    let engine = &session.search;
    println!(
        "{} results for \"{}\" in {}, page {}/{}",
        engine.total(),
        keyword,
        scope,
        engine.page(),
        engine.page_count().max(1)
    );

    let color = std::io::stdout().is_terminal();
    for verse in engine.current_page() {
        let mut content = String::new();
        for segment in engine.highlight(&verse.content) {
            if segment.matched && color {
                content.push_str(&segment.text.black().on_yellow().to_string());
            } else {
                content.push_str(segment.text);
            }
        }
        println!("{}  {}", verse.reference(), content);
    }
    Ok(())
}

fn print_favorites(session: &Session, cli: &Cli) {
    let favorites = &session.favorites;
    let page_size = cli
        .page_size
        .unwrap_or(session.config.settings.page_size)
        .max(1);
    let page_count = favorites.len().div_ceil(page_size).max(1);

    println!("{} favorites, page {}/{}", favorites.len(), cli.page.max(1), page_count);
    for entry in favorites.list(cli.page, page_size) {
        println!("{}  {}", entry.reference(), entry.content);
    }
}
