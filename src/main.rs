use anyhow::{Context, Result};
use log::info;
use std::io;
use wordle_assistant::autoplay::Autoplay;
use wordle_assistant::cli::{CliInterface, parse_cli};
use wordle_assistant::game_state::game_loop;
use wordle_assistant::logging::{default_log_path, init_logging};
use wordle_assistant::tui::TuiInterface;
use wordle_assistant::wordbank::load_default_wordbank;

fn main() -> Result<()> {
    let cli = parse_cli();

    // stderr would draw over the alternate screen
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| if cli.tui { default_log_path() } else { None });
    init_logging(log_file.as_deref()).context("Failed to set up logging")?;

    let config = cli.session_config().context("Invalid starting word")?;
    let answer = cli.answer_word().context("Invalid answer")?;

    let wordbank = load_default_wordbank(cli.wordbank_path.as_deref(), config.word_length)
        .with_context(|| match &cli.wordbank_path {
            Some(path) => format!("Failed to load word bank from '{}'", path.display()),
            None => "Failed to load word bank".to_string(),
        })?;
    if wordbank.is_empty() {
        anyhow::bail!("No {}-letter words found in the word bank", config.word_length);
    }
    info!("Word bank ready: {} words", wordbank.len());

    let outcome = if let Some(answer) = answer {
        game_loop(&wordbank, &config, &mut Autoplay::new(answer))
    } else if cli.tui {
        let mut tui = TuiInterface::new().context("Failed to initialise terminal")?;
        let outcome = game_loop(&wordbank, &config, &mut tui);
        tui.cleanup().context("Failed to restore terminal")?;
        outcome
    } else {
        game_loop(&wordbank, &config, &mut CliInterface::new(io::stdin().lock()))
    };
    info!("Last game: {outcome:?}");
    Ok(())
}
