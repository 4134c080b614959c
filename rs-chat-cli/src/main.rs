use std::io::{self, BufRead, Write};

use rs_chat_core::model::config::ModelConfig;
use rs_chat_core::model::language_model::{DEFAULT_MAX_LENGTH, LanguageModel};

/// Exact input that ends the session.
const EXIT_COMMAND: &str = "exit";

fn main() {
    env_logger::init();

    let mut model = LanguageModel::new(ModelConfig::default());

    // Resume from the most recent block, if an earlier session saved one.
    if let Some(latest) = model.available_blocks().last().copied() {
        model.load_block(latest);
    }

    println!("Chat model ready (type '{EXIT_COMMAND}' to quit)");

    let stdin = io::stdin();
    loop {
        print!("you: ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break, // EOF behaves like exit
            Ok(_) => (),
            Err(error) => {
                log::error!("failed to read input: {error}");
                break;
            }
        }

        let input = input.trim_end_matches(['\r', '\n']);
        if input == EXIT_COMMAND {
            break;
        }

        model.learn(input);
        println!("bot: {}", model.generate(DEFAULT_MAX_LENGTH));
    }

    if let Err(error) = model.save() {
        log::error!("failed to save the model: {error}");
    }
    println!("Model saved, goodbye.");
}
